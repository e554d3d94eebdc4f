//! Headless simulator.
//!
//! Runs a project or the platformer without a terminal and prints what
//! happened, for checking event sheets and tuning physics.
//!
//! Usage:
//!   cargo run --bin simulate -- project game.json --seconds 5 --press 1.0:K_SPACE
//!   cargo run --bin simulate -- hedgehog --seed 42 --seconds 10 --forward

use clap::{Parser, Subcommand};
use engine4k::core::{EngineConfig, EngineError, Result};
use engine4k::engine::{Engine, Key, Registry};
use engine4k::platformer::{HedgehogSession, PlatformerInput};
use engine4k::project::ProjectData;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simulate", about = "Run engine4k projects headlessly")]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Step a project and report frame changes and final counters
    Project {
        path: PathBuf,
        #[arg(long)]
        frame: Option<String>,
        #[arg(long, default_value_t = 5.0)]
        seconds: f64,
        /// Key press at a time, e.g. `1.5:K_SPACE`; repeatable
        #[arg(long = "press")]
        presses: Vec<String>,
        #[arg(long)]
        strict: bool,
    },
    /// Run the platformer with fixed input and report progress
    Hedgehog {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 10.0)]
        seconds: f32,
        /// Hold forward the whole time
        #[arg(long)]
        forward: bool,
        /// Jump every this many seconds
        #[arg(long)]
        jump_every: Option<f32>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Mode::Project {
            path,
            frame,
            seconds,
            presses,
            strict,
        } => simulate_project(&path, frame.as_deref(), seconds, &presses, strict),
        Mode::Hedgehog {
            seed,
            seconds,
            forward,
            jump_every,
        } => {
            simulate_hedgehog(seed, seconds, forward, jump_every);
            Ok(())
        }
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_press(text: &str) -> Result<(u64, Key)> {
    let bad = || EngineError::Editor(format!("bad --press `{}` (expected SECONDS:KEY)", text));
    let (time, key) = text.split_once(':').ok_or_else(bad)?;
    let secs: f64 = time.trim().parse().map_err(|_| bad())?;
    let key = Key::parse(key).ok_or_else(bad)?;
    Ok(((secs * 1000.0).max(0.0) as u64, key))
}

fn simulate_project(
    path: &Path,
    frame: Option<&str>,
    seconds: f64,
    presses: &[String],
    strict: bool,
) -> Result<()> {
    let project = ProjectData::load(path)?;
    let config = EngineConfig {
        strict_project: strict,
        ..EngineConfig::default()
    };
    let mut presses = presses
        .iter()
        .map(|p| parse_press(p))
        .collect::<Result<Vec<_>>>()?;
    presses.sort_by_key(|(at, _)| *at);

    let mut engine = Engine::new(config, Registry::with_default_plugins());
    engine.load_project(&project)?;
    engine.start(frame)?;

    let tick_ms = engine.config().tick_ms();
    let end_ms = (seconds.max(0.0) * 1000.0) as u64;
    let mut now_ms = 0;
    let mut last_frame = engine.current_frame_name().map(str::to_string);
    let mut pending = presses.into_iter().peekable();

    println!("Start: {}", last_frame.as_deref().unwrap_or("-"));
    while now_ms < end_ms && engine.is_running() {
        while let Some((_, key)) = pending.next_if(|(at, _)| *at <= now_ms) {
            engine.press_key(key);
        }
        engine.advance(tick_ms);
        now_ms += tick_ms;

        let current = engine.current_frame_name().map(str::to_string);
        if current != last_frame {
            println!(
                "{:>7.3}s  {} -> {}",
                now_ms as f64 / 1000.0,
                last_frame.as_deref().unwrap_or("-"),
                current.as_deref().unwrap_or("-")
            );
            last_frame = current;
        }
    }

    if !engine.is_running() {
        println!("{:>7.3}s  game quit", now_ms as f64 / 1000.0);
    }
    println!("Ticks: {}", engine.tick_count());
    if let Some(frame) = engine.current_frame() {
        for obj in &frame.objects {
            if let Some(text) = obj.display_text() {
                println!("  {:<16} {}", obj.name, text);
            }
        }
    }
    Ok(())
}

fn simulate_hedgehog(seed: Option<u64>, seconds: f32, forward: bool, jump_every: Option<f32>) {
    let mut session = match seed {
        Some(seed) => HedgehogSession::random(seed),
        None => HedgehogSession::test_course(),
    };
    let dt = 1.0 / 60.0;
    let steps = (seconds.max(0.0) / dt) as u32;
    let jump_ticks = jump_every.map(|s| ((s / dt) as u32).max(1));
    let mut max_speed: f32 = 0.0;
    let mut hurts = 0;
    let mut springs = 0;

    for step in 0..steps {
        let input = PlatformerInput {
            move_z: if forward { 1.0 } else { 0.0 },
            jump: jump_ticks.is_some_and(|n| step % n == 0),
            ..PlatformerInput::default()
        };
        let results = session.tick(&input, dt);
        max_speed = max_speed.max(session.player.speed);
        hurts += u32::from(results.hurt);
        springs += u32::from(results.hit_spring);
    }

    let p = session.player.position;
    println!("Simulated {:.1}s ({} steps)", seconds, steps);
    println!("  Position:   {:.1}, {:.1}, {:.1}", p.x, p.y, p.z);
    println!("  Top speed:  {:.1}", max_speed);
    println!(
        "  Rings:      {} ({} left)",
        session.rings_collected,
        session.level.rings_remaining()
    );
    println!("  Springs:    {}", springs);
    println!("  Hurt:       {} (health {})", hurts, session.player.health);
    println!("  Sounds:     {}", session.audio.played().len());
}
