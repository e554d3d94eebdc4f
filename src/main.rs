use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use engine4k::audio::synth::write_default_effects;
use engine4k::build_info;
use engine4k::core::{EngineConfig, Result, LOG_FILE};
use engine4k::editor::EditorState;
use engine4k::engine::{build_bundle, load_bundle, Engine, Registry};
use engine4k::platformer::HedgehogSession;
use engine4k::project::ProjectData;
use engine4k::ui::{
    map_key, render_hedgehog_scene, render_play_scene, EditorAction, EditorScreen,
    HedgehogControls,
};
use engine4k::utils::persistence::data_path;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

type Term = Terminal<CrosstermBackend<Stdout>>;

#[derive(Parser)]
#[command(name = "engine4k", about = "Event-sheet game engine and editor", disable_version_flag = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Simulation rate override
    #[arg(long, global = true)]
    fps: Option<u32>,

    /// Reject projects with unknown condition/action types
    #[arg(long, global = true)]
    strict: bool,

    /// Config file to use instead of the one in the data directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print version information
    #[arg(short = 'V', long)]
    version: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Open the editor (the default)
    Edit { project: Option<PathBuf> },
    /// Run a project file
    Play {
        project: PathBuf,
        #[arg(long)]
        frame: Option<String>,
    },
    /// Freeze a project into a checksummed game bundle
    Build {
        project: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        frame: Option<String>,
    },
    /// Run a built game bundle
    Run { bundle: PathBuf },
    /// Top-down view of the hedgehog platformer
    Hedgehog {
        /// Generate a random arena from this seed instead of the test course
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Render the platformer's sound effects to WAV files
    Sfx {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", build_info::version_string());
        return;
    }

    let config = load_config(&cli);
    init_logging(&config);
    log::info!("{} starting", build_info::version_string());

    if let Err(e) = run(cli.command, config) {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// The configuration for this run. Command-line overrides live only here;
/// the stored file is updated separately by [`remember`].
fn load_config(cli: &Cli) -> EngineConfig {
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load().unwrap_or_else(|e| {
            eprintln!("Warning: using default config ({})", e);
            EngineConfig::default()
        }),
    };
    config.with_overrides(cli.fps, cli.strict)
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging(config: &EngineConfig) {
    let Ok(path) = data_path(LOG_FILE) else {
        return;
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .format_timestamp_secs()
    .target(env_logger::Target::Pipe(Box::new(file)))
    .try_init();
}

fn run(command: Option<Command>, config: EngineConfig) -> Result<()> {
    match command.unwrap_or(Command::Edit { project: None }) {
        Command::Edit { project } => {
            let state = match project {
                Some(path) if path.exists() => {
                    let mut state = EditorState::new();
                    state.open(&path)?;
                    remember(&path);
                    state
                }
                Some(path) => EditorState::with_project(ProjectData::starter(), Some(path)),
                None => EditorState::new(),
            };
            with_terminal(|terminal| edit_loop(terminal, state, &config))
        }
        Command::Play { project, frame } => {
            let project_data = ProjectData::load(&project)?;
            remember(&project);
            let mut engine = start_engine(&config, &project_data, frame.as_deref())?;
            with_terminal(|terminal| play_loop(terminal, &mut engine))
        }
        Command::Build {
            project,
            out,
            frame,
        } => {
            let project_data = ProjectData::load(&project)?;
            // Refuse to bundle a project the runtime could not load
            Engine::new(config.clone(), Registry::with_default_plugins()).load_project(&project_data)?;
            let bundle = build_bundle(&project_data, frame.as_deref(), &out)?;
            println!(
                "Built {} ({} frames, {})",
                out.display(),
                bundle.project.frames.len(),
                bundle.built_at
            );
            Ok(())
        }
        Command::Run { bundle } => {
            let bundle = load_bundle(&bundle)?;
            let mut engine = start_engine(&config, &bundle.project, bundle.start_frame.as_deref())?;
            with_terminal(|terminal| play_loop(terminal, &mut engine))
        }
        Command::Hedgehog { seed } => {
            let session = match seed {
                Some(seed) => HedgehogSession::random(seed),
                None => HedgehogSession::test_course(),
            };
            with_terminal(|terminal| hedgehog_loop(terminal, session))
        }
        Command::Sfx { out, seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            for path in write_default_effects(&out, &mut rng)? {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}

fn remember(path: &Path) {
    if let Err(e) = EngineConfig::remember_recent(path) {
        log::warn!("Could not save recent projects: {}", e);
    }
}

fn start_engine(config: &EngineConfig, project: &ProjectData, frame: Option<&str>) -> Result<Engine> {
    let mut engine = Engine::new(config.clone(), Registry::with_default_plugins());
    engine.load_project(project)?;
    engine.start(frame)?;
    Ok(engine)
}

fn with_terminal<F>(body: F) -> Result<()>
where
    F: FnOnce(&mut Term) -> Result<()>,
{
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = body(&mut terminal);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('q')
}

fn edit_loop(terminal: &mut Term, state: EditorState, config: &EngineConfig) -> Result<()> {
    let mut screen = EditorScreen::new(state, config.screen_width, config.screen_height);
    loop {
        terminal.draw(|f| {
            let area = f.size();
            screen.draw(f, area);
        })?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        match screen.handle_key(key) {
            EditorAction::Continue => {}
            EditorAction::Quit => return Ok(()),
            EditorAction::Play => {
                let frame = screen.state.frame_name().map(str::to_string);
                match start_engine(config, &screen.state.project, frame.as_deref()) {
                    Ok(mut engine) => {
                        play_loop(terminal, &mut engine)?;
                        screen.status = format!("Ran {} ticks", engine.tick_count());
                    }
                    Err(e) => screen.status = format!("Cannot play: {}", e),
                }
            }
        }
    }
}

/// Run the engine in real time until the game quits or Ctrl+Q is pressed.
fn play_loop(terminal: &mut Term, engine: &mut Engine) -> Result<()> {
    let tick = Duration::from_millis(engine.config().tick_ms());
    let mut last_advance = Instant::now();

    while engine.is_running() {
        terminal.draw(|f| {
            let area = f.size();
            render_play_scene(f, area, engine);
        })?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    if is_quit(key.code, key.modifiers) {
                        engine.stop();
                        break;
                    }
                    if let Some(k) = map_key(key.code) {
                        engine.press_key(k);
                    }
                }
            }
        }

        // Whole milliseconds only; the remainder carries into the next frame
        let elapsed_ms = last_advance.elapsed().as_millis() as u64;
        last_advance += Duration::from_millis(elapsed_ms);
        engine.advance(elapsed_ms);
    }
    log::info!("Game stopped after {} ticks", engine.tick_count());
    Ok(())
}

fn hedgehog_loop(terminal: &mut Term, mut session: HedgehogSession) -> Result<()> {
    let mut controls = HedgehogControls::new();
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|f| {
            let area = f.size();
            render_hedgehog_scene(f, area, &session);
        })?;

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release {
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                        || is_quit(key.code, key.modifiers)
                    {
                        return Ok(());
                    }
                    controls.press(key.code);
                }
            }
        }

        let dt = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();
        let input = controls.take_input(dt);
        session.tick(&input, dt);
    }
}
