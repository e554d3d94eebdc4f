//! Procedural sound effect synthesis.

use crate::core::Result;
use rand::Rng;
use std::f32::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

pub const SAMPLE_RATE: u32 = 44_100;

/// Peak amplitude as a fraction of full scale.
const AMPLITUDE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveKind {
    Sine,
    Square,
    Noise,
}

/// 16-bit mono samples of `duration` seconds.
///
/// Noise ignores `frequency` and draws each sample uniformly from the RNG.
pub fn generate_waveform<R: Rng>(
    kind: WaveKind,
    frequency: f32,
    duration: f32,
    sample_rate: u32,
    rng: &mut R,
) -> Vec<i16> {
    let count = (f64::from(duration.max(0.0)) * f64::from(sample_rate)).round() as usize;
    let peak = AMPLITUDE * i16::MAX as f32;
    (0..count)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let value = match kind {
                WaveKind::Sine => (TAU * frequency * t).sin(),
                WaveKind::Square => {
                    let s = (TAU * frequency * t).sin();
                    if s > 0.0 {
                        1.0
                    } else if s < 0.0 {
                        -1.0
                    } else {
                        0.0
                    }
                }
                WaveKind::Noise => rng.gen_range(-1.0..=1.0),
            };
            (value * peak) as i16
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundEffect {
    pub name: &'static str,
    pub kind: WaveKind,
    pub frequency: f32,
    pub duration: f32,
}

impl SoundEffect {
    pub fn render<R: Rng>(&self, rng: &mut R) -> Vec<i16> {
        generate_waveform(self.kind, self.frequency, self.duration, SAMPLE_RATE, rng)
    }

    pub fn file_name(&self) -> String {
        format!("{}.wav", self.name)
    }
}

/// The platformer's sounds: ring pickup, spring launch and damage.
pub fn default_effects() -> [SoundEffect; 3] {
    [
        SoundEffect {
            name: "ring",
            kind: WaveKind::Sine,
            frequency: 1500.0,
            duration: 0.12,
        },
        SoundEffect {
            name: "spring",
            kind: WaveKind::Square,
            frequency: 800.0,
            duration: 0.22,
        },
        SoundEffect {
            name: "hurt",
            kind: WaveKind::Noise,
            frequency: 440.0,
            duration: 0.18,
        },
    ]
}

pub fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Render every default effect into `dir`, returning the written paths.
pub fn write_default_effects<R: Rng>(dir: &Path, rng: &mut R) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for effect in default_effects() {
        let path = dir.join(effect.file_name());
        write_wav(&path, &effect.render(rng), SAMPLE_RATE)?;
        log::info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
