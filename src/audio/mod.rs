//! Sound effects.
//!
//! Playback is a placeholder: requests are logged and recorded so the game
//! loop and tests can see what would have been heard. `synth` renders the
//! effects to WAV files for a real mixer to pick up.

pub mod synth;

pub use synth::{default_effects, generate_waveform, write_wav, SoundEffect, WaveKind};

/// A single play request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRequest {
    pub name: String,
    pub volume: f32,
}

#[derive(Debug, Clone)]
pub struct AudioSystem {
    known: Vec<&'static str>,
    played: Vec<PlayRequest>,
}

impl Default for AudioSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSystem {
    pub fn new() -> Self {
        Self {
            known: default_effects().iter().map(|e| e.name).collect(),
            played: Vec::new(),
        }
    }

    pub fn play(&mut self, name: &str) {
        self.play_with_volume(name, 1.0);
    }

    pub fn play_with_volume(&mut self, name: &str, volume: f32) {
        if !self.known.iter().any(|k| *k == name) {
            log::warn!("Unknown sound '{}'", name);
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        log::info!("Play '{}' (volume {:.1})", name, volume);
        self.played.push(PlayRequest {
            name: name.to_string(),
            volume,
        });
    }

    pub fn played(&self) -> &[PlayRequest] {
        &self.played
    }

    /// Take everything played since the last drain.
    pub fn drain_played(&mut self) -> Vec<PlayRequest> {
        std::mem::take(&mut self.played)
    }
}
