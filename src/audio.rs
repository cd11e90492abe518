//! Audio cues for game events
//!
//! The simulation never plays sound itself. `AudioCues` turns the events in a
//! snapshot into cues and hands them to whatever `AudioSink` the host injects.

use crate::sim::{Category, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Fruit tapped
    FruitTap,
    /// Flower tapped
    FlowerTap,
    /// Pest tapped
    PestTap,
    /// A life was lost
    LoseLife,
    /// Match over
    GameOver,
    /// Background music starts
    MusicStart,
    /// Background music stops
    MusicStop,
}

impl SoundEffect {
    /// Base gain before volume settings are applied
    pub fn base_gain(self) -> f32 {
        match self {
            SoundEffect::FruitTap | SoundEffect::FlowerTap => 0.7,
            SoundEffect::PestTap | SoundEffect::LoseLife | SoundEffect::GameOver => 1.0,
            SoundEffect::MusicStart | SoundEffect::MusicStop => 0.5,
        }
    }

    #[inline]
    pub fn is_music(self) -> bool {
        matches!(self, SoundEffect::MusicStart | SoundEffect::MusicStop)
    }
}

/// Plays cues on a real device (or pretends to)
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, gain: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, gain: f32) {
        log::debug!("Audio cue {effect:?} at gain {gain:.2}");
    }
}

/// Maps game events to cues and applies volume settings
pub struct AudioCues<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
}

impl<S: AudioSink> AudioCues<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
            music_playing: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            return 0.0;
        }
        let channel = if effect.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        };
        self.master_volume * channel * effect.base_gain()
    }

    /// Play a cue unless it would be silent
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Call when a match begins
    pub fn start_music(&mut self) {
        if !self.music_playing {
            self.music_playing = true;
            self.play(SoundEffect::MusicStart);
        }
    }

    pub fn stop_music(&mut self) {
        if self.music_playing {
            self.music_playing = false;
            self.play(SoundEffect::MusicStop);
        }
    }

    /// Turn one tick's events into cues
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::Tapped {
                    category,
                    lives_lost,
                    ..
                } => {
                    self.play(match category {
                        Category::Reward => SoundEffect::FruitTap,
                        Category::Bonus => SoundEffect::FlowerTap,
                        Category::Penalty => SoundEffect::PestTap,
                    });
                    if lives_lost > 0 {
                        self.play(SoundEffect::LoseLife);
                    }
                }
                GameEvent::Missed { lives_lost, .. } if lives_lost > 0 => {
                    self.play(SoundEffect::LoseLife);
                }
                GameEvent::MatchEnded { .. } => {
                    self.stop_music();
                    self.play(SoundEffect::GameOver);
                }
                GameEvent::Missed { .. } | GameEvent::WaveSpawned { .. } => {}
            }
        }
    }
}
