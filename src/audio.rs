// Bounded pool of one-shot sounds plus looping music

use crate::assets::{AssetCache, SoundHandle, DEFAULT_SOUND_LENGTH};
use log::{info, trace};
use macroquad::audio::{play_sound, play_sound_once, PlaySoundParams};

/// Default cap on voices alive at once.
pub const DEFAULT_POOL_CAPACITY: usize = 100;

/// Anything that accepts sound requests from game logic.
pub trait SoundSink {
    fn play(&mut self, sound: SoundHandle);
}

/// Records requests; handy for headless runs and tests.
impl SoundSink for Vec<SoundHandle> {
    fn play(&mut self, sound: SoundHandle) {
        self.push(sound);
    }
}

#[derive(Debug, Clone, Copy)]
struct Voice {
    sound: SoundHandle,
    remaining: f32,
}

/// Sounds requested this frame are queued, started by [`SoundPool::flush`] and
/// pruned once their clip length has elapsed. Requests past the capacity are
/// dropped.
#[derive(Debug)]
pub struct SoundPool {
    capacity: usize,
    pending: Vec<SoundHandle>,
    voices: Vec<Voice>,
}

impl Default for SoundPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl SoundPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            pending: Vec::new(),
            voices: Vec::new(),
        }
    }

    /// Voices playing or waiting to start.
    pub fn len(&self) -> usize {
        self.pending.len() + self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start queued sounds; `start` plays one and returns its length in seconds.
    pub fn start_pending(&mut self, mut start: impl FnMut(SoundHandle) -> f32) {
        for sound in self.pending.drain(..) {
            let remaining = start(sound);
            self.voices.push(Voice { sound, remaining });
        }
    }

    /// Start queued sounds through macroquad.
    pub fn flush(&mut self, assets: &AssetCache) {
        self.start_pending(|h| {
            if let Some(sound) = assets.sound(h) {
                play_sound_once(sound);
            }
            assets.sound_length(h).unwrap_or(DEFAULT_SOUND_LENGTH)
        });
    }

    /// Advance voice timers and drop finished ones.
    pub fn prune(&mut self, dt: f32) {
        for v in &mut self.voices {
            v.remaining -= dt;
        }
        self.voices.retain(|v| v.remaining > 0.0);
    }

    pub fn is_playing(&self, sound: SoundHandle) -> bool {
        self.voices.iter().any(|v| v.sound == sound)
    }
}

impl SoundSink for SoundPool {
    fn play(&mut self, sound: SoundHandle) {
        if self.len() >= self.capacity {
            trace!("Sound pool full ({}), dropping {sound:?}", self.capacity);
            return;
        }
        self.pending.push(sound);
    }
}

/// Start a looping background track.
pub fn play_music(assets: &AssetCache, music: SoundHandle, volume: f32) {
    if let Some(sound) = assets.sound(music) {
        info!("Starting music {music:?}");
        play_sound(
            sound,
            PlaySoundParams {
                looped: true,
                volume,
            },
        );
    }
}
