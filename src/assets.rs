// Path-keyed texture and sound cache handing out typed handles

use anyhow::Context;
use log::{debug, info};
use macroquad::audio::{load_sound_from_bytes, Sound};
use macroquad::file::load_file;
use macroquad::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Length assumed for sounds whose header can't be read.
pub const DEFAULT_SOUND_LENGTH: f32 = 1.0;

/// Index of a loaded asset in an [`AssetCache`].
///
/// The `T` parameter keeps texture and sound handles apart.
pub struct AssetHandle<T> {
    index: u32,
    _kind: PhantomData<fn() -> T>,
}

impl<T> AssetHandle<T> {
    /// Handle from a raw index. Only meaningful for the cache that issued it.
    pub const fn from_raw(index: u32) -> Self {
        Self {
            index,
            _kind: PhantomData,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

// manual impls: derives would put bounds on the marker type
impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for AssetHandle<T> {}
impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}
impl<T> Eq for AssetHandle<T> {}
impl<T> Hash for AssetHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}
impl<T> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetHandle({})", self.index)
    }
}

pub struct TextureAsset;
pub struct SoundAsset;

pub type TextureHandle = AssetHandle<TextureAsset>;
pub type SoundHandle = AssetHandle<SoundAsset>;

struct LoadedSound {
    sound: Sound,
    length: f32,
}

/// Textures and sounds, loaded once per distinct path and kept for the
/// lifetime of the cache.
#[derive(Default)]
pub struct AssetCache {
    textures: Vec<Texture2D>,
    texture_paths: HashMap<String, TextureHandle>,
    sounds: Vec<LoadedSound>,
    sound_paths: HashMap<String, SoundHandle>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a texture, or return the handle of the copy already loaded.
    pub async fn load_texture(&mut self, path: &str) -> anyhow::Result<TextureHandle> {
        if let Some(&h) = self.texture_paths.get(path) {
            return Ok(h);
        }

        let tex = load_texture(path)
            .await
            .with_context(|| format!("Loading texture {path}"))?;
        tex.set_filter(FilterMode::Nearest);
        debug!("Loaded texture {path} ({}x{})", tex.width(), tex.height());

        let h = TextureHandle::from_raw(self.textures.len() as u32);
        self.textures.push(tex);
        self.texture_paths.insert(path.to_owned(), h);
        Ok(h)
    }

    /// Load a sound, or return the handle of the copy already loaded.
    pub async fn load_sound(&mut self, path: &str) -> anyhow::Result<SoundHandle> {
        if let Some(&h) = self.sound_paths.get(path) {
            return Ok(h);
        }

        let bytes = load_file(path)
            .await
            .with_context(|| format!("Reading sound {path}"))?;
        let length = wav_duration(&bytes).unwrap_or_else(|| {
            debug!("No WAVE header in {path}, assuming {DEFAULT_SOUND_LENGTH}s");
            DEFAULT_SOUND_LENGTH
        });
        let sound = load_sound_from_bytes(&bytes)
            .await
            .with_context(|| format!("Decoding sound {path}"))?;

        let h = SoundHandle::from_raw(self.sounds.len() as u32);
        self.sounds.push(LoadedSound { sound, length });
        self.sound_paths.insert(path.to_owned(), h);
        Ok(h)
    }

    pub fn texture(&self, h: TextureHandle) -> Option<&Texture2D> {
        self.textures.get(h.index as usize)
    }

    /// Pixel size of a texture, zero for unknown handles.
    pub fn texture_size(&self, h: TextureHandle) -> Vec2 {
        self.texture(h).map(|t| t.size()).unwrap_or(Vec2::ZERO)
    }

    pub fn sound(&self, h: SoundHandle) -> Option<&Sound> {
        self.sounds.get(h.index as usize).map(|s| &s.sound)
    }

    /// Clip length in seconds.
    pub fn sound_length(&self, h: SoundHandle) -> Option<f32> {
        self.sounds.get(h.index as usize).map(|s| s.length)
    }

    pub fn log_stats(&self) {
        info!(
            "Asset cache holds {} textures and {} sounds",
            self.textures.len(),
            self.sounds.len()
        );
    }
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let b = bytes.get(at..at + 4)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Duration of a RIFF/WAVE file in seconds, from its `fmt ` and `data` chunks.
pub fn wav_duration(bytes: &[u8]) -> Option<f32> {
    if bytes.get(0..4)? != b"RIFF" || bytes.get(8..12)? != b"WAVE" {
        return None;
    }

    let mut byte_rate = None;
    let mut data_len = None;
    let mut at = 12;
    while at + 8 <= bytes.len() {
        let id = &bytes[at..at + 4];
        let len = read_u32(bytes, at + 4)? as usize;
        let body = at + 8;
        match id {
            b"fmt " => byte_rate = read_u32(bytes, body + 8),
            b"data" => data_len = Some(len),
            _ => {}
        }
        if byte_rate.is_some() && data_len.is_some() {
            break;
        }
        // chunks are word aligned
        at = body + len + (len & 1);
    }

    let rate = byte_rate.filter(|&r| r > 0)?;
    Some(data_len? as f32 / rate as f32)
}
