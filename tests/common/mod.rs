// tests/common/mod.rs
#![allow(dead_code)]

use macroquad::prelude::*;
use std::path::PathBuf;
use tile_brawl::character::CharacterSounds;
use tile_brawl::{CharacterProfile, SoundHandle, SpriteSheet, TextureHandle};

pub const ATTACK_SOUND: SoundHandle = SoundHandle::from_raw(0);
pub const STEP_SOUND: SoundHandle = SoundHandle::from_raw(1);
pub const DAMAGE_SOUND: SoundHandle = SoundHandle::from_raw(2);

/// Fresh scratch directory under the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let dir = std::env::temp_dir().join(format!("tile_brawl_{name}_{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sheet(columns: u32, speed: f32, looping: bool) -> SpriteSheet {
    let s = SpriteSheet::new(
        TextureHandle::from_raw(0),
        vec2(64.0, 64.0),
        1,
        columns,
        Rect::new(0.0, 0.0, 1.0, 0.25),
    )
    .with_speed(speed);
    if looping {
        s
    } else {
        s.once()
    }
}

pub fn human_profile() -> CharacterProfile {
    CharacterProfile::new(sheet(16, 5.0, true), sheet(4, 5.0, true), sheet(4, 10.0, false))
        .with_sounds(CharacterSounds {
            attack: Some(ATTACK_SOUND),
            step: Some(STEP_SOUND),
            damage: None,
        })
}

pub fn orc_profile() -> CharacterProfile {
    let mut p = CharacterProfile::new(sheet(16, 5.0, true), sheet(4, 5.0, true), sheet(4, 10.0, false))
        .with_damage(sheet(4, 10.0, false))
        .with_sounds(CharacterSounds {
            attack: Some(ATTACK_SOUND),
            step: Some(STEP_SOUND),
            damage: Some(DAMAGE_SOUND),
        });
    p.attack_cooldown = 1.0;
    p
}
