// Game configuration, loaded from optional JSON

use crate::error::GameError;
use log::{info, warn};
use serde::Deserialize;
use std::path::Path;

const SPRITES: &str = "assets/sprites/Minifantasy_Dungeon_Assets/Characters";
const SFX: &str = "assets/audio/Minifantasy_Dungeon_SFX";

/// Top-level configuration. Every field falls back to its default when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Looping background track
    pub music: Option<String>,
    pub music_volume: f32,
    /// Tile types that block movement
    pub wall_tiles: Vec<i32>,
    pub human: CharacterConfig,
    pub orc: CharacterConfig,
    pub combat: CombatConfig,
    pub spawner: SpawnerConfig,
    pub sound_pool_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            music: Some(
                "assets/audio/Minifantasy_Dungeon_Music/Music/Goblins_Dance_(Battle).wav".into(),
            ),
            music_volume: 1.0,
            wall_tiles: Vec::new(),
            human: CharacterConfig::human(),
            orc: CharacterConfig::orc(),
            combat: CombatConfig::default(),
            spawner: SpawnerConfig::default(),
            sound_pool_capacity: crate::audio::DEFAULT_POOL_CAPACITY,
        }
    }
}

impl GameConfig {
    /// Read a config file. A missing file gives the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let txt = match std::fs::read_to_string(path) {
            Ok(txt) => txt,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(GameError::io(path, e)),
        };

        let cfg = Self::from_json(&txt).map_err(|source| GameError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config {}", path.display());
        Ok(cfg)
    }

    pub fn from_json(txt: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(txt)
    }
}

/// One sprite sheet: a frame grid per facing block.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub path: String,
    /// Frame rows inside one facing block
    pub rows: u32,
    pub columns: u32,
    /// Frames per second
    pub speed: f32,
    pub looping: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            rows: 1,
            columns: 4,
            speed: crate::animation::DEFAULT_ANIMATION_SPEED,
            looping: true,
        }
    }
}

impl SheetConfig {
    fn looped(path: String, columns: u32, speed: f32) -> Self {
        Self {
            path,
            rows: 1,
            columns,
            speed,
            looping: true,
        }
    }

    fn once(path: String, columns: u32, speed: f32) -> Self {
        Self {
            looping: false,
            ..Self::looped(path, columns, speed)
        }
    }
}

/// Sprites, sounds and tuning of one kind of character.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub idle: SheetConfig,
    pub walk: SheetConfig,
    pub attack: SheetConfig,
    /// Characters without one can't be damaged
    pub damage: Option<SheetConfig>,
    /// Row blocks per sheet, one per facing direction
    pub facing_blocks: u32,
    pub draw_scale: f32,
    /// World units per second at full intent
    pub speed: f32,
    pub health: f32,
    /// Seconds between accepted attacks
    pub attack_cooldown: f32,
    pub attack_sound: Option<String>,
    pub step_sound: Option<String>,
    pub damage_sound: Option<String>,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self::human()
    }
}

impl CharacterConfig {
    pub fn human() -> Self {
        let dir = format!("{SPRITES}/Human");
        Self {
            idle: SheetConfig::looped(format!("{dir}/Idle.png"), 16, 5.0),
            walk: SheetConfig::looped(format!("{dir}/Walk.png"), 4, 5.0),
            attack: SheetConfig::once(format!("{dir}/Attack.png"), 4, 10.0),
            damage: None,
            facing_blocks: 4,
            draw_scale: 5.0,
            speed: 200.0,
            health: 10.0,
            attack_cooldown: 0.0,
            attack_sound: Some(format!("{SFX}/07_human_atk_sword_1.wav")),
            step_sound: Some(format!("{SFX}/16_human_walk_stone_1.wav")),
            damage_sound: None,
        }
    }

    pub fn orc() -> Self {
        let dir = format!("{SPRITES}/Orc");
        Self {
            idle: SheetConfig::looped(format!("{dir}/Idle.png"), 16, 5.0),
            walk: SheetConfig::looped(format!("{dir}/Walk.png"), 4, 5.0),
            attack: SheetConfig::once(format!("{dir}/Attack.png"), 4, 10.0),
            damage: Some(SheetConfig::once(format!("{dir}/Dmg.png"), 4, 10.0)),
            facing_blocks: 4,
            draw_scale: 5.0,
            speed: 200.0,
            health: 10.0,
            attack_cooldown: 1.0,
            attack_sound: Some(format!("{SFX}/17_orc_atk_sword_1.wav")),
            step_sound: Some(format!("{SFX}/25_orc_walk_stone_1.wav")),
            damage_sound: Some(format!("{SFX}/21_orc_damage_3.wav")),
        }
    }
}

/// Movement and combat tuning shared by all characters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Intent length below which a character counts as standing still
    pub movement_threshold: f32,
    /// Side of the square collision box
    pub body_size: f32,
    /// Player intent gained per second of held key
    pub player_acceleration: f32,
    /// Player intent decay rate on released axes
    pub player_friction: f32,
    /// Orcs stop running this close to their target
    pub chase_stop_distance: f32,
    /// Per-call intent decay once an orc has arrived
    pub chase_decay: f32,
    /// Enemy push-apart rate
    pub separation_strength: f32,
    pub sword_size: [f32; 2],
    /// Sword box offset, scaled by facing sign per axis
    pub sword_offset: [f32; 2],
    /// Extra downward sword offset independent of facing
    pub sword_drop: f32,
    /// Attack frames during which the sword hits, `[first, end)`
    pub sword_frames: [u32; 2],
    pub sword_damage: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            movement_threshold: 0.25,
            body_size: 30.0,
            player_acceleration: 5.0,
            player_friction: 10.0,
            chase_stop_distance: 100.0,
            chase_decay: 0.9,
            separation_strength: 15.0,
            sword_size: [50.0, 40.0],
            sword_offset: [18.0, 7.0],
            sword_drop: 3.0,
            sword_frames: [2, 3],
            sword_damage: 5.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Seconds between spawns; 0 disables the spawner
    pub interval: f32,
    pub max_alive: usize,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            interval: 5.0,
            max_alive: 8,
        }
    }
}
