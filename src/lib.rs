//! Small tile-map dungeon brawler on Macroquad.
//!
//! A keyboard-driven hero fights chasing orcs on a CSV tile map. Levels and
//! layouts are plain CSV files, edited with the `map_editor` and
//! `level_editor` binaries.

pub mod animation;
pub mod assets;
pub mod audio;
pub mod character;
pub mod combat;
pub mod config;
mod error;
pub mod ir_level;
pub mod loader {
    pub mod csv;
    pub mod level;
}
pub mod render;
pub mod spatial;
pub mod tileset;
pub mod world;

pub use animation::SpriteSheet;
pub use assets::{AssetCache, SoundHandle, TextureHandle};
pub use audio::{SoundPool, SoundSink};
pub use character::{Character, CharacterProfile, CharacterState, Orc, Player, PlayerInput};
pub use config::GameConfig;
pub use error::GameError;
pub use ir_level::{LevelDef, ObjectKind, Placement, TileSetDef};
pub use loader::csv::{CsvOptions, CsvTable};
pub use spatial::{CellCoord, TileGrid, TileType};
pub use tileset::TileSet;
pub use world::{Spawner, World};
