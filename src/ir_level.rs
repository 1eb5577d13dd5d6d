// src/ir_level.rs
use macroquad::prelude::*;
use std::fmt;

/// Canonical, format-agnostic level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelDef {
    pub tileset: TileSetDef,
    pub placements: Vec<Placement>, // file order
}

/// Where the map comes from and how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSetDef {
    /// Atlas image path
    pub image: String,
    pub atlas_columns: u32,
    pub atlas_rows: u32,
    /// World units per atlas pixel
    pub scale: f32,
    /// Tile layout CSV path
    pub layout: String,
}

/// Kinds of object a level can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Player,
    Orc,
}

impl ObjectKind {
    /// Exact, case-sensitive name used in level files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "PLAYER" => Some(ObjectKind::Player),
            "ORC" => Some(ObjectKind::Orc),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Player => "PLAYER",
            ObjectKind::Orc => "ORC",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: ObjectKind,
    pub position: Vec2,
}

impl LevelDef {
    /// First player placement; later ones are ignored.
    pub fn player_spawn(&self) -> Option<Vec2> {
        self.placements
            .iter()
            .find(|p| p.kind == ObjectKind::Player)
            .map(|p| p.position)
    }

    pub fn orc_spawns(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.placements
            .iter()
            .filter(|p| p.kind == ObjectKind::Orc)
            .map(|p| p.position)
    }

    /// Add a placement. There is only one player, so placing it again moves it.
    pub fn place(&mut self, kind: ObjectKind, position: Vec2) {
        if kind == ObjectKind::Player {
            if let Some(p) = self.placements.iter_mut().find(|p| p.kind == kind) {
                p.position = position;
                return;
            }
            self.placements.insert(0, Placement { kind, position });
            return;
        }
        self.placements.push(Placement { kind, position });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_level() -> LevelDef {
        LevelDef {
            tileset: TileSetDef {
                image: "tiles.png".into(),
                atlas_columns: 23,
                atlas_rows: 14,
                scale: 5.0,
                layout: "layout.csv".into(),
            },
            placements: Vec::new(),
        }
    }

    #[test]
    fn placing_player_twice_moves_it() {
        let mut level = empty_level();
        level.place(ObjectKind::Orc, vec2(1.0, 1.0));
        level.place(ObjectKind::Player, vec2(2.0, 2.0));
        level.place(ObjectKind::Player, vec2(3.0, 3.0));
        level.place(ObjectKind::Orc, vec2(4.0, 4.0));

        assert_eq!(level.placements.len(), 3);
        assert_eq!(level.placements[0].kind, ObjectKind::Player);
        assert_eq!(level.player_spawn(), Some(vec2(3.0, 3.0)));
        assert_eq!(level.orc_spawns().count(), 2);
    }

    #[test]
    fn object_names_are_case_sensitive() {
        assert_eq!(ObjectKind::from_name("ORC"), Some(ObjectKind::Orc));
        assert_eq!(ObjectKind::from_name("orc"), None);
        assert_eq!(ObjectKind::Player.to_string(), "PLAYER");
    }
}
