// Character animation state and facing

use macroquad::prelude::*;

/// Which animation a character is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharacterState {
    /// Intent below the movement threshold
    #[default]
    Idle,
    Walking,
    /// Playing the one-shot attack clip
    Attacking,
    /// Playing the one-shot damage clip; overrides everything else
    TakingDamage,
}

impl CharacterState {
    /// Pick the state from the character's flags, highest priority first.
    pub fn from_flags(taking_damage: bool, attacking: bool, moving: bool) -> Self {
        if taking_damage {
            Self::TakingDamage
        } else if attacking {
            Self::Attacking
        } else if moving {
            Self::Walking
        } else {
            Self::Idle
        }
    }

    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walking => "walk",
            Self::Attacking => "attack",
            Self::TakingDamage => "damage",
        }
    }
}

/// Hysteretic facing direction.
///
/// A flag only turns off once intent passes `-threshold` on its axis and only
/// turns back on once intent exceeds `threshold`, so intent hovering around
/// zero never makes the sprite flicker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facing {
    pub right: bool,
    pub forward: bool,
}

impl Default for Facing {
    fn default() -> Self {
        Self {
            right: true,
            forward: true,
        }
    }
}

impl Facing {
    pub fn update(&mut self, intent: Vec2, threshold: f32) {
        self.right = (self.right || intent.x > threshold) && intent.x >= -threshold;
        self.forward = (self.forward || intent.y > threshold) && intent.y >= -threshold;
    }

    /// `(±1, ±1)`; positive is right and down the screen.
    pub fn signs(&self) -> Vec2 {
        vec2(
            if self.right { 1.0 } else { -1.0 },
            if self.forward { 1.0 } else { -1.0 },
        )
    }

    /// Row block of the sprite sheets, 0..4.
    pub fn block(&self) -> u32 {
        ((!self.forward as u32) << 1) | (!self.right as u32)
    }
}
