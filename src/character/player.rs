use super::{Character, CharacterProfile};
use crate::config::CombatConfig;
use macroquad::prelude::*;

/// Keyboard state read once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Attack key went down this frame
    pub attack: bool,
}

impl PlayerInput {
    /// Arrow keys move, `Z` attacks.
    pub fn poll() -> Self {
        Self {
            left: is_key_down(KeyCode::Left),
            right: is_key_down(KeyCode::Right),
            up: is_key_down(KeyCode::Up),
            down: is_key_down(KeyCode::Down),
            attack: is_key_pressed(KeyCode::Z),
        }
    }

    /// `(right - left, down - up)`
    pub fn axis(&self) -> Vec2 {
        vec2(
            self.right as i32 as f32 - self.left as i32 as f32,
            self.down as i32 as f32 - self.up as i32 as f32,
        )
    }
}

/// Hit box of the player's swing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sword {
    pub size: Vec2,
    /// Scaled per axis by the facing signs
    pub offset: Vec2,
    /// Added to the vertical offset regardless of facing
    pub drop: f32,
    /// Attack frames `[start, end)` during which the box exists
    pub frames: (u32, u32),
    pub damage: f32,
}

impl Default for Sword {
    fn default() -> Self {
        Self::from_config(&CombatConfig::default())
    }
}

impl Sword {
    pub fn from_config(cfg: &CombatConfig) -> Self {
        Self {
            size: Vec2::from(cfg.sword_size),
            offset: Vec2::from(cfg.sword_offset),
            drop: cfg.sword_drop,
            frames: (cfg.sword_frames[0], cfg.sword_frames[1]),
            damage: cfg.sword_damage,
        }
    }
}

/// The keyboard-driven character.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Character,
    pub sword: Sword,
    acceleration: f32,
    friction: f32,
}

impl Player {
    pub fn new(profile: &CharacterProfile, position: Vec2, combat: &CombatConfig) -> Self {
        Self {
            body: Character::spawn(profile, position),
            sword: Sword::from_config(combat),
            acceleration: combat.player_acceleration,
            friction: combat.player_friction,
        }
    }

    /// Accelerate intent from the held keys, move, then apply friction on
    /// axes with no key held.
    pub fn update_movement(&mut self, input: &PlayerInput, dt: f32) {
        let body = &mut self.body;
        body.movement += input.axis() * dt * self.acceleration;

        let len = body.movement.length();
        if len > 1.0 {
            body.movement /= len;
        }

        body.integrate(dt);

        let friction = 1.0 / (self.friction * dt + 1.0);
        if !(input.left || input.right) {
            body.movement.x *= friction;
        }
        if !(input.up || input.down) {
            body.movement.y *= friction;
        }
    }

    /// Sword hit box, only while the attack clip is inside the hit window.
    pub fn sword_bounds(&self) -> Option<Rect> {
        if !self.body.is_attacking() {
            return None;
        }
        let frame = self.body.attack_sheet().index();
        let (start, end) = self.sword.frames;
        if frame < start || frame >= end {
            return None;
        }

        let signs = self.body.facing().signs();
        let offset = vec2(
            signs.x * self.sword.offset.x,
            signs.y * self.sword.offset.y + self.sword.drop,
        );
        let top_left = self.body.position + offset - self.sword.size * 0.5;
        Some(Rect::new(
            top_left.x,
            top_left.y,
            self.sword.size.x,
            self.sword.size.y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::test_support::human_profile;
    use approx::assert_relative_eq;

    fn player() -> Player {
        Player::new(&human_profile(), Vec2::ZERO, &CombatConfig::default())
    }

    #[test]
    fn held_key_accelerates_and_clamps_intent() {
        let mut p = player();
        let input = PlayerInput {
            right: true,
            ..Default::default()
        };
        p.update_movement(&input, 0.1);
        assert_relative_eq!(p.body.movement.x, 0.5);
        assert_relative_eq!(p.body.position.x, 0.5 * 200.0 * 0.1);

        for _ in 0..10 {
            p.update_movement(&input, 0.1);
        }
        assert_relative_eq!(p.body.movement.x, 1.0);
    }

    #[test]
    fn diagonal_intent_is_normalised() {
        let mut p = player();
        let input = PlayerInput {
            right: true,
            down: true,
            ..Default::default()
        };
        for _ in 0..10 {
            p.update_movement(&input, 0.1);
        }
        assert_relative_eq!(p.body.movement.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn released_axis_decays() {
        let mut p = player();
        p.body.movement = vec2(1.0, 1.0);
        let input = PlayerInput {
            up: true,
            ..Default::default()
        };
        p.update_movement(&input, 0.1);
        // x: no key, friction 1 / (1 + 10 * 0.1)
        let m = p.body.movement;
        assert!(m.x < 0.5);
        assert!(m.y > 0.0);
    }

    #[test]
    fn opposite_keys_cancel_without_friction() {
        let mut p = player();
        p.body.movement = vec2(0.5, 0.0);
        let input = PlayerInput {
            left: true,
            right: true,
            ..Default::default()
        };
        p.update_movement(&input, 0.1);
        assert_relative_eq!(p.body.movement.x, 0.5);
    }

    #[test]
    fn sword_exists_only_on_hit_frame() {
        let mut p = player();
        let mut sink = Vec::new();
        assert!(p.sword_bounds().is_none());

        p.body.attack(&mut sink);
        assert!(p.sword_bounds().is_none());

        // attack clip runs at 10 fps
        p.body.update_animation(0.15, &mut sink);
        assert!(p.sword_bounds().is_none());
        p.body.update_animation(0.1, &mut sink);
        let sword = p.sword_bounds().unwrap();
        // facing right and forward: centre at (18, 10)
        assert_relative_eq!(sword.x, 18.0 - 25.0);
        assert_relative_eq!(sword.y, 10.0 - 20.0);
        assert_relative_eq!(sword.w, 50.0);

        p.body.update_animation(0.1, &mut sink);
        assert!(p.sword_bounds().is_none());
    }

    #[test]
    fn input_axis() {
        let input = PlayerInput {
            left: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(input.axis(), vec2(-1.0, 1.0));
    }
}
