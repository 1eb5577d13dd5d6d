use super::{Character, CharacterProfile};
use crate::config::CombatConfig;
use macroquad::prelude::*;

/// Enemy that chases a target and attacks when close.
#[derive(Debug, Clone)]
pub struct Orc {
    pub body: Character,
    stop_distance: f32,
    decay: f32,
}

impl Orc {
    pub fn new(profile: &CharacterProfile, position: Vec2, combat: &CombatConfig) -> Self {
        Self {
            body: Character::spawn(profile, position),
            stop_distance: combat.chase_stop_distance,
            decay: combat.chase_decay,
        }
    }

    /// Point the intent at `target`.
    ///
    /// Farther than the stop distance the intent becomes the unit direction
    /// and this returns `false`. Otherwise the current intent decays and this
    /// returns `true`, meaning the target is in reach.
    pub fn run_towards(&mut self, target: Vec2) -> bool {
        let diff = target - self.body.position;
        let dist = diff.length();

        if dist > self.stop_distance {
            self.body.movement = diff / dist;
            false
        } else {
            self.body.movement *= self.decay;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::test_support::orc_profile;
    use approx::assert_relative_eq;

    fn orc_at(p: Vec2) -> Orc {
        Orc::new(&orc_profile(), p, &CombatConfig::default())
    }

    #[test]
    fn far_target_gives_unit_intent() {
        let mut orc = orc_at(Vec2::ZERO);
        assert!(!orc.run_towards(vec2(300.0, 400.0)));
        assert_relative_eq!(orc.body.movement.length(), 1.0);
        assert_relative_eq!(orc.body.movement.x, 0.6);
        assert_relative_eq!(orc.body.movement.y, 0.8);
    }

    #[test]
    fn near_target_decays_intent() {
        let mut orc = orc_at(Vec2::ZERO);
        orc.body.movement = vec2(1.0, 0.0);
        assert!(orc.run_towards(vec2(100.0, 0.0)));
        assert_relative_eq!(orc.body.movement.x, 0.9);
        assert!(orc.run_towards(vec2(50.0, 0.0)));
        assert_relative_eq!(orc.body.movement.x, 0.81, epsilon = 1e-6);
    }

    #[test]
    fn target_on_top_reports_reached() {
        let mut orc = orc_at(vec2(10.0, 10.0));
        assert!(orc.run_towards(vec2(10.0, 10.0)));
        assert_eq!(orc.body.movement, Vec2::ZERO);
    }
}
