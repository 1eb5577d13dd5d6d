// Melee hit resolution

use crate::audio::SoundSink;
use crate::character::{Orc, Player};
use crate::spatial::rects_overlap;
use log::debug;

/// Damage every orc the player's sword currently touches. Orcs still playing
/// their damage clip are skipped. Returns the number of hits.
pub fn resolve_sword_hits(player: &Player, orcs: &mut [Orc], sounds: &mut impl SoundSink) -> usize {
    let Some(sword) = player.sword_bounds() else {
        return 0;
    };

    let mut hits = 0;
    for orc in orcs.iter_mut() {
        if !orc.body.can_take_damage() || !rects_overlap(&sword, &orc.body.bounds()) {
            continue;
        }
        if orc.body.take_damage(player.sword.damage, sounds) {
            hits += 1;
        }
    }

    if hits > 0 {
        debug!("Sword hit {hits} orc(s)");
    }
    hits
}

/// Drop orcs whose health ran out. Returns how many were removed.
pub fn remove_dead(orcs: &mut Vec<Orc>) -> usize {
    let before = orcs.len();
    orcs.retain(|o| o.body.is_alive());
    before - orcs.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::test_support::{human_profile, orc_profile};
    use crate::config::CombatConfig;
    use approx::assert_relative_eq;
    use macroquad::prelude::*;

    fn swinging_player() -> Player {
        let mut p = Player::new(&human_profile(), Vec2::ZERO, &CombatConfig::default());
        let mut sink = Vec::new();
        p.body.attack(&mut sink);
        p.body.update_animation(0.25, &mut sink);
        assert!(p.sword_bounds().is_some());
        p
    }

    #[test]
    fn hits_orcs_in_reach_once() {
        let player = swinging_player();
        let profile = orc_profile();
        let cfg = CombatConfig::default();
        let mut orcs = vec![
            Orc::new(&profile, vec2(30.0, 10.0), &cfg),
            Orc::new(&profile, vec2(300.0, 10.0), &cfg),
        ];
        let mut sink = Vec::new();

        assert_eq!(resolve_sword_hits(&player, &mut orcs, &mut sink), 1);
        assert_relative_eq!(orcs[0].body.health(), 5.0);
        assert_relative_eq!(orcs[1].body.health(), 10.0);

        // still in its damage clip
        assert_eq!(resolve_sword_hits(&player, &mut orcs, &mut sink), 0);
        assert_relative_eq!(orcs[0].body.health(), 5.0);
    }

    #[test]
    fn no_hits_outside_the_window() {
        let player = Player::new(&human_profile(), Vec2::ZERO, &CombatConfig::default());
        let mut orcs = vec![Orc::new(&orc_profile(), Vec2::ZERO, &CombatConfig::default())];
        assert_eq!(resolve_sword_hits(&player, &mut orcs, &mut Vec::new()), 0);
    }

    #[test]
    fn dead_orcs_are_removed() {
        let profile = orc_profile();
        let cfg = CombatConfig::default();
        let mut orcs = vec![
            Orc::new(&profile, Vec2::ZERO, &cfg),
            Orc::new(&profile, Vec2::ZERO, &cfg),
        ];
        let mut sink = Vec::new();
        orcs[0].body.take_damage(10.0, &mut sink);

        assert_eq!(remove_dead(&mut orcs), 1);
        assert_eq!(orcs.len(), 1);
        assert!(orcs[0].body.is_alive());
    }
}
