// Level state and the per-frame update

use crate::assets::AssetCache;
use crate::audio::SoundSink;
use crate::character::{separate, CharacterProfile, Orc, Player, PlayerInput};
use crate::combat::{remove_dead, resolve_sword_hits};
use crate::config::{CombatConfig, SpawnerConfig};
use crate::tileset::TileSet;
use log::{debug, info};
use macroquad::prelude::*;

/// Spawns orcs at fixed points, round-robin, on a timer.
#[derive(Debug, Clone)]
pub struct Spawner {
    points: Vec<Vec2>,
    next: usize,
    interval: f32,
    max_alive: usize,
    timer: f32,
}

impl Spawner {
    pub fn new(points: Vec<Vec2>, cfg: &SpawnerConfig) -> Self {
        Self {
            points,
            next: 0,
            interval: cfg.interval,
            max_alive: cfg.max_alive,
            timer: 0.0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.interval > 0.0 && !self.points.is_empty()
    }

    /// Advance the timer; returns where to spawn, if anything is due.
    pub fn tick(&mut self, dt: f32, alive: usize) -> Option<Vec2> {
        if !self.is_enabled() {
            return None;
        }
        self.timer += dt;
        if self.timer < self.interval {
            return None;
        }
        self.timer -= self.interval;
        if alive >= self.max_alive {
            return None;
        }

        let p = self.points[self.next];
        self.next = (self.next + 1) % self.points.len();
        Some(p)
    }
}

/// Everything alive in a level.
pub struct World {
    pub tileset: TileSet,
    pub player: Player,
    pub orcs: Vec<Orc>,
    pub spawner: Spawner,
    orc_profile: CharacterProfile,
    combat: CombatConfig,
}

impl World {
    /// Place the player and one orc per spawn point.
    pub fn new(
        tileset: TileSet,
        player: Player,
        orc_profile: CharacterProfile,
        orc_spawns: Vec<Vec2>,
        combat: CombatConfig,
        spawner: &SpawnerConfig,
    ) -> Self {
        let orcs = orc_spawns
            .iter()
            .map(|&p| Orc::new(&orc_profile, p, &combat))
            .collect::<Vec<_>>();
        info!("World starts with {} orc(s)", orcs.len());

        Self {
            tileset,
            player,
            orcs,
            spawner: Spawner::new(orc_spawns, spawner),
            orc_profile,
            combat,
        }
    }

    /// One frame: intent, movement, tile collision, animation, separation,
    /// combat, then despawn and spawn.
    pub fn update(&mut self, input: &PlayerInput, dt: f32, sounds: &mut impl SoundSink) {
        self.player.update_movement(input, dt);
        if input.attack {
            self.player.body.attack(sounds);
        }
        let target = self.player.body.position;
        for orc in &mut self.orcs {
            if orc.run_towards(target) {
                orc.body.attack(sounds);
            }
            orc.body.integrate(dt);
        }

        let grid = self.tileset.grid();
        self.player.body.resolve_tile_collisions(grid);
        for orc in &mut self.orcs {
            orc.body.resolve_tile_collisions(grid);
        }

        self.player.body.update_animation(dt, sounds);
        for orc in &mut self.orcs {
            orc.body.update_animation(dt, sounds);
        }

        separate(&mut self.orcs, dt, self.combat.separation_strength);

        resolve_sword_hits(&self.player, &mut self.orcs, sounds);
        let dead = remove_dead(&mut self.orcs);
        if dead > 0 {
            debug!("{dead} orc(s) died, {} left", self.orcs.len());
        }

        if let Some(p) = self.spawner.tick(dt, self.orcs.len()) {
            debug!("Spawning orc at {p}");
            self.orcs.push(Orc::new(&self.orc_profile, p, &self.combat));
        }
    }

    /// Tiles in view, then orcs, then the player on top.
    pub fn draw(&mut self, assets: &AssetCache, view_min: Vec2, view_max: Vec2) {
        self.tileset.draw_visible_rect(assets, view_min, view_max);
        for orc in &self.orcs {
            orc.body.draw(assets);
        }
        self.player.body.draw(assets);
    }
}
