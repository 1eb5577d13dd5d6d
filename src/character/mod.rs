// Characters
//
// A shared core drives movement, tile collision, animation state and attack
// timing. Player and Orc wrap it with their own intent logic.

pub mod orc;
pub mod player;
pub mod separation;
pub mod state;

pub use orc::Orc;
pub use player::{Player, PlayerInput, Sword};
pub use separation::separate;
pub use state::{CharacterState, Facing};

use crate::animation::SpriteSheet;
use crate::assets::{AssetCache, SoundHandle};
use crate::audio::SoundSink;
use crate::config::{CharacterConfig, CombatConfig, SheetConfig};
use crate::spatial::{rects_overlap, TileGrid};
use anyhow::Context;
use macroquad::prelude::*;

/// Optional one-shot sounds of a character kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterSounds {
    pub attack: Option<SoundHandle>,
    pub step: Option<SoundHandle>,
    pub damage: Option<SoundHandle>,
}

/// Template every character of one kind is spawned from.
#[derive(Debug, Clone)]
pub struct CharacterProfile {
    pub idle: SpriteSheet,
    pub walk: SpriteSheet,
    pub attack: SpriteSheet,
    pub damage: Option<SpriteSheet>,
    pub sounds: CharacterSounds,
    pub facing_blocks: u32,
    pub draw_scale: f32,
    pub speed: f32,
    pub health: f32,
    pub attack_cooldown: f32,
    pub movement_threshold: f32,
    pub body_size: f32,
}

impl CharacterProfile {
    /// Profile with the default tuning around the given sheets.
    pub fn new(idle: SpriteSheet, walk: SpriteSheet, attack: SpriteSheet) -> Self {
        let combat = CombatConfig::default();
        Self {
            idle,
            walk,
            attack,
            damage: None,
            sounds: CharacterSounds::default(),
            facing_blocks: 4,
            draw_scale: 5.0,
            speed: 200.0,
            health: 10.0,
            attack_cooldown: 0.0,
            movement_threshold: combat.movement_threshold,
            body_size: combat.body_size,
        }
    }

    pub fn with_damage(mut self, damage: SpriteSheet) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_sounds(mut self, sounds: CharacterSounds) -> Self {
        self.sounds = sounds;
        self
    }

    /// Load every sheet and sound a character config names.
    pub async fn load(
        assets: &mut AssetCache,
        cfg: &CharacterConfig,
        combat: &CombatConfig,
    ) -> anyhow::Result<Self> {
        let blocks = cfg.facing_blocks.max(1);
        let idle = load_sheet(assets, &cfg.idle, blocks).await?;
        let walk = load_sheet(assets, &cfg.walk, blocks).await?;
        let attack = load_sheet(assets, &cfg.attack, blocks).await?;
        let damage = match &cfg.damage {
            Some(sheet) => Some(load_sheet(assets, sheet, blocks).await?),
            None => None,
        };

        let sounds = CharacterSounds {
            attack: load_optional_sound(assets, cfg.attack_sound.as_deref()).await?,
            step: load_optional_sound(assets, cfg.step_sound.as_deref()).await?,
            damage: load_optional_sound(assets, cfg.damage_sound.as_deref()).await?,
        };

        Ok(Self {
            idle,
            walk,
            attack,
            damage,
            sounds,
            facing_blocks: blocks,
            draw_scale: cfg.draw_scale,
            speed: cfg.speed,
            health: cfg.health,
            attack_cooldown: cfg.attack_cooldown,
            movement_threshold: combat.movement_threshold,
            body_size: combat.body_size,
        })
    }
}

async fn load_sheet(
    assets: &mut AssetCache,
    cfg: &SheetConfig,
    blocks: u32,
) -> anyhow::Result<SpriteSheet> {
    let texture = assets
        .load_texture(&cfg.path)
        .await
        .with_context(|| format!("Loading sprite sheet {}", cfg.path))?;
    let region = Rect::new(0.0, 0.0, 1.0, 1.0 / blocks as f32);
    let sheet = SpriteSheet::new(
        texture,
        assets.texture_size(texture),
        cfg.rows,
        cfg.columns,
        region,
    )
    .with_speed(cfg.speed);

    Ok(if cfg.looping { sheet } else { sheet.once() })
}

async fn load_optional_sound(
    assets: &mut AssetCache,
    path: Option<&str>,
) -> anyhow::Result<Option<SoundHandle>> {
    match path {
        Some(p) => Ok(Some(assets.load_sound(p).await?)),
        None => Ok(None),
    }
}

/// Position, intent and animation state of one character.
#[derive(Debug, Clone)]
pub struct Character {
    pub position: Vec2,
    /// Unit-ish movement intent
    pub movement: Vec2,
    speed: f32,
    health: f32,
    facing: Facing,

    idle: SpriteSheet,
    walk: SpriteSheet,
    attack: SpriteSheet,
    damage: Option<SpriteSheet>,
    sounds: CharacterSounds,
    facing_blocks: u32,
    draw_scale: f32,

    movement_threshold: f32,
    body_size: f32,
    attack_cooldown: f32,
    cooldown: f32,

    moving: bool,
    attacking: bool,
    taking_damage: bool,
    had_foot_down: bool,
}

impl Character {
    pub fn spawn(profile: &CharacterProfile, position: Vec2) -> Self {
        Self {
            position,
            movement: Vec2::ZERO,
            speed: profile.speed,
            health: profile.health,
            facing: Facing::default(),
            idle: profile.idle.clone(),
            walk: profile.walk.clone(),
            attack: profile.attack.clone(),
            damage: profile.damage.clone(),
            sounds: profile.sounds,
            facing_blocks: profile.facing_blocks,
            draw_scale: profile.draw_scale,
            movement_threshold: profile.movement_threshold,
            body_size: profile.body_size,
            attack_cooldown: profile.attack_cooldown,
            cooldown: 0.0,
            moving: false,
            attacking: false,
            taking_damage: false,
            had_foot_down: false,
        }
    }

    pub fn state(&self) -> CharacterState {
        CharacterState::from_flags(self.taking_damage, self.attacking, self.moving)
    }

    /// Sheet of the current state.
    pub fn current_sheet(&self) -> &SpriteSheet {
        match self.state() {
            CharacterState::TakingDamage => self.damage.as_ref().unwrap_or(&self.idle),
            CharacterState::Attacking => &self.attack,
            CharacterState::Walking => &self.walk,
            CharacterState::Idle => &self.idle,
        }
    }

    pub fn attack_sheet(&self) -> &SpriteSheet {
        &self.attack
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    pub fn is_taking_damage(&self) -> bool {
        self.taking_damage
    }

    pub fn can_attack(&self) -> bool {
        !self.attacking && self.cooldown <= 0.0
    }

    /// Characters without a damage animation are never hurt.
    pub fn can_take_damage(&self) -> bool {
        self.damage.is_some() && !self.taking_damage
    }

    pub fn movement_threshold(&self) -> f32 {
        self.movement_threshold
    }

    /// Square collision box centred on the position.
    pub fn bounds(&self) -> Rect {
        let half = self.body_size * 0.5;
        Rect::new(
            self.position.x - half,
            self.position.y - half,
            self.body_size,
            self.body_size,
        )
    }

    pub fn integrate(&mut self, dt: f32) {
        self.position += self.movement * self.speed * dt;
    }

    /// Push the character out of wall tiles around it.
    ///
    /// Checks the own cell and the four orthogonal neighbours, in the order
    /// up, left, centre, right, down. Each overlapping wall snaps the character
    /// flush to one tile edge, along the dominant axis of the offset from the
    /// tile centre.
    pub fn resolve_tile_collisions(&mut self, grid: &TileGrid) {
        const NEIGHBOURS: [(i32, i32); 5] = [(0, -1), (-1, 0), (0, 0), (1, 0), (0, 1)];

        let home = grid.cell_at(self.position);
        let half = self.body_size * 0.5;
        for (dx, dy) in NEIGHBOURS {
            let cell = home.offset(dx, dy);
            if !grid.is_wall(cell) {
                continue;
            }
            let tile = grid.bounds_of(cell);
            if !rects_overlap(&self.bounds(), &tile) {
                continue;
            }

            let centre = tile.center();
            let delta = self.position - centre;
            if delta.x.abs() > delta.y.abs() {
                self.position.x = if self.position.x < centre.x {
                    tile.x - half
                } else {
                    tile.x + tile.w + half
                };
            } else {
                self.position.y = if self.position.y < centre.y {
                    tile.y - half
                } else {
                    tile.y + tile.h + half
                };
            }
        }
    }

    /// Advance animations, facing and timers by one frame.
    pub fn update_animation(&mut self, dt: f32, sounds: &mut impl SoundSink) {
        self.moving = self.movement.length() >= self.movement_threshold;

        let foot_down = self.moving && self.walk.index() % 2 == 1;
        if foot_down && !self.had_foot_down {
            if let Some(step) = self.sounds.step {
                sounds.play(step);
            }
        }

        self.facing.update(self.movement, self.movement_threshold);
        let block = self.facing.block();
        let blocks = self.facing_blocks;
        for sheet in self.sheets_mut() {
            sheet.set_facing_block(block, blocks);
            sheet.increment(dt);
        }

        self.attacking &= !self.attack.has_finished();
        self.taking_damage &= self.damage.as_ref().is_some_and(|d| !d.has_finished());

        if !self.attacking {
            self.attack.set_index(0.0);
        }
        if !self.taking_damage {
            if let Some(damage) = &mut self.damage {
                damage.set_index(0.0);
            }
        }
        if self.moving {
            self.idle.set_index(0.0);
        } else {
            self.walk.set_index(0.0);
        }

        self.cooldown = (self.cooldown - dt).max(0.0);
        self.had_foot_down = foot_down;
    }

    fn sheets_mut(&mut self) -> impl Iterator<Item = &mut SpriteSheet> + '_ {
        [&mut self.idle, &mut self.walk, &mut self.attack]
            .into_iter()
            .chain(self.damage.as_mut())
    }

    /// Start an attack. Returns whether it was accepted.
    pub fn attack(&mut self, sounds: &mut impl SoundSink) -> bool {
        if !self.can_attack() {
            return false;
        }
        self.attacking = true;
        self.attack.set_index(0.0);
        self.cooldown = self.attack_cooldown;
        if let Some(s) = self.sounds.attack {
            sounds.play(s);
        }
        true
    }

    /// Lose health and play the damage clip. Ignored while the previous hit
    /// is still playing.
    pub fn take_damage(&mut self, amount: f32, sounds: &mut impl SoundSink) -> bool {
        if !self.can_take_damage() {
            return false;
        }
        self.health -= amount;
        self.taking_damage = true;
        if let Some(s) = self.sounds.damage {
            sounds.play(s);
        }
        true
    }

    pub fn draw(&self, assets: &AssetCache) {
        self.current_sheet()
            .draw(assets, self.position, self.draw_scale);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::assets::TextureHandle;

    pub fn sheet(columns: u32, speed: f32, looping: bool) -> SpriteSheet {
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

    pub fn sounds() -> CharacterSounds {
        CharacterSounds {
            attack: Some(SoundHandle::from_raw(0)),
            step: Some(SoundHandle::from_raw(1)),
            damage: Some(SoundHandle::from_raw(2)),
        }
    }

    pub fn orc_profile() -> CharacterProfile {
        let mut p = CharacterProfile::new(
            sheet(16, 5.0, true),
            sheet(4, 5.0, true),
            sheet(4, 10.0, false),
        )
        .with_damage(sheet(4, 10.0, false))
        .with_sounds(sounds());
        p.attack_cooldown = 1.0;
        p
    }

    pub fn human_profile() -> CharacterProfile {
        let mut sounds = sounds();
        sounds.damage = None;
        CharacterProfile::new(
            sheet(16, 5.0, true),
            sheet(4, 5.0, true),
            sheet(4, 10.0, false),
        )
        .with_sounds(sounds)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::spatial::CellCoord;
    use approx::assert_relative_eq;

    #[test]
    fn idle_walk_follows_intent_every_frame() {
        let mut c = Character::spawn(&orc_profile(), Vec2::ZERO);
        let mut sink = Vec::new();

        c.movement = vec2(0.3, 0.0);
        c.update_animation(0.01, &mut sink);
        assert_eq!(c.state(), CharacterState::Walking);

        c.movement = vec2(0.2, 0.0);
        c.update_animation(0.01, &mut sink);
        assert_eq!(c.state(), CharacterState::Idle);

        c.movement = vec2(0.25, 0.0);
        c.update_animation(0.01, &mut sink);
        assert_eq!(c.state(), CharacterState::Walking);
    }

    #[test]
    fn attack_respects_cooldown() {
        let mut c = Character::spawn(&orc_profile(), Vec2::ZERO);
        let mut sink = Vec::new();

        assert!(c.attack(&mut sink));
        assert_eq!(sink, vec![SoundHandle::from_raw(0)]);
        assert!(!c.attack(&mut sink));

        // clip lasts 0.4s, cooldown 1s
        for _ in 0..5 {
            c.update_animation(0.1, &mut sink);
        }
        assert!(!c.is_attacking());
        assert!(!c.can_attack());

        for _ in 0..6 {
            c.update_animation(0.1, &mut sink);
        }
        assert!(c.can_attack());
    }

    #[test]
    fn damage_overrides_attack_and_debounces() {
        let mut c = Character::spawn(&orc_profile(), Vec2::ZERO);
        let mut sink = Vec::new();
        c.attack(&mut sink);

        assert!(c.take_damage(5.0, &mut sink));
        assert_eq!(c.state(), CharacterState::TakingDamage);
        assert!(!c.take_damage(5.0, &mut sink));
        assert_relative_eq!(c.health(), 5.0);

        for _ in 0..5 {
            c.update_animation(0.1, &mut sink);
        }
        assert!(c.can_take_damage());
        assert!(c.take_damage(5.0, &mut sink));
        assert!(!c.is_alive());
    }

    #[test]
    fn characters_without_damage_clip_are_not_hurt() {
        let mut c = Character::spawn(&human_profile(), Vec2::ZERO);
        let mut sink = Vec::new();
        assert!(!c.take_damage(5.0, &mut sink));
        assert_relative_eq!(c.health(), 10.0);
        assert!(sink.is_empty());
    }

    #[test]
    fn step_sound_on_rising_edge_only() {
        let mut c = Character::spawn(&orc_profile(), Vec2::ZERO);
        let mut sink = Vec::new();
        c.movement = vec2(1.0, 0.0);

        // walk clip at 5 fps: frame 1 spans 0.2..0.4s
        for _ in 0..6 {
            c.update_animation(0.05, &mut sink);
        }
        let steps = sink
            .iter()
            .filter(|&&s| s == SoundHandle::from_raw(1))
            .count();
        assert_eq!(steps, 1);
    }

    #[test]
    fn facing_selects_sheet_block() {
        let mut c = Character::spawn(&orc_profile(), Vec2::ZERO);
        let mut sink = Vec::new();
        c.movement = vec2(-1.0, -1.0);
        c.update_animation(0.01, &mut sink);
        assert_eq!(c.facing().block(), 3);
        assert_relative_eq!(c.current_sheet().region.y, 0.75);
    }

    #[test]
    fn snaps_out_of_wall_on_dominant_axis() {
        let mut grid = TileGrid::blank(3, 3, vec2(80.0, 80.0)).with_wall_types([1]);
        grid.set_type(CellCoord::new(2, 1), 1).unwrap();

        let mut c = Character::spawn(&orc_profile(), vec2(150.0, 120.0));
        c.resolve_tile_collisions(&grid);
        assert_relative_eq!(c.position.x, 145.0);
        assert_relative_eq!(c.position.y, 120.0);

        // already flush: shared edge is not an overlap
        c.resolve_tile_collisions(&grid);
        assert_relative_eq!(c.position.x, 145.0);
    }

    #[test]
    fn collisions_ignore_cells_off_the_grid() {
        let grid = TileGrid::blank(2, 2, vec2(80.0, 80.0)).with_wall_types([0]);
        let mut c = Character::spawn(&orc_profile(), vec2(-500.0, -500.0));
        c.resolve_tile_collisions(&grid);
        assert_eq!(c.position, vec2(-500.0, -500.0));
    }
}
