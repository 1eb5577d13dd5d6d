use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use macroquad::prelude::*;
use std::path::PathBuf;
use tile_brawl::audio::play_music;
use tile_brawl::character::{CharacterProfile, Player, PlayerInput};
use tile_brawl::loader::level::decode_level_file;
use tile_brawl::{AssetCache, GameConfig, SoundPool, TileSet, World};

/// Fight orcs on a CSV tile map
#[derive(Parser, Debug)]
#[command(name = "tile_brawl")]
struct Args {
    /// Level file (tile set row followed by PLAYER/ORC placements)
    level: PathBuf,

    /// JSON config; missing fields and a missing file use defaults
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Tile Brawl".into(),
        window_width: 1600,
        window_height: 800,
        ..Default::default()
    }
}

fn follow_camera(target: Vec2) -> Camera2D {
    Camera2D {
        target,
        zoom: vec2(2.0 / screen_width(), 2.0 / screen_height()),
        ..Default::default()
    }
}

async fn load_world(args: &Args, cfg: &GameConfig, assets: &mut AssetCache) -> anyhow::Result<World> {
    let level = decode_level_file(&args.level)
        .with_context(|| format!("Loading level {}", args.level.display()))?;
    let tileset = TileSet::load(assets, &level.tileset, &cfg.wall_tiles).await?;

    let human = CharacterProfile::load(assets, &cfg.human, &cfg.combat)
        .await
        .context("Loading player sprites")?;
    let orc = CharacterProfile::load(assets, &cfg.orc, &cfg.combat)
        .await
        .context("Loading orc sprites")?;

    let spawn = level.player_spawn().unwrap_or_else(|| {
        let centre = tileset.grid().world_bounds().center();
        warn!("Level has no PLAYER placement, starting at {centre}");
        centre
    });
    let player = Player::new(&human, spawn, &cfg.combat);

    Ok(World::new(
        tileset,
        player,
        orc,
        level.orc_spawns().collect(),
        cfg.combat.clone(),
        &cfg.spawner,
    ))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let cfg = GameConfig::load(&args.config)?;
    let mut assets = AssetCache::new();
    let mut world = load_world(&args, &cfg, &mut assets).await?;

    if let Some(path) = &cfg.music {
        let music = assets
            .load_sound(path)
            .await
            .with_context(|| format!("Loading music {path}"))?;
        play_music(&assets, music, cfg.music_volume);
    }
    assets.log_stats();

    let mut sounds = SoundPool::new(cfg.sound_pool_capacity);
    info!("Starting game loop");

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        let dt = get_frame_time();

        world.update(&PlayerInput::poll(), dt, &mut sounds);
        sounds.prune(dt);
        sounds.flush(&assets);

        clear_background(BLACK);

        let target = world.player.body.position;
        set_camera(&follow_camera(target));
        let half = vec2(screen_width(), screen_height()) * 0.5;
        world.draw(&assets, target - half, target + half);

        set_default_camera();
        draw_text(
            &format!("FPS: {}  Orcs: {}", get_fps(), world.orcs.len()),
            20.0,
            30.0,
            30.0,
            WHITE,
        );

        next_frame().await;
    }

    info!("Bye");
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}
