use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::{error, info};
use macroquad::prelude::*;
use std::path::{Path, PathBuf};
use tile_brawl::loader::level::{decode_level, resolve_tileset, save_level_file};
use tile_brawl::{
    AssetCache, Character, CharacterProfile, CsvOptions, CsvTable, GameConfig, LevelDef,
    ObjectKind, TileSet, TileSetDef,
};

const PAN_SPEED: f32 = 500.0;

/// Place the player and orcs on a tile map
#[derive(Parser, Debug)]
#[command(name = "level_editor")]
struct Args {
    /// Level file to edit; created on save
    level: PathBuf,

    /// JSON config naming the character sprites
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Tile set atlas image for a new level
    #[arg(long)]
    tileset: Option<String>,
    /// Tile columns in the atlas for a new level
    #[arg(long)]
    atlas_columns: Option<u32>,
    /// Tile rows in the atlas for a new level
    #[arg(long)]
    atlas_rows: Option<u32>,
    /// Map scale for a new level
    #[arg(long)]
    scale: Option<f32>,
    /// Layout CSV for a new level
    #[arg(long)]
    layout: Option<String>,
}

impl Args {
    fn new_level(&self) -> Option<LevelDef> {
        Some(LevelDef {
            tileset: TileSetDef {
                image: self.tileset.clone()?,
                atlas_columns: self.atlas_columns?,
                atlas_rows: self.atlas_rows?,
                scale: self.scale?,
                layout: self.layout.clone()?,
            },
            placements: Vec::new(),
        })
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Level Editor".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

/// None -> Player -> Orc -> None
fn next_brush(brush: Option<ObjectKind>) -> Option<ObjectKind> {
    match brush {
        None => Some(ObjectKind::Player),
        Some(ObjectKind::Player) => Some(ObjectKind::Orc),
        Some(ObjectKind::Orc) => None,
    }
}

fn pan_input() -> Vec2 {
    let axis = |neg, pos| is_key_down(pos) as i32 as f32 - is_key_down(neg) as i32 as f32;
    vec2(axis(KeyCode::Left, KeyCode::Right), axis(KeyCode::Up, KeyCode::Down))
}

/// The level as written in the file, paths unresolved.
fn open_level(args: &Args) -> anyhow::Result<LevelDef> {
    if args.level.exists() {
        let table = CsvTable::from_file(&args.level, CsvOptions::headerless())?;
        let level = decode_level(&table)
            .with_context(|| format!("Decoding level {}", args.level.display()))?;
        info!(
            "Editing {} ({} placements)",
            args.level.display(),
            level.placements.len()
        );
        return Ok(level);
    }

    match args.new_level() {
        Some(level) => {
            info!("New level {}", args.level.display());
            Ok(level)
        }
        None => Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                format!(
                    "{} does not exist; pass --tileset, --atlas-columns, --atlas-rows, --scale and --layout",
                    args.level.display()
                ),
            )
            .exit(),
    }
}

struct Profiles {
    human: CharacterProfile,
    orc: CharacterProfile,
}

impl Profiles {
    fn of(&self, kind: ObjectKind) -> &CharacterProfile {
        match kind {
            ObjectKind::Player => &self.human,
            ObjectKind::Orc => &self.orc,
        }
    }
}

fn draw_object(assets: &AssetCache, profiles: &Profiles, kind: ObjectKind, position: Vec2) {
    Character::spawn(profiles.of(kind), position).draw(assets);
}

async fn run(args: Args) -> anyhow::Result<()> {
    let cfg = GameConfig::load(&args.config)?;
    let mut level = open_level(&args)?;

    let mut assets = AssetCache::new();
    let tileset_def = resolve_tileset(Path::new(&args.level), &level.tileset);
    let mut map = TileSet::load(&mut assets, &tileset_def, &cfg.wall_tiles).await?;
    let profiles = Profiles {
        human: CharacterProfile::load(&mut assets, &cfg.human, &cfg.combat).await?,
        orc: CharacterProfile::load(&mut assets, &cfg.orc, &cfg.combat).await?,
    };

    let mut target = vec2(screen_width(), screen_height()) * 0.5;
    let mut brush: Option<ObjectKind> = None;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        let dt = get_frame_time();
        target += pan_input() * PAN_SPEED * dt;

        let camera = Camera2D {
            target,
            zoom: vec2(2.0 / screen_width(), 2.0 / screen_height()),
            ..Default::default()
        };
        let mouse = camera.screen_to_world(mouse_position().into());

        if is_key_pressed(KeyCode::Space) {
            brush = next_brush(brush);
            info!("Brush: {}", brush.map_or("none", ObjectKind::name));
        }
        if is_mouse_button_pressed(MouseButton::Left) {
            if let Some(kind) = brush {
                level.place(kind, mouse);
            }
        }
        if is_key_pressed(KeyCode::S) {
            if let Err(e) = save_level_file(&args.level, &level) {
                error!("{e}");
            }
        }

        clear_background(BLACK);
        set_camera(&camera);
        let half = vec2(screen_width(), screen_height()) * 0.5;
        map.draw_visible_rect(&assets, target - half, target + half);

        for p in &level.placements {
            draw_object(&assets, &profiles, p.kind, p.position);
        }
        if let Some(kind) = brush {
            draw_object(&assets, &profiles, kind, mouse);
        }

        set_default_camera();
        draw_text(
            &format!("Brush: {}  [Space] cycle  [S] save", brush.map_or("none", ObjectKind::name)),
            20.0,
            30.0,
            30.0,
            WHITE,
        );

        next_frame().await;
    }

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
