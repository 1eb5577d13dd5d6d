use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::{error, info};
use macroquad::prelude::*;
use std::path::Path;
use tile_brawl::render::AtlasLayout;
use tile_brawl::{AssetCache, CellCoord, TileSet, TileSetDef};

const PAN_SPEED: f32 = 500.0;

/// Paint tile layouts from an atlas palette
#[derive(Parser, Debug)]
#[command(name = "map_editor")]
struct Args {
    /// Tile set atlas image
    tileset: String,
    /// Tile columns in the atlas
    atlas_columns: u32,
    /// Tile rows in the atlas
    atlas_rows: u32,
    /// World units per atlas pixel
    scale: f32,
    /// Layout CSV to edit; created on save
    layout: String,

    /// Columns of a new map when the layout doesn't exist yet
    #[arg(long)]
    columns: Option<usize>,
    /// Rows of a new map when the layout doesn't exist yet
    #[arg(long)]
    rows: Option<usize>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Map Editor".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

fn pan_input() -> Vec2 {
    let axis = |neg, pos| is_key_down(pos) as i32 as f32 - is_key_down(neg) as i32 as f32;
    vec2(axis(KeyCode::Left, KeyCode::Right), axis(KeyCode::Up, KeyCode::Down))
}

/// Cell under a point, if the point is on the grid.
fn cell_under(tileset: &TileSet, p: Vec2) -> Option<CellCoord> {
    let grid = tileset.grid();
    grid.world_bounds()
        .contains(p)
        .then(|| grid.cell_at(p))
        .filter(|&c| grid.in_bounds(c))
}

async fn load_map(args: &Args, assets: &mut AssetCache, def: &TileSetDef) -> anyhow::Result<TileSet> {
    if Path::new(&args.layout).exists() {
        return TileSet::load(assets, def, &[]).await;
    }

    let (Some(columns), Some(rows)) = (args.columns, args.rows) else {
        Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                format!("{} does not exist; pass --columns and --rows for a new map", args.layout),
            )
            .exit();
    };
    TileSet::load_blank(assets, def, columns, rows).await
}

async fn run(args: Args) -> anyhow::Result<()> {
    let def = TileSetDef {
        image: args.tileset.clone(),
        atlas_columns: args.atlas_columns,
        atlas_rows: args.atlas_rows,
        scale: args.scale,
        layout: args.layout.clone(),
    };

    let mut assets = AssetCache::new();
    let mut map = load_map(&args, &mut assets, &def).await?;

    let atlas = assets
        .load_texture(&def.image)
        .await
        .with_context(|| format!("Loading palette {}", def.image))?;
    let layout = AtlasLayout {
        columns: def.atlas_columns,
        rows: def.atlas_rows,
    };
    let mut palette = TileSet::palette(atlas, assets.texture_size(atlas), layout, def.scale * 0.5);

    let mut target = vec2(screen_width(), screen_height()) * 0.5;
    let mut brush = CellCoord::new(0, 0);

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
        let mouse: Vec2 = mouse_position().into();
        let palette_cell = cell_under(&palette, mouse);
        let map_cell = match palette_cell {
            Some(_) => None,
            None => cell_under(&map, camera.screen_to_world(mouse)),
        };

        if is_mouse_button_pressed(MouseButton::Left) {
            if let Some(cell) = palette_cell {
                brush = cell;
            }
        }
        if is_mouse_button_down(MouseButton::Left) {
            if let (Some(cell), Some(t)) = (map_cell, palette.grid().type_of(brush)) {
                map.set_type(cell, t)?;
            }
        }
        if is_key_pressed(KeyCode::S) {
            match map.save_layout(&def.layout) {
                Ok(()) => info!("Saved {}", def.layout),
                Err(e) => error!("{e}"),
            }
        }

        clear_background(BLACK);

        set_camera(&camera);
        let half = vec2(screen_width(), screen_height()) * 0.5;
        map.draw_visible_rect(&assets, target - half, target + half);
        if let Some(cell) = map_cell {
            map.highlight_cell(cell, Color::from_rgba(255, 0, 0, 50));
        }

        set_default_camera();
        palette.draw_visible_rect(&assets, Vec2::ZERO, half * 2.0);
        if let Some(cell) = palette_cell {
            palette.highlight_cell(cell, Color::from_rgba(0, 255, 0, 50));
        }
        palette.highlight_cell(brush, Color::from_rgba(0, 0, 255, 50));

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
