// src/loader/level.rs
use crate::error::GameError;
use crate::ir_level::*;
use crate::loader::csv::{CsvOptions, CsvTable};
use log::{info, warn};
use macroquad::prelude::*;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const HEADER_ROW: usize = 0;

fn tileset_from_header(table: &CsvTable) -> Result<TileSetDef, GameError> {
    if table.row_count() == 0 {
        return Err(GameError::InvalidLevel(
            "level file has no tile set row".into(),
        ));
    }

    Ok(TileSetDef {
        image: table.cell(HEADER_ROW, 0)?.trim().to_owned(),
        atlas_columns: table.parse_cell(HEADER_ROW, 1)?,
        atlas_rows: table.parse_cell(HEADER_ROW, 2)?,
        scale: table.parse_cell(HEADER_ROW, 3)?,
        layout: table.cell(HEADER_ROW, 4)?.trim().to_owned(),
    })
}

/// Decode a headerless level table.
///
/// Row 0 describes the tile set, every later row places one object. Unknown
/// object names are logged and skipped; malformed numbers are errors.
pub fn decode_level(table: &CsvTable) -> Result<LevelDef, GameError> {
    let tileset = tileset_from_header(table)?;
    if tileset.atlas_columns == 0 || tileset.atlas_rows == 0 {
        return Err(GameError::InvalidLevel(format!(
            "atlas must have at least one column and row, got {}x{}",
            tileset.atlas_columns, tileset.atlas_rows
        )));
    }

    let mut placements = Vec::new();
    for row in 1..table.row_count() {
        let Some(fields) = table.row(row) else {
            continue;
        };
        if fields.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let name = fields[0].trim();
        let Some(kind) = ObjectKind::from_name(name) else {
            warn!("Didn't recognise object name {name:?} on level row {row}, skipping");
            continue;
        };

        placements.push(Placement {
            kind,
            position: vec2(table.parse_cell(row, 1)?, table.parse_cell(row, 2)?),
        });
    }

    Ok(LevelDef {
        tileset,
        placements,
    })
}

/// Read a level file. Relative asset paths are resolved against its directory.
pub fn decode_level_file(path: impl AsRef<Path>) -> Result<LevelDef, GameError> {
    let path = path.as_ref();
    let table = CsvTable::from_file(path, CsvOptions::headerless())?;
    let mut level = decode_level(&table)?;
    level.tileset = resolve_tileset(path, &level.tileset);

    info!(
        "Loaded level {} ({} placements)",
        path.display(),
        level.placements.len()
    );
    Ok(level)
}

/// Tile set paths of a level as seen from the working directory.
pub fn resolve_tileset(level_path: &Path, tileset: &TileSetDef) -> TileSetDef {
    let level_dir = level_path
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));
    TileSetDef {
        image: resolve(&level_dir, &tileset.image),
        layout: resolve(&level_dir, &tileset.layout),
        ..tileset.clone()
    }
}

fn resolve(base: &Path, rel: &str) -> String {
    let p = Path::new(rel);
    if p.is_absolute() {
        rel.to_owned()
    } else {
        base.join(p).to_string_lossy().into_owned()
    }
}

/// Encode a level in the same headerless format [`decode_level`] reads.
pub fn encode_level(level: &LevelDef) -> String {
    let ts = &level.tileset;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{},{},{},{},{}",
        ts.image, ts.atlas_columns, ts.atlas_rows, ts.scale, ts.layout
    );
    for p in &level.placements {
        let _ = writeln!(out, "{},{},{}", p.kind, p.position.x, p.position.y);
    }
    out
}

/// Write a level file, replacing any existing one.
pub fn save_level_file(path: impl AsRef<Path>, level: &LevelDef) -> Result<(), GameError> {
    let path = path.as_ref();
    std::fs::write(path, encode_level(level)).map_err(|e| GameError::io(path, e))?;
    info!("Saved level {}", path.display());
    Ok(())
}
