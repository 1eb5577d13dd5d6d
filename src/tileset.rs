use crate::assets::{AssetCache, TextureHandle};
use crate::error::GameError;
use crate::ir_level::TileSetDef;
use crate::loader::csv::{CsvOptions, CsvTable};
use crate::render::*;
use crate::spatial::{CellCoord, TileGrid, TileType};
use anyhow::Context;
use log::{debug, info};
use macroquad::models::draw_mesh;
use macroquad::prelude::*;
use std::path::Path;

/// A tile grid bound to the atlas it is drawn from.
///
/// Meshes are rebuilt lazily: any edit marks them dirty and the next draw
/// regenerates them.
pub struct TileSet {
    grid: TileGrid,
    atlas: TextureHandle,
    layout: AtlasLayout,
    chunks: Vec<MeshChunk>,
    dirty: bool,
}

/// World size of one cell for an atlas drawn at `scale`.
pub fn cell_size_for(atlas_size: Vec2, layout: AtlasLayout, scale: f32) -> Vec2 {
    vec2(
        atlas_size.x / layout.columns.max(1) as f32,
        atlas_size.y / layout.rows.max(1) as f32,
    ) * scale
}

impl TileSet {
    pub fn from_grid(grid: TileGrid, atlas: TextureHandle, layout: AtlasLayout) -> Self {
        Self {
            grid,
            atlas,
            layout,
            chunks: Vec::new(),
            dirty: true,
        }
    }

    /// Load the atlas and the layout CSV a level points at.
    pub async fn load(
        assets: &mut AssetCache,
        def: &TileSetDef,
        wall_types: &[TileType],
    ) -> anyhow::Result<Self> {
        let (atlas, layout, cell_size) = Self::load_atlas(assets, def).await?;

        let table = CsvTable::from_file(&def.layout, CsvOptions::headerless())
            .with_context(|| format!("Reading layout {}", def.layout))?;
        let grid = TileGrid::from_table(&table, cell_size)
            .with_context(|| format!("Decoding layout {}", def.layout))?
            .with_wall_types(wall_types.iter().copied());

        info!(
            "Loaded tile set {} ({}x{} cells)",
            def.layout,
            grid.columns(),
            grid.rows()
        );
        Ok(Self::from_grid(grid, atlas, layout))
    }

    /// Load the atlas and start from a zero-filled grid.
    pub async fn load_blank(
        assets: &mut AssetCache,
        def: &TileSetDef,
        columns: usize,
        rows: usize,
    ) -> anyhow::Result<Self> {
        let (atlas, layout, cell_size) = Self::load_atlas(assets, def).await?;
        info!("New {columns}x{rows} map for {}", def.layout);
        Ok(Self::from_grid(
            TileGrid::blank(columns, rows, cell_size),
            atlas,
            layout,
        ))
    }

    async fn load_atlas(
        assets: &mut AssetCache,
        def: &TileSetDef,
    ) -> anyhow::Result<(TextureHandle, AtlasLayout, Vec2)> {
        let atlas = assets
            .load_texture(&def.image)
            .await
            .with_context(|| format!("Loading tile set atlas {}", def.image))?;
        let layout = AtlasLayout {
            columns: def.atlas_columns,
            rows: def.atlas_rows,
        };
        let cell_size = cell_size_for(assets.texture_size(atlas), layout, def.scale);
        Ok((atlas, layout, cell_size))
    }

    /// A grid the size of the atlas listing every tile once, row-major.
    pub fn palette(atlas: TextureHandle, atlas_size: Vec2, layout: AtlasLayout, scale: f32) -> Self {
        let columns = layout.columns as usize;
        let rows = layout.rows as usize;
        let mut grid = TileGrid::blank(columns, rows, cell_size_for(atlas_size, layout, scale));
        for y in 0..rows {
            for x in 0..columns {
                let cell = CellCoord::new(x as i32, y as i32);
                // in bounds by construction
                let _ = grid.set_type(cell, (x + y * columns) as TileType);
            }
        }
        Self::from_grid(grid, atlas, layout)
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn atlas(&self) -> TextureHandle {
        self.atlas
    }

    pub fn layout(&self) -> AtlasLayout {
        self.layout
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn chunks(&self) -> &[MeshChunk] {
        &self.chunks
    }

    pub fn set_type(&mut self, cell: CellCoord, t: TileType) -> Result<(), GameError> {
        if self.grid.type_of(cell) == Some(t) {
            return Ok(());
        }
        self.grid.set_type(cell, t)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_wall_types(&mut self, types: impl IntoIterator<Item = TileType>) {
        self.grid.set_wall_types(types);
    }

    /// Rebuild the meshes if an edit happened since the last build.
    pub fn ensure_meshes(&mut self, assets: &AssetCache) {
        if !self.dirty {
            return;
        }
        let texture = assets.texture(self.atlas).cloned();
        self.chunks = build_mesh_chunks(&self.grid, self.layout, texture);
        self.dirty = false;
        debug!("Rebuilt {} tile mesh chunk(s)", self.chunks.len());
    }

    /// Chunks overlapping the view, one chunk of margin included.
    pub fn visible_chunks(&self, view_min: Vec2, view_max: Vec2) -> Vec<&MeshChunk> {
        query_visible_rect(&self.chunks, view_min, view_max, chunk_world_size(&self.grid))
    }

    pub fn draw_visible_rect(&mut self, assets: &AssetCache, view_min: Vec2, view_max: Vec2) {
        self.ensure_meshes(assets);
        for chunk in self.visible_chunks(view_min, view_max) {
            draw_mesh(&chunk.mesh);
        }
    }

    /// Translucent overlay on one cell.
    pub fn highlight_cell(&self, cell: CellCoord, color: Color) {
        if !self.grid.in_bounds(cell) {
            return;
        }
        let r = self.grid.bounds_of(cell);
        draw_rectangle(r.x, r.y, r.w, r.h, color);
    }

    pub fn save_layout(&self, path: impl AsRef<Path>) -> Result<(), GameError> {
        self.grid.save(path)
    }
}
