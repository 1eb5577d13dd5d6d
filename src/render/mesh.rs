use crate::spatial::{TileGrid, TileType};
use macroquad::models::{Mesh, Vertex};
use macroquad::prelude::*;

/// Cells per chunk side. 32 * 32 cells * 4 vertices stays under the u16 index limit.
pub const CHUNK_CELLS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

/// Column/row layout of a tile atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasLayout {
    pub columns: u32,
    pub rows: u32,
}

impl AtlasLayout {
    /// Normalised UV rectangle of a tile type.
    pub fn uv_rect(&self, t: TileType) -> Rect {
        let cols = self.columns.max(1) as i32;
        let col = t.rem_euclid(cols);
        let row = t.div_euclid(cols);
        let w = 1.0 / self.columns.max(1) as f32;
        let h = 1.0 / self.rows.max(1) as f32;
        Rect::new(col as f32 * w, row as f32 * h, w, h)
    }
}

/// One drawable block of the tile grid.
pub struct MeshChunk {
    pub coord: ChunkCoord,
    /// World-space area covered
    pub bounds: Rect,
    pub mesh: Mesh,
}

/// Chunk world size for a grid.
#[inline]
pub fn chunk_world_size(grid: &TileGrid) -> Vec2 {
    grid.cell_size() * CHUNK_CELLS as f32
}

/// Build two triangles per cell, grouped into [`CHUNK_CELLS`]-square chunks.
pub fn build_mesh_chunks(
    grid: &TileGrid,
    atlas: AtlasLayout,
    texture: Option<Texture2D>,
) -> Vec<MeshChunk> {
    let cell = grid.cell_size();
    let chunk_size = chunk_world_size(grid);
    let chunks_x = grid.columns().div_ceil(CHUNK_CELLS);
    let chunks_y = grid.rows().div_ceil(CHUNK_CELLS);

    let mut chunks = Vec::with_capacity(chunks_x * chunks_y);
    for cy in 0..chunks_y {
        for cx in 0..chunks_x {
            let x0 = cx * CHUNK_CELLS;
            let y0 = cy * CHUNK_CELLS;
            let x1 = (x0 + CHUNK_CELLS).min(grid.columns());
            let y1 = (y0 + CHUNK_CELLS).min(grid.rows());

            let count = (x1 - x0) * (y1 - y0);
            let mut vertices = Vec::with_capacity(count * 4);
            let mut indices = Vec::with_capacity(count * 6);

            for y in y0..y1 {
                for x in x0..x1 {
                    let t = grid.cells()[x + y * grid.columns()];
                    let uv = atlas.uv_rect(t);
                    let left = x as f32 * cell.x;
                    let top = y as f32 * cell.y;

                    let base = vertices.len() as u16;
                    vertices.push(Vertex::new(left, top, 0.0, uv.x, uv.y, WHITE));
                    vertices.push(Vertex::new(left + cell.x, top, 0.0, uv.x + uv.w, uv.y, WHITE));
                    vertices.push(Vertex::new(left, top + cell.y, 0.0, uv.x, uv.y + uv.h, WHITE));
                    vertices.push(Vertex::new(
                        left + cell.x,
                        top + cell.y,
                        0.0,
                        uv.x + uv.w,
                        uv.y + uv.h,
                        WHITE,
                    ));
                    indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
                }
            }

            chunks.push(MeshChunk {
                coord: ChunkCoord {
                    x: cx as i32,
                    y: cy as i32,
                },
                bounds: Rect::new(
                    cx as f32 * chunk_size.x,
                    cy as f32 * chunk_size.y,
                    (x1 - x0) as f32 * cell.x,
                    (y1 - y0) as f32 * cell.y,
                ),
                mesh: Mesh {
                    vertices,
                    indices,
                    texture: texture.clone(),
                },
            });
        }
    }
    chunks
}
