use crate::render::mesh::{ChunkCoord, MeshChunk};
use macroquad::prelude::*;

const CULL_MARGIN_CHUNKS: i32 = 1;

/// Chunk coordinates covering a view rectangle, padded by one chunk.
pub fn visible_chunk_range(view_min: Vec2, view_max: Vec2, chunk_size: Vec2) -> (ChunkCoord, ChunkCoord) {
    let mut cx_min = (view_min.x / chunk_size.x).floor() as i32;
    let mut cy_min = (view_min.y / chunk_size.y).floor() as i32;
    let mut cx_max = (view_max.x / chunk_size.x).floor() as i32;
    let mut cy_max = (view_max.y / chunk_size.y).floor() as i32;

    if cx_min > cx_max {
        std::mem::swap(&mut cx_min, &mut cx_max);
    }
    if cy_min > cy_max {
        std::mem::swap(&mut cy_min, &mut cy_max);
    }

    (
        ChunkCoord {
            x: cx_min - CULL_MARGIN_CHUNKS,
            y: cy_min - CULL_MARGIN_CHUNKS,
        },
        ChunkCoord {
            x: cx_max + CULL_MARGIN_CHUNKS,
            y: cy_max + CULL_MARGIN_CHUNKS,
        },
    )
}

/// Chunks inside the padded view, in row-major order.
pub fn query_visible_rect<'g>(
    chunks: &'g [MeshChunk],
    view_min: Vec2,
    view_max: Vec2,
    chunk_size: Vec2,
) -> Vec<&'g MeshChunk> {
    let (min, max) = visible_chunk_range(view_min, view_max, chunk_size);

    let mut visible: Vec<&MeshChunk> = chunks
        .iter()
        .filter(|c| c.coord.x >= min.x && c.coord.x <= max.x && c.coord.y >= min.y && c.coord.y <= max.y)
        .collect();
    visible.sort_by_key(|c| (c.coord.y, c.coord.x));
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::mesh::{build_mesh_chunks, chunk_world_size, AtlasLayout, CHUNK_CELLS};
    use crate::spatial::TileGrid;

    #[test]
    fn far_chunks_are_culled() {
        let grid = TileGrid::blank(CHUNK_CELLS * 5, CHUNK_CELLS, vec2(1.0, 1.0));
        let chunks = build_mesh_chunks(&grid, AtlasLayout { columns: 1, rows: 1 }, None);
        let size = chunk_world_size(&grid);

        let visible = query_visible_rect(&chunks, vec2(0.0, 0.0), vec2(10.0, 10.0), size);
        let xs: Vec<i32> = visible.iter().map(|c| c.coord.x).collect();
        assert_eq!(xs, vec![0, 1]);
    }

    #[test]
    fn returns_chunks_in_stable_order() {
        let grid = TileGrid::blank(CHUNK_CELLS * 2, CHUNK_CELLS * 2, vec2(1.0, 1.0));
        let chunks = build_mesh_chunks(&grid, AtlasLayout { columns: 1, rows: 1 }, None);
        let size = chunk_world_size(&grid);

        let view = query_visible_rect(&chunks, vec2(100.0, 100.0), vec2(0.0, 0.0), size);
        assert_eq!(view.len(), 4);
        assert!(view
            .windows(2)
            .all(|w| (w[0].coord.y, w[0].coord.x) <= (w[1].coord.y, w[1].coord.x)));
    }
}
