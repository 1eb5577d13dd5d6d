pub mod cull;
pub mod mesh;

pub use cull::query_visible_rect;
pub use mesh::{build_mesh_chunks, chunk_world_size, AtlasLayout, ChunkCoord, MeshChunk, CHUNK_CELLS};
