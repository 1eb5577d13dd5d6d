use crate::error::GameError;
use crate::loader::csv::CsvTable;
use log::info;
use macroquad::prelude::*;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

/// Atlas index stored in a grid cell.
pub type TileType = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Truncates toward zero; a position on a boundary belongs to the next cell.
#[inline]
pub fn world_to_cell(p: Vec2, cell_size: Vec2) -> CellCoord {
    CellCoord {
        x: (p.x / cell_size.x) as i32,
        y: (p.y / cell_size.y) as i32,
    }
}

/// Overlap test that does not count shared edges.
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

/// Rectangular grid of tile types with wall classification.
#[derive(Debug, Clone)]
pub struct TileGrid {
    columns: usize,
    rows: usize,
    cells: Vec<TileType>,
    cell_size: Vec2,
    wall_types: HashSet<TileType>,
}

impl TileGrid {
    /// Zero-filled grid.
    pub fn blank(columns: usize, rows: usize, cell_size: Vec2) -> Self {
        Self {
            columns,
            rows,
            cells: vec![0; columns * rows],
            cell_size,
            wall_types: HashSet::new(),
        }
    }

    /// Build from a headerless layout table: one row per grid row, one cell
    /// per grid column.
    pub fn from_table(table: &CsvTable, cell_size: Vec2) -> Result<Self, GameError> {
        let columns = table.column_count();
        let rows = table.row_count();

        let mut cells = Vec::with_capacity(columns * rows);
        for (y, row) in table.rows().enumerate() {
            if row.len() != columns {
                return Err(GameError::InvalidLayout(format!(
                    "row {y} has {} cells, expected {columns}",
                    row.len()
                )));
            }
            for x in 0..columns {
                cells.push(table.parse_cell(y, x)?);
            }
        }

        Ok(Self {
            columns,
            rows,
            cells,
            cell_size,
            wall_types: HashSet::new(),
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row-major cell types.
    pub fn cells(&self) -> &[TileType] {
        &self.cells
    }

    /// World size of one cell (atlas tile size times scale).
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    pub fn set_wall_types(&mut self, types: impl IntoIterator<Item = TileType>) {
        self.wall_types = types.into_iter().collect();
    }

    pub fn with_wall_types(mut self, types: impl IntoIterator<Item = TileType>) -> Self {
        self.set_wall_types(types);
        self
    }

    #[inline]
    pub fn is_wall_type(&self, t: TileType) -> bool {
        self.wall_types.contains(&t)
    }

    #[inline]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.columns && (cell.y as usize) < self.rows
    }

    #[inline]
    fn index(&self, cell: CellCoord) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.x as usize + cell.y as usize * self.columns)
    }

    #[inline]
    pub fn cell_at(&self, world: Vec2) -> CellCoord {
        world_to_cell(world, self.cell_size)
    }

    pub fn bounds_of(&self, cell: CellCoord) -> Rect {
        Rect::new(
            cell.x as f32 * self.cell_size.x,
            cell.y as f32 * self.cell_size.y,
            self.cell_size.x,
            self.cell_size.y,
        )
    }

    /// Whole grid in world space.
    pub fn world_bounds(&self) -> Rect {
        Rect::new(
            0.0,
            0.0,
            self.cell_size.x * self.columns as f32,
            self.cell_size.y * self.rows as f32,
        )
    }

    pub fn type_of(&self, cell: CellCoord) -> Option<TileType> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// In bounds and of a wall type.
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.type_of(cell).is_some_and(|t| self.is_wall_type(t))
    }

    pub fn set_type(&mut self, cell: CellCoord, t: TileType) -> Result<(), GameError> {
        let i = self.index(cell).ok_or(GameError::CellOutOfBounds {
            x: cell.x,
            y: cell.y,
            columns: self.columns,
            rows: self.rows,
        })?;
        self.cells[i] = t;
        Ok(())
    }

    /// Cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, TileType)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(i, &t)| {
            (
                CellCoord::new((i % columns) as i32, (i / columns) as i32),
                t,
            )
        })
    }

    /// Layout CSV: one line per row, comma separated, newline terminated.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() * 3);
        for row in self.cells.chunks(self.columns.max(1)) {
            for (x, t) in row.iter().enumerate() {
                if x > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{t}");
            }
            out.push('\n');
        }
        out
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GameError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_csv()).map_err(|e| GameError::io(path, e))?;
        info!(
            "Saved {}x{} layout to {}",
            self.columns,
            self.rows,
            path.display()
        );
        Ok(())
    }
}
