// tests/collision.rs

mod common;

use macroquad::prelude::*;
use tile_brawl::spatial::rects_overlap;
use tile_brawl::{CellCoord, Character, CsvOptions, CsvTable, TileGrid};

const ROOM: &str = "1,1,1,1,1\n1,0,0,0,1\n1,0,0,0,1\n1,0,0,0,1\n1,1,1,1,1\n";
const CELL: f32 = 80.0;

fn room() -> TileGrid {
    let table = CsvTable::parse(ROOM, CsvOptions::headerless());
    TileGrid::from_table(&table, vec2(CELL, CELL))
        .unwrap()
        .with_wall_types([1])
}

fn overlapping_walls(grid: &TileGrid, c: &Character) -> Vec<CellCoord> {
    grid.iter()
        .filter(|&(cell, t)| grid.is_wall_type(t) && rects_overlap(&c.bounds(), &grid.bounds_of(cell)))
        .map(|(cell, _)| cell)
        .collect()
}

fn push(grid: &TileGrid, dir: Vec2, frames: usize) -> Character {
    let centre = grid.bounds_of(CellCoord::new(2, 2)).center();
    let mut c = Character::spawn(&common::orc_profile(), centre);
    for _ in 0..frames {
        c.movement = dir;
        c.integrate(1.0 / 60.0);
        c.resolve_tile_collisions(grid);
    }
    c
}

#[test]
fn pushing_into_each_wall_stops_at_its_edge() {
    let grid = room();
    let inner = Rect::new(CELL, CELL, CELL * 3.0, CELL * 3.0);

    for dir in [vec2(1.0, 0.0), vec2(-1.0, 0.0), vec2(0.0, 1.0), vec2(0.0, -1.0)] {
        let c = push(&grid, dir, 240);
        assert!(overlapping_walls(&grid, &c).is_empty(), "{dir}: {:?}", c.position);

        let b = c.bounds();
        assert!(b.x >= inner.x - 1e-3 && b.right() <= inner.right() + 1e-3, "{dir}: {b:?}");
        assert!(b.y >= inner.y - 1e-3 && b.bottom() <= inner.bottom() + 1e-3, "{dir}: {b:?}");
    }
}

#[test]
fn character_ends_flush_against_the_wall() {
    let grid = room();
    let c = push(&grid, vec2(1.0, 0.0), 240);
    assert!((c.position.x - (4.0 * CELL - 15.0)).abs() < 1e-3);
    assert!((c.position.y - 2.5 * CELL).abs() < 1e-3);
}

#[test]
fn open_floor_leaves_position_alone() {
    let grid = room();
    let start = grid.bounds_of(CellCoord::new(2, 2)).center();
    let mut c = Character::spawn(&common::orc_profile(), start);
    c.resolve_tile_collisions(&grid);
    assert_eq!(c.position, start);
}
