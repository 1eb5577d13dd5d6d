use super::Orc;
use macroquad::prelude::*;

/// Push overlapping enemies apart.
///
/// Pairs are visited in order `(i, j), i < j` and each correction is applied
/// before the next pair is examined. The correction follows the axis of least
/// penetration; each orc of a pair moves half of it, scaled by
/// `dt * strength`, away from the other.
pub fn separate(orcs: &mut [Orc], dt: f32, strength: f32) {
    for i in 0..orcs.len() {
        for j in i + 1..orcs.len() {
            let a = orcs[i].body.bounds();
            let b = orcs[j].body.bounds();
            let Some(correction) = overlap_correction(&a, &b) else {
                continue;
            };

            let step = correction * 0.5 * dt * strength;
            orcs[i].body.position -= step;
            orcs[j].body.position += step;
        }
    }
}

/// Overlap of `b` into `a`, pointing from `a` towards `b`, with the axis of
/// deeper penetration zeroed. `None` when the boxes don't overlap.
pub fn overlap_correction(a: &Rect, b: &Rect) -> Option<Vec2> {
    if !crate::spatial::rects_overlap(a, b) {
        return None;
    }

    let delta = b.center() - a.center();
    let mut c = vec2(
        if delta.x > 0.0 {
            a.right() - b.left()
        } else {
            -(b.right() - a.left())
        },
        if delta.y > 0.0 {
            a.bottom() - b.top()
        } else {
            -(b.bottom() - a.top())
        },
    );

    if c.x.abs() > c.y.abs() {
        c.x = 0.0;
    } else {
        c.y = 0.0;
    }
    Some(c)
}
