//! Geometric helpers for headings and tile lookups.

use std::f32::consts::TAU;

use ndarray::Array1;

use super::tile::TileCoord;

/// Wraps a heading in radians into `[0, 2π)`.
///
/// `rem_euclid` can round a tiny negative angle up to exactly `2π`, which is
/// folded back to `0.0` so the upper bound stays exclusive.
pub fn normalize_heading(heading: f32) -> f32 {
    let wrapped = heading.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Unit displacement for a heading. The y axis points down, so a heading of
/// `π/2` moves towards row zero.
pub fn heading_vector(heading: f32) -> Array1<f32> {
    Array1::from_vec(vec![heading.cos(), -heading.sin()])
}

/// Tile containing a world-space position.
///
/// Uses floor division so positions just left of or above the map map to
/// negative, out-of-bounds tiles instead of tile zero.
pub fn position_to_tile(x: f32, y: f32, tile_size: f32) -> TileCoord {
    (
        (x / tile_size).floor() as i64,
        (y / tile_size).floor() as i64,
    )
}
