//! Nearest-ore search by expanding square rings.
//!
//! Rings are scanned in row-major order: `dy` from `-r` to `r`, and within a
//! row `dx` from `-r` to `r`. Among several harvestable tiles at the same
//! Chebyshev distance the one nearest the top-left of the ring wins.

use tracing::debug;

use crate::error::GridError;
use crate::infra::{Bounds, Position};
use crate::state::Grid;

/// Offsets at Chebyshev distance `radius`, in scan order. Lazy, so a large
/// radius costs nothing until the offsets are consumed.
pub fn ring_offsets(radius: i32) -> impl Iterator<Item = (i32, i32)> {
    let radius = radius.max(0);
    (-radius..=radius).flat_map(move |dy| {
        // Top and bottom rows are full, the rows between only have their two ends
        let step = if dy.abs() == radius {
            1
        } else {
            2 * radius as usize
        };
        (-radius..=radius).step_by(step).map(move |dx| (dx, dy))
    })
}

/// Largest ring radius that still touches a cell of `grid` around `from`.
fn grid_reach(grid: &Grid, from: Position) -> i32 {
    [
        from.x,
        grid.width - 1 - from.x,
        from.y,
        grid.height - 1 - from.y,
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

/// Closest tile (by ring) within `bounds` holding an item, searching out to
/// `max_radius`. The tile under `from` is not considered.
#[tracing::instrument(level = "trace", skip(grid), fields(from_x = from.x, from_y = from.y))]
pub fn find_nearest_resource(
    grid: &Grid,
    from: Position,
    bounds: Bounds,
    max_radius: i32,
) -> Result<Option<Position>, GridError> {
    grid.tile_at(&from)?;

    // Rings past the grid edge hold no cells
    let reach = max_radius.min(grid_reach(grid, from));
    for radius in 1..=reach {
        for (dx, dy) in ring_offsets(radius) {
            let candidate = from.offset(dx, dy);
            if !bounds.contains(&candidate) || !grid.in_bounds(&candidate) {
                continue;
            }
            if grid.tile_at(&candidate)?.is_harvestable() {
                debug!("Found ore at {} (ring {})", candidate, radius);
                return Ok(Some(candidate));
            }
        }
    }

    debug!("No ore within {} rings of {} inside {}", max_radius, from, bounds);
    Ok(None)
}
