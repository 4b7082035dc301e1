//! Start grid allocation.

use rand::Rng;

use crate::map::ObstacleConfig;
use crate::vec3::Vec3;

/// Grid cell spacing on the X/Z plane.
pub const GRID_SPACING: f64 = 1.5;
/// Clearance above the tallest obstacle.
pub const SPAWN_CLEARANCE: f64 = 10.0;
/// Upper bound of the per-point vertical jitter.
pub const SPAWN_JITTER: f64 = 0.5;
/// Used when no usable count was requested.
pub const DEFAULT_SPAWN_COUNT: usize = 50;

/// Top face of the tallest obstacle, or 0 with no obstacles.
pub fn top_obstacle_height(obstacles: &[ObstacleConfig]) -> f64 {
    obstacles
        .iter()
        .map(|o| o.position.y + o.size.y / 2.0)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// Spawn count for a requested count, falling back to [`DEFAULT_SPAWN_COUNT`]
/// when the request is missing or zero.
pub fn resolve_spawn_count(requested: Option<usize>) -> usize {
    match requested {
        Some(n) if n > 0 => n,
        _ => DEFAULT_SPAWN_COUNT,
    }
}

/// Lay out `count` spawn points on a square grid centered at the origin,
/// row-major, above `top_obstacle_height`.
pub fn allocate<R: Rng + ?Sized>(
    count: usize,
    top_obstacle_height: f64,
    rng: &mut R,
) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }

    let side = (count as f64).sqrt().ceil() as usize;
    let half_extent = (side - 1) as f64 * GRID_SPACING / 2.0;
    let base_y = top_obstacle_height + SPAWN_CLEARANCE;

    (0..count)
        .map(|i| {
            let row = i / side;
            let col = i % side;
            Vec3::new(
                col as f64 * GRID_SPACING - half_extent,
                base_y + rng.gen_range(0.0..SPAWN_JITTER),
                row as f64 * GRID_SPACING - half_extent,
            )
        })
        .collect()
}
