//! Snapping: grid rounding for wall points and nearest-wall projection for
//! doors and windows.
//!
//! The wall search is a linear scan over every segment of every wall. Scenes
//! are a single floor plan, so there is no spatial index.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::camera::Point;
use crate::consts::SNAP_THRESHOLD;
use crate::doc::{EditorObject, ObjectId, ObjectKind};

/// Closest point on a wall found for a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSnap {
    /// Wall that owns the matching segment.
    pub wall_id: ObjectId,
    /// Index of the matching segment within the wall's polyline.
    pub segment: usize,
    /// Projection parameter along the segment, clamped to `[0, 1]`.
    pub position: f64,
    /// The projected point on the segment.
    pub point: Point,
    /// Distance from the query point to `point`.
    pub distance: f64,
}

/// Round each coordinate to the nearest multiple of `grid`.
#[must_use]
pub fn snap_to_grid(pt: Point, grid: f64) -> Point {
    Point { x: (pt.x / grid).round() * grid, y: (pt.y / grid).round() * grid }
}

/// Project `pt` onto the segment `a`–`b`.
///
/// Returns the clamped parameter `t` and the projected point, or `None` for a
/// zero-length segment.
#[must_use]
pub fn project_onto_segment(pt: Point, a: Point, b: Point) -> Option<(f64, Point)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return None;
    }
    let t = (((pt.x - a.x) * dx + (pt.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    Some((t, Point { x: a.x + t * dx, y: a.y + t * dy }))
}

/// Find the wall segment closest to `pt` among `objects`, within [`SNAP_THRESHOLD`].
#[must_use]
pub fn find_nearest_wall<'a>(pt: Point, objects: impl IntoIterator<Item = &'a EditorObject>) -> Option<WallSnap> {
    find_nearest_wall_within(pt, objects, SNAP_THRESHOLD)
}

/// Like [`find_nearest_wall`] with an explicit threshold.
///
/// Non-wall objects and walls with fewer than two points are ignored. A match
/// must be strictly closer than `threshold`; on ties the first segment found
/// wins. A non-finite `pt` never matches.
#[must_use]
pub fn find_nearest_wall_within<'a>(
    pt: Point,
    objects: impl IntoIterator<Item = &'a EditorObject>,
    threshold: f64,
) -> Option<WallSnap> {
    let mut best: Option<WallSnap> = None;

    for wall in objects.into_iter().filter(|o| o.kind == ObjectKind::Wall) {
        let points = wall.points();
        if points.len() < 2 {
            continue;
        }

        for (segment, pair) in points.windows(2).enumerate() {
            let Some((t, projected)) = project_onto_segment(pt, pair[0], pair[1]) else {
                continue;
            };
            let distance = pt.distance_to(projected);
            // Positive comparisons so a NaN distance never qualifies.
            let closer = best.as_ref().map_or(true, |b| distance < b.distance);
            if distance < threshold && closer {
                best = Some(WallSnap { wall_id: wall.id.clone(), segment, position: t, point: projected, distance });
            }
        }
    }

    best
}
