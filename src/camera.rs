#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// View transform for the stage.
///
/// `offset` is in screen pixels, `scale` is a zoom factor (1.0 = no zoom).
/// Both are stored in the project snapshot so a reopened project shows the
/// same view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub offset: Point,
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { offset: Point::default(), scale: 1.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn new(offset: Point, scale: f64) -> Self {
        Self { offset, scale }
    }

    /// Whether this camera can convert points: finite offset and a finite,
    /// positive scale.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.scale.is_finite() && self.scale > 0.0 && self.offset.is_finite()
    }

    /// Convert a screen-space point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset.x) / self.scale,
            y: (screen.y - self.offset.y) / self.scale,
        }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.offset.x,
            y: world.y * self.scale + self.offset.y,
        }
    }
}
