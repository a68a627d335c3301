//! Shared numeric constants for the editor.

// ── Canvas ──────────────────────────────────────────────────────

/// Grid pitch in world units. Wall points snap to multiples of this.
pub const GRID_SIZE: f64 = 20.0;

/// Stroke thickness of a wall, also the depth of doors and windows.
pub const WALL_THICKNESS: f64 = 10.0;

// ── Snapping ────────────────────────────────────────────────────

/// A door or window click must land strictly closer than this to a wall segment.
pub const SNAP_THRESHOLD: f64 = 50.0;

// ── Sizing ──────────────────────────────────────────────────────

/// Lower bound for width and height after a transform.
pub const MIN_OBJECT_SIZE: f64 = 5.0;

/// Width/height assumed when a transformed object has none recorded.
pub const FALLBACK_OBJECT_SIZE: f64 = 100.0;

/// Door width in world units.
pub const DOOR_WIDTH: f64 = 80.0;

/// Window width in world units.
pub const WINDOW_WIDTH: f64 = 60.0;

/// Where newly added furniture is dropped.
pub const FURNITURE_DROP_X: f64 = 400.0;
pub const FURNITURE_DROP_Y: f64 = 300.0;

// ── Colors ──────────────────────────────────────────────────────

pub const WALL_COLOR: &str = "#1a1a1a";
pub const DOOR_COLOR: &str = "#8B4513";
pub const WINDOW_COLOR: &str = "#87CEEB";

// ── Persistence ─────────────────────────────────────────────────

/// Quiet period after the last edit before an autosave write.
pub const AUTOSAVE_DELAY_MS: u64 = 2000;

/// Name given to a project that has never been named.
pub const UNTITLED_PROJECT: &str = "Untitled Project";
