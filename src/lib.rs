//! Editing core for a 2D room-layout designer.
//!
//! The crate owns the in-memory floor plan (walls, doors, windows, furniture),
//! the tool/selection state machine that turns pointer and key input into
//! document edits, wall snapping for openings, and persistence of whole
//! projects to a hosted REST table with debounced autosave. Rendering is the
//! host's job; it feeds input to [`engine::EngineCore`] and draws
//! [`doc::DocStore`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] and the [`engine::Action`]s it emits |
//! | [`doc`] | In-memory document store and editor object types |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Tools, keys, and UI state |
//! | [`snap`] | Grid snapping and nearest-wall projection |
//! | [`project`] | Project rows and the persisted snapshot |
//! | [`store`] | `ProjectStore` trait, REST and memory backends, fallback facade |
//! | [`services`] | Editor session and debounced autosave |
//! | [`config`] | Backend configuration from the environment |
//! | [`consts`] | Shared constants (grid size, default sizes, colours) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod input;
pub mod project;
pub mod services;
pub mod snap;
pub mod store;
