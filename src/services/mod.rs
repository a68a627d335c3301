//! Editor services that sit between the engine and the project store.
//!
//! ARCHITECTURE
//! ============
//! The engine is pure and synchronous. Services own everything that touches
//! the store or needs a runtime: the open-project session and the debounced
//! autosave task.

pub mod autosave;
pub mod session;
