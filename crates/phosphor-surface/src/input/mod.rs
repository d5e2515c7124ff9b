//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Host code translates platform key events into [`Key`]s; [`translate_key`]
//! turns those into the [`ActionCode`]s a processing block understands.

mod action;
pub mod platform;
mod types;

pub use action::{ActionCode, translate_key};
pub use types::{Key, KeyState};
