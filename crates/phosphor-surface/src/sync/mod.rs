//! Synchronization primitives shared by the UI thread and the render worker.
//!
//! The only primitive here is the render lock: a binary gate the UI side holds
//! while it owns the GPU context, and which a drawer must pass before grabbing
//! the context for itself.

mod render_lock;

pub use render_lock::{RenderGuard, RenderLock};
