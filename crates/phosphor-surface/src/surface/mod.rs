//! The display surface: UI-thread side of the context handoff.
//!
//! A [`Surface`] lives on the UI thread. It keeps the GPU context while the UI
//! side needs it, answers grab requests from the render worker, and turns
//! host lifecycle notifications into render-lock transitions on its
//! [`ProcessingBlock`]. The worker side talks to it through a
//! [`ContextHandle`].

mod block;
mod handle;
mod lifecycle;
mod display;

#[cfg(test)]
pub(crate) mod test_support;

pub use block::ProcessingBlock;
pub use handle::{ContextHandle, CurrentContext};
pub use lifecycle::{LifecycleEvent, LockAction, SurfaceLifecycle};
pub use display::Surface;
