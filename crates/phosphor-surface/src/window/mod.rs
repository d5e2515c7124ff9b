//! Host event loop.
//!
//! Owns the `winit` EventLoop and Window and plays the host widget system for a
//! [`Surface`](crate::surface::Surface): it fires lifecycle notifications,
//! pumps handoff requests and forwards keys and resizes.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
