//! Threaded display surface.
//!
//! A render worker draws into a GPU context that lives inside a host window
//! owned by the UI thread. The context moves between the two threads through
//! an explicit handoff, and a render lock keeps the worker's draws and the
//! host's compose/resize passes from overlapping.
//!
//! - [`sync`]: the render lock
//! - [`context`]: the `GpuContext` contract and handoff errors
//! - [`surface`]: the UI-side `Surface` and the worker-side `ContextHandle`
//! - [`worker`]: a paced render loop following the protocol
//! - [`device`], [`window`]: a wgpu context and a winit host

pub mod context;
pub mod device;
pub mod input;
pub mod surface;
pub mod sync;
pub mod time;
pub mod window;
pub mod worker;

pub mod logging;
