//! Time subsystem.
//!
//! Paces the render worker. Intended usage:
//! - one `FramePacer` per render loop
//! - call `wait()` once per frame, before taking the render lock

mod frame_pacer;

pub use frame_pacer::{FramePacer, FrameTime};
