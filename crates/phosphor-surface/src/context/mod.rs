//! GPU context contract and the cross-thread handoff plumbing.
//!
//! A context is a plain value implementing [`GpuContext`]. Ownership moves
//! between the UI thread and the render worker by moving that value through
//! channels, so at any instant exactly one thread can reach it.

mod error;
mod gpu_context;
mod handoff;

pub use error::HandoffError;
pub use gpu_context::{ContextOwner, GpuContext};

pub(crate) use handoff::{HandoffChannels, HandoffReply, HandoffRequest, HandoffState};
