use std::fmt;
use std::thread::ThreadId;

/// A graphics context with single-thread affinity.
///
/// Implementations wrap whatever the graphics API needs (a GL context, a
/// wgpu device and surface, ...). The handoff protocol guarantees that the
/// three methods are only called from the thread that currently owns the
/// value:
///
/// - `move_to_thread` runs on the old owner, right before the value is sent
///   to `thread`
/// - `make_current` runs on the new owner after it received the value
/// - `done_current` runs on the owner before it gives the value away
pub trait GpuContext: Send + 'static {
    /// Re-targets the context's thread affinity to `thread`.
    fn move_to_thread(&mut self, thread: ThreadId);

    /// Binds the context to the calling thread for draw calls.
    fn make_current(&mut self);

    /// Unbinds the context from the calling thread.
    fn done_current(&mut self);
}

/// Which side of the surface owns the GPU context.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ContextOwner {
    /// Parked on the UI thread, idle or presenting.
    Ui,
    /// Moved to a drawing thread.
    Worker(ThreadId),
}

impl ContextOwner {
    pub fn is_ui(self) -> bool {
        matches!(self, ContextOwner::Ui)
    }
}

impl fmt::Display for ContextOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextOwner::Ui => f.write_str("ui"),
            ContextOwner::Worker(id) => write!(f, "worker {id:?}"),
        }
    }
}
