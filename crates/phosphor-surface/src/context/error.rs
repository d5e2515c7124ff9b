use thiserror::Error;

/// Failure to move the GPU context onto the calling thread.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum HandoffError {
    /// The surface was dropped, so nothing answers handoff requests anymore.
    #[error("display surface is gone; no UI thread to hand over the context")]
    Disconnected,

    /// The UI side had no context to give: it was never initialized, or a
    /// drawer already owns it.
    #[error("GPU context is not available on the UI thread")]
    Unavailable,

    /// The UI thread asked for its own context; the round trip would block on itself.
    #[error("grab_context called from the UI thread")]
    OnUiThread,
}
