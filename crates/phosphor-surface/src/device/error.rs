use std::fmt;

/// What the draw loop should do after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; the next frame may succeed.
    Reconfigured,
    /// Transient error; drop this frame.
    SkipFrame,
    /// Unrecoverable (commonly out of memory); stop rendering.
    Fatal,
}

impl fmt::Display for SurfaceErrorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SurfaceErrorAction::Reconfigured => "surface reconfigured",
            SurfaceErrorAction::SkipFrame => "frame skipped",
            SurfaceErrorAction::Fatal => "fatal surface error",
        })
    }
}
