/// Host notifications that move the render lock.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LifecycleEvent {
    AboutToCompose,
    FrameSwapped,
    AboutToResize,
    Resized,
}

/// What a lifecycle event does to the render lock.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LockAction {
    Acquire,
    Release,
}

impl LifecycleEvent {
    pub fn lock_action(self) -> LockAction {
        match self {
            LifecycleEvent::AboutToCompose | LifecycleEvent::AboutToResize => LockAction::Acquire,
            LifecycleEvent::FrameSwapped | LifecycleEvent::Resized => LockAction::Release,
        }
    }
}

/// Lifecycle interface the host calls on the UI thread.
///
/// Each "about to" notification is paired with a completion notification; the
/// surface holds the render lock in between so the worker never draws while
/// the host composes or resizes.
pub trait SurfaceLifecycle {
    fn about_to_compose(&mut self);
    fn frame_swapped(&mut self);
    fn about_to_resize(&mut self);
    fn resized(&mut self);

    /// Dispatches `event` to the matching method.
    fn notify(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::AboutToCompose => self.about_to_compose(),
            LifecycleEvent::FrameSwapped => self.frame_swapped(),
            LifecycleEvent::AboutToResize => self.about_to_resize(),
            LifecycleEvent::Resized => self.resized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preparation_events_acquire() {
        assert_eq!(LifecycleEvent::AboutToCompose.lock_action(), LockAction::Acquire);
        assert_eq!(LifecycleEvent::AboutToResize.lock_action(), LockAction::Acquire);
    }

    #[test]
    fn completion_events_release() {
        assert_eq!(LifecycleEvent::FrameSwapped.lock_action(), LockAction::Release);
        assert_eq!(LifecycleEvent::Resized.lock_action(), LockAction::Release);
    }
}
