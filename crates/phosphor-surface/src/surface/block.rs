use crate::input::ActionCode;
use crate::sync::RenderLock;

/// The processing block that owns a surface.
///
/// The block owns the render lock shared by the surface (UI side) and the
/// render worker. Both callbacks are invoked synchronously on the UI thread.
pub trait ProcessingBlock: Send + Sync + 'static {
    fn render_lock(&self) -> &RenderLock;

    /// Blocks until the render lock is free, then holds it.
    fn lock_render(&self) {
        self.render_lock().acquire();
    }

    /// Frees the render lock and wakes every waiter.
    fn unlock_render(&self) {
        self.render_lock().release();
    }

    /// New drawable size in physical pixels.
    fn cb_reshape(&self, width: u32, height: u32);

    fn execute_ui_action(&self, action: ActionCode);
}
