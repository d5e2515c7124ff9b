use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use crossbeam_channel::{Sender, bounded};

use crate::context::{ContextOwner, GpuContext, HandoffError, HandoffRequest, HandoffState};
use crate::sync::RenderGuard;

use super::ProcessingBlock;

/// Worker-side access to a surface's GPU context.
///
/// A handle is `Send`; move it to the render thread. The context itself is
/// only reachable through [`grab_context`](Self::grab_context).
pub struct ContextHandle<C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    block: Arc<B>,
    ui_thread: ThreadId,
    state: Arc<HandoffState>,
    requests: Sender<HandoffRequest<C>>,
    returns: Sender<C>,
}

impl<C, B> ContextHandle<C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    pub(crate) fn new(
        block: Arc<B>,
        ui_thread: ThreadId,
        state: Arc<HandoffState>,
        requests: Sender<HandoffRequest<C>>,
        returns: Sender<C>,
    ) -> Self {
        Self {
            block,
            ui_thread,
            state,
            requests,
            returns,
        }
    }

    pub fn block(&self) -> &Arc<B> {
        &self.block
    }

    /// The UI thread released contexts go back to.
    pub fn ui_thread(&self) -> ThreadId {
        self.ui_thread
    }

    pub fn owner(&self) -> ContextOwner {
        self.state.owner()
    }

    /// Nudges the host event loop through the surface's waker, if any.
    pub(crate) fn wake_host(&self) {
        self.state.wake();
    }

    /// Waits for the render lock and holds it until the guard drops.
    ///
    /// Draw sections take this before [`grab_context`](Self::grab_context)
    /// and release the context before dropping the guard.
    pub fn lock_render(&self) -> RenderGuard<'_> {
        self.block.render_lock().lock()
    }

    /// Moves the GPU context onto the calling thread and makes it current.
    ///
    /// Blocks until the UI thread answers; there is no timeout. The caller is
    /// expected to hold the render lock, which is not checked here.
    ///
    /// # Errors
    ///
    /// - [`HandoffError::OnUiThread`] when called from the surface's UI thread
    /// - [`HandoffError::Unavailable`] when the UI side has no context to give
    /// - [`HandoffError::Disconnected`] when the surface is gone
    pub fn grab_context(&self) -> Result<CurrentContext<'_, C, B>, HandoffError> {
        let me = thread::current().id();
        if me == self.ui_thread {
            return Err(HandoffError::OnUiThread);
        }

        let (reply, answer) = bounded(1);
        self.requests
            .send(HandoffRequest { target: me, reply })
            .map_err(|_| HandoffError::Disconnected)?;

        // Wake the host loop, and the UI thread in case it is blocked on the
        // render lock we are holding.
        self.state.wake();
        self.block.render_lock().request_service();

        let mut context = answer.recv().map_err(|_| HandoffError::Disconnected)??;
        context.make_current();
        log::trace!("context current on {me:?}");

        Ok(CurrentContext {
            context: Some(context),
            handle: self,
            _thread_bound: PhantomData,
        })
    }
}

impl<C, B> fmt::Debug for ContextHandle<C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandle")
            .field("ui_thread", &self.ui_thread)
            .field("owner", &self.state.owner())
            .finish()
    }
}

/// The GPU context, current on a worker thread.
///
/// Dereferences to the context. Dropping it (or calling
/// [`release`](Self::release)) un-binds the context and returns it to the UI
/// thread. Not `Send`: the context is current on the thread that grabbed it.
pub struct CurrentContext<'h, C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    // Some until released.
    context: Option<C>,
    handle: &'h ContextHandle<C, B>,
    _thread_bound: PhantomData<*const ()>,
}

impl<C, B> CurrentContext<'_, C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    /// Un-binds the context and hands it back to the UI thread.
    pub fn release(mut self) {
        self.give_back();
    }

    fn give_back(&mut self) {
        let Some(mut context) = self.context.take() else {
            return;
        };

        context.done_current();
        context.move_to_thread(self.handle.ui_thread);

        // Record the owner before sending so the UI side never sees a parked
        // context still marked as a worker's.
        self.handle.state.set_owner(ContextOwner::Ui);

        if self.handle.returns.send(context).is_err() {
            log::warn!("surface gone; context dropped on the render thread");
        }
        log::trace!("context released to {:?}", self.handle.ui_thread);
    }
}

impl<C, B> Deref for CurrentContext<'_, C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    type Target = C;

    fn deref(&self) -> &C {
        self.context
            .as_ref()
            .expect("context is present until release")
    }
}

impl<C, B> DerefMut for CurrentContext<'_, C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    fn deref_mut(&mut self) -> &mut C {
        self.context
            .as_mut()
            .expect("context is present until release")
    }
}

impl<C, B> Drop for CurrentContext<'_, C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    fn drop(&mut self) {
        self.give_back();
    }
}
