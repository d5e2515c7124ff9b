use std::marker::PhantomData;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use crossbeam_channel::SendError;

use crate::context::{
    ContextOwner, GpuContext, HandoffChannels, HandoffError, HandoffReply, HandoffRequest,
    HandoffState,
};
use crate::input::{ActionCode, Key, translate_key};

use super::{ContextHandle, ProcessingBlock, SurfaceLifecycle};

/// UI-thread side of a threaded display surface.
///
/// Created on the UI thread and pinned to it (`Surface` is neither `Send` nor
/// `Sync`). The thread that calls [`Surface::new`] is recorded as the UI
/// thread; released contexts are always moved back to it.
///
/// Construction acquires the block's render lock, so a worker waiting to draw
/// stays parked until [`context_initialized`](Self::context_initialized)
/// hands over the freshly created GPU context.
pub struct Surface<C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    block: Arc<B>,
    ui_thread: ThreadId,

    /// The context while the UI thread owns it.
    context: Option<C>,

    /// Whether the UI side currently holds the render lock.
    holds_lock: bool,

    /// Set once the host delivered the context.
    ready: bool,

    state: Arc<HandoffState>,
    channels: HandoffChannels<C>,

    _ui_only: PhantomData<*const ()>,
}

impl<C, B> Surface<C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    /// Creates the surface on the calling (UI) thread and takes the render lock.
    pub fn new(block: Arc<B>) -> Self {
        let ui_thread = thread::current().id();

        block.lock_render();
        log::debug!("surface created on {ui_thread:?}; rendering blocked until the context is ready");

        Self {
            block,
            ui_thread,
            context: None,
            holds_lock: true,
            ready: false,
            state: Arc::new(HandoffState::new()),
            channels: HandoffChannels::new(),
            _ui_only: PhantomData,
        }
    }

    /// Returns a handle the render worker uses to borrow the context.
    pub fn handle(&self) -> ContextHandle<C, B> {
        ContextHandle::new(
            Arc::clone(&self.block),
            self.ui_thread,
            Arc::clone(&self.state),
            self.channels.requests_tx.clone(),
            self.channels.returns_tx.clone(),
        )
    }

    /// Installs a callback invoked from the worker whenever it posts a grab
    /// request. Hosts use it to wake their event loop so it calls
    /// [`service_handoffs`](Self::service_handoffs) promptly.
    pub fn set_waker<F>(&self, waker: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state.set_waker(Arc::new(waker));
    }

    pub fn block(&self) -> &Arc<B> {
        &self.block
    }

    pub fn ui_thread(&self) -> ThreadId {
        self.ui_thread
    }

    /// Current owner of the GPU context.
    pub fn owner(&self) -> ContextOwner {
        self.state.owner()
    }

    /// The host created the GPU context and it is ready for use.
    ///
    /// `context` must have been created on the UI thread. Parks it here and
    /// releases the render lock so the worker may start drawing.
    ///
    /// Returns `false` and drops `context` while a worker owns the current
    /// one. A parked context is replaced.
    pub fn context_initialized(&mut self, context: C) -> bool {
        self.debug_assert_ui_thread();
        self.reclaim();

        if let ContextOwner::Worker(thread) = self.owner() {
            log::warn!("context initialized while {thread:?} owns the current one; ignored");
            return false;
        }

        if self.context.replace(context).is_some() {
            log::warn!("context initialized twice; dropping the previous one");
        }
        self.state.set_owner(ContextOwner::Ui);

        log::debug!("context initialized; rendering unblocked");
        self.ready = true;
        self.unlock_render();
        true
    }

    /// Answers every pending grab request without blocking.
    ///
    /// Returns the number of requests answered.
    pub fn service_handoffs(&mut self) -> usize {
        self.debug_assert_ui_thread();

        let mut answered = 0;
        while let Ok(request) = self.channels.requests_rx.try_recv() {
            self.answer(request);
            answered += 1;
        }
        answered
    }

    /// Waits up to `timeout` for one grab request and answers it.
    ///
    /// For hosts without a waker-driven event loop. Returns `true` if a
    /// request was answered.
    pub fn wait_for_handoff(&mut self, timeout: Duration) -> bool {
        self.debug_assert_ui_thread();

        match self.channels.requests_rx.recv_timeout(timeout) {
            Ok(request) => {
                self.answer(request);
                true
            }
            Err(_) => false,
        }
    }

    /// Runs `f` with the context current on the UI thread.
    ///
    /// Returns `None` while a worker owns the context or before it was
    /// initialized. Hosts call this between an "about to" notification and its
    /// completion, when the render lock guarantees the worker has returned it.
    pub fn with_context<R, F>(&mut self, f: F) -> Option<R>
    where
        F: FnOnce(&mut C) -> R,
    {
        self.debug_assert_ui_thread();
        self.reclaim();

        let context = self.context.as_mut()?;
        context.make_current();
        let out = f(context);
        context.done_current();
        Some(out)
    }

    /// Forwards the new drawable size to the block. Every resize is forwarded.
    pub fn resize_gl(&self, width: u32, height: u32) {
        log::trace!("reshape {width}x{height}");
        self.block.cb_reshape(width, height);
    }

    /// Paint requests from the host are ignored.
    ///
    /// Painting on the UI thread would make the context current here, behind
    /// the worker's back. Context currency is only ever changed by the handoff.
    pub fn paint(&self) {}

    /// Translates a key press and forwards the action, if any, to the block.
    pub fn key_press(&self, key: Key) -> Option<ActionCode> {
        let action = translate_key(key)?;
        log::debug!("key {key} -> {action}");
        self.block.execute_ui_action(action);
        Some(action)
    }

    /// Moves the parked context to `target`.
    ///
    /// This is the only place where a context changes affinity towards a
    /// worker. It runs on the UI thread while the requesting worker is blocked
    /// on the reply, so the move is complete before the worker touches it.
    fn give_context(&mut self, target: ThreadId) -> HandoffReply<C> {
        self.reclaim();

        let Some(mut context) = self.context.take() else {
            log::warn!("grab request from {target:?} while the context is {}", self.owner());
            return Err(HandoffError::Unavailable);
        };

        context.move_to_thread(target);
        self.state.set_owner(ContextOwner::Worker(target));
        log::trace!("context given to {target:?}");

        Ok(context)
    }

    fn answer(&mut self, request: HandoffRequest<C>) {
        let reply = self.give_context(request.target);

        // The requester died before its reply arrived. The context already
        // belongs to that thread, so it cannot be moved back from here.
        if let Err(SendError(Ok(context))) = request.reply.send(reply) {
            log::error!("grab requester {:?} vanished; context lost", request.target);
            drop(context);
            self.state.set_owner(ContextOwner::Ui);
        }
    }

    /// Parks contexts released by workers back on the UI side.
    fn reclaim(&mut self) {
        while let Ok(context) = self.channels.returns_rx.try_recv() {
            if self.context.replace(context).is_some() {
                log::warn!("context returned while another is parked; dropping the parked one");
            }
        }
    }

    fn lock_render_servicing(&mut self) {
        if self.holds_lock {
            log::trace!("render lock already held by the UI side");
            return;
        }

        let block = Arc::clone(&self.block);
        block.render_lock().acquire_servicing(|| {
            self.service_handoffs();
        });
        self.holds_lock = true;
    }

    fn unlock_render(&mut self) {
        if !self.holds_lock {
            log::trace!("render lock not held by the UI side; nothing to release");
            return;
        }

        self.holds_lock = false;
        self.block.unlock_render();
    }

    /// Completion notifications release the lock, except before the context
    /// exists: the construction-time hold lasts until `context_initialized`.
    fn finish_notification(&mut self) {
        if self.ready {
            self.unlock_render();
        }
    }

    fn debug_assert_ui_thread(&self) {
        debug_assert_eq!(
            thread::current().id(),
            self.ui_thread,
            "surface used off its UI thread"
        );
    }
}

impl<C, B> SurfaceLifecycle for Surface<C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    fn about_to_compose(&mut self) {
        log::trace!("about to compose");
        self.lock_render_servicing();
    }

    fn frame_swapped(&mut self) {
        log::trace!("frame swapped");
        self.finish_notification();
    }

    fn about_to_resize(&mut self) {
        log::debug!("about to resize");
        self.lock_render_servicing();
    }

    fn resized(&mut self) {
        log::debug!("resized");
        self.finish_notification();
    }
}

impl<C, B> Drop for Surface<C, B>
where
    C: GpuContext,
    B: ProcessingBlock,
{
    fn drop(&mut self) {
        while let Ok(request) = self.channels.requests_rx.try_recv() {
            let _ = request.reply.send(Err(HandoffError::Disconnected));
        }

        // A worker parked on the lock wakes up, fails its grab with
        // `Disconnected` and can wind down.
        self.unlock_render();
        log::debug!("surface dropped");
    }
}
