use std::sync::{Arc, Mutex, PoisonError};
use std::thread::ThreadId;

use crossbeam_channel::{Receiver, Sender, unbounded};

use super::{ContextOwner, HandoffError};

/// Callback that nudges the host event loop to service pending handoffs.
pub(crate) type Waker = Arc<dyn Fn() + Send + Sync>;

/// What the UI thread sends back for a [`HandoffRequest`].
pub(crate) type HandoffReply<C> = Result<C, HandoffError>;

/// Worker → UI: "move the context to `target` and send it to me".
pub(crate) struct HandoffRequest<C> {
    pub target: ThreadId,
    pub reply: Sender<HandoffReply<C>>,
}

/// Ownership bookkeeping shared by the surface and every worker handle.
///
/// This guards the *record* of who owns the context, never the context itself.
pub(crate) struct HandoffState {
    owner: Mutex<ContextOwner>,
    waker: Mutex<Option<Waker>>,
}

impl HandoffState {
    pub fn new() -> Self {
        Self {
            owner: Mutex::new(ContextOwner::Ui),
            waker: Mutex::new(None),
        }
    }

    pub fn owner(&self) -> ContextOwner {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_owner(&self, owner: ContextOwner) {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = owner;
    }

    pub fn set_waker(&self, waker: Waker) {
        *self.waker.lock().unwrap_or_else(PoisonError::into_inner) = Some(waker);
    }

    /// Invokes the host waker, if one is installed.
    pub fn wake(&self) {
        // Clone out so the host callback never runs under our mutex.
        let waker = self
            .waker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(waker) = waker {
            waker();
        }
    }
}

/// The two queues of the protocol.
///
/// `requests` carries grab requests to the UI thread (single consumer: the
/// surface). `returns` carries released contexts back; the surface drains it
/// before every UI-side use.
pub(crate) struct HandoffChannels<C> {
    pub requests_tx: Sender<HandoffRequest<C>>,
    pub requests_rx: Receiver<HandoffRequest<C>>,
    pub returns_tx: Sender<C>,
    pub returns_rx: Receiver<C>,
}

impl<C> HandoffChannels<C> {
    pub fn new() -> Self {
        let (requests_tx, requests_rx) = unbounded();
        let (returns_tx, returns_rx) = unbounded();
        Self {
            requests_tx,
            requests_rx,
            returns_tx,
            returns_rx,
        }
    }
}
