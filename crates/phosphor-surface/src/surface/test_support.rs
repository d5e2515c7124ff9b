//! Test doubles for the handoff protocol.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use crate::context::GpuContext;
use crate::input::ActionCode;
use crate::sync::RenderLock;

use super::ProcessingBlock;

/// Counts how the context is used across all threads.
#[derive(Debug, Default)]
pub(crate) struct Tracker {
    current: AtomicUsize,
    make_current: AtomicUsize,
    violations: AtomicUsize,
}

impl Tracker {
    pub fn violations(&self) -> usize {
        self.violations.load(Ordering::SeqCst)
    }

    pub fn make_current_calls(&self) -> usize {
        self.make_current.load(Ordering::SeqCst)
    }

    fn violation(&self, what: &str) {
        eprintln!("context misuse: {what}");
        self.violations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Context that records affinity misuse instead of crashing a driver.
#[derive(Debug)]
pub(crate) struct TrackingContext {
    affinity: ThreadId,
    current_on: Option<ThreadId>,
    tracker: Arc<Tracker>,
}

impl TrackingContext {
    /// Created with affinity to the calling thread.
    pub fn new(tracker: Arc<Tracker>) -> Self {
        Self {
            affinity: thread::current().id(),
            current_on: None,
            tracker,
        }
    }

    pub fn current_on(&self) -> Option<ThreadId> {
        self.current_on
    }

    fn check_affinity(&self, what: &str) {
        if thread::current().id() != self.affinity {
            self.tracker.violation(what);
        }
    }
}

impl GpuContext for TrackingContext {
    fn move_to_thread(&mut self, thread: ThreadId) {
        self.check_affinity("move_to_thread from a non-owning thread");
        if self.current_on.is_some() {
            self.tracker.violation("moved while current");
        }
        self.affinity = thread;
    }

    fn make_current(&mut self) {
        self.check_affinity("make_current from a non-owning thread");
        if self.tracker.current.fetch_add(1, Ordering::SeqCst) != 0 {
            self.tracker.violation("current on two threads");
        }
        self.tracker.make_current.fetch_add(1, Ordering::SeqCst);
        self.current_on = Some(thread::current().id());
    }

    fn done_current(&mut self) {
        if self.current_on != Some(thread::current().id()) {
            self.tracker.violation("done_current on a thread it is not current on");
        }
        self.tracker.current.fetch_sub(1, Ordering::SeqCst);
        self.current_on = None;
    }
}

/// Processing block that records every callback.
#[derive(Debug, Default)]
pub(crate) struct RecordingBlock {
    lock: RenderLock,
    reshapes: Mutex<Vec<(u32, u32)>>,
    actions: Mutex<Vec<ActionCode>>,
}

impl RecordingBlock {
    pub fn reshapes(&self) -> Vec<(u32, u32)> {
        self.reshapes.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<ActionCode> {
        self.actions.lock().unwrap().clone()
    }
}

impl ProcessingBlock for RecordingBlock {
    fn render_lock(&self) -> &RenderLock {
        &self.lock
    }

    fn cb_reshape(&self, width: u32, height: u32) {
        self.reshapes.lock().unwrap().push((width, height));
    }

    fn execute_ui_action(&self, action: ActionCode) {
        self.actions.lock().unwrap().push(action);
    }
}
