use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct LockState {
    held: bool,

    /// Handoff requests posted since the UI side last serviced its queue.
    pending_service: u64,
}

/// Binary gate between UI-side context use and worker-side drawing.
///
/// Unlike `std::sync::Mutex`, the lock is not tied to the thread or scope that
/// acquired it: the UI thread acquires it in one lifecycle callback and
/// releases it in another. `release` wakes every waiter; each one re-checks the
/// state under the internal mutex, so at most one proceeds per release.
#[derive(Debug, Default)]
pub struct RenderLock {
    state: Mutex<LockState>,
    changed: Condvar,
}

impl RenderLock {
    /// Creates a free lock.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, LockState> {
        // The state is two plain fields; a panic elsewhere cannot leave it torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, LockState>) -> MutexGuard<'a, LockState> {
        self.changed
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until the lock is free, then marks it held.
    pub fn acquire(&self) {
        let mut state = self.state();
        while state.held {
            state = self.wait(state);
        }
        state.held = true;
    }

    /// Marks the lock held if it is free. Never blocks.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state();
        if state.held {
            return false;
        }
        state.held = true;
        true
    }

    /// Like [`acquire`](Self::acquire) but gives up after `timeout`.
    ///
    /// Returns `true` if the lock was acquired.
    pub fn acquire_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state();

        while state.held {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }

            let (next, _) = self
                .changed
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            state = next;
        }

        state.held = true;
        true
    }

    /// Acquires the lock from the UI thread.
    ///
    /// While the lock is held elsewhere, `service` runs each time a worker
    /// signals a pending handoff through [`request_service`](Self::request_service).
    /// A worker may hold this lock while it waits for the UI thread to hand it
    /// the context; servicing here lets that round trip finish so the worker
    /// can draw and release.
    pub fn acquire_servicing<F>(&self, mut service: F)
    where
        F: FnMut(),
    {
        let mut state = self.state();
        loop {
            if !state.held {
                state.held = true;
                return;
            }

            if state.pending_service > 0 {
                state.pending_service = 0;
                drop(state);
                service();
                state = self.state();
                continue;
            }

            state = self.wait(state);
        }
    }

    /// Signals that a handoff request is waiting for the UI thread.
    ///
    /// Plain [`acquire`](Self::acquire) callers wake up, find the lock still
    /// held and go back to sleep.
    pub fn request_service(&self) {
        let mut state = self.state();
        state.pending_service = state.pending_service.saturating_add(1);
        drop(state);
        self.changed.notify_all();
    }

    /// Marks the lock free and wakes all waiters.
    ///
    /// Releasing a free lock is a no-op apart from the wake-up.
    pub fn release(&self) {
        let mut state = self.state();
        state.held = false;
        drop(state);
        self.changed.notify_all();
    }

    /// Returns whether the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.state().held
    }

    /// Acquires the lock and returns a guard that releases it on drop.
    pub fn lock(&self) -> RenderGuard<'_> {
        self.acquire();
        RenderGuard { lock: self }
    }
}

/// Scoped hold on a [`RenderLock`]; releases it when dropped.
#[must_use = "the render lock is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct RenderGuard<'a> {
    lock: &'a RenderLock,
}

impl Drop for RenderGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    const SETTLE: Duration = Duration::from_millis(50);

    #[test]
    fn new_lock_is_free() {
        let lock = RenderLock::new();
        assert!(!lock.is_held());
        assert!(lock.try_acquire());
        assert!(lock.is_held());
    }

    #[test]
    fn try_acquire_fails_while_held() {
        let lock = RenderLock::new();
        lock.acquire();
        assert!(!lock.try_acquire());
        lock.release();
        assert!(lock.try_acquire());
    }

    #[test]
    fn acquire_timeout_expires_while_held() {
        let lock = RenderLock::new();
        lock.acquire();
        assert!(!lock.acquire_timeout(Duration::from_millis(20)));
        assert!(lock.is_held());
    }

    #[test]
    fn release_of_free_lock_is_harmless() {
        let lock = RenderLock::new();
        lock.release();
        assert!(!lock.is_held());
    }

    #[test]
    fn guard_releases_on_drop() {
        let lock = RenderLock::new();
        {
            let _guard = lock.lock();
            assert!(lock.is_held());
        }
        assert!(!lock.is_held());
    }

    #[test]
    fn blocked_acquire_returns_only_after_release() {
        let lock = Arc::new(RenderLock::new());
        lock.acquire();

        let passed = Arc::new(AtomicBool::new(false));
        let waiter = {
            let lock = Arc::clone(&lock);
            let passed = Arc::clone(&passed);
            thread::spawn(move || {
                lock.acquire();
                passed.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(SETTLE);
        assert!(!passed.load(Ordering::SeqCst));

        lock.release();
        waiter.join().unwrap();
        assert!(passed.load(Ordering::SeqCst));
        assert!(lock.is_held());
    }

    #[test]
    fn release_lets_one_of_many_waiters_through() {
        let lock = Arc::new(RenderLock::new());
        lock.acquire();

        let passed = Arc::new(AtomicUsize::new(0));
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let lock = Arc::clone(&lock);
                let passed = Arc::clone(&passed);
                thread::spawn(move || {
                    lock.acquire();
                    passed.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        thread::sleep(SETTLE);
        assert_eq!(passed.load(Ordering::SeqCst), 0);

        lock.release();
        thread::sleep(SETTLE);
        assert_eq!(passed.load(Ordering::SeqCst), 1);

        for expected in 2..=3 {
            lock.release();
            while passed.load(Ordering::SeqCst) < expected {
                thread::yield_now();
            }
        }
        for w in waiters {
            w.join().unwrap();
        }
        assert_eq!(passed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn acquire_servicing_runs_service_while_waiting() {
        let lock = Arc::new(RenderLock::new());
        lock.acquire();

        let serviced = Arc::new(AtomicBool::new(false));

        // Stands in for a worker that holds the lock and needs the UI thread
        // to answer before it can let go.
        let holder = {
            let lock = Arc::clone(&lock);
            let serviced = Arc::clone(&serviced);
            thread::spawn(move || {
                lock.request_service();
                while !serviced.load(Ordering::SeqCst) {
                    thread::yield_now();
                }
                lock.release();
            })
        };

        lock.acquire_servicing(|| serviced.store(true, Ordering::SeqCst));
        holder.join().unwrap();

        assert!(serviced.load(Ordering::SeqCst));
        assert!(lock.is_held());
    }

    #[test]
    fn acquire_servicing_on_free_lock_skips_service() {
        let lock = RenderLock::new();
        lock.request_service();

        let mut calls = 0;
        lock.acquire_servicing(|| calls += 1);

        assert_eq!(calls, 0);
        assert!(lock.is_held());
    }
}
