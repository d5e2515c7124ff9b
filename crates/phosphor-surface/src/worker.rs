//! The render worker: a thread that draws through the handoff protocol.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::context::{GpuContext, HandoffError};
use crate::surface::{ContextHandle, ProcessingBlock, Surface};
use crate::time::{FramePacer, FrameTime};

const SHUTDOWN_PUMP: Duration = Duration::from_millis(2);

/// Owns the render thread.
///
/// Each frame the thread waits for its pacer slot, takes the render lock,
/// grabs the context, calls `draw`, releases the context and only then drops
/// the lock. The loop ends on [`request_stop`](Self::request_stop), when `draw`
/// returns [`ControlFlow::Break`] or once the surface is gone.
///
/// Dropping a `RenderWorker` asks the thread to stop but does not join it;
/// use [`shutdown`](Self::shutdown) from the UI thread for an orderly exit.
pub struct RenderWorker {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl RenderWorker {
    pub fn spawn<C, B, D>(handle: ContextHandle<C, B>, pacer: FramePacer, draw: D) -> Result<Self>
    where
        C: GpuContext,
        B: ProcessingBlock,
        D: FnMut(&mut C, FrameTime) -> ControlFlow<()> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let thread = thread::Builder::new()
            .name("phosphor-render".to_string())
            .spawn(move || render_loop(handle, pacer, draw, &thread_stop))
            .context("failed to spawn render thread")?;

        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Whether the loop was asked to stop or has ended on its own.
    ///
    /// Unlike [`is_finished`](Self::is_finished) this turns true before the
    /// thread exits; use [`shutdown`](Self::shutdown) to wait for it.
    pub fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire) || self.is_finished()
    }

    /// Stops the worker and waits for it, answering its handoff requests
    /// meanwhile.
    ///
    /// Must run on the surface's UI thread, outside any "about to" /
    /// completion notification pair.
    pub fn shutdown<C, B>(mut self, surface: &mut Surface<C, B>) -> Result<()>
    where
        C: GpuContext,
        B: ProcessingBlock,
    {
        self.request_stop();

        let Some(thread) = self.thread.take() else {
            return Ok(());
        };

        while !thread.is_finished() {
            surface.wait_for_handoff(SHUTDOWN_PUMP);
        }

        thread
            .join()
            .map_err(|_| anyhow!("render thread panicked"))?;

        log::debug!("render worker joined");
        Ok(())
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.request_stop();
    }
}

fn render_loop<C, B, D>(
    handle: ContextHandle<C, B>,
    mut pacer: FramePacer,
    mut draw: D,
    stop: &AtomicBool,
) where
    C: GpuContext,
    B: ProcessingBlock,
    D: FnMut(&mut C, FrameTime) -> ControlFlow<()>,
{
    log::debug!("render loop started");

    while !stop.load(Ordering::Acquire) {
        let time = pacer.wait();

        let _guard = handle.lock_render();
        if stop.load(Ordering::Acquire) {
            break;
        }

        match handle.grab_context() {
            Ok(mut context) => {
                let flow = draw(&mut *context, time);
                context.release();

                if flow.is_break() {
                    log::debug!("render loop stopping: draw ended at frame {}", time.frame_index);
                    break;
                }
            }
            Err(HandoffError::Unavailable) => {
                log::trace!("frame {} skipped: no context on the UI side", time.frame_index);
            }
            Err(err) => {
                log::debug!("render loop stopping: {err}");
                break;
            }
        }
    }

    log::debug!("render loop finished");

    // Published before the wake so the host sees it when it looks.
    stop.store(true, Ordering::Release);
    handle.wake_host();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextOwner;
    use crate::surface::test_support::{RecordingBlock, TrackingContext, Tracker};
    use crate::surface::{LifecycleEvent, SurfaceLifecycle};
    use std::sync::atomic::AtomicU64;

    fn ready_surface() -> (Surface<TrackingContext, RecordingBlock>, Arc<Tracker>) {
        let tracker = Arc::new(Tracker::default());
        let mut surface = Surface::new(Arc::new(RecordingBlock::default()));
        surface.context_initialized(TrackingContext::new(Arc::clone(&tracker)));
        (surface, tracker)
    }

    #[test]
    fn draws_frames_until_shutdown() {
        let (mut surface, tracker) = ready_surface();

        let frames = Arc::new(AtomicU64::new(0));
        let worker = {
            let frames = Arc::clone(&frames);
            RenderWorker::spawn(surface.handle(), FramePacer::unpaced(), move |context, time| {
                assert!(context.current_on().is_some());
                frames.store(time.frame_index + 1, Ordering::SeqCst);
                ControlFlow::Continue(())
            })
            .unwrap()
        };

        while frames.load(Ordering::SeqCst) < 20 {
            surface.notify(LifecycleEvent::AboutToCompose);
            surface.notify(LifecycleEvent::FrameSwapped);
            surface.wait_for_handoff(Duration::from_millis(1));
        }

        worker.shutdown(&mut surface).unwrap();

        assert_eq!(surface.owner(), ContextOwner::Ui);
        assert!(!surface.block().render_lock().is_held());
        assert_eq!(tracker.violations(), 0);
    }

    #[test]
    fn stops_when_surface_is_dropped() {
        let (surface, _tracker) = ready_surface();
        let worker =
            RenderWorker::spawn(surface.handle(), FramePacer::unpaced(), |_, _| {
                ControlFlow::Continue(())
            })
            .unwrap();

        drop(surface);

        while !worker.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn waits_for_context_before_drawing() {
        let mut surface: Surface<TrackingContext, RecordingBlock> =
            Surface::new(Arc::new(RecordingBlock::default()));

        let frames = Arc::new(AtomicU64::new(0));
        let worker = {
            let frames = Arc::clone(&frames);
            RenderWorker::spawn(surface.handle(), FramePacer::unpaced(), move |_, _| {
                frames.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            })
            .unwrap()
        };

        thread::sleep(Duration::from_millis(30));
        surface.service_handoffs();
        assert_eq!(frames.load(Ordering::SeqCst), 0);

        surface.context_initialized(TrackingContext::new(Arc::new(Tracker::default())));
        while frames.load(Ordering::SeqCst) == 0 {
            surface.wait_for_handoff(Duration::from_millis(1));
        }

        worker.shutdown(&mut surface).unwrap();
    }

    #[test]
    fn draw_break_ends_the_loop() {
        let (mut surface, tracker) = ready_surface();

        let frames = Arc::new(AtomicU64::new(0));
        let worker = {
            let frames = Arc::clone(&frames);
            RenderWorker::spawn(surface.handle(), FramePacer::unpaced(), move |_, time| {
                frames.fetch_add(1, Ordering::SeqCst);
                if time.frame_index >= 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap()
        };

        // Nobody asked it to stop; only the draw result ends the thread.
        while !worker.is_finished() {
            surface.wait_for_handoff(Duration::from_millis(1));
        }

        assert!(worker.is_stopping());
        assert_eq!(frames.load(Ordering::SeqCst), 3);
        assert_eq!(surface.owner(), ContextOwner::Ui);
        assert!(!surface.block().render_lock().is_held());
        assert_eq!(tracker.violations(), 0);

        worker.shutdown(&mut surface).unwrap();
    }

    #[test]
    fn loop_end_wakes_the_host() {
        let (mut surface, _tracker) = ready_surface();

        let wakes = Arc::new(AtomicU64::new(0));
        {
            let wakes = Arc::clone(&wakes);
            surface.set_waker(move || {
                wakes.fetch_add(1, Ordering::SeqCst);
            });
        }

        let worker = RenderWorker::spawn(surface.handle(), FramePacer::unpaced(), |_, _| {
            ControlFlow::Break(())
        })
        .unwrap();

        // One wake for the grab request, one when the loop ends.
        while wakes.load(Ordering::SeqCst) < 2 {
            surface.wait_for_handoff(Duration::from_millis(1));
        }
        assert!(worker.is_stopping());

        worker.shutdown(&mut surface).unwrap();
    }
}
