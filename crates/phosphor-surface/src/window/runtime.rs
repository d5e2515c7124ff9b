use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit};
use crate::input::KeyState;
use crate::input::platform::winit::translate_key_event;
use crate::surface::{ContextHandle, ProcessingBlock, Surface, SurfaceLifecycle};
use crate::time::FramePacer;
use crate::worker::RenderWorker;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Render worker frame rate; `None` lets the present mode pace it.
    pub target_fps: Option<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "phosphor".to_string(),
            initial_size: LogicalSize::new(1024.0, 640.0),
            target_fps: Some(60),
        }
    }
}

/// User event sent by the render thread to wake the loop.
#[derive(Debug, Copy, Clone)]
enum HostEvent {
    HandoffPending,
}

/// Entry point for the host loop.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop on the calling thread until the window closes.
    ///
    /// `start_worker` is called once the GPU context exists. It receives the
    /// worker-side handle and a pacer built from `config.target_fps`. The loop
    /// also exits once the worker's thread finishes on its own.
    pub fn run<B, F>(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        block: Arc<B>,
        start_worker: F,
    ) -> Result<()>
    where
        B: ProcessingBlock,
        F: FnOnce(ContextHandle<Gpu, B>, FramePacer) -> Result<RenderWorker> + 'static,
    {
        let event_loop = EventLoop::<HostEvent>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;

        let proxy = Mutex::new(event_loop.create_proxy());
        let surface = Surface::new(block);
        surface.set_waker(move || {
            let proxy = proxy.lock().unwrap_or_else(PoisonError::into_inner);
            // Fails only once the loop has exited; nothing left to wake.
            let _ = proxy.send_event(HostEvent::HandoffPending);
        });

        let mut state = HostState {
            config,
            gpu_init,
            surface,
            start_worker: Some(start_worker),
            window: None,
            worker: None,
            failure: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct HostState<B, F>
where
    B: ProcessingBlock,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    surface: Surface<Gpu, B>,
    start_worker: Option<F>,

    window: Option<Arc<Window>>,
    worker: Option<RenderWorker>,

    failure: Option<anyhow::Error>,
}

impl<B, F> HostState<B, F>
where
    B: ProcessingBlock,
    F: FnOnce(ContextHandle<Gpu, B>, FramePacer) -> Result<RenderWorker>,
{
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(Gpu::new(Arc::clone(&window), self.gpu_init.clone()))
            .context("GPU initialization failed")?;
        let size = gpu.size();

        self.surface.context_initialized(gpu);
        self.surface.resize_gl(size.width, size.height);

        if let Some(start_worker) = self.start_worker.take() {
            let pacer = FramePacer::new(self.config.target_fps);
            self.worker = Some(start_worker(self.surface.handle(), pacer)?);
        }

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure.get_or_insert(err);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(worker) = self.worker.take() {
            if let Err(err) = worker.shutdown(&mut self.surface) {
                log::error!("{err:#}");
                self.failure.get_or_insert(err);
            }
        }
        event_loop.exit();
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.surface.about_to_resize();
        self.surface.with_context(|gpu| gpu.resize(new_size));
        self.surface.resized();
        self.surface.resize_gl(new_size.width, new_size.height);
    }

    fn compose(&mut self) {
        // The worker presents its own frames; composing only gives the UI side
        // its slot between two draws.
        self.surface.about_to_compose();
        self.surface.paint();
        self.surface.frame_swapped();
    }
}

impl<B, F> ApplicationHandler<HostEvent> for HostState<B, F>
where
    B: ProcessingBlock,
    F: FnOnce(ContextHandle<Gpu, B>, FramePacer) -> Result<RenderWorker>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err.context("failed to start display"));
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: HostEvent) {
        match event {
            HostEvent::HandoffPending => {
                self.surface.service_handoffs();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        self.surface.service_handoffs();

        // The draw callback ended the render loop; nothing will draw anymore.
        if self.worker.as_ref().is_some_and(RenderWorker::is_stopping) {
            log::info!("render worker finished; closing");
            self.shutdown(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = window.inner_size();
                self.resize(new_size);
            }

            WindowEvent::RedrawRequested => self.compose(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some((key, KeyState::Pressed)) = translate_key_event(&event) {
                    self.surface.key_press(key);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.shutdown(event_loop);
    }
}
