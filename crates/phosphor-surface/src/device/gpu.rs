use std::sync::Arc;
use std::thread::{self, ThreadId};

use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::context::GpuContext;

use super::surface;
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// wgpu device, queue and window surface, usable as a handoff [`GpuContext`].
///
/// wgpu has no notion of a "current" context, but the swapchain is still a
/// single-owner resource: frames acquired on one thread must be presented
/// before another thread touches the surface. `Gpu` records its owning thread
/// and whether it is current, and debug builds assert that frames are only
/// recorded by the owner while current.
pub struct Gpu {
    window: Arc<Window>,

    _instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,

    affinity: ThreadId,
    current: bool,
}

impl Gpu {
    /// Creates the context for `window`, owned by the calling thread.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; hosts drive it
    /// with `pollster::block_on` on the UI thread.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        // May be zero on platforms that size the window lazily.
        let size = window.inner_size();

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            power_preference,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("phosphor device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, prefer_srgb)
            .context("no supported surface formats")?;
        let alpha_mode = surface::choose_alpha_mode(&caps.alpha_modes, alpha_mode);

        let config = surface::initial_config(
            format,
            size,
            present_mode,
            alpha_mode,
            desired_maximum_frame_latency,
        );

        surface.configure(&device, &config);

        let affinity = thread::current().id();
        log::debug!(
            "gpu context created on {affinity:?}: {} ({:?}), {format:?}",
            adapter.get_info().name,
            adapter.get_info().backend
        );

        Ok(Self {
            window,
            _instance: instance,
            surface,
            adapter,
            device,
            queue,
            config,
            size,
            affinity,
            current: false,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Thread the context currently belongs to.
    pub fn affinity(&self) -> ThreadId {
        self.affinity
    }

    pub fn is_current(&self) -> bool {
        self.current
    }

    /// Reconfigures the swapchain for a new drawable size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.debug_assert_usable("resize");

        self.size = new_size;
        if surface::resize_config(&mut self.config, new_size) {
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Acquires the next swapchain image and creates an encoder for it.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, wgpu::SurfaceError> {
        self.debug_assert_usable("begin_frame");

        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("phosphor frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the image.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);

        self.window.pre_present_notify();
        surface_texture.present();
    }

    /// Maps an acquisition error to an action, reconfiguring the surface when
    /// that is what the error calls for.
    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        let action = surface::classify_surface_error(&err);
        if action == SurfaceErrorAction::Reconfigured && self.size.width > 0 && self.size.height > 0 {
            self.surface.configure(&self.device, &self.config);
        }
        log::debug!("surface error {err:?}: {action}");
        action
    }

    /// Clears the next image to `color` and presents it.
    pub fn clear_frame(&mut self, color: wgpu::Color) -> std::result::Result<(), SurfaceErrorAction> {
        let mut frame = match self.begin_frame() {
            Ok(f) => f,
            Err(err) => return Err(self.handle_surface_error(err)),
        };

        // Dropped before the encoder moves into submit().
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("phosphor clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.submit(frame);
        Ok(())
    }

    fn debug_assert_usable(&self, what: &str) {
        debug_assert!(
            self.current && thread::current().id() == self.affinity,
            "{what} on a gpu context that is not current on this thread"
        );
    }
}

impl GpuContext for Gpu {
    fn move_to_thread(&mut self, thread: ThreadId) {
        debug_assert!(!self.current, "gpu context moved while current");
        log::trace!("gpu context {:?} -> {thread:?}", self.affinity);
        self.affinity = thread;
    }

    fn make_current(&mut self) {
        debug_assert_eq!(
            thread::current().id(),
            self.affinity,
            "make_current on a thread that does not own the gpu context"
        );
        self.current = true;
    }

    fn done_current(&mut self) {
        self.current = false;
    }
}
