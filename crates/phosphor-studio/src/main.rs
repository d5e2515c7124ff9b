mod block;
mod display;

use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::Result;
use phosphor_surface::device::{Gpu, GpuInit, SurfaceErrorAction};
use phosphor_surface::logging::{LoggingConfig, init_logging};
use phosphor_surface::window::{Runtime, RuntimeConfig};
use phosphor_surface::worker::RenderWorker;

use crate::block::SpectrumBlock;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    log::info!("keys: arrows = level/scale, z/w/s/a/d = zoom, q/e = ratio, space = freeze");

    let block = Arc::new(SpectrumBlock::new());
    let config = RuntimeConfig {
        title: "phosphor studio".to_string(),
        ..RuntimeConfig::default()
    };

    let worker_block = Arc::clone(&block);
    Runtime::run(config, GpuInit::default(), block, move |handle, pacer| {
        let mut phase = 0.0f32;

        RenderWorker::spawn(handle, pacer, move |gpu: &mut Gpu, time| {
            let display = worker_block.display();
            if !display.frozen {
                phase += time.dt * 2.0;
            }

            frame_flow(time.frame_index, gpu.clear_frame(display.clear_color(phase)))
        })
    })
}

/// Keeps drawing through transient surface errors; stops on a fatal one.
fn frame_flow(frame: u64, result: Result<(), SurfaceErrorAction>) -> ControlFlow<()> {
    match result {
        Ok(()) => ControlFlow::Continue(()),
        Err(SurfaceErrorAction::Fatal) => {
            log::error!("frame {frame}: fatal surface error; stopping");
            ControlFlow::Break(())
        }
        Err(action) => {
            log::debug!("frame {frame}: {action}");
            ControlFlow::Continue(())
        }
    }
}
