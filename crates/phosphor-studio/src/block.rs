use std::sync::{Mutex, PoisonError};

use phosphor_surface::input::ActionCode;
use phosphor_surface::surface::ProcessingBlock;
use phosphor_surface::sync::RenderLock;

use crate::display::DisplayState;

/// Processing block behind the studio window.
#[derive(Debug, Default)]
pub struct SpectrumBlock {
    render_lock: RenderLock,
    display: Mutex<DisplayState>,
    size: Mutex<(u32, u32)>,
}

impl SpectrumBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> DisplayState {
        self.display
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn size(&self) -> (u32, u32) {
        *self.size.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProcessingBlock for SpectrumBlock {
    fn render_lock(&self) -> &RenderLock {
        &self.render_lock
    }

    fn cb_reshape(&self, width: u32, height: u32) {
        *self.size.lock().unwrap_or_else(PoisonError::into_inner) = (width, height);
        log::debug!("display is now {width}x{height}");
    }

    fn execute_ui_action(&self, action: ActionCode) {
        let mut display = self.display.lock().unwrap_or_else(PoisonError::into_inner);
        display.apply(action);
        log::info!("{action}: {display:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_update_display() {
        let block = SpectrumBlock::new();
        block.execute_ui_action(ActionCode::FreezeToggle);
        assert!(block.display().frozen);
    }

    #[test]
    fn reshape_records_size() {
        let block = SpectrumBlock::new();
        block.cb_reshape(800, 600);
        assert_eq!(block.size(), (800, 600));
    }
}
