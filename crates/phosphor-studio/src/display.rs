use phosphor_surface::input::ActionCode;

const DB_PER_DIV_MAX: u32 = 100;

/// View parameters of the spectrum display, changed by key actions.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    /// Reference level at the top of the screen (dB).
    pub db_ref: i32,
    pub db_per_div: u32,

    pub zoom_enabled: bool,
    /// Zoomed span as a fraction of the full bandwidth.
    pub zoom_width: f64,
    /// Zoom center as a fraction of the full bandwidth.
    pub zoom_center: f64,

    /// Screen share of the spectrum trace vs. the waterfall.
    pub ratio: f32,
    pub frozen: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            db_ref: 0,
            db_per_div: 10,
            zoom_enabled: false,
            zoom_width: 0.2,
            zoom_center: 0.5,
            ratio: 0.35,
            frozen: false,
        }
    }
}

impl DisplayState {
    pub fn apply(&mut self, action: ActionCode) {
        match action {
            ActionCode::RefUp => self.db_ref += self.db_per_div as i32,
            ActionCode::RefDown => self.db_ref -= self.db_per_div as i32,

            ActionCode::DbPerDivUp => {
                let step = if self.db_per_div < 10 { 1 } else { 10 };
                self.db_per_div = (self.db_per_div + step).min(DB_PER_DIV_MAX);
            }
            ActionCode::DbPerDivDown => {
                let step = if self.db_per_div > 10 { 10 } else { 1 };
                self.db_per_div = self.db_per_div.saturating_sub(step).max(1);
            }

            ActionCode::ZoomToggle => self.zoom_enabled = !self.zoom_enabled,

            // Zoom geometry only moves while zoom is on.
            ActionCode::ZoomWidthUp if self.zoom_enabled => {
                self.zoom_width = (self.zoom_width * 2.0).min(1.0);
            }
            ActionCode::ZoomWidthDown if self.zoom_enabled => self.zoom_width /= 2.0,
            ActionCode::ZoomCenterUp if self.zoom_enabled => {
                self.zoom_center = (self.zoom_center + self.zoom_width / 8.0).min(1.0);
            }
            ActionCode::ZoomCenterDown if self.zoom_enabled => {
                self.zoom_center = (self.zoom_center - self.zoom_width / 8.0).max(0.0);
            }
            ActionCode::ZoomWidthUp
            | ActionCode::ZoomWidthDown
            | ActionCode::ZoomCenterUp
            | ActionCode::ZoomCenterDown => {}

            ActionCode::RatioUp => self.ratio = (self.ratio + 0.1).min(0.8),
            ActionCode::RatioDown => self.ratio = (self.ratio - 0.1).max(0.2),

            ActionCode::FreezeToggle => self.frozen = !self.frozen,
        }
    }

    /// Background colour for the current view; `phase` animates it.
    ///
    /// Stands in for real spectrum drawing: every parameter the keys change
    /// shows up as a visible shift.
    pub fn clear_color(&self, phase: f32) -> wgpu::Color {
        let level = ((self.db_ref + 100) as f64 / 200.0).clamp(0.0, 1.0);
        let pulse = 0.5 + 0.5 * f64::from(phase).sin();
        let scale = f64::from(self.db_per_div) / f64::from(DB_PER_DIV_MAX);

        let zoom = if self.zoom_enabled { self.zoom_center } else { 0.0 };

        wgpu::Color {
            r: 0.1 * pulse + 0.3 * zoom,
            g: 0.2 + 0.6 * level * f64::from(self.ratio),
            b: 0.2 + 0.5 * scale,
            a: 1.0,
        }
    }
}
