//! Colors for status glyphs, summary labels and droplet states.

use owo_colors::Style;

use crate::domain::HostState;

/// Plain until [`Styles::colorize`] runs.
#[derive(Default, Clone)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    /// Summary labels.
    pub dim: Style,
    pub header: Style,
}

impl Styles {
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
        self.header = Style::new().bold().cyan();
    }

    /// Running droplets are green, booting ones yellow and stopped ones red.
    #[must_use]
    pub fn for_state(&self, state: HostState) -> Style {
        match state {
            HostState::Active => self.success,
            HostState::Pending => self.warning,
            HostState::Off => self.error,
        }
    }
}
