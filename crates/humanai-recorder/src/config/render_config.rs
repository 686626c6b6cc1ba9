use crate::config::default_refresh_rate_hz;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Render loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Display refresh rate the compositor ticks at.
    #[serde(default = "default_refresh_rate_hz")]
    pub refresh_rate_hz: u32,
}

impl RenderConfig {
    /// Time between two render ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_rate_hz.max(1)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: default_refresh_rate_hz(),
        }
    }
}
