mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod encoder_config;
mod output_config;
mod recorder_config;
mod render_config;

pub(crate) use {
    capture_config::{CaptureConfig, CaptureDevice},
    config::Config,
    encoder_config::EncoderConfig,
    output_config::OutputConfig,
    recorder_config::RecorderConfig,
    render_config::RenderConfig,
};

pub(crate) const DEFAULT_SHOW_WEBCAM: bool = true;
pub(crate) const DEFAULT_FINALIZE_TIMEOUT_MS: u64 = 5_000;
pub(crate) const DEFAULT_DISPLAY_WIDTH: u32 = 1920;
pub(crate) const DEFAULT_DISPLAY_HEIGHT: u32 = 1080;
pub(crate) const DEFAULT_WEBCAM_WIDTH: u32 = 640;
pub(crate) const DEFAULT_WEBCAM_HEIGHT: u32 = 480;
pub(crate) const DEFAULT_SYSTEM_AUDIO: bool = true;
pub(crate) const DEFAULT_REFRESH_RATE_HZ: u32 = 60;
pub(crate) const MAX_REFRESH_RATE_HZ: u32 = 240;
pub(crate) const DEFAULT_REVEAL_AFTER_DOWNLOAD: bool = false;

pub(crate) fn default_show_webcam() -> bool {
    DEFAULT_SHOW_WEBCAM
}

pub(crate) fn default_finalize_timeout_ms() -> u64 {
    DEFAULT_FINALIZE_TIMEOUT_MS
}

pub(crate) fn default_display_width() -> u32 {
    DEFAULT_DISPLAY_WIDTH
}

pub(crate) fn default_display_height() -> u32 {
    DEFAULT_DISPLAY_HEIGHT
}

pub(crate) fn default_webcam_width() -> u32 {
    DEFAULT_WEBCAM_WIDTH
}

pub(crate) fn default_webcam_height() -> u32 {
    DEFAULT_WEBCAM_HEIGHT
}

pub(crate) fn default_system_audio() -> bool {
    DEFAULT_SYSTEM_AUDIO
}

pub(crate) fn default_refresh_rate_hz() -> u32 {
    DEFAULT_REFRESH_RATE_HZ
}

pub(crate) fn default_reveal_after_download() -> bool {
    DEFAULT_REVEAL_AFTER_DOWNLOAD
}
