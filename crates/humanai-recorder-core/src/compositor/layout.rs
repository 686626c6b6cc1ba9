//! Canvas geometry: canvas sizing and webcam overlay placement.

use crate::media::TrackSettings;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canvas width used when the screen track does not report one.
pub const DEFAULT_CANVAS_WIDTH: u32 = 1920;
/// Canvas height used when the screen track does not report one.
pub const DEFAULT_CANVAS_HEIGHT: u32 = 1080;
/// Distance in pixels between the overlay and the canvas edges.
pub const OVERLAY_INSET: f32 = 20.0;

/// Corner of the canvas the webcam overlay is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    #[default]
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl Corner {
    /// Every corner, in reading order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown corner name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown corner '{0}', expected top-left, top-right, bottom-left or bottom-right")]
pub struct ParseCornerError(pub String);

impl FromStr for Corner {
    type Err = ParseCornerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Corner::ALL
            .into_iter()
            .find(|corner| corner.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCornerError(s.to_string()))
    }
}

/// Pixel dimensions of the compositing canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Size the canvas after the screen track's native resolution.
    ///
    /// Each missing or zero dimension falls back to 1920x1080.
    pub fn from_settings(settings: &TrackSettings) -> Self {
        Self {
            width: settings
                .width
                .filter(|w| *w > 0)
                .unwrap_or(DEFAULT_CANVAS_WIDTH),
            height: settings
                .height
                .filter(|h| *h > 0)
                .unwrap_or(DEFAULT_CANVAS_HEIGHT),
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// Rectangle covering the whole canvas.
    pub fn full(canvas: CanvasSize) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: canvas.width as f32,
            height: canvas.height as f32,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Where the webcam overlay is drawn.
///
/// A quarter of the canvas width, 4:3, inset from the chosen corner.
pub fn overlay_rect(canvas: CanvasSize, corner: Corner) -> Rect {
    let canvas_width = canvas.width as f32;
    let canvas_height = canvas.height as f32;

    let width = canvas_width / 4.0;
    let height = width * 3.0 / 4.0;

    let x = match corner {
        Corner::TopLeft | Corner::BottomLeft => OVERLAY_INSET,
        Corner::TopRight | Corner::BottomRight => canvas_width - width - OVERLAY_INSET,
    };
    let y = match corner {
        Corner::TopLeft | Corner::TopRight => OVERLAY_INSET,
        Corner::BottomLeft | Corner::BottomRight => canvas_height - height - OVERLAY_INSET,
    };

    Rect {
        x,
        y,
        width,
        height,
    }
}
