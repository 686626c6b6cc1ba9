//! Test patterns drawn by the synthetic video devices.

use image::{Rgba, RgbaImage};

/// Colors of the scrolling display bars, left to right at frame 0.
pub(crate) const DISPLAY_BAR_COLORS: [[u8; 4]; 8] = [
    [255, 255, 255, 255],
    [255, 255, 0, 255],
    [0, 255, 255, 255],
    [0, 255, 0, 255],
    [255, 0, 255, 255],
    [255, 0, 0, 255],
    [0, 0, 255, 255],
    [16, 16, 16, 255],
];

/// Pixels the display bars move per frame.
const DISPLAY_SCROLL_PER_FRAME: u64 = 4;

const WEBCAM_SQUARE: u32 = 40;
const WEBCAM_LIGHT: Rgba<u8> = Rgba([230, 190, 160, 255]);
const WEBCAM_DARK: Rgba<u8> = Rgba([60, 45, 40, 255]);
/// Frames between checkerboard phase flips.
const WEBCAM_FLIP_FRAMES: u64 = 15;

/// Vertical color bars scrolling left to right.
pub(crate) fn display_pattern(width: u32, height: u32, frame_index: u64) -> RgbaImage {
    let bar_width = u64::from((width / DISPLAY_BAR_COLORS.len() as u32).max(1));
    let offset = frame_index.wrapping_mul(DISPLAY_SCROLL_PER_FRAME);
    let span = bar_width * DISPLAY_BAR_COLORS.len() as u64;

    RgbaImage::from_fn(width, height, |x, _| {
        let shifted = (u64::from(x) + span - offset % span) % span;
        Rgba(DISPLAY_BAR_COLORS[(shifted / bar_width) as usize % DISPLAY_BAR_COLORS.len()])
    })
}

/// A checkerboard that inverts twice a second at 30 fps.
pub(crate) fn webcam_pattern(width: u32, height: u32, frame_index: u64) -> RgbaImage {
    let phase = (frame_index / WEBCAM_FLIP_FRAMES) % 2;

    RgbaImage::from_fn(width, height, |x, y| {
        let cell = u64::from(x / WEBCAM_SQUARE + y / WEBCAM_SQUARE);
        if (cell + phase) % 2 == 0 {
            WEBCAM_LIGHT
        } else {
            WEBCAM_DARK
        }
    })
}
