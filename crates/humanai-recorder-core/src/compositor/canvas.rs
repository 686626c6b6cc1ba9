use crate::{
    CoreResult, RecorderError,
    compositor::{CanvasSize, Rect},
    media::VideoFrame,
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use image::{
    Rgba, RgbaImage,
    imageops::{self, FilterType},
};

/// Opaque black, what an alpha-less canvas clears to.
const CLEAR_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// The compositing surface.
pub struct RgbaCanvas {
    image: RgbaImage,
}

impl RgbaCanvas {
    /// Create a cleared canvas.
    pub fn new(size: CanvasSize) -> Self {
        Self {
            image: RgbaImage::from_pixel(size.width, size.height, CLEAR_COLOR),
        }
    }

    /// Canvas dimensions.
    pub fn size(&self) -> CanvasSize {
        CanvasSize {
            width: self.image.width(),
            height: self.image.height(),
        }
    }

    /// Fill the canvas with the clear color.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = CLEAR_COLOR;
        }
    }

    /// Draw `frame` scaled into `rect`. Parts outside the canvas are clipped.
    ///
    /// # Errors
    ///
    /// `TransientDraw` if the frame or the target rectangle has no pixels.
    #[track_caller]
    pub fn draw(&mut self, frame: &RgbaImage, rect: Rect) -> CoreResult<()> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(RecorderError::TransientDraw {
                reason: "source frame has no pixels".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let width = rect.width.round();
        let height = rect.height.round();
        if width.is_nan() || height.is_nan() || width < 1.0 || height < 1.0 {
            return Err(RecorderError::TransientDraw {
                reason: format!("target rectangle {}x{} is empty", rect.width, rect.height),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let (width, height) = (width as u32, height as u32);
        let (x, y) = (rect.x.round() as i64, rect.y.round() as i64);

        if frame.dimensions() == (width, height) {
            imageops::replace(&mut self.image, frame, x, y);
        } else {
            let scaled = imageops::resize(frame, width, height, FilterType::Triangle);
            imageops::replace(&mut self.image, &scaled, x, y);
        }

        Ok(())
    }

    /// Borrow the current pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Copy the current pixels into a shareable frame.
    pub fn snapshot(&self) -> VideoFrame {
        Arc::new(self.image.clone())
    }
}
