mod canvas;
mod frame_compositor;
mod layout;

pub use {
    canvas::RgbaCanvas,
    frame_compositor::{CompositorState, FrameCompositor, TickOutcome},
    layout::{
        CanvasSize, Corner, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, OVERLAY_INSET,
        ParseCornerError, Rect, overlay_rect,
    },
};
