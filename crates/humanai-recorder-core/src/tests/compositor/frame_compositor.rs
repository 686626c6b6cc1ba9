use crate::{
    Corner, FrameCompositor, TickOutcome, TrackSettings,
    tests::fakes::{
        SCREEN_COLOR, StopCounter, WEBCAM_COLOR, pending_video_track, ready_video_track,
        solid_frame,
    },
};

use std::sync::Arc;

use image::RgbaImage;

/// 320x240 screen puts a top-right 80x60 overlay at (220, 20).
fn compositor(corner: Corner, visible: bool) -> (FrameCompositor, StopCounter) {
    let stops = StopCounter::default();
    let screen = ready_video_track("screen", solid_frame(320, 240, SCREEN_COLOR), &stops);
    let webcam = ready_video_track("webcam", solid_frame(64, 48, WEBCAM_COLOR), &stops);
    (FrameCompositor::new(screen, Some(webcam), corner, visible), stops)
}

fn pixel(compositor: &FrameCompositor, x: u32, y: u32) -> [u8; 4] {
    compositor.canvas().get_pixel(x, y).0
}

/// WHAT: A tick draws the screen full-canvas and the webcam in its corner
/// WHY: This is the picture the recording contains
#[test]
fn given_screen_and_webcam_when_ticking_then_overlay_drawn_in_top_right() {
    // Given: A compositor with the overlay top-right
    let (mut compositor, _stops) = compositor(Corner::TopRight, true);

    // When: One tick runs
    let outcome = compositor.render_tick();

    // Then: Overlay region is webcam, the rest is screen
    assert_eq!(outcome, TickOutcome::Continue);
    assert_eq!(compositor.frames_drawn(), 1);
    assert_eq!(compositor.canvas().dimensions(), (320, 240));
    assert_eq!(pixel(&compositor, 260, 50), WEBCAM_COLOR);
    assert_eq!(pixel(&compositor, 10, 10), SCREEN_COLOR);
    assert_eq!(pixel(&compositor, 40, 200), SCREEN_COLOR);
}

/// WHAT: Hiding the webcam removes the overlay from the next frame
/// WHY: Visibility toggles take effect on the next tick
#[test]
fn given_visible_overlay_when_hidden_then_next_frame_shows_screen_only() {
    // Given: A frame with the overlay drawn
    let (mut compositor, _stops) = compositor(Corner::TopRight, true);
    compositor.render_tick();
    assert_eq!(pixel(&compositor, 260, 50), WEBCAM_COLOR);

    // When: The overlay is hidden and another tick runs
    compositor.set_webcam_visible(false);
    compositor.render_tick();

    // Then: The overlay region shows the screen
    assert_eq!(pixel(&compositor, 260, 50), SCREEN_COLOR);
    assert!(!compositor.state().webcam_visible);
}

/// WHAT: Moving the overlay applies on the next tick
/// WHY: Users reposition the webcam while recording
#[test]
fn given_top_right_overlay_when_moved_bottom_left_then_next_frame_reflects_move() {
    let (mut compositor, _stops) = compositor(Corner::TopRight, true);
    compositor.render_tick();

    compositor.set_corner(Corner::BottomLeft);
    compositor.render_tick();

    // Bottom-left overlay spans x 20..100, y 160..220
    assert_eq!(pixel(&compositor, 60, 190), WEBCAM_COLOR);
    assert_eq!(pixel(&compositor, 260, 50), SCREEN_COLOR);
    assert_eq!(compositor.state().corner, Corner::BottomLeft);
}

/// WHAT: A failed draw is counted and the loop continues
/// WHY: One bad webcam frame must not end the recording
#[test]
fn given_empty_webcam_frame_when_ticking_then_error_counted_and_loop_continues() {
    // Given: A webcam that yields a frame with no pixels
    let stops = StopCounter::default();
    let screen = ready_video_track("screen", solid_frame(320, 240, SCREEN_COLOR), &stops);
    let webcam = ready_video_track("webcam", Arc::new(RgbaImage::new(0, 0)), &stops);
    let mut compositor = FrameCompositor::new(screen, Some(webcam), Corner::TopRight, true);

    // When: Several ticks run
    let outcomes: Vec<TickOutcome> = (0..3).map(|_| compositor.render_tick()).collect();

    // Then: Every tick continues, each failure counted
    assert!(outcomes.iter().all(|o| *o == TickOutcome::Continue));
    assert_eq!(compositor.draw_errors(), 3);
    assert_eq!(compositor.frames_drawn(), 0);
    assert!(compositor.is_running());

    // And: Hiding the broken webcam lets frames through again
    compositor.set_webcam_visible(false);
    compositor.render_tick();
    assert_eq!(compositor.frames_drawn(), 1);
}

/// WHAT: Sources without a frame yet leave the canvas cleared
/// WHY: The loop starts before devices deliver their first frame
#[test]
fn given_screen_not_ready_when_ticking_then_black_frame_published() {
    // Given: A screen track with no frame and no webcam
    let stops = StopCounter::default();
    let (screen, frames) = pending_video_track("screen", TrackSettings::video(32, 24), &stops);
    let mut compositor = FrameCompositor::new(screen, None, Corner::TopRight, true);
    let published = compositor.canvas_stream();

    // When: A tick runs
    compositor.render_tick();

    // Then: A black frame is published
    assert_eq!(pixel(&compositor, 5, 5), [0, 0, 0, 255]);
    assert!(published.borrow().is_some());

    // And: Once the screen delivers, it is drawn
    frames.send_replace(Some(solid_frame(32, 24, SCREEN_COLOR)));
    compositor.render_tick();
    assert_eq!(pixel(&compositor, 5, 5), SCREEN_COLOR);
    assert_eq!(compositor.frames_drawn(), 2);
}

/// WHAT: The canvas track carries the composited frames
/// WHY: The encoder reads the canvas through an ordinary video track
#[test]
fn given_canvas_track_when_ticking_then_track_sees_latest_canvas() {
    let (mut compositor, _stops) = compositor(Corner::TopLeft, true);
    let track = compositor.canvas_track();
    assert!(track.latest_frame().is_none());
    assert_eq!(track.settings(), TrackSettings::video(320, 240));

    compositor.render_tick();

    let frame = track.latest_frame();
    assert!(frame.is_some_and(|f| f.get_pixel(60, 50).0 == WEBCAM_COLOR));
}

/// WHAT: A stopped compositor halts
/// WHY: The driver loop stops scheduling ticks after Halted
#[test]
fn given_running_compositor_when_stopped_then_tick_halts_without_drawing() {
    let (mut compositor, _stops) = compositor(Corner::TopRight, true);
    compositor.render_tick();

    compositor.stop();
    let outcome = compositor.render_tick();

    assert_eq!(outcome, TickOutcome::Halted);
    assert_eq!(compositor.frames_drawn(), 1);
    assert!(!compositor.is_running());
}

/// WHAT: A screen without reported resolution gets a 1080p canvas
/// WHY: The canvas must always have drawable dimensions
#[test]
fn given_screen_without_settings_when_creating_then_canvas_is_1080p() {
    let stops = StopCounter::default();
    let (screen, _frames) = pending_video_track("screen", TrackSettings::default(), &stops);

    let compositor = FrameCompositor::new(screen, None, Corner::TopRight, true);

    assert_eq!(compositor.canvas().dimensions(), (1920, 1080));
}
