use crate::FrameSampler;

use std::time::{Duration, Instant};

/// WHAT: The first sample emits one frame immediately
/// WHY: The encoder needs a frame as soon as recording starts
#[test]
fn given_new_sampler_when_first_polled_then_one_frame_due() {
    let mut sampler = FrameSampler::new(30);

    let due = sampler.due_frames(Instant::now());

    assert_eq!(due, 1);
    assert_eq!(sampler.emitted(), 1);
}

/// WHAT: Emitted frames track elapsed wall time
/// WHY: Late wake-ups must catch up, early ones must not double-emit
#[test]
fn given_30fps_sampler_when_polled_early_and_late_then_total_matches_elapsed() {
    // Given: A started sampler
    let mut sampler = FrameSampler::new(30);
    let start = Instant::now();
    sampler.due_frames(start);

    // When: Polled before the next frame is due
    let early = sampler.due_frames(start + Duration::from_millis(20));

    // Then: Nothing is due
    assert_eq!(early, 0);

    // When: Polled after three frame intervals
    let late = sampler.due_frames(start + Duration::from_millis(100));

    // Then: Three frames catch up, four in total
    assert_eq!(late, 3);
    assert_eq!(sampler.emitted(), 4);

    // And: After one second exactly 31 frames have been emitted
    sampler.due_frames(start + Duration::from_secs(1));
    assert_eq!(sampler.emitted(), 31);
}

/// WHAT: A zero frame rate is treated as 1 fps
/// WHY: A bad config value must not divide by zero
#[test]
fn given_zero_frame_rate_when_creating_then_one_frame_per_second() {
    let sampler = FrameSampler::new(0);

    assert_eq!(sampler.frame_interval(), Duration::from_secs(1));
}
