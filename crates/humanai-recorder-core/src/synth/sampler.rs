use std::time::{Duration, Instant};

/// Paces a video track at a fixed frame rate against the wall clock.
///
/// Each call to [`FrameSampler::due_frames`] reports how many frames should
/// be emitted now so that the total emitted matches elapsed time. A late
/// wake-up yields several frames at once; an early one yields none.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    frame_rate: u32,
    started_at: Option<Instant>,
    emitted: u64,
}

impl FrameSampler {
    /// Sampler for `frame_rate` frames per second. A rate of 0 is treated as 1.
    pub fn new(frame_rate: u32) -> Self {
        Self {
            frame_rate: frame_rate.max(1),
            started_at: None,
            emitted: 0,
        }
    }

    /// Time between two frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate
    }

    /// Frames emitted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Frames due at `now`. The first call starts the clock and returns 1.
    pub fn due_frames(&mut self, now: Instant) -> u64 {
        let started_at = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started_at);

        let expected = elapsed.as_nanos() * u128::from(self.frame_rate) / 1_000_000_000 + 1;
        let expected = u64::try_from(expected).unwrap_or(u64::MAX);

        let due = expected.saturating_sub(self.emitted);
        self.emitted += due;
        due
    }
}
