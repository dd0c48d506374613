//! Frame scheduling for the session driver.

use std::time::{Duration, Instant};

/// Timing snapshot for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Elapsed wall-clock or simulated time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub index: u64,
}

impl FrameTick {
    /// Creates a new frame tick.
    pub fn new(seconds: f32, index: u64) -> Self {
        Self { seconds, index }
    }
}

/// Decides whether another frame should run and when it nominally occurs.
///
/// The session driver pulls ticks until the scheduler returns `None`, which
/// is the sole cancellation mechanism: stop yielding and the loop ends, the
/// session tears down. Timestamps must be monotonically non-decreasing across
/// the ticks of one scheduler.
pub trait FrameScheduler {
    /// Produces the next frame tick, or `None` to end the session.
    fn next_frame(&mut self) -> Option<FrameTick>;
}

/// Deterministic scheduler that yields a fixed number of evenly spaced ticks.
///
/// Used by tests and headless soak runs where wall time would only add noise.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepScheduler {
    frame: u64,
    frames: u64,
    step: f32,
}

impl FixedStepScheduler {
    /// Schedules exactly `frames` ticks, `step_seconds` apart, starting at 0.
    pub fn new(frames: u64, step_seconds: f32) -> Self {
        Self {
            frame: 0,
            frames,
            step: step_seconds,
        }
    }
}

impl FrameScheduler for FixedStepScheduler {
    fn next_frame(&mut self) -> Option<FrameTick> {
        if self.frame >= self.frames {
            return None;
        }
        let tick = FrameTick::new(self.frame as f32 * self.step, self.frame);
        self.frame = self.frame.saturating_add(1);
        Some(tick)
    }
}

/// Wall-clock scheduler with an optional frame limit and fps throttle.
#[derive(Debug, Clone, Copy)]
pub struct WallClockScheduler {
    origin: Instant,
    last: Option<Instant>,
    frame: u64,
    limit: Option<u64>,
    frame_budget: Option<Duration>,
}

impl WallClockScheduler {
    /// Schedules frames against the system monotonic clock.
    ///
    /// `limit` caps the total number of ticks; `target_fps` inserts a sleep
    /// so consecutive ticks stay at least one frame budget apart.
    pub fn new(limit: Option<u64>, target_fps: Option<f32>) -> Self {
        let frame_budget = target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f32(1.0 / fps));
        Self {
            origin: Instant::now(),
            last: None,
            frame: 0,
            limit,
            frame_budget,
        }
    }
}

impl FrameScheduler for WallClockScheduler {
    fn next_frame(&mut self) -> Option<FrameTick> {
        if let Some(limit) = self.limit {
            if self.frame >= limit {
                return None;
            }
        }
        if let (Some(budget), Some(last)) = (self.frame_budget, self.last) {
            let elapsed = last.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }
        self.last = Some(Instant::now());
        let tick = FrameTick::new(self.origin.elapsed().as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        Some(tick)
    }
}
