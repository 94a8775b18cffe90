use foundation::time::Time;

/// Largest step a single frame may advance the engine clock (seconds).
pub const MAX_FRAME_DT_S: f64 = 0.1;

/// Frame metadata handed to every per-frame consumer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    /// Fixed-timestep frame, used by replays and tests.
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}

/// Turns wall-clock timestamps (e.g. `requestAnimationFrame`) into frames.
///
/// Engine time only advances by clamped deltas, so a long stall or a hidden
/// tab never produces a burst of catch-up animation.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    index: u64,
    engine_time: f64,
    last_stamp: Option<Time>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, now: Time) -> Frame {
        let dt_s = match self.last_stamp {
            Some(prev) => now.since(prev).min(MAX_FRAME_DT_S),
            None => 0.0,
        };
        self.last_stamp = Some(now);

        let frame = Frame {
            index: self.index,
            dt_s,
            time: Time(self.engine_time + dt_s),
        };
        self.index += 1;
        self.engine_time += dt_s;
        frame
    }

    /// Forget the last timestamp; the next frame starts with `dt = 0`.
    pub fn suspend(&mut self) {
        self.last_stamp = None;
    }

    pub fn frames_advanced(&self) -> u64 {
        self.index
    }
}
