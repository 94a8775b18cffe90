/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn from_millis(ms: f64) -> Self {
        Time(ms / 1000.0)
    }

    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn after(self, secs: f64) -> Self {
        Time(self.0 + secs)
    }

    /// Seconds elapsed since `earlier` (never negative).
    pub fn since(self, earlier: Time) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn forever() -> Self {
        Self {
            start: Time(f64::NEG_INFINITY),
            end: Time(f64::INFINITY),
        }
    }

    pub fn instant(t: Time) -> Self {
        Self { start: t, end: t }
    }

    pub fn starting_at(start: Time, duration_s: f64) -> Self {
        Self {
            start,
            end: start.after(duration_s.max(0.0)),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    /// Half-open containment: `start <= t < end`.
    pub fn contains(&self, t: Time) -> bool {
        t.0 >= self.start.0 && t.0 < self.end.0
    }
}
