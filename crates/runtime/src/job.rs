use crate::frame::Frame;

/// Per-frame callback body. `C` is whatever the owner lets jobs mutate.
pub type JobFn<C> = Box<dyn FnMut(Frame, &mut C)>;

/// A named per-frame callback run by the [`Scheduler`](crate::Scheduler).
///
/// Jobs are run in a stable order based on their `(priority, id)`.
pub struct Job<C> {
    pub id: &'static str,
    /// Smaller values run earlier.
    pub priority: i32,
    pub run: JobFn<C>,
}

impl<C> Job<C> {
    pub fn new(id: &'static str, run: impl FnMut(Frame, &mut C) + 'static) -> Self {
        Self::with_priority(id, 0, run)
    }

    pub fn with_priority(
        id: &'static str,
        priority: i32,
        run: impl FnMut(Frame, &mut C) + 'static,
    ) -> Self {
        Self {
            id,
            priority,
            run: Box::new(run),
        }
    }
}

impl<C> std::fmt::Debug for Job<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
