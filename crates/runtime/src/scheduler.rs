use foundation::handles::Handle;

use crate::frame::Frame;
use crate::job::Job;

/// Cancellation token for a job registered with [`Scheduler::add_job`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(Handle);

struct Slot<C> {
    generation: u32,
    entry: Option<(u64, Job<C>)>,
}

/// Owns the per-frame callbacks of one render loop.
///
/// Slots are reused after cancellation; handles carry the slot generation so
/// cancelling a stale handle never removes a newer job.
pub struct Scheduler<C> {
    next_order: u64,
    slots: Vec<Slot<C>>,
    free: Vec<u32>,
    run_order: Vec<usize>,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self {
            next_order: 0,
            slots: Vec::new(),
            free: Vec::new(),
            run_order: Vec::new(),
        }
    }

    pub fn add_job(&mut self, job: Job<C>) -> JobHandle {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        let index = match self.free.pop() {
            Some(i) => i,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: None,
                });
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.entry = Some((order, job));
        JobHandle(Handle::new(index, slot.generation))
    }

    /// Remove the job. Returns `false` if it was already gone.
    pub fn cancel(&mut self, handle: JobHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.0.index() as usize) else {
            return false;
        };
        if slot.generation != handle.0.generation() || slot.entry.is_none() {
            return false;
        }
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.0.index());
        true
    }

    pub fn is_registered(&self, handle: JobHandle) -> bool {
        self.slots
            .get(handle.0.index() as usize)
            .is_some_and(|s| s.generation == handle.0.generation() && s.entry.is_some())
    }

    pub fn job_count(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.is_some()).count()
    }

    /// Run all jobs in a deterministic order for the given frame.
    ///
    /// Ordering: `(priority, id, insertion_order)`.
    pub fn run_frame(&mut self, frame: Frame, ctx: &mut C) {
        let slots = &self.slots;
        self.run_order.clear();
        self.run_order
            .extend((0..slots.len()).filter(|&i| slots[i].entry.is_some()));
        self.run_order.sort_by_key(|&i| {
            slots[i]
                .entry
                .as_ref()
                .map(|(order, job)| (job.priority, job.id, *order))
        });

        for &i in &self.run_order {
            if let Some((_, job)) = self.slots[i].entry.as_mut() {
                (job.run)(frame, ctx);
            }
        }
    }

    pub fn clear(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(i as u32);
            }
        }
    }
}
