use std::collections::VecDeque;

/// Retained history when none is configured.
pub const DEFAULT_EVENT_HISTORY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub frame_index: u64,
    pub payload: E,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer<E> = Box<dyn FnMut(&E)>;

/// Typed event stream: observers are notified synchronously on `emit`, and a
/// bounded history is kept for inspection and replay logs.
pub struct EventBus<E> {
    events: VecDeque<Event<E>>,
    max_history: usize,
    observers: Vec<(ObserverId, Observer<E>)>,
    next_observer: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::with_history(DEFAULT_EVENT_HISTORY)
    }

    pub fn with_history(max_history: usize) -> Self {
        Self {
            events: VecDeque::new(),
            max_history,
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&E) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(o, _)| *o != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn emit(&mut self, frame_index: u64, payload: E) {
        for (_, observer) in &mut self.observers {
            observer(&payload);
        }
        if self.max_history == 0 {
            return;
        }
        if self.events.len() == self.max_history {
            self.events.pop_front();
        }
        self.events.push_back(Event {
            frame_index,
            payload,
        });
    }

    pub fn events(&self) -> impl Iterator<Item = &Event<E>> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        self.events.drain(..).collect()
    }
}
