//! Bounded FIFO of events between interrupt-side producers and the main loop.
//!
//! [`EventRing`] is the plain ring buffer. [`EventQueue`] wraps it in a
//! critical-section mutex so it can live in a `static` and be pushed from
//! SoftDevice callbacks and input tasks while the main loop pops.
//!
//! Overflow policy: a push onto a full queue drops the *new* event and
//! returns `false`. The queue contents are left untouched.

use crate::event::Event;
use core::cell::RefCell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::Deque;

/// Fixed-capacity ring of events with an overflow counter.
pub struct EventRing<const N: usize> {
    slots: Deque<Event, N>,
    dropped: u32,
}

impl<const N: usize> EventRing<N> {
    pub const fn new() -> Self {
        Self {
            slots: Deque::new(),
            dropped: 0,
        }
    }

    /// Append `event`. Returns `false` and counts a drop when full.
    pub fn push(&mut self, event: Event) -> bool {
        match self.slots.push_back(event) {
            Ok(()) => true,
            Err(_) => {
                self.dropped = self.dropped.saturating_add(1);
                false
            }
        }
    }

    /// Remove the oldest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.slots.pop_front()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    /// Events rejected since creation.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const N: usize> Default for EventRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt-safe event queue. Every operation runs inside a short
/// critical section and never waits.
pub struct EventQueue<const N: usize> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<EventRing<N>>>,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(EventRing::new())),
        }
    }

    /// Enqueue if space is available. On overflow the event is dropped,
    /// a warning is logged and `false` is returned.
    pub fn push(&self, event: Event) -> bool {
        let kind = event.kind();
        let (accepted, dropped) = self.inner.lock(|ring| {
            let mut ring = ring.borrow_mut();
            let accepted = ring.push(event);
            (accepted, ring.dropped())
        });
        if !accepted {
            warn!("event queue full - dropped {:?} ({} total)", kind, dropped);
        }
        accepted
    }

    /// Dequeue the oldest event, if any.
    pub fn pop(&self) -> Option<Event> {
        self.inner.lock(|ring| ring.borrow_mut().pop())
    }

    pub fn len(&self) -> usize {
        self.inner.lock(|ring| ring.borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn dropped(&self) -> u32 {
        self.inner.lock(|ring| ring.borrow().dropped())
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
