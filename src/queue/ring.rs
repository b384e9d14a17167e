//! Fixed-capacity circular buffer
//!
//! Plain data structure with no synchronisation; `BoundedQueue` owns one
//! inside its mutex. Indices wrap modulo the capacity and never escape this
//! module.

pub(crate) struct RingBuffer<T> {
    slots: Box<[Option<T>]>,
    /// Oldest occupied slot
    head: usize,
    /// Next free slot
    tail: usize,
    count: usize,
}

impl<T> RingBuffer<T> {
    /// Caller guarantees `capacity >= 1`
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub(crate) fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Write at `tail`. Returns the item back when full.
    pub(crate) fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.slots[self.tail] = Some(item);
        self.tail = (self.tail + 1) % self.slots.len();
        self.count += 1;
        Ok(())
    }

    /// Take the slot at `head`
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.count -= 1;
        item
    }
}
