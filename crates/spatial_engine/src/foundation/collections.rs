//! Specialized collection types

use thiserror::Error;

/// Error returned when dequeuing from an empty [`CircularQueue`]
///
/// An empty dequeue is a programmer error on the caller's side and fails
/// loudly instead of handing back a stale slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("dequeue from an empty queue")]
pub struct EmptyQueueError;

/// Growable, shrinkable FIFO ring buffer
///
/// Elements dequeue in exactly the order they were enqueued. The backing
/// store's capacity is always a power of two: it doubles when the queue
/// fills and halves (down to a floor of one slot) when occupancy drops to a
/// quarter of capacity. Both resizes copy the live elements out in FIFO
/// order, so a balanced sequence of operations stays amortized O(1).
#[derive(Debug)]
pub struct CircularQueue<T> {
    /// Backing store; `slots.len()` is the current capacity
    slots: Vec<Option<T>>,
    /// Index of the oldest element
    front: usize,
    /// Index one past the newest element
    back: usize,
    /// Number of live elements
    len: usize,
}

impl<T> CircularQueue<T> {
    /// Create an empty queue with a single backing slot
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Create an empty queue with capacity for at least `capacity` elements
    ///
    /// The backing store is rounded up to the next power of two, with a
    /// minimum of one slot.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.next_power_of_two().max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            front: 0,
            back: 0,
            len: 0,
        }
    }

    /// Add an element at the back of the queue
    pub fn enqueue(&mut self, item: T) {
        if self.len == self.slots.len() {
            self.resize(self.slots.len() * 2);
        }
        self.slots[self.back] = Some(item);
        self.back = (self.back + 1) % self.slots.len();
        self.len += 1;
    }

    /// Remove and return the element at the front of the queue
    ///
    /// # Errors
    ///
    /// Returns [`EmptyQueueError`] if the queue holds no elements. The empty
    /// check runs before the shrink check, so an empty queue never resizes.
    pub fn dequeue(&mut self) -> Result<T, EmptyQueueError> {
        if self.len == 0 {
            return Err(EmptyQueueError);
        }
        if self.slots.len() > 1 && self.len <= self.slots.len() / 4 {
            self.resize(self.slots.len() / 2);
        }
        let item = self.slots[self.front].take().ok_or(EmptyQueueError)?;
        self.front = (self.front + 1) % self.slots.len();
        self.len -= 1;
        Ok(item)
    }

    /// Whether the queue holds no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements currently in the queue
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Current backing capacity (always a power of two)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Replace the backing store with one of `new_capacity` slots, copying
    /// the live elements out in FIFO order starting at index 0
    fn resize(&mut self, new_capacity: usize) {
        let new_capacity = new_capacity.max(1);
        debug_assert!(self.len < new_capacity);

        let mut slots = Vec::with_capacity(new_capacity);
        slots.resize_with(new_capacity, || None);
        let old_capacity = self.slots.len();
        for (i, slot) in slots.iter_mut().take(self.len).enumerate() {
            *slot = self.slots[(self.front + i) % old_capacity].take();
        }

        self.slots = slots;
        self.front = 0;
        self.back = self.len;
    }
}

impl<T> Default for CircularQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = CircularQueue::new();
        for i in 0..10 {
            queue.enqueue(i);
        }
        for i in 0..10 {
            assert_eq!(queue.dequeue(), Ok(i));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_dequeue_fails() {
        let mut queue: CircularQueue<u32> = CircularQueue::new();
        assert_eq!(queue.dequeue(), Err(EmptyQueueError));

        // Drain-to-empty hits the same error, and the failed dequeues must
        // not disturb elements enqueued afterwards.
        queue.enqueue(7);
        assert_eq!(queue.dequeue(), Ok(7));
        assert_eq!(queue.dequeue(), Err(EmptyQueueError));
        queue.enqueue(8);
        assert_eq!(queue.dequeue(), Ok(8));
    }

    #[test]
    fn test_growth_preserves_order_and_count() {
        let mut queue = CircularQueue::new();
        let n = 1000;
        for i in 0..n {
            queue.enqueue(i);
        }
        assert_eq!(queue.len(), n);
        assert_eq!(queue.capacity(), 1024);
        for i in 0..n {
            assert_eq!(queue.dequeue(), Ok(i));
        }
    }

    #[test]
    fn test_capacity_is_always_power_of_two() {
        let mut queue = CircularQueue::new();
        for i in 0..500 {
            queue.enqueue(i);
            assert!(queue.capacity().is_power_of_two());
        }
        while !queue.is_empty() {
            queue.dequeue().expect("queue reported non-empty");
            assert!(queue.capacity().is_power_of_two());
            assert!(queue.capacity() >= 1);
        }
    }

    #[test]
    fn test_shrink_bottoms_out_on_full_drain() {
        let mut queue = CircularQueue::new();
        assert_eq!(queue.capacity(), 1);
        for i in 0..64 {
            queue.enqueue(i);
        }
        assert_eq!(queue.capacity(), 64);
        for i in 0..64 {
            assert_eq!(queue.dequeue(), Ok(i));
        }
        // A shrink from capacity 2 would need occupancy 0, and empty queues
        // refuse to dequeue, so a full drain bottoms out at 2 slots.
        assert_eq!(queue.capacity(), 2);
        assert_eq!(queue.dequeue(), Err(EmptyQueueError));
        assert_eq!(queue.capacity(), 2);
    }

    #[test]
    fn test_interleaved_operations_stay_fifo() {
        let mut queue = CircularQueue::new();
        let mut expected = std::collections::VecDeque::new();

        // Deterministic interleaving with growth and shrink phases: the
        // dequeued sequence must match a reference deque exactly.
        let mut next = 0u32;
        for round in 0..50 {
            for _ in 0..(round % 7 + 1) {
                queue.enqueue(next);
                expected.push_back(next);
                next += 1;
            }
            for _ in 0..(round % 5) {
                match expected.pop_front() {
                    Some(want) => assert_eq!(queue.dequeue(), Ok(want)),
                    None => assert_eq!(queue.dequeue(), Err(EmptyQueueError)),
                }
            }
            assert_eq!(queue.len(), expected.len());
        }
        while let Some(want) = expected.pop_front() {
            assert_eq!(queue.dequeue(), Ok(want));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_with_capacity_rounds_up() {
        let queue: CircularQueue<u8> = CircularQueue::with_capacity(0);
        assert_eq!(queue.capacity(), 1);
        let queue: CircularQueue<u8> = CircularQueue::with_capacity(5);
        assert_eq!(queue.capacity(), 8);
        let queue: CircularQueue<u8> = CircularQueue::with_capacity(16);
        assert_eq!(queue.capacity(), 16);
    }

    #[test]
    fn test_wraparound_enqueue_after_partial_drain() {
        let mut queue = CircularQueue::with_capacity(4);
        for i in 0..4 {
            queue.enqueue(i);
        }
        assert_eq!(queue.dequeue(), Ok(0));
        assert_eq!(queue.dequeue(), Ok(1));
        // Back cursor wraps into the freed slots without growing.
        queue.enqueue(4);
        queue.enqueue(5);
        assert_eq!(queue.capacity(), 4);
        for i in 2..6 {
            assert_eq!(queue.dequeue(), Ok(i));
        }
    }
}
