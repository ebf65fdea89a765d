//! Bounded feedback ring.
//!
//! Fixed-capacity deque behind a short lock. Pushing into a full queue
//! evicts the oldest entry, so the producer side never blocks and never
//! grows the queue; the consumer drains one entry per call.

use heapless::Deque;
use parking_lot::Mutex;

/// Default queue depth, matching the upstream feedback buffering.
pub const FEEDBACK_QUEUE_DEPTH: usize = 10;

/// Bounded multi-producer feedback queue with drop-oldest overflow.
pub struct FeedbackQueue<F, const N: usize = FEEDBACK_QUEUE_DEPTH> {
    items: Mutex<Deque<F, N>>,
}

impl<F, const N: usize> FeedbackQueue<F, N> {
    pub const fn new() -> Self {
        Self {
            items: Mutex::new(Deque::new()),
        }
    }

    /// Append an entry, evicting and returning the oldest one when full.
    pub fn push(&self, item: F) -> Option<F> {
        let mut items = self.items.lock();
        let evicted = if items.is_full() {
            items.pop_front()
        } else {
            None
        };
        // A slot is free at this point.
        items.push_back(item).ok();
        evicted
    }

    /// Remove the oldest entry. One entry per call.
    pub fn pop(&self) -> Option<F> {
        self.items.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl<F, const N: usize> Default for FeedbackQueue<F, N> {
    fn default() -> Self {
        Self::new()
    }
}
