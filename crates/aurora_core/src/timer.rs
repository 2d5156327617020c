//! Deferred actions in host time.
//!
//! The queue never runs anything itself. The owner polls it with the
//! current host time and handles whatever came due, earliest first; timers
//! with equal due times fire in scheduling order.
//!
//! Queues here hold a handful of entries (reveals, one form revert, one
//! debounce), so a sorted `Vec` is all the structure needed.

/// Identifies a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<A> {
    id: TimerId,
    due_ms: f64,
    action: A,
}

/// A queue of actions keyed by due time.
#[derive(Debug, Clone)]
pub struct TimerQueue<A> {
    entries: Vec<Entry<A>>,
    next_id: u64,
}

impl<A> TimerQueue<A> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(32),
            next_id: 0,
        }
    }

    /// Schedules `action` at `due_ms`.
    pub fn schedule(&mut self, due_ms: f64, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // after every entry due at or before `due_ms`, so ties keep FIFO order
        let index = self.entries.partition_point(|e| e.due_ms <= due_ms);
        self.entries.insert(index, Entry { id, due_ms, action });
        id
    }

    /// Schedules `action` `delay_ms` after `now_ms`.
    pub fn schedule_after(&mut self, now_ms: f64, delay_ms: f64, action: A) -> TimerId {
        self.schedule(now_ms + delay_ms.max(0.0), action)
    }

    /// Cancels a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TimerId, f64, A)> {
        if self.entries.first()?.due_ms > now_ms {
            return None;
        }
        let entry = self.entries.remove(0);
        Some((entry.id, entry.due_ms, entry.action))
    }

    /// Due time of the earliest timer.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.entries.first().map(|e| e.due_ms)
    }

    /// True if `id` is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps only the timers whose action satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&A) -> bool) {
        self.entries.retain(|e| keep(&e.action));
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapses a burst of triggers into one trailing action.
///
/// Every trigger cancels the pending timer and schedules a new one
/// `delay_ms` later.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay_ms: f64,
    pending: Option<TimerId>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Records a trigger at `now_ms`.
    pub fn trigger<A>(&mut self, queue: &mut TimerQueue<A>, now_ms: f64, action: A) -> TimerId {
        if let Some(previous) = self.pending.take() {
            queue.cancel(previous);
        }
        let id = queue.schedule_after(now_ms, self.delay_ms, action);
        self.pending = Some(id);
        id
    }

    /// Call when a timer fires. Returns true if it was this debouncer's.
    pub fn fired(&mut self, id: TimerId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// True while a trailing action is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_order_and_ties() {
        let mut queue = TimerQueue::new();
        queue.schedule(300.0, "late");
        queue.schedule(100.0, "first");
        queue.schedule(100.0, "second");

        assert!(queue.pop_due(99.0).is_none());
        assert_eq!(queue.pop_due(1000.0).map(|t| t.2), Some("first"));
        assert_eq!(queue.pop_due(1000.0).map(|t| t.2), Some("second"));
        assert_eq!(queue.pop_due(1000.0).map(|t| t.2), Some("late"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        let id = queue.schedule_after(0.0, 50.0, ());
        assert!(queue.is_pending(id));
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(queue.pop_due(100.0).is_none());
    }

    #[test]
    fn test_debounce_burst_fires_once() {
        let mut queue = TimerQueue::new();
        let mut debounce = Debouncer::new(200.0);

        for i in 0..5 {
            debounce.trigger(&mut queue, f64::from(i) * 50.0, "resize");
        }
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_due(), Some(400.0));

        assert!(queue.pop_due(399.0).is_none());
        let (id, due, action) = queue.pop_due(400.0).unwrap();
        assert_eq!((due, action), (400.0, "resize"));
        assert!(debounce.fired(id));
        assert!(!debounce.is_pending());
        assert!(queue.is_empty());
    }
}
