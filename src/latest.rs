//! Single-slot latest-value channel.
//!
//! The landmark estimator produces results on its own cadence, typically
//! slower than the display refresh. Only the most recent result matters,
//! so delivery is a one-slot cell: the producer overwrites, the consumer
//! takes without blocking, and superseded values are simply dropped. No
//! queueing, no backpressure.
//!
//! # Example
//!
//! ```ignore
//! use handmorph::latest::LatestSlot;
//!
//! let slot = LatestSlot::new();
//! let sender = slot.sender();
//!
//! // Producer thread:
//! sender.publish(detection_result);
//!
//! // Frame loop:
//! if let Some(latest) = slot.take() {
//!     engine.observe(latest);
//! }
//! ```

use std::sync::{Arc, Mutex};

/// Why [`LatestSlot::try_take`] returned no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeError {
    /// Nothing has been published since the last take.
    Empty,
    /// No [`LatestSender`] is alive; nothing will ever arrive.
    Disconnected,
}

/// Consumer side of a single-slot channel.
#[derive(Debug)]
pub struct LatestSlot<T> {
    cell: Arc<Mutex<Option<T>>>,
}

/// Producer handle for a [`LatestSlot`]. Cheap to clone; each `publish`
/// replaces whatever the consumer has not yet taken.
#[derive(Debug)]
pub struct LatestSender<T> {
    cell: Arc<Mutex<Option<T>>>,
}

impl<T> LatestSlot<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            cell: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a producer handle for this slot.
    pub fn sender(&self) -> LatestSender<T> {
        LatestSender {
            cell: Arc::clone(&self.cell),
        }
    }

    /// Take the most recent value, if a new one has arrived since the
    /// last take. Never blocks beyond the slot lock.
    pub fn take(&self) -> Option<T> {
        self.try_take().ok()
    }

    /// Like [`take`](Self::take), but distinguishes a quiet producer from
    /// a dead one: once every sender has been dropped the slot reports
    /// [`TakeError::Disconnected`] so the consumer can react instead of
    /// holding its last value forever.
    pub fn try_take(&self) -> Result<T, TakeError> {
        match self.cell.lock() {
            Ok(mut guard) => {
                if let Some(value) = guard.take() {
                    return Ok(value);
                }
            }
            // A panicked producer is gone for good
            Err(_) => return Err(TakeError::Disconnected),
        }
        // Only senders hold the other references to the cell
        if Arc::strong_count(&self.cell) == 1 {
            Err(TakeError::Disconnected)
        } else {
            Err(TakeError::Empty)
        }
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestSender<T> {
    /// Publish a value, replacing any unconsumed one.
    pub fn publish(&self, value: T) {
        if let Ok(mut guard) = self.cell.lock() {
            *guard = Some(value);
        }
    }
}

impl<T> Clone for LatestSender<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_slot() {
        let slot: LatestSlot<u32> = LatestSlot::new();
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_latest_wins() {
        let slot = LatestSlot::new();
        let sender = slot.sender();

        sender.publish(1);
        sender.publish(2);
        sender.publish(3);

        // Only the newest survives, and taking drains the slot
        assert_eq!(slot.take(), Some(3));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_empty_is_not_disconnected() {
        let slot: LatestSlot<u32> = LatestSlot::new();
        let sender = slot.sender();

        assert_eq!(slot.try_take(), Err(TakeError::Empty));
        sender.publish(7);
        assert_eq!(slot.try_take(), Ok(7));
        assert_eq!(slot.try_take(), Err(TakeError::Empty));
    }

    #[test]
    fn test_dropped_sender_disconnects() {
        let slot: LatestSlot<u32> = LatestSlot::new();
        let sender = slot.sender();
        let extra = sender.clone();

        // A final value published before the drop is still delivered
        sender.publish(42);
        drop(sender);
        drop(extra);

        assert_eq!(slot.try_take(), Ok(42));
        assert_eq!(slot.try_take(), Err(TakeError::Disconnected));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_cross_thread_publish() {
        let slot = LatestSlot::new();
        let sender = slot.sender();

        let handle = thread::spawn(move || {
            for i in 0..100 {
                sender.publish(i);
            }
        });
        handle.join().unwrap();

        assert_eq!(slot.take(), Some(99));
    }
}
