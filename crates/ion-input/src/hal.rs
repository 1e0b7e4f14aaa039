use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::event::DeviceEvent;
use crate::ring_buffer::RingBuffer;

pub const DEFAULT_HAL_CAPACITY: usize = 256;

/// Snapshot of HAL-level drop/throughput counters, part of the engine-wide
/// stats aggregate.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalStats {
    pub dropped_events: u64,
    pub events_this_tick: u64,
}

/// The hardware abstraction boundary: device drivers (out of scope for this
/// crate) push [`DeviceEvent`]s in from whatever thread they capture on;
/// the frame loop drains them once per tick from [`Hal::poll`].
#[derive(Clone)]
pub struct Hal {
    buffer: Arc<RingBuffer<DeviceEvent>>,
    /// Count of events returned by the most recent `poll`, since `poll`
    /// drains the buffer to empty and `available()` would read back zero
    /// immediately afterwards otherwise.
    last_poll_count: Arc<AtomicU64>,
}

impl Default for Hal {
    fn default() -> Self {
        Self::new(DEFAULT_HAL_CAPACITY)
    }
}

impl Hal {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(RingBuffer::new(capacity)),
            last_poll_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// A cloneable handle a capture thread can hold onto and push events
    /// into, independent of the `Hal` instance the frame loop polls.
    pub fn producer(&self) -> HalProducer {
        HalProducer {
            buffer: self.buffer.clone(),
        }
    }

    /// Drains every event queued since the last poll.
    pub fn poll(&self) -> Vec<DeviceEvent> {
        let events = self.buffer.drain();
        self.last_poll_count.store(events.len() as u64, Ordering::Relaxed);
        trace!(count = events.len(), dropped = self.buffer.dropped_count(), "hal poll");
        events
    }

    pub fn stats(&self) -> HalStats {
        HalStats {
            dropped_events: self.buffer.dropped_count(),
            events_this_tick: self.last_poll_count.load(Ordering::Relaxed),
        }
    }
}

/// Producer-side handle, the only type device capture code should hold.
#[derive(Clone)]
pub struct HalProducer {
    buffer: Arc<RingBuffer<DeviceEvent>>,
}

impl HalProducer {
    pub fn push(&self, event: DeviceEvent) -> bool {
        self.buffer.push(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyCode;

    #[test]
    fn producer_events_are_visible_to_poll() {
        let hal = Hal::new(16);
        let producer = hal.producer();
        producer.push(DeviceEvent::Key {
            key: KeyCode::W,
            pressed: true,
        });
        let events = hal.poll();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn stats_report_dropped_events() {
        let hal = Hal::new(2);
        let producer = hal.producer();
        for _ in 0..10 {
            producer.push(DeviceEvent::Key {
                key: KeyCode::W,
                pressed: true,
            });
        }
        assert!(hal.stats().dropped_events > 0);
    }

    #[test]
    fn stats_report_the_last_poll_size_not_the_drained_buffer() {
        let hal = Hal::new(16);
        let producer = hal.producer();
        producer.push(DeviceEvent::Key {
            key: KeyCode::W,
            pressed: true,
        });
        producer.push(DeviceEvent::Key {
            key: KeyCode::A,
            pressed: true,
        });
        hal.poll();
        assert_eq!(hal.stats().events_this_tick, 2);
    }
}
