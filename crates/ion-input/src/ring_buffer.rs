use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// A fixed-capacity single-producer/single-consumer queue of device events.
///
/// One thread (the HAL's capture thread) calls [`RingBuffer::push`]; a
/// different single thread (the engine's frame loop) calls
/// [`RingBuffer::drain`]. Mixing producers or consumers across more than one
/// thread each is undefined behavior the same way it would be for any SPSC
/// queue — this type enforces the shape (one write head, one read head)
/// but not the thread discipline around it.
///
/// The slot count is rounded up to the next power of two internally so the
/// head indices can wrap with a mask instead of a modulo.
pub struct RingBuffer<T> {
    slots: Box<[UnsafeCell<Option<T>>]>,
    mask: u32,
    write_head: AtomicU32,
    read_head: AtomicU32,
    dropped: AtomicU64,
}

unsafe impl<T: Send> Sync for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(2).next_power_of_two();
        let slots = (0..capacity)
            .map(|_| UnsafeCell::new(None))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            slots,
            mask: capacity as u32 - 1,
            write_head: AtomicU32::new(0),
            read_head: AtomicU32::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.mask as usize + 1
    }

    /// Pushes `value`. Returns `false` and increments the dropped-event
    /// counter if the buffer is full, rather than overwriting unread data or
    /// blocking the producer thread.
    pub fn push(&self, value: T) -> bool {
        let write = self.write_head.load(Ordering::Relaxed);
        let read = self.read_head.load(Ordering::Acquire);
        let next = write.wrapping_add(1) & self.mask;
        if next == read {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        // SAFETY: only the single producer thread ever writes to
        // `slots[write]`, and the consumer only reads indices it has not
        // yet published `read_head` past, so this slot is not concurrently
        // accessed.
        unsafe {
            *self.slots[write as usize].get() = Some(value);
        }
        self.write_head.store(next, Ordering::Release);
        true
    }

    /// Drains every event available since the last call, in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        let write = self.write_head.load(Ordering::Acquire);
        let mut read = self.read_head.load(Ordering::Relaxed);
        let mut out = Vec::new();
        while read != write {
            // SAFETY: indices strictly between the old `read_head` and the
            // observed `write_head` were published by the producer via
            // `Release` and are not written again until the producer wraps
            // all the way back around, which cannot happen before we
            // publish our own advanced `read_head`.
            let value = unsafe { (*self.slots[read as usize].get()).take() };
            if let Some(value) = value {
                out.push(value);
            }
            read = read.wrapping_add(1) & self.mask;
        }
        self.read_head.store(read, Ordering::Release);
        out
    }

    pub fn available(&self) -> usize {
        let write = self.write_head.load(Ordering::Acquire);
        let read = self.read_head.load(Ordering::Relaxed);
        write.wrapping_sub(read) as usize & self.mask as usize
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
