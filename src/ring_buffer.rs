use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A fixed-capacity single-producer single-consumer ring buffer.
///
/// Exactly one thread may call [`push`]/[`try_push`] and exactly one thread
/// may call [`pop`]. Under that discipline no compare-and-swap is needed:
/// each side owns one index and observes the other through a single
/// acquire-ordered load per operation.
///
/// Capacity must be a power of two so the modulo reduces to a mask. One slot
/// is always left free: the buffer distinguishes empty (`head == tail`) from
/// full (`next(tail) == head`) by index comparison alone, so a buffer of
/// capacity `N` holds at most `N - 1` elements.
///
/// `push` spins while the buffer is full. That is the engine's only form of
/// backpressure: a stalled consumer stalls its producer rather than dropping
/// or reallocating. [`try_push`] is the non-blocking alternative for callers
/// that would rather react to a full queue themselves.
///
/// [`push`]: RingBuffer::push
/// [`try_push`]: RingBuffer::try_push
/// [`pop`]: RingBuffer::pop
pub struct RingBuffer<T> {
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
    mask: usize,
    /// Consumer-owned read index. Cache-line padded so producer stores to
    /// `tail` never invalidate the consumer's line.
    head: CachePadded<AtomicUsize>,
    /// Producer-owned write index.
    tail: CachePadded<AtomicUsize>,
}

// SAFETY: the SPSC discipline guarantees each slot is touched by at most one
// thread at a time. The producer writes a slot strictly before its release
// store of `tail`; the consumer reads it strictly after the matching acquire
// load, and hands it back with a release store of `head` that the producer
// acquires before reusing the slot.
unsafe impl<T: Send> Sync for RingBuffer<T> {}
unsafe impl<T: Send> Send for RingBuffer<T> {}

impl<T> RingBuffer<T> {
    /// Creates a buffer with the given slot count.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two or is smaller than 2.
    /// Public configuration goes through [`LoggerOptions`], which validates
    /// capacities and reports a [`ConfigError`] instead.
    ///
    /// [`LoggerOptions`]: crate::LoggerOptions
    /// [`ConfigError`]: crate::ConfigError
    pub fn new(capacity: usize) -> Self {
        assert!(capacity.is_power_of_two(), "capacity must be a power of two");
        assert!(capacity >= 2, "capacity must be at least 2");

        let slots: Vec<UnsafeCell<MaybeUninit<T>>> =
            (0..capacity).map(|_| UnsafeCell::new(MaybeUninit::uninit())).collect();

        Self {
            slots: slots.into_boxed_slice(),
            mask: capacity - 1,
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
        }
    }

    /// Number of slots, including the one kept free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Appends `value`, spinning until a slot is free.
    ///
    /// Producer side only. The spin has no backoff and no bound; if the
    /// consumer never drains, this never returns.
    pub fn push(&self, value: T) {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = (tail + 1) & self.mask;
        while next == self.head.load(Ordering::Acquire) {
            std::hint::spin_loop();
        }
        // SAFETY: `next != head` means slot `tail` has been released by the
        // consumer (or never used); only this producer thread writes slots.
        unsafe {
            (*self.slots[tail].get()).write(value);
        }
        // Publish the write: the consumer's acquire load of `tail` must
        // observe a fully-written slot.
        self.tail.store(next, Ordering::Release);
    }

    /// Appends `value`, or returns it if the buffer is full.
    ///
    /// Producer side only.
    pub fn try_push(&self, value: T) -> Result<(), T> {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = (tail + 1) & self.mask;
        if next == self.head.load(Ordering::Acquire) {
            return Err(value);
        }
        // SAFETY: as in `push`; the slot is free and producer-owned.
        unsafe {
            (*self.slots[tail].get()).write(value);
        }
        self.tail.store(next, Ordering::Release);
        Ok(())
    }

    /// Removes the oldest element, or returns `None` if the buffer is empty.
    ///
    /// Consumer side only. An empty pop has no side effects.
    pub fn pop(&self) -> Option<T> {
        let head = self.head.load(Ordering::Relaxed);
        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }
        // SAFETY: `head != tail` means slot `head` holds an initialized
        // value published by the producer's release store of `tail`.
        let value = unsafe { (*self.slots[head].get()).assume_init_read() };
        // Release: the slot must be fully read out before the producer's
        // acquire load of `head` lets it overwrite the slot.
        self.head.store((head + 1) & self.mask, Ordering::Release);
        Some(value)
    }

    /// True if no element is currently available to the consumer.
    ///
    /// A snapshot; either side may move the answer immediately afterwards.
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        // Exclusive access: drop whatever the consumer never popped.
        let mut head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        while head != tail {
            // SAFETY: slots in [head, tail) hold initialized values.
            unsafe {
                std::ptr::drop_in_place((*self.slots[head].get()).as_mut_ptr());
            }
            head = (head + 1) & self.mask;
        }
    }
}
