use parking_lot::Mutex;
use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use crate::record_codec::LogRecord;
use crate::ring_buffer::RingBuffer;

/// The queue type moved between one producer thread and the drain path.
pub type MessageQueue = RingBuffer<LogRecord>;

/// How often an exiting thread re-checks its queue during the grace wait.
const EXIT_POLL: Duration = Duration::from_millis(5);

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// The set of live per-thread queues belonging to one logger.
///
/// Each producer thread gets its own queue, created lazily on the thread's
/// first log call through this registry and kept in thread-local storage so
/// subsequent calls take no lock at all. The coarse mutex here guards only
/// queue registration, removal, and the drain path's iteration. It is
/// never taken on an enqueue or dequeue.
///
/// Queue retirement is best-effort by contract: an exiting thread waits a
/// bounded grace period for the consumer to catch up, then deregisters its
/// queue whether or not it is empty. Removal is not ordered with the last
/// dequeue, so records still in the queue at that point are lost.
pub struct ThreadQueueRegistry {
    id: u64,
    queue_capacity: usize,
    exit_grace: Duration,
    queues: Mutex<Vec<Arc<MessageQueue>>>,
}

impl ThreadQueueRegistry {
    /// `queue_capacity` must already be validated as a power of two.
    pub fn new(queue_capacity: usize, exit_grace: Duration) -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            queue_capacity,
            exit_grace,
            queues: Mutex::new(Vec::new()),
        }
    }

    /// Returns the calling thread's queue, creating and registering one on
    /// the thread's first call.
    ///
    /// Fast path: a thread-local lookup and an `Arc` clone. Only the first
    /// call per (registry, thread) takes the registration lock.
    pub fn resolve_for_current_thread(registry: &Arc<Self>) -> Arc<MessageQueue> {
        ACTIVE_QUEUES.with(|slots| {
            let mut slots = slots.borrow_mut();
            if let Some(slot) = slots.iter().find(|slot| slot.registry_id == registry.id) {
                return Arc::clone(&slot.queue);
            }

            let queue = Arc::new(RingBuffer::new(registry.queue_capacity));
            registry.queues.lock().push(Arc::clone(&queue));
            slots.push(ThreadSlot {
                registry_id: registry.id,
                registry: Arc::downgrade(registry),
                exit_grace: registry.exit_grace,
                queue: Arc::clone(&queue),
            });
            queue
        })
    }

    /// Invokes `visitor` with every live queue, under the coarse lock.
    ///
    /// Drain path only; runs far less often than enqueue.
    pub fn for_each_queue(&self, mut visitor: impl FnMut(&MessageQueue)) {
        let queues = self.queues.lock();
        for queue in queues.iter() {
            visitor(queue);
        }
    }

    /// Number of currently registered queues.
    pub fn queue_count(&self) -> usize {
        self.queues.lock().len()
    }

    fn remove(&self, queue: &Arc<MessageQueue>) {
        self.queues.lock().retain(|q| !Arc::ptr_eq(q, queue));
    }
}

/// One thread's handle on its queue for one registry.
///
/// Lives in thread-local storage; the destructor runs at thread exit and
/// performs the grace wait + deregistration handshake.
struct ThreadSlot {
    registry_id: u64,
    registry: Weak<ThreadQueueRegistry>,
    exit_grace: Duration,
    queue: Arc<MessageQueue>,
}

impl Drop for ThreadSlot {
    fn drop(&mut self) {
        // Give the consumer a bounded window to finish draining. Never
        // blocks thread exit past the grace period; whatever is left when
        // the deadline passes is lost with the queue.
        if !self.queue.is_empty() {
            let deadline = Instant::now() + self.exit_grace;
            while !self.queue.is_empty() && Instant::now() < deadline {
                std::thread::sleep(EXIT_POLL);
            }
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(&self.queue);
        }
    }
}

thread_local! {
    static ACTIVE_QUEUES: RefCell<Vec<ThreadSlot>> = const { RefCell::new(Vec::new()) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn test_registry() -> Arc<ThreadQueueRegistry> {
        Arc::new(ThreadQueueRegistry::new(16, Duration::from_millis(50)))
    }

    #[test]
    fn test_one_queue_per_thread() {
        let registry = test_registry();

        let a = ThreadQueueRegistry::resolve_for_current_thread(&registry);
        let b = ThreadQueueRegistry::resolve_for_current_thread(&registry);
        assert!(Arc::ptr_eq(&a, &b), "same thread must resolve to the same queue");
        assert_eq!(registry.queue_count(), 1);

        let other = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let q = ThreadQueueRegistry::resolve_for_current_thread(&registry);
                assert_eq!(registry.queue_count(), 2);
                Arc::as_ptr(&q) as usize
            })
            .join()
            .unwrap()
        };
        assert_ne!(other, Arc::as_ptr(&a) as usize, "threads must not share a queue");
    }

    #[test]
    fn test_queue_removed_after_thread_exit() {
        let registry = test_registry();

        {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                ThreadQueueRegistry::resolve_for_current_thread(&registry);
            })
            .join()
            .unwrap();
        }

        assert_eq!(registry.queue_count(), 0, "exited thread's queue should be deregistered");
    }

    #[test]
    fn test_distinct_registries_get_distinct_queues() {
        let first = test_registry();
        let second = test_registry();

        let a = ThreadQueueRegistry::resolve_for_current_thread(&first);
        let b = ThreadQueueRegistry::resolve_for_current_thread(&second);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(first.queue_count(), 1);
        assert_eq!(second.queue_count(), 1);
    }
}
