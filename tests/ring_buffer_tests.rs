use flashlog::RingBuffer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_fifo_order() {
    let rb = RingBuffer::new(8);

    for i in 0..5 {
        rb.push(i);
    }
    for i in 0..5 {
        assert_eq!(rb.pop(), Some(i), "pop must return pushes in order");
    }
    assert_eq!(rb.pop(), None);
}

#[test]
fn test_empty_pop_has_no_side_effects() {
    let rb: RingBuffer<u32> = RingBuffer::new(4);

    assert!(rb.is_empty());
    assert_eq!(rb.pop(), None);
    assert_eq!(rb.pop(), None);

    // The buffer still works normally afterwards.
    rb.push(7);
    assert!(!rb.is_empty());
    assert_eq!(rb.pop(), Some(7));
}

#[test]
fn test_usable_capacity_is_one_less_than_slots() {
    let rb = RingBuffer::new(4);

    // Three pushes fit, the fourth slot stays free.
    rb.try_push(1).unwrap();
    rb.try_push(2).unwrap();
    rb.try_push(3).unwrap();
    assert_eq!(rb.try_push(4), Err(4));

    // Freeing one slot admits exactly one more element.
    assert_eq!(rb.pop(), Some(1));
    rb.try_push(4).unwrap();
    assert_eq!(rb.try_push(5), Err(5));

    assert_eq!(rb.pop(), Some(2));
    assert_eq!(rb.pop(), Some(3));
    assert_eq!(rb.pop(), Some(4));
    assert_eq!(rb.pop(), None);
}

#[test]
fn test_push_spins_while_full() {
    let rb = Arc::new(RingBuffer::new(4));
    rb.push(0);
    rb.push(1);
    rb.push(2); // full: 3 of 4 slots used

    let pushed = Arc::new(AtomicBool::new(false));
    let producer = {
        let rb = Arc::clone(&rb);
        let pushed = Arc::clone(&pushed);
        thread::spawn(move || {
            rb.push(3); // must spin until a slot frees up
            pushed.store(true, Ordering::SeqCst);
        })
    };

    // While the buffer is full the producer cannot have completed the push,
    // no matter how the threads are scheduled.
    thread::sleep(Duration::from_millis(50));
    assert!(!pushed.load(Ordering::SeqCst), "push returned while the buffer was full");

    // One pop unblocks the spinning producer.
    assert_eq!(rb.pop(), Some(0));
    producer.join().unwrap();
    assert!(pushed.load(Ordering::SeqCst));

    assert_eq!(rb.pop(), Some(1));
    assert_eq!(rb.pop(), Some(2));
    assert_eq!(rb.pop(), Some(3));
}

#[test]
fn test_spsc_across_threads() {
    let rb = Arc::new(RingBuffer::new(64));
    let count = 100_000u64;

    let producer = {
        let rb = Arc::clone(&rb);
        thread::spawn(move || {
            for i in 0..count {
                rb.push(i);
            }
        })
    };

    let consumer = {
        let rb = Arc::clone(&rb);
        thread::spawn(move || {
            let mut next = 0u64;
            while next < count {
                match rb.pop() {
                    Some(value) => {
                        assert_eq!(value, next, "FIFO order violated across threads");
                        next += 1;
                    }
                    None => thread::yield_now(),
                }
            }
        })
    };

    producer.join().unwrap();
    consumer.join().unwrap();
    assert!(rb.is_empty());
}

#[test]
fn test_drop_releases_unconsumed_elements() {
    let rb = RingBuffer::new(8);
    rb.push(String::from("left"));
    rb.push(String::from("behind"));
    // Dropping the buffer must drop the two strings without leaking or
    // double-freeing; miri and leak checkers watch this path.
    drop(rb);
}
