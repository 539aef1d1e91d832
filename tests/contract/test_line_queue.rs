//! Contract tests for the completed-line queue
//!
//! FIFO ordering and signal-driven blocking, including the cross-thread
//! wake-up path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ttyshell::LineQueue;

#[test]
fn remove_returns_lines_in_insert_order() {
    let queue = LineQueue::new();
    queue.insert("a".to_string());
    queue.insert("b".to_string());
    queue.insert("c".to_string());

    assert_eq!(queue.remove(), "a");
    assert_eq!(queue.remove(), "b");
    assert_eq!(queue.remove(), "c");
    assert!(queue.is_empty());
}

#[test]
fn remove_blocks_until_insert() {
    let queue = Arc::new(LineQueue::new());
    let returned_early = Arc::new(AtomicBool::new(false));

    let consumer = {
        let queue = queue.clone();
        let returned_early = returned_early.clone();
        thread::spawn(move || {
            let line = queue.remove();
            returned_early.store(true, Ordering::SeqCst);
            line
        })
    };

    // Give the consumer time to park; it must not return on an empty queue.
    thread::sleep(Duration::from_millis(100));
    assert!(
        !returned_early.load(Ordering::SeqCst),
        "remove() returned before any insert"
    );

    queue.insert("wake".to_string());
    let line = consumer.join().expect("consumer thread panicked");
    assert_eq!(line, "wake", "remove() must return the inserted line");
}

#[test]
fn insert_never_blocks_on_a_full_burst() {
    let queue = LineQueue::new();
    for i in 0..10_000 {
        queue.insert(format!("line {i}"));
    }
    assert_eq!(queue.len(), 10_000);
    assert_eq!(queue.remove(), "line 0");
}

#[test]
fn producer_on_another_thread_preserves_order() {
    let queue = Arc::new(LineQueue::new());

    let producer = {
        let queue = queue.clone();
        thread::spawn(move || {
            for i in 0..100 {
                queue.insert(format!("{i}"));
            }
        })
    };

    for i in 0..100 {
        assert_eq!(queue.remove(), format!("{i}"));
    }
    producer.join().expect("producer thread panicked");
}

#[test]
fn two_consumers_drain_without_loss_or_duplication() {
    let queue = Arc::new(LineQueue::new());

    let consumers: Vec<_> = (0..2)
        .map(|_| {
            let queue = queue.clone();
            thread::spawn(move || {
                let mut seen = Vec::new();
                for _ in 0..50 {
                    seen.push(queue.remove());
                }
                seen
            })
        })
        .collect();

    for i in 0..100 {
        queue.insert(format!("{i}"));
    }

    let mut all: Vec<String> = consumers
        .into_iter()
        .flat_map(|c| c.join().expect("consumer thread panicked"))
        .collect();
    all.sort_by_key(|s| s.parse::<u32>().expect("non-numeric line"));

    let expected: Vec<String> = (0..100).map(|i| i.to_string()).collect();
    assert_eq!(all, expected, "every line delivered exactly once");
}
