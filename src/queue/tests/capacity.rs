//! Capacity bound tests

#[cfg(test)]
mod tests {
    use crate::queue::api::BoundedQueue;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_enqueue_blocks_until_space_is_freed() {
        let queue = Arc::new(BoundedQueue::new(2).unwrap());
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();

        let (tx, rx) = mpsc::channel();
        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let result = queue.enqueue(3);
                tx.send(result).unwrap();
            })
        };

        // Still blocked: nothing has been removed yet
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.dequeue(), Ok(1));
        let result = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("producer should resume once a slot is free");
        assert!(result.is_ok());
        producer.join().unwrap();

        assert_eq!(queue.dequeue(), Ok(2));
        assert_eq!(queue.dequeue(), Ok(3));
    }

    #[test]
    fn test_len_never_exceeds_capacity_under_load() {
        let capacity = 4;
        let queue = Arc::new(BoundedQueue::new(capacity).unwrap());
        let done = Arc::new(AtomicBool::new(false));

        let observer = {
            let queue = Arc::clone(&queue);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut max_seen = 0;
                while !done.load(Ordering::Acquire) {
                    max_seen = max_seen.max(queue.len());
                }
                max_seen
            })
        };

        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut count = 0;
                    while queue.dequeue().is_ok() {
                        count += 1;
                    }
                    count
                })
            })
            .collect();

        for i in 0..5_000 {
            queue.enqueue(i).unwrap();
        }
        queue.close();

        let consumed: usize = consumers.into_iter().map(|c| c.join().unwrap()).sum();
        done.store(true, Ordering::Release);
        let max_seen = observer.join().unwrap();

        assert_eq!(consumed, 5_000);
        assert!(max_seen <= capacity, "observed len {} > {}", max_seen, capacity);
        let stats = queue.stats();
        assert!(stats.high_water_mark <= capacity);
        assert_eq!(stats.total_enqueued, stats.total_dequeued);
    }

    #[test]
    fn test_is_full_reflects_occupancy() {
        let queue = BoundedQueue::new(2).unwrap();
        assert!(!queue.is_full());
        queue.enqueue('a').unwrap();
        assert!(!queue.is_full());
        queue.enqueue('b').unwrap();
        assert!(queue.is_full());
        assert!(queue.try_enqueue('c').is_err());
        queue.dequeue().unwrap();
        assert!(!queue.is_full());
    }
}
