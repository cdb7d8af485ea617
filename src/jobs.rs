//! Background jobs - off-thread computation with polled delivery
//!
//! The interactive layer submits a computation and a completion
//! callback; the computation runs on its own worker thread and the
//! finished pair is queued under a lock. A single consumer drains the
//! queue on its polling tick and fires each callback exactly once, in
//! enqueue order. There is no cancellation and no timeout; callers
//! needing responsiveness re-poll or re-trigger instead.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;

type Callback<T> = Box<dyn FnOnce(T) + Send>;

struct Finished<T> {
    result: T,
    callback: Callback<T>,
}

pub struct JobQueue<T> {
    completed: Arc<Mutex<VecDeque<Finished<T>>>>,
}

impl<T: Send + 'static> JobQueue<T> {
    pub fn new() -> Self {
        Self {
            completed: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Runs `job` on a fresh worker thread. Its callback fires on the
    /// first [`drain`](Self::drain) after the job completes.
    pub fn submit(
        &self,
        job: impl FnOnce() -> T + Send + 'static,
        callback: impl FnOnce(T) + Send + 'static,
    ) {
        let completed = Arc::clone(&self.completed);
        thread::spawn(move || {
            let result = job();
            let mut queue = completed.lock().expect("completion queue poisoned");
            queue.push_back(Finished {
                result,
                callback: Box::new(callback),
            });
        });
    }

    /// Number of finished jobs waiting for the next drain.
    pub fn pending(&self) -> usize {
        self.completed
            .lock()
            .expect("completion queue poisoned")
            .len()
    }

    /// Drains finished jobs in enqueue order. Callbacks run after the
    /// queue lock is released, so a callback may submit new jobs.
    pub fn drain(&self) {
        let finished: Vec<Finished<T>> = {
            let mut queue = self.completed.lock().expect("completion queue poisoned");
            queue.drain(..).collect()
        };
        for job in finished {
            (job.callback)(job.result);
        }
    }
}

impl<T: Send + 'static> Default for JobQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    fn wait_for_pending(queue: &JobQueue<u32>, count: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while queue.pending() < count {
            assert!(Instant::now() < deadline, "jobs did not finish in time");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn callback_fires_exactly_once() {
        let queue = JobQueue::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in_callback = Arc::clone(&fired);

        queue.submit(
            || 41 + 1,
            move |result| {
                assert_eq!(result, 42);
                fired_in_callback.fetch_add(1, Ordering::SeqCst);
            },
        );

        wait_for_pending(&queue, 1);
        queue.drain();
        queue.drain();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn callbacks_run_in_enqueue_order() {
        let queue = JobQueue::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for (id, delay_ms) in [(1_u32, 20_u64), (2, 120), (3, 220)] {
            let order = Arc::clone(&order);
            queue.submit(
                move || {
                    thread::sleep(Duration::from_millis(delay_ms));
                    id
                },
                move |id| order.lock().expect("order lock").push(id),
            );
        }

        wait_for_pending(&queue, 3);
        queue.drain();
        assert_eq!(*order.lock().expect("order lock"), vec![1, 2, 3]);
    }

    #[test]
    fn undrained_results_stay_queued() {
        let queue = JobQueue::new();
        queue.submit(|| 7, |_| {});

        wait_for_pending(&queue, 1);
        assert_eq!(queue.pending(), 1);
        queue.drain();
        assert_eq!(queue.pending(), 0);
    }
}
