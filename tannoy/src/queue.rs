//! Execution contexts for deferred notification delivery.
//!
//! Observers registered without a queue run inline on the posting thread.
//! Observers registered with a queue have each delivery handed to
//! [`DispatchQueue::execute`] instead, and posting does not wait for it.
//!
//! [`WorkerQueue`] is the built-in implementation, a fixed-size thread pool.
//! Integrations with an existing runtime implement [`DispatchQueue`] for
//! their own scheduler and hand it to the subscribe calls unchanged.

use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{debug, trace, warn};
use std::thread;

/// A unit of deferred delivery work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// An execution context notifications can be delivered on.
///
/// Implementations must accept jobs from any thread. Jobs for one observer
/// are submitted in posting order; whether they run in that order is up to
/// the implementation.
pub trait DispatchQueue: Send + Sync {
    /// Submit a job for execution.
    fn execute(&self, job: Job);
}

/// A concurrent delivery queue based on a thread pool pattern.
/// Jobs can be submitted from any thread and will be executed by worker threads.
pub struct WorkerQueue {
    sender: Sender<Message>,
    workers: Vec<Worker>,
}

enum Message {
    Job(Job),
    Shutdown,
}

struct Worker {
    handle: Option<thread::JoinHandle<()>>,
}

impl WorkerQueue {
    /// Creates a new queue with the specified number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "Worker pool size must be greater than 0");

        let (sender, receiver) = unbounded();
        let mut workers = Vec::with_capacity(size);

        for id in 0..size {
            workers.push(Worker::new(id, receiver.clone()));
        }

        debug!("worker queue started with {} worker(s)", size);
        WorkerQueue { sender, workers }
    }

    /// Creates a queue backed by a single worker thread.
    ///
    /// With one worker, jobs run strictly in submission order.
    pub fn single_threaded() -> Self {
        Self::new(1)
    }

    /// Returns the number of worker threads in the pool.
    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl DispatchQueue for WorkerQueue {
    fn execute(&self, job: Job) {
        if self.sender.send(Message::Job(job)).is_err() {
            warn!("worker queue is shut down, dropping job");
        }
    }
}

impl Drop for WorkerQueue {
    /// Drains queued jobs, then joins every worker.
    fn drop(&mut self) {
        for _ in &self.workers {
            let _ = self.sender.send(Message::Shutdown);
        }

        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                let _ = handle.join();
            }
        }

        debug!("worker queue shut down");
    }
}

impl Worker {
    fn new(id: usize, receiver: Receiver<Message>) -> Self {
        let handle = thread::spawn(move || {
            trace!("dispatch worker {} started", id);
            loop {
                match receiver.recv() {
                    Ok(Message::Job(job)) => {
                        job();
                    }
                    Ok(Message::Shutdown) => {
                        break;
                    }
                    Err(_) => {
                        // Channel disconnected, exit
                        break;
                    }
                }
            }
            trace!("dispatch worker {} stopped", id);
        });

        Worker {
            handle: Some(handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn test_queue_runs_jobs() {
        let queue = WorkerQueue::new(4);
        let counter = Arc::new(Mutex::new(0));

        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            queue.execute(Box::new(move || {
                let mut num = counter.lock().unwrap();
                *num += 1;
            }));
        }

        // Drop drains the queue before joining, so every job has run
        drop(queue);

        assert_eq!(*counter.lock().unwrap(), 10);
    }

    #[test]
    fn test_single_worker_runs_jobs_in_order() {
        let queue = WorkerQueue::single_threaded();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5 {
            let order = Arc::clone(&order);
            queue.execute(Box::new(move || {
                order.lock().unwrap().push(i);
            }));
        }

        drop(queue);

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_jobs_run_off_the_submitting_thread() {
        let queue = WorkerQueue::new(2);
        let (tx, rx) = crossbeam::channel::bounded(1);

        queue.execute(Box::new(move || {
            let _ = tx.send(thread::current().id());
        }));

        let worker_thread = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_ne!(worker_thread, thread::current().id());
    }

    #[test]
    fn test_graceful_shutdown_waits_for_running_job() {
        let queue = WorkerQueue::new(2);
        let completed = Arc::new(Mutex::new(false));

        let completed_clone = Arc::clone(&completed);
        queue.execute(Box::new(move || {
            thread::sleep(Duration::from_millis(50));
            let mut done = completed_clone.lock().unwrap();
            *done = true;
        }));

        // Drop queue to trigger shutdown
        drop(queue);

        // Job should have completed before shutdown
        assert!(*completed.lock().unwrap());
    }

    #[test]
    fn test_submitting_from_multiple_threads() {
        let queue = Arc::new(WorkerQueue::new(2));
        let counter = Arc::new(Mutex::new(0));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..5 {
                        let counter = Arc::clone(&counter);
                        queue.execute(Box::new(move || {
                            *counter.lock().unwrap() += 1;
                        }));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        drop(Arc::try_unwrap(queue).ok().unwrap());

        assert_eq!(*counter.lock().unwrap(), 20);
    }

    #[test]
    #[should_panic(expected = "Worker pool size must be greater than 0")]
    fn test_zero_workers_panics() {
        WorkerQueue::new(0);
    }
}
