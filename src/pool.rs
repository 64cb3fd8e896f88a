//! Fixed-size worker pool over a bounded FIFO ring-buffer task queue.
//!
//! Uses a classic two-condvar discipline (`queue_nonempty` wakes a worker
//! when a task is submitted, `task_done` wakes `wait_all` when the pool goes
//! quiet) with a quiescence check that avoids a race some simpler pools have:
//! `wait_all` here waits on `count == 0 && busy_threads == 0`, and workers
//! signal `task_done` immediately after dequeuing a task (not only after
//! running it), so a waiter can never observe an empty-looking pool while a
//! task is still in flight between "removed from the queue" and "counted as
//! busy".

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use log::{debug, info};

use crate::error::PoolError;

const QUEUE_CAPACITY: usize = 32;

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Shared {
    queue: Mutex<QueueState>,
    queue_nonempty: Condvar,
    task_done: Condvar,
}

struct QueueState {
    tasks: VecDeque<Task>,
    busy_threads: usize,
    quit: bool,
}

/// A fixed-size pool of OS threads draining a bounded FIFO task queue.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Spawns `threads_count` workers. If a thread fails to spawn partway
    /// through, already-spawned workers are cleanly shut down before the
    /// error is returned — no thread is left blocked on a queue that will
    /// never wake it.
    pub fn new(threads_count: usize) -> Result<ThreadPool, PoolError> {
        let shared = Arc::new(Shared {
            queue: Mutex::new(QueueState {
                tasks: VecDeque::with_capacity(QUEUE_CAPACITY),
                busy_threads: 0,
                quit: false,
            }),
            queue_nonempty: Condvar::new(),
            task_done: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(threads_count);

        for index in 0..threads_count {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("pathtracer-worker-{index}"))
                .spawn(move || worker_loop(worker_shared));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    shutdown(&shared, workers);
                    return Err(PoolError::OsResourceFailure(err));
                }
            }
        }

        info!("thread pool created with {threads_count} workers");
        Ok(ThreadPool { shared, workers })
    }

    /// Submits a task, blocking the caller while the bounded queue is full.
    pub fn add_task<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.shared.queue.lock().unwrap();
        while state.tasks.len() >= QUEUE_CAPACITY {
            state = self.shared.task_done.wait(state).unwrap();
        }
        state.tasks.push_back(Box::new(task));
        drop(state);
        self.shared.queue_nonempty.notify_one();
    }

    /// Blocks until the queue is empty and no worker is mid-task.
    pub fn wait_all(&self) {
        let mut state = self.shared.queue.lock().unwrap();
        while !(state.tasks.is_empty() && state.busy_threads == 0) {
            state = self.shared.task_done.wait(state).unwrap();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        let workers = std::mem::take(&mut self.workers);
        shutdown(&self.shared, workers);
    }
}

fn shutdown(shared: &Arc<Shared>, workers: Vec<JoinHandle<()>>) {
    {
        let mut state = shared.queue.lock().unwrap();
        state.quit = true;
    }
    shared.queue_nonempty.notify_all();
    shared.task_done.notify_all();

    for worker in workers {
        let _ = worker.join();
    }
}

fn worker_loop(shared: Arc<Shared>) {
    loop {
        let mut state = shared.queue.lock().unwrap();
        while state.tasks.is_empty() && !state.quit {
            state = shared.queue_nonempty.wait(state).unwrap();
        }

        if state.quit {
            return;
        }

        let task = state.tasks.pop_front().expect("queue non-empty under lock");
        state.busy_threads += 1;
        // Space freed in the bounded queue, and the quiescence predicate
        // changed (count dropped) even though busy_threads went up — wake
        // any `add_task`/`wait_all` waiter so it can re-check.
        shared.task_done.notify_all();
        drop(state);

        task();

        let mut state = shared.queue.lock().unwrap();
        state.busy_threads -= 1;
        shared.task_done.notify_all();
        drop(state);
        debug!("worker finished a task");
    }
}
