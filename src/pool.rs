//! Per-split worker pools with an explicit completion signal.

use log::warn;
use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use crate::split::Split;
use crate::utils::create_io_thread_pool;

/// Counts submitted tasks that have not finished yet.
#[derive(Debug, Default)]
pub struct TaskTracker {
    pending: Mutex<usize>,
    idle: Condvar,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        match self.pending.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("task counter mutex poisoned; using inner value");
                poisoned.into_inner()
            }
        }
    }

    /// Register one task. The task is finished when the returned guard drops.
    pub fn start(self: &Arc<Self>) -> TaskGuard {
        *self.lock() += 1;
        TaskGuard {
            tracker: Arc::clone(self),
        }
    }

    /// Block until every registered task has finished.
    pub fn wait(&self) {
        let mut pending = self.lock();
        while *pending > 0 {
            pending = match self.idle.wait(pending) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    fn finish(&self) {
        let mut pending = self.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.idle.notify_all();
        }
    }
}

/// Marks a task finished on drop, including when the task panics.
#[derive(Debug)]
pub struct TaskGuard {
    tracker: Arc<TaskTracker>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.tracker.finish();
    }
}

/// One rayon pool per split so a slow split cannot starve the others.
pub struct WorkerPool {
    pools: HashMap<Split, rayon::ThreadPool>,
    tracker: Arc<TaskTracker>,
}

impl WorkerPool {
    /// Share `workers` evenly between the splits, at least one thread each.
    pub fn new(workers: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let per_split = threads_per_split(workers);
        let mut pools = HashMap::new();
        for split in Split::ALL {
            let name = format!("collector-{}", split);
            pools.insert(split, create_io_thread_pool(per_split, &name)?);
        }
        Ok(Self {
            pools,
            tracker: Arc::new(TaskTracker::new()),
        })
    }

    /// Queue a task on the pool of `split`. Never blocks.
    pub fn submit<F>(&self, split: Split, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let guard = self.tracker.start();
        self.pools[&split].spawn(move || {
            let _guard = guard;
            task();
        });
    }

    /// Block until every submitted task has finished.
    pub fn wait(&self) {
        self.tracker.wait();
    }
}

/// Rounded even share of the worker budget, never below one.
pub fn threads_per_split(workers: usize) -> usize {
    let splits = Split::ALL.len();
    ((workers + splits / 2) / splits).max(1)
}
