//! Task queue feeding the copy workers.
//!
//! One [`TaskQueue`] is shared between the traversal (producer) and a
//! fixed set of worker threads (consumers). Workers block in [`pop`] while
//! the queue is empty and open; [`close`] wakes everyone and turns further
//! pops into `None` once the backlog drains, which is the only shutdown
//! signal the workers ever see.
//!
//! [`pop`]: TaskQueue::pop
//! [`close`]: TaskQueue::close

use crate::state::lock;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex};

/// One file to copy: resolved source and destination paths.
#[derive(Debug)]
pub(crate) struct CopyTask {
    pub src: PathBuf,
    pub dst: PathBuf,
}

#[derive(Debug)]
struct QueueInner {
    tasks: VecDeque<CopyTask>,
    open: bool,
}

/// Unbounded FIFO of copy tasks with explicit close semantics.
#[derive(Debug)]
pub(crate) struct TaskQueue {
    inner: Mutex<QueueInner>,
    ready: Condvar,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                tasks: VecDeque::new(),
                open: true,
            }),
            ready: Condvar::new(),
        }
    }

    /// Enqueue a task and wake one waiting worker. Pushes after [`close`]
    /// are dropped silently; the producer racing a close is abandoning the
    /// run anyway.
    ///
    /// [`close`]: TaskQueue::close
    pub fn push(&self, task: CopyTask) {
        let mut inner = lock(&self.inner);
        if !inner.open {
            return;
        }
        inner.tasks.push_back(task);
        self.ready.notify_one();
    }

    /// Dequeue the next task, blocking while the queue is empty and open.
    /// Returns `None` only when the queue is empty and closed.
    pub fn pop(&self) -> Option<CopyTask> {
        let mut inner = lock(&self.inner);
        loop {
            if let Some(task) = inner.tasks.pop_front() {
                return Some(task);
            }
            if !inner.open {
                return None;
            }
            inner = match self.ready.wait(inner) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    /// Close the queue and wake all waiting workers. Tasks already queued
    /// remain poppable; closing twice is harmless.
    pub fn close(&self) {
        let mut inner = lock(&self.inner);
        inner.open = false;
        drop(inner);
        self.ready.notify_all();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        lock(&self.inner).tasks.len()
    }
}
