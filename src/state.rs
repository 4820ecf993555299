//! State shared between the traversal thread and the copy workers.
//!
//! One [`SharedState`] per directory copy bundles the task queue, the
//! progress tracker, the first-error slot, the abort flag, and the
//! statistics counters. Failure handling is first-error-wins: the first
//! thread to call [`fail`] records its error, raises the abort flag, and
//! closes the queue so everyone winds down; later errors are discarded.
//!
//! [`fail`]: SharedState::fail

use crate::error::Error;
use crate::options::CopyOptions;
use crate::pool::TaskQueue;
use crate::progress::ProgressTracker;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Lock a mutex, recovering the guard if another thread panicked while
/// holding it. The guarded data stays structurally valid in this crate,
/// and one wedged worker must not hang the rest.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub(crate) struct SharedState {
    pub queue: TaskQueue,
    pub progress: ProgressTracker,
    pub files_copied: AtomicU64,
    pub dirs_created: AtomicU64,
    pub bytes_copied: AtomicU64,
    error: Mutex<Option<Error>>,
    abort: AtomicBool,
    cancel: Option<Arc<AtomicBool>>,
}

impl SharedState {
    pub fn new(options: &CopyOptions) -> Self {
        Self {
            queue: TaskQueue::new(),
            progress: ProgressTracker::new(options.progress_handler.clone()),
            files_copied: AtomicU64::new(0),
            dirs_created: AtomicU64::new(0),
            bytes_copied: AtomicU64::new(0),
            error: Mutex::new(None),
            abort: AtomicBool::new(false),
            cancel: options.cancel.clone(),
        }
    }

    /// Record `error` if it is the first one, raise the abort flag, and
    /// close the queue.
    pub fn fail(&self, error: Error) {
        {
            let mut slot = lock(&self.error);
            if slot.is_none() {
                *slot = Some(error);
            }
        }
        self.abort.store(true, Ordering::Release);
        self.queue.close();
    }

    /// True once a failure was recorded or cancellation was requested.
    pub fn aborted(&self) -> bool {
        self.abort.load(Ordering::Acquire) || self.cancelled()
    }

    /// True when the external cancellation token was triggered.
    pub fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|token| token.load(Ordering::SeqCst))
    }

    /// Take the recorded first error, leaving the slot empty.
    pub fn take_error(&self) -> Option<Error> {
        lock(&self.error).take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_wins() {
        let state = SharedState::new(&CopyOptions::default());
        state.fail(Error::Internal("first".into()));
        state.fail(Error::Internal("second".into()));

        assert!(state.aborted());
        let message = state.take_error().map(|e| e.to_string());
        assert_eq!(message.as_deref(), Some("Internal error: first"));
        assert!(state.take_error().is_none());
    }

    #[test]
    fn test_fail_closes_queue() {
        let state = SharedState::new(&CopyOptions::default());
        state.fail(Error::Internal("boom".into()));
        assert!(state.queue.pop().is_none());
    }

    #[test]
    fn test_cancel_token_sets_aborted() {
        let token = Arc::new(AtomicBool::new(false));
        let options = CopyOptions::default().with_cancel_token(token.clone());
        let state = SharedState::new(&options);

        assert!(!state.aborted());
        token.store(true, Ordering::SeqCst);
        assert!(state.cancelled());
        assert!(state.aborted());
    }
}
