//! Bounded-concurrency request dispatcher
//!
//! Serializes outbound catalog requests through a fixed-size concurrency
//! limiter so that on constrained networks no more than `max_concurrent`
//! requests are in flight at once. Tasks start in FIFO enqueue order;
//! completion order is not guaranteed. One task's failure settles only that
//! task's caller and never stalls the queue.

use reel_common::NetworkProfile;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::sync::oneshot;

/// Dispatcher errors
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("concurrency limit must be at least 1")]
    InvalidLimit,

    #[error("dispatcher was dropped before the task could run")]
    Shutdown,
}

/// A queued operation, type-erased: running it executes the caller's
/// operation and settles the caller's channel.
type QueuedTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

#[derive(Default)]
struct State {
    running: usize,
    pending: VecDeque<QueuedTask>,
}

struct Inner {
    max_concurrent: usize,
    state: Mutex<State>,
}

/// Fixed-concurrency FIFO task runner.
///
/// One shared instance serves a whole session; cloning shares the same
/// queue and counter, so the concurrency cap stays meaningful.
#[derive(Clone)]
pub struct RequestDispatcher {
    inner: Arc<Inner>,
}

impl RequestDispatcher {
    /// Create a dispatcher running at most `max_concurrent` tasks at once.
    /// Zero is invalid.
    pub fn new(max_concurrent: usize) -> Result<Self, DispatchError> {
        if max_concurrent == 0 {
            return Err(DispatchError::InvalidLimit);
        }
        Ok(Self {
            inner: Arc::new(Inner {
                max_concurrent,
                state: Mutex::new(State::default()),
            }),
        })
    }

    pub fn from_profile(profile: &NetworkProfile) -> Result<Self, DispatchError> {
        Self::new(profile.max_concurrent)
    }

    pub fn max_concurrent(&self) -> usize {
        self.inner.max_concurrent
    }

    /// Queue an asynchronous operation and return a future for its outcome.
    ///
    /// The operation starts once a concurrency slot is free, in FIFO order
    /// relative to other enqueued operations. Must be called from within a
    /// tokio runtime. If the queue is torn down before the operation runs,
    /// the returned future resolves to [`DispatchError::Shutdown`].
    pub fn enqueue<T, F, Fut>(
        &self,
        operation: F,
    ) -> impl Future<Output = Result<T, DispatchError>>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let task: QueuedTask = Box::pin(async move {
            let outcome = operation().await;
            // Caller may have given up waiting; nothing to settle then.
            let _ = tx.send(outcome);
        });

        {
            let mut state = self.inner.lock_state();
            state.pending.push_back(task);
        }
        dispatch(&self.inner);

        async move { rx.await.map_err(|_| DispatchError::Shutdown) }
    }
}

impl Inner {
    /// A poisoned lock cannot leave the counter and queue inconsistent
    /// (every mutation is a single push/pop/add), so recover the guard.
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Synchronous dispatch step: start at most one pending task if a slot is
/// free, otherwise no-op. Runs to completion without suspending, so
/// `0 <= running <= max_concurrent` holds at every await point. Invoked
/// once per enqueue and once per settlement, which keeps the queue
/// draining.
fn dispatch(inner: &Arc<Inner>) {
    let task = {
        let mut state = inner.lock_state();
        if state.running >= inner.max_concurrent {
            return;
        }
        match state.pending.pop_front() {
            Some(task) => {
                state.running += 1;
                task
            }
            None => return,
        }
    };

    let runner = Arc::clone(inner);
    tokio::spawn(async move {
        task.await;
        {
            let mut state = runner.lock_state();
            state.running -= 1;
        }
        dispatch(&runner);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn zero_limit_is_rejected() {
        assert!(matches!(
            RequestDispatcher::new(0),
            Err(DispatchError::InvalidLimit)
        ));
        assert!(RequestDispatcher::new(1).is_ok());
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_limit() {
        let dispatcher = RequestDispatcher::new(2).unwrap();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..6 {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            handles.push(dispatcher.enqueue(move || async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                42u32
            }));
        }

        let mut completions = 0;
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 42);
            completions += 1;
        }

        assert_eq!(completions, 6);
        assert!(peak.load(Ordering::SeqCst) <= 2, "cap exceeded");
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn tasks_start_in_fifo_order() {
        let dispatcher = RequestDispatcher::new(2).unwrap();
        let starts = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..5u32 {
            let starts = Arc::clone(&starts);
            handles.push(dispatcher.enqueue(move || async move {
                starts.lock().unwrap().push(i);
                tokio::time::sleep(Duration::from_millis(10)).await;
                i
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*starts.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn failure_settles_only_its_own_task() {
        let dispatcher = RequestDispatcher::new(1).unwrap();

        let failing = dispatcher
            .enqueue(|| async { Err::<u32, String>("boom".to_string()) });
        let succeeding = dispatcher.enqueue(|| async { Ok::<u32, String>(7) });

        assert_eq!(failing.await.unwrap(), Err("boom".to_string()));
        assert_eq!(succeeding.await.unwrap(), Ok(7));
    }

    #[tokio::test]
    async fn queued_work_drains_after_handle_drop() {
        // The runner keeps the queue alive, so work enqueued before the
        // handle was dropped still completes.
        let dispatcher = RequestDispatcher::new(1).unwrap();

        let slow = dispatcher.enqueue(|| async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            1u32
        });
        let queued = dispatcher.enqueue(|| async { 2u32 });
        drop(dispatcher);

        assert_eq!(slow.await.unwrap(), 1);
        assert_eq!(queued.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn clones_share_one_concurrency_budget() {
        let dispatcher = RequestDispatcher::new(1).unwrap();
        let clone = dispatcher.clone();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for d in [&dispatcher, &clone, &dispatcher, &clone] {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            handles.push(d.enqueue(move || async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }
}
