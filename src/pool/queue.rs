use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::resource::ResourceInfo;
use crate::error::Result;

pub(crate) type Guard<'a, R> = MutexGuard<'a, QueueInner<R>>;

/// Pool state guarded by the queue mutex.
pub(crate) struct QueueInner<R> {
    /// Resources available for lease, handed out from the front
    pub idle: VecDeque<(R, ResourceInfo)>,
    /// Resources in existence: idle, leased, or reserved for creation
    pub total_count: usize,
}

impl<R> QueueInner<R> {
    /// Whether a waiter woken now could make progress.
    pub fn can_acquire(&self, max_count: usize) -> bool {
        !self.idle.is_empty() || self.total_count < max_count
    }
}

/// The shared state behind every handle on one pool.
pub(crate) struct Queue<R> {
    pub(super) max_count: usize,
    cvar: Arc<Condvar>,
    inner: Arc<Mutex<QueueInner<R>>>,
}

impl<R> Clone for Queue<R> {
    fn clone(&self) -> Self {
        Self {
            max_count: self.max_count,
            cvar: self.cvar.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<R> Queue<R> {
    pub fn new(max_count: usize) -> Self {
        Self {
            max_count,
            cvar: Arc::new(Condvar::new()),
            inner: Arc::new(Mutex::new(QueueInner {
                idle: VecDeque::new(),
                total_count: 0,
            })),
        }
    }

    pub fn lock(&self) -> Result<Guard<'_, R>> {
        self.inner
            .lock()
            .map_err(|_| err_msg!(Unexpected, "Resource pool lock poisoned"))
    }

    /// Lock the state even if another thread panicked while holding it.
    ///
    /// Every critical section leaves the state consistent before any call
    /// that could panic, so the inner value is always safe to reuse.
    pub fn lock_recover(&self) -> Guard<'_, R> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Identity shared by every handle on this queue.
    pub fn owner(&self) -> Arc<Condvar> {
        self.cvar.clone()
    }

    pub fn owns(&self, owner: &Arc<Condvar>) -> bool {
        Arc::ptr_eq(&self.cvar, owner)
    }

    pub fn notify_one(&self) {
        self.cvar.notify_one()
    }

    pub fn notify_all(&self) {
        self.cvar.notify_all()
    }

    /// Block until notified, or until `deadline` when one is given.
    ///
    /// Wakeups may be spurious: callers re-check their predicate after
    /// every return, and compare against the same deadline each time.
    pub fn wait_until<'a>(
        &'a self,
        guard: Guard<'a, R>,
        deadline: Option<Instant>,
    ) -> Result<Guard<'a, R>> {
        let result = match deadline {
            None => self.cvar.wait(guard).map_err(|_| ()),
            Some(deadline) => {
                let remain = deadline.saturating_duration_since(Instant::now());
                self.cvar
                    .wait_timeout(guard, remain.max(Duration::from_millis(1)))
                    .map(|(guard, _)| guard)
                    .map_err(|_| ())
            }
        };
        result.map_err(|_| err_msg!(Unexpected, "Resource pool lock poisoned"))
    }

    /// Return a resource to the idle set and wake one waiter.
    pub fn release(&self, res: R, info: ResourceInfo) {
        let mut guard = self.lock_recover();
        debug_assert!(guard.idle.len() < guard.total_count);
        guard.idle.push_back((res, info));
        drop(guard);
        self.cvar.notify_one();
    }

    /// Give back a slot reserved for a creation that did not produce a resource.
    pub fn cancel_reserved(&self) {
        let mut guard = self.lock_recover();
        guard.total_count = guard.total_count.saturating_sub(1);
        drop(guard);
        // capacity freed up
        self.cvar.notify_one();
    }
}
