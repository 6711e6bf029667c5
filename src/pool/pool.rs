use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::config::PoolConfig;
use super::factory::{ConnectFactory, ResourceFactory};
use super::interrupt::Interrupt;
use super::queue::{Guard, Queue};
use super::reserve::Reservation;
use super::resource::{Managed, ResourceInfo};
use crate::error::{Error, Result};
use crate::future::unblock;
use crate::options::{IntoOptions, Options};

/// A point-in-time view of a pool's accounting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolStatus {
    /// The configured capacity
    pub max_count: usize,
    /// Resources in existence, whether idle, leased or being created
    pub total_count: usize,
    /// Resources waiting in the idle set
    pub idle_count: usize,
}

impl PoolStatus {
    /// Resources currently leased or being created
    pub fn leased(&self) -> usize {
        self.total_count - self.idle_count
    }
}

enum Next<R> {
    Idle(R, ResourceInfo),
    Create(Reservation<R>),
}

/// A bounded pool of lazily created resources.
///
/// A `Pool` is a handle: clones share the same resources and capacity, so
/// one pool is built per resource target and handed to each consumer.
///
/// Resources are created on demand while fewer than `max_count` exist, and
/// consumers block once the pool is saturated. Waiters are not served in
/// arrival order: whichever thread reacquires the lock first after a release
/// claims the resource.
pub struct Pool<F: ResourceFactory> {
    queue: Queue<F::Resource>,
    factory: Arc<F>,
    acquire_timeout: Option<Duration>,
}

impl<F: ResourceFactory> Clone for Pool<F> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            factory: self.factory.clone(),
            acquire_timeout: self.acquire_timeout,
        }
    }
}

impl<F: ResourceFactory> Debug for Pool<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("max_count", &self.queue.max_count)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl<C> Pool<ConnectFactory<C>>
where
    ConnectFactory<C>: ResourceFactory,
{
    /// Create a pool of connections to the target described by `uri`.
    ///
    /// Pool parameters are taken from the URI query (see
    /// [`PoolConfig::from_options`]); the remaining options are passed to
    /// `connect` for each new resource.
    pub fn connect<'a, O: IntoOptions<'a>>(uri: O, connect: C) -> Result<Self> {
        let mut opts = uri.into_options()?;
        let config = PoolConfig::from_options(&mut opts)?;
        config.build(ConnectFactory::new(opts.into_owned(), connect))
    }

    /// Accessor for the connection target
    pub fn options(&self) -> &Options<'static> {
        self.factory.options()
    }
}

impl<F: ResourceFactory> Pool<F> {
    pub(crate) fn new(config: PoolConfig, factory: F) -> Self {
        debug!(
            "Created resource pool: max_count {}, acquire_timeout {:?}",
            config.max_count, config.acquire_timeout
        );
        Self {
            queue: Queue::new(config.max_count),
            factory: Arc::new(factory),
            acquire_timeout: config.acquire_timeout,
        }
    }

    /// The maximum number of resources this pool will create
    pub fn max_count(&self) -> usize {
        self.queue.max_count
    }

    /// Snapshot the pool's accounting
    pub fn status(&self) -> PoolStatus {
        let guard = self.queue.lock_recover();
        PoolStatus {
            max_count: self.queue.max_count,
            total_count: guard.total_count,
            idle_count: guard.idle.len(),
        }
    }

    /// Lease a resource, waiting for the configured acquire timeout, or
    /// indefinitely if none was configured
    pub fn acquire(&self) -> Result<Managed<F::Resource>> {
        self.acquire_inner(self.acquire_timeout, None)
    }

    /// Lease a resource, waiting no longer than `timeout` for one to be
    /// released
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<Managed<F::Resource>> {
        self.acquire_inner(Some(timeout), None)
    }

    /// Lease a resource, failing with `Interrupted` if `interrupt` is
    /// triggered while waiting.
    ///
    /// The handle must come from [`Pool::interrupt_handle`] on this pool
    /// or one of its clones, otherwise an `Input` error is returned.
    pub fn acquire_interruptible(
        &self,
        interrupt: &Interrupt,
        timeout: Option<Duration>,
    ) -> Result<Managed<F::Resource>> {
        self.acquire_inner(timeout, Some(interrupt))
    }

    /// Lease a resource if one is idle or can be created, without blocking
    pub fn try_acquire(&self) -> Result<Option<Managed<F::Resource>>> {
        let guard = self.queue.lock()?;
        match self.take_next(guard) {
            Some(next) => self.complete(next).map(Some),
            None => Ok(None),
        }
    }

    /// Return a leased resource to the pool.
    ///
    /// Equivalent to dropping the lease.
    pub fn release(&self, resource: Managed<F::Resource>) {
        drop(resource)
    }

    fn acquire_inner(
        &self,
        timeout: Option<Duration>,
        interrupt: Option<&Interrupt>,
    ) -> Result<Managed<F::Resource>> {
        if let Some(interrupt) = interrupt {
            if !self.queue.owns(interrupt.owner()) {
                return Err(err_msg!(Input, "Interrupt handle belongs to another pool"));
            }
        }
        // fixed once, so repeated wakeups cannot extend the wait; a deadline
        // past the range of `Instant` waits without limit
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut guard = self.queue.lock()?;
        loop {
            if guard.can_acquire(self.queue.max_count) {
                break;
            }
            if interrupt.map(Interrupt::take).unwrap_or(false) {
                debug!("Resource acquire interrupted");
                return Err(self.abandon(guard, err_msg!(Interrupted)));
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    debug!("Timed out waiting for a resource after {:?}", timeout);
                    return Err(self.abandon(
                        guard,
                        err_msg!(Timeout, "Timed out waiting for an available resource"),
                    ));
                }
            }
            guard = self.queue.wait_until(guard, deadline)?;
        }
        match self.take_next(guard) {
            Some(next) => self.complete(next),
            None => Err(err_msg!(Unexpected, "Resource pool state changed under lock")),
        }
    }

    /// Claim an idle resource or a creation slot, releasing the lock.
    fn take_next(&self, mut guard: Guard<'_, F::Resource>) -> Option<Next<F::Resource>> {
        if let Some((res, info)) = guard.idle.pop_front() {
            return Some(Next::Idle(res, info));
        }
        if guard.total_count < self.queue.max_count {
            guard.total_count += 1;
            let reserved = Reservation::new(self.queue.clone());
            drop(guard);
            return Some(Next::Create(reserved));
        }
        None
    }

    fn complete(&self, next: Next<F::Resource>) -> Result<Managed<F::Resource>> {
        match next {
            Next::Idle(res, info) => Ok(Managed::new(res, info, self.queue.clone())),
            Next::Create(reserved) => {
                // the pool lock is not held here
                let res = self
                    .factory
                    .create()
                    .map_err(map_err_log!(level: warn, "Error creating resource: {}"))
                    .map_err(err_map!(Creation, "Error creating resource"))?;
                trace!("Created new resource");
                Ok(Managed::new(res, ResourceInfo::new(), reserved.commit()))
            }
        }
    }

    /// Leave the wait loop with an error, handing on any wakeup this waiter
    /// may have consumed.
    fn abandon(&self, guard: Guard<'_, F::Resource>, err: Error) -> Error {
        let pass_on = guard.can_acquire(self.queue.max_count);
        drop(guard);
        if pass_on {
            self.queue.notify_one();
        }
        err
    }
}

impl<F> Pool<F>
where
    F: ResourceFactory + 'static,
    F::Resource: 'static,
{
    /// Create a handle for cancelling blocked acquires on this pool
    pub fn interrupt_handle(&self) -> Interrupt {
        let queue = self.queue.clone();
        Interrupt::new(self.queue.owner(), Arc::new(move || {
            // notify under the lock so a waiter between its flag check and
            // its wait cannot miss the wakeup
            let _guard = queue.lock_recover();
            queue.notify_all();
        }))
    }

    /// Lease a resource from an async context.
    ///
    /// The wait runs on a blocking thread. If the returned future is dropped
    /// before completion, a resource acquired in the meantime is released.
    pub async fn acquire_async(&self) -> Result<Managed<F::Resource>> {
        let pool = self.clone();
        unblock(move || pool.acquire())
            .await
            .unwrap_or_else(|| Err(err_msg!(Unexpected, "Resource acquire task panicked")))
    }
}
