use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar};

/// Cancels a blocked [`Pool::acquire_interruptible`](crate::Pool::acquire_interruptible).
///
/// Cloned handles share one flag. Once triggered, the flag stays set until
/// an acquire observes it while it would otherwise block, which clears it
/// and fails with [`ErrorKind::Interrupted`](crate::ErrorKind::Interrupted).
///
/// A handle is bound to the pool that created it and is rejected by others.
#[derive(Clone)]
pub struct Interrupt {
    owner: Arc<Condvar>,
    flag: Arc<AtomicBool>,
    wake: Arc<dyn Fn() + Send + Sync>,
}

impl Interrupt {
    pub(crate) fn new(owner: Arc<Condvar>, wake: Arc<dyn Fn() + Send + Sync>) -> Self {
        Self {
            owner,
            flag: Arc::new(AtomicBool::new(false)),
            wake,
        }
    }

    /// Trigger the interrupt and wake the pool's waiters
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::SeqCst);
        (self.wake)();
    }

    /// Whether the interrupt is pending
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear a pending interrupt without consuming it in an acquire
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    pub(crate) fn owner(&self) -> &Arc<Condvar> {
        &self.owner
    }

    pub(crate) fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

impl Debug for Interrupt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interrupt")
            .field("set", &self.is_set())
            .finish()
    }
}
