use std::fmt::{Debug, Display, Formatter};
use std::ops::{Deref, DerefMut};
use std::time::Instant;

use super::queue::Queue;

/// Usage details tracked for each pooled resource
#[derive(Copy, Clone, Debug)]
pub struct ResourceInfo {
    /// When the factory produced the resource
    pub created_at: Instant,
    /// Number of times the resource has been leased
    pub borrow_count: usize,
    /// Start of the most recent lease
    pub last_borrow: Option<Instant>,
    /// End of the most recent completed lease
    pub last_release: Option<Instant>,
}

impl ResourceInfo {
    pub(crate) fn new() -> Self {
        Self {
            created_at: Instant::now(),
            borrow_count: 0,
            last_borrow: None,
            last_release: None,
        }
    }

    pub(crate) fn borrowed(mut self) -> Self {
        self.borrow_count += 1;
        self.last_borrow.replace(Instant::now());
        self
    }
}

/// A leased resource.
///
/// The resource returns to its pool when the lease is dropped or passed to
/// [`Pool::release`](crate::Pool::release), so each acquire is paired with
/// exactly one release. Leaking the lease (for example with `mem::forget`)
/// permanently removes one slot from the pool's capacity.
pub struct Managed<R> {
    value: Option<R>,
    info: ResourceInfo,
    queue: Option<Queue<R>>,
}

impl<R> Managed<R> {
    pub(crate) fn new(value: R, info: ResourceInfo, queue: Queue<R>) -> Self {
        Self {
            value: Some(value),
            info: info.borrowed(),
            queue: Some(queue),
        }
    }

    /// Accessor for the usage details of the leased resource
    pub fn info(&self) -> &ResourceInfo {
        &self.info
    }
}

impl<R: Debug> Debug for Managed<R> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        if fmt.alternate() {
            fmt.debug_struct("Managed")
                .field("value", &self.value)
                .field("info", &self.info)
                .finish()
        } else {
            Debug::fmt(&self.value, fmt)
        }
    }
}

impl<R: Display> Display for Managed<R> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self.deref(), fmt)
    }
}

impl<R> Deref for Managed<R> {
    type Target = R;
    fn deref(&self) -> &Self::Target {
        // value is only taken in drop
        self.value.as_ref().unwrap()
    }
}

impl<R> DerefMut for Managed<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // value is only taken in drop
        self.value.as_mut().unwrap()
    }
}

impl<R> Drop for Managed<R> {
    fn drop(&mut self) {
        if let (Some(queue), Some(value)) = (self.queue.take(), self.value.take()) {
            let mut info = self.info;
            info.last_release.replace(Instant::now());
            trace!("Releasing resource (borrow count {})", info.borrow_count);
            queue.release(value, info);
        }
    }
}
