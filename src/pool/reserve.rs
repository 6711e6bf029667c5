use super::queue::Queue;

/// A capacity slot claimed ahead of a factory call.
///
/// Unless committed, dropping the reservation returns the slot to the pool
/// and wakes one waiter. This covers both a failed and a panicking factory.
pub(crate) struct Reservation<R> {
    queue: Option<Queue<R>>,
}

impl<R> Reservation<R> {
    /// Must be created while holding the queue lock, after incrementing
    /// `total_count`.
    pub fn new(queue: Queue<R>) -> Self {
        Self { queue: Some(queue) }
    }

    /// The slot is now owned by a live resource.
    pub fn commit(mut self) -> Queue<R> {
        // only taken here or in drop
        self.queue.take().unwrap()
    }
}

impl<R> Drop for Reservation<R> {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.take() {
            queue.cancel_reserved();
        }
    }
}
