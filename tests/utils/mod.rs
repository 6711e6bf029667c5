use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use resource_pool::{Pool, PoolConfig, ResourceFactory};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug)]
pub struct ConnectError(pub usize);

impl Display for ConnectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "connection attempt {} refused", self.0)
    }
}

impl std::error::Error for ConnectError {}

/// A stand-in connection, identified by its creation order
#[derive(Debug, PartialEq, Eq)]
pub struct Conn {
    pub id: usize,
}

/// Creates numbered connections, failing on the listed attempts
#[derive(Clone, Default)]
pub struct CountingFactory {
    attempts: Arc<AtomicUsize>,
    created: Arc<AtomicUsize>,
    fail_on: Vec<usize>,
}

impl CountingFactory {
    pub fn failing_on(attempts: &[usize]) -> Self {
        Self {
            fail_on: attempts.to_vec(),
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ResourceFactory for CountingFactory {
    type Resource = Conn;
    type Error = ConnectError;

    fn create(&self) -> Result<Conn, ConnectError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&attempt) {
            return Err(ConnectError(attempt));
        }
        let id = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Conn { id })
    }
}

pub fn counting_pool(max_count: usize) -> (Pool<CountingFactory>, CountingFactory) {
    init_logger();
    let factory = CountingFactory::default();
    let pool = PoolConfig::new()
        .max_count(max_count)
        .build(factory.clone())
        .expect("Error building pool");
    (pool, factory)
}
