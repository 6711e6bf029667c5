use std::error::Error as StdError;
use std::fmt::{self, Debug, Formatter};

use crate::options::Options;

/// Produces new resources for a pool.
///
/// `create` is always called without the pool lock held, so it may perform
/// slow blocking I/O.
pub trait ResourceFactory: Send + Sync {
    /// The pooled resource type
    type Resource: Send;

    /// The error produced when a resource cannot be created
    type Error: StdError + Send + Sync + 'static;

    /// Create one new resource
    fn create(&self) -> Result<Self::Resource, Self::Error>;
}

impl<F, R, E> ResourceFactory for F
where
    F: Fn() -> Result<R, E> + Send + Sync,
    R: Send,
    E: StdError + Send + Sync + 'static,
{
    type Resource = R;
    type Error = E;

    fn create(&self) -> Result<R, E> {
        (self)()
    }
}

/// A factory opening resources against a fixed connection target.
pub struct ConnectFactory<C> {
    options: Options<'static>,
    connect: C,
}

impl<C> ConnectFactory<C> {
    pub fn new(options: Options<'static>, connect: C) -> Self {
        Self { options, connect }
    }

    /// Accessor for the connection target
    pub fn options(&self) -> &Options<'static> {
        &self.options
    }
}

impl<C> Debug for ConnectFactory<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectFactory")
            .field("scheme", &self.options.scheme)
            .field("host", &self.options.host)
            .field("path", &self.options.path)
            .field("user", &self.options.user)
            .finish()
    }
}

impl<C, R, E> ResourceFactory for ConnectFactory<C>
where
    C: Fn(&Options<'static>) -> Result<R, E> + Send + Sync,
    R: Send,
    E: StdError + Send + Sync + 'static,
{
    type Resource = R;
    type Error = E;

    fn create(&self) -> Result<R, E> {
        (self.connect)(&self.options)
    }
}
