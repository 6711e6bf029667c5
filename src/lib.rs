//! A bounded pool of expensive, reusable resources such as network or
//! database connections.
//!
//! Resources are created lazily by a [`ResourceFactory`] while fewer than the
//! configured capacity exist. Once the pool is saturated, [`Pool::acquire`]
//! blocks until a lease is returned or the acquire deadline passes.

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
mod error;
pub use self::error::{Error, ErrorKind, Result};

#[macro_use]
mod macros;

#[cfg(feature = "log")]
#[macro_use]
extern crate log;

#[doc(hidden)]
pub mod future;

mod options;
pub use self::options::{IntoOptions, Options};

mod pool;
pub use self::pool::{
    ConnectFactory, Interrupt, Managed, Pool, PoolConfig, PoolStatus, ResourceFactory,
    ResourceInfo,
};

/// Initialize `env_logger` as the log output, configured by `RUST_LOG`
#[cfg(feature = "logger")]
#[cfg_attr(docsrs, doc(cfg(feature = "logger")))]
pub fn set_default_logger() -> Result<()> {
    env_logger::try_init().map_err(err_map!(Unexpected, "Error initializing logger"))?;
    debug!("Initialized default logger");
    Ok(())
}
