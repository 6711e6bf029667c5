mod config;
mod factory;
mod interrupt;
mod pool;
mod queue;
mod reserve;
mod resource;

pub use config::PoolConfig;
pub use factory::{ConnectFactory, ResourceFactory};
pub use interrupt::Interrupt;
pub use pool::{Pool, PoolStatus};
pub use resource::{Managed, ResourceInfo};
