use std::time::Duration;

use super::factory::ResourceFactory;
use super::pool::Pool;
use crate::error::Result;
use crate::options::Options;

const DEFAULT_MAX_CONNECTIONS: usize = 10;

/// Construction parameters for a [`Pool`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    pub(crate) max_count: usize,
    pub(crate) acquire_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: None,
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the pool parameters from a set of connection options.
    ///
    /// The `max_connections` and `acquire_timeout` (milliseconds) query
    /// parameters are removed, leaving only those meant for the connector.
    pub fn from_options(opts: &mut Options<'_>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(max_conn) = opts.query.remove("max_connections") {
            config.max_count = max_conn
                .parse()
                .map_err(err_map!(Input, "Error parsing 'max_connections' parameter"))?;
        }
        if let Some(timeout) = opts.query.remove("acquire_timeout") {
            let millis: u64 = timeout
                .parse()
                .map_err(err_map!(Input, "Error parsing 'acquire_timeout' parameter"))?;
            config.acquire_timeout.replace(Duration::from_millis(millis));
        }
        Ok(config)
    }

    /// Set the maximum number of resources in existence at once
    pub fn max_count(mut self, val: usize) -> Self {
        self.max_count = val;
        self
    }

    /// Set the default wait used by [`Pool::acquire`]
    pub fn acquire_timeout(mut self, val: Duration) -> Self {
        self.acquire_timeout.replace(val);
        self
    }

    pub fn build<F: ResourceFactory>(self, factory: F) -> Result<Pool<F>> {
        if self.max_count == 0 {
            return Err(err_msg!(Input, "Pool capacity must be greater than zero"));
        }
        Ok(Pool::new(self, factory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn config_from_options() {
        let mut opts =
            Options::parse_uri("tcp://host:9000/db?max_connections=3&acquire_timeout=1500&ssl=1")
                .unwrap();
        let config = PoolConfig::from_options(&mut opts).unwrap();
        assert_eq!(
            config,
            PoolConfig::new()
                .max_count(3)
                .acquire_timeout(Duration::from_millis(1500))
        );
        assert_eq!(opts.query.len(), 1);
        assert!(opts.query.contains_key("ssl"));
    }

    #[test]
    fn config_defaults() {
        let mut opts = Options::parse_uri("tcp://host").unwrap();
        let config = PoolConfig::from_options(&mut opts).unwrap();
        assert_eq!(config.max_count, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.acquire_timeout, None);
    }

    #[test]
    fn config_invalid_parameter() {
        let mut opts = Options::parse_uri("tcp://host?max_connections=many").unwrap();
        let err = PoolConfig::from_options(&mut opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
        assert_eq!(
            err.message(),
            Some("Error parsing 'max_connections' parameter")
        );
    }

    #[test]
    fn config_zero_capacity() {
        let factory = || Ok::<_, std::io::Error>(());
        let err = PoolConfig::new().max_count(0).build(factory).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }
}
