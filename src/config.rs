use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};

/// Runtime settings for the server.
///
/// Every value has a default matching the classic `htdocs` setup
/// (port 8080, backlog of 10). Values are read from environment variables
/// once at startup and never change afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the listening socket binds to
    pub listen_addr: String,
    /// Directory prefixed to every request path
    pub doc_root: String,
    /// Depth of the OS accept queue
    pub backlog: u32,
    /// Upper bound on connections handled at the same time
    pub max_connections: usize,
    /// Capacity of the single read taken from each connection
    pub read_buffer_size: usize,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            doc_root: "htdocs".to_string(),
            backlog: 10,
            max_connections: 10,
            read_buffer_size: 4096,
            read_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Loads the configuration from the process environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup.
    ///
    /// Unset keys fall back to the defaults. A value that does not parse is
    /// an error, as is a zero backlog, connection limit or buffer size.
    pub fn load_from<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let cfg = Self {
            listen_addr: lookup("LISTEN").unwrap_or(defaults.listen_addr),
            doc_root: lookup("DOC_ROOT").unwrap_or(defaults.doc_root),
            backlog: parse_var(&lookup, "BACKLOG")?.unwrap_or(defaults.backlog),
            max_connections: parse_var(&lookup, "MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            read_buffer_size: parse_var(&lookup, "READ_BUFFER_SIZE")?
                .unwrap_or(defaults.read_buffer_size),
            read_timeout: parse_var(&lookup, "READ_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.read_timeout),
            write_timeout: parse_var(&lookup, "WRITE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.write_timeout),
        };

        if cfg.backlog == 0 {
            bail!("BACKLOG must be greater than zero");
        }
        if cfg.max_connections == 0 {
            bail!("MAX_CONNECTIONS must be greater than zero");
        }
        if cfg.read_buffer_size == 0 {
            bail!("READ_BUFFER_SIZE must be greater than zero");
        }

        Ok(cfg)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> anyhow::Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}
