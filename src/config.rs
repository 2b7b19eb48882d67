use std::{env, net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{bail, Context};

#[derive(Debug, Clone)]
pub struct Config {
    pub addr:            SocketAddr,
    /// `None` keeps everything in memory.
    pub database_url:    Option<String>,
    pub max_connections: u32,
    /// Time between two presence sweeps.
    pub refresh:         Duration,
    /// Heartbeats older than this are stale.
    pub cutoff:          Duration,
    pub body_limit:      usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host: String = var_or("HOST", "0.0.0.0".to_owned())?;
        let port: u16    = var_or("PORT", 5000)?;
        let addr = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("HOST/PORT do not form a socket address: {host}:{port}"))?;

        let refresh = Duration::from_millis(var_or("REFRESH_TIME", 15_000)?);
        let cutoff  = Duration::from_millis(var_or("CUTOFF_TIME", 10_000)?);
        if refresh.is_zero() || cutoff.is_zero() {
            bail!("REFRESH_TIME and CUTOFF_TIME must be positive");
        }

        Ok(Self {
            addr,
            database_url:    env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            max_connections: var_or("DB_MAX_CONNECTIONS", 5)?,
            refresh,
            cutoff,
            body_limit:      var_or("BODY_LIMIT", 64 * 1024)?,
        })
    }
}

/// Parses `key` if set, else `default`. A set but malformed value is an error.
fn var_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().with_context(|| format!("invalid {key}: {raw:?}")),
        Err(_)  => Ok(default),
    }
}
