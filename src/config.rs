use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::blockchain::DEFAULT_DIFFICULTY;
use crate::consensus::DEFAULT_PEER_TIMEOUT_MS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got `{value}`")]
    InvalidNumber { name: &'static str, value: String },
}

/// Node settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub node_id: String,
    pub difficulty: usize,
    pub peer_timeout: Duration,
    /// `None` lets a proof search run until it succeeds.
    pub mine_timeout: Option<Duration>,
    pub bootstrap_peers: Vec<String>,
    /// `None` disables background conflict resolution.
    pub resolve_interval: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = number("PORT", 5000)?;
        let node_id = env::var("NODE_ID")
            .ok()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let difficulty = number("POW_DIFFICULTY", DEFAULT_DIFFICULTY)?;
        let peer_timeout = Duration::from_millis(number("PEER_TIMEOUT_MS", DEFAULT_PEER_TIMEOUT_MS)?);
        let mine_timeout = seconds(number("MINE_TIMEOUT_SECS", 0)?);
        let resolve_interval = seconds(number("RESOLVE_INTERVAL_SECS", 0)?);
        let bootstrap_peers = env::var("PEERS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            node_id,
            difficulty,
            peer_timeout,
            mine_timeout,
            bootstrap_peers,
            resolve_interval,
        })
    }
}

fn number<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(default),
    }
}

fn seconds(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
