use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub vote_store: Option<VoteStoreConfig>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "5001"),
            vote_store: VoteStoreConfig::from_env(),
        }
    }
}

/// Connection details for the hosted vote table. Absent entirely when the
/// url or key env vars are not set, in which case the quiz runs local-only.
#[derive(Clone)]
pub struct VoteStoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    pub timeout: Duration,
}

impl VoteStoreConfig {
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("VOTE_STORE_URL").ok()?;
        let api_key = env::var("VOTE_STORE_KEY").ok()?;

        if base_url.trim().is_empty() || api_key.trim().is_empty() {
            warn!("Vote store url or key empty, running local-only");
            return None;
        }

        Some(Self {
            base_url,
            api_key,
            table: try_load("VOTE_STORE_TABLE", "votes"),
            timeout: Duration::from_millis(try_load("VOTE_STORE_TIMEOUT_MS", "2000")),
        })
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
