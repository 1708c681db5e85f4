//! Process-wide configuration (§6).
//!
//! Mirrors the way `valence_network::ServerPlugin` is built: a plain struct
//! with sane [`Default`]s that a node may override from a `config.toml` on
//! disk via [`ServerConfig::load`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Maximum concurrently-connected accounts (§4.11).
    pub player_capacity: usize,
    /// Maximum concurrently-hosted world instances (§4.11).
    pub world_capacity: usize,
    /// World instance movement/regen tick rate, in Hz (§4.5).
    pub tick_rate_hz: u32,
    /// Visibility grid sight radius in tiles, `R` in §4.3.
    pub sight_radius: i32,
    /// Minimum interval between movement heartbeats while moving (§4.4).
    pub heartbeat_interval: Duration,
    /// Maximum time a client has to ack a pending movement change (§4.4).
    pub ack_timeout: Duration,
    /// Per-session outbound buffer cap before a backpressure kick (§7).
    pub outgoing_byte_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            player_capacity: 3000,
            world_capacity: 64,
            tick_rate_hz: 60,
            sight_radius: 2,
            heartbeat_interval: Duration::from_millis(500),
            ack_timeout: Duration::from_secs(10),
            outgoing_byte_limit: 8 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file, falling back to [`Default`] for
    /// any field the file omits. Unlike `valence`'s config (all in-code),
    /// this matches `mirai`'s pattern of an optional on-disk override.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz as f64)
    }
}
