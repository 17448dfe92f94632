//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: IpAddr,
    /// HTTP server port
    pub server_port: u16,
    /// Delay after an entry's deadline before the sweeper re-checks it, in milliseconds
    pub sweep_grace_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `BIND_ADDR` - Listen address (default: 127.0.0.1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_GRACE_MS` - Sweep grace period in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_or("BIND_ADDR", defaults.bind_addr),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            sweep_grace_ms: env_or("SWEEP_GRACE_MS", defaults.sweep_grace_ms),
        }
    }

    /// Socket address assembled from `bind_addr` and `server_port`.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.server_port)
    }

    /// Sweep grace period as a `Duration`.
    pub fn sweep_grace(&self) -> Duration {
        Duration::from_millis(self.sweep_grace_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            server_port: 3000,
            sweep_grace_ms: 1000,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.bind_addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_grace_ms, 1000);
        assert_eq!(config.sweep_grace(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment so parallel tests do not race on it
        env::remove_var("BIND_ADDR");
        env::remove_var("SERVER_PORT");
        env::remove_var("SWEEP_GRACE_MS");

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_grace_ms, 1000);

        env::set_var("SERVER_PORT", "8080");
        env::set_var("SWEEP_GRACE_MS", "not-a-number");
        let config = Config::from_env();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.sweep_grace_ms, 1000);

        env::remove_var("SERVER_PORT");
        env::remove_var("SWEEP_GRACE_MS");
    }

    #[test]
    fn test_socket_addr() {
        let config = Config {
            server_port: 4242,
            ..Config::default()
        };
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:4242");
    }
}
