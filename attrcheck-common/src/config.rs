//! Configuration loading and listen-address resolution

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::{Error, Result};

/// Default listen host (matches the service's historical bind address)
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default listen port
pub const DEFAULT_PORT: u16 = 8000;

/// Service listen configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServiceConfig {
    /// Parse the configured listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid listen address: {}", e)))
    }
}

/// Resolve the listen configuration following priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable (merged into the CLI layer)
/// 3. TOML config file
/// 4. Compiled default (fallback)
pub fn resolve_listen_config(cli_host: Option<&str>, cli_port: Option<u16>) -> ServiceConfig {
    let mut config = ServiceConfig::default();

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(content) = std::fs::read_to_string(&config_path) {
            let (host, port) = listen_values_from_toml(&content);
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
        }
    }

    // Priorities 1 and 2: CLI argument / environment variable
    if let Some(host) = cli_host {
        config.host = host.to_string();
    }
    if let Some(port) = cli_port {
        config.port = port;
    }

    config
}

/// Read `host` and `port` keys from a TOML document, ignoring anything
/// malformed or out of range
fn listen_values_from_toml(content: &str) -> (Option<String>, Option<u16>) {
    let Ok(value) = toml::from_str::<toml::Value>(content) else {
        return (None, None);
    };
    let host = value
        .get("host")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());
    let port = value
        .get("port")
        .and_then(|v| v.as_integer())
        .and_then(|p| u16::try_from(p).ok());
    (host, port)
}

/// Locate the configuration file for the platform.
/// Linux probes the user config directory first, then /etc.
fn locate_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("attrcheck").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/attrcheck/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_cli_overrides_default() {
        let config = resolve_listen_config(Some("0.0.0.0"), Some(9000));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_toml_listen_values() {
        let (host, port) = listen_values_from_toml("host = \"0.0.0.0\"\nport = 9100\n");
        assert_eq!(host.as_deref(), Some("0.0.0.0"));
        assert_eq!(port, Some(9100));
    }

    #[test]
    fn test_toml_partial_values() {
        let (host, port) = listen_values_from_toml("port = 9100\n");
        assert_eq!(host, None);
        assert_eq!(port, Some(9100));
    }

    #[test]
    fn test_toml_out_of_range_port_ignored() {
        let (_, port) = listen_values_from_toml("port = 100000\n");
        assert_eq!(port, None);
    }

    #[test]
    fn test_toml_malformed_content_ignored() {
        let (host, port) = listen_values_from_toml("not valid toml [[");
        assert_eq!(host, None);
        assert_eq!(port, None);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServiceConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 8000);

        let bad = ServiceConfig {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(bad.socket_addr().is_err());
    }
}
