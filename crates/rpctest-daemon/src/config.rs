//! Launch configuration.
//!
//! Built once from an optional TOML file plus command-line flags, then
//! handed to the controller by value.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use rpctest_service::SocketRegistryConfig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Pidfile used when none is configured.
pub const DEFAULT_PIDFILE: &str = "/var/run/squared.pid";

/// Top-level launcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Stay attached to the terminal instead of detaching.
    #[serde(default)]
    pub foreground: bool,
    /// Signal the instance named in the pidfile instead of starting one.
    #[serde(default)]
    pub kill: bool,
    /// `None` disables singleton enforcement and pidfile bookkeeping.
    #[serde(default = "default_pidfile", skip_serializing_if = "Option::is_none")]
    pub pidfile: Option<PathBuf>,
    /// Use the legacy registration entry point when no nettypes are given.
    #[serde(default)]
    pub oldstyle: bool,
    /// Nettypes to register on, in order. `None` is "no preference"; in
    /// TOML it is written as the empty string.
    #[serde(
        default,
        serialize_with = "serialize_nettypes",
        deserialize_with = "deserialize_nettypes"
    )]
    pub nettypes: Vec<Option<String>>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub service: ServiceConfig,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            foreground: false,
            kill: false,
            pidfile: default_pidfile(),
            oldstyle: false,
            nettypes: Vec::new(),
            log_level: default_log_level(),
            service: ServiceConfig::default(),
        }
    }
}

/// Where the service's endpoints are bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_bind")]
    pub bind: IpAddr,
    /// `0` lets each endpoint pick an ephemeral port.
    #[serde(default)]
    pub port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: 0,
        }
    }
}

impl From<&ServiceConfig> for SocketRegistryConfig {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            bind: config.bind,
            port: config.port,
        }
    }
}

/// Translate a nettype argument; the empty string means no preference.
pub fn nettype_from_arg(arg: &str) -> Option<String> {
    if arg.is_empty() {
        None
    } else {
        Some(arg.to_string())
    }
}

fn serialize_nettypes<S: Serializer>(
    nettypes: &[Option<String>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(nettypes.iter().map(|n| n.as_deref().unwrap_or("")))
}

fn deserialize_nettypes<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<Option<String>>, D::Error> {
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw.iter().map(|s| nettype_from_arg(s)).collect())
}

#[allow(clippy::unnecessary_wraps)]
fn default_pidfile() -> Option<PathBuf> {
    Some(PathBuf::from(DEFAULT_PIDFILE))
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LaunchConfig::default();
        assert!(!config.foreground);
        assert!(!config.kill);
        assert!(!config.oldstyle);
        assert_eq!(config.pidfile, Some(PathBuf::from("/var/run/squared.pid")));
        assert!(config.nettypes.is_empty());
        assert_eq!(config.service.port, 0);
    }

    #[test]
    fn empty_file_is_default() {
        let config: LaunchConfig = toml::from_str("").unwrap();
        assert_eq!(config, LaunchConfig::default());
    }

    #[test]
    fn parse_example_config() {
        let toml_str = r#"
foreground = true
pidfile = "/run/rpctest/squared.pid"
nettypes = ["", "tcp", "datagram_v"]
log_level = "debug"

[service]
bind = "127.0.0.1"
port = 24900
"#;
        let config: LaunchConfig = toml::from_str(toml_str).unwrap();
        assert!(config.foreground);
        assert_eq!(config.pidfile, Some(PathBuf::from("/run/rpctest/squared.pid")));
        assert_eq!(
            config.nettypes,
            vec![None, Some("tcp".to_string()), Some("datagram_v".to_string())]
        );
        assert_eq!(config.service.bind, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.service.port, 24900);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn no_preference_survives_serialization() {
        let config = LaunchConfig {
            nettypes: vec![None, Some("udp".to_string())],
            ..LaunchConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains(r#""""#));
        let decoded: LaunchConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn empty_arg_is_no_preference() {
        assert_eq!(nettype_from_arg(""), None);
        assert_eq!(nettype_from_arg("tcp"), Some("tcp".to_string()));
    }
}
