//! Service settings.
//!
//! All environment-dependent knobs of the service live in one explicit
//! struct with documented defaults, loadable from a YAML file. The only
//! ambient input is the `MESHSIM_OLSRD_DIR` environment variable, which
//! overrides the daemon installation directory when set.

use crate::olsr::PluginSpec;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

/// Default daemon installation directory when neither the settings file nor
/// `MESHSIM_OLSRD_DIR` provide one.
pub const DEFAULT_OLSRD_DIR: &str = "/opt/olsrd";

/// Environment variable overriding the daemon installation directory.
pub const OLSRD_DIR_ENV: &str = "MESHSIM_OLSRD_DIR";

/// Fixed filename the routing configuration is written to, relative to the
/// node's working directory.
pub const OLSRD_CONF_FILENAME: &str = "olsrd.conf";

/// Process name used to launch and to terminate the daemon.
pub const OLSRD_PROCESS_NAME: &str = "olsrd";

/// A local subnet prefix expressed as base address + prefix length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubnetPrefix {
    pub base: Ipv4Addr,
    pub prefix_len: u8,
}

impl SubnetPrefix {
    /// True if `addr` falls inside this prefix.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        if self.prefix_len == 0 {
            return true;
        }
        let mask = u32::MAX << (32 - u32::from(self.prefix_len));
        (u32::from(addr) & mask) == (u32::from(self.base) & mask)
    }
}

/// Settings for one node's routing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Daemon installation directory; the executable is `<olsrd_dir>/olsrd`.
    pub olsrd_dir: String,
    /// Interface the routing protocol runs on.
    pub primary_interface: String,
    /// Internet-facing interface shaped on gateway nodes.
    pub uplink_interface: String,
    /// Prefix whose members announce their /24 as an HNA.
    pub local_subnet: SubnetPrefix,
    /// Egress rate cap applied to the uplink on gateway nodes.
    pub shaping_rate: String,
    /// Upper bound on how long a daemon launch may take before it is
    /// considered failed.
    #[serde(with = "humantime_serde")]
    pub launch_timeout: Duration,
    /// Plugins loaded into every generated configuration, in load order.
    pub plugins: Vec<PluginSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            olsrd_dir: DEFAULT_OLSRD_DIR.to_string(),
            primary_interface: "eth0".to_string(),
            uplink_interface: "eth1".to_string(),
            local_subnet: SubnetPrefix {
                base: Ipv4Addr::new(10, 100, 0, 0),
                prefix_len: 16,
            },
            shaping_rate: "1Mbit".to_string(),
            launch_timeout: Duration::from_secs(10),
            plugins: default_plugins(),
        }
    }
}

/// The two information-query plugins every node loads.
fn default_plugins() -> Vec<PluginSpec> {
    vec![
        PluginSpec {
            library: "olsrd_txtinfo.so.0.1".to_string(),
            params: vec![("accept".to_string(), "0.0.0.0".to_string())],
        },
        PluginSpec {
            library: "olsrd_jsoninfo.so.0.0".to_string(),
            params: vec![
                ("port".to_string(), "9090".to_string()),
                ("accept".to_string(), "0.0.0.0".to_string()),
            ],
        },
    ]
}

impl Settings {
    /// Apply the `MESHSIM_OLSRD_DIR` environment override, if present.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = env::var(OLSRD_DIR_ENV) {
            if !dir.is_empty() {
                log::info!("Overriding olsrd_dir from {}: {}", OLSRD_DIR_ENV, dir);
                self.olsrd_dir = dir;
            }
        }
        self
    }

    /// Full path to the daemon executable.
    pub fn olsrd_executable(&self) -> String {
        format!("{}/{}", self.olsrd_dir.trim_end_matches('/'), OLSRD_PROCESS_NAME)
    }
}

/// Load settings from a YAML file, or defaults when no file is given.
/// Environment overrides are applied in both cases.
pub fn load_settings(path: Option<&Path>) -> color_eyre::Result<Settings> {
    let settings = match path {
        Some(path) => {
            log::info!("Loading settings from: {:?}", path);
            let file = File::open(path)?;
            serde_yaml::from_reader(file)?
        }
        None => Settings::default(),
    };
    Ok(settings.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.olsrd_dir, "/opt/olsrd");
        assert_eq!(settings.primary_interface, "eth0");
        assert_eq!(settings.uplink_interface, "eth1");
        assert_eq!(settings.shaping_rate, "1Mbit");
        assert_eq!(settings.launch_timeout, Duration::from_secs(10));
        assert_eq!(settings.plugins.len(), 2);
        assert_eq!(settings.olsrd_executable(), "/opt/olsrd/olsrd");
    }

    #[test]
    fn test_subnet_contains() {
        let subnet = SubnetPrefix {
            base: Ipv4Addr::new(10, 100, 0, 0),
            prefix_len: 16,
        };
        assert!(subnet.contains(Ipv4Addr::new(10, 100, 7, 20)));
        assert!(subnet.contains(Ipv4Addr::new(10, 100, 255, 1)));
        assert!(!subnet.contains(Ipv4Addr::new(10, 0, 3, 10)));
        assert!(!subnet.contains(Ipv4Addr::new(10, 101, 0, 1)));
    }

    #[test]
    fn test_subnet_zero_prefix_matches_everything() {
        let subnet = SubnetPrefix {
            base: Ipv4Addr::new(0, 0, 0, 0),
            prefix_len: 0,
        };
        assert!(subnet.contains(Ipv4Addr::new(203, 0, 113, 9)));
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
olsrd_dir: /srv/olsrd-git
local_subnet:
  base: 10.200.0.0
  prefix_len: 16
launch_timeout: 30s
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.olsrd_dir, "/srv/olsrd-git");
        assert_eq!(settings.local_subnet.base, Ipv4Addr::new(10, 200, 0, 0));
        assert_eq!(settings.launch_timeout, Duration::from_secs(30));
        // Unset fields keep their defaults
        assert_eq!(settings.primary_interface, "eth0");
        assert_eq!(settings.plugins.len(), 2);
    }

    #[test]
    fn test_executable_path_trims_trailing_slash() {
        let settings = Settings {
            olsrd_dir: "/srv/olsrd/".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.olsrd_executable(), "/srv/olsrd/olsrd");
    }
}
