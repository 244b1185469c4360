//! Emulated node description.
//!
//! The hosting emulation framework owns the node inventory; meshsim reads a
//! per-node YAML description (hostname plus configured interfaces) and never
//! mutates it. All role and addressing decisions are derived from this model.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::net::Ipv4Addr;
use std::path::Path;

/// A single emulated node as described by the hosting framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Node hostname as assigned by the emulation (e.g. "g1", "n2").
    pub hostname: String,
    /// Interfaces configured on the node, in framework order.
    pub interfaces: Vec<Interface>,
}

/// One IPv4 interface binding on a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interface {
    /// Interface name (e.g. "eth0").
    pub name: String,
    /// Currently bound IPv4 address.
    pub addr: Ipv4Addr,
    /// Prefix length of the current binding.
    pub prefix_len: u8,
}

/// Node description validation errors
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("node '{hostname}' has no interfaces")]
    NoInterfaces { hostname: String },

    #[error("interface '{name}' has invalid prefix length {prefix_len}")]
    InvalidPrefixLength { name: String, prefix_len: u8 },

    #[error("node hostname cannot be empty")]
    EmptyHostname,
}

impl Node {
    /// Validate the node description before any of it is acted on.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.hostname.is_empty() {
            return Err(NodeError::EmptyHostname);
        }
        if self.interfaces.is_empty() {
            return Err(NodeError::NoInterfaces {
                hostname: self.hostname.clone(),
            });
        }
        for iface in &self.interfaces {
            if iface.prefix_len > 32 {
                return Err(NodeError::InvalidPrefixLength {
                    name: iface.name.clone(),
                    prefix_len: iface.prefix_len,
                });
            }
        }
        Ok(())
    }

    /// Look up an interface by name.
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|iface| iface.name == name)
    }
}

/// Load and validate a node description from a YAML file
pub fn load_node(path: &Path) -> color_eyre::Result<Node> {
    log::info!("Loading node description from: {:?}", path);

    let file = File::open(path)?;
    let node: Node = serde_yaml::from_reader(file)?;
    node.validate()?;

    Ok(node)
}
