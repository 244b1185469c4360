//! Node role report.
//!
//! A small JSON document recording the classified role and derived
//! addressing for a node, written next to the generated scripts. Downstream
//! tooling reads it to see what meshsim decided without re-deriving roles.

use crate::address::InterfaceBinding;
use crate::node::Node;
use crate::role::Role;
use serde::Serialize;
use std::net::Ipv4Addr;

/// Filename of the role report inside the output directory.
pub const REPORT_FILENAME: &str = "node_role.json";

/// Classification and addressing summary for one node.
#[derive(Debug, Serialize)]
pub struct NodeReport {
    pub hostname: String,
    pub interface: String,
    pub addr: Ipv4Addr,
    pub prefix_len: u8,
    pub broadcast: Ipv4Addr,
    pub gateway: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hna_network: Option<Ipv4Addr>,
}

impl NodeReport {
    pub fn new(node: &Node, interface: &str, binding: &InterfaceBinding, role: &Role) -> Self {
        Self {
            hostname: node.hostname.clone(),
            interface: interface.to_string(),
            addr: binding.addr,
            prefix_len: binding.prefix_len,
            broadcast: binding.broadcast,
            gateway: role.gateway,
            hna_network: role.hna.map(|h| h.network),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address;
    use crate::node::Interface;
    use crate::role;
    use crate::settings::Settings;

    #[test]
    fn test_report_serialization() {
        let node = Node {
            hostname: "g1".to_string(),
            interfaces: vec![Interface {
                name: "eth0".to_string(),
                addr: Ipv4Addr::new(10, 0, 3, 10),
                prefix_len: 24,
            }],
        };
        let settings = Settings::default();
        let binding = address::primary_binding(&node, "eth0").unwrap();
        let role = role::classify(&node, &settings.local_subnet);

        let report = NodeReport::new(&node, "eth0", &binding, &role);
        let json = report.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["hostname"], "g1");
        assert_eq!(parsed["addr"], "10.0.3.10");
        assert_eq!(parsed["broadcast"], "10.0.255.255");
        assert_eq!(parsed["gateway"], true);
        // No HNA: the field is omitted entirely
        assert!(parsed.get("hna_network").is_none());
    }

    #[test]
    fn test_report_includes_hna_network() {
        let node = Node {
            hostname: "n2".to_string(),
            interfaces: vec![Interface {
                name: "eth0".to_string(),
                addr: Ipv4Addr::new(10, 100, 7, 20),
                prefix_len: 24,
            }],
        };
        let settings = Settings::default();
        let binding = address::primary_binding(&node, "eth0").unwrap();
        let role = role::classify(&node, &settings.local_subnet);

        let report = NodeReport::new(&node, "eth0", &binding, &role);
        let json = report.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["hna_network"], "10.100.7.0");
    }
}
