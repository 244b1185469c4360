//! Node role classification.
//!
//! Derives the node's routing role from its hostname and configured
//! addresses. The two facts are independent: a node can be a gateway, an
//! HNA announcer, both, or neither.

use crate::node::Node;
use crate::settings::SubnetPrefix;
use serde::Serialize;
use std::net::Ipv4Addr;

/// An HNA announcement derived from a local-subnet interface: the matching
/// address with its last octet zeroed, announced as a /24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HnaAnnouncement {
    pub network: Ipv4Addr,
}

impl HnaAnnouncement {
    pub const NETMASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);
}

/// The node's routing role as independent boolean facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Role {
    /// Node provides default-route connectivity to the mesh.
    pub gateway: bool,
    /// Node announces reachability to a local subnet, if any of its
    /// interfaces sit inside the configured local-subnet prefix.
    pub hna: Option<HnaAnnouncement>,
}

/// Zero the last octet of `addr`, yielding its /24 network address.
fn to_slash24_network(addr: Ipv4Addr) -> Ipv4Addr {
    let octets = addr.octets();
    Ipv4Addr::new(octets[0], octets[1], octets[2], 0)
}

/// Classify a node. Infallible: absence of a match yields both facts false.
///
/// Gateway nodes are identified by hostname convention: the first character
/// is an ASCII `'g'`, case-sensitive. HNA announcers are identified by any
/// interface address inside `local_subnet`; the first matching interface in
/// node order determines the announced /24.
pub fn classify(node: &Node, local_subnet: &SubnetPrefix) -> Role {
    let gateway = node.hostname.starts_with('g');

    let hna = node
        .interfaces
        .iter()
        .find(|iface| local_subnet.contains(iface.addr))
        .map(|iface| HnaAnnouncement {
            network: to_slash24_network(iface.addr),
        });

    Role { gateway, hna }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Interface;

    fn subnet() -> SubnetPrefix {
        SubnetPrefix {
            base: Ipv4Addr::new(10, 100, 0, 0),
            prefix_len: 16,
        }
    }

    fn node(hostname: &str, addrs: &[[u8; 4]]) -> Node {
        Node {
            hostname: hostname.to_string(),
            interfaces: addrs
                .iter()
                .enumerate()
                .map(|(i, a)| Interface {
                    name: format!("eth{}", i),
                    addr: Ipv4Addr::new(a[0], a[1], a[2], a[3]),
                    prefix_len: 24,
                })
                .collect(),
        }
    }

    #[test]
    fn test_gateway_by_hostname_prefix() {
        assert!(classify(&node("g1", &[[10, 0, 3, 10]]), &subnet()).gateway);
        assert!(classify(&node("gw-east", &[[10, 0, 3, 10]]), &subnet()).gateway);
        assert!(!classify(&node("n2", &[[10, 0, 3, 10]]), &subnet()).gateway);
        // Case-sensitive: uppercase G does not qualify
        assert!(!classify(&node("G1", &[[10, 0, 3, 10]]), &subnet()).gateway);
    }

    #[test]
    fn test_hna_announcer_from_local_subnet() {
        let role = classify(&node("n2", &[[10, 100, 7, 20]]), &subnet());
        assert!(!role.gateway);
        let hna = role.hna.unwrap();
        assert_eq!(hna.network, Ipv4Addr::new(10, 100, 7, 0));
    }

    #[test]
    fn test_hna_from_secondary_interface() {
        let role = classify(&node("n3", &[[10, 0, 3, 11], [10, 100, 2, 1]]), &subnet());
        assert_eq!(role.hna.unwrap().network, Ipv4Addr::new(10, 100, 2, 0));
    }

    #[test]
    fn test_first_match_wins() {
        let role = classify(
            &node("n4", &[[10, 100, 5, 9], [10, 100, 8, 3]]),
            &subnet(),
        );
        assert_eq!(role.hna.unwrap().network, Ipv4Addr::new(10, 100, 5, 0));
    }

    #[test]
    fn test_plain_node() {
        let role = classify(&node("n1", &[[10, 0, 3, 12]]), &subnet());
        assert!(!role.gateway);
        assert!(role.hna.is_none());
    }

    #[test]
    fn test_roles_are_independent() {
        let role = classify(&node("g2", &[[10, 100, 1, 1]]), &subnet());
        assert!(role.gateway);
        assert!(role.hna.is_some());
    }
}
