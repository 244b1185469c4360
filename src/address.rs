//! Interface address inspection.
//!
//! Reads the primary interface's current binding off the node description
//! and derives the broadcast address used by the emulation's flat
//! addressing scheme.

use crate::node::Node;
use std::net::Ipv4Addr;

/// Prefix length every node is re-bound to at start, widening its local
/// broadcast domain to the emulation's flat /16 scheme.
pub const FLAT_PREFIX_LEN: u8 = 16;

/// Errors raised while inspecting a node's addressing
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    #[error("interface '{name}' not found on node '{hostname}'")]
    InterfaceNotFound { name: String, hostname: String },
}

/// An interface's current address binding together with the broadcast
/// address the emulation expects it to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterfaceBinding {
    pub addr: Ipv4Addr,
    pub prefix_len: u8,
    pub broadcast: Ipv4Addr,
}

/// Compute the emulation broadcast address for `addr`: the first two octets
/// are preserved and the last two are set to 255.
///
/// This hard-codes a /16 broadcast domain regardless of the interface's
/// actual prefix length. Precondition: all nodes sharing an emulated
/// broadcast domain share their first two address octets; if a topology
/// violates that, the computed broadcasts are wrong and this function
/// cannot detect it.
pub fn broadcast_for(addr: Ipv4Addr) -> Ipv4Addr {
    let octets = addr.octets();
    Ipv4Addr::new(octets[0], octets[1], 255, 255)
}

/// Read the named interface's binding from the node description.
pub fn primary_binding(node: &Node, ifname: &str) -> Result<InterfaceBinding, AddressError> {
    let iface = node
        .interface(ifname)
        .ok_or_else(|| AddressError::InterfaceNotFound {
            name: ifname.to_string(),
            hostname: node.hostname.clone(),
        })?;

    Ok(InterfaceBinding {
        addr: iface.addr,
        prefix_len: iface.prefix_len,
        broadcast: broadcast_for(iface.addr),
    })
}
