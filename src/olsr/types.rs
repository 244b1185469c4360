//! Routing configuration document types.
//!
//! These structures describe everything that ends up in the generated
//! `olsrd.conf`. All sequences are ordered so that rendering the same
//! document twice produces byte-identical text.

use crate::role::{HnaAnnouncement, Role};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// A daemon plugin to load, with its parameters in declaration order.
///
/// Parameters are an ordered list of pairs rather than a map: the daemon is
/// insensitive to parameter order but deterministic output requires a fixed
/// one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginSpec {
    /// Shared object name including its plugin interface version
    /// (e.g. "olsrd_txtinfo.so.0.1").
    pub library: String,
    /// `PlParam` key/value pairs.
    pub params: Vec<(String, String)>,
}

/// One `Hna4` announcement: a network the node claims reachability to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hna4Entry {
    pub network: Ipv4Addr,
    pub netmask: Ipv4Addr,
}

impl Hna4Entry {
    /// The default-route announcement made by gateway nodes.
    pub const DEFAULT_ROUTE: Hna4Entry = Hna4Entry {
        network: Ipv4Addr::new(0, 0, 0, 0),
        netmask: Ipv4Addr::new(0, 0, 0, 0),
    };
}

/// A complete routing daemon configuration for one node.
///
/// Built fresh for every start invocation and discarded after rendering;
/// nothing here survives a restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Interface the routing protocol runs on.
    pub interface: String,
    /// Plugins in load order.
    pub plugins: Vec<PluginSpec>,
    /// HNA announcements; at most two entries, default route first.
    pub hna4: Vec<Hna4Entry>,
}

impl RoutingConfig {
    /// Build the configuration for a node's role.
    ///
    /// The `hna4` sequence carries at most one default-route entry (gateway
    /// nodes only) and at most one local-subnet entry (HNA announcers
    /// only), in that order. The daemon parses `Hna4` blocks positionally,
    /// so the ordering is part of the contract.
    pub fn for_role(interface: &str, role: &Role, plugins: &[PluginSpec]) -> RoutingConfig {
        let mut hna4 = Vec::with_capacity(2);
        if role.gateway {
            hna4.push(Hna4Entry::DEFAULT_ROUTE);
        }
        if let Some(hna) = role.hna {
            hna4.push(Hna4Entry {
                network: hna.network,
                netmask: HnaAnnouncement::NETMASK,
            });
        }

        RoutingConfig {
            interface: interface.to_string(),
            plugins: plugins.to_vec(),
            hna4,
        }
    }
}
