//! Serialization of routing configurations to the daemon's text grammar.
//!
//! The output grammar is flat, brace-delimited blocks:
//!
//! ```text
//! LinkQualityFishEye  0
//! LoadPlugin "<library>" { PlParam "<key>" "<value>" ... }
//! Interface "<ifname>" { }
//! Hna4 { <network> <netmask> }
//! ```
//!
//! Rendering is deterministic: plugin blocks in list order, then the
//! interface block, then the `Hna4` blocks in document order. Two renders
//! of the same document are byte-identical.

use super::types::RoutingConfig;

impl RoutingConfig {
    /// Serialize the document to olsrd configuration text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("LinkQualityFishEye  0\n");

        for plugin in &self.plugins {
            out.push('\n');
            out.push_str(&format!("LoadPlugin \"{}\"\n", plugin.library));
            out.push_str("{\n");
            for (key, value) in &plugin.params {
                out.push_str(&format!("    PlParam      \"{}\" \"{}\"\n", key, value));
            }
            out.push_str("}\n");
        }

        out.push('\n');
        out.push_str(&format!("Interface \"{}\"\n", self.interface));
        out.push_str("{\n");
        out.push_str("}\n");

        for hna in &self.hna4 {
            out.push('\n');
            out.push_str("Hna4\n");
            out.push_str("{\n");
            out.push_str(&format!("    {} {}\n", hna.network, hna.netmask));
            out.push_str("}\n");
        }

        out
    }
}
