//! Routing daemon configuration synthesis.
//!
//! This module builds the structured OLSRd configuration document for a
//! node's role and serializes it to the daemon's native text grammar.

pub mod render;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{Hna4Entry, PluginSpec, RoutingConfig};
