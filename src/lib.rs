//! # Meshsim - OLSR routing service configurator for emulated network nodes
//!
//! This library configures and supervises a single OLSR mesh routing daemon
//! instance inside one node of an emulated network topology.
//!
//! ## Overview
//!
//! An emulation framework schedules one meshsim invocation per node. Given
//! the node's hostname and configured interfaces, meshsim decides what the
//! node's routing role is, synthesizes a role-appropriate daemon
//! configuration, emits the per-node control scripts, and can drive the
//! daemon lifecycle directly.
//!
//! ## Key Features
//!
//! - **Role classification**: gateway and local-subnet announcer facts
//!   derived from the node description, independently combinable
//! - **Config synthesis**: deterministic serialization to the daemon's
//!   brace-delimited configuration grammar
//! - **Lifecycle control**: ordered start sequence (IPv6 off, interface
//!   readdressing, config write, optional gateway shaping, daemon launch)
//!   and idempotent stop
//! - **Script generation**: start/stop/environment shell artifacts with all
//!   role decisions resolved at generation time
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `node`: node description structures and YAML parsing
//! - `settings`: explicit service settings with documented defaults
//! - `address`: interface binding lookup and broadcast derivation
//! - `role`: role classification from hostname and addresses
//! - `olsr`: routing configuration document and its text rendering
//! - `scripts`: control-script generation
//! - `lifecycle`: start/stop state machine and capability traits
//! - `registry`: role report artifact
//! - `orchestrator`: high-level orchestration of the three operations
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use meshsim::{node, orchestrator, settings};
//! use meshsim::lifecycle::SystemEmitter;
//! use std::path::Path;
//!
//! let node = node::load_node(Path::new("node.yaml"))?;
//! let settings = settings::load_settings(None)?;
//!
//! let mut emitter = SystemEmitter::new("out".into());
//! orchestrator::generate_artifacts(&settings, &node, &mut emitter)?;
//!
//! // The out directory now contains:
//! // - olsrdservice_start.sh / olsrdservice_stop.sh: control scripts
//! // - .bashrc: per-node interactive environment
//! // - node_role.json: classification report
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Module-level failures are typed with `thiserror`
//! (`node::NodeError`, `address::AddressError`,
//! `lifecycle::LifecycleError`); the orchestration layer and the binary
//! report through `color_eyre` with context.

pub mod address;
pub mod lifecycle;
pub mod node;
pub mod olsr;
pub mod orchestrator;
pub mod registry;
pub mod role;
pub mod scripts;
pub mod settings;
