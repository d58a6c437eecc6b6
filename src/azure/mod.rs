//! Azure CLI and Resource Graph interaction.
//!
//! This module is the discovery collaborator: it materializes the topology
//! snapshot the engine consumes. Operations:
//! - [`cli`] - command execution for the Azure CLI
//! - [`graph`] - Resource Graph queries building the topology
//! - [`cache`] - caching of the discovered topology

mod cache;
mod cli;
mod graph;

// Re-export public functions
pub use cache::read_topology_cache;
pub use cli::run;
pub use graph::discover_topology;
