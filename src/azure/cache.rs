//! Topology cache management.
//!
//! Caches the discovered topology as JSON to avoid repeated Azure Resource
//! Graph calls while iterating on a report.

use super::graph::discover_topology;
use crate::config;
use crate::models::Topology;
use chrono;
use std::error::Error;
use std::path::Path;

/// Read the topology from a cache file, or discover it from Azure when the
/// default cache for today does not exist yet.
///
/// # Arguments
/// * `cache_file` - Optional explicit cache file; it must exist.
/// * `subscription_filter` - Subscription IDs passed to discovery.
pub fn read_topology_cache(
    cache_file: Option<&str>,
    subscription_filter: Option<&[String]>,
) -> Result<Topology, Box<dyn Error>> {
    let now = chrono::Utc::now().with_timezone(&chrono_tz::Pacific::Auckland);

    let cache_file = match cache_file {
        Some(file) => {
            if !Path::new(file).exists() {
                return Err(format!("Cache file does not exist: {file}").into());
            }
            log::info!("Using provided cache file: {file}");
            file.to_string()
        }
        None => format!(
            "{}_{}.json",
            config::CACHE_FILE_PREFIX,
            now.format("%Y-%m-%d")
        ),
    };

    let topology = match std::fs::read_to_string(&cache_file) {
        Ok(json) => {
            log::info!("Reading from cache file: {cache_file}");
            serde_json::from_str(&json).map_err(|e| format!("Error parsing cache JSON: {e}"))?
        }
        Err(_) => {
            log::warn!("Cache file not found: {cache_file}");
            let topology = discover_topology(subscription_filter)?;

            let json = serde_json::to_string(&topology)
                .map_err(|e| format!("Error serializing JSON: {e}"))?;
            log::warn!("Writing topology to cache file: {cache_file}");
            std::fs::write(&cache_file, json)
                .map_err(|e| format!("Error writing cache file {cache_file}: {e}"))?;
            topology
        }
    };

    Ok(topology)
}
