// cargo watch -x 'fmt' -x 'run'  // 'run -- --some-arg'

pub mod azure;
mod config;
pub mod engine;
pub mod models;
pub mod output;

use engine::AssessmentResult;
use models::Topology;
use std::error::Error;

/// Load the topology from cache (or discover it) and run the full
/// assessment over it.
pub fn run_assessment(
    cache_file: Option<&str>,
    subscription_filter: Option<&[String]>,
) -> Result<AssessmentResult, Box<dyn Error>> {
    let topology = azure::read_topology_cache(cache_file, subscription_filter)?;
    assess(&topology)
}

/// Run the classification engine over an already-materialized topology.
pub fn assess(topology: &Topology) -> Result<AssessmentResult, Box<dyn Error>> {
    let result = engine::assemble(topology)?;
    engine::log_overlaps(&result.cidr_overlaps);
    Ok(result)
}
