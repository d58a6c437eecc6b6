//! JSON export of the assessment result.

use crate::engine::AssessmentResult;
use std::error::Error;

/// Serialize the full assessment result to pretty-printed JSON.
pub fn to_json(result: &AssessmentResult) -> Result<String, Box<dyn Error>> {
    serde_json::to_string_pretty(result)
        .map_err(|e| format!("Error serializing assessment JSON: {e}").into())
}

/// Write the JSON report to a file and log the destination.
pub fn export_json(result: &AssessmentResult, path: &str) -> Result<(), Box<dyn Error>> {
    let json = to_json(result)?;
    std::fs::write(path, json).map_err(|e| format!("Error writing JSON file {path}: {e}"))?;
    log::info!("Wrote JSON report to {path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assemble;
    use crate::models::Topology;

    #[test]
    fn test_json_round_trip() {
        let json = std::fs::read_to_string("src/tests/test_data/topology_test_cache_01.json")
            .expect("missing test fixture");
        let topology: Topology = serde_json::from_str(&json).expect("bad fixture JSON");
        let result = assemble(&topology).expect("assessment failed");

        let text = to_json(&result).expect("serialize failed");
        let parsed: AssessmentResult = serde_json::from_str(&text).expect("parse failed");

        assert_eq!(parsed.summary, result.summary);
        assert_eq!(parsed.subscriptions.len(), result.subscriptions.len());
    }
}
