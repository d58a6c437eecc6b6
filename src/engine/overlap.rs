//! Overlapping VNet CIDR detection.
//!
//! Finds pairs of VNets whose address spaces intersect, across every
//! subscription in scope: two VNets in different subscriptions still cannot
//! share a hub if their ranges collide.

use crate::models::{Ipv4, Topology};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// An unordered pair of overlapping VNets, normalized so `first` sorts
/// before `second`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct OverlapPair {
    /// VNet resource ID (lexicographically smaller of the two).
    pub first: String,
    /// VNet resource ID.
    pub second: String,
}

impl OverlapPair {
    fn new(a: &str, b: &str) -> OverlapPair {
        if a <= b {
            OverlapPair {
                first: a.to_string(),
                second: b.to_string(),
            }
        } else {
            OverlapPair {
                first: b.to_string(),
                second: a.to_string(),
            }
        }
    }

    /// True when the pair involves the given VNet.
    pub fn involves(&self, vnet_id: &str) -> bool {
        self.first == vnet_id || self.second == vnet_id
    }

    /// The other member of the pair, if `vnet_id` is one of them.
    pub fn partner_of(&self, vnet_id: &str) -> Option<&str> {
        if self.first == vnet_id {
            Some(&self.second)
        } else if self.second == vnet_id {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// Find all overlapping VNet pairs across the full topology.
///
/// A pair is flagged when any prefix of one VNet overlaps any prefix of the
/// other. VNets with zero parseable prefixes take part in no overlaps. The
/// result is sorted, has no duplicates, and never pairs a VNet with itself.
pub fn find_overlaps(topology: &Topology) -> Vec<OverlapPair> {
    let vnet_prefixes: Vec<(&str, Vec<Ipv4>)> = topology
        .all_vnets()
        .map(|(_, vnet)| (vnet.id.as_str(), vnet.parsed_prefixes()))
        .collect();

    let mut pairs: Vec<OverlapPair> = vnet_prefixes
        .iter()
        .tuple_combinations()
        .filter(|((id_a, prefixes_a), (id_b, prefixes_b))| {
            id_a != id_b
                && prefixes_a
                    .iter()
                    .any(|a| prefixes_b.iter().any(|b| a.overlaps(b)))
        })
        .map(|((id_a, _), (id_b, _))| OverlapPair::new(id_a, id_b))
        .collect();

    // Sort and drop duplicates for deterministic, symmetric-free output
    pairs.sort();
    pairs.dedup();

    pairs
}

/// Log overlap conflicts as warnings.
pub fn log_overlaps(pairs: &[OverlapPair]) {
    if pairs.is_empty() {
        log::info!("No overlapping VNet CIDRs found.");
        return;
    }

    log::warn!("Found {} overlapping VNet pair(s):", pairs.len());
    for pair in pairs {
        log::warn!("  '{}' overlaps '{}'", pair.first, pair.second);
    }
}
