//! Per-VNet readiness rollup.
//!
//! Readiness is derived from the subnet classifications of a VNet, never
//! computed independently. The route-table redundancy warning is advisory
//! and does not change the readiness state.

use crate::engine::classify::SubnetClassification;
use crate::models::VirtualNetwork;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Readiness of a VNet for default egress retirement.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VnetReadiness {
    /// At least one subnet egresses through an inspected UDR.
    #[serde(rename = "Ready: Secure")]
    ReadySecure,
    /// No inspected UDR, but at least one subnet has a NAT gateway.
    #[serde(rename = "Ready: Insecure")]
    ReadyInsecure,
    /// Everything else, including VNets with only empty or affected subnets.
    #[serde(rename = "Not Ready")]
    NotReady,
}

impl VnetReadiness {
    pub fn label(&self) -> &'static str {
        match self {
            VnetReadiness::ReadySecure => "Ready: Secure",
            VnetReadiness::ReadyInsecure => "Ready: Insecure",
            VnetReadiness::NotReady => "Not Ready",
        }
    }
}

impl fmt::Display for VnetReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Roll subnet classifications up into one readiness state.
pub fn aggregate(classifications: &[SubnetClassification]) -> VnetReadiness {
    if classifications
        .iter()
        .any(|c| *c == SubnetClassification::UdrDefaultRoute)
    {
        VnetReadiness::ReadySecure
    } else if classifications
        .iter()
        .any(|c| *c == SubnetClassification::NatGateway)
    {
        VnetReadiness::ReadyInsecure
    } else {
        VnetReadiness::NotReady
    }
}

/// True when the VNet relies on route-based egress but references fewer
/// than two distinct route tables, leaving no NVA failover path.
///
/// Dangling references still count: the warning is about configured
/// redundancy, not whether the tables resolve.
pub fn insufficient_route_table_redundancy(
    vnet: &VirtualNetwork,
    classifications: &[SubnetClassification],
) -> bool {
    let uses_route_based_egress = classifications.iter().any(|c| c.is_route_based());
    if !uses_route_based_egress {
        return false;
    }

    let distinct_route_tables: HashSet<&str> = vnet
        .subnets
        .iter()
        .filter_map(|s| s.route_table_id.as_deref())
        .collect();

    distinct_route_tables.len() < 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subnet;

    fn vnet_with_route_tables(route_table_ids: Vec<Option<&str>>) -> VirtualNetwork {
        VirtualNetwork {
            id: "vnet-1".to_string(),
            name: "vnet-1".to_string(),
            address_prefixes: vec!["10.0.0.0/16".to_string()],
            subnets: route_table_ids
                .into_iter()
                .enumerate()
                .map(|(i, rt)| Subnet {
                    id: format!("snet-{i}"),
                    name: format!("snet-{i}"),
                    address_prefix: format!("10.0.{i}.0/24"),
                    route_table_id: rt.map(|s| s.to_string()),
                    nat_gateway_id: None,
                    network_interfaces: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn test_ready_secure_when_any_udr_subnet() {
        let readiness = aggregate(&[
            SubnetClassification::DefaultEgress,
            SubnetClassification::UdrDefaultRoute,
            SubnetClassification::NatGateway,
        ]);
        assert_eq!(readiness, VnetReadiness::ReadySecure);
    }

    #[test]
    fn test_ready_insecure_when_nat_but_no_udr() {
        let readiness = aggregate(&[
            SubnetClassification::NatGateway,
            SubnetClassification::NoWorkloads,
        ]);
        assert_eq!(readiness, VnetReadiness::ReadyInsecure);
    }

    #[test]
    fn test_not_ready_otherwise() {
        assert_eq!(
            aggregate(&[SubnetClassification::NoWorkloads]),
            VnetReadiness::NotReady
        );
        assert_eq!(
            aggregate(&[
                SubnetClassification::DefaultEgress,
                SubnetClassification::MixedMode
            ]),
            VnetReadiness::NotReady
        );
        assert_eq!(aggregate(&[]), VnetReadiness::NotReady);
    }

    #[test]
    fn test_mixed_mode_vnet_is_never_ready_secure() {
        // Mixed-mode alone cannot produce Ready: Secure
        let readiness = aggregate(&[SubnetClassification::MixedMode]);
        assert_ne!(readiness, VnetReadiness::ReadySecure);
    }

    #[test]
    fn test_redundancy_warning_single_shared_route_table() {
        // Two subnets sharing one route table, one affected subnet
        let vnet = vnet_with_route_tables(vec![Some("rt-1"), Some("rt-1")]);
        let classifications = [
            SubnetClassification::DefaultEgress,
            SubnetClassification::NoWorkloads,
        ];
        assert!(insufficient_route_table_redundancy(&vnet, &classifications));
    }

    #[test]
    fn test_no_warning_with_two_distinct_route_tables() {
        let vnet = vnet_with_route_tables(vec![Some("rt-1"), Some("rt-2")]);
        let classifications = [
            SubnetClassification::UdrDefaultRoute,
            SubnetClassification::UdrDefaultRoute,
        ];
        assert!(!insufficient_route_table_redundancy(
            &vnet,
            &classifications
        ));
    }

    #[test]
    fn test_no_warning_without_route_based_egress() {
        // NAT-gateway-only VNet does not need route-table redundancy
        let vnet = vnet_with_route_tables(vec![None]);
        let classifications = [SubnetClassification::NatGateway];
        assert!(!insufficient_route_table_redundancy(
            &vnet,
            &classifications
        ));
    }
}
