//! Per-subnet egress classification.
//!
//! Pure decision cascade over one subnet and the topology's shared-resource
//! indexes. The rule order is precedence, not just category membership:
//! the first matching rule wins.

use crate::models::{NextHopType, Route, Subnet, Topology};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remediation risk attached to a classification.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
}

/// The six subnet classifications, in evaluation order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubnetClassification {
    /// Rule 1: no network interfaces attached.
    #[serde(rename = "No Workloads")]
    NoWorkloads,
    /// Rule 2: a NAT gateway reference that resolves in the topology.
    /// Functional egress without inspection.
    #[serde(rename = "Azure NAT Gateway")]
    NatGateway,
    /// Rule 3: a resolving route table with a 0.0.0.0/0 route through a
    /// virtual appliance or private next-hop IP.
    #[serde(rename = "UDR with 0.0.0.0/0")]
    UdrDefaultRoute,
    /// Rule 4: every attached interface has a public IP.
    #[serde(rename = "Public Subnet")]
    PublicSubnet,
    /// Rule 5: interfaces with and without public IPs side by side. Any
    /// explicit route added later breaks return traffic for the public-IP
    /// workloads unless they move first.
    #[serde(rename = "Affected: Mixed-Mode")]
    MixedMode,
    /// Rule 6 (fallback): workloads present, egress relies on the implicit
    /// default path.
    #[serde(rename = "Affected: Default Egress")]
    DefaultEgress,
}

impl SubnetClassification {
    /// Report label, matching the assessment taxonomy.
    pub fn label(&self) -> &'static str {
        match self {
            SubnetClassification::NoWorkloads => "No Workloads",
            SubnetClassification::NatGateway => "Azure NAT Gateway",
            SubnetClassification::UdrDefaultRoute => "UDR with 0.0.0.0/0",
            SubnetClassification::PublicSubnet => "Public Subnet",
            SubnetClassification::MixedMode => "Affected: Mixed-Mode",
            SubnetClassification::DefaultEgress => "Affected: Default Egress",
        }
    }

    /// Risk level for this classification.
    pub fn risk(&self) -> RiskLevel {
        match self {
            SubnetClassification::NoWorkloads => RiskLevel::None,
            SubnetClassification::NatGateway => RiskLevel::Low,
            SubnetClassification::UdrDefaultRoute => RiskLevel::None,
            SubnetClassification::PublicSubnet => RiskLevel::Low,
            SubnetClassification::MixedMode => RiskLevel::High,
            SubnetClassification::DefaultEgress => RiskLevel::Medium,
        }
    }

    /// True for classifications that depend on default egress retirement.
    pub fn is_affected(&self) -> bool {
        matches!(
            self,
            SubnetClassification::MixedMode | SubnetClassification::DefaultEgress
        )
    }

    /// True for classifications whose egress is route based (a qualifying
    /// UDR, or the implicit default path a UDR would replace).
    pub fn is_route_based(&self) -> bool {
        matches!(
            self,
            SubnetClassification::UdrDefaultRoute | SubnetClassification::DefaultEgress
        )
    }
}

impl fmt::Display for SubnetClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// True when the route provides an inspected egress path: next hop is a
/// virtual appliance, or the next-hop IP is a private address. Internet and
/// None hops (and anything else) do not qualify.
fn is_inspected_hop(route: &Route) -> bool {
    route.next_hop_type == NextHopType::VirtualAppliance || route.has_private_next_hop()
}

/// Classify one subnet. Total over all well-formed inputs: dangling
/// route-table or NAT-gateway references fall through as if absent.
pub fn classify(subnet: &Subnet, topology: &Topology) -> SubnetClassification {
    // Rule 1: nothing attached, nothing to remediate.
    if subnet.network_interfaces.is_empty() {
        return SubnetClassification::NoWorkloads;
    }

    // Rule 2: NAT gateway short-circuits before any public-IP analysis.
    if let Some(nat_id) = &subnet.nat_gateway_id {
        if topology.nat_gateway_exists(nat_id) {
            return SubnetClassification::NatGateway;
        }
        log::debug!(
            "subnet '{}' references unknown NAT gateway '{}', treating as absent",
            subnet.name,
            nat_id
        );
    }

    // Rule 3: first 0.0.0.0/0 route decides; source data should not hold
    // duplicates but must not break us if it does.
    if let Some(route_table) = subnet
        .route_table_id
        .as_deref()
        .and_then(|id| topology.route_table(id))
    {
        if let Some(default_route) = route_table.routes.iter().find(|r| r.is_default_route()) {
            if is_inspected_hop(default_route) {
                return SubnetClassification::UdrDefaultRoute;
            }
            log::debug!(
                "subnet '{}' default route via '{}' is uninspected, falling through",
                subnet.name,
                default_route.next_hop_type
            );
        }
    } else if let Some(rt_id) = &subnet.route_table_id {
        log::debug!(
            "subnet '{}' references unknown route table '{}', treating as absent",
            subnet.name,
            rt_id
        );
    }

    let nic_count = subnet.network_interfaces.len();
    let public_count = subnet
        .network_interfaces
        .iter()
        .filter(|nic| nic.has_public_ip)
        .count();

    // Rule 4: all workloads egress directly over their public IPs.
    if public_count == nic_count {
        return SubnetClassification::PublicSubnet;
    }

    // Rule 5: asymmetric-routing hazard.
    if public_count > 0 {
        return SubnetClassification::MixedMode;
    }

    // Rule 6: fallback, implicit default egress.
    SubnetClassification::DefaultEgress
}
