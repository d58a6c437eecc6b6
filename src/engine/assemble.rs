//! Assessment result assembly.
//!
//! Runs the classifier, the readiness rollup, and the overlap detector
//! across a full topology and combines their output into one report-ready
//! structure. Performs no I/O; running it twice on the same snapshot
//! yields identical results.

use crate::engine::classify::{classify, RiskLevel, SubnetClassification};
use crate::engine::overlap::{find_overlaps, OverlapPair};
use crate::engine::readiness::{aggregate, insufficient_route_table_redundancy, VnetReadiness};
use crate::models::Topology;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Per-subnet assessment detail.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubnetAssessment {
    pub id: String,
    pub name: String,
    pub address_prefix: String,
    pub classification: SubnetClassification,
    pub risk: RiskLevel,
    /// Total attached network interfaces.
    pub workload_count: usize,
    /// Interfaces with a public IP.
    pub workloads_with_public_ip: usize,
    /// Interfaces without a public IP.
    pub workloads_without_public_ip: usize,
}

/// Per-VNet assessment detail.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VnetAssessment {
    pub id: String,
    pub name: String,
    pub readiness: VnetReadiness,
    /// Advisory: route-based egress with fewer than two distinct route tables.
    pub insufficient_route_table_redundancy: bool,
    /// IDs of VNets whose address space overlaps this one.
    pub overlap_partners: Vec<String>,
    pub subnets: Vec<SubnetAssessment>,
}

/// Per-subscription assessment detail.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SubscriptionAssessment {
    pub id: String,
    pub display_name: String,
    pub vnets: Vec<VnetAssessment>,
}

/// Run-level summary counts.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total_subscriptions: usize,
    pub total_vnets: usize,
    pub total_subnets: usize,

    // Subnet classification counts
    pub subnets_no_workloads: usize,
    pub subnets_nat_gateway: usize,
    pub subnets_udr: usize,
    pub subnets_public: usize,
    pub subnets_default_egress: usize,
    pub subnets_mixed_mode: usize,

    // VNet readiness counts
    pub vnets_ready_secure: usize,
    pub vnets_ready_insecure: usize,
    pub vnets_not_ready: usize,
    pub vnets_with_redundancy_warning: usize,

    // Workload counts (NICs as workloads)
    pub total_workloads: usize,
    pub workloads_with_public_ip: usize,

    /// Subnets classified affected.
    pub affected_subnets: usize,
    /// Subnets with at least one workload (the percentage denominator).
    pub subnets_with_workloads: usize,
    /// affected_subnets / subnets_with_workloads, one decimal, 0 when the
    /// denominator is 0.
    pub affected_subnet_percentage: f64,

    pub cidr_overlap_count: usize,
}

/// The complete assessment, ready for rendering.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssessmentResult {
    pub subscriptions: Vec<SubscriptionAssessment>,
    pub cidr_overlaps: Vec<OverlapPair>,
    pub summary: Summary,
}

/// Assess the full topology.
///
/// Fails only on a structurally invalid topology (a discovery precondition
/// violation); every recoverable condition inside the snapshot still
/// produces a complete result for every entity.
pub fn assemble(topology: &Topology) -> Result<AssessmentResult, Box<dyn Error>> {
    topology.validate()?;

    let overlaps = find_overlaps(topology);
    let mut summary = Summary {
        total_subscriptions: topology.subscriptions.len(),
        cidr_overlap_count: overlaps.len(),
        ..Summary::default()
    };

    let mut subscriptions = Vec::with_capacity(topology.subscriptions.len());

    for sub in &topology.subscriptions {
        let mut vnets = Vec::with_capacity(sub.vnets.len());

        for vnet in &sub.vnets {
            summary.total_vnets += 1;

            let mut classifications = Vec::with_capacity(vnet.subnets.len());
            let mut subnets = Vec::with_capacity(vnet.subnets.len());

            for subnet in &vnet.subnets {
                let classification = classify(subnet, topology);
                classifications.push(classification);

                let workload_count = subnet.network_interfaces.len();
                let workloads_with_public_ip = subnet
                    .network_interfaces
                    .iter()
                    .filter(|nic| nic.has_public_ip)
                    .count();

                summary.total_subnets += 1;
                summary.total_workloads += workload_count;
                summary.workloads_with_public_ip += workloads_with_public_ip;
                if workload_count > 0 {
                    summary.subnets_with_workloads += 1;
                }
                if classification.is_affected() {
                    summary.affected_subnets += 1;
                }
                match classification {
                    SubnetClassification::NoWorkloads => summary.subnets_no_workloads += 1,
                    SubnetClassification::NatGateway => summary.subnets_nat_gateway += 1,
                    SubnetClassification::UdrDefaultRoute => summary.subnets_udr += 1,
                    SubnetClassification::PublicSubnet => summary.subnets_public += 1,
                    SubnetClassification::DefaultEgress => summary.subnets_default_egress += 1,
                    SubnetClassification::MixedMode => summary.subnets_mixed_mode += 1,
                }

                subnets.push(SubnetAssessment {
                    id: subnet.id.clone(),
                    name: subnet.name.clone(),
                    address_prefix: subnet.address_prefix.clone(),
                    classification,
                    risk: classification.risk(),
                    workload_count,
                    workloads_with_public_ip,
                    workloads_without_public_ip: workload_count - workloads_with_public_ip,
                });
            }

            let readiness = aggregate(&classifications);
            match readiness {
                VnetReadiness::ReadySecure => summary.vnets_ready_secure += 1,
                VnetReadiness::ReadyInsecure => summary.vnets_ready_insecure += 1,
                VnetReadiness::NotReady => summary.vnets_not_ready += 1,
            }

            let redundancy_warning = insufficient_route_table_redundancy(vnet, &classifications);
            if redundancy_warning {
                summary.vnets_with_redundancy_warning += 1;
            }

            let overlap_partners: Vec<String> = overlaps
                .iter()
                .filter_map(|pair| pair.partner_of(&vnet.id))
                .map(|id| id.to_string())
                .collect();

            vnets.push(VnetAssessment {
                id: vnet.id.clone(),
                name: vnet.name.clone(),
                readiness,
                insufficient_route_table_redundancy: redundancy_warning,
                overlap_partners,
                subnets,
            });
        }

        subscriptions.push(SubscriptionAssessment {
            id: sub.id.clone(),
            display_name: sub.display_name.clone(),
            vnets,
        });
    }

    summary.affected_subnet_percentage = if summary.subnets_with_workloads > 0 {
        let pct = summary.affected_subnets as f64 / summary.subnets_with_workloads as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    } else {
        0.0
    };

    Ok(AssessmentResult {
        subscriptions,
        cidr_overlaps: overlaps,
        summary,
    })
}
