//! Integration tests for azure-egress-assessment
//!
//! These tests verify the complete workflow from reading a topology cache
//! to the assembled assessment result.

use azure_egress_assessment::azure::read_topology_cache;
use azure_egress_assessment::engine::{SubnetClassification, VnetReadiness};
use azure_egress_assessment::{assess, run_assessment};

const TEST_CACHE: &str = "src/tests/test_data/topology_test_cache_01.json";

#[test]
fn test_full_workflow_with_cache() {
    let result = run_assessment(Some(TEST_CACHE), None).expect("Failed to run assessment");

    assert_eq!(result.subscriptions.len(), 2, "Expected 2 subscriptions");
    assert_eq!(result.summary.total_vnets, 3);
    assert_eq!(result.summary.total_subnets, 6);

    // vnet-hub: secure UDR subnet plus an empty one
    let hub = &result.subscriptions[0].vnets[0];
    assert_eq!(hub.name, "vnet-hub");
    assert_eq!(hub.readiness, VnetReadiness::ReadySecure);
    assert_eq!(
        hub.subnets[0].classification,
        SubnetClassification::UdrDefaultRoute
    );
    assert_eq!(
        hub.subnets[1].classification,
        SubnetClassification::NoWorkloads
    );
    // Both subnets share one route table
    assert!(hub.insufficient_route_table_redundancy);

    // vnet-app: NAT gateway, public and mixed-mode subnets
    let app = &result.subscriptions[0].vnets[1];
    assert_eq!(app.readiness, VnetReadiness::ReadyInsecure);
    assert_eq!(
        app.subnets[0].classification,
        SubnetClassification::NatGateway
    );
    assert_eq!(
        app.subnets[1].classification,
        SubnetClassification::PublicSubnet
    );
    assert_eq!(
        app.subnets[2].classification,
        SubnetClassification::MixedMode
    );
    assert!(!app.insufficient_route_table_redundancy);

    // vnet-legacy: dangling route table reference falls through to
    // default egress
    let legacy = &result.subscriptions[1].vnets[0];
    assert_eq!(legacy.readiness, VnetReadiness::NotReady);
    assert_eq!(
        legacy.subnets[0].classification,
        SubnetClassification::DefaultEgress
    );
    assert!(legacy.insufficient_route_table_redundancy);
}

#[test]
fn test_cross_subscription_overlap_detected() {
    let result = run_assessment(Some(TEST_CACHE), None).expect("Failed to run assessment");

    // vnet-hub 10.0.0.0/16 overlaps vnet-legacy 10.0.5.0/24 across
    // subscriptions
    assert_eq!(result.cidr_overlaps.len(), 1);
    let pair = &result.cidr_overlaps[0];
    assert!(pair.first.contains("vnet-hub"));
    assert!(pair.second.contains("vnet-legacy"));
    assert_ne!(pair.first, pair.second);

    let hub = &result.subscriptions[0].vnets[0];
    let legacy = &result.subscriptions[1].vnets[0];
    assert_eq!(hub.overlap_partners.len(), 1);
    assert_eq!(legacy.overlap_partners.len(), 1);
    assert_eq!(hub.overlap_partners[0], legacy.id);

    // vnet-app does not overlap anything
    assert!(result.subscriptions[0].vnets[1].overlap_partners.is_empty());
}

#[test]
fn test_summary_counts_from_cache() {
    let result = run_assessment(Some(TEST_CACHE), None).expect("Failed to run assessment");
    let s = &result.summary;

    assert_eq!(s.total_subscriptions, 2);
    assert_eq!(s.subnets_no_workloads, 1);
    assert_eq!(s.subnets_nat_gateway, 1);
    assert_eq!(s.subnets_udr, 1);
    assert_eq!(s.subnets_public, 1);
    assert_eq!(s.subnets_mixed_mode, 1);
    assert_eq!(s.subnets_default_egress, 1);

    assert_eq!(s.vnets_ready_secure, 1);
    assert_eq!(s.vnets_ready_insecure, 1);
    assert_eq!(s.vnets_not_ready, 1);
    assert_eq!(s.vnets_with_redundancy_warning, 2);

    assert_eq!(s.total_workloads, 11);
    assert_eq!(s.workloads_with_public_ip, 5);

    // 2 affected subnets out of 5 with workloads
    assert_eq!(s.affected_subnets, 2);
    assert_eq!(s.subnets_with_workloads, 5);
    assert_eq!(s.affected_subnet_percentage, 40.0);
    assert_eq!(s.cidr_overlap_count, 1);
}

#[test]
fn test_assess_is_deterministic() {
    let topology = read_topology_cache(Some(TEST_CACHE), None).expect("Failed to read cache");

    let first = serde_json::to_vec(&assess(&topology).expect("assessment failed")).unwrap();
    let second = serde_json::to_vec(&assess(&topology).expect("assessment failed")).unwrap();

    assert_eq!(first, second, "Same snapshot must yield identical results");
}
