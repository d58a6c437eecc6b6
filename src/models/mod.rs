//! Domain models for the egress assessment.
//!
//! This module contains the core data structures used throughout the
//! application:
//! - [`Ipv4`] - IPv4 address prefix with CIDR notation support
//! - [`Topology`] and its entities - the normalized network snapshot
//!   produced by discovery and consumed read-only by the engine

mod ipv4;
mod topology;

// Re-export public types
pub use ipv4::{broadcast_addr, cut_addr, get_cidr_mask, Ipv4, MAX_LENGTH};
pub use topology::{
    NatGateway, NetworkInterface, NextHopType, Route, RouteTable, Subnet, Subscription, Topology,
    VirtualNetwork,
};
