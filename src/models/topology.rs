//! Normalized Azure network topology model.
//!
//! The topology is an immutable snapshot built once per assessment run by
//! the discovery layer and handed to the classification engine read-only.
//! Ownership flows Subscription -> VNet -> Subnet -> NetworkInterface;
//! route tables and NAT gateways are shared resources, held in id-keyed
//! maps on [`Topology`] and referenced by identifier from subnets.

use super::Ipv4;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;

/// Azure subscription with its virtual networks.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Subscription {
    /// Subscription ID (GUID).
    pub id: String,
    /// Subscription display name.
    pub display_name: String,
    /// Virtual networks in this subscription.
    pub vnets: Vec<VirtualNetwork>,
}

/// Azure virtual network with its subnets.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VirtualNetwork {
    /// Full resource ID.
    pub id: String,
    /// VNet name.
    pub name: String,
    /// Address space CIDR strings, in source order. Kept as text so one
    /// malformed prefix drops out of range checks without losing the rest.
    pub address_prefixes: Vec<String>,
    /// Subnets in this VNet.
    pub subnets: Vec<Subnet>,
}

impl VirtualNetwork {
    /// Address prefixes that parse as IPv4 CIDRs. Malformed entries are
    /// skipped, so a VNet with zero parseable prefixes takes part in no
    /// overlap or containment checks.
    pub fn parsed_prefixes(&self) -> Vec<Ipv4> {
        self.address_prefixes
            .iter()
            .filter_map(|s| Ipv4::new(s).ok())
            .collect()
    }
}

/// Azure subnet with workloads and shared-resource references.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Subnet {
    /// Full resource ID.
    pub id: String,
    /// Subnet name.
    pub name: String,
    /// Address prefix CIDR string.
    pub address_prefix: String,
    /// Route table reference, by resource ID.
    pub route_table_id: Option<String>,
    /// NAT gateway reference, by resource ID.
    pub nat_gateway_id: Option<String>,
    /// Network interfaces attached to this subnet.
    pub network_interfaces: Vec<NetworkInterface>,
}

impl Subnet {
    /// The subnet prefix, or `None` when the text does not parse.
    pub fn parsed_prefix(&self) -> Option<Ipv4> {
        Ipv4::new(&self.address_prefix).ok()
    }
}

/// Network interface attached to a subnet.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NetworkInterface {
    /// Full resource ID.
    pub id: String,
    /// True when any IP configuration carries a public IP address.
    pub has_public_ip: bool,
}

/// Route table shared across subnets.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RouteTable {
    /// Full resource ID.
    pub id: String,
    /// Route table name.
    pub name: String,
    /// Routes in source order.
    pub routes: Vec<Route>,
}

/// A single user-defined route.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Route {
    /// Destination prefix CIDR string.
    pub address_prefix: String,
    /// Next hop type.
    pub next_hop_type: NextHopType,
    /// Next hop IP address (set for virtual-appliance routes).
    pub next_hop_ip: Option<String>,
}

impl Route {
    /// True when this is the default route (destination exactly 0.0.0.0/0).
    pub fn is_default_route(&self) -> bool {
        self.address_prefix.trim() == "0.0.0.0/0"
    }

    /// True when the next hop IP parses and is an RFC 1918 address.
    pub fn has_private_next_hop(&self) -> bool {
        self.next_hop_ip
            .as_deref()
            .and_then(|s| s.trim().parse::<std::net::Ipv4Addr>().ok())
            .is_some_and(|addr| addr.is_private())
    }
}

/// Route next hop types, as reported by Azure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextHopType {
    VirtualAppliance,
    Internet,
    VirtualNetworkGateway,
    None,
    /// Any hop type this tool does not reason about (VnetLocal, etc.).
    Other(String),
}

impl NextHopType {
    pub fn as_str(&self) -> &str {
        match self {
            NextHopType::VirtualAppliance => "VirtualAppliance",
            NextHopType::Internet => "Internet",
            NextHopType::VirtualNetworkGateway => "VirtualNetworkGateway",
            NextHopType::None => "None",
            NextHopType::Other(s) => s,
        }
    }
}

impl From<&str> for NextHopType {
    fn from(s: &str) -> Self {
        match s {
            "VirtualAppliance" => NextHopType::VirtualAppliance,
            "Internet" => NextHopType::Internet,
            "VirtualNetworkGateway" => NextHopType::VirtualNetworkGateway,
            "None" => NextHopType::None,
            other => NextHopType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for NextHopType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for NextHopType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NextHopType {
    fn deserialize<D>(deserializer: D) -> Result<NextHopType, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Err(de::Error::custom("empty next hop type"));
        }
        Ok(NextHopType::from(s.as_str()))
    }
}

/// NAT gateway. Presence is all classification needs.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NatGateway {
    /// Full resource ID.
    pub id: String,
}

/// Complete topology snapshot for one assessment run.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Topology {
    /// Subscriptions in scope, in discovery order.
    pub subscriptions: Vec<Subscription>,
    /// All route tables, keyed by resource ID.
    pub route_tables: HashMap<String, RouteTable>,
    /// All NAT gateways, keyed by resource ID.
    pub nat_gateways: HashMap<String, NatGateway>,
}

impl Topology {
    /// Look up a route table by ID. A dangling reference resolves to `None`
    /// and the caller falls through as if the reference were absent.
    pub fn route_table(&self, id: &str) -> Option<&RouteTable> {
        self.route_tables.get(id)
    }

    /// True when the NAT gateway ID exists in the topology.
    pub fn nat_gateway_exists(&self, id: &str) -> bool {
        self.nat_gateways.contains_key(id)
    }

    /// Iterate every VNet with its owning subscription, in discovery order.
    pub fn all_vnets(&self) -> impl Iterator<Item = (&Subscription, &VirtualNetwork)> {
        self.subscriptions
            .iter()
            .flat_map(|sub| sub.vnets.iter().map(move |vnet| (sub, vnet)))
    }

    /// Check structural preconditions the discovery layer must uphold.
    ///
    /// Dangling route-table/NAT-gateway references and unparseable CIDRs
    /// are recoverable classification conditions, not validation failures.
    /// What is checked here: non-empty and unique subscription/VNet/subnet
    /// identifiers, and that every parseable subnet prefix is contained in
    /// at least one parseable prefix of its VNet.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        let mut seen_ids: HashSet<&str> = HashSet::new();

        for sub in &self.subscriptions {
            if sub.id.is_empty() {
                return Err("Invalid topology: subscription with empty id".into());
            }
            if !seen_ids.insert(&sub.id) {
                return Err(format!("Invalid topology: duplicate subscription id {}", sub.id).into());
            }

            for vnet in &sub.vnets {
                if vnet.id.is_empty() {
                    return Err(format!(
                        "Invalid topology: VNet with empty id in subscription {}",
                        sub.id
                    )
                    .into());
                }
                if !seen_ids.insert(&vnet.id) {
                    return Err(format!("Invalid topology: duplicate VNet id {}", vnet.id).into());
                }

                let vnet_prefixes = vnet.parsed_prefixes();
                for subnet in &vnet.subnets {
                    if subnet.id.is_empty() {
                        return Err(format!(
                            "Invalid topology: subnet with empty id in VNet {}",
                            vnet.id
                        )
                        .into());
                    }
                    if !seen_ids.insert(&subnet.id) {
                        return Err(
                            format!("Invalid topology: duplicate subnet id {}", subnet.id).into()
                        );
                    }

                    if let Some(prefix) = subnet.parsed_prefix() {
                        if !vnet_prefixes.is_empty()
                            && !vnet_prefixes.iter().any(|outer| outer.contains(&prefix))
                        {
                            return Err(format!(
                                "Invalid topology: subnet {} prefix {} outside VNet {} address space",
                                subnet.name, subnet.address_prefix, vnet.name
                            )
                            .into());
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
