//! Azure Resource Graph discovery.
//!
//! Runs the Resource Graph queries that materialize the topology snapshot:
//! virtual networks with their subnets, route tables with their routes,
//! network interfaces with their IP configurations, and NAT gateways.
//! Pagination is handled with skip tokens, with a rate-limit pause between
//! pages.

use super::cli;
use crate::config;
use crate::models::{
    NatGateway, NetworkInterface, NextHopType, Route, RouteTable, Subnet, Subscription, Topology,
    VirtualNetwork,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;

const VNET_QUERY: &str = r#"resources
        | where type == "microsoft.network/virtualnetworks"
        | mv-expand properties.subnets
        | project subscription_id=subscriptionId
                ,vnet_id=id
                ,vnet_name=name
                ,vnet_cidr=properties.addressSpace.addressPrefixes
                ,subnet_id=tostring(properties_subnets.id)
                ,subnet_name=tostring(properties_subnets.name)
                ,subnet_cidr=tostring(properties_subnets.properties.addressPrefix)
                ,route_table_id=tostring(properties_subnets.properties.routeTable.id)
                ,nat_gateway_id=tostring(properties_subnets.properties.natGateway.id)
        | join kind=leftouter (
            resourcecontainers
                | where type == "microsoft.resources/subscriptions"
                | project subscription_id=subscriptionId, subscription_name=name
            ) on subscription_id
        | project subscription_id, subscription_name, vnet_id, vnet_name, vnet_cidr, subnet_id, subnet_name, subnet_cidr, route_table_id, nat_gateway_id
        | sort by subscription_id asc, vnet_id asc, subnet_id asc"#;

const ROUTE_TABLE_QUERY: &str = r#"resources
        | where type == "microsoft.network/routetables"
        | mv-expand properties.routes
        | project route_table_id=id
                ,route_table_name=name
                ,address_prefix=tostring(properties_routes.properties.addressPrefix)
                ,next_hop_type=tostring(properties_routes.properties.nextHopType)
                ,next_hop_ip=tostring(properties_routes.properties.nextHopIpAddress)
        | sort by route_table_id asc"#;

const NIC_QUERY: &str = r#"resources
        | where type == "microsoft.network/networkinterfaces"
        | mv-expand properties.ipConfigurations
        | project nic_id=id
                ,subnet_id=tostring(properties_ipConfigurations.properties.subnet.id)
                ,has_public_ip=isnotnull(properties_ipConfigurations.properties.publicIPAddress.id)
        | sort by nic_id asc"#;

const NAT_GATEWAY_QUERY: &str = r#"resources
        | where type == "microsoft.network/natgateways"
        | project nat_gateway_id=id
        | sort by nat_gateway_id asc"#;

/// One page of a Resource Graph response.
#[derive(Serialize, Deserialize, Debug)]
struct GraphPage<T> {
    data: Vec<T>,
    skip_token: Option<String>,
    total_records: Option<u32>,
    count: i32,
}

#[derive(Deserialize, Debug)]
struct VnetRow {
    subscription_id: String,
    subscription_name: Option<String>,
    vnet_id: String,
    vnet_name: String,
    /// Null when the VNet has no declared address space.
    vnet_cidr: Option<Vec<String>>,
    subnet_id: String,
    subnet_name: String,
    subnet_cidr: String,
    route_table_id: Option<String>,
    nat_gateway_id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RouteRow {
    route_table_id: String,
    route_table_name: String,
    address_prefix: String,
    next_hop_type: String,
    next_hop_ip: Option<String>,
}

#[derive(Deserialize, Debug)]
struct NicRow {
    nic_id: String,
    subnet_id: String,
    has_public_ip: bool,
}

#[derive(Deserialize, Debug)]
struct NatGatewayRow {
    nat_gateway_id: String,
}

/// `tostring()` of a missing property yields "", not null.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Execute one Resource Graph query, following skip tokens until done.
fn run_graph_query<T: DeserializeOwned>(
    query: &str,
    subscription_filter: Option<&[String]>,
) -> Result<Vec<T>, Box<dyn Error>> {
    let subscriptions_param = match subscription_filter {
        Some(ids) if !ids.is_empty() => format!("--subscriptions {}", ids.join(" ")),
        _ => String::new(),
    };

    let mut rows: Vec<T> = Vec::new();
    let mut skip_token_param = String::new();
    let mut page_number = 0;

    loop {
        let cmd = format!(
            "az graph query --first {page_size} {subscriptions_param} {skip_token_param} -q '{query}' --output json",
            page_size = config::GRAPH_PAGE_SIZE,
        );
        let output = cli::run(&cmd)?;

        let mut deserializer = serde_json::Deserializer::from_str(&output);
        let page: GraphPage<T> =
            serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
                format!(
                    "Error parsing graph response page {}: path={} error={}",
                    page_number,
                    e.path(),
                    e
                )
            })?;

        log::info!(
            "got page#{page_number:2} record_count=+{count:3} => {total:4} (total_records={records:?})",
            count = page.count,
            total = rows.len() + page.data.len(),
            records = page.total_records,
        );

        rows.extend(page.data);

        match page.skip_token {
            Some(token) if !token.is_empty() => {
                let next_param = format!("--skip-token {token}");
                if next_param == skip_token_param {
                    return Err("Skip token not unique - possible infinite loop".into());
                }
                skip_token_param = next_param;
            }
            _ => break,
        }

        // Rate limiting pause between pages
        std::thread::sleep(std::time::Duration::from_millis(config::SLEEP_MSEC));
        page_number += 1;
    }

    Ok(rows)
}

/// Discover the full topology through the Azure CLI.
///
/// `subscription_filter` restricts discovery to the given subscription IDs;
/// the filter is applied here so the engine never sees out-of-scope data.
pub fn discover_topology(
    subscription_filter: Option<&[String]>,
) -> Result<Topology, Box<dyn Error>> {
    log::info!("#Start discover_topology()");

    let vnet_rows: Vec<VnetRow> = run_graph_query(VNET_QUERY, subscription_filter)?;
    let route_rows: Vec<RouteRow> = run_graph_query(ROUTE_TABLE_QUERY, subscription_filter)?;
    let nic_rows: Vec<NicRow> = run_graph_query(NIC_QUERY, subscription_filter)?;
    let nat_rows: Vec<NatGatewayRow> = run_graph_query(NAT_GATEWAY_QUERY, subscription_filter)?;

    log::info!(
        "discovered {} subnet rows, {} route rows, {} nic rows, {} nat gateways",
        vnet_rows.len(),
        route_rows.len(),
        nic_rows.len(),
        nat_rows.len()
    );

    Ok(build_topology(vnet_rows, route_rows, nic_rows, nat_rows))
}

/// Assemble raw query rows into the normalized topology snapshot.
fn build_topology(
    vnet_rows: Vec<VnetRow>,
    route_rows: Vec<RouteRow>,
    nic_rows: Vec<NicRow>,
    nat_rows: Vec<NatGatewayRow>,
) -> Topology {
    // A NIC row per ip configuration: collapse to one interface, public
    // if any configuration carries a public IP.
    let mut nics_by_subnet: HashMap<String, Vec<NetworkInterface>> = HashMap::new();
    for row in nic_rows {
        if row.subnet_id.is_empty() {
            continue;
        }
        let nics = nics_by_subnet.entry(row.subnet_id).or_default();
        match nics.iter_mut().find(|nic| nic.id == row.nic_id) {
            Some(existing) => existing.has_public_ip |= row.has_public_ip,
            None => nics.push(NetworkInterface {
                id: row.nic_id,
                has_public_ip: row.has_public_ip,
            }),
        }
    }

    let mut route_tables: HashMap<String, RouteTable> = HashMap::new();
    for row in route_rows {
        let table = route_tables
            .entry(row.route_table_id.clone())
            .or_insert_with(|| RouteTable {
                id: row.route_table_id,
                name: row.route_table_name,
                routes: Vec::new(),
            });
        table.routes.push(Route {
            address_prefix: row.address_prefix,
            next_hop_type: NextHopType::from(row.next_hop_type.as_str()),
            next_hop_ip: non_empty(row.next_hop_ip),
        });
    }

    let nat_gateways: HashMap<String, NatGateway> = nat_rows
        .into_iter()
        .map(|row| {
            (
                row.nat_gateway_id.clone(),
                NatGateway {
                    id: row.nat_gateway_id,
                },
            )
        })
        .collect();

    // One row per (vnet, subnet); rows arrive sorted by subscription and
    // vnet, so grouping preserves discovery order.
    let mut subscriptions: Vec<Subscription> = Vec::new();
    for row in vnet_rows {
        if !subscriptions
            .last()
            .is_some_and(|sub| sub.id == row.subscription_id)
        {
            subscriptions.push(Subscription {
                id: row.subscription_id.clone(),
                display_name: row
                    .subscription_name
                    .clone()
                    .unwrap_or_else(|| row.subscription_id.clone()),
                vnets: Vec::new(),
            });
        }
        let sub = subscriptions.last_mut().expect("just pushed");

        if !sub.vnets.last().is_some_and(|v| v.id == row.vnet_id) {
            sub.vnets.push(VirtualNetwork {
                id: row.vnet_id.clone(),
                name: row.vnet_name.clone(),
                address_prefixes: row.vnet_cidr.clone().unwrap_or_default(),
                subnets: Vec::new(),
            });
        }
        let vnet = sub.vnets.last_mut().expect("just pushed");

        let network_interfaces = nics_by_subnet.remove(&row.subnet_id).unwrap_or_default();
        vnet.subnets.push(Subnet {
            id: row.subnet_id,
            name: row.subnet_name,
            address_prefix: row.subnet_cidr,
            route_table_id: non_empty(row.route_table_id),
            nat_gateway_id: non_empty(row.nat_gateway_id),
            network_interfaces,
        });
    }

    Topology {
        subscriptions,
        route_tables,
        nat_gateways,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vnet_row(sub: &str, vnet: &str, subnet: &str, cidr: &str) -> VnetRow {
        VnetRow {
            subscription_id: sub.to_string(),
            subscription_name: Some(format!("{sub}-name")),
            vnet_id: vnet.to_string(),
            vnet_name: vnet.to_string(),
            vnet_cidr: Some(vec!["10.0.0.0/16".to_string()]),
            subnet_id: subnet.to_string(),
            subnet_name: subnet.to_string(),
            subnet_cidr: cidr.to_string(),
            route_table_id: Some(String::new()),
            nat_gateway_id: None,
        }
    }

    #[test]
    fn test_build_topology_groups_rows() {
        let vnet_rows = vec![
            vnet_row("sub-1", "vnet-a", "snet-1", "10.0.1.0/24"),
            vnet_row("sub-1", "vnet-a", "snet-2", "10.0.2.0/24"),
            vnet_row("sub-1", "vnet-b", "snet-3", "10.0.3.0/24"),
            vnet_row("sub-2", "vnet-c", "snet-4", "10.0.4.0/24"),
        ];

        let topo = build_topology(vnet_rows, vec![], vec![], vec![]);

        assert_eq!(topo.subscriptions.len(), 2);
        assert_eq!(topo.subscriptions[0].vnets.len(), 2);
        assert_eq!(topo.subscriptions[0].vnets[0].subnets.len(), 2);
        assert_eq!(topo.subscriptions[0].vnets[1].subnets.len(), 1);
        assert_eq!(topo.subscriptions[1].vnets.len(), 1);

        // Empty-string route table id from tostring() becomes None
        assert!(topo.subscriptions[0].vnets[0].subnets[0]
            .route_table_id
            .is_none());
    }

    #[test]
    fn test_build_topology_collapses_nic_ip_configurations() {
        let nic_rows = vec![
            NicRow {
                nic_id: "nic-1".to_string(),
                subnet_id: "snet-1".to_string(),
                has_public_ip: false,
            },
            NicRow {
                nic_id: "nic-1".to_string(),
                subnet_id: "snet-1".to_string(),
                has_public_ip: true,
            },
            NicRow {
                nic_id: "nic-2".to_string(),
                subnet_id: "snet-1".to_string(),
                has_public_ip: false,
            },
        ];
        let vnet_rows = vec![vnet_row("sub-1", "vnet-a", "snet-1", "10.0.1.0/24")];

        let topo = build_topology(vnet_rows, vec![], nic_rows, vec![]);
        let subnet = &topo.subscriptions[0].vnets[0].subnets[0];

        assert_eq!(subnet.network_interfaces.len(), 2);
        assert!(subnet.network_interfaces[0].has_public_ip);
        assert!(!subnet.network_interfaces[1].has_public_ip);
    }

    #[test]
    fn test_build_topology_groups_routes_by_table() {
        let route_rows = vec![
            RouteRow {
                route_table_id: "rt-1".to_string(),
                route_table_name: "rt-1".to_string(),
                address_prefix: "0.0.0.0/0".to_string(),
                next_hop_type: "VirtualAppliance".to_string(),
                next_hop_ip: Some("10.0.0.4".to_string()),
            },
            RouteRow {
                route_table_id: "rt-1".to_string(),
                route_table_name: "rt-1".to_string(),
                address_prefix: "10.0.0.0/8".to_string(),
                next_hop_type: "VnetLocal".to_string(),
                next_hop_ip: Some(String::new()),
            },
        ];

        let topo = build_topology(vec![], route_rows, vec![], vec![]);
        let table = topo.route_table("rt-1").expect("missing table");

        assert_eq!(table.routes.len(), 2);
        assert_eq!(table.routes[0].next_hop_type, NextHopType::VirtualAppliance);
        assert_eq!(
            table.routes[1].next_hop_type,
            NextHopType::Other("VnetLocal".to_string())
        );
        assert!(table.routes[1].next_hop_ip.is_none());
    }
}
