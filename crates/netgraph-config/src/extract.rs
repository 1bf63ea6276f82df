//! Network graph extraction from a resolved configuration tree.
//!
//! Expects Landing Zone Accelerator style keys at the root:
//! - `transitGateways` (with nested `routeTables[].routes[]`)
//! - `vpcs` (with `subnets` and `transitGatewayAttachments`)
//! - `directConnectGateways`
//! - `customerGateways` (with nested `vpnConnections`)
//!
//! Extraction is total: malformed elements are skipped, missing fields take
//! their defaults, and a bad element never aborts its siblings.

use netgraph_core::{
    CnfgwEndpoint, DxGateway, DxTgwAssociation, EndpointKind, NetworkGraph, Subnet,
    TgwAttachment, TgwAttachmentRouteTables, TransitGateway, VirtualInterface, Vpc,
    VpnConnection, join_id, scoped_id,
};
use serde_yaml::Value;
use std::collections::BTreeSet;
use tracing::debug;

use crate::value::{
    first_str, get, json_field, json_list_field, mappings, scalar_string, seq, str_field,
};

const UNKNOWN: &str = "unknown";
/// Marker that identifies a firewall gateway endpoint reference.
const CNFGW_MARKER: &str = "cnfgw";

/// Build the entity graph from a resolved network configuration.
pub fn extract_graph(network_cfg: &Value) -> NetworkGraph {
    let mut graph = NetworkGraph {
        transit_gateways: extract_transit_gateways(network_cfg),
        ..Default::default()
    };

    let default_region = str_field(network_cfg, "region");
    for vpc in mappings(network_cfg, "vpcs") {
        let extracted = extract_vpc(vpc, default_region.as_deref());
        graph
            .tgw_attachments
            .extend(extract_attachments(vpc, extracted.id.as_deref()));
        graph.vpcs.push(extracted);
    }

    graph.dx_gateways = extract_dx_gateways(network_cfg);
    graph.vpn_connections = extract_vpn_connections(network_cfg);
    graph.cnfgw_endpoints = extract_cnfgw_endpoints(network_cfg);

    debug!(
        transit_gateways = graph.transit_gateways.len(),
        vpcs = graph.vpcs.len(),
        subnets = graph.subnet_count(),
        tgw_attachments = graph.tgw_attachments.len(),
        dx_gateways = graph.dx_gateways.len(),
        vpn_connections = graph.vpn_connections.len(),
        cnfgw_endpoints = graph.cnfgw_endpoints.len(),
        "Extracted network graph"
    );

    graph
}

fn extract_transit_gateways(cfg: &Value) -> Vec<TransitGateway> {
    mappings(cfg, "transitGateways")
        .map(|tgw| {
            let name = str_field(tgw, "name");
            TransitGateway {
                id: name.clone(),
                name,
                account: str_field(tgw, "account"),
                region: str_field(tgw, "region"),
                asn: json_field(tgw, "asn"),
            }
        })
        .collect()
}

fn extract_vpc(vpc: &Value, default_region: Option<&str>) -> Vpc {
    let name = str_field(vpc, "name");

    let subnets: Vec<Subnet> = mappings(vpc, "subnets")
        .map(|subnet| extract_subnet(subnet, name.as_deref()))
        .collect();

    let azs: BTreeSet<String> = subnets
        .iter()
        .filter_map(|s| s.az.clone())
        .filter(|az| !az.is_empty())
        .collect();

    Vpc {
        id: name.clone(),
        name,
        account: field_or(vpc, "account", || Some(UNKNOWN.to_string())),
        region: field_or(vpc, "region", || default_region.map(str::to_string)),
        cidr: primary_cidr(vpc),
        azs: azs.into_iter().collect(),
        subnets,
    }
}

/// A scalar field, or `default` only when the key is omitted. An explicit
/// `null` stays `None`.
fn field_or(value: &Value, key: &str, default: impl FnOnce() -> Option<String>) -> Option<String> {
    match value.get(key) {
        None => default(),
        Some(field) => scalar_string(field),
    }
}

/// First entry of `cidrs` when it is a non-empty list, otherwise the first
/// single-CIDR field present.
fn primary_cidr(vpc: &Value) -> Option<String> {
    match get(vpc, "cidrs").and_then(Value::as_sequence) {
        Some(cidrs) if !cidrs.is_empty() => scalar_string(&cidrs[0]),
        _ => first_str(vpc, &["cidr", "ipv4CidrBlock", "ipv4Cidr"]),
    }
}

fn extract_subnet(subnet: &Value, vpc_id: Option<&str>) -> Subnet {
    let name = str_field(subnet, "name");
    Subnet {
        id: scoped_id(vpc_id, name.as_deref()),
        name,
        cidr: first_str(subnet, &["cidr", "ipv4CidrBlock", "ipv4Cidr"]),
        az: first_str(subnet, &["availabilityZone", "az"]),
        subnet_type: first_str(subnet, &["type", "subnetType", "tier"])
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }
}

/// The transit gateway of an attachment, written either as a bare name or as
/// a mapping with a `name` field.
fn transit_gateway_name(attachment: &Value) -> Option<String> {
    let tgw = get(attachment, "transitGateway")?;
    if tgw.is_mapping() {
        str_field(tgw, "name")
    } else {
        scalar_string(tgw)
    }
}

fn extract_attachments(vpc: &Value, vpc_id: Option<&str>) -> Vec<TgwAttachment> {
    mappings(vpc, "transitGatewayAttachments")
        .map(|attachment| {
            let tgw_name = transit_gateway_name(attachment);
            let derived = join_id(vpc_id, tgw_name.as_deref());
            let name = first_str(attachment, &["name"])
                .or_else(|| derived.clone())
                .or_else(|| vpc_id.map(str::to_string))
                .or_else(|| tgw_name.clone());

            // Rewritten into subnet entity ids so the two are joinable.
            let subnets = seq(attachment, "subnets")
                .iter()
                .map(|subnet| scoped_id(vpc_id, scalar_string(subnet).as_deref()))
                .collect();

            TgwAttachment {
                id: derived.or_else(|| name.clone()),
                tgw_id: tgw_name,
                vpc_id: vpc_id.map(str::to_string),
                name,
                subnets,
                route_tables: TgwAttachmentRouteTables {
                    tgw_association: json_field(attachment, "routeTableAssociations"),
                    tgw_propagations: json_list_field(attachment, "routeTablePropagations"),
                },
            }
        })
        .collect()
}

fn extract_dx_gateways(cfg: &Value) -> Vec<DxGateway> {
    mappings(cfg, "directConnectGateways")
        .map(|dxgw| {
            let name = str_field(dxgw, "name");

            let virtual_interfaces = mappings(dxgw, "virtualInterfaces")
                .map(|vif| {
                    let vif_name = str_field(vif, "name");
                    VirtualInterface {
                        id: vif_name.clone(),
                        name: vif_name,
                        connection_id: str_field(vif, "connectionId"),
                        customer_asn: json_field(vif, "customerAsn"),
                        region: str_field(vif, "region"),
                        vif_type: str_field(vif, "type"),
                        vlan: json_field(vif, "vlan"),
                        jumbo_frames: json_field(vif, "jumboFrames"),
                    }
                })
                .collect();

            let tgw_associations = mappings(dxgw, "transitGatewayAssociations")
                .map(|assoc| DxTgwAssociation {
                    tgw_name: str_field(assoc, "name"),
                    account: str_field(assoc, "account"),
                    allowed_prefixes: json_list_field(assoc, "allowedPrefixes"),
                    route_table_associations: json_list_field(assoc, "routeTableAssociations"),
                    route_table_propagations: json_list_field(assoc, "routeTablePropagations"),
                })
                .collect();

            DxGateway {
                id: name.clone(),
                name,
                account: str_field(dxgw, "account"),
                asn: json_field(dxgw, "asn"),
                virtual_interfaces,
                tgw_associations,
            }
        })
        .collect()
}

fn extract_vpn_connections(cfg: &Value) -> Vec<VpnConnection> {
    mappings(cfg, "customerGateways")
        .flat_map(|cgw| {
            let cgw_name = str_field(cgw, "name");
            let account = str_field(cgw, "account");
            let region = str_field(cgw, "region");

            mappings(cgw, "vpnConnections").map(move |vpn| VpnConnection {
                name: str_field(vpn, "name"),
                customer_gateway: cgw_name.clone(),
                account: account.clone(),
                region: region.clone(),
                transit_gateway: json_field(vpn, "transitGateway"),
                static_routes_only: json_field(vpn, "staticRoutesOnly"),
                route_table_associations: json_list_field(vpn, "routeTableAssociations"),
                route_table_propagations: json_list_field(vpn, "routeTablePropagations"),
                tunnel_specifications: json_list_field(vpn, "tunnelSpecifications"),
            })
        })
        .collect()
}

/// Routes whose `targetVpcEndpoint` names a firewall gateway endpoint.
fn extract_cnfgw_endpoints(cfg: &Value) -> Vec<CnfgwEndpoint> {
    let mut endpoints = Vec::new();

    for tgw in mappings(cfg, "transitGateways") {
        let tgw_name = str_field(tgw, "name");
        for route_table in mappings(tgw, "routeTables") {
            let route_table_name = str_field(route_table, "name");
            for route in mappings(route_table, "routes") {
                let Some(target) = str_field(route, "targetVpcEndpoint") else {
                    continue;
                };
                if !is_cnfgw_endpoint(&target) {
                    continue;
                }
                endpoints.push(CnfgwEndpoint {
                    id: target.clone(),
                    name: target,
                    tgw: tgw_name.clone(),
                    route_table: route_table_name.clone(),
                    destination: first_str(route, &["destinationCidrBlock", "destination"]),
                    kind: EndpointKind::PaloAltoCnfgw,
                });
            }
        }
    }

    endpoints
}

fn is_cnfgw_endpoint(target: &str) -> bool {
    target.to_lowercase().contains(CNFGW_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_non_mapping_root_yields_empty_graph() {
        assert!(extract_graph(&Value::Null).is_empty());
        assert!(extract_graph(&yaml("- a\n- b")).is_empty());
        assert!(extract_graph(&yaml("plain scalar")).is_empty());
    }

    #[test]
    fn test_transit_gateways() {
        let graph = extract_graph(&yaml(
            r#"
transitGateways:
  - name: Network-Main
    account: Network
    region: ca-central-1
    asn: 65521
  - not-a-mapping
  - name: Second
"#,
        ));
        assert_eq!(graph.transit_gateways.len(), 2);
        let tgw = &graph.transit_gateways[0];
        assert_eq!(tgw.id.as_deref(), Some("Network-Main"));
        assert_eq!(tgw.account.as_deref(), Some("Network"));
        assert_eq!(tgw.asn, json!(65521));
        assert_eq!(graph.transit_gateways[1].asn, serde_json::Value::Null);
    }

    #[test]
    fn test_vpc_cidr_precedence() {
        let graph = extract_graph(&yaml(
            r#"
vpcs:
  - name: A
    cidrs: [10.0.0.0/16, 10.1.0.0/16]
    cidr: 10.2.0.0/16
  - name: B
    cidrs: []
    ipv4CidrBlock: 10.3.0.0/16
  - name: C
    ipv4Cidr: 10.4.0.0/16
  - name: D
"#,
        ));
        let cidrs: Vec<_> = graph.vpcs.iter().map(|v| v.cidr.as_deref()).collect();
        assert_eq!(
            cidrs,
            vec![Some("10.0.0.0/16"), Some("10.3.0.0/16"), Some("10.4.0.0/16"), None]
        );
    }

    #[test]
    fn test_vpc_defaults() {
        let graph = extract_graph(&yaml(
            r#"
region: ca-central-1
vpcs:
  - name: Net1
  - name: Net2
    account: Workloads
    region: us-east-1
"#,
        ));
        assert_eq!(graph.vpcs[0].account.as_deref(), Some("unknown"));
        assert_eq!(graph.vpcs[0].region.as_deref(), Some("ca-central-1"));
        assert_eq!(graph.vpcs[1].account.as_deref(), Some("Workloads"));
        assert_eq!(graph.vpcs[1].region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn test_explicit_null_is_not_defaulted() {
        let graph = extract_graph(&yaml(
            r#"
region: ca-central-1
vpcs:
  - name: Net1
    account: ~
    region: ~
"#,
        ));
        assert_eq!(graph.vpcs[0].account, None);
        assert_eq!(graph.vpcs[0].region, None);
    }

    #[test]
    fn test_attachment_subnets_stay_index_aligned() {
        let graph = extract_graph(&yaml(
            r#"
vpcs:
  - name: Net1
    transitGatewayAttachments:
      - transitGateway: Main
        subnets: [Priv, ~, {bad: entry}, "", Pub]
"#,
        ));
        assert_eq!(
            graph.tgw_attachments[0].subnets,
            vec![
                Some("Net1-Priv".to_string()),
                None,
                None,
                Some(String::new()),
                Some("Net1-Pub".to_string()),
            ]
        );
    }

    #[test]
    fn test_malformed_vpc_elements_are_skipped() {
        let graph = extract_graph(&yaml(
            r#"
vpcs:
  - name: Net1
  - 42
  - name: Net2
"#,
        ));
        assert_eq!(graph.vpcs.len(), 2);
    }

    #[test]
    fn test_subnet_fields() {
        let graph = extract_graph(&yaml(
            r#"
vpcs:
  - name: Net1
    subnets:
      - name: Priv
        ipv4CidrBlock: 10.0.0.0/24
        availabilityZone: a
        subnetType: private
      - name: Pub
        cidr: 10.0.1.0/24
        az: b
        tier: public
      - cidr: 10.0.2.0/24
      - bogus
"#,
        ));
        let subnets = &graph.vpcs[0].subnets;
        assert_eq!(subnets.len(), 3);
        assert_eq!(subnets[0].id.as_deref(), Some("Net1-Priv"));
        assert_eq!(subnets[0].cidr.as_deref(), Some("10.0.0.0/24"));
        assert_eq!(subnets[0].az.as_deref(), Some("a"));
        assert_eq!(subnets[0].subnet_type, "private");
        assert_eq!(subnets[1].subnet_type, "public");
        assert_eq!(subnets[1].az.as_deref(), Some("b"));
        assert_eq!(subnets[2].id, None);
        assert_eq!(subnets[2].subnet_type, "unknown");
    }

    #[test]
    fn test_subnet_id_without_vpc_name() {
        let graph = extract_graph(&yaml(
            r#"
vpcs:
  - subnets:
      - name: Priv
      - cidr: 10.0.0.0/24
"#,
        ));
        let subnets = &graph.vpcs[0].subnets;
        assert_eq!(subnets[0].id.as_deref(), Some("Priv"));
        assert_eq!(subnets[1].id, None);
    }

    #[test]
    fn test_az_aggregation() {
        let graph = extract_graph(&yaml(
            r#"
vpcs:
  - name: Net1
    subnets:
      - {name: s1, availabilityZone: b}
      - {name: s2, availabilityZone: a}
      - {name: s3, availabilityZone: a}
      - {name: s4, availabilityZone: ""}
      - {name: s5}
"#,
        ));
        assert_eq!(graph.vpcs[0].azs, vec!["a", "b"]);
    }

    #[test]
    fn test_attachment_tgw_reference_forms() {
        let graph = extract_graph(&yaml(
            r#"
vpcs:
  - name: Net1
    transitGatewayAttachments:
      - transitGateway: {name: Main, account: Network}
        subnets: [Priv, Pub]
        routeTableAssociations: [core]
  - name: Net2
    transitGatewayAttachments:
      - name: explicit
        transitGateway: Main
"#,
        ));
        assert_eq!(graph.tgw_attachments.len(), 2);

        let first = &graph.tgw_attachments[0];
        assert_eq!(first.tgw_id.as_deref(), Some("Main"));
        assert_eq!(first.id.as_deref(), Some("Net1-Main"));
        assert_eq!(first.name.as_deref(), Some("Net1-Main"));
        assert_eq!(
            first.subnets,
            vec![Some("Net1-Priv".to_string()), Some("Net1-Pub".to_string())]
        );
        assert_eq!(first.route_tables.tgw_association, json!(["core"]));
        assert_eq!(first.route_tables.tgw_propagations, json!([]));

        let second = &graph.tgw_attachments[1];
        assert_eq!(second.tgw_id.as_deref(), Some("Main"));
        assert_eq!(second.id.as_deref(), Some("Net2-Main"));
        assert_eq!(second.name.as_deref(), Some("explicit"));
        assert_eq!(second.route_tables.tgw_association, serde_json::Value::Null);
    }

    #[test]
    fn test_attachment_id_degrades() {
        let graph = extract_graph(&yaml(
            r#"
vpcs:
  - name: Net1
    transitGatewayAttachments:
      - name: no-tgw
        subnets: [Priv]
  - transitGatewayAttachments:
      - transitGateway: Main
        subnets: [Priv]
"#,
        ));
        let first = &graph.tgw_attachments[0];
        assert_eq!(first.id.as_deref(), Some("no-tgw"));
        assert_eq!(first.tgw_id, None);

        let second = &graph.tgw_attachments[1];
        assert_eq!(second.vpc_id, None);
        assert_eq!(second.id.as_deref(), Some("Main"));
        assert_eq!(second.subnets, vec![Some("Priv".to_string())]);
    }

    #[test]
    fn test_dx_gateways() {
        let graph = extract_graph(&yaml(
            r#"
directConnectGateways:
  - name: DXGW
    account: Network
    asn: 64512
    virtualInterfaces:
      - name: vif-1
        connectionId: dxcon-abc
        customerAsn: 65000
        region: ca-central-1
        type: transit
        vlan: 100
        jumboFrames: true
      - nope
    transitGatewayAssociations:
      - name: Main
        account: Network
        allowedPrefixes: [10.0.0.0/8]
        routeTableAssociations: [core]
"#,
        ));
        let dx = &graph.dx_gateways[0];
        assert_eq!(dx.id.as_deref(), Some("DXGW"));
        assert_eq!(dx.asn, json!(64512));
        assert_eq!(dx.virtual_interfaces.len(), 1);

        let vif = &dx.virtual_interfaces[0];
        assert_eq!(vif.connection_id.as_deref(), Some("dxcon-abc"));
        assert_eq!(vif.vif_type.as_deref(), Some("transit"));
        assert_eq!(vif.vlan, json!(100));
        assert_eq!(vif.jumbo_frames, json!(true));

        let assoc = &dx.tgw_associations[0];
        assert_eq!(assoc.tgw_name.as_deref(), Some("Main"));
        assert_eq!(assoc.allowed_prefixes, json!(["10.0.0.0/8"]));
        assert_eq!(assoc.route_table_propagations, json!([]));
    }

    #[test]
    fn test_vpn_connections_carry_customer_gateway() {
        let graph = extract_graph(&yaml(
            r#"
customerGateways:
  - name: OnPrem
    account: Network
    region: ca-central-1
    vpnConnections:
      - name: vpn-1
        transitGateway: Main
        staticRoutesOnly: false
        routeTableAssociations: [core]
        tunnelSpecifications:
          - tunnelInsideCidr: 169.254.200.0/30
      - name: vpn-2
  - name: Empty
"#,
        ));
        assert_eq!(graph.vpn_connections.len(), 2);
        let vpn = &graph.vpn_connections[0];
        assert_eq!(vpn.customer_gateway.as_deref(), Some("OnPrem"));
        assert_eq!(vpn.region.as_deref(), Some("ca-central-1"));
        assert_eq!(vpn.transit_gateway, json!("Main"));
        assert_eq!(vpn.static_routes_only, json!(false));
        assert_eq!(
            vpn.tunnel_specifications,
            json!([{"tunnelInsideCidr": "169.254.200.0/30"}])
        );
        assert_eq!(graph.vpn_connections[1].route_table_propagations, json!([]));
        assert_eq!(graph.vpn_connections[1].account.as_deref(), Some("Network"));
    }

    #[test]
    fn test_cnfgw_endpoint_filter() {
        let graph = extract_graph(&yaml(
            r#"
transitGateways:
  - name: Main
    routeTables:
      - name: core
        routes:
          - destinationCidrBlock: 0.0.0.0/0
            targetVpcEndpoint: vpce-CNFGW-01
          - destination: 10.0.0.0/8
            targetVpcEndpoint: vpce-cnfgw-02
          - destinationCidrBlock: 10.1.0.0/16
            targetVpcEndpoint: vpce-other
          - destinationCidrBlock: 10.2.0.0/16
            targetVpcEndpoint: ""
          - destinationCidrBlock: 10.3.0.0/16
          - oops
      - bogus
"#,
        ));
        assert_eq!(graph.cnfgw_endpoints.len(), 2);

        let first = &graph.cnfgw_endpoints[0];
        assert_eq!(first.id, "vpce-CNFGW-01");
        assert_eq!(first.tgw.as_deref(), Some("Main"));
        assert_eq!(first.route_table.as_deref(), Some("core"));
        assert_eq!(first.destination.as_deref(), Some("0.0.0.0/0"));
        assert_eq!(first.kind, EndpointKind::PaloAltoCnfgw);

        assert_eq!(graph.cnfgw_endpoints[1].destination.as_deref(), Some("10.0.0.0/8"));
    }

    #[test]
    fn test_wrong_collection_types_are_empty() {
        let graph = extract_graph(&yaml(
            r#"
transitGateways: {name: not-a-list}
vpcs: "nope"
directConnectGateways: 3
customerGateways: ~
"#,
        ));
        assert!(graph.is_empty());
    }
}
