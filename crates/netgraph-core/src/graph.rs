//! Normalized network entity graph.
//!
//! Every collection is independent; the graph is built once by the extractor
//! and never mutated afterwards. String attributes that were missing from the
//! source configuration are `None` and serialize as `null`. Attributes that are
//! carried through verbatim keep their original JSON shape.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The full entity graph, one vector per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkGraph {
    pub transit_gateways: Vec<TransitGateway>,
    pub vpcs: Vec<Vpc>,
    pub tgw_attachments: Vec<TgwAttachment>,
    pub dx_gateways: Vec<DxGateway>,
    pub vpn_connections: Vec<VpnConnection>,
    pub cnfgw_endpoints: Vec<CnfgwEndpoint>,
}

impl NetworkGraph {
    /// Total number of top-level entities across all collections.
    pub fn entity_count(&self) -> usize {
        self.transit_gateways.len()
            + self.vpcs.len()
            + self.tgw_attachments.len()
            + self.dx_gateways.len()
            + self.vpn_connections.len()
            + self.cnfgw_endpoints.len()
    }

    /// Number of subnets across all VPCs.
    pub fn subnet_count(&self) -> usize {
        self.vpcs.iter().map(|v| v.subnets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }
}

/// A transit gateway hub. Identified by its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitGateway {
    pub id: Option<String>,
    pub name: Option<String>,
    pub account: Option<String>,
    pub region: Option<String>,
    /// Amazon side ASN, passed through as written.
    pub asn: Value,
}

/// A virtual network with its subnets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vpc {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Owning account. `"unknown"` when the key is omitted, `None` when it is
    /// explicitly `null`.
    pub account: Option<String>,
    /// Falls back to the document-level region when the key is omitted.
    pub region: Option<String>,
    /// Primary CIDR block.
    pub cidr: Option<String>,
    /// Distinct availability zones of the subnets, sorted.
    pub azs: Vec<String>,
    pub subnets: Vec<Subnet>,
}

/// A subnet nested in a VPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    /// `"<vpcId>-<subnetName>"`, or the bare subnet name.
    pub id: Option<String>,
    pub name: Option<String>,
    pub cidr: Option<String>,
    pub az: Option<String>,
    #[serde(rename = "type")]
    pub subnet_type: String,
}

/// Binding of a VPC's subnets to a transit gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TgwAttachment {
    /// `"<vpcId>-<tgwName>"`, or the attachment name.
    pub id: Option<String>,
    pub tgw_id: Option<String>,
    pub vpc_id: Option<String>,
    pub name: Option<String>,
    /// Subnet ids in the same form as [`Subnet::id`], index-aligned with the
    /// configured list. Entries that are not a subnet name are `None`.
    pub subnets: Vec<Option<String>>,
    pub route_tables: TgwAttachmentRouteTables,
}

/// Transit gateway route table references of an attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TgwAttachmentRouteTables {
    pub tgw_association: Value,
    pub tgw_propagations: Value,
}

/// A Direct Connect gateway with its virtual interfaces and TGW associations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DxGateway {
    pub id: Option<String>,
    pub name: Option<String>,
    pub account: Option<String>,
    pub asn: Value,
    pub virtual_interfaces: Vec<VirtualInterface>,
    pub tgw_associations: Vec<DxTgwAssociation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualInterface {
    pub id: Option<String>,
    pub name: Option<String>,
    pub connection_id: Option<String>,
    pub customer_asn: Value,
    pub region: Option<String>,
    #[serde(rename = "type")]
    pub vif_type: Option<String>,
    pub vlan: Value,
    pub jumbo_frames: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DxTgwAssociation {
    pub tgw_name: Option<String>,
    pub account: Option<String>,
    pub allowed_prefixes: Value,
    pub route_table_associations: Value,
    pub route_table_propagations: Value,
}

/// A site-to-site VPN hanging off a customer gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpnConnection {
    pub name: Option<String>,
    pub customer_gateway: Option<String>,
    pub account: Option<String>,
    pub region: Option<String>,
    pub transit_gateway: Value,
    pub static_routes_only: Value,
    pub route_table_associations: Value,
    pub route_table_propagations: Value,
    pub tunnel_specifications: Value,
}

/// Classification of derived gateway endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EndpointKind {
    /// Firewall appliance endpoint reached through a TGW route.
    #[serde(rename = "palo_alto_cnfgw")]
    #[display("palo_alto_cnfgw")]
    PaloAltoCnfgw,
}

/// A firewall gateway endpoint discovered in a transit gateway route table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CnfgwEndpoint {
    /// The raw `targetVpcEndpoint` reference.
    pub id: String,
    pub name: String,
    pub tgw: Option<String>,
    pub route_table: Option<String>,
    pub destination: Option<String>,
    #[serde(rename = "type")]
    pub kind: EndpointKind,
}
