//! Core domain types for the netgraph network topology extractor.
//!
//! This crate contains:
//! - The normalized entity graph (transit gateways, VPCs, attachments, ...)
//! - Synthesized identifier helpers shared by every entity kind
//! - The JSON output envelope

pub mod graph;
pub mod id;
pub mod output;

pub use graph::{
    CnfgwEndpoint, DxGateway, DxTgwAssociation, EndpointKind, NetworkGraph, Subnet,
    TgwAttachment, TgwAttachmentRouteTables, TransitGateway, VirtualInterface, Vpc,
    VpnConnection,
};
pub use id::{join_id, scoped_id};
pub use output::{GraphDocument, Metadata};
