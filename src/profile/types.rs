//! Connection profile document types.
//!
//! Field names follow the connection-profile schema consumed by the
//! network's client SDKs. Dynamic sections are `BTreeMap`s so the JSON
//! output has a stable key order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Client-facing description of how to reach every network node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub name: String,
    pub version: String,
    pub client: ClientSection,
    pub channels: BTreeMap<String, ChannelSection>,
    pub organizations: BTreeMap<String, OrganizationEntry>,
    pub orderers: BTreeMap<String, OrdererEntry>,
    pub peers: BTreeMap<String, PeerEntry>,
    #[serde(rename = "certificateAuthorities")]
    pub certificate_authorities: BTreeMap<String, CertificateAuthorityEntry>,
}

/// Acting organization and request timeouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSection {
    pub organization: String,
    pub connection: ClientConnection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConnection {
    pub timeout: ClientTimeouts,
}

/// Timeouts in seconds, encoded as strings by the SDK schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientTimeouts {
    pub peer: PeerTimeouts,
    pub orderer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerTimeouts {
    pub endorser: String,
}

/// Channel membership: ordered orderer names and per-peer roles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChannelSection {
    pub orderers: Vec<String>,
    pub peers: BTreeMap<String, ChannelPeerRoles>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPeerRoles {
    pub endorsing_peer: bool,
    pub chaincode_query: bool,
    pub ledger_query: bool,
    pub event_source: bool,
    pub discover: bool,
}

/// A file referenced by path only; never read by the generators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PemPath {
    pub path: String,
}

impl PemPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationEntry {
    pub mspid: String,
    pub peers: Vec<String>,
    #[serde(rename = "certificateAuthorities")]
    pub certificate_authorities: Vec<String>,
    #[serde(rename = "adminPrivateKeyPEM")]
    pub admin_private_key_pem: PemPath,
    #[serde(rename = "signedCertPEM")]
    pub signed_cert_pem: PemPath,
}

/// TLS host overrides shared by orderer and peer entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrpcOptions {
    #[serde(rename = "ssl-target-name-override")]
    pub ssl_target_name_override: String,
    #[serde(rename = "hostnameOverride")]
    pub hostname_override: String,
    /// Milliseconds; only set on peers
    #[serde(rename = "request-timeout", skip_serializing_if = "Option::is_none", default)]
    pub request_timeout: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdererEntry {
    pub url: String,
    pub mspid: String,
    #[serde(rename = "grpcOptions")]
    pub grpc_options: GrpcOptions,
    #[serde(rename = "tlsCACerts")]
    pub tls_ca_certs: PemPath,
    #[serde(rename = "adminPrivateKeyPEM")]
    pub admin_private_key_pem: PemPath,
    #[serde(rename = "signedCertPEM")]
    pub signed_cert_pem: PemPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerEntry {
    pub url: String,
    #[serde(rename = "grpcOptions")]
    pub grpc_options: GrpcOptions,
    #[serde(rename = "tlsCACerts")]
    pub tls_ca_certs: PemPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaGrpcOptions {
    pub verify: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registrar {
    #[serde(rename = "enrollId")]
    pub enroll_id: String,
    #[serde(rename = "enrollSecret")]
    pub enroll_secret: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateAuthorityEntry {
    pub url: String,
    #[serde(rename = "grpcOptions")]
    pub grpc_options: CaGrpcOptions,
    #[serde(rename = "tlsCACerts")]
    pub tls_ca_certs: PemPath,
    pub registrar: Vec<Registrar>,
}
