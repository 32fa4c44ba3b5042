//! Connection profile construction.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, warn};

use super::context::{DeploymentContext, AWS_CA_PLACEHOLDER_URL};
use super::types::*;
use crate::config::{Organization, Topology};
use crate::error::GenError;

/// The only channel the generated profiles describe
pub const CHANNEL_NAME: &str = "canal";

/// Peer request timeout in milliseconds
pub const PEER_REQUEST_TIMEOUT_MS: u64 = 120_001;

/// `name` of every generated profile unless overridden
pub const DEFAULT_PROFILE_NAME: &str = "johann-generated";

pub const REGISTRAR_ENROLL_ID: &str = "admin";
pub const REGISTRAR_ENROLL_SECRET: &str = "adminpw";

/// Knobs that do not depend on the deployment context
#[derive(Debug, Clone)]
pub struct ProfileOptions {
    pub name: String,
    pub version: String,
    /// MSP id written on every orderer entry; `None` uses the owning organization's
    pub orderer_msp_id: Option<String>,
    /// Client timeouts in seconds
    pub endorser_timeout: String,
    pub orderer_timeout: String,
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            version: "1.0.0".to_string(),
            orderer_msp_id: None,
            endorser_timeout: "300".to_string(),
            orderer_timeout: "300".to_string(),
        }
    }
}

/// Per-output changes applied on top of the shared base profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileOverrides {
    pub client_organization: String,
    pub event_source: bool,
    pub discover: Option<bool>,
}

fn admin_key_path(root: &str, org_lower: &str) -> String {
    format!("{}/hyperledger/{}/admin1/msp/keystore/key.pem", root, org_lower)
}

fn admin_cert_path(root: &str, org_lower: &str) -> String {
    format!("{}/hyperledger/{}/admin1/msp/signcerts/cert.pem", root, org_lower)
}

fn tls_ca_cert_path(root: &str, org_lower: &str) -> String {
    format!("{}/hyperledger/{}/msp/tlscacerts/tls-ca-cert.pem", root, org_lower)
}

/// Build the shared connection profile for every organization in the topology.
///
/// `client.organization` is left empty; each emitted file sets it through
/// [`ConnectionProfile::with_overrides`].
pub fn build_profile(
    topology: &Topology,
    context: &DeploymentContext,
    options: &ProfileOptions,
) -> Result<ConnectionProfile, GenError> {
    let mut profile = ConnectionProfile {
        name: options.name.clone(),
        version: options.version.clone(),
        client: ClientSection {
            organization: String::new(),
            connection: ClientConnection {
                timeout: ClientTimeouts {
                    peer: PeerTimeouts {
                        endorser: options.endorser_timeout.clone(),
                    },
                    orderer: options.orderer_timeout.clone(),
                },
            },
        },
        channels: BTreeMap::new(),
        organizations: BTreeMap::new(),
        orderers: BTreeMap::new(),
        peers: BTreeMap::new(),
        certificate_authorities: BTreeMap::new(),
    };
    let mut channel = ChannelSection::default();

    for org in &topology.organizations {
        add_organization(&mut profile, &mut channel, org, context, options)?;
    }

    profile.channels.insert(CHANNEL_NAME.to_string(), channel);

    if matches!(context, DeploymentContext::Aws { .. }) && !topology.organizations.is_empty() {
        warn!(
            "AWS certificate authority URLs are emitted as '{}'",
            AWS_CA_PLACEHOLDER_URL
        );
    }

    profile.validate()?;
    Ok(profile)
}

fn add_organization(
    profile: &mut ConnectionProfile,
    channel: &mut ChannelSection,
    org: &Organization,
    context: &DeploymentContext,
    options: &ProfileOptions,
) -> Result<(), GenError> {
    let lower = org.lower();
    let msp_id = org.msp_id();
    let root = context.credential_root();
    debug!(
        "Adding organization {} ({} orderers, {} peers) for {}",
        msp_id,
        org.orderer_quantity,
        org.peer_quantity,
        context.name()
    );

    let mut org_entry = OrganizationEntry {
        mspid: msp_id.clone(),
        peers: Vec::new(),
        certificate_authorities: vec![org.ca_name()],
        admin_private_key_pem: PemPath::new(admin_key_path(root, &lower)),
        signed_cert_pem: PemPath::new(admin_cert_path(root, &lower)),
    };

    for orderer in org.orderer_names() {
        channel.orderers.push(orderer.clone());
        let entry = OrdererEntry {
            url: context.orderer_url(&orderer)?,
            mspid: options
                .orderer_msp_id
                .clone()
                .unwrap_or_else(|| msp_id.clone()),
            grpc_options: GrpcOptions {
                ssl_target_name_override: orderer.clone(),
                hostname_override: orderer.clone(),
                request_timeout: None,
            },
            tls_ca_certs: PemPath::new(tls_ca_cert_path(root, &lower)),
            admin_private_key_pem: PemPath::new(admin_key_path(root, &lower)),
            signed_cert_pem: PemPath::new(admin_cert_path(root, &lower)),
        };
        profile.orderers.insert(orderer, entry);
    }

    for peer in org.peer_names() {
        channel.peers.insert(
            peer.clone(),
            ChannelPeerRoles {
                endorsing_peer: true,
                chaincode_query: true,
                ledger_query: true,
                event_source: true,
                discover: context.discover_default(),
            },
        );
        org_entry.peers.push(peer.clone());
        let entry = PeerEntry {
            url: context.peer_url(&peer)?,
            grpc_options: GrpcOptions {
                ssl_target_name_override: peer.clone(),
                hostname_override: peer.clone(),
                request_timeout: Some(PEER_REQUEST_TIMEOUT_MS),
            },
            tls_ca_certs: PemPath::new(tls_ca_cert_path(root, &lower)),
        };
        profile.peers.insert(peer, entry);
    }

    profile.certificate_authorities.insert(
        org.ca_name(),
        CertificateAuthorityEntry {
            url: context.ca_url(org)?,
            grpc_options: CaGrpcOptions { verify: true },
            tls_ca_certs: PemPath::new(tls_ca_cert_path(root, &lower)),
            registrar: vec![Registrar {
                enroll_id: REGISTRAR_ENROLL_ID.to_string(),
                enroll_secret: REGISTRAR_ENROLL_SECRET.to_string(),
            }],
        },
    );

    profile.organizations.insert(msp_id, org_entry);
    Ok(())
}

impl ConnectionProfile {
    /// Return an independent copy with the per-output overrides applied
    pub fn with_overrides(&self, overrides: &ProfileOverrides) -> ConnectionProfile {
        let mut profile = self.clone();
        profile.client.organization = overrides.client_organization.clone();
        for channel in profile.channels.values_mut() {
            for roles in channel.peers.values_mut() {
                roles.event_source = overrides.event_source;
                if let Some(discover) = overrides.discover {
                    roles.discover = discover;
                }
            }
        }
        profile
    }

    /// Check that every channel member and organization peer has a node entry
    pub fn validate(&self) -> Result<(), GenError> {
        for (channel_name, channel) in &self.channels {
            let mut seen = BTreeSet::new();
            for orderer in &channel.orderers {
                if !self.orderers.contains_key(orderer) {
                    return Err(GenError::InconsistentProfile(format!(
                        "channel '{}' references unknown orderer '{}'",
                        channel_name, orderer
                    )));
                }
                if !seen.insert(orderer) {
                    return Err(GenError::InconsistentProfile(format!(
                        "channel '{}' lists orderer '{}' twice",
                        channel_name, orderer
                    )));
                }
            }
            for peer in channel.peers.keys() {
                if !self.peers.contains_key(peer) {
                    return Err(GenError::InconsistentProfile(format!(
                        "channel '{}' references unknown peer '{}'",
                        channel_name, peer
                    )));
                }
            }
        }

        for (msp_id, org) in &self.organizations {
            if let Some(peer) = org.peers.iter().find(|p| !self.peers.contains_key(*p)) {
                return Err(GenError::InconsistentProfile(format!(
                    "organization '{}' lists unknown peer '{}'",
                    msp_id, peer
                )));
            }
            if let Some(ca) = org
                .certificate_authorities
                .iter()
                .find(|ca| !self.certificate_authorities.contains_key(*ca))
            {
                return Err(GenError::InconsistentProfile(format!(
                    "organization '{}' lists unknown certificate authority '{}'",
                    msp_id, ca
                )));
            }
        }

        Ok(())
    }
}
