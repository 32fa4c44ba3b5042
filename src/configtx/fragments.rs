//! Organization stanzas and Raft consenters for `configtx.yaml`.
//!
//! Stanzas are built as records first and serialized last, so no partially
//! substituted text is ever searched or rewritten.

use crate::config::{orderer_name, peer_name, Organization, Topology};
use crate::error::GenError;
use crate::hosts::ResolveHost;

pub const ORDERER_PORT: u16 = 7050;
pub const ANCHOR_PEER_PORT: u16 = 7051;

/// Order of the consenter list across organizations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsenterOrder {
    /// Organizations in reverse declaration order, each organization's
    /// orderers ascending. Matches the existing downstream template.
    #[default]
    Legacy,
    /// Organizations and orderers in declaration order
    Declaration,
}

/// One entry of the `Organizations:` section
#[derive(Debug, Clone, PartialEq)]
pub struct OrgStanza {
    pub msp_id: String,
    pub msp_dir: String,
    pub idemix: bool,
    /// `host:port` entries in the order they appear in the text
    pub orderer_endpoints: Vec<String>,
    pub anchor_peer: Option<String>,
}

impl OrgStanza {
    pub fn from_organization(
        org: &Organization,
        orderer_hosts: &dyn ResolveHost,
        peer_hosts: &dyn ResolveHost,
        base_dir: &str,
    ) -> Result<Self, GenError> {
        let lower = org.lower();

        // Each endpoint is inserted right after the section header, highest
        // index first, which leaves the text in ascending order.
        let mut orderer_endpoints = Vec::new();
        for index in (1..=org.orderer_quantity).rev() {
            let host = orderer_hosts.resolve(&orderer_name(index, &lower))?;
            orderer_endpoints.insert(0, format!("{}:{}", host, ORDERER_PORT));
        }

        let anchor_peer = if org.peer_quantity == 0 {
            None
        } else {
            Some(peer_hosts.resolve(&peer_name(1, &lower))?)
        };

        Ok(Self {
            msp_id: org.msp_id(),
            msp_dir: format!("{}/hyperledger/{}/msp", base_dir, lower),
            idemix: org.is_idemix(),
            orderer_endpoints,
            anchor_peer,
        })
    }

    pub fn render(&self) -> String {
        let id = &self.msp_id;
        let mut out = String::new();
        out.push_str(&format!("    \n    - &{id}\n        Name: {id}\n\n"));
        out.push_str("        SkipAsForeign: false\n\n");
        out.push_str(&format!("        ID: {id}"));
        if self.idemix {
            out.push_str("\n\n        msptype: idemix");
        }
        out.push_str(&format!("\n\n        MSPDir: {}\n\n", self.msp_dir));

        out.push_str(&format!("        Policies: &{id}Policies\n"));
        for (policy, role) in [
            ("Readers", "member"),
            ("Writers", "member"),
            ("Admins", "admin"),
            ("Endorsement", "peer"),
        ] {
            out.push_str(&format!("            {policy}:\n"));
            out.push_str("                Type: Signature\n");
            out.push_str(&format!("                Rule: \"OR('{id}.{role}')\"\n"));
        }

        out.push_str("\n        OrdererEndpoints:");
        for endpoint in &self.orderer_endpoints {
            out.push_str(&format!("\n            - \"{endpoint}\""));
        }
        out.push_str("\n\n\n        ");

        if let Some(host) = &self.anchor_peer {
            out.push_str("AnchorPeers:\n");
            out.push_str(&format!("            - Host: {host}\n"));
            out.push_str(&format!("              Port: {ANCHOR_PEER_PORT}\n"));
        }
        out
    }
}

/// One Raft consenter entry
#[derive(Debug, Clone, PartialEq)]
pub struct Consenter {
    pub host: String,
    pub tls_cert: String,
}

impl Consenter {
    pub fn render(&self) -> String {
        format!(
            "\n            - Host: {host}\n              Port: {port}\n              ClientTLSCert: {cert}\n              ServerTLSCert: {cert}",
            host = self.host,
            port = ORDERER_PORT,
            cert = self.tls_cert,
        )
    }
}

/// Everything spliced into the outer template
#[derive(Debug, Clone, Default)]
pub struct Fragments {
    pub organizations: Vec<OrgStanza>,
    pub consenters: Vec<Consenter>,
}

impl Fragments {
    pub fn organizations_section(&self) -> String {
        self.organizations.iter().map(OrgStanza::render).collect()
    }

    pub fn consenters_section(&self) -> String {
        self.consenters.iter().map(Consenter::render).collect()
    }
}

fn org_consenters(
    org: &Organization,
    orderer_hosts: &dyn ResolveHost,
    base_dir: &str,
) -> Result<Vec<Consenter>, GenError> {
    let lower = org.lower();
    (1..=org.orderer_quantity)
        .map(|index| {
            Ok(Consenter {
                host: orderer_hosts.resolve(&orderer_name(index, &lower))?,
                tls_cert: format!(
                    "{}/hyperledger/{}/orderer{}/tls-msp/signcerts/cert.pem",
                    base_dir, lower, index
                ),
            })
        })
        .collect()
}

/// Build organization stanzas and the consenter list for the whole topology
pub fn build_fragments(
    topology: &Topology,
    orderer_hosts: &dyn ResolveHost,
    peer_hosts: &dyn ResolveHost,
    base_dir: &str,
    order: ConsenterOrder,
) -> Result<Fragments, GenError> {
    let mut fragments = Fragments::default();
    let mut per_org_consenters = Vec::with_capacity(topology.organizations.len());

    for org in &topology.organizations {
        let stanza = OrgStanza::from_organization(org, orderer_hosts, peer_hosts, base_dir)?;
        log::debug!(
            "Stanza for {}: {} orderer endpoints, anchor peer {:?}",
            stanza.msp_id,
            stanza.orderer_endpoints.len(),
            stanza.anchor_peer
        );
        fragments.organizations.push(stanza);
        per_org_consenters.push(org_consenters(org, orderer_hosts, base_dir)?);
    }

    if order == ConsenterOrder::Legacy {
        per_org_consenters.reverse();
    }
    fragments.consenters = per_org_consenters.into_iter().flatten().collect();

    Ok(fragments)
}
