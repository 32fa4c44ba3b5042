use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::GenError;

/// Membership service provider flavour of an organization
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "String", into = "String")]
pub enum MspType {
    /// Regular X.509 based MSP
    #[default]
    Default,
    /// Identity mixer MSP
    Idemix,
}

impl From<String> for MspType {
    fn from(value: String) -> Self {
        // Anything other than exactly "idemix" keeps the regular MSP
        if value == "idemix" {
            MspType::Idemix
        } else {
            MspType::Default
        }
    }
}

impl From<MspType> for String {
    fn from(value: MspType) -> Self {
        match value {
            MspType::Default => "default".to_string(),
            MspType::Idemix => "idemix".to_string(),
        }
    }
}

/// A network participant as declared in `CONFIG-ME-FIRST.yaml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Organization {
    pub name: String,
    #[serde(rename = "orderer-quantity", default)]
    pub orderer_quantity: u32,
    #[serde(rename = "peer-quantity", default)]
    pub peer_quantity: u32,
    #[serde(rename = "msptype", default)]
    pub msp_type: MspType,
}

impl Organization {
    /// Name used for file-system paths and host names
    pub fn lower(&self) -> String {
        self.name.to_lowercase()
    }

    /// Name used as the MSP identifier
    pub fn msp_id(&self) -> String {
        self.name.to_uppercase()
    }

    pub fn is_idemix(&self) -> bool {
        self.msp_type == MspType::Idemix
    }

    /// `orderer{N}-{org}` for N in 1..=orderer_quantity
    pub fn orderer_names(&self) -> Vec<String> {
        (1..=self.orderer_quantity)
            .map(|i| orderer_name(i, &self.lower()))
            .collect()
    }

    /// `peer{N}-{org}` for N in 1..=peer_quantity
    pub fn peer_names(&self) -> Vec<String> {
        (1..=self.peer_quantity)
            .map(|i| peer_name(i, &self.lower()))
            .collect()
    }

    pub fn ca_name(&self) -> String {
        format!("rca-{}", self.lower())
    }
}

pub fn orderer_name(index: u32, org_lower: &str) -> String {
    format!("orderer{}-{}", index, org_lower)
}

pub fn peer_name(index: u32, org_lower: &str) -> String {
    format!("peer{}-{}", index, org_lower)
}

/// Network topology loaded from `CONFIG-ME-FIRST.yaml`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Topology {
    pub organizations: Vec<Organization>,
    #[serde(rename = "applications-quantity", default)]
    pub applications_quantity: u32,
}

impl Topology {
    /// Validate the topology
    pub fn validate(&self) -> Result<(), GenError> {
        let mut seen = HashSet::new();
        for org in &self.organizations {
            if org.name.trim().is_empty() {
                return Err(GenError::config_parse(
                    "topology",
                    "organization name cannot be empty",
                ));
            }
            if !seen.insert(org.lower()) {
                return Err(GenError::config_parse(
                    "topology",
                    format!("duplicate organization '{}'", org.name),
                ));
            }
        }
        Ok(())
    }

    pub fn first_organization(&self) -> Option<&Organization> {
        self.organizations.first()
    }

    pub fn total_orderers(&self) -> u32 {
        self.organizations.iter().map(|o| o.orderer_quantity).sum()
    }

    pub fn total_peers(&self) -> u32 {
        self.organizations.iter().map(|o| o.peer_quantity).sum()
    }
}
