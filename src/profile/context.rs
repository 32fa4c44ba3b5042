//! Deployment contexts.
//!
//! The three deployment targets differ only in where credentials live and
//! how node addresses are resolved.

use crate::config::Organization;
use crate::error::GenError;
use crate::hosts::{HostMap, ResolveHost};

pub const ORDERER_PORT: u16 = 7050;
pub const PEER_PORT: u16 = 7051;
pub const CA_PORT: u16 = 7053;

/// Network root inside the application containers
pub const CONTAINER_BASE_DIR: &str = "/EnergyNetwork";

/// CA URL emitted for AWS deployments, where CA hosts are not known yet
pub const AWS_CA_PLACEHOLDER_URL: &str = "https://null";

/// Where the client application runs relative to the network
#[derive(Debug, Clone)]
pub enum DeploymentContext {
    /// Nodes on AWS instances, addressed through host maps
    Aws {
        credential_root: String,
        orderer_hosts: HostMap,
        peer_hosts: HostMap,
    },
    /// Client inside the Docker network, nodes addressed by service name
    Docker,
    /// Client on the Docker host, nodes reached through published ports
    Localhost {
        credential_root: String,
        ca_ports: HostMap,
        orderer_ports: HostMap,
        peer_ports: HostMap,
    },
}

impl DeploymentContext {
    pub fn name(&self) -> &'static str {
        match self {
            DeploymentContext::Aws { .. } => "aws",
            DeploymentContext::Docker => "docker",
            DeploymentContext::Localhost { .. } => "localhost",
        }
    }

    /// Parent directory of `hyperledger/` as seen by the client
    pub fn credential_root(&self) -> &str {
        match self {
            DeploymentContext::Aws { credential_root, .. } => credential_root,
            DeploymentContext::Docker => CONTAINER_BASE_DIR,
            DeploymentContext::Localhost { credential_root, .. } => credential_root,
        }
    }

    /// Prefix of the generated profile file names
    pub fn file_prefix(&self) -> &'static str {
        match self {
            DeploymentContext::Aws { .. } => "aws-",
            DeploymentContext::Docker => "docker-",
            DeploymentContext::Localhost { .. } => "",
        }
    }

    /// Initial `discover` role of every channel peer
    pub fn discover_default(&self) -> bool {
        matches!(self, DeploymentContext::Aws { .. })
    }

    /// `discover` value forced on every emitted variant, if any
    pub fn discover_override(&self) -> Option<bool> {
        match self {
            DeploymentContext::Docker => Some(true),
            _ => None,
        }
    }

    pub fn orderer_url(&self, orderer: &str) -> Result<String, GenError> {
        let address = match self {
            DeploymentContext::Aws { orderer_hosts, .. } => {
                format!("{}:{}", orderer_hosts.resolve(orderer)?, ORDERER_PORT)
            }
            DeploymentContext::Docker => format!("{}:{}", orderer, ORDERER_PORT),
            DeploymentContext::Localhost { orderer_ports, .. } => {
                format!("localhost:{}", orderer_ports.get(orderer)?)
            }
        };
        Ok(format!("grpcs://{}", address))
    }

    pub fn peer_url(&self, peer: &str) -> Result<String, GenError> {
        let address = match self {
            DeploymentContext::Aws { peer_hosts, .. } => {
                format!("{}:{}", peer_hosts.resolve(peer)?, PEER_PORT)
            }
            DeploymentContext::Docker => format!("{}:{}", peer, PEER_PORT),
            DeploymentContext::Localhost { peer_ports, .. } => {
                format!("localhost:{}", peer_ports.get(peer)?)
            }
        };
        Ok(format!("grpcs://{}", address))
    }

    /// Localhost CA ports are keyed by lower-case organization name
    pub fn ca_url(&self, org: &Organization) -> Result<String, GenError> {
        match self {
            DeploymentContext::Aws { .. } => Ok(AWS_CA_PLACEHOLDER_URL.to_string()),
            DeploymentContext::Docker => Ok(format!("https://{}:{}", org.ca_name(), CA_PORT)),
            DeploymentContext::Localhost { ca_ports, .. } => {
                Ok(format!("https://localhost:{}", ca_ports.get(&org.lower())?))
            }
        }
    }
}
