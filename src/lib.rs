//! # fabnetgen - deployment generators for a permissioned-blockchain test network
//!
//! Every generator reads the hand-authored topology description
//! (`CONFIG-ME-FIRST.yaml`) and renders one artifact needed to bring the
//! network up or to study it afterwards.
//!
//! ## Architecture
//!
//! - `config`: topology data model (organizations, node naming)
//! - `config_loader`: topology YAML loading and validation
//! - `hosts`: node name to address maps supplied as JSON
//! - `profile`: client connection profiles for AWS, Docker and localhost
//! - `configtx`: organization stanzas and Raft consenters spliced into `configtx.yaml`
//! - `lookups`: small values read back from generated documents
//! - `affiliations`: CA server config affiliation rewrite
//! - `stats`: container resource usage parsing, charts and summaries
//! - `error`: typed error kinds shared by all modules
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use fabnetgen::{config_loader, profile};
//!
//! let topology = config_loader::load_topology(Path::new("CONFIG-ME-FIRST.yaml"))?;
//! let written = profile::write_profiles(
//!     Path::new("."),
//!     &topology,
//!     &profile::DeploymentContext::Docker,
//!     &profile::ProfileOptions::default(),
//! )?;
//! // generated-connection-tls/docker-{org}-connection-tls.json and
//! // generated-connection-tls/docker-non-blocking-{org}-connection-tls.json
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Topology Format
//!
//! ```yaml
//! organizations:
//!   - name: org1
//!     orderer-quantity: 2
//!     peer-quantity: 1
//!   - name: org2
//!     orderer-quantity: 1
//!     peer-quantity: 2
//!     msptype: idemix
//! applications-quantity: 1
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`error::GenError`]; drivers that touch the
//! filesystem return `color_eyre::eyre::Result` with context attached.

pub mod affiliations;
pub mod config;
pub mod config_loader;
pub mod configtx;
pub mod error;
pub mod hosts;
pub mod lookups;
pub mod profile;
pub mod stats;
