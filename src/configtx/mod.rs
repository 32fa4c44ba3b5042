//! Partial `configtx.yaml` generation.
//!
//! Renders one stanza per organization plus the Raft consenter list and
//! splices both into the channel configuration template.

pub mod fragments;
pub mod splice;

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Context, Result};
use log::info;

use crate::config::Topology;
use crate::error::GenError;
use crate::hosts::ResolveHost;

pub use fragments::{build_fragments, Consenter, ConsenterOrder, Fragments, OrgStanza};
pub use splice::splice_into_template;

/// Default location of the outer template, relative to the working directory
pub const DEFAULT_TEMPLATE_PATH: &str = "config-template/configtxTemplate.yaml";

/// How node names become hosts in the rendered fragments
pub struct HostResolvers<'a> {
    pub orderers: &'a dyn ResolveHost,
    pub peers: &'a dyn ResolveHost,
}

/// Render the complete `configtx.yaml` text
pub fn render_configtx(
    topology: &Topology,
    hosts: &HostResolvers<'_>,
    base_dir: &str,
    template: &str,
    template_name: &str,
    order: ConsenterOrder,
) -> Result<String, GenError> {
    let first_org = topology
        .first_organization()
        .ok_or_else(|| GenError::config_parse("topology", "at least one organization is required"))?
        .msp_id();

    let fragments = build_fragments(topology, hosts.orderers, hosts.peers, base_dir, order)?;

    splice_into_template(
        template,
        template_name,
        &fragments.organizations_section(),
        &fragments.consenters_section(),
        &first_org,
    )
}

/// Read the template, render and write `{output_dir}/{subdir}/configtx.yaml`
pub fn write_configtx(
    topology: &Topology,
    hosts: &HostResolvers<'_>,
    base_dir: &str,
    template_path: &Path,
    output_dir: &Path,
    order: ConsenterOrder,
) -> Result<PathBuf> {
    let template = fs::read_to_string(template_path)
        .wrap_err_with(|| format!("Failed to read template '{}'", template_path.display()))?;
    let template_name = template_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| eyre!("Invalid template path: {}", template_path.display()))?;

    let configtx = render_configtx(topology, hosts, base_dir, &template, &template_name, order)
        .wrap_err("Failed to render configtx.yaml")?;

    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;
    let path = output_dir.join("configtx.yaml");
    fs::write(&path, configtx)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

    info!("configtx.yaml written to {}", path.display());
    Ok(path)
}
