//! Per-organization emission of connection profile variants.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use super::builder::{build_profile, ProfileOptions, ProfileOverrides};
use super::context::DeploymentContext;
use super::types::ConnectionProfile;
use crate::config::Topology;

/// Directory under the network root that receives generated profiles
pub const OUTPUT_SUBDIR: &str = "generated-connection-tls";

/// Whether channel peers are used as event sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileVariant {
    /// Event-subscribing: every channel peer is an event source
    Blocking,
    /// No channel peer is an event source
    NonBlocking,
}

impl ProfileVariant {
    pub const ALL: [ProfileVariant; 2] = [ProfileVariant::Blocking, ProfileVariant::NonBlocking];

    pub fn event_source(self) -> bool {
        matches!(self, ProfileVariant::Blocking)
    }

    pub fn file_name(self, context: &DeploymentContext, org_lower: &str) -> String {
        match self {
            ProfileVariant::Blocking => {
                format!("{}{}-connection-tls.json", context.file_prefix(), org_lower)
            }
            ProfileVariant::NonBlocking => format!(
                "{}non-blocking-{}-connection-tls.json",
                context.file_prefix(),
                org_lower
            ),
        }
    }
}

/// One output document and the file name it is written to
#[derive(Debug, Clone)]
pub struct RenderedProfile {
    pub file_name: String,
    pub variant: ProfileVariant,
    pub profile: ConnectionProfile,
}

/// Produce both variants for every organization from the shared base profile
pub fn render_variants(
    base: &ConnectionProfile,
    topology: &Topology,
    context: &DeploymentContext,
) -> Vec<RenderedProfile> {
    let mut rendered = Vec::with_capacity(topology.organizations.len() * 2);
    for org in &topology.organizations {
        for variant in ProfileVariant::ALL {
            let overrides = ProfileOverrides {
                client_organization: org.msp_id(),
                event_source: variant.event_source(),
                discover: context.discover_override(),
            };
            rendered.push(RenderedProfile {
                file_name: variant.file_name(context, &org.lower()),
                variant,
                profile: base.with_overrides(&overrides),
            });
        }
    }
    rendered
}

/// Serialize a profile as 4-space indented JSON
pub fn to_pretty_json(profile: &ConnectionProfile) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    profile.serialize(&mut serializer)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Build, render and write every profile under `{base_dir}/generated-connection-tls`
pub fn write_profiles(
    base_dir: &Path,
    topology: &Topology,
    context: &DeploymentContext,
    options: &ProfileOptions,
) -> Result<Vec<PathBuf>> {
    let base = build_profile(topology, context, options)
        .wrap_err_with(|| format!("Failed to build {} connection profile", context.name()))?;

    let output_dir = base_dir.join(OUTPUT_SUBDIR);
    fs::create_dir_all(&output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let mut written = Vec::new();
    for rendered in render_variants(&base, topology, context) {
        let path = output_dir.join(&rendered.file_name);
        let json = to_pretty_json(&rendered.profile)
            .context("Failed to serialize connection profile to JSON")?;
        fs::write(&path, json)
            .wrap_err_with(|| format!("Failed to write connection profile to {}", path.display()))?;
        log::info!("Connection profile written to {}", path.display());
        written.push(path);
    }

    Ok(written)
}
