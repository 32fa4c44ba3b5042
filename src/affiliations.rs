//! Rewriting of the `affiliations:` section of a CA server config.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};

use crate::error::GenError;

pub const AFFILIATIONS_MARKER: &str = "affiliations:";

/// The section ends at the next comment line
const SECTION_END_MARKER: &str = "\n#";

pub const CA_SERVER_CONFIG_FILE: &str = "fabric-ca-server-config.yaml";

/// Replace the body of the first `affiliations:` section with a single
/// affiliation named after the organization
pub fn rewrite_affiliations(ca_config: &str, org: &str) -> Result<String, GenError> {
    let begin = ca_config
        .find(AFFILIATIONS_MARKER)
        .map(|pos| pos + AFFILIATIONS_MARKER.len())
        .ok_or_else(|| GenError::marker(AFFILIATIONS_MARKER, CA_SERVER_CONFIG_FILE))?;
    let end = ca_config[begin..]
        .find(SECTION_END_MARKER)
        .map(|pos| begin + pos)
        .ok_or_else(|| GenError::marker("\\n#", CA_SERVER_CONFIG_FILE))?;

    Ok(format!(
        "{}\n    {org}:\n      - {org}\n{}",
        &ca_config[..begin],
        &ca_config[end..],
        org = org
    ))
}

/// Rewrite `{ca_dir}/fabric-ca-server-config.yaml` in place
pub fn rewrite_affiliations_file(ca_dir: &Path, org: &str) -> Result<PathBuf> {
    let path = ca_dir.join(CA_SERVER_CONFIG_FILE);
    let content = fs::read_to_string(&path)
        .wrap_err_with(|| format!("Failed to read CA server config '{}'", path.display()))?;

    let rewritten = rewrite_affiliations(&content, org)
        .wrap_err_with(|| format!("Failed to rewrite affiliations in {}", path.display()))?;

    fs::write(&path, rewritten)
        .wrap_err_with(|| format!("Failed to write CA server config '{}'", path.display()))?;
    log::info!("Affiliations for {} written to {}", org, path.display());
    Ok(path)
}
