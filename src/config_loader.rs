use crate::config::Topology;
use crate::error::GenError;
use log::{info, warn};
use std::path::Path;

/// Default topology file read by every generator
pub const DEFAULT_TOPOLOGY_FILE: &str = "CONFIG-ME-FIRST.yaml";

/// Load and parse the network topology from a YAML file
pub fn load_topology(config_path: &Path) -> Result<Topology, GenError> {
    info!("Loading topology from: {:?}", config_path);

    let source_name = config_path.display().to_string();
    let content = std::fs::read_to_string(config_path)
        .map_err(|e| GenError::config_parse(&source_name, e))?;

    let topology = parse_topology(&content, &source_name)?;

    info!(
        "Loaded {} organizations ({} orderers, {} peers, {} applications)",
        topology.organizations.len(),
        topology.total_orderers(),
        topology.total_peers(),
        topology.applications_quantity
    );

    Ok(topology)
}

/// Parse topology YAML text; `source_name` only labels errors
pub fn parse_topology(content: &str, source_name: &str) -> Result<Topology, GenError> {
    let topology: Topology =
        serde_yaml::from_str(content).map_err(|e| GenError::config_parse(source_name, e))?;

    if topology.organizations.is_empty() {
        warn!("Topology {} declares no organizations", source_name);
    }

    topology.validate()?;

    Ok(topology)
}
