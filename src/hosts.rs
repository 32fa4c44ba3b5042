//! Host resolution maps.
//!
//! Deployment steps hand the generators pre-resolved addresses as JSON
//! objects (`{"orderer1-org1": "ec2-...", ...}` or `{"peer1-org1": 7051}`).
//! This module parses those maps and resolves logical node names against
//! them.

use std::collections::BTreeMap;

use crate::error::GenError;

/// Anything that can turn a logical node name into a network host
pub trait ResolveHost {
    fn resolve(&self, node: &str) -> Result<String, GenError>;
}

/// Mapping from logical node name to an address or port, read-only after parsing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostMap {
    label: String,
    entries: BTreeMap<String, String>,
}

impl HostMap {
    pub fn new(label: impl Into<String>, entries: BTreeMap<String, String>) -> Self {
        Self {
            label: label.into(),
            entries,
        }
    }

    /// Parse a JSON object whose values are strings or numbers
    pub fn from_json(label: &str, json: &str) -> Result<Self, GenError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| GenError::config_parse(label, e))?;

        let object = value.as_object().ok_or_else(|| {
            GenError::config_parse(label, "expected a JSON object mapping node names to addresses")
        })?;

        let mut entries = BTreeMap::new();
        for (key, value) in object {
            let address = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                other => {
                    return Err(GenError::config_parse(
                        label,
                        format!("value for '{}' must be a string or number, got {}", key, other),
                    ))
                }
            };
            entries.insert(key.clone(), address);
        }

        log::debug!("Parsed {} entries for {}", entries.len(), label);

        Ok(Self::new(label, entries))
    }

    pub fn get(&self, key: &str) -> Result<&str, GenError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| GenError::lookup(&self.label, key))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResolveHost for HostMap {
    fn resolve(&self, node: &str) -> Result<String, GenError> {
        self.get(node).map(str::to_string)
    }
}

/// Resolves every node to its own logical name (Docker service names)
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeNameHosts;

impl ResolveHost for NodeNameHosts {
    fn resolve(&self, node: &str) -> Result<String, GenError> {
        Ok(node.to_string())
    }
}
