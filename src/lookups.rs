//! Small lookups used as glue between deployment shell steps.
//!
//! Each function reads a generated document and returns the one value a
//! later step needs: the default orderer of a system channel profile, the
//! organizations of a channel profile, or installed chaincode package ids.

use serde::Deserialize;
use serde_yaml::Value;

use crate::config::orderer_name;
use crate::error::GenError;

fn profile_section<'a>(
    configtx: &'a Value,
    profile: &str,
    section: &str,
) -> Result<&'a Value, GenError> {
    configtx
        .get("Profiles")
        .ok_or_else(|| GenError::lookup("configtx", "Profiles"))?
        .get(profile)
        .ok_or_else(|| GenError::lookup("configtx Profiles", profile))?
        .get(section)
        .ok_or_else(|| GenError::lookup(format!("configtx profile {}", profile), section))
}

/// `Name` of every organization listed under `Profiles.{profile}.{section}.Organizations`
fn profile_organization_names(
    configtx_yaml: &str,
    profile: &str,
    section: &str,
) -> Result<Vec<String>, GenError> {
    let configtx: Value =
        serde_yaml::from_str(configtx_yaml).map_err(|e| GenError::config_parse("configtx", e))?;

    let organizations = profile_section(&configtx, profile, section)?
        .get("Organizations")
        .and_then(Value::as_sequence)
        .ok_or_else(|| {
            GenError::lookup(format!("configtx profile {}.{}", profile, section), "Organizations")
        })?;

    organizations
        .iter()
        .enumerate()
        .map(|(i, org)| {
            org.get("Name")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    GenError::lookup(
                        format!("configtx profile {}.{} organization #{}", profile, section, i + 1),
                        "Name",
                    )
                })
        })
        .collect()
}

/// First orderer of the first ordering organization in a system channel profile
pub fn default_orderer(configtx_yaml: &str, profile: &str) -> Result<String, GenError> {
    let names = profile_organization_names(configtx_yaml, profile, "Orderer")?;
    let first = names.first().ok_or_else(|| {
        GenError::lookup(format!("configtx profile {}.Orderer.Organizations", profile), "[0]")
    })?;
    Ok(orderer_name(1, &first.to_lowercase()))
}

/// Upper-case names of the application organizations in a channel profile
pub fn organizations_in_channel(
    configtx_yaml: &str,
    profile: &str,
) -> Result<Vec<String>, GenError> {
    Ok(profile_organization_names(configtx_yaml, profile, "Application")?
        .into_iter()
        .map(|name| name.to_uppercase())
        .collect())
}

/// Shell-friendly form: every name followed by a space
pub fn format_organization_list(names: &[String]) -> String {
    names.iter().map(|name| format!("{} ", name)).collect()
}

#[derive(Debug, Deserialize)]
struct InstalledChaincodes {
    installed_chaincodes: Vec<InstalledChaincode>,
}

#[derive(Debug, Deserialize)]
struct InstalledChaincode {
    package_id: String,
}

/// Package ids from the JSON output of a chaincode `queryinstalled` call
pub fn chaincode_package_ids(json: &str) -> Result<Vec<String>, GenError> {
    let installed: InstalledChaincodes = serde_json::from_str(json)
        .map_err(|e| GenError::config_parse("installed chaincodes", e))?;
    Ok(installed
        .installed_chaincodes
        .into_iter()
        .map(|c| c.package_id)
        .collect())
}
