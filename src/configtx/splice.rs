//! Insertion of rendered fragments into the outer `configtx.yaml` template.
//!
//! The outer template's schema belongs to the blockchain platform, so it is
//! treated as text with two named insertion points.

use crate::error::GenError;

pub const ORGANIZATIONS_MARKER: &str = "Organizations:";
pub const CONSENTERS_MARKER: &str = "Consenters:";

/// Organization name used by the template for its example organization
pub const PLACEHOLDER_ORG: &str = "SampleOrg";

/// Byte offset just past the first occurrence of `marker`
fn insertion_point(template: &str, template_name: &str, marker: &str) -> Result<usize, GenError> {
    template
        .find(marker)
        .map(|pos| pos + marker.len())
        .ok_or_else(|| GenError::marker(marker, template_name))
}

/// Insert the organizations and consenter sections after their markers, then
/// replace every `SampleOrg` with `first_org`.
///
/// Both insertion points are located in the untouched template.
pub fn splice_into_template(
    template: &str,
    template_name: &str,
    organizations_section: &str,
    consenters_section: &str,
    first_org: &str,
) -> Result<String, GenError> {
    let orgs_at = insertion_point(template, template_name, ORGANIZATIONS_MARKER)?;
    let consenters_at = insertion_point(template, template_name, CONSENTERS_MARKER)?;

    let mut inserts = [
        (orgs_at, organizations_section),
        (consenters_at, consenters_section),
    ];
    inserts.sort_by_key(|(at, _)| *at);

    let mut out = String::with_capacity(
        template.len() + organizations_section.len() + consenters_section.len(),
    );
    let mut cursor = 0;
    for (at, text) in inserts {
        out.push_str(&template[cursor..at]);
        out.push_str(text);
        cursor = at;
    }
    out.push_str(&template[cursor..]);

    Ok(out.replace(PLACEHOLDER_ORG, first_org))
}
