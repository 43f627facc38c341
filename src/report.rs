//! Formatting of resolved locations for stdout.
//!
//! Two presentations, never combined: a multi-line human-readable report and
//! machine-readable address JSON. Address lines with nothing to say are
//! omitted entirely rather than printed empty.

use serde::Serialize;

use crate::locate::{Address, LocationFix};

/// An address annotated with the scan file it was resolved from, for the
/// multi-file load mode's JSON output.
#[derive(Debug, Serialize)]
pub struct AnnotatedAddress {
    pub file: String,
    #[serde(flatten)]
    pub address: Address,
}

/// Renders the human-readable location report.
///
/// # Output Format
/// ```text
/// 66 Jelly St
/// Jelly Bay, New South Wales, 6666
/// Australia
/// Lat, Lon: -33.1, 151.1
/// Accuracy: 20.0m
/// Resolved from 14 access points
/// ```
///
/// The street, locality and country lines appear only when the service
/// resolved something for them; the summary line names `source` when the
/// scan was loaded from a file.
pub fn human_report(fix: &LocationFix, ap_count: usize, source: Option<&str>) -> String {
    let mut lines = Vec::new();

    let street = join_nonempty(
        &[
            fix.address.street_number.as_deref(),
            fix.address.street.as_deref(),
        ],
        " ",
    );
    if !street.is_empty() {
        lines.push(street);
    }

    let locality = join_nonempty(
        &[
            fix.address.city.as_deref(),
            fix.address.region.as_deref(),
            fix.address.postal_code.as_deref(),
        ],
        ", ",
    );
    if !locality.is_empty() {
        lines.push(locality);
    }

    if let Some(country) = fix.address.country.as_deref() {
        if !country.is_empty() {
            lines.push(country.to_string());
        }
    }

    lines.push(format!("Lat, Lon: {}, {}", fix.latitude, fix.longitude));
    lines.push(format!("Accuracy: {:.1}m", fix.accuracy));
    lines.push(match source {
        Some(file) => format!("Resolved from {} access points in {}", ap_count, file),
        None => format!("Resolved from {} access points", ap_count),
    });

    lines.join("\n")
}

/// Serializes one address as indented JSON.
pub fn address_json(address: &Address) -> serde_json::Result<String> {
    serde_json::to_string_pretty(address)
}

/// Serializes the load mode's accumulated per-file addresses as one array.
pub fn annotated_address_json(entries: &[AnnotatedAddress]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(entries)
}

/// Joins the non-empty entries with the separator.
fn join_nonempty(parts: &[Option<&str>], separator: &str) -> String {
    parts
        .iter()
        .filter_map(|p| *p)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}
