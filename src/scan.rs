//! Access-point scanning module.
//!
//! Enumerates the wireless access points currently in range by driving
//! NetworkManager's nmcli tool and parsing its terse output into
//! [`AccessPoint`] records.
//!
//! # Scanning Process
//!
//! 1. Triggers a rescan with `nmcli device wifi rescan`
//! 2. Waits briefly for the scan to complete (500ms)
//! 3. Retrieves the results with `nmcli -t -f BSSID,SSID,CHAN,SIGNAL device wifi list`
//! 4. Parses each colon-separated record, honoring nmcli's backslash escaping
//!
//! Fields the utility does not report (or reports as `--`) come back as
//! `None`; they are never defaulted to zero.

use serde::{Deserialize, Serialize};
use std::process::Command;

use crate::error::WifiLocateError;

/// nmcli fields requested from the scan, in record order.
const SCAN_FIELDS: &str = "BSSID,SSID,CHAN,SIGNAL";

/// How long to let a triggered rescan settle before reading results.
const RESCAN_SETTLE_MS: u64 = 500;

/// A single observed access point.
///
/// Produced fresh on every scan and immutable afterwards. Every field is
/// optional: whatever the scan utility did not report is `None`, and `None`
/// serializes as JSON `null` so saved scans keep the full field set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPoint {
    /// Hardware (BSSID) address of the access point.
    pub mac_address: Option<String>,

    /// Network name. `None` for hidden networks.
    pub ssid: Option<String>,

    /// Wireless channel the access point is transmitting on.
    pub channel: Option<u32>,

    /// Signal-to-noise ratio in dB, when the platform utility reports one.
    /// nmcli does not, so scans taken with this backend store `null`.
    pub signal_to_noise: Option<i32>,

    /// Signal level as reported by the utility (percent for nmcli).
    pub signal_strength: Option<i32>,
}

/// Scans for access points visible to the given interface.
///
/// Triggers a fresh scan, waits for completion, then retrieves and parses the
/// utility's terse output. Record order is preserved as reported.
///
/// # Arguments
/// * `interface` - Interface to scan with (e.g. "wlan0"); `None` lets nmcli
///   pick the default wireless device
///
/// # Returns
/// - `Ok(Vec<AccessPoint>)` with at least one record
/// - `Err(WifiLocateError::ScanFailed)` if nmcli is missing or exits nonzero
/// - `Err(WifiLocateError::ScanParse)` if output is present but unusable
/// - `Err(WifiLocateError::NoAccessPoints)` if the scan came back empty
///
/// # Commands Executed
/// ```bash
/// nmcli device wifi rescan [ifname <interface>]
/// nmcli -t -f BSSID,SSID,CHAN,SIGNAL device wifi list [ifname <interface>]
/// ```
///
/// # Note
/// The rescan request may be refused while another scan is in flight; its
/// result is ignored and the list command then returns the cached results of
/// the last completed scan.
pub fn scan_access_points(interface: Option<&str>) -> Result<Vec<AccessPoint>, WifiLocateError> {
    // Step 1: trigger a rescan; refusal here is not fatal
    let mut rescan_args = vec!["device", "wifi", "rescan"];
    if let Some(iface) = interface {
        rescan_args.extend(["ifname", iface]);
    }
    let _ = Command::new("nmcli").args(&rescan_args).output();

    // Step 2: give the adapter a moment to finish scanning
    std::thread::sleep(std::time::Duration::from_millis(RESCAN_SETTLE_MS));

    // Step 3: read back the scan results in terse format
    let mut list_args = vec!["-t", "-f", SCAN_FIELDS, "device", "wifi", "list"];
    if let Some(iface) = interface {
        list_args.extend(["ifname", iface]);
    }
    let output = Command::new("nmcli")
        .args(&list_args)
        .output()
        .map_err(|e| WifiLocateError::ScanFailed(format!("could not execute nmcli: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(WifiLocateError::ScanFailed(stderr.trim().to_string()));
    }

    // Step 4: parse the records
    parse_scan_output(&String::from_utf8_lossy(&output.stdout))
}

/// Parses terse `nmcli device wifi list` output into access-point records.
///
/// Each line is one record, fields in `BSSID,SSID,CHAN,SIGNAL` order. Lines that do
/// not carry the full field set are skipped; if every line is skipped the
/// output is considered unparseable. Empty output means the radio saw
/// nothing, which callers treat as an early exit rather than a fault.
pub fn parse_scan_output(output: &str) -> Result<Vec<AccessPoint>, WifiLocateError> {
    let lines: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return Err(WifiLocateError::NoAccessPoints);
    }

    let mut access_points = Vec::new();
    for line in &lines {
        if let Some(ap) = parse_record(line) {
            access_points.push(ap);
        }
    }

    if access_points.is_empty() {
        return Err(WifiLocateError::ScanParse(format!(
            "no access-point records in {} line(s) of output",
            lines.len()
        )));
    }

    Ok(access_points)
}

/// Parses one terse-output line, or `None` if it lacks the full field set.
fn parse_record(line: &str) -> Option<AccessPoint> {
    let fields = split_terse_line(line);
    if fields.len() < 4 {
        return None;
    }

    Some(AccessPoint {
        mac_address: field_value(&fields[0]),
        ssid: field_value(&fields[1]),
        channel: field_value(&fields[2]).and_then(|v| v.parse().ok()),
        // nmcli reports no noise figure
        signal_to_noise: None,
        signal_strength: field_value(&fields[3]).and_then(|v| v.parse().ok()),
    })
}

/// Splits one line of `nmcli -t` output on unescaped colons.
///
/// Terse mode backslash-escapes separator characters inside values, so a
/// BSSID arrives as `AA\:BB\:CC\:DD\:EE\:FF`. A plain `split(':')` would
/// shred it; this walks the line and honors the escapes.
fn split_terse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ':' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

/// Normalizes a terse field: empty and `--` both mean "not reported".
fn field_value(field: &str) -> Option<String> {
    if field.is_empty() || field == "--" {
        None
    } else {
        Some(field.to_string())
    }
}
