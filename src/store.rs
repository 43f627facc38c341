//! Saving and loading scan results.
//!
//! A saved scan is a JSON file whose root is the array of [`AccessPoint`]
//! records, in scan order. Filenames default to the current local time at
//! one-second resolution, and saving refuses to touch a file that already
//! exists.

use chrono::Local;
use std::fs;
use std::path::Path;

use crate::error::WifiLocateError;
use crate::scan::AccessPoint;

/// Filename pattern used when the caller does not supply one.
const FILENAME_FORMAT: &str = "%Y-%m-%d_%H_%M_%S";

/// Extension for saved scan files.
const FILENAME_SUFFIX: &str = ".location";

/// Writes the access-point list to disk and returns the filename used.
///
/// An absent or empty `filename` selects [`default_filename`]. Fails with
/// `FileExists` if the target is already present; the existing file is left
/// untouched.
pub fn save(
    access_points: &[AccessPoint],
    filename: Option<&str>,
) -> Result<String, WifiLocateError> {
    let filename = match filename {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => default_filename(),
    };

    if Path::new(&filename).exists() {
        return Err(WifiLocateError::FileExists(filename));
    }

    let body = serde_json::to_string_pretty(access_points)
        .map_err(|e| WifiLocateError::FileWrite(filename.clone(), std::io::Error::other(e)))?;
    fs::write(&filename, body).map_err(|e| WifiLocateError::FileWrite(filename.clone(), e))?;

    Ok(filename)
}

/// Reads a saved scan back into access-point records, preserving order.
pub fn load(filename: &str) -> Result<Vec<AccessPoint>, WifiLocateError> {
    let content = fs::read_to_string(filename)
        .map_err(|e| WifiLocateError::FileRead(filename.to_string(), e))?;

    serde_json::from_str(&content)
        .map_err(|e| WifiLocateError::FileParse(filename.to_string(), e))
}

/// Timestamp-based filename, e.g. `2026-08-07_14_03_59.location`.
pub fn default_filename() -> String {
    format!("{}{}", Local::now().format(FILENAME_FORMAT), FILENAME_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    fn sample_access_points() -> Vec<AccessPoint> {
        vec![
            AccessPoint {
                mac_address: Some("AA:BB:CC:DD:EE:FF".to_string()),
                ssid: Some("HomeNet".to_string()),
                channel: Some(6),
                signal_to_noise: Some(31),
                signal_strength: Some(-58),
            },
            AccessPoint {
                mac_address: Some("11:22:33:44:55:66".to_string()),
                ssid: None,
                channel: None,
                signal_to_noise: None,
                signal_strength: Some(-74),
            },
        ]
    }

    #[test]
    fn save_then_load_round_trips_fields_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.location");
        let aps = sample_access_points();

        let used = save(&aps, Some(path.to_str().unwrap())).unwrap();
        assert_eq!(used, path.to_str().unwrap());

        let loaded = load(&used).unwrap();
        assert_eq!(loaded, aps);
    }

    #[test]
    fn save_refuses_to_overwrite_and_keeps_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.location");
        let path = path.to_str().unwrap();

        save(&sample_access_points(), Some(path)).unwrap();
        let before = fs::read_to_string(path).unwrap();

        let second = save(&[], Some(path));
        assert!(matches!(second, Err(WifiLocateError::FileExists(_))));
        assert_eq!(fs::read_to_string(path).unwrap(), before);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.location");

        let result = load(path.to_str().unwrap());
        assert!(matches!(result, Err(WifiLocateError::FileRead(_, _))));
    }

    #[test]
    fn load_malformed_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.location");
        fs::write(&path, "{ not json").unwrap();

        let result = load(path.to_str().unwrap());
        assert!(matches!(result, Err(WifiLocateError::FileParse(_, _))));
    }

    #[test]
    fn load_rejects_non_array_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("object.location");
        fs::write(&path, "{\"mac_address\": null}").unwrap();

        let result = load(path.to_str().unwrap());
        assert!(matches!(result, Err(WifiLocateError::FileParse(_, _))));
    }

    #[test]
    fn default_filename_is_a_second_resolution_timestamp() {
        let name = default_filename();
        let stem = name.strip_suffix(FILENAME_SUFFIX).unwrap();
        assert!(NaiveDateTime::parse_from_str(stem, FILENAME_FORMAT).is_ok());
    }
}
