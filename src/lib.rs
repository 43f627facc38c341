//! Estimate the host's physical location from nearby WiFi access points.
//!
//! The pipeline is three mechanical steps: drive the platform scan utility,
//! POST the observed access points to a remote geolocation service, and
//! present the parsed answer. Scans can also be saved to disk and resolved
//! again later, offline from the radio.
//!
//! # Modules
//!
//! - [`config`] - Optional settings file under the user config directory
//! - [`error`] - Error types for the scan, lookup and file operations
//! - [`locate`] - Remote geolocation lookup client
//! - [`report`] - Human-readable and JSON presentation of a resolved location
//! - [`scan`] - Access-point scanning via the platform utility
//! - [`store`] - Saving and loading scan files
//!
//! # Example Usage
//!
//! ```no_run
//! use wifi_locate::{locate, scan};
//!
//! let access_points = scan::scan_access_points(None).expect("scan failed");
//! let fix = locate::resolve(&access_points).expect("lookup failed");
//! println!("{}, {}", fix.latitude, fix.longitude);
//! ```

pub mod config;
pub mod error;
pub mod locate;
pub mod report;
pub mod scan;
pub mod store;

// Re-export the main error type for library users
pub use error::WifiLocateError;

// Re-export the core pipeline types and operations
pub use locate::{resolve, resolve_at, Address, LocationFix};
pub use report::{human_report, AnnotatedAddress};
pub use scan::{scan_access_points, AccessPoint};
pub use store::{load, save};
