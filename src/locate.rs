//! Remote geolocation lookup.
//!
//! Submits an observed access-point list to the geolocation web service and
//! parses the estimated position out of its JSON response. One synchronous
//! POST per lookup: no retries, no backoff, no authentication.
//!
//! # Wire Format
//!
//! Request body:
//!
//! ```json
//! {
//!   "version": "1.1.0",
//!   "host": "maps.google.com",
//!   "request_address": true,
//!   "wifi_towers": [ { "mac_address": "...", "ssid": "...", ... } ]
//! }
//! ```
//!
//! Response body: `{ "location": { "latitude", "longitude", "accuracy",
//! "address" }, "access_token" }`, served with an exact
//! `application/json; charset=UTF-8` content type. Address fields are
//! optional and tolerated when absent.

use serde::{Deserialize, Serialize};

use crate::error::WifiLocateError;
use crate::scan::AccessPoint;

/// Default lookup endpoint. A config file may substitute a compatible one.
pub const ENDPOINT: &str = "https://www.google.com/loc/json";

/// Protocol version tag sent with every request.
const PROTOCOL_VERSION: &str = "1.1.0";

/// Fixed host identifier the service expects in the request body.
const REQUEST_HOST: &str = "maps.google.com";

/// The service replies with exactly this content type; anything else means
/// we are not talking to the endpoint we think we are.
const EXPECTED_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

#[derive(Serialize)]
struct LookupRequest<'a> {
    version: &'static str,
    host: &'static str,
    request_address: bool,
    wifi_towers: &'a [AccessPoint],
}

/// Street-level address attached to a lookup response.
///
/// Every field is optional; the service omits whatever it cannot resolve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub street_number: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

#[derive(Deserialize)]
struct WireLocation {
    latitude: f64,
    longitude: f64,
    accuracy: f64,
    #[serde(default)]
    address: Address,
}

#[derive(Deserialize)]
struct LookupResponse {
    location: WireLocation,
    #[serde(default)]
    access_token: Option<String>,
}

/// An estimated position as returned by the geolocation service.
#[derive(Debug, Clone)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Estimated accuracy radius in meters.
    pub accuracy: f64,
    pub address: Address,
    pub access_token: Option<String>,
}

/// Resolves the access-point list against the default endpoint.
pub fn resolve(access_points: &[AccessPoint]) -> Result<LocationFix, WifiLocateError> {
    resolve_at(ENDPOINT, access_points)
}

/// Resolves the access-point list against the given endpoint.
///
/// # Returns
/// - `Ok(LocationFix)` on a well-formed 2xx response
/// - `Err(WifiLocateError::LookupRequest)` if the endpoint is unreachable
/// - `Err(WifiLocateError::LookupStatus)` on a non-success HTTP status
/// - `Err(WifiLocateError::LookupContentType)` if the response is not
///   `application/json; charset=UTF-8` exactly
/// - `Err(WifiLocateError::LookupParse)` if the body is not the expected shape
pub fn resolve_at(
    endpoint: &str,
    access_points: &[AccessPoint],
) -> Result<LocationFix, WifiLocateError> {
    let request = LookupRequest {
        version: PROTOCOL_VERSION,
        host: REQUEST_HOST,
        request_address: true,
        wifi_towers: access_points,
    };
    let body = serde_json::to_string(&request)
        .map_err(|e| WifiLocateError::LookupRequest(e.to_string()))?;

    let response = ureq::post(endpoint)
        .set("Content-Type", "application/json")
        .send_string(&body)
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => WifiLocateError::LookupStatus(code),
            other => WifiLocateError::LookupRequest(other.to_string()),
        })?;

    let content_type = response.header("Content-Type").unwrap_or("").to_string();
    if content_type != EXPECTED_CONTENT_TYPE {
        return Err(WifiLocateError::LookupContentType(content_type));
    }

    let text = response
        .into_string()
        .map_err(|e| WifiLocateError::LookupRequest(e.to_string()))?;
    let parsed: LookupResponse =
        serde_json::from_str(&text).map_err(|e| WifiLocateError::LookupParse(e.to_string()))?;

    Ok(LocationFix {
        latitude: parsed.location.latitude,
        longitude: parsed.location.longitude,
        accuracy: parsed.location.accuracy,
        address: parsed.location.address,
        access_token: parsed.access_token,
    })
}
