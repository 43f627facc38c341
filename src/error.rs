use thiserror::Error;

#[derive(Error, Debug)]
pub enum WifiLocateError {
    #[error("Failed to run the wireless scan: {0}")]
    ScanFailed(String),

    #[error("Failed to parse scan output: {0}")]
    ScanParse(String),

    #[error("No access points found")]
    NoAccessPoints,

    #[error("Geolocation request failed: {0}")]
    LookupRequest(String),

    #[error("Geolocation service returned HTTP status {0}")]
    LookupStatus(u16),

    #[error("Geolocation service returned unexpected content type '{0}'")]
    LookupContentType(String),

    #[error("Failed to parse geolocation response: {0}")]
    LookupParse(String),

    #[error("Refusing to overwrite existing file '{0}'")]
    FileExists(String),

    #[error("Failed to read scan file '{0}': {1}")]
    FileRead(String, std::io::Error),

    #[error("Failed to write scan file '{0}': {1}")]
    FileWrite(String, std::io::Error),

    #[error("Failed to parse scan file '{0}': {1}")]
    FileParse(String, serde_json::Error),
}
