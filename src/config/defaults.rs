//! Default configuration values

/// Default HopCache service URL
pub fn default_host() -> String {
    "http://localhost:3000".to_string()
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default connect timeout in seconds
pub fn default_connect_timeout() -> u64 {
    10
}
