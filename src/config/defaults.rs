//! Default values for configuration

/// Default RAG EM API endpoint (a local REDCap install)
pub fn default_api_url() -> String {
    "http://localhost/api/".to_string()
}

/// Default environment variable holding the REDCap API token
pub fn default_api_token_env() -> String {
    "REDCAP_API_TOKEN".to_string()
}

/// Default request timeout in seconds
pub fn default_timeout_secs() -> u64 {
    120
}

/// Default bundle file read when no input is given
pub fn default_input_file() -> &'static str {
    "example_rpp.json"
}
