// HTTP client utilities
use crate::domain::error::HqError;
use reqwest::Client;

/// Create the pooled HTTP client used for all backend calls
pub fn create_client(timeout_secs: u64) -> Result<Client, HqError> {
    Ok(Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent("hq/0.1.0")
        .build()?)
}
