pub mod client;
pub mod http;

// Re-export for convenience
pub use client::ApiClient;
pub use http::create_client;
