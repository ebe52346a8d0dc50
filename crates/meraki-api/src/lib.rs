// meraki-api: Async Rust client for the Cisco Meraki Dashboard API v1

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::DashboardClient;
pub use error::Error;
pub use transport::TransportConfig;
