pub mod client;
pub mod config;
pub mod telemetry;

pub use client::HttpAlertingService;
pub use config::ClientConfig;
