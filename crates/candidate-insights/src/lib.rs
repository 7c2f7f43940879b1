pub mod config;
pub mod dashboard;
pub mod error;
pub mod feed;
pub mod telemetry;
