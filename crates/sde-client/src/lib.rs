//! HTTP client for the SD Elements v2 REST API.

pub mod client;
pub mod config;

pub use client::SdeClient;
pub use config::ClientConfig;
