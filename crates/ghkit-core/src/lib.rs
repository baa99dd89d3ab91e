//! Error handling and configuration shared by the ghkit crates.

pub mod config;
pub mod error;

pub use config::{Config, GitHubConfig};
pub use error::{Error, Result};
