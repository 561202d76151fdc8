//! Application configuration management

use std::env;

use anyhow::{Context, Result};
use url::Url;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the coordinator backend
    pub coordinator_url: Url,

    /// Page size for the content view projection
    pub page_size: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let coordinator_url =
            env::var("COORDINATOR_URL").unwrap_or_else(|_| "http://localhost:5001".to_string());
        let coordinator_url = Url::parse(&coordinator_url)
            .with_context(|| format!("Invalid COORDINATOR_URL: {coordinator_url}"))?;

        Ok(Self {
            coordinator_url,

            page_size: env::var("CONTENT_PAGE_SIZE")
                .unwrap_or_else(|_| "25".to_string())
                .parse()
                .unwrap_or(25),
        })
    }
}
