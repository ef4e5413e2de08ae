//! Command-line interface parsing for the user list
//!
//! Every flag is optional; running without arguments uses the default
//! endpoint and the XDG cache directory.

use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

use crate::data::USERS_ENDPOINT;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The endpoint is not an absolute http(s) URL
    #[error("Invalid endpoint: '{0}'. Expected an absolute http:// or https:// URL")]
    InvalidEndpoint(String),
}

/// User list - browse and prune a cached list of users
#[derive(Parser, Debug)]
#[command(name = "userlist")]
#[command(about = "Browse a cached list of users and delete them locally")]
#[command(version)]
pub struct Cli {
    /// Endpoint returning the user list as JSON
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Directory holding the persistent user cache
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Discard any cached user list before starting
    #[arg(long)]
    pub clear_cache: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Endpoint the users are fetched from
    pub endpoint: String,
    /// Cache directory override; `None` uses the XDG cache directory
    pub cache_dir: Option<PathBuf>,
    /// Whether to drop the cached list before the first load
    pub clear_cache: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            endpoint: USERS_ENDPOINT.to_string(),
            cache_dir: None,
            clear_cache: false,
        }
    }
}

/// Parses an endpoint argument, accepting only absolute http(s) URLs
pub fn parse_endpoint_arg(s: &str) -> Result<String, CliError> {
    let url = Url::parse(s).map_err(|_| CliError::InvalidEndpoint(s.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url.into()),
        _ => Err(CliError::InvalidEndpoint(s.to_string())),
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the endpoint is not usable
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let endpoint = match &cli.endpoint {
            Some(raw) => parse_endpoint_arg(raw)?,
            None => USERS_ENDPOINT.to_string(),
        };

        Ok(StartupConfig {
            endpoint,
            cache_dir: cli.cache_dir.clone(),
            clear_cache: cli.clear_cache,
        })
    }
}
