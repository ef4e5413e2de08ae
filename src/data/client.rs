//! Users API client
//!
//! Fetches the user list from a fixed JSON endpoint. The response body is
//! trusted to be an array of user records; only the presence of the id and
//! display fields is checked.

use std::future::Future;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::User;

/// Endpoint serving the user list
pub const USERS_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// Errors that can occur while loading the user list
///
/// `Status` and `Network` are fetch failures, `Parse` is a malformed body.
/// None of them is retried automatically.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The endpoint answered with a non-success status
    #[error("Failed to fetch users")]
    Status(u16),

    /// The request did not produce a response
    #[error("Network error: {0}")]
    Network(String),

    /// The response body is not a list of users
    #[error("Failed to parse users: {0}")]
    Parse(#[from] serde_json::Error),
}

impl LoadError {
    /// True for failures to obtain a response body at all
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, LoadError::Status(_) | LoadError::Network(_))
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        LoadError::Network(err.to_string())
    }
}

/// Anything able to produce the current user list
///
/// The controller is generic over this so tests can script responses.
///
/// The returned future carries no `Send` bound, so single-threaded sources
/// (such as test doubles holding `Rc` state) can implement it. It therefore
/// cannot be handed to `tokio::spawn` through this trait; callers that spawn
/// loads use a concrete type whose future is `Send`, like
/// [`UsersClient::fetch_users`].
pub trait UserSource {
    /// Loads the full user list
    fn fetch_users(&self) -> impl Future<Output = Result<Vec<User>, LoadError>>;
}

/// Client for the users endpoint
#[derive(Debug, Clone)]
pub struct UsersClient {
    client: Client,
    endpoint: String,
}

impl Default for UsersClient {
    fn default() -> Self {
        Self::new()
    }
}

impl UsersClient {
    /// Create a client for the default endpoint
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            endpoint: USERS_ENDPOINT.to_string(),
        }
    }

    /// Create a client with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            endpoint: USERS_ENDPOINT.to_string(),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The endpoint this client reads from
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the user list
    ///
    /// # Returns
    /// * `Ok(Vec<User>)` - Users in the order the API returned them
    /// * `Err(LoadError)` - Network failure, non-success status or bad body
    pub async fn fetch_users(&self) -> Result<Vec<User>, LoadError> {
        debug!(endpoint = %self.endpoint, "Fetching users");

        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_users(&text)
    }
}

impl UserSource for UsersClient {
    async fn fetch_users(&self) -> Result<Vec<User>, LoadError> {
        UsersClient::fetch_users(self).await
    }
}

/// Parse a response body into users
pub fn parse_users(body: &str) -> Result<Vec<User>, LoadError> {
    Ok(serde_json::from_str(body)?)
}
