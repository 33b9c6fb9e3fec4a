// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! Plumbing shared by the services that talk to remote APIs over HTTP.

use log::trace;
use reqwest::{Client, ClientBuilder, Response, header};
use thiserror::Error;

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// An error that occurred while making an HTTP request or reading
    /// its response.
    #[error("Error while making HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    /// An unsuccessful HTTP status code in an HTTP response.
    #[error("Request returned HTTP {0}")]
    Http(reqwest::StatusCode),

    /// A missing Content-Type header in a response.
    #[error("Missing Content-Type header")]
    MissingContentType,

    /// An invalid Content-Type header.
    #[error("Invalid Content-Type header value: {0}")]
    InvalidContentType(#[from] header::ToStrError),

    /// A Content-Type that is not understood by the service.
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    /// A response body that could not be decoded into the expected type.
    #[error("Error decoding response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// An appropriate user agent to use when the caller has not configured one.
///
/// # Examples
///
/// ```
/// use redpen::http::default_user_agent;
/// assert!(default_user_agent().starts_with("redpen v"));
/// ```
pub fn default_user_agent() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Creates HTTP clients that all identify themselves with the same user agent.
#[derive(Clone, Debug)]
pub struct HTTPClientFactory {
    user_agent: String,
}

impl HTTPClientFactory {
    /// Creates a factory whose clients send `user_agent`.
    ///
    /// An empty user agent is replaced by the [`default_user_agent()`].
    pub fn new(user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        let user_agent = if user_agent.trim().is_empty() {
            default_user_agent()
        } else {
            user_agent
        };
        Self { user_agent }
    }

    /// The user agent sent by every client this factory creates.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Creates a new HTTP client.
    pub fn create(&self) -> Client {
        ClientBuilder::new()
            .user_agent(&self.user_agent)
            .build()
            // build() only fails if a TLS backend or the DNS resolver
            // cannot be initialized, neither of which we can recover from.
            .expect("could not create a new HTTP client")
    }
}

impl Default for HTTPClientFactory {
    fn default() -> Self {
        Self::new(default_user_agent())
    }
}

/// Returns the body of a successful JSON response.
///
/// Responses with an unsuccessful status, or whose content is not JSON,
/// are errors.
pub async fn json_body(resp: Response) -> HTTPResult<String> {
    let status = resp.status();
    if !status.is_success() {
        return Err(HTTPError::Http(status));
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .ok_or(HTTPError::MissingContentType)?
        .to_str()?;
    if !content_type.starts_with("application/json") {
        return Err(HTTPError::UnexpectedContentType(content_type.to_string()));
    }

    let body = resp.text().await?;
    trace!("response body: {body}");
    Ok(body)
}
