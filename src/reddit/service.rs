// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Reddit API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Reddit API over HTTPS, essentially a specialized HTTPS client
//! specifically for Reddit. They return raw response bodies; parsing is
//! left to [`RedditClient`](crate::reddit::RedditClient).

use crate::conf::Credentials;
use crate::http::{self, HTTPClientFactory, HTTPResult};
use log::debug;
use reqwest::Client;

/// Endpoint that exchanges a script app's credentials for an access token.
pub const ACCESS_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Base URL for authenticated API requests.
pub const OAUTH_BASE_URL: &str = "https://oauth.reddit.com";

/// A service for reading from and writing to Reddit.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Reddit API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Service {
    /// Requests an OAuth2 access token for the account named in
    /// `credentials` and returns the raw response.
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = HTTPResult<String>> + Send;

    /// Performs an authenticated GET request for `resource`, a path and
    /// query string such as `/r/rust/hot?limit=10`.
    fn get_resource(
        &self,
        token: &str,
        resource: &str,
    ) -> impl Future<Output = HTTPResult<String>> + Send;

    /// Performs an authenticated POST request to `resource` with `form`
    /// as a URL-encoded body.
    fn post_form(
        &self,
        token: &str,
        resource: &str,
        form: &[(&str, &str)],
    ) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A service that contacts the Reddit API directly.
#[derive(Debug)]
pub struct RedditService {
    client: Client,
}

impl RedditService {
    /// Creates a new Reddit service that identifies itself as `user_agent`.
    ///
    /// Reddit asks for a unique, descriptive user agent, such as
    /// `script:redpen:v0.1.0 (by /u/your_username)`.
    pub fn new(user_agent: &str) -> Self {
        let client = HTTPClientFactory::new(user_agent).create();
        Self { client }
    }

    fn uri(&self, resource: &str) -> String {
        format!("{OAUTH_BASE_URL}{resource}")
    }
}

impl Default for RedditService {
    fn default() -> Self {
        Self::new("")
    }
}

impl Service for RedditService {
    async fn authenticate(&self, credentials: &Credentials) -> HTTPResult<String> {
        debug!("requesting access token for {}", credentials.username());
        let form = [
            ("grant_type", "password"),
            ("username", credentials.username()),
            ("password", credentials.password()),
        ];
        let resp = self
            .client
            .post(ACCESS_TOKEN_URL)
            .basic_auth(credentials.client_id(), Some(credentials.client_secret()))
            .form(&form)
            .send()
            .await?;
        http::json_body(resp).await
    }

    async fn get_resource(&self, token: &str, resource: &str) -> HTTPResult<String> {
        let uri = self.uri(resource);
        debug!("GET {uri}");
        let resp = self.client.get(&uri).bearer_auth(token).send().await?;
        http::json_body(resp).await
    }

    async fn post_form(
        &self,
        token: &str,
        resource: &str,
        form: &[(&str, &str)],
    ) -> HTTPResult<String> {
        let uri = self.uri(resource);
        debug!("POST {uri}");
        let resp = self
            .client
            .post(&uri)
            .bearer_auth(token)
            .form(form)
            .send()
            .await?;
        http::json_body(resp).await
    }
}

impl<S: Service + ?Sized + Sync> Service for &S {
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = HTTPResult<String>> + Send {
        (**self).authenticate(credentials)
    }

    fn get_resource(
        &self,
        token: &str,
        resource: &str,
    ) -> impl Future<Output = HTTPResult<String>> + Send {
        (**self).get_resource(token, resource)
    }

    fn post_form(
        &self,
        token: &str,
        resource: &str,
        form: &[(&str, &str)],
    ) -> impl Future<Output = HTTPResult<String>> + Send {
        (**self).post_form(token, resource, form)
    }
}
