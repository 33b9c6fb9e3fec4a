// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with AI APIs using HTTP.

use crate::ai::Auth;
use crate::http::{self, HTTPClientFactory, HTTPResult};
use reqwest::{Client, IntoUrl};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A general service for making HTTP calls to an API.
///
/// While this may appear to be more like a "client", think of it as a
/// proxy for a (possibly remote) API service.
pub trait APIService {
    /// Send a POST request to the `uri` with the JSON object `data` as
    /// the POST request body.
    ///
    /// The response is deserialized from a string to the JSON object
    /// specified in the `R` type parameter.
    fn post<U, D, R>(
        &self,
        uri: U,
        auth: &Auth,
        data: &D,
    ) -> impl Future<Output = HTTPResult<R>> + Send
    where
        U: IntoUrl + Send,
        D: Serialize + Sync,
        R: DeserializeOwned;
}

/// A concrete implementation of an HTTP API service.
///
/// It more or less just wraps a Reqwest client, making it easier to swap
/// out the service for a deterministic service when writing tests.
#[derive(Debug)]
pub struct HTTPService {
    client: Client,
}

impl HTTPService {
    /// Creates a new HTTP service using clients from the given factory.
    pub fn new(factory: &HTTPClientFactory) -> Self {
        let client = factory.create();
        Self { client }
    }
}

impl Default for HTTPService {
    fn default() -> Self {
        Self::new(&HTTPClientFactory::default())
    }
}

impl APIService for HTTPService {
    // Covered by the groq_client_https integration test.
    async fn post<U, D, R>(&self, uri: U, auth: &Auth, data: &D) -> HTTPResult<R>
    where
        U: IntoUrl + Send,
        D: Serialize + Sync,
        R: DeserializeOwned,
    {
        let resp = self
            .client
            .post(uri)
            .bearer_auth(auth.api_key())
            .json(data)
            .send()
            .await?;
        let body = http::json_body(resp).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl<S: APIService + ?Sized> APIService for &S {
    fn post<U, D, R>(
        &self,
        uri: U,
        auth: &Auth,
        data: &D,
    ) -> impl Future<Output = HTTPResult<R>> + Send
    where
        U: IntoUrl + Send,
        D: Serialize + Sync,
        R: DeserializeOwned,
    {
        (**self).post(uri, auth, data)
    }
}
