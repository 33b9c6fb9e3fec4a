// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! Authentication for AI services.

use log::warn;
use std::{env, fmt};
use thiserror::Error;

/// Manages authentication keys for AI service APIs.
#[derive(Clone)]
pub struct Auth {
    api_key: String,
}

impl Auth {
    /// Creates a new `Auth` structure using the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self { api_key }
    }

    /// Retrieves an API key from the environment.
    ///
    /// Returns an error if the API key cannot be retrieved from the
    /// environment.
    pub fn from_env(envvar: impl AsRef<str>) -> AuthResult {
        let api_key = env::var(envvar.as_ref())?;
        Ok(Self { api_key })
    }

    /// Retrieves an API key from the environment, falling back to an empty
    /// key if it cannot be retrieved.
    ///
    /// An empty key is rejected by the AI service itself, so a missing key
    /// surfaces as an authentication failure on the first request rather
    /// than at startup.
    ///
    /// # Examples
    ///
    /// ```
    /// use redpen::ai::Auth;
    /// # use temp_env::with_var_unset;
    /// # with_var_unset("GROQ_API_KEY", || {
    /// let auth = Auth::from_env_or_empty("GROQ_API_KEY");
    /// assert_eq!(auth.api_key(), "");
    /// # });
    /// ```
    pub fn from_env_or_empty(envvar: impl AsRef<str>) -> Self {
        let envvar = envvar.as_ref();
        Self::from_env(envvar).unwrap_or_else(|err| {
            warn!("${envvar} is unusable, continuing without an API key: {err}");
            Self::new("")
        })
    }

    /// The actual API key.
    ///
    /// # Examples
    ///
    /// ```
    /// use redpen::ai::Auth;
    /// let auth = Auth::new("ThisIsMyApiKey");
    /// assert_eq!(auth.api_key(), "ThisIsMyApiKey");
    /// ```
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth").field("api_key", &"<redacted>").finish()
    }
}

/// Standard result type for [`Auth`] creation.
pub type AuthResult = Result<Auth, AuthError>;

/// Indicates an error when creating an authentication key.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An error occurred while retrieving a key from the environment.
    #[error("Environment error: {0}")]
    EnvError(#[from] env::VarError),
}
