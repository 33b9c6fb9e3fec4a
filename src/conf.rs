// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! Environment and configuration utilities.

use log::{debug, trace, warn};
use std::{env, fmt};

/// Name of the environment variable holding the Reddit app's client ID.
pub const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";
/// Name of the environment variable holding the Reddit app's client secret.
pub const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";
/// Name of the environment variable holding the bot account's username.
pub const USERNAME_VAR: &str = "REDDIT_USERNAME";
/// Name of the environment variable holding the bot account's password.
pub const PASSWORD_VAR: &str = "REDDIT_PASSWORD";
/// Name of the environment variable holding the user agent sent to Reddit.
pub const USER_AGENT_VAR: &str = "REDDIT_USER_AGENT";
/// Name of the environment variable holding the Groq API key.
pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";

/// Loads variables from a `.env` file in the current directory, if there
/// is one.
///
/// Variables already set in the environment take precedence over the
/// file. A missing file is not an error.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("loaded environment from {}", path.display()),
        Err(err) if err.not_found() => trace!("no .env file found"),
        Err(err) => warn!("could not load .env file: {err}"),
    }
}

/// Credentials for a Reddit "script" app acting on behalf of a single
/// account.
///
/// Create a script app at <https://www.reddit.com/prefs/apps> to obtain a
/// client ID and secret.
#[derive(Clone, Default)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
    user_agent: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Reads credentials from `$REDDIT_CLIENT_ID`, `$REDDIT_CLIENT_SECRET`,
    /// `$REDDIT_USERNAME`, `$REDDIT_PASSWORD`, and `$REDDIT_USER_AGENT`.
    ///
    /// Missing variables are read as empty strings. Reddit rejects empty
    /// credentials when the bot first logs in, so a missing variable
    /// surfaces as an authentication error instead of stopping the program
    /// here.
    ///
    /// # Examples
    ///
    /// ```
    /// use redpen::conf::Credentials;
    /// # use temp_env::with_vars;
    /// # with_vars([("REDDIT_USERNAME", Some("redpen_bot")), ("REDDIT_PASSWORD", None)], || {
    /// let credentials = Credentials::from_env();
    /// assert_eq!(credentials.username(), "redpen_bot");
    /// assert_eq!(credentials.password(), "");
    /// # });
    /// ```
    pub fn from_env() -> Self {
        Self::new(
            var_or_empty(CLIENT_ID_VAR),
            var_or_empty(CLIENT_SECRET_VAR),
            var_or_empty(USERNAME_VAR),
            var_or_empty(PASSWORD_VAR),
            var_or_empty(USER_AGENT_VAR),
        )
    }

    /// The app's client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The app's client secret.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// The username of the account the bot acts as.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password of the account the bot acts as.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// The user agent sent with every request to Reddit.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn var_or_empty(name: &str) -> String {
    env::var(name).unwrap_or_else(|err| {
        warn!("${name} is unusable: {err}");
        String::new()
    })
}
