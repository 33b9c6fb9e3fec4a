// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! A "thing" in the Reddit sense.
//!
//! Historically in the Reddit API and its old source code, a "Thing" was
//! any element of the Reddit system: users, posts, comments, etc. This
//! module parses the handful of Reddit API responses that redpen reads.

use crate::text::convert_html_entities;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Content handed to the LLM when a post has no text of its own.
pub const EMPTY_CONTENT_PLACEHOLDER: &str =
    "No content provided. This seems to be a link or a short post.";

/// Error type tag Reddit uses for rate-limited write operations.
pub const RATELIMIT: &str = "RATELIMIT";

/// An error parsing a Reddit API response.
pub type Error = serde_json::Error;

/// A Reddit post (a "link" in the API's parlance).
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Post {
    name: String,
    title: String,
    #[serde(default)]
    selftext: String,
}

impl Post {
    /// Parses a listing of posts, such as the response to
    /// `/r/<subreddit>/hot`.
    ///
    /// Posts are returned in the order in which they appear in the listing,
    /// along with the fullname of the listing's next page, if there is one.
    pub fn parse_listing(data: &str) -> Result<(Vec<Post>, Option<String>), Error> {
        let listing: Listing = serde_json::from_str(data)?;
        let after = listing.data.after;
        let posts = listing
            .data
            .children
            .into_iter()
            .filter(|child| child.kind == "t3")
            .map(|child| child.data.decoded())
            .collect();
        Ok((posts, after))
    }

    fn decoded(self) -> Self {
        Self {
            title: convert_html_entities(&self.title),
            selftext: convert_html_entities(&self.selftext),
            ..self
        }
    }

    /// The post's fullname, e.g., `t3_1abcde`.
    ///
    /// The fullname identifies the post when replying to it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The post's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The post's self text, exactly as written. Empty for link posts.
    pub fn selftext(&self) -> &str {
        &self.selftext
    }

    /// Text content of the post, suitable for handing to an LLM.
    ///
    /// This is the post's self text with surrounding whitespace removed,
    /// or [`EMPTY_CONTENT_PLACEHOLDER`] if nothing is left; it is never
    /// empty.
    pub fn content(&self) -> &str {
        let content = self.selftext.trim();
        if content.is_empty() {
            EMPTY_CONTENT_PLACEHOLDER
        } else {
            content
        }
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    after: Option<String>,
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    kind: String,
    data: Post,
}

/// How long Reddit says an access token lasts when a token response does
/// not say.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// An OAuth2 access token response.
///
/// Reddit reports bad account credentials with a successful HTTP status
/// and an `error` field instead of a token.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
}

impl TokenResponse {
    /// Parses the response to `/api/v1/access_token`.
    pub fn parse(data: &str) -> Result<Self, Error> {
        serde_json::from_str(data)
    }

    /// The access token, or the error Reddit reported instead of one.
    pub fn into_token(self) -> Result<AccessToken, String> {
        let expires_in = self
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);
        match (self.access_token, self.error) {
            (Some(token), _) if !token.is_empty() => Ok(AccessToken { token, expires_in }),
            (_, Some(error)) => Err(error),
            _ => Err(String::from("no access token in response")),
        }
    }
}

/// A bearer token and how long it is good for, counted from when it was
/// issued.
#[derive(Clone, PartialEq)]
pub struct AccessToken {
    token: String,
    expires_in: Duration,
}

impl AccessToken {
    /// The bearer token sent with API requests.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// How long after it was issued the token expires.
    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// A single error item returned by a Reddit write operation.
///
/// Reddit batches errors: a single failed request can carry several items,
/// each naming an error type, a human-readable message, and the form field
/// it applies to.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(from = "(String, String, Option<String>)")]
pub struct ApiErrorItem {
    error_type: String,
    message: String,
    field: Option<String>,
}

impl ApiErrorItem {
    /// Creates a new error item.
    pub fn new(
        error_type: impl Into<String>,
        message: impl Into<String>,
        field: Option<&str>,
    ) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            field: field.map(String::from),
        }
    }

    /// The error's type tag, such as `RATELIMIT` or `SUBREDDIT_NOEXIST`.
    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    /// A human-readable explanation of the error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The form field the error applies to, if any.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// True if Reddit is asking the client to wait before writing again.
    pub fn is_rate_limit(&self) -> bool {
        self.error_type == RATELIMIT
    }
}

impl From<(String, String, Option<String>)> for ApiErrorItem {
    fn from((error_type, message, field): (String, String, Option<String>)) -> Self {
        Self {
            error_type,
            message,
            field,
        }
    }
}

impl fmt::Display for ApiErrorItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: '{}'", self.error_type, self.message)?;
        if let Some(field) = &self.field {
            write!(f, " on field '{field}'")?;
        }
        Ok(())
    }
}

/// The response to a write operation such as `/api/comment` or
/// `/api/submit`, when `api_type=json` is requested.
#[derive(Debug, Deserialize)]
pub struct WriteResponse {
    json: WriteJson,
}

#[derive(Debug, Deserialize)]
struct WriteJson {
    #[serde(default)]
    errors: Vec<ApiErrorItem>,
    #[serde(default)]
    data: Option<Submitted>,
}

impl WriteResponse {
    /// Parses the response to a write operation.
    pub fn parse(data: &str) -> Result<Self, Error> {
        serde_json::from_str(data)
    }

    /// Errors reported by Reddit. Empty if the write succeeded.
    pub fn errors(&self) -> &[ApiErrorItem] {
        &self.json.errors
    }

    /// Splits the response into the errors Reddit reported, or the data
    /// describing what was created.
    pub fn into_result(self) -> Result<Submitted, Vec<ApiErrorItem>> {
        if self.json.errors.is_empty() {
            Ok(self.json.data.unwrap_or_default())
        } else {
            Err(self.json.errors)
        }
    }
}

/// Describes a newly created post.
///
/// Comment replies carry none of these fields, so all of them are optional.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Submitted {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl Submitted {
    /// The fullname of the new post.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The URL of the new post.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}
