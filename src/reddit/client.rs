// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! Clients for reading from and writing to the Reddit API.

use crate::conf::Credentials;
use crate::http::{self, HTTPError, HTTPResult};
use crate::reddit::service::{RedditService, Service};
use crate::reddit::thing::{self, ApiErrorItem, Post, Submitted, TokenResponse, WriteResponse};
use log::{debug, info, warn};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Reddit never returns more than this many items in a single listing.
const MAX_PAGE_SIZE: usize = 100;

/// Tokens are renewed this long before Reddit says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// An authenticated session with Reddit, acting as a single account.
///
/// The session logs in lazily: the first request exchanges the
/// [`Credentials`] for an access token, and later requests reuse it until
/// it is about to expire or Reddit rejects it, at which point the session
/// logs in again.
#[derive(Debug)]
pub struct RedditClient<S = RedditService> {
    credentials: Credentials,
    service: S,
    session: Mutex<Option<Session>>,
}

#[derive(Debug)]
struct Session {
    token: String,
    renew_at: Instant,
}

impl Session {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.renew_at
    }
}

impl RedditClient {
    /// Creates a new session for the account named in `credentials`.
    ///
    /// No requests are made until the session is first used.
    pub fn new(credentials: Credentials) -> Self {
        let service = RedditService::new(credentials.user_agent());
        Self::new_with_service(credentials, service)
    }
}

impl<S: Service> RedditClient<S> {
    /// Creates a new session that talks to Reddit through `service`.
    pub fn new_with_service(credentials: Credentials, service: S) -> Self {
        Self {
            credentials,
            service,
            session: Mutex::new(None),
        }
    }

    /// The username of the account the session acts as.
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    async fn token(&self) -> Result<String, Error> {
        let mut session = self.session.lock().await;
        if let Some(session) = session.as_ref().filter(|session| session.is_fresh()) {
            return Ok(session.token.clone());
        }

        let data = self.service.authenticate(&self.credentials).await?;
        let access = TokenResponse::parse(&data)?
            .into_token()
            .map_err(Error::Auth)?;
        info!(
            "logged in to Reddit as {} for {}s",
            self.username(),
            access.expires_in().as_secs()
        );

        let now = Instant::now();
        let renew_at = now
            .checked_add(access.expires_in().saturating_sub(EXPIRY_MARGIN))
            .unwrap_or(now);
        let token = access.token().to_string();
        *session = Some(Session {
            token: token.clone(),
            renew_at,
        });
        Ok(token)
    }

    /// Drops the current token if Reddit refused it, so the next request
    /// logs in again.
    async fn checked(&self, result: HTTPResult<String>) -> Result<String, Error> {
        if matches!(result, Err(HTTPError::Http(status)) if status == StatusCode::UNAUTHORIZED) {
            warn!("Reddit rejected the access token for {}", self.username());
            *self.session.lock().await = None;
        }
        Ok(result?)
    }

    /// Fetches up to `limit` of the posts currently on `subreddit`'s hot
    /// listing, in the order Reddit ranks them.
    ///
    /// Fewer posts are returned if the listing runs out. A `limit` of 0
    /// returns nothing without contacting Reddit.
    pub async fn hot(&self, subreddit: &str, limit: usize) -> Result<Vec<Post>, Error> {
        let mut posts = Vec::new();
        let mut after: Option<String> = None;

        while posts.len() < limit {
            let token = self.token().await?;
            let page_size = (limit - posts.len()).min(MAX_PAGE_SIZE);
            let resource = match &after {
                Some(after) => format!("/r/{subreddit}/hot?limit={page_size}&after={after}"),
                None => format!("/r/{subreddit}/hot?limit={page_size}"),
            };
            let data = self
                .checked(self.service.get_resource(&token, &resource).await)
                .await?;
            let (page, next) = Post::parse_listing(&data)?;
            debug!("fetched {} post(s) from r/{subreddit}", page.len());

            if page.is_empty() {
                break;
            }
            posts.extend(page);

            match next {
                Some(next) => after = Some(next),
                None => break,
            }
        }

        posts.truncate(limit);
        Ok(posts)
    }

    /// Submits a new self post to `subreddit`.
    pub async fn submit(&self, subreddit: &str, title: &str, text: &str) -> Result<Submitted, Error> {
        let form = [
            ("api_type", "json"),
            ("kind", "self"),
            ("sr", subreddit),
            ("title", title),
            ("text", text),
        ];
        self.write("/api/submit", &form).await
    }

    /// Replies to `post` with a top-level comment.
    pub async fn reply(&self, post: &Post, text: &str) -> Result<(), Error> {
        let form = [
            ("api_type", "json"),
            ("thing_id", post.name()),
            ("text", text),
        ];
        self.write("/api/comment", &form).await?;
        Ok(())
    }

    async fn write(&self, resource: &str, form: &[(&str, &str)]) -> Result<Submitted, Error> {
        let token = self.token().await?;
        let data = self
            .checked(self.service.post_form(&token, resource, form).await)
            .await?;
        WriteResponse::parse(&data)?
            .into_result()
            .map_err(Error::Api)
    }
}

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the underlying HTTP service.
    #[error("Service error: {0}")]
    Service(#[from] http::HTTPError),

    /// An error parsing data.
    #[error("Parse error: {0}")]
    Parse(#[from] thing::Error),

    /// Reddit refused to log in.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Reddit rejected a write with one or more errors.
    #[error("Reddit API error: {}", join_items(.0))]
    Api(Vec<ApiErrorItem>),
}

impl Error {
    /// The first rate-limit item in a batch of API errors, if any.
    pub fn rate_limit(&self) -> Option<&ApiErrorItem> {
        match self {
            Error::Api(items) => items.iter().find(|item| item.is_rate_limit()),
            _ => None,
        }
    }

}

fn join_items(items: &[ApiErrorItem]) -> String {
    items
        .iter()
        .map(ApiErrorItem::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
