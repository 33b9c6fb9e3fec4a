// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! The bot's workflows: commenting on hot posts and publishing articles.
//!
//! Workflows never return errors. Failures are reported on the console and
//! summarized in a [`CommentReport`] or [`PostReport`] so callers can tell
//! how a run ended.

use crate::ai::Auth;
use crate::ai::client::groq::{GroqClient, GroqRequest};
use crate::ai::client::{self, APIClient};
use crate::clock::Clock;
use crate::conf::Credentials;
use crate::ratelimit;
use crate::reddit::thing::{ApiErrorItem, Submitted};
use crate::reddit::{self, Post, RedditClient, RedditService, Service};
use crate::schedule::{ScheduledPost, Scheduler};
use crate::text::preview;
use crate::writer::Writer;
use colored::Colorize;
use log::{debug, info, warn};
use thiserror::Error;
use tokio::time::sleep;

/// Articles are always posted to this subreddit.
pub const TARGET_SUBREDDIT: &str = "test";

/// Number of characters of a post's content shown while processing it.
const PREVIEW_CHARS: usize = 200;

/// An error that ends a workflow early.
#[derive(Debug, Error)]
pub enum Error {
    /// Reddit could not be read from or written to.
    #[error(transparent)]
    Reddit(#[from] reddit::Error),

    /// The LLM could not write a comment.
    #[error(transparent)]
    Writer(#[from] client::Error),
}

/// How a commenting run ended.
#[derive(Debug)]
pub enum CommentReport {
    /// Every fetched post was processed.
    Completed {
        /// Number of comments posted.
        commented: usize,
        /// Number of posts Reddit refused a comment on.
        skipped: usize,
    },

    /// An error stopped the run before every post was processed.
    Aborted {
        /// Number of comments posted before the error.
        commented: usize,
        /// Number of posts Reddit refused a comment on before the error.
        skipped: usize,
        /// The error that stopped the run.
        error: Error,
    },
}

impl CommentReport {
    fn new(progress: Progress, result: Result<(), Error>) -> Self {
        let Progress { commented, skipped } = progress;
        match result {
            Ok(()) => CommentReport::Completed { commented, skipped },
            Err(error) => CommentReport::Aborted {
                commented,
                skipped,
                error,
            },
        }
    }

    /// Number of comments posted.
    pub fn commented(&self) -> usize {
        match self {
            CommentReport::Completed { commented, .. } => *commented,
            CommentReport::Aborted { commented, .. } => *commented,
        }
    }

    /// The error that stopped the run, if any.
    pub fn error(&self) -> Option<&Error> {
        match self {
            CommentReport::Completed { .. } => None,
            CommentReport::Aborted { error, .. } => Some(error),
        }
    }
}

/// How publishing an article ended.
#[derive(Debug)]
pub enum PostReport {
    /// The article was published.
    Posted {
        /// Title of the new post.
        title: String,
        /// What Reddit created.
        submitted: Submitted,
    },

    /// Reddit refused the article.
    Failed {
        /// Title of the post that was attempted.
        title: String,
        /// Why it failed.
        error: reddit::Error,
    },
}

#[derive(Debug, Default)]
struct Progress {
    commented: usize,
    skipped: usize,
}

/// A Reddit bot that writes its posts and comments with an LLM.
#[derive(Debug)]
pub struct Bot<S = RedditService, C = GroqClient> {
    reddit: RedditClient<S>,
    writer: Writer<C>,
}

impl Bot {
    /// Creates a bot acting as the account in `credentials` and writing
    /// with the LLM that `auth` grants access to.
    pub fn new(credentials: Credentials, auth: Auth) -> Self {
        Self::with_parts(RedditClient::new(credentials), Writer::new(auth))
    }
}

impl<S, C> Bot<S, C>
where
    S: Service,
    C: APIClient<APIRequest = GroqRequest>,
{
    /// Creates a bot from an existing Reddit session and writer.
    pub fn with_parts(reddit: RedditClient<S>, writer: Writer<C>) -> Self {
        Self { reddit, writer }
    }

    /// The bot's writer.
    pub fn writer(&self) -> &Writer<C> {
        &self.writer
    }

    /// Comments on up to `num_posts` of the hot posts in `subreddit`.
    ///
    /// Posts are handled one at a time in the order Reddit ranks them. If
    /// Reddit rate-limits a comment, the bot waits as long as Reddit asks,
    /// plus a few seconds, and tries that comment exactly once more. Any
    /// other failure stops the run; it is reported, not returned.
    pub async fn comment_on_posts(&self, subreddit: &str, num_posts: usize) -> CommentReport {
        let mut progress = Progress::default();
        let result = self
            .comment_on_each(subreddit, num_posts, &mut progress)
            .await;
        if let Err(err) = &result {
            debug!("commenting on r/{subreddit} stopped: {err:?}");
            eprintln!("{} {err}", "Error commenting on posts:".red());
        }
        CommentReport::new(progress, result)
    }

    async fn comment_on_each(
        &self,
        subreddit: &str,
        num_posts: usize,
        progress: &mut Progress,
    ) -> Result<(), Error> {
        let posts = self.reddit.hot(subreddit, num_posts).await?;
        info!("commenting on {} post(s) from r/{subreddit}", posts.len());

        for post in &posts {
            let title = post.title();
            let content = post.content();
            println!("Processing post: {}", title.bold());
            println!("Content: {}...", preview(content, PREVIEW_CHARS));

            let comment = self.writer.comment(title, content).await?;
            println!("Generated comment: {comment}");

            if self.reply(post, &comment).await? {
                progress.commented += 1;
            } else {
                progress.skipped += 1;
            }
        }

        Ok(())
    }

    /// Replies to `post`, retrying once after a rate limit.
    ///
    /// Returns false if Reddit refused the comment for a reason other than
    /// a rate limit.
    async fn reply(&self, post: &Post, comment: &str) -> Result<bool, Error> {
        let title = post.title();
        let err = match self.reddit.reply(post, comment).await {
            Ok(()) => {
                println!("{} {title}", "Commented on post:".green());
                return Ok(true);
            }
            Err(err) => err,
        };

        // Only the first rate-limit item in a batch is acted on. Anything
        // else Reddit reported alongside it is dropped.
        if let Some(limit) = err.rate_limit() {
            self.wait_out(limit).await;
            self.reddit.reply(post, comment).await?;
            println!(
                "{} {title}",
                "Successfully commented after waiting on post:".green()
            );
            return Ok(true);
        }

        match err {
            reddit::Error::Api(items) => {
                warn!("Reddit refused a comment on {title:?}: {items:?}");
                Ok(false)
            }
            err => Err(err.into()),
        }
    }

    async fn wait_out(&self, limit: &ApiErrorItem) {
        let requested = ratelimit::requested_wait(limit.message());
        let wait = ratelimit::wait_duration(limit.message());
        println!(
            "{} Waiting for {} seconds...",
            "Rate limit hit.".yellow(),
            requested.as_secs()
        );
        debug!("rate limited ({limit}), sleeping for {wait:?}");
        sleep(wait).await;
    }

    /// Publishes `body` to [`TARGET_SUBREDDIT`] as a self post titled
    /// "Insights on `topic`".
    ///
    /// Failures are reported, never retried.
    pub async fn post_to_reddit(&self, topic: &str, body: &str) -> PostReport {
        let title = format!("Insights on {topic}");
        match self.reddit.submit(TARGET_SUBREDDIT, &title, body).await {
            Ok(submitted) => {
                println!("{} {title}", format!("Posted to r/{TARGET_SUBREDDIT}:").green());
                if let Some(url) = submitted.url() {
                    info!("new post is at {url}");
                }
                PostReport::Posted { title, submitted }
            }
            Err(error) => {
                debug!("could not post {title:?}: {error:?}");
                eprintln!("{} {error}", "Error posting to Reddit:".red());
                PostReport::Failed { title, error }
            }
        }
    }

    /// Publishes `post` every day at its scheduled time.
    ///
    /// This blocks forever; only the first publication is normally seen
    /// before the operator stops the process.
    pub async fn schedule_post<K: Clock>(&self, scheduler: &Scheduler<K>, post: &ScheduledPost) {
        let trigger = scheduler.arm(post.at());
        println!("Post scheduled at {}. Waiting to execute...", post.at());
        let (topic, content) = (post.topic(), post.content());
        scheduler
            .run_forever(trigger, move || self.post_to_reddit(topic, content))
            .await
    }
}
