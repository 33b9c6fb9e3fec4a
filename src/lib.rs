// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! redpen is an interactive Reddit bot that writes with an LLM. It can
//! either write an article about a topic and post it to r/test every day at
//! a chosen time, or write and post a short comment on each of a
//! subreddit's hot posts.
//!
//! # Examples
//!
//! Start the bot and pick a mode from the menu:
//!
//! ```bash
//! redpen
//! ```
//!
//! Log what the bot is doing, including every request it makes:
//!
//! ```bash
//! redpen -vvv
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! redpen --help
//! ```
//!
//! # Reddit Setup
//!
//! redpen acts as a single Reddit account through a "script" app:
//!
//! 1. Create a script app at <https://www.reddit.com/prefs/apps>.
//! 2. Store the app's client ID and secret, and the account's username and
//!    password, in `$REDDIT_CLIENT_ID`, `$REDDIT_CLIENT_SECRET`,
//!    `$REDDIT_USERNAME`, and `$REDDIT_PASSWORD`.
//! 3. Store a descriptive user agent, such as
//!    `script:redpen:v0.1.0 (by /u/your_username)`, in `$REDDIT_USER_AGENT`.
//!
//! # Groq API Setup
//!
//! Posts and comments are written by a model hosted by [Groq]. Generate an
//! API key in the [GroqCloud console] and store it in `$GROQ_API_KEY`.
//!
//! **You are solely responsible for the cost of your use of the Groq API!**
//!
//! Any of these variables may instead be put in a `.env` file in the
//! directory redpen is run from. Variables already set in the environment
//! win. A missing variable is only reported when Reddit or Groq refuses the
//! empty value.
//!
//! # License
//!
//! redpen is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [Groq]: https://groq.com/
//! [GroqCloud console]: https://console.groq.com/keys

pub mod ai;
pub mod bot;
pub mod cli;
pub mod clock;
pub mod conf;
pub mod http;
pub mod ratelimit;
pub mod reddit;
pub mod schedule;
pub mod text;
pub mod writer;

#[cfg(test)]
mod test_utils;
