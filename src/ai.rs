// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! AI services.
//!
//! Generated text comes from [Groq]'s OpenAI-compatible chat completion API.
//! The API key is read from `$GROQ_API_KEY`; see [`Auth`].
//!
//! [Groq]: https://console.groq.com/docs/overview

pub mod auth;
pub mod client;
pub mod service;

pub use auth::Auth;
