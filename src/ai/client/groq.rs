// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! Groq API client.
//!
//! Groq hosts open-weight models behind an API that is compatible with
//! OpenAI's [chat completions] endpoint. Each request carries a list of
//! chat messages and the response carries one or more generated
//! "choices"; redpen only ever sends a single user message and reads the
//! first choice.
//!
//! # Access
//!
//! You will need a [GroqCloud account](https://console.groq.com/) and an
//! API key. The key should be stored under the `$GROQ_API_KEY` environment
//! variable for use with [`Auth`](crate::ai::Auth).
//!
//! **You are solely responsible for the cost of your use of the Groq API.**
//!
//! [chat completions]: https://console.groq.com/docs/api-reference#chat-create

use crate::ai::Auth;
use crate::ai::client::{APIClient, APIRequest, APIResponse, APIResult};
use crate::ai::service::{APIService, HTTPService};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The chat completions endpoint.
pub const COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// A client for Groq's chat completion API.
#[derive(Debug)]
pub struct GroqClient<S = HTTPService> {
    auth: Auth,
    service: S,
}

impl GroqClient {
    /// Creates a new client that talks to Groq over HTTPS.
    pub fn new(auth: Auth) -> Self {
        Self::new_with_service(auth, HTTPService::default())
    }
}

impl<S: APIService> GroqClient<S> {
    /// Creates a new client that sends requests through the given `service`.
    pub fn new_with_service(auth: Auth, service: S) -> Self {
        Self { auth, service }
    }
}

impl<S: APIService + Sync> APIClient for GroqClient<S> {
    type APIRequest = GroqRequest;
    type APIResponse = GroqResponse;

    async fn send(&self, request: &GroqRequest) -> APIResult<GroqResponse> {
        debug!("sending chat completion request to {}", request.model);
        let response: GroqResponse = self
            .service
            .post(COMPLETIONS_URL, &self.auth, request)
            .await?;
        debug!(
            "received {} choice(s) from {}",
            response.choices.len(),
            response.model
        );
        Ok(response)
    }
}

/// A body for a Groq chat completion request.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GroqRequest {
    messages: Vec<Message>,
    model: Model,
}

impl GroqRequest {
    /// Messages that will be sent to the model.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }
}

impl APIRequest for GroqRequest {
    type Model = Model;

    /// Sets the model used by the request.
    ///
    /// If not specified, the [default](Model::default) model is used.
    fn model(self, model: Model) -> Self {
        Self { model, ..self }
    }

    /// Sets the request's input as a single message from the user.
    ///
    /// Any previously set input is replaced.
    fn input(self, input: impl Into<String>) -> Self {
        let messages = vec![Message::user(input)];
        Self { messages, ..self }
    }
}

/// A single message in a chat.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    /// A message written by the user.
    pub fn user(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            role: Role::User,
            content,
        }
    }

    /// Who wrote the message.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Text of the message.
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// The author of a chat message.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the whole conversation.
    System,

    /// The person asking for a completion.
    User,

    /// The model.
    Assistant,
}

/// A chat completion response.
#[derive(Debug, Deserialize, Serialize)]
pub struct GroqResponse {
    model: String,
    choices: Vec<Choice>,
}

impl GroqResponse {
    /// The model that generated the response.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generated completions, in order.
    pub fn choices(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter()
    }
}

impl APIResponse for GroqResponse {
    fn text(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.message.content())
    }
}

/// A single generated completion.
#[derive(Debug, Deserialize, Serialize)]
pub struct Choice {
    index: u32,
    message: Message,
    finish_reason: Option<String>,
}

impl Choice {
    /// The generated message.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Why the model stopped generating, e.g., `"stop"` or `"length"`.
    pub fn finish_reason(&self) -> Option<&str> {
        self.finish_reason.as_deref()
    }
}

/// Models served by Groq that are suitable for writing prose.
///
/// See Groq's [model list](https://console.groq.com/docs/models) for
/// details and current pricing.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub enum Model {
    /// Meta's Llama 3.3 70B model, tuned for a broad range of tasks.
    #[default]
    #[serde(rename = "llama-3.3-70b-versatile")]
    Llama3_3_70bVersatile,

    /// Meta's Llama 3.1 8B model, small and very fast.
    #[serde(rename = "llama-3.1-8b-instant")]
    Llama3_1_8bInstant,

    /// OpenAI's open-weight 120B model.
    #[serde(rename = "openai/gpt-oss-120b")]
    GptOss120b,

    /// OpenAI's open-weight 20B model.
    #[serde(rename = "openai/gpt-oss-20b")]
    GptOss20b,
}

impl Model {
    /// The least expensive available model.
    pub fn cheapest() -> Self {
        Model::Llama3_1_8bInstant
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(&self).map_err(|_| fmt::Error)?;
        f.write_str(s.trim_matches('"'))
    }
}
