// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! Writes Reddit content using AI.

use crate::ai::Auth;
use crate::ai::client::groq::{GroqClient, GroqRequest, Model};
use crate::ai::client::{APIClient, APIRequest, APIResponse, APIResult, Error};
use log::{debug, trace};

/// Writes comments and articles by asking an LLM for a single completion.
///
/// The generated text is returned exactly as the model wrote it; length
/// limits are only requested in the prompt, never enforced.
#[derive(Debug)]
pub struct Writer<C = GroqClient> {
    client: C,
    model: Model,
}

impl Writer {
    /// Creates a writer that talks to Groq with the given credentials.
    pub fn new(auth: Auth) -> Self {
        Self::with_client(GroqClient::new(auth))
    }
}

impl<C> Writer<C>
where
    C: APIClient<APIRequest = GroqRequest>,
{
    const COMMENT_PREAMBLE: &'static str = include_str!("prompts/comment.txt");
    const ARTICLE_PREAMBLE: &'static str = include_str!("prompts/article.txt");

    /// Creates a writer that sends its requests through `client`, using
    /// the default model.
    pub fn with_client(client: C) -> Self {
        let model = Model::default();
        Self { client, model }
    }

    /// Uses `model` for all subsequent requests.
    pub fn model(self, model: Model) -> Self {
        Self { model, ..self }
    }

    /// Writes a short comment in reply to a post with the given `title`
    /// and `content`.
    pub async fn comment(&self, title: &str, content: &str) -> APIResult<String> {
        debug!("writing a comment for {title:?}");
        self.complete(self.comment_input(title, content)).await
    }

    /// Writes an article about `topic`.
    pub async fn article(&self, topic: &str) -> APIResult<String> {
        debug!("writing an article about {topic:?}");
        self.complete(self.article_input(topic)).await
    }

    /// The full prompt sent to the LLM when writing a comment.
    pub fn comment_input(&self, title: &str, content: &str) -> String {
        let instructions = Self::preamble(Self::COMMENT_PREAMBLE);
        format!("{instructions}\n\nTitle: {title}\n\nContent: {content}")
    }

    /// The full prompt sent to the LLM when writing an article.
    pub fn article_input(&self, topic: &str) -> String {
        let instructions = Self::preamble(Self::ARTICLE_PREAMBLE);
        format!("{instructions}\n\nTopic: {topic}")
    }

    fn preamble(prompt: &str) -> String {
        prompt.trim_end().replace('\n', " ")
    }

    async fn complete(&self, input: String) -> APIResult<String> {
        trace!("prompt:\n{input}");
        let request = GroqRequest::default().model(self.model).input(input);
        let response = self.client.send(&request).await?;
        response
            .text()
            .map(String::from)
            .ok_or(Error::EmptyResponse)
    }
}
