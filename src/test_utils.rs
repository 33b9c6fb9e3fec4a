use crate::ai::Auth;
use crate::ai::client::groq::GroqClient;
use crate::ai::service::APIService;
use crate::bot::Bot;
use crate::clock::{Clock, NaiveDateTime, TimeDelta};
use crate::conf::Credentials;
use crate::http::{HTTPError, HTTPResult};
use crate::reddit::RedditClient;
use crate::reddit::service::Service;
use crate::writer::Writer;
use reqwest::{IntoUrl, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::fs;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

/// Parses a local time such as `2026-10-18 14:30:00`.
pub fn at(datetime: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M:%S").expect("invalid datetime")
}

/// Builds a bot whose Reddit and LLM traffic goes to test doubles.
pub fn test_bot<'a>(
    reddit: &'a TestService,
    ai: &'a TestAIService,
) -> Bot<&'a TestService, GroqClient<&'a TestAIService>> {
    Bot::with_parts(
        RedditClient::new_with_service(Credentials::test(), reddit),
        Writer::with_client(GroqClient::new_with_service(Auth::new("test-groq-key"), ai)),
    )
}

impl Credentials {
    pub fn test() -> Credentials {
        Credentials::new(
            "test-client-id",
            "test-client-secret",
            "redpen_bot",
            "hunter2",
            "script:redpen:test (by /u/redpen_bot)",
        )
    }
}

/// A canned response body, or the HTTP status code to fail with.
pub type Reply = Result<String, u16>;

const TOKEN: &str = r#"{"access_token": "test-access-token", "token_type": "bearer", "expires_in": 3600, "scope": "*"}"#;

const COMMENTED: &str = r#"{"json": {"errors": [], "data": {"things": []}}}"#;

const SUBMITTED: &str = r#"{"json": {"errors": [], "data": {
    "url": "https://www.reddit.com/r/test/comments/1abcde/insights_on_rust/",
    "drafts_count": 0,
    "id": "1abcde",
    "name": "t3_1abcde"
}}}"#;

/// A request made through a [`TestService`].
#[derive(Clone, Debug)]
pub struct Request {
    pub token: String,
    pub resource: String,
    pub form: Vec<(String, String)>,
}

impl Request {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A Reddit service that serves canned responses and records every
/// request made through it.
///
/// Listings are served in the order they are queued, followed by empty
/// listings. Comments succeed unless a reply has been queued. With a token
/// lifetime, requests made with a token older than that are answered with
/// HTTP 401 like Reddit does.
#[derive(Debug)]
pub struct TestService {
    token_response: String,
    token_lifetime: Option<Duration>,
    issued_at: Mutex<Option<Instant>>,
    rejected: Mutex<usize>,
    listings: Mutex<VecDeque<Reply>>,
    replies: Mutex<VecDeque<Reply>>,
    submit_response: Reply,
    logins: Mutex<usize>,
    requests: Mutex<Vec<Request>>,
}

impl Default for TestService {
    fn default() -> Self {
        Self {
            token_response: String::from(TOKEN),
            token_lifetime: None,
            issued_at: Mutex::new(None),
            rejected: Mutex::new(0),
            listings: Mutex::new(VecDeque::new()),
            replies: Mutex::new(VecDeque::new()),
            submit_response: Ok(String::from(SUBMITTED)),
            logins: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl TestService {
    pub fn with_listings<'a>(self, files: impl IntoIterator<Item = &'a str>) -> Self {
        self.listings
            .lock()
            .unwrap()
            .extend(files.into_iter().map(|file| Ok(load_data(file))));
        self
    }

    pub fn with_raw_listing(self, body: &str) -> Self {
        self.listings.lock().unwrap().push_back(Ok(String::from(body)));
        self
    }

    pub fn with_listing_error(self, status: u16) -> Self {
        self.listings.lock().unwrap().push_back(Err(status));
        self
    }

    pub fn with_token_response(self, body: &str) -> Self {
        Self {
            token_response: String::from(body),
            ..self
        }
    }

    pub fn with_token_lifetime(self, lifetime: Duration) -> Self {
        Self {
            token_lifetime: Some(lifetime),
            ..self
        }
    }

    pub fn with_replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.replies.lock().unwrap().extend(replies);
        self
    }

    pub fn with_submit_response(self, submit_response: Reply) -> Self {
        Self {
            submit_response,
            ..self
        }
    }

    /// A write response carrying a single error item.
    pub fn api_error(error_type: &str, message: &str) -> Reply {
        Ok(json!({"json": {"errors": [[error_type, message, null]]}}).to_string())
    }

    /// A write response carrying several error items.
    pub fn batched_errors(items: &[(&str, &str, &str)]) -> Reply {
        let errors: Vec<_> = items
            .iter()
            .map(|(error_type, message, field)| json!([error_type, message, field]))
            .collect();
        Ok(json!({"json": {"errors": errors}}).to_string())
    }

    /// A write response asking the client to wait `minutes` minutes.
    pub fn rate_limited(minutes: u32) -> Reply {
        Self::batched_errors(&[(
            "RATELIMIT",
            &format!(
                "Looks like you've been doing that a lot. \
                 Take a break for {minutes} minutes before trying again."
            ),
            "ratelimit",
        )])
    }

    pub fn http_error(status: u16) -> Reply {
        Err(status)
    }

    pub fn logins(&self) -> usize {
        *self.logins.lock().unwrap()
    }

    /// How many requests were refused because their token had expired.
    pub fn rejected(&self) -> usize {
        *self.rejected.lock().unwrap()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn comments(&self) -> Vec<Request> {
        self.requests_to("/api/comment")
    }

    pub fn submissions(&self) -> Vec<Request> {
        self.requests_to("/api/submit")
    }

    fn requests_to(&self, resource: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|request| request.resource == resource)
            .collect()
    }

    fn record(&self, token: &str, resource: &str, form: &[(&str, &str)]) {
        let form = form
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        self.requests.lock().unwrap().push(Request {
            token: String::from(token),
            resource: String::from(resource),
            form,
        });
    }

    fn check_token(&self) -> HTTPResult<()> {
        let expired = match (self.token_lifetime, *self.issued_at.lock().unwrap()) {
            (Some(lifetime), Some(issued_at)) => issued_at.elapsed() >= lifetime,
            _ => false,
        };
        if expired {
            *self.rejected.lock().unwrap() += 1;
            return Err(HTTPError::Http(StatusCode::UNAUTHORIZED));
        }
        Ok(())
    }

    fn respond(reply: Reply) -> HTTPResult<String> {
        reply.map_err(|status| HTTPError::Http(StatusCode::from_u16(status).unwrap()))
    }
}

impl Service for TestService {
    async fn authenticate(&self, _credentials: &Credentials) -> HTTPResult<String> {
        *self.logins.lock().unwrap() += 1;
        *self.issued_at.lock().unwrap() = Some(Instant::now());
        Ok(self.token_response.clone())
    }

    async fn get_resource(&self, token: &str, resource: &str) -> HTTPResult<String> {
        self.check_token()?;
        self.record(token, resource, &[]);
        let listing = self.listings.lock().unwrap().pop_front();
        Self::respond(listing.unwrap_or_else(|| Ok(load_data("hot_empty"))))
    }

    async fn post_form(
        &self,
        token: &str,
        resource: &str,
        form: &[(&str, &str)],
    ) -> HTTPResult<String> {
        self.check_token()?;
        self.record(token, resource, form);
        let reply = if resource == "/api/submit" {
            self.submit_response.clone()
        } else {
            let queued = self.replies.lock().unwrap().pop_front();
            queued.unwrap_or_else(|| Ok(String::from(COMMENTED)))
        };
        Self::respond(reply)
    }
}

/// An LLM service that answers every chat completion request with canned
/// text and records the requests it receives.
///
/// Queued responses are used first; after that, the nth request is
/// answered with "Generated text n".
#[derive(Debug, Default)]
pub struct TestAIService {
    responses: Mutex<VecDeque<String>>,
    without_choices: bool,
    failing: bool,
    requests: Mutex<Vec<Value>>,
}

impl TestAIService {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn respond_with<'a>(self, responses: impl IntoIterator<Item = &'a str>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .extend(responses.into_iter().map(String::from));
        self
    }

    pub fn without_choices(self) -> Self {
        Self {
            without_choices: true,
            ..self
        }
    }

    /// The prompt sent with each request, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request["messages"][0]["content"].as_str().unwrap().to_string())
            .collect()
    }

    /// The model requested with each request, in order.
    pub fn models(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request["model"].as_str().unwrap().to_string())
            .collect()
    }

    fn completion(&self, model: &Value) -> Value {
        if self.without_choices {
            return json!({"model": model, "choices": []});
        }
        let count = self.requests.lock().unwrap().len();
        let text = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("Generated text {count}"));
        json!({
            "model": model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        })
    }
}

impl APIService for TestAIService {
    async fn post<U, D, R>(&self, _uri: U, _auth: &Auth, data: &D) -> HTTPResult<R>
    where
        U: IntoUrl + Send,
        D: Serialize + Sync,
        R: DeserializeOwned,
    {
        let request = serde_json::to_value(data)?;
        let model = request["model"].clone();
        self.requests.lock().unwrap().push(request);
        if self.failing {
            return Err(HTTPError::Http(StatusCode::UNAUTHORIZED));
        }
        Ok(serde_json::from_value(self.completion(&model))?)
    }
}

/// A clock that never moves.
pub struct FrozenClock {
    datetime: NaiveDateTime,
}

impl FrozenClock {
    pub fn new(datetime: NaiveDateTime) -> Self {
        FrozenClock { datetime }
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        Self::new(at("2026-10-18 10:13:00"))
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> NaiveDateTime {
        self.datetime
    }
}

/// A clock that follows tokio's clock, so it advances when a test
/// pauses and advances time.
pub struct TokioClock {
    start: NaiveDateTime,
    origin: Instant,
}

impl TokioClock {
    pub fn starting_at(start: NaiveDateTime) -> Self {
        Self {
            start,
            origin: Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> NaiveDateTime {
        self.start + TimeDelta::from_std(self.origin.elapsed()).unwrap()
    }
}
