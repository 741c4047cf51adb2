#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose;
use bggen::openai::{HttpReply, Sleeper, Transport, TransportError};

/// A 200 response carrying `bytes` as base64.
pub fn inline_image(bytes: &[u8]) -> HttpReply {
    let body = serde_json::json!({
        "created": 0,
        "data": [{"b64_json": general_purpose::STANDARD.encode(bytes)}]
    });
    HttpReply {
        status: 200,
        body: serde_json::to_vec(&body).unwrap(),
    }
}

/// A 200 response that only links to the image.
pub fn linked_image(url: &str) -> HttpReply {
    let body = serde_json::json!({"data": [{"url": url}]});
    HttpReply {
        status: 200,
        body: serde_json::to_vec(&body).unwrap(),
    }
}

pub fn status(status: u16, body: &str) -> HttpReply {
    HttpReply {
        status,
        body: body.as_bytes().to_vec(),
    }
}

/// Replays canned replies in order and remembers what it was asked.
#[derive(Default)]
pub struct ScriptedTransport {
    posts: RefCell<VecDeque<Result<HttpReply, TransportError>>>,
    gets: RefCell<VecDeque<Result<HttpReply, TransportError>>>,
    pub post_count: RefCell<usize>,
    pub bearer_tokens: RefCell<Vec<String>>,
    pub fetched_urls: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(posts: Vec<Result<HttpReply, TransportError>>) -> Self {
        Self {
            posts: RefCell::new(posts.into()),
            ..Default::default()
        }
    }

    pub fn with_gets(self, gets: Vec<Result<HttpReply, TransportError>>) -> Self {
        *self.gets.borrow_mut() = gets.into();
        self
    }

    pub fn post_count(&self) -> usize {
        *self.post_count.borrow()
    }
}

impl Transport for ScriptedTransport {
    fn post_json(
        &self,
        _url: &str,
        bearer_token: &str,
        _body: &[u8],
        _timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        *self.post_count.borrow_mut() += 1;
        self.bearer_tokens
            .borrow_mut()
            .push(bearer_token.to_string());
        self.posts
            .borrow_mut()
            .pop_front()
            .expect("no scripted POST reply left")
    }

    fn get(&self, url: &str, _timeout: Duration) -> Result<HttpReply, TransportError> {
        self.fetched_urls.borrow_mut().push(url.to_string());
        self.gets
            .borrow_mut()
            .pop_front()
            .expect("no scripted GET reply left")
    }
}

const REJECTED: &str = r#"{"error":{"message":"nope"}}"#;

/// Succeeds for every prompt except the ones mentioning a failing theme,
/// which get `failure_status`.
pub struct ThemedTransport {
    pub failing_themes: Vec<&'static str>,
    pub failure_status: u16,
}

impl Transport for ThemedTransport {
    fn post_json(
        &self,
        _url: &str,
        _bearer_token: &str,
        body: &[u8],
        _timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        let request: serde_json::Value = serde_json::from_slice(body).unwrap();
        let prompt = request["prompt"].as_str().unwrap().to_string();
        let theme_line = |theme: &&str| prompt.contains(&format!("- Theme: {theme}\n"));
        if self.failing_themes.iter().any(theme_line) {
            return Ok(status(self.failure_status, REJECTED));
        }
        Ok(inline_image(prompt.as_bytes()))
    }

    fn get(&self, _url: &str, _timeout: Duration) -> Result<HttpReply, TransportError> {
        Err(TransportError::Other("unexpected GET".to_string()))
    }
}

/// Records sleeps instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn count(&self) -> usize {
        self.sleeps.borrow().len()
    }
}

/// Asserts `lo <= duration < hi`, in seconds.
pub fn assert_between(duration: Duration, lo: f64, hi: f64) {
    let seconds = duration.as_secs_f64();
    assert!(lo <= seconds && seconds < hi, "{seconds}s not in {lo}..{hi}");
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
