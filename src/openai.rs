//! Images API client
//!
//! Each attempt is a single blocking POST to `/v1/images/generations`. Rate
//! limits, 5xx responses and network failures are retried with exponential
//! backoff plus jitter; anything else fails straight away.
//!
//! Docs: <https://platform.openai.com/docs/api-reference/images>

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::GeneratorConfig;
use crate::constants::{
    BACKOFF_BASE_SECONDS, BACKOFF_FACTOR, DEFAULT_IMAGES_ENDPOINT, DOWNLOAD_TIMEOUT,
    GENERATION_TIMEOUT, MAX_ATTEMPTS, MAX_BACKOFF_SECONDS, MAX_RESPONSE_BYTES,
};
use crate::error::GeneratorError;

/// Status and body of an HTTP exchange.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HttpReply {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpReply {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below the HTTP layer.
#[derive(Debug)]
pub enum TransportError {
    /// The request timed out
    Timeout(String),
    /// Couldn't connect, or the connection dropped
    Connection(String),
    /// Anything else (bad request setup, TLS, oversized body...)
    Other(String),
}

impl TransportError {
    /// Timeouts and connection failures are worth another try.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout(msg) => write!(f, "Network timeout: {msg}"),
            Self::Connection(msg) => write!(f, "Network error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        match &err {
            ureq::Error::Timeout(_) => Self::Timeout(err.to_string()),
            ureq::Error::Io(_)
            | ureq::Error::ConnectionFailed
            | ureq::Error::HostNotFound
            | ureq::Error::BodyStalled => Self::Connection(err.to_string()),
            _ => Self::Other(err.to_string()),
        }
    }
}

/// Blocking HTTP, as the client needs it.
pub trait Transport {
    /// POSTs a JSON body with a bearer token.
    fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &[u8],
        timeout: Duration,
    ) -> Result<HttpReply, TransportError>;

    /// Plain GET, used to download images the API only links to.
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpReply, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &[u8],
        timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        (**self).post_json(url, bearer_token, body, timeout)
    }

    fn get(&self, url: &str, timeout: Duration) -> Result<HttpReply, TransportError> {
        (**self).get(url, timeout)
    }
}

/// [Transport] backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Builds an agent that hands every status back instead of erroring,
    /// so the client can decide what to retry.
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn read_reply(mut response: ureq::http::Response<ureq::Body>) -> Result<HttpReply, TransportError> {
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .with_config()
        .limit(MAX_RESPONSE_BYTES)
        .read_to_vec()?;
    Ok(HttpReply { status, body })
}

impl Transport for UreqTransport {
    fn post_json(
        &self,
        url: &str,
        bearer_token: &str,
        body: &[u8],
        timeout: Duration,
    ) -> Result<HttpReply, TransportError> {
        let response = self
            .agent
            .post(url)
            .config()
            .timeout_global(Some(timeout))
            .build()
            .header("Authorization", format!("Bearer {bearer_token}"))
            .header("Content-Type", "application/json")
            .send(body)?;
        read_reply(response)
    }

    fn get(&self, url: &str, timeout: Duration) -> Result<HttpReply, TransportError> {
        let response = self
            .agent
            .get(url)
            .config()
            .timeout_global(Some(timeout))
            .build()
            .call()?;
        read_reply(response)
    }
}

/// Blocking waits, so tests can count backoffs without sleeping.
pub trait Sleeper {
    /// Blocks for `duration`.
    fn sleep(&self, duration: Duration);
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// How hard to try before giving up on one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry, in seconds (jitter is added on top).
    pub base_delay_seconds: f64,
    /// Multiplier applied to the delay after every retry.
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay_seconds: BACKOFF_BASE_SECONDS,
            factor: BACKOFF_FACTOR,
        }
    }
}

/// Wait before the next retry. The delay is capped at [MAX_BACKOFF_SECONDS]
/// before jitter is added, so long retry policies can't overflow.
fn backoff(delay_seconds: f64, jitter_seconds: f64) -> Duration {
    let capped = delay_seconds.min(MAX_BACKOFF_SECONDS);
    Duration::try_from_secs_f64(capped + jitter_seconds).unwrap_or(Duration::ZERO)
}

/// Request body for POST /v1/images/generations
#[derive(Serialize, Debug)]
struct ImagesGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,

    // For GPT image models, which always return base64.
    #[serde(skip_serializing_if = "Option::is_none")]
    output_format: Option<&'a str>,

    // For dall-e models.
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
struct ImagesGenerateResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize, Debug)]
struct ImageData {
    b64_json: Option<String>,
    url: Option<String>,
    revised_prompt: Option<String>,
}

/// Where the image bytes are in a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    /// Base64 image data embedded in the response
    InlineBytes(String),
    /// A link to the image, for providers that don't inline it
    RemoteUrl(Url),
}

impl ImagePayload {
    /// Picks the image out of a successful response body, along with the
    /// revised prompt if the API rewrote ours.
    pub fn from_response(body: &[u8]) -> Result<(Self, Option<String>), GeneratorError> {
        let parsed: ImagesGenerateResponse = serde_json::from_slice(body)?;
        let missing =
            || GeneratorError::MissingImageData(String::from_utf8_lossy(body).into_owned());

        let first = parsed.data.into_iter().next().ok_or_else(missing)?;
        let payload = match (first.b64_json, first.url) {
            (Some(b64), _) if !b64.is_empty() => Self::InlineBytes(b64),
            (_, Some(url)) if !url.is_empty() => Self::RemoteUrl(Url::parse(&url)?),
            _ => return Err(missing()),
        };
        Ok((payload, first.revised_prompt))
    }

    /// Turns the payload into image bytes, downloading it if it's a link.
    pub fn resolve<T: Transport + ?Sized>(self, transport: &T) -> Result<Vec<u8>, GeneratorError> {
        match self {
            Self::InlineBytes(b64) => Ok(general_purpose::STANDARD.decode(b64)?),
            Self::RemoteUrl(url) => {
                let reply = transport
                    .get(url.as_str(), DOWNLOAD_TIMEOUT)
                    .map_err(GeneratorError::Transport)?;
                if !reply.is_success() {
                    return Err(GeneratorError::Download {
                        status: reply.status,
                    });
                }
                Ok(reply.body)
            }
        }
    }
}

/// Generates images one prompt at a time.
#[derive(Debug)]
pub struct ImagesClient<T, S> {
    transport: T,
    sleeper: S,
    api_key: String,
    model: String,
    size: String,
    endpoint: String,
    policy: RetryPolicy,
}

impl<T: Transport, S: Sleeper> ImagesClient<T, S> {
    /// New client against the default endpoint, with the default retry policy.
    pub fn new(
        transport: T,
        sleeper: S,
        api_key: impl Into<String>,
        model: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            sleeper,
            api_key: api_key.into(),
            model: model.into(),
            size: size.into(),
            endpoint: DEFAULT_IMAGES_ENDPOINT.to_string(),
            policy: RetryPolicy::default(),
        }
    }

    /// Client set up from the resolved CLI/env configuration.
    pub fn from_config(config: &GeneratorConfig, transport: T, sleeper: S) -> Self {
        Self::new(
            transport,
            sleeper,
            config.api_key.as_str(),
            config.image_model.as_str(),
            config.image_size.as_str(),
        )
        .with_endpoint(config.endpoint.as_str())
    }

    /// Overrides the generations endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The sleeper used for backoff, shared with the caller's rate-limit pause.
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// The model name requests are sent with.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, prompt: &str) -> Result<Vec<u8>, GeneratorError> {
        // GPT image models reject response_format and always return base64.
        let is_gpt_image = self.model.starts_with("gpt-image");
        let req_body = ImagesGenerateRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: &self.size,
            output_format: is_gpt_image.then_some("png"),
            response_format: (!is_gpt_image).then_some("b64_json"),
        };
        Ok(serde_json::to_vec(&req_body)?)
    }

    /// Generates one image and returns its bytes.
    ///
    /// Retryable failures are retried up to the policy's attempt ceiling,
    /// after which [GeneratorError::RetriesExhausted] is returned.
    pub fn generate(&self, prompt: &str) -> Result<Vec<u8>, GeneratorError> {
        let body = self.request_body(prompt)?;
        let max_attempts = self.policy.max_attempts.max(1);
        let mut delay = self.policy.base_delay_seconds;
        let mut last = String::new();

        for attempt in 1..=max_attempts {
            match self.attempt(&body) {
                Ok(bytes) => return Ok(bytes),
                Err(err) if err.is_retryable() => {
                    last = err.to_string();
                    if attempt == max_attempts {
                        break;
                    }
                    let wait = backoff(delay, rand::random::<f64>());
                    warn!(
                        "{}. Retry {attempt}/{max_attempts} in {:.1}s",
                        err.summary(),
                        wait.as_secs_f64()
                    );
                    self.sleeper.sleep(wait);
                    delay *= self.policy.factor;
                }
                Err(err) => return Err(err),
            }
        }

        Err(GeneratorError::RetriesExhausted {
            attempts: max_attempts,
            last,
        })
    }

    fn attempt(&self, body: &[u8]) -> Result<Vec<u8>, GeneratorError> {
        let reply = self
            .transport
            .post_json(&self.endpoint, &self.api_key, body, GENERATION_TIMEOUT)
            .map_err(GeneratorError::Transport)?;

        if !reply.is_success() {
            return Err(GeneratorError::Api {
                status: reply.status,
                body: String::from_utf8_lossy(&reply.body).into_owned(),
            });
        }

        let (payload, revised_prompt) = ImagePayload::from_response(&reply.body)?;
        if let Some(revised_prompt) = revised_prompt {
            debug!("Revised prompt from OpenAI: {revised_prompt}");
        }
        payload.resolve(&self.transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::cell::RefCell;

    /// Records every request and answers GETs with a fixed reply.
    #[derive(Default)]
    struct Recorder {
        posts: RefCell<Vec<Value>>,
        gets: RefCell<Vec<String>>,
    }

    impl Transport for Recorder {
        fn post_json(
            &self,
            _url: &str,
            _bearer_token: &str,
            body: &[u8],
            _timeout: Duration,
        ) -> Result<HttpReply, TransportError> {
            self.posts
                .borrow_mut()
                .push(serde_json::from_slice(body).unwrap());
            Ok(HttpReply {
                status: 200,
                body: br#"{"data":[{"b64_json":"aGVsbG8="}]}"#.to_vec(),
            })
        }

        fn get(&self, url: &str, _timeout: Duration) -> Result<HttpReply, TransportError> {
            self.gets.borrow_mut().push(url.to_string());
            Ok(HttpReply {
                status: 200,
                body: b"png bytes".to_vec(),
            })
        }
    }

    #[test]
    fn dalle_request_asks_for_base64() {
        let client = ImagesClient::new(
            Recorder::default(),
            ThreadSleeper,
            "k",
            "dall-e-3",
            "1024x1024",
        );
        assert_eq!(client.generate("a meadow").unwrap(), b"hello");
        let posts = client.transport.posts.borrow();
        assert_eq!(
            posts[0],
            json!({
                "model": "dall-e-3",
                "prompt": "a meadow",
                "n": 1,
                "size": "1024x1024",
                "response_format": "b64_json"
            })
        );
    }

    #[test]
    fn gpt_image_request_skips_response_format() {
        let client = ImagesClient::new(
            Recorder::default(),
            ThreadSleeper,
            "k",
            "gpt-image-1",
            "1024x1024",
        );
        client.generate("a meadow").unwrap();
        let posts = client.transport.posts.borrow();
        assert_eq!(posts[0]["output_format"], "png");
        assert!(posts[0].get("response_format").is_none());
    }

    #[test]
    fn payload_prefers_inline_data() {
        let body = br#"{"data":[{
            "b64_json": "aGVsbG8=",
            "url": "https://x.io/a.png",
            "revised_prompt": "new"
        }]}"#;
        let (payload, revised) = ImagePayload::from_response(body).unwrap();
        assert_eq!(payload, ImagePayload::InlineBytes("aGVsbG8=".to_string()));
        assert_eq!(revised.as_deref(), Some("new"));
    }

    #[test]
    fn payload_falls_back_to_url() {
        let body = br#"{"data":[{"b64_json":null,"url":"https://example.org/a.png"}]}"#;
        let (payload, _) = ImagePayload::from_response(body).unwrap();
        let transport = Recorder::default();
        assert_eq!(payload.resolve(&transport).unwrap(), b"png bytes");
        assert_eq!(*transport.gets.borrow(), vec!["https://example.org/a.png"]);
    }

    #[test]
    fn payload_without_image_is_an_error() {
        for body in [
            &br#"{"data":[{}]}"#[..],
            &br#"{"data":[]}"#[..],
            &br#"{}"#[..],
        ] {
            assert!(matches!(
                ImagePayload::from_response(body),
                Err(GeneratorError::MissingImageData(_))
            ));
        }
        assert!(matches!(
            ImagePayload::from_response(b"not json"),
            Err(GeneratorError::Parse(_))
        ));
        assert!(matches!(
            ImagePayload::from_response(br#"{"data":[{"url":"not a url"}]}"#),
            Err(GeneratorError::InvalidUrl(_))
        ));
    }

    #[test]
    fn backoff_is_capped() {
        assert_eq!(backoff(2.0, 0.5), Duration::from_secs_f64(2.5));
        assert_eq!(
            backoff(1e300, 0.25),
            Duration::from_secs_f64(MAX_BACKOFF_SECONDS + 0.25)
        );
        assert_eq!(
            backoff(f64::INFINITY, 0.0),
            Duration::from_secs_f64(MAX_BACKOFF_SECONDS)
        );
        assert_eq!(backoff(-1.0, 0.0), Duration::ZERO);
    }

    #[test]
    fn transport_retryability() {
        assert!(TransportError::Timeout("t".into()).is_retryable());
        assert!(TransportError::Connection("c".into()).is_retryable());
        assert!(!TransportError::Other("o".into()).is_retryable());
    }
}
