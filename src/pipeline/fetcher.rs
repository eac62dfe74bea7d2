//! HTTP fetcher implementation
//!
//! This module handles all page requests for the pipeline, including:
//! - Building the shared HTTP client with the configured user agent
//! - Reachability checks for the validation stage
//! - Fetching page bodies (size-capped) and extracting their text
//! - Turning reqwest errors into readable transport messages

use crate::config::FetcherConfig;
use crate::pipeline::parser::extract_visible_text;
use crate::pipeline::{FetchError, PageFetcher};
use crate::url::parse_fetchable;
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;

/// Maximum redirect hops followed before giving up
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed (up to 10 hops) so the status reported for a URL is
/// the one of the page it finally lands on. Per-request timeouts are applied
/// by the caller.
///
/// # Example
///
/// ```no_run
/// use topic_sieve::config::FetcherConfig;
/// use topic_sieve::pipeline::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page fetcher backed by reqwest
///
/// One instance is shared by all worker tasks.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            max_body_bytes: config.max_body_bytes.max(1),
        })
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<reqwest::Response, FetchError> {
        let parsed = parse_fetchable(url).map_err(FetchError::Transport)?;

        self.client
            .get(parsed)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::Transport(describe_request_error(&e, timeout)))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_status(&self, url: &str, timeout: Duration) -> Result<u16, FetchError> {
        let response = self.get(url, timeout).await?;
        let status = response.status().as_u16();
        tracing::trace!("Status check {} -> HTTP {}", url, status);
        Ok(status)
    }

    async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<Option<String>, FetchError> {
        let response = self.get(url, timeout).await?;
        let encoding = response_encoding(&response);

        let body = read_limited(response, self.max_body_bytes)
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Transport(describe_request_error(&e, timeout))
                } else {
                    FetchError::Parse(format!("failed to read body: {}", e))
                }
            })?;

        // Parsing is CPU-bound, keep it off the runtime workers
        tokio::task::spawn_blocking(move || {
            let (html, _, _) = encoding.decode(&body);
            extract_visible_text(&html)
        })
        .await
        .map_err(|e| FetchError::Parse(format!("text extraction failed: {}", e)))
    }
}

/// Reads the response body, keeping at most `limit` bytes
///
/// Stops reading once the limit is reached; the rest of the body is never
/// downloaded.
async fn read_limited(mut response: Response, limit: usize) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::new();

    while let Some(chunk) = response.chunk().await? {
        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            tracing::debug!("Body of {} cut at {} bytes", response.url(), limit);
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Picks the decoder named by the `Content-Type` charset, UTF-8 otherwise
fn response_encoding(response: &Response) -> &'static Encoding {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Extracts the `charset` parameter from a `Content-Type` value
fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Classifies a reqwest error into a short transport message
fn describe_request_error(error: &reqwest::Error, timeout: Duration) -> String {
    if error.is_timeout() {
        format!("request timed out after {}s", timeout.as_secs_f64())
    } else if error.is_connect() {
        format!("connection failed: {}", root_cause(error))
    } else if error.is_redirect() {
        format!("too many redirects (limit {})", MAX_REDIRECTS)
    } else {
        root_cause(error)
    }
}

/// Returns the innermost source message, which is usually the useful one
fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
