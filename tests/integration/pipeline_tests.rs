//! Integration tests for the labeling pipeline
//!
//! These tests use wiremock to serve both the pages and the classifier API,
//! and run whole jobs end-to-end through `run_job`.

use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use topic_sieve::config::{ClassifierConfig, Config, FetcherConfig};
use topic_sieve::pipeline::{run_job, HttpFetcher, JobSpec, JobSummary};
use topic_sieve::{GeminiClassifier, Label};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const API_KEY: &str = "test-key";
const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";

/// Replies `h` when the prompt mentions the keyword, `u` otherwise
struct KeywordReply(&'static str);

impl Respond for KeywordReply {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body = String::from_utf8_lossy(&request.body);
        let label = if body.contains(self.0) { "h" } else { "u" };
        ResponseTemplate::new(200).set_body_json(gemini_reply(label))
    }
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>t</title></head><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Creates a configuration pointing the classifier at the mock server
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.pipeline.concurrency = 4;
    config.pipeline.task_timeout_secs = 2;
    config.pipeline.stage_timeout_secs = 2;
    config.fetcher = FetcherConfig {
        user_agent: "TestBot/1.0".to_string(),
        ..FetcherConfig::default()
    };
    config.classifier = ClassifierConfig {
        model: "test-model".to_string(),
        api_base_url: format!("{}/v1beta", server.uri()),
        ..ClassifierConfig::default()
    };
    config
}

fn write_input(dir: &TempDir, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, lines.join("\n") + "\n").unwrap();
    path
}

async fn run(config: Config, input: PathBuf) -> JobSummary {
    let fetcher = HttpFetcher::new(&config.fetcher).unwrap();
    let classifier = GeminiClassifier::new(&config.classifier, API_KEY).unwrap();
    let job = JobSpec::new(input, config);

    run_job(&job, Arc::new(fetcher), Arc::new(classifier))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_full_run_labels_every_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/shop", html_page("<h1>Shop</h1><p>Buy cannabis online</p>")).await;
    mount_page(&server, "/garden", html_page("<p>Growing tomatoes in spring</p>")).await;
    mount_page(&server, "/empty", html_page("<script>var x = 1;</script>")).await;
    mount_page(&server, "/gone", ResponseTemplate::new(404)).await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", API_KEY))
        .respond_with(KeywordReply("cannabis"))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "drugs.txt",
        &[
            format!("{}/shop", base),
            format!("{}/garden", base),
            String::new(),
            format!("{}/empty", base),
            format!("{}/gone", base),
            "bad://".to_string(),
        ],
    );

    let summary = run(create_test_config(&server), input).await;

    let labels = fs::read_to_string(&summary.labels_path).unwrap();
    let expected = format!(
        "{base}/shop h\n{base}/garden u\n{base}/empty i\n{base}/gone i\nbad:// i\n",
        base = base
    );
    assert_eq!(labels, expected);

    assert_eq!(summary.labels_path, dir.path().join("drugs_labeled.txt"));
    assert_eq!(summary.stats.urls_total, 5);
    assert_eq!(summary.stats.error_count, 3);

    let report = fs::read_to_string(&summary.errors_path).unwrap();
    assert!(report.contains("Topic: drugs"));
    assert!(report.contains("Success rate: 40.00%"));
    assert!(report.contains("Worker count: 4"));
    assert!(report.contains("HTTP error: status 404"));
    assert!(report.contains("No text content extracted"));
    assert!(report.contains("validation - Connection error: 1"));
    assert!(report.contains(&format!("extraction | {}/empty | No text content extracted", base)));
}

#[tokio::test]
async fn test_classifier_error_keeps_unrelated_label() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/page", html_page("<p>Some text</p>")).await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "drugs.txt", &[format!("{}/page", base)]);

    let summary = run(create_test_config(&server), input).await;

    assert_eq!(summary.results[0].label, Label::Unrelated);
    let report = fs::read_to_string(&summary.errors_path).unwrap();
    assert!(report.contains("classification - Classifier API error: 1"));
    assert!(report.contains("Classifier API error: HTTP 500: internal"));
}

#[tokio::test]
async fn test_unexpected_reply_is_classification_error() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/page", html_page("<p>Some text</p>")).await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("p")))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "drugs.txt", &[format!("{}/page", base)]);

    let summary = run(create_test_config(&server), input).await;

    assert_eq!(summary.results[0].label, Label::Unrelated);
    let report = fs::read_to_string(&summary.errors_path).unwrap();
    assert!(report.contains("Classifier API error: unexpected reply 'p'"));
}

#[tokio::test]
async fn test_unknown_topic_never_calls_classifier() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/page", html_page("<p>Kittens</p>")).await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(KeywordReply("x"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "cats.txt", &[format!("{}/page", base)]);

    let summary = run(create_test_config(&server), input).await;

    assert_eq!(summary.topic, "cats");
    assert_eq!(summary.results[0].label, Label::Unrelated);
    let report = fs::read_to_string(&summary.errors_path).unwrap();
    assert!(report.contains("Unknown topic: cats"));
}

#[tokio::test]
async fn test_custom_topic_from_config() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/page", html_page("<p>Kittens for adoption</p>")).await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(KeywordReply("Kittens"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "cats.txt", &[format!("{}/page", base)]);
    let mut config = create_test_config(&server);
    config
        .topics
        .insert("cats".to_string(), "Pets, especially cats".to_string());

    let summary = run(config, input).await;

    assert_eq!(summary.results[0].label, Label::Hit);
    assert_eq!(summary.stats.error_count, 0);
}

#[tokio::test]
async fn test_slow_classifier_hits_task_timeout() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/page", html_page("<p>Some text</p>")).await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_reply("h"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let url = format!("{}/page", base);
    let input = write_input(&dir, "drugs.txt", &[url.clone()]);
    let mut config = create_test_config(&server);
    config.pipeline.task_timeout_secs = 1;
    config.pipeline.stage_timeout_secs = 1;

    let summary = run(config, input).await;

    let labels = fs::read_to_string(&summary.labels_path).unwrap();
    assert_eq!(labels, format!("{} i\n", url));
    let report = fs::read_to_string(&summary.errors_path).unwrap();
    assert!(report.contains(&format!("timeout | {} | Task timed out", url)));
}

#[tokio::test]
async fn test_output_dir_override() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(&server, "/gone", ResponseTemplate::new(404)).await;

    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "drugs.txt", &[format!("{}/gone", base)]);
    let out_dir = dir.path().join("out");
    let mut config = create_test_config(&server);
    config.report.output_dir = Some(out_dir.clone());

    let summary = run(config, input).await;

    assert_eq!(summary.labels_path, out_dir.join("drugs_labeled.txt"));
    assert_eq!(summary.errors_path, out_dir.join("drugs_error_messages.log"));
    assert!(summary.errors_path.exists());
}
