//! End-to-end HTTP tests.

mod common;

use congruence::lifecycle::ModelHandle;
use congruence::{CONGRUENCE_STATUS_HEADER, MockLanguageModel};
use serde_json::{Value, json};

use common::harness::{TestServerConfig, spawn_test_server};

async fn post_evaluate(server_url: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{server_url}/evaluate"))
        .json(&body)
        .send()
        .await
        .expect("request should reach the server")
}

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");

    let resp = reqwest::get(format!("{}/healthz", server.url())).await.unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_ready_endpoint_reflects_model_state() {
    let ready = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let unloaded = spawn_test_server(TestServerConfig::unloaded()).await.unwrap();

    let resp = reqwest::get(format!("{}/ready", ready.url())).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.json::<Value>().await.unwrap()["model"], "ready");

    let resp = reqwest::get(format!("{}/ready", unloaded.url())).await.unwrap();
    assert_eq!(resp.status(), 503);
    assert_eq!(resp.json::<Value>().await.unwrap()["model"], "unloaded");
}

#[tokio::test]
async fn test_root_banner() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();

    let resp = reqwest::get(server.url()).await.unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["model"], "PlanTL-GOB-ES/gpt2-base-bne");
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn test_coherent_sentence_scores_near_ten() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();

    let resp = post_evaluate(&server.url(), json!({ "text": "El gato come pescado." })).await;

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get(CONGRUENCE_STATUS_HEADER)
            .and_then(|v| v.to_str().ok()),
        Some("scored")
    );
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["evaluated_text"], "El gato come pescado.");
    assert!(body["congruence_score"].as_f64().unwrap() >= 9.0);
    let perplexity = body["computed_perplexity"].as_f64().unwrap();
    assert!(perplexity >= 0.0 && perplexity < 700.0);
}

#[tokio::test]
async fn test_gibberish_scores_near_one() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();

    let resp = post_evaluate(
        &server.url(),
        json!({ "text": "pescado pescado pescado xyz #@!" }),
    )
    .await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["congruence_score"].as_f64().unwrap() <= 2.0);
    let perplexity = body["computed_perplexity"].as_f64().unwrap();
    assert!(perplexity >= 700.0 || perplexity == -1.0);
}

#[tokio::test]
async fn test_whitespace_text_is_rejected() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();

    let resp = post_evaluate(&server.url(), json!({ "text": "   " })).await;

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_unloaded_model_returns_503_for_any_text() {
    let server = spawn_test_server(TestServerConfig::unloaded()).await.unwrap();

    for text in ["El gato come pescado.", "   "] {
        let resp = post_evaluate(&server.url(), json!({ "text": text })).await;
        assert_eq!(resp.status(), 503, "text = {text:?}");
    }
}

#[tokio::test]
async fn test_malformed_bodies_are_rejected() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/evaluate", server.url()))
        .header("Content-Type", "application/json")
        .body("{\"text\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = post_evaluate(&server.url(), json!({ "texto": "hola" })).await;
    assert_eq!(resp.status(), 400);

    let resp = post_evaluate(&server.url(), json!({ "text": ["hola"] })).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_internal_failure_yields_floor_score() {
    let config = TestServerConfig::default()
        .with_handle(ModelHandle::ready(MockLanguageModel::failing_tokenization()));
    let server = spawn_test_server(config).await.unwrap();

    let resp = post_evaluate(&server.url(), json!({ "text": "hola mundo" })).await;

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["congruence_score"], 1.0);
    assert_eq!(body["computed_perplexity"], -1.0);
}

#[tokio::test]
async fn test_concurrent_requests_share_the_model() {
    let server = spawn_test_server(TestServerConfig::default()).await.unwrap();
    let url = server.url();

    let requests = (0..8).map(|i| {
        let url = url.clone();
        tokio::spawn(async move {
            let text = if i % 2 == 0 {
                "El gato duerme."
            } else {
                "zzz qqq"
            };
            let resp = post_evaluate(&url, json!({ "text": text })).await;
            let body: Value = resp.json().await.unwrap();
            (i, body["congruence_score"].as_f64().unwrap())
        })
    });

    for request in requests.collect::<Vec<_>>() {
        let (i, score) = request.await.unwrap();
        let expected = if i % 2 == 0 { 10.0 } else { 1.0 };
        assert_eq!(score, expected, "request {i}");
    }

    server.shutdown().await;
}
