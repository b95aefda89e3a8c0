//! Vision API client against a mocked chat completions endpoint.

mod common;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cardscan::error::CardError;
use cardscan::models::UploadedImage;
use cardscan::vision::{CardExtractor, VisionApiClient, VisionProvider};

use common::{api_error_body, completion_body, extraction_json, vision_config};

fn card_image() -> UploadedImage {
    UploadedImage::new(
        common::jpeg_bytes(64),
        "image/jpeg",
        Some("card.jpg".to_string()),
    )
}

async fn client_for(server: &MockServer) -> VisionApiClient {
    VisionApiClient::new(&vision_config(server.uri())).unwrap()
}

async fn mount_completion(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_extract_sends_schema_request_and_parses_fields() {
    let server = MockServer::start().await;
    let content = extraction_json("Jane Doe", "jane@x.com");

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "max_tokens": 1000,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "business_card_data",
                    "strict": true
                }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body(Some(content.as_str()), None, "stop")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let raw = client_for(&server).await.extract(&card_image()).await.unwrap();

    assert_eq!(raw.name, "Jane Doe");
    assert_eq!(raw.email, "jane@x.com");
    assert_eq!(raw.phone, "");
}

#[tokio::test]
async fn test_extract_embeds_image_as_data_uri() {
    let server = MockServer::start().await;
    let content = extraction_json("Jane Doe", "");
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(completion_body(Some(content.as_str()), None, "stop")),
    )
    .await;

    client_for(&server).await.extract(&card_image()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let url = body["messages"][1]["content"][1]["image_url"]["url"]
        .as_str()
        .unwrap();
    assert!(url.starts_with("data:image/jpeg;base64,"));
    assert_eq!(body["messages"][1]["content"][1]["image_url"]["detail"], "high");
    assert_eq!(body["messages"][0]["role"], "system");
}

#[tokio::test]
async fn test_refusal_maps_to_model_refusal() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(completion_body(
            None,
            Some("I can't help with that."),
            "stop",
        )),
    )
    .await;

    let result = client_for(&server).await.extract(&card_image()).await;
    match result {
        Err(CardError::ModelRefusal(reason)) => assert_eq!(reason, "I can't help with that."),
        other => panic!("expected ModelRefusal, got {other:?}"),
    }
}

#[tokio::test]
async fn test_content_filter_maps_to_policy_violation() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(completion_body(None, None, "content_filter")),
    )
    .await;

    let result = client_for(&server).await.extract(&card_image()).await;
    assert!(matches!(result, Err(CardError::ContentPolicyViolation)));
}

#[tokio::test]
async fn test_length_finish_maps_to_truncated() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(completion_body(
            Some("{\"name\": \"Jane"),
            None,
            "length",
        )),
    )
    .await;

    let result = client_for(&server).await.extract(&card_image()).await;
    assert!(matches!(result, Err(CardError::TruncatedResponse)));
}

#[tokio::test]
async fn test_non_json_content_is_malformed_output() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(completion_body(
            Some("Here is the card: Jane Doe"),
            None,
            "stop",
        )),
    )
    .await;

    let result = client_for(&server).await.extract(&card_image()).await;
    assert!(matches!(result, Err(CardError::MalformedModelOutput(_))));
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(401).set_body_json(api_error_body(
            "Incorrect API key provided: sk-bad",
            "invalid_request_error",
            Some("invalid_api_key"),
        )),
    )
    .await;

    let result = client_for(&server).await.extract(&card_image()).await;
    match result {
        Err(CardError::AuthenticationError { message }) => {
            assert!(message.contains("Incorrect API key"))
        }
        other => panic!("expected AuthenticationError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(429).set_body_json(api_error_body(
            "Rate limit reached for gpt-4o",
            "requests",
            Some("rate_limit_exceeded"),
        )),
    )
    .await;

    let result = client_for(&server).await.extract(&card_image()).await;
    assert!(matches!(result, Err(CardError::RateLimited { .. })));
}

#[tokio::test]
async fn test_provider_payload_limit_maps_to_payload_too_large() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(413).set_body_string("Request Entity Too Large"),
    )
    .await;

    let result = client_for(&server).await.extract(&card_image()).await;
    assert!(matches!(result, Err(CardError::PayloadTooLarge { .. })));
}

#[tokio::test]
async fn test_schema_rejection_maps_to_invalid_request_schema() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(400).set_body_json(api_error_body(
            "Invalid schema for response_format 'business_card_data'",
            "invalid_request_error",
            Some("invalid_json_schema"),
        )),
    )
    .await;

    let result = client_for(&server).await.extract(&card_image()).await;
    assert!(matches!(result, Err(CardError::InvalidRequestSchema { .. })));
}

#[tokio::test]
async fn test_server_error_is_upstream_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(api_error_body(
            "The server had an error while processing your request",
            "server_error",
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).await.extract(&card_image()).await;
    match result {
        Err(CardError::Upstream(message)) => assert!(message.contains("server had an error")),
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn test_policy_message_without_code_maps_to_policy_violation() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(400).set_body_json(api_error_body(
            "The image contains content that violates usage policies",
            "invalid_request_error",
            None,
        )),
    )
    .await;

    let result = client_for(&server).await.extract(&card_image()).await;
    assert!(matches!(result, Err(CardError::ContentPolicyViolation)));
}

#[tokio::test]
async fn test_not_a_business_card_message_is_recognized() {
    let server = MockServer::start().await;
    mount_completion(
        &server,
        ResponseTemplate::new(400).set_body_json(api_error_body(
            "This is not a business card",
            "invalid_request_error",
            None,
        )),
    )
    .await;

    let result = client_for(&server).await.extract(&card_image()).await;
    match result {
        Err(error @ CardError::NotABusinessCard { .. }) => assert_eq!(
            error.to_string(),
            "The uploaded image does not appear to be a business card"
        ),
        other => panic!("expected NotABusinessCard, got {other:?}"),
    }
}

#[tokio::test]
async fn test_provider_delegates_to_api_backend() {
    let server = MockServer::start().await;
    let content = extraction_json("Ada Lovelace", "ada@example.com");
    mount_completion(
        &server,
        ResponseTemplate::new(200).set_body_json(completion_body(Some(content.as_str()), None, "stop")),
    )
    .await;

    let provider = VisionProvider::new(&vision_config(server.uri()));
    assert!(provider.is_available());

    let raw = provider.extract(&card_image()).await.unwrap();
    assert_eq!(raw.name, "Ada Lovelace");
}
