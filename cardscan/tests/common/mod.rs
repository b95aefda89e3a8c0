#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use cardscan::config::{Config, ServerConfig, VisionConfig};
use cardscan::error::{CardError, Result};
use cardscan::models::{RawExtraction, UploadedImage};
use cardscan::vision::{CardExtractor, ExtractorInfo};

pub const BOUNDARY: &str = "cardscan-test-boundary";

/// A single-file multipart body and its `Content-Type` header value.
pub fn multipart_body(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// A multipart body with one text field and no file.
pub fn multipart_text_only(field: &str, value: &str) -> (String, Vec<u8>) {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n--{BOUNDARY}--\r\n"
    );
    (
        format!("multipart/form-data; boundary={BOUNDARY}"),
        body.into_bytes(),
    )
}

pub fn jpeg_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.resize(len.max(4), 0x00);
    bytes
}

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_body_bytes: 10 * 1024 * 1024,
        },
        vision: VisionConfig {
            model: "openai/gpt-4o".to_string(),
            api_key: Some("test-key".to_string()),
            ..Default::default()
        },
    }
}

pub fn vision_config(base_url: String) -> VisionConfig {
    VisionConfig {
        model: "openai/gpt-4o".to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(base_url),
        timeout_secs: Some(5),
        ..Default::default()
    }
}

pub fn extraction_json(name: &str, email: &str) -> String {
    json!({
        "name": name,
        "title": "",
        "company": "",
        "email": email,
        "phone": "",
        "mobile": "",
        "website": "",
        "address": "",
        "linkedin": "",
        "twitter": "",
        "other": ""
    })
    .to_string()
}

pub fn completion_body(content: Option<&str>, refusal: Option<&str>, finish_reason: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-4o",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content,
                    "refusal": refusal
                },
                "finish_reason": finish_reason
            }
        ],
        "usage": {
            "prompt_tokens": 1,
            "completion_tokens": 1,
            "total_tokens": 2
        }
    })
}

pub fn api_error_body(message: &str, error_type: &str, code: Option<&str>) -> Value {
    json!({
        "error": {
            "message": message,
            "type": error_type,
            "param": Value::Null,
            "code": code
        }
    })
}

/// In-process extractor that counts calls and replays a fixed outcome.
pub struct FakeExtractor {
    outcome: fn() -> Result<RawExtraction>,
    calls: AtomicUsize,
}

impl FakeExtractor {
    pub fn new(outcome: fn() -> Result<RawExtraction>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardExtractor for FakeExtractor {
    async fn extract(&self, _image: &UploadedImage) -> Result<RawExtraction> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }

    fn info(&self) -> ExtractorInfo {
        ExtractorInfo {
            available: true,
            provider: Some("fake".to_string()),
            model: Some("fake-vision".to_string()),
            reason: None,
        }
    }
}

pub fn jane_doe() -> Result<RawExtraction> {
    Ok(RawExtraction {
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        ..Default::default()
    })
}

pub fn rate_limited() -> Result<RawExtraction> {
    Err(CardError::RateLimited {
        message: "Rate limit reached for gpt-4o".to_string(),
    })
}
