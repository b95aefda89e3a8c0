use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::{parse_provider_model, VisionConfig};
use crate::error::{CardError, Result};
use crate::models::{RawExtraction, UploadedImage};
use crate::processing::intake::data_uri_mime;

use super::classify::{classify, UpstreamFailure};
use super::prompts::{business_card_schema, SCHEMA_NAME, SYSTEM_PROMPT, USER_PROMPT};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

/// Client for an OpenAI-compatible chat completions endpoint with vision.
#[derive(Clone, Debug)]
pub struct VisionApiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_tokens: u32,
    image_detail: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
    detail: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    schema: Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<Value>,
}

impl VisionApiClient {
    pub fn new(config: &VisionConfig) -> Result<Self> {
        let (provider, model) = parse_provider_model(&config.model);
        let provider = provider.to_lowercase();

        let needs_api_key = !matches!(provider.as_str(), "ollama" | "local" | "lmstudio");
        let api_key = config.api_key.clone().filter(|key| !key.trim().is_empty());
        if needs_api_key && api_key.is_none() {
            return Err(CardError::ExtractorUnavailable(format!(
                "API key required for provider '{provider}'"
            )));
        }

        let base_url = match (&config.base_url, provider.as_str()) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, "local") => {
                return Err(CardError::ExtractorUnavailable(format!(
                    "VISION_BASE_URL is required for model '{}'",
                    config.model
                )));
            }
            (None, other) => default_base_url(other).to_string(),
        };

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            CardError::ExtractorUnavailable(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model: model.to_string(),
            max_tokens: config.max_tokens,
            image_detail: config.image_detail.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One schema-constrained completion for `image`. Never retried.
    pub async fn extract(&self, image: &UploadedImage) -> Result<RawExtraction> {
        let request = self.build_request(image);
        let response = self.send(&request).await?;
        parse_completion(response)
    }

    pub(crate) fn build_request(&self, image: &UploadedImage) -> ChatRequest {
        let data_url = format!(
            "data:{};base64,{}",
            data_uri_mime(image.content_type()),
            STANDARD.encode(image.bytes())
        );

        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: USER_PROMPT.to_string(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: data_url,
                                detail: self.image_detail.clone(),
                            },
                        },
                    ]),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: SCHEMA_NAME.to_string(),
                    schema: business_card_schema(),
                    strict: true,
                },
            },
            max_tokens: self.max_tokens,
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let mut http_request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(request);
        if let Some(api_key) = &self.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        let response = http_request.send().await.map_err(|e| {
            let message = e.to_string();
            classify(&UpstreamFailure {
                status: e.status(),
                ..UpstreamFailure::from_message(&message)
            })
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error_body(status, &body));
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            CardError::Upstream(format!("Failed to decode chat completion response: {e}"))
        })
    }
}

fn classify_error_body(status: reqwest::StatusCode, body: &str) -> CardError {
    let envelope = serde_json::from_str::<ApiErrorEnvelope>(body).ok();

    let (message, error_type, code) = match &envelope {
        Some(ApiErrorEnvelope { error }) => (
            if error.message.is_empty() {
                format!("API request failed: {status}")
            } else {
                error.message.clone()
            },
            error.error_type.as_deref(),
            error.code.as_ref().map(|code| match code {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        ),
        None => (format!("API request failed: {status} - {body}"), None, None),
    };

    classify(&UpstreamFailure {
        status: Some(status),
        error_type,
        code: code.as_deref(),
        message: &message,
    })
}

/// Applies the completion checks in order: refusal, content filter,
/// truncation, then JSON parsing.
pub(crate) fn parse_completion(response: ChatResponse) -> Result<RawExtraction> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        CardError::MalformedModelOutput("completion contained no choices".to_string())
    })?;

    if let Some(refusal) = choice
        .message
        .refusal
        .filter(|refusal| !refusal.trim().is_empty())
    {
        return Err(CardError::ModelRefusal(refusal));
    }

    match choice.finish_reason.as_deref() {
        Some("content_filter") => return Err(CardError::ContentPolicyViolation),
        Some("length") => return Err(CardError::TruncatedResponse),
        _ => {}
    }

    let content = choice
        .message
        .content
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| {
            CardError::MalformedModelOutput("completion contained no content".to_string())
        })?;

    serde_json::from_str(&content).map_err(|e| {
        tracing::error!(
            response_len = content.len(),
            response_preview = %content.chars().take(100).collect::<String>(),
            error = %e,
            "Failed to parse extraction JSON"
        );
        CardError::MalformedModelOutput(e.to_string())
    })
}

fn default_base_url(provider: &str) -> &'static str {
    match provider {
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}
