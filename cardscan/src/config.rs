use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}

pub const DEFAULT_VISION_MODEL: &str = "openai/gpt-4o";

/// Request bodies above this are cut off by the router before the
/// intake validator sees them.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub vision: VisionConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

/// Vision model configuration for card extraction
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    // No timeout unless set; the HTTP client default applies
    pub timeout_secs: Option<u64>,
    pub max_tokens: u32,
    /// `image_url.detail` sent with the card photo (`low`, `high` or `auto`).
    pub image_detail: String,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_VISION_MODEL.to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: None,
            max_tokens: 1000,
            image_detail: "high".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("CARDSCAN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PORT", 3000),
                max_body_bytes: parse_env_or("CARDSCAN_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
            },
            vision: VisionConfig {
                model: non_empty_env("VISION_MODEL")
                    .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
                api_key: non_empty_env("VISION_API_KEY").or_else(|| non_empty_env("OPENAI_API_KEY")),
                base_url: non_empty_env("VISION_BASE_URL"),
                timeout_secs: parse_env_opt("VISION_TIMEOUT"),
                max_tokens: parse_env_or("VISION_MAX_TOKENS", 1000),
                image_detail: env::var("VISION_IMAGE_DETAIL").unwrap_or_else(|_| "high".to_string()),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Vision providers that speak the OpenAI chat completions API
pub const KNOWN_VISION_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse a vision model name into (provider, model) tuple.
pub fn parse_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_VISION_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Unknown prefix: the whole string is a model on a custom endpoint
    ("local", model)
}
