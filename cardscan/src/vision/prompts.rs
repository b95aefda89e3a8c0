//! Prompt and response schema for business card extraction
//!
//! The schema is a hard contract with the model: every key in
//! [`ContactField::ALL`] is a required string and nothing else is allowed,
//! so a well-behaved response always deserializes into a
//! [`RawExtraction`](crate::models::RawExtraction).

use serde_json::{json, Map, Value};

use crate::models::ContactField;

/// Name of the strict JSON schema sent with each request.
pub const SCHEMA_NAME: &str = "business_card_data";

/// Text part of the user message that carries the card image.
pub const USER_PROMPT: &str = "Extract all contact information from this business card.";

/// System instruction describing each key and the empty-string convention.
pub const SYSTEM_PROMPT: &str = r#"You are a business card analyzer. Extract all contact information from the business card image, including:
- name: Full name of the person
- title: Job title
- company: Company name
- email: Email address
- phone: Phone number
- mobile: Mobile phone if labeled as such
- website: Website URL
- address: Physical address
- linkedin: LinkedIn profile
- twitter: Twitter/X handle
- other: Any other social media or contact information

For any fields not present in the image, return an empty string."#;

/// Build the JSON schema for the `response_format` of an extraction request
///
/// # Example
/// ```
/// use cardscan::vision::prompts::business_card_schema;
///
/// let schema = business_card_schema();
/// assert_eq!(schema["required"].as_array().unwrap().len(), 11);
/// assert_eq!(schema["additionalProperties"], false);
/// ```
pub fn business_card_schema() -> Value {
    let properties: Map<String, Value> = ContactField::ALL
        .iter()
        .map(|field| {
            (
                field.key().to_string(),
                json!({ "type": "string", "description": field.description() }),
            )
        })
        .collect();

    let required: Vec<&str> = ContactField::ALL.iter().map(|field| field.key()).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}
