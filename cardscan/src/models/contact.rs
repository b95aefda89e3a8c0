use serde::{Deserialize, Deserializer, Serialize};

/// The fixed set of keys a business card can yield.
///
/// Declaration order is the canonical order used for JSON output, the
/// extraction schema and the system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Title,
    Company,
    Email,
    Phone,
    Mobile,
    Website,
    Address,
    Linkedin,
    Twitter,
    Other,
}

impl ContactField {
    pub const ALL: [ContactField; 11] = [
        ContactField::Name,
        ContactField::Title,
        ContactField::Company,
        ContactField::Email,
        ContactField::Phone,
        ContactField::Mobile,
        ContactField::Website,
        ContactField::Address,
        ContactField::Linkedin,
        ContactField::Twitter,
        ContactField::Other,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::Company => "company",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Mobile => "mobile",
            Self::Website => "website",
            Self::Address => "address",
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Other => "other",
        }
    }

    /// Description attached to the key in the extraction schema.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Name => "Full name of the person on the business card",
            Self::Title => "Job title of the person",
            Self::Company => "Company name",
            Self::Email => "Email address",
            Self::Phone => "Primary phone number",
            Self::Mobile => "Mobile/cell phone number if specifically labeled as such",
            Self::Website => "Website URL",
            Self::Address => "Physical address",
            Self::Linkedin => "LinkedIn profile URL or username",
            Self::Twitter => "Twitter/X handle or URL",
            Self::Other => "Any other social media or relevant information",
        }
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for ContactField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        ContactField::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| format!("Unknown contact field: {s}"))
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Unfiltered model output. Every key is present; absence is `""`.
///
/// Missing keys and JSON `null` both read as the empty string, so a model
/// that ignores the schema still produces a well-formed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExtraction {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mobile: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub linkedin: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub twitter: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub other: String,
}

impl RawExtraction {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Title => &self.title,
            ContactField::Company => &self.company,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Mobile => &self.mobile,
            ContactField::Website => &self.website,
            ContactField::Address => &self.address,
            ContactField::Linkedin => &self.linkedin,
            ContactField::Twitter => &self.twitter,
            ContactField::Other => &self.other,
        }
    }
}

/// Contact fields that carried data. Absent keys are omitted from JSON.
///
/// Blank values are never stored: [`ContactRecord::insert`] ignores them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[schema(example = json!({"name": "Jane Doe", "email": "jane@x.com"}))]
pub struct ContactRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    other: Option<String>,
}

impl ContactRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: ContactField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Stores `value` under `field`, replacing any previous value.
    /// Empty or whitespace-only values are ignored.
    pub fn insert(&mut self, field: ContactField, value: impl Into<String>) {
        let value = value.into();
        if value.trim().is_empty() {
            return;
        }
        *self.slot_mut(field) = Some(value);
    }

    pub fn with(mut self, field: ContactField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ContactField, &str)> + '_ {
        ContactField::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }

    fn slot(&self, field: ContactField) -> &Option<String> {
        match field {
            ContactField::Name => &self.name,
            ContactField::Title => &self.title,
            ContactField::Company => &self.company,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Mobile => &self.mobile,
            ContactField::Website => &self.website,
            ContactField::Address => &self.address,
            ContactField::Linkedin => &self.linkedin,
            ContactField::Twitter => &self.twitter,
            ContactField::Other => &self.other,
        }
    }

    fn slot_mut(&mut self, field: ContactField) -> &mut Option<String> {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Title => &mut self.title,
            ContactField::Company => &mut self.company,
            ContactField::Email => &mut self.email,
            ContactField::Phone => &mut self.phone,
            ContactField::Mobile => &mut self.mobile,
            ContactField::Website => &mut self.website,
            ContactField::Address => &mut self.address,
            ContactField::Linkedin => &mut self.linkedin,
            ContactField::Twitter => &mut self.twitter,
            ContactField::Other => &mut self.other,
        }
    }
}

impl<V: Into<String>> FromIterator<(ContactField, V)> for ContactRecord {
    fn from_iter<I: IntoIterator<Item = (ContactField, V)>>(iter: I) -> Self {
        let mut record = ContactRecord::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}
