use crate::error::{CardError, Result};
use crate::models::{ContactField, ContactRecord, RawExtraction};

/// Drops blank fields from a raw extraction.
///
/// Values are trimmed; a value that is empty after trimming is treated as
/// absent. Fails with [`CardError::NoDataExtracted`] when nothing is left.
pub fn normalize(raw: &RawExtraction) -> Result<ContactRecord> {
    let contact: ContactRecord = ContactField::ALL
        .into_iter()
        .map(|field| (field, raw.get(field).trim()))
        .filter(|(_, value)| !value.is_empty())
        .collect();

    if contact.is_empty() {
        return Err(CardError::NoDataExtracted);
    }

    Ok(contact)
}
