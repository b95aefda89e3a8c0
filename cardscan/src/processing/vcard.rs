//! vCard 3.0 rendering.
//!
//! Output is a pure function of the [`ContactRecord`]: properties are always
//! emitted in the same order, lines are joined with `\n`, and there is no
//! trailing newline after `END:VCARD`. The `other` field is never rendered.

use std::borrow::Cow;
use std::fmt;

use crate::models::{ContactField, ContactRecord};

/// A rendered vCard, one property per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VCardDocument {
    lines: Vec<String>,
}

impl VCardDocument {
    pub fn render(contact: &ContactRecord) -> Self {
        let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];

        if let Some(name) = contact.get(ContactField::Name) {
            let name = single_line(name, " ");
            lines.push(format!("FN:{name}"));
            lines.push(format!("N:{}", structured_name(&name)));
        }

        let mut push = |field: ContactField, separator: &str, render: fn(&str) -> String| {
            if let Some(value) = contact.get(field) {
                lines.push(render(&single_line(value, separator)));
            }
        };

        push(ContactField::Title, " ", |v| format!("TITLE:{v}"));
        push(ContactField::Company, " ", |v| format!("ORG:{v}"));
        push(ContactField::Email, " ", |v| {
            format!("EMAIL;type=INTERNET;type=WORK:{v}")
        });
        push(ContactField::Phone, " ", |v| format!("TEL;type=WORK:{v}"));
        push(ContactField::Mobile, " ", |v| format!("TEL;type=CELL:{v}"));
        push(ContactField::Website, " ", |v| format!("URL:{v}"));
        push(ContactField::Address, ", ", |v| format!("ADR;type=WORK:;;{v};;;"));
        push(ContactField::Linkedin, " ", |v| {
            format!("X-SOCIALPROFILE;type=linkedin:{v}")
        });
        push(ContactField::Twitter, " ", |v| {
            format!("X-SOCIALPROFILE;type=twitter:{v}")
        });

        lines.push("END:VCARD".to_string());
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_string(self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for VCardDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// `N` value: `family;given;;;` for multi-word names, `name;;;;` otherwise.
fn structured_name(name: &str) -> String {
    let mut parts: Vec<&str> = name.split_whitespace().collect();
    match parts.pop() {
        Some(family) if !parts.is_empty() => format!("{family};{};;;", parts.join(" ")),
        _ => format!("{name};;;;"),
    }
}

/// Replaces each line break (`\r\n`, `\n` or a lone `\r`) with `separator`.
fn single_line<'a>(value: &'a str, separator: &str) -> Cow<'a, str> {
    if !value.contains(['\r', '\n']) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.replace("\r\n", "\n").replace(['\r', '\n'], separator))
}
