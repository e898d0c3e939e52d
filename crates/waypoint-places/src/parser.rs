//! Free-text attraction list parser.
//!
//! Model output looks like:
//!
//! ```text
//! Here are some highlights:
//! 1. **Eiffel Tower**
//! Iconic wrought-iron landmark on the Champ de Mars.
//! *Type:* Historical
//! 2. Louvre
//! ```
//!
//! A line starting with `<integer>.` opens a record, the first other
//! non-empty line is its description, and a `type:` line sets its category.
//! Everything else is ignored. Parsing never fails.
//!
//! The integer is ASCII digits only. A period followed directly by another
//! digit (`2.5 km`) reads as a decimal number, not an entry.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub name: String,
    /// Empty when the entry had no description line
    pub description: String,
    /// Empty when the entry had no `Type:` line
    pub category: String,
}

impl PlaceRecord {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

#[allow(clippy::expect_used)]
fn entry_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // "12. Name", "3." and "4.Name" but not "2.5 km from the centre"
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.(?:\s+(.*)|([^0-9\s].*))?$").expect("valid entry regex"))
}

#[allow(clippy::expect_used)]
fn category_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\btype:\s*(.*)$").expect("valid category regex"))
}

/// Remove markdown emphasis (`*`, `**`, `_`, `__`) around words and
/// collapse runs of whitespace.
fn strip_emphasis(line: &str) -> String {
    line.replace('*', "")
        .split_whitespace()
        .map(|word| word.trim_matches('_'))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a numbered free-text list into place records, in encounter order.
pub fn parse_places(text: &str) -> Vec<PlaceRecord> {
    let mut places = Vec::new();
    let mut current: Option<PlaceRecord> = None;

    for raw in text.lines() {
        let line = strip_emphasis(raw);

        if let Some(caps) = entry_start().captures(&line) {
            if let Some(done) = current.take() {
                places.push(done);
            }
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().trim())
                .unwrap_or_default();
            current = Some(PlaceRecord::named(name));
            continue;
        }

        let Some(record) = current.as_mut() else {
            continue;
        };

        if line.is_empty() {
            continue;
        }

        if let Some(caps) = category_token().captures(&line) {
            if let Some(category) = caps.get(1) {
                record.category = category.as_str().trim().to_string();
            }
        } else if record.description.is_empty() {
            record.description = line;
        }
    }

    if let Some(done) = current {
        places.push(done);
    }

    places
}
