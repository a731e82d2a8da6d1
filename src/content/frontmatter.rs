//! Front-matter parsing
//!
//! A content file looks like:
//!
//! ```text
//! +++
//! title = "Hello"
//! date = 2024-01-15T10:30:00Z
//! tags = ["rust", "notes"]
//! +++
//! Markdown body...
//! ```
//!
//! Anything above the first delimiter is ignored.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Token that opens and closes the metadata block
pub const DELIMITER: &str = "+++";

/// Why a content file's front-matter was rejected
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("expected two `+++` delimiter lines, found {0}")]
    MissingDelimiters(usize),

    #[error("invalid metadata: {0}")]
    Metadata(#[from] toml::de::Error),

    #[error("missing required `date` field")]
    MissingDate,

    #[error("cannot parse `{0}` as a date")]
    InvalidDate(String),

    #[error("{field} `{value}` cannot be used as a path segment")]
    InvalidSegment { field: &'static str, value: String },
}

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Metadata block exactly as written
#[derive(Debug, Deserialize)]
struct RawFrontMatter {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    date: Option<toml::Value>,
    #[serde(deserialize_with = "string_or_vec", default)]
    tags: Vec<String>,
}

/// Validated front-matter of one content file
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Trimmed; `None` when absent or blank
    pub category: Option<String>,
    pub date: DateTime<FixedOffset>,
    /// Trimmed, blanks removed, in source order
    pub tags: Vec<String>,
}

impl FrontMatter {
    /// Split a content file into its front-matter and Markdown body.
    ///
    /// The body keeps its original line breaks.
    pub fn parse(content: &str) -> Result<(Self, String), FrontMatterError> {
        let lines: Vec<&str> = content.split_inclusive('\n').collect();

        let delimiters: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.starts_with(DELIMITER))
            .map(|(i, _)| i)
            .take(2)
            .collect();

        let (open, close) = match delimiters[..] {
            [open, close] => (open, close),
            _ => return Err(FrontMatterError::MissingDelimiters(delimiters.len())),
        };

        let metadata = lines[open + 1..close].concat();
        let body = lines[close + 1..].concat();

        let raw: RawFrontMatter = toml::from_str(&metadata)?;
        Ok((Self::validate(raw)?, body))
    }

    fn validate(raw: RawFrontMatter) -> Result<Self, FrontMatterError> {
        let date = raw
            .date
            .as_ref()
            .ok_or(FrontMatterError::MissingDate)
            .and_then(parse_date_value)?;

        let category = match raw.category.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(category) => Some(check_segment("category", category)?.to_string()),
        };

        let tags = raw
            .tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(|tag| check_segment("tag", tag).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: raw.title,
            description: raw.description,
            category,
            date,
            tags,
        })
    }
}

/// Category and tag names become directory names in the output tree
fn check_segment<'a>(field: &'static str, value: &'a str) -> Result<&'a str, FrontMatterError> {
    if value == "." || value == ".." || value.contains(['/', '\\']) {
        return Err(FrontMatterError::InvalidSegment {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn parse_date_value(value: &toml::Value) -> Result<DateTime<FixedOffset>, FrontMatterError> {
    let text = match value {
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::String(s) => s.clone(),
        other => return Err(FrontMatterError::InvalidDate(other.to_string())),
    };
    parse_date_string(&text).ok_or(FrontMatterError::InvalidDate(text))
}

/// Parse a date string in various formats. Values without an offset are taken as UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }

    let offset_formats = ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    let naive_formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];
    for fmt in naive_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().fixed_offset());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%B %d, %Y"];
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset());
        }
    }

    None
}
