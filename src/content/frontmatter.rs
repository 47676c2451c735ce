//! Front-matter parsing
//!
//! Post fragments open with a YAML block delimited by `---` lines. The block
//! carries the post's metadata; everything after it is template source.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

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

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
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

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post fragment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    pub summary: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from a fragment source
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let trimmed = content.trim_start();

        let Some(rest) = trimmed.strip_prefix("---") else {
            return (FrontMatter::default(), content);
        };
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end_pos) = rest.find("\n---") else {
            // No closing ---, treat as no front-matter
            return (FrontMatter::default(), content);
        };

        let yaml_content = &rest[..end_pos];
        let remaining = rest[end_pos + 4..].trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return (FrontMatter::default(), remaining);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => (fm, remaining),
            Err(e) => {
                tracing::warn!("Failed to parse YAML front-matter, treating as content: {}", e);
                (FrontMatter::default(), content)
            }
        }
    }

    /// Parse the date string into a DateTime
    pub fn parse_date(&self) -> Option<DateTime<Local>> {
        self.date.as_ref().and_then(|s| parse_date_string(s))
    }
}

/// Parse a date string in various formats
fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y-%m-%dT%H:%M:%S",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(
                dt,
                *Local::now().offset(),
            ));
        }
        // Try parsing date only
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, fmt) {
            let dt = d.and_hms_opt(0, 0, 0)?;
            return Some(DateTime::from_naive_utc_and_offset(
                dt,
                *Local::now().offset(),
            ));
        }
    }

    // Try RFC 3339 / ISO 8601
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    None
}
