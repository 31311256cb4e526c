//! Envelope wire types.
//!
//! The persisted document looks like:
//!
//! ```json
//! { "pages": [ { "page_number": 1, "next_page": true, "csv_data": "aWQsY291bnRyeS..." } ] }
//! ```
//!
//! `next_page` is read leniently: older producers wrote `1`/`0` instead of booleans, so any JSON
//! value is accepted and reduced to its truthiness (see [`is_truthy`]). A missing flag is falsy.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// The full wire-format container holding all pages plus continuation metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Page records in stored order.
    pub pages: Vec<PageRecord>,
}

impl Envelope {
    /// Number of page records in the envelope.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Parse an envelope from a JSON document.
    ///
    /// Returns [`PipelineError::MalformedEnvelope`] if the document has no `pages` array and
    /// [`PipelineError::Json`] if it is not valid JSON or a page has the wrong shape.
    pub fn from_json_str(input: &str) -> PipelineResult<Self> {
        let doc: serde_json::Value = serde_json::from_str(input)?;
        if !doc.get("pages").is_some_and(serde_json::Value::is_array) {
            return Err(PipelineError::MalformedEnvelope {
                page_number: 0,
                message: "document has no 'pages' array".to_string(),
            });
        }
        Ok(serde_json::from_value(doc)?)
    }

    /// Serialize the envelope to a JSON document.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// One transported page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-based page number.
    pub page_number: u32,
    /// Continuation flag: `false` tells the decoder to stop after this page.
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub next_page: bool,
    /// Base64-encoded CSV text of exactly one page.
    ///
    /// `None` only for envelopes read from a document that omitted the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_data: Option<String>,
}

impl PageRecord {
    /// Create a page record with encoded CSV data.
    pub fn new(page_number: u32, next_page: bool, csv_data: impl Into<String>) -> Self {
        Self {
            page_number,
            next_page,
            csv_data: Some(csv_data.into()),
        }
    }
}

/// Truthiness of a JSON value as used for the continuation flag.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are falsy; everything else is truthy.
pub fn is_truthy(v: &serde_json::Value) -> bool {
    match v {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(items) => !items.is_empty(),
        serde_json::Value::Object(map) => !map.is_empty(),
    }
}

fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    Ok(is_truthy(&v))
}
