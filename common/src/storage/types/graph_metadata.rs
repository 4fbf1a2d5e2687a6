use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `@id`, `generatedBy` and `generatedAt` members shared by every graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "generatedBy")]
    pub generated_by: Value,
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
}

/// Wraps a query result with freshly generated graph metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    #[serde(flatten)]
    pub metadata: GraphMetadata,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Envelope<T> {
    pub fn new(metadata: GraphMetadata, body: T) -> Self {
        Self { metadata, body }
    }
}

/// ISO-8601 UTC timestamp with microsecond precision and a `Z` suffix.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
