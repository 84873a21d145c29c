//! Storage codec for list-valued fields.
//!
//! `features`, `techStack`, `screenshots` and `focusAreas` are persisted as a TEXT
//! column holding a JSON array. Every repository goes through these two functions
//! so the encoding lives in exactly one place.

/// Encodes an ordered list of strings for storage. An empty list becomes `[]`, never NULL.
pub fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Decodes a stored list. NULL, blank or unparseable storage yields an empty list.
pub fn decode_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "discarding malformed list column");
            Vec::new()
        }
    }
}
