//! Pulls a JSON object out of free-form model output.

use serde_json::{Deserializer, Value};

use crate::error::ServiceError;

/// Joins the text chunks of one model reply in arrival order.
pub fn join_response_chunks<'a>(chunks: impl IntoIterator<Item = &'a str>) -> String {
    chunks.into_iter().collect()
}

/// Returns the first syntactically valid JSON object found in `text`.
///
/// Markdown code fences are tolerated because the scan starts at every `{`
/// and stops at the end of the first value that parses. Trailing prose after
/// the object is ignored.
pub fn extract_json_object(text: &str) -> Result<Value, ServiceError> {
    for (offset, _) in text.match_indices('{') {
        let mut values = Deserializer::from_str(&text[offset..]).into_iter::<Value>();
        if let Some(Ok(value @ Value::Object(_))) = values.next() {
            return Ok(value);
        }
    }

    Err(ServiceError::Extraction(format!(
        "no JSON object found in {} characters of model output",
        text.len()
    )))
}
