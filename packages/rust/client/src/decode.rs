//! Response body decoding for the requirements endpoint.

use reqfinder_shared::{ReqFinderError, RequirementsDocument, Result};
use serde_json::Value;

/// Decode a response body into a [`RequirementsDocument`].
///
/// The backend reports its own parse failures with a success status and a
/// body of the form `{ product_type, market, error, raw_response }`; that
/// shape is surfaced as a decode error carrying the backend's message.
pub(crate) fn decode_document(body: &str) -> Result<RequirementsDocument> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ReqFinderError::decode(format!("body is not JSON: {e}")))?;

    if let Some(message) = backend_error(&value) {
        return Err(ReqFinderError::decode(format!("backend reported: {message}")));
    }

    serde_json::from_value(value)
        .map_err(|e| ReqFinderError::decode(format!("unexpected document shape: {e}")))
}

fn backend_error(value: &Value) -> Option<&str> {
    let object = value.as_object()?;
    if object.contains_key("requirements") {
        return None;
    }
    object.get("error").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_document() {
        let body = r#"{
            "product_type": "toys",
            "market": "Brazil",
            "summary": "INMETRO applies.",
            "requirements": [
                {"name": "INMETRO", "category": "Safety", "description": "Mark", "source": "https://www.gov.br/inmetro"}
            ]
        }"#;
        let doc = decode_document(body).expect("decode");
        assert_eq!(doc.market, "Brazil");
        assert_eq!(
            doc.requirements[0].source.as_deref(),
            Some("https://www.gov.br/inmetro")
        );
    }

    #[test]
    fn html_body_is_decode_error() {
        let err = decode_document("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ReqFinderError::Decode { .. }));
        assert!(err.to_string().contains("not JSON"));
    }

    #[test]
    fn backend_error_shape_is_decode_error() {
        let body = r#"{
            "product_type": "toys",
            "market": "Brazil",
            "error": "JSON parsing error: Expecting value: line 1 column 1 (char 0)",
            "raw_response": "Sorry, I cannot help with that."
        }"#;
        let err = decode_document(body).unwrap_err();
        assert!(err.to_string().contains("backend reported: JSON parsing error"));
    }

    #[test]
    fn missing_required_field_is_decode_error() {
        let body = r#"{
            "product_type": "toys",
            "market": "Brazil",
            "summary": "x",
            "requirements": [{"name": "INMETRO", "description": "Mark"}]
        }"#;
        let err = decode_document(body).unwrap_err();
        assert!(err.to_string().contains("category"));
    }
}
