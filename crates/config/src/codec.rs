//! Text encoding of the assistant config document.

use azure_setup_domain::ConfigDocument;
use azure_setup_shared::{ErrorClass, ErrorCode, ErrorEnvelope};

/// Outcome of decoding config file text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedDocument {
    /// The text held a JSON object.
    Parsed(ConfigDocument),
    /// The text was not a JSON object.
    Malformed {
        /// Parser diagnostic, safe to log.
        reason: String,
    },
}

/// Decode config file text. Never fails; bad input is reported as `Malformed`.
pub fn decode_document(text: &str) -> DecodedDocument {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => ConfigDocument::from_value(value).map_or_else(
            || DecodedDocument::Malformed {
                reason: "top-level value is not a JSON object".to_string(),
            },
            DecodedDocument::Parsed,
        ),
        Err(error) => DecodedDocument::Malformed {
            reason: error.to_string(),
        },
    }
}

/// Serialize as pretty JSON (two-space indent, trailing newline).
pub fn encode_document(document: &ConfigDocument) -> Result<String, ErrorEnvelope> {
    let mut output = serde_json::to_string_pretty(document.as_map()).map_err(|error| {
        ErrorEnvelope::unexpected(
            ErrorCode::internal(),
            format!("failed to serialize config: {error}"),
            ErrorClass::NonRetriable,
        )
    })?;
    output.push('\n');
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn objects_decode() {
        let decoded = decode_document(r#"{ "theme": "dark" }"#);
        assert!(matches!(decoded, DecodedDocument::Parsed(doc) if !doc.is_empty()));
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(matches!(
            decode_document("{ not json"),
            DecodedDocument::Malformed { .. }
        ));
        assert!(matches!(decode_document(""), DecodedDocument::Malformed { .. }));
    }

    #[test]
    fn non_object_json_is_malformed() {
        let decoded = decode_document("[1, 2, 3]");
        assert!(matches!(
            decoded,
            DecodedDocument::Malformed { reason } if reason.contains("not a JSON object")
        ));
    }

    #[test]
    fn encoding_keeps_key_order_and_ends_with_newline() -> Result<(), ErrorEnvelope> {
        let text = "{\n  \"zeta\": 1,\n  \"alpha\": {\n    \"b\": true,\n    \"a\": null\n  }\n}\n";
        let DecodedDocument::Parsed(document) = decode_document(text) else {
            return Err(ErrorEnvelope::invariant(ErrorCode::internal(), "fixture must parse"));
        };

        assert_eq!(encode_document(&document)?, text);
        Ok(())
    }
}
