//! JSON output formatting.

use anyhow::Result;
use covgate_provider::{ProviderError, SourceOutput};
use serde::Serialize;

use super::text::mask_token;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a single repository fetch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutput {
    pub repo: String,
    pub service: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Converts one fetch result to its output shape.
    pub fn fetch_output(
        &self,
        repo: &str,
        service: &str,
        result: &Result<SourceOutput, ProviderError>,
        reveal: bool,
    ) -> FetchOutput {
        match result {
            Ok(output) => {
                let upload_token = output.get("upload_token").map(|token| {
                    if reveal {
                        token.to_string()
                    } else {
                        mask_token(token)
                    }
                });

                FetchOutput {
                    repo: repo.to_string(),
                    service: service.to_string(),
                    ok: true,
                    upload_token,
                    id: Some(output.id.clone()),
                    error: None,
                    error_kind: None,
                }
            }
            Err(err) => {
                let error_kind = match err {
                    ProviderError::Fetch(fetch) => Some(fetch.kind().as_str().to_string()),
                    _ => None,
                };

                FetchOutput {
                    repo: repo.to_string(),
                    service: service.to_string(),
                    ok: false,
                    upload_token: None,
                    id: None,
                    error: Some(err.to_string()),
                    error_kind,
                }
            }
        }
    }

    /// Formats fetch results; one object for a single repo, else an array.
    pub fn format_fetch_results(&self, outputs: &[FetchOutput]) -> Result<String> {
        if outputs.len() == 1 {
            self.format(&outputs[0])
        } else {
            self.format(&outputs)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn sample_output() -> SourceOutput {
        let mut fields = BTreeMap::new();
        fields.insert("upload_token".to_string(), "36efc5a1".to_string());
        SourceOutput {
            id: "github/acme/widget".to_string(),
            fields,
        }
    }

    #[test]
    fn test_format_pretty() {
        let formatter = JsonFormatter::new(true);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_compact() {
        let formatter = JsonFormatter::new(false);
        let data = serde_json::json!({"key": "value"});
        let output = formatter.format(&data).unwrap();
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_fetch_output_masks_by_default() {
        let formatter = JsonFormatter::new(false);
        let result = Ok(sample_output());
        let output = formatter.fetch_output("acme/widget", "github", &result, false);

        assert!(output.ok);
        assert_eq!(output.upload_token.as_deref(), Some("****c5a1"));
        assert_eq!(output.id.as_deref(), Some("github/acme/widget"));
    }

    #[test]
    fn test_fetch_output_reveals_on_request() {
        let formatter = JsonFormatter::new(false);
        let result = Ok(sample_output());
        let output = formatter.fetch_output("acme/widget", "github", &result, true);

        assert_eq!(output.upload_token.as_deref(), Some("36efc5a1"));
    }

    #[test]
    fn test_fetch_output_carries_error_kind() {
        use covgate_fetch::{FetchError, StatusCode};

        let formatter = JsonFormatter::new(false);
        let result = Err(ProviderError::Fetch(FetchError::Unavailable(
            StatusCode::BAD_GATEWAY,
        )));
        let output = formatter.fetch_output("acme/widget", "github", &result, false);

        assert!(!output.ok);
        assert_eq!(output.error_kind.as_deref(), Some("temporary"));
        assert!(output.error.is_some());
        assert!(output.upload_token.is_none());
    }

    #[test]
    fn test_single_result_is_object() {
        let formatter = JsonFormatter::new(false);
        let outputs = vec![formatter.fetch_output("acme/widget", "github", &Ok(sample_output()), false)];

        let json = formatter.format_fetch_results(&outputs).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_object());
        assert_eq!(parsed["repo"], "acme/widget");
    }

    #[test]
    fn test_multiple_results_are_an_array() {
        let formatter = JsonFormatter::new(false);
        let outputs = vec![
            formatter.fetch_output("acme/widget", "github", &Ok(sample_output()), false),
            formatter.fetch_output("acme/gadget", "github", &Ok(sample_output()), false),
        ];

        let json = formatter.format_fetch_results(&outputs).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_array());
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }
}
