//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use covgate_provider::SourceRegistry;

    #[test]
    fn test_schema_render_lists_fields() {
        let formatter = TextFormatter::new(false);
        let source = SourceRegistry::get("codecov_settings").unwrap();
        let output = formatter.format_schema(source.schema());

        assert!(output.contains("codecov_settings"));
        assert!(output.contains("service"));
        assert!(output.contains("owner"));
        assert!(output.contains("repo"));
        assert!(output.contains("upload_token"));
        assert!(output.contains("(sensitive)"));
    }

    #[test]
    fn test_schema_render_shows_modes() {
        let formatter = TextFormatter::new(false);
        let source = SourceRegistry::get("codecov_settings").unwrap();
        let output = formatter.format_schema(source.schema());

        assert!(output.contains("required"));
        assert!(output.contains("computed"));
    }

    #[test]
    fn test_schema_render_without_colors_has_no_escapes() {
        let formatter = TextFormatter::new(false);
        let source = SourceRegistry::get("codecov_settings").unwrap();
        let output = formatter.format_schema(source.schema());

        assert!(!output.contains("\x1b["));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use covgate_provider::SourceRegistry;

    #[test]
    fn test_schema_serializes_to_json() {
        let formatter = JsonFormatter::new(false);
        let source = SourceRegistry::get("codecov_settings").unwrap();
        let output = formatter.format(source.schema()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["name"], "codecov_settings");
        assert!(parsed["fields"].is_array());
    }

    #[test]
    fn test_fetch_output_uses_camel_case_keys() {
        use covgate_fetch::{FetchError, StatusCode};
        use covgate_provider::ProviderError;

        let formatter = JsonFormatter::new(false);
        let result = Err(ProviderError::Fetch(FetchError::Redirected(
            StatusCode::TEMPORARY_REDIRECT,
        )));
        let output = formatter.fetch_output("acme/widget", "github", &result, false);
        let json = formatter.format(&output).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("errorKind").is_some());
        assert!(parsed.get("error_kind").is_none());
    }
}
