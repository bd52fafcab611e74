//! Text output formatting with colors and token masking.

use covgate_provider::{FieldMode, ProviderError, SourceOutput, SourceSchema};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Masks a sensitive value, keeping the last four characters.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats one successful repository fetch.
    pub fn format_fetch(
        &self,
        repo: &str,
        service: &str,
        output: &SourceOutput,
        reveal: bool,
    ) -> String {
        let mut lines = Vec::new();

        // Header: "acme/widget (github)"
        lines.push(format!("{} ({})", self.bold(repo), service));

        if let Some(token) = output.get("upload_token") {
            let shown = if reveal {
                token.to_string()
            } else {
                mask_token(token)
            };
            lines.push(format!("  Upload token: {}", self.cyan(&shown)));
        }

        lines.join("\n")
    }

    /// Formats a failed repository fetch.
    pub fn format_error(&self, repo: &str, error: &ProviderError) -> String {
        let kind = match error {
            ProviderError::Fetch(fetch) => Some(fetch.kind()),
            _ => None,
        };

        let mut line = format!("{}: {} - {}", self.bold(repo), self.red("Error"), error);
        if let Some(kind) = kind {
            line.push_str(&format!(" [{}]", self.dim(kind.as_str())));
        }
        line
    }

    /// Formats a data source schema block.
    pub fn format_schema(&self, schema: &SourceSchema) -> String {
        let mut lines = Vec::new();

        lines.push(self.bold(schema.name));
        lines.push(format!("  {}", self.dim(schema.description)));
        lines.push(String::new());
        lines.push(format!(
            "  {:<14} {:<10} {}",
            self.bold("Field"),
            self.bold("Mode"),
            self.bold("Description")
        ));

        for field in &schema.fields {
            let mode = match field.mode {
                FieldMode::Required => "required",
                FieldMode::Optional => "optional",
                FieldMode::Computed => "computed",
            };
            let sensitive = if field.sensitive { " (sensitive)" } else { "" };
            lines.push(format!(
                "  {:<14} {:<10} {}{}",
                field.name, mode, field.description, sensitive
            ));
        }

        lines.join("\n")
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", BOLD, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", DIM, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn red(&self, text: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", RED, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn cyan(&self, text: &str) -> String {
        if self.use_colors {
            format!("{}{}{}", CYAN, text, RESET)
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
