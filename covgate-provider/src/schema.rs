//! Field-level schema metadata for data sources.
//!
//! A [`SourceSchema`] describes what a data source takes in and hands
//! back, field by field. The CLI renders schemas for discovery, and
//! sources validate their inputs against them before touching the
//! network.

use serde::Serialize;

// ============================================================================
// Field Schema
// ============================================================================

/// How a field participates in a data source read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMode {
    /// The caller must supply the field.
    Required,
    /// The caller may supply the field.
    Optional,
    /// The read produces the field.
    Computed,
}

/// Describes a single field of a data source.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSchema {
    /// Field name.
    pub name: &'static str,
    /// Input/output mode.
    pub mode: FieldMode,
    /// Whether the value must be kept out of plain display.
    pub sensitive: bool,
    /// Human-readable description.
    pub description: &'static str,
}

impl FieldSchema {
    /// A required input field.
    pub fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            mode: FieldMode::Required,
            sensitive: false,
            description,
        }
    }

    /// An optional input field.
    pub fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            mode: FieldMode::Optional,
            sensitive: false,
            description,
        }
    }

    /// A computed output field.
    pub fn computed(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            mode: FieldMode::Computed,
            sensitive: false,
            description,
        }
    }

    /// Marks the field as sensitive.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

// ============================================================================
// Source Schema
// ============================================================================

/// The complete schema of a data source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSchema {
    /// Data source name, unique within the registry.
    pub name: &'static str,
    /// What the source reads.
    pub description: &'static str,
    /// Field descriptions, inputs first.
    pub fields: Vec<FieldSchema>,
}

impl SourceSchema {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Iterates the input fields (required and optional).
    pub fn inputs(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields
            .iter()
            .filter(|field| field.mode != FieldMode::Computed)
    }

    /// Iterates the computed output fields.
    pub fn outputs(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields
            .iter()
            .filter(|field| field.mode == FieldMode::Computed)
    }
}

// ============================================================================
// Tests
// ============================================================================
