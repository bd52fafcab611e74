// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Covgate Provider
//!
//! The provider layer around the covgate fetch engine: process-level
//! settings provisioning, field-level schemas, and the `codecov_settings`
//! data source itself.
//!
//! - [`settings`] - token, endpoint and call-interval resolution from the
//!   environment and an optional settings file
//! - [`schema`] - field metadata (required/computed, sensitive)
//! - [`source`] - the [`DataSource`] trait and the codecov implementation
//! - [`registry`] - lookup of available data sources by name

pub mod error;
pub mod registry;
pub mod schema;
pub mod settings;
pub mod source;

pub use error::ProviderError;
pub use registry::SourceRegistry;
pub use schema::{FieldMode, FieldSchema, SourceSchema};
pub use settings::{
    ProviderSettings, SettingsFile, DEFAULT_API_INTERVAL_SECS, DEFAULT_ENDPOINT, TOKEN_ENV,
};
pub use source::{CodecovSettingsSource, DataSource, ReadContext, SourceOutput};
