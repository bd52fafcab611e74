// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Covgate Core
//!
//! Core types and models for the covgate workspace.
//!
//! This crate provides the foundational types used across all other
//! covgate crates:
//!
//! - [`RepoQuery`] - the (service, owner, repo) triple a fetch targets
//! - [`ApiToken`] - opaque bearer credential, non-empty by construction
//! - [`RepoConfig`] - the decoded repository configuration document
//! - [`CoreError`] - configuration-level failures detected before any
//!   network activity

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{ApiToken, RepoConfig, RepoQuery};
