//! Shared helpers for covgate-fetch integration tests.

pub mod stub_api;
