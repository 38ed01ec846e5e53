//! Common test utilities for stratus.
//!
//! This module provides shared fixtures and assertions for the integration tests.

pub mod assertions;
pub mod test_data;
