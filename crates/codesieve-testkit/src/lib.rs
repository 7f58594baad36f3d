//! Shared test utilities for codesieve workspace.
//!
//! This crate provides:
//! - **arb**: Proptest strategies for codes, prefix lists and violations
//! - **spies**: Recording listeners, formatters and writers
//! - **schema**: JSON schema validation for config DTOs
//! - **fixtures**: Common test fixtures (configs, checker output, decision tables)
//!
//! # Example
//!
//! ```rust,ignore
//! use codesieve_testkit::arb;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     fn test_code(code in arb::arb_code()) {
//!         assert!(!code.is_empty());
//!     }
//! }
//! ```

pub mod arb;
pub mod fixtures;
pub mod schema;
pub mod spies;

// Re-export commonly used items
pub use arb::{arb_code, arb_prefix, arb_prefix_list, arb_raw_violation, arb_violation};
pub use fixtures::{DecisionCase, decision_cases, sample_configs, sample_output};
pub use schema::{validate_config_file, validate_config_json};
pub use spies::{FailingListener, RecordingFormatter, RecordingListener, SharedBuffer};
