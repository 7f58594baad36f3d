//! JSON schema validators for codesieve DTOs.
//!
//! Schemas are generated from the schemars derives, so they always match
//! the types compiled into the workspace.

use codesieve_types::ConfigFile;
use jsonschema::JSONSchema;

/// Error type for schema validation failures.
#[derive(Debug)]
pub struct SchemaValidationError {
    /// The validation errors.
    pub errors: Vec<String>,
}

impl std::fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Schema validation failed: {}", self.errors.join("; "))
    }
}

impl std::error::Error for SchemaValidationError {}

/// Generate and compile the ConfigFile JSON schema.
pub fn load_config_schema() -> JSONSchema {
    let schema = schemars::schema_for!(ConfigFile);
    let schema = serde_json::to_value(&schema).expect("Config schema should serialize");
    JSONSchema::compile(&schema).expect("Config schema should compile")
}

/// Validate a ConfigFile against its JSON schema.
pub fn validate_config_file(config: &ConfigFile) -> Result<(), SchemaValidationError> {
    let json_value = serde_json::to_value(config).expect("ConfigFile should serialize to JSON");
    validate_config_json(&json_value)
}

/// Validate any JSON value against the ConfigFile schema.
pub fn validate_config_json(json: &serde_json::Value) -> Result<(), SchemaValidationError> {
    let schema = load_config_schema();
    let result = schema.validate(json);
    match result {
        Ok(()) => Ok(()),
        Err(errors) => Err(SchemaValidationError {
            errors: errors.map(|e| e.to_string()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::arb_config_file;
    use crate::fixtures::sample_configs;
    use proptest::prelude::*;

    #[test]
    fn sample_configs_validate() {
        validate_config_file(&sample_configs::empty()).expect("empty config");
        validate_config_file(&sample_configs::pep8_style()).expect("pep8 config");
        validate_config_file(&sample_configs::line_length_only()).expect("line length config");
    }

    #[test]
    fn unknown_format_is_rejected() {
        let json = serde_json::json!({"defaults": {"format": "xml"}});
        assert!(validate_config_json(&json).is_err());
    }

    #[test]
    fn select_must_be_a_list() {
        let json = serde_json::json!({"defaults": {"select": "E,W"}});
        assert!(validate_config_json(&json).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn generated_configs_validate(config in arb_config_file()) {
            prop_assert!(validate_config_file(&config).is_ok());
        }
    }
}
