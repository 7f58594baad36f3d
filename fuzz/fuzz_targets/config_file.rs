//! Fuzz target for TOML config parsing.
//!
//! Any text must either fail to deserialize or produce a `ConfigFile`
//! whose effective lists build a working decision engine.

#![no_main]

use libfuzzer_sys::fuzz_target;

use codesieve_domain::DecisionEngine;
use codesieve_types::{ColorChoice, ConfigFile, Defaults, OutputFormat};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    // Skip excessively long inputs to avoid timeout
    if s.len() > 10_000 {
        return;
    }

    if let Ok(config) = toml::from_str::<ConfigFile>(s) {
        let engine = DecisionEngine::new(
            config.defaults.effective_select(),
            config.defaults.effective_ignore(),
        );
        let _ = engine.decide("E501");
        let _ = engine.explain("W291");
    }

    let _ = toml::from_str::<Defaults>(s);

    // Enum values outside the known set must be rejected, not panic.
    let _ = toml::from_str::<OutputFormat>("\"xml\"");
    let _ = toml::from_str::<ColorChoice>("123");
});
