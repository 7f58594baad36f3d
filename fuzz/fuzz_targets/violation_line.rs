//! Fuzz target for checker-output ingestion and `# noqa` parsing.
//!
//! Arbitrary text must never panic the parsers. Lines that do parse must
//! keep their code and location intact through a `StyleGuide` pass.

#![no_main]

use libfuzzer_sys::fuzz_target;

use codesieve_core::{InputFormat, parse_input, parse_violation_line};
use codesieve_domain::{is_inline_suppressed, parse_noqa};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 10_000 {
        return;
    }

    let _ = parse_input(text, InputFormat::Text);
    let _ = parse_input(text, InputFormat::Json);

    for line in text.lines() {
        if let Some(v) = parse_violation_line(line) {
            assert!(!v.code.is_empty());
            assert!(line.contains(&v.code));
            assert!(line.starts_with(&v.filename));
            let _ = is_inline_suppressed(line, &v.code);
        }
        let _ = parse_noqa(line);
    }
});
