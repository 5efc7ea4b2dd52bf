//! Fuzz target for the diagram compiler.
//!
//! Feeds arbitrary text to the compiler and, when it succeeds, to the
//! emitters and the validator.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_compile
//! ```

#![no_main]

use erdgen_schema::emit::to_yaml;
use erdgen_schema::{Validator, compile_schema};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Errors are fine, panics are not
        if let Ok(document) = compile_schema(input) {
            let _ = to_yaml(&document);
            let _ = Validator::new().validate(document);
        }
    }
});
