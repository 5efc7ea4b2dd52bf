//! Fuzz target for the `erdgen.toml` parser.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use erdgen_schema::SchemaConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(config) = SchemaConfig::from_str(input) {
            let _ = config.compiler_options();
        }
    }
});
