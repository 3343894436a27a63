#![no_main]

use kelda::domain::entities::Workspace;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Strict-mode workspace deserialization must never panic,
        // regardless of how malformed or adversarial the YAML is.
        let _ = serde_yaml_ng::from_str::<Workspace>(content);
    }
});
