#![no_main]

use kelda::domain::value_objects::SyncConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // A malformed kelda.yaml must produce a deserialize error, not a
        // panic — and if it does parse, computing its version must not
        // panic either (rules/exceptions get sorted and hashed).
        if let Ok(config) = serde_yaml_ng::from_str::<SyncConfig>(content) {
            let _ = config.version();
        }
    }
});
