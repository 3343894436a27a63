//! Golden tests for Kelda's version digests.
//!
//! `FileAttributes::version()` and `Fingerprinter::snapshot_version()`
//! are the contract both sides of the sync RPC compare against — if the
//! textual encoding ever drifts silently, a
//! client and dev-server running different binaries would disagree
//! about whether a tree is in sync without either side erroring. These
//! vectors were computed independently (sha512sum + a short Python
//! script following the encoding verbatim) and hardcoded so a change to
//! the encoding trips a test instead of only showing up as a live
//! client/server mismatch.

use kelda::domain::services::fingerprint::Fingerprinter;
use kelda::domain::value_objects::{FileAttributes, ModTime, NormalizedPath, SyncConfig, SyncRule};

#[test]
fn file_attributes_version_matches_hand_computed_digest() {
    let attrs = FileAttributes::new(b"hello world", 0o644, ModTime::from_unix_nanos(1_700_000_000_000_000_000));

    assert_eq!(
        attrs.contents_hash,
        "309ecc489c12d6eb4cc40f50c902f2b4d0ed77ee511a7c7a9bcd3ca86d4cd86f\
         989dd35bc5ff499670da34255b45b0cfd830e81f605dcf7dc5542e93ae9cd76f"
    );
    assert_eq!(
        attrs.version().as_str(),
        "35f34454b883a00576f9a2aa283ed2441e83c4642cf75967a137f98ce0261ee\
         043007eb18671386938f5fd0129d388375fbd5d5a13b38821ef91e3c902c14303"
    );
}

#[test]
fn snapshot_version_matches_hand_computed_digest() {
    let config = SyncConfig {
        name: "api".to_string(),
        rules: vec![SyncRule::new("src".into(), "dst".into())],
        sync_command: vec!["node".to_string(), "server.js".to_string()],
        init_command: vec![],
        image: None,
    };
    assert_eq!(
        config.version().as_str(),
        "acef9d06f4aca71934ece3112673839009b4ee1671fc8446b5dea32743fa4f2\
         4a0b8cb32c7029173017d40d8a48ba332490c229cdfaa89ef1409620e7bb8c8a8"
    );

    let a_path: NormalizedPath = "a.js".into();
    let b_path: NormalizedPath = "b.js".into();
    let a_attrs = FileAttributes::new(b"hello", 0o644, ModTime::from_unix_nanos(1));
    let b_attrs = FileAttributes::new(b"hello", 0o644, ModTime::from_unix_nanos(2));

    let version = Fingerprinter::new().snapshot_version(vec![(&a_path, &a_attrs), (&b_path, &b_attrs)], &config);

    assert_eq!(
        version.as_str(),
        "e6cad5608301f0f4fc4ca88c2006a6fd7e6f341db8cd276fd7c0f97271668c7\
         52d491a62aa3a4597f75292c7b47083028f382a2ef054b595aa2255b36dadfc5c"
    );
}
