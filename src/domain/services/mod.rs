//! Domain Services
//!
//! Stateless, pure business logic services that operate on domain
//! entities: `PathMatcher` (C1), `Fingerprinter` (C2), diff helpers
//! (C5 Diff).

pub mod diff;
pub mod expected_destinations;
pub mod fingerprint;
pub mod path_matcher;

pub use diff::{diff_attribute_maps, DiffResult};
pub use expected_destinations::compute_expected_destinations;
pub use fingerprint::Fingerprinter;
pub use path_matcher::{DirectoryProbe, PathMatcher, RealDirectoryProbe};
