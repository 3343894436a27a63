//! Home directory resolution with test isolation support.
//!
//! On Windows, `dirs::home_dir()` uses the Windows system API rather than
//! environment variables, so setting `HOME` in tests has no effect there.
//! `kelda_home_dir()` checks `KELDA_TEST_HOME` first so tests stay
//! isolated from the real developer's `~/.kelda`.

use std::path::PathBuf;

/// Environment variable for test isolation of the home directory.
pub const KELDA_TEST_HOME_VAR: &str = "KELDA_TEST_HOME";

/// Home directory for Kelda-internal paths (`~/.kelda/...`).
pub fn kelda_home_dir() -> Option<PathBuf> {
    std::env::var(KELDA_TEST_HOME_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kelda_home_dir_returns_some_in_normal_environment() {
        let result = kelda_home_dir();
        assert!(
            result.is_some() || std::env::var(KELDA_TEST_HOME_VAR).is_err(),
            "kelda_home_dir() should return Some in normal environment"
        );
    }

    #[test]
    fn kelda_home_dir_respects_test_home_env_var() {
        let test_home = "/test/fake/home";

        // SAFETY: single-threaded test, env var is restored immediately after.
        unsafe {
            std::env::set_var(KELDA_TEST_HOME_VAR, test_home);
        }

        let result = kelda_home_dir();

        unsafe {
            std::env::remove_var(KELDA_TEST_HOME_VAR);
        }

        assert_eq!(result, Some(PathBuf::from(test_home)));
    }
}
