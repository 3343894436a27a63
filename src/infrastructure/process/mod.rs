//! Managed child process group implementation (C8).

pub mod child_group;

pub use child_group::{ChildProcessGroupHandle, NixProcessRunner};
