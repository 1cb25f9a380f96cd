//! Test utilities for Narwhal unit tests.
//!
//! Provides fixtures that lay out a project (manifest plus property
//! resource) on disk, so tests can exercise the file-backed paths.
//!
//! # Example
//!
//! ```rust,ignore
//! use narwhal::test_support::ProjectFixture;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let manifest = ProjectFixture::hello()
//!     .with_properties("win-x86.maxCores=4\n")
//!     .write_to(tmp.path());
//! ```

pub mod fixtures;

pub use fixtures::*;
