//! Narwhal - per-platform compile configuration for multi-target native builds
//!
//! This crate resolves, for every Architecture-OS-Linker platform a project
//! is built for, which compilers are active and which settings apply:
//! parallelism, libtool usage, failure policy, runtime linkage and output
//! naming. Platform overrides come from the project's `nar.properties`
//! resource; everything else falls back to the configured defaults.

pub mod compile;
pub mod core;
pub mod info;
pub mod ops;
pub mod util;

/// Test utilities for Narwhal unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use compile::{CompileConfig, CompileContext, Compiler, CompilerFamily, Java, TestEntry};
pub use crate::core::{Aol, LibraryType, Manifest, Os, ProjectId};
pub use info::{NarInfo, PropertyError};
pub use util::context::GlobalContext;
