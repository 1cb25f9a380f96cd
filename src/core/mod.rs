//! Core data structures for Narwhal.
//!
//! This module contains the foundational types used throughout Narwhal:
//! - Platform identity (Aol)
//! - Project identity and the manifest
//! - Library types

pub mod aol;
pub mod library;
pub mod manifest;
pub mod project;

pub use aol::{Aol, AolParseError, Os};
pub use library::{LibraryType, LibraryTypeParseError};
pub use manifest::{find_manifest, Manifest, ManifestError, MANIFEST_NAME};
pub use project::{ProjectId, NAR_PROPERTIES};
