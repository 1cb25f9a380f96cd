//! Library types.
//!
//! The kind of artifact a native target produces. Only `executable` is
//! treated specially by the resolver (it is never versioned in its output
//! name); the rest are carried through for the link driver.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of artifact being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryType {
    /// Executable binary
    #[serde(alias = "exe", alias = "bin")]
    Executable,

    /// Shared/dynamic library
    #[default]
    #[serde(alias = "dynamic", alias = "dylib")]
    Shared,

    /// Static library
    #[serde(alias = "lib")]
    Static,

    /// Shared library loaded through JNI
    Jni,

    /// Loadable plugin
    Plugin,

    /// Nothing is linked
    None,
}

impl LibraryType {
    /// All library types, in declaration order.
    pub const ALL: [LibraryType; 6] = [
        LibraryType::Executable,
        LibraryType::Shared,
        LibraryType::Static,
        LibraryType::Jni,
        LibraryType::Plugin,
        LibraryType::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryType::Executable => "executable",
            LibraryType::Shared => "shared",
            LibraryType::Static => "static",
            LibraryType::Jni => "jni",
            LibraryType::Plugin => "plugin",
            LibraryType::None => "none",
        }
    }

    /// Check if this produces an executable.
    pub fn is_executable(&self) -> bool {
        matches!(self, LibraryType::Executable)
    }
}

impl fmt::Display for LibraryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LibraryType {
    type Err = LibraryTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "executable" | "exe" | "bin" => Ok(LibraryType::Executable),
            "shared" | "dynamic" | "dylib" => Ok(LibraryType::Shared),
            "static" | "lib" => Ok(LibraryType::Static),
            "jni" => Ok(LibraryType::Jni),
            "plugin" => Ok(LibraryType::Plugin),
            "none" => Ok(LibraryType::None),
            _ => Err(LibraryTypeParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown library type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid library type '{0}', valid values: executable, shared, static, jni, plugin, none")]
pub struct LibraryTypeParseError(pub String);
