//! Architecture-OS-Linker platform identity.
//!
//! An [`Aol`] is the lookup key for every platform-scoped setting. It is a
//! plain value: two AOLs with the same components are the same platform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Operating system component of an AOL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    Linux,
    MacOsx,
    SunOs,
    FreeBsd,
    Aix,
    /// Any OS name we have no dedicated variant for, lowercased by
    /// [`Os::parse`] so spellings differing only in case are one platform
    Other(String),
}

impl Os {
    /// Get the canonical OS name as it appears in an AOL string.
    pub fn as_str(&self) -> &str {
        match self {
            Os::Windows => "Windows",
            Os::Linux => "Linux",
            Os::MacOsx => "MacOSX",
            Os::SunOs => "SunOS",
            Os::FreeBsd => "FreeBSD",
            Os::Aix => "AIX",
            Os::Other(name) => name,
        }
    }

    /// Short tag used in platform classifiers (e.g. `win-x86`).
    pub fn tag(&self) -> String {
        match self {
            Os::Windows => "win".to_string(),
            Os::Linux => "linux".to_string(),
            Os::MacOsx => "mac".to_string(),
            Os::SunOs => "sunos".to_string(),
            Os::FreeBsd => "freebsd".to_string(),
            Os::Aix => "aix".to_string(),
            Os::Other(name) => name.to_lowercase(),
        }
    }

    /// Parse an OS name, ignoring case. Unknown names are kept lowercased.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "windows" | "win" | "win32" => Os::Windows,
            "linux" => Os::Linux,
            "macosx" | "macos" | "mac" | "darwin" => Os::MacOsx,
            "sunos" | "solaris" => Os::SunOs,
            "freebsd" => Os::FreeBsd,
            "aix" => Os::Aix,
            other => Os::Other(other.to_string()),
        }
    }

    /// The OS this process is running on.
    pub fn host() -> Self {
        Os::parse(std::env::consts::OS)
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an AOL string has the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid AOL `{0}`, expected `<arch>-<os>-<linker>` (e.g. `amd64-Linux-gcc`)")]
pub struct AolParseError(pub String);

/// Architecture-OS-Linker triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Aol {
    arch: String,
    os: Os,
    linker: String,
}

impl Aol {
    /// Create a new AOL. Components are accepted as given.
    pub fn new(arch: impl Into<String>, os: Os, linker: impl Into<String>) -> Self {
        Aol {
            arch: arch.into(),
            os,
            linker: linker.into(),
        }
    }

    /// Best-effort AOL for the host, using the default linker of its OS.
    pub fn host() -> Self {
        let arch = match std::env::consts::ARCH {
            "x86_64" => "amd64",
            "x86" => "i386",
            other => other,
        };
        let os = Os::host();
        let linker = match os {
            Os::Windows => "msvc",
            Os::MacOsx => "g++",
            _ => "gcc",
        };
        Aol::new(arch, os, linker)
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn os(&self) -> &Os {
        &self.os
    }

    pub fn linker(&self) -> &str {
        &self.linker
    }

    /// Check if this AOL targets the Windows family.
    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// Property-key qualifiers for this platform, most specific first.
    ///
    /// The last entry is always the `*` wildcard.
    pub fn qualifiers(&self) -> Vec<String> {
        vec![
            self.to_string(),
            format!("{}-{}", self.arch, self.os),
            format!("{}-{}", self.os.tag(), self.arch),
            "*".to_string(),
        ]
    }
}

impl fmt::Display for Aol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.arch, self.os, self.linker)
    }
}

impl FromStr for Aol {
    type Err = AolParseError;

    /// Parse `<arch>-<os>-<linker>`. The linker may itself contain dashes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(arch), Some(os), Some(linker))
                if !arch.is_empty() && !os.is_empty() && !linker.is_empty() =>
            {
                Ok(Aol::new(arch, Os::parse(os), linker))
            }
            _ => Err(AolParseError(s.to_string())),
        }
    }
}

impl Serialize for Aol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Aol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
