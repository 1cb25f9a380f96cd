//! Compiler descriptors.
//!
//! A descriptor starts life as plain configuration ([`CompilerConfig`],
//! [`JavaConfig`]) on a [`CompileConfig`](super::CompileConfig). When the
//! context is built each active descriptor is bound to it, and from then on
//! it can reach back into the context to re-query per-platform settings.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use super::{CompileContext, ContextInner};
use crate::core::{Aol, Os};
use crate::info::PropertyError;

/// Native compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerFamily {
    C,
    #[serde(alias = "c++", alias = "cxx")]
    Cpp,
    Fortran,
}

impl CompilerFamily {
    pub const ALL: [CompilerFamily; 3] =
        [CompilerFamily::C, CompilerFamily::Cpp, CompilerFamily::Fortran];

    /// Prefix used for this family's keys in the property resource.
    pub fn key(&self) -> &'static str {
        match self {
            CompilerFamily::C => "c",
            CompilerFamily::Cpp => "cpp",
            CompilerFamily::Fortran => "fortran",
        }
    }

    /// Compiler used when neither the configuration nor the resource names one.
    pub fn default_name(&self) -> &'static str {
        match self {
            CompilerFamily::C => "gcc",
            CompilerFamily::Cpp => "g++",
            CompilerFamily::Fortran => "gfortran",
        }
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompilerFamily::C => "C",
            CompilerFamily::Cpp => "C++",
            CompilerFamily::Fortran => "Fortran",
        })
    }
}

/// User configuration for a C, C++ or Fortran compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompilerConfig {
    /// Compiler to invoke (e.g. `gcc`, `msvc`, `icc`)
    pub name: Option<String>,

    /// Extra command-line options
    pub options: Vec<String>,

    /// Preprocessor defines (`NAME` or `NAME=VALUE`)
    pub defines: Vec<String>,

    /// Preprocessor undefines
    pub undefines: Vec<String>,

    /// Additional include directories
    pub include_paths: Vec<PathBuf>,

    /// Compile with debug information
    pub debug: bool,

    /// Optimization level (e.g. `none`, `speed`, `size`)
    pub optimize: Option<String>,

    /// Enable exceptions (C++ defaults to on)
    pub exceptions: Option<bool>,

    /// Enable RTTI (C++ defaults to on)
    pub rtti: Option<bool>,

    /// Drop the compiler's built-in default options
    pub clear_defaults: bool,
}

/// A compiler bound to a compile context.
///
/// Only obtainable from a [`CompileContext`]; never exists unbound.
#[derive(Debug)]
pub struct Compiler {
    family: CompilerFamily,
    config: CompilerConfig,
    context: Weak<ContextInner>,
}

impl Compiler {
    pub(super) fn bind(
        family: CompilerFamily,
        config: CompilerConfig,
        context: &Weak<ContextInner>,
    ) -> Self {
        Compiler {
            family,
            config,
            context: context.clone(),
        }
    }

    pub fn family(&self) -> CompilerFamily {
        self.family
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// The owning context.
    pub fn context(&self) -> Option<CompileContext> {
        self.context.upgrade().map(|inner| CompileContext { inner })
    }

    /// Check whether this descriptor is bound to `ctx`.
    pub fn belongs_to(&self, ctx: &CompileContext) -> bool {
        std::ptr::eq(self.context.as_ptr(), Arc::as_ptr(&ctx.inner))
    }

    pub fn exceptions(&self) -> bool {
        self.config
            .exceptions
            .unwrap_or(self.family == CompilerFamily::Cpp)
    }

    pub fn rtti(&self) -> bool {
        self.config.rtti.unwrap_or(self.family == CompilerFamily::Cpp)
    }

    /// Compiler name for `aol`.
    ///
    /// A `<qualifier>.<family>.compiler` entry in the property resource wins
    /// over the configured name, which wins over the family default.
    pub fn name(&self, aol: &Aol) -> Result<String, PropertyError> {
        let default = self
            .config
            .name
            .as_deref()
            .unwrap_or(self.family.default_name());

        match self.context() {
            Some(ctx) => {
                let key = format!("{}.compiler", self.family.key());
                ctx.info().get_property(aol, &key, default)
            }
            None => Ok(default.to_string()),
        }
    }
}

/// User configuration for Java interop (JNI headers and linking).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct JavaConfig {
    /// Java installation to use; falls back to `JAVA_HOME`
    pub home: Option<PathBuf>,

    /// Add the JNI include directories when compiling
    pub include: bool,

    /// Include directories relative to the Java home
    pub include_paths: Vec<PathBuf>,

    /// Link against the Java VM library
    pub link: bool,

    /// Directory of the VM library, relative to the Java home
    pub runtime_directory: Option<PathBuf>,

    /// VM flavour (`server` or `client`)
    pub runtime: String,
}

impl Default for JavaConfig {
    fn default() -> Self {
        JavaConfig {
            home: None,
            include: true,
            include_paths: Vec::new(),
            link: false,
            runtime_directory: None,
            runtime: "server".to_string(),
        }
    }
}

/// Java interop settings bound to a compile context.
#[derive(Debug)]
pub struct Java {
    config: JavaConfig,
    context: Weak<ContextInner>,
}

impl Java {
    pub(super) fn bind(config: JavaConfig, context: &Weak<ContextInner>) -> Self {
        Java {
            config,
            context: context.clone(),
        }
    }

    pub fn config(&self) -> &JavaConfig {
        &self.config
    }

    pub fn context(&self) -> Option<CompileContext> {
        self.context.upgrade().map(|inner| CompileContext { inner })
    }

    pub fn belongs_to(&self, ctx: &CompileContext) -> bool {
        std::ptr::eq(self.context.as_ptr(), Arc::as_ptr(&ctx.inner))
    }

    /// The Java home, from configuration or the `JAVA_HOME` environment variable.
    pub fn home(&self) -> Option<PathBuf> {
        self.config
            .home
            .clone()
            .or_else(|| std::env::var_os("JAVA_HOME").map(PathBuf::from))
    }

    /// JNI include directories. Empty when includes are disabled or no
    /// Java home is known.
    pub fn include_dirs(&self, aol: &Aol) -> Vec<PathBuf> {
        if !self.config.include {
            return Vec::new();
        }
        let Some(home) = self.home() else {
            return Vec::new();
        };

        if !self.config.include_paths.is_empty() {
            return self.config.include_paths.iter().map(|p| home.join(p)).collect();
        }

        let platform_dir = match aol.os() {
            Os::Windows => "win32".to_string(),
            Os::MacOsx => "darwin".to_string(),
            Os::SunOs => "solaris".to_string(),
            other => other.tag(),
        };
        vec![home.join("include"), home.join("include").join(platform_dir)]
    }
}
