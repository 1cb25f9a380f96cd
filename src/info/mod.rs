//! Per-platform property store.
//!
//! [`NarInfo`] answers `(AOL, property) -> value` questions from a project's
//! `nar.properties` resource, falling back to a caller-supplied default.
//! The resource is read lazily on the first query and cached for the
//! lifetime of the store; a missing resource simply means "no overrides".
//!
//! Keys are looked up with each of the AOL's qualifiers in turn
//! (see [`Aol::qualifiers`]) and finally unqualified:
//!
//! ```text
//! x86-Windows-msvc.maxCores=8
//! win-x86.maxCores=4
//! *.failOnError=false
//! runtime=static
//! ```

mod properties;
mod source;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use thiserror::Error;

use crate::core::{Aol, ProjectId};

pub use properties::{parse, ParseError, PropertyTable};
pub use source::{FileSource, MemorySource, PropertySource};

/// Property name for the parallelism limit.
pub const MAX_CORES: &str = "maxCores";
/// Property name for libtool usage.
pub const LIBTOOL: &str = "libtool";
/// Property name for the compile/link failure policy.
pub const FAIL_ON_ERROR: &str = "failOnError";
/// Property name for the runtime linkage mode.
pub const RUNTIME: &str = "runtime";
/// Property name for the output artifact name.
pub const OUTPUT: &str = "output";
/// Property name for the library binding.
pub const LIBS_BINDING: &str = "libs.binding";
/// Property name for the libraries this artifact provides.
pub const LIBS: &str = "libs";
/// Property name for system libraries to link against.
pub const SYS_LIBS: &str = "syslibs";
/// Property name for extra linker options.
pub const OPTIONS: &str = "options";

/// Errors reading or interpreting a property resource.
///
/// Any of these aborts resolution for the whole context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("failed to read property resource `{location}`: {message}")]
    Unreadable { location: String, message: String },

    #[error("malformed property resource `{location}` (line {line}): {message}")]
    Malformed {
        location: String,
        line: usize,
        message: String,
    },

    #[error("invalid value `{value}` for property `{key}`: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Lifecycle of the backing resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing has been read yet
    Unloaded,
    /// The resource was read (or found missing) and parsed successfully
    Loaded,
    /// The resource exists but could not be read or parsed
    Failed,
}

/// Property store for one project.
pub struct NarInfo {
    project: ProjectId,
    source: Box<dyn PropertySource>,
    table: OnceLock<Result<PropertyTable, PropertyError>>,
    loads: AtomicUsize,
}

impl std::fmt::Debug for NarInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarInfo")
            .field("project", &self.project)
            .field("source", &self.source.location())
            .field("state", &self.state())
            .finish()
    }
}

impl NarInfo {
    /// Create a store reading from an arbitrary source.
    pub fn new(project: ProjectId, source: impl PropertySource + 'static) -> Self {
        NarInfo {
            project,
            source: Box::new(source),
            table: OnceLock::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Create a store for a project rooted at `basedir`, reading
    /// `src/main/resources/META-INF/nar/<group>/<artifact>/nar.properties`.
    pub fn for_project(project: ProjectId, basedir: &Path) -> Self {
        let path: PathBuf = project.properties_path(basedir);
        NarInfo::new(project, FileSource::new(path))
    }

    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    /// Where the resource is read from.
    pub fn location(&self) -> String {
        self.source.location()
    }

    pub fn state(&self) -> LoadState {
        match self.table.get() {
            None => LoadState::Unloaded,
            Some(Ok(_)) => LoadState::Loaded,
            Some(Err(_)) => LoadState::Failed,
        }
    }

    /// Number of times the backing resource has been read.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// The loaded table, reading the resource on first use.
    pub fn table(&self) -> Result<&PropertyTable, PropertyError> {
        self.table
            .get_or_init(|| self.load())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn load(&self) -> Result<PropertyTable, PropertyError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let location = self.source.location();

        let bytes = match self.source.read() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!("no property resource at {}, using defaults", location);
                return Ok(PropertyTable::new());
            }
            Err(e) => {
                return Err(PropertyError::Unreadable {
                    location,
                    message: e.to_string(),
                })
            }
        };

        // Legacy resources are ISO-8859-1, where every byte is a character.
        let text = String::from_utf8(bytes).unwrap_or_else(|e| {
            tracing::debug!("{} is not UTF-8, reading it as ISO-8859-1", location);
            e.into_bytes().iter().map(|&b| char::from(b)).collect()
        });

        let table = parse(&text).map_err(|e| PropertyError::Malformed {
            location: location.clone(),
            line: e.line,
            message: e.message,
        })?;

        tracing::debug!(
            "loaded {} properties for {} from {}",
            table.len(),
            self.project,
            location
        );
        tracing::trace!("property keys: {}", table.keys().join(", "));
        Ok(table)
    }

    /// Find the raw override for `key`, most specific qualifier first.
    ///
    /// With no AOL only the unqualified key is consulted.
    pub fn lookup(&self, aol: Option<&Aol>, key: &str) -> Result<Option<&str>, PropertyError> {
        let table = self.table()?;

        if let Some(aol) = aol {
            for qualifier in aol.qualifiers() {
                let qualified = format!("{}.{}", qualifier, key);
                if let Some(value) = table.get(&qualified) {
                    tracing::trace!("{} = {} (for {})", qualified, value, aol);
                    return Ok(Some(value));
                }
            }
        }

        Ok(table.get(key))
    }

    /// String property: the override if present, else `default`.
    pub fn get_property(
        &self,
        aol: &Aol,
        key: &str,
        default: &str,
    ) -> Result<String, PropertyError> {
        Ok(self
            .lookup(Some(aol), key)?
            .map(str::to_string)
            .unwrap_or_else(|| default.to_string()))
    }

    /// Boolean property, accepting `true`/`false` in any case.
    pub fn get_bool(&self, aol: &Aol, key: &str, default: bool) -> Result<bool, PropertyError> {
        match self.lookup(Some(aol), key)? {
            None => Ok(default),
            Some(raw) => {
                let value = raw.trim();
                if value.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if value.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(invalid(key, raw, "`true` or `false`"))
                }
            }
        }
    }

    /// Decimal integer property.
    pub fn get_int<T>(&self, aol: &Aol, key: &str, default: T) -> Result<T, PropertyError>
    where
        T: FromStr,
    {
        match self.lookup(Some(aol), key)? {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| invalid(key, raw, "a decimal integer")),
        }
    }

    /// Output artifact name for `aol`.
    pub fn get_output(&self, aol: &Aol, default_output: &str) -> Result<String, PropertyError> {
        self.get_property(aol, OUTPUT, default_output)
    }

    /// Library binding for `aol` (e.g. `shared`, `static`, `jni`).
    pub fn get_binding(&self, aol: &Aol, default_binding: &str) -> Result<String, PropertyError> {
        self.get_property(aol, LIBS_BINDING, default_binding)
    }

    /// Libraries provided by this artifact, `<artifact>-<version>` by default.
    pub fn get_libs(&self, aol: &Aol) -> Result<String, PropertyError> {
        let default = format!("{}-{}", self.project.artifact_id, self.project.version);
        self.get_property(aol, LIBS, &default)
    }

    /// System libraries to link against.
    pub fn get_sys_libs(&self, aol: &Aol) -> Result<String, PropertyError> {
        self.get_property(aol, SYS_LIBS, "")
    }

    /// Extra linker options.
    pub fn get_options(&self, aol: &Aol) -> Result<String, PropertyError> {
        self.get_property(aol, OPTIONS, "")
    }

    /// [`get_libs`](Self::get_libs) split into individual names.
    pub fn get_libs_name(&self, aol: &Aol) -> Result<Vec<String>, PropertyError> {
        Ok(split_list(&self.get_libs(aol)?))
    }

    /// [`get_sys_libs`](Self::get_sys_libs) split into individual names.
    pub fn get_sys_libs_name(&self, aol: &Aol) -> Result<Vec<String>, PropertyError> {
        Ok(split_list(&self.get_sys_libs(aol)?))
    }
}

fn invalid(key: &str, value: &str, expected: &'static str) -> PropertyError {
    PropertyError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
