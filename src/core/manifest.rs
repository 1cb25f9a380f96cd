//! Narwhal.toml manifest parsing and schema.
//!
//! The manifest names the project and carries its compile configuration:
//!
//! ```toml
//! [project]
//! group-id = "org.example"
//! artifact-id = "hello"
//! version = "1.0"
//!
//! [compile]
//! max-cores = 4
//! runtime = "static"
//! aols = ["amd64-Linux-gcc", "x86-Windows-msvc"]
//!
//! [compile.cpp]
//! options = ["-Wall"]
//!
//! [[compile.tests]]
//! name = "hello-test"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compile::{CompileConfig, CompilerConfig, CompilerFamily, JavaConfig, TestEntry};
use crate::core::{Aol, ProjectId};
use crate::info::NarInfo;
use crate::util::config::{CompileDefaults, Config};

/// Manifest file name.
pub const MANIFEST_NAME: &str = "Narwhal.toml";

/// Errors locating or loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find `Narwhal.toml` in `{}` or any parent directory", dir.display())]
    NotFound { dir: PathBuf },

    #[error("failed to read manifest `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid manifest `{}`: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

/// Look for the manifest directly inside `dir`.
pub fn find_manifest(dir: &Path) -> Result<PathBuf, ManifestError> {
    let path = dir.join(MANIFEST_NAME);
    if path.is_file() {
        Ok(path)
    } else {
        Err(ManifestError::NotFound {
            dir: dir.to_path_buf(),
        })
    }
}

/// The `[compile]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompileSection {
    /// Project-level compile defaults
    #[serde(flatten)]
    pub defaults: CompileDefaults,

    /// Output name (defaults to the artifact id)
    pub output: Option<String>,

    /// Activate every compiler family, configured or not
    pub only_specified_compilers: bool,

    /// Decorate linker options for the link driver
    pub decorate_linker_options: bool,

    /// Dependency libraries in link order
    pub dependency_link_order: Vec<String>,

    /// Platforms this project is built for
    pub aols: Vec<Aol>,

    pub c: Option<CompilerConfig>,
    pub cpp: Option<CompilerConfig>,
    pub fortran: Option<CompilerConfig>,
    pub java: Option<JavaConfig>,

    /// Test executables
    pub tests: Vec<TestEntry>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    project: ProjectId,
    #[serde(default)]
    compile: CompileSection,
}

/// The parsed Narwhal.toml manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Project identity
    pub project: ProjectId,

    /// Compile configuration
    pub compile: CompileSection,

    /// The directory containing this manifest
    pub manifest_dir: PathBuf,
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dir = path.parent().unwrap_or(Path::new("."));
        Self::parse(&contents, path, dir)
    }

    /// Parse manifest text. `path` is only used in errors.
    pub fn parse(contents: &str, path: &Path, manifest_dir: &Path) -> Result<Self, ManifestError> {
        let raw: RawManifest = toml::from_str(contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest = Manifest {
            project: raw.project,
            compile: raw.compile,
            manifest_dir: manifest_dir.to_path_buf(),
        };
        manifest.validate(path)?;
        Ok(manifest)
    }

    fn validate(&self, path: &Path) -> Result<(), ManifestError> {
        let invalid = |message: String| ManifestError::Invalid {
            path: path.to_path_buf(),
            message,
        };

        for (field, value) in [
            ("group-id", &self.project.group_id),
            ("artifact-id", &self.project.artifact_id),
            ("version", &self.project.version),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("`project.{}` must not be empty", field)));
            }
            if value.contains(['/', '\\']) || value == ".." {
                return Err(invalid(format!(
                    "`project.{}` must not contain path separators: `{}`",
                    field, value
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for test in &self.compile.tests {
            if !seen.insert(test.name.as_str()) {
                return Err(invalid(format!("duplicate test name `{}`", test.name)));
            }
        }

        Ok(())
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.manifest_dir
    }

    /// The property store for this project.
    pub fn nar_info(&self) -> NarInfo {
        NarInfo::for_project(self.project.clone(), &self.manifest_dir)
    }

    /// Compile configuration with `config` layered underneath the manifest.
    pub fn compile_config(&self, config: &Config) -> CompileConfig {
        let mut defaults = config.compile.clone();
        defaults.merge(self.compile.defaults.clone());

        let section = &self.compile;
        let mut cc = CompileConfig::new();

        if let Some(max_cores) = defaults.max_cores {
            cc.set_max_cores(max_cores);
        }
        if let Some(libtool) = defaults.libtool {
            cc.set_libtool(libtool);
        }
        if let Some(fail_on_error) = defaults.fail_on_error {
            cc.set_fail_on_error(fail_on_error);
        }
        if let Some(runtime) = defaults.runtime {
            cc.set_runtime(runtime);
        }
        if let Some(output) = &section.output {
            cc.set_output(output.clone());
        }

        for (family, compiler) in [
            (CompilerFamily::C, &section.c),
            (CompilerFamily::Cpp, &section.cpp),
            (CompilerFamily::Fortran, &section.fortran),
        ] {
            if let Some(compiler) = compiler {
                cc.set_compiler(family, compiler.clone());
            }
        }
        if let Some(java) = &section.java {
            cc.set_java(java.clone());
        }

        cc.set_only_specified_compilers(section.only_specified_compilers)
            .set_decorate_linker_options(section.decorate_linker_options)
            .set_tests(section.tests.clone())
            .set_dependency_link_order(section.dependency_link_order.clone());

        cc
    }
}
