//! Per-platform compile configuration.
//!
//! Resolution happens in two phases. A [`CompileConfig`] collects the user's
//! configuration: defaults, compiler descriptors, tests and the dependency
//! link order. [`CompileConfig::build`] turns it into an immutable
//! [`CompileContext`], activating and binding compiler descriptors on the
//! way. The context then answers per-AOL questions by consulting the
//! project's property store and falling back to the configured defaults.
//!
//! A built context is `Send + Sync` and cheap to clone, so a driver can fan
//! out over many platforms from a single context.

mod compiler;
mod test_entry;

use std::sync::Arc;

use crate::core::{Aol, LibraryType, ProjectId};
use crate::info::{self, LoadState, NarInfo, PropertyError};

pub use compiler::{Compiler, CompilerConfig, CompilerFamily, Java, JavaConfig};
pub use test_entry::TestEntry;

/// Default runtime linkage mode.
pub const DEFAULT_RUNTIME: &str = "dynamic";

/// Lifecycle of a compile context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    /// No property has been queried yet; the resource is unread
    Unconfigured,
    /// The property resource has been read; queries are served from cache
    Resolved,
}

/// Mutable compile configuration, before activation.
#[derive(Debug, Clone)]
pub struct CompileConfig {
    c: Option<CompilerConfig>,
    cpp: Option<CompilerConfig>,
    fortran: Option<CompilerConfig>,
    java: Option<JavaConfig>,
    only_specified_compilers: bool,
    max_cores: u32,
    libtool: bool,
    fail_on_error: bool,
    runtime: String,
    output: Option<String>,
    tests: Vec<TestEntry>,
    decorate_linker_options: bool,
    dependency_link_order: Vec<String>,
}

impl Default for CompileConfig {
    fn default() -> Self {
        CompileConfig {
            c: None,
            cpp: None,
            fortran: None,
            java: None,
            only_specified_compilers: false,
            max_cores: 0,
            libtool: false,
            fail_on_error: true,
            runtime: DEFAULT_RUNTIME.to_string(),
            output: None,
            tests: Vec::new(),
            decorate_linker_options: false,
            dependency_link_order: Vec::new(),
        }
    }
}

impl CompileConfig {
    pub fn new() -> Self {
        CompileConfig::default()
    }

    pub fn set_c(&mut self, c: CompilerConfig) -> &mut Self {
        self.c = Some(c);
        self
    }

    pub fn set_cpp(&mut self, cpp: CompilerConfig) -> &mut Self {
        self.cpp = Some(cpp);
        self
    }

    pub fn set_fortran(&mut self, fortran: CompilerConfig) -> &mut Self {
        self.fortran = Some(fortran);
        self
    }

    /// Set the descriptor for `family`.
    pub fn set_compiler(&mut self, family: CompilerFamily, config: CompilerConfig) -> &mut Self {
        match family {
            CompilerFamily::C => self.set_c(config),
            CompilerFamily::Cpp => self.set_cpp(config),
            CompilerFamily::Fortran => self.set_fortran(config),
        }
    }

    pub fn set_java(&mut self, java: JavaConfig) -> &mut Self {
        self.java = Some(java);
        self
    }

    /// When set, every compiler family without explicit configuration is
    /// activated with default settings.
    pub fn set_only_specified_compilers(&mut self, only: bool) -> &mut Self {
        self.only_specified_compilers = only;
        self
    }

    /// Default parallelism limit; 0 means unlimited.
    pub fn set_max_cores(&mut self, max_cores: u32) -> &mut Self {
        self.max_cores = max_cores;
        self
    }

    pub fn set_libtool(&mut self, libtool: bool) -> &mut Self {
        self.libtool = libtool;
        self
    }

    pub fn set_fail_on_error(&mut self, fail_on_error: bool) -> &mut Self {
        self.fail_on_error = fail_on_error;
        self
    }

    /// Default runtime linkage mode, normally `dynamic` or `static`.
    pub fn set_runtime(&mut self, runtime: impl Into<String>) -> &mut Self {
        self.runtime = runtime.into();
        self
    }

    /// Output name; defaults to the project's artifact id.
    pub fn set_output(&mut self, output: impl Into<String>) -> &mut Self {
        self.output = Some(output.into());
        self
    }

    pub fn set_tests(&mut self, tests: Vec<TestEntry>) -> &mut Self {
        self.tests = tests;
        self
    }

    pub fn set_decorate_linker_options(&mut self, decorate: bool) -> &mut Self {
        self.decorate_linker_options = decorate;
        self
    }

    /// Order in which dependency libraries must be linked.
    pub fn set_dependency_link_order(&mut self, order: Vec<String>) -> &mut Self {
        self.dependency_link_order = order;
        self
    }

    /// Activate descriptors and freeze the configuration.
    pub fn build(self, info: NarInfo) -> CompileContext {
        let only_specified = self.only_specified_compilers;
        let output = self
            .output
            .unwrap_or_else(|| info.project().artifact_id.clone());

        let inner = Arc::new_cyclic(|weak| {
            let activate = |family: CompilerFamily, config: Option<CompilerConfig>| match config {
                Some(config) => Some(Compiler::bind(family, config, weak)),
                None if only_specified => {
                    Some(Compiler::bind(family, CompilerConfig::default(), weak))
                }
                None => None,
            };

            ContextInner {
                c: activate(CompilerFamily::C, self.c),
                cpp: activate(CompilerFamily::Cpp, self.cpp),
                fortran: activate(CompilerFamily::Fortran, self.fortran),
                java: Java::bind(self.java.unwrap_or_default(), weak),
                info,
                only_specified_compilers: only_specified,
                max_cores: self.max_cores,
                libtool: self.libtool,
                fail_on_error: self.fail_on_error,
                runtime: self.runtime,
                output,
                tests: self.tests,
                decorate_linker_options: self.decorate_linker_options,
                dependency_link_order: self.dependency_link_order,
            }
        });

        let ctx = CompileContext { inner };
        tracing::debug!(
            "compile context for {}: compilers [{}]",
            ctx.project(),
            ctx.active_compilers()
                .iter()
                .map(|c| c.family().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        ctx
    }
}

#[derive(Debug)]
pub(crate) struct ContextInner {
    info: NarInfo,
    c: Option<Compiler>,
    cpp: Option<Compiler>,
    fortran: Option<Compiler>,
    java: Java,
    only_specified_compilers: bool,
    max_cores: u32,
    libtool: bool,
    fail_on_error: bool,
    runtime: String,
    output: String,
    tests: Vec<TestEntry>,
    decorate_linker_options: bool,
    dependency_link_order: Vec<String>,
}

/// Resolved compile configuration for one project.
///
/// Every per-AOL accessor returns the property-store override for that
/// platform when one exists, and the configured default otherwise. A
/// malformed property resource fails every accessor.
#[derive(Debug, Clone)]
pub struct CompileContext {
    inner: Arc<ContextInner>,
}

impl CompileContext {
    pub fn project(&self) -> &ProjectId {
        self.inner.info.project()
    }

    /// The property store backing this context.
    pub fn info(&self) -> &NarInfo {
        &self.inner.info
    }

    pub fn state(&self) -> ResolverState {
        match self.inner.info.state() {
            LoadState::Unloaded => ResolverState::Unconfigured,
            LoadState::Loaded | LoadState::Failed => ResolverState::Resolved,
        }
    }

    /// Parallelism limit for `aol`; 0 means unlimited.
    pub fn max_cores(&self, aol: &Aol) -> Result<u32, PropertyError> {
        self.inner
            .info
            .get_int(aol, info::MAX_CORES, self.inner.max_cores)
    }

    /// Number of parallel jobs to run for `aol`, with "unlimited" mapped
    /// to the available parallelism of this machine.
    pub fn effective_jobs(&self, aol: &Aol) -> Result<usize, PropertyError> {
        match self.max_cores(aol)? {
            0 => Ok(std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)),
            n => Ok(n as usize),
        }
    }

    pub fn use_libtool(&self, aol: &Aol) -> Result<bool, PropertyError> {
        self.inner.info.get_bool(aol, info::LIBTOOL, self.inner.libtool)
    }

    pub fn fail_on_error(&self, aol: &Aol) -> Result<bool, PropertyError> {
        self.inner
            .info
            .get_bool(aol, info::FAIL_ON_ERROR, self.inner.fail_on_error)
    }

    /// Runtime linkage mode for `aol`. Not validated here.
    pub fn runtime(&self, aol: &Aol) -> Result<String, PropertyError> {
        self.inner
            .info
            .get_property(aol, info::RUNTIME, &self.inner.runtime)
    }

    /// Output artifact name for a `library_type` target on `aol`.
    ///
    /// Non-Windows, non-executable outputs named after the artifact get the
    /// version appended; everything else uses the configured output as is.
    /// An `output` override in the property store wins over both.
    pub fn output(&self, aol: &Aol, library_type: LibraryType) -> Result<String, PropertyError> {
        let versioned = !aol.is_windows() && !library_type.is_executable();
        let default = self.default_output(versioned);
        self.inner.info.get_output(aol, &default)
    }

    fn default_output(&self, versioned: bool) -> String {
        let project = self.project();
        if versioned && self.inner.output == project.artifact_id {
            format!("{}-{}", self.inner.output, project.version)
        } else {
            self.inner.output.clone()
        }
    }

    pub fn c(&self) -> Option<&Compiler> {
        self.inner.c.as_ref()
    }

    pub fn cpp(&self) -> Option<&Compiler> {
        self.inner.cpp.as_ref()
    }

    pub fn fortran(&self) -> Option<&Compiler> {
        self.inner.fortran.as_ref()
    }

    pub fn compiler(&self, family: CompilerFamily) -> Option<&Compiler> {
        match family {
            CompilerFamily::C => self.c(),
            CompilerFamily::Cpp => self.cpp(),
            CompilerFamily::Fortran => self.fortran(),
        }
    }

    /// Active compilers in C, C++, Fortran order.
    pub fn active_compilers(&self) -> Vec<&Compiler> {
        CompilerFamily::ALL
            .iter()
            .filter_map(|&family| self.compiler(family))
            .collect()
    }

    /// Java interop settings; defaults apply when none were configured.
    pub fn java(&self) -> &Java {
        &self.inner.java
    }

    pub fn only_specified_compilers(&self) -> bool {
        self.inner.only_specified_compilers
    }

    pub fn decorate_linker_options(&self) -> bool {
        self.inner.decorate_linker_options
    }

    /// Configured tests; empty when none were configured.
    pub fn tests(&self) -> &[TestEntry] {
        &self.inner.tests
    }

    /// Dependency libraries in link order; empty when no order was set.
    pub fn dependency_link_order(&self) -> &[String] {
        &self.inner.dependency_link_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Os;
    use crate::info::MemorySource;

    fn project() -> ProjectId {
        ProjectId::new("org.example", "hello", "1.0")
    }

    fn store(text: &str) -> NarInfo {
        NarInfo::new(project(), MemorySource::new(text))
    }

    fn windows() -> Aol {
        Aol::new("x86", Os::Windows, "msvc")
    }

    fn linux() -> Aol {
        Aol::new("x86_64", Os::Linux, "gcc")
    }

    #[test]
    fn test_max_cores_override_per_platform() {
        let ctx = CompileConfig::new().build(store("win-x86.maxCores=4\n"));
        assert_eq!(ctx.max_cores(&windows()).unwrap(), 4);
        assert_eq!(ctx.max_cores(&linux()).unwrap(), 0);
    }

    #[test]
    fn test_configured_defaults_used_without_overrides() {
        let mut config = CompileConfig::new();
        config
            .set_max_cores(6)
            .set_libtool(true)
            .set_fail_on_error(false)
            .set_runtime("static");
        let ctx = config.build(NarInfo::new(project(), MemorySource::missing()));

        assert_eq!(ctx.max_cores(&linux()).unwrap(), 6);
        assert!(ctx.use_libtool(&linux()).unwrap());
        assert!(!ctx.fail_on_error(&linux()).unwrap());
        assert_eq!(ctx.runtime(&linux()).unwrap(), "static");
    }

    #[test]
    fn test_builtin_defaults() {
        let ctx = CompileConfig::new().build(store(""));
        assert_eq!(ctx.max_cores(&linux()).unwrap(), 0);
        assert!(!ctx.use_libtool(&linux()).unwrap());
        assert!(ctx.fail_on_error(&linux()).unwrap());
        assert_eq!(ctx.runtime(&linux()).unwrap(), "dynamic");
    }

    #[test]
    fn test_overrides_beat_configured_defaults() {
        let mut config = CompileConfig::new();
        config.set_libtool(true).set_runtime("static");
        let ctx = config.build(store(
            "x86_64-Linux.libtool=false\n*.runtime=dynamic\nx86-Windows-msvc.failOnError=false\n",
        ));

        assert!(!ctx.use_libtool(&linux()).unwrap());
        assert!(ctx.use_libtool(&windows()).unwrap());
        assert_eq!(ctx.runtime(&windows()).unwrap(), "dynamic");
        assert!(!ctx.fail_on_error(&windows()).unwrap());
        assert!(ctx.fail_on_error(&linux()).unwrap());
    }

    #[test]
    fn test_invalid_runtime_passes_through() {
        let ctx = CompileConfig::new().build(store("*.runtime=shared-ish\n"));
        assert_eq!(ctx.runtime(&linux()).unwrap(), "shared-ish");
    }

    #[test]
    fn test_effective_jobs() {
        let ctx = CompileConfig::new().build(store("win-x86.maxCores=3\n"));
        assert_eq!(ctx.effective_jobs(&windows()).unwrap(), 3);
        assert!(ctx.effective_jobs(&linux()).unwrap() >= 1);
    }

    #[test]
    fn test_state_transitions_on_first_query() {
        let ctx = CompileConfig::new().build(store("*.maxCores=2\n"));
        assert_eq!(ctx.state(), ResolverState::Unconfigured);

        ctx.max_cores(&linux()).unwrap();
        assert_eq!(ctx.state(), ResolverState::Resolved);

        ctx.use_libtool(&windows()).unwrap();
        ctx.runtime(&linux()).unwrap();
        assert_eq!(ctx.info().load_count(), 1);
    }

    #[test]
    fn test_malformed_resource_fails_every_accessor() {
        let ctx = CompileConfig::new().build(store("broken=\\uXYZ"));
        assert!(ctx.max_cores(&linux()).is_err());
        assert!(ctx.use_libtool(&windows()).is_err());
        assert!(ctx.fail_on_error(&linux()).is_err());
        assert!(ctx.runtime(&linux()).is_err());
        assert!(ctx.output(&linux(), LibraryType::Shared).is_err());
        assert_eq!(ctx.info().load_count(), 1);
    }

    #[test]
    fn test_output_naming() {
        let ctx = CompileConfig::new().build(store(""));

        // Non-Windows library: versioned.
        assert_eq!(ctx.output(&linux(), LibraryType::Shared).unwrap(), "hello-1.0");
        assert_eq!(ctx.output(&linux(), LibraryType::Jni).unwrap(), "hello-1.0");
        // Non-Windows executable: plain.
        assert_eq!(ctx.output(&linux(), LibraryType::Executable).unwrap(), "hello");
        // Windows, any type: plain.
        assert_eq!(ctx.output(&windows(), LibraryType::Shared).unwrap(), "hello");
        assert_eq!(ctx.output(&windows(), LibraryType::Executable).unwrap(), "hello");
    }

    #[test]
    fn test_custom_output_is_not_versioned() {
        let mut config = CompileConfig::new();
        config.set_output("greeter");
        let ctx = config.build(store(""));
        assert_eq!(ctx.output(&linux(), LibraryType::Shared).unwrap(), "greeter");
    }

    #[test]
    fn test_output_override() {
        let ctx = CompileConfig::new().build(store("x86_64-Linux-gcc.output=hello-special\n"));
        assert_eq!(
            ctx.output(&linux(), LibraryType::Static).unwrap(),
            "hello-special"
        );
        assert_eq!(ctx.output(&windows(), LibraryType::Static).unwrap(), "hello");
    }

    #[test]
    fn test_unspecified_compilers_absent_by_default() {
        let ctx = CompileConfig::new().build(store(""));
        assert!(ctx.c().is_none());
        assert!(ctx.cpp().is_none());
        assert!(ctx.fortran().is_none());
        assert!(ctx.active_compilers().is_empty());
    }

    #[test]
    fn test_only_specified_compilers_activates_defaults() {
        let mut config = CompileConfig::new();
        config.set_only_specified_compilers(true);
        let ctx = config.build(store(""));

        let cpp = ctx.cpp().expect("C++ activated");
        assert!(cpp.belongs_to(&ctx));
        assert_eq!(cpp.config(), &CompilerConfig::default());
        assert_eq!(ctx.active_compilers().len(), 3);
        assert!(ctx.only_specified_compilers());
    }

    #[test]
    fn test_explicit_compiler_is_bound() {
        let mut config = CompileConfig::new();
        config.set_c(CompilerConfig {
            name: Some("clang".to_string()),
            ..Default::default()
        });
        let ctx = config.build(store(""));

        let c = ctx.c().unwrap();
        assert!(c.belongs_to(&ctx));
        assert_eq!(c.family(), CompilerFamily::C);
        assert!(ctx.cpp().is_none());

        let other = CompileConfig::new().build(store(""));
        assert!(!c.belongs_to(&other));
    }

    #[test]
    fn test_last_set_wins() {
        let mut config = CompileConfig::new();
        config
            .set_cpp(CompilerConfig {
                name: Some("g++".to_string()),
                ..Default::default()
            })
            .set_compiler(
                CompilerFamily::Cpp,
                CompilerConfig {
                    name: Some("clang++".to_string()),
                    ..Default::default()
                },
            );
        let ctx = config.build(store(""));
        assert_eq!(ctx.cpp().unwrap().config().name.as_deref(), Some("clang++"));
    }

    #[test]
    fn test_descriptor_requeries_context() {
        let mut config = CompileConfig::new();
        config.set_cpp(CompilerConfig {
            name: Some("g++".to_string()),
            ..Default::default()
        });
        let ctx = config.build(store("x86-Windows-msvc.cpp.compiler=msvc\n"));

        let cpp = ctx.cpp().unwrap();
        assert_eq!(cpp.name(&windows()).unwrap(), "msvc");
        assert_eq!(cpp.name(&linux()).unwrap(), "g++");

        let back = cpp.context().unwrap();
        assert_eq!(back.project(), ctx.project());
    }

    #[test]
    fn test_family_defaults() {
        let mut config = CompileConfig::new();
        config.set_only_specified_compilers(true);
        let ctx = config.build(store(""));

        assert_eq!(ctx.fortran().unwrap().name(&linux()).unwrap(), "gfortran");
        assert!(ctx.cpp().unwrap().exceptions());
        assert!(ctx.cpp().unwrap().rtti());
        assert!(!ctx.c().unwrap().exceptions());
    }

    #[test]
    fn test_java_always_present_and_bound() {
        let ctx = CompileConfig::new().build(store(""));
        let java = ctx.java();
        assert!(java.belongs_to(&ctx));
        assert!(java.config().include);
        assert!(!java.config().link);
        assert_eq!(java.config().runtime, "server");
    }

    #[test]
    fn test_java_include_dirs() {
        let mut config = CompileConfig::new();
        config.set_java(JavaConfig {
            home: Some("/opt/jdk".into()),
            ..Default::default()
        });
        let ctx = config.build(store(""));

        let dirs = ctx.java().include_dirs(&windows());
        assert_eq!(
            dirs,
            vec![
                std::path::PathBuf::from("/opt/jdk/include"),
                std::path::PathBuf::from("/opt/jdk/include/win32"),
            ]
        );
    }

    #[test]
    fn test_tests_and_link_order() {
        let ctx = CompileConfig::new().build(store(""));
        assert!(ctx.tests().is_empty());
        assert!(ctx.dependency_link_order().is_empty());

        let mut config = CompileConfig::new();
        config
            .set_tests(vec![TestEntry::new("smoke")])
            .set_dependency_link_order(vec!["a".to_string(), "b".to_string()])
            .set_dependency_link_order(vec!["ssl".to_string(), "crypto".to_string()]);
        let ctx = config.build(store(""));

        assert_eq!(ctx.tests().len(), 1);
        assert_eq!(ctx.dependency_link_order(), ["ssl", "crypto"]);
    }

    #[test]
    fn test_context_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompileContext>();
    }
}
