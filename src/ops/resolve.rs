//! Resolve effective settings for many platforms at once.

use rayon::prelude::*;
use serde::Serialize;

use crate::compile::{CompileContext, CompilerFamily};
use crate::core::{Aol, LibraryType};
use crate::info::PropertyError;

/// A compiler active for a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveCompiler {
    pub family: CompilerFamily,
    pub name: String,
}

/// Output name for one library type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputName {
    #[serde(rename = "type")]
    pub library_type: LibraryType,
    pub name: String,
}

/// Every effective setting for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveSettings {
    pub aol: Aol,
    pub max_cores: u32,
    pub jobs: usize,
    pub libtool: bool,
    pub fail_on_error: bool,
    pub runtime: String,
    pub outputs: Vec<OutputName>,
    pub compilers: Vec<ActiveCompiler>,
}

/// Resolve the settings for a single platform.
pub fn resolve_platform(
    ctx: &CompileContext,
    aol: &Aol,
    library_types: &[LibraryType],
) -> Result<EffectiveSettings, PropertyError> {
    let outputs = library_types
        .iter()
        .map(|&library_type| {
            Ok(OutputName {
                library_type,
                name: ctx.output(aol, library_type)?,
            })
        })
        .collect::<Result<Vec<_>, PropertyError>>()?;

    let compilers = ctx
        .active_compilers()
        .into_iter()
        .map(|compiler| {
            Ok(ActiveCompiler {
                family: compiler.family(),
                name: compiler.name(aol)?,
            })
        })
        .collect::<Result<Vec<_>, PropertyError>>()?;

    Ok(EffectiveSettings {
        aol: aol.clone(),
        max_cores: ctx.max_cores(aol)?,
        jobs: ctx.effective_jobs(aol)?,
        libtool: ctx.use_libtool(aol)?,
        fail_on_error: ctx.fail_on_error(aol)?,
        runtime: ctx.runtime(aol)?,
        outputs,
        compilers,
    })
}

/// Resolve settings for every platform in parallel.
///
/// Results come back in the order of `aols`. A configuration error for any
/// platform fails the whole resolution.
pub fn resolve_platforms(
    ctx: &CompileContext,
    aols: &[Aol],
    library_types: &[LibraryType],
) -> Result<Vec<EffectiveSettings>, PropertyError> {
    tracing::debug!("resolving {} platform(s) for {}", aols.len(), ctx.project());

    aols.par_iter()
        .map(|aol| resolve_platform(ctx, aol, library_types))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{CompileConfig, CompilerConfig};
    use crate::core::{Os, ProjectId};
    use crate::info::{MemorySource, NarInfo};

    fn context(properties: &str) -> CompileContext {
        let mut config = CompileConfig::new();
        config.set_c(CompilerConfig::default());
        config.build(NarInfo::new(
            ProjectId::new("org.example", "hello", "1.0"),
            MemorySource::new(properties),
        ))
    }

    fn platforms() -> Vec<Aol> {
        vec![
            Aol::new("x86", Os::Windows, "msvc"),
            Aol::new("x86_64", Os::Linux, "gcc"),
            Aol::new("aarch64", Os::MacOsx, "g++"),
        ]
    }

    #[test]
    fn test_resolve_platform() {
        let ctx = context("win-x86.maxCores=4\nx86-Windows-msvc.c.compiler=msvc\n");
        let settings = resolve_platform(
            &ctx,
            &platforms()[0],
            &[LibraryType::Shared, LibraryType::Executable],
        )
        .unwrap();

        assert_eq!(settings.max_cores, 4);
        assert_eq!(settings.jobs, 4);
        assert!(!settings.libtool);
        assert!(settings.fail_on_error);
        assert_eq!(settings.runtime, "dynamic");
        assert_eq!(settings.outputs[0].name, "hello");
        assert_eq!(settings.outputs[1].name, "hello");
        assert_eq!(
            settings.compilers,
            vec![ActiveCompiler {
                family: CompilerFamily::C,
                name: "msvc".to_string()
            }]
        );
    }

    #[test]
    fn test_resolve_platforms_preserves_order_and_loads_once() {
        let ctx = context("*.maxCores=2\nx86_64-Linux.maxCores=8\n");
        let aols = platforms();

        let all = resolve_platforms(&ctx, &aols, &[LibraryType::Shared]).unwrap();

        assert_eq!(all.len(), 3);
        for (settings, aol) in all.iter().zip(&aols) {
            assert_eq!(&settings.aol, aol);
        }
        assert_eq!(all[0].max_cores, 2);
        assert_eq!(all[1].max_cores, 8);
        assert_eq!(all[1].outputs[0].name, "hello-1.0");
        assert_eq!(all[2].compilers[0].name, "gcc");
        assert_eq!(ctx.info().load_count(), 1);
    }

    #[test]
    fn test_resolve_platforms_fails_on_malformed_resource() {
        let ctx = context("bad=\\u12");
        assert!(resolve_platforms(&ctx, &platforms(), &[]).is_err());
    }

    #[test]
    fn test_settings_serialize() {
        let ctx = context("");
        let settings = resolve_platform(&ctx, &platforms()[1], &[LibraryType::Jni]).unwrap();
        let json = serde_json::to_value(&settings).unwrap();

        assert_eq!(json["aol"], "x86_64-Linux-gcc");
        assert_eq!(json["outputs"][0]["type"], "jni");
        assert_eq!(json["compilers"][0]["family"], "c");
    }
}
