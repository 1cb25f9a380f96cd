//! Project identity - WHICH project (group + artifact + version).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the per-project property resource.
pub const NAR_PROPERTIES: &str = "nar.properties";

/// Identity of the project being compiled.
///
/// Scopes the property resource: each (group, artifact) pair has its own
/// `nar.properties` file in the project's resource tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectId {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ProjectId {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        ProjectId {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Directory holding the property resource, relative to the project root.
    pub fn properties_dir(&self, basedir: &Path) -> PathBuf {
        basedir
            .join("src")
            .join("main")
            .join("resources")
            .join("META-INF")
            .join("nar")
            .join(&self.group_id)
            .join(&self.artifact_id)
    }

    /// Full path of the property resource for a project rooted at `basedir`.
    pub fn properties_path(&self, basedir: &Path) -> PathBuf {
        self.properties_dir(basedir).join(NAR_PROPERTIES)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
