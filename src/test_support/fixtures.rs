//! Test fixtures for common test scenarios.

use std::path::{Path, PathBuf};

use crate::core::{ProjectId, MANIFEST_NAME};

/// Fixture for a project on disk.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Project identity.
    pub project: ProjectId,
    /// Narwhal.toml content.
    pub manifest: String,
    /// nar.properties content, if the project has one.
    pub properties: Option<String>,
}

impl ProjectFixture {
    /// A project with just a `[project]` section.
    pub fn minimal(project: ProjectId) -> Self {
        let manifest = format!(
            "[project]\ngroup-id = \"{}\"\nartifact-id = \"{}\"\nversion = \"{}\"\n",
            project.group_id, project.artifact_id, project.version
        );
        ProjectFixture {
            project,
            manifest,
            properties: None,
        }
    }

    /// `org.example:hello:1.0`, built for Linux and Windows with C++.
    pub fn hello() -> Self {
        let mut fixture = Self::minimal(ProjectId::new("org.example", "hello", "1.0"));
        fixture.manifest.push_str(
            r#"
[compile]
runtime = "static"
dependency-link-order = ["ssl", "crypto", "z"]
aols = ["amd64-Linux-gcc", "x86-Windows-msvc"]

[compile.cpp]
options = ["-Wall"]

[[compile.tests]]
name = "hello-test"
"#,
        );
        fixture
    }

    /// Set the property resource content.
    pub fn with_properties(mut self, properties: impl Into<String>) -> Self {
        self.properties = Some(properties.into());
        self
    }

    /// Write the project under `root`, returning the manifest path.
    pub fn write_to(&self, root: &Path) -> PathBuf {
        std::fs::create_dir_all(root).expect("create project root");
        let manifest_path = root.join(MANIFEST_NAME);
        std::fs::write(&manifest_path, &self.manifest).expect("write manifest");

        if let Some(properties) = &self.properties {
            let path = self.project.properties_path(root);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("create properties dir");
            }
            std::fs::write(&path, properties).expect("write properties");
        }

        manifest_path
    }
}
