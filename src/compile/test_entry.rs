//! Native test executables built alongside the project.

use serde::{Deserialize, Serialize};

/// A test executable to build (and optionally run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestEntry {
    /// Test name, also the executable name
    pub name: String,

    /// How the test links against the project library
    #[serde(default = "default_link")]
    pub link: String,

    /// Run the test after building it
    #[serde(default = "default_run")]
    pub run: bool,

    /// Arguments passed when running
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_link() -> String {
    "shared".to_string()
}

fn default_run() -> bool {
    true
}

impl TestEntry {
    pub fn new(name: impl Into<String>) -> Self {
        TestEntry {
            name: name.into(),
            link: default_link(),
            run: default_run(),
            args: Vec::new(),
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Build the test but don't run it.
    pub fn build_only(mut self) -> Self {
        self.run = false;
        self
    }
}
