use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application::{Application, ApplicationConfig, BinaryPolicy};
use crate::error::ApplicationError;
use crate::prelude::*;

/// Benchmark run configuration, as written in the configuration file.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RunConfig {
    pub applications: Vec<ApplicationConfig>,
    #[serde(default)]
    pub binary_policy: BinaryPolicy,
}

impl RunConfig {
    /// Load the configuration at `path`.
    ///
    /// `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        let config: Self = if is_json {
            serde_json::from_slice(&content)
                .with_context(|| format!("Failed to parse JSON config at {}", path.display()))?
        } else {
            serde_yaml::from_slice(&content)
                .with_context(|| format!("Failed to parse YAML config at {}", path.display()))?
        };
        debug!("Config loaded from {}", path.display());

        Ok(config)
    }

    /// Validate every application of the configuration.
    pub fn applications(&self) -> std::result::Result<Applications, ApplicationError> {
        let applications = self
            .applications
            .iter()
            .cloned()
            .map(Application::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Applications(applications))
    }
}

/// The validated applications of a run, in round robin order.
#[derive(Debug, Clone, PartialEq)]
pub struct Applications(Vec<Application>);

impl Applications {
    /// Application assigned to the execution unit `index`.
    pub fn for_execution_unit(&self, index: usize) -> Option<&Application> {
        if self.0.is_empty() {
            return None;
        }
        self.0.get(index % self.0.len())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Application> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
