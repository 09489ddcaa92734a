//! Applications are the benchmarks run by the execution units.
//!
//! An application is either a builtin benchmark binary staged in
//! [`BUILTIN_APP_DIR`], or an external application/benchmark binary found
//! system wide or under its configured `path`. When more than one
//! application is configured, execution units are assigned applications in
//! a round robin fashion.

mod command;
pub mod template;

pub use command::{CommandBuilder, Invocation};
pub use template::RuntimeParams;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Total of every operation distribution of a builtin benchmark.
pub const DISTRIBUTION_SUM: u64 = 1024;

/// Where builtin benchmark binaries are staged, relative to the working
/// directory of a run.
pub const BUILTIN_APP_DIR: &str = "build/bench";

pub const DEFAULT_ARGS: &str = "-t={threads} -n={noise} -d={duration} -s={initial_size}";

/// How a binary living under an application's `path` is made reachable by
/// the execution units.
#[derive(ValueEnum, Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BinaryPolicy {
    /// Copy the binary into the builtin benchmark directory and run it from there.
    #[default]
    CopyToStaging,
    /// Run the binary from where it was found.
    ReferenceInPlace,
}

/// Result parsing configuration of an external application.
///
/// It is forwarded untouched to whatever interprets the application output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Adapter(pub serde_json::Value);

/// One entry of the `applications` array of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ApplicationConfig {
    /// Name of the application/benchmark binary.
    pub name: String,
    /// Directory holding the binary. Required when it does not exist system wide.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Distribution of operations, each index being an operation defined by
    /// the benchmark. Only relevant for builtin benchmarks.
    #[serde(default)]
    pub operations: Vec<u32>,
    /// Command line arguments. Defaults to [`DEFAULT_ARGS`].
    #[serde(default)]
    pub args: Option<String>,
    #[serde(default)]
    pub adapter: Option<Adapter>,
    /// Switch to `path` before running the binary.
    #[serde(default)]
    pub cd: bool,
    /// Environment variable overriding `path` when set.
    #[serde(default)]
    pub path_env: Option<String>,
}

/// A validated application. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Application {
    name: String,
    path: Option<PathBuf>,
    operations: Vec<u32>,
    args: String,
    adapter: Option<Adapter>,
    change_directory: bool,
    path_env: Option<String>,
}

impl Application {
    pub fn new(name: impl Into<String>, operations: Vec<u32>) -> Result<Self, ApplicationError> {
        Self::try_from(ApplicationConfig {
            name: name.into(),
            path: None,
            operations,
            args: None,
            adapter: None,
            cd: false,
            path_env: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn operations(&self) -> &[u32] {
        &self.operations
    }

    pub fn args(&self) -> &str {
        &self.args
    }

    pub fn adapter(&self) -> Option<&Adapter> {
        self.adapter.as_ref()
    }

    pub fn change_directory(&self) -> bool {
        self.change_directory
    }

    pub fn path_env(&self) -> Option<&str> {
        self.path_env.as_deref()
    }

    pub fn is_builtin(&self) -> bool {
        self.path.is_none()
    }
}

impl TryFrom<ApplicationConfig> for Application {
    type Error = ApplicationError;

    fn try_from(config: ApplicationConfig) -> Result<Self, Self::Error> {
        let sum: u64 = config.operations.iter().map(|&op| u64::from(op)).sum();
        if !config.operations.is_empty() && sum != DISTRIBUTION_SUM {
            return Err(ApplicationError::InvalidDistribution {
                name: config.name,
                sum,
            });
        }

        let args = config.args.unwrap_or_else(|| DEFAULT_ARGS.to_owned());
        template::validate(&args)?;

        Ok(Self {
            name: config.name,
            path: config.path,
            operations: config.operations,
            args,
            adapter: config.adapter,
            change_directory: config.cd,
            path_env: config.path_env,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_distribution_is_fatal() {
        let err = Application::new("lf-bench", vec![100, 100, 100]).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            ApplicationError::InvalidDistribution { ref name, sum: 300 } if name == "lf-bench"
        ));
    }

    #[test]
    fn test_empty_distribution_is_valid() {
        let app = Application::new("redis-benchmark", vec![]).unwrap();
        assert!(app.operations().is_empty());
        assert_eq!(app.args(), DEFAULT_ARGS);
        assert!(app.is_builtin());
    }

    #[test]
    fn test_distribution_sum() {
        assert!(Application::new("lf-bench", vec![512, 512]).is_ok());
        assert!(Application::new("lf-bench", vec![1024, 0, 0]).is_ok());
        assert!(Application::new("lf-bench", vec![1024, 1]).is_err());
        assert!(Application::new("lf-bench", vec![0]).is_err());
    }

    #[test]
    fn test_distribution_sum_does_not_overflow() {
        let err = Application::new("lf-bench", vec![u32::MAX, u32::MAX]).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::InvalidDistribution { sum, .. } if sum == 2 * u64::from(u32::MAX)
        ));
    }

    #[test]
    fn test_unknown_placeholder_is_rejected_at_construction() {
        let err = Application::try_from(ApplicationConfig {
            name: "memcached".into(),
            path: Some("/opt/memcached".into()),
            operations: vec![],
            args: Some("-t {threads} -c {connections}".into()),
            adapter: None,
            cd: false,
            path_env: None,
        })
        .unwrap_err();
        assert!(!err.is_fatal());
        assert!(matches!(
            err,
            ApplicationError::UnknownPlaceholder { ref placeholder } if placeholder == "connections"
        ));
    }

    #[test]
    fn test_deserialize_external_application() {
        let json = r#"{
            "name": "db_bench",
            "path": "/opt/leveldb/build",
            "args": "--threads={threads} --duration={duration}",
            "adapter": {"name": "leveldb", "regex": "ops/sec"},
            "cd": true,
            "path-env": "LEVELDB_DIR"
        }"#;
        let config: ApplicationConfig = serde_json::from_str(json).unwrap();
        let app = Application::try_from(config).unwrap();

        assert_eq!(app.name(), "db_bench");
        assert_eq!(app.path(), Some(Path::new("/opt/leveldb/build")));
        assert!(!app.is_builtin());
        assert!(app.change_directory());
        assert_eq!(app.path_env(), Some("LEVELDB_DIR"));
        assert_eq!(
            app.adapter(),
            Some(&Adapter(serde_json::json!({"name": "leveldb", "regex": "ops/sec"})))
        );
    }

    #[test]
    fn test_deserialize_builtin_application() {
        let yaml = r#"
name: lf-hashmap
operations: [256, 256, 512]
"#;
        let config: ApplicationConfig = serde_yaml::from_str(yaml).unwrap();
        let app = Application::try_from(config).unwrap();

        assert_eq!(app.operations(), &[256, 256, 512]);
        assert_eq!(app.args(), DEFAULT_ARGS);
        assert_eq!(app.adapter(), None);
        assert!(!app.change_directory());
    }

    #[test]
    fn test_deserialize_unknown_field() {
        let json = r#"{"name": "lf-hashmap", "operation": [1024]}"#;
        assert!(serde_json::from_str::<ApplicationConfig>(json).is_err());
    }

    #[test]
    fn test_binary_policy_deserialize() {
        assert_eq!(
            serde_json::from_str::<BinaryPolicy>(r#""reference-in-place""#).unwrap(),
            BinaryPolicy::ReferenceInPlace
        );
        assert_eq!(BinaryPolicy::default(), BinaryPolicy::CopyToStaging);
    }
}
