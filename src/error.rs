use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

/// Errors raised while validating an application or synthesizing its command.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The operation distribution of a builtin benchmark does not add up to
    /// [`crate::application::DISTRIBUTION_SUM`].
    #[error(
        "The operations distribution sum of `{name}` must be equal to {expected}, got {sum}",
        expected = crate::application::DISTRIBUTION_SUM
    )]
    InvalidDistribution { name: String, sum: u64 },

    #[error("Could not find `{name}` on PATH nor in [{}]", format_searched(.searched))]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error("Unknown placeholder `{{{placeholder}}}` in args template")]
    UnknownPlaceholder { placeholder: String },

    #[error("Unbalanced braces in args template `{template}`")]
    MalformedTemplate { template: String },

    #[error("Failed to stage binary at {}", .path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApplicationError {
    /// Whether the error means the configuration itself is wrong and the run
    /// must not go on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApplicationError::InvalidDistribution { .. })
    }
}

fn format_searched(searched: &[PathBuf]) -> String {
    searched.iter().map(|dir| dir.display()).join(", ")
}
