use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use tempfile::NamedTempFile;

use super::{Application, BUILTIN_APP_DIR, BinaryPolicy, RuntimeParams, template};
use crate::error::ApplicationError;
use crate::path_resolver::{PathResolver, ensure_exists};
use crate::prelude::*;

/// Synthesizes the command line of an [`Application`] for one execution unit.
///
/// The builder only borrows read-only state, so a single instance can be
/// shared by every execution unit of a run.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    resolver: &'a PathResolver,
    policy: BinaryPolicy,
    in_container: bool,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(resolver: &'a PathResolver, policy: BinaryPolicy) -> Self {
        Self {
            resolver,
            policy,
            in_container: false,
        }
    }

    /// Whether the command runs inside an execution container.
    pub fn in_container(mut self, in_container: bool) -> Self {
        self.in_container = in_container;
        self
    }

    /// Build the command running `app` with `params`, from `work_dir`.
    ///
    /// The command is made of the binary, the operation distribution flags
    /// and the rendered args template, in that order.
    pub fn build(
        &self,
        app: &Application,
        params: &RuntimeParams,
        work_dir: &Path,
    ) -> std::result::Result<String, ApplicationError> {
        self.build_invocation(app, params, work_dir)
            .map(|invocation| invocation.command)
    }

    /// Same as [`CommandBuilder::build`], also reporting the directory the
    /// command must be run from when it differs from `work_dir`.
    pub fn build_invocation(
        &self,
        app: &Application,
        params: &RuntimeParams,
        work_dir: &Path,
    ) -> std::result::Result<Invocation, ApplicationError> {
        let runnable = self.runnable_binary(app, work_dir)?;
        let operations = operation_flags(app.operations());
        let args = template::render(app.args(), params)?;

        let command = [runnable.command, operations, args]
            .into_iter()
            .filter(|segment| !segment.is_empty())
            .join(" ");
        info!("generated command: {command}");
        Ok(Invocation {
            command,
            working_directory: runnable.working_directory,
        })
    }

    fn runnable_binary(
        &self,
        app: &Application,
        work_dir: &Path,
    ) -> std::result::Result<Invocation, ApplicationError> {
        let staging_dir = work_dir.join(BUILTIN_APP_DIR);
        let staged = staging_dir.join(app.name());

        let search_dir = match app.path() {
            Some(path) => self.resolver.resolve_path(path, false),
            None => staging_dir,
        };
        let found = ensure_exists(app.name(), Some(&search_dir), app.path_env())?;

        if is_bare_name(&found) {
            return Ok(Invocation::in_work_dir(app.name().to_owned()));
        }
        if found == staged {
            return Ok(Invocation::in_work_dir(staged_reference(app.name())));
        }

        match self.policy {
            BinaryPolicy::CopyToStaging => {
                stage_binary(&found, &staged)?;
                Ok(Invocation::in_work_dir(staged_reference(app.name())))
            }
            BinaryPolicy::ReferenceInPlace if app.change_directory() => {
                let dir = found.parent().unwrap_or(Path::new("."));
                Ok(Invocation {
                    command: format!("./{}", app.name()),
                    working_directory: Some(self.resolver.resolve_path(dir, self.in_container)),
                })
            }
            BinaryPolicy::ReferenceInPlace => {
                Ok(Invocation::in_work_dir(self.in_place_reference(&found)))
            }
        }
    }

    fn in_place_reference(&self, found: &Path) -> String {
        let absolute = self.resolver.resolve_path(found, false);
        if self.in_container {
            return self
                .resolver
                .resolve_path(&absolute, true)
                .display()
                .to_string();
        }

        match self.resolver.strip_project_root(&absolute) {
            Some(relative) => format!("./{}", relative.display()),
            None => absolute.display().to_string(),
        }
    }
}

/// A synthesized command and the directory it must be run from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    /// Set when the command expects to be run from another directory than
    /// the working directory of the run.
    pub working_directory: Option<PathBuf>,
}

impl Invocation {
    fn in_work_dir(command: String) -> Self {
        Self {
            command,
            working_directory: None,
        }
    }
}

fn operation_flags(operations: &[u32]) -> String {
    operations
        .iter()
        .enumerate()
        .map(|(idx, val)| format!("-op{idx}={val}"))
        .join(" ")
}

fn staged_reference(name: &str) -> String {
    format!("./{}", Path::new(BUILTIN_APP_DIR).join(name).display())
}

fn is_bare_name(found: &Path) -> bool {
    found.components().count() == 1 && !found.is_absolute()
}

/// Copy `source` to `destination` through a temporary file in the same
/// directory, so that concurrent stagings never expose a partial binary.
fn stage_binary(source: &Path, destination: &Path) -> std::result::Result<(), ApplicationError> {
    let staging_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ApplicationError::Staging { path, source }
    };

    let staging_dir = destination
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&staging_dir).map_err(staging_error(&staging_dir))?;

    let mut staged = NamedTempFile::new_in(&staging_dir).map_err(staging_error(&staging_dir))?;
    let mut reader = fs::File::open(source).map_err(staging_error(source))?;
    std::io::copy(&mut reader, staged.as_file_mut()).map_err(staging_error(destination))?;

    let permissions = fs::metadata(source)
        .map_err(staging_error(source))?
        .permissions();
    staged
        .as_file()
        .set_permissions(permissions)
        .map_err(staging_error(destination))?;

    staged
        .persist(destination)
        .map_err(|err| staging_error(destination)(err.error))?;
    debug!(
        "Staged {} at {}",
        source.display(),
        destination.display()
    );
    Ok(())
}
