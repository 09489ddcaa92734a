use std::io::Write;

use clap::Args;

use crate::application::{BinaryPolicy, CommandBuilder, RuntimeParams};
use crate::config::RunConfig;
use crate::helpers::expand_path;
use crate::path_resolver::PathResolver;
use crate::prelude::*;

#[derive(Args, Debug)]
pub struct CommandArgs {
    /// Number of execution units, applications are assigned to them in a round robin fashion
    #[arg(long, short, default_value_t = 1)]
    pub units: usize,

    /// Number of threads of each execution unit
    #[arg(long, short, default_value_t = 1)]
    pub threads: u64,

    /// Duration of the benchmark, in seconds
    #[arg(long, short, default_value_t = 10)]
    pub duration: u64,

    /// Number of nop instructions following each operation
    #[arg(long, short, default_value_t = 0)]
    pub noise: u64,

    /// Initial size of the benchmarked data structure
    #[arg(long, short = 's', default_value_t = 1024)]
    pub initial_size: u64,

    /// Directory the commands are run from. Defaults to the project root
    #[arg(long)]
    pub work_dir: Option<String>,

    /// How external binaries are made reachable. Overrides the `binary-policy` of the
    /// configuration
    #[arg(long, value_enum)]
    pub binary_policy: Option<BinaryPolicy>,

    /// Generate the commands for execution containers instead of the host
    #[arg(long, default_value = "false")]
    pub in_container: bool,
}

pub fn run(args: &CommandArgs, config: &RunConfig, resolver: &PathResolver) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write_commands(args, config, resolver, &mut stdout)
}

/// Write one line per execution unit, prefixed by a `cd` when the command
/// must be run from another directory.
fn write_commands(
    args: &CommandArgs,
    config: &RunConfig,
    resolver: &PathResolver,
    out: &mut impl Write,
) -> Result<()> {
    let applications = config.applications()?;
    if applications.is_empty() {
        bail!("The configuration does not define any application");
    }

    let work_dir = args
        .work_dir
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(|| resolver.project_root().to_path_buf());
    let policy = args.binary_policy.unwrap_or(config.binary_policy);
    debug!("Using the {policy:?} binary policy");
    let builder = CommandBuilder::new(resolver, policy).in_container(args.in_container);

    for index in 0..args.units {
        let Some(app) = applications.for_execution_unit(index) else {
            continue;
        };
        let params = RuntimeParams {
            threads: args.threads,
            duration: args.duration,
            noise: args.noise,
            initial_size: args.initial_size,
            index: index as u64,
        };
        let invocation = builder
            .build_invocation(app, &params, &work_dir)
            .with_context(|| format!("Failed to generate the command of `{}`", app.name()))?;

        match invocation.working_directory {
            Some(dir) => writeln!(out, "cd {} && {}", dir.display(), invocation.command)?,
            None => writeln!(out, "{}", invocation.command)?,
        }
    }

    Ok(())
}
