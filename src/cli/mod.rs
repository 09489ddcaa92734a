mod command;
mod locate;
mod resolve;
mod validate;

use std::path::PathBuf;

use crate::{
    config::RunConfig, helpers::expand_path, local_logger::init_local_logger,
    path_resolver::PathResolver, prelude::*,
};
use clap::{
    Parser, Subcommand,
    builder::{Styles, styling},
};

fn create_styles() -> Styles {
    styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Cyan.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Validate benchmark applications and generate their command lines",
    styles = create_styles()
)]
pub struct Cli {
    /// Path to the run configuration file (JSON or YAML)
    #[arg(long, short, env = "BM_CONFIG", global = true)]
    pub config: Option<String>,

    /// Root directory of the project, mounted at the container root inside the execution
    /// containers. Defaults to the closest parent directory holding a `.git` entry.
    #[arg(long, env = "BM_PROJECT_ROOT", global = true)]
    pub project_root: Option<String>,

    /// Mount point of the project root inside the execution containers
    #[arg(
        long,
        global = true,
        hide = true,
        default_value = crate::path_resolver::CONTAINER_ROOT
    )]
    pub container_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the command run by each execution unit
    #[command(alias = "cmd")]
    Command(command::CommandArgs),
    /// Resolve a path as seen from the host or from an execution container
    Resolve(resolve::ResolveArgs),
    /// Locate a binary or script
    Locate(locate::LocateArgs),
    /// Validate the run configuration and list its applications
    Validate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_local_logger()?;

    let resolver = cli.path_resolver()?;
    debug!(
        "Project root {} is mounted at {}",
        resolver.project_root().display(),
        resolver.container_root().display()
    );

    match cli.command {
        Commands::Command(ref args) => command::run(args, &cli.load_config()?, &resolver)?,
        Commands::Resolve(ref args) => resolve::run(args, &resolver),
        Commands::Locate(ref args) => locate::run(args)?,
        Commands::Validate => validate::run(&cli.load_config()?)?,
    }
    Ok(())
}

impl Cli {
    fn path_resolver(&self) -> Result<PathResolver> {
        let resolver = match &self.project_root {
            Some(project_root) => PathResolver::new(expand_path(project_root)),
            None => PathResolver::discover()?,
        };
        Ok(resolver.with_container_root(&self.container_root))
    }

    fn load_config(&self) -> Result<RunConfig> {
        let Some(config) = &self.config else {
            bail!("No configuration file given, use --config or BM_CONFIG");
        };
        RunConfig::load(&expand_path(config))
    }
}
