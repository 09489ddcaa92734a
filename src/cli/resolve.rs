use std::path::PathBuf;

use clap::Args;

use crate::path_resolver::PathResolver;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Absolute path, or path relative to the project root
    pub path: PathBuf,

    /// Resolve the path as seen from inside an execution container
    #[arg(long, default_value = "false")]
    pub in_container: bool,
}

pub fn run(args: &ResolveArgs, resolver: &PathResolver) {
    println!(
        "{}",
        resolver.resolve_path(&args.path, args.in_container).display()
    );
}
