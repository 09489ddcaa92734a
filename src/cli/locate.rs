use std::path::PathBuf;

use clap::Args;

use crate::path_resolver::ensure_exists;
use crate::prelude::*;

#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Name of the binary or script
    pub name: String,

    /// Directory searched when the binary is not found on PATH
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Environment variable naming a directory searched before anything else
    #[arg(long)]
    pub env_var: Option<String>,
}

pub fn run(args: &LocateArgs) -> Result<()> {
    let found = ensure_exists(&args.name, args.dir.as_deref(), args.env_var.as_deref())?;
    println!("{}", found.display());
    Ok(())
}
