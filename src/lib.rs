//! Benchmark application descriptors and command synthesis
//!
//! Validates the applications of a benchmark run and builds the command line each execution
//! unit runs, either natively or inside an execution container where the project root is
//! mounted at [`path_resolver::CONTAINER_ROOT`].

mod helpers;
mod local_logger;
mod prelude;

pub mod application;
pub mod cli;
pub mod config;
pub mod error;
pub mod path_resolver;

pub use application::{Application, BinaryPolicy, CommandBuilder, RuntimeParams};
pub use error::ApplicationError;
pub use path_resolver::PathResolver;
