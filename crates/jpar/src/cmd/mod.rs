use clap::{Args, Subcommand};
use std::path::PathBuf;

use jpar_archive::DEFAULT_LEVEL;

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod create;
pub mod dump;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the entries of an archive.
    Dump(DumpArgs),
    /// Show version information.
    Version(VersionArgs),
}

/// Without a subcommand, jpar archives `create`'s files.
pub fn run(command: Option<Command>, create: CreateArgs, format: OutputFormat) -> CliResult<i32> {
    if command.is_some() && create.output.is_some() {
        return Err(CliError::new(USAGE, "--output only applies when archiving files"));
    }
    match command {
        Some(Command::Dump(args)) => dump::run(args, format),
        Some(Command::Version(args)) => version::run(args),
        None => create::run(create),
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Files to archive, relative to the current directory.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
    /// Write the archive to this path instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
    /// Gzip compression level (0-9).
    #[arg(
        long,
        short = 'l',
        env = "JPAR_LEVEL",
        default_value_t = DEFAULT_LEVEL,
        value_parser = clap::value_parser!(u32).range(0..=9)
    )]
    pub level: u32,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Archive to read.
    pub archive: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_with_subcommand_is_usage_error() {
        let create = CreateArgs {
            files: Vec::new(),
            output: Some(PathBuf::from("out.jpg")),
            level: DEFAULT_LEVEL,
        };
        let command = Command::Version(VersionArgs { extended: false });

        let err = run(Some(command), create, OutputFormat::Pretty).unwrap_err();
        assert_eq!(err.code, USAGE);
    }
}
