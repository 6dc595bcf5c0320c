use std::path::PathBuf;

use bluering_protocol::ProtocolConfig;
use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod encode;
pub mod list;
pub mod replay;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every known command.
    List(ListArgs),
    /// Print the outbound frame for a command.
    Encode(EncodeArgs),
    /// Decode captured response frames for a command.
    Replay(ReplayArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, config: ProtocolConfig) -> CliResult<i32> {
    match command {
        Command::List(args) => list::run(args, format),
        Command::Encode(args) => encode::run(args, format, &config),
        Command::Replay(args) => replay::run(args, format, config),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Command name (see `list`).
    pub command: String,
    /// Parameters as key=value.
    #[arg(value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Command name (see `list`).
    pub command: String,
    /// Parameters as key=value, as given when the command was sent.
    #[arg(value_name = "KEY=VALUE")]
    pub params: Vec<String>,
    /// Capture file, one hex frame per line. Default: stdin.
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
