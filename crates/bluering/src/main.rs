mod cmd;
mod exit;
mod logging;
mod output;

use bluering_protocol::{ProtocolConfig, TimeZoneMode, Validation};
use chrono::NaiveDate;
use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "bluering", version, about = "Smart-ring protocol toolkit")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Fail on frame length, opcode or checksum problems instead of logging them.
    #[arg(long, global = true)]
    strict: bool,

    /// Use UTC instead of local time for the clock and decoded timestamps.
    #[arg(long, global = true)]
    utc: bool,

    /// Log every received frame at debug level.
    #[arg(long, global = true)]
    trace_frames: bool,

    /// Reference date for "days ago" fields (YYYY-MM-DD). Default: today.
    #[arg(long, value_name = "DATE", global = true, env = "BLUERING_TODAY")]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn protocol_config(&self) -> ProtocolConfig {
        ProtocolConfig {
            validation: if self.strict {
                Validation::Strict
            } else {
                Validation::Lenient
            },
            time_zone: if self.utc {
                TimeZoneMode::Utc
            } else {
                TimeZoneMode::Local
            },
            trace_frames: self.trace_frames,
            today: self.today,
            ..ProtocolConfig::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let log_level = if cli.trace_frames {
        cli.log_level.at_least_debug()
    } else {
        cli.log_level
    };
    init_logging(cli.log_format, log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let config = cli.protocol_config();
    let result = cmd::run(cli.command, format, config);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encode_with_params() {
        let cli = Cli::try_parse_from(["bluering", "encode", "hrpref", "enabled=yes", "period=30"])
            .expect("encode args should parse");
        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.command, "hrpref");
                assert_eq!(args.params, vec!["enabled=yes", "period=30"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_build_config() {
        let cli = Cli::try_parse_from([
            "bluering",
            "replay",
            "sleeplog",
            "--strict",
            "--utc",
            "--today",
            "2024-10-22",
        ])
        .expect("replay args should parse");
        let config = cli.protocol_config();
        assert_eq!(config.validation, Validation::Strict);
        assert_eq!(config.time_zone, TimeZoneMode::Utc);
        assert_eq!(config.today, NaiveDate::from_ymd_opt(2024, 10, 22));
    }

    #[test]
    fn rejects_bad_today() {
        let err = Cli::try_parse_from(["bluering", "--today", "tomorrow", "list"])
            .expect_err("bad date should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
