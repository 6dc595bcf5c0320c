use std::fs;
use std::io::{self, Read};

use bluering_protocol::{Command, Params, Progress, ProtocolConfig};
use tracing::{debug, warn};

use crate::cmd::ReplayArgs;
use crate::exit::{io_error, protocol_error, CliError, CliResult, DATA_INVALID, FAILURE, SUCCESS};
use crate::output::{print_decoded, OutputFormat};

pub fn run(args: ReplayArgs, format: OutputFormat, config: ProtocolConfig) -> CliResult<i32> {
    let context = format!("replay {}", args.command);
    let params = Params::parse(&args.params).map_err(|err| protocol_error(&context, err))?;
    let command = Command::new(&args.command, params, &config)
        .map_err(|err| protocol_error(&context, err))?;

    let text = match &args.input {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| io_error(&format!("read {}", path.display()), err))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|err| io_error("read stdin", err))?;
            buf
        }
    };
    let frames = parse_capture(&text)?;

    let mut session = command.session(config);
    for (line, frame) in &frames {
        match session.feed(frame) {
            Progress::Ignored => {
                warn!(line, frame = %hex::encode(frame), "frame after response complete");
            }
            Progress::Failed => break,
            Progress::Complete => debug!(line, "response complete"),
            Progress::Pending => {}
        }
    }

    if !session.is_terminal() {
        return Err(CliError::new(
            FAILURE,
            format!(
                "{context}: response incomplete after {} frame(s)",
                frames.len()
            ),
        ));
    }

    let decoded = session
        .decode()
        .map_err(|err| protocol_error(&context, err))?;
    let raw = session.raw().unwrap_or_default();
    print_decoded(&decoded, &raw, format);
    Ok(SUCCESS)
}

/// One frame per line; the last whitespace-separated token is the hex frame,
/// so captures with a leading timestamp column work as-is.
fn parse_capture(text: &str) -> CliResult<Vec<(usize, Vec<u8>)>> {
    let mut frames = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(token) = trimmed.split_whitespace().last() else {
            continue;
        };
        let frame = hex::decode(token).map_err(|err| {
            CliError::new(
                DATA_INVALID,
                format!("line {line_no}: invalid hex frame {token:?}: {err}"),
            )
        })?;
        frames.push((line_no, frame));
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_skips_comments_and_takes_last_token() {
        let text = "# battery\n\n12:00:01.250 03410000000000000000000000000044\n";
        let frames = parse_capture(text).expect("capture should parse");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].0, 3);
        assert_eq!(frames[0].1[0], 0x03);
        assert_eq!(frames[0].1.len(), 16);
    }

    #[test]
    fn capture_reports_bad_line() {
        let err = parse_capture("0300\nzz\n").expect_err("bad hex should fail");
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.contains("line 2"));
    }
}
