use bluering_protocol::{Command, Params, ProtocolConfig};
use serde::Serialize;

use crate::cmd::EncodeArgs;
use crate::exit::{protocol_error, CliResult, SUCCESS};
use crate::output::{print_json, print_raw, table, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput<'a> {
    command: &'a str,
    generation: &'static str,
    opcode: String,
    payload: String,
    frame: String,
}

pub fn run(args: EncodeArgs, format: OutputFormat, config: &ProtocolConfig) -> CliResult<i32> {
    let context = format!("encode {}", args.command);
    let params = Params::parse(&args.params).map_err(|err| protocol_error(&context, err))?;
    let command =
        Command::new(&args.command, params, config).map_err(|err| protocol_error(&context, err))?;

    let out = EncodeOutput {
        command: command.name(),
        generation: command.generation().as_str(),
        opcode: format!("{:#04x}", command.opcode()),
        payload: hex::encode(command.payload()),
        frame: hex::encode(command.frame()),
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut t = table(vec!["COMMAND", "GEN", "OPCODE", "FRAME"]);
            t.add_row(vec![
                out.command.to_string(),
                out.generation.to_string(),
                out.opcode.clone(),
                out.frame.clone(),
            ]);
            println!("{t}");
        }
        OutputFormat::Pretty => println!("{}", out.frame),
        OutputFormat::Raw => print_raw(command.frame()),
    }
    Ok(SUCCESS)
}
