use bluering_protocol::CATALOG;
use serde::Serialize;

use crate::cmd::ListArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, table, OutputFormat};

#[derive(Serialize)]
struct CommandInfo {
    name: &'static str,
    generation: &'static str,
    opcode: String,
    multi_frame: bool,
    completion: &'static str,
    params: &'static [&'static str],
    summary: &'static str,
}

pub fn run(_args: ListArgs, format: OutputFormat) -> CliResult<i32> {
    let commands: Vec<CommandInfo> = CATALOG
        .iter()
        .map(|spec| CommandInfo {
            name: spec.name,
            generation: spec.generation.as_str(),
            opcode: format!("{:#04x}", spec.opcode),
            multi_frame: spec.multi_frame,
            completion: spec.completion.as_str(),
            params: spec.params,
            summary: spec.summary,
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&commands),
        OutputFormat::Table => {
            let mut t = table(vec!["NAME", "GEN", "OPCODE", "MULTI", "PARAMS", "SUMMARY"]);
            for c in &commands {
                t.add_row(vec![
                    c.name.to_string(),
                    c.generation.to_string(),
                    c.opcode.clone(),
                    if c.multi_frame { "yes" } else { "no" }.to_string(),
                    c.params.join(", "),
                    c.summary.to_string(),
                ]);
            }
            println!("{t}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for c in &commands {
                println!("{:<12} {} {}  {}", c.name, c.generation, c.opcode, c.summary);
            }
        }
    }
    Ok(SUCCESS)
}
