use std::io::{IsTerminal, Write};

use bluering_protocol::{Decoded, SleepSegment};
use chrono::NaiveDateTime;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Print a decoded result; `raw` is what `--format raw` writes.
pub fn print_decoded(decoded: &Decoded, raw: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(decoded),
        OutputFormat::Table => println!("{}", decoded_table(decoded)),
        OutputFormat::Pretty => {
            for line in pretty_lines(decoded) {
                println!("{line}");
            }
        }
        OutputFormat::Raw => print_raw(raw),
    }
}

fn iso(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn stage_list(segment: &SleepSegment) -> String {
    segment
        .stages
        .iter()
        .map(|phase| format!("{}{}", phase.minutes, phase.stage.letter()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn decoded_table(decoded: &Decoded) -> Table {
    match decoded {
        Decoded::Steps { records } => {
            let mut t = table(vec!["TIME", "CALORIES", "STEPS", "DISTANCE"]);
            for r in records {
                t.add_row(vec![
                    iso(&r.timestamp),
                    r.calories.to_string(),
                    r.steps.to_string(),
                    r.distance.to_string(),
                ]);
            }
            t
        }
        Decoded::HeartRate { samples } => {
            let mut t = table(vec!["TIME", "BPM"]);
            for s in samples {
                t.add_row(vec![iso(&s.timestamp), s.bpm.to_string()]);
            }
            t
        }
        Decoded::Stress { samples, .. } => {
            let mut t = table(vec!["TIME", "STRESS"]);
            for s in samples {
                t.add_row(vec![iso(&s.timestamp), s.level.to_string()]);
            }
            t
        }
        Decoded::Spo2 { samples } => {
            let mut t = table(vec!["TIME", "LOW", "HIGH"]);
            for s in samples {
                t.add_row(vec![iso(&s.timestamp), s.low.to_string(), s.high.to_string()]);
            }
            t
        }
        Decoded::Sleep { segments } => {
            let mut t = table(vec!["START", "END", "MINUTES", "STAGES"]);
            for s in segments {
                t.add_row(vec![
                    iso(&s.start),
                    iso(&s.end),
                    s.duration_minutes().to_string(),
                    stage_list(s),
                ]);
            }
            t
        }
        other => {
            let mut t = table(vec!["RESULT"]);
            for line in pretty_lines(other) {
                t.add_row(vec![line]);
            }
            t
        }
    }
}

fn pretty_lines(decoded: &Decoded) -> Vec<String> {
    match decoded {
        Decoded::Battery(status) => vec![format!(
            "{}%{}",
            status.percent,
            if status.charging { ", charging" } else { "" }
        )],
        Decoded::Acknowledged { command } => vec![format!("{command}: acknowledged")],
        Decoded::ClockSet(clock) => vec![match clock.packet_size {
            Some(size) => format!("clock set (packet size {size})"),
            None => "clock set".to_string(),
        }],
        Decoded::Steps { records } => records
            .iter()
            .map(|r| {
                format!(
                    "{}: calories={} steps={} distance={}",
                    iso(&r.timestamp),
                    r.calories,
                    r.steps,
                    r.distance
                )
            })
            .collect(),
        Decoded::HeartRate { samples } => samples
            .iter()
            .map(|s| format!("{}: {}", iso(&s.timestamp), s.bpm))
            .collect(),
        Decoded::Stress { samples, .. } => samples
            .iter()
            .map(|s| format!("{}: {}", iso(&s.timestamp), s.level))
            .collect(),
        Decoded::Spo2 { samples } => samples
            .iter()
            .map(|s| format!("{}: {} - {}", iso(&s.timestamp), s.low, s.high))
            .collect(),
        Decoded::Sleep { segments } => segments
            .iter()
            .map(|s| {
                let minutes = s.duration_minutes();
                format!(
                    "{} - {} ({}:{:02})\n\t{}",
                    iso(&s.start),
                    iso(&s.end),
                    minutes / 60,
                    minutes % 60,
                    stage_list(s)
                )
            })
            .collect(),
        Decoded::Preference(pref) => {
            let state = if pref.enabled { "enabled" } else { "disabled" };
            vec![match pref.period_minutes {
                Some(period) => format!("{state}, period {period} min"),
                None => state.to_string(),
            }]
        }
        Decoded::HrMeasurement(m) => vec![match (m.bpm, m.error) {
            (_, Some(code)) => format!("measurement error {code}"),
            (Some(bpm), None) => format!("HR: {bpm}"),
            (None, None) => "no reading".to_string(),
        }],
        Decoded::Spo2Measurement { status } => vec![if *status == 0 {
            "measurement started; new data may appear in the log".to_string()
        } else {
            format!("returned code {status}")
        }],
        Decoded::NoData => vec!["no data".to_string()],
    }
}
