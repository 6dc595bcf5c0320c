use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Targets governed by `--log-level`. Dependencies stay at warn or quieter.
const RING_TARGETS: [&str; 4] = [
    "bluering",
    "bluering_transport",
    "bluering_frame",
    "bluering_protocol",
];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }

    /// Frame traces are emitted at debug; raise the level so they show.
    pub fn at_least_debug(self) -> Self {
        match self {
            LogLevel::Trace => LogLevel::Trace,
            _ => LogLevel::Debug,
        }
    }
}

/// Per-target filter: the ring crates at `level`, everything else capped at warn.
pub fn targets(level: LogLevel) -> Targets {
    let ring = level.as_filter();
    Targets::new()
        .with_targets(RING_TARGETS.map(|target| (target, ring)))
        .with_default(ring.min(LevelFilter::WARN))
}

pub fn init_logging(format: LogFormat, level: LogLevel) {
    // Module targets only help once several crates are talking.
    let show_target = matches!(level, LogLevel::Debug | LogLevel::Trace);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level.as_filter())
        .with_ansi(false)
        .with_target(show_target);

    match format {
        LogFormat::Text => {
            let _ = builder.finish().with(targets(level)).try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().finish().with(targets(level)).try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn ring_crates_follow_requested_level() {
        let filter = targets(LogLevel::Debug);
        assert!(filter.would_enable("bluering_protocol::session", &Level::DEBUG));
        assert!(filter.would_enable("bluering::cmd::replay", &Level::DEBUG));
        assert!(!filter.would_enable("bluering_frame::v2", &Level::TRACE));
    }

    #[test]
    fn dependencies_capped_at_warn() {
        let filter = targets(LogLevel::Trace);
        assert!(filter.would_enable("tokio::runtime", &Level::WARN));
        assert!(!filter.would_enable("tokio::runtime", &Level::INFO));
    }

    #[test]
    fn error_level_quiets_everything() {
        let filter = targets(LogLevel::Error);
        assert!(!filter.would_enable("tokio", &Level::WARN));
        assert!(!filter.would_enable("bluering_protocol", &Level::WARN));
        assert!(filter.would_enable("bluering_protocol", &Level::ERROR));
    }

    #[test]
    fn frame_tracing_raises_to_debug() {
        assert_eq!(LogLevel::Warn.at_least_debug(), LogLevel::Debug);
        assert_eq!(LogLevel::Trace.at_least_debug(), LogLevel::Trace);
    }
}
