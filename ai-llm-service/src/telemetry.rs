use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Targets of the workspace crates; used to raise their level without
/// turning on debug output for every dependency.
pub const WORKSPACE_TARGETS: &[&str] = &[
    "gita_chat_backend",
    "api",
    "verse_chat",
    "verse_store",
    "ai_llm_service",
];

/// RFC3339 UTC timer implemented via `chrono` (no extra features).
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Build the formatting layer used by the server binary.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format with target and `file:line`
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    fmt::layer().with_ansi(use_ansi).event_format(
        fmt::format()
            .compact()
            .with_timer(ChronoRfc3339Utc)
            .with_level(true)
            .with_target(true)
            .with_source_location(true),
    )
}

/// Level directive for one target, e.g. `verse_store=debug`.
pub fn level_directive(target: &str, level: Level) -> Option<Directive> {
    format!("{target}={}", level.as_str().to_lowercase())
        .parse()
        .ok()
}

/// Filter from `RUST_LOG` when set; otherwise `default` globally plus
/// `level` for every workspace crate.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| workspace_filter(default, level))
}

/// `default` globally plus `level` for every workspace crate, ignoring `RUST_LOG`.
pub fn workspace_filter(default: &str, level: Level) -> EnvFilter {
    WORKSPACE_TARGETS
        .iter()
        .filter_map(|t| level_directive(t, level))
        .fold(EnvFilter::new(default), |f, d| f.add_directive(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_is_lowercase_target_level() {
        let d = level_directive("verse_store", Level::DEBUG).unwrap();
        assert_eq!(d.to_string(), "verse_store=debug");
    }

    #[test]
    fn workspace_crates_are_louder_than_dependencies() {
        let rendered = workspace_filter("warn", Level::INFO).to_string();
        assert!(rendered.contains("warn"));
        for target in WORKSPACE_TARGETS {
            assert!(rendered.contains(&format!("{target}=info")), "{rendered}");
        }
    }
}
