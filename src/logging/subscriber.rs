//! Tracing subscriber setup: console formatter, level selection, and initialisation.
use tracing_subscriber::filter::LevelFilter;

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits draft-style
/// console output.
struct DraftFormatter {
    ansi: bool,
}

impl DraftFormatter {
    fn render(&self, level: tracing::Level, msg: &str) -> String {
        let paint = |code: &str, text: &str| {
            if self.ansi {
                format!("\x1b[{code}m{text}\x1b[0m")
            } else {
                text.to_string()
            }
        };
        match level {
            tracing::Level::ERROR => format!("{} {msg}", paint("31", "ERROR")),
            tracing::Level::WARN => format!("{}  {msg}", paint("33", "WARN")),
            tracing::Level::INFO => msg.to_string(),
            _ => paint("2", &format!("[debug] {msg}")),
        }
    }
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for DraftFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(
            writer,
            "{}",
            self.render(*event.metadata().level(), &extractor.message)
        )
    }
}

/// Console verbosity for the given `--debug` flag.
#[must_use]
pub const fn level_for(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Initialise the global [`tracing`] subscriber at `level`.
///
/// All events go to stderr so that command output on stdout stays
/// machine-readable. Only the first call in a process installs a
/// subscriber; later calls are no-ops.
pub fn init_subscriber(level: LevelFilter) {
    use tracing_subscriber::{
        Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let console_layer = fmt::layer()
        .event_format(DraftFormatter { ansi: true })
        .with_writer(std::io::stderr)
        .with_filter(level);

    if tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
