//! Tracing layer that writes formatted lines to a console sink.
//!
//! Lines look like `INFO aurora_effects::runtime: effects started count=8`.
//! In the browser the sink is `console.*`, picked by level.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Receives finished log lines.
pub trait ConsoleSink: Send + Sync + 'static {
    /// Writes one line at `level`.
    fn write_line(&self, level: Level, line: &str);
}

/// A [`Layer`] that formats each event into a single line.
pub struct ConsoleLayer<W> {
    sink: W,
    max_level: LevelFilter,
}

impl<W: ConsoleSink> ConsoleLayer<W> {
    /// Emits events at `max_level` and below to `sink`.
    pub fn new(sink: W, max_level: LevelFilter) -> Self {
        Self { sink, max_level }
    }
}

impl<S, W> Layer<S> for ConsoleLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: ConsoleSink,
{
    fn enabled(&self, metadata: &tracing::Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        *metadata.level() <= self.max_level
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() > self.max_level {
            return;
        }

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let line = format_line(*metadata.level(), metadata.target(), &visitor);
        self.sink.write_line(*metadata.level(), &line);
    }
}

fn format_line(level: Level, target: &str, visitor: &LineVisitor) -> String {
    let mut line = format!("{level} {target}: {}", visitor.message);
    for (name, value) in &visitor.fields {
        let _ = write!(line, " {name}={value}");
    }
    line
}

/// Collects the message and remaining fields of an event.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl LineVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name(), value));
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_owned());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

/// Writes to the browser's `console`.
#[cfg(target_arch = "wasm32")]
pub struct BrowserConsole;

#[cfg(target_arch = "wasm32")]
impl ConsoleSink for BrowserConsole {
    fn write_line(&self, level: Level, line: &str) {
        use wasm_bindgen::JsValue;
        use web_sys::console;

        let line = JsValue::from_str(line);
        match level {
            Level::ERROR => console::error_1(&line),
            Level::WARN => console::warn_1(&line),
            Level::INFO => console::log_1(&line),
            _ => console::debug_1(&line),
        }
    }
}

/// Installs the console layer as the global subscriber.
///
/// Returns `false` if a subscriber was already installed.
#[cfg(target_arch = "wasm32")]
pub fn init(max_level: LevelFilter) -> bool {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(ConsoleLayer::new(BrowserConsole, max_level))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<(Level, String)>>>);

    impl ConsoleSink for Captured {
        fn write_line(&self, level: Level, line: &str) {
            self.0.lock().push((level, line.to_owned()));
        }
    }

    fn capture(max_level: LevelFilter, body: impl FnOnce()) -> Vec<(Level, String)> {
        let sink = Captured::default();
        let subscriber =
            tracing_subscriber::registry().with(ConsoleLayer::new(sink.clone(), max_level));
        tracing::subscriber::with_default(subscriber, body);
        let lines = sink.0.lock().clone();
        lines
    }

    #[test]
    fn test_line_format() {
        let lines = capture(LevelFilter::DEBUG, || {
            tracing::info!(target: "aurora", count = 8, name = "tilt", "effects started");
        });
        assert_eq!(
            lines,
            vec![(Level::INFO, "INFO aurora: effects started count=8 name=tilt".to_owned())]
        );
    }

    #[test]
    fn test_level_filter() {
        let lines = capture(LevelFilter::WARN, || {
            tracing::debug!("hidden");
            tracing::info!("hidden");
            tracing::warn!("shown");
            tracing::error!("also shown");
        });
        let levels: Vec<Level> = lines.iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, vec![Level::WARN, Level::ERROR]);
        assert!(lines[0].1.ends_with(": shown"));
    }

    #[test]
    fn test_debug_formatted_fields() {
        let lines = capture(LevelFilter::TRACE, || {
            tracing::trace!(target: "t", ratio = ?0.5_f32, flag = true, "entry");
        });
        assert_eq!(lines[0].1, "TRACE t: entry ratio=0.5 flag=true");
    }
}
