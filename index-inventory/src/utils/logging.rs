//! Process-wide `tracing` setup.
//!
//! Two event formats are available, picked with `LOG_FORMAT`: a column layout for terminals
//! (`pretty`, the default) and one JSON object per line (`json`). Both show the namespace
//! of the collection being worked on, taken from the `ns` field of the enclosing span.

use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::io::IsTerminal;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

const NAMESPACE_FIELD: &str = "ns";
const NO_NAMESPACE: &str = "-";
const NAMESPACE_WIDTH: usize = 32;

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[90m";
const TIMESTAMP: &str = "\x1b[96m";
const NAMESPACE: &str = "\x1b[92m";
const MESSAGE: &str = "\x1b[97m";

fn level_color(level: Level) -> &'static str {
    match level {
        Level::TRACE => "\x1b[90m",
        Level::DEBUG => "\x1b[34m",
        Level::INFO => "\x1b[32m",
        Level::WARN => "\x1b[33m",
        Level::ERROR => "\x1b[31m",
    }
}

fn debug_text(value: &dyn Debug) -> String {
    format!("{:?}", value).trim_matches('"').to_string()
}

/// Fields recorded on a span, kept in its extensions by [`SpanFieldsLayer`].
#[derive(Debug, Clone, Default)]
pub struct SpanFields(BTreeMap<String, String>);

impl SpanFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl Visit for SpanFields {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.0.insert(field.name().to_string(), debug_text(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

/// Records span fields so event formatters can reach them.
pub struct SpanFieldsLayer;

impl<S> Layer<S> for SpanFieldsLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut fields = SpanFields::default();
        attrs.record(&mut fields);
        span.extensions_mut().insert(fields);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanFields>() {
            Some(fields) => values.record(fields),
            None => {
                let mut fields = SpanFields::default();
                values.record(&mut fields);
                extensions.insert(fields);
            }
        }
    }
}

/// Innermost `ns` recorded on the current span or any of its parents.
fn current_namespace<S, N>(ctx: &FmtContext<'_, S, N>) -> Option<String>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    let scope = ctx.event_scope()?;
    for span in scope {
        if let Some(ns) = span.extensions().get::<SpanFields>().and_then(|fields| fields.get(NAMESPACE_FIELD)) {
            return Some(ns.to_string());
        }
    }
    None
}

/// Message and fields of one event.
#[derive(Default)]
struct EventFields {
    message: String,
    fields: Map<String, Value>,
}

impl EventFields {
    fn insert(&mut self, field: &Field, value: Value) {
        if field.name() == "message" {
            self.message = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
        } else {
            self.fields.insert(field.name().to_string(), value);
        }
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.insert(field, Value::String(debug_text(value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, Value::String(value.to_string()));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::from(value));
    }
}

/// `time | level | namespace | message (fields)`, colored when `ansi` is set.
pub struct PrettyFormatter {
    ansi: bool,
}

impl PrettyFormatter {
    fn paint<'a>(&self, color: &'a str) -> &'a str {
        if self.ansi {
            color
        } else {
            ""
        }
    }
}

impl<S, N> FormatEvent<S, N> for PrettyFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let level = *event.metadata().level();
        let namespace = current_namespace(ctx).unwrap_or_else(|| NO_NAMESPACE.to_string());
        let mut visitor = EventFields::default();
        event.record(&mut visitor);

        let (reset, dim) = (self.paint(RESET), self.paint(DIM));
        write!(writer, "{}{}{} ", self.paint(TIMESTAMP), Utc::now().format("%y-%m-%d %H:%M:%S"), reset)?;
        write!(writer, "{}|{} {}{:<5}{} ", dim, reset, self.paint(level_color(level)), level, reset)?;
        write!(writer, "{}|{} {}{:<width$}{} ", dim, reset, self.paint(NAMESPACE), namespace, reset, width = NAMESPACE_WIDTH)?;
        write!(writer, "{}|{} {}{}{}", dim, reset, self.paint(MESSAGE), visitor.message, reset)?;

        if !visitor.fields.is_empty() {
            let fields: Vec<String> = visitor
                .fields
                .iter()
                .map(|(name, value)| match value {
                    Value::String(text) => format!("{}={}", name, text),
                    other => format!("{}={}", name, other),
                })
                .collect();
            write!(writer, " {}({}){}", dim, fields.join(", "), reset)?;
        }
        writeln!(writer)
    }
}

/// One JSON object per event with `timestamp`, `level`, `target`, `ns`, `message` and `fields`.
pub struct JsonEventFormatter;

impl<S, N> FormatEvent<S, N> for JsonEventFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let meta = event.metadata();
        let mut visitor = EventFields::default();
        event.record(&mut visitor);

        let mut root = Map::new();
        root.insert("timestamp".to_string(), Value::from(Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)));
        root.insert("level".to_string(), Value::from(meta.level().to_string()));
        root.insert("target".to_string(), Value::from(meta.target()));
        if let Some(ns) = current_namespace(ctx) {
            root.insert(NAMESPACE_FIELD.to_string(), Value::from(ns));
        }
        root.insert("message".to_string(), Value::from(visitor.message));
        if !visitor.fields.is_empty() {
            root.insert("fields".to_string(), Value::Object(visitor.fields));
        }

        let line = serde_json::to_string(&Value::Object(root)).map_err(|_| std::fmt::Error)?;
        writeln!(writer, "{}", line)
    }
}

/// Install the global subscriber, writing to stderr so stdout stays free for the report.
///
/// `RUST_LOG` takes precedence; otherwise this crate logs at `info`, or `debug` with
/// `verbose`, and everything else at `warn`. Also installs color_eyre.
pub fn init_logging(verbose: bool) {
    color_eyre::install().expect("Unable to install color_eyre");

    let crate_level = if verbose { Level::DEBUG } else { Level::INFO };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(Level::WARN.into())
            .parse(format!("index_inventory={}", crate_level))
            .expect("Invalid filter directive and Logger control")
    });

    let fmt_layer = fmt::layer().with_writer(std::io::stderr);
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = Registry::default().with(env_filter).with(SpanFieldsLayer).with(ErrorLayer::default());
    let result = if json {
        tracing::subscriber::set_global_default(registry.with(fmt_layer.event_format(JsonEventFormatter)))
    } else {
        let ansi = std::io::stderr().is_terminal();
        tracing::subscriber::set_global_default(registry.with(fmt_layer.event_format(PrettyFormatter { ansi })))
    };
    result.expect("Failed to set global default subscriber");
}
