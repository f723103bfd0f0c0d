//! JSON record formatter for the log-aggregation stack.
//!
//! Every event becomes one JSON object on one line:
//!
//! ```text
//! {"@timestamp":"2024-05-01T10:00:00.000Z","level":"INFO","source":{..},"message":"started",
//!  "@version":3,"application":"shop","channel":"LagoonLogs","host":"web-1","type":"shop-prod",
//!  "port":8080}
//! ```
//!
//! # Field order
//! 1. Native fields: `time`, `level`, `source` (optional), `msg`
//! 2. Default fields fixed at construction ([`default_fields`])
//! 3. Fields of the active spans, root first
//! 4. Event fields
//!
//! Top-level keys pass through [`replace_attr`], which maps the native names
//! onto the vocabulary the indexer expects. Dotted field names
//! (`context.request_id`) nest under groups and are never renamed.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, JsonFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

use crate::config::ResolvedSettings;

pub const MESSAGE_KEY: &str = "message";
pub const TIMESTAMP_KEY: &str = "@timestamp";
pub const TIMESTAMP_OVERRIDE_KEY: &str = "timestampOverride";

const NATIVE_MESSAGE_KEY: &str = "msg";
const NATIVE_TIME_KEY: &str = "time";
/// Name tracing gives the formatted message of an event.
const TRACING_MESSAGE_FIELD: &str = "message";

/// A keyed value. An object value is a group of nested attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A named group. Empty groups are left out of the rendered record.
    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        let members = attrs.into_iter().map(|a| (a.key, a.value)).collect();
        Self {
            key: key.into(),
            value: Value::Object(members),
        }
    }
}

/// Rename native keys to the indexer vocabulary.
///
/// Only top-level attributes (empty `groups`) are touched:
/// `msg` → `message`, `time` → `@timestamp`, `timestampOverride` → `@timestamp`.
pub fn replace_attr(groups: &[&str], mut attr: Attr) -> Attr {
    if groups.is_empty() {
        match attr.key.as_str() {
            NATIVE_MESSAGE_KEY => attr.key = MESSAGE_KEY.to_string(),
            NATIVE_TIME_KEY | TIMESTAMP_OVERRIDE_KEY => attr.key = TIMESTAMP_KEY.to_string(),
            _ => {}
        }
    }
    attr
}

/// Fields attached to every record.
pub fn default_fields(settings: &ResolvedSettings) -> Vec<Attr> {
    vec![
        Attr::new("@version", settings.message_version),
        Attr::new("application", settings.application_name.as_str()),
        Attr::new("channel", settings.log_channel.as_str()),
        Attr::group("context", Vec::new()),
        Attr::group("extra", Vec::new()),
        Attr::new("host", settings.hostname.as_str()),
        // One type per logger; per-project overrides would need a second field.
        Attr::new("type", settings.log_type.as_str()),
    ]
}

/// Event formatter producing one JSON object per line.
#[derive(Debug, Clone)]
pub struct RecordFormat {
    add_source: bool,
    defaults: Vec<Attr>,
}

impl RecordFormat {
    pub fn new(settings: &ResolvedSettings) -> Self {
        Self {
            add_source: settings.add_source,
            defaults: default_fields(settings),
        }
    }
}

impl<S> FormatEvent<S, JsonFields> for RecordFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, JsonFields>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut record = Record::default();
        record.push(
            &[],
            Attr::new(
                NATIVE_TIME_KEY,
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
        );
        record.push(&[], Attr::new("level", metadata.level().to_string()));
        if self.add_source {
            record.push(&[], source_attr(metadata));
        }
        record.push(
            &[],
            Attr::new(NATIVE_MESSAGE_KEY, visitor.message.unwrap_or_default()),
        );

        for attr in &self.defaults {
            record.push(&[], attr.clone());
        }

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                let ext = span.extensions();
                if let Some(fields) = ext.get::<FormattedFields<JsonFields>>() {
                    for attr in span_attrs(fields) {
                        record.push_field(attr);
                    }
                }
            }
        }

        for attr in visitor.fields {
            record.push_field(attr);
        }

        let line = serde_json::to_string(&record.into_map()).map_err(|_| fmt::Error)?;
        writeln!(writer, "{line}")
    }
}

fn source_attr(metadata: &Metadata<'_>) -> Attr {
    let mut members = Vec::new();
    if let Some(file) = metadata.file() {
        members.push(Attr::new("file", file));
    }
    if let Some(line) = metadata.line() {
        members.push(Attr::new("line", line));
    }
    if let Some(module) = metadata.module_path() {
        members.push(Attr::new("module", module));
    }
    Attr::group("source", members)
}

/// Span fields are stored by `JsonFields` as a serialized object.
fn span_attrs(fields: &FormattedFields<JsonFields>) -> Vec<Attr> {
    if fields.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Map<String, Value>>(fields) {
        Ok(map) => map.into_iter().map(|(key, value)| Attr { key, value }).collect(),
        Err(_) => Vec::new(),
    }
}

/// A record under construction.
#[derive(Default)]
struct Record {
    root: Map<String, Value>,
    timestamp_overridden: bool,
}

impl Record {
    /// Add a tracing field, treating dots in its name as group separators.
    fn push_field(&mut self, attr: Attr) {
        let mut path: Vec<String> = attr.key.split('.').map(str::to_owned).collect();
        let key = path.pop().unwrap_or_default();
        self.push(&path, Attr { key, value: attr.value });
    }

    fn push(&mut self, groups: &[String], attr: Attr) {
        match attr.value {
            Value::Object(members) => {
                if members.is_empty() {
                    return;
                }
                let mut path = groups.to_vec();
                path.push(attr.key);
                for (key, value) in members {
                    self.push(&path, Attr { key, value });
                }
            }
            value if groups.is_empty() => {
                let is_override = attr.key == TIMESTAMP_OVERRIDE_KEY;
                let attr = replace_attr(&[], Attr { key: attr.key, value });
                if attr.key == TIMESTAMP_KEY {
                    // A caller-supplied override beats the native timestamp
                    // whichever arrives first.
                    if self.timestamp_overridden && !is_override {
                        return;
                    }
                    self.timestamp_overridden |= is_override;
                }
                self.root.insert(attr.key, attr.value);
            }
            value => {
                let names: Vec<&str> = groups.iter().map(String::as_str).collect();
                let attr = replace_attr(&names, Attr { key: attr.key, value });
                insert_at(&mut self.root, groups, attr.key, attr.value);
            }
        }
    }

    fn into_map(self) -> Map<String, Value> {
        self.root
    }
}

fn insert_at(map: &mut Map<String, Value>, groups: &[String], key: String, value: Value) {
    match groups.split_first() {
        None => {
            map.insert(key, value);
        }
        Some((head, rest)) => {
            let entry = map
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(nested) = entry {
                insert_at(nested, rest, key, value);
            } else {
                let mut nested = Map::new();
                insert_at(&mut nested, rest, key, value);
                *entry = Value::Object(nested);
            }
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<Attr>,
}

impl FieldVisitor {
    fn record(&mut self, field: &Field, value: Value) {
        if field.name() == TRACING_MESSAGE_FIELD {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else {
            self.fields.push(Attr::new(field.name(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, Value::from(format!("{value:?}")));
    }
}
