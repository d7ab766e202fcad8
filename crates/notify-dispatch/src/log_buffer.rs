//! In-memory log buffer backed by tracing subscriber events.
//!
//! Diagnostics read the structured fields of recent dispatch records
//! (for example the `kind` of the last failure) back from here.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

const MAX_LOG_ENTRIES: usize = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
    pub fields: Map<String, Value>,
}

impl LogEntry {
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

/// Bounded ring buffer shared between a [`LogCaptureLayer`] and its readers.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(MAX_LOG_ENTRIES)
    }
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn recent(&self, limit: usize) -> Vec<LogEntry> {
        let safe_limit = limit.clamp(1, self.capacity);
        let Ok(entries) = self.entries.lock() else {
            return Vec::new();
        };

        let mut logs = entries
            .iter()
            .rev()
            .take(safe_limit)
            .cloned()
            .collect::<Vec<_>>();
        logs.reverse();
        logs
    }

    pub fn all(&self) -> Vec<LogEntry> {
        let Ok(entries) = self.entries.lock() else {
            return Vec::new();
        };
        entries.iter().cloned().collect()
    }

    /// Most recent entry carrying a `kind` field.
    pub fn last_failure(&self) -> Option<LogEntry> {
        let entries = self.entries.lock().ok()?;
        entries
            .iter()
            .rev()
            .find(|e| e.fields.contains_key("kind"))
            .cloned()
    }

    pub fn clear(&self) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        let cleared = entries.len();
        entries.clear();
        cleared
    }

    fn push(&self, entry: LogEntry) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };

        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }
}

pub struct LogCaptureLayer {
    buffer: LogBuffer,
}

impl LogCaptureLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for LogCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = RecordFields::default();
        event.record(&mut visitor);

        let meta = event.metadata();
        let message = visitor.message.unwrap_or_else(|| meta.name().to_string());

        self.buffer.push(LogEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: meta.level().to_string().to_lowercase(),
            target: meta.target().to_string(),
            message,
            fields: visitor.fields,
        });
    }
}

/// Collects an event's fields. Numbers and booleans stay typed so the
/// failure record can be inspected without reparsing; floats and errors
/// go through `record_debug`.
#[derive(Default)]
struct RecordFields {
    message: Option<String>,
    fields: Map<String, Value>,
}

impl RecordFields {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for RecordFields {
    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.into());
    }

    // `message` and `%`/`?` fields arrive here.
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(text);
        } else {
            self.insert(field, text.into());
        }
    }
}
