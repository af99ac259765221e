//! `tracing`-backed implementation of the logger port.

use azure_setup_ports::{LogEvent, LogFields, LogLevel, LoggerPort};
use azure_setup_shared::redaction::{REDACTED, is_secret_key};
use serde_json::Value;

/// Forwards structured events to the active `tracing` subscriber.
///
/// Fields and error payloads are redacted before they leave the process:
/// any key that looks like a secret is replaced, at any nesting depth.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    base_fields: LogFields,
}

impl TracingLogger {
    /// Logger without base fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base fields applied to every event.
    #[must_use]
    pub fn with_base_fields(mut self, fields: LogFields) -> Self {
        self.base_fields = fields;
        self
    }
}

impl LoggerPort for TracingLogger {
    fn log(&self, event: LogEvent) {
        let mut fields = self.base_fields.clone();
        fields.extend(event.fields.unwrap_or_default());
        redact_fields(&mut fields);

        let fields = render_fields(&fields);
        let error = event.error.map(|mut error| {
            redact_value(&mut error);
            error.to_string()
        });
        let error = error.as_deref().unwrap_or("");
        let name = &*event.event;
        let message = &*event.message;

        match event.level {
            LogLevel::Debug => {
                tracing::debug!(event = name, fields = %fields, error, "{message}");
            },
            LogLevel::Info => {
                tracing::info!(event = name, fields = %fields, error, "{message}");
            },
            LogLevel::Warn => {
                tracing::warn!(event = name, fields = %fields, error, "{message}");
            },
            LogLevel::Error => {
                tracing::error!(event = name, fields = %fields, error, "{message}");
            },
        }
    }

    fn child(&self, fields: LogFields) -> Box<dyn LoggerPort> {
        let mut merged = self.base_fields.clone();
        merged.extend(fields);
        Box::new(Self {
            base_fields: merged,
        })
    }
}

fn render_fields(fields: &LogFields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect(),
    )
}

fn redact_fields(fields: &mut LogFields) {
    for (key, value) in fields.iter_mut() {
        if is_secret_key(key) {
            *value = Value::String(REDACTED.to_string());
        } else {
            redact_value(value);
        }
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map.iter_mut() {
                if is_secret_key(key) {
                    *nested = Value::String(REDACTED.to_string());
                } else {
                    redact_value(nested);
                }
            }
        },
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        _ => {},
    }
}
