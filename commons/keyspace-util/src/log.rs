//
// Copyright (c) 2023 ZettaScale Technology
//
// This program and the accompanying materials are made available under the
// terms of the Eclipse Public License 2.0 which is available at
// http://www.eclipse.org/legal/epl-2.0, or the Apache License, Version 2.0
// which is available at https://www.apache.org/licenses/LICENSE-2.0.
//
// SPDX-License-Identifier: EPL-2.0 OR Apache-2.0
//
// Contributors:
//   ZettaScale Zenoh Team, <zenoh@zettascale.tech>
//
//! Logging setup.
//!
//! Keyspace reports through [`tracing`]. The functions below install a global subscriber,
//! either the formatting one driven by `RUST_LOG` or a [`LogSink`] handing every event to a
//! callback, which is how the C bindings forward logs to their host.
use std::{fmt, thread};

use tracing::{
    field::{Field, Visit},
    span, Event, Level, Metadata, Subscriber,
};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    EnvFilter, Layer,
};

/// Installs the formatting subscriber if `RUST_LOG` is set, and does nothing otherwise.
///
/// The installed subscriber lives until the process exits, so leak checkers such as
/// `valgrind` will report it (<https://github.com/tokio-rs/tracing/issues/2069>).
pub fn try_init_log_from_env() {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        install_fmt(filter);
    }
}

/// Installs the formatting subscriber, filtered by `RUST_LOG` or by `fallback` when unset.
pub fn init_log_from_env_or<S: AsRef<str>>(fallback: S) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    install_fmt(filter);
}

fn install_fmt(filter: EnvFilter) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .finish();
    // Losing the race against another global subscriber is fine.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// One event, flattened for consumers outside of `tracing`.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
    /// Source file and line, when the event carries them.
    pub location: Option<(&'static str, u32)>,
    pub thread_name: Option<String>,
    /// Fields of the enclosing spans, outermost first, then the event's own fields.
    pub fields: Vec<(&'static str, String)>,
}

impl LogRecord {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Strings are kept verbatim, everything else goes through `Debug`.
struct Collect<'a> {
    message: Option<&'a mut String>,
    fields: &'a mut Vec<(&'static str, String)>,
}

impl Collect<'_> {
    fn push(&mut self, field: &Field, value: String) {
        match (&mut self.message, field.name()) {
            (Some(message), "message") => **message = value,
            _ => self.fields.push((field.name(), value)),
        }
    }
}

impl Visit for Collect<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

struct SpanFields(Vec<(&'static str, String)>);

/// A [`Layer`] turning each enabled event into a [`LogRecord`].
pub struct LogSink<F, C> {
    filter: F,
    callback: C,
}

impl<F, C> LogSink<F, C>
where
    F: Fn(&Metadata<'_>) -> bool,
    C: Fn(LogRecord),
{
    pub fn new(filter: F, callback: C) -> Self {
        LogSink { filter, callback }
    }
}

impl<S, F, C> Layer<S> for LogSink<F, C>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    F: Fn(&Metadata<'_>) -> bool + 'static,
    C: Fn(LogRecord) + 'static,
{
    fn enabled(&self, metadata: &Metadata<'_>, _: Context<'_, S>) -> bool {
        (self.filter)(metadata)
    }

    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            let mut fields = Vec::new();
            attrs.record(&mut Collect {
                message: None,
                fields: &mut fields,
            });
            span.extensions_mut().insert(SpanFields(fields));
        }
    }

    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        if let Some(SpanFields(fields)) = span.extensions_mut().get_mut::<SpanFields>() {
            values.record(&mut Collect {
                message: None,
                fields,
            });
        };
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut fields = Vec::new();
        for span in ctx.event_scope(event).into_iter().flat_map(|s| s.from_root()) {
            if let Some(SpanFields(own)) = span.extensions().get::<SpanFields>() {
                fields.extend(own.iter().cloned());
            }
        }
        let mut message = String::new();
        event.record(&mut Collect {
            message: Some(&mut message),
            fields: &mut fields,
        });
        (self.callback)(LogRecord {
            level: *meta.level(),
            target: meta.target().to_owned(),
            message,
            location: meta.file().zip(meta.line()),
            thread_name: thread::current().name().map(str::to_owned),
            fields,
        });
    }
}

/// Installs a global subscriber made of a single [`LogSink`].
pub fn init_log_with_callback(
    filter: impl Fn(&Metadata<'_>) -> bool + Send + Sync + 'static,
    callback: impl Fn(LogRecord) + Send + Sync + 'static,
) {
    let subscriber = tracing_subscriber::registry().with(LogSink::new(filter, callback));
    let _ = tracing::subscriber::set_global_default(subscriber);
}
