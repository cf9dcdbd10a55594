//! Tracing utilities for tests.
//!
//! [`init`] installs a formatting subscriber once (filtered by `RUST_LOG`).
//! [`SpanCollector`] captures span names and fields so tests can assert that
//! work was offloaded or that an event was dispatched.

use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing::dispatcher::DefaultGuard;
use tracing::span::{Attributes, Id};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Installs a global fmt subscriber. Safe to call from every test.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Captured span information.
#[derive(Debug, Clone)]
pub struct CapturedSpan {
    /// Span name (e.g. "offload_task").
    pub name: String,
    /// Field values rendered as strings.
    pub fields: Vec<(String, String)>,
}

#[derive(Default)]
struct FieldVisitor(Vec<(String, String)>);

impl FieldVisitor {
    fn push(&mut self, field: &tracing::field::Field, value: impl ToString) {
        self.0.push((field.name().to_owned(), value.to_string()));
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push(field, format_args!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push(field, value);
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.push(field, value);
    }
}

struct SpanCaptureLayer {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl<S> Layer<S> for SpanCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0,
        });
    }
}

/// Collector for captured spans.
///
/// Capturing is active on the current thread while the guard returned by
/// [`SpanCollector::install`] is alive; use a current-thread runtime so
/// spawned tasks run under it too.
#[derive(Clone, Default)]
pub struct SpanCollector {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl SpanCollector {
    /// Starts capturing on the current thread.
    pub fn install() -> (Self, DefaultGuard) {
        let collector = Self::default();
        let layer = SpanCaptureLayer {
            spans: collector.spans.clone(),
        };
        let guard = tracing::subscriber::set_default(Registry::default().with(layer));
        (collector, guard)
    }

    /// All captured spans.
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    /// Captured spans named `name` whose `field` equals `value`.
    pub fn count(&self, name: &str, field: &str, value: &str) -> usize {
        self.spans
            .lock()
            .unwrap()
            .iter()
            .filter(|span| span.name == name)
            .filter(|span| span.fields.iter().any(|(k, v)| k == field && v == value))
            .count()
    }
}
