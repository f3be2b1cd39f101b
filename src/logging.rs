use std::fmt::{self, Write};

use tracing::{
    field::{Field, Visit},
    Level, Subscriber,
};
use tracing_subscriber::{
    layer::Context, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Installs the global subscriber, sending every line to `sink`.
#[tracing::instrument(skip_all)]
pub fn init_tracing<F>(sink: F)
where
    F: Fn(Level, &str) + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(SinkLayer::new(sink))
        .with(
            EnvFilter::try_new("wartapurete_share=debug")
                .expect("hard-coded env filter should be valid"),
        )
        .init();

    tracing::trace!("finished");
}

/// Formats each event on one line, `[LEVEL] message key=value`, and hands it to a sink.
pub struct SinkLayer<F> {
    sink: F,
}

impl<F> SinkLayer<F>
where
    F: Fn(Level, &str) + Send + Sync + 'static,
{
    pub const fn new(sink: F) -> Self {
        Self { sink }
    }
}

impl<S, F> Layer<S> for SinkLayer<F>
where
    S: Subscriber,
    F: Fn(Level, &str) + Send + Sync + 'static,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = SinkVisitor::default();
        event.record(&mut visitor);

        let level = *event.metadata().level();
        let line = format!("[{level}] {}{}", visitor.message, visitor.fields);

        (self.sink)(level, &line)
    }
}

#[derive(Default)]
struct SinkVisitor {
    message: String,
    fields: String,
}

impl Visit for SinkVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}
