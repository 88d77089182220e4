use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
};
use std::sync::LazyLock;

pub static METER: LazyLock<Meter> = LazyLock::new(|| global::meter("solar-quote"));

pub static HTTP_REQUESTS_TOTAL: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("http.server.requests")
        .with_description("Total HTTP requests served")
        .build()
});

pub static HTTP_REQUEST_DURATION: LazyLock<Histogram<f64>> = LazyLock::new(|| {
    METER
        .f64_histogram("http.server.duration")
        .with_description("HTTP request latency")
        .with_unit("ms")
        .build()
});

pub static QUOTES_SUBMITTED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("quotes.submitted")
        .with_description("Quote submissions accepted for processing")
        .build()
});

pub static QUOTES_REJECTED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("quotes.rejected")
        .with_description("Quote submissions rejected by validation")
        .build()
});

pub static QUOTES_COMPLETED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("quotes.completed")
        .with_description("Quotes that reached the completed state")
        .build()
});

pub static ANALYSES_GENERATED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("analyses.generated")
        .with_description("Solar analyses generated")
        .build()
});

pub static NOTIFICATIONS_SENT: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("notifications.sent")
        .with_description("Quote-ready emails dispatched")
        .build()
});

pub static NOTIFICATIONS_FAILED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("notifications.failed")
        .with_description("Quote-ready emails that could not be dispatched")
        .build()
});

pub static UPLOADS_RECEIVED: LazyLock<Counter<u64>> = LazyLock::new(|| {
    METER
        .u64_counter("uploads.received")
        .with_description("Documents received by the upload step")
        .build()
});
