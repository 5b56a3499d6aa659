use anyhow::Result;
use tracing::Level;

use opentelemetry::{
    global,
    metrics::{Histogram, MeterProvider as _},
    trace::TracerProvider as _,
    KeyValue,
};
use opentelemetry_otlp::{MetricExporter, Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{metrics::SdkMeterProvider, resource::Resource, trace::SdkTracerProvider};
use tracing_subscriber::{layer::SubscriberExt, Registry};

use crate::basket::U256;
use crate::obs::tracingx::{commit_sha, filter_from_env};
use crate::obs::wrap::METER_NAME;

pub struct Telemetry {
    pub tracer_provider: SdkTracerProvider,
    pub meter_provider: SdkMeterProvider,
    pub op_latency_ms: Histogram<f64>,
    pub invariant_drift_rel: Histogram<f64>,
}

impl Telemetry {
    /// Registra uma operação concluída: latência e `|Δk/k|`.
    pub fn record_op(&self, op: &'static str, latency_ms: f64, drift_rel: f64) {
        let attrs = [KeyValue::new("op", op)];
        self.op_latency_ms.record(latency_ms, &attrs);
        self.invariant_drift_rel.record(drift_rel, &attrs);
    }

    pub fn shutdown(self) -> Result<()> {
        self.meter_provider.force_flush()?;
        self.tracer_provider.shutdown()?;
        self.meter_provider.shutdown()?;
        Ok(())
    }
}

pub fn init(service_name: &str) -> Result<Telemetry> {
    let base = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4318".to_string());
    let traces_ep = std::env::var("OTEL_EXPORTER_OTLP_TRACES_ENDPOINT")
        .unwrap_or_else(|_| format!("{}/v1/traces", base));
    let metrics_ep = std::env::var("OTEL_EXPORTER_OTLP_METRICS_ENDPOINT")
        .unwrap_or_else(|_| format!("{}/v1/metrics", base));

    let resource = Resource::builder()
        .with_attributes([
            KeyValue::new("service.name", service_name.to_string()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new("git.commit.sha", commit_sha()),
        ])
        .build();

    // ---- Traces (OTLP/HTTP) ----
    let span_exporter = SpanExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(traces_ep)
        .build()?;
    let tracer_provider = SdkTracerProvider::builder()
        .with_resource(resource.clone())
        .with_batch_exporter(span_exporter)
        .build();
    let tracer = tracer_provider.tracer(service_name.to_string());

    // ---- Métricas (OTLP/HTTP) ----
    let metric_exporter = MetricExporter::builder()
        .with_http()
        .with_protocol(Protocol::HttpBinary)
        .with_endpoint(metrics_ep)
        .build()?;
    let meter_provider = SdkMeterProvider::builder()
        .with_resource(resource)
        .with_periodic_exporter(metric_exporter)
        .build();

    // Globais
    global::set_tracer_provider(tracer_provider.clone());
    global::set_meter_provider(meter_provider.clone());

    // tracing -> OTel
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let subscriber = Registry::default()
        .with(filter_from_env())
        .with(fmt_layer)
        .with(otel_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    // Instrumentos (histogramas)
    let meter = meter_provider.meter(METER_NAME);
    let op_latency_ms = meter
        .f64_histogram("op_latency_ms")
        .with_unit("ms")
        .with_description("Latência das operações da cesta em ms")
        .build();
    let invariant_drift_rel = meter
        .f64_histogram("invariant_drift_rel")
        .with_unit("1")
        .with_description("Desvio relativo do invariante |Δk/k| por operação")
        .build();

    Ok(Telemetry { tracer_provider, meter_provider, op_latency_ms, invariant_drift_rel })
}

/// `|k1 - k0| / k0` como `f64` (resolução de 1e-18).
pub fn relative_drift(k0: U256, k1: U256) -> f64 {
    if k0.is_zero() {
        return 0.0;
    }
    let delta = if k1 > k0 { k1 - k0 } else { k0 - k1 };
    let scale = U256::from(1_000_000_000_000_000_000u128);
    match delta.checked_mul(scale) {
        Some(n) => {
            let q = n / k0;
            if q > U256::from(u128::MAX) {
                f64::MAX
            } else {
                q.as_u128() as f64 / 1e18
            }
        }
        None => f64::MAX,
    }
}

/// Cria um `Span` INFO com nome **estático** (exigência do tracing) e
/// coloca o nome dinâmico em `span_name`. Inclui `git_commit_sha`.
pub fn make_info_span(name: &str, op_id: u32, component: &str) -> tracing::Span {
    let commit = commit_sha();
    tracing::span!(
        target: "basket_engine",
        Level::INFO,
        "op",
        git_commit_sha = %commit,
        span_name = %name,
        op_id = op_id,
        component = component
    )
}
