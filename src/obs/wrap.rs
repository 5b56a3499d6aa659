use once_cell::sync::OnceCell;
use opentelemetry::metrics::Histogram;
use opentelemetry::{global, KeyValue};
use std::time::Instant;

/// Nome do meter usado pelos instrumentos do motor.
pub const METER_NAME: &str = "basket_engine";

static HIST: OnceCell<Histogram<f64>> = OnceCell::new();

fn histogram() -> &'static Histogram<f64> {
    HIST.get_or_init(|| {
        let meter = global::meter(METER_NAME);
        meter
            .f64_histogram("op_duration_ms")
            .with_unit("ms")
            .with_description("duração das consultas do motor")
            .build()
    })
}

/// Executa `f` e registra a duração (ms) com o atributo `op`.
pub fn time<F, T>(op: &'static str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let out = f();
    let ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram().record(ms, &[KeyValue::new("op", op)]);
    out
}
