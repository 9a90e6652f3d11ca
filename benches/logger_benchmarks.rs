//! Criterion benchmarks for ctxlog

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ctxlog::prelude::*;

fn sink_logger() -> Logger {
    Logger::builder()
        .output(std::io::sink())
        .attr("logger", "bench")
        .build()
}

// ============================================================================
// Context Benchmarks
// ============================================================================

fn bench_context_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_append");
    group.throughput(Throughput::Elements(1));

    for depth in [0_usize, 8, 64] {
        let ctx = (0..depth).fold(Context::background(), |ctx, i| ctx.append("k", i));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &ctx, |b, ctx| {
            b.iter(|| black_box(ctx.append("request_id", "abc")));
        });
    }

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = sink_logger();
    let empty = Context::background();
    let ctx = Context::background()
        .append("request_id", "abc")
        .append("user_id", 42)
        .append("route", "/v1/orders");

    group.bench_function("filtered_debug", |b| {
        b.iter(|| logger.debug_ctx(&ctx, black_box("Debug message")));
    });

    group.bench_function("info_no_context", |b| {
        b.iter(|| logger.info_ctx(&empty, black_box("Info message")));
    });

    group.bench_function("info_three_context_attrs", |b| {
        b.iter(|| logger.info_ctx(&ctx, black_box("Info message")));
    });

    group.bench_function("info_with_call_site_attrs", |b| {
        b.iter(|| {
            logger.log_attrs(
                &ctx,
                LogLevel::Info,
                black_box("Info message"),
                [Attr::new("attempt", 1), Attr::new("cached", false)],
            )
        });
    });

    group.finish();
}

criterion_group!(benches, bench_context_append, bench_logging);
criterion_main!(benches);
