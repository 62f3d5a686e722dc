use criterion::{black_box, criterion_group, criterion_main, Criterion};
use flashlog::format_registry::descriptor_for;
use flashlog::{encode, log_info, ArgKind, ArgValue, Level, Logger, RingBuffer, Sink};
use std::io;

/// Discards everything: benchmarks measure the engine, not the disk.
struct NullSink;

impl Sink for NullSink {
    fn write(&mut self, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn bench_encode(c: &mut Criterion) {
    let descriptor = descriptor_for("value={} name={} ratio={}", &[
        ArgKind::Int,
        ArgKind::Text,
        ArgKind::Float,
    ]);

    c.bench_function("encode_record", |b| {
        b.iter(|| {
            let record = encode(
                descriptor,
                Level::Info,
                &[
                    ArgValue::Int(black_box(42)),
                    ArgValue::Text(black_box("alpha")),
                    ArgValue::Float(black_box(0.25)),
                ],
            )
            .unwrap();
            black_box(record);
        })
    });
}

fn bench_queue_push_pop(c: &mut Criterion) {
    let queue = RingBuffer::new(1024);

    c.bench_function("queue_push_pop", |b| {
        b.iter(|| {
            queue.push(black_box(7u64));
            black_box(queue.pop().unwrap());
        })
    });
}

fn bench_log_and_drain(c: &mut Criterion) {
    let logger = Logger::new(NullSink);

    // Full cycle: filter, encode, enqueue, then render and write. The
    // drain keeps the queue from filling between iterations.
    c.bench_function("log_and_drain_cycle", |b| {
        b.iter(|| {
            log_info!(logger, "value={} name={}", black_box(42), black_box("alpha")).unwrap();
            black_box(logger.drain_once().unwrap());
        })
    });
}

fn bench_filtered_call(c: &mut Criterion) {
    let logger = Logger::new(NullSink);
    logger.set_level(Level::Error);

    // A disabled level should cost an atomic load and a compare.
    c.bench_function("filtered_call", |b| {
        b.iter(|| {
            log_info!(logger, "value={}", black_box(42)).unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_encode,
    bench_queue_push_pop,
    bench_log_and_drain,
    bench_filtered_call
);
criterion_main!(benches);
