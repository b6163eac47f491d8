//! Benchmarks for slot write fan-out.
//!
//! Run with: cargo bench -p vbind-core --bench notify_bench

use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use vbind_core::{Facade, KeyPath, Value, Watcher, instrument};

fn fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("slot_write_fan_out");
    for &watchers in &[1usize, 10, 100, 1000] {
        let data = instrument(Value::map([("count", 0)]));
        let facade = Facade::with_data(data.as_map().cloned().unwrap_or_default());
        facade.flatten(Facade::DATA);
        let hits = Rc::new(Cell::new(0u64));
        for _ in 0..watchers {
            let h = Rc::clone(&hits);
            let _ = Watcher::watch(&facade, "count", move |_| h.set(h.get() + 1));
        }
        let mut next = 0i64;
        group.bench_with_input(BenchmarkId::from_parameter(watchers), &watchers, |b, _| {
            b.iter(|| {
                next += 1;
                let _ = facade.set("count", black_box(next));
            });
        });
    }
    group.finish();
}

fn nested_evaluate(c: &mut Criterion) {
    let model = serde_json::json!({ "a": { "b": { "c": { "d": 1 } } } });
    let data = instrument(Value::from(model));
    let facade = Facade::with_data(data.as_map().cloned().unwrap_or_default());
    facade.flatten(Facade::DATA);
    let path = KeyPath::parse("a.b.c.d").unwrap_or_else(|e| panic!("{e}"));
    c.bench_function("evaluate_depth_4", |b| {
        b.iter(|| black_box(facade.evaluate(&path)));
    });
}

criterion_group!(benches, fan_out, nested_evaluate);
criterion_main!(benches);
