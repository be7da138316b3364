use criterion::{Criterion, black_box, criterion_group, criterion_main};
use postgate_core::error::FetchError;
use postgate_core::slot::FetchSlot;
use postgate_core::value::SlotValues;
use postgate_runtime::DataGate;

fn source(key: &str, value: u64) -> FetchSlot {
    FetchSlot::from_fn(key, move |_inputs: SlotValues| async move {
        Ok::<_, FetchError>(value)
    })
}

/// Four sources and one dependent.
fn router_shape() -> Vec<FetchSlot> {
    vec![
        source("username", 1),
        source("settings", 2),
        source("postData", 3),
        source("dictionaries", 4),
        FetchSlot::from_fn("userData", |inputs: SlotValues| async move {
            let user = inputs.require::<u64>("username")?;
            Ok::<_, FetchError>(*user + 1)
        })
        .depends_on(["username"]),
    ]
}

/// A linear chain `s0 <- s1 <- ... <- s{n-1}`.
fn chain(n: usize) -> Vec<FetchSlot> {
    (0..n)
        .map(|i| {
            let slot = source(&format!("s{i}"), i as u64);
            if i == 0 {
                slot
            } else {
                slot.depends_on([format!("s{}", i - 1)])
            }
        })
        .collect()
}

fn bench_settle(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    let mut group = c.benchmark_group("gate_settle");
    group.bench_function("router_shape", |b| {
        b.to_async(&rt).iter(|| async {
            let mut gate = DataGate::register("bench", router_shape()).unwrap();
            black_box(gate.settle().await)
        })
    });
    group.bench_function("chain_32", |b| {
        b.to_async(&rt).iter(|| async {
            let mut gate = DataGate::register("bench", chain(32)).unwrap();
            black_box(gate.settle().await)
        })
    });
    group.finish();
}

fn bench_register(c: &mut Criterion) {
    c.bench_function("register_chain_128", |b| {
        b.iter(|| black_box(DataGate::register("bench", chain(128)).unwrap()))
    });
}

criterion_group!(benches, bench_settle, bench_register);
criterion_main!(benches);
