use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use stockroom_core::ProductId;
use stockroom_infra::{OrderLifecycleManager, ProductService, TransactionCoordinator};
use stockroom_products::NewProduct;
use stockroom_sales::OrderItem;

/// Stock high enough that no benchmark iteration runs out.
const BOTTOMLESS: i64 = i64::MAX / 4;

fn setup(products: usize) -> (OrderLifecycleManager, Vec<ProductId>) {
    let coordinator = Arc::new(TransactionCoordinator::new());
    let catalog = ProductService::new(coordinator.inventory());
    let ids = (0..products)
        .map(|i| {
            catalog
                .create(NewProduct::new(format!("P{i}"), format!("SKU-{i}"), 100, BOTTOMLESS))
                .unwrap()
                .id
        })
        .collect();
    (OrderLifecycleManager::new(coordinator), ids)
}

fn lines(ids: &[ProductId], count: usize) -> Vec<OrderItem> {
    (0..count)
        .map(|i| OrderItem::new(ids[i % ids.len()], 1 + (i % 3) as i64))
        .collect()
}

fn bench_operation_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("operation_latency");
    group.sample_size(500);

    group.bench_function("create_order", |b| {
        let (manager, ids) = setup(3);
        let items = lines(&ids, 3);
        b.iter(|| black_box(manager.create_order("bench", items.clone()).unwrap()));
    });

    group.bench_function("create_and_cancel", |b| {
        let (manager, ids) = setup(3);
        let items = lines(&ids, 3);
        b.iter(|| {
            let order = manager.create_order("bench", items.clone()).unwrap();
            black_box(manager.cancel_order(order.id).unwrap())
        });
    });

    group.bench_function("partial_return", |b| {
        let (manager, ids) = setup(3);
        let items = lines(&ids, 6);
        let returns = vec![OrderItem::new(ids[0], 1), OrderItem::new(ids[1], 2)];
        b.iter_batched(
            || manager.create_order("bench", items.clone()).unwrap().id,
            |id| black_box(manager.partial_return(id, returns.clone()).unwrap()),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("get_order", |b| {
        let (manager, ids) = setup(3);
        let id = manager.create_order("bench", lines(&ids, 3)).unwrap().id;
        b.iter(|| black_box(manager.get_order(id).unwrap()));
    });

    group.finish();
}

fn bench_order_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_size");

    for line_count in [1usize, 10, 100].iter() {
        group.throughput(Throughput::Elements(*line_count as u64));
        group.bench_with_input(
            BenchmarkId::new("create_order", line_count),
            line_count,
            |b, &count| {
                let (manager, ids) = setup(count.min(20));
                let items = lines(&ids, count);
                b.iter(|| black_box(manager.create_order("bench", items.clone()).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_contended_creates(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_creates");

    for threads in [1usize, 2, 4, 8].iter() {
        group.throughput(Throughput::Elements(*threads as u64));
        group.bench_with_input(
            BenchmarkId::new("threads", threads),
            threads,
            |b, &threads| {
                let (manager, ids) = setup(4);
                let manager = Arc::new(manager);
                let items = lines(&ids, 2);
                b.iter_custom(|iters| {
                    let start = Instant::now();
                    let handles: Vec<_> = (0..threads)
                        .map(|_| {
                            let manager = Arc::clone(&manager);
                            let items = items.clone();
                            thread::spawn(move || {
                                for _ in 0..iters {
                                    black_box(manager.create_order("bench", items.clone()).unwrap());
                                }
                            })
                        })
                        .collect();
                    for h in handles {
                        h.join().unwrap();
                    }
                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_operation_latency,
    bench_order_size,
    bench_contended_creates
);
criterion_main!(benches);
