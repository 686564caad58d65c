use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use yaml_node::EmitterManip::*;
use yaml_node::{from_node, to_node, to_string, to_string_with_options, Document, Emitter, EmitterOptions};

#[derive(Serialize, Deserialize, Clone)]
struct User {
    id: u32,
    name: String,
    email: String,
    active: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn benchmark_to_node_simple(c: &mut Criterion) {
    let user = User {
        id: 123,
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        active: true,
    };

    c.bench_function("to_node_simple_struct", |b| {
        b.iter(|| to_node(black_box(&user)))
    });
}

fn benchmark_from_node_simple(c: &mut Criterion) {
    let mut doc = Document::new();
    let mut root = doc.root_mut();
    let _ = root.insert("id", 123);
    let _ = root.insert("name", "Alice");
    let _ = root.insert("email", "alice@example.com");
    let _ = root.insert("active", true);

    c.bench_function("from_node_simple_struct", |b| {
        b.iter(|| from_node::<User>(black_box(doc.root())))
    });
}

fn benchmark_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");

    for size in [10usize, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut doc = Document::new();
                for i in 0..size {
                    let _ = doc
                        .root_mut()
                        .into_child(i % 10)
                        .and_then(|bucket| bucket.into_child(format!("key{}", i)))
                        .map(|mut leaf| leaf.set(i));
                }
                black_box(doc)
            })
        });
    }
    group.finish();
}

fn benchmark_emit_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit_block");

    for size in [10u32, 50, 100, 500].iter() {
        let doc = to_node(&products(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(doc.root())))
        });
    }
    group.finish();
}

fn benchmark_emit_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("emit_flow");

    for size in [10u32, 50, 100, 500].iter() {
        let doc = to_node(&products(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string_with_options(black_box(doc.root()), EmitterOptions::flow()))
        });
    }
    group.finish();
}

fn benchmark_manipulator_stream(c: &mut Criterion) {
    c.bench_function("manipulator_stream", |b| {
        b.iter(|| {
            let mut out = Emitter::new();
            out.emit(BeginSeq);
            for i in 0..100 {
                out.emit(Hex).emit(black_box(i)).emit(YesNoBool).emit(i % 2 == 0);
            }
            out.emit(EndSeq);
            out.into_string()
        })
    });
}

criterion_group!(
    benches,
    benchmark_to_node_simple,
    benchmark_from_node_simple,
    benchmark_build_tree,
    benchmark_emit_block,
    benchmark_emit_flow,
    benchmark_manipulator_stream
);
criterion_main!(benches);
