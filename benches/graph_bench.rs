//! Benchmark for graph building, walking and record generation.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use prograph::dataset::record_pairs;
use prograph::nodecodes::SyntaxKind;
use prograph::walker::{walk, DotVisitor, RecordVisitor};
use prograph::{ClassGraph, ClassGraphBuilder, Mutator, SyntaxTree, TreeDriver};
use rand::rngs::StdRng;
use rand::SeedableRng;

const CALC: &str = include_str!("../fixtures/calc.json");

/// Класс из `methods` методов вида `for (i = 0; i < n; i++) { total = add(total, i); }`.
fn synthetic_class(methods: usize) -> ClassGraph {
    let mut class = ClassGraphBuilder::new("Bench");
    for m in 0..methods {
        let mut cursor = class.open_method(format!("Bench.loop{}/1[int]", m));
        cursor.descend(SyntaxKind::Block);
        cursor.descend(SyntaxKind::ForStatement);
        cursor.emit_plain("for");
        cursor.descend(SyntaxKind::InfixExpression);
        cursor.emit_identifier("index");
        cursor.emit_plain("<");
        cursor.emit_identifier("maxCount");
        cursor.ascend().unwrap();
        cursor.descend(SyntaxKind::Block);
        for _ in 0..8 {
            cursor.descend(SyntaxKind::ExpressionStatement);
            cursor.descend(SyntaxKind::Assignment);
            cursor.emit_identifier("runningTotal");
            cursor.emit_plain("=");
            cursor.descend_call(SyntaxKind::MethodInvocation, "Bench.add/2[int,int]");
            cursor.emit_identifier("add");
            cursor.emit_identifier("runningTotal");
            cursor.emit_identifier("index");
            cursor.ascend().unwrap();
            cursor.ascend().unwrap();
            cursor.ascend().unwrap();
        }
        cursor.ascend().unwrap();
        cursor.ascend().unwrap();
        cursor.descend(SyntaxKind::ReturnStatement);
        cursor.emit_plain("return");
        cursor.emit_identifier("runningTotal");
        cursor.ascend().unwrap();
        cursor.ascend().unwrap();
        let method = cursor.close().unwrap();
        class.add_method(method);
    }
    class.build()
}

fn benchmark_build(c: &mut Criterion) {
    c.bench_function("build 100 methods", |b| {
        b.iter(|| black_box(synthetic_class(100)));
    });

    let tree = SyntaxTree::from_json_str(CALC).unwrap();
    c.bench_function("drive fixture tree", |b| {
        b.iter(|| black_box(TreeDriver::drive(&tree).unwrap()));
    });
}

fn benchmark_walk(c: &mut Criterion) {
    let graph = synthetic_class(100);

    c.bench_function("walk to DOT", |b| {
        b.iter(|| {
            let mut dot = DotVisitor::new();
            walk(&graph, &mut dot);
            black_box(dot.into_string())
        });
    });

    c.bench_function("walk to records", |b| {
        b.iter(|| {
            let mut visitor = RecordVisitor::new();
            walk(&graph, &mut visitor);
            black_box(visitor.into_records())
        });
    });
}

fn benchmark_pairs(c: &mut Criterion) {
    let graph = synthetic_class(100);
    let mutator = Mutator::new();

    c.bench_function("record pairs", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| black_box(record_pairs(&graph, &mutator, &mut rng)));
    });
}

criterion_group!(benches, benchmark_build, benchmark_walk, benchmark_pairs);
criterion_main!(benches);
