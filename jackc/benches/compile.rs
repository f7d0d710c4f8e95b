use criterion::{black_box, criterion_group, criterion_main, Criterion};

use jackc::prelude::*;

fn criterion_benchmark(c: &mut Criterion) {
    let library = Library::stdlib().unwrap();

    c.bench_function("compile point", |b| {
        b.iter(|| black_box(jackc::compile_str(include_str!("../tests/Point.jack"), &library)))
    });

    c.bench_function("tokenize point", |b| {
        b.iter(|| black_box(jackc::lex::tokenize(include_str!("../tests/Point.jack"))))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
