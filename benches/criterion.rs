use std::collections::VecDeque;

use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use shared_array::SharedBytes;

fn empty(c: &mut Criterion) {
    let mut group = c.benchmark_group("empty");
    group.bench_function("shared", |b| {
        b.iter(SharedBytes::default);
    });
    group.bench_function("bytes", |b| {
        b.iter(Bytes::default);
    });
}

fn clone_static(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone_static");
    group.bench_function("shared", |b| {
        let bytes = SharedBytes::from_static(&[]);
        b.iter(|| bytes.clone());
    });
    group.bench_function("bytes", |b| {
        let bytes = Bytes::from_static(&[]);
        b.iter(|| bytes.clone());
    });
}

fn clone_shared(c: &mut Criterion) {
    let mut group = c.benchmark_group("clone_shared");
    group.bench_function("shared", |b| {
        let bytes = SharedBytes::from_slice(&[0u8; 8]);
        b.iter(|| bytes.clone());
    });
    group.bench_function("bytes", |b| {
        let bytes = Bytes::from(vec![0u8; 8]).clone();
        b.iter(|| bytes.clone());
    });
}

fn detach(c: &mut Criterion) {
    let mut group = c.benchmark_group("detach");
    group.bench_function("shared", |b| {
        let bytes = SharedBytes::from_slice(&[0u8; 64]);
        b.iter_batched(
            || bytes.clone(),
            |mut bytes| {
                bytes.make_mut()[0] = 1;
                bytes
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("vec", |b| {
        let vec = vec![0u8; 64];
        b.iter_batched(
            || &vec,
            |vec| {
                let mut vec = vec.clone();
                vec[0] = 1;
                vec
            },
            BatchSize::SmallInput,
        );
    });
}

fn push(c: &mut Criterion) {
    let mut group = c.benchmark_group("push_1024");
    group.bench_function("shared", |b| {
        b.iter(|| {
            let mut vec = SharedBytes::new();
            for i in 0..1024 {
                vec.push(i as u8);
            }
            vec
        });
    });
    group.bench_function("vec", |b| {
        b.iter(|| {
            let mut vec = Vec::new();
            for i in 0..1024 {
                vec.push(i as u8);
            }
            vec
        });
    });
}

fn prepend(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepend_1024");
    group.bench_function("shared", |b| {
        b.iter(|| {
            let mut vec = SharedBytes::new();
            for i in 0..1024 {
                vec.prepend(i as u8);
            }
            vec
        });
    });
    group.bench_function("vec_deque", |b| {
        b.iter(|| {
            let mut deque = VecDeque::new();
            for i in 0..1024 {
                deque.push_front(i as u8);
            }
            deque
        });
    });
}

criterion_group!(benches, empty, clone_static, clone_shared, detach, push, prepend);
criterion_main!(benches);
