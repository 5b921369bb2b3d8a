//! ChaCha20 card engine benchmark
use benches::{Benchmarker, criterion_group_bench};
use criterion::{
    BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};

use chacha20_card::{
    Backend, CipherContext, ChaCha20Card, DEFAULT_CAPACITY, Narrow, Native,
    cipher::{KeyIvInit, StreamCipher},
};

const SIZES: [usize; 4] = [64, 128, 200, DEFAULT_CAPACITY];

fn bench_context<B: Backend>(c: &mut Benchmarker, name: &str) {
    let mut group = c.benchmark_group(name);

    for size in SIZES {
        let msg = vec![0x5au8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_function(BenchmarkId::new("encrypt", size), |b| {
            let mut ctx: CipherContext<DEFAULT_CAPACITY, B> = CipherContext::default();
            b.iter(|| {
                black_box(ctx.encrypt(&[0x42; 32], &[0x24; 12], &[0; 4], &msg).unwrap());
            });
        });
    }

    group.finish();
}

fn bench(c: &mut Benchmarker) {
    bench_context::<Narrow>(c, "chacha20-card-narrow");
    bench_context::<Native>(c, "chacha20-card-native");

    let mut group = c.benchmark_group("chacha20-card-stream-cipher");
    for size in SIZES {
        let mut buf = vec![0u8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_function(BenchmarkId::new("apply_keystream", size), |b| {
            let key = Default::default();
            let nonce = Default::default();
            let mut cipher = ChaCha20Card::<Narrow>::new(&key, &nonce);
            b.iter(|| cipher.apply_keystream(&mut buf));
        });
    }
    group.finish();
}

criterion_group_bench!(benches, bench);
criterion_main!(benches);
