//! Single block function benchmark
use benches::{Benchmarker, criterion_group_bench};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};

use chacha20_card::{BLOCK_SIZE, Narrow, Native, STATE_BYTES, block::keystream_block_with};

fn bench_block(c: &mut Benchmarker) {
    let mut group = c.benchmark_group("chacha20-card-block");
    group.throughput(Throughput::Bytes(BLOCK_SIZE as u64));

    let (key, nonce, counter) = ([0x42; 32], [0x24; 12], [1, 0, 0, 0]);
    let mut state = [0u8; STATE_BYTES];
    group.bench_function("narrow", |b| {
        b.iter(|| keystream_block_with::<Narrow>(&mut state, &key, &nonce, &counter));
    });
    group.bench_function("native", |b| {
        b.iter(|| keystream_block_with::<Native>(&mut state, &key, &nonce, &counter));
    });

    group.finish();
}

criterion_group_bench!(benches, bench_block);
criterion_main!(benches);
