use std::io::Cursor;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use descomp::_internal_test_data::QUALITY_LIKE_64K;
use descomp::block::WordSize;
use descomp::codec::{decode_subsequence, encode_subsequence};
use descomp::config::SubsequenceConfig;

fn encode_64k(c: &mut Criterion) {
    c.bench_function("Encode 64K quality-like subsequence", |b| {
        b.iter_batched_ref(
            || {
                (
                    QUALITY_LIKE_64K.clone(),
                    SubsequenceConfig::run_length(WordSize::W1, 8),
                )
            },
            |(block, config)| {
                let mut data = Vec::new();
                encode_subsequence(block.clone(), None, config, &mut data).unwrap();
            },
            BatchSize::LargeInput,
        )
    });
}

fn decode_64k(c: &mut Criterion) {
    c.bench_function("Decode 64K quality-like subsequence", |b| {
        b.iter_batched_ref(
            || {
                let config = SubsequenceConfig::run_length(WordSize::W1, 8);
                let mut data = Vec::new();
                encode_subsequence(QUALITY_LIKE_64K.clone(), None, &config, &mut data)
                    .unwrap();
                (data, config)
            },
            |(data, config)| {
                let block =
                    decode_subsequence(&mut Cursor::new(&*data), None, config).unwrap();
                assert_eq!(block.len(), QUALITY_LIKE_64K.len());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, encode_64k, decode_64k);
criterion_main!(benches);
