use std::sync::Arc;

use chrono::Duration;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use gatekeeper_auth::{ManualClock, TokenCodec, TokenType};
use gatekeeper_core::UserId;

fn bench_codec(c: &mut Criterion) {
    let clock = Arc::new(ManualClock::at_timestamp(1_700_000_000));
    let codec = TokenCodec::new("bench-secret", clock);
    let token = codec
        .issue(UserId::new(1), TokenType::Access, Duration::minutes(120))
        .unwrap();

    let mut group = c.benchmark_group("token_codec");

    group.bench_function("encode", |b| {
        b.iter(|| {
            codec
                .issue(black_box(UserId::new(1)), TokenType::Access, Duration::minutes(120))
                .unwrap()
        })
    });

    group.bench_function("decode", |b| {
        b.iter(|| codec.decode(black_box(&token)).unwrap())
    });

    group.bench_function("decode_rejects_garbage", |b| {
        b.iter(|| codec.decode(black_box("badtoken")).is_err())
    });

    group.finish();
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
