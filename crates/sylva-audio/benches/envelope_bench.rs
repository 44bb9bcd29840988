//! Benchmarks for sylva-audio hot paths.
//!
//! Run with: cargo bench -p sylva-audio

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use sylva_audio::{Envelope, Fader, Renderer, Transport};
use sylva_core::StereoBuffer;

fn test_signal(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (i as f32 * 0.01).sin() * 0.8)
        .collect()
}

fn bench_envelope_compute(c: &mut Criterion) {
    // 8 seconds at 32 kHz, the longest buffer the app produces.
    let samples = test_signal(256_000);

    c.bench_function("envelope_256k_to_800px", |bencher| {
        bencher.iter(|| Envelope::compute(black_box(&samples), black_box(800)));
    });

    c.bench_function("envelope_256k_to_4000px", |bencher| {
        bencher.iter(|| Envelope::compute(black_box(&samples), black_box(4000)));
    });
}

fn bench_fade_gain(c: &mut Criterion) {
    let fader = Fader::new(640);

    c.bench_function("fade_gain_512_samples", |bencher| {
        bencher.iter(|| {
            let mut acc = 0.0f32;
            for pos in 0..512 {
                acc += fader.gain_at(black_box(pos), black_box(32_000));
            }
            acc
        });
    });
}

fn bench_renderer_fill(c: &mut Criterion) {
    let signal = test_signal(32_000);
    let buffer = Arc::new(StereoBuffer::new(signal.clone(), signal, 32_000));
    let transport = Arc::new(Transport::new(true));
    transport.start();
    let renderer = Renderer::new(buffer, Arc::clone(&transport), Fader::new(640));
    let mut out = vec![0.0f32; 512 * 2];

    c.bench_function("renderer_fill_512_frames", |bencher| {
        bencher.iter(|| {
            transport.seek(0);
            renderer.fill(black_box(&mut out));
        });
    });
}

criterion_group!(
    benches,
    bench_envelope_compute,
    bench_fade_gain,
    bench_renderer_fill
);
criterion_main!(benches);
