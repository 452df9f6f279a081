// In zdepth-core/benches/codec_bench.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use zdepth::{DepthCompressor, EncodeMode};

// --- MOCK DATA GENERATION ---

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

/// A smooth depth ramp with a patch of out-of-range (far) samples.
fn generate_scene(frame: u32) -> Vec<u16> {
    let mut data = Vec::with_capacity((WIDTH * HEIGHT) as usize);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let depth = if x > 500 && y < 100 {
                9000
            } else {
                800 + (x + y) * 2 + (frame * 3 + x * y) % 5
            };
            data.push(depth as u16);
        }
    }
    data
}

// --- Benchmark Suite ---

fn bench_frame_codec(c: &mut Criterion) {
    // --- Setup Data ---
    let first = generate_scene(0);
    let second = generate_scene(1);

    let keyframe = DepthCompressor::new()
        .compress(WIDTH, HEIGHT, &first, true)
        .unwrap();

    let mut encoder = DepthCompressor::new();
    let stream_key = encoder.compress(WIDTH, HEIGHT, &first, false).unwrap();
    let stream_delta = encoder.compress(WIDTH, HEIGHT, &second, false).unwrap();

    // --- Create a Benchmark Group ---
    let mut group = c.benchmark_group("Depth Frame Codec (640x480)");
    group.throughput(criterion::Throughput::Bytes((WIDTH * HEIGHT * 2) as u64));

    group.bench_function("Compress Keyframe", |b| {
        let mut enc = DepthCompressor::new();
        enc.set_encode_mode(EncodeMode::NotQuantized4095mm);
        b.iter(|| black_box(enc.compress(WIDTH, HEIGHT, black_box(&first), true)))
    });
    group.bench_function("Compress Delta Frame", |b| {
        let mut enc = DepthCompressor::new();
        b.iter(|| {
            enc.compress(WIDTH, HEIGHT, &first, true).unwrap();
            black_box(enc.compress(WIDTH, HEIGHT, black_box(&second), false))
        })
    });

    group.bench_function("Decompress Keyframe", |b| {
        let mut dec = DepthCompressor::new();
        b.iter(|| black_box(dec.decompress(black_box(&keyframe))))
    });
    group.bench_function("Decompress Delta Frame", |b| {
        let mut dec = DepthCompressor::new();
        b.iter(|| {
            dec.decompress(&stream_key).unwrap();
            black_box(dec.decompress(black_box(&stream_delta)))
        })
    });

    group.finish();
}

// These two lines generate the main function and register the benchmark group.
criterion_group!(benches, bench_frame_codec);
criterion_main!(benches);
