use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{GrayImage, Luma};

use circle_sweep::hough::{extract_edges, EdgeParams, HoughCircleDetector};
use circle_sweep::{run_sweep, CircleDetector, HoughCircleParams, SweepConfig};

fn disk_frame(width: u32, height: u32, radius: f32) -> GrayImage {
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let img = GrayImage::from_fn(width, height, |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        if dx * dx + dy * dy <= radius * radius {
            Luma([210])
        } else {
            Luma([40])
        }
    });
    imageproc::filter::gaussian_blur_f32(&img, 2.0)
}

fn bench_edges(c: &mut Criterion) {
    let img = disk_frame(640, 480, 120.0);
    let params = EdgeParams::default();
    c.bench_function("edges_640x480", |b| {
        b.iter(|| extract_edges(black_box(&img), black_box(&params)))
    });
}

fn bench_detect(c: &mut Criterion) {
    let img = disk_frame(640, 480, 120.0);
    let detector = HoughCircleDetector::new(&img, &EdgeParams::default());
    let narrow = HoughCircleParams {
        vote_threshold: 50,
        min_radius: 117,
        max_radius: 123,
        ..HoughCircleParams::default()
    };
    c.bench_function("detect_640x480_dp1_r117_123", |b| {
        b.iter(|| detector.detect(black_box(&narrow)))
    });

    let coarse = HoughCircleParams { dp: 4.0, ..narrow };
    c.bench_function("detect_640x480_dp4_r117_123", |b| {
        b.iter(|| detector.detect(black_box(&coarse)))
    });
}

fn bench_sweep(c: &mut Criterion) {
    let img = disk_frame(320, 240, 60.0);
    let detector = HoughCircleDetector::new(&img, &EdgeParams::default());
    let config = SweepConfig {
        max_circle_size: 80,
        min_circle_size: 40,
        max_vote_threshold: 60,
        vote_threshold_step: 10,
        vote_threshold_floor: 25,
        ..SweepConfig::default()
    };
    let mut group = c.benchmark_group("sweep");
    group.sample_size(10);
    group.bench_function("sweep_320x240_r60", |b| {
        b.iter(|| run_sweep(&detector, black_box(&config)))
    });
    group.finish();
}

criterion_group!(hough, bench_edges, bench_detect, bench_sweep);
criterion_main!(hough);
