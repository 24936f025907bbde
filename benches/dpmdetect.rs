use dpmdetect::lowlevel::{scan_levels, suppress_overlaps, FEATURE_DIM};
use dpmdetect::{
    Detect, Detection, Detector, DetectorConfig, Grid, LevelScores, Mixture, OverlapMetric, Rect,
    RgbImage, RootFilter,
};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> RgbImage {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let value = (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as u8;
            data.extend_from_slice(&[value, value / 2, 255 - value]);
        }
    }
    RgbImage::new(data, width, height).unwrap()
}

fn make_mixture() -> Mixture {
    let components = [(6usize, 5usize), (5, 7)]
        .iter()
        .enumerate()
        .map(|(i, &(rows, cols))| RootFilter {
            rows,
            cols,
            bias: -1.0,
            weights: (0..rows * cols * FEATURE_DIM)
                .map(|k| ((k * 31 + i * 7) % 17) as f32 / 17.0 - 0.4)
                .collect(),
        })
        .collect();
    Mixture::new(components).unwrap()
}

fn bench_detector(c: &mut Criterion) {
    let image = make_image(320, 240);
    let images: Vec<RgbImage> = (0..4).map(|_| make_image(320, 240)).collect();
    let views: Vec<_> = images.iter().map(RgbImage::view).collect();

    let cfg = DetectorConfig {
        max_image_size: 320,
        ..DetectorConfig::default()
    };
    let sequential = Detector::with_model(
        DetectorConfig {
            parallel: false,
            ..cfg.clone()
        },
        make_mixture(),
    )
    .unwrap();
    let parallel = Detector::with_model(cfg, make_mixture()).unwrap();

    c.bench_function("detect_single_320x240", |b| {
        b.iter(|| black_box(sequential.detect(image.view())));
    });
    c.bench_function("detect_batch4_sequential", |b| {
        b.iter(|| black_box(sequential.detect_batch(&views)));
    });
    c.bench_function("detect_batch4_parallel", |b| {
        b.iter(|| black_box(parallel.detect_batch(&views)));
    });
}

fn bench_stages(c: &mut Criterion) {
    let rows = 120;
    let cols = 160;
    let scores: Vec<f32> = (0..rows * cols)
        .map(|i| ((i * 7919) % 1000) as f32 / 1000.0)
        .collect();
    let levels = vec![LevelScores::single_component(
        Grid::from_vec(scores, rows, cols).unwrap(),
    )];

    c.bench_function("scan_levels_120x160", |b| {
        b.iter(|| black_box(scan_levels(&levels, 0.5)));
    });

    let detections: Vec<Detection> = (0..300)
        .map(|i| {
            let rect = Rect::new((i * 37 % 400) as i32, (i * 53 % 300) as i32, 48, 64);
            Detection::new((i * 7 % 100) as f32 / 100.0, rect)
        })
        .collect();
    c.bench_function("suppress_overlaps_300", |b| {
        b.iter(|| {
            let mut dets = detections.clone();
            suppress_overlaps(&mut dets, 0.2, &OverlapMetric::CandidateArea);
            black_box(dets)
        });
    });
}

criterion_group!(benches, bench_detector, bench_stages);
criterion_main!(benches);
