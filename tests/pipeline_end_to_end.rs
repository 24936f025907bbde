use std::path::PathBuf;

use dpmdetect::lowlevel::FEATURE_DIM;
use dpmdetect::{
    Detect, DetectError, Detection, Detector, DetectorConfig, FeaturePyramid, Grid, LevelScores,
    Mixture, MixtureModel, Rect, RgbImage, RootFilter, RootSize,
};

/// Model that ignores the pyramid and returns fixed per-level scores.
struct FixedScores {
    sizes: Vec<RootSize>,
    levels: Vec<LevelScores>,
}

impl MixtureModel for FixedScores {
    fn root_sizes(&self) -> Vec<RootSize> {
        self.sizes.clone()
    }

    fn convolve(&self, _pyramid: &FeaturePyramid) -> Vec<LevelScores> {
        self.levels.clone()
    }
}

fn fixed(rows: usize, cols: usize, scores: Vec<f32>, size: usize) -> FixedScores {
    FixedScores {
        sizes: vec![RootSize {
            rows: size,
            cols: size,
        }],
        levels: vec![LevelScores::single_component(
            Grid::from_vec(scores, rows, cols).unwrap(),
        )],
    }
}

fn small_config() -> DetectorConfig {
    DetectorConfig {
        padding: 2,
        interval: 5,
        max_image_size: 256,
        ..DetectorConfig::default()
    }
}

fn temp_model_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dpmdetect-{}-{name}.json", std::process::id()))
}

fn checkerboard_scene(width: usize, height: usize, x0: usize, y0: usize, side: usize) -> RgbImage {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let inside = x >= x0 && x < x0 + side && y >= y0 && y < y0 + side;
            let v = if inside && ((x / 4) + (y / 4)) % 2 == 0 {
                255
            } else {
                0
            };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    RgbImage::new(data, width, height).unwrap()
}

fn energy_filter(rows: usize, cols: usize, bias: f32) -> RootFilter {
    let mut weights = vec![0.0; rows * cols * FEATURE_DIM];
    for cell in weights.chunks_mut(FEATURE_DIM) {
        cell[FEATURE_DIM - 1] = 1.0;
    }
    RootFilter {
        rows,
        cols,
        bias,
        weights,
    }
}

#[test]
fn single_peak_becomes_one_detection() {
    let model = fixed(3, 3, vec![0.1, 0.1, 0.1, 0.1, 0.9, 0.1, 0.1, 0.1, 0.1], 2);
    let detector = Detector::with_model(small_config(), model).unwrap();
    let img = RgbImage::filled(64, 64, [0, 0, 0]).unwrap();

    let dets = detector.detect(img.view());
    // Cell (1, 1) sits inside the 2-cell padding, so the box starts at the origin.
    assert_eq!(dets, vec![Detection::new(0.9, Rect::new(0, 0, 8, 8))]);
}

#[test]
fn overlapping_maxima_are_suppressed() {
    let model = fixed(1, 5, vec![0.9, 0.1, 0.1, 0.1, 0.5], 10);
    let detector = Detector::with_model(small_config(), model).unwrap();
    let img = RgbImage::filled(100, 100, [0, 0, 0]).unwrap();

    let dets = detector.detect(img.view());
    assert_eq!(dets, vec![Detection::new(0.9, Rect::new(0, 0, 40, 40))]);
}

#[test]
fn custom_predicate_replaces_the_metric() {
    let model = fixed(1, 5, vec![0.9, 0.1, 0.1, 0.1, 0.5], 10);
    let detector = Detector::with_model(small_config(), model)
        .unwrap()
        .with_overlap_predicate(|_r: Rect, _c: Rect, _t: f32| false);
    let img = RgbImage::filled(100, 100, [0, 0, 0]).unwrap();

    let dets = detector.detect(img.view());
    assert_eq!(dets.len(), 2);
    assert_eq!(dets[1].rect, Rect::new(8, 0, 40, 40));
}

#[test]
fn nothing_above_threshold_gives_no_detections() {
    let model = fixed(2, 2, vec![0.1, 0.2, 0.3, 0.0], 2);
    let detector = Detector::with_model(small_config(), model).unwrap();
    let img = RgbImage::filled(32, 32, [0, 0, 0]).unwrap();
    assert!(detector.detect(img.view()).is_empty());
}

#[test]
fn cells_won_by_an_unsized_component_are_dropped() {
    // Component 1 wins the peak but the model only reports a footprint for 0.
    let model = FixedScores {
        sizes: vec![RootSize { rows: 1, cols: 1 }],
        levels: vec![LevelScores::new(
            Grid::from_vec(vec![0.0, 0.0, 0.9], 1, 3).unwrap(),
            Grid::from_vec(vec![0, 0, 1], 1, 3).unwrap(),
        )
        .unwrap()],
    };
    let detector = Detector::with_model(small_config(), model).unwrap();
    let img = RgbImage::filled(64, 64, [0, 0, 0]).unwrap();
    assert!(detector.detect(img.view()).is_empty());
}

#[test]
fn level_grids_of_different_shapes_are_rejected() {
    let err = LevelScores::new(
        Grid::from_vec(vec![0.0, 0.0, 0.9], 1, 3).unwrap(),
        Grid::from_vec(vec![1], 1, 1).unwrap(),
    )
    .err();
    assert_eq!(
        err,
        Some(DetectError::InvalidDimensions {
            width: 1,
            height: 1
        })
    );
}

#[test]
fn rects_are_in_bounded_coordinates_by_default() {
    let model = fixed(1, 1, vec![0.9], 5);
    let img = RgbImage::filled(400, 200, [0, 0, 0]).unwrap();
    let cfg = DetectorConfig {
        max_image_size: 200,
        ..small_config()
    };

    let detector = Detector::with_model(cfg.clone(), fixed(1, 1, vec![0.9], 5)).unwrap();
    assert_eq!(detector.detect(img.view())[0].rect, Rect::new(0, 0, 20, 20));

    let detector = Detector::with_model(
        DetectorConfig {
            report_input_coords: true,
            ..cfg
        },
        model,
    )
    .unwrap();
    assert_eq!(detector.detect(img.view())[0].rect, Rect::new(0, 0, 40, 40));
}

#[test]
fn batch_output_is_positionally_aligned() {
    let model = fixed(1, 1, vec![0.9], 5);
    let detector = Detector::with_model(small_config(), model).unwrap();
    let tiny = RgbImage::filled(10, 10, [0, 0, 0]).unwrap();
    let large = RgbImage::filled(80, 80, [0, 0, 0]).unwrap();

    let out = detector.detect_batch(&[tiny.view(), large.view(), tiny.view()]);
    assert_eq!(out.len(), 3);
    assert_eq!(out[0][0].rect, Rect::new(0, 0, 10, 10));
    assert_eq!(out[1][0].rect, Rect::new(0, 0, 20, 20));
    assert_eq!(out[2], out[0]);
    assert!(detector.detect_batch(&[]).is_empty());
}

#[test]
fn empty_model_fails_construction() {
    let model = FixedScores {
        sizes: Vec::new(),
        levels: Vec::new(),
    };
    let err = Detector::with_model(small_config(), model).err().unwrap();
    assert_eq!(err, DetectError::EmptyModel);

    let path = temp_model_path("empty");
    std::fs::write(&path, r#"{"components": []}"#).unwrap();
    let err = Detector::new(DetectorConfig {
        model_file: path.clone(),
        ..small_config()
    })
    .err()
    .unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(err, DetectError::EmptyModel);
}

#[test]
fn missing_model_fails_construction() {
    let err = Detector::new(DetectorConfig {
        model_file: PathBuf::from("/nonexistent/dpmdetect/model.json"),
        ..small_config()
    })
    .err()
    .unwrap();
    assert!(matches!(err, DetectError::ModelIo { .. }));
}

#[test]
fn invalid_config_fails_construction() {
    let err = Detector::with_model(
        DetectorConfig {
            padding: 1,
            ..small_config()
        },
        fixed(1, 1, vec![1.0], 1),
    )
    .err()
    .unwrap();
    assert!(matches!(err, DetectError::InvalidConfig { .. }));
}

#[test]
fn mixture_from_file_finds_textured_region() {
    let mixture = Mixture::new(vec![energy_filter(2, 2, -0.5), energy_filter(3, 2, -0.75)]).unwrap();
    let path = temp_model_path("energy");
    mixture.save(&path).unwrap();

    let detector = Detector::new(DetectorConfig {
        model_file: path.clone(),
        ..small_config()
    })
    .unwrap();
    std::fs::remove_file(&path).ok();
    assert!(detector.model().filters_cached());

    let (width, height) = (200, 160);
    let square = Rect::new(64, 48, 64, 64);
    let img = checkerboard_scene(width, height, 64, 48, 64);
    let dets = detector.detect(img.view());

    assert!(!dets.is_empty());
    for pair in dets.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for det in &dets {
        let r = det.rect;
        assert!(r.x >= 0 && r.y >= 0);
        assert!(r.x + r.width <= width as i32 && r.y + r.height <= height as i32);
        assert!(det.score > 0.3);
    }
    assert!(dets[0].rect.intersection_area(&square) > 0);

    let flat = RgbImage::filled(width, height, [128, 128, 128]).unwrap();
    assert!(detector.detect(flat.view()).is_empty());
}
