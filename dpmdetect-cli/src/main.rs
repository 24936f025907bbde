use clap::Parser;
use dpmdetect::io::load_rgb_image;
use dpmdetect::{Detect, Detection, Detector, DetectorConfig, OverlapMetric, RgbImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Mixture-model object detector (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum OverlapMetricConfig {
    CandidateArea,
    Union,
}

impl From<OverlapMetricConfig> for OverlapMetric {
    fn from(value: OverlapMetricConfig) -> Self {
        match value {
            OverlapMetricConfig::CandidateArea => OverlapMetric::CandidateArea,
            OverlapMetricConfig::Union => OverlapMetric::Union,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DetectorConfigJson {
    threshold: f32,
    overlap: f32,
    padding: usize,
    interval: usize,
    max_image_size: usize,
    overlap_metric: OverlapMetricConfig,
    parallel: bool,
    report_input_coords: bool,
}

impl Default for DetectorConfigJson {
    fn default() -> Self {
        let cfg = DetectorConfig::default();
        Self {
            threshold: cfg.threshold,
            overlap: cfg.overlap,
            padding: cfg.padding,
            interval: cfg.interval,
            max_image_size: cfg.max_image_size,
            overlap_metric: OverlapMetricConfig::CandidateArea,
            parallel: cfg.parallel,
            report_input_coords: cfg.report_input_coords,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    model_file: String,
    image_paths: Vec<String>,
    output_path: Option<String>,
    detector: DetectorConfigJson,
}

impl Config {
    fn into_detector_config(self) -> (DetectorConfig, Vec<String>, Option<String>) {
        let d = self.detector;
        let cfg = DetectorConfig {
            model_file: PathBuf::from(self.model_file),
            threshold: d.threshold,
            overlap: d.overlap,
            padding: d.padding,
            interval: d.interval,
            max_image_size: d.max_image_size,
            overlap_metric: d.overlap_metric.into(),
            parallel: d.parallel,
            report_input_coords: d.report_input_coords,
        };
        (cfg, self.image_paths, self.output_path)
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    score: f32,
}

impl From<Detection> for DetectionRecord {
    fn from(value: Detection) -> Self {
        Self {
            x: value.rect.x,
            y: value.rect.y,
            width: value.rect.width,
            height: value.rect.height,
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct ImageRecord {
    path: String,
    detections: Vec<DetectionRecord>,
}

#[derive(Debug, Serialize)]
struct Output {
    images: Vec<ImageRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("dpmdetect=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.model_file.is_empty() {
        return Err("model_file must be set in the config".into());
    }
    if config.image_paths.is_empty() {
        return Err("image_paths must list at least one image".into());
    }

    let (detector_cfg, image_paths, output_path) = config.into_detector_config();
    let detector = Detector::new(detector_cfg)?;

    let images = image_paths
        .iter()
        .map(load_rgb_image)
        .collect::<Result<Vec<RgbImage>, _>>()?;
    let views: Vec<_> = images.iter().map(RgbImage::view).collect();
    let results = detector.detect_batch(&views);

    tracing::info!(images = images.len(), "detection finished");

    let images = image_paths
        .into_iter()
        .zip(results)
        .map(|(path, detections)| ImageRecord {
            path,
            detections: detections.into_iter().map(DetectionRecord::from).collect(),
        })
        .collect();
    let json = serde_json::to_string_pretty(&Output { images })?;

    match output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
