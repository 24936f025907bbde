//! Numeric helpers shared by the pyramid builder and the coordinate mapper.

/// Rounds half up, matching `floor(v + 0.5)`.
pub(crate) fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Pixels per feature cell at pyramid level `level`.
///
/// Level `z` is built at image factor `2^(1 - z/interval)` with 8-pixel cells,
/// so one cell spans `2^(z/interval + 2)` input pixels.
pub(crate) fn level_scale(level: usize, interval: usize) -> f64 {
    2.0_f64.powf(level as f64 / interval as f64 + 2.0)
}

/// Image resample factor used to build pyramid level `level`.
pub(crate) fn level_resample_factor(level: usize, interval: usize) -> f64 {
    2.0_f64.powf(1.0 - level as f64 / interval as f64)
}
