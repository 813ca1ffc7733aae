use libm::{floorf, fmax, fmaxf, fmin, fminf, roundf};

/// Clamps `x` into `[lo, hi]`. Unlike `f32::clamp`, a NaN collapses to `lo`
/// so callers always get a value inside the range.
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    fminf(fmaxf(x, lo), hi)
}

pub fn clamp_f64(x: f64, lo: f64, hi: f64) -> f64 {
    fmin(fmax(x, lo), hi)
}

/// Rounds to the nearest count. Negative and NaN inputs give 0, huge inputs
/// saturate at `u32::MAX`.
pub fn round_to_count(x: f32) -> u32 {
    roundf(x) as u32
}

/// Truncates towards negative infinity, with the same saturation as
/// [`round_to_count`].
pub fn floor_to_count(x: f32) -> u32 {
    floorf(x) as u32
}
