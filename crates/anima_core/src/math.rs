//! Clamp-on-write helpers and the half-life interpolation law.

use std::time::Duration;

/// Clamp into [0, 1]. NaN collapses to `fallback`.
#[inline]
pub fn clamp01_or(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        tracing::warn!("NaN detected in affect state, resetting to fallback {}", fallback);
        return fallback;
    }
    value.clamp(0.0, 1.0)
}

#[inline]
pub fn clamp01(value: f64) -> f64 {
    clamp01_or(value, 0.0)
}

/// Clamp into [-1, 1]. NaN collapses to neutral.
#[inline]
pub fn clamp_signed(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-1.0, 1.0)
}

/// Exponential approach toward `target`: the gap halves every `half_life`.
///
/// `target + (current - target) * 0.5^(dt / half_life)`, clamped to [0, 1].
/// A zero half-life snaps straight to the target.
pub fn approach_half_life(current: f64, target: f64, half_life: Duration, dt: Duration) -> f64 {
    if half_life.is_zero() {
        return clamp01(target);
    }
    let lambda = 0.5_f64.powf(dt.as_secs_f64() / half_life.as_secs_f64());
    clamp01_or(target + (current - target) * lambda, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp01_bounds() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(1.7), 1.0);
        assert_eq!(clamp01(0.42), 0.42);
        assert_eq!(clamp01(f64::INFINITY), 1.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01_or(f64::NAN, 0.2), 0.2);
    }

    #[test]
    fn test_clamp_signed() {
        assert_eq!(clamp_signed(-3.0), -1.0);
        assert_eq!(clamp_signed(0.3), 0.3);
        assert_eq!(clamp_signed(f64::NAN), 0.0);
    }

    #[test]
    fn test_one_half_life_halves_gap() {
        let hl = Duration::from_secs(60);
        let v = approach_half_life(0.9, 0.1, hl, hl);
        assert!((v - 0.5).abs() < 1e-12, "got {}", v);
    }

    #[test]
    fn test_zero_elapsed_is_identity() {
        let v = approach_half_life(0.7, 0.2, Duration::from_secs(30), Duration::ZERO);
        assert!((v - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_zero_half_life_snaps_to_target() {
        let v = approach_half_life(0.9, 0.3, Duration::ZERO, Duration::from_secs(1));
        assert_eq!(v, 0.3);
    }

    #[test]
    fn test_long_elapsed_converges() {
        let hl = Duration::from_secs(10);
        let v = approach_half_life(1.0, 0.25, hl, hl * 40);
        assert!((v - 0.25).abs() < 1e-9);
    }
}
