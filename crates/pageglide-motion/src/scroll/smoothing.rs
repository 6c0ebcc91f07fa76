//! Pure interpolation math for the scroll engine.

/// Frame rate the smoothness factor is calibrated against.
pub const REFERENCE_FPS: f64 = 60.0;

/// Fraction of the remaining distance to cover after `dt` seconds.
///
/// `smoothness` is the per-frame fraction at the reference rate; raising the
/// complement to `dt * 60` makes the chase frame-rate independent, so two
/// 8 ms frames advance exactly as far as one 16 ms frame.
///
/// Returns 0.0 at `dt = 0` and approaches 1.0 as `dt` grows, for any
/// `smoothness` in `(0, 1)`.
#[inline]
pub fn frame_factor(smoothness: f64, dt: f64) -> f64 {
    1.0 - (1.0 - smoothness).powf(dt * REFERENCE_FPS)
}

/// Move `current` toward `target` by `factor` of the remaining distance.
/// Never overshoots for factors in `[0, 1]`; out-of-range factors are
/// clamped.
#[inline]
pub fn approach(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_factor_zero_dt_is_zero() {
        assert_eq!(frame_factor(0.03, 0.0), 0.0);
        assert_eq!(frame_factor(0.056, 0.0), 0.0);
    }

    #[test]
    fn test_factor_approaches_one_for_large_dt() {
        assert!(frame_factor(0.03, 60.0) > 0.999);
        assert!(frame_factor(0.056, 60.0) > 0.999);
    }

    #[test]
    fn test_factor_matches_reference_frame() {
        // one frame at the reference rate covers exactly `smoothness`
        let dt = 1.0 / REFERENCE_FPS;
        assert!((frame_factor(0.03, dt) - 0.03).abs() < 1e-12);
        assert!((frame_factor(0.056, dt) - 0.056).abs() < 1e-12);
    }

    #[test]
    fn test_factor_is_monotonic_in_dt() {
        let mut previous = 0.0;
        for frame in 1..=120 {
            let factor = frame_factor(0.03, frame as f64 / REFERENCE_FPS);
            assert!(factor > previous);
            previous = factor;
        }
    }

    #[test]
    fn test_approach_converges_without_overshoot() {
        let target = 1000.0;
        let mut current = 0.0;
        let factor = frame_factor(0.056, 1.0 / REFERENCE_FPS);
        for _ in 0..600 {
            let next = approach(current, target, factor);
            assert!(next >= current);
            assert!(next <= target);
            current = next;
        }
        assert!(target - current < target * 0.01);
    }

    #[test]
    fn test_split_frames_cover_same_distance() {
        let whole = approach(0.0, 100.0, frame_factor(0.03, 1.0 / 30.0));
        let half = approach(0.0, 100.0, frame_factor(0.03, 1.0 / 60.0));
        let twice = approach(half, 100.0, frame_factor(0.03, 1.0 / 60.0));
        assert!((whole - twice).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_factor_stays_in_unit_range(
            smoothness in 0.001f64..0.999,
            dt in 0.0f64..10.0,
        ) {
            let factor = frame_factor(smoothness, dt);
            prop_assert!((0.0..=1.0).contains(&factor));
        }

        #[test]
        fn prop_approach_never_leaves_span(
            current in -1000.0f64..1000.0,
            target in -1000.0f64..1000.0,
            factor in 0.0f64..1.0,
        ) {
            let next = approach(current, target, factor);
            let lo = current.min(target);
            let hi = current.max(target);
            prop_assert!(next >= lo - 1e-9 && next <= hi + 1e-9);
        }
    }
}
