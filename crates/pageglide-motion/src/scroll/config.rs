//! Scroll configuration utilities.
//!
//! Re-exports the configuration type from pageglide-core and provides the
//! viewport-dependent lookups the engine needs.

pub use pageglide_core::config::ScrollConfig;

/// Viewport-dependent lookups on [`ScrollConfig`].
pub trait ScrollConfigExt {
    /// Smoothness tier for a given viewport width in pixels.
    fn smoothness_for(&self, viewport_width: f64) -> f64;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn smoothness_for(&self, viewport_width: f64) -> f64 {
        if viewport_width <= self.narrow_max_width {
            self.narrow_smoothness
        } else {
            self.wide_smoothness
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_viewport_gets_slow_tier() {
        let config = ScrollConfig::default();
        assert_eq!(config.smoothness_for(500.0), 0.03);
    }

    #[test]
    fn test_wide_viewport_gets_fast_tier() {
        let config = ScrollConfig::default();
        assert_eq!(config.smoothness_for(1200.0), 0.056);
    }

    #[test]
    fn test_breakpoint_is_inclusive_on_the_narrow_side() {
        let config = ScrollConfig::default();
        assert_eq!(config.smoothness_for(768.0), config.narrow_smoothness);
        assert_eq!(config.smoothness_for(768.5), config.wide_smoothness);
    }
}
