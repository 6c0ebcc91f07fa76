use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub smoother: SmootherConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            scroll: ScrollConfig::default(),
            watch: WatchConfig::default(),
            smoother: SmootherConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Smooth-scroll interpolation settings.
///
/// Smoothness is the fraction of the remaining distance covered per frame at
/// a 60 fps reference rate. Narrow viewports get a slower chase so short
/// pages do not snap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Smoothness for viewports at or below `narrow_max_width`
    #[serde(default = "default_narrow_smoothness")]
    pub narrow_smoothness: f64,
    /// Smoothness for wider viewports
    #[serde(default = "default_wide_smoothness")]
    pub wide_smoothness: f64,
    /// Widest viewport (px) still considered narrow
    #[serde(default = "default_narrow_max_width")]
    pub narrow_max_width: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            narrow_smoothness: default_narrow_smoothness(),
            wide_smoothness: default_wide_smoothness(),
            narrow_max_width: default_narrow_max_width(),
        }
    }
}

/// Timing for the page watchers (delays, debounces, polling).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Delay before the first page-ready callback in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    /// Debounce after a location change before re-firing in milliseconds
    #[serde(default = "default_nav_debounce")]
    pub nav_debounce_ms: u64,
    /// Interval between element-wait polls in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Give up waiting for an element after this many milliseconds
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay(),
            nav_debounce_ms: default_nav_debounce(),
            poll_interval_ms: default_poll_interval(),
            wait_timeout_ms: default_wait_timeout(),
        }
    }
}

/// Defaults handed to the external smoother library when the caller does not
/// override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmootherConfig {
    /// Element id of the outer wrapper
    #[serde(default = "default_wrapper_id")]
    pub wrapper_id: String,
    /// Element id of the inner content wrapper
    #[serde(default = "default_content_id")]
    pub content_id: String,
    /// Catch-up duration factor for the library smoother
    #[serde(default = "default_smooth")]
    pub smooth: f64,
    /// Enable data-speed / parallax effects
    #[serde(default = "default_true")]
    pub effects: bool,
    /// Touch smoothing factor
    #[serde(default = "default_smooth_touch")]
    pub smooth_touch: f64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            wrapper_id: default_wrapper_id(),
            content_id: default_content_id(),
            smooth: default_smooth(),
            effects: default_true(),
            smooth_touch: default_smooth_touch(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_narrow_smoothness() -> f64 {
    0.03
}

fn default_wide_smoothness() -> f64 {
    0.056
}

fn default_narrow_max_width() -> f64 {
    768.0
}

fn default_initial_delay() -> u64 {
    500 // page settles before the first ready callback
}

fn default_nav_debounce() -> u64 {
    300
}

fn default_poll_interval() -> u64 {
    100
}

fn default_wait_timeout() -> u64 {
    7000
}

fn default_wrapper_id() -> String {
    "smooth-wrapper".to_string()
}

fn default_content_id() -> String {
    "smooth-content".to_string()
}

fn default_smooth() -> f64 {
    5.0
}

fn default_smooth_touch() -> f64 {
    0.1
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/pageglide/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("pageglide")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_behavior() {
        let config = AppConfig::default();
        assert_eq!(config.scroll.narrow_smoothness, 0.03);
        assert_eq!(config.scroll.wide_smoothness, 0.056);
        assert_eq!(config.watch.initial_delay_ms, 500);
        assert_eq!(config.watch.nav_debounce_ms, 300);
        assert_eq!(config.watch.poll_interval_ms, 100);
        assert_eq!(config.watch.wait_timeout_ms, 7000);
        assert_eq!(config.smoother.wrapper_id, "smooth-wrapper");
        assert_eq!(config.smoother.content_id, "smooth-content");
        assert_eq!(config.smoother.smooth, 5.0);
        assert!(config.smoother.effects);
        assert_eq!(config.smoother.smooth_touch, 0.1);
    }

    #[test]
    fn test_partial_toml_fills_missing_fields() {
        let config: AppConfig = toml::from_str(
            r#"
            [scroll]
            wide_smoothness = 0.08
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.wide_smoothness, 0.08);
        assert_eq!(config.scroll.narrow_smoothness, 0.03);
        assert_eq!(config.watch.wait_timeout_ms, 7000);
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.scroll.narrow_max_width, config.scroll.narrow_max_width);
        assert_eq!(back.smoother.wrapper_id, config.smoother.wrapper_id);
    }
}
