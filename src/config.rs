use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use serde::Deserialize;

use crate::browser::BrowserConfig;
use crate::pagination::PaginationConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_target_url")]
    pub target_url: String,

    /// Directory for the CSV export and diagnostic screenshots.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Interactive mode: CAPTCHA pass-through and the load-more
    /// checkpoint prompt. Off means the loop runs unattended.
    #[serde(default = "default_true")]
    pub interactive: bool,

    #[serde(default)]
    pub selectors: Selectors,

    #[serde(default)]
    pub pagination: PaginationSettings,

    #[serde(default)]
    pub browser: BrowserSettings,
}

/// CSS selectors for the listing page.
#[derive(Debug, Deserialize, Clone)]
pub struct Selectors {
    #[serde(default = "default_card_selector")]
    pub card: String,
    #[serde(default = "default_load_more_selector")]
    pub load_more: String,
    #[serde(default = "default_name_selector")]
    pub name: String,
    #[serde(default = "default_specs_selector")]
    pub specs: String,
    #[serde(default = "default_price_selector")]
    pub price: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaginationSettings {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    #[serde(default = "default_max_stale_attempts")]
    pub max_stale_attempts: u32,

    #[serde(default = "default_max_runtime_secs")]
    pub max_runtime_secs: u64,

    /// How long to wait for the card count to grow after a click.
    #[serde(default = "default_growth_timeout_secs")]
    pub growth_timeout_secs: u64,

    /// Settle delay before scrolling the load-more control into view.
    #[serde(default = "default_pre_scroll_delay_ms")]
    pub pre_scroll_delay_ms: u64,

    /// Settle delay between scroll and click.
    #[serde(default = "default_post_scroll_delay_ms")]
    pub post_scroll_delay_ms: u64,

    /// Settle delay after confirmed growth.
    #[serde(default = "default_post_growth_delay_ms")]
    pub post_growth_delay_ms: u64,

    /// Pause after an intercepted click before retrying.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Presence-wait for the first product cards after navigation.
    #[serde(default = "default_first_page_timeout_secs")]
    pub first_page_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserSettings {
    /// Headed by default so a human can clear a CAPTCHA.
    #[serde(default = "default_false")]
    pub headless: bool,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    #[serde(default = "default_false")]
    pub disable_images: bool,

    /// Chrome flags that mask automation signals.
    #[serde(default = "default_true")]
    pub stealth: bool,
}

fn default_target_url() -> String {
    "https://www.smartprix.com/laptops".to_string()
}
fn default_output_dir() -> String {
    "data".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_card_selector() -> String {
    "div.sm-product".to_string()
}
fn default_load_more_selector() -> String {
    "div.sm-load-more".to_string()
}
fn default_name_selector() -> String {
    "a.name".to_string()
}
fn default_specs_selector() -> String {
    ".specs".to_string()
}
fn default_price_selector() -> String {
    ".price".to_string()
}
fn default_max_iterations() -> u32 {
    200
}
fn default_max_stale_attempts() -> u32 {
    5
}
fn default_max_runtime_secs() -> u64 {
    3600
}
fn default_growth_timeout_secs() -> u64 {
    10
}
fn default_pre_scroll_delay_ms() -> u64 {
    3000
}
fn default_post_scroll_delay_ms() -> u64 {
    2500
}
fn default_post_growth_delay_ms() -> u64 {
    2000
}
fn default_retry_delay_ms() -> u64 {
    2000
}
fn default_first_page_timeout_secs() -> u64 {
    60
}
fn default_window_width() -> u32 {
    1200
}
fn default_window_height() -> u32 {
    800
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            card: default_card_selector(),
            load_more: default_load_more_selector(),
            name: default_name_selector(),
            specs: default_specs_selector(),
            price: default_price_selector(),
        }
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_stale_attempts: default_max_stale_attempts(),
            max_runtime_secs: default_max_runtime_secs(),
            growth_timeout_secs: default_growth_timeout_secs(),
            pre_scroll_delay_ms: default_pre_scroll_delay_ms(),
            post_scroll_delay_ms: default_post_scroll_delay_ms(),
            post_growth_delay_ms: default_post_growth_delay_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            first_page_timeout_secs: default_first_page_timeout_secs(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: false,
            window_width: default_window_width(),
            window_height: default_window_height(),
            disable_images: false,
            stealth: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            output_dir: default_output_dir(),
            interactive: true,
            selectors: Selectors::default(),
            pagination: PaginationSettings::default(),
            browser: BrowserSettings::default(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to
    /// defaults when the file is absent or unreadable.
    pub fn load() -> Self {
        let path = Path::new("config.toml");
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                if let Ok(cfg) = toml::from_str::<Config>(&content) {
                    return cfg;
                }
            }
        }
        Self::default()
    }
}

impl PaginationSettings {
    /// Build the controller's configuration from these settings.
    pub fn controller_config(&self) -> PaginationConfig {
        PaginationConfig {
            max_iterations: self.max_iterations,
            max_stale_attempts: self.max_stale_attempts,
            max_runtime: Duration::from_secs(self.max_runtime_secs),
            growth_timeout: Duration::from_secs(self.growth_timeout_secs),
            pre_scroll_delay: Duration::from_millis(self.pre_scroll_delay_ms),
            post_scroll_delay: Duration::from_millis(self.post_scroll_delay_ms),
            post_growth_delay: Duration::from_millis(self.post_growth_delay_ms),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            ..PaginationConfig::default()
        }
    }

    pub fn first_page_timeout(&self) -> Duration {
        Duration::from_secs(self.first_page_timeout_secs)
    }
}

impl BrowserSettings {
    /// Build a browser configuration from these settings.
    pub fn browser_config(&self) -> BrowserConfig {
        let mut config = if self.stealth {
            BrowserConfig::stealth_mode()
        } else {
            BrowserConfig::default()
        };
        config.headless = self.headless;
        config.window_size = (self.window_width, self.window_height);
        config.disable_images = self.disable_images;
        config
    }
}

/// Output locations for one run, stamped once at startup and passed
/// around explicitly.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub csv_path: PathBuf,
    pub diagnostic_dir: PathBuf,
    pub timestamp: String,
}

impl RunPaths {
    pub fn new(output_dir: &str) -> Self {
        Self::with_timestamp(output_dir, Local::now().format("%Y%m%d-%H%M%S").to_string())
    }

    pub fn with_timestamp(output_dir: &str, timestamp: String) -> Self {
        let dir = PathBuf::from(output_dir);
        Self {
            csv_path: dir.join(format!("smartprix_laptops_{}.csv", timestamp)),
            diagnostic_dir: dir,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_run_parameters() {
        let config = Config::default();
        assert_eq!(config.target_url, "https://www.smartprix.com/laptops");
        assert_eq!(config.pagination.max_iterations, 200);
        assert_eq!(config.pagination.max_stale_attempts, 5);
        assert_eq!(config.pagination.max_runtime_secs, 3600);
        assert_eq!(config.pagination.growth_timeout_secs, 10);
        assert_eq!(config.selectors.card, "div.sm-product");
        assert_eq!(config.selectors.load_more, "div.sm-load-more");
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            interactive = false

            [pagination]
            max_stale_attempts = 3
            "#,
        )
        .unwrap();

        assert!(!cfg.interactive);
        assert_eq!(cfg.pagination.max_stale_attempts, 3);
        assert_eq!(cfg.pagination.max_iterations, 200);
        assert_eq!(cfg.selectors.price, ".price");
    }

    #[test]
    fn test_run_paths_are_timestamped() {
        let paths = RunPaths::with_timestamp("data", "20250101-120000".to_string());
        assert_eq!(
            paths.csv_path,
            PathBuf::from("data/smartprix_laptops_20250101-120000.csv")
        );
        assert_eq!(paths.diagnostic_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_controller_config_conversion() {
        let settings = PaginationSettings::default();
        let config = settings.controller_config();
        assert_eq!(config.max_iterations, 200);
        assert_eq!(config.max_runtime, Duration::from_secs(3600));
        assert_eq!(config.pre_scroll_delay, Duration::from_millis(3000));
    }
}
