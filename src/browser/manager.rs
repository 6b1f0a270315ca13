use std::ffi::OsStr;
use std::sync::Arc;

use headless_chrome::{Browser, LaunchOptions, Tab};

use super::config::BrowserConfig;

/// Manages the browser instance and tab creation.
pub struct BrowserManager {
    browser: Arc<Browser>,
    config: BrowserConfig,
}

impl BrowserManager {
    /// Launch Chrome with the given configuration.
    pub fn new(config: BrowserConfig) -> Result<Self, BrowserError> {
        // Flags are assembled as owned strings first; LaunchOptions
        // borrows them only until Browser::new returns.
        let mut flags: Vec<String> = config.chrome_flags.clone();
        if config.disable_images {
            flags.push("--blink-settings=imagesEnabled=false".to_string());
        }
        if let Some(ua) = &config.user_agent {
            flags.push(format!("--user-agent={}", ua));
        }
        let args: Vec<&OsStr> = flags.iter().map(OsStr::new).collect();

        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(config.window_size))
            .args(args)
            .build()
            .map_err(|e| BrowserError::ConfigurationError(e.to_string()))?;

        let browser = Browser::new(options)
            .map_err(|e| BrowserError::InitializationError(e.to_string()))?;

        Ok(Self {
            browser: Arc::new(browser),
            config,
        })
    }

    /// Create a new tab for scraping.
    pub fn new_tab(&self) -> Result<Arc<Tab>, BrowserError> {
        self.browser
            .new_tab()
            .map_err(|e| BrowserError::TabCreationError(e.to_string()))
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }
}

/// Errors that can occur during browser operations
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Browser initialization failed: {0}")]
    InitializationError(String),

    #[error("Browser configuration error: {0}")]
    ConfigurationError(String),

    #[error("Tab creation failed: {0}")]
    TabCreationError(String),

    #[error("Navigation error: {0}")]
    NavigationError(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("JavaScript execution error: {0}")]
    JavaScriptError(String),
}
