//! Browser automation for the live listing page.
//!
//! Drives headless (or headed) Chrome to load the JavaScript-rendered
//! listing, exposes it to the core through the `PageSource` trait, and
//! handles the parts that need a real browser: first-page wait, CAPTCHA
//! pass-through and diagnostic screenshots.
//!
//! # Example
//!
//! ```no_run
//! use rust_laptop_scraper::browser::{BrowserConfig, BrowserManager, LivePage};
//! use rust_laptop_scraper::config::{RunPaths, Selectors};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = BrowserManager::new(BrowserConfig::default())?;
//! let tab = manager.new_tab()?;
//! let run_paths = RunPaths::new("data");
//! let page = LivePage::new(tab, Selectors::default(), &run_paths);
//!
//! page.open("https://www.smartprix.com/laptops")?;
//! page.wait_for_first_card(std::time::Duration::from_secs(60))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod manager;
pub mod page;

pub use config::BrowserConfig;
pub use manager::{BrowserError, BrowserManager};
pub use page::LivePage;
