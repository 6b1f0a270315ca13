// Library interface for rust_laptop_scraper
// This allows tests and the binary to use the scraper components

pub mod browser;
pub mod card_reader;
pub mod config;
pub mod export;
pub mod models;
pub mod page;
pub mod pagination;
pub mod parser;
pub mod prompt;
