use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{error, info, warn};

use rust_laptop_scraper::browser::{BrowserManager, LivePage};
use rust_laptop_scraper::card_reader;
use rust_laptop_scraper::config::{Config, RunPaths};
use rust_laptop_scraper::export;
use rust_laptop_scraper::pagination::load_all_products;
use rust_laptop_scraper::prompt::{Interruptible, NonInteractive, StdinPrompt, UserPrompt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::load();
    let run_paths = RunPaths::new(&config.output_dir);

    // Ctrl-C during loading means "stop clicking, scrape what's there",
    // not "abort the run".
    let stop_flag = Arc::new(AtomicBool::new(false));
    {
        let flag = stop_flag.clone();
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;
    }

    let manager = BrowserManager::new(config.browser.browser_config())?;
    let tab = manager.new_tab()?;
    let mut page = LivePage::new(tab, config.selectors.clone(), &run_paths);

    info!("Opening: {}", config.target_url);
    page.open(&config.target_url)?;

    if let Err(e) = page.wait_for_first_card(config.pagination.first_page_timeout()) {
        error!("First product cards did not load: {}", e);
        return Ok(());
    }

    if config.interactive {
        captcha_workaround(&page);
    } else {
        info!("Non-interactive run; skipping CAPTCHA workaround.");
    }

    let mut prompt: Box<dyn UserPrompt> = if config.interactive {
        Box::new(Interruptible::new(stop_flag.clone(), StdinPrompt))
    } else {
        Box::new(Interruptible::new(stop_flag.clone(), NonInteractive))
    };

    let reason = load_all_products(
        &mut page,
        &mut prompt,
        &config.pagination.controller_config(),
    )?;
    info!("Loading finished: {}", reason);

    let records = match card_reader::collect_records(&mut page) {
        Ok(records) => records,
        Err(e) => {
            error!("Could not extract laptops: {}", e);
            Vec::new()
        }
    };

    if records.is_empty() {
        warn!("No laptops collected. Nothing saved.");
        return Ok(());
    }

    export::save_records(&run_paths.csv_path, &records)?;
    Ok(())
}

/// Open the first product in a new tab so the operator can clear a
/// CAPTCHA there, then block until they confirm.
fn captcha_workaround(page: &LivePage) {
    info!("Opening first laptop in a new tab. Solve the CAPTCHA there if prompted.");
    match page.open_first_product_tab() {
        Ok(()) => {
            println!("After solving the CAPTCHA in the new tab, press [Enter] to continue scraping...");
            let mut line = String::new();
            let _ = io::stdin().lock().read_line(&mut line);
        }
        Err(e) => warn!("Could not trigger CAPTCHA workaround: {}", e),
    }
}
