//! Live implementation of [`PageSource`] over a Chrome tab.
//!
//! Controls are keyed by CSS selector and re-resolved at the point of
//! use: `headless_chrome::Element` borrows its tab, so holding one
//! across settle delays would only add a way to dangle. A control that
//! disappears between locating and clicking surfaces as
//! `ClickError::Detached`, which the pagination loop treats as
//! recoverable.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use headless_chrome::protocol::cdp::Page;
use headless_chrome::Tab;
use log::info;
use serde_json::Value;

use super::manager::BrowserError;
use crate::config::{RunPaths, Selectors};
use crate::models::{CardHandle, ListingSnapshot};
use crate::page::{CardField, ClickError, FieldError, PageSource, SourceError};

pub struct LivePage {
    tab: Arc<Tab>,
    selectors: Selectors,
    diagnostic_dir: PathBuf,
    run_timestamp: String,
}

impl LivePage {
    pub fn new(tab: Arc<Tab>, selectors: Selectors, run_paths: &RunPaths) -> Self {
        Self {
            tab,
            selectors,
            diagnostic_dir: run_paths.diagnostic_dir.clone(),
            run_timestamp: run_paths.timestamp.clone(),
        }
    }

    /// Navigate to the listing and wait for the page load to finish.
    pub fn open(&self, url: &str) -> Result<(), BrowserError> {
        self.tab
            .navigate_to(url)
            .map_err(|e| BrowserError::NavigationError(format!("Failed to navigate to {}: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| BrowserError::NavigationError(format!("Navigation timeout for {}: {}", url, e)))?;
        Ok(())
    }

    /// Wait until at least one product card is present.
    pub fn wait_for_first_card(&self, timeout: Duration) -> Result<(), BrowserError> {
        let start = Instant::now();
        let script = format!(
            r#"document.querySelector('{}') !== null"#,
            escape_selector(&self.selectors.card)
        );

        loop {
            if start.elapsed() > timeout {
                return Err(BrowserError::Timeout(format!(
                    "first product cards ({})",
                    self.selectors.card
                )));
            }
            if let Ok(result) = self.tab.evaluate(&script, false) {
                if result.value.and_then(|v| v.as_bool()) == Some(true) {
                    return Ok(());
                }
            }
            thread::sleep(Duration::from_millis(500));
        }
    }

    /// CAPTCHA pass-through: open the first product in a new tab so a
    /// human can clear the challenge there, then give the page a moment.
    /// The caller blocks on the operator prompt afterwards.
    pub fn open_first_product_tab(&self) -> Result<(), BrowserError> {
        let href_script = format!(
            r#"(function() {{ const a = document.querySelector('{}'); return a ? a.href : null; }})()"#,
            escape_selector(&self.selectors.name)
        );
        let href = self
            .tab
            .evaluate(&href_script, false)
            .map_err(|e| BrowserError::JavaScriptError(e.to_string()))?
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| {
                BrowserError::JavaScriptError("no product link found for CAPTCHA workaround".to_string())
            })?;

        info!("Opening first laptop in new tab: {}", href);
        let open_script = format!(r#"window.open('{}', '_blank');"#, href.replace('\'', "\\'"));
        self.tab
            .evaluate(&open_script, false)
            .map_err(|e| BrowserError::JavaScriptError(e.to_string()))?;
        thread::sleep(Duration::from_secs(5));
        Ok(())
    }

    fn eval(&self, script: &str) -> Result<Value, SourceError> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| SourceError::SessionLost(e.to_string()))?;
        Ok(result.value.unwrap_or(Value::Null))
    }

    fn field_selector(&self, field: CardField) -> &str {
        match field {
            CardField::Name => &self.selectors.name,
            CardField::Specs => &self.selectors.specs,
            CardField::Price => &self.selectors.price,
        }
    }
}

fn escape_selector(selector: &str) -> String {
    selector.replace('\'', "\\'")
}

impl PageSource for LivePage {
    type Control = String;

    fn snapshot(&mut self) -> Result<ListingSnapshot, SourceError> {
        let script = format!(
            r#"document.querySelectorAll('{}').length"#,
            escape_selector(&self.selectors.card)
        );
        let count = self
            .eval(&script)?
            .as_u64()
            .ok_or_else(|| SourceError::SessionLost("card count query returned no number".to_string()))?;
        Ok(ListingSnapshot::with_len(count as usize))
    }

    fn find_load_more(&mut self) -> Result<Option<String>, SourceError> {
        let script = format!(
            r#"document.querySelector('{}') !== null"#,
            escape_selector(&self.selectors.load_more)
        );
        if self.eval(&script)?.as_bool() == Some(true) {
            Ok(Some(self.selectors.load_more.clone()))
        } else {
            Ok(None)
        }
    }

    fn is_visible(&mut self, control: &String) -> Result<bool, SourceError> {
        let script = format!(
            r#"(function() {{
                const el = document.querySelector('{}');
                if (!el) return false;
                const style = window.getComputedStyle(el);
                return style.display !== 'none'
                    && style.visibility !== 'hidden'
                    && el.offsetParent !== null;
            }})()"#,
            escape_selector(control)
        );
        Ok(self.eval(&script)?.as_bool() == Some(true))
    }

    fn scroll_into_view(&mut self, control: &String) -> Result<(), SourceError> {
        // No-op if the control just vanished; the click will report it.
        let script = format!(
            r#"(function() {{
                const el = document.querySelector('{}');
                if (el) el.scrollIntoView({{block: 'center'}});
            }})()"#,
            escape_selector(control)
        );
        self.tab
            .evaluate(&script, false)
            .map_err(|e| SourceError::ScrollFailed(e.to_string()))?;
        Ok(())
    }

    fn scroll_by(&mut self, dx: i64, dy: i64) -> Result<(), SourceError> {
        let script = format!("window.scrollBy({}, {});", dx, dy);
        self.tab
            .evaluate(&script, false)
            .map_err(|e| SourceError::ScrollFailed(e.to_string()))?;
        Ok(())
    }

    fn click(&mut self, control: &String) -> Result<(), ClickError> {
        let element = self
            .tab
            .find_element(control)
            .map_err(|_| ClickError::Detached)?;
        element.click().map_err(|_| ClickError::Intercepted)?;
        Ok(())
    }

    fn capture_diagnostic(&mut self, tag: &str) -> Result<PathBuf, SourceError> {
        let data = self
            .tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| SourceError::DiagnosticFailed(e.to_string()))?;

        fs::create_dir_all(&self.diagnostic_dir)
            .map_err(|e| SourceError::DiagnosticFailed(e.to_string()))?;
        let path = self
            .diagnostic_dir
            .join(format!("{}_{}.png", tag, self.run_timestamp));
        fs::write(&path, data).map_err(|e| SourceError::DiagnosticFailed(e.to_string()))?;
        Ok(path)
    }

    fn read_card_field(
        &mut self,
        card: CardHandle,
        field: CardField,
    ) -> Result<String, FieldError> {
        let cards = self
            .tab
            .find_elements(&self.selectors.card)
            .map_err(|e| SourceError::SessionLost(e.to_string()))?;
        // A card that vanished since the snapshot reads as missing.
        let card_element = cards.get(card.index()).ok_or(FieldError::Missing)?;

        let field_element = card_element
            .find_element(self.field_selector(field))
            .map_err(|_| FieldError::Missing)?;
        field_element
            .get_inner_text()
            .map_err(|_| FieldError::Missing)
    }
}
