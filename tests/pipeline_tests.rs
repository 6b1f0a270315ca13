//! End-to-end pipeline tests against a scripted in-memory listing:
//! load-more loop, card extraction, spec parsing, CSV export.

use std::path::PathBuf;
use std::time::Duration;

use rust_laptop_scraper::card_reader::collect_records;
use rust_laptop_scraper::export::write_records;
use rust_laptop_scraper::models::{CardHandle, ListingSnapshot, StorageType, NOT_AVAILABLE};
use rust_laptop_scraper::page::{CardField, ClickError, FieldError, PageSource, SourceError};
use rust_laptop_scraper::pagination::{load_all_products, PaginationConfig, TerminationReason};
use rust_laptop_scraper::prompt::NonInteractive;

struct ScriptedCard {
    name: Option<String>,
    specs: Option<String>,
    price: Option<String>,
}

fn scripted_card(name: &str, specs: &str, price: &str) -> ScriptedCard {
    ScriptedCard {
        name: Some(name.to_string()),
        specs: Some(specs.to_string()),
        price: Some(price.to_string()),
    }
}

/// Listing that reveals `page_size` more cards per click and hides the
/// load-more control once everything is visible.
struct ScriptedListing {
    cards: Vec<ScriptedCard>,
    visible: usize,
    page_size: usize,
    clicks: usize,
}

impl ScriptedListing {
    fn new(cards: Vec<ScriptedCard>, initial: usize, page_size: usize) -> Self {
        Self {
            cards,
            visible: initial,
            page_size,
            clicks: 0,
        }
    }
}

impl PageSource for ScriptedListing {
    type Control = ();

    fn snapshot(&mut self) -> Result<ListingSnapshot, SourceError> {
        Ok(ListingSnapshot::with_len(self.visible))
    }

    fn find_load_more(&mut self) -> Result<Option<()>, SourceError> {
        Ok(Some(()))
    }

    fn is_visible(&mut self, _: &()) -> Result<bool, SourceError> {
        Ok(self.visible < self.cards.len())
    }

    fn scroll_into_view(&mut self, _: &()) -> Result<(), SourceError> {
        Ok(())
    }

    fn scroll_by(&mut self, _: i64, _: i64) -> Result<(), SourceError> {
        Ok(())
    }

    fn click(&mut self, _: &()) -> Result<(), ClickError> {
        self.clicks += 1;
        self.visible = (self.visible + self.page_size).min(self.cards.len());
        Ok(())
    }

    fn capture_diagnostic(&mut self, tag: &str) -> Result<PathBuf, SourceError> {
        Ok(PathBuf::from(format!("{}.png", tag)))
    }

    fn read_card_field(
        &mut self,
        card: CardHandle,
        field: CardField,
    ) -> Result<String, FieldError> {
        let scripted = &self.cards[card.index()];
        let value = match field {
            CardField::Name => &scripted.name,
            CardField::Specs => &scripted.specs,
            CardField::Price => &scripted.price,
        };
        value.clone().ok_or(FieldError::Missing)
    }
}

fn fast_config() -> PaginationConfig {
    PaginationConfig {
        growth_timeout: Duration::from_millis(20),
        growth_poll_interval: Duration::from_millis(1),
        pre_scroll_delay: Duration::ZERO,
        post_scroll_delay: Duration::ZERO,
        post_growth_delay: Duration::ZERO,
        retry_delay: Duration::ZERO,
        ..PaginationConfig::default()
    }
}

fn sample_listing() -> ScriptedListing {
    let mut cards = vec![scripted_card(
        "HP Victus",
        "Intel Core i5-12450H, 16GB DDR4 RAM, 512GB SSD, RTX 2050 4GB Graphics, Windows 11, 15.6-inch",
        "₹62,990",
    )];
    for i in 1..6 {
        cards.push(scripted_card(
            &format!("Laptop {}", i),
            "AMD Ryzen 5 5500U, 8GB DDR4 RAM, 512GB SSD, Win11, 15.6-inch",
            "₹45,000",
        ));
    }
    ScriptedListing::new(cards, 2, 2)
}

#[test]
fn test_load_until_complete_then_extract_all_cards() {
    let mut listing = sample_listing();

    let reason =
        load_all_products(&mut listing, &mut NonInteractive, &fast_config()).unwrap();
    assert_eq!(reason, TerminationReason::Complete);
    assert_eq!(listing.clicks, 2);
    assert_eq!(listing.visible, 6);

    let records = collect_records(&mut listing).unwrap();
    assert_eq!(records.len(), 6);

    let first = &records[0];
    assert_eq!(first.name, "HP Victus");
    assert_eq!(first.processor, Some("Intel Core i5-12450H".to_string()));
    assert_eq!(first.ram_size_gb, Some(16));
    assert_eq!(first.storage_ssd_gb, Some(512));
    assert_eq!(first.storage_type, Some(StorageType::Ssd));
    assert_eq!(first.gpu, Some("RTX 2050".to_string()));
    assert_eq!(first.vram_gb, Some(4));
    assert_eq!(first.os, Some("Windows 11".to_string()));
    assert_eq!(first.display_inches, Some(15.6));
}

#[test]
fn test_faulty_field_yields_sentinel_on_exactly_that_record() {
    let mut cards = vec![
        scripted_card("Laptop A", "16GB DDR4 RAM", "₹50,000"),
        scripted_card("Laptop B", "8GB RAM", "₹30,000"),
        scripted_card("Laptop C", "32GB DDR5 RAM", "₹90,000"),
    ];
    cards[1].price = None; // this lookup fails
    let mut listing = ScriptedListing::new(cards, 3, 1);

    let records = collect_records(&mut listing).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].price, "₹50,000");
    assert_eq!(records[1].price, NOT_AVAILABLE);
    assert_eq!(records[1].name, "Laptop B");
    assert_eq!(records[1].ram_size_gb, Some(8));
    assert_eq!(records[2].price, "₹90,000");
}

#[test]
fn test_records_export_in_card_encounter_order() {
    let mut listing = sample_listing();
    load_all_products(&mut listing, &mut NonInteractive, &fast_config()).unwrap();
    let records = collect_records(&mut listing).unwrap();

    let mut buf = Vec::new();
    write_records(&mut buf, &records).unwrap();
    let out = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = out.lines().collect();

    // Header plus one row per card, rows in page order.
    assert_eq!(lines.len(), 7);
    assert!(lines[0].starts_with("Name,Specs,Price,Processor"));
    assert!(lines[1].starts_with("HP Victus,"));
    assert!(lines[2].starts_with("Laptop 1,"));
    assert!(lines[6].starts_with("Laptop 5,"));
}

#[test]
fn test_missing_specs_leaves_parsed_fields_absent() {
    let mut cards = vec![scripted_card("Bare Laptop", "", "₹20,000")];
    cards[0].specs = None;
    let mut listing = ScriptedListing::new(cards, 1, 1);

    let records = collect_records(&mut listing).unwrap();

    assert_eq!(records[0].specs, NOT_AVAILABLE);
    assert_eq!(records[0].processor, None);
    assert_eq!(records[0].ram_size_gb, None);
    assert_eq!(records[0].storage_type, None);
    assert_eq!(records[0].display_inches, None);
}
