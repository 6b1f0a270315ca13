//! Reads the raw text fields off every visible product card.
//!
//! A failed lookup for one field yields the "N/A" sentinel for that
//! field alone; a card is never dropped for missing text. Only a fatal
//! source fault aborts the read.

use log::info;
use unicode_normalization::UnicodeNormalization;

use crate::models::{CardHandle, LaptopRecord, RawCard, NOT_AVAILABLE};
use crate::page::{CardField, FieldError, PageSource, SourceError};
use crate::parser::parse_specs;

/// Snapshot the page once and read name, specs and price for each card,
/// in card-encounter order.
pub fn extract_cards<S: PageSource>(source: &mut S) -> Result<Vec<RawCard>, SourceError> {
    info!("Extracting laptop details...");
    let snapshot = source.snapshot()?;
    let mut cards = Vec::with_capacity(snapshot.count());

    for handle in snapshot.cards() {
        let name = read_or_sentinel(source, handle, CardField::Name)?;
        let specs_text = match source.read_card_field(handle, CardField::Specs) {
            Ok(raw) => normalize_specs_text(&raw),
            Err(FieldError::Missing) => NOT_AVAILABLE.to_string(),
            Err(FieldError::Source(e)) => return Err(e),
        };
        let price = read_or_sentinel(source, handle, CardField::Price)?;

        cards.push(RawCard {
            name,
            specs_text,
            price,
        });
    }

    Ok(cards)
}

/// Read every card and parse its specs into one record per card, in
/// card-encounter order. This is the whole post-loading extraction
/// step; the caller decides what to do with an error (zero records,
/// sink not invoked).
pub fn collect_records<S: PageSource>(
    source: &mut S,
) -> Result<Vec<LaptopRecord>, SourceError> {
    let cards = extract_cards(source)?;
    Ok(cards
        .into_iter()
        .map(|card| {
            let spec = parse_specs(&card.specs_text);
            LaptopRecord::new(card, spec)
        })
        .collect())
}

fn read_or_sentinel<S: PageSource>(
    source: &mut S,
    card: CardHandle,
    field: CardField,
) -> Result<String, SourceError> {
    match source.read_card_field(card, field) {
        Ok(text) => Ok(text.trim().to_string()),
        Err(FieldError::Missing) => Ok(NOT_AVAILABLE.to_string()),
        Err(FieldError::Source(e)) => Err(e),
    }
}

/// Canonically compose the specs text and turn the thin space the
/// listing uses between number and unit (U+2009) into a plain space.
fn normalize_specs_text(raw: &str) -> String {
    raw.trim().nfc().collect::<String>().replace('\u{2009}', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingSnapshot;
    use crate::page::ClickError;
    use std::path::PathBuf;

    /// Card grid backed by plain data; `None` simulates a failed field
    /// lookup.
    struct FakeCards {
        cards: Vec<[Option<String>; 3]>,
        fail_all_reads: bool,
    }

    impl PageSource for FakeCards {
        type Control = ();

        fn snapshot(&mut self) -> Result<ListingSnapshot, SourceError> {
            Ok(ListingSnapshot::with_len(self.cards.len()))
        }

        fn find_load_more(&mut self) -> Result<Option<()>, SourceError> {
            Ok(None)
        }

        fn is_visible(&mut self, _: &()) -> Result<bool, SourceError> {
            Ok(false)
        }

        fn scroll_into_view(&mut self, _: &()) -> Result<(), SourceError> {
            Ok(())
        }

        fn scroll_by(&mut self, _: i64, _: i64) -> Result<(), SourceError> {
            Ok(())
        }

        fn click(&mut self, _: &()) -> Result<(), ClickError> {
            Err(ClickError::Detached)
        }

        fn capture_diagnostic(&mut self, _: &str) -> Result<PathBuf, SourceError> {
            Ok(PathBuf::new())
        }

        fn read_card_field(
            &mut self,
            card: CardHandle,
            field: CardField,
        ) -> Result<String, FieldError> {
            if self.fail_all_reads {
                return Err(SourceError::SessionLost("tab crashed".to_string()).into());
            }
            let slot = match field {
                CardField::Name => 0,
                CardField::Specs => 1,
                CardField::Price => 2,
            };
            self.cards[card.index()][slot]
                .clone()
                .ok_or(FieldError::Missing)
        }
    }

    fn card(name: &str, specs: &str, price: &str) -> [Option<String>; 3] {
        [
            Some(name.to_string()),
            Some(specs.to_string()),
            Some(price.to_string()),
        ]
    }

    #[test]
    fn test_single_missing_field_keeps_the_card() {
        let mut source = FakeCards {
            cards: vec![
                card("Laptop A", "16GB DDR4 RAM", "₹50,000"),
                [
                    Some("Laptop B".to_string()),
                    Some("8GB RAM".to_string()),
                    None, // price lookup fails on this card only
                ],
                card("Laptop C", "32GB DDR5 RAM", "₹90,000"),
            ],
            fail_all_reads: false,
        };

        let cards = extract_cards(&mut source).unwrap();

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].price, "₹50,000");
        assert_eq!(cards[1].price, NOT_AVAILABLE);
        assert_eq!(cards[1].name, "Laptop B");
        assert_eq!(cards[2].price, "₹90,000");
    }

    #[test]
    fn test_thin_space_collapsed_in_specs() {
        let mut source = FakeCards {
            cards: vec![card("Laptop", "16\u{2009}GB DDR4 RAM", "₹50,000")],
            fail_all_reads: false,
        };

        let cards = extract_cards(&mut source).unwrap();
        assert_eq!(cards[0].specs_text, "16 GB DDR4 RAM");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let mut source = FakeCards {
            cards: vec![card("  Laptop  ", "  8GB RAM  ", " ₹30,000 ")],
            fail_all_reads: false,
        };

        let cards = extract_cards(&mut source).unwrap();
        assert_eq!(cards[0].name, "Laptop");
        assert_eq!(cards[0].specs_text, "8GB RAM");
        assert_eq!(cards[0].price, "₹30,000");
    }

    #[test]
    fn test_fatal_fault_aborts_extraction() {
        let mut source = FakeCards {
            cards: vec![card("Laptop", "8GB RAM", "₹30,000")],
            fail_all_reads: true,
        };

        assert!(extract_cards(&mut source).is_err());
    }

    #[test]
    fn test_empty_snapshot_yields_no_cards() {
        let mut source = FakeCards {
            cards: vec![],
            fail_all_reads: false,
        };

        assert!(extract_cards(&mut source).unwrap().is_empty());
    }
}
