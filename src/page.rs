//! Capability boundary between the scraping core and the live page.
//!
//! The pagination controller and card reader never touch the browser
//! directly; they drive whatever implements [`PageSource`]. The live
//! implementation sits in `browser::page`, test doubles live next to
//! the code they exercise.

use std::path::PathBuf;

use crate::models::{CardHandle, ListingSnapshot};

/// Which text field of a product card to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardField {
    Name,
    Specs,
    Price,
}

/// Fatal page-source failure. Anything carrying this aborts the run;
/// recoverable conditions have their own types below.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("page session lost: {0}")]
    SessionLost(String),

    #[error("scroll failed: {0}")]
    ScrollFailed(String),

    #[error("diagnostic capture failed: {0}")]
    DiagnosticFailed(String),
}

/// Outcome of a failed click on the "load more" control.
#[derive(Debug, thiserror::Error)]
pub enum ClickError {
    /// Another element swallowed the click. Recoverable: the controller
    /// nudges the viewport and retries on the next iteration.
    #[error("click intercepted by an overlapping element")]
    Intercepted,

    /// The control vanished between locating it and clicking it.
    /// Recoverable the same way.
    #[error("control detached from the page")]
    Detached,

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Outcome of a failed per-card field read.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// The field's locator found nothing on this card. The card reader
    /// substitutes the "N/A" sentinel and keeps the card.
    #[error("field not present on card")]
    Missing,

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Everything the core needs from the live listing page.
///
/// `Control` is an opaque handle to the "load more" element; the live
/// source keys it by selector so a stale handle degrades to
/// [`ClickError::Detached`] instead of a dangling reference.
pub trait PageSource {
    type Control;

    /// Re-query the set of currently visible cards.
    fn snapshot(&mut self) -> Result<ListingSnapshot, SourceError>;

    /// Locate the "load more" control. `None` means the listing has no
    /// such control anymore, i.e. the end was reached.
    fn find_load_more(&mut self) -> Result<Option<Self::Control>, SourceError>;

    fn is_visible(&mut self, control: &Self::Control) -> Result<bool, SourceError>;

    fn scroll_into_view(&mut self, control: &Self::Control) -> Result<(), SourceError>;

    /// Scroll the viewport by a pixel offset (negative dy scrolls up).
    fn scroll_by(&mut self, dx: i64, dy: i64) -> Result<(), SourceError>;

    fn click(&mut self, control: &Self::Control) -> Result<(), ClickError>;

    /// Write an image snapshot of the current page state for debugging,
    /// named after `tag`. Returns the artifact path.
    fn capture_diagnostic(&mut self, tag: &str) -> Result<PathBuf, SourceError>;

    /// Read one text field of one card.
    fn read_card_field(&mut self, card: CardHandle, field: CardField)
        -> Result<String, FieldError>;
}
