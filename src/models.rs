use serde::Serialize;

/// Marker for "field lookup did not find a value" at the raw-text layer.
/// Distinct from `None` in the parsed layer, where absence means "unknown".
pub const NOT_AVAILABLE: &str = "N/A";

/// Point-in-time view of the currently materialized product cards.
/// Produced by the page source on every poll; never mutated by the core.
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    cards: Vec<CardHandle>,
}

impl ListingSnapshot {
    pub fn with_len(count: usize) -> Self {
        Self {
            cards: (0..count).map(CardHandle).collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn cards(&self) -> impl Iterator<Item = CardHandle> + '_ {
        self.cards.iter().copied()
    }
}

/// Opaque handle to one product card within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardHandle(pub(crate) usize);

impl CardHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Raw per-card text as read from the page. Missing fields carry the
/// `NOT_AVAILABLE` sentinel instead of discarding the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCard {
    pub name: String,
    pub specs_text: String,
    pub price: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StorageType {
    #[serde(rename = "SSD")]
    Ssd,
    #[serde(rename = "HDD")]
    Hdd,
    #[serde(rename = "eMMC")]
    Emmc,
}

/// Structured attributes parsed out of one specs string. Every field is
/// optional: an unmatched pattern leaves the field absent, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedSpec {
    pub processor: Option<String>,
    pub ram_size_gb: Option<u32>,
    pub ram_type: Option<String>,
    pub storage_ssd_gb: Option<u32>,
    pub storage_hdd_gb: Option<u32>,
    pub storage_type: Option<StorageType>,
    pub gpu: Option<String>,
    pub vram_gb: Option<u32>,
    pub os: Option<String>,
    pub display_inches: Option<f64>,
}

/// One output row: raw card fields plus parsed attributes, flattened.
/// Column names match the original export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaptopRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Specs")]
    pub specs: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Processor")]
    pub processor: Option<String>,
    #[serde(rename = "RAM Size (GB)")]
    pub ram_size_gb: Option<u32>,
    #[serde(rename = "RAM Type")]
    pub ram_type: Option<String>,
    #[serde(rename = "Storage SSD (GB)")]
    pub storage_ssd_gb: Option<u32>,
    #[serde(rename = "Storage HDD (GB)")]
    pub storage_hdd_gb: Option<u32>,
    #[serde(rename = "Storage Type")]
    pub storage_type: Option<StorageType>,
    #[serde(rename = "GPU")]
    pub gpu: Option<String>,
    #[serde(rename = "VRAM (GB)")]
    pub vram_gb: Option<u32>,
    #[serde(rename = "OS")]
    pub os: Option<String>,
    #[serde(rename = "Display Size (inch)")]
    pub display_inches: Option<f64>,
}

impl LaptopRecord {
    pub fn new(card: RawCard, spec: ParsedSpec) -> Self {
        Self {
            name: card.name,
            specs: card.specs_text,
            price: card.price,
            processor: spec.processor,
            ram_size_gb: spec.ram_size_gb,
            ram_type: spec.ram_type,
            storage_ssd_gb: spec.storage_ssd_gb,
            storage_hdd_gb: spec.storage_hdd_gb,
            storage_type: spec.storage_type,
            gpu: spec.gpu,
            vram_gb: spec.vram_gb,
            os: spec.os,
            display_inches: spec.display_inches,
        }
    }
}
