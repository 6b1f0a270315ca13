//! Spec-text parser: turns one free-form laptop specification string
//! into structured hardware attributes.
//!
//! Every field has its own extraction rule taking the first
//! case-insensitive match; rules are independent of each other, so a
//! miss in one field never disturbs another. Unmatched fields stay
//! `None` — "unknown" is not zero. No cross-field validation on
//! purpose: listing text is too irregular for it to pay off.

use regex::Regex;

use crate::models::{ParsedSpec, StorageType, NOT_AVAILABLE};

/// Parse a specs string into structured attributes. Pure and
/// deterministic; the empty string and the "N/A" sentinel yield an
/// all-absent record.
pub fn parse_specs(specs: &str) -> ParsedSpec {
    if specs.is_empty() || specs == NOT_AVAILABLE {
        return ParsedSpec::default();
    }

    ParsedSpec {
        processor: extract_processor(specs),
        ram_size_gb: extract_ram_size(specs),
        ram_type: extract_ram_type(specs),
        storage_ssd_gb: extract_ssd_gb(specs),
        storage_hdd_gb: extract_hdd_gb(specs),
        storage_type: extract_storage_type(specs),
        gpu: extract_gpu(specs),
        vram_gb: extract_vram(specs),
        os: extract_os(specs),
        display_inches: extract_display_inches(specs),
    }
}

/// First token run starting with a known CPU vendor or Apple silicon
/// name, up to the next field separator.
fn extract_processor(specs: &str) -> Option<String> {
    let re = Regex::new(r"(?i)(Intel|AMD|Apple|M1|M2|M3|M4)[^/|,]+").unwrap();
    re.find(specs).map(|m| m.as_str().trim().to_string())
}

fn extract_ram_size(specs: &str) -> Option<u32> {
    let re = Regex::new(r"(?i)(\d+)\s?GB\s?(?:DDR\d|LPDDR\d)?\s?RAM").unwrap();
    let caps = re.captures(specs)?;
    caps[1].parse().ok()
}

fn extract_ram_type(specs: &str) -> Option<String> {
    let re = Regex::new(r"(?i)(DDR[345]|LPDDR[45])").unwrap();
    re.find(specs).map(|m| m.as_str().trim().to_string())
}

/// TB capacities normalize to GB (×1024); a TB match takes precedence
/// over a GB match.
fn extract_ssd_gb(specs: &str) -> Option<u32> {
    extract_capacity_gb(specs, "SSD")
}

fn extract_hdd_gb(specs: &str) -> Option<u32> {
    extract_capacity_gb(specs, "HDD")
}

fn extract_capacity_gb(specs: &str, kind: &str) -> Option<u32> {
    let tb = Regex::new(&format!(r"(?i)(\d+)\s?TB\s?{}", kind)).unwrap();
    if let Some(caps) = tb.captures(specs) {
        return caps[1].parse::<u32>().ok().map(|n| n * 1024);
    }
    let gb = Regex::new(&format!(r"(?i)(\d+)\s?GB\s?{}", kind)).unwrap();
    let caps = gb.captures(specs)?;
    caps[1].parse().ok()
}

/// Substring checks in fixed priority: SSD, then HDD, then eMMC.
/// Case-sensitive, matching the vendor's own capitalization.
fn extract_storage_type(specs: &str) -> Option<StorageType> {
    if specs.contains("SSD") {
        Some(StorageType::Ssd)
    } else if specs.contains("HDD") {
        Some(StorageType::Hdd)
    } else if specs.contains("eMMC") {
        Some(StorageType::Emmc)
    } else {
        None
    }
}

fn extract_gpu(specs: &str) -> Option<String> {
    let re = Regex::new(
        r"(?i)(RTX\s?\d{3,4}|GTX\s?\d{3,4}|Intel Iris Xe|Radeon\s?\w+|Graphics\s\d+)",
    )
    .unwrap();
    re.find(specs).map(|m| m.as_str().trim().to_string())
}

fn extract_vram(specs: &str) -> Option<u32> {
    let re = Regex::new(r"(?i)(\d+)\s?GB\s?(?:VRAM|Graphics|Graph|RTX|GTX)").unwrap();
    let caps = re.captures(specs)?;
    caps[1].parse().ok()
}

/// Matched OS names pass through as written, except the Win11/Win10
/// shorthands which expand to their full names.
fn extract_os(specs: &str) -> Option<String> {
    let re =
        Regex::new(r"(?i)(Windows\s?\d+|Win11|Win10|Mac\s?OS|MacOS|DOS|Linux|Ubuntu)").unwrap();
    re.find(specs).map(|m| {
        m.as_str()
            .replace("Win11", "Windows 11")
            .replace("Win10", "Windows 10")
            .trim()
            .to_string()
    })
}

fn extract_display_inches(specs: &str) -> Option<f64> {
    let re = Regex::new(r"(?i)(\d{2,3}\.?\d?)\s?-?\s?inch").unwrap();
    let caps = re.captures(specs)?;
    caps[1].parse().ok()
}
