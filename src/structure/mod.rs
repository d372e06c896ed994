//! Structure text parsing.
//!
//! Reads the fixed-width PDB text served by AlphaFold DB and ESMFold and
//! reduces it to one reference point per residue. Parsing is total: lines
//! that are not coordinate records, or whose numeric fields do not parse,
//! are skipped without error, and an empty or foreign input yields empty
//! maps.
//!
//! # Key entry points
//!
//! - [`parse`] - residue → reference-atom coordinate
//! - [`parse_confidence`] - residue → reference-atom confidence (pLDDT)
//! - [`parse_structure`] - both maps in a single pass
//! - [`parse_atoms`] - every coordinate record, for engines that need atoms

mod map;
mod record;

use glam::DVec3;
use serde::{Deserialize, Serialize};

pub use map::ResidueMap;
pub use record::AtomRecord;

/// Atom chosen to represent a residue's position (the alpha carbon).
pub const REFERENCE_ATOM: &str = "CA";

/// Residue → reference-atom position in Ångström.
pub type ResidueCoordinateMap = ResidueMap<DVec3>;

/// Residue → reference-atom confidence score.
pub type ConfidenceMap = ResidueMap<f64>;

/// Per-residue maps derived from one structure text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedStructure {
    /// Reference-atom coordinates.
    pub coordinates: ResidueCoordinateMap,
    /// Reference-atom confidence, for residues whose confidence column
    /// parsed.
    pub confidence: ConfidenceMap,
}

/// Iterate every coordinate record in `text`, in file order.
pub fn parse_atoms(text: &str) -> impl Iterator<Item = AtomRecord<'_>> {
    text.lines().filter_map(AtomRecord::from_line)
}

/// Extract reference-atom coordinates and confidences in one pass.
///
/// When a residue number repeats (alternate locations, later models or
/// chains) the first record is kept.
#[must_use]
pub fn parse_structure(text: &str) -> ParsedStructure {
    let mut parsed = ParsedStructure::default();
    let mut duplicates = 0usize;

    for atom in parse_atoms(text).filter(|a| a.name == REFERENCE_ATOM) {
        if parsed.coordinates.insert_first(atom.residue, atom.position) {
            if let Some(score) = atom.confidence {
                let _ = parsed.confidence.insert_first(atom.residue, score);
            }
        } else {
            duplicates += 1;
        }
    }

    log::debug!(
        "parsed {} residues ({} with confidence, {} duplicate reference atoms ignored)",
        parsed.coordinates.len(),
        parsed.confidence.len(),
        duplicates
    );
    parsed
}

/// Residue → reference-atom coordinate map for `text`.
#[must_use]
pub fn parse(text: &str) -> ResidueCoordinateMap {
    parse_structure(text).coordinates
}

/// Residue → reference-atom confidence map for `text`.
#[must_use]
pub fn parse_confidence(text: &str) -> ConfidenceMap {
    parse_structure(text).confidence
}

/// AlphaFold's pLDDT interpretation bands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    /// pLDDT < 50; often disordered.
    VeryLow,
    /// 50 ≤ pLDDT < 70.
    Low,
    /// 70 ≤ pLDDT < 90.
    Confident,
    /// pLDDT ≥ 90.
    VeryHigh,
}

impl ConfidenceBand {
    /// Classify a confidence score.
    #[must_use]
    pub fn classify(score: f64) -> Self {
        if score >= 90.0 {
            Self::VeryHigh
        } else if score >= 70.0 {
            Self::Confident
        } else if score >= 50.0 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "very low",
            Self::Low => "low",
            Self::Confident => "confident",
            Self::VeryHigh => "very high",
        }
    }
}
