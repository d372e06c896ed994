//! Numeric summaries of a comparison, as consumed by report writers and
//! explanation generators.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::displacement::{neighborhood, DisplacementMap};
use crate::structure::{ConfidenceBand, ConfidenceMap, ResidueCoordinateMap};

/// Aggregate figures over a [`DisplacementMap`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplacementSummary {
    /// Residues present in both structures.
    pub compared_residues: usize,
    /// Mean displacement over compared residues (Å).
    pub mean: Option<f64>,
    /// Most displaced residue and its displacement (Å).
    pub max: Option<ResidueValue>,
    /// Displacement of the highlighted residue itself (Å).
    pub at_site: Option<f64>,
    /// Mean displacement over residues within `neighborhood_radius` of the
    /// site in the wild-type structure (Å).
    pub local_mean: Option<f64>,
    /// Radius used for `local_mean` (Å).
    pub neighborhood_radius: f64,
}

/// A residue number paired with a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidueValue {
    /// Residue number.
    pub residue: i32,
    /// Value at that residue.
    pub value: f64,
}

impl DisplacementSummary {
    /// Summarize `displacement` around `site`.
    #[must_use]
    pub fn new(
        displacement: &DisplacementMap,
        wild: &ResidueCoordinateMap,
        site: i32,
        neighborhood_radius: f64,
    ) -> Self {
        let local: Vec<f64> = neighborhood(wild, site, neighborhood_radius)
            .into_iter()
            .filter_map(|r| displacement.value(r))
            .collect();
        let local_mean = (!local.is_empty())
            .then(|| local.iter().sum::<f64>() / local.len() as f64);

        Self {
            compared_residues: displacement.len(),
            mean: displacement.mean(),
            max: displacement
                .max_entry()
                .map(|(residue, value)| ResidueValue { residue, value }),
            at_site: displacement.value(site),
            local_mean,
            neighborhood_radius,
        }
    }
}

/// Everything known about one mutation comparison, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Mutation label, e.g. `"TP53 R175H"`.
    pub mutation: String,
    /// Highlighted residue number.
    pub residue: i32,
    /// Residues with a reference atom in the wild-type structure.
    pub wild_type_residues: usize,
    /// Wild-type confidence at the site.
    pub site_confidence: Option<f64>,
    /// Band of `site_confidence`.
    pub site_band: Option<ConfidenceBand>,
    /// Mean wild-type confidence over all residues.
    pub mean_confidence: Option<f64>,
    /// Displacement figures; absent in single-structure comparisons.
    pub displacement: Option<DisplacementSummary>,
}

impl ComparisonReport {
    /// Assemble a report from already-parsed inputs.
    #[must_use]
    pub fn new(
        mutation: impl Into<String>,
        residue: i32,
        wild: &ResidueCoordinateMap,
        confidence: &ConfidenceMap,
        displacement: Option<DisplacementSummary>,
    ) -> Self {
        let site_confidence = confidence.value(residue);
        Self {
            mutation: mutation.into(),
            residue,
            wild_type_residues: wild.len(),
            site_confidence,
            site_band: site_confidence.map(ConfidenceBand::classify),
            mean_confidence: confidence.mean(),
            displacement,
        }
    }

    /// One-paragraph plain-text rendering of the figures.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = format!(
            "{} at residue {} ({} residues modeled)",
            self.mutation, self.residue, self.wild_type_residues
        );
        let _ = match (self.site_confidence, self.site_band) {
            (Some(score), Some(band)) => {
                write!(text, "; site pLDDT {score:.1} ({})", band.label())
            }
            _ => write!(text, "; no confidence at site"),
        };
        if let Some(d) = &self.displacement {
            if let Some(at_site) = d.at_site {
                let _ = write!(text, "; site shift {at_site:.2} Å");
            }
            if let Some(local) = d.local_mean {
                let _ = write!(
                    text,
                    "; mean shift within {:.0} Å {local:.2} Å",
                    d.neighborhood_radius
                );
            }
            if let Some(max) = d.max {
                let _ = write!(
                    text,
                    "; largest shift {:.2} Å at residue {}",
                    max.value, max.residue
                );
            }
        }
        text
    }
}
