//! Wild-type versus mutant structure comparison.
//!
//! [`compute_displacement`] pairs reference atoms by residue number and
//! measures how far each moved; [`DisplacementSummary`] and
//! [`ComparisonReport`] condense the result around the mutation site.

mod displacement;
mod summary;

pub use displacement::{compute_displacement, neighborhood, DisplacementMap};
pub use summary::{ComparisonReport, DisplacementSummary, ResidueValue};
