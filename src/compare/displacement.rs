//! Per-residue point displacement between two structures.
//!
//! No superposition is performed: both models are compared in the frames
//! they were predicted in, so values in flexible, low-confidence regions
//! partly reflect pose differences rather than local conformational change.

use glam::DVec3;

use crate::structure::{ResidueCoordinateMap, ResidueMap};

/// Residue → Euclidean distance (Å) between the two reference atoms.
pub type DisplacementMap = ResidueMap<f64>;

/// Distance between matching residues of `wild` and `mutant`.
///
/// Defined exactly on the residues present in both maps; a residue present
/// on only one side contributes nothing.
#[must_use]
pub fn compute_displacement(
    wild: &ResidueCoordinateMap,
    mutant: &ResidueCoordinateMap,
) -> DisplacementMap {
    let displacement: DisplacementMap = wild
        .iter()
        .filter_map(|(residue, a)| {
            mutant.get(residue).map(|b| (residue, a.distance(*b)))
        })
        .collect();

    log::debug!(
        "displacement over {} shared residues ({} wild-type, {} mutant)",
        displacement.len(),
        wild.len(),
        mutant.len()
    );
    displacement
}

/// Residues whose reference atom lies within `radius` Å of the reference
/// atom of `center`, including `center` itself. Empty when `center` has no
/// coordinate.
#[must_use]
pub fn neighborhood(
    coords: &ResidueCoordinateMap,
    center: i32,
    radius: f64,
) -> Vec<i32> {
    let Some(origin) = coords.value(center) else {
        return Vec::new();
    };
    coords
        .iter()
        .filter(|(_, p)| within(origin, **p, radius))
        .map(|(residue, _)| residue)
        .collect()
}

fn within(a: DVec3, b: DVec3, radius: f64) -> bool {
    a.distance_squared(b) <= radius * radius
}
