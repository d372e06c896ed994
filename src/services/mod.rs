//! Structure retrieval and folding collaborators.
//!
//! [`StructureSource`] fetches a predicted structure by UniProt accession
//! (AlphaFold DB); [`FoldingService`] predicts one from a sequence
//! (ESMFold). Both return PDB text with pLDDT in the B-factor column, ready
//! for [`crate::structure::parse_structure`].
//!
//! The HTTP clients live behind the `fetch` feature. Input validation is
//! always available so callers can reject bad input before any request.

#[cfg(feature = "fetch")]
mod http;

#[cfg(feature = "fetch")]
pub use http::{AlphaFoldClient, EsmFoldClient};

use crate::error::FoldshiftError;
use crate::mutation::AminoAcid;

/// Source of predicted structures keyed by accession.
pub trait StructureSource {
    /// PDB text of the model for `accession`.
    ///
    /// # Errors
    ///
    /// Returns [`FoldshiftError::InvalidInput`] for a malformed accession and
    /// [`FoldshiftError::Service`] when the model cannot be retrieved.
    fn fetch_structure(&self, accession: &str) -> Result<String, FoldshiftError>;
}

/// Single-sequence structure predictor.
pub trait FoldingService {
    /// Longest sequence the service accepts.
    fn max_length(&self) -> usize;

    /// PDB text of the predicted fold of `sequence` (one-letter codes).
    ///
    /// # Errors
    ///
    /// Returns [`FoldshiftError::SequenceTooLong`] before contacting the
    /// service when `sequence` exceeds [`max_length`](Self::max_length),
    /// and [`FoldshiftError::Service`] when prediction fails.
    fn fold(&self, sequence: &str) -> Result<String, FoldshiftError>;
}

/// Normalize and check a UniProt accession (6 or 10 alphanumerics).
///
/// # Errors
///
/// Returns [`FoldshiftError::InvalidInput`] for anything else.
pub fn normalize_accession(accession: &str) -> Result<String, FoldshiftError> {
    let accession = accession.trim().to_ascii_uppercase();
    let valid_len = matches!(accession.len(), 6 | 10);
    if !valid_len || !accession.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FoldshiftError::InvalidInput(format!(
            "'{accession}' is not a UniProt accession"
        )));
    }
    Ok(accession)
}

/// Expand `{accession}` in an AlphaFold DB URL template.
#[must_use]
pub fn alphafold_url(template: &str, accession: &str) -> String {
    template.replace("{accession}", accession)
}

/// Read a protein sequence from plain or FASTA text.
///
/// Header (`>`) and comment (`;`) lines are skipped, whitespace is removed
/// and letters are upper-cased.
///
/// # Errors
///
/// Returns [`FoldshiftError::InvalidInput`] for an empty sequence or a
/// character that is not a standard amino-acid code.
pub fn clean_sequence(text: &str) -> Result<String, FoldshiftError> {
    let sequence: String = text
        .lines()
        .filter(|line| !line.starts_with('>') && !line.starts_with(';'))
        .flat_map(str::chars)
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if sequence.is_empty() {
        return Err(FoldshiftError::InvalidInput(
            "sequence is empty".to_owned(),
        ));
    }
    if let Some((index, c)) = sequence
        .char_indices()
        .find(|&(_, c)| AminoAcid::from_code(c).is_none())
    {
        return Err(FoldshiftError::InvalidInput(format!(
            "'{c}' at position {} is not an amino-acid code",
            index + 1
        )));
    }
    Ok(sequence)
}

/// Reject sequences longer than `limit`.
///
/// # Errors
///
/// Returns [`FoldshiftError::SequenceTooLong`].
pub fn check_length(sequence: &str, limit: usize) -> Result<(), FoldshiftError> {
    let len = sequence.chars().count();
    if len > limit {
        return Err(FoldshiftError::SequenceTooLong { len, limit });
    }
    Ok(())
}

/// Whether `text` holds at least one coordinate record.
#[cfg_attr(not(feature = "fetch"), allow(dead_code))]
pub(crate) fn has_coordinates(text: &str) -> bool {
    crate::structure::parse_atoms(text).next().is_some()
}
