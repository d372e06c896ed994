//! Missense mutation notation.
//!
//! Accepts the forms users type into a lookup box: `"TP53 R175H"`,
//! `"R175H"`, `"p.R175H"` and `"p.Arg175His"`. The gene symbol is optional
//! and kept verbatim; residue positions are 1-based sequence positions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FoldshiftError;

/// One of the twenty standard amino acids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum AminoAcid {
    /// Alanine.
    Ala,
    /// Arginine.
    Arg,
    /// Asparagine.
    Asn,
    /// Aspartate.
    Asp,
    /// Cysteine.
    Cys,
    /// Glutamine.
    Gln,
    /// Glutamate.
    Glu,
    /// Glycine.
    Gly,
    /// Histidine.
    His,
    /// Isoleucine.
    Ile,
    /// Leucine.
    Leu,
    /// Lysine.
    Lys,
    /// Methionine.
    Met,
    /// Phenylalanine.
    Phe,
    /// Proline.
    Pro,
    /// Serine.
    Ser,
    /// Threonine.
    Thr,
    /// Tryptophan.
    Trp,
    /// Tyrosine.
    Tyr,
    /// Valine.
    Val,
}

const TABLE: [(AminoAcid, char, &str); 20] = [
    (AminoAcid::Ala, 'A', "ALA"),
    (AminoAcid::Arg, 'R', "ARG"),
    (AminoAcid::Asn, 'N', "ASN"),
    (AminoAcid::Asp, 'D', "ASP"),
    (AminoAcid::Cys, 'C', "CYS"),
    (AminoAcid::Gln, 'Q', "GLN"),
    (AminoAcid::Glu, 'E', "GLU"),
    (AminoAcid::Gly, 'G', "GLY"),
    (AminoAcid::His, 'H', "HIS"),
    (AminoAcid::Ile, 'I', "ILE"),
    (AminoAcid::Leu, 'L', "LEU"),
    (AminoAcid::Lys, 'K', "LYS"),
    (AminoAcid::Met, 'M', "MET"),
    (AminoAcid::Phe, 'F', "PHE"),
    (AminoAcid::Pro, 'P', "PRO"),
    (AminoAcid::Ser, 'S', "SER"),
    (AminoAcid::Thr, 'T', "THR"),
    (AminoAcid::Trp, 'W', "TRP"),
    (AminoAcid::Tyr, 'Y', "TYR"),
    (AminoAcid::Val, 'V', "VAL"),
];

impl AminoAcid {
    /// Look up by one-letter code (case-insensitive).
    #[must_use]
    pub fn from_code(code: char) -> Option<Self> {
        let code = code.to_ascii_uppercase();
        TABLE.iter().find(|(_, c, _)| *c == code).map(|(aa, _, _)| *aa)
    }

    /// Look up by three-letter code (case-insensitive).
    #[must_use]
    pub fn from_three_letter(name: &str) -> Option<Self> {
        TABLE
            .iter()
            .find(|(_, _, n)| n.eq_ignore_ascii_case(name))
            .map(|(aa, _, _)| *aa)
    }

    /// One-letter code.
    #[must_use]
    pub fn code(self) -> char {
        TABLE
            .iter()
            .find(|(aa, _, _)| *aa == self)
            .map_or('X', |(_, c, _)| *c)
    }

    /// Upper-case three-letter code as written in PDB files.
    #[must_use]
    pub fn three_letter(self) -> &'static str {
        TABLE
            .iter()
            .find(|(aa, _, _)| *aa == self)
            .map_or("UNK", |(_, _, n)| n)
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single amino-acid substitution, optionally qualified by gene symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// Gene symbol as typed, e.g. `"TP53"`.
    pub gene: Option<String>,
    /// Wild-type residue.
    pub original: AminoAcid,
    /// 1-based sequence position.
    pub position: u32,
    /// Substituted residue.
    pub substituted: AminoAcid,
}

impl Mutation {
    /// Mutation label without gene, e.g. `"R175H"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{}{}", self.original, self.position, self.substituted)
    }

    /// Residue position as a structure-file residue number.
    #[must_use]
    pub fn residue(&self) -> i32 {
        i32::try_from(self.position).unwrap_or(i32::MAX)
    }

    /// Apply the substitution to a one-letter `sequence`.
    ///
    /// # Errors
    ///
    /// Returns [`FoldshiftError::Mutation`] when the position is outside the
    /// sequence or the sequence has a different residue there.
    pub fn apply(&self, sequence: &str) -> Result<String, FoldshiftError> {
        let index = self.position as usize;
        let found = index
            .checked_sub(1)
            .and_then(|i| sequence.chars().nth(i))
            .ok_or_else(|| {
                FoldshiftError::Mutation(format!(
                    "position {} outside sequence of length {}",
                    self.position,
                    sequence.chars().count()
                ))
            })?;
        if found.to_ascii_uppercase() != self.original.code() {
            return Err(FoldshiftError::Mutation(format!(
                "sequence has {found} at position {}, expected {}",
                self.position, self.original
            )));
        }
        Ok(sequence
            .chars()
            .enumerate()
            .map(|(i, c)| {
                if i + 1 == index {
                    self.substituted.code()
                } else {
                    c
                }
            })
            .collect())
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.gene {
            Some(gene) => write!(f, "{gene} {}", self.label()),
            None => f.write_str(&self.label()),
        }
    }
}

impl FromStr for Mutation {
    type Err = FoldshiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let (gene, change) = match (words.next(), words.next(), words.next()) {
            (Some(change), None, None) => (None, change),
            (Some(gene), Some(change), None) => (Some(gene.to_owned()), change),
            _ => {
                return Err(FoldshiftError::Mutation(format!(
                    "expected \"GENE X123Y\" or \"X123Y\", got {s:?}"
                )))
            }
        };
        let change = change.strip_prefix("p.").unwrap_or(change);
        let (original, position, substituted) = split_change(change)
            .ok_or_else(|| {
                FoldshiftError::Mutation(format!(
                    "unrecognized substitution {change:?}"
                ))
            })?;
        if position == 0 {
            return Err(FoldshiftError::Mutation(
                "residue positions start at 1".to_owned(),
            ));
        }
        Ok(Self {
            gene,
            original,
            position,
            substituted,
        })
    }
}

/// Split `R175H` / `Arg175His` into its parts.
fn split_change(change: &str) -> Option<(AminoAcid, u32, AminoAcid)> {
    let digits_start = change.find(|c: char| c.is_ascii_digit())?;
    let digits_len = change[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(change.len() - digits_start);
    let (head, rest) = change.split_at(digits_start);
    let (digits, tail) = rest.split_at(digits_len);
    let position = digits.parse().ok()?;
    Some((residue_code(head)?, position, residue_code(tail)?))
}

fn residue_code(text: &str) -> Option<AminoAcid> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => AminoAcid::from_code(c),
        _ if text.len() == 3 => AminoAcid::from_three_letter(text),
        _ => None,
    }
}
