//! Fixed-column reading of legacy PDB `ATOM` records.
//!
//! Column ranges below are 0-based half-open byte ranges of the 1-based
//! columns in the PDB format description (e.g. `ATOM_NAME` = columns 13–16).

use glam::DVec3;

const RECORD_TAG: &str = "ATOM";
const ATOM_NAME: std::ops::Range<usize> = 12..16;
const RESIDUE_NAME: std::ops::Range<usize> = 17..20;
const CHAIN_ID: std::ops::Range<usize> = 21..22;
const RESIDUE_SEQ: std::ops::Range<usize> = 22..26;
const X: std::ops::Range<usize> = 30..38;
const Y: std::ops::Range<usize> = 38..46;
const Z: std::ops::Range<usize> = 46..54;
/// Temperature-factor column, which AlphaFold and ESMFold reuse for pLDDT.
const CONFIDENCE: std::ops::Range<usize> = 60..66;

/// One coordinate record borrowed from a structure text line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtomRecord<'a> {
    /// Trimmed atom name (e.g. `"CA"`).
    pub name: &'a str,
    /// Trimmed three-letter residue name (may be empty on sparse files).
    pub residue_name: &'a str,
    /// Chain identifier, `' '` when blank or absent.
    pub chain: char,
    /// Residue sequence number exactly as written in the file.
    pub residue: i32,
    /// Cartesian position in Ångström.
    pub position: DVec3,
    /// Per-atom confidence (pLDDT) from columns 61–66, if parsable.
    pub confidence: Option<f64>,
}

impl<'a> AtomRecord<'a> {
    /// Parse one line. Returns `None` for non-`ATOM` lines and for records
    /// whose residue number or any coordinate is not a number.
    #[must_use]
    pub fn from_line(line: &'a str) -> Option<Self> {
        if !line.starts_with(RECORD_TAG) {
            return None;
        }
        // Columns 5-6 must be blank so e.g. "ATOMIC" lines are not read.
        if line.get(4..6).is_some_and(|rest| !rest.trim().is_empty()) {
            return None;
        }

        let residue = field(line, RESIDUE_SEQ)?.parse::<i32>().ok()?;
        let position = DVec3::new(
            parse_f64(line, X)?,
            parse_f64(line, Y)?,
            parse_f64(line, Z)?,
        );

        Some(Self {
            name: field(line, ATOM_NAME).unwrap_or(""),
            residue_name: field(line, RESIDUE_NAME).unwrap_or(""),
            chain: field(line, CHAIN_ID)
                .and_then(|c| c.chars().next())
                .unwrap_or(' '),
            residue,
            position,
            confidence: parse_f64(line, CONFIDENCE),
        })
    }
}

/// Trimmed column slice. Lines shorter than the range end yield whatever
/// part of the range is present, so truncated trailing fields still read.
fn field(line: &str, range: std::ops::Range<usize>) -> Option<&str> {
    let end = range.end.min(line.len());
    let text = line.get(range.start..end)?.trim();
    (!text.is_empty()).then_some(text)
}

fn parse_f64(line: &str, range: std::ops::Range<usize>) -> Option<f64> {
    field(line, range)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CA_LINE: &str = "ATOM      2  CA  MET A   1     -12.482   9.245   1.337  1.00 87.50           C";

    #[test]
    fn reads_all_columns() {
        let rec = AtomRecord::from_line(CA_LINE).unwrap();
        assert_eq!(rec.name, "CA");
        assert_eq!(rec.residue_name, "MET");
        assert_eq!(rec.chain, 'A');
        assert_eq!(rec.residue, 1);
        assert_eq!(rec.position, DVec3::new(-12.482, 9.245, 1.337));
        assert_eq!(rec.confidence, Some(87.5));
    }

    #[test]
    fn ignores_non_atom_records() {
        assert!(AtomRecord::from_line("HEADER    PLASMA PROTEIN").is_none());
        assert!(AtomRecord::from_line("TER    1234      ALA A 100").is_none());
        assert!(AtomRecord::from_line("").is_none());
        let het = CA_LINE.replacen("ATOM  ", "HETATM", 1);
        assert!(AtomRecord::from_line(&het).is_none());
    }

    #[test]
    fn bad_coordinate_drops_record() {
        let broken = CA_LINE.replace("  9.245", "   n/a ");
        assert!(AtomRecord::from_line(&broken).is_none());
    }

    #[test]
    fn bad_residue_number_drops_record() {
        let broken = CA_LINE.replace("A   1 ", "A   ? ");
        assert!(AtomRecord::from_line(&broken).is_none());
    }

    #[test]
    fn missing_confidence_is_none() {
        let short = &CA_LINE[..54];
        let rec = AtomRecord::from_line(short).unwrap();
        assert_eq!(rec.confidence, None);
        assert_eq!(rec.residue, 1);
    }

    #[test]
    fn truncated_coordinates_drop_record() {
        assert!(AtomRecord::from_line(&CA_LINE[..40]).is_none());
    }
}
