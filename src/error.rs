//! Crate-level error types.

use std::fmt;

/// Errors produced by the foldshift crate.
///
/// The parser, displacement calculator and color mapper are total and never
/// produce these; they come from configuration, I/O, the orchestrator's
/// input boundary and the remote services.
#[derive(Debug)]
pub enum FoldshiftError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A color ramp definition is empty or its stops are not increasing.
    InvalidRamp(String),
    /// Caller violated a precondition of the render orchestrator.
    InvalidInput(String),
    /// Mutation notation could not be parsed or does not match a sequence.
    Mutation(String),
    /// Sequence exceeds the folding service's residue limit.
    SequenceTooLong {
        /// Residues in the submitted sequence.
        len: usize,
        /// Maximum residues the service accepts.
        limit: usize,
    },
    /// Remote structure or folding service failure.
    Service(String),
}

impl fmt::Display for FoldshiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::InvalidRamp(msg) => write!(f, "invalid color ramp: {msg}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Mutation(msg) => write!(f, "mutation error: {msg}"),
            Self::SequenceTooLong { len, limit } => write!(
                f,
                "sequence has {len} residues, folding limit is {limit}"
            ),
            Self::Service(msg) => write!(f, "service error: {msg}"),
        }
    }
}

impl std::error::Error for FoldshiftError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FoldshiftError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
