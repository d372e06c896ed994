// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Wild-type versus mutant protein structure comparison.
//!
//! Foldshift reads predicted structures (AlphaFold DB, ESMFold), measures
//! how far each residue moved after a missense substitution, maps
//! confidence and displacement onto color ramps and drives a viewer engine
//! through the rendering cycle of a side-by-side comparison.
//!
//! # Key entry points
//!
//! - [`structure::parse`] - residue → reference-atom coordinate
//! - [`compare::compute_displacement`] - per-residue displacement
//! - [`color::ColorRamp`] - confidence and displacement ramps
//! - [`render::ComparisonView`] - the rendering-cycle orchestrator
//! - [`options::Options`] - runtime configuration (colors, view, services)
//!
//! # Architecture
//!
//! Parsing, displacement and color mapping are pure, total functions. The
//! orchestrator owns everything with a lifetime: it precomputes the
//! per-residue tables, waits on the session's [`render::EngineAsset`], and
//! builds viewers through the [`render::ViewerEngine`] trait into panes of a
//! host-owned [`render::MountSurface`]. Every input change tears the
//! previous cycle down before the next one starts.

pub mod color;
pub mod compare;
pub mod error;
pub mod mutation;
pub mod options;
pub mod render;
pub mod services;
pub mod structure;

pub use error::FoldshiftError;
