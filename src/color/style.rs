//! Per-atom color callbacks for viewer engines.
//!
//! Engines style atoms one at a time through a callback. The callbacks built
//! here capture a precomputed residue table and a ramp and only look values
//! up, so styling never recomputes displacement or re-parses structure text.

use std::rc::Rc;

use super::ramp::{ColorRamp, Rgb};
use crate::structure::ResidueMap;

/// Per-atom color lookup: `(residue, atom_index) -> color`.
pub type AtomColorFn = Rc<dyn Fn(i32, usize) -> Rgb>;

/// Color every atom by its residue's value in `values`.
///
/// Residues absent from `values` (e.g. no displacement because the other
/// structure lacks them) are colored as value `0`, the ramp's
/// lowest-severity end for the built-in ramps. The atom index is accepted
/// so the callback matches engine signatures; all atoms of a residue share
/// its color.
#[must_use]
pub fn style_function_for(
    values: Rc<ResidueMap<f64>>,
    ramp: ColorRamp,
) -> impl Fn(i32, usize) -> Rgb {
    move |residue, _atom| ramp.color_for(values.value(residue).unwrap_or(0.0))
}

/// [`style_function_for`] boxed as an [`AtomColorFn`].
#[must_use]
pub fn atom_color_fn(values: Rc<ResidueMap<f64>>, ramp: ColorRamp) -> AtomColorFn {
    Rc::new(style_function_for(values, ramp))
}
