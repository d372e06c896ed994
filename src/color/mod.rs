//! Scalar → color mapping for confidence and displacement coloring.
//!
//! Two built-in ramps:
//! - **Confidence** ([`ColorRamp::confidence`]): five stops from 50 to 100
//!   pLDDT.
//! - **Displacement** ([`ColorRamp::displacement`]): white at 0 Å, yellow at
//!   2 Å, red from 5 Å.
//!
//! Values outside a ramp clamp to its end colors. [`style_function_for`]
//! turns a per-residue table into the per-atom callback viewer engines use.

mod ramp;
mod style;

pub use ramp::{
    to_hex, ColorRamp, ColorStop, Rgb, DISPLACEMENT_RED, DISPLACEMENT_YELLOW,
};
pub(crate) use ramp::{CONFIDENCE_STOPS, DISPLACEMENT_STOPS};
pub use style::{atom_color_fn, style_function_for, AtomColorFn};
