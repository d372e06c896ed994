use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::{
    ColorRamp, ColorStop, Rgb, CONFIDENCE_STOPS, DISPLACEMENT_STOPS,
};
use crate::error::FoldshiftError;

/// Color ramps and highlight colors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Colors", inline)]
#[serde(default)]
pub struct ColorOptions {
    /// RGB color of the highlighted-residue marker.
    #[schemars(title = "Marker Color")]
    pub marker: Rgb,
    /// Stops of the confidence (pLDDT) ramp, in increasing value order.
    #[schemars(title = "Confidence Ramp")]
    pub confidence_ramp: Vec<ColorStop>,
    /// Stops of the displacement (Å) ramp, in increasing value order.
    #[schemars(title = "Displacement Ramp")]
    pub displacement_ramp: Vec<ColorStop>,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            marker: [1.0, 0.0, 1.0],
            confidence_ramp: CONFIDENCE_STOPS.to_vec(),
            displacement_ramp: DISPLACEMENT_STOPS.to_vec(),
        }
    }
}

impl ColorOptions {
    /// Validated confidence ramp.
    ///
    /// # Errors
    ///
    /// Returns [`FoldshiftError::InvalidRamp`] for empty or unordered stops.
    pub fn confidence_ramp(&self) -> Result<ColorRamp, FoldshiftError> {
        ColorRamp::new(self.confidence_ramp.clone())
    }

    /// Validated displacement ramp.
    ///
    /// # Errors
    ///
    /// Returns [`FoldshiftError::InvalidRamp`] for empty or unordered stops.
    pub fn displacement_ramp(&self) -> Result<ColorRamp, FoldshiftError> {
        ColorRamp::new(self.displacement_ramp.clone())
    }
}
