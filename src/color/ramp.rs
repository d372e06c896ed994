//! Value-keyed piecewise-linear color ramps.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FoldshiftError;

/// Linear RGB in `[0, 1]`.
pub type Rgb = [f32; 3];

/// A breakpoint of a [`ColorRamp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColorStop {
    /// Input value at which `color` is reached exactly.
    pub value: f64,
    /// RGB color at `value`.
    pub color: Rgb,
}

impl ColorStop {
    /// Stop at `value` with `color`.
    #[must_use]
    pub const fn new(value: f64, color: Rgb) -> Self {
        Self { value, color }
    }
}

/// Ordered color stops with linear interpolation between neighbours and
/// clamping outside the first and last stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl ColorRamp {
    /// Build a ramp from stops ordered by strictly increasing value.
    ///
    /// # Errors
    ///
    /// Returns [`FoldshiftError::InvalidRamp`] if `stops` is empty, contains
    /// a non-finite value, or is not strictly increasing.
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, FoldshiftError> {
        if stops.is_empty() {
            return Err(FoldshiftError::InvalidRamp("no stops".to_owned()));
        }
        if let Some(stop) = stops.iter().find(|s| !s.value.is_finite()) {
            return Err(FoldshiftError::InvalidRamp(format!(
                "non-finite stop value {}",
                stop.value
            )));
        }
        if let Some(pair) = stops.windows(2).find(|w| w[1].value <= w[0].value)
        {
            return Err(FoldshiftError::InvalidRamp(format!(
                "stop {} does not follow {}",
                pair[1].value, pair[0].value
            )));
        }
        Ok(Self { stops })
    }

    /// Stops in ascending value order.
    #[must_use]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color for `value`. NaN maps to the first stop.
    #[must_use]
    pub fn color_for(&self, value: f64) -> Rgb {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last())
        else {
            return [0.5, 0.5, 0.5];
        };
        if value.is_nan() || value <= first.value {
            return first.color;
        }
        if value >= last.value {
            return last.color;
        }

        // First stop strictly above `value`; the clamps above guarantee one
        // exists at index >= 1.
        let upper = self.stops.partition_point(|s| s.value <= value);
        let a = &self.stops[upper - 1];
        let b = &self.stops[upper];
        let frac = ((value - a.value) / (b.value - a.value)) as f32;
        [
            a.color[0] + (b.color[0] - a.color[0]) * frac,
            a.color[1] + (b.color[1] - a.color[1]) * frac,
            a.color[2] + (b.color[2] - a.color[2]) * frac,
        ]
    }

    /// Confidence (pLDDT) ramp: red at 50 through orange, yellow and green
    /// to teal at 100.
    #[must_use]
    pub fn confidence() -> Self {
        Self {
            stops: CONFIDENCE_STOPS.to_vec(),
        }
    }

    /// Displacement ramp: white at 0 Å, yellow at 2 Å, red from 5 Å.
    #[must_use]
    pub fn displacement() -> Self {
        Self {
            stops: DISPLACEMENT_STOPS.to_vec(),
        }
    }
}

/// Yellow reached at 2 Å of displacement.
pub const DISPLACEMENT_YELLOW: Rgb = [1.0, 0.9, 0.1];
/// Saturated red from 5 Å of displacement.
pub const DISPLACEMENT_RED: Rgb = [0.9, 0.15, 0.1];

pub(crate) const CONFIDENCE_STOPS: [ColorStop; 5] = [
    ColorStop::new(50.0, [0.85, 0.15, 0.10]),
    ColorStop::new(62.5, [0.95, 0.50, 0.15]),
    ColorStop::new(75.0, [0.75, 0.70, 0.25]),
    ColorStop::new(87.5, [0.40, 0.75, 0.40]),
    ColorStop::new(100.0, [0.10, 0.80, 0.60]),
];

pub(crate) const DISPLACEMENT_STOPS: [ColorStop; 3] = [
    ColorStop::new(0.0, [1.0, 1.0, 1.0]),
    ColorStop::new(2.0, DISPLACEMENT_YELLOW),
    ColorStop::new(5.0, DISPLACEMENT_RED),
];

/// `#rrggbb` encoding, the form string-styled viewer engines accept.
#[must_use]
pub fn to_hex(color: Rgb) -> String {
    let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("#{r:02x}{g:02x}{b:02x}")
}
