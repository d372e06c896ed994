use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Representation layered on the highlighted residue.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    /// Sticks for the residue's atoms.
    #[default]
    Stick,
    /// Spheres for the residue's atoms.
    Sphere,
}

/// Viewer presentation and loading parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "View", inline)]
#[serde(default)]
pub struct ViewOptions {
    /// Zoom factor applied after framing the highlighted residue
    /// (< 1 zooms out).
    #[schemars(title = "Zoom Factor", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub zoom_factor: f64,
    /// Marker representation for the highlighted residue.
    #[schemars(title = "Marker")]
    pub marker: MarkerStyle,
    /// Stick or sphere radius of the marker in Ångström.
    #[schemars(title = "Marker Radius", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub marker_radius: f32,
    /// Label the highlighted residue with its amino acid and number.
    #[schemars(title = "Show Labels")]
    pub show_labels: bool,
    /// Seconds an engine load may stay pending before it is reported as
    /// stalled.
    #[schemars(title = "Stall Timeout", range(min = 1.0, max = 300.0))]
    pub stall_timeout_secs: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            zoom_factor: 0.8,
            marker: MarkerStyle::Stick,
            marker_radius: 0.3,
            show_labels: true,
            stall_timeout_secs: 15.0,
        }
    }
}
