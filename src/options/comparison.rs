use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Comparison", inline)]
#[serde(default)]
/// Displacement summary parameters.
pub struct ComparisonOptions {
    /// Radius around the mutation site for the local displacement mean (Å).
    #[schemars(title = "Neighborhood Radius", range(min = 2.0, max = 30.0), extend("step" = 0.5))]
    pub neighborhood_radius: f64,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            neighborhood_radius: 8.0,
        }
    }
}
