//! Centralized comparison/view options with TOML preset support.
//!
//! Color ramps, viewer presentation, comparison parameters and service
//! endpoints are consolidated here. Options serialize to/from TOML so a
//! partial file (e.g. only overriding `[view]`) layers over the defaults.

mod colors;
mod comparison;
mod services;
mod view;

use std::path::Path;

pub use colors::ColorOptions;
pub use comparison::ComparisonOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use services::ServiceOptions;
pub use view::{MarkerStyle, ViewOptions};

use crate::error::FoldshiftError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Color ramps and marker color.
    pub colors: ColorOptions,
    /// Viewer presentation and loading parameters.
    pub view: ViewOptions,
    /// Displacement summary parameters.
    pub comparison: ComparisonOptions,
    /// Remote service endpoints.
    #[schemars(skip)]
    pub services: ServiceOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FoldshiftError::Io`] if the file cannot be read or
    /// [`FoldshiftError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, FoldshiftError> {
        let content =
            std::fs::read_to_string(path).map_err(FoldshiftError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FoldshiftError::OptionsParse`] on invalid TOML or field
    /// types.
    pub fn from_toml(content: &str) -> Result<Self, FoldshiftError> {
        toml::from_str(content)
            .map_err(|e| FoldshiftError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`FoldshiftError::OptionsParse`] if serialization fails or
    /// [`FoldshiftError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), FoldshiftError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FoldshiftError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(FoldshiftError::Io)?;
        }
        std::fs::write(path, content).map_err(FoldshiftError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorRamp;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[view]
zoom_factor = 0.6
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.view.zoom_factor, 0.6);
        // Everything else should be default
        assert!(opts.view.show_labels);
        assert_eq!(opts.comparison.neighborhood_radius, 8.0);
        assert_eq!(opts.services.max_fold_length, 400);
    }

    #[test]
    fn default_ramps_match_builtins() {
        let colors = ColorOptions::default();
        assert_eq!(colors.confidence_ramp().unwrap(), ColorRamp::confidence());
        assert_eq!(
            colors.displacement_ramp().unwrap(),
            ColorRamp::displacement()
        );
    }

    #[test]
    fn custom_ramp_from_toml() {
        let toml_str = r"
[colors]
displacement_ramp = [
    { value = 0.0, color = [0.0, 0.0, 1.0] },
    { value = 3.0, color = [1.0, 0.0, 0.0] },
]
";
        let opts = Options::from_toml(toml_str).unwrap();
        let ramp = opts.colors.displacement_ramp().unwrap();
        assert_eq!(ramp.color_for(10.0), [1.0, 0.0, 0.0]);
        assert_eq!(ramp.color_for(1.5), [0.5, 0.0, 0.5]);
    }

    #[test]
    fn unordered_ramp_rejected() {
        let toml_str = r"
[colors]
confidence_ramp = [
    { value = 90.0, color = [0.0, 0.0, 1.0] },
    { value = 50.0, color = [1.0, 0.0, 0.0] },
]
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert!(matches!(
            opts.colors.confidence_ramp(),
            Err(FoldshiftError::InvalidRamp(_))
        ));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(matches!(
            Options::from_toml("[view\nzoom_factor = "),
            Err(FoldshiftError::OptionsParse(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir()
            .join(format!("foldshift-options-{}", std::process::id()));
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.view.marker = MarkerStyle::Sphere;
        opts.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), opts);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("colors"));
        assert!(props.contains_key("view"));
        assert!(props.contains_key("comparison"));
        // Endpoints are not user-facing
        assert!(!props.contains_key("services"));

        let view = &props["view"]["properties"];
        assert!(view.get("zoom_factor").is_some());
        assert!(view.get("stall_timeout_secs").is_some());
    }
}
