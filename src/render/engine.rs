//! The viewer-engine seam.
//!
//! A viewer engine is the molecular graphics component that owns a drawing
//! surface and rasterizes a model into it. The orchestrator only ever talks
//! to it through [`ViewerEngine`], so the same lifecycle drives a browser
//! engine binding, a native renderer or the
//! [`HeadlessEngine`](super::headless::HeadlessEngine).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use super::surface::PaneId;
use crate::color::{AtomColorFn, Rgb};

/// Opaque handle to one viewer instance created by an engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct ViewerHandle(pub u64);

/// Residue selection for styling, labeling and framing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Every atom of the model.
    All,
    /// Atoms of one residue.
    Residue(i32),
    /// Atoms of any listed residue.
    Residues(Vec<i32>),
}

impl Selection {
    /// Whether an atom of `residue` is selected.
    #[must_use]
    pub fn matches(&self, residue: i32) -> bool {
        match self {
            Self::All => true,
            Self::Residue(r) => *r == residue,
            Self::Residues(rs) => rs.contains(&residue),
        }
    }
}

/// How a style colors the atoms it applies to.
#[derive(Clone)]
pub enum ColorSpec {
    /// One color for every selected atom.
    Solid(Rgb),
    /// Evaluated per atom as `(residue, atom_index) -> color`.
    PerAtom(AtomColorFn),
}

impl ColorSpec {
    /// Color of one atom.
    #[must_use]
    pub fn resolve(&self, residue: i32, atom_index: usize) -> Rgb {
        match self {
            Self::Solid(color) => *color,
            Self::PerAtom(f) => f(residue, atom_index),
        }
    }
}

impl fmt::Debug for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(color) => f.debug_tuple("Solid").field(color).finish(),
            Self::PerAtom(_) => f.write_str("PerAtom(..)"),
        }
    }
}

/// Representation applied to a selection.
#[derive(Debug, Clone)]
pub enum Style {
    /// Secondary-structure cartoon.
    Cartoon {
        /// Cartoon coloring.
        color: ColorSpec,
    },
    /// Bonds drawn as sticks.
    Stick {
        /// Stick coloring.
        color: ColorSpec,
        /// Stick radius in Ångström.
        radius: f32,
    },
    /// Atoms drawn as spheres.
    Sphere {
        /// Sphere coloring.
        color: ColorSpec,
        /// Sphere radius in Ångström.
        radius: f32,
    },
}

impl Style {
    /// The style's coloring.
    #[must_use]
    pub fn color(&self) -> &ColorSpec {
        match self {
            Self::Cartoon { color }
            | Self::Stick { color, .. }
            | Self::Sphere { color, .. } => color,
        }
    }
}

/// A molecular graphics engine hosting any number of viewer instances.
///
/// Calls for one viewer follow a fixed order: [`add_model`] before any
/// styling, styling before [`zoom_to`], and [`destroy_viewer`] last.
/// Instances are never shared between rendering cycles.
///
/// [`add_model`]: ViewerEngine::add_model
/// [`zoom_to`]: ViewerEngine::zoom_to
/// [`destroy_viewer`]: ViewerEngine::destroy_viewer
pub trait ViewerEngine {
    /// Create a viewer drawing into `pane`.
    fn create_viewer(&mut self, pane: PaneId) -> ViewerHandle;

    /// Load PDB-format structure text as the viewer's model.
    fn add_model(&mut self, viewer: ViewerHandle, structure: &str);

    /// Replace any style on `selection` with `style`.
    fn set_style(
        &mut self,
        viewer: ViewerHandle,
        selection: &Selection,
        style: &Style,
    );

    /// Layer `style` on top of existing styles for `selection`.
    fn add_style(
        &mut self,
        viewer: ViewerHandle,
        selection: &Selection,
        style: &Style,
    );

    /// Attach a text label to `selection`.
    fn add_label(
        &mut self,
        viewer: ViewerHandle,
        selection: &Selection,
        text: &str,
    );

    /// Frame the camera on `selection`, then scale by `zoom` (< 1 zooms
    /// out).
    fn zoom_to(&mut self, viewer: ViewerHandle, selection: &Selection, zoom: f64);

    /// Draw the current scene.
    fn render(&mut self, viewer: ViewerHandle);

    /// Release the viewer and everything it holds.
    fn destroy_viewer(&mut self, viewer: ViewerHandle);
}

/// Engine shared between the asset loader and rendering cycles.
pub type SharedEngine = Rc<RefCell<dyn ViewerEngine>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_matching() {
        assert!(Selection::All.matches(-4));
        assert!(Selection::Residue(175).matches(175));
        assert!(!Selection::Residue(175).matches(176));
        let many = Selection::Residues(vec![1, 5, 9]);
        assert!(many.matches(5));
        assert!(!many.matches(6));
    }

    #[test]
    fn color_spec_resolution() {
        let solid = ColorSpec::Solid([0.1, 0.2, 0.3]);
        assert_eq!(solid.resolve(1, 0), [0.1, 0.2, 0.3]);

        let per_atom = ColorSpec::PerAtom(Rc::new(|residue: i32, atom: usize| {
            [residue as f32, atom as f32, 0.0]
        }));
        assert_eq!(per_atom.resolve(3, 7), [3.0, 7.0, 0.0]);
        assert_eq!(format!("{per_atom:?}"), "PerAtom(..)");
    }
}
