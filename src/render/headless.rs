//! In-process viewer engine and mount surface.
//!
//! [`HeadlessEngine`] keeps each viewer's scene as plain data: the atoms of
//! its model with the colors the styles resolved to, labels, and the camera
//! framing. Per-atom color callbacks are evaluated when a style is applied,
//! the same point at which a graphics engine would evaluate them. Calls that
//! break the engine's ordering contract are recorded as violations instead
//! of failing, so callers can assert on them.

use glam::DVec3;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::engine::{Selection, Style, ViewerEngine, ViewerHandle};
use super::surface::{MountSurface, PaneId, PaneSlot};
use crate::color::Rgb;
use crate::structure::{parse_atoms, REFERENCE_ATOM};

/// Vertical field of view used for framing, in degrees.
const FOVY_DEGREES: f64 = 45.0;
/// Extra distance so the framed atoms sit comfortably inside the view.
const FRAMING_PADDING: f64 = 1.5;

/// One atom of a headless scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneAtom {
    /// Residue number.
    pub residue: i32,
    /// Atom name.
    pub name: String,
    /// Position in Ångström.
    pub position: [f64; 3],
    /// Base (cartoon) color, once styled.
    pub color: Option<Rgb>,
    /// Layered marker color, if a stick/sphere style covers the atom.
    pub marker: Option<Rgb>,
}

/// A text label anchored at the centroid of its selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneLabel {
    /// Label text.
    pub text: String,
    /// Anchor position, `None` when the selection matched no atom.
    pub anchor: Option<[f64; 3]>,
}

/// Camera placement computed by [`ViewerEngine::zoom_to`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraFrame {
    /// Look-at point (centroid of the framed atoms).
    pub center: [f64; 3],
    /// Bounding-sphere radius of the framed atoms.
    pub radius: f64,
    /// Zoom factor applied after fitting.
    pub zoom: f64,
    /// Eye distance from `center`.
    pub distance: f64,
}

impl CameraFrame {
    /// Fit a camera to `positions`, then scale by `zoom`.
    fn fit(positions: &[DVec3], zoom: f64) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let centroid =
            positions.iter().copied().sum::<DVec3>() / positions.len() as f64;
        let radius = positions
            .iter()
            .map(|p| p.distance(centroid))
            .fold(0.0_f64, f64::max);
        let fit_distance =
            radius.max(1.0) / (FOVY_DEGREES.to_radians() / 2.0).tan();
        let zoom = if zoom > 0.0 { zoom } else { 1.0 };
        Some(Self {
            center: centroid.to_array(),
            radius,
            zoom,
            distance: fit_distance * FRAMING_PADDING / zoom,
        })
    }
}

/// Scene state of one headless viewer.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerScene {
    /// Pane the viewer draws into.
    pub pane: PaneId,
    /// Whether a model has been loaded.
    pub has_model: bool,
    /// Atoms of the loaded model(s), in file order.
    pub atoms: Vec<SceneAtom>,
    /// Labels in the order they were added.
    pub labels: Vec<SceneLabel>,
    /// Last camera framing.
    pub camera: Option<CameraFrame>,
    /// Number of render calls.
    pub renders: usize,
    /// Ordering-contract violations observed on this viewer.
    pub violations: Vec<String>,
    #[serde(skip)]
    styled: bool,
}

impl ViewerScene {
    fn new(pane: PaneId) -> Self {
        Self {
            pane,
            has_model: false,
            atoms: Vec::new(),
            labels: Vec::new(),
            camera: None,
            renders: 0,
            violations: Vec::new(),
            styled: false,
        }
    }

    /// Base color of the reference atom of `residue`, falling back to any
    /// atom of that residue.
    #[must_use]
    pub fn residue_color(&self, residue: i32) -> Option<Rgb> {
        let mut atoms = self.atoms.iter().filter(|a| a.residue == residue);
        let first = atoms.clone().next()?;
        atoms
            .find(|a| a.name == REFERENCE_ATOM)
            .unwrap_or(first)
            .color
    }

    /// Residues carrying a marker, ascending and deduplicated.
    #[must_use]
    pub fn marked_residues(&self) -> Vec<i32> {
        let mut residues: Vec<i32> = self
            .atoms
            .iter()
            .filter(|a| a.marker.is_some())
            .map(|a| a.residue)
            .collect();
        residues.sort_unstable();
        residues.dedup();
        residues
    }

    fn require_model(&mut self, call: &str) -> bool {
        if !self.has_model {
            self.violations.push(format!("{call} before model load"));
        }
        self.has_model
    }

    fn selected_positions(&self, selection: &Selection) -> Vec<DVec3> {
        self.atoms
            .iter()
            .filter(|a| selection.matches(a.residue))
            .map(|a| DVec3::from_array(a.position))
            .collect()
    }
}

/// Viewer engine that records scenes instead of drawing them.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    next_handle: u64,
    viewers: FxHashMap<ViewerHandle, ViewerScene>,
    created: usize,
    destroyed: usize,
    stray_calls: usize,
}

impl HeadlessEngine {
    /// An engine with no viewers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewers created and not yet destroyed.
    #[must_use]
    pub fn live_viewers(&self) -> usize {
        self.viewers.len()
    }

    /// Viewers ever created.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created
    }

    /// Viewers destroyed.
    #[must_use]
    pub fn destroyed(&self) -> usize {
        self.destroyed
    }

    /// Calls addressed to unknown or already destroyed viewers.
    #[must_use]
    pub fn stray_calls(&self) -> usize {
        self.stray_calls
    }

    /// Scene of a live viewer.
    #[must_use]
    pub fn scene(&self, viewer: ViewerHandle) -> Option<&ViewerScene> {
        self.viewers.get(&viewer)
    }

    /// Live scenes ordered by handle.
    #[must_use]
    pub fn scenes(&self) -> Vec<(ViewerHandle, &ViewerScene)> {
        let mut scenes: Vec<_> =
            self.viewers.iter().map(|(h, s)| (*h, s)).collect();
        scenes.sort_by_key(|(h, _)| *h);
        scenes
    }

    /// The scene drawn into `pane`, if a live viewer targets it.
    #[must_use]
    pub fn scene_in_pane(&self, pane: PaneId) -> Option<&ViewerScene> {
        self.viewers.values().find(|s| s.pane == pane)
    }

    /// Every violation across live viewers, prefixed with the handle.
    #[must_use]
    pub fn violations(&self) -> Vec<String> {
        self.scenes()
            .into_iter()
            .flat_map(|(h, s)| {
                s.violations.iter().map(move |v| format!("viewer {}: {v}", h.0))
            })
            .collect()
    }

    /// Live scenes as JSON, ordered by handle.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        let viewers: Vec<serde_json::Value> = self
            .scenes()
            .into_iter()
            .map(|(h, s)| {
                serde_json::json!({
                    "viewer": h,
                    "scene": s,
                })
            })
            .collect();
        serde_json::Value::Array(viewers)
    }

    fn scene_mut(&mut self, viewer: ViewerHandle) -> Option<&mut ViewerScene> {
        let scene = self.viewers.get_mut(&viewer);
        if scene.is_none() {
            self.stray_calls += 1;
            log::warn!("headless engine: call on unknown viewer {}", viewer.0);
        }
        scene
    }
}

impl ViewerEngine for HeadlessEngine {
    fn create_viewer(&mut self, pane: PaneId) -> ViewerHandle {
        self.next_handle += 1;
        let handle = ViewerHandle(self.next_handle);
        let _ = self.viewers.insert(handle, ViewerScene::new(pane));
        self.created += 1;
        log::debug!("headless viewer {} created in pane {}", handle.0, pane.0);
        handle
    }

    fn add_model(&mut self, viewer: ViewerHandle, structure: &str) {
        let Some(scene) = self.scene_mut(viewer) else {
            return;
        };
        scene.atoms.extend(parse_atoms(structure).map(|a| SceneAtom {
            residue: a.residue,
            name: a.name.to_owned(),
            position: a.position.to_array(),
            color: None,
            marker: None,
        }));
        scene.has_model = true;
    }

    fn set_style(
        &mut self,
        viewer: ViewerHandle,
        selection: &Selection,
        style: &Style,
    ) {
        let Some(scene) = self.scene_mut(viewer) else {
            return;
        };
        if !scene.require_model("set_style") {
            return;
        }
        for (index, atom) in scene.atoms.iter_mut().enumerate() {
            if selection.matches(atom.residue) {
                let color = style.color().resolve(atom.residue, index);
                match style {
                    Style::Cartoon { .. } => {
                        atom.color = Some(color);
                        atom.marker = None;
                    }
                    Style::Stick { .. } | Style::Sphere { .. } => {
                        atom.color = None;
                        atom.marker = Some(color);
                    }
                }
            }
        }
        scene.styled = true;
    }

    fn add_style(
        &mut self,
        viewer: ViewerHandle,
        selection: &Selection,
        style: &Style,
    ) {
        let Some(scene) = self.scene_mut(viewer) else {
            return;
        };
        if !scene.require_model("add_style") {
            return;
        }
        for (index, atom) in scene.atoms.iter_mut().enumerate() {
            if selection.matches(atom.residue) {
                let color = style.color().resolve(atom.residue, index);
                match style {
                    Style::Cartoon { .. } => atom.color = Some(color),
                    Style::Stick { .. } | Style::Sphere { .. } => {
                        atom.marker = Some(color);
                    }
                }
            }
        }
        scene.styled = true;
    }

    fn add_label(
        &mut self,
        viewer: ViewerHandle,
        selection: &Selection,
        text: &str,
    ) {
        let Some(scene) = self.scene_mut(viewer) else {
            return;
        };
        let positions = scene.selected_positions(selection);
        let anchor = (!positions.is_empty()).then(|| {
            (positions.iter().copied().sum::<DVec3>() / positions.len() as f64)
                .to_array()
        });
        scene.labels.push(SceneLabel {
            text: text.to_owned(),
            anchor,
        });
    }

    fn zoom_to(
        &mut self,
        viewer: ViewerHandle,
        selection: &Selection,
        zoom: f64,
    ) {
        let Some(scene) = self.scene_mut(viewer) else {
            return;
        };
        if !scene.require_model("zoom_to") {
            return;
        }
        if !scene.styled {
            scene
                .violations
                .push("zoom_to before any style was applied".to_owned());
        }
        let mut positions = scene.selected_positions(selection);
        if positions.is_empty() {
            positions = scene.selected_positions(&Selection::All);
        }
        scene.camera = CameraFrame::fit(&positions, zoom);
    }

    fn render(&mut self, viewer: ViewerHandle) {
        let Some(scene) = self.scene_mut(viewer) else {
            return;
        };
        if scene.require_model("render") {
            scene.renders += 1;
        }
    }

    fn destroy_viewer(&mut self, viewer: ViewerHandle) {
        if self.viewers.remove(&viewer).is_some() {
            self.destroyed += 1;
            log::debug!("headless viewer {} destroyed", viewer.0);
        } else {
            self.stray_calls += 1;
            log::warn!("headless engine: destroy of unknown viewer {}", viewer.0);
        }
    }
}

/// A pane attached to a [`HeadlessSurface`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaneRecord {
    /// Pane identifier.
    pub id: PaneId,
    /// Placement.
    pub slot: PaneSlot,
    /// Caption.
    pub title: String,
}

/// Mount surface that keeps its panes in a list.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    next_id: u64,
    panes: Vec<PaneRecord>,
    attached: usize,
    stray_detaches: usize,
}

impl HeadlessSurface {
    /// An empty mount point.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently attached panes in attachment order.
    #[must_use]
    pub fn live_panes(&self) -> &[PaneRecord] {
        &self.panes
    }

    /// Panes ever attached.
    #[must_use]
    pub fn attached_total(&self) -> usize {
        self.attached
    }

    /// Detach calls for panes that were not attached.
    #[must_use]
    pub fn stray_detaches(&self) -> usize {
        self.stray_detaches
    }
}

impl MountSurface for HeadlessSurface {
    fn attach_pane(&mut self, slot: PaneSlot, title: &str) -> PaneId {
        self.next_id += 1;
        let id = PaneId(self.next_id);
        self.panes.push(PaneRecord {
            id,
            slot,
            title: title.to_owned(),
        });
        self.attached += 1;
        id
    }

    fn detach_pane(&mut self, pane: PaneId) {
        let before = self.panes.len();
        self.panes.retain(|p| p.id != pane);
        if self.panes.len() == before {
            self.stray_detaches += 1;
        }
    }
}
