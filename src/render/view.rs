//! The comparison view orchestrator.

use std::rc::Rc;

use web_time::Duration;

use super::asset::{AssetCompletion, AssetStatus, EngineAsset};
use super::cycle::{Cycle, CyclePlan, CycleState, ViewPlan};
use super::engine::{ColorSpec, Style, ViewerHandle};
use super::surface::{PaneId, PaneSlot, SharedSurface};
use crate::color::{atom_color_fn, ColorRamp, Rgb};
use crate::compare::compute_displacement;
use crate::error::FoldshiftError;
use crate::mutation::AminoAcid;
use crate::options::{MarkerStyle, Options, ViewOptions};
use crate::structure::parse_structure;

/// Routine that starts fetching the viewer engine and eventually resolves
/// or fails the completion it is given.
pub type EngineFetch = Rc<dyn Fn(AssetCompletion)>;

/// Single view of the wild type, or wild type and mutant side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonMode {
    /// Wild type only, colored by confidence.
    Single,
    /// Wild type by confidence (left), mutant by displacement (right).
    Dual,
}

/// One snapshot of the orchestrator's inputs. Any change starts a new
/// rendering cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonInput {
    /// Wild-type structure text.
    pub wild_type: Rc<str>,
    /// Mutant structure text; `None` selects [`ComparisonMode::Single`].
    pub mutant: Option<Rc<str>>,
    /// Highlighted residue number.
    pub residue: i32,
    /// Wild-type amino acid at `residue`.
    pub original: AminoAcid,
    /// Substituted amino acid at `residue`.
    pub substituted: AminoAcid,
}

impl ComparisonInput {
    /// Input for a wild-type-only view.
    #[must_use]
    pub fn single(
        wild_type: impl Into<Rc<str>>,
        residue: i32,
        original: AminoAcid,
        substituted: AminoAcid,
    ) -> Self {
        Self {
            wild_type: wild_type.into(),
            mutant: None,
            residue,
            original,
            substituted,
        }
    }

    /// Input for a side-by-side comparison.
    #[must_use]
    pub fn dual(
        wild_type: impl Into<Rc<str>>,
        mutant: impl Into<Rc<str>>,
        residue: i32,
        original: AminoAcid,
        substituted: AminoAcid,
    ) -> Self {
        Self {
            wild_type: wild_type.into(),
            mutant: Some(mutant.into()),
            residue,
            original,
            substituted,
        }
    }

    /// Mode selected by the presence of mutant text.
    #[must_use]
    pub fn mode(&self) -> ComparisonMode {
        if self.mutant.is_some() {
            ComparisonMode::Dual
        } else {
            ComparisonMode::Single
        }
    }

    fn validate(&self) -> Result<(), FoldshiftError> {
        if self.wild_type.trim().is_empty() {
            return Err(FoldshiftError::InvalidInput(
                "wild-type structure text is empty".to_owned(),
            ));
        }
        if self.mutant.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(FoldshiftError::InvalidInput(
                "comparison requested with empty mutant structure text"
                    .to_owned(),
            ));
        }
        Ok(())
    }
}

/// Drives a mount point through rendering cycles.
///
/// Each [`update`](Self::update) with changed input tears the current cycle
/// down (viewers destroyed, panes detached) and starts a new one, which
/// waits on the session's [`EngineAsset`] before building anything. A
/// cycle superseded while waiting is cancelled and never builds. Dropping
/// the view tears down the live cycle.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use foldshift::mutation::AminoAcid;
/// use foldshift::options::Options;
/// use foldshift::render::{
///     AssetCompletion, ComparisonInput, ComparisonView, CycleState,
///     EngineAsset, HeadlessEngine, HeadlessSurface,
/// };
///
/// let engine = Rc::new(RefCell::new(HeadlessEngine::new()));
/// let surface = Rc::new(RefCell::new(HeadlessSurface::new()));
/// let mut view = ComparisonView::new(
///     surface.clone(),
///     EngineAsset::ready(engine.clone()),
///     Rc::new(|_: AssetCompletion| {}),
///     &Options::default(),
/// )?;
///
/// let pdb = "ATOM      1  CA  ARG A 175      11.104   6.134  -6.504  1.00 91.50           C\n";
/// view.update(ComparisonInput::single(pdb, 175, AminoAcid::Arg, AminoAcid::His))?;
/// assert_eq!(view.state(), CycleState::Displayed);
/// assert_eq!(engine.borrow().live_viewers(), 1);
/// # Ok::<(), foldshift::FoldshiftError>(())
/// ```
pub struct ComparisonView {
    surface: SharedSurface,
    asset: EngineAsset,
    fetch: EngineFetch,
    confidence_ramp: ColorRamp,
    displacement_ramp: ColorRamp,
    marker_color: Rgb,
    view: ViewOptions,
    stall_timeout: Duration,
    input: Option<ComparisonInput>,
    cycle: Option<Cycle>,
    cycles_started: u64,
}

impl ComparisonView {
    /// Create an idle view over `surface`.
    ///
    /// # Errors
    ///
    /// Returns [`FoldshiftError::InvalidRamp`] if a configured ramp is
    /// invalid, or [`FoldshiftError::InvalidInput`] for a non-positive zoom
    /// factor, marker radius or stall timeout, or a stall timeout too large
    /// to represent.
    pub fn new(
        surface: SharedSurface,
        asset: EngineAsset,
        fetch: EngineFetch,
        options: &Options,
    ) -> Result<Self, FoldshiftError> {
        let view = options.view.clone();
        for (name, value) in [
            ("zoom_factor", view.zoom_factor),
            ("marker_radius", f64::from(view.marker_radius)),
            ("stall_timeout_secs", view.stall_timeout_secs),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(FoldshiftError::InvalidInput(format!(
                    "view.{name} must be a positive number, got {value}"
                )));
            }
        }
        let stall_timeout = Duration::try_from_secs_f64(view.stall_timeout_secs)
            .map_err(|e| {
                FoldshiftError::InvalidInput(format!(
                    "view.stall_timeout_secs = {}: {e}",
                    view.stall_timeout_secs
                ))
            })?;
        Ok(Self {
            surface,
            asset,
            fetch,
            confidence_ramp: options.colors.confidence_ramp()?,
            displacement_ramp: options.colors.displacement_ramp()?,
            marker_color: options.colors.marker,
            view,
            stall_timeout,
            input: None,
            cycle: None,
            cycles_started: 0,
        })
    }

    /// Show `input`, restarting the rendering cycle if it differs from the
    /// current input. Returns whether a new cycle was started.
    ///
    /// The new cycle builds immediately when the engine is ready and
    /// otherwise once the asset loads. An asset that never loads leaves the
    /// view in [`CycleState::Loading`]; see [`is_stalled`](Self::is_stalled).
    ///
    /// # Errors
    ///
    /// Returns [`FoldshiftError::InvalidInput`] for empty structure text.
    /// The current cycle is left untouched in that case.
    pub fn update(
        &mut self,
        input: ComparisonInput,
    ) -> Result<bool, FoldshiftError> {
        input.validate()?;
        if self.input.as_ref() == Some(&input) {
            return Ok(false);
        }
        self.teardown();

        let plan = self.plan(&input);
        self.cycles_started += 1;
        let cycle = Cycle::new(self.cycles_started);
        log::debug!(
            "cycle {}: {:?} view of residue {} ({} views)",
            cycle.id,
            input.mode(),
            input.residue,
            plan.views.len()
        );
        let on_ready = cycle.on_engine_ready(Rc::clone(&self.surface), plan);
        cycle.set_waiter(self.asset.when_ready(on_ready));
        self.input = Some(input);
        self.cycle = Some(cycle);

        let _ = self.asset.request(&*self.fetch);
        Ok(true)
    }

    /// Tear down the live cycle, leaving the mount point empty and the view
    /// [`Idle`](CycleState::Idle).
    pub fn teardown(&mut self) {
        self.input = None;
        if let Some(cycle) = self.cycle.take() {
            cycle.teardown(&self.surface, &self.asset);
        }
    }

    /// State of the live cycle.
    #[must_use]
    pub fn state(&self) -> CycleState {
        self.cycle.as_ref().map_or(CycleState::Idle, Cycle::state)
    }

    /// Identifier of the live cycle; increases with every restart.
    #[must_use]
    pub fn cycle_id(&self) -> Option<u64> {
        self.cycle.as_ref().map(|c| c.id)
    }

    /// Input of the live cycle.
    #[must_use]
    pub fn input(&self) -> Option<&ComparisonInput> {
        self.input.as_ref()
    }

    /// Viewers owned by the live cycle.
    #[must_use]
    pub fn viewers(&self) -> Vec<ViewerHandle> {
        self.cycle.as_ref().map(Cycle::viewers).unwrap_or_default()
    }

    /// Panes owned by the live cycle.
    #[must_use]
    pub fn panes(&self) -> Vec<PaneId> {
        self.cycle.as_ref().map(Cycle::panes).unwrap_or_default()
    }

    /// Whether the live cycle is stuck loading: the engine asset failed, or
    /// the cycle has waited longer than `view.stall_timeout_secs`.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        let Some(cycle) = &self.cycle else {
            return false;
        };
        if cycle.state() != CycleState::Loading {
            return false;
        }
        let stalled = self.asset.status() == AssetStatus::Failed
            || cycle.started().elapsed() >= self.stall_timeout;
        if stalled && cycle.report_stall() {
            log::warn!(
                "cycle {}: viewer engine still unavailable ({})",
                cycle.id,
                self.asset
                    .failure()
                    .unwrap_or_else(|| "load pending".to_owned())
            );
        }
        stalled
    }

    fn plan(&self, input: &ComparisonInput) -> CyclePlan {
        let wild = parse_structure(&input.wild_type);
        let site = input.residue;
        let wild_label =
            self.view.show_labels.then(|| residue_label(input.original, site));

        let mut views = Vec::with_capacity(2);
        let (wild_slot, wild_title) = match input.mode() {
            ComparisonMode::Single => (PaneSlot::Full, "Wild type"),
            ComparisonMode::Dual => (PaneSlot::Left, "Wild type (confidence)"),
        };
        views.push(ViewPlan {
            slot: wild_slot,
            title: wild_title.to_owned(),
            structure: Rc::clone(&input.wild_type),
            color: atom_color_fn(
                Rc::new(wild.confidence),
                self.confidence_ramp.clone(),
            ),
            label: wild_label,
        });

        if let Some(mutant_text) = &input.mutant {
            let mutant = parse_structure(mutant_text);
            let displacement =
                compute_displacement(&wild.coordinates, &mutant.coordinates);
            views.push(ViewPlan {
                slot: PaneSlot::Right,
                title: format!(
                    "{}{site}{} (displacement)",
                    input.original, input.substituted
                ),
                structure: Rc::clone(mutant_text),
                color: atom_color_fn(
                    Rc::new(displacement),
                    self.displacement_ramp.clone(),
                ),
                label: self
                    .view
                    .show_labels
                    .then(|| residue_label(input.substituted, site)),
            });
        }

        let color = ColorSpec::Solid(self.marker_color);
        let radius = self.view.marker_radius;
        let marker = match self.view.marker {
            MarkerStyle::Stick => Style::Stick { color, radius },
            MarkerStyle::Sphere => Style::Sphere { color, radius },
        };
        CyclePlan {
            views,
            site,
            marker,
            zoom: self.view.zoom_factor,
        }
    }
}

/// `Arg175`-style residue label.
fn residue_label(amino_acid: AminoAcid, site: i32) -> String {
    let mut name = amino_acid.three_letter().to_ascii_lowercase();
    name[..1].make_ascii_uppercase();
    format!("{name}{site}")
}

impl Drop for ComparisonView {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use glam::DVec3;

    use super::*;
    use crate::render::engine::SharedEngine;
    use crate::render::headless::{HeadlessEngine, HeadlessSurface};
    use crate::structure::fixtures::backbone_pdb;

    struct Harness {
        engine: Rc<RefCell<HeadlessEngine>>,
        surface: Rc<RefCell<HeadlessSurface>>,
        asset: EngineAsset,
        pending: Rc<RefCell<Option<AssetCompletion>>>,
        fetches: Rc<Cell<usize>>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                engine: Rc::new(RefCell::new(HeadlessEngine::new())),
                surface: Rc::new(RefCell::new(HeadlessSurface::new())),
                asset: EngineAsset::new(),
                pending: Rc::default(),
                fetches: Rc::default(),
            }
        }

        fn view(&self) -> ComparisonView {
            self.view_with(&Options::default())
        }

        fn view_with(&self, options: &Options) -> ComparisonView {
            let pending = Rc::clone(&self.pending);
            let fetches = Rc::clone(&self.fetches);
            let fetch: EngineFetch = Rc::new(move |completion: AssetCompletion| {
                fetches.set(fetches.get() + 1);
                *pending.borrow_mut() = Some(completion);
            });
            let surface: SharedSurface = self.surface.clone();
            ComparisonView::new(surface, self.asset.clone(), fetch, options)
                .unwrap()
        }

        fn load_engine(&self) {
            let engine: SharedEngine = self.engine.clone();
            self.pending.take().unwrap().resolve(engine);
        }
    }

    fn wild_type() -> String {
        backbone_pdb(&[
            (1, DVec3::new(0.0, 0.0, 0.0), 90.0),
            (2, DVec3::new(3.8, 0.0, 0.0), 80.0),
            (3, DVec3::new(7.6, 0.0, 0.0), 55.0),
        ])
    }

    fn mutant() -> String {
        backbone_pdb(&[
            (1, DVec3::new(0.0, 0.0, 0.0), 88.0),
            (2, DVec3::new(3.8, 0.0, 0.0), 79.0),
            (3, DVec3::new(7.6, 0.0, 6.0), 41.0),
        ])
    }

    fn single(residue: i32) -> ComparisonInput {
        ComparisonInput::single(wild_type(), residue, AminoAcid::Ala, AminoAcid::Val)
    }

    fn dual(residue: i32) -> ComparisonInput {
        ComparisonInput::dual(
            wild_type(),
            mutant(),
            residue,
            AminoAcid::Ala,
            AminoAcid::Val,
        )
    }

    #[test]
    fn superseded_input_never_builds() {
        let h = Harness::new();
        let mut view = h.view();

        assert!(view.update(single(2)).unwrap());
        assert!(view.update(single(3)).unwrap());
        assert_eq!(view.state(), CycleState::Loading);
        assert_eq!(h.engine.borrow().created(), 0);
        assert!(h.surface.borrow().live_panes().is_empty());

        h.load_engine();
        let engine = h.engine.borrow();
        assert_eq!(engine.created(), 1);
        assert_eq!(engine.live_viewers(), 1);
        assert_eq!(h.surface.borrow().live_panes().len(), 1);
        assert_eq!(view.state(), CycleState::Displayed);
        assert_eq!(view.cycle_id(), Some(2));

        let scene = engine.scene(view.viewers()[0]).unwrap();
        assert_eq!(scene.marked_residues(), vec![3]);
        assert_eq!(h.fetches.get(), 1);
    }

    #[test]
    fn ready_engine_builds_immediately_in_order() {
        let h = Harness::new();
        let mut view = h.view();
        assert!(view.update(single(2)).unwrap());
        h.load_engine();

        let engine = h.engine.borrow();
        assert!(engine.violations().is_empty());
        let scene = engine.scene(view.viewers()[0]).unwrap();
        assert_eq!(scene.renders, 1);
        assert_eq!(scene.labels[0].text, "Ala2");
        let camera = scene.camera.unwrap();
        assert_eq!(camera.zoom, 0.8);
        assert!((camera.center[0] - 3.8).abs() < 1.0);
        assert_eq!(
            scene.residue_color(1),
            Some(ColorRamp::confidence().color_for(90.0))
        );
        assert_eq!(
            scene.residue_color(3),
            Some(ColorRamp::confidence().color_for(55.0))
        );
        assert_eq!(h.surface.borrow().live_panes()[0].slot, PaneSlot::Full);
    }

    #[test]
    fn dual_mode_colors_by_displacement() {
        let h = Harness::new();
        let mut view = h.view();
        assert!(view.update(dual(3)).unwrap());
        h.load_engine();

        let surface = h.surface.borrow();
        let slots: Vec<_> = surface.live_panes().iter().map(|p| p.slot).collect();
        assert_eq!(slots, vec![PaneSlot::Left, PaneSlot::Right]);
        assert_eq!(surface.live_panes()[1].title, "A3V (displacement)");

        let engine = h.engine.borrow();
        let viewers = view.viewers();
        let left = engine.scene(viewers[0]).unwrap();
        let right = engine.scene(viewers[1]).unwrap();
        let displacement = ColorRamp::displacement();
        assert_eq!(right.residue_color(1), Some(displacement.color_for(0.0)));
        assert_eq!(right.residue_color(3), Some(displacement.color_for(6.0)));
        assert_eq!(
            left.residue_color(3),
            Some(ColorRamp::confidence().color_for(55.0))
        );
        assert_eq!(left.marked_residues(), right.marked_residues());
        assert_eq!(right.labels[0].text, "Val3");
    }

    #[test]
    fn unchanged_input_keeps_cycle() {
        let h = Harness::new();
        let mut view = h.view();
        assert!(view.update(single(2)).unwrap());
        h.load_engine();
        assert!(!view.update(single(2)).unwrap());
        assert_eq!(view.cycle_id(), Some(1));
        assert_eq!(h.engine.borrow().created(), 1);
    }

    #[test]
    fn input_changes_release_previous_cycle() {
        let h = Harness::new();
        let mut view = h.view();
        assert!(view.update(single(1)).unwrap());
        h.load_engine();

        for input in [single(2), dual(2), dual(3), single(3)] {
            assert!(view.update(input).unwrap());
            assert_eq!(view.state(), CycleState::Displayed);
        }

        let engine = h.engine.borrow();
        let surface = h.surface.borrow();
        assert_eq!(engine.created(), 7);
        assert_eq!(engine.live_viewers(), 1);
        assert_eq!(engine.destroyed(), 6);
        assert_eq!(engine.stray_calls(), 0);
        assert_eq!(surface.live_panes().len(), 1);
        assert_eq!(surface.stray_detaches(), 0);
    }

    #[test]
    fn failed_engine_stays_loading_and_stalls() {
        let h = Harness::new();
        let mut view = h.view();
        assert!(view.update(dual(2)).unwrap());
        h.pending.take().unwrap().fail("engine bundle unreachable");

        assert_eq!(view.state(), CycleState::Loading);
        assert!(view.is_stalled());
        assert!(view.update(single(2)).unwrap());
        assert_eq!(view.state(), CycleState::Loading);
        assert!(view.is_stalled());
        assert_eq!(h.fetches.get(), 1);
        assert_eq!(h.engine.borrow().created(), 0);
        assert!(h.surface.borrow().live_panes().is_empty());
    }

    #[test]
    fn pending_load_is_not_stalled_before_timeout() {
        let h = Harness::new();
        let mut view = h.view();
        assert!(!view.is_stalled());
        assert!(view.update(single(2)).unwrap());
        assert!(!view.is_stalled());
    }

    #[test]
    fn invalid_input_keeps_current_display() {
        let h = Harness::new();
        let mut view = h.view();
        assert!(view.update(single(2)).unwrap());
        h.load_engine();

        let empty_mutant = ComparisonInput::dual(
            wild_type(),
            "  \n",
            2,
            AminoAcid::Ala,
            AminoAcid::Val,
        );
        assert!(matches!(
            view.update(empty_mutant),
            Err(FoldshiftError::InvalidInput(_))
        ));
        let empty_wild =
            ComparisonInput::single("", 2, AminoAcid::Ala, AminoAcid::Val);
        assert!(view.update(empty_wild).is_err());
        assert_eq!(view.state(), CycleState::Displayed);
        assert_eq!(h.engine.borrow().live_viewers(), 1);
    }

    #[test]
    fn rejects_bad_view_options() {
        let h = Harness::new();
        let mut options = Options::default();
        options.view.zoom_factor = 0.0;
        let surface: SharedSurface = h.surface.clone();
        let result =
            ComparisonView::new(
            surface,
            h.asset.clone(),
            Rc::new(|_: AssetCompletion| {}),
            &options,
        );
        assert!(matches!(result, Err(FoldshiftError::InvalidInput(_))));
    }

    #[test]
    fn rejects_unrepresentable_stall_timeout() {
        let h = Harness::new();
        let mut options = Options::default();
        options.view.stall_timeout_secs = 1e30;
        let surface: SharedSurface = h.surface.clone();
        let result = ComparisonView::new(
            surface,
            h.asset.clone(),
            Rc::new(|_: AssetCompletion| {}),
            &options,
        );
        assert!(matches!(result, Err(FoldshiftError::InvalidInput(_))));

        options.view.stall_timeout_secs = 300.0;
        let mut view = h.view_with(&options);
        assert!(view.update(single(2)).unwrap());
        assert!(!view.is_stalled());
    }

    #[test]
    fn superseded_cycles_release_their_plans() {
        let h = Harness::new();
        let mut view = h.view();
        let text: Rc<str> = Rc::from(wild_type());

        for residue in 1..=100 {
            let input = ComparisonInput::single(
                Rc::clone(&text),
                residue,
                AminoAcid::Ala,
                AminoAcid::Val,
            );
            assert!(view.update(input).unwrap());
            assert_eq!(h.asset.pending_waiters(), 1);
        }
        assert_eq!(view.state(), CycleState::Loading);

        view.teardown();
        assert_eq!(h.asset.pending_waiters(), 0);
        assert_eq!(Rc::strong_count(&text), 1);

        assert!(view.update(single(3)).unwrap());
        h.load_engine();
        assert_eq!(view.state(), CycleState::Displayed);
        assert_eq!(h.engine.borrow().created(), 1);
    }

    #[test]
    fn views_share_one_engine_load() {
        let h = Harness::new();
        let mut first = h.view();
        let mut second = h.view();
        assert!(first.update(single(1)).unwrap());
        assert!(second.update(dual(3)).unwrap());
        h.load_engine();

        assert_eq!(h.fetches.get(), 1);
        assert_eq!(first.state(), CycleState::Displayed);
        assert_eq!(second.state(), CycleState::Displayed);
        assert_eq!(h.engine.borrow().live_viewers(), 3);
        assert_eq!(h.surface.borrow().live_panes().len(), 3);
    }

    #[test]
    fn drop_and_teardown_release_everything() {
        let h = Harness::new();
        let mut view = h.view();
        assert!(view.update(dual(2)).unwrap());
        h.load_engine();
        view.teardown();
        assert_eq!(view.state(), CycleState::Idle);
        assert!(view.viewers().is_empty());
        assert_eq!(h.engine.borrow().live_viewers(), 0);

        assert!(view.update(single(2)).unwrap());
        drop(view);
        assert_eq!(h.engine.borrow().live_viewers(), 0);
        assert!(h.surface.borrow().live_panes().is_empty());
    }

    #[test]
    fn sphere_marker_and_hidden_labels() {
        let h = Harness::new();
        let mut options = Options::default();
        options.view.marker = MarkerStyle::Sphere;
        options.view.show_labels = false;
        options.colors.marker = [0.0, 1.0, 0.0];
        let mut view = h.view_with(&options);
        assert!(view.update(single(2)).unwrap());
        h.load_engine();

        let engine = h.engine.borrow();
        let scene = engine.scene(view.viewers()[0]).unwrap();
        assert!(scene.labels.is_empty());
        assert!(scene
            .atoms
            .iter()
            .filter(|a| a.residue == 2)
            .all(|a| a.marker == Some([0.0, 1.0, 0.0])));
    }
}
