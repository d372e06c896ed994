//! One rendering cycle: the viewers and panes built for a single input
//! snapshot, and the cancellation flag that keeps a superseded cycle from
//! touching the mount point.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::Instant;

use super::asset::{EngineAsset, WaiterToken};
use super::engine::{
    ColorSpec, Selection, SharedEngine, Style, ViewerHandle,
};
use super::surface::{PaneId, PaneSlot, SharedSurface};
use crate::color::AtomColorFn;

/// Progress of a rendering cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CycleState {
    /// No input; nothing attached.
    Idle,
    /// Waiting for the viewer engine asset.
    Loading,
    /// Viewers created, models loaded, styled and framed.
    Initialized,
    /// Viewers drawn.
    Displayed,
}

/// What one viewer of a cycle shows.
pub(crate) struct ViewPlan {
    pub(crate) slot: PaneSlot,
    pub(crate) title: String,
    pub(crate) structure: Rc<str>,
    pub(crate) color: AtomColorFn,
    pub(crate) label: Option<String>,
}

/// Everything a cycle needs once the engine is available. Computed up
/// front so engine callbacks only look values up.
pub(crate) struct CyclePlan {
    pub(crate) views: Vec<ViewPlan>,
    pub(crate) site: i32,
    pub(crate) marker: Style,
    pub(crate) zoom: f64,
}

#[derive(Default)]
struct CycleResources {
    engine: Option<SharedEngine>,
    viewers: Vec<ViewerHandle>,
    panes: Vec<PaneId>,
}

pub(crate) struct Cycle {
    pub(crate) id: u64,
    started: Instant,
    cancelled: Rc<Cell<bool>>,
    state: Rc<Cell<CycleState>>,
    resources: Rc<RefCell<CycleResources>>,
    waiter: Cell<Option<WaiterToken>>,
    stall_reported: Cell<bool>,
}

impl Cycle {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id,
            started: Instant::now(),
            cancelled: Rc::new(Cell::new(false)),
            state: Rc::new(Cell::new(CycleState::Loading)),
            resources: Rc::default(),
            waiter: Cell::new(None),
            stall_reported: Cell::new(false),
        }
    }

    pub(crate) fn state(&self) -> CycleState {
        self.state.get()
    }

    pub(crate) fn started(&self) -> Instant {
        self.started
    }

    pub(crate) fn viewers(&self) -> Vec<ViewerHandle> {
        self.resources.borrow().viewers.clone()
    }

    pub(crate) fn panes(&self) -> Vec<PaneId> {
        self.resources.borrow().panes.clone()
    }

    /// Remember the asset subscription holding this cycle's plan.
    pub(crate) fn set_waiter(&self, token: Option<WaiterToken>) {
        self.waiter.set(token);
    }

    /// Returns `true` the first time it is called.
    pub(crate) fn report_stall(&self) -> bool {
        !self.stall_reported.replace(true)
    }

    /// Callback to hand to the engine asset. Builds the plan into the mount
    /// point unless the cycle was cancelled first.
    pub(crate) fn on_engine_ready(
        &self,
        surface: SharedSurface,
        plan: CyclePlan,
    ) -> impl FnOnce(&SharedEngine) + 'static {
        let id = self.id;
        let cancelled = Rc::clone(&self.cancelled);
        let state = Rc::clone(&self.state);
        let resources = Rc::clone(&self.resources);
        move |engine: &SharedEngine| {
            if cancelled.get() {
                log::debug!("cycle {id}: engine ready after cancellation, ignored");
                return;
            }
            build(engine, &surface, &plan, &mut resources.borrow_mut(), &state);
            log::debug!("cycle {id}: displayed {} view(s)", plan.views.len());
        }
    }

    /// Cancel the cycle, withdraw its pending plan from `asset` and release
    /// its viewers and panes.
    pub(crate) fn teardown(&self, surface: &SharedSurface, asset: &EngineAsset) {
        self.cancelled.set(true);
        if let Some(token) = self.waiter.take() {
            if asset.cancel(token) {
                log::debug!("cycle {}: pending plan dropped", self.id);
            }
        }
        let mut resources = self.resources.borrow_mut();
        if let Some(shared) = resources.engine.take() {
            let mut engine = shared.borrow_mut();
            for viewer in resources.viewers.drain(..) {
                engine.destroy_viewer(viewer);
            }
        }
        if !resources.panes.is_empty() {
            let mut surface = surface.borrow_mut();
            for pane in resources.panes.drain(..) {
                surface.detach_pane(pane);
            }
        }
        log::debug!(
            "cycle {}: torn down in state {:?}",
            self.id,
            self.state.get()
        );
        self.state.set(CycleState::Idle);
    }
}

/// Attach panes and drive each viewer through load, style, frame and
/// render, in that order.
fn build(
    shared: &SharedEngine,
    surface: &SharedSurface,
    plan: &CyclePlan,
    resources: &mut CycleResources,
    state: &Cell<CycleState>,
) {
    resources.engine = Some(Rc::clone(shared));
    let mut engine = shared.borrow_mut();
    let site = Selection::Residue(plan.site);

    for view in &plan.views {
        let pane = surface.borrow_mut().attach_pane(view.slot, &view.title);
        resources.panes.push(pane);
        let viewer = engine.create_viewer(pane);
        resources.viewers.push(viewer);

        engine.add_model(viewer, &view.structure);
        engine.set_style(
            viewer,
            &Selection::All,
            &Style::Cartoon {
                color: ColorSpec::PerAtom(Rc::clone(&view.color)),
            },
        );
        engine.add_style(viewer, &site, &plan.marker);
        if let Some(label) = &view.label {
            engine.add_label(viewer, &site, label);
        }
        engine.zoom_to(viewer, &site, plan.zoom);
    }
    state.set(CycleState::Initialized);

    for viewer in &resources.viewers {
        engine.render(*viewer);
    }
    state.set(CycleState::Displayed);
}
