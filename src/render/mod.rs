//! Render orchestration.
//!
//! [`ComparisonView`] turns one or two structure texts and a highlighted
//! residue into live viewers inside a host-owned mount point:
//!
//! - single mode: one view colored by confidence;
//! - dual mode: wild type by confidence on the left, mutant by displacement
//!   on the right.
//!
//! The highlighted residue gets a marker layered over the cartoon, a label
//! and the camera framing. Every input change restarts the rendering cycle
//! `Idle → Loading → Initialized → Displayed`, releasing the previous
//! cycle's viewers and panes first.
//!
//! The viewer engine is reached only through [`ViewerEngine`] and is loaded
//! once per session through [`EngineAsset`]. [`HeadlessEngine`] and
//! [`HeadlessSurface`] implement the collaborator traits in-process.

mod asset;
mod cycle;
mod engine;
mod headless;
mod surface;
mod view;

pub use asset::{AssetCompletion, AssetStatus, EngineAsset, WaiterToken};
pub use cycle::CycleState;
pub use engine::{
    ColorSpec, Selection, SharedEngine, Style, ViewerEngine, ViewerHandle,
};
pub use headless::{
    CameraFrame, HeadlessEngine, HeadlessSurface, PaneRecord, SceneAtom,
    SceneLabel, ViewerScene,
};
pub use surface::{MountSurface, PaneId, PaneSlot, SharedSurface};
pub use view::{ComparisonInput, ComparisonMode, ComparisonView, EngineFetch};
