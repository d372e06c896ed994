//! The UI-owned mount point viewers draw into.
//!
//! The host UI owns one stable mount point and never renders into it
//! itself. Every pane inside it is attached and detached by the
//! orchestrator alone, once per rendering cycle.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// Identifier of a pane attached to a [`MountSurface`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct PaneId(pub u64);

/// Placement of a pane inside the mount point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneSlot {
    /// The whole mount point (single-structure view).
    Full,
    /// Left half (wild-type in a side-by-side comparison).
    Left,
    /// Right half (mutant in a side-by-side comparison).
    Right,
}

/// A stable mount point that panes can be attached to and removed from.
pub trait MountSurface {
    /// Create a child pane in `slot` captioned `title`.
    fn attach_pane(&mut self, slot: PaneSlot, title: &str) -> PaneId;

    /// Remove a pane created by [`attach_pane`](Self::attach_pane).
    fn detach_pane(&mut self, pane: PaneId);
}

/// Mount point shared between the host and the orchestrator.
pub type SharedSurface = Rc<RefCell<dyn MountSurface>>;
