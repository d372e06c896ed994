//! Session-wide viewer engine asset.
//!
//! The engine (a script bundle in a browser, a GPU context natively) is
//! fetched at most once per session. Consumers subscribe with
//! [`EngineAsset::when_ready`]: the callback fires immediately when the
//! engine is already available and is queued otherwise. A queued callback
//! can be withdrawn with [`EngineAsset::cancel`]. A failed load is
//! terminal for the session; queued callbacks never fire and
//! [`EngineAsset::is_stalled`] reports it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use web_time::{Duration, Instant};

use super::engine::SharedEngine;

type Waiter = (WaiterToken, Box<dyn FnOnce(&SharedEngine)>);

/// Identifies a callback queued by [`EngineAsset::when_ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaiterToken(u64);

/// Load state of the engine asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    /// Nobody has asked for the engine yet.
    NotRequested,
    /// Fetch in flight.
    Loading,
    /// Engine available.
    Ready,
    /// Fetch failed; the engine will not become available this session.
    Failed,
}

enum AssetState {
    NotRequested { waiters: Vec<Waiter> },
    Loading { since: Instant, waiters: Vec<Waiter> },
    Ready(SharedEngine),
    Failed { reason: String },
}

/// Shared handle to the session's engine asset. Clones observe the same
/// state.
#[derive(Clone)]
pub struct EngineAsset {
    state: Rc<RefCell<AssetState>>,
    next_token: Rc<Cell<u64>>,
}

thread_local! {
    static SESSION: EngineAsset = EngineAsset::new();
}

impl EngineAsset {
    /// A fresh, not-yet-requested asset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(AssetState::NotRequested {
                waiters: Vec::new(),
            })),
            next_token: Rc::default(),
        }
    }

    /// The asset shared by everything on the current (UI) thread.
    #[must_use]
    pub fn session() -> Self {
        SESSION.with(Clone::clone)
    }

    /// An asset that is already [`Ready`](AssetStatus::Ready) with `engine`.
    #[must_use]
    pub fn ready(engine: SharedEngine) -> Self {
        Self {
            state: Rc::new(RefCell::new(AssetState::Ready(engine))),
            next_token: Rc::default(),
        }
    }

    /// Current load state.
    #[must_use]
    pub fn status(&self) -> AssetStatus {
        match &*self.state.borrow() {
            AssetState::NotRequested { .. } => AssetStatus::NotRequested,
            AssetState::Loading { .. } => AssetStatus::Loading,
            AssetState::Ready(_) => AssetStatus::Ready,
            AssetState::Failed { .. } => AssetStatus::Failed,
        }
    }

    /// Start loading via `fetch` unless a load was already requested.
    ///
    /// `fetch` receives the [`AssetCompletion`] it must eventually resolve
    /// or fail; it may do so before returning. Returns whether `fetch` was
    /// invoked.
    pub fn request(&self, fetch: impl FnOnce(AssetCompletion)) -> bool {
        {
            let mut state = self.state.borrow_mut();
            let AssetState::NotRequested { waiters } = &mut *state else {
                return false;
            };
            let waiters = std::mem::take(waiters);
            *state = AssetState::Loading {
                since: Instant::now(),
                waiters,
            };
        }
        log::debug!("requesting viewer engine asset");
        fetch(AssetCompletion {
            asset: self.clone(),
        });
        true
    }

    /// Run `callback` with the engine as soon as it is available; right
    /// away if it already is. Dropped without running if the load failed.
    ///
    /// Returns a token for [`cancel`](Self::cancel) when the callback was
    /// queued.
    pub fn when_ready(
        &self,
        callback: impl FnOnce(&SharedEngine) + 'static,
    ) -> Option<WaiterToken> {
        let engine = {
            let mut state = self.state.borrow_mut();
            match &mut *state {
                AssetState::NotRequested { waiters }
                | AssetState::Loading { waiters, .. } => {
                    let token = WaiterToken(self.next_token.get());
                    self.next_token.set(token.0 + 1);
                    waiters.push((token, Box::new(callback)));
                    return Some(token);
                }
                AssetState::Failed { reason } => {
                    log::warn!("viewer engine unavailable: {reason}");
                    return None;
                }
                AssetState::Ready(engine) => Rc::clone(engine),
            }
        };
        callback(&engine);
        None
    }

    /// Drop a queued callback without running it. Returns whether it was
    /// still queued.
    pub fn cancel(&self, token: WaiterToken) -> bool {
        let mut state = self.state.borrow_mut();
        let (AssetState::NotRequested { waiters }
        | AssetState::Loading { waiters, .. }) = &mut *state
        else {
            return false;
        };
        let queued = waiters.len();
        waiters.retain(|(t, _)| *t != token);
        waiters.len() < queued
    }

    /// Number of callbacks waiting for the engine.
    #[must_use]
    pub fn pending_waiters(&self) -> usize {
        match &*self.state.borrow() {
            AssetState::NotRequested { waiters }
            | AssetState::Loading { waiters, .. } => waiters.len(),
            _ => 0,
        }
    }

    /// When the current load started, if one is in flight.
    #[must_use]
    pub fn loading_since(&self) -> Option<Instant> {
        match &*self.state.borrow() {
            AssetState::Loading { since, .. } => Some(*since),
            _ => None,
        }
    }

    /// Failure reason, if the load failed.
    #[must_use]
    pub fn failure(&self) -> Option<String> {
        match &*self.state.borrow() {
            AssetState::Failed { reason } => Some(reason.clone()),
            _ => None,
        }
    }

    /// Whether the load failed or has been in flight for at least
    /// `timeout`.
    #[must_use]
    pub fn is_stalled(&self, timeout: Duration) -> bool {
        match &*self.state.borrow() {
            AssetState::Loading { since, .. } => since.elapsed() >= timeout,
            AssetState::Failed { .. } => true,
            _ => false,
        }
    }

    fn complete(&self, outcome: Result<SharedEngine, String>) {
        let waiters = {
            let mut state = self.state.borrow_mut();
            let AssetState::Loading { waiters, .. } = &mut *state else {
                log::warn!("engine asset completed outside of a load; ignored");
                return;
            };
            let waiters = std::mem::take(waiters);
            *state = match &outcome {
                Ok(engine) => AssetState::Ready(Rc::clone(engine)),
                Err(reason) => AssetState::Failed {
                    reason: reason.clone(),
                },
            };
            waiters
        };

        match outcome {
            Ok(engine) => {
                log::debug!(
                    "viewer engine ready, notifying {} waiter(s)",
                    waiters.len()
                );
                for (_, waiter) in waiters {
                    waiter(&engine);
                }
            }
            Err(reason) => {
                log::error!(
                    "viewer engine failed to load ({reason}); {} view(s) will stay loading",
                    waiters.len()
                );
            }
        }
    }
}

impl Default for EngineAsset {
    fn default() -> Self {
        Self::new()
    }
}

/// Completion side of an engine load, handed to the fetch routine.
pub struct AssetCompletion {
    asset: EngineAsset,
}

impl AssetCompletion {
    /// The engine loaded; wake every waiter.
    pub fn resolve(self, engine: SharedEngine) {
        self.asset.complete(Ok(engine));
    }

    /// The engine could not be loaded.
    pub fn fail(self, reason: impl Into<String>) {
        self.asset.complete(Err(reason.into()));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::render::headless::HeadlessEngine;

    fn engine() -> SharedEngine {
        Rc::new(RefCell::new(HeadlessEngine::new()))
    }

    #[test]
    fn fetches_at_most_once() {
        let asset = EngineAsset::new();
        let fetches = Cell::new(0);
        let pending = RefCell::new(None);

        assert!(asset.request(|c| {
            fetches.set(fetches.get() + 1);
            *pending.borrow_mut() = Some(c);
        }));
        assert!(!asset.request(|_| fetches.set(fetches.get() + 1)));
        assert_eq!(fetches.get(), 1);
        assert_eq!(asset.status(), AssetStatus::Loading);
        assert!(asset.loading_since().is_some());

        pending.take().unwrap().resolve(engine());
        assert_eq!(asset.status(), AssetStatus::Ready);
        assert!(!asset.request(|_| fetches.set(fetches.get() + 1)));
        assert_eq!(fetches.get(), 1);
    }

    #[test]
    fn waiters_fire_on_resolve_in_order() {
        let asset = EngineAsset::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = Rc::clone(&log);
            let _ = asset.when_ready(move |_| log.borrow_mut().push(i));
        }
        let pending = RefCell::new(None);
        let _ = asset.request(|c| *pending.borrow_mut() = Some(c));
        assert!(log.borrow().is_empty());

        pending.take().unwrap().resolve(engine());
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn ready_fires_immediately() {
        let asset = EngineAsset::ready(engine());
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let _ = asset.when_ready(move |_| flag.set(true));
        assert!(fired.get());
    }

    #[test]
    fn synchronous_resolve_inside_fetch() {
        let asset = EngineAsset::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let _ = asset.when_ready(move |_| flag.set(true));
        let _ = asset.request(|c| c.resolve(engine()));
        assert!(fired.get());
        assert_eq!(asset.status(), AssetStatus::Ready);
    }

    #[test]
    fn waiter_may_subscribe_again() {
        let asset = EngineAsset::new();
        let fired = Rc::new(Cell::new(0));
        let inner_asset = asset.clone();
        let counter = Rc::clone(&fired);
        let _ = asset.when_ready(move |_| {
            counter.set(counter.get() + 1);
            let counter = Rc::clone(&counter);
            let _ = inner_asset
                .when_ready(move |_| counter.set(counter.get() + 1));
        });
        let _ = asset.request(|c| c.resolve(engine()));
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn failure_is_terminal_and_stalled() {
        let asset = EngineAsset::new();
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let _ = asset.when_ready(move |_| flag.set(true));
        let _ = asset.request(|c| c.fail("404 loading engine bundle"));

        assert_eq!(asset.status(), AssetStatus::Failed);
        assert_eq!(asset.failure().as_deref(), Some("404 loading engine bundle"));
        assert!(asset.is_stalled(Duration::from_secs(3600)));
        assert!(!fired.get());
        assert!(!asset.request(|_| {}));
    }

    #[test]
    fn stall_detection_while_loading() {
        let asset = EngineAsset::new();
        let pending = RefCell::new(None);
        let _ = asset.request(|c| *pending.borrow_mut() = Some(c));
        assert!(asset.is_stalled(Duration::ZERO));
        assert!(!asset.is_stalled(Duration::from_secs(3600)));
        pending.take().unwrap().resolve(engine());
        assert!(!asset.is_stalled(Duration::ZERO));
    }

    #[test]
    fn cancelled_waiter_is_released() {
        let asset = EngineAsset::new();
        let payload = Rc::new(String::from("ATOM"));
        let fired = Rc::new(Cell::new(0));

        let held = Rc::clone(&payload);
        let counter = Rc::clone(&fired);
        let first = asset
            .when_ready(move |_| counter.set(counter.get() + held.len()))
            .unwrap();
        let counter = Rc::clone(&fired);
        let second = asset.when_ready(move |_| counter.set(counter.get() + 1));
        assert_ne!(Some(first), second);
        assert_eq!(asset.pending_waiters(), 2);
        assert_eq!(Rc::strong_count(&payload), 2);

        assert!(asset.cancel(first));
        assert!(!asset.cancel(first));
        assert_eq!(asset.pending_waiters(), 1);
        assert_eq!(Rc::strong_count(&payload), 1);

        let _ = asset.request(|c| c.resolve(engine()));
        assert_eq!(fired.get(), 1);
        assert_eq!(asset.pending_waiters(), 0);
    }

    #[test]
    fn no_token_when_not_queued() {
        let asset = EngineAsset::ready(engine());
        assert!(asset.when_ready(|_| {}).is_none());

        let failed = EngineAsset::new();
        let _ = failed.request(|c| c.fail("offline"));
        assert!(failed.when_ready(|_| {}).is_none());
    }

    #[test]
    fn session_is_shared() {
        let a = EngineAsset::session();
        let b = EngineAsset::session();
        assert!(Rc::ptr_eq(&a.state, &b.state));
    }
}
