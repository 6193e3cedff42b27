//! Coordinator tree and lifecycle state machine
//!
//! A coordinator owns a piece of application flow. Coordinators form a tree:
//! a parent owns its children through `Rc`s, children point back at the
//! parent weakly, and upward notifications travel through each child's
//! [`Broadcaster`] on which the parent registers itself.
//!
//! # Lifecycle
//!
//! ```text
//!            start()               pause()
//! Inactive ───────────▶ Active ───────────▶ Paused
//!    ▲                   │  ▲                 │
//!    │      stop()       │  └─── resume() ────┘
//!    └───────────────────┴────────────────────┘ stop()
//! ```
//!
//! Transitions whose precondition fails are ignored. Stopping, pausing and
//! resuming cascade to the children that are in a matching state.
//!
//! # Implementing a coordinator
//!
//! Embed a [`CoordinatorCore`] built from the `Weak` handed out by
//! `Rc::new_cyclic`, implement [`Coordinator`] and [`CoordinatorListener`],
//! and every lifecycle and child-management operation comes from the blanket
//! [`CoordinatorExt`] impl.
//!
//! ```
//! use std::rc::Rc;
//! use libcoordkit::coordinator::{Coordinator, CoordinatorCore, CoordinatorExt, CoordinatorRef};
//! use libcoordkit::events::{CoordinatorEvent, CoordinatorListener};
//!
//! struct Onboarding {
//!     core: CoordinatorCore,
//! }
//!
//! impl Onboarding {
//!     fn new() -> Rc<Self> {
//!         Rc::new_cyclic(|this| Self { core: CoordinatorCore::new(this) })
//!     }
//! }
//!
//! impl CoordinatorListener for Onboarding {
//!     fn on_event(&self, _source: &CoordinatorRef, _event: CoordinatorEvent) {}
//! }
//!
//! impl Coordinator for Onboarding {
//!     fn core(&self) -> &CoordinatorCore {
//!         &self.core
//!     }
//! }
//!
//! let onboarding = Onboarding::new();
//! onboarding.start();
//! assert!(onboarding.is_active());
//! ```

pub mod navigation;
pub mod scene;
pub mod tab;

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::events::{Broadcaster, CoordinatorEvent, CoordinatorListener};

/// Shared handle to any coordinator
pub type CoordinatorRef = Rc<dyn Coordinator>;

/// Lifecycle state of a coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorState {
    /// Running and doing work
    Active,
    /// Dormant. Every coordinator starts here.
    #[default]
    Inactive,
    /// Was active, now throttled
    Paused,
}

impl std::fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinatorState::Active => write!(f, "active"),
            CoordinatorState::Inactive => write!(f, "inactive"),
            CoordinatorState::Paused => write!(f, "paused"),
        }
    }
}

/// Unique identity of a coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinatorId(Uuid);

impl CoordinatorId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for CoordinatorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State shared by every coordinator
///
/// Holds the lifecycle state, the owned children, the weak parent link and
/// the listener registry. Must be created inside `Rc::new_cyclic` so the
/// coordinator can hand out handles to itself.
pub struct CoordinatorCore {
    id: CoordinatorId,
    state: Cell<CoordinatorState>,
    this: Weak<dyn Coordinator>,
    as_listener: Weak<dyn CoordinatorListener>,
    parent: RefCell<Option<Weak<dyn Coordinator>>>,
    children: RefCell<Vec<CoordinatorRef>>,
    listeners: Broadcaster<dyn CoordinatorListener>,
}

impl CoordinatorCore {
    pub fn new<C: Coordinator>(this: &Weak<C>) -> Self {
        let as_coordinator: Weak<dyn Coordinator> = this.clone();
        let as_listener: Weak<dyn CoordinatorListener> = this.clone();
        Self {
            id: CoordinatorId::generate(),
            state: Cell::new(CoordinatorState::Inactive),
            this: as_coordinator,
            as_listener,
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            listeners: Broadcaster::new(),
        }
    }

    pub fn id(&self) -> CoordinatorId {
        self.id
    }

    pub fn state(&self) -> CoordinatorState {
        self.state.get()
    }

    /// Owning handle to the coordinator embedding this core
    pub fn handle(&self) -> Option<CoordinatorRef> {
        self.this.upgrade()
    }

    pub fn listeners(&self) -> &Broadcaster<dyn CoordinatorListener> {
        &self.listeners
    }

    /// Send `event` to every listener, with this coordinator as the source
    pub fn broadcast(&self, event: CoordinatorEvent) {
        let Some(source) = self.handle() else {
            return;
        };
        trace!(coordinator = %self.id, %event, listeners = self.listeners.len(), "broadcasting");
        self.listeners
            .notify(|listener| listener.on_event(&source, event));
    }

    fn set_state(&self, state: CoordinatorState) {
        self.state.set(state);
    }

    fn set_parent(&self, parent: Option<Weak<dyn Coordinator>>) {
        *self.parent.borrow_mut() = parent;
    }

    fn children_snapshot(&self) -> Vec<CoordinatorRef> {
        self.children.borrow().clone()
    }
}

impl std::fmt::Debug for CoordinatorCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorCore")
            .field("id", &self.id)
            .field("state", &self.state.get())
            .field("children", &self.children.borrow().len())
            .field("listeners", &self.listeners)
            .finish()
    }
}

/// A node in the coordinator tree
///
/// Implementors supply their [`CoordinatorCore`] and optionally hook into
/// transitions. Hooks run after the state changed and listeners were told.
pub trait Coordinator: CoordinatorListener + 'static {
    fn core(&self) -> &CoordinatorCore;

    fn on_start(&self) {}

    fn on_stop(&self) {}

    fn on_pause(&self) {}

    fn on_resume(&self) {}

    /// Whether [`CoordinatorExt::resume`] wakes the paused `child` along with
    /// this coordinator. Children left out stay paused.
    fn resumes_child(&self, _child: &CoordinatorRef) -> bool {
        true
    }
}

/// Lifecycle, child management and queries for every coordinator
pub trait CoordinatorExt: Coordinator {
    fn id(&self) -> CoordinatorId {
        self.core().id()
    }

    fn state(&self) -> CoordinatorState {
        self.core().state()
    }

    fn is_active(&self) -> bool {
        self.state() == CoordinatorState::Active
    }

    fn is_inactive(&self) -> bool {
        self.state() == CoordinatorState::Inactive
    }

    fn is_paused(&self) -> bool {
        self.state() == CoordinatorState::Paused
    }

    fn parent(&self) -> Option<CoordinatorRef> {
        self.core()
            .parent
            .borrow()
            .as_ref()
            .and_then(|parent| parent.upgrade())
    }

    /// Register an outside observer. The coordinator does not keep it alive.
    fn add_listener<L: CoordinatorListener + 'static>(&self, listener: &Rc<L>) {
        let listener: Rc<dyn CoordinatorListener> = listener.clone();
        self.core().listeners().register(&listener);
    }

    fn remove_listener<L: CoordinatorListener + 'static>(&self, listener: &Rc<L>) {
        let listener: Rc<dyn CoordinatorListener> = listener.clone();
        self.core().listeners().unregister(&listener);
    }

    /// Become active. Only valid from `Inactive`.
    fn start(&self) {
        let core = self.core();
        if !self.is_inactive() {
            trace!(coordinator = %core.id(), state = %core.state(), "start ignored");
            return;
        }
        core.set_state(CoordinatorState::Active);
        debug!(coordinator = %core.id(), "coordinator started");
        core.broadcast(CoordinatorEvent::DidStart);
        self.on_start();
    }

    /// Become inactive, stopping every running child first
    fn stop(&self) {
        let core = self.core();
        if !(self.is_active() || self.is_paused()) {
            trace!(coordinator = %core.id(), state = %core.state(), "stop ignored");
            return;
        }
        core.set_state(CoordinatorState::Inactive);
        for child in core.children_snapshot() {
            if child.is_active() || child.is_paused() {
                self.stop_child(&child);
            }
        }
        debug!(coordinator = %core.id(), "coordinator stopped");
        core.broadcast(CoordinatorEvent::DidStop);
        self.on_stop();
    }

    /// Throttle work, pausing every active child
    fn pause(&self) {
        let core = self.core();
        if !self.is_active() {
            trace!(coordinator = %core.id(), state = %core.state(), "pause ignored");
            return;
        }
        core.set_state(CoordinatorState::Paused);
        for child in core.children_snapshot() {
            if child.is_active() {
                self.pause_child(&child);
            }
        }
        debug!(coordinator = %core.id(), "coordinator paused");
        core.broadcast(CoordinatorEvent::DidPause);
        self.on_pause();
    }

    /// Leave the paused state, resuming the paused children
    /// [`Coordinator::resumes_child`] lets through
    fn resume(&self) {
        let core = self.core();
        if !self.is_paused() {
            trace!(coordinator = %core.id(), state = %core.state(), "resume ignored");
            return;
        }
        core.set_state(CoordinatorState::Active);
        for child in core.children_snapshot() {
            if child.is_paused() && self.resumes_child(&child) {
                self.resume_child(&child);
            }
        }
        debug!(coordinator = %core.id(), "coordinator resumed");
        core.broadcast(CoordinatorEvent::DidResume);
        self.on_resume();
    }

    fn has_children_in_state(&self, state: CoordinatorState) -> bool {
        self.core()
            .children
            .borrow()
            .iter()
            .any(|child| child.state() == state)
    }

    fn child_count_in_state(&self, state: CoordinatorState) -> usize {
        self.core()
            .children
            .borrow()
            .iter()
            .filter(|child| child.state() == state)
            .count()
    }

    fn has_child<C: Coordinator + ?Sized>(&self, child: &Rc<C>) -> bool {
        let id = child.core().id();
        self.core()
            .children
            .borrow()
            .iter()
            .any(|existing| existing.core().id() == id)
    }

    fn child_count(&self) -> usize {
        self.core().children.borrow().len()
    }

    fn children(&self) -> Vec<CoordinatorRef> {
        self.core().children_snapshot()
    }

    /// Adopt `child` and start it
    ///
    /// This must be used instead of calling `child.start()` directly: it
    /// subscribes this coordinator to the child's events and records the
    /// ownership. Ignored if `child` is already a child, or still belongs to
    /// another live parent.
    fn start_child<C: Coordinator + ?Sized>(&self, child: &Rc<C>) {
        let core = self.core();
        if self.has_child(child) {
            trace!(parent = %core.id(), child = %child.core().id(), "child already adopted");
            return;
        }
        if let Some(other) = child.parent() {
            debug!(
                parent = %core.id(),
                child = %child.core().id(),
                owner = %other.core().id(),
                "child belongs to another parent, not adopting"
            );
            return;
        }
        let Some(owned) = child.core().handle() else {
            return;
        };

        if let Some(listener) = core.as_listener.upgrade() {
            child.core().listeners().register(&listener);
        }
        core.children.borrow_mut().push(owned);
        child.core().set_parent(Some(core.this.clone()));
        debug!(parent = %core.id(), child = %child.core().id(), "child adopted");
        child.start();
    }

    /// Release `child` and stop it
    ///
    /// Counterpart of [`CoordinatorExt::start_child`]. Ignored for
    /// coordinators that are not children of this one.
    fn stop_child<C: Coordinator + ?Sized>(&self, child: &Rc<C>) {
        let core = self.core();
        if !self.has_child(child) {
            trace!(parent = %core.id(), child = %child.core().id(), "stop of unknown child ignored");
            return;
        }
        let id = child.core().id();

        if let Some(listener) = core.as_listener.upgrade() {
            child.core().listeners().unregister(&listener);
        }
        core.children
            .borrow_mut()
            .retain(|existing| existing.core().id() != id);
        child.core().set_parent(None);
        debug!(parent = %core.id(), child = %id, "child released");
        child.stop();
    }

    fn pause_child<C: Coordinator + ?Sized>(&self, child: &Rc<C>) {
        if !self.has_child(child) || child.is_paused() {
            return;
        }
        child.pause();
    }

    fn resume_child<C: Coordinator + ?Sized>(&self, child: &Rc<C>) {
        if !self.has_child(child) || !child.is_paused() {
            return;
        }
        child.resume();
    }
}

impl<T: Coordinator + ?Sized> CoordinatorExt for T {}

/// Coordinator without a presentable
///
/// Useful for purely logical flows (a sign-in sequence spanning several
/// scenes) and as the root of a tree.
pub struct FlowCoordinator {
    core: CoordinatorCore,
}

impl FlowCoordinator {
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            core: CoordinatorCore::new(this),
        })
    }
}

impl CoordinatorListener for FlowCoordinator {
    fn on_event(&self, _source: &CoordinatorRef, _event: CoordinatorEvent) {}
}

impl Coordinator for FlowCoordinator {
    fn core(&self) -> &CoordinatorCore {
        &self.core
    }
}
