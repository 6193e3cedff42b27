//! Lifecycle events and the broadcaster that distributes them
//!
//! Every coordinator owns a [`Broadcaster`] of [`CoordinatorListener`]s.
//! A parent registers itself on each child it adopts, which is how upward
//! notifications (a child stopped, a child wants to be dismissed) travel
//! without the child ever holding a strong reference to its parent.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use libcoordkit::coordinator::{CoordinatorExt, FlowCoordinator};
//! use libcoordkit::events::CoordinatorEvent;
//! use libcoordkit::host::mock::RecordingListener;
//!
//! let flow = FlowCoordinator::new();
//! let recorder = Rc::new(RecordingListener::new());
//! flow.add_listener(&recorder);
//!
//! flow.start();
//! assert_eq!(recorder.events(), vec![CoordinatorEvent::DidStart]);
//! ```

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::coordinator::CoordinatorRef;

/// Events a coordinator broadcasts to its listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorEvent {
    /// Moved from inactive to active
    DidStart,
    /// Moved from active or paused to inactive
    DidStop,
    /// Moved from active to paused
    DidPause,
    /// Moved from paused to active
    DidResume,
    /// Asked whoever presented it to take it off screen
    DidRequestDismissal,
}

impl std::fmt::Display for CoordinatorEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinatorEvent::DidStart => write!(f, "did_start"),
            CoordinatorEvent::DidStop => write!(f, "did_stop"),
            CoordinatorEvent::DidPause => write!(f, "did_pause"),
            CoordinatorEvent::DidResume => write!(f, "did_resume"),
            CoordinatorEvent::DidRequestDismissal => write!(f, "did_request_dismissal"),
        }
    }
}

/// Receiver of coordinator events
///
/// Coordinators implement this to react to their children; analytics or
/// test observers implement it to watch a coordinator from the outside.
pub trait CoordinatorListener {
    fn on_event(&self, source: &CoordinatorRef, event: CoordinatorEvent);
}

enum Registration<L: ?Sized> {
    Weak(Weak<L>),
    Strong(Rc<L>),
}

impl<L: ?Sized> Registration<L> {
    fn upgrade(&self) -> Option<Rc<L>> {
        match self {
            Registration::Weak(weak) => weak.upgrade(),
            Registration::Strong(strong) => Some(strong.clone()),
        }
    }

    fn is_live(&self) -> bool {
        match self {
            Registration::Weak(weak) => weak.strong_count() > 0,
            Registration::Strong(_) => true,
        }
    }

    fn address(&self) -> *const () {
        match self {
            Registration::Weak(weak) => weak.as_ptr() as *const (),
            Registration::Strong(strong) => Rc::as_ptr(strong) as *const (),
        }
    }
}

/// Multicast registry of listeners
///
/// Holds weak references by default, so registering a listener never keeps
/// it alive. Listeners that have been dropped are skipped during
/// notification and pruned. Identity is pointer identity.
pub struct Broadcaster<L: ?Sized> {
    retain: bool,
    entries: RefCell<Vec<Registration<L>>>,
}

impl<L: ?Sized> Broadcaster<L> {
    /// Broadcaster holding weak references
    pub fn new() -> Self {
        Self {
            retain: false,
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Broadcaster that keeps its listeners alive until they are unregistered
    pub fn strong() -> Self {
        Self {
            retain: true,
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Register a listener. Registering twice is a no-op.
    pub fn register(&self, listener: &Rc<L>) {
        if self.contains(listener) {
            return;
        }
        let registration = if self.retain {
            Registration::Strong(listener.clone())
        } else {
            Registration::Weak(Rc::downgrade(listener))
        };
        self.entries.borrow_mut().push(registration);
    }

    /// Unregister a listener. Unknown listeners are ignored.
    pub fn unregister(&self, listener: &Rc<L>) {
        let target = Rc::as_ptr(listener) as *const ();
        self.entries
            .borrow_mut()
            .retain(|entry| entry.address() != target);
    }

    pub fn contains(&self, listener: &Rc<L>) -> bool {
        let target = Rc::as_ptr(listener) as *const ();
        self.entries
            .borrow()
            .iter()
            .any(|entry| entry.is_live() && entry.address() == target)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live listeners
    pub fn len(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.is_live())
            .count()
    }

    pub fn remove_all(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Invoke `action` on every live listener
    ///
    /// The listener set is captured before the first call, so listeners may
    /// register or unregister (themselves or others) from inside `action`.
    /// Changes take effect on the next notification.
    pub fn notify<F>(&self, mut action: F)
    where
        F: FnMut(&L),
    {
        let live: Vec<Rc<L>> = {
            let mut entries = self.entries.borrow_mut();
            entries.retain(|entry| entry.is_live());
            entries.iter().filter_map(|entry| entry.upgrade()).collect()
        };

        for listener in live {
            action(&listener);
        }
    }
}

impl<L: ?Sized> Default for Broadcaster<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> std::fmt::Debug for Broadcaster<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("retain", &self.retain)
            .field("listeners", &self.len())
            .finish()
    }
}
