//! Navigation coordinator
//!
//! Drives a host [`StackContainer`] and keeps two bookkeeping stacks in
//! lock-step with it: the child flows, and the presentable each flow put on
//! the container. Both stacks always have the same length and
//! `flows[i].presentable()` is `presentables[i]`.
//!
//! Bookkeeping is updated before the container is asked to move, so a host
//! that reports visibility synchronously already sees consistent stacks.
//!
//! The host can change its stack on its own (interactive back gesture). It
//! reports the presentable that ended up visible through
//! [`NavigationCoordinator::did_show`], which drains the bookkeeping down to
//! that presentable.
//!
//! ```
//! use libcoordkit::coordinator::navigation::NavigationCoordinator;
//! use libcoordkit::coordinator::scene::{SceneCoordinator, SceneRef};
//! use libcoordkit::coordinator::CoordinatorExt;
//! use libcoordkit::host::mock::{MockPresentable, MockStackContainer};
//!
//! let container = MockStackContainer::new("nav");
//! let inbox: SceneRef = SceneCoordinator::with_presentable(MockPresentable::new("inbox"));
//! let thread: SceneRef = SceneCoordinator::with_presentable(MockPresentable::new("thread"));
//!
//! let navigation = NavigationCoordinator::with_root(container.clone(), &inbox);
//! navigation.start();
//! navigation.push(&thread, true);
//! assert_eq!(container.visible_names(), vec!["inbox", "thread"]);
//!
//! // user swipes back
//! let shown = container.simulate_back_gesture().unwrap();
//! navigation.did_show(&shown).unwrap();
//! assert!(thread.is_inactive());
//! assert_eq!(navigation.depth(), 1);
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, trace};

use crate::animator::{Animator, AnimatorRef, NavigationAnimator};
use crate::config::{DesyncPolicy, NavigationConfig};
use crate::coordinator::scene::{Scene, SceneExt, SceneRef};
use crate::coordinator::{
    Coordinator, CoordinatorCore, CoordinatorExt, CoordinatorId, CoordinatorRef,
};
use crate::error::NavigationError;
use crate::events::{CoordinatorEvent, CoordinatorListener};
use crate::host::{same_presentable, Completion, PresentableRef, StackContainer};
use crate::stack::Stack;

/// Scene coordinator managing a stack of child flows
pub struct NavigationCoordinator {
    core: CoordinatorCore,
    container: Rc<dyn StackContainer>,
    presentable: PresentableRef,
    animator: Rc<NavigationAnimator>,
    root: RefCell<Option<SceneRef>>,
    flows: RefCell<Stack<SceneRef>>,
    presentables: RefCell<Stack<PresentableRef>>,
    config: NavigationConfig,
}

impl NavigationCoordinator {
    pub fn new<C: StackContainer>(container: Rc<C>) -> Rc<Self> {
        Self::with_config(container, NavigationConfig::default())
    }

    pub fn with_config<C: StackContainer>(container: Rc<C>, config: NavigationConfig) -> Rc<Self> {
        let presentable: PresentableRef = container.clone();
        let container: Rc<dyn StackContainer> = container;
        Rc::new_cyclic(|this| Self {
            core: CoordinatorCore::new(this),
            container,
            presentable,
            animator: Rc::new(NavigationAnimator::new(this.clone())),
            root: RefCell::new(None),
            flows: RefCell::new(Stack::new()),
            presentables: RefCell::new(Stack::new()),
            config,
        })
    }

    /// Navigation coordinator with `root` already placed in the container
    pub fn with_root<C: StackContainer>(container: Rc<C>, root: &SceneRef) -> Rc<Self> {
        let navigation = Self::new(container);
        navigation.set_root(root);
        navigation
    }

    pub fn container(&self) -> &Rc<dyn StackContainer> {
        &self.container
    }

    pub fn config(&self) -> NavigationConfig {
        self.config
    }

    /// Install the bottom-most flow
    ///
    /// Only possible while nothing is tracked. Places the root without
    /// animation and starts it right away if this coordinator is active.
    pub fn set_root(&self, root: &SceneRef) {
        let vacant = self.root.borrow().is_none()
            && self.flows.borrow().is_empty()
            && self.presentables.borrow().is_empty();
        if !vacant {
            trace!(coordinator = %self.id(), "root already set, ignoring");
            return;
        }

        let presentable = root.presentable();
        *self.root.borrow_mut() = Some(root.clone());
        self.push_stacks(root, &presentable);
        debug!(coordinator = %self.id(), root = %root.id(), "root set");
        self.container.set_root(&presentable);

        if self.is_active() {
            self.start_child(root);
        }
    }

    /// Push `child` on top of the current flow, pausing it
    ///
    /// Ignored until a root is set, and for flows that are already children.
    pub fn push(&self, child: &SceneRef, animated: bool) {
        if self.root.borrow().is_none() {
            trace!(coordinator = %self.id(), child = %child.id(), "push without root ignored");
            return;
        }
        if self.has_child(child) || child.parent().is_some() {
            trace!(coordinator = %self.id(), child = %child.id(), "push of owned flow ignored");
            return;
        }

        if let Some(top) = self.top() {
            self.pause_child(&top);
        }
        let presentable = child.presentable();
        self.push_stacks(child, &presentable);
        debug!(coordinator = %self.id(), child = %child.id(), depth = self.depth(), "flow pushed");
        self.start_scene(child, animated, None);
    }

    /// Pop the top flow. The root is never popped.
    pub fn pop(&self, animated: bool) {
        self.pop_top(animated, None);
    }

    /// Pop every flow above `target`
    pub fn pop_to(&self, target: &SceneRef, animated: bool) {
        if !self.has_child(target) {
            trace!(coordinator = %self.id(), target = %target.id(), "pop to unknown flow ignored");
            return;
        }

        let target_id = target.id();
        let drained = self.drain_while(|flow, _| flow.id() != target_id && !self.is_root(flow));
        debug!(coordinator = %self.id(), target = %target_id, drained, "popped to flow");
        self.container.pop_to(&target.presentable(), animated);

        if target.is_paused() {
            self.resume_child(target);
        }
    }

    pub fn pop_to_root(&self, animated: bool) {
        let Some(root) = self.root() else {
            trace!(coordinator = %self.id(), "pop to root without root ignored");
            return;
        };

        let drained = self.drain_while(|flow, _| !self.is_root(flow));
        debug!(coordinator = %self.id(), drained, "popped to root");
        self.container.pop_to_root(animated);

        if root.is_paused() {
            self.resume_child(&root);
        }
    }

    /// Reconcile with the presentable the container just showed
    ///
    /// Stops and drops tracked flows from the top until `visible` is on top,
    /// then resumes the new top flow if it was paused. If `visible` is not
    /// tracked at all every flow is drained and the configured
    /// [`DesyncPolicy`] applies.
    pub fn did_show(&self, visible: &PresentableRef) -> Result<(), NavigationError> {
        if self.presentables.borrow().is_empty() {
            trace!(coordinator = %self.id(), "nothing tracked, ignoring shown presentable");
            return Ok(());
        }

        let drained = self.drain_while(|_, presentable| !same_presentable(presentable, visible));
        if self.presentables.borrow().is_empty() {
            return self.lost_sync(drained);
        }
        if drained > 0 {
            debug!(coordinator = %self.id(), drained, depth = self.depth(), "resynced with container");
        }

        self.resume_top();
        Ok(())
    }

    /// Whether the container's back gesture may run alongside other gestures
    pub fn allows_simultaneous_back_gesture(&self) -> bool {
        true
    }

    pub fn set_navigation_bar_hidden(&self, hidden: bool, animated: bool) {
        self.container.set_navigation_bar_hidden(hidden, animated);
    }

    pub fn root(&self) -> Option<SceneRef> {
        self.root.borrow().clone()
    }

    /// Visible flow
    pub fn top(&self) -> Option<SceneRef> {
        self.flows.borrow().peek().cloned()
    }

    pub fn depth(&self) -> usize {
        self.flows.borrow().len()
    }

    /// Tracked flows, bottom first
    pub fn flows(&self) -> Vec<SceneRef> {
        self.flows.borrow().iter().cloned().collect()
    }

    /// Tracked presentables, bottom first
    pub fn presentables(&self) -> Vec<PresentableRef> {
        self.presentables.borrow().iter().cloned().collect()
    }

    /// Both stacks have the same length, every flow lines up with its
    /// presentable, and once running every tracked flow is a child
    pub fn is_synchronized(&self) -> bool {
        let flows = self.flows();
        let presentables = self.presentables();
        flows.len() == presentables.len()
            && flows
                .iter()
                .zip(presentables.iter())
                .all(|(flow, presentable)| same_presentable(&flow.presentable(), presentable))
            && (self.is_inactive() || flows.iter().all(|flow| self.has_child(flow)))
    }

    /// Presentation path used by [`NavigationAnimator`]
    ///
    /// Only the tracked top presentable above the root is pushed. The root
    /// is placed by [`NavigationCoordinator::set_root`] and anything else
    /// would leave the container ahead of the bookkeeping.
    pub(crate) fn push_presentable(
        &self,
        presentable: &PresentableRef,
        animated: bool,
        completion: Option<Completion>,
    ) {
        let on_top = {
            let presentables = self.presentables.borrow();
            presentables.len() > 1
                && presentables
                    .peek()
                    .is_some_and(|top| same_presentable(top, presentable))
        };
        if !on_top {
            trace!(coordinator = %self.id(), presentable = presentable.name(), "push of untracked presentable ignored");
            return;
        }
        self.container.push(presentable, animated, completion);
    }

    /// Dismissal path used by [`NavigationAnimator`]
    ///
    /// The top flow goes through the regular pop. A covered flow is popped
    /// together with everything above it in one `pop_to` onto the flow
    /// beneath. Dismissing the root clears the bookkeeping without moving the
    /// container. Untracked presentables are ignored.
    pub(crate) fn pop_presentable(
        &self,
        presentable: &PresentableRef,
        animated: bool,
        completion: Option<Completion>,
    ) {
        let position = self
            .presentables
            .borrow()
            .iter()
            .position(|tracked| same_presentable(tracked, presentable));
        let Some(position) = position else {
            trace!(coordinator = %self.id(), presentable = presentable.name(), "dismissal of untracked presentable ignored");
            return;
        };

        if position == 0 {
            self.release_root(completion);
        } else if position + 1 == self.depth() {
            self.pop_top(animated, completion);
        } else {
            self.pop_covered(position, animated, completion);
        }
    }

    /// Track and show a flow adopted through [`SceneExt::start_scene`]
    fn track_presented(&self, child: &SceneRef, animated: bool, completion: Option<Completion>) {
        if self.root.borrow().is_none() {
            self.set_root(child);
            if let Some(completion) = completion {
                completion();
            }
            return;
        }

        if let Some(top) = self.top() {
            self.pause_child(&top);
        }
        let presentable = child.presentable();
        self.push_stacks(child, &presentable);
        debug!(coordinator = %self.id(), child = %child.id(), depth = self.depth(), "started flow tracked");
        self.animator
            .present(&self.presentable, &presentable, animated, completion);
    }

    fn pop_top(&self, animated: bool, completion: Option<Completion>) {
        let Some(top) = self.top() else {
            trace!(coordinator = %self.id(), "pop on empty stack ignored");
            return;
        };
        if self.is_root(&top) {
            trace!(coordinator = %self.id(), "pop of root ignored");
            return;
        }

        self.pop_stacks();
        debug!(coordinator = %self.id(), child = %top.id(), depth = self.depth(), "flow popped");
        self.stop_child(&top);
        self.container.pop(animated, completion);
        self.resume_top();
    }

    fn pop_covered(&self, position: usize, animated: bool, completion: Option<Completion>) {
        let drained = self.drain_while(|_, _| self.depth() > position);
        let Some(beneath) = self.presentables.borrow().peek().cloned() else {
            return;
        };
        debug!(coordinator = %self.id(), drained, depth = self.depth(), "covered flow popped");
        self.container.pop_to(&beneath, animated);
        if let Some(completion) = completion {
            completion();
        }
        self.resume_top();
    }

    fn release_root(&self, completion: Option<Completion>) {
        let drained = self.drain_while(|_, _| true);
        self.root.borrow_mut().take();
        debug!(coordinator = %self.id(), drained, "root released");
        if let Some(completion) = completion {
            completion();
        }
    }

    fn lost_sync(&self, drained: usize) -> Result<(), NavigationError> {
        match self.config.desync_policy {
            DesyncPolicy::Panic => panic!(
                "navigation coordinator {} lost sync with its container ({} flows drained)",
                self.id(),
                drained
            ),
            DesyncPolicy::Reset => {
                error!(coordinator = %self.id(), drained, "lost sync with container, root cleared");
                self.root.borrow_mut().take();
                Err(NavigationError::LostSync { drained })
            }
        }
    }

    /// Stop and drop flows from the top while `predicate` holds. Returns
    /// how many were dropped. The container is not touched.
    fn drain_while<F>(&self, predicate: F) -> usize
    where
        F: Fn(&SceneRef, &PresentableRef) -> bool,
    {
        let mut drained = 0;
        loop {
            let top = {
                let flows = self.flows.borrow();
                let presentables = self.presentables.borrow();
                match (flows.peek(), presentables.peek()) {
                    (Some(flow), Some(presentable)) => (flow.clone(), presentable.clone()),
                    _ => break,
                }
            };
            if !predicate(&top.0, &top.1) {
                break;
            }

            self.pop_stacks();
            self.stop_child(&top.0);
            drained += 1;
        }
        drained
    }

    fn push_stacks(&self, flow: &SceneRef, presentable: &PresentableRef) {
        self.flows.borrow_mut().push(flow.clone());
        self.presentables.borrow_mut().push(presentable.clone());
    }

    fn pop_stacks(&self) {
        self.flows.borrow_mut().pop();
        self.presentables.borrow_mut().pop();
    }

    fn resume_top(&self) {
        if let Some(top) = self.top() {
            if top.is_paused() {
                self.resume_child(&top);
            }
        }
    }

    fn is_root(&self, flow: &SceneRef) -> bool {
        self.root
            .borrow()
            .as_ref()
            .is_some_and(|root| root.id() == flow.id())
    }

    fn is_tracked(&self, id: CoordinatorId) -> bool {
        self.flows().iter().any(|flow| flow.id() == id)
    }
}

impl CoordinatorListener for NavigationCoordinator {
    fn on_event(&self, source: &CoordinatorRef, event: CoordinatorEvent) {
        if event != CoordinatorEvent::DidRequestDismissal {
            return;
        }

        let id = source.core().id();
        if self.root().is_some_and(|root| root.id() == id) {
            debug!(coordinator = %self.id(), "root requested dismissal, forwarding");
            self.request_dismissal();
        } else if self.is_tracked(id) {
            self.pop(self.config.animate_dismissal);
        } else {
            trace!(coordinator = %self.id(), child = %id, "dismissal request from untracked flow");
        }
    }
}

impl Coordinator for NavigationCoordinator {
    fn core(&self) -> &CoordinatorCore {
        &self.core
    }

    fn on_start(&self) {
        self.container.load();
        if let Some(root) = self.root() {
            self.start_child(&root);
        }
    }

    fn resumes_child(&self, child: &CoordinatorRef) -> bool {
        // covered flows stay paused
        let id = child.core().id();
        !self.is_tracked(id) || self.top().is_some_and(|top| top.id() == id)
    }

    fn on_stop(&self) {
        // children were stopped by the base transition; the container goes away whole
        self.flows.borrow_mut().remove_all();
        self.presentables.borrow_mut().remove_all();
        self.root.borrow_mut().take();
    }
}

impl Scene for NavigationCoordinator {
    fn presentable(&self) -> PresentableRef {
        self.presentable.clone()
    }

    fn animator(&self) -> Option<AnimatorRef> {
        Some(self.animator.clone())
    }

    fn animator_for_presenting(&self, _child: &SceneRef) -> Option<AnimatorRef> {
        Some(self.animator.clone())
    }

    fn animator_for_dismissing(&self, _child: &SceneRef) -> Option<AnimatorRef> {
        Some(self.animator.clone())
    }

    fn present_child(&self, child: &SceneRef, animated: bool, completion: Option<Completion>) {
        if self.is_tracked(child.id()) {
            self.animator
                .present(&self.presentable, &child.presentable(), animated, completion);
        } else {
            self.track_presented(child, animated, completion);
        }
    }
}

impl std::fmt::Debug for NavigationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationCoordinator")
            .field("core", &self.core)
            .field("container", &self.container.name())
            .field("depth", &self.flows.borrow().len())
            .field("config", &self.config)
            .finish()
    }
}
