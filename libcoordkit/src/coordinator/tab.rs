//! Tab coordinator
//!
//! Multiplexes a fixed set of sibling flows over a [`TabContainer`]. Only
//! the selected tab runs; switching away pauses it, switching back resumes
//! it. A tab is started the first time it is selected.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, trace};

use crate::animator::{AnimatorRef, SceneAnimator};
use crate::coordinator::scene::{Scene, SceneRef};
use crate::coordinator::{Coordinator, CoordinatorCore, CoordinatorExt, CoordinatorRef};
use crate::events::{CoordinatorEvent, CoordinatorListener};
use crate::host::{same_presentable, PresentableRef, TabContainer};

/// Scene coordinator switching between sibling flows
pub struct TabCoordinator {
    core: CoordinatorCore,
    container: Rc<dyn TabContainer>,
    presentable: PresentableRef,
    animator: RefCell<Option<AnimatorRef>>,
    tabs: Vec<SceneRef>,
    tab_presentables: Vec<PresentableRef>,
    selected: Cell<usize>,
}

impl TabCoordinator {
    /// Install `tabs` into `container`. The first tab is selected.
    pub fn new<C: TabContainer>(container: Rc<C>, tabs: Vec<SceneRef>) -> Rc<Self> {
        let tab_presentables: Vec<PresentableRef> =
            tabs.iter().map(|tab| tab.presentable()).collect();
        container.set_presentables(&tab_presentables, false);

        let presentable: PresentableRef = container.clone();
        let container: Rc<dyn TabContainer> = container;
        let animator: AnimatorRef = Rc::new(SceneAnimator);
        Rc::new_cyclic(|this| Self {
            core: CoordinatorCore::new(this),
            container,
            presentable,
            animator: RefCell::new(Some(animator)),
            tabs,
            tab_presentables,
            selected: Cell::new(0),
        })
    }

    pub fn selected_index(&self) -> usize {
        self.selected.get()
    }

    /// Flow of the selected tab
    pub fn selected(&self) -> Option<SceneRef> {
        self.tabs.get(self.selected.get()).cloned()
    }

    pub fn tabs(&self) -> &[SceneRef] {
        &self.tabs
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Animator used for modal presentations over the tabs
    pub fn set_animator(&self, animator: Option<AnimatorRef>) {
        *self.animator.borrow_mut() = animator;
    }

    /// Select the tab at `index` and show it in the container
    ///
    /// Ignored when `index` is already selected or out of range.
    pub fn set_selected_index(&self, index: usize) {
        if !self.select(index) {
            return;
        }
        self.container.select(index);
    }

    /// Host-side selection, e.g. the user tapped a tab
    ///
    /// Follows the same path as [`TabCoordinator::set_selected_index`] without
    /// echoing the selection back to the container. Unknown presentables are
    /// ignored.
    pub fn did_select(&self, presentable: &PresentableRef) {
        let Some(index) = self
            .tab_presentables
            .iter()
            .position(|tab| same_presentable(tab, presentable))
        else {
            trace!(coordinator = %self.id(), "selection of unknown presentable ignored");
            return;
        };
        self.select(index);
    }

    fn switch_tab(&self, to: usize, from: usize) {
        if to == from || to >= self.tabs.len() {
            trace!(coordinator = %self.id(), to, from, "tab switch ignored");
            return;
        }

        if let Some(source) = self.tabs.get(from) {
            self.pause_child(source);
        }

        let destination = &self.tabs[to];
        if destination.is_inactive() {
            self.start_child(destination);
        } else if destination.is_paused() {
            self.resume_child(destination);
        }
        debug!(coordinator = %self.id(), to, from, "switched tab");
    }

    fn select(&self, index: usize) -> bool {
        let current = self.selected.get();
        if index == current || index >= self.tabs.len() {
            trace!(coordinator = %self.id(), index, current, "selection ignored");
            return false;
        }
        self.selected.set(index);
        self.switch_tab(index, current);
        true
    }
}

impl CoordinatorListener for TabCoordinator {
    fn on_event(&self, source: &CoordinatorRef, event: CoordinatorEvent) {
        if event == CoordinatorEvent::DidRequestDismissal {
            trace!(coordinator = %self.id(), child = %source.core().id(), "tabs cannot be dismissed");
        }
    }
}

impl Coordinator for TabCoordinator {
    fn core(&self) -> &CoordinatorCore {
        &self.core
    }

    fn on_start(&self) {
        self.container.load();
        if let Some(selected) = self.selected() {
            self.start_child(&selected);
        }
    }

    fn resumes_child(&self, child: &CoordinatorRef) -> bool {
        // unselected tabs stay paused
        let id = child.core().id();
        let selected = self.selected.get();
        !self
            .tabs
            .iter()
            .enumerate()
            .any(|(index, tab)| index != selected && tab.id() == id)
    }
}

impl Scene for TabCoordinator {
    fn presentable(&self) -> PresentableRef {
        self.presentable.clone()
    }

    fn animator(&self) -> Option<AnimatorRef> {
        self.animator.borrow().clone()
    }
}
