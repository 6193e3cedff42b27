//! Mock host implementation for testing
//!
//! Simulates the parts of a UI toolkit the coordinators talk to: plain
//! screens, a navigation container and a tab container. Every call is
//! recorded for verification, and completions are held back until the test
//! calls `complete_transitions`, the same way a real toolkit only fires
//! them once an animation ends.
//!
//! The mocks never call back into the coordinator tree on their own. Tests
//! drive host-side changes explicitly, e.g. `simulate_back_gesture` followed
//! by `NavigationCoordinator::did_show`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::coordinator::{CoordinatorId, CoordinatorRef};
use crate::events::{CoordinatorEvent, CoordinatorListener};
use crate::host::{
    same_presentable, Completion, Presentable, PresentableRef, StackContainer, TabContainer,
};

/// Call recorded on a presentable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentableOp {
    Load,
    Present { presented: String, animated: bool },
    Dismiss { animated: bool },
}

/// Call recorded on a stack container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackOp {
    SetRoot(String),
    Push { pushed: String, animated: bool },
    Pop { animated: bool },
    PopTo { target: String, animated: bool },
    PopToRoot { animated: bool },
    SetNavigationBarHidden { hidden: bool, animated: bool },
}

/// Call recorded on a tab container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabOp {
    SetPresentables(Vec<String>),
    Select(usize),
}

/// Bookkeeping shared by every mock element
#[derive(Default)]
struct Recorder {
    ops: RefCell<Vec<PresentableOp>>,
    completions: RefCell<Vec<Completion>>,
}

impl Recorder {
    fn record(&self, op: PresentableOp, completion: Option<Completion>) {
        self.ops.borrow_mut().push(op);
        if let Some(completion) = completion {
            self.completions.borrow_mut().push(completion);
        }
    }

    fn defer(&self, completion: Option<Completion>) {
        if let Some(completion) = completion {
            self.completions.borrow_mut().push(completion);
        }
    }

    fn complete(&self) -> usize {
        let pending: Vec<Completion> = self.completions.borrow_mut().drain(..).collect();
        let count = pending.len();
        for completion in pending {
            completion();
        }
        count
    }
}

/// Mock screen
pub struct MockPresentable {
    name: String,
    recorder: Recorder,
}

impl MockPresentable {
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self::named(name))
    }

    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            recorder: Recorder::default(),
        }
    }

    /// Every call made on this presentable, oldest first
    pub fn ops(&self) -> Vec<PresentableOp> {
        self.recorder.ops.borrow().clone()
    }

    pub fn load_count(&self) -> usize {
        self.recorder
            .ops
            .borrow()
            .iter()
            .filter(|op| **op == PresentableOp::Load)
            .count()
    }

    pub fn pending_completions(&self) -> usize {
        self.recorder.completions.borrow().len()
    }

    /// Fire every held-back completion. Returns how many ran.
    pub fn complete_transitions(&self) -> usize {
        self.recorder.complete()
    }
}

impl Default for MockPresentable {
    fn default() -> Self {
        Self::named("mock")
    }
}

impl Presentable for MockPresentable {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) {
        self.recorder.record(PresentableOp::Load, None);
    }

    fn present(&self, presented: &PresentableRef, animated: bool, completion: Option<Completion>) {
        self.recorder.record(
            PresentableOp::Present {
                presented: presented.name().to_string(),
                animated,
            },
            completion,
        );
    }

    fn dismiss(&self, animated: bool, completion: Option<Completion>) {
        self.recorder
            .record(PresentableOp::Dismiss { animated }, completion);
    }
}

/// Mock navigation container
///
/// Keeps its own visible stack so tests can compare it with the
/// coordinator's bookkeeping.
pub struct MockStackContainer {
    name: String,
    recorder: Recorder,
    visible: RefCell<Vec<PresentableRef>>,
    stack_ops: RefCell<Vec<StackOp>>,
    navigation_bar_hidden: Cell<bool>,
}

impl MockStackContainer {
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            recorder: Recorder::default(),
            visible: RefCell::new(Vec::new()),
            stack_ops: RefCell::new(Vec::new()),
            navigation_bar_hidden: Cell::new(false),
        })
    }

    pub fn ops(&self) -> Vec<StackOp> {
        self.stack_ops.borrow().clone()
    }

    pub fn presentable_ops(&self) -> Vec<PresentableOp> {
        self.recorder.ops.borrow().clone()
    }

    /// Names of the visible stack, bottom first
    pub fn visible_names(&self) -> Vec<String> {
        self.visible
            .borrow()
            .iter()
            .map(|presentable| presentable.name().to_string())
            .collect()
    }

    pub fn top(&self) -> Option<PresentableRef> {
        self.visible.borrow().last().cloned()
    }

    pub fn depth(&self) -> usize {
        self.visible.borrow().len()
    }

    pub fn is_navigation_bar_hidden(&self) -> bool {
        self.navigation_bar_hidden.get()
    }

    pub fn pending_completions(&self) -> usize {
        self.recorder.completions.borrow().len()
    }

    pub fn complete_transitions(&self) -> usize {
        self.recorder.complete()
    }

    /// Interactive back gesture: drop the top element without involving
    /// the coordinator. Returns the element that became visible.
    pub fn simulate_back_gesture(&self) -> Option<PresentableRef> {
        let mut visible = self.visible.borrow_mut();
        if visible.len() > 1 {
            visible.pop();
        }
        visible.last().cloned()
    }

    /// Push straight onto the host stack, bypassing the coordinator
    pub fn simulate_external_push(&self, presentable: &PresentableRef) {
        self.visible.borrow_mut().push(presentable.clone());
    }

    fn truncate_to(&self, target: &PresentableRef) {
        let mut visible = self.visible.borrow_mut();
        if let Some(position) = visible
            .iter()
            .position(|presentable| same_presentable(presentable, target))
        {
            visible.truncate(position + 1);
        }
    }
}

impl Presentable for MockStackContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) {
        self.recorder.record(PresentableOp::Load, None);
    }

    fn present(&self, presented: &PresentableRef, animated: bool, completion: Option<Completion>) {
        self.recorder.record(
            PresentableOp::Present {
                presented: presented.name().to_string(),
                animated,
            },
            completion,
        );
    }

    fn dismiss(&self, animated: bool, completion: Option<Completion>) {
        self.recorder
            .record(PresentableOp::Dismiss { animated }, completion);
    }
}

impl StackContainer for MockStackContainer {
    fn set_root(&self, root: &PresentableRef) {
        self.stack_ops
            .borrow_mut()
            .push(StackOp::SetRoot(root.name().to_string()));
        *self.visible.borrow_mut() = vec![root.clone()];
    }

    fn push(&self, presentable: &PresentableRef, animated: bool, completion: Option<Completion>) {
        self.stack_ops.borrow_mut().push(StackOp::Push {
            pushed: presentable.name().to_string(),
            animated,
        });
        self.visible.borrow_mut().push(presentable.clone());
        self.recorder.defer(completion);
    }

    fn pop(&self, animated: bool, completion: Option<Completion>) {
        self.stack_ops.borrow_mut().push(StackOp::Pop { animated });
        {
            let mut visible = self.visible.borrow_mut();
            if visible.len() > 1 {
                visible.pop();
            }
        }
        self.recorder.defer(completion);
    }

    fn pop_to(&self, presentable: &PresentableRef, animated: bool) {
        self.stack_ops.borrow_mut().push(StackOp::PopTo {
            target: presentable.name().to_string(),
            animated,
        });
        self.truncate_to(presentable);
    }

    fn pop_to_root(&self, animated: bool) {
        self.stack_ops
            .borrow_mut()
            .push(StackOp::PopToRoot { animated });
        self.visible.borrow_mut().truncate(1);
    }

    fn set_navigation_bar_hidden(&self, hidden: bool, animated: bool) {
        self.stack_ops
            .borrow_mut()
            .push(StackOp::SetNavigationBarHidden { hidden, animated });
        self.navigation_bar_hidden.set(hidden);
    }
}

/// Mock tab container
pub struct MockTabContainer {
    name: String,
    recorder: Recorder,
    presentables: RefCell<Vec<PresentableRef>>,
    selected: Cell<usize>,
    tab_ops: RefCell<Vec<TabOp>>,
}

impl MockTabContainer {
    pub fn new(name: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            recorder: Recorder::default(),
            presentables: RefCell::new(Vec::new()),
            selected: Cell::new(0),
            tab_ops: RefCell::new(Vec::new()),
        })
    }

    pub fn ops(&self) -> Vec<TabOp> {
        self.tab_ops.borrow().clone()
    }

    pub fn presentable_ops(&self) -> Vec<PresentableOp> {
        self.recorder.ops.borrow().clone()
    }

    pub fn selected(&self) -> usize {
        self.selected.get()
    }

    pub fn tab_names(&self) -> Vec<String> {
        self.presentables
            .borrow()
            .iter()
            .map(|presentable| presentable.name().to_string())
            .collect()
    }

    /// User taps a tab. Returns the presentable the host would report.
    pub fn simulate_tap(&self, index: usize) -> Option<PresentableRef> {
        let tapped = self.presentables.borrow().get(index).cloned()?;
        self.selected.set(index);
        Some(tapped)
    }
}

impl Presentable for MockTabContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) {
        self.recorder.record(PresentableOp::Load, None);
    }

    fn present(&self, presented: &PresentableRef, animated: bool, completion: Option<Completion>) {
        self.recorder.record(
            PresentableOp::Present {
                presented: presented.name().to_string(),
                animated,
            },
            completion,
        );
    }

    fn dismiss(&self, animated: bool, completion: Option<Completion>) {
        self.recorder
            .record(PresentableOp::Dismiss { animated }, completion);
    }
}

impl TabContainer for MockTabContainer {
    fn set_presentables(&self, presentables: &[PresentableRef], _animated: bool) {
        self.tab_ops.borrow_mut().push(TabOp::SetPresentables(
            presentables
                .iter()
                .map(|presentable| presentable.name().to_string())
                .collect(),
        ));
        *self.presentables.borrow_mut() = presentables.to_vec();
    }

    fn select(&self, index: usize) {
        self.tab_ops.borrow_mut().push(TabOp::Select(index));
        self.selected.set(index);
    }
}

/// Listener that records every event it receives
#[derive(Default)]
pub struct RecordingListener {
    records: RefCell<Vec<(CoordinatorId, CoordinatorEvent)>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Received events, oldest first
    pub fn events(&self) -> Vec<CoordinatorEvent> {
        self.records
            .borrow()
            .iter()
            .map(|(_, event)| *event)
            .collect()
    }

    /// Received events paired with the id of the coordinator that sent them
    pub fn records(&self) -> Vec<(CoordinatorId, CoordinatorEvent)> {
        self.records.borrow().clone()
    }

    pub fn events_from(&self, source: CoordinatorId) -> Vec<CoordinatorEvent> {
        self.records
            .borrow()
            .iter()
            .filter(|(id, _)| *id == source)
            .map(|(_, event)| *event)
            .collect()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl CoordinatorListener for RecordingListener {
    fn on_event(&self, source: &CoordinatorRef, event: CoordinatorEvent) {
        self.records
            .borrow_mut()
            .push((source.core().id(), event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_presentable_records_calls() {
        let presentable = MockPresentable::new("home");
        let other: PresentableRef = MockPresentable::new("settings");

        presentable.load();
        presentable.present(&other, true, None);
        presentable.dismiss(false, None);

        assert_eq!(presentable.name(), "home");
        assert_eq!(presentable.load_count(), 1);
        assert_eq!(
            presentable.ops(),
            vec![
                PresentableOp::Load,
                PresentableOp::Present {
                    presented: "settings".to_string(),
                    animated: true
                },
                PresentableOp::Dismiss { animated: false },
            ]
        );
    }

    #[test]
    fn test_completions_are_deferred() {
        let presentable = MockPresentable::new("home");
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();

        presentable.dismiss(true, Some(Box::new(move || flag.set(true))));
        assert!(!fired.get());
        assert_eq!(presentable.pending_completions(), 1);

        assert_eq!(presentable.complete_transitions(), 1);
        assert!(fired.get());
        assert_eq!(presentable.pending_completions(), 0);
    }

    #[test]
    fn test_stack_container_tracks_visible_stack() {
        let container = MockStackContainer::new("nav");
        let root: PresentableRef = MockPresentable::new("root");
        let detail: PresentableRef = MockPresentable::new("detail");
        let extra: PresentableRef = MockPresentable::new("extra");

        container.set_root(&root);
        container.push(&detail, true, None);
        container.push(&extra, true, None);
        assert_eq!(container.visible_names(), vec!["root", "detail", "extra"]);

        container.pop_to(&detail, false);
        assert_eq!(container.visible_names(), vec!["root", "detail"]);

        container.pop_to_root(true);
        assert_eq!(container.visible_names(), vec!["root"]);

        container.pop(true, None);
        assert_eq!(container.depth(), 1);
    }

    #[test]
    fn test_back_gesture_keeps_root() {
        let container = MockStackContainer::new("nav");
        let root: PresentableRef = MockPresentable::new("root");
        let detail: PresentableRef = MockPresentable::new("detail");
        container.set_root(&root);
        container.push(&detail, true, None);

        let shown = container.simulate_back_gesture().unwrap();
        assert!(same_presentable(&shown, &root));

        let shown = container.simulate_back_gesture().unwrap();
        assert!(same_presentable(&shown, &root));
        assert_eq!(container.depth(), 1);
    }

    #[test]
    fn test_tab_container_tap() {
        let container = MockTabContainer::new("tabs");
        let first: PresentableRef = MockPresentable::new("first");
        let second: PresentableRef = MockPresentable::new("second");
        container.set_presentables(&[first, second.clone()], false);

        let tapped = container.simulate_tap(1).unwrap();
        assert!(same_presentable(&tapped, &second));
        assert_eq!(container.selected(), 1);
        assert!(container.simulate_tap(5).is_none());
        assert_eq!(container.tab_names(), vec!["first", "second"]);
    }
}
