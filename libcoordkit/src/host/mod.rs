//! Host toolkit abstraction
//!
//! Coordinators never touch screens directly. Everything they need from the
//! UI toolkit goes through the traits in this module:
//!
//! - [`Presentable`]: a screen owned 1:1 by a scene coordinator
//! - [`StackContainer`]: a push/pop navigation container
//! - [`TabContainer`]: a container showing one of several sibling screens
//!
//! The host calls back into the coordinator tree when something changed on
//! its side (`NavigationCoordinator::did_show`, `TabCoordinator::did_select`).
//!
//! All callbacks run on the UI thread. Completions passed to the host are
//! invoked whenever the transition finishes, which may be long after the
//! call that requested it returned.

use std::rc::Rc;

pub mod instantiate;

// Mock host is available for all builds (not just tests) to support integration tests
pub mod mock;

/// Callback fired once a transition finishes
pub type Completion = Box<dyn FnOnce()>;

/// Shared handle to a presentable
pub type PresentableRef = Rc<dyn Presentable>;

/// Screen-level UI element owned by a scene coordinator
pub trait Presentable: 'static {
    /// Name used in logs
    fn name(&self) -> &str {
        instantiate::short_type_name::<Self>()
    }

    /// Load the underlying view. Called when the owning coordinator starts.
    fn load(&self);

    /// Present `presented` modally on top of this element
    fn present(&self, presented: &PresentableRef, animated: bool, completion: Option<Completion>);

    /// Dismiss this element if it was presented modally
    fn dismiss(&self, animated: bool, completion: Option<Completion>);
}

/// Stack-based navigation container
pub trait StackContainer: Presentable {
    /// Replace the whole stack with `root`, without animation
    fn set_root(&self, root: &PresentableRef);

    fn push(&self, presentable: &PresentableRef, animated: bool, completion: Option<Completion>);

    fn pop(&self, animated: bool, completion: Option<Completion>);

    fn pop_to(&self, presentable: &PresentableRef, animated: bool);

    fn pop_to_root(&self, animated: bool);

    fn set_navigation_bar_hidden(&self, hidden: bool, animated: bool);
}

/// Container switching between sibling presentables
pub trait TabContainer: Presentable {
    fn set_presentables(&self, presentables: &[PresentableRef], animated: bool);

    /// Show the presentable at `index`
    fn select(&self, index: usize);
}

/// Identity comparison for presentables
///
/// Compares data addresses only, so two handles to the same element are
/// equal even when they were coerced through different vtables.
pub fn same_presentable(a: &PresentableRef, b: &PresentableRef) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

#[cfg(test)]
mod tests {
    use super::mock::MockPresentable;
    use super::*;

    #[test]
    fn test_same_presentable_identity() {
        let first = MockPresentable::new("first");
        let first_ref: PresentableRef = first.clone();
        let again: PresentableRef = first;
        let second: PresentableRef = MockPresentable::new("first");

        assert!(same_presentable(&first_ref, &again));
        assert!(!same_presentable(&first_ref, &second));
    }
}
