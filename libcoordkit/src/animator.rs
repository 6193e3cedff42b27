//! Transition strategies
//!
//! A scene coordinator asks its animator to put a child's presentable on
//! screen and to take it off again. Two strategies ship with the crate:
//!
//! - [`SceneAnimator`]: modal presentation on the parent's presentable
//! - [`NavigationAnimator`]: push and pop through the navigation
//!   coordinator, which only moves its container in step with its stacks
//!
//! Custom transitions implement [`Animator`] and are installed with
//! `SceneCoordinator::set_animator`.

use std::rc::{Rc, Weak};

use crate::coordinator::navigation::NavigationCoordinator;
use crate::host::{Completion, PresentableRef};

/// Shared handle to an animator
pub type AnimatorRef = Rc<dyn Animator>;

/// Performs the visual transition between two presentables
pub trait Animator {
    /// Show `destination` on top of `source`
    fn present(
        &self,
        source: &PresentableRef,
        destination: &PresentableRef,
        animated: bool,
        completion: Option<Completion>,
    );

    /// Take `presentable` off screen
    fn dismiss(&self, presentable: &PresentableRef, animated: bool, completion: Option<Completion>);
}

/// Modal present/dismiss, the default for scene coordinators
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneAnimator;

impl Animator for SceneAnimator {
    fn present(
        &self,
        source: &PresentableRef,
        destination: &PresentableRef,
        animated: bool,
        completion: Option<Completion>,
    ) {
        source.present(destination, animated, completion);
    }

    fn dismiss(&self, presentable: &PresentableRef, animated: bool, completion: Option<Completion>) {
        presentable.dismiss(animated, completion);
    }
}

/// Push/pop transitions on a navigation coordinator's container
pub struct NavigationAnimator {
    navigation: Weak<NavigationCoordinator>,
}

impl NavigationAnimator {
    pub(crate) fn new(navigation: Weak<NavigationCoordinator>) -> Self {
        Self { navigation }
    }
}

impl Animator for NavigationAnimator {
    fn present(
        &self,
        _source: &PresentableRef,
        destination: &PresentableRef,
        animated: bool,
        completion: Option<Completion>,
    ) {
        if let Some(navigation) = self.navigation.upgrade() {
            navigation.push_presentable(destination, animated, completion);
        }
    }

    fn dismiss(&self, presentable: &PresentableRef, animated: bool, completion: Option<Completion>) {
        if let Some(navigation) = self.navigation.upgrade() {
            navigation.pop_presentable(presentable, animated, completion);
        }
    }
}

impl std::fmt::Debug for NavigationAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationAnimator")
            .field("attached", &(self.navigation.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::scene::{Scene, SceneCoordinator, SceneRef};
    use crate::coordinator::CoordinatorExt;
    use crate::host::mock::{MockPresentable, MockStackContainer, PresentableOp, StackOp};

    #[test]
    fn test_scene_animator_presents_modally() {
        let source = MockPresentable::new("source");
        let destination = MockPresentable::new("destination");
        let source_ref: PresentableRef = source.clone();
        let destination_ref: PresentableRef = destination.clone();

        SceneAnimator.present(&source_ref, &destination_ref, true, None);

        assert_eq!(
            source.ops(),
            vec![PresentableOp::Present {
                presented: "destination".to_string(),
                animated: true
            }]
        );
    }

    #[test]
    fn test_scene_animator_dismisses() {
        let presentable = MockPresentable::new("modal");
        let presentable_ref: PresentableRef = presentable.clone();

        SceneAnimator.dismiss(&presentable_ref, false, None);

        assert_eq!(
            presentable.ops(),
            vec![PresentableOp::Dismiss { animated: false }]
        );
    }

    #[test]
    fn test_detached_navigation_animator_is_inert() {
        let animator = NavigationAnimator::new(Weak::new());
        let source: PresentableRef = MockPresentable::new("source");
        let destination: PresentableRef = MockPresentable::new("destination");

        animator.present(&source, &destination, true, None);
        animator.dismiss(&destination, true, None);

        assert!(format!("{:?}", animator).contains("attached: false"));
    }

    #[test]
    fn test_navigation_animator_ignores_untracked_presentables() {
        let container = MockStackContainer::new("nav");
        let home: SceneRef = SceneCoordinator::with_presentable(MockPresentable::new("home"));
        let navigation = NavigationCoordinator::with_root(container.clone(), &home);
        navigation.start();
        let animator = navigation.animator().expect("navigation has an animator");
        let stranger: PresentableRef = MockPresentable::new("stranger");

        animator.present(&navigation.presentable(), &stranger, true, None);
        animator.present(&navigation.presentable(), &home.presentable(), true, None);
        animator.dismiss(&stranger, true, None);

        assert_eq!(container.ops(), vec![StackOp::SetRoot("home".to_string())]);
        assert_eq!(container.visible_names(), vec!["home"]);
        assert!(navigation.is_synchronized());
    }
}
