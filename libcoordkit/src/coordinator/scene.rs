//! Scene coordinators
//!
//! A scene coordinator owns exactly one presentable and shows its children
//! through an [`Animator`]. [`SceneCoordinator`] is the ready-made version;
//! custom scenes embed a [`CoordinatorCore`] next to a [`SceneCore`] and
//! implement [`Scene`] themselves.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, trace};

use crate::animator::{AnimatorRef, SceneAnimator};
use crate::coordinator::{Coordinator, CoordinatorCore, CoordinatorExt, CoordinatorRef};
use crate::error::PresentableError;
use crate::events::{CoordinatorEvent, CoordinatorListener};
use crate::host::instantiate::{NibLoadable, Storyboarded};
use crate::host::{Completion, Presentable, PresentableRef};

/// Shared handle to any scene
pub type SceneRef = Rc<dyn Scene>;

/// Coordinator owning a presentable
pub trait Scene: Coordinator {
    fn presentable(&self) -> PresentableRef;

    /// Animator configured on this scene
    fn animator(&self) -> Option<AnimatorRef>;

    /// Animator used to show `child`. Defaults to [`Scene::animator`].
    fn animator_for_presenting(&self, _child: &SceneRef) -> Option<AnimatorRef> {
        self.animator()
    }

    /// Animator used to take `child` off screen. Defaults to [`Scene::animator`].
    fn animator_for_dismissing(&self, _child: &SceneRef) -> Option<AnimatorRef> {
        self.animator()
    }

    /// Put an adopted `child` on screen
    ///
    /// Called by [`SceneExt::start_scene`]. The default hands the child's
    /// presentable to [`Scene::animator_for_presenting`].
    fn present_child(&self, child: &SceneRef, animated: bool, completion: Option<Completion>) {
        match self.animator_for_presenting(child) {
            Some(animator) => {
                animator.present(&self.presentable(), &child.presentable(), animated, completion)
            }
            None => trace!(parent = %self.id(), child = %child.id(), "no animator, not presenting"),
        }
    }

    /// Take a released `child` off screen
    ///
    /// Called by [`SceneExt::stop_scene`] after the child was stopped.
    fn dismiss_child(&self, child: &SceneRef, animated: bool, completion: Option<Completion>) {
        match self.animator_for_dismissing(child) {
            Some(animator) => animator.dismiss(&child.presentable(), animated, completion),
            None => trace!(parent = %self.id(), child = %child.id(), "no animator, not dismissing"),
        }
    }
}

/// Presentation-aware child management for every scene
pub trait SceneExt: Scene {
    /// Adopt and start `child`, then show its presentable
    fn start_scene(&self, child: &SceneRef, animated: bool, completion: Option<Completion>) {
        if self.has_child(child) {
            trace!(parent = %self.id(), child = %child.id(), "scene already started");
            return;
        }
        self.start_child(child);
        if !self.has_child(child) {
            return;
        }
        self.present_child(child, animated, completion);
    }

    /// Stop and release `child`, then take its presentable off screen
    fn stop_scene(&self, child: &SceneRef, animated: bool, completion: Option<Completion>) {
        if !self.has_child(child) {
            trace!(parent = %self.id(), child = %child.id(), "stop of unknown scene ignored");
            return;
        }
        self.stop_child(child);
        self.dismiss_child(child, animated, completion);
    }

    /// Ask whoever presented this scene to take it off screen
    fn request_dismissal(&self) {
        debug!(coordinator = %self.id(), "dismissal requested");
        self.core().broadcast(CoordinatorEvent::DidRequestDismissal);
    }
}

impl<T: Scene + ?Sized> SceneExt for T {}

/// Presentable and animator storage for scene implementations
pub struct SceneCore<P: Presentable> {
    presentable: Rc<P>,
    animator: RefCell<Option<AnimatorRef>>,
    loaded: Cell<bool>,
}

impl<P: Presentable> SceneCore<P> {
    /// Scene state with the default [`SceneAnimator`]
    pub fn new(presentable: Rc<P>) -> Self {
        let animator: AnimatorRef = Rc::new(SceneAnimator);
        Self {
            presentable,
            animator: RefCell::new(Some(animator)),
            loaded: Cell::new(false),
        }
    }

    pub fn presentable(&self) -> &Rc<P> {
        &self.presentable
    }

    /// The presentable as a type-erased handle
    pub fn presentable_ref(&self) -> PresentableRef {
        self.presentable.clone()
    }

    pub fn animator(&self) -> Option<AnimatorRef> {
        self.animator.borrow().clone()
    }

    pub fn set_animator(&self, animator: Option<AnimatorRef>) {
        *self.animator.borrow_mut() = animator;
    }

    /// Load the presentable unless an earlier call already did
    pub fn load(&self) {
        if self.loaded.replace(true) {
            return;
        }
        self.presentable.load();
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }
}

/// Coordinator managing a single presentable of type `P`
pub struct SceneCoordinator<P: Presentable> {
    core: CoordinatorCore,
    scene: SceneCore<P>,
}

impl<P: Presentable> SceneCoordinator<P> {
    pub fn with_presentable(presentable: Rc<P>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            core: CoordinatorCore::new(this),
            scene: SceneCore::new(presentable),
        })
    }

    /// Typed access to the owned presentable
    pub fn screen(&self) -> &Rc<P> {
        self.scene.presentable()
    }

    /// Replace the animator used for children. `None` disables transitions.
    pub fn set_animator(&self, animator: Option<AnimatorRef>) {
        self.scene.set_animator(animator);
    }
}

impl<P: Presentable + Default> SceneCoordinator<P> {
    pub fn new() -> Rc<Self> {
        Self::with_presentable(Rc::new(P::default()))
    }
}

impl<P: Presentable + Storyboarded> SceneCoordinator<P> {
    /// Scene whose presentable comes from its storyboard
    pub fn from_storyboard() -> Result<Rc<Self>, PresentableError> {
        let presentable = P::storyboard_instance()?;
        Ok(Self::with_presentable(Rc::new(presentable)))
    }
}

impl<P: Presentable + NibLoadable> SceneCoordinator<P> {
    /// Scene whose presentable comes from its nib
    pub fn from_nib() -> Rc<Self> {
        Self::with_presentable(Rc::new(P::nib_instance()))
    }
}

impl<P: Presentable> CoordinatorListener for SceneCoordinator<P> {
    fn on_event(&self, source: &CoordinatorRef, event: CoordinatorEvent) {
        if event == CoordinatorEvent::DidRequestDismissal {
            trace!(coordinator = %self.core.id(), child = %source.core().id(), "dismissal request not handled");
        }
    }
}

impl<P: Presentable> Coordinator for SceneCoordinator<P> {
    fn core(&self) -> &CoordinatorCore {
        &self.core
    }

    fn on_start(&self) {
        self.scene.load();
    }
}

impl<P: Presentable> Scene for SceneCoordinator<P> {
    fn presentable(&self) -> PresentableRef {
        self.scene.presentable_ref()
    }

    fn animator(&self) -> Option<AnimatorRef> {
        self.scene.animator()
    }
}

impl<P: Presentable> std::fmt::Debug for SceneCoordinator<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneCoordinator")
            .field("core", &self.core)
            .field("presentable", &self.scene.presentable().name())
            .finish()
    }
}
