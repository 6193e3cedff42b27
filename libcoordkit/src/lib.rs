//! Coordkit - coordinator trees for driving application flow
//!
//! This library keeps screen-transition logic out of the screens. A tree of
//! coordinators mirrors the UI's presentation hierarchy: scene coordinators
//! own one screen each, navigation coordinators keep a stack of flows in
//! sync with a host navigation container, and tab coordinators run one of
//! several sibling flows at a time.
//!
//! The UI toolkit is reached only through the traits in [`host`].

pub mod animator;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod host;
pub mod logging;
pub mod stack;

// Re-export commonly used types
pub use animator::{Animator, AnimatorRef, NavigationAnimator, SceneAnimator};
pub use config::{Config, DesyncPolicy, NavigationConfig};
pub use coordinator::navigation::NavigationCoordinator;
pub use coordinator::scene::{Scene, SceneCoordinator, SceneExt, SceneRef};
pub use coordinator::tab::TabCoordinator;
pub use coordinator::{
    Coordinator, CoordinatorCore, CoordinatorExt, CoordinatorId, CoordinatorRef, CoordinatorState,
    FlowCoordinator,
};
pub use error::{CoordinatorError, NavigationError, Result};
pub use events::{Broadcaster, CoordinatorEvent, CoordinatorListener};
pub use host::{Presentable, PresentableRef, StackContainer, TabContainer};
pub use stack::Stack;
