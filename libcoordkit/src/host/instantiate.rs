//! Construction contracts for presentables
//!
//! A scene coordinator creates its presentable in one of three ways:
//!
//! - default construction (`P: Default`)
//! - lookup in a storyboard by identifier ([`Storyboarded`])
//! - loading from a nib by name ([`NibLoadable`])
//!
//! Identifiers and nib names default to the presentable's short type name,
//! so `app::screens::LoginScreen` is looked up as `"LoginScreen"`.

use tracing::debug;

use crate::error::PresentableError;

/// Last path segment of a type's name, without generic arguments
///
/// ```
/// use libcoordkit::host::instantiate::short_type_name;
///
/// struct LoginScreen;
/// assert_eq!(short_type_name::<LoginScreen>(), "LoginScreen");
/// assert_eq!(short_type_name::<Vec<String>>(), "Vec");
/// ```
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Host storyboard able to instantiate `P` by identifier
pub trait StoryboardSource<P> {
    fn instantiate(&self, identifier: &str) -> Option<P>;
}

/// Host nib bundle able to load `P` by nib name
pub trait NibSource<P> {
    fn load_nib(&self, name: &str) -> Option<P>;
}

/// Presentable that lives in a storyboard
pub trait Storyboarded: Sized {
    type Storyboard: StoryboardSource<Self>;

    fn storyboard() -> Self::Storyboard;

    fn storyboard_identifier() -> String {
        short_type_name::<Self>().to_string()
    }

    fn storyboard_instance() -> Result<Self, PresentableError> {
        let identifier = Self::storyboard_identifier();
        Self::storyboard()
            .instantiate(&identifier)
            .ok_or(PresentableError::StoryboardEntryMissing { identifier })
    }
}

/// Presentable that lives in its own nib
///
/// Falls back to `Default` when the nib holds no matching element.
pub trait NibLoadable: Sized + Default {
    type Loader: NibSource<Self>;

    fn nib_loader() -> Self::Loader;

    fn nib_name() -> String {
        short_type_name::<Self>().to_string()
    }

    fn nib_instance() -> Self {
        let name = Self::nib_name();
        match Self::nib_loader().load_nib(&name) {
            Some(instance) => instance,
            None => {
                debug!(nib = %name, "nib has no matching element, using default instance");
                Self::default()
            }
        }
    }
}
