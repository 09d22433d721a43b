//! Comparator registry for opaque object parameters
//!
//! Object parameters carry a caller-chosen type tag and an `Rc<dyn Any>`
//! handle. The engine cannot compare or print them on its own, so a
//! [`Comparator`] has to be installed for the tag.
//!
//! Registries are cheap handles: clones share one table, much like
//! cloned runtimes share their queues. A registry is either passed
//! explicitly (per expectation or per expectation list) or made *current*
//! for the running thread with an RAII guard:
//!
//! ```rust,ignore
//! let registry = ComparatorRegistry::new();
//! let _guard = registry.make_current();          // setup
//! registry.install_comparator("Point", Rc::new(TypedComparator::<Point>::new()));
//! // ... expectations compare Point objects through the registry ...
//! // guard dropped: previous registry restored (teardown)
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::marker::PhantomData;
use std::rc::Rc;

/// Equality and formatting strategy for one opaque object type
pub trait Comparator {
    /// Whether two objects of this type are equal
    fn is_equal(&self, left: &dyn Any, right: &dyn Any) -> bool;

    /// Render an object of this type for diagnostics
    fn value_to_string(&self, object: &dyn Any) -> String;
}

/// Ready-made comparator for any `PartialEq + Display` type
///
/// Objects that are not a `T` never compare equal.
pub struct TypedComparator<T> {
    _marker: PhantomData<fn(&T)>,
}

impl<T> TypedComparator<T> {
    /// Create a comparator for `T`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for TypedComparator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for TypedComparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedComparator")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: PartialEq + Display + 'static> Comparator for TypedComparator<T> {
    fn is_equal(&self, left: &dyn Any, right: &dyn Any) -> bool {
        match (left.downcast_ref::<T>(), right.downcast_ref::<T>()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    fn value_to_string(&self, object: &dyn Any) -> String {
        object.downcast_ref::<T>().map_or_else(
            || format!("<not a {}>", std::any::type_name::<T>()),
            ToString::to_string,
        )
    }
}

thread_local! {
    static CURRENT_REGISTRY: RefCell<Option<ComparatorRegistry>> = const { RefCell::new(None) };
}

/// Type tag → comparator table
///
/// Keys are unique; installing under an existing tag replaces the entry.
#[derive(Clone, Default)]
pub struct ComparatorRegistry {
    comparators: Rc<RefCell<HashMap<String, Rc<dyn Comparator>>>>,
}

impl Debug for ComparatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let comparators = self.comparators.borrow();
        let mut types: Vec<&String> = comparators.keys().collect();
        types.sort();
        f.debug_struct("ComparatorRegistry")
            .field("types", &types)
            .finish()
    }
}

impl ComparatorRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `comparator` for `type_name`, returning the one it replaces
    pub fn install_comparator(
        &self,
        type_name: &str,
        comparator: Rc<dyn Comparator>,
    ) -> Option<Rc<dyn Comparator>> {
        tracing::debug!(type_name, "installing comparator");
        self.comparators
            .borrow_mut()
            .insert(type_name.to_string(), comparator)
    }

    /// Look up the comparator installed for `type_name`
    #[must_use]
    pub fn comparator_for_type(&self, type_name: &str) -> Option<Rc<dyn Comparator>> {
        self.comparators.borrow().get(type_name).cloned()
    }

    /// Number of installed comparators
    #[must_use]
    pub fn len(&self) -> usize {
        self.comparators.borrow().len()
    }

    /// Whether no comparator is installed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comparators.borrow().is_empty()
    }

    /// Remove every installed comparator
    pub fn clear(&self) {
        self.comparators.borrow_mut().clear();
    }

    /// Whether two handles share one table
    #[must_use]
    pub fn same_registry(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.comparators, &other.comparators)
    }

    /// The registry that is current on this thread, if any
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT_REGISTRY.with(|current| current.borrow().clone())
    }

    /// Replace the current registry on this thread, returning the previous one
    pub fn set_current(registry: Option<Self>) -> Option<Self> {
        CURRENT_REGISTRY.with(|current| std::mem::replace(&mut *current.borrow_mut(), registry))
    }

    /// Make this registry current until the returned guard is dropped
    pub fn make_current(&self) -> CurrentRegistryGuard {
        CurrentRegistryGuard {
            previous: Self::set_current(Some(self.clone())),
        }
    }

    /// The explicit registry if given, else the current one
    pub(crate) fn resolve(explicit: Option<&Self>) -> Option<Self> {
        explicit.cloned().or_else(Self::current)
    }
}

/// Restores the previously current registry when dropped
#[must_use = "the registry stops being current as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CurrentRegistryGuard {
    previous: Option<ComparatorRegistry>,
}

impl Drop for CurrentRegistryGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        // The slot may already be gone during thread teardown
        let _ = CURRENT_REGISTRY.try_with(|current| *current.borrow_mut() = previous);
    }
}
