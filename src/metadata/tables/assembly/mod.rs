//! Assembly entity implementation
//!
//! An assembly is the root of a reflected type system: a named, versioned container that lists
//! the types it declares in declaration order. Assemblies are owned by the
//! [`crate::metadata::typesystem::TypeRegistry`] that defined them; types refer back to their
//! assembly through a weak [`AssemblyRef`].
use std::sync::{Arc, Weak};

mod owned;

pub use owned::*;

/// A reference to an `Assembly`
pub type AssemblyRc = Arc<Assembly>;

/// A weak reference to an `Assembly`, used for back references from types
#[derive(Clone, Debug)]
pub struct AssemblyRef {
    weak_ref: Weak<Assembly>,
}

impl AssemblyRef {
    /// Create a new `AssemblyRef` from a strong reference
    pub fn new(strong_ref: &AssemblyRc) -> Self {
        AssemblyRef {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the assembly, if it is still alive
    pub fn upgrade(&self) -> Option<AssemblyRc> {
        self.weak_ref.upgrade()
    }
}
