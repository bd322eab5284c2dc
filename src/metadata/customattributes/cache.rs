//! Memoizing resolution of the custom attributes attached to reflected entities.
//!
//! Attribute lookup on an entity is a pure function of its identity, so the result is computed
//! once and shared afterwards. The [`AttributeCache`] maps entity tokens to immutable, ordered
//! attribute lists. Entries are never invalidated or evicted.
//!
//! # Thread Safety
//!
//! Resolution is a read-through-or-insert on a [`DashMap`]. Two threads racing on the first
//! access of the same entity may both run the resolver, but only one list is stored and every
//! caller observes that stored list. No shard lock is held while the resolver runs.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, OnceLock,
};

use dashmap::DashMap;
use tracing::trace;

use crate::{
    metadata::{
        customattributes::{CustomAttributeValueList, CustomAttributeValueRc},
        token::Token,
    },
    Result,
};

/// An immutable, ordered list of resolved attributes
pub type AttributeList = Arc<[CustomAttributeValueRc]>;

/// Anything that can carry custom attributes: assemblies, types, members and parameters
pub trait AttributeProvider {
    /// The identity of the entity; the null token denotes an absent entity
    fn token(&self) -> Token;

    /// The attributes declared on the entity, as supplied by the host
    fn custom_attributes(&self) -> &CustomAttributeValueList;
}

/// Memoizing store mapping entity tokens to their resolved attribute lists.
///
/// A process-wide instance ([`AttributeCache::global`]) backs every metadata node. Standalone
/// instances are useful to embed a private cache or to observe the resolver in tests.
///
/// # Examples
///
/// ```rust
/// use metascope::metadata::{
///     customattributes::{AttributeCache, CustomAttributeValue},
///     typesystem::{TypeBuilder, TypeRegistry},
/// };
///
/// let registry = TypeRegistry::new()?;
/// let assembly = registry.define_assembly("Sample");
/// let widget = TypeBuilder::new(&registry, &assembly, "Sample", "Widget")
///     .attribute(CustomAttributeValue::new("System.SerializableAttribute"))
///     .build()?;
///
/// let cache = AttributeCache::new();
/// let first = cache.resolve(&*widget)?;
/// let second = cache.resolve(&*widget)?;
///
/// assert_eq!(first.len(), 1);
/// assert_eq!(cache.computations(), 1);
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// # Ok::<(), metascope::Error>(())
/// ```
#[derive(Default)]
pub struct AttributeCache {
    entries: DashMap<Token, AttributeList>,
    computations: AtomicUsize,
}

impl AttributeCache {
    /// Create a new, empty cache
    pub fn new() -> Self {
        AttributeCache {
            entries: DashMap::new(),
            computations: AtomicUsize::new(0),
        }
    }

    /// The process-wide cache used by metadata nodes
    pub fn global() -> &'static AttributeCache {
        static GLOBAL: OnceLock<AttributeCache> = OnceLock::new();
        GLOBAL.get_or_init(AttributeCache::new)
    }

    /// Resolve the attributes of an entity, computing them on first access.
    ///
    /// ## Arguments
    /// * 'entity' - The entity to resolve the attributes of
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the entity is absent (null token).
    pub fn resolve(&self, entity: &dyn AttributeProvider) -> Result<AttributeList> {
        let token = entity.token();
        if token.is_null() {
            return Err(invalid_argument!("Cannot resolve attributes of an absent entity"));
        }

        if let Some(existing) = self.entries.get(&token) {
            return Ok(existing.value().clone());
        }

        let computed: AttributeList = entity
            .custom_attributes()
            .iter()
            .map(|(_, attribute)| attribute.clone())
            .collect();
        self.computations.fetch_add(1, Ordering::Relaxed);
        trace!(%token, count = computed.len(), "resolved custom attributes");

        Ok(self
            .entries
            .entry(token)
            .or_insert(computed)
            .value()
            .clone())
    }

    /// Returns true if the entity carries an attribute of the given type (full name)
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the entity is absent.
    pub fn has_attribute(&self, entity: &dyn AttributeProvider, attribute_type: &str) -> Result<bool> {
        Ok(self
            .resolve(entity)?
            .iter()
            .any(|attribute| attribute.is(attribute_type)))
    }

    /// Returns the first attribute of the given type (full name), if the entity carries one
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the entity is absent.
    pub fn find_attribute(
        &self,
        entity: &dyn AttributeProvider,
        attribute_type: &str,
    ) -> Result<Option<CustomAttributeValueRc>> {
        Ok(self
            .resolve(entity)?
            .iter()
            .find(|attribute| attribute.is(attribute_type))
            .cloned())
    }

    /// Number of times the resolver ran
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }

    /// Number of settled entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
