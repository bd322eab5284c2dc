//! Property entity implementation
//!
//! A property is a named value of a type exposed through accessor methods: an optional getter and
//! an optional setter. Indexed properties (indexers) declare index parameters on their accessors.
use std::sync::Arc;

mod owned;

pub use owned::*;

/// A vector that holds a list of `Property`
pub type PropertyList = Arc<boxcar::Vec<PropertyRc>>;
/// A reference to a `Property`
pub type PropertyRc = Arc<Property>;

