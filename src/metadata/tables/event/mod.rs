//! Event entity implementation
//!
//! An event is a notification source of a type. Handlers (delegates of the event's handler type)
//! are subscribed and unsubscribed through the add and remove accessors; an optional raise
//! accessor and any number of additional accessor methods may be declared as well.
use std::sync::Arc;

mod owned;

pub use owned::*;

/// A vector that holds a list of `Event`
pub type EventList = Arc<boxcar::Vec<EventRc>>;
/// A reference to an `Event`
pub type EventRc = Arc<Event>;

