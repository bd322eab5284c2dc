//! Host entity tables of the reflected type system.
//!
//! Every reflected entity besides types and methods lives here: assemblies, fields, parameters,
//! properties and events. Each entity carries a process-unique [`crate::metadata::token::Token`],
//! its custom attributes, and weak back references to whatever declares it.
//!
//! Entities are built with small fluent constructors and become shared (`Arc`) once attached to
//! their declaring type, see [`crate::metadata::typesystem::CilType`].

mod assembly;
mod event;
mod field;
mod param;
mod property;

pub use assembly::*;
pub use event::*;
pub use field::*;
pub use param::*;
pub use property::*;
