//! Reflected type system and the navigation, data member and invocation layers built on it.
//!
//! The host model ([`typesystem`], [`tables`], [`method`], [`value`]) describes an already
//! loaded program: assemblies, types, their members and parameters, and the runtime values
//! flowing through field access and calls. The layers on top consume it:
//!
//! - [`customattributes`] - attribute values and the process-wide [`customattributes::AttributeCache`]
//! - [`node`] - the [`node::MetadataNode`] tree (assembly → type → member → parameter)
//! - [`datamember`] - uniform get/set over properties and fields
//! - [`invoke`] - argument binding and method invocation
//!
//! # Examples
//!
//! ```rust
//! use metascope::metadata::{
//!     node::{MetadataNode, NodeKind},
//!     typesystem::{TypeBuilder, TypeRegistry},
//! };
//!
//! let registry = TypeRegistry::new()?;
//! let assembly = registry.define_assembly("Sample");
//! TypeBuilder::new(&registry, &assembly, "Sample", "Empty").build()?;
//!
//! let root = MetadataNode::from(&assembly);
//! assert_eq!(root.kind(), NodeKind::Assembly);
//! assert_eq!(root.children().len(), 1);
//! # Ok::<(), metascope::Error>(())
//! ```

/// Custom attribute values and the memoizing attribute cache
pub mod customattributes;
/// Uniform get/set access to properties and fields
pub mod datamember;
/// Argument binding and reflective invocation
pub mod invoke;
/// Methods and constructors
pub mod method;
/// The metadata navigation tree
pub mod node;
/// Assemblies, fields, parameters, properties and events
pub mod tables;
/// Entity identities
pub mod token;
/// Types, the type registry and type introspection
pub mod typesystem;
/// Runtime values
pub mod value;
