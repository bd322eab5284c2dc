//! # metascope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the metascope library. Import this module to get quick access to the essential
//! types for navigating a reflected type system and invoking its members.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all metascope operations
pub use crate::Error;

/// The result type used throughout metascope
pub use crate::Result;

// ================================================================================================
// Host Type System
// ================================================================================================

/// Reflected types and their owner
pub use crate::metadata::typesystem::{
    CilFlavor, CilType, CilTypeRc, TypeBuilder, TypeRegistry, WELL_KNOWN,
};

/// Assemblies and members
pub use crate::metadata::tables::{
    Assembly, AssemblyRc, Event, Field, FieldAttributes, Param, Property,
};

/// Methods and constructors
pub use crate::metadata::method::{Method, MethodRc};

/// Runtime values
pub use crate::metadata::value::{Object, Value};

/// Entity identity
pub use crate::metadata::token::Token;

// ================================================================================================
// Navigation, Attributes and Invocation
// ================================================================================================

/// Custom attributes and their cache
pub use crate::metadata::customattributes::{
    AttributeCache, AttributeProvider, CustomAttributeArgument, CustomAttributeValue,
};

/// The navigation tree
pub use crate::metadata::node::{
    AssemblyNode, BindingFlags, EventNode, FieldNode, MetadataNode, MethodNode, NodeKind,
    ParameterNode, PropertyNode, TypeNode,
};

/// Uniform property and field access
pub use crate::metadata::datamember::DataMember;

/// Argument binding and invocation
pub use crate::metadata::invoke::{bind_arguments, invoke, BindingFailure, ParameterSpec};

/// Type introspection
pub use crate::metadata::typesystem::introspection::{
    collection_item_type, implements_generic_definition, is_instance_of_type, is_nullable,
    is_nullable_type, non_nullable_type,
};
