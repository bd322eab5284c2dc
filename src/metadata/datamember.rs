//! Uniform read and write access to the data members of a type.
//!
//! Properties and fields store values in different ways: a property is a pair of accessor
//! methods that may take index parameters, a field is a storage slot. The [`DataMember`] trait
//! hides that difference. It is implemented by
//! [`crate::metadata::node::PropertyNode`] and [`crate::metadata::node::FieldNode`].
//!
//! # Rules
//!
//! - Static members accept an absent instance; instance members require one.
//! - Fields ignore index arguments.
//! - Indexed properties (indexers) require at least one and at most as many indices as they
//!   declare; non-indexed properties reject indices.
//! - Property access goes through the accessor methods, with argument binding.
//!
//! # Examples
//!
//! ```rust
//! use metascope::metadata::{
//!     datamember::DataMember,
//!     node::FieldNode,
//!     tables::{Field, FieldAttributes},
//!     typesystem::{TypeBuilder, TypeRegistry},
//!     value::Value,
//! };
//!
//! let registry = TypeRegistry::new()?;
//! let assembly = registry.define_assembly("Sample");
//! let counter = TypeBuilder::new(&registry, &assembly, "Sample", "Counter").build()?;
//! let int = registry.well_known("System.Int32")?;
//! let total = FieldNode::new(&counter.add_field(Field::new(
//!     "Total",
//!     FieldAttributes::PUBLIC | FieldAttributes::STATIC,
//!     &int,
//! )));
//!
//! total.set_value(None, Value::I4(3))?;
//! assert_eq!(total.get_value(None)?, Value::I4(3));
//! assert!(total.set_value(None, Value::Null).is_err());
//! # Ok::<(), metascope::Error>(())
//! ```

use crate::{
    metadata::{
        node::{ParameterNode, TypeNode},
        value::Value,
    },
    Result,
};

/// Get/set capability shared by properties and fields
pub trait DataMember {
    /// The name of the member
    fn name(&self) -> &str;

    /// The declared type of the member
    fn data_type(&self) -> Option<TypeNode>;

    /// The type that declares the member
    fn declaring_type(&self) -> Option<TypeNode>;

    /// Returns true for static members
    fn is_static(&self) -> bool;

    /// Returns true for public members
    fn is_public(&self) -> bool;

    /// The index parameters; empty for fields and non-indexed properties
    fn index_parameters(&self) -> Vec<ParameterNode>;

    /// Returns true if the member takes index arguments
    fn is_indexed(&self) -> bool {
        !self.index_parameters().is_empty()
    }

    /// Read the member with index arguments
    ///
    /// ## Arguments
    /// * 'instance' - The target instance, `None` for static members
    /// * 'indices'  - Index arguments, ignored by fields
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if an instance member is read without an
    /// instance, [`crate::Error::InvalidOperation`] on an index arity mismatch or a missing
    /// getter, and any binding or host error of the getter.
    fn get_value_with(&self, instance: Option<&Value>, indices: &[Value]) -> Result<Value>;

    /// Write the member with index arguments
    ///
    /// ## Arguments
    /// * 'instance' - The target instance, `None` for static members
    /// * 'indices'  - Index arguments, ignored by fields
    /// * 'value'    - The value to store
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if an instance member is written without an
    /// instance or the value does not fit, [`crate::Error::InvalidOperation`] on an index arity
    /// mismatch or a missing setter, and any binding or host error of the setter.
    fn set_value_with(&self, instance: Option<&Value>, indices: &[Value], value: Value) -> Result<()>;

    /// Read a non-indexed member
    ///
    /// # Errors
    /// See [`DataMember::get_value_with`].
    fn get_value(&self, instance: Option<&Value>) -> Result<Value> {
        self.get_value_with(instance, &[])
    }

    /// Read a member with a single index
    ///
    /// # Errors
    /// See [`DataMember::get_value_with`].
    fn get_value_indexed(&self, instance: Option<&Value>, index: Value) -> Result<Value> {
        self.get_value_with(instance, &[index])
    }

    /// Write a non-indexed member
    ///
    /// # Errors
    /// See [`DataMember::set_value_with`].
    fn set_value(&self, instance: Option<&Value>, value: Value) -> Result<()> {
        self.set_value_with(instance, &[], value)
    }

    /// Write a member with a single index
    ///
    /// # Errors
    /// See [`DataMember::set_value_with`].
    fn set_value_indexed(&self, instance: Option<&Value>, index: Value, value: Value) -> Result<()> {
        self.set_value_with(instance, &[index], value)
    }
}
