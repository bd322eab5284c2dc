//! Builder for reflected type definitions.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for defining classes,
//! value types and interfaces inside an assembly and registering them in a [`TypeRegistry`].
//! Members are attached to the built type afterwards (see [`CilType::add_method`] and friends).
//!
//! # Example
//!
//! ```rust
//! use metascope::metadata::typesystem::{TypeBuilder, TypeRegistry};
//!
//! let registry = TypeRegistry::new()?;
//! let assembly = registry.define_assembly("Collections");
//! let list = TypeBuilder::new(&registry, &assembly, "Sample", "List")
//!     .generic_params(&["T"])
//!     .build()?;
//!
//! assert_eq!(list.name, "List`1");
//! assert!(list.is_generic_definition());
//! # Ok::<(), metascope::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    metadata::{
        customattributes::CustomAttributeValue,
        tables::AssemblyRc,
        token::{Token, TABLE},
        typesystem::{CilFlavor, CilType, CilTypeRc, TypeRegistry, WELL_KNOWN},
    },
    Result,
};

/// Provides a fluent API for defining types
pub struct TypeBuilder<'a> {
    /// Type registry for storing the types
    registry: &'a TypeRegistry,
    /// The assembly that declares the new type
    assembly: &'a AssemblyRc,
    namespace: String,
    name: String,
    flavor: CilFlavor,
    base: Option<CilTypeRc>,
    interfaces: Vec<CilTypeRc>,
    generic_params: Vec<String>,
    attributes: Vec<CustomAttributeValue>,
}

impl<'a> TypeBuilder<'a> {
    /// Create a new builder for a class named `namespace.name`
    ///
    /// ## Arguments
    /// * 'registry'  - The type registry to register the type in
    /// * 'assembly'  - The declaring assembly
    /// * 'namespace' - Namespace of the type (can be empty)
    /// * 'name'      - Name of the type
    pub fn new(
        registry: &'a TypeRegistry,
        assembly: &'a AssemblyRc,
        namespace: &str,
        name: &str,
    ) -> Self {
        TypeBuilder {
            registry,
            assembly,
            namespace: namespace.to_string(),
            name: name.to_string(),
            flavor: CilFlavor::Class,
            base: None,
            interfaces: Vec::new(),
            generic_params: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Build a reference type (the default)
    #[must_use]
    pub fn class(mut self) -> Self {
        self.flavor = CilFlavor::Class;
        self
    }

    /// Build a value type
    #[must_use]
    pub fn value_type(mut self) -> Self {
        self.flavor = CilFlavor::ValueType;
        self
    }

    /// Build an interface
    #[must_use]
    pub fn interface(mut self) -> Self {
        self.flavor = CilFlavor::Interface;
        self
    }

    /// Set the base type. Without one, classes extend `System.Object` and value types
    /// `System.ValueType`; interfaces have no base.
    #[must_use]
    pub fn extends(mut self, base: &CilTypeRc) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Add an implemented interface
    #[must_use]
    pub fn implements(mut self, interface: &CilTypeRc) -> Self {
        self.interfaces.push(interface.clone());
        self
    }

    /// Declare generic parameters; the type name receives the usual arity suffix
    #[must_use]
    pub fn generic_params(mut self, names: &[&str]) -> Self {
        self.generic_params = names.iter().map(ToString::to_string).collect();
        self
    }

    /// Attach a custom attribute
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttributeValue) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Create the type, register it and add it to the declaring assembly
    ///
    /// # Errors
    /// Returns an error if the default base type is missing from the registry.
    pub fn build(self) -> Result<CilTypeRc> {
        let name = if self.generic_params.is_empty() || self.name.contains('`') {
            self.name
        } else {
            format!("{}`{}", self.name, self.generic_params.len())
        };

        let new_type = Arc::new(CilType::new(
            Token::allocate(TABLE::TYPEDEF),
            self.flavor,
            self.namespace,
            name,
        ));

        let base = match (self.base, self.flavor) {
            (Some(base), _) => Some(base),
            (None, CilFlavor::Interface) => None,
            (None, CilFlavor::ValueType) => Some(self.registry.well_known(WELL_KNOWN::VALUE_TYPE)?),
            (None, _) => Some(self.registry.well_known(WELL_KNOWN::OBJECT)?),
        };
        if let Some(base) = base {
            new_type.set_base(&base);
        }

        for (index, param) in self.generic_params.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            new_type
                .generic_params
                .push(TypeRegistry::generic_parameter(index as u32, param));
        }
        for interface in &self.interfaces {
            new_type.add_interface(interface);
        }
        for attribute in self.attributes {
            new_type.custom_attributes.push(Arc::new(attribute));
        }

        new_type.set_assembly(self.assembly);
        self.assembly.types.push(new_type.clone());
        self.registry.insert(&new_type);

        Ok(new_type)
    }
}
