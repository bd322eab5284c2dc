//! Reflected type system consumed by the metadata navigation layer.
//!
//! This module holds the host-side type descriptors: everything the navigation tree, the
//! attribute cache, the data member abstraction and the invoker read from. Types are owned by a
//! [`TypeRegistry`]; every other back-reference (base type, interfaces, declaring type, owning
//! assembly) is weak, so dropping the registry tears the whole graph down.
//!
//! # Key Components
//!
//! - [`CilType`]: Core type representation for definitions, arrays and constructed generics
//! - [`TypeRegistry`]: Central owner of all types, seeded with the core library
//! - [`TypeBuilder`]: Builder pattern for defining new types inside an assembly
//! - [`introspection`]: Pure queries over types (nullability, collections, generic interfaces)
//!
//! # Examples
//!
//! ```rust
//! use metascope::metadata::typesystem::{TypeRegistry, WELL_KNOWN};
//!
//! let registry = TypeRegistry::new()?;
//! let int = registry.get_by_fullname("System.Int32").unwrap();
//! let array = registry.make_array(&int)?;
//!
//! assert_eq!(array.element_type().unwrap().token, int.token);
//! assert!(registry.get_by_fullname(WELL_KNOWN::NULLABLE).is_some());
//! # Ok::<(), metascope::Error>(())
//! ```

mod base;
mod builder;
pub mod introspection;
mod registry;

use std::sync::{Arc, OnceLock};

pub use base::{CilFlavor, CilTypeRef, CilTypeRefList, WELL_KNOWN};
pub use builder::TypeBuilder;
pub use registry::TypeRegistry;

use crate::metadata::{
    customattributes::{AttributeProvider, CustomAttributeValueList},
    method::{Method, MethodList, MethodRc},
    tables::{
        AssemblyRc, AssemblyRef, Event, EventList, EventRc, Field, FieldList, FieldRc, Property,
        PropertyList, PropertyRc,
    },
    token::Token,
};

/// A vector that holds a list of `CilType`
pub type CilTypeList = Arc<boxcar::Vec<CilTypeRc>>;
/// Reference to a `CilType`
pub type CilTypeRc = Arc<CilType>;

/// Represents a reflected 'Type'. The `Token` is a `TypeDef` token for defined types and a
/// `TypeSpec` token for arrays and constructed generic types.
///
/// Member lists are append-only concurrent vectors: types are shared behind `Arc` as soon as
/// they are registered, and members are attached afterwards through [`CilType::add_method`],
/// [`CilType::add_field`], [`CilType::add_property`] and [`CilType::add_event`].
pub struct CilType {
    /// Token
    pub token: Token,
    /// The `TypeFlavor`
    pub flavor: CilFlavor,
    /// `TypeNamespace` (can be empty)
    pub namespace: String,
    /// `TypeName`
    pub name: String,
    /// This types base aka 'extends'
    base: OnceLock<CilTypeRef>,
    /// The assembly that declares this type
    assembly: OnceLock<AssemblyRef>,
    /// All interfaces this type directly implements
    pub interfaces: CilTypeRefList,
    /// All generic parameters this type has (definitions only)
    pub generic_params: CilTypeList,
    /// All generic arguments this type has (constructed types only)
    pub generic_args: CilTypeRefList,
    /// The generic definition a constructed type was instantiated from
    generic_definition: OnceLock<CilTypeRef>,
    /// The element type of an array
    element_type: OnceLock<CilTypeRef>,
    /// All methods this type has, constructors included
    pub methods: MethodList,
    /// All properties this type has
    pub properties: PropertyList,
    /// All fields this type has
    pub fields: FieldList,
    /// All events this type has
    pub events: EventList,
    /// All custom attributes this type has
    pub custom_attributes: CustomAttributeValueList,
}

impl CilType {
    /// Create a new instance of a `CilType`
    pub fn new(token: Token, flavor: CilFlavor, namespace: String, name: String) -> Self {
        CilType {
            token,
            flavor,
            namespace,
            name,
            base: OnceLock::new(),
            assembly: OnceLock::new(),
            interfaces: Arc::new(boxcar::Vec::new()),
            generic_params: Arc::new(boxcar::Vec::new()),
            generic_args: Arc::new(boxcar::Vec::new()),
            generic_definition: OnceLock::new(),
            element_type: OnceLock::new(),
            methods: Arc::new(boxcar::Vec::new()),
            properties: Arc::new(boxcar::Vec::new()),
            fields: Arc::new(boxcar::Vec::new()),
            events: Arc::new(boxcar::Vec::new()),
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Returns the full name (Namespace.Name) of the entity
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// Access the base type of this type, if it exists
    pub fn base(&self) -> Option<CilTypeRc> {
        self.base.get().and_then(CilTypeRef::upgrade)
    }

    /// Set the base type; the first assignment wins
    pub(crate) fn set_base(&self, base: &CilTypeRc) {
        let _ = self.base.set(base.into());
    }

    /// Access the assembly that declares this type
    pub fn assembly(&self) -> Option<AssemblyRc> {
        self.assembly.get().and_then(AssemblyRef::upgrade)
    }

    pub(crate) fn set_assembly(&self, assembly: &AssemblyRc) {
        let _ = self.assembly.set(AssemblyRef::new(assembly));
    }

    /// The element type, for arrays
    pub fn element_type(&self) -> Option<CilTypeRc> {
        self.element_type.get().and_then(CilTypeRef::upgrade)
    }

    pub(crate) fn set_element_type(&self, element: &CilTypeRc) {
        let _ = self.element_type.set(element.into());
    }

    /// The generic definition this type was constructed from, if any
    pub fn generic_definition(&self) -> Option<CilTypeRc> {
        self.generic_definition.get().and_then(CilTypeRef::upgrade)
    }

    pub(crate) fn set_generic_definition(&self, definition: &CilTypeRc) {
        let _ = self.generic_definition.set(definition.into());
    }

    /// Returns true for value types (primitives, structs and `Nullable<T>`)
    pub fn is_value_type(&self) -> bool {
        self.flavor.is_value_type()
    }

    /// Returns true for interfaces
    pub fn is_interface(&self) -> bool {
        self.flavor == CilFlavor::Interface
    }

    /// Returns true for arrays
    pub fn is_array(&self) -> bool {
        self.flavor == CilFlavor::Array
    }

    /// Returns true for a generic parameter placeholder (`T`)
    pub fn is_generic_parameter(&self) -> bool {
        matches!(self.flavor, CilFlavor::GenericParameter { .. })
    }

    /// Returns true for a generic type definition with unbound parameters (`List<>`)
    pub fn is_generic_definition(&self) -> bool {
        !self.generic_params.is_empty() && self.generic_definition.get().is_none()
    }

    /// Returns true for a generic type applied to arguments (`List<int>`, `List<T>`)
    pub fn is_constructed_generic(&self) -> bool {
        self.generic_definition.get().is_some()
    }

    /// Returns true for any generic type, definition or constructed
    pub fn is_generic(&self) -> bool {
        self.is_generic_definition() || self.is_constructed_generic()
    }

    /// Returns true if a generic parameter appears anywhere in this type
    pub fn contains_generic_parameters(&self) -> bool {
        if self.is_generic_parameter() || self.is_generic_definition() {
            return true;
        }

        if let Some(element) = self.element_type() {
            return element.contains_generic_parameters();
        }

        self.generic_args
            .iter()
            .filter_map(|(_, arg)| arg.upgrade())
            .any(|arg| arg.contains_generic_parameters())
    }

    /// The generic arguments of a constructed type, resolved to strong references
    pub fn generic_arguments(&self) -> Vec<CilTypeRc> {
        self.generic_args
            .iter()
            .filter_map(|(_, arg)| arg.upgrade())
            .collect()
    }

    /// The interfaces this type directly implements, resolved to strong references
    pub fn direct_interfaces(&self) -> Vec<CilTypeRc> {
        self.interfaces
            .iter()
            .filter_map(|(_, iface)| iface.upgrade())
            .collect()
    }

    /// Add an implemented interface. Instantiations already created from this type do not see
    /// interfaces added afterwards.
    pub fn add_interface(&self, interface: &CilTypeRc) {
        self.interfaces.push(interface.into());
    }

    /// Attach a method (or constructor) to this type, wiring up the back references of the
    /// method and its parameters
    pub fn add_method(self: &Arc<Self>, method: Method) -> MethodRc {
        let method = Arc::new(method);
        method.attach(self);
        self.methods.push(method.clone());
        method
    }

    /// Attach a field to this type
    pub fn add_field(self: &Arc<Self>, field: Field) -> FieldRc {
        let field = Arc::new(field);
        field.attach(self);
        self.fields.push(field.clone());
        field
    }

    /// Attach a property to this type. Its accessors become methods of this type as well.
    pub fn add_property(self: &Arc<Self>, property: Property) -> PropertyRc {
        let property = Arc::new(property);
        property.attach(self);
        for accessor in [property.get_method(), property.set_method()]
            .into_iter()
            .flatten()
        {
            accessor.attach(self);
            self.methods.push(accessor);
        }
        self.properties.push(property.clone());
        property
    }

    /// Attach an event to this type. Its accessors become methods of this type as well.
    pub fn add_event(self: &Arc<Self>, event: Event) -> EventRc {
        let event = Arc::new(event);
        event.attach(self);
        for accessor in event.accessors() {
            accessor.attach(self);
            self.methods.push(accessor);
        }
        self.events.push(event.clone());
        event
    }

    /// Look up a method by name, constructors excluded
    pub fn method(&self, name: &str) -> Option<MethodRc> {
        self.methods
            .iter()
            .map(|(_, method)| method)
            .find(|method| !method.is_constructor() && method.name == name)
            .cloned()
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<FieldRc> {
        self.fields
            .iter()
            .map(|(_, field)| field)
            .find(|field| field.name == name)
            .cloned()
    }

    /// Look up a property by name
    pub fn property(&self, name: &str) -> Option<PropertyRc> {
        self.properties
            .iter()
            .map(|(_, property)| property)
            .find(|property| property.name == name)
            .cloned()
    }

    /// Look up an event by name
    pub fn event(&self, name: &str) -> Option<EventRc> {
        self.events
            .iter()
            .map(|(_, event)| event)
            .find(|event| event.name == name)
            .cloned()
    }
}

impl AttributeProvider for CilType {
    fn token(&self) -> Token {
        self.token
    }

    fn custom_attributes(&self) -> &CustomAttributeValueList {
        &self.custom_attributes
    }
}

impl std::fmt::Debug for CilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CilType")
            .field("token", &self.token)
            .field("fullname", &self.fullname())
            .field("flavor", &self.flavor)
            .finish()
    }
}
