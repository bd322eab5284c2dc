//! Central type registry for the reflected type system.
//!
//! This module provides the `TypeRegistry`, a thread-safe registry owning every type of a loaded
//! type system. It is the host facility the navigation layer consumes: it hands out stable
//! identities, indexes types by name, and manufactures the derived types (arrays, constructed
//! generics) that parameter and field declarations refer to.
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: Primary index using entity tokens (`SkipMap`)
//! - **Name-based lookup**: Secondary indices for full names and simple names (`DashMap`)
//! - **Derived type caches**: Arrays keyed by element type, constructed generics keyed by
//!   definition and arguments (`DashMap`)
//!
//! # Core Library
//!
//! Every registry is seeded with a `System.Private.CoreLib` assembly containing the primitive
//! types, `System.Object`, `System.ValueType`, `System.String`, `System.Array`,
//! `System.Delegate`, `System.Attribute`, `System.ParamArrayAttribute`, `System.Nullable`1` and
//! the two sequence interfaces `System.Collections.IEnumerable` and
//! `System.Collections.Generic.IEnumerable`1`.
//!
//! # Thread Safety
//!
//! Derived types are created with an insert-or-fetch discipline: concurrent requests for the same
//! array or instantiation may each build a candidate, but only one becomes canonical and is
//! registered; every caller receives the canonical instance.

use std::sync::Arc;

use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;

use crate::{
    metadata::{
        tables::{Assembly, AssemblyRc},
        token::{Token, TABLE},
        typesystem::{CilFlavor, CilType, CilTypeRc, WELL_KNOWN},
    },
    Error::TypeNotFound,
    Result,
};

/// Primitive types seeded into the core library
const PRIMITIVES: [(&str, CilFlavor); 15] = [
    ("Void", CilFlavor::Void),
    ("Boolean", CilFlavor::Boolean),
    ("Char", CilFlavor::Char),
    ("SByte", CilFlavor::I1),
    ("Byte", CilFlavor::U1),
    ("Int16", CilFlavor::I2),
    ("UInt16", CilFlavor::U2),
    ("Int32", CilFlavor::I4),
    ("UInt32", CilFlavor::U4),
    ("Int64", CilFlavor::I8),
    ("UInt64", CilFlavor::U8),
    ("Single", CilFlavor::R4),
    ("Double", CilFlavor::R8),
    ("Object", CilFlavor::Object),
    ("String", CilFlavor::String),
];

/// Central registry for managing all types of a loaded type system.
///
/// `TypeRegistry` owns every [`CilType`] through strong references; all other references in the
/// type graph are weak. Dropping the registry (and the assemblies handed out by it) releases the
/// whole graph.
///
/// # Examples
///
/// ```rust
/// use metascope::metadata::typesystem::{TypeRegistry, TypeBuilder};
///
/// let registry = TypeRegistry::new()?;
/// let assembly = registry.define_assembly("Sample");
/// let point = TypeBuilder::new(&registry, &assembly, "Geometry", "Point")
///     .value_type()
///     .build()?;
///
/// assert_eq!(registry.get_by_fullname("Geometry.Point").unwrap().token, point.token);
/// # Ok::<(), metascope::Error>(())
/// ```
pub struct TypeRegistry {
    /// Primary storage: all types indexed by token
    types: SkipMap<Token, CilTypeRc>,
    /// Secondary index: defined types indexed by full name (namespace.name)
    types_by_fullname: DashMap<String, Vec<Token>>,
    /// Secondary index: defined types indexed by simple name (may have duplicates)
    types_by_name: DashMap<String, Vec<Token>>,
    /// Array types keyed by their element type
    arrays: DashMap<Token, CilTypeRc>,
    /// Constructed generic types keyed by definition and argument tokens
    instances: DashMap<(Token, Vec<Token>), CilTypeRc>,
    /// All assemblies, in definition order
    assemblies: SkipMap<Token, AssemblyRc>,
    /// The seeded core library
    core: AssemblyRc,
}

impl TypeRegistry {
    /// Create a new type registry with an initialized core library.
    ///
    /// # Errors
    ///
    /// Returns an error if the core library cannot be seeded, which indicates an internal
    /// inconsistency.
    pub fn new() -> Result<Self> {
        let core = Arc::new(Assembly::new(WELL_KNOWN::CORE_LIBRARY, "8.0.0.0"));
        let registry = TypeRegistry {
            types: SkipMap::new(),
            types_by_fullname: DashMap::new(),
            types_by_name: DashMap::new(),
            arrays: DashMap::new(),
            instances: DashMap::new(),
            assemblies: SkipMap::new(),
            core: core.clone(),
        };

        registry.assemblies.insert(core.token, core);
        registry.initialize_core()?;
        Ok(registry)
    }

    /// Seed the core library types and their relationships
    fn initialize_core(&self) -> Result<()> {
        for (name, flavor) in PRIMITIVES {
            self.define_core("System", name, flavor);
        }

        let object = self.well_known(WELL_KNOWN::OBJECT)?;
        let value_type = self.define_core("System", "ValueType", CilFlavor::Class);
        value_type.set_base(&object);

        for (name, flavor) in PRIMITIVES {
            if flavor.is_value_type() || flavor == CilFlavor::Void {
                self.well_known(&format!("System.{name}"))?
                    .set_base(&value_type);
            }
        }

        for name in ["Array", "Delegate", "Attribute"] {
            self.define_core("System", name, CilFlavor::Class)
                .set_base(&object);
        }
        self.well_known(WELL_KNOWN::STRING)?.set_base(&object);

        let attribute = self.well_known("System.Attribute")?;
        self.define_core("System", "ParamArrayAttribute", CilFlavor::Class)
            .set_base(&attribute);

        let enumerable = self.define_core("System.Collections", "IEnumerable", CilFlavor::Interface);

        let generic_enumerable = self.define_core(
            "System.Collections.Generic",
            "IEnumerable`1",
            CilFlavor::Interface,
        );
        generic_enumerable
            .generic_params
            .push(Self::generic_parameter(0, "T"));
        generic_enumerable.interfaces.push((&enumerable).into());

        let nullable = self.define_core("System", "Nullable`1", CilFlavor::ValueType);
        nullable.generic_params.push(Self::generic_parameter(0, "T"));
        nullable.set_base(&value_type);

        // System.String is a sequence of System.Char
        let char_sequence =
            self.make_generic_instance(&generic_enumerable, &[self.well_known("System.Char")?])?;
        let string = self.well_known(WELL_KNOWN::STRING)?;
        string.interfaces.push((&char_sequence).into());
        string.interfaces.push((&enumerable).into());

        Ok(())
    }

    /// Create, register and attach a type to the core library
    fn define_core(&self, namespace: &str, name: &str, flavor: CilFlavor) -> CilTypeRc {
        let new_type = Arc::new(CilType::new(
            Token::allocate(TABLE::TYPEDEF),
            flavor,
            namespace.to_string(),
            name.to_string(),
        ));
        new_type.set_assembly(&self.core);
        self.core.types.push(new_type.clone());
        self.insert(&new_type);
        new_type
    }

    /// Create a generic parameter placeholder
    pub(crate) fn generic_parameter(index: u32, name: &str) -> CilTypeRc {
        Arc::new(CilType::new(
            Token::allocate(TABLE::GENERICPARAM),
            CilFlavor::GenericParameter { index },
            String::new(),
            name.to_string(),
        ))
    }

    /// Insert a `CilType` into all lookup tables
    ///
    /// ## Arguments
    /// * '`new_type`' - The type to register
    pub fn insert(&self, new_type: &CilTypeRc) {
        let token = new_type.token;
        if self.types.contains_key(&token) {
            return;
        }

        self.types.insert(token, new_type.clone());

        self.types_by_name
            .entry(new_type.name.clone())
            .or_default()
            .push(token);

        self.types_by_fullname
            .entry(new_type.fullname())
            .or_default()
            .push(token);
    }

    /// Insert a derived type (array or constructed generic); these are reachable by token only
    fn insert_derived(&self, new_type: &CilTypeRc) {
        self.types.insert(new_type.token, new_type.clone());
    }

    /// Define a new, empty assembly owned by this registry
    pub fn define_assembly(&self, name: &str) -> AssemblyRc {
        let assembly = Arc::new(Assembly::new(name, "1.0.0.0"));
        self.assemblies.insert(assembly.token, assembly.clone());
        assembly
    }

    /// The seeded core library assembly
    pub fn core_library(&self) -> AssemblyRc {
        self.core.clone()
    }

    /// All assemblies known to this registry, core library first
    pub fn assemblies(&self) -> Vec<AssemblyRc> {
        self.assemblies
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Look up a type by its token.
    pub fn get(&self, token: &Token) -> Option<CilTypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up a defined type by its fully qualified name (`Namespace.Name`).
    pub fn get_by_fullname(&self, fullname: &str) -> Option<CilTypeRc> {
        self.types_by_fullname
            .get(fullname)
            .and_then(|tokens| tokens.value().first().copied())
            .and_then(|token| self.get(&token))
    }

    /// Look up all defined types sharing a simple name
    pub fn get_by_name(&self, name: &str) -> Vec<CilTypeRc> {
        self.types_by_name
            .get(name)
            .map(|tokens| tokens.value().iter().filter_map(|t| self.get(t)).collect())
            .unwrap_or_default()
    }

    /// Look up a type that must exist
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if no type has the given full name.
    pub fn well_known(&self, fullname: &str) -> Result<CilTypeRc> {
        self.get_by_fullname(fullname)
            .ok_or_else(|| TypeNotFound(fullname.to_string()))
    }

    /// Returns the single-dimensional array type of `element`, creating it on first request.
    ///
    /// Arrays derive from `System.Array` and implement `IEnumerable<element>` and
    /// `IEnumerable`.
    ///
    /// # Errors
    /// Returns an error if the core library sequence types are missing.
    pub fn make_array(&self, element: &CilTypeRc) -> Result<CilTypeRc> {
        if let Some(existing) = self.arrays.get(&element.token) {
            return Ok(existing.value().clone());
        }

        let candidate = Arc::new(CilType::new(
            Token::allocate(TABLE::TYPESPEC),
            CilFlavor::Array,
            element.namespace.clone(),
            format!("{}[]", element.name),
        ));
        candidate.set_element_type(element);
        candidate.set_base(&self.well_known(WELL_KNOWN::ARRAY)?);
        if let Some(assembly) = element.assembly() {
            candidate.set_assembly(&assembly);
        }

        let sequence = self.make_generic_instance(
            &self.well_known(WELL_KNOWN::GENERIC_ENUMERABLE)?,
            std::slice::from_ref(element),
        )?;
        candidate.interfaces.push((&sequence).into());
        candidate
            .interfaces
            .push((&self.well_known(WELL_KNOWN::ENUMERABLE)?).into());

        let canonical = self
            .arrays
            .entry(element.token)
            .or_insert_with(|| candidate.clone())
            .value()
            .clone();
        if Arc::ptr_eq(&canonical, &candidate) {
            self.insert_derived(&canonical);
        }
        Ok(canonical)
    }

    /// Returns `definition` applied to `arguments`, creating it on first request.
    ///
    /// The base type and implemented interfaces of the definition are carried over with every
    /// generic parameter replaced by the matching argument. Members are not copied.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `definition` is not a generic type definition
    /// or the argument count does not match its parameter count.
    pub fn make_generic_instance(
        &self,
        definition: &CilTypeRc,
        arguments: &[CilTypeRc],
    ) -> Result<CilTypeRc> {
        if !definition.is_generic_definition() {
            return Err(invalid_argument!(
                "{} is not a generic type definition",
                definition.fullname()
            ));
        }
        if definition.generic_params.count() != arguments.len() {
            return Err(invalid_argument!(
                "{} expects {} generic arguments, got {}",
                definition.fullname(),
                definition.generic_params.count(),
                arguments.len()
            ));
        }

        let key = (
            definition.token,
            arguments.iter().map(|arg| arg.token).collect::<Vec<_>>(),
        );
        if let Some(existing) = self.instances.get(&key) {
            return Ok(existing.value().clone());
        }

        let candidate = Arc::new(CilType::new(
            Token::allocate(TABLE::TYPESPEC),
            definition.flavor,
            definition.namespace.clone(),
            definition.name.clone(),
        ));
        candidate.set_generic_definition(definition);
        for argument in arguments {
            candidate.generic_args.push(argument.into());
        }
        if let Some(assembly) = definition.assembly() {
            candidate.set_assembly(&assembly);
        }
        if let Some(base) = definition.base() {
            candidate.set_base(&self.substitute(&base, arguments)?);
        }
        for iface in definition.direct_interfaces() {
            let substituted = self.substitute(&iface, arguments)?;
            candidate.interfaces.push((&substituted).into());
        }

        let canonical = self
            .instances
            .entry(key)
            .or_insert_with(|| candidate.clone())
            .value()
            .clone();
        if Arc::ptr_eq(&canonical, &candidate) {
            self.insert_derived(&canonical);
        }
        Ok(canonical)
    }

    /// Returns `Nullable<underlying>`
    ///
    /// # Errors
    /// Returns an error if `underlying` is not a value type or the core library lacks
    /// `System.Nullable`1`.
    pub fn make_nullable(&self, underlying: &CilTypeRc) -> Result<CilTypeRc> {
        if !underlying.is_value_type() {
            return Err(invalid_argument!(
                "{} is not a value type",
                underlying.fullname()
            ));
        }

        self.make_generic_instance(
            &self.well_known(WELL_KNOWN::NULLABLE)?,
            std::slice::from_ref(underlying),
        )
    }

    /// Replace generic parameters inside `ty` with `arguments`
    fn substitute(&self, ty: &CilTypeRc, arguments: &[CilTypeRc]) -> Result<CilTypeRc> {
        match ty.flavor {
            CilFlavor::GenericParameter { index } => arguments
                .get(index as usize)
                .cloned()
                .ok_or_else(|| invalid_argument!("Generic parameter {} is out of range", index)),
            CilFlavor::Array => match ty.element_type() {
                Some(element) => self.make_array(&self.substitute(&element, arguments)?),
                None => Ok(ty.clone()),
            },
            _ => match ty.generic_definition() {
                Some(definition) if ty.contains_generic_parameters() => {
                    let substituted = ty
                        .generic_arguments()
                        .iter()
                        .map(|arg| self.substitute(arg, arguments))
                        .collect::<Result<Vec<_>>>()?;
                    self.make_generic_instance(&definition, &substituted)
                }
                _ => Ok(ty.clone()),
            },
        }
    }

    /// Returns the number of types in the registry
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if there are no types in the registry
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns all types of the registry, in token order
    pub fn all_types(&self) -> Vec<CilTypeRc> {
        self.types
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
