//! Pure queries over reflected types.
//!
//! These functions answer the questions the data member and invocation layers ask about declared
//! types: can it hold null, what does a sequence type contain, which constructed interface of a
//! generic definition does a type implement, and does a runtime value fit a declared type.
//! Nothing here mutates or caches.
//!
//! # Examples
//!
//! ```rust
//! use metascope::metadata::typesystem::{introspection, TypeRegistry};
//!
//! let registry = TypeRegistry::new()?;
//! let int = registry.well_known("System.Int32")?;
//! let nullable_int = registry.make_nullable(&int)?;
//! let ints = registry.make_array(&int)?;
//!
//! assert!(!introspection::is_nullable(&int));
//! assert!(introspection::is_nullable(&nullable_int));
//! assert_eq!(introspection::non_nullable_type(&nullable_int).token, int.token);
//! assert_eq!(introspection::collection_item_type(&ints)?.unwrap().token, int.token);
//! # Ok::<(), metascope::Error>(())
//! ```

use std::collections::HashSet;

use crate::{
    metadata::{
        token::Token,
        typesystem::{CilFlavor, CilType, CilTypeRc, WELL_KNOWN},
        value::Value,
    },
    Error::NotCollectionType,
    Result,
};

/// Returns true if the type can hold null: reference types, generic parameters and
/// `Nullable<T>`
pub fn is_nullable(ty: &CilType) -> bool {
    !ty.is_value_type() || is_nullable_type(ty)
}

/// Returns true only for `Nullable<T>` (the definition or any instantiation of it)
pub fn is_nullable_type(ty: &CilType) -> bool {
    ty.is_generic() && ty.fullname() == WELL_KNOWN::NULLABLE
}

/// Returns `T` for a constructed `Nullable<T>`, otherwise the type itself
pub fn non_nullable_type(ty: &CilTypeRc) -> CilTypeRc {
    if ty.is_constructed_generic() && is_nullable_type(ty) {
        if let Some(underlying) = ty.generic_arguments().into_iter().next() {
            return underlying;
        }
    }
    ty.clone()
}

/// Returns the element type of a sequence type.
///
/// Arrays yield their element type and types implementing `IEnumerable<T>` yield `T`. Types that
/// only implement the non-generic `IEnumerable` yield `None`.
///
/// # Errors
/// Returns [`crate::Error::NotCollectionType`] if the type is not a sequence at all, or if it is
/// the unbound `IEnumerable<>` definition itself.
pub fn collection_item_type(ty: &CilTypeRc) -> Result<Option<CilTypeRc>> {
    if ty.is_array() {
        return Ok(ty.element_type());
    }

    if let Some(sequence) =
        find_generic_interface(ty, |definition| definition.fullname() == WELL_KNOWN::GENERIC_ENUMERABLE)
    {
        if sequence.is_generic_definition() {
            return Err(NotCollectionType(ty.fullname()));
        }
        return Ok(sequence.generic_arguments().into_iter().next());
    }

    let is_sequence = ty.fullname() == WELL_KNOWN::ENUMERABLE
        || all_interfaces(ty)
            .iter()
            .any(|iface| iface.fullname() == WELL_KNOWN::ENUMERABLE);
    if is_sequence {
        Ok(None)
    } else {
        Err(NotCollectionType(ty.fullname()))
    }
}

/// Returns the interface built from the generic interface definition `definition` that `ty` is
/// or implements, if any.
///
/// Interfaces are collected across the base chain and through interface inheritance.
///
/// # Errors
/// Returns [`crate::Error::InvalidArgument`] if `definition` is not a generic interface
/// definition.
pub fn implements_generic_definition(
    ty: &CilTypeRc,
    definition: &CilType,
) -> Result<Option<CilTypeRc>> {
    if !definition.is_interface() || !definition.is_generic_definition() {
        return Err(invalid_argument!(
            "{} is not a generic interface definition",
            definition.fullname()
        ));
    }

    Ok(find_generic_interface(ty, |candidate| {
        candidate.token == definition.token
    }))
}

/// Returns the value if it is an instance of `ty`.
///
/// # Errors
/// Returns [`crate::Error::InvalidArgument`] naming the expected type otherwise.
pub fn is_instance_of_type<'a>(value: &'a Value, ty: &CilType) -> Result<&'a Value> {
    if is_instance_of(value, ty) {
        Ok(value)
    } else {
        Err(invalid_argument!(
            "Value {} must be an instance of {}",
            value,
            ty.fullname()
        ))
    }
}

/// All interfaces of a type: those declared along the base chain and those inherited by them,
/// each once, in discovery order
pub fn all_interfaces(ty: &CilTypeRc) -> Vec<CilTypeRc> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    let mut current = Some(ty.clone());
    while let Some(class) = current {
        for iface in class.direct_interfaces() {
            collect_interface(&iface, &mut seen, &mut result);
        }
        current = class.base();
    }

    result
}

fn collect_interface(iface: &CilTypeRc, seen: &mut HashSet<Token>, result: &mut Vec<CilTypeRc>) {
    if !seen.insert(iface.token) {
        return;
    }

    result.push(iface.clone());
    for inherited in iface.direct_interfaces() {
        collect_interface(&inherited, seen, result);
    }
}

/// Find `ty` itself or one of its interfaces whose generic definition matches `predicate`
fn find_generic_interface<F>(ty: &CilTypeRc, predicate: F) -> Option<CilTypeRc>
where
    F: Fn(&CilType) -> bool,
{
    let matches = |candidate: &CilTypeRc| {
        if candidate.is_generic_definition() {
            predicate(candidate.as_ref())
        } else {
            candidate
                .generic_definition()
                .is_some_and(|definition| predicate(definition.as_ref()))
        }
    };

    if ty.is_interface() && matches(ty) {
        return Some(ty.clone());
    }

    all_interfaces(ty).into_iter().find(|iface| matches(iface))
}

/// Returns true if a value of type `source` can be stored in a location of type `target`
pub fn is_assignable_from(target: &CilType, source: &CilTypeRc) -> bool {
    if target.token == source.token {
        return true;
    }

    match target.flavor {
        CilFlavor::Object | CilFlavor::GenericParameter { .. } => return true,
        _ => {}
    }

    if target.is_constructed_generic() && is_nullable_type(target) {
        return target
            .generic_arguments()
            .first()
            .is_some_and(|underlying| underlying.token == source.token);
    }

    if source.is_array() && target.is_array() {
        return match (target.element_type(), source.element_type()) {
            (Some(target_element), Some(source_element)) => {
                is_element_assignable(&target_element, &source_element)
            }
            _ => false,
        };
    }

    let mut current = source.base();
    while let Some(base) = current {
        if base.token == target.token {
            return true;
        }
        current = base.base();
    }

    if target.is_interface() {
        for iface in all_interfaces(source) {
            if iface.token == target.token || is_covariant_sequence(target, &iface) {
                return true;
            }
        }
    }

    false
}

/// Returns true if `value` is a non-null instance of `ty`
pub fn is_instance_of(value: &Value, ty: &CilType) -> bool {
    match value {
        Value::Null => false,
        Value::Array(array) => is_array_instance_of(&array.element_type, ty),
        Value::Object(object) => is_assignable_from(ty, &object.ty),
        primitive => match primitive.primitive_flavor() {
            Some(flavor) => is_primitive_instance_of(flavor, ty),
            None => false,
        },
    }
}

/// Array elements: identical types, or reference types that are assignable
fn is_element_assignable(target: &CilTypeRc, source: &CilTypeRc) -> bool {
    target.token == source.token
        || (!source.is_value_type() && !target.is_value_type() && is_assignable_from(target, source))
}

/// `IEnumerable<out T>` is covariant for reference type arguments
fn is_covariant_sequence(target: &CilType, implemented: &CilTypeRc) -> bool {
    let is_sequence = |ty: &CilType| {
        ty.generic_definition()
            .is_some_and(|definition| definition.fullname() == WELL_KNOWN::GENERIC_ENUMERABLE)
    };
    if !is_sequence(target) || !is_sequence(implemented.as_ref()) {
        return false;
    }

    match (
        target.generic_arguments().first(),
        implemented.generic_arguments().first(),
    ) {
        (Some(wanted), Some(actual)) => is_element_assignable(wanted, actual),
        _ => false,
    }
}

fn is_array_instance_of(element: &CilTypeRc, ty: &CilType) -> bool {
    match ty.flavor {
        CilFlavor::Object | CilFlavor::GenericParameter { .. } => return true,
        CilFlavor::Array => {
            return ty
                .element_type()
                .is_some_and(|wanted| is_element_assignable(&wanted, element));
        }
        _ => {}
    }

    let fullname = ty.fullname();
    if fullname == WELL_KNOWN::ARRAY || fullname == WELL_KNOWN::ENUMERABLE {
        return true;
    }

    if ty
        .generic_definition()
        .is_some_and(|definition| definition.fullname() == WELL_KNOWN::GENERIC_ENUMERABLE)
    {
        return ty
            .generic_arguments()
            .first()
            .is_some_and(|wanted| is_element_assignable(wanted, element));
    }

    false
}

fn is_primitive_instance_of(flavor: CilFlavor, ty: &CilType) -> bool {
    if ty.flavor == flavor {
        return true;
    }

    match ty.flavor {
        CilFlavor::Object | CilFlavor::GenericParameter { .. } => return true,
        _ => {}
    }

    let fullname = ty.fullname();
    if fullname == WELL_KNOWN::VALUE_TYPE {
        return flavor.is_value_type();
    }

    if ty.is_constructed_generic() && is_nullable_type(ty) {
        return ty
            .generic_arguments()
            .first()
            .is_some_and(|underlying| underlying.flavor == flavor);
    }

    if flavor == CilFlavor::String {
        if fullname == WELL_KNOWN::ENUMERABLE {
            return true;
        }
        if ty
            .generic_definition()
            .is_some_and(|definition| definition.fullname() == WELL_KNOWN::GENERIC_ENUMERABLE)
        {
            return ty
                .generic_arguments()
                .first()
                .is_some_and(|wanted| matches!(wanted.flavor, CilFlavor::Char | CilFlavor::Object));
        }
    }

    false
}
