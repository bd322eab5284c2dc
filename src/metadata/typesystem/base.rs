use std::sync::{Arc, Weak};

use crate::metadata::{
    token::Token,
    typesystem::{CilType, CilTypeRc},
};

/// A vector that holds `CilTypeRef` instances (weak references)
pub type CilTypeRefList = Arc<boxcar::Vec<CilTypeRef>>;

/// A smart reference to a `CilType` that automatically handles weak references
/// to prevent circular reference memory leaks while providing a clean API
#[derive(Clone, Debug)]
pub struct CilTypeRef {
    weak_ref: Weak<CilType>,
}

impl CilTypeRef {
    /// Create a new `CilTypeRef` from a strong reference
    pub fn new(strong_ref: &CilTypeRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<CilTypeRc> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced type is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Get the token of the referenced type (if still alive)
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.upgrade().map(|t| t.token)
    }

    /// Get the full name of the referenced type (if still alive)
    #[must_use]
    pub fn fullname(&self) -> Option<String> {
        self.upgrade().map(|t| t.fullname())
    }
}

impl From<CilTypeRc> for CilTypeRef {
    fn from(strong_ref: CilTypeRc) -> Self {
        Self::new(&strong_ref)
    }
}

impl From<&CilTypeRc> for CilTypeRef {
    fn from(strong_ref: &CilTypeRc) -> Self {
        Self::new(strong_ref)
    }
}

/// Full names of the types a [`super::TypeRegistry`] seeds into its core library.
#[allow(non_snake_case, missing_docs)]
pub mod WELL_KNOWN {
    pub const OBJECT: &str = "System.Object";
    pub const VALUE_TYPE: &str = "System.ValueType";
    pub const STRING: &str = "System.String";
    pub const ARRAY: &str = "System.Array";
    pub const DELEGATE: &str = "System.Delegate";
    pub const VOID: &str = "System.Void";
    pub const NULLABLE: &str = "System.Nullable`1";
    pub const ENUMERABLE: &str = "System.Collections.IEnumerable";
    pub const GENERIC_ENUMERABLE: &str = "System.Collections.Generic.IEnumerable`1";
    pub const PARAM_ARRAY_ATTRIBUTE: &str = "System.ParamArrayAttribute";
    pub const CORE_LIBRARY: &str = "System.Private.CoreLib";
}

#[allow(missing_docs)]
/// The shape of a reflected type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CilFlavor {
    // Base primitive types
    Void,
    Boolean,
    Char,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    R4,
    R8,
    Object,
    String,

    // Complex types
    /// Single-dimensional array, the element type is held by the type itself
    Array,
    GenericParameter {
        /// Index in the generic parameters list of the declaring definition
        index: u32,
    },

    // Type categories
    Class,
    ValueType,
    Interface,
}

impl CilFlavor {
    /// Check if this is a primitive type
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            CilFlavor::Void
                | CilFlavor::Boolean
                | CilFlavor::Char
                | CilFlavor::I1
                | CilFlavor::U1
                | CilFlavor::I2
                | CilFlavor::U2
                | CilFlavor::I4
                | CilFlavor::U4
                | CilFlavor::I8
                | CilFlavor::U8
                | CilFlavor::R4
                | CilFlavor::R8
                | CilFlavor::Object
                | CilFlavor::String
        )
    }

    /// Check if this is a value type
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            CilFlavor::Boolean
                | CilFlavor::Char
                | CilFlavor::I1
                | CilFlavor::U1
                | CilFlavor::I2
                | CilFlavor::U2
                | CilFlavor::I4
                | CilFlavor::U4
                | CilFlavor::I8
                | CilFlavor::U8
                | CilFlavor::R4
                | CilFlavor::R8
                | CilFlavor::ValueType
        )
    }

    /// Check if this is a reference type
    #[must_use]
    pub fn is_reference_type(&self) -> bool {
        matches!(
            self,
            CilFlavor::Object
                | CilFlavor::String
                | CilFlavor::Class
                | CilFlavor::Interface
                | CilFlavor::Array
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cil_flavor_is_value_type() {
        assert!(CilFlavor::Boolean.is_value_type());
        assert!(CilFlavor::I4.is_value_type());
        assert!(CilFlavor::R8.is_value_type());
        assert!(CilFlavor::ValueType.is_value_type());

        assert!(!CilFlavor::Void.is_value_type());
        assert!(!CilFlavor::Object.is_value_type());
        assert!(!CilFlavor::String.is_value_type());
        assert!(!CilFlavor::Array.is_value_type());
        assert!(!CilFlavor::Class.is_value_type());
        assert!(!CilFlavor::GenericParameter { index: 0 }.is_value_type());
    }

    #[test]
    fn test_cil_flavor_is_reference_type() {
        assert!(CilFlavor::Object.is_reference_type());
        assert!(CilFlavor::String.is_reference_type());
        assert!(CilFlavor::Class.is_reference_type());
        assert!(CilFlavor::Interface.is_reference_type());
        assert!(CilFlavor::Array.is_reference_type());

        assert!(!CilFlavor::Boolean.is_reference_type());
        assert!(!CilFlavor::I4.is_reference_type());
        assert!(!CilFlavor::ValueType.is_reference_type());
    }

    #[test]
    fn test_cil_flavor_is_primitive() {
        assert!(CilFlavor::Void.is_primitive());
        assert!(CilFlavor::String.is_primitive());
        assert!(!CilFlavor::Array.is_primitive());
        assert!(!CilFlavor::ValueType.is_primitive());
        assert!(!CilFlavor::Interface.is_primitive());
    }
}
