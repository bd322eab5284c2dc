//! Runtime values flowing through field access and method invocation.
//!
//! [`Value`] is the dynamic value model of the host runtime: primitives, strings, arrays that know
//! their element type, and objects that are instances of a reflected [`CilType`] with one slot
//! per instance field. Values are cheap to clone; arrays and objects are shared behind `Arc`, so
//! a cloned object still refers to the same instance.
//!
//! # Examples
//!
//! ```rust
//! use metascope::metadata::{typesystem::TypeRegistry, value::Value};
//!
//! let registry = TypeRegistry::new()?;
//! let int = registry.well_known("System.Int32")?;
//! let object = registry.well_known("System.Object")?;
//!
//! assert!(Value::from(5).is_instance_of(&int));
//! assert!(Value::from("text").is_instance_of(&object));
//! assert!(!Value::Null.is_instance_of(&object));
//! # Ok::<(), metascope::Error>(())
//! ```

use std::{fmt, sync::Arc};

use dashmap::DashMap;

use crate::metadata::{
    token::Token,
    typesystem::{introspection, CilFlavor, CilType, CilTypeRc},
};

/// A reference-counted pointer to an `Object`
pub type ObjectRc = Arc<Object>;

/// An instance of a reflected type
pub struct Object {
    /// The runtime type of this instance
    pub ty: CilTypeRc,
    /// Instance field slots, keyed by field token
    slots: DashMap<Token, Value>,
}

impl Object {
    /// Create a new instance of `ty` with every instance field (declared or inherited) set to
    /// the default value of its type
    pub fn new(ty: &CilTypeRc) -> ObjectRc {
        let slots = DashMap::new();

        let mut current = Some(ty.clone());
        while let Some(class) = current {
            for (_, field) in class.fields.iter() {
                if !field.is_static() {
                    let default = field
                        .field_type()
                        .map_or(Value::Null, |field_type| Value::default_for(&field_type));
                    slots.insert(field.token, default);
                }
            }
            current = class.base();
        }

        Arc::new(Object {
            ty: ty.clone(),
            slots,
        })
    }

    /// Read an instance field slot
    pub fn load(&self, field: Token) -> Option<Value> {
        self.slots.get(&field).map(|slot| slot.value().clone())
    }

    /// Write an instance field slot
    pub(crate) fn store(&self, field: Token, value: Value) {
        self.slots.insert(field, value);
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("type", &self.ty.fullname())
            .field("fields", &self.slots.len())
            .finish()
    }
}

/// A single-dimensional array together with its element type
#[derive(Clone)]
pub struct ArrayValue {
    /// Element type of the array
    pub element_type: CilTypeRc,
    /// The elements
    pub items: Vec<Value>,
}

impl fmt::Debug for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayValue")
            .field("element_type", &self.element_type.fullname())
            .field("items", &self.items)
            .finish()
    }
}

#[allow(missing_docs)]
/// A runtime value
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Boolean(bool),
    Char(char),
    I1(i8),
    U1(u8),
    I2(i16),
    U2(u16),
    I4(i32),
    U4(u32),
    I8(i64),
    U8(u64),
    R4(f32),
    R8(f64),
    String(String),
    Array(Arc<ArrayValue>),
    Object(ObjectRc),
}

impl Value {
    /// Create a new array value
    pub fn array(element_type: &CilTypeRc, items: Vec<Value>) -> Self {
        Value::Array(Arc::new(ArrayValue {
            element_type: element_type.clone(),
            items,
        }))
    }

    /// Create a new instance of `ty`
    pub fn object(ty: &CilTypeRc) -> Self {
        Value::Object(Object::new(ty))
    }

    /// The zero value of a type: zero for numeric primitives, `false`, `'\0'`, and `Null` for
    /// everything else
    pub fn default_for(ty: &CilType) -> Self {
        match ty.flavor {
            CilFlavor::Boolean => Value::Boolean(false),
            CilFlavor::Char => Value::Char('\0'),
            CilFlavor::I1 => Value::I1(0),
            CilFlavor::U1 => Value::U1(0),
            CilFlavor::I2 => Value::I2(0),
            CilFlavor::U2 => Value::U2(0),
            CilFlavor::I4 => Value::I4(0),
            CilFlavor::U4 => Value::U4(0),
            CilFlavor::I8 => Value::I8(0),
            CilFlavor::U8 => Value::U8(0),
            CilFlavor::R4 => Value::R4(0.0),
            CilFlavor::R8 => Value::R8(0.0),
            _ => Value::Null,
        }
    }

    /// Returns true for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The primitive flavor of this value, `None` for null, arrays and objects
    pub fn primitive_flavor(&self) -> Option<CilFlavor> {
        match self {
            Value::Boolean(_) => Some(CilFlavor::Boolean),
            Value::Char(_) => Some(CilFlavor::Char),
            Value::I1(_) => Some(CilFlavor::I1),
            Value::U1(_) => Some(CilFlavor::U1),
            Value::I2(_) => Some(CilFlavor::I2),
            Value::U2(_) => Some(CilFlavor::U2),
            Value::I4(_) => Some(CilFlavor::I4),
            Value::U4(_) => Some(CilFlavor::U4),
            Value::I8(_) => Some(CilFlavor::I8),
            Value::U8(_) => Some(CilFlavor::U8),
            Value::R4(_) => Some(CilFlavor::R4),
            Value::R8(_) => Some(CilFlavor::R8),
            Value::String(_) => Some(CilFlavor::String),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Returns true if this value is a non-null instance of `ty`
    pub fn is_instance_of(&self, ty: &CilType) -> bool {
        introspection::is_instance_of(self, ty)
    }

    /// Get the value as `i32`, if it is one
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I4(value) => Some(*value),
            _ => None,
        }
    }

    /// Get the value as `bool`, if it is one
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Get the value as string slice, if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Get the array, if the value is one
    pub fn as_array(&self) -> Option<&Arc<ArrayValue>> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Get the object, if the value is one
    pub fn as_object(&self) -> Option<&ObjectRc> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I1(a), Value::I1(b)) => a == b,
            (Value::U1(a), Value::U1(b)) => a == b,
            (Value::I2(a), Value::I2(b)) => a == b,
            (Value::U2(a), Value::U2(b)) => a == b,
            (Value::I4(a), Value::I4(b)) => a == b,
            (Value::U4(a), Value::U4(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::R4(a), Value::R4(b)) => a == b,
            (Value::R8(a), Value::R8(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.element_type.token == b.element_type.token && a.items == b.items
            }
            // Objects compare by identity
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Char(value) => write!(f, "'{value}'"),
            Value::I1(value) => write!(f, "{value}"),
            Value::U1(value) => write!(f, "{value}"),
            Value::I2(value) => write!(f, "{value}"),
            Value::U2(value) => write!(f, "{value}"),
            Value::I4(value) => write!(f, "{value}"),
            Value::U4(value) => write!(f, "{value}"),
            Value::I8(value) => write!(f, "{value}"),
            Value::U8(value) => write!(f, "{value}"),
            Value::R4(value) => write!(f, "{value}"),
            Value::R8(value) => write!(f, "{value}"),
            Value::String(value) => write!(f, "\"{value}\""),
            Value::Array(array) => {
                write!(f, "{}[", array.element_type.name)?;
                for (index, item) in array.items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(object) => write!(f, "{}", object.ty.fullname()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I4(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I8(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::R8(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<ObjectRc> for Value {
    fn from(value: ObjectRc) -> Self {
        Value::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::TypeRegistry;

    #[test]
    fn test_default_for_primitives() {
        let registry = TypeRegistry::new().unwrap();

        assert_eq!(
            Value::default_for(&registry.well_known("System.Int32").unwrap()),
            Value::I4(0)
        );
        assert_eq!(
            Value::default_for(&registry.well_known("System.Boolean").unwrap()),
            Value::Boolean(false)
        );
        assert_eq!(
            Value::default_for(&registry.well_known("System.String").unwrap()),
            Value::Null
        );
    }

    #[test]
    fn test_array_equality_uses_element_type_and_items() {
        let registry = TypeRegistry::new().unwrap();
        let int = registry.well_known("System.Int32").unwrap();
        let long = registry.well_known("System.Int64").unwrap();

        let a = Value::array(&int, vec![Value::I4(1), Value::I4(2)]);
        let b = Value::array(&int, vec![Value::I4(1), Value::I4(2)]);
        let c = Value::array(&long, vec![Value::I4(1), Value::I4(2)]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_object_identity() {
        let registry = TypeRegistry::new().unwrap();
        let object = registry.well_known("System.Object").unwrap();

        let first = Value::object(&object);
        let second = Value::object(&object);

        assert_eq!(first, first.clone());
        assert_ne!(first, second);
    }

    #[test]
    fn test_display() {
        let registry = TypeRegistry::new().unwrap();
        let int = registry.well_known("System.Int32").unwrap();

        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("x").to_string(), "\"x\"");
        assert_eq!(
            Value::array(&int, vec![Value::I4(3), Value::I4(4)]).to_string(),
            "Int32[3, 4]"
        );
    }
}
