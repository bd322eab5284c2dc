//! CustomAttribute-specific types and data structures.
//!
//! This module contains all the types used for representing custom attribute instances attached
//! to reflected entities: the attribute type, its constructor arguments and its named field and
//! property assignments.

use std::sync::Arc;

/// A reference-counted pointer to a `CustomAttributeValue`
pub type CustomAttributeValueRc = Arc<CustomAttributeValue>;
/// A vector that holds a list of `CustomAttributeValue` instances for storage on parent objects
pub type CustomAttributeValueList = Arc<boxcar::Vec<CustomAttributeValueRc>>;

/// Represents one custom attribute instance with its arguments and named arguments
#[derive(Debug, Clone)]
pub struct CustomAttributeValue {
    /// Full name of the attribute type (e.g. `System.ParamArrayAttribute`)
    pub attribute_type: String,
    /// Fixed arguments from the constructor signature
    pub fixed_args: Vec<CustomAttributeArgument>,
    /// Named arguments (fields and properties)
    pub named_args: Vec<CustomAttributeNamedArgument>,
}

impl CustomAttributeValue {
    /// Create an attribute instance without arguments
    ///
    /// ## Arguments
    /// * '`attribute_type`' - Full name of the attribute type
    pub fn new(attribute_type: &str) -> Self {
        CustomAttributeValue {
            attribute_type: attribute_type.to_string(),
            fixed_args: Vec::new(),
            named_args: Vec::new(),
        }
    }

    /// Append a constructor argument
    #[must_use]
    pub fn with_arg(mut self, arg: CustomAttributeArgument) -> Self {
        self.fixed_args.push(arg);
        self
    }

    /// Append a named property assignment
    #[must_use]
    pub fn with_property(mut self, name: &str, arg_type: &str, value: CustomAttributeArgument) -> Self {
        self.named_args.push(CustomAttributeNamedArgument {
            is_field: false,
            name: name.to_string(),
            arg_type: arg_type.to_string(),
            value,
        });
        self
    }

    /// Append a named field assignment
    #[must_use]
    pub fn with_field(mut self, name: &str, arg_type: &str, value: CustomAttributeArgument) -> Self {
        self.named_args.push(CustomAttributeNamedArgument {
            is_field: true,
            name: name.to_string(),
            arg_type: arg_type.to_string(),
            value,
        });
        self
    }

    /// Returns true if this attribute is of the given type (full name)
    pub fn is(&self, attribute_type: &str) -> bool {
        self.attribute_type == attribute_type
    }

    /// Look up a named argument by field or property name
    pub fn named(&self, name: &str) -> Option<&CustomAttributeArgument> {
        self.named_args
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }
}

/// Represents a single custom attribute argument value
#[derive(Debug, Clone, PartialEq)]
pub enum CustomAttributeArgument {
    /// Boolean value
    Bool(bool),
    /// Character value
    Char(char),
    /// Signed 8-bit integer
    I1(i8),
    /// Unsigned 8-bit integer
    U1(u8),
    /// Signed 16-bit integer
    I2(i16),
    /// Unsigned 16-bit integer
    U2(u16),
    /// Signed 32-bit integer
    I4(i32),
    /// Unsigned 32-bit integer
    U4(u32),
    /// Signed 64-bit integer
    I8(i64),
    /// Unsigned 64-bit integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// UTF-8 string
    String(String),
    /// Type reference (as full name)
    Type(String),
    /// Array of arguments
    Array(Vec<CustomAttributeArgument>),
    /// Enum value (enum type + underlying value)
    Enum(String, Box<CustomAttributeArgument>),
}

/// Represents a named argument (field or property) in a custom attribute
#[derive(Debug, Clone)]
pub struct CustomAttributeNamedArgument {
    /// Whether this is a field (true) or property (false)
    pub is_field: bool,
    /// Name of the field or property
    pub name: String,
    /// Type of the argument
    pub arg_type: String,
    /// Value of the argument
    pub value: CustomAttributeArgument,
}
