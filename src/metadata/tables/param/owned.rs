use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use crate::metadata::{
    customattributes::{AttributeProvider, CustomAttributeValue, CustomAttributeValueList},
    method::{MethodRc, MethodRef},
    tables::ParamAttributes,
    token::{Token, TABLE},
    typesystem::{CilTypeRc, CilTypeRef, WELL_KNOWN},
    value::Value,
};

/// Represents a declared parameter of a method or constructor
pub struct Param {
    /// Token
    pub token: Token,
    /// bitmask of `ParamAttributes`
    pub flags: u32,
    /// The 1-based position within the owning method, assigned when added to a method
    pub sequence: u32,
    /// The parameter name
    pub name: String,
    /// `flags.HAS_DEFAULT` -> This is the default value of this parameter
    pub default: Option<Value>,
    /// The declared type of this parameter
    param_type: CilTypeRef,
    /// The method that owns this parameter
    method: OnceLock<MethodRef>,
    /// Custom attributes applied to this parameter
    pub custom_attributes: CustomAttributeValueList,
}

impl Param {
    /// Create a new required parameter
    ///
    /// ## Arguments
    /// * 'name'       - The parameter name
    /// * '`param_type`' - The declared type
    pub fn new(name: &str, param_type: &CilTypeRc) -> Self {
        Param {
            token: Token::allocate(TABLE::PARAM),
            flags: 0,
            sequence: 0,
            name: name.to_string(),
            default: None,
            param_type: param_type.into(),
            method: OnceLock::new(),
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Give the parameter a default value; parameters with defaults are optional
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.flags |= ParamAttributes::HAS_DEFAULT | ParamAttributes::OPTIONAL;
        self.default = Some(default);
        self
    }

    /// Mark the parameter optional without a default value
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.flags |= ParamAttributes::OPTIONAL;
        self
    }

    /// Mark the parameter as an output parameter
    #[must_use]
    pub fn out(mut self) -> Self {
        self.flags |= ParamAttributes::OUT;
        self
    }

    /// Mark the parameter variadic; its declared type should be an array type
    #[must_use]
    pub fn variadic(self) -> Self {
        self.attribute(CustomAttributeValue::new(WELL_KNOWN::PARAM_ARRAY_ATTRIBUTE))
    }

    /// Attach a custom attribute
    #[must_use]
    pub fn attribute(self, attribute: CustomAttributeValue) -> Self {
        self.custom_attributes.push(Arc::new(attribute));
        self
    }

    pub(crate) fn attach(&self, method: &MethodRc) {
        let _ = self.method.set(MethodRef::new(method));
    }

    /// The declared type of this parameter
    pub fn param_type(&self) -> Option<CilTypeRc> {
        self.param_type.upgrade()
    }

    /// The method or constructor that declares this parameter
    pub fn method(&self) -> Option<MethodRc> {
        self.method.get().and_then(MethodRef::upgrade)
    }

    /// Returns true if the parameter is optional
    pub fn is_optional(&self) -> bool {
        self.flags & ParamAttributes::OPTIONAL != 0
    }

    /// Returns true if the parameter declares a default value
    pub fn has_default(&self) -> bool {
        self.flags & ParamAttributes::HAS_DEFAULT != 0 && self.default.is_some()
    }

    /// Returns true for output parameters
    pub fn is_out(&self) -> bool {
        self.flags & ParamAttributes::OUT != 0
    }
}

impl AttributeProvider for Param {
    fn token(&self) -> Token {
        self.token
    }

    fn custom_attributes(&self) -> &CustomAttributeValueList {
        &self.custom_attributes
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("sequence", &self.sequence)
            .field("flags", &format_args!("0x{:04x}", self.flags))
            .finish()
    }
}
