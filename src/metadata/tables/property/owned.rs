use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use crate::metadata::{
    customattributes::{AttributeProvider, CustomAttributeValue, CustomAttributeValueList},
    method::{Method, MethodRc},
    token::{Token, TABLE},
    typesystem::{CilTypeRc, CilTypeRef},
};

/// Represents a property of a type
pub struct Property {
    /// Token
    pub token: Token,
    /// The name of this property
    pub name: String,
    /// The declared type of this property
    property_type: CilTypeRef,
    /// The `Method` that retrieves this property
    fn_getter: Option<MethodRc>,
    /// The `Method` that sets this property
    fn_setter: Option<MethodRc>,
    /// The type that declares this property
    declaring_type: OnceLock<CilTypeRef>,
    /// Custom attributes attached to this property
    pub custom_attributes: CustomAttributeValueList,
}

impl Property {
    /// Create a new property without accessors
    ///
    /// ## Arguments
    /// * 'name'          - The name of the property
    /// * '`property_type`' - The declared type
    pub fn new(name: &str, property_type: &CilTypeRc) -> Self {
        Property {
            token: Token::allocate(TABLE::PROPERTY),
            name: name.to_string(),
            property_type: property_type.into(),
            fn_getter: None,
            fn_setter: None,
            declaring_type: OnceLock::new(),
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Set the getter; it takes the index parameters and returns the property type
    #[must_use]
    pub fn getter(mut self, getter: Method) -> Self {
        self.fn_getter = Some(Arc::new(getter));
        self
    }

    /// Set the setter; it takes the index parameters followed by the value
    #[must_use]
    pub fn setter(mut self, setter: Method) -> Self {
        self.fn_setter = Some(Arc::new(setter));
        self
    }

    /// Attach a custom attribute
    #[must_use]
    pub fn attribute(self, attribute: CustomAttributeValue) -> Self {
        self.custom_attributes.push(Arc::new(attribute));
        self
    }

    pub(crate) fn attach(&self, declaring_type: &CilTypeRc) {
        let _ = self.declaring_type.set(declaring_type.into());
    }

    /// The declared type of this property
    pub fn property_type(&self) -> Option<CilTypeRc> {
        self.property_type.upgrade()
    }

    /// The type that declares this property
    pub fn declaring_type(&self) -> Option<CilTypeRc> {
        self.declaring_type.get().and_then(CilTypeRef::upgrade)
    }

    /// The getter, if declared
    pub fn get_method(&self) -> Option<MethodRc> {
        self.fn_getter.clone()
    }

    /// The setter, if declared
    pub fn set_method(&self) -> Option<MethodRc> {
        self.fn_setter.clone()
    }
}

impl AttributeProvider for Property {
    fn token(&self) -> Token {
        self.token
    }

    fn custom_attributes(&self) -> &CustomAttributeValueList {
        &self.custom_attributes
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("getter", &self.fn_getter.is_some())
            .field("setter", &self.fn_setter.is_some())
            .finish()
    }
}
