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

/// Represents an event of a type
pub struct Event {
    /// Token
    pub token: Token,
    /// The name of this event
    pub name: String,
    /// The delegate type of the handlers
    handler_type: CilTypeRef,
    /// The `AddOn` method
    fn_add: Option<MethodRc>,
    /// The `RemoveOn` method
    fn_remove: Option<MethodRc>,
    /// The `Fire` method
    fn_raise: Option<MethodRc>,
    /// Additional accessor methods
    fn_other: Vec<MethodRc>,
    /// The type that declares this event
    declaring_type: OnceLock<CilTypeRef>,
    /// Custom attributes attached to this event
    pub custom_attributes: CustomAttributeValueList,
}

impl Event {
    /// Create a new event without accessors
    ///
    /// ## Arguments
    /// * 'name'         - The name of the event
    /// * '`handler_type`' - The delegate type of the handlers
    pub fn new(name: &str, handler_type: &CilTypeRc) -> Self {
        Event {
            token: Token::allocate(TABLE::EVENT),
            name: name.to_string(),
            handler_type: handler_type.into(),
            fn_add: None,
            fn_remove: None,
            fn_raise: None,
            fn_other: Vec::new(),
            declaring_type: OnceLock::new(),
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Set the add accessor
    #[must_use]
    pub fn add(mut self, method: Method) -> Self {
        self.fn_add = Some(Arc::new(method));
        self
    }

    /// Set the remove accessor
    #[must_use]
    pub fn remove(mut self, method: Method) -> Self {
        self.fn_remove = Some(Arc::new(method));
        self
    }

    /// Set the raise accessor
    #[must_use]
    pub fn raise(mut self, method: Method) -> Self {
        self.fn_raise = Some(Arc::new(method));
        self
    }

    /// Append an additional accessor method
    #[must_use]
    pub fn other(mut self, method: Method) -> Self {
        self.fn_other.push(Arc::new(method));
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

    /// The delegate type of the handlers
    pub fn handler_type(&self) -> Option<CilTypeRc> {
        self.handler_type.upgrade()
    }

    /// The type that declares this event
    pub fn declaring_type(&self) -> Option<CilTypeRc> {
        self.declaring_type.get().and_then(CilTypeRef::upgrade)
    }

    /// The add accessor, if declared
    pub fn add_method(&self) -> Option<MethodRc> {
        self.fn_add.clone()
    }

    /// The remove accessor, if declared
    pub fn remove_method(&self) -> Option<MethodRc> {
        self.fn_remove.clone()
    }

    /// The raise accessor, if declared
    pub fn raise_method(&self) -> Option<MethodRc> {
        self.fn_raise.clone()
    }

    /// The additional accessor methods
    pub fn other_methods(&self) -> &[MethodRc] {
        &self.fn_other
    }

    /// All accessors: add, remove and raise (each if declared) followed by the additional ones
    pub fn accessors(&self) -> Vec<MethodRc> {
        [&self.fn_add, &self.fn_remove, &self.fn_raise]
            .into_iter()
            .flatten()
            .chain(self.fn_other.iter())
            .cloned()
            .collect()
    }
}

impl AttributeProvider for Event {
    fn token(&self) -> Token {
        self.token
    }

    fn custom_attributes(&self) -> &CustomAttributeValueList {
        &self.custom_attributes
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("accessors", &self.accessors().len())
            .finish()
    }
}
