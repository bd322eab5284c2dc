//! Reflected methods and constructors.
//!
//! A [`Method`] describes one callable member of a type: its name, attribute flags, parameters
//! in declaration order, return type and the host body that performs the actual call.
//! Constructors are methods named `.ctor` carrying the special-name flags.
//!
//! Methods are built with a small fluent API and then attached to their declaring type through
//! [`crate::metadata::typesystem::CilType::add_method`], which wires up the back references of
//! the method and of its parameters.
//!
//! # Host Bodies
//!
//! The body is the raw invocation primitive of the host runtime. It receives the instance (for
//! instance members) and the already bound arguments, and returns the result; void methods
//! return [`Value::Null`]. Errors returned by a body are passed through to callers untouched.
//!
//! # Examples
//!
//! ```rust
//! use metascope::metadata::{
//!     method::Method,
//!     tables::Param,
//!     typesystem::{TypeBuilder, TypeRegistry},
//!     value::Value,
//! };
//!
//! let registry = TypeRegistry::new()?;
//! let assembly = registry.define_assembly("Sample");
//! let math = TypeBuilder::new(&registry, &assembly, "Sample", "Math").build()?;
//! let int = registry.well_known("System.Int32")?;
//!
//! let negate = math.add_method(
//!     Method::new("Negate")
//!         .as_static()
//!         .param(Param::new("value", &int))
//!         .returns(&int)
//!         .body(|_, args| Ok(Value::I4(-args[0].as_i32().unwrap_or_default()))),
//! );
//!
//! assert_eq!(negate.invoke_raw(None, &[Value::I4(4)])?, Value::I4(-4));
//! assert_eq!(negate.declaring_type().unwrap().token, math.token);
//! # Ok::<(), metascope::Error>(())
//! ```

mod types;

use std::{
    fmt,
    sync::{Arc, OnceLock, Weak},
};

pub use types::*;

use crate::{
    metadata::{
        customattributes::{AttributeProvider, CustomAttributeValue, CustomAttributeValueList},
        tables::{Param, ParamList, ParamRc},
        token::{Token, TABLE},
        typesystem::{CilFlavor, CilTypeRc, CilTypeRef},
        value::Value,
    },
    Error::NotSupported,
    Result,
};

/// The host implementation of a method: `(instance, bound arguments) -> result`
pub type MethodBody = Arc<dyn Fn(Option<&Value>, &[Value]) -> Result<Value> + Send + Sync>;
/// A reference to a `Method`
pub type MethodRc = Arc<Method>;
/// A vector that holds a list of `Method`
pub type MethodList = Arc<boxcar::Vec<MethodRc>>;

/// Name of instance constructors
pub const CONSTRUCTOR_NAME: &str = ".ctor";

/// A weak reference to a `Method`, used for back references from parameters
#[derive(Clone)]
pub struct MethodRef {
    weak_ref: Weak<Method>,
}

impl MethodRef {
    /// Create a new `MethodRef` from a strong reference
    pub fn new(strong_ref: &MethodRc) -> Self {
        MethodRef {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the method, if it is still alive
    pub fn upgrade(&self) -> Option<MethodRc> {
        self.weak_ref.upgrade()
    }

    /// Get the token of the referenced method
    pub fn token(&self) -> Option<Token> {
        self.upgrade().map(|method| method.token)
    }
}

/// Represents a reflected method or constructor
pub struct Method {
    /// Token
    pub token: Token,
    /// The name of this method
    pub name: String,
    /// Accessibility
    pub flags_access: MethodAccessFlags,
    /// Modifiers (static, virtual, special-name, ...)
    pub flags_modifiers: MethodModifiers,
    /// All parameters, in declaration order
    pub params: ParamList,
    /// The return type, `None` for void
    return_type: Option<CilTypeRef>,
    /// The type that declares this method
    declaring_type: OnceLock<CilTypeRef>,
    /// The host implementation
    body: Option<MethodBody>,
    /// Custom attributes attached to this method
    pub custom_attributes: CustomAttributeValueList,
}

impl Method {
    /// Create a new public instance method without parameters, return type or body
    ///
    /// ## Arguments
    /// * 'name' - The name of the method
    pub fn new(name: &str) -> Self {
        Method {
            token: Token::allocate(TABLE::METHODDEF),
            name: name.to_string(),
            flags_access: MethodAccessFlags::PUBLIC,
            flags_modifiers: MethodModifiers::HIDE_BY_SIG,
            params: Arc::new(boxcar::Vec::new()),
            return_type: None,
            declaring_type: OnceLock::new(),
            body: None,
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Create a new public instance constructor
    pub fn constructor() -> Self {
        let mut method = Method::new(CONSTRUCTOR_NAME);
        method.flags_modifiers |= MethodModifiers::SPECIAL_NAME | MethodModifiers::RTSPECIAL_NAME;
        method
    }

    /// Create a property or event accessor (`get_Name`, `set_Name`, `add_Name`, ...)
    pub fn accessor(name: &str) -> Self {
        let mut method = Method::new(name);
        method.flags_modifiers |= MethodModifiers::SPECIAL_NAME;
        method
    }

    /// Replace the attribute flags with a raw attribute word
    #[must_use]
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags_access = MethodAccessFlags::from_method_flags(flags);
        self.flags_modifiers = MethodModifiers::from_method_flags(flags);
        self
    }

    /// Make the method private
    #[must_use]
    pub fn private(mut self) -> Self {
        self.flags_access = MethodAccessFlags::PRIVATE;
        self
    }

    /// Make the method static
    #[must_use]
    pub fn as_static(mut self) -> Self {
        self.flags_modifiers |= MethodModifiers::STATIC;
        self
    }

    /// Append a parameter; its sequence number is its 1-based position
    #[must_use]
    pub fn param(self, mut param: Param) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        {
            param.sequence = self.params.count() as u32 + 1;
        }
        self.params.push(Arc::new(param));
        self
    }

    /// Set the return type
    #[must_use]
    pub fn returns(mut self, return_type: &CilTypeRc) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    /// Set the host implementation
    #[must_use]
    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(Option<&Value>, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    /// Attach a custom attribute
    #[must_use]
    pub fn attribute(self, attribute: CustomAttributeValue) -> Self {
        self.custom_attributes.push(Arc::new(attribute));
        self
    }

    /// Wire up the back references to the declaring type; the first assignment wins
    pub(crate) fn attach(self: &Arc<Self>, declaring_type: &CilTypeRc) {
        let _ = self.declaring_type.set(declaring_type.into());
        for (_, param) in self.params.iter() {
            param.attach(self);
        }
    }

    /// The type that declares this method
    pub fn declaring_type(&self) -> Option<CilTypeRc> {
        self.declaring_type.get().and_then(CilTypeRef::upgrade)
    }

    /// The return type, `None` for void methods
    pub fn return_type(&self) -> Option<CilTypeRc> {
        self.return_type
            .as_ref()
            .and_then(CilTypeRef::upgrade)
            .filter(|return_type| return_type.flavor != CilFlavor::Void)
    }

    /// Returns true if the method does not return a value
    pub fn is_void(&self) -> bool {
        self.return_type().is_none()
    }

    /// All parameters in declaration order
    pub fn param_list(&self) -> Vec<ParamRc> {
        self.params.iter().map(|(_, param)| param.clone()).collect()
    }

    /// Returns true for constructors
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME && self.flags_modifiers.contains(MethodModifiers::RTSPECIAL_NAME)
    }

    /// Returns true for static methods
    pub fn is_static(&self) -> bool {
        self.flags_modifiers.contains(MethodModifiers::STATIC)
    }

    /// Returns true for public methods
    pub fn is_public(&self) -> bool {
        self.flags_access == MethodAccessFlags::PUBLIC
    }

    /// Returns true if the host supplied an implementation
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Call the host implementation with already bound arguments
    ///
    /// ## Arguments
    /// * 'instance' - The target instance, `None` for static methods and constructors
    /// * 'args'     - The bound arguments, one per parameter
    ///
    /// # Errors
    /// Returns [`crate::Error::NotSupported`] if the method has no body, otherwise whatever the
    /// body returns.
    pub fn invoke_raw(&self, instance: Option<&Value>, args: &[Value]) -> Result<Value> {
        match &self.body {
            Some(body) => body(instance, args),
            None => Err(NotSupported(format!("Method {} has no body", self.name))),
        }
    }
}

impl AttributeProvider for Method {
    fn token(&self) -> Token {
        self.token
    }

    fn custom_attributes(&self) -> &CustomAttributeValueList {
        &self.custom_attributes
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("params", &self.params.count())
            .field("static", &self.is_static())
            .finish()
    }
}
