use std::{
    fmt,
    sync::{Arc, OnceLock, RwLock},
};

use crate::{
    metadata::{
        customattributes::{AttributeProvider, CustomAttributeValue, CustomAttributeValueList},
        tables::FieldAttributes,
        token::{Token, TABLE},
        typesystem::{introspection, CilTypeRc, CilTypeRef},
        value::{ObjectRc, Value},
    },
    Result,
};

/// Represents a field of a type
pub struct Field {
    /// Token
    pub token: Token,
    /// bitmask of `FieldAttributes`
    pub flags: u32,
    /// The name of the field
    pub name: String,
    /// The declared type of the field
    field_type: CilTypeRef,
    /// The type that declares this field
    declaring_type: OnceLock<CilTypeRef>,
    /// Storage of static fields
    static_value: RwLock<Value>,
    /// Custom attributes attached to this field
    pub custom_attributes: CustomAttributeValueList,
}

impl Field {
    /// Create a new field
    ///
    /// ## Arguments
    /// * 'name'       - The name of the field
    /// * 'flags'      - bitmask of [`FieldAttributes`]
    /// * '`field_type`' - The declared type
    pub fn new(name: &str, flags: u32, field_type: &CilTypeRc) -> Self {
        Field {
            token: Token::allocate(TABLE::FIELD),
            flags,
            name: name.to_string(),
            field_type: field_type.into(),
            declaring_type: OnceLock::new(),
            static_value: RwLock::new(Value::default_for(field_type)),
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
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

    /// The declared type of this field
    pub fn field_type(&self) -> Option<CilTypeRc> {
        self.field_type.upgrade()
    }

    /// The type that declares this field
    pub fn declaring_type(&self) -> Option<CilTypeRc> {
        self.declaring_type.get().and_then(CilTypeRef::upgrade)
    }

    /// Returns true for static fields
    pub fn is_static(&self) -> bool {
        self.flags & FieldAttributes::STATIC != 0
    }

    /// Returns true for public fields
    pub fn is_public(&self) -> bool {
        self.flags & FieldAttributes::FIELD_ACCESS_MASK == FieldAttributes::PUBLIC
    }

    /// Returns true for fields that can only be written during initialization
    pub fn is_init_only(&self) -> bool {
        self.flags & FieldAttributes::INIT_ONLY != 0
    }

    /// Read the field
    ///
    /// ## Arguments
    /// * 'instance' - The object holding the field, ignored for static fields
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if an instance field is read without an object
    /// that has this field, or [`crate::Error::LockError`] if the static storage is poisoned.
    pub fn load(&self, instance: Option<&Value>) -> Result<Value> {
        if self.is_static() {
            return Ok(read_lock!(self.static_value)?.clone());
        }

        let object = self.target(instance)?;
        object.load(self.token).ok_or_else(|| {
            invalid_argument!(
                "Field {} is not defined on {}",
                self.name,
                object.ty.fullname()
            )
        })
    }

    /// Write the field
    ///
    /// ## Arguments
    /// * 'instance' - The object holding the field, ignored for static fields
    /// * 'value'    - The new value, which must be an instance of the field type
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the value does not fit the field type or an
    /// instance field is written without an object that has this field.
    pub fn store(&self, instance: Option<&Value>, value: Value) -> Result<()> {
        if let Some(field_type) = self.field_type() {
            let fits = if value.is_null() {
                introspection::is_nullable(&field_type)
            } else {
                value.is_instance_of(&field_type)
            };
            if !fits {
                return Err(invalid_argument!(
                    "Value {} cannot be stored in field {} of type {}",
                    value,
                    self.name,
                    field_type.fullname()
                ));
            }
        }

        if self.is_static() {
            *write_lock!(self.static_value)? = value;
            return Ok(());
        }

        let object = self.target(instance)?;
        if object.load(self.token).is_none() {
            return Err(invalid_argument!(
                "Field {} is not defined on {}",
                self.name,
                object.ty.fullname()
            ));
        }
        object.store(self.token, value);
        Ok(())
    }

    fn target<'a>(&self, instance: Option<&'a Value>) -> Result<&'a ObjectRc> {
        match instance {
            Some(Value::Object(object)) => Ok(object),
            Some(other) => Err(invalid_argument!(
                "Field {} requires an object instance, got {}",
                self.name,
                other
            )),
            None => Err(invalid_argument!(
                "Field {} is an instance field and requires an instance",
                self.name
            )),
        }
    }
}

impl AttributeProvider for Field {
    fn token(&self) -> Token {
        self.token
    }

    fn custom_attributes(&self) -> &CustomAttributeValueList {
        &self.custom_attributes
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("flags", &format_args!("0x{:04x}", self.flags))
            .finish()
    }
}
