use crate::{
    metadata::{
        customattributes::AttributeCache,
        invoke::ParameterSpec,
        node::{MethodNode, TypeNode},
        tables::ParamRc,
        typesystem::WELL_KNOWN,
        value::Value,
    },
    Error::TypeNotFound,
    Result,
};

/// Navigation handle for a parameter of a method or constructor
#[derive(Clone)]
pub struct ParameterNode {
    param: ParamRc,
}

impl ParameterNode {
    /// Wrap a parameter
    pub fn new(param: &ParamRc) -> Self {
        ParameterNode {
            param: param.clone(),
        }
    }

    /// The wrapped parameter
    pub fn param(&self) -> &ParamRc {
        &self.param
    }

    /// The method or constructor that declares this parameter
    pub fn parent(&self) -> Option<MethodNode> {
        self.param.method().map(|method| MethodNode::new(&method))
    }

    /// Zero-based position within the declaring method
    pub fn position(&self) -> usize {
        self.param.sequence.saturating_sub(1) as usize
    }

    /// The declared type
    pub fn param_type(&self) -> Option<TypeNode> {
        self.param.param_type().map(|ty| TypeNode::new(&ty))
    }

    /// Returns true if the parameter may be omitted
    pub fn is_optional(&self) -> bool {
        self.param.is_optional()
    }

    /// Returns true if the parameter declares a default value
    pub fn has_default(&self) -> bool {
        self.param.has_default()
    }

    /// The declared default value
    pub fn default_value(&self) -> Option<&Value> {
        self.param.default.as_ref()
    }

    /// Returns true if the parameter collects trailing arguments: it carries
    /// `System.ParamArrayAttribute` and is declared with an array type
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the parameter has a null token.
    pub fn is_variadic(&self) -> Result<bool> {
        let is_array = self
            .param
            .param_type()
            .is_some_and(|ty| ty.is_array());
        if !is_array {
            return Ok(false);
        }

        AttributeCache::global().has_attribute(&*self.param, WELL_KNOWN::PARAM_ARRAY_ATTRIBUTE)
    }

    /// The binding description of this parameter
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeNotFound`] if the declared type is gone, or
    /// [`crate::Error::InvalidArgument`] if the parameter has a null token.
    pub fn spec(&self) -> Result<ParameterSpec> {
        let Some(param_type) = self.param.param_type() else {
            return Err(TypeNotFound(format!(
                "declared type of parameter {}",
                self.param.name
            )));
        };

        Ok(ParameterSpec {
            name: self.param.name.clone(),
            param_type,
            default: self.param.default.clone(),
            is_variadic: self.is_variadic()?,
            is_optional: self.is_optional(),
            position: self.position(),
        })
    }
}
