use crate::{
    metadata::{
        invoke,
        method::MethodRc,
        node::{ParameterNode, TypeNode},
        value::Value,
    },
    Result,
};

/// Navigation handle for a method or constructor
#[derive(Clone)]
pub struct MethodNode {
    method: MethodRc,
}

impl MethodNode {
    /// Wrap a method
    pub fn new(method: &MethodRc) -> Self {
        MethodNode {
            method: method.clone(),
        }
    }

    /// The wrapped method
    pub fn method(&self) -> &MethodRc {
        &self.method
    }

    /// The declaring type
    pub fn parent(&self) -> Option<TypeNode> {
        self.method.declaring_type().map(|ty| TypeNode::new(&ty))
    }

    /// The declared parameters in declaration order
    pub fn parameters(&self) -> Vec<ParameterNode> {
        self.method
            .params
            .iter()
            .map(|(_, param)| ParameterNode::new(param))
            .collect()
    }

    /// The return type, `None` for void methods
    pub fn return_type(&self) -> Option<TypeNode> {
        self.method.return_type().map(|ty| TypeNode::new(&ty))
    }

    /// Returns true for constructors
    pub fn is_constructor(&self) -> bool {
        self.method.is_constructor()
    }

    /// Returns true for a constructor without parameters
    pub fn is_default(&self) -> bool {
        self.method.is_constructor() && self.method.params.is_empty()
    }

    /// Returns true for static methods
    pub fn is_static(&self) -> bool {
        self.method.is_static()
    }

    /// Returns true for public methods
    pub fn is_public(&self) -> bool {
        self.method.is_public()
    }

    /// Bind `args` to the declared parameters and call the method, see [`invoke::invoke`]
    ///
    /// # Errors
    /// Returns an error if the instance is missing for an instance method, the arguments do not
    /// bind, or the host body fails.
    pub fn invoke(&self, instance: Option<&Value>, args: &[Value]) -> Result<Option<Value>> {
        invoke::invoke(&self.method, instance, args)
    }

    /// Bind `args` to the declared parameters without calling the method
    ///
    /// # Errors
    /// Returns [`crate::Error::ParameterBinding`] if the arguments do not bind.
    pub fn bind(&self, args: &[Value]) -> Result<Vec<Value>> {
        invoke::bind_arguments(&invoke::parameter_specs(&self.method)?, args)
    }
}
