use crate::{
    metadata::{
        invoke,
        method::MethodRc,
        node::{MethodNode, TypeNode},
        tables::EventRc,
        typesystem::introspection,
        value::Value,
    },
    Result,
};

/// Navigation handle for an event
#[derive(Clone)]
pub struct EventNode {
    event: EventRc,
}

impl EventNode {
    /// Wrap an event
    pub fn new(event: &EventRc) -> Self {
        EventNode {
            event: event.clone(),
        }
    }

    /// The wrapped event
    pub fn event(&self) -> &EventRc {
        &self.event
    }

    /// The declaring type
    pub fn parent(&self) -> Option<TypeNode> {
        self.event.declaring_type().map(|ty| TypeNode::new(&ty))
    }

    /// The accessors that exist: add, remove, raise, then the other accessors
    pub fn accessors(&self) -> Vec<MethodNode> {
        self.event
            .accessors()
            .iter()
            .map(MethodNode::new)
            .collect()
    }

    /// The add accessor
    pub fn add_method(&self) -> Option<MethodNode> {
        self.event.add_method().map(|method| MethodNode::new(&method))
    }

    /// The remove accessor
    pub fn remove_method(&self) -> Option<MethodNode> {
        self.event.remove_method().map(|method| MethodNode::new(&method))
    }

    /// The raise accessor
    pub fn raise_method(&self) -> Option<MethodNode> {
        self.event.raise_method().map(|method| MethodNode::new(&method))
    }

    /// The delegate type of the handlers
    pub fn delegate_type(&self) -> Option<TypeNode> {
        self.event.handler_type().map(|ty| TypeNode::new(&ty))
    }

    /// Returns true if the first accessor is static
    pub fn is_static(&self) -> bool {
        self.accessors()
            .first()
            .is_some_and(MethodNode::is_static)
    }

    /// Returns true if any accessor is public
    pub fn is_public(&self) -> bool {
        self.accessors().iter().any(MethodNode::is_public)
    }

    /// Subscribe `handler` through the add accessor
    ///
    /// ## Arguments
    /// * 'instance' - The event source, `None` for static events
    /// * 'handler'  - The delegate to subscribe
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the handler is not an instance of the delegate
    /// type or the event has no add accessor, and any error of the accessor call.
    pub fn add_handler(&self, instance: Option<&Value>, handler: &Value) -> Result<()> {
        let accessor = self.event.add_method();
        self.call_accessor(accessor, "add", instance, handler)
    }

    /// Unsubscribe `handler` through the remove accessor
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the handler is not an instance of the delegate
    /// type or the event has no remove accessor, and any error of the accessor call.
    pub fn remove_handler(&self, instance: Option<&Value>, handler: &Value) -> Result<()> {
        let accessor = self.event.remove_method();
        self.call_accessor(accessor, "remove", instance, handler)
    }

    /// Raising events is not supported through reflection
    ///
    /// # Errors
    /// Always returns [`crate::Error::InvalidOperation`].
    pub fn invoke_handler(&self, _instance: Option<&Value>, _args: &[Value]) -> Result<Option<Value>> {
        Err(invalid_operation!(
            "Event {} cannot be raised through reflection",
            self.event.name
        ))
    }

    fn call_accessor(
        &self,
        accessor: Option<MethodRc>,
        kind: &str,
        instance: Option<&Value>,
        handler: &Value,
    ) -> Result<()> {
        let Some(delegate_type) = self.event.handler_type() else {
            return Err(invalid_argument!(
                "Event {} has no delegate type",
                self.event.name
            ));
        };
        introspection::is_instance_of_type(handler, &delegate_type)?;

        let Some(accessor) = accessor else {
            return Err(invalid_argument!(
                "Event {} has no {} accessor",
                self.event.name,
                kind
            ));
        };

        invoke::invoke(&accessor, instance, std::slice::from_ref(handler))?;
        Ok(())
    }
}
