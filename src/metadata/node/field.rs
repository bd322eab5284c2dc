use crate::{
    metadata::{
        datamember::DataMember,
        node::{ParameterNode, TypeNode},
        tables::FieldRc,
        typesystem::introspection,
        value::Value,
    },
    Result,
};

/// Navigation handle for a field
#[derive(Clone)]
pub struct FieldNode {
    field: FieldRc,
}

impl FieldNode {
    /// Wrap a field
    pub fn new(field: &FieldRc) -> Self {
        FieldNode {
            field: field.clone(),
        }
    }

    /// The wrapped field
    pub fn field(&self) -> &FieldRc {
        &self.field
    }

    /// The declaring type
    pub fn parent(&self) -> Option<TypeNode> {
        self.field.declaring_type().map(|ty| TypeNode::new(&ty))
    }

    /// Returns true for fields that can only be written during initialization
    pub fn is_init_only(&self) -> bool {
        self.field.is_init_only()
    }
}

impl DataMember for FieldNode {
    fn name(&self) -> &str {
        &self.field.name
    }

    fn data_type(&self) -> Option<TypeNode> {
        self.field.field_type().map(|ty| TypeNode::new(&ty))
    }

    fn declaring_type(&self) -> Option<TypeNode> {
        self.parent()
    }

    fn is_static(&self) -> bool {
        self.field.is_static()
    }

    fn is_public(&self) -> bool {
        self.field.is_public()
    }

    fn index_parameters(&self) -> Vec<ParameterNode> {
        Vec::new()
    }

    fn get_value_with(&self, instance: Option<&Value>, _indices: &[Value]) -> Result<Value> {
        self.field.load(instance)
    }

    fn set_value_with(&self, instance: Option<&Value>, _indices: &[Value], value: Value) -> Result<()> {
        if value.is_null() {
            if let Some(field_type) = self.field.field_type() {
                if !introspection::is_nullable(&field_type) {
                    return Err(invalid_argument!(
                        "Field {} of value type {} cannot be set to null",
                        self.field.name,
                        field_type.fullname()
                    ));
                }
            }
        }

        self.field.store(instance, value)
    }
}
