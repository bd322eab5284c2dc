use crate::{
    metadata::{
        datamember::DataMember,
        invoke,
        node::{MethodNode, ParameterNode, TypeNode},
        tables::PropertyRc,
        value::Value,
    },
    Result,
};

/// Navigation handle for a property
///
/// Values are read through the getter and written through the setter, both routed through
/// [`invoke::invoke`] so that index arguments and the assigned value are bound and validated
/// against the accessor parameters.
#[derive(Clone)]
pub struct PropertyNode {
    property: PropertyRc,
}

impl PropertyNode {
    /// Wrap a property
    pub fn new(property: &PropertyRc) -> Self {
        PropertyNode {
            property: property.clone(),
        }
    }

    /// The wrapped property
    pub fn property(&self) -> &PropertyRc {
        &self.property
    }

    /// The declaring type
    pub fn parent(&self) -> Option<TypeNode> {
        self.property
            .declaring_type()
            .map(|ty| TypeNode::new(&ty))
    }

    /// The get accessor, if any
    pub fn getter(&self) -> Option<MethodNode> {
        self.property.get_method().map(|method| MethodNode::new(&method))
    }

    /// The set accessor, if any
    pub fn setter(&self) -> Option<MethodNode> {
        self.property.set_method().map(|method| MethodNode::new(&method))
    }

    /// The accessors that exist: getter first, then setter
    pub fn accessors(&self) -> Vec<MethodNode> {
        self.getter().into_iter().chain(self.setter()).collect()
    }

    /// Returns true if the property can be read
    pub fn can_read(&self) -> bool {
        self.property.get_method().is_some()
    }

    /// Returns true if the property can be written
    pub fn can_write(&self) -> bool {
        self.property.set_method().is_some()
    }

    fn check_arity(&self, indices: &[Value]) -> Result<()> {
        let declared = self.index_parameters().len();
        if declared == 0 && !indices.is_empty() {
            return Err(invalid_operation!(
                "Property {} is not indexed but {} indices were supplied",
                self.property.name,
                indices.len()
            ));
        }
        if declared > 0 && indices.is_empty() {
            return Err(invalid_operation!(
                "Property {} is indexed and requires indices",
                self.property.name
            ));
        }
        if indices.len() > declared {
            return Err(invalid_operation!(
                "Property {} takes {} indices, {} were supplied",
                self.property.name,
                declared,
                indices.len()
            ));
        }
        Ok(())
    }
}

impl DataMember for PropertyNode {
    fn name(&self) -> &str {
        &self.property.name
    }

    fn data_type(&self) -> Option<TypeNode> {
        self.property
            .property_type()
            .map(|ty| TypeNode::new(&ty))
    }

    fn declaring_type(&self) -> Option<TypeNode> {
        self.parent()
    }

    fn is_static(&self) -> bool {
        self.accessors()
            .first()
            .is_some_and(MethodNode::is_static)
    }

    fn is_public(&self) -> bool {
        self.accessors().iter().any(MethodNode::is_public)
    }

    fn index_parameters(&self) -> Vec<ParameterNode> {
        if let Some(getter) = self.getter() {
            return getter.parameters();
        }

        match self.setter() {
            Some(setter) => {
                let mut parameters = setter.parameters();
                parameters.pop();
                parameters
            }
            None => Vec::new(),
        }
    }

    fn get_value_with(&self, instance: Option<&Value>, indices: &[Value]) -> Result<Value> {
        let Some(getter) = self.property.get_method() else {
            return Err(invalid_operation!(
                "Property {} has no get accessor",
                self.property.name
            ));
        };
        self.check_arity(indices)?;

        Ok(invoke::invoke(&getter, instance, indices)?.unwrap_or(Value::Null))
    }

    fn set_value_with(&self, instance: Option<&Value>, indices: &[Value], value: Value) -> Result<()> {
        let Some(setter) = self.property.set_method() else {
            return Err(invalid_operation!(
                "Property {} has no set accessor",
                self.property.name
            ));
        };
        self.check_arity(indices)?;

        let mut args = Vec::with_capacity(indices.len() + 1);
        args.extend_from_slice(indices);
        args.push(value);

        invoke::invoke(&setter, instance, &args)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::SampleModel, Error};

    fn property(model: &SampleModel, name: &str) -> PropertyNode {
        PropertyNode::new(&model.widget.property(name).unwrap())
    }

    #[test]
    fn test_read_goes_through_getter() {
        let model = SampleModel::new();
        let name = property(&model, "Name");
        let instance = model.new_widget();

        name.set_value(Some(&instance), Value::from("gear")).unwrap();
        assert_eq!(name.get_value(Some(&instance)).unwrap(), Value::from("gear"));
        assert_eq!(name.data_type().unwrap().fullname(), "System.String");
        assert!(name.is_public());
        assert!(!name.is_static());
        assert!(!name.is_indexed());
    }

    #[test]
    fn test_indexer() {
        let model = SampleModel::new();
        let item = property(&model, "Item");
        let instance = model.new_widget();

        assert!(item.is_indexed());
        assert_eq!(item.index_parameters().len(), 1);

        item.set_value_indexed(Some(&instance), Value::I4(2), Value::from("two"))
            .unwrap();
        assert_eq!(
            item.get_value_indexed(Some(&instance), Value::I4(2)).unwrap(),
            Value::from("two")
        );
        assert_eq!(
            item.get_value_indexed(Some(&instance), Value::I4(7)).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_indexer_arity() {
        let model = SampleModel::new();
        let item = property(&model, "Item");
        let name = property(&model, "Name");
        let instance = model.new_widget();

        assert!(matches!(
            item.get_value(Some(&instance)),
            Err(Error::InvalidOperation(_))
        ));
        assert!(matches!(
            item.get_value_with(Some(&instance), &[Value::I4(1), Value::I4(2)]),
            Err(Error::InvalidOperation(_))
        ));
        assert!(matches!(
            name.get_value_indexed(Some(&instance), Value::I4(1)),
            Err(Error::InvalidOperation(_))
        ));
        assert!(matches!(
            name.set_value_indexed(Some(&instance), Value::I4(1), Value::from("x")),
            Err(Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_missing_accessors() {
        let model = SampleModel::new();
        let length = property(&model, "Length");
        let label = property(&model, "Label");
        let instance = model.new_widget();

        assert!(length.can_read() && !length.can_write());
        assert!(matches!(
            length.set_value(Some(&instance), Value::I4(1)),
            Err(Error::InvalidOperation(_))
        ));

        assert!(!label.can_read() && label.can_write());
        assert!(matches!(
            label.get_value(Some(&instance)),
            Err(Error::InvalidOperation(_))
        ));
        label.set_value(Some(&instance), Value::from("tag")).unwrap();
    }

    #[test]
    fn test_setter_only_index_parameters_drop_value() {
        let model = SampleModel::new();
        let label = property(&model, "Label");

        assert!(label.index_parameters().is_empty());
        assert!(!label.is_indexed());
    }

    #[test]
    fn test_instance_required() {
        let model = SampleModel::new();
        let name = property(&model, "Name");

        assert!(matches!(
            name.get_value(None),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_setter_validates_value() {
        let model = SampleModel::new();
        let length = property(&model, "Name");
        let instance = model.new_widget();

        assert!(matches!(
            length.set_value(Some(&instance), Value::I4(3)),
            Err(Error::ParameterBinding { .. })
        ));
    }

    #[test]
    fn test_accessor_order() {
        let model = SampleModel::new();
        let names: Vec<_> = property(&model, "Name")
            .accessors()
            .iter()
            .map(|accessor| accessor.method().name.clone())
            .collect();
        assert_eq!(names, ["get_Name", "set_Name"]);
    }
}
