use crate::metadata::{
    datamember::DataMember,
    node::{AssemblyNode, BindingFlags, EventNode, FieldNode, MetadataNode, MethodNode, PropertyNode},
    typesystem::CilTypeRc,
};

/// Navigation handle for a type
#[derive(Clone)]
pub struct TypeNode {
    ty: CilTypeRc,
}

impl TypeNode {
    /// Wrap a type
    pub fn new(ty: &CilTypeRc) -> Self {
        TypeNode { ty: ty.clone() }
    }

    /// The wrapped type
    pub fn ty(&self) -> &CilTypeRc {
        &self.ty
    }

    /// The full name (`Namespace.Name`)
    pub fn fullname(&self) -> String {
        self.ty.fullname()
    }

    /// The declaring assembly
    pub fn parent(&self) -> Option<AssemblyNode> {
        self.ty.assembly().map(|assembly| AssemblyNode::new(&assembly))
    }

    /// The base type, if any
    pub fn base_type(&self) -> Option<TypeNode> {
        self.ty.base().map(|base| TypeNode::new(&base))
    }

    /// Instance constructors selected by `flags`
    pub fn constructors(&self, flags: BindingFlags) -> Vec<MethodNode> {
        self.ty
            .methods
            .iter()
            .map(|(_, method)| method)
            .filter(|method| method.is_constructor())
            .filter(|method| flags.selects(method.is_static(), method.is_public()))
            .map(MethodNode::new)
            .collect()
    }

    /// Methods selected by `flags`, accessor methods included, constructors excluded
    pub fn methods(&self, flags: BindingFlags) -> Vec<MethodNode> {
        self.ty
            .methods
            .iter()
            .map(|(_, method)| method)
            .filter(|method| !method.is_constructor())
            .filter(|method| flags.selects(method.is_static(), method.is_public()))
            .map(MethodNode::new)
            .collect()
    }

    /// Properties selected by `flags`
    pub fn properties(&self, flags: BindingFlags) -> Vec<PropertyNode> {
        self.ty
            .properties
            .iter()
            .map(|(_, property)| PropertyNode::new(property))
            .filter(|node| flags.selects(node.is_static(), node.is_public()))
            .collect()
    }

    /// Fields selected by `flags`
    pub fn fields(&self, flags: BindingFlags) -> Vec<FieldNode> {
        self.ty
            .fields
            .iter()
            .map(|(_, field)| field)
            .filter(|field| flags.selects(field.is_static(), field.is_public()))
            .map(FieldNode::new)
            .collect()
    }

    /// Events selected by `flags`
    pub fn events(&self, flags: BindingFlags) -> Vec<EventNode> {
        self.ty
            .events
            .iter()
            .map(|(_, event)| EventNode::new(event))
            .filter(|node| flags.selects(node.is_static(), node.is_public()))
            .collect()
    }

    /// All members selected by `flags`: constructors, events, properties, fields, then methods
    pub fn members(&self, flags: BindingFlags) -> Vec<MetadataNode> {
        let mut members: Vec<MetadataNode> = Vec::new();
        members.extend(self.constructors(flags).into_iter().map(MetadataNode::Constructor));
        members.extend(self.events(flags).into_iter().map(MetadataNode::Event));
        members.extend(self.properties(flags).into_iter().map(MetadataNode::Property));
        members.extend(self.fields(flags).into_iter().map(MetadataNode::Field));
        members.extend(self.methods(flags).into_iter().map(MetadataNode::Method));
        members
    }

    /// Returns true for a generic type definition with unbound parameters
    pub fn is_generic_definition(&self) -> bool {
        self.ty.is_generic_definition()
    }

    /// Returns true for a generic type applied to arguments
    pub fn is_constructed_generic(&self) -> bool {
        self.ty.is_constructed_generic()
    }

    /// The generic parameters of a definition, or the generic arguments of a constructed type
    pub fn generic_type_arguments(&self) -> Vec<TypeNode> {
        if self.ty.is_generic_definition() {
            self.ty
                .generic_params
                .iter()
                .map(|(_, param)| TypeNode::new(param))
                .collect()
        } else {
            self.ty
                .generic_arguments()
                .iter()
                .map(TypeNode::new)
                .collect()
        }
    }

    /// The type itself for a definition, the definition of a constructed type, `None` otherwise
    pub fn generic_type_definition(&self) -> Option<TypeNode> {
        if self.ty.is_generic_definition() {
            Some(self.clone())
        } else {
            self.ty
                .generic_definition()
                .map(|definition| TypeNode::new(&definition))
        }
    }
}
