//! Uniform navigation over a reflected type system.
//!
//! A [`MetadataNode`] wraps exactly one reflected entity (an assembly, a type, a constructor,
//! a method, a property, a field, an event or a parameter) and exposes the same navigation and
//! annotation queries for all of them: its parent, its children and its custom attributes.
//!
//! Nodes are cheap handles. They are built on demand while walking the tree, are not interned,
//! and compare equal when they wrap the same entity. Parents are derived from the weak back
//! references of the host model; children are computed on each call, except for the children of
//! an assembly node which are snapshotted once per node (clones share the snapshot).
//!
//! # Tree Shape
//!
//! | Kind          | Parent               | Children                                              |
//! |---------------|----------------------|-------------------------------------------------------|
//! | `Assembly`    | none                 | declared types                                        |
//! | `Type`        | declaring assembly   | constructors, events, properties, fields, methods     |
//! | `Constructor` | declaring type       | parameters                                            |
//! | `Method`      | declaring type       | parameters                                            |
//! | `Property`    | declaring type       | getter, setter                                        |
//! | `Field`       | declaring type       | none                                                  |
//! | `Event`       | declaring type       | add, remove, raise, other accessors                   |
//! | `Parameter`   | declaring method     | none                                                  |
//!
//! # Annotations
//!
//! Every attribute query goes through the process-wide
//! [`crate::metadata::customattributes::AttributeCache`].
//!
//! # Examples
//!
//! ```rust
//! use metascope::metadata::{
//!     customattributes::CustomAttributeValue,
//!     node::{MetadataNode, NodeKind},
//!     typesystem::{TypeBuilder, TypeRegistry},
//! };
//!
//! let registry = TypeRegistry::new()?;
//! let assembly = registry.define_assembly("Sample");
//! TypeBuilder::new(&registry, &assembly, "Sample", "Widget")
//!     .attribute(CustomAttributeValue::new("System.SerializableAttribute"))
//!     .build()?;
//!
//! let root = MetadataNode::from(&assembly);
//! let widget = root.children()[0].clone();
//!
//! assert_eq!(widget.kind(), NodeKind::Type);
//! assert_eq!(widget.parent(), Some(root.clone()));
//! assert_eq!(root.child_attributes()?.len(), 1);
//! assert!(root.parent_attributes().is_err());
//! # Ok::<(), metascope::Error>(())
//! ```

mod assembly;
mod event;
mod field;
mod flags;
mod method;
mod parameter;
mod property;
mod types;

use std::hash::{Hash, Hasher};

use strum::{Display, EnumCount, EnumIter};

pub use assembly::AssemblyNode;
pub use event::EventNode;
pub use field::FieldNode;
pub use flags::BindingFlags;
pub use method::MethodNode;
pub use parameter::ParameterNode;
pub use property::PropertyNode;
pub use types::TypeNode;

use crate::{
    metadata::{
        customattributes::{
            AttributeCache, AttributeList, AttributeProvider, CustomAttributeValueList,
            CustomAttributeValueRc,
        },
        datamember::DataMember,
        tables::AssemblyRc,
        token::Token,
        typesystem::CilTypeRc,
    },
    Result,
};

/// The kind of entity a [`MetadataNode`] wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
pub enum NodeKind {
    /// An assembly
    Assembly,
    /// A type
    Type,
    /// An instance constructor
    Constructor,
    /// A method, accessor methods included
    Method,
    /// A property
    Property,
    /// A field
    Field,
    /// An event
    Event,
    /// A parameter of a method or constructor
    Parameter,
}

/// A navigable handle to one reflected entity
#[derive(Clone)]
pub enum MetadataNode {
    /// An assembly
    Assembly(AssemblyNode),
    /// A type
    Type(TypeNode),
    /// An instance constructor
    Constructor(MethodNode),
    /// A method
    Method(MethodNode),
    /// A property
    Property(PropertyNode),
    /// A field
    Field(FieldNode),
    /// An event
    Event(EventNode),
    /// A parameter
    Parameter(ParameterNode),
}

impl MetadataNode {
    /// The kind of the wrapped entity
    pub fn kind(&self) -> NodeKind {
        match self {
            MetadataNode::Assembly(_) => NodeKind::Assembly,
            MetadataNode::Type(_) => NodeKind::Type,
            MetadataNode::Constructor(_) => NodeKind::Constructor,
            MetadataNode::Method(_) => NodeKind::Method,
            MetadataNode::Property(_) => NodeKind::Property,
            MetadataNode::Field(_) => NodeKind::Field,
            MetadataNode::Event(_) => NodeKind::Event,
            MetadataNode::Parameter(_) => NodeKind::Parameter,
        }
    }

    /// The identity of the wrapped entity
    pub fn token(&self) -> Token {
        self.provider().token()
    }

    /// The simple name of the wrapped entity
    pub fn name(&self) -> &str {
        match self {
            MetadataNode::Assembly(node) => &node.assembly().name,
            MetadataNode::Type(node) => &node.ty().name,
            MetadataNode::Constructor(node) | MetadataNode::Method(node) => &node.method().name,
            MetadataNode::Property(node) => &node.property().name,
            MetadataNode::Field(node) => &node.field().name,
            MetadataNode::Event(node) => &node.event().name,
            MetadataNode::Parameter(node) => &node.param().name,
        }
    }

    /// The node that declares this one; `None` only for assemblies (and for entities whose
    /// declaring entity has been dropped)
    pub fn parent(&self) -> Option<MetadataNode> {
        match self {
            MetadataNode::Assembly(_) => None,
            MetadataNode::Type(node) => node.parent().map(MetadataNode::Assembly),
            MetadataNode::Constructor(node) | MetadataNode::Method(node) => {
                node.parent().map(MetadataNode::Type)
            }
            MetadataNode::Property(node) => node.parent().map(MetadataNode::Type),
            MetadataNode::Field(node) => node.parent().map(MetadataNode::Type),
            MetadataNode::Event(node) => node.parent().map(MetadataNode::Type),
            MetadataNode::Parameter(node) => node.parent().map(MetadataNode::from),
        }
    }

    /// The nodes this one declares, in declaration order
    pub fn children(&self) -> Vec<MetadataNode> {
        match self {
            MetadataNode::Assembly(node) => node.children().to_vec(),
            MetadataNode::Type(node) => node.members(BindingFlags::declared()),
            MetadataNode::Constructor(node) | MetadataNode::Method(node) => node
                .parameters()
                .into_iter()
                .map(MetadataNode::Parameter)
                .collect(),
            MetadataNode::Property(node) => node
                .accessors()
                .into_iter()
                .map(MetadataNode::from)
                .collect(),
            MetadataNode::Event(node) => node
                .accessors()
                .into_iter()
                .map(MetadataNode::from)
                .collect(),
            MetadataNode::Field(_) | MetadataNode::Parameter(_) => Vec::new(),
        }
    }

    /// The custom attributes of the wrapped entity
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the entity is absent.
    pub fn attributes(&self) -> Result<AttributeList> {
        AttributeCache::global().resolve(self)
    }

    /// The custom attributes of the parent node
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidOperation`] if this node has no parent.
    pub fn parent_attributes(&self) -> Result<AttributeList> {
        match self.parent() {
            Some(parent) => parent.attributes(),
            None => Err(invalid_operation!(
                "{} {} has no parent",
                self.kind(),
                self.name()
            )),
        }
    }

    /// The custom attributes of all children, flattened in child order
    ///
    /// # Errors
    /// Returns an error if any child is absent.
    pub fn child_attributes(&self) -> Result<Vec<CustomAttributeValueRc>> {
        let mut result = Vec::new();
        for child in self.children() {
            result.extend(child.attributes()?.iter().cloned());
        }
        Ok(result)
    }

    /// The custom attributes collected along an access path.
    ///
    /// `path` runs from the outermost owner to the accessed entity, e.g. a type, one of its
    /// properties, then a property of that property's type. The result lists the attributes of the
    /// accessed entity first, followed by those of each owner back to the start of the path. An
    /// empty path yields no attributes.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if any node on the path is absent.
    pub fn path_attributes(path: &[MetadataNode]) -> Result<Vec<CustomAttributeValueRc>> {
        let mut result = Vec::new();
        for node in path.iter().rev() {
            result.extend(node.attributes()?.iter().cloned());
        }
        Ok(result)
    }

    /// Returns true if the wrapped entity carries an attribute of the given type (full name)
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the entity is absent.
    pub fn has_attribute(&self, attribute_type: &str) -> Result<bool> {
        AttributeCache::global().has_attribute(self, attribute_type)
    }

    /// The first attribute of the given type (full name), if any
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if the entity is absent.
    pub fn find_attribute(&self, attribute_type: &str) -> Result<Option<CustomAttributeValueRc>> {
        AttributeCache::global().find_attribute(self, attribute_type)
    }

    /// The data member view of property and field nodes
    pub fn as_data_member(&self) -> Option<&dyn DataMember> {
        match self {
            MetadataNode::Property(node) => Some(node as &dyn DataMember),
            MetadataNode::Field(node) => Some(node as &dyn DataMember),
            _ => None,
        }
    }

    /// The type node, if this is one
    pub fn as_type(&self) -> Option<&TypeNode> {
        match self {
            MetadataNode::Type(node) => Some(node),
            _ => None,
        }
    }

    /// The method node, for constructors and methods
    pub fn as_method(&self) -> Option<&MethodNode> {
        match self {
            MetadataNode::Constructor(node) | MetadataNode::Method(node) => Some(node),
            _ => None,
        }
    }

    /// The event node, if this is one
    pub fn as_event(&self) -> Option<&EventNode> {
        match self {
            MetadataNode::Event(node) => Some(node),
            _ => None,
        }
    }

    /// The parameter node, if this is one
    pub fn as_parameter(&self) -> Option<&ParameterNode> {
        match self {
            MetadataNode::Parameter(node) => Some(node),
            _ => None,
        }
    }

    fn provider(&self) -> &dyn AttributeProvider {
        match self {
            MetadataNode::Assembly(node) => &**node.assembly(),
            MetadataNode::Type(node) => &**node.ty(),
            MetadataNode::Constructor(node) | MetadataNode::Method(node) => {
                &**node.method()
            }
            MetadataNode::Property(node) => &**node.property(),
            MetadataNode::Field(node) => &**node.field(),
            MetadataNode::Event(node) => &**node.event(),
            MetadataNode::Parameter(node) => &**node.param(),
        }
    }
}

impl AttributeProvider for MetadataNode {
    fn token(&self) -> Token {
        self.provider().token()
    }

    fn custom_attributes(&self) -> &CustomAttributeValueList {
        self.provider().custom_attributes()
    }
}

impl PartialEq for MetadataNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.token() == other.token()
    }
}

impl Eq for MetadataNode {}

impl Hash for MetadataNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.token().hash(state);
    }
}

impl std::fmt::Debug for MetadataNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({}, {})", self.kind(), self.name(), self.token())
    }
}

impl From<MethodNode> for MetadataNode {
    fn from(node: MethodNode) -> Self {
        if node.is_constructor() {
            MetadataNode::Constructor(node)
        } else {
            MetadataNode::Method(node)
        }
    }
}

impl From<&AssemblyRc> for MetadataNode {
    fn from(assembly: &AssemblyRc) -> Self {
        MetadataNode::Assembly(AssemblyNode::new(assembly))
    }
}

impl From<&CilTypeRc> for MetadataNode {
    fn from(ty: &CilTypeRc) -> Self {
        MetadataNode::Type(TypeNode::new(ty))
    }
}

impl From<AssemblyNode> for MetadataNode {
    fn from(node: AssemblyNode) -> Self {
        MetadataNode::Assembly(node)
    }
}

impl From<TypeNode> for MetadataNode {
    fn from(node: TypeNode) -> Self {
        MetadataNode::Type(node)
    }
}

impl From<PropertyNode> for MetadataNode {
    fn from(node: PropertyNode) -> Self {
        MetadataNode::Property(node)
    }
}

impl From<FieldNode> for MetadataNode {
    fn from(node: FieldNode) -> Self {
        MetadataNode::Field(node)
    }
}

impl From<EventNode> for MetadataNode {
    fn from(node: EventNode) -> Self {
        MetadataNode::Event(node)
    }
}

impl From<ParameterNode> for MetadataNode {
    fn from(node: ParameterNode) -> Self {
        MetadataNode::Parameter(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    use crate::test::SampleModel;

    #[test]
    fn test_node_kinds() {
        assert_eq!(NodeKind::COUNT, 8);
        assert_eq!(NodeKind::iter().next(), Some(NodeKind::Assembly));
        assert_eq!(NodeKind::Constructor.to_string(), "Constructor");
    }

    #[test]
    fn test_type_children_order() {
        let model = SampleModel::new();
        let node = MetadataNode::from(&model.widget);

        let kinds: Vec<_> = node.children().iter().map(MetadataNode::kind).collect();
        let first_of = |kind: NodeKind| kinds.iter().position(|k| *k == kind).unwrap();
        let last_of = |kind: NodeKind| kinds.iter().rposition(|k| *k == kind).unwrap();

        assert!(last_of(NodeKind::Constructor) < first_of(NodeKind::Event));
        assert!(last_of(NodeKind::Event) < first_of(NodeKind::Property));
        assert!(last_of(NodeKind::Property) < first_of(NodeKind::Field));
        assert!(last_of(NodeKind::Field) < first_of(NodeKind::Method));
        assert_eq!(kinds.len(), model.widget_member_count());
    }

    #[test]
    fn test_every_child_points_back_to_its_parent() {
        let model = SampleModel::new();
        let root = MetadataNode::from(&model.assembly);

        let mut pending = vec![root.clone()];
        while let Some(node) = pending.pop() {
            // Accessors are owned by the type, not by their property or event
            if matches!(node.kind(), NodeKind::Property | NodeKind::Event) {
                for accessor in node.children() {
                    assert_eq!(accessor.kind(), NodeKind::Method);
                    assert_eq!(accessor.parent(), node.parent());
                }
                continue;
            }

            for child in node.children() {
                assert_eq!(child.parent().as_ref(), Some(&node), "{child:?}");
                pending.push(child);
            }
        }
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_equality_is_identity() {
        let model = SampleModel::new();

        let a = MetadataNode::from(&model.widget);
        let b = MetadataNode::from(&model.widget);
        let other = MetadataNode::from(&model.shape);

        assert_eq!(a, b);
        assert_ne!(a, other);

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_attribute_queries() {
        let model = SampleModel::new();
        let widget = MetadataNode::from(&model.widget);

        assert!(widget.has_attribute(SampleModel::MARKER).unwrap());
        assert!(widget.find_attribute("Missing.Attribute").unwrap().is_none());

        // The name property carries the marker too
        let child_markers = widget
            .child_attributes()
            .unwrap()
            .iter()
            .filter(|attribute| attribute.is(SampleModel::MARKER))
            .count();
        assert_eq!(child_markers, 1);

        let name = widget
            .children()
            .into_iter()
            .find(|child| child.kind() == NodeKind::Property && child.name() == "Name")
            .unwrap();
        let parent_attributes = name.parent_attributes().unwrap();
        assert!(parent_attributes
            .iter()
            .any(|attribute| attribute.is(SampleModel::MARKER)));
    }

    #[test]
    fn test_path_attributes_innermost_first() {
        let model = SampleModel::new();
        let widget = MetadataNode::from(&model.widget);
        let name = widget
            .children()
            .into_iter()
            .find(|child| child.kind() == NodeKind::Property && child.name() == "Name")
            .unwrap();

        let path = [widget.clone(), name.clone()];
        let collected = MetadataNode::path_attributes(&path).unwrap();
        let own = name.attributes().unwrap();
        let owner = widget.attributes().unwrap();

        assert_eq!(collected.len(), own.len() + owner.len());
        assert!(std::sync::Arc::ptr_eq(&collected[0], &own[0]));
        assert!(std::sync::Arc::ptr_eq(&collected[own.len()], &owner[0]));
        assert!(MetadataNode::path_attributes(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_parent_attributes_of_root() {
        let model = SampleModel::new();
        let root = MetadataNode::from(&model.assembly);

        assert!(matches!(
            root.parent_attributes(),
            Err(crate::Error::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_data_member_view() {
        let model = SampleModel::new();
        let widget = MetadataNode::from(&model.widget);

        let members: Vec<_> = widget
            .children()
            .into_iter()
            .filter(|child| child.as_data_member().is_some())
            .map(|child| child.kind())
            .collect();
        assert!(members
            .iter()
            .all(|kind| matches!(kind, NodeKind::Property | NodeKind::Field)));
        assert!(!members.is_empty());
    }
}
