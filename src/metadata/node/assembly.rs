use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::metadata::{
    node::{MetadataNode, TypeNode},
    tables::AssemblyRc,
};

/// Navigation handle for an assembly, the root of the tree
#[derive(Clone)]
pub struct AssemblyNode {
    assembly: AssemblyRc,
    /// Declared types, snapshotted on first access and shared between clones
    children: Arc<OnceLock<Vec<MetadataNode>>>,
}

impl AssemblyNode {
    /// Wrap an assembly
    pub fn new(assembly: &AssemblyRc) -> Self {
        AssemblyNode {
            assembly: assembly.clone(),
            children: Arc::new(OnceLock::new()),
        }
    }

    /// The wrapped assembly
    pub fn assembly(&self) -> &AssemblyRc {
        &self.assembly
    }

    /// The declared types in declaration order.
    ///
    /// The list is computed once per node on first access; types added to the assembly
    /// afterwards are not visible through this node (build a new node to see them).
    pub fn children(&self) -> &[MetadataNode] {
        self.children.get_or_init(|| {
            let types: Vec<MetadataNode> = self
                .assembly
                .types
                .iter()
                .map(|(_, ty)| MetadataNode::Type(TypeNode::new(ty)))
                .collect();
            debug!(
                assembly = %self.assembly.name,
                count = types.len(),
                "snapshotted assembly types"
            );
            types
        })
    }

    /// The declared types as type nodes
    pub fn types(&self) -> Vec<TypeNode> {
        self.children()
            .iter()
            .filter_map(MetadataNode::as_type)
            .cloned()
            .collect()
    }
}
