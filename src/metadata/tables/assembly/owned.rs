use std::{fmt, sync::Arc};

use crate::metadata::{
    customattributes::{AttributeProvider, CustomAttributeValue, CustomAttributeValueList},
    token::{Token, TABLE},
    typesystem::CilTypeList,
};

/// Represents a loaded assembly with its declared types
pub struct Assembly {
    /// Token
    pub token: Token,
    /// The simple name of this assembly
    pub name: String,
    /// The version, as `major.minor.build.revision`
    pub version: String,
    /// All types declared by this assembly, in declaration order
    pub types: CilTypeList,
    /// Custom attributes attached to this assembly
    pub custom_attributes: CustomAttributeValueList,
}

impl Assembly {
    /// Create a new, empty assembly
    ///
    /// ## Arguments
    /// * 'name'    - The simple name of the assembly
    /// * 'version' - The version string
    pub fn new(name: &str, version: &str) -> Self {
        Assembly {
            token: Token::allocate(TABLE::ASSEMBLY),
            name: name.to_string(),
            version: version.to_string(),
            types: Arc::new(boxcar::Vec::new()),
            custom_attributes: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Attach a custom attribute to this assembly
    pub fn add_attribute(&self, attribute: CustomAttributeValue) {
        self.custom_attributes.push(Arc::new(attribute));
    }

    /// The display name, `Name, Version=x.y.z.w`
    pub fn display_name(&self) -> String {
        format!("{}, Version={}", self.name, self.version)
    }
}

impl AttributeProvider for Assembly {
    fn token(&self) -> Token {
        self.token
    }

    fn custom_attributes(&self) -> &CustomAttributeValueList {
        &self.custom_attributes
    }
}

impl fmt::Debug for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assembly")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("types", &self.types.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_new() {
        let assembly = Assembly::new("Sample", "1.2.3.4");

        assert_eq!(assembly.token.table(), TABLE::ASSEMBLY);
        assert_eq!(assembly.display_name(), "Sample, Version=1.2.3.4");
        assert!(assembly.types.is_empty());
    }

    #[test]
    fn test_assembly_attributes() {
        let assembly = Assembly::new("Sample", "1.0.0.0");
        assembly.add_attribute(CustomAttributeValue::new("System.CLSCompliantAttribute"));

        assert_eq!(assembly.custom_attributes.count(), 1);
    }
}
