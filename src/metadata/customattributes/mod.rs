//! Custom attribute representation and resolution.
//!
//! Custom attributes are the declarative annotations attached to assemblies, types, members and
//! parameters. This module provides the attribute value model and the memoizing
//! [`AttributeCache`] through which every attribute query of the metadata tree is answered.
//!
//! # Key Components
//!
//! - [`CustomAttributeValue`]: One attribute instance (type, fixed and named arguments)
//! - [`AttributeProvider`]: Seam implemented by every entity that can carry attributes
//! - [`AttributeCache`]: Thread-safe, process-wide memoization of resolved attribute lists
//!
//! # Examples
//!
//! ```rust
//! use metascope::metadata::customattributes::{
//!     CustomAttributeArgument, CustomAttributeValue,
//! };
//!
//! let obsolete = CustomAttributeValue::new("System.ObsoleteAttribute")
//!     .with_arg(CustomAttributeArgument::String("Use Widget2".to_string()))
//!     .with_property("IsError", "System.Boolean", CustomAttributeArgument::Bool(true));
//!
//! assert!(obsolete.is("System.ObsoleteAttribute"));
//! assert_eq!(obsolete.named("IsError"), Some(&CustomAttributeArgument::Bool(true)));
//! ```

mod cache;
mod types;

pub use cache::{AttributeCache, AttributeList, AttributeProvider};
pub use types::*;
