// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # metascope
//!
//! Uniform metadata navigation, attribute caching and reflective invocation over a reflected
//! .NET-style type system.
//!
//! Calling code walks a program's type system (assemblies → types → members → parameters)
//! through one polymorphic node type, queries the custom attributes attached to any entity,
//! reads and writes properties and fields through one data member abstraction, and invokes
//! methods with validated argument binding (default values, optional parameters and trailing
//! variadic parameters).
//!
//! ## Features
//!
//! - **🌳 Uniform navigation** - One [`metadata::node::MetadataNode`] for every kind of entity
//! - **🏷️ Cached attributes** - Process-wide, lock-free memoization of custom attribute lookups
//! - **🔧 Data members** - Properties (indexers included) and fields behind one trait
//! - **📞 Reflective invocation** - Single pass argument binding with defaults and `params`
//! - **🧩 Type introspection** - Nullability, collection element types, generic interfaces
//!
//! ## Quick Start
//!
//! ```rust
//! use metascope::prelude::*;
//!
//! let registry = TypeRegistry::new()?;
//! let assembly = registry.define_assembly("Sample");
//! let int = registry.well_known("System.Int32")?;
//! let math = TypeBuilder::new(&registry, &assembly, "Sample", "Math").build()?;
//! math.add_method(
//!     Method::new("Twice")
//!         .as_static()
//!         .param(Param::new("value", &int))
//!         .returns(&int)
//!         .body(|_, args| Ok(Value::I4(args[0].as_i32().unwrap_or_default() * 2))),
//! );
//!
//! let root = MetadataNode::from(&assembly);
//! let twice = root.children()[0]
//!     .children()
//!     .into_iter()
//!     .find(|member| member.name() == "Twice")
//!     .unwrap();
//!
//! let result = twice.as_method().unwrap().invoke(None, &[Value::I4(21)])?;
//! assert_eq!(result, Some(Value::I4(42)));
//! # Ok::<(), metascope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata::typesystem`] - The reflected type system: types, registry, introspection
//! - [`metadata::tables`], [`metadata::method`] - Assemblies, members and parameters
//! - [`metadata::customattributes`] - Attribute values and the [`metadata::customattributes::AttributeCache`]
//! - [`metadata::node`] - The navigation tree
//! - [`metadata::datamember`] - Get/set over properties and fields
//! - [`metadata::invoke`] - Argument binding and invocation
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events at `trace` and `debug` level (attribute cache population,
//! assembly snapshots, binding and invocation). No subscriber is installed by the library.
//!
//! ## Thread Safety
//!
//! All types are `Send` and `Sync`. Registries, member lists, the attribute cache and field
//! storage are safe for concurrent readers and writers.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use metascope::prelude::*;
///
/// let registry = TypeRegistry::new()?;
/// let object = registry.well_known("System.Object")?;
/// assert!(is_nullable(&object));
/// # Ok::<(), metascope::Error>(())
/// ```
pub mod prelude;

/// Reflected type system, navigation tree, data members and invocation
///
/// # Key Components
///
/// ## Host Model
/// - [`metadata::typesystem`] - Types, the type registry and the type builder
/// - [`metadata::tables`] - Assemblies, fields, parameters, properties and events
/// - [`metadata::method`] - Methods, constructors and their host bodies
/// - [`metadata::value`] - Runtime values
/// - [`metadata::token`] - Entity identities
///
/// ## Navigation and Invocation
/// - [`metadata::customattributes`] - Attribute values and the memoizing attribute cache
/// - [`metadata::node`] - Uniform navigation over every kind of entity
/// - [`metadata::datamember`] - Uniform get/set over properties and fields
/// - [`metadata::invoke`] - Argument binding and invocation
pub mod metadata;

/// `metascope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `metascope` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use metascope::{metadata::typesystem::TypeRegistry, Error};
///
/// let registry = TypeRegistry::new()?;
/// match registry.well_known("System.Missing") {
///     Err(Error::TypeNotFound(name)) => assert_eq!(name, "System.Missing"),
///     _ => unreachable!(),
/// }
/// # Ok::<(), metascope::Error>(())
/// ```
pub use error::Error;
