//! Parameter entity implementation
//!
//! A parameter describes one declared input of a method or constructor: its name, position,
//! declared type, flags and optional default value. A parameter is variadic (a trailing
//! parameter collecting any number of arguments) when it carries
//! [`crate::metadata::typesystem::WELL_KNOWN::PARAM_ARRAY_ATTRIBUTE`].
use std::sync::Arc;

mod owned;

pub use owned::*;

/// A reference to a `Param`
pub type ParamRc = Arc<Param>;
/// A vector that holds a list of `Param`
pub type ParamList = Arc<boxcar::Vec<ParamRc>>;

#[allow(non_snake_case)]
/// All possible flags for `ParamAttributes`
pub mod ParamAttributes {
    /// Param is [In]
    pub const IN: u32 = 0x0001;
    /// Param is [out]
    pub const OUT: u32 = 0x0002;
    /// Param is optional
    pub const OPTIONAL: u32 = 0x0010;
    /// Param has default value
    pub const HAS_DEFAULT: u32 = 0x1000;
}
