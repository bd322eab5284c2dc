//! Argument binding and reflective invocation.
//!
//! Calling a reflected method goes through two steps:
//!
//! 1. [`bind_arguments`] matches the supplied arguments against the declared parameters
//!    ([`ParameterSpec`]) in a single left-to-right pass, filling in defaults, optional
//!    placeholders and collapsing a trailing variadic parameter into one array.
//! 2. [`invoke`] checks the target instance, binds and calls the host body of the method.
//!
//! # Binding Rules
//!
//! For each declared parameter, in order:
//!
//! - a trailing variadic parameter drains every remaining argument; a single remaining argument
//!   that already is an instance of the array type is passed through as is, otherwise the
//!   remaining arguments are collected into a new array of the element type
//! - otherwise the next supplied argument is consumed, if there is one
//! - otherwise the declared default value is used
//! - otherwise an optional parameter receives [`Value::Null`]
//! - otherwise binding fails with [`BindingFailure::Undefined`]
//!
//! Supplied arguments and defaults are validated against the declared type: `null` is only
//! accepted by nullable types, any other value must be an instance of the type. Binding is
//! all-or-nothing, and surplus arguments for non-variadic methods are ignored.
//!
//! # Examples
//!
//! ```rust
//! use metascope::metadata::{
//!     invoke,
//!     method::Method,
//!     tables::Param,
//!     typesystem::{TypeBuilder, TypeRegistry},
//!     value::Value,
//! };
//!
//! let registry = TypeRegistry::new()?;
//! let assembly = registry.define_assembly("Sample");
//! let math = TypeBuilder::new(&registry, &assembly, "Sample", "Math").build()?;
//! let int = registry.well_known("System.Int32")?;
//!
//! let scale = math.add_method(
//!     Method::new("Scale")
//!         .as_static()
//!         .param(Param::new("value", &int))
//!         .param(Param::new("factor", &int).with_default(Value::I4(10)))
//!         .returns(&int)
//!         .body(|_, args| {
//!             let value = args[0].as_i32().unwrap_or_default();
//!             let factor = args[1].as_i32().unwrap_or_default();
//!             Ok(Value::I4(value * factor))
//!         }),
//! );
//!
//! assert_eq!(invoke::invoke(&scale, None, &[Value::I4(4)])?, Some(Value::I4(40)));
//! assert!(invoke::invoke(&scale, None, &[]).is_err());
//! # Ok::<(), metascope::Error>(())
//! ```

mod binder;

use std::fmt;

use tracing::debug;

pub use binder::bind_arguments;

use crate::{
    metadata::{
        method::{Method, MethodRc},
        node::ParameterNode,
        typesystem::{introspection, CilTypeRc},
        value::Value,
    },
    Result,
};

/// The binding description of one declared parameter
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// The parameter name
    pub name: String,
    /// The declared type
    pub param_type: CilTypeRc,
    /// The declared default value, if any
    pub default: Option<Value>,
    /// The parameter collects all trailing arguments into an array
    pub is_variadic: bool,
    /// The parameter may be omitted
    pub is_optional: bool,
    /// Zero-based position
    pub position: usize,
}

impl fmt::Display for ParameterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_optional {
            write!(f, "[")?;
        }
        write!(f, "{} {}", self.param_type.fullname(), self.name)?;
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        if self.is_optional {
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// Why a parameter could not be bound
#[derive(Debug, Clone, PartialEq)]
pub enum BindingFailure {
    /// No argument was supplied and the parameter has neither a default nor is optional
    Undefined,
    /// `null` was supplied for a parameter of a non-nullable type
    Null,
    /// The supplied value is not an instance of the declared type
    Mismatch(Value),
}

impl fmt::Display for BindingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingFailure::Undefined => write!(f, "undefined"),
            BindingFailure::Null => write!(f, "null"),
            BindingFailure::Mismatch(value) => write!(f, "{value}"),
        }
    }
}

/// Derive the binding descriptions of a method's parameters, in declaration order.
///
/// Only the last parameter can be variadic.
///
/// # Errors
/// Returns [`crate::Error::TypeNotFound`] if the declared type of a parameter is gone, or
/// [`crate::Error::InvalidArgument`] if a parameter has a null token.
pub fn parameter_specs(method: &Method) -> Result<Vec<ParameterSpec>> {
    let count = method.params.count();
    let mut specs = Vec::with_capacity(count);

    for (index, (_, param)) in method.params.iter().enumerate() {
        let mut spec = ParameterNode::new(param).spec()?;
        spec.is_variadic &= index + 1 == count;
        specs.push(spec);
    }

    Ok(specs)
}

/// Bind `args` to the parameters of `method` and call its host body.
///
/// Instance methods require an instance of the declaring type. Constructors and static methods
/// are called without one. The result of a void method is `None`.
///
/// ## Arguments
/// * 'method'   - The method or constructor to call
/// * 'instance' - The target instance, `None` for static methods and constructors
/// * 'args'     - The supplied arguments
///
/// # Errors
/// Returns [`crate::Error::InvalidArgument`] if an instance method is called without a valid
/// instance, [`crate::Error::ParameterBinding`] if the arguments do not bind,
/// [`crate::Error::NotSupported`] if the method has no body, and whatever the body returns.
pub fn invoke(method: &MethodRc, instance: Option<&Value>, args: &[Value]) -> Result<Option<Value>> {
    let target = if method.is_static() || method.is_constructor() {
        None
    } else {
        Some(check_instance(method, instance)?)
    };

    let specs = parameter_specs(method)?;
    let bound = bind_arguments(&specs, args)?;

    debug!(
        method = %method.name,
        token = %method.token,
        supplied = args.len(),
        bound = bound.len(),
        "invoking method"
    );

    let result = method.invoke_raw(target, &bound)?;
    if method.is_void() && !method.is_constructor() {
        Ok(None)
    } else {
        Ok(Some(result))
    }
}

fn check_instance<'a>(method: &Method, instance: Option<&'a Value>) -> Result<&'a Value> {
    let Some(instance) = instance.filter(|instance| !instance.is_null()) else {
        return Err(invalid_argument!(
            "Instance method {} requires an instance",
            method.name
        ));
    };

    match method.declaring_type() {
        Some(declaring_type) => introspection::is_instance_of_type(instance, &declaring_type),
        None => Ok(instance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::SampleModel, Error};

    #[test]
    fn test_parameter_specs() {
        let model = SampleModel::new();
        let resize = model.widget.method("Resize").unwrap();
        let specs = parameter_specs(&resize).unwrap();

        let names: Vec<_> = specs.iter().map(|spec| spec.name.as_str()).collect();
        assert_eq!(names, ["width", "height", "tags"]);
        assert!(!specs[0].is_optional);
        assert_eq!(specs[1].default, Some(Value::I4(5)));
        assert!(specs[2].is_variadic);
        assert_eq!(specs[2].position, 2);
    }

    #[test]
    fn test_spec_display() {
        let model = SampleModel::new();
        let specs = parameter_specs(&model.widget.method("Resize").unwrap()).unwrap();

        assert_eq!(specs[0].to_string(), "System.Int32 width");
        assert_eq!(specs[1].to_string(), "[System.Int32 height = 5]");
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(BindingFailure::Undefined.to_string(), "undefined");
        assert_eq!(BindingFailure::Null.to_string(), "null");
        assert_eq!(
            BindingFailure::Mismatch(Value::from("x")).to_string(),
            "\"x\""
        );
    }

    #[test]
    fn test_invoke_instance_method() {
        let model = SampleModel::new();
        let resize = model.widget.method("Resize").unwrap();
        let instance = model.new_widget();

        let result = invoke(
            &resize,
            Some(&instance),
            &[Value::I4(3), Value::I4(4), Value::from("a"), Value::from("b")],
        )
        .unwrap();
        // width * height + number of tags
        assert_eq!(result, Some(Value::I4(14)));

        let defaulted = invoke(&resize, Some(&instance), &[Value::I4(3)]).unwrap();
        assert_eq!(defaulted, Some(Value::I4(15)));
    }

    #[test]
    fn test_invoke_requires_instance() {
        let model = SampleModel::new();
        let resize = model.widget.method("Resize").unwrap();

        assert!(matches!(
            invoke(&resize, None, &[Value::I4(1)]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            invoke(&resize, Some(&Value::Null), &[Value::I4(1)]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            invoke(&resize, Some(&Value::I4(1)), &[Value::I4(1)]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_instance_checked_before_binding() {
        let model = SampleModel::new();
        let resize = model.widget.method("Resize").unwrap();

        // No arguments would fail binding, the missing instance is reported first
        assert!(matches!(
            invoke(&resize, None, &[]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_invoke_void() {
        let model = SampleModel::new();
        let reset = model.widget.method("Reset").unwrap();
        let instance = model.new_widget();

        assert_eq!(invoke(&reset, Some(&instance), &[]).unwrap(), None);
    }

    #[test]
    fn test_invoke_constructor() {
        let model = SampleModel::new();
        let ctor = model
            .widget
            .methods
            .iter()
            .map(|(_, method)| method.clone())
            .find(|method| method.is_constructor() && method.params.count() == 1)
            .unwrap();

        let created = invoke(&ctor, None, &[Value::from("bolt")]).unwrap().unwrap();
        assert!(created.is_instance_of(&model.widget));

        let name = model.widget.field("name").unwrap();
        assert_eq!(name.load(Some(&created)).unwrap(), Value::from("bolt"));
    }

    #[test]
    fn test_invoke_without_body() {
        let model = SampleModel::new();
        let unimplemented = model.widget.method("Unimplemented").unwrap();
        let instance = model.new_widget();

        assert!(matches!(
            invoke(&unimplemented, Some(&instance), &[]),
            Err(Error::NotSupported(_))
        ));
    }

    #[test]
    fn test_host_errors_pass_through() {
        let model = SampleModel::new();
        let sum = model.widget.method("Sum").unwrap();

        // The body rejects overflow with its own error
        let result = invoke(&sum, None, &[Value::I4(i32::MAX), Value::I4(1)]);
        assert!(matches!(result, Err(Error::Error(message)) if message == "overflow"));
    }
}
