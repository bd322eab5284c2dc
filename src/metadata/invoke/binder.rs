use tracing::trace;

use crate::{
    metadata::{
        invoke::{BindingFailure, ParameterSpec},
        typesystem::{introspection, CilType},
        value::Value,
    },
    Error::ParameterBinding,
    Result,
};

/// Bind `args` to `params` in one left-to-right pass.
///
/// The result holds exactly one value per parameter; a trailing variadic parameter receives a
/// single array.
///
/// ## Arguments
/// * 'params' - The declared parameters, in declaration order
/// * 'args'   - The supplied arguments
///
/// # Errors
/// Returns [`crate::Error::ParameterBinding`] for the first parameter that cannot be bound.
///
/// # Examples
///
/// ```rust
/// use metascope::metadata::{
///     invoke::{bind_arguments, parameter_specs},
///     method::Method,
///     tables::Param,
///     typesystem::TypeRegistry,
///     value::Value,
/// };
///
/// let registry = TypeRegistry::new()?;
/// let int = registry.well_known("System.Int32")?;
/// let ints = registry.make_array(&int)?;
/// let method = Method::new("Sum")
///     .param(Param::new("a", &int))
///     .param(Param::new("rest", &ints).variadic());
///
/// let bound = bind_arguments(&parameter_specs(&method)?, &[Value::I4(1), Value::I4(2)])?;
/// assert_eq!(bound[0], Value::I4(1));
/// assert_eq!(bound[1], Value::array(&int, vec![Value::I4(2)]));
/// # Ok::<(), metascope::Error>(())
/// ```
pub fn bind_arguments(params: &[ParameterSpec], args: &[Value]) -> Result<Vec<Value>> {
    let mut bound = Vec::with_capacity(params.len());
    let mut remaining = args.iter();

    for (index, param) in params.iter().enumerate() {
        if param.is_variadic && index + 1 == params.len() {
            let rest: Vec<Value> = remaining.by_ref().cloned().collect();
            bound.push(bind_variadic(param, rest)?);
            break;
        }

        let value = if let Some(arg) = remaining.next() {
            validate(param, &param.param_type, arg)?;
            arg.clone()
        } else if let Some(default) = &param.default {
            validate(param, &param.param_type, default)?;
            default.clone()
        } else if param.is_optional {
            validate(param, &param.param_type, &Value::Null)?;
            Value::Null
        } else {
            return Err(failure(param, BindingFailure::Undefined));
        };

        bound.push(value);
    }

    trace!(
        parameters = params.len(),
        supplied = args.len(),
        "bound arguments"
    );
    Ok(bound)
}

fn bind_variadic(param: &ParameterSpec, rest: Vec<Value>) -> Result<Value> {
    if let [single] = rest.as_slice() {
        if introspection::is_instance_of(single, &param.param_type) {
            return Ok(single.clone());
        }
    }

    let Some(element_type) = param.param_type.element_type() else {
        return Err(failure(param, BindingFailure::Mismatch(Value::Null)));
    };

    for item in &rest {
        validate(param, &element_type, item)?;
    }

    Ok(Value::array(&element_type, rest))
}

fn validate(param: &ParameterSpec, expected: &CilType, value: &Value) -> Result<()> {
    if value.is_null() {
        if introspection::is_nullable(expected) {
            return Ok(());
        }
        return Err(failure(param, BindingFailure::Null));
    }

    if introspection::is_instance_of(value, expected) {
        Ok(())
    } else {
        Err(failure(param, BindingFailure::Mismatch(value.clone())))
    }
}

fn failure(param: &ParameterSpec, failure: BindingFailure) -> crate::Error {
    ParameterBinding {
        parameter: Box::new(param.clone()),
        failure,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        metadata::{
            invoke::parameter_specs,
            method::Method,
            tables::Param,
            typesystem::{TypeRegistry, WELL_KNOWN},
        },
        Error,
    };

    struct Fixture {
        registry: TypeRegistry,
        specs: Vec<ParameterSpec>,
    }

    /// `(int a, int b = 5, params int[] rest)`
    fn fixture() -> Fixture {
        let registry = TypeRegistry::new().unwrap();
        let int = registry.well_known("System.Int32").unwrap();
        let ints = registry.make_array(&int).unwrap();
        let method = Method::new("Sum")
            .param(Param::new("a", &int))
            .param(Param::new("b", &int).with_default(Value::I4(5)))
            .param(Param::new("rest", &ints).variadic());
        let specs = parameter_specs(&method).unwrap();

        Fixture { registry, specs }
    }

    fn ints(fixture: &Fixture, items: &[i32]) -> Value {
        let int = fixture.registry.well_known("System.Int32").unwrap();
        Value::array(&int, items.iter().copied().map(Value::I4).collect())
    }

    fn failed_parameter(result: Result<Vec<Value>>) -> (String, BindingFailure) {
        match result {
            Err(Error::ParameterBinding { parameter, failure }) => (parameter.name, failure),
            other => panic!("expected a binding error, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_and_empty_variadic() {
        let fixture = fixture();
        let bound = bind_arguments(&fixture.specs, &[Value::I4(1)]).unwrap();

        assert_eq!(bound, vec![Value::I4(1), Value::I4(5), ints(&fixture, &[])]);
    }

    #[test]
    fn test_variadic_collects_trailing_arguments() {
        let fixture = fixture();
        let args = [Value::I4(1), Value::I4(2), Value::I4(3), Value::I4(4)];
        let bound = bind_arguments(&fixture.specs, &args).unwrap();

        assert_eq!(bound, vec![Value::I4(1), Value::I4(2), ints(&fixture, &[3, 4])]);
    }

    #[test]
    fn test_variadic_passes_array_through() {
        let fixture = fixture();
        let array = ints(&fixture, &[7, 8]);
        let bound =
            bind_arguments(&fixture.specs, &[Value::I4(1), Value::I4(2), array.clone()]).unwrap();

        assert_eq!(bound[2], array);
        assert!(Arc::ptr_eq(
            bound[2].as_array().unwrap(),
            array.as_array().unwrap()
        ));
    }

    #[test]
    fn test_missing_required_argument() {
        let fixture = fixture();
        let (name, failure) = failed_parameter(bind_arguments(&fixture.specs, &[]));

        assert_eq!(name, "a");
        assert_eq!(failure, BindingFailure::Undefined);
    }

    #[test]
    fn test_null_for_value_type() {
        let fixture = fixture();
        let (name, failure) =
            failed_parameter(bind_arguments(&fixture.specs, &[Value::I4(1), Value::Null]));

        assert_eq!(name, "b");
        assert_eq!(failure, BindingFailure::Null);
    }

    #[test]
    fn test_mismatched_argument() {
        let fixture = fixture();
        let (name, failure) = failed_parameter(bind_arguments(&fixture.specs, &[Value::from("1")]));

        assert_eq!(name, "a");
        assert_eq!(failure, BindingFailure::Mismatch(Value::from("1")));
    }

    #[test]
    fn test_variadic_elements_are_validated() {
        let fixture = fixture();
        let args = [Value::I4(1), Value::I4(2), Value::I4(3), Value::from("four")];
        let (name, failure) = failed_parameter(bind_arguments(&fixture.specs, &args));

        assert_eq!(name, "rest");
        assert_eq!(failure, BindingFailure::Mismatch(Value::from("four")));
    }

    #[test]
    fn test_optional_reference_without_default_and_surplus() {
        let registry = TypeRegistry::new().unwrap();
        let string = registry.well_known(WELL_KNOWN::STRING).unwrap();
        let int = registry.well_known("System.Int32").unwrap();
        let method = Method::new("Format")
            .param(Param::new("width", &int))
            .param(Param::new("text", &string).optional());
        let specs = parameter_specs(&method).unwrap();

        let bound = bind_arguments(&specs, &[Value::I4(2)]).unwrap();
        assert_eq!(bound, vec![Value::I4(2), Value::Null]);

        let surplus = [Value::I4(2), Value::from("x"), Value::I4(3)];
        let bound = bind_arguments(&specs, &surplus).unwrap();
        assert_eq!(bound, vec![Value::I4(2), Value::from("x")]);
    }

    #[test]
    fn test_optional_value_type_without_argument() {
        let registry = TypeRegistry::new().unwrap();
        let int = registry.well_known("System.Int32").unwrap();
        let method = Method::new("Pad")
            .as_static()
            .param(Param::new("width", &int).optional());
        let specs = parameter_specs(&method).unwrap();

        let (name, failure) = failed_parameter(bind_arguments(&specs, &[]));
        assert_eq!(name, "width");
        assert_eq!(failure, BindingFailure::Null);

        let bound = bind_arguments(&specs, &[Value::I4(4)]).unwrap();
        assert_eq!(bound, vec![Value::I4(4)]);
    }

    #[test]
    fn test_null_for_reference_type() {
        let registry = TypeRegistry::new().unwrap();
        let string = registry.well_known(WELL_KNOWN::STRING).unwrap();
        let method = Method::new("Echo").param(Param::new("text", &string));
        let specs = parameter_specs(&method).unwrap();

        assert_eq!(
            bind_arguments(&specs, &[Value::Null]).unwrap(),
            vec![Value::Null]
        );
    }

    #[test]
    fn test_variadic_only_when_last() {
        let registry = TypeRegistry::new().unwrap();
        let int = registry.well_known("System.Int32").unwrap();
        let ints = registry.make_array(&int).unwrap();
        let method = Method::new("Odd")
            .param(Param::new("values", &ints).variadic())
            .param(Param::new("last", &int));
        let specs = parameter_specs(&method).unwrap();

        assert!(!specs[0].is_variadic);
        let array = Value::array(&int, vec![Value::I4(1)]);
        let bound = bind_arguments(&specs, &[array.clone(), Value::I4(2)]).unwrap();
        assert_eq!(bound, vec![array, Value::I4(2)]);
    }

}
