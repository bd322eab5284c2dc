//! Integration tests for argument binding and invocation.

mod common;

use common::shapes;
use metascope::prelude::*;

/// `static int Sum(int a, int b = 5, params int[] rest)`
fn sum_specs(registry: &TypeRegistry) -> Result<Vec<ParameterSpec>> {
    let int = registry.well_known("System.Int32")?;
    let ints = registry.make_array(&int)?;
    let method = Method::new("Sum")
        .as_static()
        .param(Param::new("a", &int))
        .param(Param::new("b", &int).with_default(Value::I4(5)))
        .param(Param::new("rest", &ints).variadic());

    metascope::metadata::invoke::parameter_specs(&method)
}

fn int_array(registry: &TypeRegistry, items: &[i32]) -> Result<Value> {
    let int = registry.well_known("System.Int32")?;
    Ok(Value::array(
        &int,
        items.iter().copied().map(Value::I4).collect(),
    ))
}

#[test]
fn test_default_fills_and_variadic_is_empty() -> Result<()> {
    let registry = TypeRegistry::new()?;
    let specs = sum_specs(&registry)?;

    let bound = bind_arguments(&specs, &[Value::I4(1)])?;
    assert_eq!(bound, [Value::I4(1), Value::I4(5), int_array(&registry, &[])?]);
    Ok(())
}

#[test]
fn test_trailing_arguments_collapse() -> Result<()> {
    let registry = TypeRegistry::new()?;
    let specs = sum_specs(&registry)?;

    let args = [Value::I4(1), Value::I4(2), Value::I4(3), Value::I4(4)];
    let bound = bind_arguments(&specs, &args)?;
    assert_eq!(bound.len(), specs.len());
    assert_eq!(bound, [Value::I4(1), Value::I4(2), int_array(&registry, &[3, 4])?]);
    Ok(())
}

#[test]
fn test_missing_argument_names_parameter() -> Result<()> {
    let registry = TypeRegistry::new()?;
    let specs = sum_specs(&registry)?;

    match bind_arguments(&specs, &[]) {
        Err(Error::ParameterBinding { parameter, failure }) => {
            assert_eq!(parameter.name, "a");
            assert_eq!(failure, BindingFailure::Undefined);
        }
        other => panic!("unexpected {other:?}"),
    }
    Ok(())
}

#[test]
fn test_null_value_type_fails_even_when_others_bind() -> Result<()> {
    let registry = TypeRegistry::new()?;
    let specs = sum_specs(&registry)?;

    let result = bind_arguments(&specs, &[Value::Null, Value::I4(2), Value::I4(3)]);
    assert!(matches!(
        result,
        Err(Error::ParameterBinding {
            failure: BindingFailure::Null,
            ..
        })
    ));

    let error = bind_arguments(&specs, &[Value::I4(1), Value::Null]).unwrap_err();
    assert!(error.to_string().contains("b"));
    Ok(())
}

#[test]
fn test_invoke_static_variadic() -> Result<()> {
    let shapes = shapes()?;
    let describe = shapes.member("Describe");
    let method = describe.as_method().unwrap();

    let result = method.invoke(None, &[Value::from("parts"), Value::I4(1), Value::from("a")])?;
    assert_eq!(result, Some(Value::from("parts: 1, \"a\"")));

    let result = method.invoke(None, &[Value::from("none")])?;
    assert_eq!(result, Some(Value::from("none: ")));
    Ok(())
}

#[test]
fn test_invoke_instance_with_default() -> Result<()> {
    let shapes = shapes()?;
    let circle = shapes.new_circle(1.5);
    let scale = shapes.member("Scale");
    let radius = shapes.member("Radius");

    assert_eq!(scale.as_method().unwrap().invoke(Some(&circle), &[])?, None);
    assert_eq!(
        radius.as_data_member().unwrap().get_value(Some(&circle))?,
        Value::R8(3.0)
    );
    Ok(())
}

#[test]
fn test_invoke_rejects_missing_or_foreign_instance() -> Result<()> {
    let shapes = shapes()?;
    let scale = shapes.member("Scale");
    let method = scale.as_method().unwrap();

    assert!(matches!(
        method.invoke(None, &[]),
        Err(Error::InvalidArgument(_))
    ));

    let handler = Value::object(&shapes.handler);
    assert!(matches!(
        method.invoke(Some(&handler), &[]),
        Err(Error::InvalidArgument(_))
    ));
    Ok(())
}

#[test]
fn test_constructor_creates_instances() -> Result<()> {
    let shapes = shapes()?;
    let created = shapes.circle.field("Created").unwrap();

    let circle = shapes.new_circle(2.0);
    shapes.new_circle(4.0);

    assert!(circle.is_instance_of(&shapes.circle));
    assert!(circle.is_instance_of(&shapes.shape));
    assert_eq!(created.load(None)?, Value::I4(2));
    Ok(())
}

#[test]
fn test_event_handlers() -> Result<()> {
    let shapes = shapes()?;
    let circle = shapes.new_circle(1.0);
    let resized = shapes.member("Resized");
    let event = resized.as_event().unwrap();
    let handler = Value::object(&shapes.handler);

    event.add_handler(Some(&circle), &handler)?;
    event.remove_handler(Some(&circle), &handler)?;
    assert!(matches!(
        event.add_handler(Some(&circle), &Value::I4(1)),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        event.invoke_handler(Some(&circle), &[]),
        Err(Error::InvalidOperation(_))
    ));
    Ok(())
}
