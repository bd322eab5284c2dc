//! Integration tests for uniform property and field access.

mod common;

use common::shapes;
use metascope::prelude::*;

#[test]
fn test_property_round_trip_through_accessors() -> Result<()> {
    let shapes = shapes()?;
    let circle = shapes.new_circle(1.0);
    let node = shapes.member("Radius");
    let radius = node.as_data_member().unwrap();

    assert_eq!(radius.name(), "Radius");
    assert_eq!(radius.data_type().unwrap().fullname(), "System.Double");
    assert_eq!(
        radius.declaring_type().unwrap().ty().token,
        shapes.circle.token
    );
    assert!(radius.is_public());
    assert!(!radius.is_static());
    assert!(!radius.is_indexed());

    radius.set_value(Some(&circle), Value::R8(2.5))?;
    assert_eq!(radius.get_value(Some(&circle))?, Value::R8(2.5));
    Ok(())
}

#[test]
fn test_read_only_property() -> Result<()> {
    let shapes = shapes()?;
    let circle = shapes.new_circle(2.0);
    let node = shapes.member("Area");
    let area = node.as_data_member().unwrap();

    match area.get_value(Some(&circle))? {
        Value::R8(value) => assert!((value - std::f64::consts::PI * 4.0).abs() < 1e-9),
        other => panic!("unexpected {other}"),
    }
    assert!(matches!(
        area.set_value(Some(&circle), Value::R8(1.0)),
        Err(Error::InvalidOperation(_))
    ));
    Ok(())
}

#[test]
fn test_property_arity_and_instance() -> Result<()> {
    let shapes = shapes()?;
    let circle = shapes.new_circle(1.0);
    let node = shapes.member("Radius");
    let radius = node.as_data_member().unwrap();

    assert!(matches!(
        radius.get_value_indexed(Some(&circle), Value::I4(0)),
        Err(Error::InvalidOperation(_))
    ));
    assert!(matches!(
        radius.get_value(None),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        radius.set_value(Some(&circle), Value::from("wide")),
        Err(Error::ParameterBinding { .. })
    ));
    Ok(())
}

#[test]
fn test_field_null_fails_before_mutation() -> Result<()> {
    let shapes = shapes()?;
    let circle = shapes.new_circle(3.0);
    let node = shapes.member("radius");
    let radius = node.as_data_member().unwrap();

    assert!(!radius.is_public());
    assert!(matches!(
        radius.set_value(Some(&circle), Value::Null),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(radius.get_value(Some(&circle))?, Value::R8(3.0));

    assert!(matches!(
        radius.set_value(Some(&circle), Value::from("3")),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(radius.get_value(Some(&circle))?, Value::R8(3.0));
    Ok(())
}

#[test]
fn test_static_field_ignores_instance_and_indices() -> Result<()> {
    let shapes = shapes()?;
    let node = shapes.member("Created");
    let created = node.as_data_member().unwrap();

    assert!(created.is_static());
    shapes.new_circle(1.0);
    assert_eq!(created.get_value(None)?, Value::I4(1));

    created.set_value_with(None, &[Value::I4(9), Value::I4(9)], Value::I4(10))?;
    assert_eq!(created.get_value_indexed(None, Value::I4(0))?, Value::I4(10));
    Ok(())
}

#[test]
fn test_only_properties_and_fields_are_data_members() -> Result<()> {
    let shapes = shapes()?;

    let members: Vec<_> = shapes
        .circle_node()
        .children()
        .into_iter()
        .filter(|child| child.as_data_member().is_some())
        .map(|child| child.name().to_string())
        .collect();
    assert_eq!(members, ["Radius", "Area", "radius", "Created"]);
    Ok(())
}
