//! Shared model for the integration tests.
//!
//! ```text
//! assembly Shapes
//!
//! [Shapes.Drawable]
//! interface Shapes.IShape { }
//!
//! delegate Shapes.ResizedHandler
//!
//! [Shapes.Drawable]
//! class Shapes.Circle : Shapes.IShape
//! {
//!     .ctor(double radius);
//!     event ResizedHandler Resized { add; remove; }
//!     [Shapes.Persisted] double Radius { get; set; }
//!     double Area { get; }
//!     private double radius;
//!     public static int Created;
//!     void Scale(double factor = 2.0);
//!     static string Describe(string prefix, params object[] parts);
//! }
//! ```
#![allow(dead_code)]

use metascope::prelude::*;

pub const DRAWABLE: &str = "Shapes.DrawableAttribute";
pub const PERSISTED: &str = "Shapes.PersistedAttribute";

pub struct Shapes {
    pub registry: TypeRegistry,
    pub assembly: AssemblyRc,
    pub shape: CilTypeRc,
    pub handler: CilTypeRc,
    pub circle: CilTypeRc,
}

impl Shapes {
    pub fn circle_node(&self) -> MetadataNode {
        MetadataNode::from(&self.circle)
    }

    pub fn member(&self, name: &str) -> MetadataNode {
        self.circle_node()
            .children()
            .into_iter()
            .find(|child| child.name() == name)
            .unwrap_or_else(|| panic!("no member {name}"))
    }

    pub fn new_circle(&self, radius: f64) -> Value {
        let ctor = TypeNode::new(&self.circle).constructors(BindingFlags::default())[0].clone();
        ctor.invoke(None, &[Value::R8(radius)]).unwrap().unwrap()
    }
}

pub fn shapes() -> Result<Shapes> {
    let registry = TypeRegistry::new()?;
    let assembly = registry.define_assembly("Shapes");
    let double = registry.well_known("System.Double")?;
    let int = registry.well_known("System.Int32")?;
    let string = registry.well_known(WELL_KNOWN::STRING)?;
    let objects = registry.make_array(&registry.well_known(WELL_KNOWN::OBJECT)?)?;

    let shape = TypeBuilder::new(&registry, &assembly, "Shapes", "IShape")
        .interface()
        .attribute(CustomAttributeValue::new(DRAWABLE))
        .build()?;
    let handler = TypeBuilder::new(&registry, &assembly, "Shapes", "ResizedHandler")
        .extends(&registry.well_known(WELL_KNOWN::DELEGATE)?)
        .build()?;
    let circle = TypeBuilder::new(&registry, &assembly, "Shapes", "Circle")
        .implements(&shape)
        .attribute(CustomAttributeValue::new(DRAWABLE))
        .build()?;

    let radius = circle.add_field(Field::new("radius", FieldAttributes::PRIVATE, &double));
    let created = circle.add_field(Field::new(
        "Created",
        FieldAttributes::PUBLIC | FieldAttributes::STATIC,
        &int,
    ));
    created.store(None, Value::I4(0))?;

    // The constructor body must not keep the type alive
    let circle_type = std::sync::Arc::downgrade(&circle);
    let (store, count) = (radius.clone(), created.clone());
    circle.add_method(
        Method::constructor()
            .param(Param::new("radius", &double))
            .body(move |_, args| {
                let ty = circle_type
                    .upgrade()
                    .ok_or_else(|| Error::Error("type dropped".to_string()))?;
                let object = Value::object(&ty);
                store.store(Some(&object), args[0].clone())?;
                let total = count.load(None)?.as_i32().unwrap_or_default();
                count.store(None, Value::I4(total + 1))?;
                Ok(object)
            }),
    );

    let subscribe = |delta: i32| {
        move |_: Option<&Value>, _: &[Value]| -> Result<Value> { Ok(Value::I4(delta)) }
    };
    circle.add_event(
        Event::new("Resized", &handler)
            .add(
                Method::accessor("add_Resized")
                    .param(Param::new("value", &handler))
                    .body(subscribe(1)),
            )
            .remove(
                Method::accessor("remove_Resized")
                    .param(Param::new("value", &handler))
                    .body(subscribe(-1)),
            ),
    );

    let (read, write) = (radius.clone(), radius.clone());
    circle.add_property(
        Property::new("Radius", &double)
            .getter(
                Method::accessor("get_Radius")
                    .returns(&double)
                    .body(move |instance, _| read.load(instance)),
            )
            .setter(
                Method::accessor("set_Radius")
                    .param(Param::new("value", &double))
                    .body(move |instance, args| {
                        write.store(instance, args[0].clone())?;
                        Ok(Value::Null)
                    }),
            )
            .attribute(CustomAttributeValue::new(PERSISTED)),
    );

    let read = radius.clone();
    circle.add_property(
        Property::new("Area", &double).getter(
            Method::accessor("get_Area")
                .returns(&double)
                .body(move |instance, _| match read.load(instance)? {
                    Value::R8(r) => Ok(Value::R8(std::f64::consts::PI * r * r)),
                    other => Err(Error::Error(format!("unexpected radius {other}"))),
                }),
        ),
    );

    let scaled = radius.clone();
    circle.add_method(
        Method::new("Scale")
            .param(Param::new("factor", &double).with_default(Value::R8(2.0)))
            .body(move |instance, args| {
                if let (Value::R8(r), Value::R8(factor)) = (scaled.load(instance)?, &args[0]) {
                    scaled.store(instance, Value::R8(r * factor))?;
                }
                Ok(Value::Null)
            }),
    );

    circle.add_method(
        Method::new("Describe")
            .as_static()
            .param(Param::new("prefix", &string))
            .param(Param::new("parts", &objects).variadic())
            .returns(&string)
            .body(|_, args| {
                let prefix = args[0].as_str().unwrap_or_default();
                let parts: Vec<String> = args[1]
                    .as_array()
                    .map(|parts| parts.items.iter().map(ToString::to_string).collect())
                    .unwrap_or_default();
                Ok(Value::from(format!("{prefix}: {}", parts.join(", "))))
            }),
    );

    Ok(Shapes {
        registry,
        assembly,
        shape,
        handler,
        circle,
    })
}
