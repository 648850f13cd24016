use serde_json::json;

use super::fixtures::*;
use crate::MapError;
use crate::def::{CreatorDef, MemberDef, TypeDef};
use crate::info::{CreatorArg, CreatorArgs};
use crate::serde::{HookError, InjectableValues};
use crate::value::{Object, Value, ValueType};

fn item_from_args(args: &CreatorArgs) -> Result<Value, HookError> {
    Ok(Object::new("Item")
        .with("id", args.get("id").clone())
        .with("itemName", args.get("itemName").clone())
        .into())
}

#[test]
fn single_argument_creator() {
    let mapper = mapper(vec![creator_bean()]);
    let bean = mapper
        .reader_for("CreatorBean")
        .read_value(&json!({ "id": 1, "theName": "My bean" }))
        .unwrap();

    let bean = bean.as_object().unwrap();
    assert_eq!(bean.get("id"), Some(Value::Int(1)));
    assert_eq!(bean.get("name"), Some(Value::from("My bean")));
}

#[test]
fn property_creator() {
    let mapper = mapper(vec![properties_bean()]);
    let bean = mapper
        .reader_for("PropertiesBean")
        .read_str(r#"{"theName":"My bean","id":7}"#)
        .unwrap();

    assert_eq!(
        bean,
        Value::from(Object::new("PropertiesBean").with("id", 7).with("name", "My bean"))
    );

    let err = mapper
        .reader_for("PropertiesBean")
        .read_value(&json!({ "id": 7 }))
        .unwrap_err();
    assert!(matches!(
        err,
        MapError::MissingArgument {
            type_name: "PropertiesBean",
            argument: "theName",
            ..
        }
    ));
}

#[test]
fn optional_arguments_default() {
    let mapper = mapper(vec![
        TypeDef::new("Item")
            .field("id", ValueType::Int)
            .field("itemName", ValueType::String)
            .creator(
                CreatorDef::properties(item_from_args)
                    .arg(CreatorArg::new("id", ValueType::Int).optional())
                    .arg(CreatorArg::new("itemName", ValueType::String)),
            ),
    ]);

    let item = mapper
        .reader_for("Item")
        .read_value(&json!({ "itemName": "book" }))
        .unwrap();
    assert_eq!(item.as_object().unwrap().get("id"), Some(Value::Int(0)));
}

#[test]
fn creators_may_return_constants() {
    let mapper = mapper(vec![distance()]);
    let reader = mapper.reader_for("Distance");

    assert_eq!(reader.read_value(&json!({ "unit": "km" })).unwrap(), Value::from("KILOMETER"));
    assert_eq!(reader.read_value(&json!("mi")).unwrap(), Value::from("MILE"));

    let err = reader.read_value(&json!("parsec")).unwrap_err();
    assert!(matches!(err, MapError::CustomHook { ref target, .. } if target == "Distance creator"));

    let err = reader.read_value(&json!({ "unit": "km", "scale": 2 })).unwrap_err();
    assert!(matches!(err, MapError::UnknownProperty { ref property, .. } if property == "scale"));
}

#[test]
fn injected_by_type() {
    let mapper = mapper(vec![
        TypeDef::new("Item")
            .field("id", ValueType::Int)
            .field("itemName", ValueType::String)
            .creator(
                CreatorDef::properties(item_from_args)
                    .arg(CreatorArg::new("id", ValueType::Int).inject())
                    .arg(CreatorArg::new("itemName", ValueType::String)),
            ),
    ]);
    let input = json!({ "itemName": "My bean" });

    let injectables = InjectableValues::new().with_type(&ValueType::Int, 1);
    let item = mapper
        .reader_for("Item")
        .with_injectables(&injectables)
        .read_value(&input)
        .unwrap();
    assert_eq!(
        item,
        Value::from(Object::new("Item").with("id", 1).with("itemName", "My bean"))
    );

    // Input wins over the injected value.
    let item = mapper
        .reader_for("Item")
        .with_injectables(&injectables)
        .read_value(&json!({ "id": 9, "itemName": "My bean" }))
        .unwrap();
    assert_eq!(item.as_object().unwrap().get("id"), Some(Value::Int(9)));

    let err = mapper.reader_for("Item").read_value(&input).unwrap_err();
    assert!(matches!(err, MapError::MissingInjectable { ref key, .. } if key == "int"));
}

#[test]
fn injected_properties() {
    let mapper = mapper(vec![
        TypeDef::new("Audit")
            .member(MemberDef::field("user", ValueType::String).inject_key("currentUser"))
            .field("action", ValueType::String),
    ]);
    let injectables = InjectableValues::new().with("currentUser", "root");

    let audit = mapper
        .reader_for("Audit")
        .with_injectables(&injectables)
        .read_value(&json!({ "action": "login" }))
        .unwrap();
    assert_eq!(
        audit,
        Value::from(Object::new("Audit").with("user", "root").with("action", "login"))
    );
}

#[test]
fn failing_creator_reports_the_type() {
    fn refuse(_: &CreatorArgs) -> Result<Value, HookError> {
        Err("refused".into())
    }

    let mapper = mapper(vec![
        TypeDef::new("Locked")
            .field("code", ValueType::Int)
            .creator(CreatorDef::single(CreatorArg::new("code", ValueType::Int), refuse)),
        TypeDef::new("Door").field("lock", ValueType::Object("Locked")),
    ]);

    let err = mapper
        .reader_for("Door")
        .read_value(&json!({ "lock": { "code": 1 } }))
        .unwrap_err();
    assert_eq!(err.to_string(), "custom hook for `Locked creator` failed (at $.lock): refused");
}
