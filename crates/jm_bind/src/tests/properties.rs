use serde_json::{Value as JsonValue, json};

use super::fixtures::*;
use crate::def::{MemberDef, TypeDef};
use crate::info::{AccessorRef, AutoDetect, Inclusion, Visibility};
use crate::registry::TypeRegistry;
use crate::serde::HookError;
use crate::value::{Object, Value, ValueType};
use crate::{ConfigError, MapError, Mapper, MapperConfig, UnknownProperties};

#[test]
fn any_getter_entries_follow_properties() {
    let mapper = mapper(vec![extendable_bean()]);
    let bean = Value::from(
        Object::new("ExtendableBean")
            .with("name", "name")
            .with("properties", properties(&[("key2", "value2"), ("key1", "value1")])),
    );

    assert_eq!(
        mapper.to_string(&bean).unwrap(),
        r#"{"name":"name","key1":"value1","key2":"value2"}"#
    );
}

#[test]
fn any_setter_collects_unknown_keys() {
    let mapper = mapper(vec![extendable_bean()]);
    let bean = mapper
        .reader_for("ExtendableBean")
        .read_value(&json!({ "name": "My bean", "attr2": "val2", "attr1": "val1" }))
        .unwrap();

    let bean = bean.as_object().unwrap();
    assert_eq!(bean.get("name"), Some(Value::from("My bean")));
    assert_eq!(
        bean.get("properties"),
        Some(properties(&[("attr1", "val1"), ("attr2", "val2")]))
    );
}

#[test]
fn getters_rename_private_fields() {
    let mapper = mapper(vec![person()]);
    let person = Value::from(
        Object::new("Person")
            .with("first", "firstName")
            .with("last", "lastName"),
    );

    assert_eq!(
        mapper.to_string(&person).unwrap(),
        r#"{"firstName":"firstName","lastName":"lastName"}"#
    );
}

#[test]
fn explicit_order_leads() {
    let mapper = mapper(vec![person().order(&["lastName", "firstName"])]);
    let person = Value::from(
        Object::new("Person")
            .with("first", "firstName")
            .with("last", "lastName"),
    );

    assert_eq!(
        mapper.to_string(&person).unwrap(),
        r#"{"lastName":"lastName","firstName":"firstName"}"#
    );

    let mapper = super::fixtures::mapper(vec![
        TypeDef::new("Abc")
            .field("a", ValueType::Int)
            .field("b", ValueType::Int)
            .field("c", ValueType::Int)
            .order(&["b", "a"]),
    ]);
    let abc = Value::from(Object::new("Abc").with("a", 1).with("b", 2).with("c", 3));
    assert_eq!(mapper.to_string(&abc).unwrap(), r#"{"b":2,"a":1,"c":3}"#);
}

#[test]
fn paired_accessors_share_one_name() {
    let mapper = mapper(vec![renamed_bean()]);
    let bean = Value::from(Object::new("RenamedBean").with("id", 1).with("name", "My bean"));

    let json = mapper.to_value(&bean).unwrap();
    assert_eq!(json, json!({ "id": 1, "name": "My bean" }));

    let back = mapper.reader_for("RenamedBean").read_value(&json).unwrap();
    assert_eq!(back, bean);
}

#[test]
fn setter_only_property() {
    let mapper = mapper(vec![setter_bean()]);
    let bean = mapper
        .reader_for("SetterBean")
        .read_str(r#"{"id":1,"theName":"My bean"}"#)
        .unwrap();

    assert_eq!(bean.as_object().unwrap().get("name"), Some(Value::from("My bean")));
    // No reader: the property is input only.
    assert_eq!(mapper.to_value(&bean).unwrap(), json!({ "id": 1 }));
}

#[test]
fn aliases() {
    let mapper = mapper(vec![aliased_bean()]);
    let reader = mapper.reader_for("AliasBean");

    for key in ["fName", "f_name", "firstName"] {
        let bean = reader.read_value(&json!({ key: "John", "lastName": "Green" })).unwrap();
        assert_eq!(bean.as_object().unwrap().get("firstName"), Some(Value::from("John")));
    }

    // The primary name wins, the alias is still consumed.
    let bean = reader
        .read_value(&json!({ "f_name": "Jack", "firstName": "John", "lastName": "Green" }))
        .unwrap();
    assert_eq!(bean.as_object().unwrap().get("firstName"), Some(Value::from("John")));

    let json = mapper.to_value(&bean).unwrap();
    assert_eq!(json, json!({ "firstName": "John", "lastName": "Green" }));
}

#[test]
fn aliases_yield_to_primary_names() {
    let mapper = mapper(vec![
        TypeDef::new("Pair")
            .member(MemberDef::field("a", ValueType::Int).alias("b"))
            .field("b", ValueType::Int),
    ]);
    let reader = mapper.reader_for("Pair");

    let pair = reader.read_value(&json!({ "b": 5 })).unwrap();
    let pair = pair.as_object().unwrap();
    assert_eq!(pair.get("a"), Some(Value::Int(0)));
    assert_eq!(pair.get("b"), Some(Value::Int(5)));

    let pair = reader.read_value(&json!({ "a": 1, "b": 2 })).unwrap();
    assert_eq!(pair, Value::from(Object::new("Pair").with("a", 1).with("b", 2)));
}

#[test]
fn ignored_names() {
    let by_type = TypeDef::new("BeanWithIgnore")
        .field("id", ValueType::Int)
        .field("name", ValueType::String)
        .ignore_properties(&["id"]);
    let by_member = TypeDef::new("MemberIgnore")
        .member(MemberDef::field("id", ValueType::Int).ignore())
        .field("name", ValueType::String);
    let mapper = mapper(vec![by_type, by_member]);

    for type_name in ["BeanWithIgnore", "MemberIgnore"] {
        let bean = Value::from(Object::new(type_name).with("id", 1).with("name", "My bean"));
        assert_eq!(mapper.to_value(&bean).unwrap(), json!({ "name": "My bean" }));

        let read = mapper
            .reader_for(type_name)
            .read_value(&json!({ "id": 5, "name": "My bean" }))
            .unwrap();
        assert_eq!(read.as_object().unwrap().get("id"), Some(Value::Int(0)));
    }
}

#[test]
fn opaque_types_are_skipped() {
    let mapper = mapper(vec![
        TypeDef::new("Name")
            .field("firstName", ValueType::String)
            .field("lastName", ValueType::String)
            .opaque(),
        TypeDef::new("User")
            .field("id", ValueType::Int)
            .field("name", ValueType::Object("Name")),
    ]);

    let name = Object::new("Name").with("firstName", "John").with("lastName", "Doe");
    let user = Value::from(Object::new("User").with("id", 1).with("name", name));
    assert_eq!(mapper.to_value(&user).unwrap(), json!({ "id": 1 }));

    let read = mapper
        .reader_for("User")
        .read_value(&json!({ "id": 1, "name": { "firstName": "John" } }))
        .unwrap();
    assert_eq!(read.as_object().unwrap().get("name"), Some(Value::Null));
}

#[test]
fn non_null_inclusion() {
    let mapper = mapper(vec![
        TypeDef::new("MyBean")
            .field("id", ValueType::Int)
            .field("name", ValueType::String)
            .include(Inclusion::NonNull),
        TypeDef::new("Tags").member(
            MemberDef::field("tags", ValueType::list(ValueType::String))
                .include(Inclusion::NonEmpty),
        ),
    ]);

    let bean = Value::from(Object::new("MyBean").with("id", 1).with("name", Value::Null));
    assert_eq!(mapper.to_string(&bean).unwrap(), r#"{"id":1}"#);

    let read = mapper
        .reader_for("MyBean")
        .read_value(&json!({ "id": 1, "name": null }))
        .unwrap();
    assert_eq!(read, bean);

    let tags = Value::from(Object::new("Tags").with("tags", Vec::<Value>::new()));
    assert_eq!(mapper.to_string(&tags).unwrap(), "{}");
}

#[test]
fn date_patterns() {
    let mapper = mapper(vec![event()]);
    let event = Value::from(
        Object::new("Event")
            .with("name", "party")
            .with("eventDate", date_time(2014, 12, 20, 2, 30, 0)),
    );

    let json = mapper.to_value(&event).unwrap();
    assert_eq!(json, json!({ "name": "party", "eventDate": "20-12-2014 02:30:00" }));
    assert_eq!(mapper.reader_for("Event").read_value(&json).unwrap(), event);

    let err = mapper
        .reader_for("Event")
        .read_value(&json!({ "name": "party", "eventDate": "2014/12/20" }))
        .unwrap_err();
    assert!(matches!(err, MapError::FormatParse { .. }));
    assert!(err.to_string().starts_with("cannot parse value at $.eventDate"));

    let wrong = Value::from(Object::new("Event").with("eventDate", "today"));
    assert!(matches!(mapper.to_value(&wrong), Err(MapError::Format { .. })));
}

#[test]
fn iso_dates_by_default() {
    let mapper = mapper(vec![TypeDef::new("Stamp").field("at", ValueType::DateTime)]);
    let stamp = Value::from(Object::new("Stamp").with("at", date_time(2021, 11, 5, 2, 30, 0)));

    assert_eq!(mapper.to_value(&stamp).unwrap(), json!({ "at": "2021-11-05T02:30:00" }));

    let from_millis = mapper
        .reader_for("Stamp")
        .read_value(&json!({ "at": 1_636_079_400_000_i64 }))
        .unwrap();
    assert_eq!(from_millis, stamp);
}

#[test]
fn property_deserializer_hook() {
    let mut builder = TypeRegistry::builder();
    with_custom_date(&mut builder);
    let mapper = mapper_with(builder, vec![hooked_event()]);

    let event = mapper
        .reader_for("HookedEvent")
        .read_value(&json!({ "name": "party", "eventDate": "2021-11-02 02:30:00" }))
        .unwrap();
    assert_eq!(
        event.as_object().unwrap().get("eventDate"),
        Some(Value::DateTime(date_time(2021, 11, 2, 2, 30, 0)))
    );

    let err = mapper
        .reader_for("HookedEvent")
        .read_value(&json!({ "eventDate": 3 }))
        .unwrap_err();
    assert!(matches!(
        err,
        MapError::CustomHook { ref target, .. } if target == "HookedEvent.eventDate"
    ));
}

#[test]
fn value_accessor() {
    let mapper = mapper(vec![
        TypeDef::new("TypeEnum")
            .field("name", ValueType::String)
            .json_value(AccessorRef::Field("name")),
    ]);
    let type1 = Value::from(Object::new("TypeEnum").with("name", "Type A"));

    assert_eq!(mapper.to_string(&type1).unwrap(), r#""Type A""#);
}

#[test]
fn type_serializer_hook() {
    let mut builder = TypeRegistry::builder();
    builder.serializer("itemSerializer", |value: &Value| -> Result<JsonValue, HookError> {
        let item = value.as_object().ok_or("expected an item")?;
        let owner = item.get("owner").unwrap_or_default();
        let owner_id = owner.as_object().and_then(|owner| owner.get("id")).unwrap_or_default();
        Ok(json!({
            "id": item.get("id").and_then(|id| id.as_i64()),
            "itemName": item.get("itemName").and_then(|name| name.as_str().map(str::to_owned)),
            "owner": owner_id.as_i64(),
        }))
    });
    let mapper = mapper_with(builder, vec![
        TypeDef::new("User").field("id", ValueType::Int).field("name", ValueType::String),
        TypeDef::new("Item")
            .field("id", ValueType::Int)
            .field("itemName", ValueType::String)
            .field("owner", ValueType::Object("User"))
            .serialize_with("itemSerializer"),
    ]);

    let user = Object::new("User").with("id", 2).with("name", "theUser");
    let item = Value::from(
        Object::new("Item")
            .with("id", 1)
            .with("itemName", "theItem")
            .with("owner", user),
    );
    assert_eq!(
        mapper.to_string(&item).unwrap(),
        r#"{"id":1,"itemName":"theItem","owner":2}"#
    );
}

#[test]
fn unwrapped_round_trip() {
    let mapper = mapper(vec![
        TypeDef::new("Name")
            .field("firstName", ValueType::String)
            .field("lastName", ValueType::String),
        TypeDef::new("UnwrappedUser")
            .field("id", ValueType::Int)
            .member(MemberDef::field("name", ValueType::Object("Name")).unwrap()),
        TypeDef::new("PrefixedUser")
            .field("id", ValueType::Int)
            .member(MemberDef::field("name", ValueType::Object("Name")).unwrap_with("name_", "")),
    ]);

    let name = Object::new("Name").with("firstName", "John").with("lastName", "Doe");
    let user = Value::from(Object::new("UnwrappedUser").with("id", 1).with("name", name.clone()));
    let json = mapper.to_value(&user).unwrap();
    assert_eq!(json, json!({ "id": 1, "firstName": "John", "lastName": "Doe" }));
    assert_eq!(mapper.reader_for("UnwrappedUser").read_value(&json).unwrap(), user);

    let user = Value::from(Object::new("PrefixedUser").with("id", 1).with("name", name));
    let json = mapper.to_value(&user).unwrap();
    assert_eq!(json, json!({ "id": 1, "name_firstName": "John", "name_lastName": "Doe" }));
    assert_eq!(mapper.reader_for("PrefixedUser").read_value(&json).unwrap(), user);
}

#[test]
fn field_visibility() {
    let private_bean = || {
        TypeDef::new("PrivateBean")
            .member(MemberDef::field("id", ValueType::Int).visibility(Visibility::Private))
            .member(MemberDef::field("name", ValueType::String).visibility(Visibility::Private))
    };
    let bean = Value::from(Object::new("PrivateBean").with("id", 1).with("name", "My bean"));

    let hidden = mapper(vec![private_bean()]);
    assert_eq!(hidden.to_string(&bean).unwrap(), "{}");

    let visible = mapper(vec![private_bean().auto_detect(AutoDetect::ANY)]);
    assert_eq!(visible.to_string(&bean).unwrap(), r#"{"id":1,"name":"My bean"}"#);

    let mut builder = TypeRegistry::builder();
    builder.default_auto_detect(AutoDetect::PUBLIC_ONLY.with_field(Visibility::Private));
    let by_default = mapper_with(builder, vec![private_bean()]);
    assert_eq!(by_default.to_string(&bean).unwrap(), r#"{"id":1,"name":"My bean"}"#);
}

#[test]
fn unknown_properties() {
    let defs = || {
        vec![
            TypeDef::new("Strict").field("name", ValueType::String),
            TypeDef::new("Lenient").field("name", ValueType::String).ignore_unknown(),
        ]
    };
    let input = json!({ "name": "x", "extra": true });

    let strict = mapper(defs());
    let err = strict.reader_for("Strict").read_value(&input).unwrap_err();
    assert!(matches!(
        err,
        MapError::UnknownProperty { type_name: "Strict", ref property, .. } if property == "extra"
    ));
    assert!(strict.reader_for("Lenient").read_value(&input).is_ok());

    let mut builder = TypeRegistry::builder();
    for def in defs() {
        builder.register(def);
    }
    let lenient = Mapper::with_config(
        builder.build().unwrap(),
        MapperConfig::new().with_unknown_properties(UnknownProperties::Ignore),
    );
    let read = lenient.reader_for("Strict").read_value(&input).unwrap();
    assert_eq!(read.as_object().unwrap().get("name"), Some(Value::from("x")));
}

#[test]
fn untyped_reads() {
    let mapper = mapper(vec![]);
    let value = mapper.read_value(&json!({ "a": [1, 2.5, "x", null] })).unwrap();
    let list = value.as_map().unwrap()["a"].as_list().unwrap().to_vec();
    assert_eq!(list, [Value::Int(1), Value::Float(2.5), Value::from("x"), Value::Null]);
}

#[test]
fn missing_hooks_fail_the_build() {
    let mut builder = TypeRegistry::builder();
    builder.register(TypeDef::new("Item").serialize_with("itemSerializer"));
    assert_eq!(
        builder.build().unwrap_err(),
        ConfigError::MissingHook {
            owner: "Item",
            name: "itemSerializer"
        }
    );
}
