//! Integration tests for compiling and applying mappings

use copymap::config::MapperConfig;
use copymap::resolve::ResolveError;
use copymap::{
    CompileError, EvalError, ExprFactory, FunctionError, MapperFactory, Record, SimpleScope, Value,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use serde_json::{Map, Value as JsonValue, json};
use std::str::FromStr;

fn spec(value: JsonValue) -> Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        _ => panic!("mapping must be an object"),
    }
}

fn factory(ignore_errors: bool) -> MapperFactory {
    let mut properties = Record::new();
    properties.insert("channel".to_string(), Value::from("WEB"));
    MapperFactory::new(
        ExprFactory::with_properties(properties),
        MapperConfig::new(ignore_errors),
    )
}

fn order_scope() -> SimpleScope<'static> {
    SimpleScope::from_json(json!({
        "order": {
            "id": "so-100",
            "customer": {"name": "  Ada  ", "tier": "gold"},
            "lines": [{"sku": "A1", "qty": 2, "price": 9.5}, {"sku": "B2", "qty": 1, "price": 3}],
            "discount": null
        }
    }))
}

#[test]
fn test_expression_features() {
    let mapper = factory(false)
        .new_mapper(&spec(json!({
            "id": "=string.upper($.order.id)",
            "name": "=string.trim($.order.customer.name)",
            "firstSku": "=$.order.lines[0].sku",
            "lineTotal": "=$.order.lines[0].qty * $.order.lines[0].price",
            "rounded": "=number.round(10 / 3, 2)",
            "discount": "=utility.coalesce($.order.discount, 0)",
            "vip": "=$.order.customer.tier == 'gold' ? 'Y' : 'N'",
            "channel": "=$property.channel",
            "label": "=$.order.id + '/' + $.order.lines[1].sku",
        })))
        .unwrap()
        .unwrap();

    let record = mapper.apply(&order_scope()).unwrap();

    let expected: Record = [
        ("id", Value::from("SO-100")),
        ("name", Value::from("Ada")),
        ("firstSku", Value::from("A1")),
        ("lineTotal", Value::Decimal(Decimal::from(19))),
        ("rounded", Value::Decimal(Decimal::from_str("3.33").unwrap())),
        ("discount", Value::Integer(0)),
        ("vip", Value::from("Y")),
        ("channel", Value::from("WEB")),
        ("label", Value::from("so-100/B2")),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect();
    assert_eq!(record, expected);
}

#[test]
fn test_missing_nested_key_is_null_but_missing_variable_fails() {
    let mapper = factory(false)
        .new_mapper(&spec(json!({"nick": "=$.order.customer.nickname"})))
        .unwrap()
        .unwrap();
    assert_eq!(
        mapper.apply(&order_scope()).unwrap().get("nick"),
        Some(&Value::Null)
    );

    let mapper = factory(false)
        .new_mapper(&spec(json!({"x": "=$.invoice.id"})))
        .unwrap()
        .unwrap();
    let err = mapper.apply(&order_scope()).unwrap_err();
    assert_eq!(
        err.root_cause(),
        &EvalError::Resolve(ResolveError::NotFound {
            name: "invoice".to_string()
        })
    );
}

#[test]
fn test_all_or_nothing_versus_best_effort() {
    let mapping = spec(json!({
        "id": "=$.order.id",
        "broken": "=string.substring($.order.id, 'x', 1)",
        "kind": "SALE",
    }));

    let err = factory(false)
        .new_mapper(&mapping)
        .unwrap()
        .unwrap()
        .apply(&order_scope())
        .unwrap_err();
    assert!(matches!(
        err.root_cause(),
        EvalError::Function(FunctionError::InvalidArgumentType { index: 1, .. })
    ));

    let record = factory(true)
        .new_mapper(&mapping)
        .unwrap()
        .unwrap()
        .apply(&order_scope())
        .unwrap();
    assert_eq!(record.keys().collect::<Vec<_>>(), vec!["id", "kind"]);
}

#[test]
fn test_conditional_never_evaluates_unused_branch() {
    let mapper = factory(false)
        .new_mapper(&spec(json!({
            "tier": {
                "if": "=$.order.customer.tier == 'gold'",
                "then": {"if": "=$.order.lines[0].qty > 1", "then": "GOLD-MULTI", "else": "GOLD"},
                "else": "=$.nowhere.at.all",
            },
        })))
        .unwrap()
        .unwrap();

    let record = mapper.apply(&order_scope()).unwrap();
    assert_eq!(record.get("tier"), Some(&Value::from("GOLD-MULTI")));
}

#[test]
fn test_nested_object_feeds_dotted_paths() {
    let mapper = factory(false)
        .new_mapper(&spec(json!({
            "header": {"mapping": {
                "ids": {"mapping": {"order": "=$.order.id", "unused": null}},
                "source": "API",
            }},
        })))
        .unwrap()
        .unwrap();

    let record = Value::Object(mapper.apply(&order_scope()).unwrap());
    assert_eq!(record.lookup("header.ids.order"), Some(&Value::from("so-100")));
    assert_eq!(record.lookup("header.ids.unused"), None);
    assert_eq!(record.lookup("header.source"), Some(&Value::from("API")));
}

#[test]
fn test_compile_failures_are_atomic_and_name_the_field() {
    let err = factory(false)
        .new_mapper(&spec(json!({
            "fine": "=$.order.id",
            "cond": {"if": "=$.order.id ==", "then": "x"},
        })))
        .unwrap_err();

    match &err {
        CompileError::Field { field, source } => {
            assert_eq!(field, "cond");
            assert!(matches!(source.as_ref(), CompileError::Field { field, .. } if field == "if"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(err.root_cause(), CompileError::Parse(_)));

    assert!(matches!(
        factory(false).new_mapper(&spec(json!({"x": "=missing.fn()"}))),
        Err(CompileError::Field { .. })
    ));
}
