use pattern_params::lookup::{params, LookupFn};
use pattern_params::{
    introspect, schema, ConfigError, Descriptor, ParseFailure, ParserFactory, TypedValue,
};

fn deployment() -> Descriptor {
    schema!(Deployment {
        "service": Descriptor::string(),
        "replicas": Descriptor::optional(Descriptor::integer()),
    })
}

#[test]
fn deployment_scenario() {
    let parser = ParserFactory::new().from_schema(&deployment()).unwrap();

    let bound = parser.parse("", &params([("service", "orders")])).unwrap();
    assert_eq!(
        serde_json::to_value(TypedValue::Struct(bound)).unwrap(),
        serde_json::json!({"service": "orders", "replicas": null})
    );

    let none = params::<&str, &str, _>([]);
    assert_eq!(parser.parse("", &none).unwrap_err(), ParseFailure::missing("service"));

    let bad = params([("service", "orders"), ("replicas", "x")]);
    assert_eq!(
        parser.parse("", &bad).unwrap_err(),
        ParseFailure::Malformed { key: "replicas".into(), reason: "not an integer".into() }
    );
}

#[test]
fn list_length_ignores_keys_after_the_gap() {
    let d = schema!(Root { "ports": Descriptor::list(Descriptor::integer()) });
    let parser = ParserFactory::new().from_schema(&d).unwrap();
    let p = params([
        ("ports.0", "80"),
        ("ports.1", "443"),
        ("ports.2", "8080"),
        ("ports.4", "9000"),
        ("ports.5", "not-even-a-number"),
    ]);
    let bound = parser.parse("", &p).unwrap();
    let ports: Vec<i64> = bound.get("ports").unwrap().as_list().unwrap().iter().filter_map(TypedValue::as_integer).collect();
    assert_eq!(ports, [80, 443, 8080]);
}

#[test]
fn optional_nested_struct_classification() {
    let d = schema!(Root {
        "pair": Descriptor::optional(schema!(Pair {
            "a": Descriptor::string(),
            "b": Descriptor::string(),
        })),
    });
    let parser = ParserFactory::new().from_schema(&d).unwrap();

    let absent = parser.parse("", &params::<&str, &str, _>([])).unwrap();
    assert!(absent.get("pair").unwrap().is_none());

    let partial = parser.parse("", &params([("pair.a", "x")])).unwrap_err();
    assert_eq!(partial, ParseFailure::FieldIncomplete { prefix: "pair".into(), field: "b".into() });
}

#[test]
fn closures_work_as_lookups() {
    let parser = ParserFactory::new().from_schema(&deployment()).unwrap();
    let lookup = LookupFn(|key: &str| match key {
        "service" => Some("billing".to_string()),
        "replicas" => Some("2".to_string()),
        _ => None,
    });
    let bound = parser.parse("", &lookup).unwrap();
    assert_eq!(
        bound.get("replicas"),
        Some(&TypedValue::Optional(Some(Box::new(TypedValue::Integer(2)))))
    );
}

#[test]
fn illegal_shapes_fail_before_parsing() {
    let f = ParserFactory::new();
    assert!(matches!(
        f.compile(&Descriptor::list(Descriptor::optional(Descriptor::string()))),
        Err(ConfigError::OptionalListElement { .. })
    ));
    assert!(matches!(
        f.compile(&Descriptor::optional(Descriptor::optional(Descriptor::string()))),
        Err(ConfigError::NestedOptional { .. })
    ));
}

#[test]
fn introspection_matches_declaration() {
    let d = schema!(Tagged {
        "name": Descriptor::string(),
        "tags": Descriptor::list(Descriptor::string()),
    });
    assert_eq!(
        serde_json::to_value(introspect(&d).unwrap()).unwrap(),
        serde_json::json!([
            {"name": "name", "optional": false},
            {"name": "tags", "fields": [{"name": "0", "optional": false}]},
        ])
    );
}

#[test]
fn one_parser_serves_many_threads() {
    let parser = ParserFactory::new().from_schema(&deployment()).unwrap();
    std::thread::scope(|scope| {
        for i in 0..4 {
            let parser = &parser;
            scope.spawn(move || {
                let replicas = i.to_string();
                let p = params([("service", "orders"), ("replicas", replicas.as_str())]);
                let bound = parser.parse("", &p).unwrap();
                assert_eq!(
                    bound.get("replicas"),
                    Some(&TypedValue::Optional(Some(Box::new(TypedValue::Integer(i)))))
                );
            });
        }
    });
}
