//! Integration tests for subtype discovery and polymorphic definitions.

use std::fs;

use serde_json::{json, Value};
use tempfile::TempDir;

use schema_annotations::{
    build_custom_definition, build_property_definition, find_subtypes, load_model,
    load_model_str, AnnotationIntrospector, AnnotationModule, DefinitionContext, HookRegistry,
    ModuleOptions, ResolvedType, SchemaKeywords, TypeRegistry,
};

const SUPER: &str = "com.example.TestSuperClass";
const SUB_1: &str = "com.example.TestSuperClass$TestSubClass1";
const SUB_2: &str = "com.example.TestSuperClass$TestSubClass2";
const SUB_3: &str = "com.example.TestSuperClass$TestSubClass3";

/// Supertype with three named subtypes, using the given discriminator.
fn model(type_info: Value) -> TypeRegistry {
    let model = json!({
        "classes": [
            {
                "name": SUPER,
                "annotations": {
                    "type_info": type_info,
                    "subtypes": [
                        { "class": SUB_1 },
                        { "class": SUB_2 },
                        { "class": SUB_3 }
                    ]
                }
            },
            {
                "name": SUB_1,
                "extends": { "class": SUPER },
                "annotations": { "type_name": "SUB_CLASS_1" },
                "fields": [{ "name": "type", "type": { "class": "java.lang.String" }, "public": true }]
            },
            {
                "name": SUB_2,
                "extends": { "class": SUPER },
                "annotations": { "type_name": "SUB_CLASS_2" },
                "fields": [{ "name": "type", "type": { "class": "com.example.SubClassType" }, "public": true }]
            },
            {
                "name": SUB_3,
                "extends": { "class": SUPER },
                "annotations": { "type_name": "SUB_CLASS_3" }
            }
        ]
    });
    load_model_str(&model.to_string()).unwrap()
}

fn by_name(include: &str) -> Value {
    json!({ "use": "by_name", "include": include, "property": "type" })
}

fn custom_definition(registry: &TypeRegistry, class: &str) -> Option<Value> {
    let keywords = SchemaKeywords::default();
    let context = DefinitionContext::new(registry, &keywords);
    build_custom_definition(&ResolvedType::raw(class), &context)
}

mod find_subtypes_test {
    use super::*;

    #[test]
    fn returns_declared_subtypes_in_order() {
        let registry = model(by_name("property"));
        let found = find_subtypes(&ResolvedType::raw(SUPER), &registry).unwrap();
        assert_eq!(
            found,
            vec![
                ResolvedType::raw(SUB_1),
                ResolvedType::raw(SUB_2),
                ResolvedType::raw(SUB_3),
            ]
        );
    }

    #[test]
    fn subtype_without_list_defers() {
        let registry = model(by_name("property"));
        assert!(find_subtypes(&ResolvedType::raw(SUB_1), &registry).is_none());
    }

    #[test]
    fn is_idempotent() {
        let registry = model(by_name("array"));
        let declared = ResolvedType::raw(SUPER);
        assert_eq!(
            find_subtypes(&declared, &registry),
            find_subtypes(&declared, &registry)
        );
    }
}

mod custom_definition_test {
    use super::*;

    #[test]
    fn wrapper_array() {
        let registry = model(by_name("array"));
        assert_eq!(
            custom_definition(&registry, SUB_1).unwrap(),
            json!({
                "type": "array",
                "items": ["SUB_CLASS_1", { "$ref": "#/$defs/TestSubClass1" }]
            })
        );
    }

    #[test]
    fn wrapper_object() {
        let registry = model(by_name("object"));
        let definition = custom_definition(&registry, SUB_1).unwrap();
        assert_eq!(
            definition,
            json!({
                "type": "object",
                "properties": { "SUB_CLASS_1": { "$ref": "#/$defs/TestSubClass1" } }
            })
        );
        assert_eq!(definition["properties"].as_object().unwrap().len(), 1);
    }

    #[test]
    fn property_style_yields_none_for_every_subtype() {
        let registry = model(by_name("property"));
        for class in [SUB_1, SUB_2, SUB_3] {
            assert!(custom_definition(&registry, class).is_none(), "{}", class);
        }
    }

    #[test]
    fn class_identifier() {
        let registry = model(json!({ "use": "by_class", "include": "object" }));
        let definition = custom_definition(&registry, SUB_3).unwrap();
        assert!(definition["properties"].get(SUB_3).is_some());
    }

    #[test]
    fn unsupported_strategy_yields_none() {
        let registry = model(json!({ "use": "minimal_class", "include": "array" }));
        assert!(custom_definition(&registry, SUB_2).is_none());
    }

    #[test]
    fn undecorated_type_yields_none() {
        let registry = load_model_str(r#"{ "classes": [{ "name": "com.example.Plain" }] }"#)
            .unwrap();
        assert!(custom_definition(&registry, "com.example.Plain").is_none());
    }

    #[test]
    fn is_idempotent() {
        let registry = model(by_name("array"));
        assert_eq!(
            custom_definition(&registry, SUB_2),
            custom_definition(&registry, SUB_2)
        );
    }
}

mod payload_validation {
    use super::*;

    fn with_defs(mut definition: Value) -> Value {
        definition.as_object_mut().unwrap().insert(
            "$defs".into(),
            json!({
                "TestSubClass1": {
                    "type": "object",
                    "properties": { "type": { "type": "string" } }
                }
            }),
        );
        definition
    }

    #[test]
    fn wrapper_object_accepts_wrapped_payload() {
        let registry = model(by_name("object"));
        let schema = with_defs(custom_definition(&registry, SUB_1).unwrap());
        let validator = jsonschema::validator_for(&schema).unwrap();

        assert!(validator.is_valid(&json!({ "SUB_CLASS_1": { "type": "x" } })));
        assert!(!validator.is_valid(&json!({ "SUB_CLASS_1": { "type": 1 } })));
    }

    #[test]
    fn property_definition_requires_matching_constant() {
        let registry = model(by_name("property"));
        let keywords = SchemaKeywords::default();
        let context = DefinitionContext::new(&registry, &keywords);
        let definition =
            build_property_definition(&ResolvedType::raw(SUB_1), &context).unwrap();
        let schema = with_defs(definition);
        let validator = jsonschema::validator_for(&schema).unwrap();

        assert!(validator.is_valid(&json!({ "type": "SUB_CLASS_1" })));
        assert!(!validator.is_valid(&json!({ "type": "SUB_CLASS_2" })));
    }
}

mod module_hooks {
    use super::*;
    use std::sync::Arc;

    fn hooks(registry: &Arc<TypeRegistry>, options: ModuleOptions) -> HookRegistry {
        let module = AnnotationModule::new(AnnotationIntrospector::new(Arc::clone(registry)))
            .with_options(options);
        let mut hooks = HookRegistry::new();
        module.apply_to_config_builder(&mut hooks);
        hooks
    }

    #[test]
    fn subtypes_then_definitions() {
        let registry = Arc::new(model(by_name("array")));
        let hooks = hooks(&registry, ModuleOptions::default());
        let keywords = SchemaKeywords::default();
        let context = DefinitionContext::new(&registry, &keywords);

        let subtypes = hooks.subtypes(&ResolvedType::raw(SUPER), &context).unwrap();
        let identifiers: Vec<Value> = subtypes
            .iter()
            .map(|s| hooks.custom_definition(s, &context).unwrap()["items"][0].clone())
            .collect();
        assert_eq!(
            identifiers,
            vec![json!("SUB_CLASS_1"), json!("SUB_CLASS_2"), json!("SUB_CLASS_3")]
        );
    }

    #[test]
    fn property_discriminators_opt_in() {
        let registry = Arc::new(model(by_name("property")));
        let keywords = SchemaKeywords::default();
        let context = DefinitionContext::new(&registry, &keywords);
        let subtype = ResolvedType::raw(SUB_2);

        let default_hooks = hooks(&registry, ModuleOptions::default());
        assert!(default_hooks.custom_definition(&subtype, &context).is_none());

        let opted_in = hooks(&registry, ModuleOptions::new().property_discriminators(true));
        let definition = opted_in.custom_definition(&subtype, &context).unwrap();
        assert_eq!(
            definition["allOf"][1]["properties"]["type"],
            json!({ "const": "SUB_CLASS_2" })
        );
    }
}

mod model_file {
    use super::*;

    #[test]
    fn loads_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        fs::write(
            &path,
            json!({
                "classes": [
                    {
                        "name": "com.example.Shape",
                        "annotations": {
                            "type_info": { "use": "by_name", "include": "object" },
                            "subtypes": [{ "class": "com.example.Square" }]
                        }
                    },
                    {
                        "name": "com.example.Square",
                        "extends": { "class": "com.example.Shape" },
                        "annotations": { "type_name": "" }
                    }
                ]
            })
            .to_string(),
        )
        .unwrap();

        let registry = load_model(&path).unwrap();
        assert_eq!(
            custom_definition(&registry, "com.example.Square").unwrap(),
            json!({
                "type": "object",
                "properties": { "Square": { "$ref": "#/$defs/Square" } }
            })
        );
    }
}
