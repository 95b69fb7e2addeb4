//! Schema fragments for subtypes of polymorphic supertypes.
//!
//! A supertype's [`DiscriminatorConfig`] decides how the discriminator travels
//! with a subtype's data:
//!
//! | Wrapping | Payload shape | Fragment |
//! |----------|---------------|----------|
//! | `array` | `["id", {...}]` | `{"type": "array", "items": ["id", ref]}` |
//! | `object` | `{"id": {...}}` | `{"type": "object", "properties": {"id": ref}}` |
//! | `property` | `{"@type": "id", ...}` | `{"allOf": [ref, {"type": "object", "properties": {"@type": {"const": "id"}}}]}` |
//!
//! Only the two wrapper styles replace the subtype's definition. The property
//! style keeps the host's structural definition and is offered separately via
//! [`build_property_definition`].

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::context::SchemaGenerationContext;
use crate::keywords::SchemaKeyword;
use crate::registry::TypeContext;
use crate::types::{
    ClassName, DiscriminatorConfig, IdentifierStrategy, ResolvedType, WrappingStyle,
};

/// Polymorphism declaration of the nearest ancestor of `class` carrying one.
///
/// The class's own declaration is not consulted.
pub fn discriminator_config<'a>(
    class: &ClassName,
    context: &'a dyn TypeContext,
) -> Option<&'a DiscriminatorConfig> {
    let mut current = context.class(class)?;
    let mut seen = HashSet::new();
    seen.insert(current.name.clone());

    loop {
        let parent = current.supertype.as_ref()?.class_name()?;
        if !seen.insert(parent.clone()) {
            return None;
        }
        current = context.class(parent)?;
        if let Some(config) = &current.annotations.type_info {
            return Some(config);
        }
    }
}

/// Discriminator value identifying `class` under `config`.
///
/// Name-based identifiers need a type name annotation on the class; an empty
/// one stands for the simple class name.
pub fn type_identifier(
    class: &ClassName,
    config: &DiscriminatorConfig,
    context: &dyn TypeContext,
) -> Option<String> {
    match config.strategy {
        IdentifierStrategy::ByName => {
            let type_name = context.class(class)?.annotations.type_name.as_deref()?;
            if type_name.is_empty() {
                Some(class.simple_name().to_string())
            } else {
                Some(type_name.to_string())
            }
        }
        IdentifierStrategy::ByClass => Some(class.as_str().to_string()),
        IdentifierStrategy::Other => None,
    }
}

/// Definition replacing the subtype's standard schema under a wrapper-array
/// or wrapper-object polymorphism declaration.
///
/// Returns `None` whenever the default definition should be used instead:
/// no declaration on any ancestor, property-style wrapping, or no derivable
/// identifier.
pub fn build_custom_definition(
    subtype: &ResolvedType,
    context: &dyn SchemaGenerationContext,
) -> Option<Value> {
    let config = discriminator_config(&subtype.class, context.type_context())?;
    let identifier = type_identifier(&subtype.class, config, context.type_context())?;

    let mut definition = context.create_object_node();
    match config.wrapping {
        WrappingStyle::Array => {
            insert_type(&mut definition, context, SchemaKeyword::TypeArray);
            definition.insert(
                context.keyword(SchemaKeyword::Items).to_string(),
                Value::Array(vec![
                    Value::String(identifier),
                    context.create_standard_reference(subtype),
                ]),
            );
        }
        WrappingStyle::Object => {
            insert_type(&mut definition, context, SchemaKeyword::TypeObject);
            let mut properties = context.create_object_node();
            properties.insert(identifier, context.create_standard_reference(subtype));
            definition.insert(
                context.keyword(SchemaKeyword::Properties).to_string(),
                Value::Object(properties),
            );
        }
        WrappingStyle::Property => return None,
    }
    Some(Value::Object(definition))
}

/// Standard definition merged with a constant discriminator property, for
/// subtypes under a property-style polymorphism declaration.
///
/// Returns `None` for any other wrapping style or without a derivable
/// identifier.
pub fn build_property_definition(
    subtype: &ResolvedType,
    context: &dyn SchemaGenerationContext,
) -> Option<Value> {
    let config = discriminator_config(&subtype.class, context.type_context())?;
    match config.wrapping {
        WrappingStyle::Property => {}
        WrappingStyle::Array | WrappingStyle::Object => return None,
    }
    let identifier = type_identifier(&subtype.class, config, context.type_context())?;

    let mut constant = context.create_object_node();
    constant.insert(
        context.keyword(SchemaKeyword::Const).to_string(),
        Value::String(identifier),
    );
    let mut properties = context.create_object_node();
    properties.insert(config.property_name().to_string(), Value::Object(constant));

    let mut discriminator = context.create_object_node();
    insert_type(&mut discriminator, context, SchemaKeyword::TypeObject);
    discriminator.insert(
        context.keyword(SchemaKeyword::Properties).to_string(),
        Value::Object(properties),
    );

    let mut definition = context.create_object_node();
    definition.insert(
        context.keyword(SchemaKeyword::AllOf).to_string(),
        Value::Array(vec![
            context.create_standard_reference(subtype),
            Value::Object(discriminator),
        ]),
    );
    Some(Value::Object(definition))
}

fn insert_type(
    node: &mut Map<String, Value>,
    context: &dyn SchemaGenerationContext,
    type_keyword: SchemaKeyword,
) {
    node.insert(
        context.keyword(SchemaKeyword::Type).to_string(),
        Value::String(context.keyword(type_keyword).to_string()),
    );
}
