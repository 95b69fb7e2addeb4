//! Schema Annotations
//!
//! Annotation-driven metadata for JSON Schema generators.
//!
//! This library plugs into a schema generation engine and answers the questions
//! the engine asks while traversing a type model: what a field is described as,
//! what name it serializes under, whether it is serialized at all, which
//! concrete subtypes a polymorphic supertype has, and how a subtype's schema
//! carries its discriminator.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use schema_annotations::{
//!     AnnotationIntrospector, AnnotationModule, AnnotationSet, ClassDescriptor,
//!     DefinitionContext, DiscriminatorConfig, HookRegistry, IdentifierStrategy, ResolvedType,
//!     SchemaKeywords, SubtypeEntry, TypeExpr, TypeRegistry, WrappingStyle,
//! };
//! use serde_json::json;
//!
//! let shape = ClassDescriptor::new("com.example.Shape").with_annotations(AnnotationSet {
//!     type_info: Some(DiscriminatorConfig::new(
//!         IdentifierStrategy::ByName,
//!         WrappingStyle::Object,
//!     )),
//!     subtypes: Some(vec![SubtypeEntry::new("com.example.Circle")]),
//!     ..AnnotationSet::default()
//! });
//! let circle = ClassDescriptor::new("com.example.Circle")
//!     .extends(TypeExpr::class("com.example.Shape", vec![]))
//!     .with_annotations(AnnotationSet {
//!         type_name: Some("circle".into()),
//!         ..AnnotationSet::default()
//!     });
//! let registry = Arc::new(TypeRegistry::new().with_class(shape).with_class(circle));
//!
//! let module = AnnotationModule::new(AnnotationIntrospector::new(Arc::clone(&registry)));
//! let mut hooks = HookRegistry::new();
//! module.apply_to_config_builder(&mut hooks);
//!
//! let keywords = SchemaKeywords::default();
//! let context = DefinitionContext::new(&registry, &keywords);
//!
//! let subtypes = hooks
//!     .subtypes(&ResolvedType::raw("com.example.Shape"), &context)
//!     .unwrap();
//! assert_eq!(subtypes, vec![ResolvedType::raw("com.example.Circle")]);
//!
//! // Wrapper-object encoding: { "circle": { ...circle's own schema... } }
//! let definition = hooks.custom_definition(&subtypes[0], &context).unwrap();
//! assert_eq!(
//!     definition,
//!     json!({
//!         "type": "object",
//!         "properties": { "circle": { "$ref": "#/$defs/Circle" } }
//!     })
//! );
//! ```
//!
//! # Resolution Rules
//!
//! | Question | Source | Absent when |
//! |----------|--------|-------------|
//! | Field description | field, else its accessor | neither is annotated |
//! | Type description | class annotation | class is not annotated |
//! | Name override | field, else its accessor | empty or equal to the field name |
//! | Ignore field | introspection backend | (always answers) |
//! | Subtypes | declared subtype list | class declares no list |
//! | Custom definition | nearest ancestor's discriminator | property wrapping, no identifier |

mod context;
mod error;
mod field;
mod introspect;
mod keywords;
mod loader;
mod module;
mod polymorphic;
mod registry;
mod subtypes;
mod types;

pub use context::{DefinitionContext, SchemaGenerationContext};
pub use error::{BindingError, LoadError};
pub use field::{annotation_from_field_or_accessor, FieldMetadataResolver};
pub use introspect::{AnnotationIntrospector, Introspection, IntrospectionCache, Introspector};
pub use keywords::{SchemaKeyword, SchemaKeywords};
pub use loader::{load_model, load_model_str};
pub use module::{
    AnnotationModule, ConfigBuilder, CustomDefinitionProvider, FieldCheck, FieldTextResolver,
    HookRegistry, ModuleOptions, SubtypeResolver, TypeTextResolver,
};
pub use polymorphic::{
    build_custom_definition, build_property_definition, discriminator_config, type_identifier,
};
pub use registry::{TypeContext, TypeRegistry};
pub use subtypes::{find_subtypes, resolve_subtypes};
pub use types::{
    AccessorDescriptor, AnnotationSet, ClassDescriptor, ClassName, DiscriminatorConfig,
    FieldDescriptor, IdentifierStrategy, ResolvedType, SubtypeEntry, TypeExpr, WrappingStyle,
};
