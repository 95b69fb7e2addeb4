//! Schema generation context supplied by the host engine.

use serde_json::{Map, Value};

use crate::keywords::{SchemaKeyword, SchemaKeywords};
use crate::registry::{TypeContext, TypeRegistry};
use crate::types::ResolvedType;

/// Node construction, references, and keyword spelling of the host engine.
pub trait SchemaGenerationContext {
    fn keyword(&self, keyword: SchemaKeyword) -> &str;

    fn type_context(&self) -> &dyn TypeContext;

    fn create_object_node(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Reference to the standard definition the host generates for `ty`.
    fn create_standard_reference(&self, ty: &ResolvedType) -> Value;
}

/// Context referencing definitions by name under a common path, e.g.
/// `{"$ref": "#/$defs/Circle"}`.
#[derive(Debug, Clone, Copy)]
pub struct DefinitionContext<'a> {
    registry: &'a TypeRegistry,
    keywords: &'a SchemaKeywords,
}

impl<'a> DefinitionContext<'a> {
    pub fn new(registry: &'a TypeRegistry, keywords: &'a SchemaKeywords) -> Self {
        Self { registry, keywords }
    }

    pub fn keywords(&self) -> &SchemaKeywords {
        self.keywords
    }
}

impl SchemaGenerationContext for DefinitionContext<'_> {
    fn keyword(&self, keyword: SchemaKeyword) -> &str {
        self.keywords.get(keyword)
    }

    fn type_context(&self) -> &dyn TypeContext {
        self.registry
    }

    fn create_standard_reference(&self, ty: &ResolvedType) -> Value {
        let mut reference = self.create_object_node();
        reference.insert(
            self.keyword(SchemaKeyword::Ref).to_string(),
            Value::String(format!(
                "{}{}",
                self.keywords.definitions_path,
                ty.definition_name()
            )),
        );
        Value::Object(reference)
    }
}
