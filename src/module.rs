//! Registration of the annotation resolvers with a schema generator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::SchemaGenerationContext;
use crate::field::FieldMetadataResolver;
use crate::introspect::Introspector;
use crate::polymorphic::{build_custom_definition, build_property_definition};
use crate::subtypes::find_subtypes;
use crate::types::{ClassDescriptor, FieldDescriptor, ResolvedType};

pub type FieldTextResolver = Box<dyn Fn(&FieldDescriptor) -> Option<String> + Send + Sync>;
pub type FieldCheck = Box<dyn Fn(&FieldDescriptor) -> bool + Send + Sync>;
pub type TypeTextResolver = Box<dyn Fn(&ClassDescriptor) -> Option<String> + Send + Sync>;
pub type SubtypeResolver = Box<
    dyn Fn(&ResolvedType, &dyn SchemaGenerationContext) -> Option<Vec<ResolvedType>>
        + Send
        + Sync,
>;
pub type CustomDefinitionProvider =
    Box<dyn Fn(&ResolvedType, &dyn SchemaGenerationContext) -> Option<Value> + Send + Sync>;

/// Hook registration points of a schema generator.
pub trait ConfigBuilder {
    fn with_field_description_resolver(&mut self, resolver: FieldTextResolver) -> &mut Self;
    fn with_property_name_override_resolver(&mut self, resolver: FieldTextResolver) -> &mut Self;
    fn with_field_ignore_check(&mut self, check: FieldCheck) -> &mut Self;
    fn with_type_description_resolver(&mut self, resolver: TypeTextResolver) -> &mut Self;
    fn with_subtype_resolver(&mut self, resolver: SubtypeResolver) -> &mut Self;
    fn with_custom_definition_provider(&mut self, provider: CustomDefinitionProvider)
        -> &mut Self;
}

/// Registered hooks, queried in registration order.
///
/// Text resolvers, subtype resolvers, and definition providers report the
/// first answer; a field is ignored when any check says so.
#[derive(Default)]
pub struct HookRegistry {
    field_descriptions: Vec<FieldTextResolver>,
    name_overrides: Vec<FieldTextResolver>,
    ignore_checks: Vec<FieldCheck>,
    type_descriptions: Vec<TypeTextResolver>,
    subtype_resolvers: Vec<SubtypeResolver>,
    definition_providers: Vec<CustomDefinitionProvider>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_description(&self, field: &FieldDescriptor) -> Option<String> {
        self.field_descriptions.iter().find_map(|r| r(field))
    }

    pub fn property_name_override(&self, field: &FieldDescriptor) -> Option<String> {
        self.name_overrides.iter().find_map(|r| r(field))
    }

    pub fn should_ignore(&self, field: &FieldDescriptor) -> bool {
        self.ignore_checks.iter().any(|check| check(field))
    }

    pub fn type_description(&self, class: &ClassDescriptor) -> Option<String> {
        self.type_descriptions.iter().find_map(|r| r(class))
    }

    pub fn subtypes(
        &self,
        declared: &ResolvedType,
        context: &dyn SchemaGenerationContext,
    ) -> Option<Vec<ResolvedType>> {
        self.subtype_resolvers
            .iter()
            .find_map(|r| r(declared, context))
    }

    pub fn custom_definition(
        &self,
        subtype: &ResolvedType,
        context: &dyn SchemaGenerationContext,
    ) -> Option<Value> {
        self.definition_providers
            .iter()
            .find_map(|p| p(subtype, context))
    }

    /// Number of registered hooks of every kind.
    pub fn len(&self) -> usize {
        self.field_descriptions.len()
            + self.name_overrides.len()
            + self.ignore_checks.len()
            + self.type_descriptions.len()
            + self.subtype_resolvers.len()
            + self.definition_providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("field_descriptions", &self.field_descriptions.len())
            .field("name_overrides", &self.name_overrides.len())
            .field("ignore_checks", &self.ignore_checks.len())
            .field("type_descriptions", &self.type_descriptions.len())
            .field("subtype_resolvers", &self.subtype_resolvers.len())
            .field("definition_providers", &self.definition_providers.len())
            .finish()
    }
}

impl ConfigBuilder for HookRegistry {
    fn with_field_description_resolver(&mut self, resolver: FieldTextResolver) -> &mut Self {
        self.field_descriptions.push(resolver);
        self
    }

    fn with_property_name_override_resolver(&mut self, resolver: FieldTextResolver) -> &mut Self {
        self.name_overrides.push(resolver);
        self
    }

    fn with_field_ignore_check(&mut self, check: FieldCheck) -> &mut Self {
        self.ignore_checks.push(check);
        self
    }

    fn with_type_description_resolver(&mut self, resolver: TypeTextResolver) -> &mut Self {
        self.type_descriptions.push(resolver);
        self
    }

    fn with_subtype_resolver(&mut self, resolver: SubtypeResolver) -> &mut Self {
        self.subtype_resolvers.push(resolver);
        self
    }

    fn with_custom_definition_provider(
        &mut self,
        provider: CustomDefinitionProvider,
    ) -> &mut Self {
        self.definition_providers.push(provider);
        self
    }
}

/// Options for [`AnnotationModule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleOptions {
    /// Register the subtype resolver and the wrapper definition provider.
    pub subtype_resolution: bool,
    /// Also replace definitions of property-style subtypes with the standard
    /// definition merged with a constant discriminator property.
    pub property_discriminators: bool,
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            subtype_resolution: true,
            property_discriminators: false,
        }
    }
}

impl ModuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subtype_resolution(mut self, enabled: bool) -> Self {
        self.subtype_resolution = enabled;
        self
    }

    pub fn property_discriminators(mut self, enabled: bool) -> Self {
        self.property_discriminators = enabled;
        self
    }
}

/// Field metadata and polymorphic subtype support driven by model annotations.
///
/// ```
/// use std::sync::Arc;
/// use schema_annotations::{
///     AnnotationIntrospector, AnnotationModule, HookRegistry, TypeRegistry,
/// };
///
/// let registry = Arc::new(TypeRegistry::new());
/// let module = AnnotationModule::new(AnnotationIntrospector::new(Arc::clone(&registry)));
///
/// let mut hooks = HookRegistry::new();
/// module.apply_to_config_builder(&mut hooks);
/// assert_eq!(hooks.len(), 6);
/// ```
#[derive(Debug)]
pub struct AnnotationModule<I> {
    resolver: Arc<FieldMetadataResolver<I>>,
    options: ModuleOptions,
}

impl<I: Introspector + 'static> AnnotationModule<I> {
    pub fn new(introspector: I) -> Self {
        Self {
            resolver: Arc::new(FieldMetadataResolver::new(introspector)),
            options: ModuleOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ModuleOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> ModuleOptions {
        self.options
    }

    pub fn resolver(&self) -> &Arc<FieldMetadataResolver<I>> {
        &self.resolver
    }

    pub fn apply_to_config_builder<B: ConfigBuilder + ?Sized>(&self, builder: &mut B) {
        let description = Arc::clone(&self.resolver);
        let name_override = Arc::clone(&self.resolver);
        let ignore = Arc::clone(&self.resolver);
        let type_description = Arc::clone(&self.resolver);

        builder
            .with_field_description_resolver(Box::new(move |field: &FieldDescriptor| {
                description.resolve_description(field).map(String::from)
            }))
            .with_property_name_override_resolver(Box::new(move |field: &FieldDescriptor| {
                name_override.resolve_name_override(field).map(String::from)
            }))
            .with_field_ignore_check(Box::new(move |field: &FieldDescriptor| {
                ignore.should_ignore(field)
            }))
            .with_type_description_resolver(Box::new(move |class: &ClassDescriptor| {
                type_description
                    .resolve_type_description(class)
                    .map(String::from)
            }));

        if !self.options.subtype_resolution {
            return;
        }

        let property_discriminators = self.options.property_discriminators;
        builder
            .with_subtype_resolver(Box::new(
                |declared: &ResolvedType, context: &dyn SchemaGenerationContext| {
                    find_subtypes(declared, context.type_context())
                },
            ))
            .with_custom_definition_provider(Box::new(
                move |subtype: &ResolvedType, context: &dyn SchemaGenerationContext| {
                    build_custom_definition(subtype, context).or_else(|| {
                        if property_discriminators {
                            build_property_definition(subtype, context)
                        } else {
                            None
                        }
                    })
                },
            ));
    }
}
