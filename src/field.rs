//! Field-level metadata: descriptions, name overrides, and ignore decisions.

use crate::introspect::{IntrospectionCache, Introspector};
use crate::types::{AnnotationSet, ClassDescriptor, FieldDescriptor};

/// Look up an annotation value on the field itself, falling back to its
/// paired accessor when the field does not carry it.
pub fn annotation_from_field_or_accessor<'a, T, F>(
    field: &'a FieldDescriptor,
    select: F,
) -> Option<&'a T>
where
    T: ?Sized,
    F: Fn(&'a AnnotationSet) -> Option<&'a T>,
{
    select(&field.annotations).or_else(|| {
        field
            .accessor
            .as_ref()
            .and_then(|accessor| select(&accessor.annotations))
    })
}

/// Resolves descriptions, name overrides, and ignore decisions for fields.
///
/// Owns the per-class introspection cache; share one resolver across
/// generation passes to reuse it.
#[derive(Debug)]
pub struct FieldMetadataResolver<I> {
    introspector: I,
    cache: IntrospectionCache,
}

impl<I: Introspector> FieldMetadataResolver<I> {
    pub fn new(introspector: I) -> Self {
        Self {
            introspector,
            cache: IntrospectionCache::new(),
        }
    }

    /// Description from the field, or else from its accessor.
    pub fn resolve_description<'a>(&self, field: &'a FieldDescriptor) -> Option<&'a str> {
        annotation_from_field_or_accessor(field, |a| a.description.as_deref())
    }

    /// Class-level description of a type.
    pub fn resolve_type_description<'a>(&self, class: &'a ClassDescriptor) -> Option<&'a str> {
        class.annotations.class_description.as_deref()
    }

    /// Alternative property name from the field, or else from its accessor.
    ///
    /// Empty overrides and overrides equal to the declared name are not
    /// reported.
    pub fn resolve_name_override<'a>(&self, field: &'a FieldDescriptor) -> Option<&'a str> {
        annotation_from_field_or_accessor(field, |a| a.property.as_deref())
            .filter(|name| !name.is_empty() && *name != field.name)
    }

    /// Whether the introspection backend excludes the field, either by an
    /// explicit ignoral or by not recognizing it as a property.
    pub fn should_ignore(&self, field: &FieldDescriptor) -> bool {
        self.cache
            .get_or_introspect(&field.declaring_class, &self.introspector)
            .excludes(&field.name)
    }

    pub fn introspector(&self) -> &I {
        &self.introspector
    }

    pub fn cache(&self) -> &IntrospectionCache {
        &self.cache
    }
}
