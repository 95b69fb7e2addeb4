//! Field visibility introspection and its per-class cache.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;

use crate::registry::{TypeContext, TypeRegistry};
use crate::types::{ClassDescriptor, ClassName, FieldDescriptor};

/// Backend deciding which fields of a class are serialized by default.
///
/// [`IntrospectionCache`] calls these methods while holding the cache entry
/// for the class. Implementations must not call back into the cache or the
/// [`FieldMetadataResolver`](crate::FieldMetadataResolver) that owns it, or
/// they may deadlock.
pub trait Introspector: Send + Sync {
    /// Field names the class explicitly marks as ignored.
    fn ignored_field_names(&self, class: &ClassName) -> BTreeSet<String>;

    /// Internal names of the properties the backend recognizes for the class.
    fn recognized_field_names(&self, class: &ClassName) -> BTreeSet<String>;
}

/// Introspection result for one class.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Introspection {
    pub ignored: BTreeSet<String>,
    pub recognized: BTreeSet<String>,
}

impl Introspection {
    pub fn of<I: Introspector + ?Sized>(introspector: &I, class: &ClassName) -> Self {
        Self {
            ignored: introspector.ignored_field_names(class),
            recognized: introspector.recognized_field_names(class),
        }
    }

    /// Explicitly ignored, or not recognized as a property at all.
    pub fn excludes(&self, field_name: &str) -> bool {
        self.ignored.contains(field_name) || !self.recognized.contains(field_name)
    }
}

/// Per-class memo of introspection results.
///
/// Safe to share across threads: the first caller for a class computes the
/// result while holding that entry, concurrent callers wait and reuse it.
#[derive(Debug, Default)]
pub struct IntrospectionCache {
    entries: DashMap<ClassName, Arc<Introspection>>,
}

impl IntrospectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_introspect<I: Introspector + ?Sized>(
        &self,
        class: &ClassName,
        introspector: &I,
    ) -> Arc<Introspection> {
        if let Some(cached) = self.entries.get(class) {
            return Arc::clone(cached.value());
        }
        let entry = self.entries.entry(class.clone()).or_insert_with(|| {
            tracing::trace!(class = %class, "introspecting class");
            Arc::new(Introspection::of(introspector, class))
        });
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Introspection driven by the annotations of a [`TypeRegistry`].
///
/// A field is a property when it is public, has a paired accessor, or carries
/// a property name annotation. It is dropped again when it or its accessor is
/// marked ignored, when its name is in a class-level ignoral list, or when its
/// declared type's class is marked as an ignored type. Inherited fields count.
#[derive(Debug, Clone)]
pub struct AnnotationIntrospector {
    registry: Arc<TypeRegistry>,
}

impl AnnotationIntrospector {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    fn hierarchy<'a>(&'a self, class: &ClassName) -> Vec<&'a ClassDescriptor> {
        let mut hierarchy: Vec<&ClassDescriptor> = self.registry.class(class).into_iter().collect();
        if !hierarchy.is_empty() {
            hierarchy.extend(self.registry.supertypes_of(class));
        }
        hierarchy
    }

    fn is_visible(field: &FieldDescriptor) -> bool {
        field.public || field.accessor.is_some() || field.annotations.property.is_some()
    }

    fn is_marked_ignored(field: &FieldDescriptor) -> bool {
        field.annotations.ignore
            || field
                .accessor
                .as_ref()
                .map(|accessor| accessor.annotations.ignore)
                .unwrap_or(false)
    }

    fn has_ignored_type(&self, field: &FieldDescriptor) -> bool {
        field
            .declared_type
            .class_name()
            .and_then(|name| self.registry.class(name))
            .map(|class| class.annotations.ignore_type)
            .unwrap_or(false)
    }
}

impl Introspector for AnnotationIntrospector {
    fn ignored_field_names(&self, class: &ClassName) -> BTreeSet<String> {
        self.hierarchy(class)
            .into_iter()
            .flat_map(|c| c.annotations.ignored_properties.iter().cloned())
            .collect()
    }

    fn recognized_field_names(&self, class: &ClassName) -> BTreeSet<String> {
        let ignored = self.ignored_field_names(class);
        self.hierarchy(class)
            .into_iter()
            .flat_map(|c| c.fields.iter())
            .filter(|field| Self::is_visible(field))
            .filter(|field| !Self::is_marked_ignored(field))
            .filter(|field| !ignored.contains(&field.name))
            .filter(|field| !self.has_ignored_type(field))
            .map(|field| field.name.clone())
            .collect()
    }
}
