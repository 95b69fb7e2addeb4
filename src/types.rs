//! Core types describing the annotated type model.
//!
//! The host builds these once while constructing its model; every resolver in
//! this crate reads them and never mutates them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fully qualified class name, e.g. `com.example.Outer$Inner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassName(String);

impl ClassName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unqualified name: the segment after the last package separator and the
    /// last nesting separator (`com.example.Outer$Inner` -> `Inner`).
    pub fn simple_name(&self) -> &str {
        let unqualified = self.0.rsplit('.').next().unwrap_or(&self.0);
        unqualified.rsplit('$').next().unwrap_or(unqualified)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A type as written in the model, possibly referring to type variables of
/// the enclosing class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Var {
        var: String,
    },
    Class {
        class: ClassName,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn var(name: impl Into<String>) -> Self {
        TypeExpr::Var { var: name.into() }
    }

    pub fn class(class: impl Into<ClassName>, args: Vec<TypeExpr>) -> Self {
        TypeExpr::Class {
            class: class.into(),
            args,
        }
    }

    /// Class this expression names, `None` for a bare type variable.
    pub fn class_name(&self) -> Option<&ClassName> {
        match self {
            TypeExpr::Class { class, .. } => Some(class),
            TypeExpr::Var { .. } => None,
        }
    }
}

/// A concrete type: a class bound to concrete type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedType {
    pub class: ClassName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ResolvedType>,
}

impl ResolvedType {
    pub fn new(class: impl Into<ClassName>, args: Vec<ResolvedType>) -> Self {
        Self {
            class: class.into(),
            args,
        }
    }

    /// The class without any type arguments.
    pub fn raw(class: impl Into<ClassName>) -> Self {
        Self::new(class, Vec::new())
    }

    /// Key of this type's standard definition: simple names, arguments in
    /// angle brackets (`Box<String>`).
    pub fn definition_name(&self) -> String {
        let mut name = self.class.simple_name().to_string();
        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(|a| a.definition_name()).collect();
            name.push('<');
            name.push_str(&args.join(", "));
            name.push('>');
        }
        name
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class)?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{}", first)?;
            for arg in rest {
                write!(f, ", {}", arg)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// How the discriminator value is derived for a subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierStrategy {
    /// The subtype's declared type name.
    ByName,
    /// The subtype's fully qualified class name.
    ByClass,
    /// Any strategy this crate does not derive identifiers for.
    #[serde(other)]
    Other,
}

/// How the discriminator is carried next to the subtype's own data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrappingStyle {
    /// `[identifier, value]`
    Array,
    /// `{ identifier: value }`
    Object,
    /// Identifier as a sibling property of the value's own properties.
    #[default]
    Property,
}

/// Polymorphism declaration on a supertype.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiscriminatorConfig {
    #[serde(rename = "use")]
    pub strategy: IdentifierStrategy,
    #[serde(rename = "include", default)]
    pub wrapping: WrappingStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl DiscriminatorConfig {
    pub fn new(strategy: IdentifierStrategy, wrapping: WrappingStyle) -> Self {
        Self {
            strategy,
            wrapping,
            property: None,
        }
    }

    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Key carrying the identifier for [`WrappingStyle::Property`].
    ///
    /// Falls back to `@type` for name-based and `@class` for every other
    /// strategy when no key is configured.
    pub fn property_name(&self) -> &str {
        match self.property.as_deref() {
            Some(property) if !property.is_empty() => property,
            _ => match self.strategy {
                IdentifierStrategy::ByName => "@type",
                IdentifierStrategy::ByClass | IdentifierStrategy::Other => "@class",
            },
        }
    }
}

/// One declared subtype of a polymorphic supertype.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubtypeEntry {
    pub class: ClassName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SubtypeEntry {
    pub fn new(class: impl Into<ClassName>) -> Self {
        Self {
            class: class.into(),
            name: None,
        }
    }
}

/// Structural metadata attached to a field, accessor, or class.
///
/// A present-but-empty text value (`Some("")`) is distinct from an absent one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSet {
    /// Property description (fields and accessors).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Class-level description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_description: Option<String>,
    /// Serialized property name override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_info: Option<DiscriminatorConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtypes: Option<Vec<SubtypeEntry>>,
    /// Identifier of this class within its supertype's subtypes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Field or accessor is excluded from serialization.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ignore: bool,
    /// Properties of this class's type are excluded wherever it is used.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ignore_type: bool,
    /// Property names the class explicitly excludes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored_properties: Vec<String>,
}

/// Read accessor paired with a field at model-construction time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessorDescriptor {
    pub name: String,
    #[serde(default)]
    pub annotations: AnnotationSet,
}

/// Read-only view of a field of a class in the host model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Filled in from the enclosing class when loaded from a model file.
    #[serde(default)]
    pub declaring_class: ClassName,
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: TypeExpr,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub annotations: AnnotationSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessor: Option<AccessorDescriptor>,
}

impl FieldDescriptor {
    pub fn new(
        declaring_class: impl Into<ClassName>,
        name: impl Into<String>,
        declared_type: TypeExpr,
    ) -> Self {
        Self {
            declaring_class: declaring_class.into(),
            name: name.into(),
            declared_type,
            public: false,
            annotations: AnnotationSet::default(),
            accessor: None,
        }
    }

    pub fn with_annotations(mut self, annotations: AnnotationSet) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_accessor(mut self, name: impl Into<String>, annotations: AnnotationSet) -> Self {
        self.accessor = Some(AccessorDescriptor {
            name: name.into(),
            annotations,
        });
        self
    }

    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
}

/// A class of the host model.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassDescriptor {
    pub name: ClassName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<String>,
    #[serde(default, rename = "extends", skip_serializing_if = "Option::is_none")]
    pub supertype: Option<TypeExpr>,
    #[serde(default)]
    pub annotations: AnnotationSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDescriptor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_type_params(mut self, params: &[&str]) -> Self {
        self.type_params = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn extends(mut self, supertype: TypeExpr) -> Self {
        self.supertype = Some(supertype);
        self
    }

    pub fn with_annotations(mut self, annotations: AnnotationSet) -> Self {
        self.annotations = annotations;
        self
    }

    /// Adds a field, taking over this class as its declaring class.
    pub fn with_field(mut self, mut field: FieldDescriptor) -> Self {
        field.declaring_class = self.name.clone();
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}
