//! In-memory type model and subtype binding.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::BindingError;
use crate::types::{ClassDescriptor, ClassName, ResolvedType, TypeExpr};

/// Type lookups and generic binding supplied by the host.
pub trait TypeContext {
    /// Descriptor of a class, with its annotations.
    fn class(&self, name: &ClassName) -> Option<&ClassDescriptor>;

    /// Bind `subclass` against the type arguments of `declared`.
    ///
    /// # Errors
    ///
    /// Returns `BindingError` when `subclass` is unknown, does not extend the
    /// declared class, or has type parameters the declared type cannot bind.
    fn resolve_subtype(
        &self,
        declared: &ResolvedType,
        subclass: &ClassName,
    ) -> Result<ResolvedType, BindingError>;

    /// Resolve a class without any type arguments.
    fn resolve(&self, class: &ClassName) -> ResolvedType {
        ResolvedType::raw(class.clone())
    }
}

/// Class table of a host model.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    classes: HashMap<ClassName, ClassDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, replacing any earlier descriptor with the same name.
    pub fn insert(&mut self, class: ClassDescriptor) -> Option<ClassDescriptor> {
        self.classes.insert(class.name.clone(), class)
    }

    pub fn with_class(mut self, class: ClassDescriptor) -> Self {
        self.insert(class);
        self
    }

    pub fn contains(&self, name: &ClassName) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Ancestors of `name`, nearest first. Stops at the first unknown class
    /// or when the chain loops back on itself.
    pub fn supertypes_of(&self, name: &ClassName) -> Vec<&ClassDescriptor> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(name.clone());

        let mut current = self.classes.get(name);
        while let Some(class) = current {
            let Some(parent) = class
                .supertype
                .as_ref()
                .and_then(TypeExpr::class_name)
                .and_then(|n| self.classes.get(n))
            else {
                break;
            };
            if !seen.insert(parent.name.clone()) {
                break;
            }
            chain.push(parent);
            current = Some(parent);
        }
        chain
    }

    /// Reference from `subclass` up to `target`, expressed in terms of
    /// `subclass`'s own type parameters.
    fn path_to(&self, subclass: &ClassName, target: &ClassName) -> Result<TypeExpr, BindingError> {
        let start = self
            .classes
            .get(subclass)
            .ok_or_else(|| BindingError::UnknownClass {
                class: subclass.clone(),
            })?;

        let mut current = TypeExpr::class(
            start.name.clone(),
            start.type_params.iter().map(TypeExpr::var).collect(),
        );
        let mut seen = HashSet::new();

        loop {
            let TypeExpr::Class { class, args } = &current else {
                break;
            };
            if class == target {
                return Ok(current);
            }
            if !seen.insert(class.clone()) {
                return Err(BindingError::CyclicHierarchy {
                    class: class.clone(),
                });
            }
            let Some(descriptor) = self.classes.get(class) else {
                break;
            };
            let Some(supertype) = &descriptor.supertype else {
                break;
            };

            // A raw reference erases every supertype above it.
            let next = if args.len() != descriptor.type_params.len() {
                match supertype {
                    TypeExpr::Class { class, .. } => TypeExpr::class(class.clone(), Vec::new()),
                    TypeExpr::Var { .. } => break,
                }
            } else {
                let scope: HashMap<&str, &TypeExpr> = descriptor
                    .type_params
                    .iter()
                    .map(String::as_str)
                    .zip(args.iter())
                    .collect();
                substitute(supertype, &scope)
            };
            current = next;
        }

        Err(BindingError::NotASubtype {
            subtype: subclass.clone(),
            supertype: target.clone(),
        })
    }
}

impl TypeContext for TypeRegistry {
    fn class(&self, name: &ClassName) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    fn resolve_subtype(
        &self,
        declared: &ResolvedType,
        subclass: &ClassName,
    ) -> Result<ResolvedType, BindingError> {
        let path = self.path_to(subclass, &declared.class)?;
        let descriptor = self
            .classes
            .get(subclass)
            .ok_or_else(|| BindingError::UnknownClass {
                class: subclass.clone(),
            })?;

        let mut bindings = BTreeMap::new();
        unify(&path, declared, subclass, &mut bindings)?;

        let args = descriptor
            .type_params
            .iter()
            .map(|param| {
                bindings
                    .remove(param.as_str())
                    .ok_or_else(|| BindingError::UnboundTypeParameter {
                        subtype: subclass.clone(),
                        param: param.clone(),
                        declared: declared.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolvedType::new(subclass.clone(), args))
    }
}

fn substitute(expr: &TypeExpr, scope: &HashMap<&str, &TypeExpr>) -> TypeExpr {
    match expr {
        TypeExpr::Var { var } => scope
            .get(var.as_str())
            .map(|bound| (*bound).clone())
            .unwrap_or_else(|| expr.clone()),
        TypeExpr::Class { class, args } => TypeExpr::Class {
            class: class.clone(),
            args: args.iter().map(|a| substitute(a, scope)).collect(),
        },
    }
}

fn unify<'a>(
    expr: &'a TypeExpr,
    concrete: &ResolvedType,
    subclass: &ClassName,
    bindings: &mut BTreeMap<&'a str, ResolvedType>,
) -> Result<(), BindingError> {
    match expr {
        TypeExpr::Var { var } => match bindings.get(var.as_str()) {
            Some(bound) if bound != concrete => Err(BindingError::ConflictingBinding {
                subtype: subclass.clone(),
                param: var.clone(),
                first: bound.to_string(),
                second: concrete.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                bindings.insert(var.as_str(), concrete.clone());
                Ok(())
            }
        },
        TypeExpr::Class { class, args } => {
            if class != &concrete.class {
                return Err(BindingError::NotASubtype {
                    subtype: subclass.clone(),
                    supertype: concrete.class.clone(),
                });
            }
            // A raw side on either end binds nothing.
            if args.len() != concrete.args.len() {
                return Ok(());
            }
            for (arg, concrete_arg) in args.iter().zip(&concrete.args) {
                unify(arg, concrete_arg, subclass, bindings)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string() -> ResolvedType {
        ResolvedType::raw("java.lang.String")
    }

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with_class(ClassDescriptor::new("com.example.Container").with_type_params(&["T"]))
            .with_class(
                ClassDescriptor::new("com.example.Box")
                    .with_type_params(&["V"])
                    .extends(TypeExpr::class(
                        "com.example.Container",
                        vec![TypeExpr::var("V")],
                    )),
            )
            .with_class(
                ClassDescriptor::new("com.example.Pair")
                    .with_type_params(&["A", "B"])
                    .extends(TypeExpr::class(
                        "com.example.Container",
                        vec![TypeExpr::var("A")],
                    )),
            )
            .with_class(
                ClassDescriptor::new("com.example.StringBox").extends(TypeExpr::class(
                    "com.example.Box",
                    vec![TypeExpr::class("java.lang.String", vec![])],
                )),
            )
            .with_class(ClassDescriptor::new("com.example.Unrelated"))
    }

    #[test]
    fn binds_shared_parameter() {
        let declared = ResolvedType::new("com.example.Container", vec![string()]);
        let resolved = registry()
            .resolve_subtype(&declared, &ClassName::new("com.example.Box"))
            .unwrap();
        assert_eq!(resolved, ResolvedType::new("com.example.Box", vec![string()]));
    }

    #[test]
    fn binds_through_intermediate_class() {
        let declared = ResolvedType::new("com.example.Container", vec![string()]);
        let resolved = registry()
            .resolve_subtype(&declared, &ClassName::new("com.example.StringBox"))
            .unwrap();
        assert_eq!(resolved, ResolvedType::raw("com.example.StringBox"));
    }

    #[test]
    fn extra_parameter_is_unbound() {
        let declared = ResolvedType::new("com.example.Container", vec![string()]);
        let err = registry()
            .resolve_subtype(&declared, &ClassName::new("com.example.Pair"))
            .unwrap_err();
        assert!(matches!(
            err,
            BindingError::UnboundTypeParameter { ref param, .. } if param == "B"
        ));
    }

    #[test]
    fn raw_intermediate_erases_parent_variables() {
        let registry = TypeRegistry::new()
            .with_class(ClassDescriptor::new("com.example.Root").with_type_params(&["T"]))
            .with_class(
                ClassDescriptor::new("com.example.Mid")
                    .with_type_params(&["T"])
                    .extends(TypeExpr::class("com.example.Root", vec![TypeExpr::var("T")])),
            )
            .with_class(
                ClassDescriptor::new("com.example.Sub")
                    .with_type_params(&["T"])
                    .extends(TypeExpr::class("com.example.Mid", vec![])),
            );
        let declared = ResolvedType::new("com.example.Root", vec![string()]);

        let err = registry
            .resolve_subtype(&declared, &ClassName::new("com.example.Sub"))
            .unwrap_err();
        assert!(matches!(
            err,
            BindingError::UnboundTypeParameter { ref param, .. } if param == "T"
        ));

        let resolved = registry
            .resolve_subtype(&declared, &ClassName::new("com.example.Mid"))
            .unwrap();
        assert_eq!(resolved, ResolvedType::new("com.example.Mid", vec![string()]));
    }

    #[test]
    fn fixed_argument_conflicts_with_declared() {
        let declared = ResolvedType::new(
            "com.example.Container",
            vec![ResolvedType::raw("java.lang.Integer")],
        );
        let err = registry()
            .resolve_subtype(&declared, &ClassName::new("com.example.StringBox"))
            .unwrap_err();
        assert!(matches!(err, BindingError::NotASubtype { .. }));
    }

    #[test]
    fn unrelated_class_is_not_a_subtype() {
        let declared = ResolvedType::raw("com.example.Container");
        let err = registry()
            .resolve_subtype(&declared, &ClassName::new("com.example.Unrelated"))
            .unwrap_err();
        assert!(matches!(err, BindingError::NotASubtype { .. }));
    }

    #[test]
    fn unknown_class_errors() {
        let declared = ResolvedType::raw("com.example.Container");
        let err = registry()
            .resolve_subtype(&declared, &ClassName::new("com.example.Missing"))
            .unwrap_err();
        assert!(matches!(err, BindingError::UnknownClass { .. }));
    }

    #[test]
    fn cyclic_hierarchy_is_detected() {
        let registry = TypeRegistry::new()
            .with_class(
                ClassDescriptor::new("com.example.A")
                    .extends(TypeExpr::class("com.example.B", vec![])),
            )
            .with_class(
                ClassDescriptor::new("com.example.B")
                    .extends(TypeExpr::class("com.example.A", vec![])),
            );
        let err = registry
            .resolve_subtype(
                &ResolvedType::raw("com.example.Root"),
                &ClassName::new("com.example.A"),
            )
            .unwrap_err();
        assert!(matches!(err, BindingError::CyclicHierarchy { .. }));
        assert_eq!(registry.supertypes_of(&ClassName::new("com.example.A")).len(), 1);
    }

    #[test]
    fn supertypes_nearest_first() {
        let registry = registry();
        let names: Vec<&str> = registry
            .supertypes_of(&ClassName::new("com.example.StringBox"))
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["com.example.Box", "com.example.Container"]);
    }
}
