//! Subtype discovery from declared subtype lists.

use crate::registry::TypeContext;
use crate::types::{ResolvedType, SubtypeEntry};

/// Concrete subtypes declared on `declared`'s class, in declaration order.
///
/// Returns `None` when the class declares no subtype list, leaving discovery
/// to the host. Duplicates are kept.
pub fn find_subtypes(
    declared: &ResolvedType,
    context: &dyn TypeContext,
) -> Option<Vec<ResolvedType>> {
    let entries = context.class(&declared.class)?.annotations.subtypes.as_ref()?;
    Some(resolve_subtypes(declared, entries, context))
}

/// Bind every entry against `declared`.
pub fn resolve_subtypes(
    declared: &ResolvedType,
    entries: &[SubtypeEntry],
    context: &dyn TypeContext,
) -> Vec<ResolvedType> {
    entries
        .iter()
        .map(|entry| resolve_subtype(declared, entry, context))
        .collect()
}

/// Bind one entry, falling back to the subtype without any type arguments
/// (not even those shared with the supertype) when binding fails.
fn resolve_subtype(
    declared: &ResolvedType,
    entry: &SubtypeEntry,
    context: &dyn TypeContext,
) -> ResolvedType {
    match context.resolve_subtype(declared, &entry.class) {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::debug!(
                declared = %declared,
                subtype = %entry.class,
                parameter_mismatch = err.is_parameter_mismatch(),
                error = %err,
                "falling back to unparameterized subtype"
            );
            context.resolve(&entry.class)
        }
    }
}
