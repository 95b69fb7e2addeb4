//! Error types for type-model loading and subtype binding.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ClassName;

/// Errors while binding a subtype against a declared supertype.
///
/// These never reach callers of the subtype discovery hook: a failed binding
/// falls back to the unparameterized subtype.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("unknown class {class}")]
    UnknownClass { class: ClassName },

    #[error("{subtype} is not a subtype of {supertype}")]
    NotASubtype {
        subtype: ClassName,
        supertype: ClassName,
    },

    #[error("type parameter {param} of {subtype} is bound to both {first} and {second}")]
    ConflictingBinding {
        subtype: ClassName,
        param: String,
        first: String,
        second: String,
    },

    #[error("type parameter {param} of {subtype} cannot be derived from {declared}")]
    UnboundTypeParameter {
        subtype: ClassName,
        param: String,
        declared: String,
    },

    #[error("cyclic supertype chain through {class}")]
    CyclicHierarchy { class: ClassName },
}

/// Errors while loading a type model.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("class {class} is declared more than once")]
    DuplicateClass { class: ClassName },
}

impl BindingError {
    /// Whether the failure comes from type parameters rather than the hierarchy itself.
    pub fn is_parameter_mismatch(&self) -> bool {
        matches!(
            self,
            BindingError::ConflictingBinding { .. } | BindingError::UnboundTypeParameter { .. }
        )
    }
}
