//! Type model loading from JSON.
//!
//! A model file lists the host's classes:
//!
//! ```json
//! {
//!   "classes": [
//!     {
//!       "name": "com.example.Shape",
//!       "annotations": {
//!         "type_info": { "use": "by_name", "include": "object" },
//!         "subtypes": [{ "class": "com.example.Circle" }]
//!       }
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;
use crate::registry::TypeRegistry;
use crate::types::ClassDescriptor;

#[derive(Debug, Deserialize)]
struct ModelFile {
    #[serde(default)]
    classes: Vec<ClassDescriptor>,
}

/// Load a type model from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::InvalidJson` if it isn't a valid model, or
/// `LoadError::DuplicateClass` if a class is declared twice.
pub fn load_model(path: &Path) -> Result<TypeRegistry, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_model_str(&content)
}

/// Load a type model from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't a valid model, or
/// `LoadError::DuplicateClass` if a class is declared twice.
pub fn load_model_str(content: &str) -> Result<TypeRegistry, LoadError> {
    let model: ModelFile =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;

    let mut registry = TypeRegistry::new();
    for mut class in model.classes {
        for field in &mut class.fields {
            field.declaring_class = class.name.clone();
        }
        if registry.contains(&class.name) {
            return Err(LoadError::DuplicateClass { class: class.name });
        }
        registry.insert(class);
    }

    tracing::debug!(classes = registry.len(), "loaded type model");
    Ok(registry)
}
