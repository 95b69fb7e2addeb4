//! Schema keyword spelling.
//!
//! Builders never spell a keyword themselves; they ask the generation context,
//! which reads it from a [`SchemaKeywords`] configuration.

use serde::{Deserialize, Serialize};

/// Keywords this crate emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKeyword {
    Type,
    TypeObject,
    TypeArray,
    Items,
    Properties,
    AllOf,
    Const,
    Ref,
}

/// Keyword spelling and reference layout of the target schema dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaKeywords {
    #[serde(rename = "type")]
    pub type_: String,
    pub type_object: String,
    pub type_array: String,
    pub items: String,
    pub properties: String,
    pub all_of: String,
    #[serde(rename = "const")]
    pub const_: String,
    #[serde(rename = "ref")]
    pub ref_: String,
    /// Prefix of standard definition references.
    pub definitions_path: String,
}

impl Default for SchemaKeywords {
    fn default() -> Self {
        Self::draft_2020_12()
    }
}

impl SchemaKeywords {
    pub fn draft_2020_12() -> Self {
        Self {
            type_: "type".into(),
            type_object: "object".into(),
            type_array: "array".into(),
            items: "items".into(),
            properties: "properties".into(),
            all_of: "allOf".into(),
            const_: "const".into(),
            ref_: "$ref".into(),
            definitions_path: "#/$defs/".into(),
        }
    }

    /// Same spelling, definitions kept under `definitions`.
    pub fn draft_07() -> Self {
        Self {
            definitions_path: "#/definitions/".into(),
            ..Self::draft_2020_12()
        }
    }

    pub fn get(&self, keyword: SchemaKeyword) -> &str {
        match keyword {
            SchemaKeyword::Type => &self.type_,
            SchemaKeyword::TypeObject => &self.type_object,
            SchemaKeyword::TypeArray => &self.type_array,
            SchemaKeyword::Items => &self.items,
            SchemaKeyword::Properties => &self.properties,
            SchemaKeyword::AllOf => &self.all_of,
            SchemaKeyword::Const => &self.const_,
            SchemaKeyword::Ref => &self.ref_,
        }
    }
}
