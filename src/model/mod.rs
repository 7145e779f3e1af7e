//! Parsed Domain Model
//!
//! The read-only input of entity resolution: classes with typed fields,
//! enumerations, validations and directional associations. Producing this
//! graph from a modeling notation is the parser's job; this module only
//! defines its shape and lookups.
//!
//! Classes and associations are ordered lists (declaration order drives the
//! output order). Everything referenced by id lives in a lookup map.

pub mod cardinality;
pub mod options;

pub use cardinality::Cardinality;
pub use options::{DatabaseType, DtoStyle, PaginationStyle, SearchEngine, ServiceStyle};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

pub type ClassId = String;
pub type FieldId = String;
pub type TypeId = String;
pub type ValidationId = String;

// =============================================================================
// Nodes
// =============================================================================

/// A class of the domain model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassNode {
    pub id: ClassId,
    pub name: String,
    /// Table name hint, snake-cased on output; the class name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Field ids in declaration order
    #[serde(default)]
    pub fields: Vec<FieldId>,
    #[serde(default)]
    pub dto: DtoStyle,
    #[serde(default)]
    pub pagination: PaginationStyle,
    #[serde(default)]
    pub service: ServiceStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microservice_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_engine: Option<SearchEngine>,
}

impl ClassNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            table_name: None,
            comment: None,
            fields: Vec::new(),
            dto: DtoStyle::default(),
            pagination: PaginationStyle::default(),
            service: ServiceStyle::default(),
            microservice_name: None,
            search_engine: None,
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Table name hint, falling back to the class name
    pub fn table_name_hint(&self) -> &str {
        self.table_name.as_deref().unwrap_or(&self.name)
    }
}

/// A field of a class
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldNode {
    pub id: FieldId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Id of a primitive type or of an enumeration
    #[serde(rename = "type")]
    pub type_id: TypeId,
    /// Validation ids in declaration order
    #[serde(default)]
    pub validations: Vec<ValidationId>,
}

impl FieldNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            comment: None,
            type_id: type_id.into(),
            validations: Vec::new(),
        }
    }
}

/// Entry of the primitive type registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeNode {
    pub name: String,
}

/// An enumerated type with its literal values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumNode {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A validation rule attached to a field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

/// A directional association between two classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationNode {
    pub from: ClassId,
    pub to: ClassId,
    #[serde(rename = "type")]
    pub cardinality: Cardinality,
    /// `name` or `name(otherField)` exposed on the origin class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injected_field_in_from: Option<String>,
    /// `name` or `name(otherField)` exposed on the destination class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injected_field_in_to: Option<String>,
    #[serde(default)]
    pub is_injected_field_in_from_required: bool,
    #[serde(default)]
    pub is_injected_field_in_to_required: bool,
}

impl AssociationNode {
    pub fn new(from: impl Into<String>, to: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            cardinality,
            injected_field_in_from: None,
            injected_field_in_to: None,
            is_injected_field_in_from_required: false,
            is_injected_field_in_to_required: false,
        }
    }

    pub fn with_from_field(mut self, field: impl Into<String>) -> Self {
        self.injected_field_in_from = Some(field.into());
        self
    }

    pub fn with_to_field(mut self, field: impl Into<String>) -> Self {
        self.injected_field_in_to = Some(field.into());
        self
    }

    pub fn from_required(mut self) -> Self {
        self.is_injected_field_in_from_required = true;
        self
    }

    pub fn to_required(mut self) -> Self {
        self.is_injected_field_in_to_required = true;
        self
    }

    /// Whether the destination side explicitly declares a field.
    ///
    /// An empty string counts as absent.
    pub fn has_to_field(&self) -> bool {
        self.injected_field_in_to.as_deref().is_some_and(|f| !f.is_empty())
    }

    /// Whether the origin side explicitly declares a field
    pub fn has_from_field(&self) -> bool {
        self.injected_field_in_from.as_deref().is_some_and(|f| !f.is_empty())
    }
}

// =============================================================================
// Parsed Model
// =============================================================================

/// The whole parsed model with lookups by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedModel {
    #[serde(default)]
    pub classes: Vec<ClassNode>,
    #[serde(default)]
    pub fields: HashMap<FieldId, FieldNode>,
    #[serde(default)]
    pub types: HashMap<TypeId, TypeNode>,
    #[serde(default)]
    pub enums: HashMap<TypeId, EnumNode>,
    #[serde(default)]
    pub validations: HashMap<ValidationId, ValidationNode>,
    #[serde(default)]
    pub associations: Vec<AssociationNode>,
}

impl ParsedModel {
    /// Parse a model from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a model from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Class ids in declaration order
    pub fn class_ids(&self) -> impl Iterator<Item = &ClassId> {
        self.classes.iter().map(|c| &c.id)
    }

    pub fn class(&self, id: &str) -> Option<&ClassNode> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn field(&self, id: &str) -> Option<&FieldNode> {
        self.fields.get(id)
    }

    pub fn primitive(&self, id: &str) -> Option<&TypeNode> {
        self.types.get(id)
    }

    pub fn enumeration(&self, id: &str) -> Option<&EnumNode> {
        self.enums.get(id)
    }

    pub fn validation(&self, id: &str) -> Option<&ValidationNode> {
        self.validations.get(id)
    }

    pub fn has_associations(&self) -> bool {
        !self.associations.is_empty()
    }
}
