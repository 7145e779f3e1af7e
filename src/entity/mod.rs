//! Entity Descriptors
//!
//! The resolved output consumed by template rendering: one descriptor per
//! class with its fields and both sides of its relationships. Serialized
//! field names are the ones the downstream templates read.

pub mod changelog;

pub use changelog::ChangelogDate;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

use crate::model::{Cardinality, ClassId, DtoStyle, PaginationStyle, SearchEngine, ServiceStyle};

/// Type name every large-object field collapses to
pub const BINARY_TYPE: &str = "byte[]";

// =============================================================================
// Fields
// =============================================================================

/// Content kind of a binary field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobContent {
    Any,
    Image,
    Text,
}

/// A resolved field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub field_name: String,
    pub field_type: String,
    /// Enumeration literals, comma-joined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_values: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type_blob_content: Option<BlobContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    /// Rule names in declaration order; absent when the field has no validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_validate_rules: Option<Vec<String>>,
    /// Rule parameters keyed `fieldValidateRules<Rule>`
    #[serde(flatten)]
    pub rule_values: BTreeMap<String, serde_json::Value>,
}

impl FieldDescriptor {
    pub fn new(field_name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_type: field_type.into(),
            field_values: None,
            field_type_blob_content: None,
            javadoc: None,
            field_validate_rules: None,
            rule_values: BTreeMap::new(),
        }
    }

    /// Parameter of a validation rule, looked up by rule name
    pub fn rule_value(&self, rule: &str) -> Option<&serde_json::Value> {
        self.rule_values.get(&rule_value_key(rule))
    }

    pub fn has_rule(&self, rule: &str) -> bool {
        self.field_validate_rules
            .as_ref()
            .is_some_and(|rules| rules.iter().any(|r| r == rule))
    }
}

/// Key under which a rule's parameter is exposed: `maxlength` -> `fieldValidateRulesMaxlength`
pub fn rule_value_key(rule: &str) -> String {
    format!("fieldValidateRules{}", crate::naming::capitalize(rule))
}

// =============================================================================
// Relationships
// =============================================================================

/// Validation marker of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipRule {
    Required,
}

/// One side of an association, as seen by the entity holding it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDescriptor {
    pub relationship_type: Cardinality,
    pub relationship_name: String,
    pub other_entity_name: String,
    /// Display field of the referenced entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_entity_field: Option<String>,
    /// Name of this relationship on the other entity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_entity_relationship_name: Option<String>,
    /// Set for one-to-one and many-to-many only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_side: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_validate_rules: Option<RelationshipRule>,
}

impl RelationshipDescriptor {
    pub fn new(
        relationship_type: Cardinality,
        relationship_name: impl Into<String>,
        other_entity_name: impl Into<String>,
    ) -> Self {
        Self {
            relationship_type,
            relationship_name: relationship_name.into(),
            other_entity_name: other_entity_name.into(),
            other_entity_field: None,
            other_entity_relationship_name: None,
            owner_side: None,
            relationship_validate_rules: None,
        }
    }

    pub fn is_required(&self) -> bool {
        self.relationship_validate_rules == Some(RelationshipRule::Required)
    }

    pub fn is_owner_side(&self) -> bool {
        self.owner_side == Some(true)
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A fully resolved entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescriptor {
    pub fluent_methods: bool,
    pub relationships: Vec<RelationshipDescriptor>,
    pub fields: Vec<FieldDescriptor>,
    pub changelog_date: ChangelogDate,
    pub dto: DtoStyle,
    pub pagination: PaginationStyle,
    pub service: ServiceStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microservice_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_engine: Option<SearchEngine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
    pub entity_table_name: String,
    pub jpa_metamodel_filtering: bool,
    #[serde(
        rename = "angularJSSuffix",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub angular_js_suffix: Option<String>,
}

impl EntityDescriptor {
    pub fn relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.relationships.iter().find(|r| r.relationship_name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.field_name == name)
    }
}

/// Entry of an [`EntityMap`]
#[derive(Debug, Clone)]
pub struct EntityEntry {
    pub class_id: ClassId,
    /// Class name as declared (file names, diagnostics)
    pub class_name: String,
    pub descriptor: EntityDescriptor,
}

/// Class id -> entity descriptor, in declaration order
#[derive(Debug, Clone, Default)]
pub struct EntityMap {
    entries: Vec<EntityEntry>,
    index: HashMap<ClassId, usize>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entity of a class, keeping its first position
    pub fn insert(&mut self, class_id: impl Into<ClassId>, class_name: impl Into<String>, descriptor: EntityDescriptor) {
        let class_id = class_id.into();
        let entry = EntityEntry {
            class_id: class_id.clone(),
            class_name: class_name.into(),
            descriptor,
        };
        match self.index.get(&class_id) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.index.insert(class_id, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, class_id: &str) -> Option<&EntityDescriptor> {
        self.index.get(class_id).map(|&pos| &self.entries[pos].descriptor)
    }

    pub fn get_mut(&mut self, class_id: &str) -> Option<&mut EntityDescriptor> {
        let pos = *self.index.get(class_id)?;
        Some(&mut self.entries[pos].descriptor)
    }

    pub fn class_name(&self, class_id: &str) -> Option<&str> {
        self.index.get(class_id).map(|&pos| self.entries[pos].class_name.as_str())
    }

    pub fn contains(&self, class_id: &str) -> bool {
        self.index.contains_key(class_id)
    }

    /// Remove the entity of a class, keeping the order of the others
    pub fn remove(&mut self, class_id: &str) -> Option<EntityEntry> {
        let pos = self.index.remove(class_id)?;
        let removed = self.entries.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityEntry> {
        self.entries.iter()
    }

    pub fn class_ids(&self) -> impl Iterator<Item = &ClassId> {
        self.entries.iter().map(|e| &e.class_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for EntityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.class_id, &entry.descriptor)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a EntityMap {
    type Item = &'a EntityEntry;
    type IntoIter = std::slice::Iter<'a, EntityEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
