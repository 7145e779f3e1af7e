//! Name Resolution
//!
//! Pure helpers deriving identifiers from class and field names:
//! - camelCase for field-like identifiers
//! - lower-first camelCase for entity-like identifiers
//! - snake_case for table names
//!
//! Also parses the `name(otherField)` reference syntax used on association ends.

use convert_case::{Case, Casing};

/// Field used on the other entity when a reference names none
pub const DEFAULT_OTHER_ENTITY_FIELD: &str = "id";

// =============================================================================
// Casing
// =============================================================================

/// `order line` / `order_line` / `OrderLine` -> `orderLine`
pub fn camel_case(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    s.to_case(Case::Camel)
}

/// Lower-cases the first character only: `OrderLine` -> `orderLine`, `ID` -> `iD`
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Entity-like identifier: lower-first camelCase of a class name
pub fn entity_name(class_name: &str) -> String {
    lower_first(&camel_case(class_name))
}

/// `OrderLine` -> `order_line`
pub fn snake_case(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    s.to_case(Case::Snake)
}

/// Upper-cases the first character and lower-cases the rest: `maxLength` -> `Maxlength`
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
    }
}

// =============================================================================
// Field References
// =============================================================================

/// Parsed `relationshipName(otherEntityField)` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReference {
    /// Name of the relationship on the declaring side; empty when not given
    pub relationship_name: String,
    /// Display field on the other entity, `id` unless given in parentheses
    pub other_entity_field: String,
}

impl Default for FieldReference {
    fn default() -> Self {
        Self {
            relationship_name: String::new(),
            other_entity_field: DEFAULT_OTHER_ENTITY_FIELD.to_string(),
        }
    }
}

impl FieldReference {
    /// Parse `name` or `name(field)`. An absent reference yields the defaults.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        match raw.split_once('(') {
            None => Self {
                relationship_name: raw.to_string(),
                ..Self::default()
            },
            Some((name, rest)) => {
                let field = rest.split(')').next().unwrap_or_default();
                Self {
                    relationship_name: name.to_string(),
                    other_entity_field: field.to_string(),
                }
            }
        }
    }

    /// The relationship name, or `fallback` when the reference left it empty
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.relationship_name.is_empty() {
            fallback
        } else {
            &self.relationship_name
        }
    }
}

/// Shorthand for [`FieldReference::parse`]
pub fn to_field_reference(raw: Option<&str>) -> FieldReference {
    FieldReference::parse(raw)
}
