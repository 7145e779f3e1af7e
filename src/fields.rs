//! Field Materialization
//!
//! Turns the field list of a class into field descriptors: resolves the type
//! name (primitive registry first, then enumerations), collapses large-object
//! types to a binary type with a content tag, and attaches validation rules.

use std::collections::BTreeMap;

use crate::entity::{rule_value_key, BlobContent, FieldDescriptor, BINARY_TYPE};
use crate::error::{EntityError, Result};
use crate::model::{ClassNode, FieldNode, ParsedModel};
use crate::naming::camel_case;

/// Rule that never carries a parameter
pub const REQUIRED_RULE: &str = "required";

/// Content kind of a large-object type name, `None` for any other type
pub fn blob_content(type_name: &str) -> Option<BlobContent> {
    match type_name {
        "Blob" | "AnyBlob" => Some(BlobContent::Any),
        "ImageBlob" => Some(BlobContent::Image),
        "TextBlob" => Some(BlobContent::Text),
        _ => None,
    }
}

/// Trimmed documentation comment; blank comments are dropped
pub fn format_comment(comment: Option<&str>) -> Option<String> {
    comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Descriptors for every field of a class, in declaration order
pub fn materialize_fields(model: &ParsedModel, class: &ClassNode) -> Result<Vec<FieldDescriptor>> {
    class
        .fields
        .iter()
        .map(|field_id| {
            let field = model.field(field_id).ok_or_else(|| EntityError::UnknownReference {
                kind: "field",
                id: field_id.clone(),
                owner: class.name.clone(),
            })?;
            materialize_field(model, class, field)
        })
        .collect()
}

/// Descriptor for a single field
pub fn materialize_field(model: &ParsedModel, class: &ClassNode, field: &FieldNode) -> Result<FieldDescriptor> {
    let mut descriptor = FieldDescriptor::new(camel_case(&field.name), String::new());
    descriptor.javadoc = format_comment(field.comment.as_deref());

    if let Some(primitive) = model.primitive(&field.type_id) {
        descriptor.field_type = primitive.name.clone();
    } else if let Some(enumeration) = model.enumeration(&field.type_id) {
        descriptor.field_type = enumeration.name.clone();
        descriptor.field_values = Some(enumeration.values.join(","));
    } else {
        return Err(EntityError::UnresolvedFieldType {
            class: class.name.clone(),
            field: field.name.clone(),
            type_id: field.type_id.clone(),
        });
    }

    if let Some(content) = blob_content(&descriptor.field_type) {
        descriptor.field_type = BINARY_TYPE.to_string();
        descriptor.field_type_blob_content = Some(content);
    }

    attach_validations(model, field, &mut descriptor)?;
    Ok(descriptor)
}

fn attach_validations(model: &ParsedModel, field: &FieldNode, descriptor: &mut FieldDescriptor) -> Result<()> {
    if field.validations.is_empty() {
        return Ok(());
    }

    let mut rules = Vec::with_capacity(field.validations.len());
    let mut values = BTreeMap::new();

    for validation_id in &field.validations {
        let validation = model.validation(validation_id).ok_or_else(|| EntityError::UnknownReference {
            kind: "validation",
            id: validation_id.clone(),
            owner: field.name.clone(),
        })?;

        rules.push(validation.name.clone());
        if validation.name == REQUIRED_RULE {
            continue;
        }
        if let Some(value) = &validation.value {
            values.insert(rule_value_key(&validation.name), value.clone());
        }
    }

    descriptor.field_validate_rules = Some(rules);
    descriptor.rule_values = values;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnumNode, TypeNode, ValidationNode};
    use serde_json::json;

    fn model() -> ParsedModel {
        let mut model = ParsedModel::default();
        for name in ["String", "Integer", "Blob", "AnyBlob", "ImageBlob", "TextBlob"] {
            model.types.insert(name.to_string(), TypeNode { name: name.to_string() });
        }
        model.enums.insert(
            "Status".to_string(),
            EnumNode {
                name: "Status".to_string(),
                values: vec!["ACTIVE".to_string(), "CLOSED".to_string()],
                comment: None,
            },
        );
        model.validations.insert(
            "v_required".to_string(),
            ValidationNode { name: "required".to_string(), value: None },
        );
        model.validations.insert(
            "v_max".to_string(),
            ValidationNode { name: "maxlength".to_string(), value: Some(json!(140)) },
        );
        model.validations.insert(
            "v_pattern".to_string(),
            ValidationNode { name: "pattern".to_string(), value: Some(json!("^[A-Z]+$")) },
        );
        model
    }

    fn class() -> ClassNode {
        ClassNode::new("c1", "Ticket")
    }

    #[test]
    fn test_enumerated_field() {
        let model = model();
        let field = FieldNode::new("f1", "status", "Status");
        let descriptor = materialize_field(&model, &class(), &field).unwrap();

        assert_eq!(descriptor.field_type, "Status");
        assert_eq!(descriptor.field_values.as_deref(), Some("ACTIVE,CLOSED"));
        assert!(descriptor.field_validate_rules.is_none());
    }

    #[test]
    fn test_blob_types_collapse_to_binary() {
        let model = model();
        let cases = [
            ("Blob", BlobContent::Any),
            ("AnyBlob", BlobContent::Any),
            ("ImageBlob", BlobContent::Image),
            ("TextBlob", BlobContent::Text),
        ];
        for (type_name, content) in cases {
            let field = FieldNode::new("f", "attachment", type_name);
            let descriptor = materialize_field(&model, &class(), &field).unwrap();
            assert_eq!(descriptor.field_type, BINARY_TYPE);
            assert_eq!(descriptor.field_type_blob_content, Some(content));
        }
    }

    #[test]
    fn test_validations_keep_order_and_parameters() {
        let model = model();
        let mut field = FieldNode::new("f1", "Short Code", "String");
        field.validations = vec!["v_required".into(), "v_max".into(), "v_pattern".into()];

        let descriptor = materialize_field(&model, &class(), &field).unwrap();
        assert_eq!(descriptor.field_name, "shortCode");
        assert_eq!(
            descriptor.field_validate_rules,
            Some(vec!["required".to_string(), "maxlength".to_string(), "pattern".to_string()])
        );
        assert_eq!(descriptor.rule_value("maxlength"), Some(&json!(140)));
        assert_eq!(descriptor.rule_value("pattern"), Some(&json!("^[A-Z]+$")));
        assert!(descriptor.rule_value("required").is_none());
        assert_eq!(descriptor.rule_values.len(), 2);
    }

    #[test]
    fn test_unresolved_type_is_an_error() {
        let model = model();
        let field = FieldNode::new("f1", "price", "Money");
        let err = materialize_field(&model, &class(), &field).unwrap_err();
        assert!(matches!(err, EntityError::UnresolvedFieldType { ref type_id, .. } if type_id == "Money"));
    }

    #[test]
    fn test_missing_field_node_is_an_error() {
        let model = model();
        let class = class().with_fields(["ghost"]);
        let err = materialize_fields(&model, &class).unwrap_err();
        assert!(matches!(err, EntityError::UnknownReference { kind: "field", .. }));
    }

    #[test]
    fn test_format_comment() {
        assert_eq!(format_comment(Some("  The ticket  ")), Some("The ticket".to_string()));
        assert_eq!(format_comment(Some("   ")), None);
        assert_eq!(format_comment(None), None);
    }
}
