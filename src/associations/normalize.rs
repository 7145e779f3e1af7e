//! Association validation and required-flag normalization

use crate::diagnostics::Diagnostics;
use crate::error::{EntityError, Result};
use crate::model::{AssociationNode, Cardinality, ClassNode, ParsedModel};

/// Origin and destination classes of an association
pub fn endpoints<'m>(model: &'m ParsedModel, association: &AssociationNode) -> Result<(&'m ClassNode, &'m ClassNode)> {
    let from = model.class(&association.from);
    let to = model.class(&association.to);

    match (from, to) {
        (Some(from), Some(to)) => Ok((from, to)),
        (None, _) => Err(invalid(
            association,
            association.from.as_str(),
            to.map_or(association.to.as_str(), |c| c.name.as_str()),
            format!("origin class '{}' does not exist", association.from),
        )),
        (Some(from), None) => Err(invalid(
            association,
            &from.name,
            &association.to,
            format!("destination class '{}' does not exist", association.to),
        )),
    }
}

fn invalid(association: &AssociationNode, from: &str, to: &str, reason: impl Into<String>) -> EntityError {
    EntityError::InvalidAssociation {
        cardinality: association.cardinality,
        from: from.to_string(),
        to: to.to_string(),
        reason: reason.into(),
    }
}

/// Check that an association is structurally sound.
///
/// The owning side of a one-to-one or many-to-many needs a relationship name,
/// and only the origin side can own those.
pub fn check_validity(model: &ParsedModel, association: &AssociationNode) -> Result<()> {
    let (from, to) = endpoints(model, association)?;

    match association.cardinality {
        Cardinality::OneToOne if !association.has_from_field() => Err(invalid(
            association,
            &from.name,
            &to.name,
            "the origin entity must declare the injected field, or the direction of the relationship must be inverted",
        )),
        Cardinality::ManyToMany if !association.has_from_field() => Err(invalid(
            association,
            &from.name,
            &to.name,
            "the origin entity must declare the injected field of the owning side",
        )),
        _ => Ok(()),
    }
}

/// Validate an association and return a copy with illegal required flags cleared.
///
/// - one-to-many: the "to" side is the many side and can't be required
/// - many-to-one: the "from" side is the many side and can't be required
/// - many-to-many: neither side can be required
/// - one-to-one: flags are kept
pub fn normalize_association(
    model: &ParsedModel,
    association: &AssociationNode,
    diagnostics: &mut Diagnostics,
) -> Result<AssociationNode> {
    check_validity(model, association)?;
    let (from, to) = endpoints(model, association)?;

    let mut normalized = association.clone();
    let cardinality = normalized.cardinality;
    let required_many_from = cardinality.is_many_on_from() && normalized.is_injected_field_in_from_required;
    let required_many_to = cardinality.is_many_on_to() && normalized.is_injected_field_in_to_required;

    if required_many_from || required_many_to {
        // a many side can never be required
        if cardinality.is_many_on_from() {
            normalized.is_injected_field_in_from_required = false;
        }
        if cardinality.is_many_on_to() {
            normalized.is_injected_field_in_to_required = false;
        }
        diagnostics.required_flag_cleared(normalized.cardinality, &from.name, &to.name);
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;

    fn model() -> ParsedModel {
        ParsedModel {
            classes: vec![ClassNode::new("a", "Author"), ClassNode::new("b", "Book")],
            ..ParsedModel::default()
        }
    }

    #[test]
    fn test_one_to_many_clears_to_side() {
        let mut diags = Diagnostics::new();
        let association = AssociationNode::new("a", "b", Cardinality::OneToMany)
            .with_to_field("author")
            .from_required()
            .to_required();

        let normalized = normalize_association(&model(), &association, &mut diags).unwrap();

        assert!(!normalized.is_injected_field_in_to_required);
        assert!(normalized.is_injected_field_in_from_required);
        assert_eq!(diags.with_code(DiagnosticCode::RequiredManySideOneToMany).count(), 1);
    }

    #[test]
    fn test_many_to_one_clears_from_side() {
        let mut diags = Diagnostics::new();
        let association = AssociationNode::new("b", "a", Cardinality::ManyToOne)
            .with_from_field("author")
            .from_required();

        let normalized = normalize_association(&model(), &association, &mut diags).unwrap();

        assert!(!normalized.is_injected_field_in_from_required);
        assert_eq!(diags.with_code(DiagnosticCode::RequiredManySideManyToOne).count(), 1);
    }

    #[test]
    fn test_many_to_many_clears_both_sides() {
        let mut diags = Diagnostics::new();
        let association = AssociationNode::new("a", "b", Cardinality::ManyToMany)
            .with_from_field("book")
            .with_to_field("author")
            .to_required();

        let normalized = normalize_association(&model(), &association, &mut diags).unwrap();

        assert!(!normalized.is_injected_field_in_from_required);
        assert!(!normalized.is_injected_field_in_to_required);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_one_side_flags_are_kept() {
        let mut diags = Diagnostics::new();
        let association = AssociationNode::new("b", "a", Cardinality::ManyToOne)
            .with_from_field("author")
            .with_to_field("books")
            .to_required();

        let normalized = normalize_association(&model(), &association, &mut diags).unwrap();

        assert!(normalized.is_injected_field_in_to_required);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_one_to_one_keeps_flags() {
        let mut diags = Diagnostics::new();
        let association = AssociationNode::new("a", "b", Cardinality::OneToOne)
            .with_from_field("book")
            .from_required()
            .to_required();

        let normalized = normalize_association(&model(), &association, &mut diags).unwrap();

        assert_eq!(normalized, association);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_unknown_destination_is_invalid() {
        let mut diags = Diagnostics::new();
        let association = AssociationNode::new("a", "ghost", Cardinality::ManyToOne).with_from_field("ghost");

        let err = normalize_association(&model(), &association, &mut diags).unwrap_err();

        match err {
            EntityError::InvalidAssociation { from, to, cardinality, .. } => {
                assert_eq!(from, "Author");
                assert_eq!(to, "ghost");
                assert_eq!(cardinality, Cardinality::ManyToOne);
            }
            other => panic!("Expected InvalidAssociation, got {:?}", other),
        }
    }

    #[test]
    fn test_one_to_one_without_owner_field_is_invalid() {
        let association = AssociationNode::new("a", "b", Cardinality::OneToOne).with_to_field("author");
        assert!(matches!(
            check_validity(&model(), &association),
            Err(EntityError::InvalidAssociation { .. })
        ));
    }

    #[test]
    fn test_many_to_many_without_inverse_is_valid() {
        let association = AssociationNode::new("a", "b", Cardinality::ManyToMany).with_from_field("book");
        assert!(check_validity(&model(), &association).is_ok());
    }
}
