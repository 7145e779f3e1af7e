//! Destination-side resolution
//!
//! Only reached for associations whose destination injects a field. The
//! descriptor mirrors the origin side: a one-to-many is seen as many-to-one
//! from the destination, every other cardinality keeps its type.

use super::normalize::endpoints;
use super::Placement;
use crate::entity::{RelationshipDescriptor, RelationshipRule};
use crate::error::Result;
use crate::model::{AssociationNode, Cardinality, ParsedModel};
use crate::naming::{camel_case, entity_name, lower_first, FieldReference};

/// Resolve a normalized association from its destination class.
pub fn resolve_destination(model: &ParsedModel, association: &AssociationNode) -> Result<Placement> {
    let (from, to) = endpoints(model, association)?;

    let reference = FieldReference::parse(association.injected_field_in_to.as_deref());
    let origin = FieldReference::parse(association.injected_field_in_from.as_deref());
    let other_entity_name = entity_name(&from.name);

    let mut relationship = match association.cardinality {
        Cardinality::OneToOne => {
            let mut r = RelationshipDescriptor::new(
                Cardinality::OneToOne,
                camel_case(&reference.relationship_name),
                other_entity_name,
            );
            r.owner_side = Some(false);
            r.other_entity_relationship_name = Some(lower_first(&origin.relationship_name));
            r
        }
        Cardinality::OneToMany => {
            let mut r = RelationshipDescriptor::new(
                Cardinality::ManyToOne,
                entity_name(reference.name_or(&from.name)),
                other_entity_name,
            );
            r.other_entity_field = Some(lower_first(&reference.other_entity_field));
            r
        }
        Cardinality::ManyToOne => {
            let mut r = RelationshipDescriptor::new(
                Cardinality::ManyToOne,
                camel_case(&reference.relationship_name),
                other_entity_name,
            );
            r.other_entity_field = Some(lower_first(&reference.other_entity_field));
            r
        }
        Cardinality::ManyToMany => {
            let mut r = RelationshipDescriptor::new(
                Cardinality::ManyToMany,
                camel_case(&reference.relationship_name),
                other_entity_name,
            );
            r.owner_side = Some(false);
            r.other_entity_relationship_name = Some(lower_first(&origin.relationship_name));
            r
        }
    };

    if association.is_injected_field_in_to_required {
        relationship.relationship_validate_rules = Some(RelationshipRule::Required);
    }

    tracing::trace!(
        entity = %to.name,
        relationship = %relationship.relationship_name,
        kind = %relationship.relationship_type,
        "destination side resolved"
    );

    Ok(Placement::new(&to.id, relationship))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClassNode;

    fn model() -> ParsedModel {
        ParsedModel {
            classes: vec![
                ClassNode::new("b1", "Blog"),
                ClassNode::new("p1", "Post"),
                ClassNode::new("d1", "DriverLicense"),
            ],
            ..ParsedModel::default()
        }
    }

    #[test]
    fn test_one_to_many_seen_as_many_to_one() {
        let association = AssociationNode::new("b1", "p1", Cardinality::OneToMany)
            .with_from_field("posts")
            .with_to_field("blog(name)");

        let placement = resolve_destination(&model(), &association).unwrap();

        assert_eq!(placement.entity, "p1");
        let r = &placement.relationship;
        assert_eq!(r.relationship_type, Cardinality::ManyToOne);
        assert_eq!(r.relationship_name, "blog");
        assert_eq!(r.other_entity_name, "blog");
        assert_eq!(r.other_entity_field.as_deref(), Some("name"));
        assert_eq!(r.owner_side, None);
    }

    #[test]
    fn test_one_to_one_is_never_owner() {
        let association = AssociationNode::new("d1", "b1", Cardinality::OneToOne)
            .with_from_field("blog")
            .with_to_field("license")
            .to_required();

        let placement = resolve_destination(&model(), &association).unwrap();

        let r = &placement.relationship;
        assert_eq!(r.relationship_name, "license");
        assert_eq!(r.other_entity_name, "driverLicense");
        assert_eq!(r.owner_side, Some(false));
        assert_eq!(r.other_entity_relationship_name.as_deref(), Some("blog"));
        assert!(r.is_required());
    }

    #[test]
    fn test_many_to_one_destination_keeps_type() {
        let association = AssociationNode::new("p1", "b1", Cardinality::ManyToOne)
            .with_from_field("blog")
            .with_to_field("posts(title)");

        let placement = resolve_destination(&model(), &association).unwrap();

        assert_eq!(placement.entity, "b1");
        let r = &placement.relationship;
        assert_eq!(r.relationship_type, Cardinality::ManyToOne);
        assert_eq!(r.relationship_name, "posts");
        assert_eq!(r.other_entity_field.as_deref(), Some("title"));
    }

    #[test]
    fn test_many_to_many_non_owner() {
        let association = AssociationNode::new("p1", "b1", Cardinality::ManyToMany)
            .with_from_field("blog(name)")
            .with_to_field("post");

        let placement = resolve_destination(&model(), &association).unwrap();

        let r = &placement.relationship;
        assert_eq!(r.relationship_name, "post");
        assert_eq!(r.other_entity_name, "post");
        assert_eq!(r.owner_side, Some(false));
        assert_eq!(r.other_entity_relationship_name.as_deref(), Some("blog"));
        assert_eq!(r.other_entity_field, None);
    }

    #[test]
    fn test_self_association_targets_same_entity() {
        let association = AssociationNode::new("p1", "p1", Cardinality::OneToMany)
            .with_from_field("replies")
            .with_to_field("parent");

        let placement = resolve_destination(&model(), &association).unwrap();

        assert_eq!(placement.entity, "p1");
        assert_eq!(placement.relationship.relationship_name, "parent");
        assert_eq!(placement.relationship.other_entity_name, "post");
    }
}
