//! Origin-side resolution
//!
//! Builds the descriptor an association contributes to the class it starts
//! from. A one-to-many without a destination field also synthesizes the
//! many-to-one inverse on the destination, and the association is returned
//! rewritten as many-to-one.

use super::normalize::endpoints;
use super::Placement;
use crate::diagnostics::Diagnostics;
use crate::entity::{RelationshipDescriptor, RelationshipRule};
use crate::error::Result;
use crate::model::{AssociationNode, Cardinality, ClassNode, ParsedModel};
use crate::naming::{camel_case, entity_name, lower_first, FieldReference};

/// Outcome of resolving one association from its origin
#[derive(Debug, Clone)]
pub struct SourceResolution {
    /// The association with its effective cardinality
    pub association: AssociationNode,
    /// Descriptors produced, in placement order
    pub placements: Vec<Placement>,
}

/// Resolve a normalized association from its origin class.
pub fn resolve_source(
    model: &ParsedModel,
    association: &AssociationNode,
    diagnostics: &mut Diagnostics,
) -> Result<SourceResolution> {
    let (from, to) = endpoints(model, association)?;
    let mut resolved = association.clone();
    let mut placements = Vec::with_capacity(2);

    let relationship = match association.cardinality {
        Cardinality::OneToOne => Some(one_to_one(association, from, to)),
        Cardinality::OneToMany => {
            let relationship = one_to_many(association, from, to);
            if !association.has_to_field() {
                let inverse = synthesized_inverse(association, from);
                diagnostics.synthesized_inverse(&from.name, &to.name, &inverse.relationship_name);
                placements.push(Placement::new(&to.id, inverse));
                resolved.cardinality = Cardinality::ManyToOne;
            }
            Some(relationship)
        }
        Cardinality::ManyToOne if association.has_from_field() => Some(many_to_one(association, to)),
        Cardinality::ManyToOne => None,
        Cardinality::ManyToMany => Some(many_to_many(association, to)),
    };

    if let Some(mut relationship) = relationship {
        if association.is_injected_field_in_from_required {
            relationship.relationship_validate_rules = Some(RelationshipRule::Required);
        }
        placements.push(Placement::new(&from.id, relationship));
    } else {
        tracing::debug!(
            from = %from.name,
            to = %to.name,
            "many-to-one without origin field left to the destination pass"
        );
    }

    Ok(SourceResolution {
        association: resolved,
        placements,
    })
}

fn one_to_one(association: &AssociationNode, from: &ClassNode, to: &ClassNode) -> RelationshipDescriptor {
    let reference = FieldReference::parse(association.injected_field_in_from.as_deref());
    let inverse = FieldReference::parse(association.injected_field_in_to.as_deref());

    let mut relationship = RelationshipDescriptor::new(
        Cardinality::OneToOne,
        camel_case(&reference.relationship_name),
        entity_name(&to.name),
    );
    relationship.other_entity_field = Some(lower_first(&reference.other_entity_field));
    relationship.owner_side = Some(true);
    relationship.other_entity_relationship_name = Some(lower_first(inverse.name_or(&from.name)));
    relationship
}

fn one_to_many(association: &AssociationNode, from: &ClassNode, to: &ClassNode) -> RelationshipDescriptor {
    let reference = FieldReference::parse(association.injected_field_in_from.as_deref());
    let inverse = FieldReference::parse(association.injected_field_in_to.as_deref());

    let mut relationship = RelationshipDescriptor::new(
        Cardinality::OneToMany,
        entity_name(reference.name_or(&to.name)),
        entity_name(&to.name),
    );
    relationship.other_entity_relationship_name = Some(lower_first(inverse.name_or(&from.name)));
    relationship
}

/// Many-to-one placed on the destination of a unidirectional one-to-many
fn synthesized_inverse(association: &AssociationNode, from: &ClassNode) -> RelationshipDescriptor {
    let inverse = FieldReference::parse(association.injected_field_in_to.as_deref());

    let mut relationship = RelationshipDescriptor::new(
        Cardinality::ManyToOne,
        camel_case(&lower_first(&from.name)),
        entity_name(&from.name),
    );
    relationship.other_entity_field = Some(lower_first(&inverse.other_entity_field));
    relationship
}

fn many_to_one(association: &AssociationNode, to: &ClassNode) -> RelationshipDescriptor {
    let reference = FieldReference::parse(association.injected_field_in_from.as_deref());

    let mut relationship = RelationshipDescriptor::new(
        Cardinality::ManyToOne,
        camel_case(&reference.relationship_name),
        entity_name(&to.name),
    );
    relationship.other_entity_field = Some(lower_first(&reference.other_entity_field));
    relationship
}

fn many_to_many(association: &AssociationNode, to: &ClassNode) -> RelationshipDescriptor {
    let reference = FieldReference::parse(association.injected_field_in_from.as_deref());
    let inverse = FieldReference::parse(association.injected_field_in_to.as_deref());

    let mut relationship = RelationshipDescriptor::new(
        Cardinality::ManyToMany,
        camel_case(&reference.relationship_name),
        entity_name(&to.name),
    );
    relationship.other_entity_field = Some(lower_first(&reference.other_entity_field));
    relationship.owner_side = Some(true);
    if !inverse.relationship_name.is_empty() {
        relationship.other_entity_relationship_name = Some(lower_first(&inverse.relationship_name));
    }
    relationship
}
