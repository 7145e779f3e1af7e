//! Association Resolution
//!
//! Derives the relationship descriptors of every entity from the directional
//! associations of the model. An association is stored once but yields one
//! or two descriptors: always the origin side, plus the destination side when
//! the destination injects a field or when a unidirectional one-to-many needs
//! its many-to-one inverse synthesized.
//!
//! Resolution runs in three phases:
//! - normalize: validate each association and clear illegal required flags
//! - resolve: per class, in declaration order, the source pass then the
//!   destination pass emit [`Placement`]s
//! - apply: the caller appends placements to their target entities
//!
//! Nothing here mutates the input model. Rewritten associations come back
//! as copies in [`AssociationResolution::associations`].

pub mod destination;
pub mod normalize;
pub mod source;

pub use normalize::normalize_association;

use crate::diagnostics::Diagnostics;
use crate::entity::RelationshipDescriptor;
use crate::error::Result;
use crate::model::{AssociationNode, ClassId, ParsedModel};

/// A relationship descriptor and the entity that receives it
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub entity: ClassId,
    pub relationship: RelationshipDescriptor,
}

impl Placement {
    pub fn new(entity: impl Into<ClassId>, relationship: RelationshipDescriptor) -> Self {
        Self {
            entity: entity.into(),
            relationship,
        }
    }
}

/// Indices of the associations a class takes part in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedAssociations {
    /// Associations the class originates
    pub from: Vec<usize>,
    /// Associations ending at the class with an injected field on its side
    pub to: Vec<usize>,
}

/// Partition the associations a class originates or explicitly terminates.
///
/// Associations ending at the class without a destination field are not
/// visible here; their destination side exists only if synthesized.
pub fn related_associations(class_id: &str, associations: &[AssociationNode]) -> RelatedAssociations {
    let mut related = RelatedAssociations::default();
    for (idx, association) in associations.iter().enumerate() {
        if association.from == class_id {
            related.from.push(idx);
        }
        if association.to == class_id && association.has_to_field() {
            related.to.push(idx);
        }
    }
    related
}

/// Outcome of resolving every association of a model
#[derive(Debug, Clone, Default)]
pub struct AssociationResolution {
    /// Normalized associations, in declaration order, with effective cardinalities
    pub associations: Vec<AssociationNode>,
    /// Descriptors to append, in the order they were produced
    pub placements: Vec<Placement>,
}

/// Resolve all associations of a model.
pub fn resolve_associations(model: &ParsedModel, diagnostics: &mut Diagnostics) -> Result<AssociationResolution> {
    let normalized = model
        .associations
        .iter()
        .map(|association| normalize_association(model, association, diagnostics))
        .collect::<Result<Vec<_>>>()?;

    let mut resolved = normalized.clone();
    let mut placements = Vec::new();

    for class_id in model.class_ids() {
        let related = related_associations(class_id, &normalized);
        tracing::debug!(
            class = %class_id,
            from = related.from.len(),
            to = related.to.len(),
            "resolving associations"
        );

        for &idx in &related.from {
            let outcome = source::resolve_source(model, &normalized[idx], diagnostics)?;
            placements.extend(outcome.placements);
            resolved[idx] = outcome.association;
        }

        for &idx in &related.to {
            placements.push(destination::resolve_destination(model, &normalized[idx])?);
        }
    }

    Ok(AssociationResolution {
        associations: resolved,
        placements,
    })
}
