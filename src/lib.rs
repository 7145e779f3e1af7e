//! Model Entities
//!
//! Resolves a parsed domain model (classes, typed fields, enumerations,
//! validations and directional associations) into entity descriptors ready
//! for code generation.
//!
//! ## Features
//!
//! - **Bidirectional Relationships**: every association yields the descriptor of
//!   its origin and, when declared or synthesized, of its destination
//! - **Corrected, Not Rejected**: illegal required flags are cleared and reported
//!   as diagnostics
//! - **Stable Identity**: changelog dates are reused from earlier runs
//! - **Per-Entity Options**: DTO, pagination, service and friends from override tables
//!
//! ## Usage
//!
//! ```no_run
//! use model_entities::{DatabaseType, EntityRequest, ParsedModel, PriorEntities};
//!
//! let model = ParsedModel::from_path("model.json")?;
//! let prior = PriorEntities::from_directory(".jhipster")?;
//! let output = EntityRequest::new()
//!     .model(&model)
//!     .database_type(DatabaseType::Postgresql)
//!     .prior_state(&prior)
//!     .create()?;
//!
//! for entry in &output.entities {
//!     println!("{}: {} relationship(s)", entry.class_name, entry.descriptor.relationships.len());
//! }
//! # Ok::<(), model_entities::EntityError>(())
//! ```

pub mod assembler;
pub mod associations;
pub mod config;
pub mod diagnostics;
pub mod entity;
pub mod error;
pub mod export;
pub mod fields;
pub mod model;
pub mod naming;
pub mod policy;
pub mod prior;

pub use assembler::{create_entities, EntityOutput, EntityRequest, ResolutionContext};
pub use associations::{resolve_associations, AssociationResolution, Placement};
pub use config::{EntityOptions, GeneratorConfig, OutputFormat};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics, Severity};
pub use entity::{
    BlobContent, ChangelogDate, EntityDescriptor, EntityMap, FieldDescriptor, RelationshipDescriptor,
    RelationshipRule,
};
pub use error::{EntityError, Result};
pub use model::{AssociationNode, Cardinality, ClassNode, DatabaseType, ParsedModel};
pub use naming::{to_field_reference, FieldReference};
pub use prior::{PriorEntities, PriorState};
