//! Special-case rules applied around association resolution
//!
//! - the storage guard rejects relationships on stores that can't hold them
//! - a user-declared `User` class is suppressed unless user management is off

use crate::diagnostics::Diagnostics;
use crate::error::{EntityError, Result};
use crate::model::{ClassId, DatabaseType, ParsedModel};

/// Class name reserved for the built-in user entity
pub const RESERVED_USER_ENTITY: &str = "user";

/// Fail when the model declares associations the storage family can't express.
pub fn check_storage(database: DatabaseType, model: &ParsedModel) -> Result<()> {
    if database.supports_relationships() || !model.has_associations() {
        return Ok(());
    }
    Err(EntityError::IncompatibleStorageModel {
        database,
        associations: model.associations.len(),
    })
}

pub fn is_reserved_user(class_name: &str) -> bool {
    class_name.eq_ignore_ascii_case(RESERVED_USER_ENTITY)
}

/// Ids of the classes whose entity is dropped from the output.
///
/// Their relationships are still resolved, so descriptors pointing at them
/// from other entities survive the suppression.
pub fn suppressed_classes(model: &ParsedModel, no_user_management: bool, diagnostics: &mut Diagnostics) -> Vec<ClassId> {
    if no_user_management {
        return Vec::new();
    }
    model
        .classes
        .iter()
        .filter(|class| is_reserved_user(&class.name))
        .map(|class| {
            diagnostics.reserved_user_entity(&class.name);
            class.id.clone()
        })
        .collect()
}
