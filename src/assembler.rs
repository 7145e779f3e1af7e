//! Entity Assembly
//!
//! Entry point of the crate. Builds one descriptor per class in declaration
//! order, then runs association resolution and applies its placements.
//!
//! ```text
//! storage guard -> reserved user marking
//!               -> base entities (dates, options, fields)
//!               -> association resolution -> placements applied
//!               -> suppressed entities removed
//! ```
//!
//! All working state lives in a [`ResolutionContext`] created per call.

use chrono::{DateTime, Utc};

use crate::associations::resolve_associations;
use crate::config::EntityOptions;
use crate::diagnostics::Diagnostics;
use crate::entity::changelog::fresh_base;
use crate::entity::{ChangelogDate, EntityDescriptor, EntityMap};
use crate::error::{EntityError, Result};
use crate::fields::{format_comment, materialize_fields};
use crate::model::{AssociationNode, ClassId, ClassNode, DatabaseType, ParsedModel};
use crate::naming::snake_case;
use crate::policy::{check_storage, suppressed_classes};
use crate::prior::PriorState;

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct EntityOutput {
    /// Entities by class id, in declaration order
    pub entities: EntityMap,
    /// Associations with their effective cardinality
    pub associations: Vec<AssociationNode>,
    pub diagnostics: Diagnostics,
}

/// Request-scoped state of one run
pub struct ResolutionContext<'a> {
    pub model: &'a ParsedModel,
    pub database: DatabaseType,
    pub options: &'a EntityOptions,
    pub prior: &'a dyn PriorState,
    pub now: DateTime<Utc>,
    pub diagnostics: Diagnostics,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(
        model: &'a ParsedModel,
        database: DatabaseType,
        options: &'a EntityOptions,
        prior: &'a dyn PriorState,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            model,
            database,
            options,
            prior,
            now,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Run every phase and hand back the output.
    pub fn resolve(mut self) -> Result<EntityOutput> {
        check_storage(self.database, self.model)?;

        let suppressed = suppressed_classes(self.model, self.options.no_user_management, &mut self.diagnostics);
        let mut entities = self.initialize_entities(&suppressed)?;

        let resolution = resolve_associations(self.model, &mut self.diagnostics)?;
        for placement in resolution.placements {
            if let Some(entity) = entities.get_mut(&placement.entity) {
                entity.relationships.push(placement.relationship);
            }
        }

        for class_id in &suppressed {
            if let Some(removed) = entities.remove(class_id) {
                tracing::debug!(class = %removed.class_name, "suppressed reserved entity");
            }
        }

        tracing::info!(
            entities = entities.len(),
            associations = resolution.associations.len(),
            warnings = self.diagnostics.warning_count(),
            "entities resolved"
        );

        Ok(EntityOutput {
            entities,
            associations: resolution.associations,
            diagnostics: self.diagnostics,
        })
    }

    /// Suppressed classes get a field-less descriptor; they are dropped later.
    fn initialize_entities(&self, suppressed: &[ClassId]) -> Result<EntityMap> {
        let latest = self.prior.latest();
        let base = fresh_base(self.now, latest.as_ref());

        let mut entities = EntityMap::new();
        for (index, class) in self.model.classes.iter().enumerate() {
            let changelog_date = match self.prior.changelog_date(&class.name) {
                Some(date) => date,
                None => ChangelogDate::with_increment(base, index),
            };
            let mut descriptor = base_descriptor(class, changelog_date);
            apply_options(&mut descriptor, &class.name, self.options);
            if !suppressed.contains(&class.id) {
                descriptor.fields = materialize_fields(self.model, class)?;
            }

            tracing::debug!(
                class = %class.name,
                fields = descriptor.fields.len(),
                changelog_date = %descriptor.changelog_date,
                "entity initialized"
            );
            entities.insert(&class.id, &class.name, descriptor);
        }
        Ok(entities)
    }
}

fn base_descriptor(class: &ClassNode, changelog_date: ChangelogDate) -> EntityDescriptor {
    EntityDescriptor {
        fluent_methods: false,
        relationships: Vec::new(),
        fields: Vec::new(),
        changelog_date,
        dto: class.dto,
        pagination: class.pagination,
        service: class.service,
        microservice_name: class.microservice_name.clone(),
        search_engine: class.search_engine,
        javadoc: format_comment(class.comment.as_deref()),
        entity_table_name: snake_case(class.table_name_hint()),
        jpa_metamodel_filtering: false,
        angular_js_suffix: None,
    }
}

/// Override class defaults with the entries listed for `entity_name`.
pub fn apply_options(descriptor: &mut EntityDescriptor, entity_name: &str, options: &EntityOptions) {
    if let Some(dto) = options.dto(entity_name) {
        descriptor.dto = dto;
    }
    if let Some(pagination) = options.pagination(entity_name) {
        descriptor.pagination = pagination;
    }
    if let Some(service) = options.service(entity_name) {
        descriptor.service = service;
    }
    if let Some(name) = options.microservice_name(entity_name) {
        descriptor.microservice_name = Some(name.to_string());
    }
    if let Some(engine) = options.search_engine(entity_name) {
        descriptor.search_engine = Some(engine);
    }
    if let Some(suffix) = options.angular_suffix(entity_name) {
        descriptor.angular_js_suffix = Some(suffix.to_string());
    }
    descriptor.fluent_methods = options.has_fluent_methods(entity_name);
    descriptor.jpa_metamodel_filtering = options.has_jpa_metamodel_filtering(entity_name);
}

/// Builder for a run
///
/// The parsed model and the storage family are mandatory; options default to
/// empty tables, prior state to none and the clock to the current time.
#[derive(Default)]
pub struct EntityRequest<'a> {
    model: Option<&'a ParsedModel>,
    database_type: Option<DatabaseType>,
    options: EntityOptions,
    prior: Option<&'a dyn PriorState>,
    now: Option<DateTime<Utc>>,
}

impl<'a> EntityRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: &'a ParsedModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn database_type(mut self, database: DatabaseType) -> Self {
        self.database_type = Some(database);
        self
    }

    pub fn options(mut self, options: EntityOptions) -> Self {
        self.options = options;
        self
    }

    pub fn prior_state(mut self, prior: &'a dyn PriorState) -> Self {
        self.prior = Some(prior);
        self
    }

    /// Pin the clock used for fresh changelog dates
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Resolve every entity of the model.
    pub fn create(self) -> Result<EntityOutput> {
        let model = self.model.ok_or(EntityError::MissingInput { what: "parsed model" })?;
        let database = self
            .database_type
            .ok_or(EntityError::MissingInput { what: "database type" })?;
        let prior: &dyn PriorState = match self.prior {
            Some(prior) => prior,
            None => &(),
        };
        let now = self.now.unwrap_or_else(Utc::now);

        tracing::debug!(
            classes = model.classes.len(),
            associations = model.associations.len(),
            database = %database,
            "creating entities"
        );

        ResolutionContext::new(model, database, &self.options, prior, now).resolve()
    }
}

/// Shorthand for a fully specified [`EntityRequest`]
pub fn create_entities(
    model: &ParsedModel,
    database: DatabaseType,
    options: EntityOptions,
    prior: &dyn PriorState,
) -> Result<EntityOutput> {
    EntityRequest::new()
        .model(model)
        .database_type(database)
        .options(options)
        .prior_state(prior)
        .create()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DtoStyle, FieldNode, PaginationStyle, SearchEngine, ServiceStyle, TypeNode};
    use crate::prior::PriorEntities;
    use chrono::TimeZone;

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap()
    }

    fn model() -> ParsedModel {
        let mut model = ParsedModel::default();
        model.types.insert("String".to_string(), TypeNode { name: "String".to_string() });
        model.fields.insert(
            "f1".to_string(),
            FieldNode::new("f1", "title", "String"),
        );
        let mut blog = ClassNode::new("b1", "BlogEntry").with_fields(["f1"]);
        blog.comment = Some("  A blog entry ".to_string());
        model.classes = vec![blog, ClassNode::new("t1", "Tag")];
        model
    }

    #[test]
    fn test_missing_inputs() {
        let err = EntityRequest::new().database_type(DatabaseType::Sql).create().unwrap_err();
        assert!(matches!(err, EntityError::MissingInput { what: "parsed model" }));

        let model = model();
        let err = EntityRequest::new().model(&model).create().unwrap_err();
        assert!(matches!(err, EntityError::MissingInput { what: "database type" }));
    }

    #[test]
    fn test_base_descriptor() {
        let model = model();
        let output = EntityRequest::new()
            .model(&model)
            .database_type(DatabaseType::Postgresql)
            .now(clock())
            .create()
            .unwrap();

        let blog = output.entities.get("b1").unwrap();
        assert_eq!(blog.entity_table_name, "blog_entry");
        assert_eq!(blog.javadoc.as_deref(), Some("A blog entry"));
        assert_eq!(blog.fields.len(), 1);
        assert_eq!(blog.changelog_date.as_str(), "20260301100000");
        assert_eq!(output.entities.get("t1").unwrap().changelog_date.as_str(), "20260301100001");
    }

    #[test]
    fn test_options_override_only_listed_entities() {
        let model = model();
        let mut options = EntityOptions::default();
        options.list_dto.insert("BlogEntry".to_string(), DtoStyle::Mapstruct);
        options.list_pagination.insert("Tag".to_string(), PaginationStyle::Pager);
        options.list_service.insert("Tag".to_string(), ServiceStyle::ServiceImpl);
        options.microservice_names.insert("BlogEntry".to_string(), "blogapp".to_string());
        options.search_engines.insert("Tag".to_string(), SearchEngine::Elasticsearch);
        options.angular_suffixes.insert("BlogEntry".to_string(), "blog".to_string());
        options.fluent_methods.push("Tag".to_string());
        options.jpa_metamodel_filtering.push("BlogEntry".to_string());

        let output = EntityRequest::new()
            .model(&model)
            .database_type(DatabaseType::Sql)
            .options(options)
            .now(clock())
            .create()
            .unwrap();

        let blog = output.entities.get("b1").unwrap();
        assert_eq!(blog.dto, DtoStyle::Mapstruct);
        assert_eq!(blog.pagination, PaginationStyle::No);
        assert_eq!(blog.service, ServiceStyle::No);
        assert_eq!(blog.microservice_name.as_deref(), Some("blogapp"));
        assert_eq!(blog.search_engine, None);
        assert_eq!(blog.angular_js_suffix.as_deref(), Some("blog"));
        assert!(!blog.fluent_methods);
        assert!(blog.jpa_metamodel_filtering);

        let tag = output.entities.get("t1").unwrap();
        assert_eq!(tag.dto, DtoStyle::No);
        assert_eq!(tag.pagination, PaginationStyle::Pager);
        assert_eq!(tag.service, ServiceStyle::ServiceImpl);
        assert_eq!(tag.microservice_name, None);
        assert_eq!(tag.search_engine, Some(SearchEngine::Elasticsearch));
        assert_eq!(tag.angular_js_suffix, None);
        assert!(tag.fluent_methods);
        assert!(!tag.jpa_metamodel_filtering);
    }

    #[test]
    fn test_options_keyed_by_other_case_are_ignored() {
        let model = model();
        let mut options = EntityOptions::default();
        options.list_dto.insert("blogentry".to_string(), DtoStyle::Mapstruct);
        options.fluent_methods.push("BLOGENTRY".to_string());

        let output = EntityRequest::new()
            .model(&model)
            .database_type(DatabaseType::Sql)
            .options(options)
            .now(clock())
            .create()
            .unwrap();

        let blog = output.entities.get("b1").unwrap();
        assert_eq!(blog.dto, DtoStyle::No);
        assert!(!blog.fluent_methods);
    }

    #[test]
    fn test_suppressed_user_fields_are_not_materialized() {
        let mut model = model();
        model.fields.insert("f2".to_string(), FieldNode::new("f2", "avatar", "Unknown"));
        model.classes.push(ClassNode::new("u1", "User").with_fields(["f2"]));

        let output = EntityRequest::new()
            .model(&model)
            .database_type(DatabaseType::Sql)
            .now(clock())
            .create()
            .unwrap();
        assert!(output.entities.get("u1").is_none());
        assert_eq!(output.entities.len(), 2);

        let mut options = EntityOptions::default();
        options.no_user_management = true;
        let err = EntityRequest::new()
            .model(&model)
            .database_type(DatabaseType::Sql)
            .options(options)
            .now(clock())
            .create()
            .unwrap_err();
        match err {
            EntityError::UnresolvedFieldType { class, field, .. } => {
                assert_eq!(class, "User");
                assert_eq!(field, "avatar");
            }
            other => panic!("Expected UnresolvedFieldType, got {:?}", other),
        }
    }

    #[test]
    fn test_prior_dates_are_reused() {
        let model = model();
        let mut prior = PriorEntities::new();
        prior.insert("BlogEntry", "20240101000000");

        let output = create_entities(&model, DatabaseType::Sql, EntityOptions::default(), &prior).unwrap();

        assert_eq!(output.entities.get("b1").unwrap().changelog_date.as_str(), "20240101000000");
        assert!(output.entities.get("t1").unwrap().changelog_date.as_str() > "20240101000000");
    }
}
