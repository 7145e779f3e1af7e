//! Configuration management for entity generation
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (entities.toml)
//! - Environment variables (ENTITIES__*)
//!
//! The `[options]` tables are keyed by entity name, so they are read from the
//! config files with `toml` to keep key case; environment variables don't
//! reach them.
//!
//! ## Example config file (entities.toml):
//! ```toml
//! [generation]
//! database_type = "postgresql"
//! prior_state_dir = ".jhipster"
//! output_dir = ".jhipster"
//!
//! [options]
//! fluentMethods = ["Blog", "Post"]
//! jpaMetamodelFiltering = ["Post"]
//! noUserManagement = false
//!
//! [options.listDTO]
//! Post = "mapstruct"
//!
//! [options.listPagination]
//! Post = "infinite-scroll"
//!
//! [export]
//! output_format = "pretty"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::model::{DatabaseType, DtoStyle, PaginationStyle, SearchEngine, ServiceStyle};

/// Main configuration for entity generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Per-entity option overrides
    #[serde(default)]
    pub options: EntityOptions,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Target storage family
    #[serde(default)]
    pub database_type: DatabaseType,

    /// Directory holding the entity documents of earlier runs
    #[serde(default = "default_state_dir")]
    pub prior_state_dir: PathBuf,

    /// Directory entity documents are written to
    #[serde(default = "default_state_dir")]
    pub output_dir: PathBuf,
}

/// Export configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Option overrides keyed by entity name.
///
/// An override replaces the class default only when the entity name is a
/// key (or member) exactly as written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityOptions {
    #[serde(default, rename = "listDTO")]
    pub list_dto: HashMap<String, DtoStyle>,

    #[serde(default)]
    pub list_pagination: HashMap<String, PaginationStyle>,

    #[serde(default)]
    pub list_service: HashMap<String, ServiceStyle>,

    #[serde(default)]
    pub microservice_names: HashMap<String, String>,

    #[serde(default)]
    pub search_engines: HashMap<String, SearchEngine>,

    #[serde(default)]
    pub angular_suffixes: HashMap<String, String>,

    #[serde(default)]
    pub fluent_methods: Vec<String>,

    #[serde(default)]
    pub jpa_metamodel_filtering: Vec<String>,

    #[serde(default)]
    pub no_user_management: bool,
}

impl EntityOptions {
    pub fn dto(&self, entity_name: &str) -> Option<DtoStyle> {
        self.list_dto.get(entity_name).copied()
    }

    pub fn pagination(&self, entity_name: &str) -> Option<PaginationStyle> {
        self.list_pagination.get(entity_name).copied()
    }

    pub fn service(&self, entity_name: &str) -> Option<ServiceStyle> {
        self.list_service.get(entity_name).copied()
    }

    pub fn microservice_name(&self, entity_name: &str) -> Option<&str> {
        self.microservice_names.get(entity_name).map(String::as_str)
    }

    pub fn search_engine(&self, entity_name: &str) -> Option<SearchEngine> {
        self.search_engines.get(entity_name).copied()
    }

    pub fn angular_suffix(&self, entity_name: &str) -> Option<&str> {
        self.angular_suffixes.get(entity_name).map(String::as_str)
    }

    pub fn has_fluent_methods(&self, entity_name: &str) -> bool {
        self.fluent_methods.iter().any(|name| name == entity_name)
    }

    pub fn has_jpa_metamodel_filtering(&self, entity_name: &str) -> bool {
        self.jpa_metamodel_filtering.iter().any(|name| name == entity_name)
    }
}

// Default value functions
fn default_state_dir() -> PathBuf {
    PathBuf::from(".jhipster")
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            database_type: DatabaseType::default(),
            prior_state_dir: default_state_dir(),
            output_dir: default_state_dir(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from default locations, then from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        let mut option_files = Vec::new();

        // Load from default locations
        let config_locations = ["entities.toml", ".entities.toml", "config/entities.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
            option_files.push(PathBuf::from(location));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "model", "entities") {
            let xdg_config = config_dir.config_dir().join("entities.toml");
            if xdg_config.exists() {
                option_files.push(xdg_config.clone());
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
            let explicit = PathBuf::from(path);
            if explicit.is_file() {
                option_files.push(explicit);
            } else {
                option_files.push(PathBuf::from(format!("{}.toml", path)));
            }
        }

        // Load from environment variables (ENTITIES__*)
        builder = builder.add_source(
            Environment::with_prefix("ENTITIES")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut loaded: Self = config.try_deserialize()?;
        loaded.options = load_options(&option_files)?;
        Ok(loaded)
    }

    /// Parse a TOML document directly
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Get the prior state directory (resolves relative paths)
    pub fn prior_state_dir(&self) -> PathBuf {
        resolve(&self.generation.prior_state_dir)
    }

    /// Get the output directory (resolves relative paths)
    pub fn output_dir(&self) -> PathBuf {
        resolve(&self.generation.output_dir)
    }
}

/// `[options]` of every existing file, later files overriding earlier keys
fn load_options(files: &[PathBuf]) -> Result<EntityOptions, ConfigError> {
    let mut merged = toml::Table::new();
    for path in files.iter().filter(|p| p.is_file()) {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Message(format!("{}: {}", path.display(), e)))?;
        let mut document: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| ConfigError::Message(format!("{}: {}", path.display(), e)))?;
        if let Some(toml::Value::Table(options)) = document.remove("options") {
            merge_tables(&mut merged, options);
        }
    }
    toml::Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::Message(format!("options: {}", e)))
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => merge_tables(existing, incoming),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    }
}
