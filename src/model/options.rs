//! Per-entity generation options and storage families

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Data transfer object style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DtoStyle {
    #[default]
    No,
    Mapstruct,
}

/// Pagination style for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PaginationStyle {
    #[default]
    No,
    Pager,
    Pagination,
    InfiniteScroll,
}

/// Service layer style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ServiceStyle {
    #[default]
    No,
    ServiceClass,
    ServiceImpl,
}

/// Search engine backing an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    Elasticsearch,
}

/// Target storage family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    Sql,
    Mysql,
    Postgresql,
    Oracle,
    Mssql,
    Mariadb,
    H2,
    Mongodb,
    Cassandra,
    Couchbase,
}

impl DatabaseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Mysql => "mysql",
            Self::Postgresql => "postgresql",
            Self::Oracle => "oracle",
            Self::Mssql => "mssql",
            Self::Mariadb => "mariadb",
            Self::H2 => "h2",
            Self::Mongodb => "mongodb",
            Self::Cassandra => "cassandra",
            Self::Couchbase => "couchbase",
        }
    }

    /// SQL family
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Self::Sql | Self::Mysql | Self::Postgresql | Self::Oracle | Self::Mssql | Self::Mariadb | Self::H2
        )
    }

    /// Document store able to hold references between entities
    pub fn is_document_oriented(&self) -> bool {
        matches!(self, Self::Mongodb)
    }

    /// Whether entities stored here may declare relationships at all
    pub fn supports_relationships(&self) -> bool {
        self.is_relational() || self.is_document_oriented()
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.to_ascii_lowercase().as_str() {
            "sql" => Self::Sql,
            "mysql" => Self::Mysql,
            "postgresql" => Self::Postgresql,
            "oracle" => Self::Oracle,
            "mssql" => Self::Mssql,
            "mariadb" => Self::Mariadb,
            "h2" => Self::H2,
            "mongodb" => Self::Mongodb,
            "cassandra" => Self::Cassandra,
            "couchbase" => Self::Couchbase,
            other => return Err(format!("unknown database type '{}'", other)),
        };
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_support() {
        assert!(DatabaseType::Postgresql.supports_relationships());
        assert!(DatabaseType::Mongodb.supports_relationships());
        assert!(!DatabaseType::Cassandra.supports_relationships());
        assert!(!DatabaseType::Couchbase.supports_relationships());
    }

    #[test]
    fn test_parse_database_type() {
        assert_eq!("MongoDB".parse::<DatabaseType>().unwrap(), DatabaseType::Mongodb);
        assert!("redis".parse::<DatabaseType>().is_err());
    }

    #[test]
    fn test_option_serde_names() {
        assert_eq!(serde_json::to_string(&PaginationStyle::InfiniteScroll).unwrap(), "\"infinite-scroll\"");
        assert_eq!(serde_json::to_string(&ServiceStyle::ServiceImpl).unwrap(), "\"serviceImpl\"");
        assert_eq!(serde_json::to_string(&DtoStyle::Mapstruct).unwrap(), "\"mapstruct\"");
    }
}
