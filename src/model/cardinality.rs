//! Association cardinalities

use serde::{Deserialize, Serialize};
use std::fmt;

/// How many instances of each side of an association may relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }

    /// Whether the origin ("from") side holds many instances.
    pub fn is_many_on_from(&self) -> bool {
        matches!(self, Self::ManyToOne | Self::ManyToMany)
    }

    /// Whether the destination ("to") side holds many instances.
    pub fn is_many_on_to(&self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
