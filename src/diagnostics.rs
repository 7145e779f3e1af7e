//! Diagnostics
//!
//! Collects the irregularities corrected during entity resolution.
//! Nothing recorded here aborts a run; fatal problems are `EntityError`s.
//! Every item is also emitted through `tracing` when it is recorded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Cardinality;

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing corrections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// Required flag on the many side of a one-to-many was cleared
    RequiredManySideOneToMany,
    /// Required flag on the many side of a many-to-one was cleared
    RequiredManySideManyToOne,
    /// Required flags of a many-to-many were cleared
    RequiredManyToMany,
    /// A class named `User` was suppressed in favour of the built-in one
    ReservedUserEntity,
    /// A many-to-one was synthesized for a unidirectional one-to-many
    SynthesizedInverse,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredManySideOneToMany => "W001",
            Self::RequiredManySideManyToOne => "W002",
            Self::RequiredManyToMany => "W003",
            Self::ReservedUserEntity => "W004",
            Self::SynthesizedInverse => "I001",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::RequiredManySideOneToMany
            | Self::RequiredManySideManyToOne
            | Self::RequiredManyToMany
            | Self::ReservedUserEntity => Severity::Warning,

            Self::SynthesizedInverse => Severity::Info,
        }
    }

    /// Code for the required-flag correction of a cardinality, if it has one
    pub fn for_required_correction(cardinality: Cardinality) -> Option<Self> {
        match cardinality {
            Cardinality::OneToMany => Some(Self::RequiredManySideOneToMany),
            Cardinality::ManyToOne => Some(Self::RequiredManySideManyToOne),
            Cardinality::ManyToMany => Some(Self::RequiredManyToMany),
            Cardinality::OneToOne => None,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

// =============================================================================
// Diagnostic Item
// =============================================================================

/// A single diagnostic item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticItem {
    /// Class or association the item is about
    pub subject: String,
    pub code: DiagnosticCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl DiagnosticItem {
    pub fn new(subject: impl Into<String>, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.code,
            self.code.severity(),
            self.message,
            self.subject
        )?;

        for ctx in &self.context {
            write!(f, "\n  - {}", ctx)?;
        }

        Ok(())
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Collection of diagnostics from one resolution run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an item and emit it to the log
    pub fn push(&mut self, item: DiagnosticItem) {
        match item.severity() {
            Severity::Warning => tracing::warn!(
                code = item.code.as_str(),
                subject = %item.subject,
                "{}",
                item.message
            ),
            Severity::Info => tracing::info!(
                code = item.code.as_str(),
                subject = %item.subject,
                "{}",
                item.message
            ),
        }
        self.items.push(item);
    }

    /// Record a cleared required flag
    pub fn required_flag_cleared(&mut self, cardinality: Cardinality, from: &str, to: &str) {
        let Some(code) = DiagnosticCode::for_required_correction(cardinality) else {
            return;
        };
        let message = match cardinality {
            Cardinality::ManyToMany => format!(
                "From {} to {}, a Many-to-Many exists and none of its sides can be required. Removing the required flag.",
                from, to
            ),
            Cardinality::OneToMany => format!(
                "From {} to {}, a One-to-Many exists and the Many side can't be required. Removing the required flag.",
                from, to
            ),
            _ => format!(
                "From {} to {}, a Many-to-One exists and the Many side can't be required. Removing the required flag.",
                from, to
            ),
        };
        self.push(DiagnosticItem::new(format!("{} -> {}", from, to), code, message));
    }

    /// Record the suppression of a user-defined `User` class
    pub fn reserved_user_entity(&mut self, class_name: &str) {
        self.push(DiagnosticItem::new(
            class_name,
            DiagnosticCode::ReservedUserEntity,
            "An entity called 'User' was defined: 'User' is an entity created by default. \
             All relationships toward it will be kept but all attributes and relationships \
             from it will be disregarded.",
        ));
    }

    /// Record an inverse many-to-one synthesized on the destination of a one-to-many
    pub fn synthesized_inverse(&mut self, from: &str, to: &str, relationship_name: &str) {
        self.push(
            DiagnosticItem::new(
                format!("{} -> {}", from, to),
                DiagnosticCode::SynthesizedInverse,
                format!(
                    "One-to-Many from {} to {} declares no inverse field; added Many-to-One '{}' to {}.",
                    from, to, relationship_name, to
                ),
            )
            .with_context("The association now reads many-to-one"),
        );
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Warning)
    }

    /// Items carrying a given code
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(move |i| i.code == code)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Format all diagnostics for display
    pub fn format_all(&self) -> String {
        let mut output = String::new();

        for item in &self.items {
            output.push_str(&format!("{}\n", item));
        }

        if !self.is_empty() {
            output.push_str(&format!("\n{} warning(s)\n", self.warning_count()));
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}
