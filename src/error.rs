//! Errors raised while composing a screen.
//!
//! Every variant is fatal to the composition request that produced it: the
//! registry never hands back a partial controller list.

use crate::sections::SectionKind;
use thiserror::Error;

/// Failure of a single composition request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    /// The screen selector is not part of the enumeration, or the active
    /// section table has no row for it.
    #[error("invalid screen: {0}")]
    InvalidScreen(String),

    /// A collaborator required to build a section (or the bundle itself)
    /// was not provided.
    #[error("{}", missing_collaborator_message(.section, .collaborator))]
    MissingCollaborator {
        /// Section being constructed, `None` while assembling the bundle.
        section: Option<SectionKind>,
        /// Name of the absent collaborator.
        collaborator: &'static str,
    },

    /// The section table names a kind that has no registered factory.
    #[error("no factory registered for section '{0}'")]
    UnregisteredSection(SectionKind),
}

fn missing_collaborator_message(section: &Option<SectionKind>, collaborator: &str) -> String {
    match section {
        Some(kind) => format!("section '{kind}' requires missing collaborator '{collaborator}'"),
        None => format!("collaborator bundle is missing '{collaborator}'"),
    }
}

impl SectionError {
    /// Shorthand for a section that cannot be built without `collaborator`.
    pub fn missing_for(section: SectionKind, collaborator: &'static str) -> Self {
        Self::MissingCollaborator {
            section: Some(section),
            collaborator,
        }
    }
}
