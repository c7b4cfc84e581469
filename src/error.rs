//! Error taxonomy: definition-time failures and attributed resolution failures

use thiserror::Error;

/// Errors raised while building field descriptors or composing a form tree.
///
/// These are fatal to form registration and are surfaced to the form author,
/// never to an end user.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// An answer-bearing field was built without an id.
    #[error("field id must not be empty")]
    EmptyFieldId,

    /// The field id cannot be used as an answer path.
    #[error("field id `{id}` is not a valid answer path")]
    InvalidFieldId { id: String },

    /// A kind-specific required attribute was not provided.
    #[error("field `{field_id}` is missing required attribute `{attribute}`")]
    MissingAttribute {
        field_id: String,
        attribute: &'static str,
    },

    /// Two fields in the same form share an answer path.
    #[error("duplicate field id `{field_id}` in form `{form_id}`")]
    DuplicateFieldId { form_id: String, field_id: String },

    /// Two sibling nodes share an id within their parent.
    #[error("duplicate id `{child_id}` among children of `{parent_id}`")]
    DuplicateSiblingId { parent_id: String, child_id: String },

    /// Two data providers in the same form share an id.
    #[error("duplicate data provider id `{provider_id}` in form `{form_id}`")]
    DuplicateProviderId { form_id: String, provider_id: String },

    /// A data provider was built without an id.
    #[error("data provider id must not be empty")]
    EmptyProviderId,

    /// Repeater row bounds are contradictory.
    #[error("repeater `{field_id}`: min_rows {min_rows} exceeds max_rows {max_rows}")]
    InvalidRowBounds {
        field_id: String,
        min_rows: usize,
        max_rows: usize,
    },
}

/// A dynamic-attribute resolver failed at runtime.
///
/// Always attributed to the field and attribute that produced it. The host
/// decides whether to block the current navigation step or degrade.
#[derive(Debug, Error)]
#[error("failed to resolve `{attribute}` of field `{field_id}`")]
pub struct ResolveError {
    pub field_id: String,
    pub attribute: &'static str,
    #[source]
    pub source: anyhow::Error,
}

impl ResolveError {
    pub fn new(
        field_id: impl Into<String>,
        attribute: &'static str,
        source: anyhow::Error,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            attribute,
            source,
        }
    }
}
