//! Attribute resolution against live application state

use crate::application::Application;
use crate::config::{EngineConfig, RequiredResolutionPolicy};
use crate::error::ResolveError;
use crate::fields::{Field, SelectOption};
use crate::form::{Form, FormLeaf, SectionChild};
use crate::resolve::context::ResolutionContext;
use crate::resolve::dynamic::{DynFlag, DynValue};

/// Resolve an option list or loader for `field`.
pub fn resolve_options(
    options: &DynValue<Vec<SelectOption>>,
    application: &Application,
    field: &Field,
) -> Result<Vec<SelectOption>, ResolveError> {
    options
        .resolve(application, field)
        .map_err(|source| ResolveError::new(field.id(), "options", source))
}

/// Resolve a field's `required` flag. `None` means the attribute is unset
/// and not enforced.
pub fn resolve_required(
    required: Option<&DynFlag>,
    application: &Application,
    field_id: &str,
) -> Result<Option<bool>, ResolveError> {
    match required {
        None => Ok(None),
        Some(flag) => flag
            .resolve(application)
            .map(Some)
            .map_err(|source| ResolveError::new(field_id, "required", source)),
    }
}

/// Resolve `required` applying the host's configured failure policy.
///
/// The engine never guesses: with [`RequiredResolutionPolicy::Block`] the
/// attributed error propagates; with
/// [`RequiredResolutionPolicy::TreatAsOptional`] resolution failure
/// degrades to "not enforced" and is logged.
pub fn resolve_required_with_policy(
    required: Option<&DynFlag>,
    application: &Application,
    field_id: &str,
    config: &EngineConfig,
) -> Result<bool, ResolveError> {
    match resolve_required(required, application, field_id) {
        Ok(value) => Ok(value.unwrap_or(false)),
        Err(error) => match config.required_resolution {
            RequiredResolutionPolicy::Block => Err(error),
            RequiredResolutionPolicy::TreatAsOptional => {
                tracing::warn!(
                    field_id = %error.field_id,
                    "treating unresolvable `required` as not enforced"
                );
                Ok(false)
            }
        },
    }
}

/// Resolve a field's title to a display string.
pub fn resolve_title(
    field: &Field,
    application: &Application,
    ctx: &ResolutionContext,
) -> Result<String, ResolveError> {
    ctx.format_text(field.title(), application, field.id(), "title")
}

/// All fields visible under current state, in document order.
///
/// A false condition on a section or subsection hides its whole subtree.
pub fn visible_fields<'a>(form: &'a Form, application: &Application) -> Vec<&'a Field> {
    let mut fields = Vec::new();
    for section in form.sections() {
        if !section.is_visible(application) {
            continue;
        }
        for child in &section.children {
            match child {
                SectionChild::Leaf(leaf) => collect_visible(leaf, application, &mut fields),
                SectionChild::SubSection(sub) => {
                    if sub.is_visible(application) {
                        for leaf in &sub.children {
                            collect_visible(leaf, application, &mut fields);
                        }
                    }
                }
            }
        }
    }
    fields
}

fn collect_visible<'a>(
    leaf: &'a FormLeaf,
    application: &Application,
    fields: &mut Vec<&'a Field>,
) {
    if let FormLeaf::Field(field) = leaf {
        if field.is_visible(application) {
            fields.push(field);
        }
    }
}

/// Answer paths subject to validation: visible, answer-bearing fields.
///
/// Condition-false fields are excluded even when an answer is already
/// stored; the stored answer itself is not purged.
pub fn required_answer_paths(form: &Form, application: &Application) -> Vec<String> {
    visible_fields(form, application)
        .into_iter()
        .filter(|field| field.requires_answer())
        .map(|field| field.id().to_string())
        .collect()
}
