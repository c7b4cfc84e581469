//! Explicit localization context for text resolution
//!
//! Locale and the message-formatting collaborator are passed in as a
//! context parameter rather than looked up from ambient state.

use crate::application::Application;
use crate::error::ResolveError;
use crate::resolve::dynamic::FormText;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// An opaque localization message descriptor.
///
/// The engine never interprets the id or arguments; the localization
/// collaborator resolves them to a display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Message {
    pub id: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub args: HashMap<String, String>,
}

impl Message {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            args: HashMap::new(),
        }
    }

    /// Attach an interpolation argument.
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }
}

/// Localization collaborator: resolves message descriptors for a locale.
pub trait MessageFormatter: Send + Sync {
    fn format(&self, message: &Message, locale: &str) -> String;
}

/// Formatter that renders the message id itself.
///
/// Stand-in when no localization collaborator is wired up (tests, headless
/// validation runs).
pub struct IdentityFormatter;

impl MessageFormatter for IdentityFormatter {
    fn format(&self, message: &Message, _locale: &str) -> String {
        message.id.clone()
    }
}

/// Context handed to text resolution: locale plus formatter.
#[derive(Clone)]
pub struct ResolutionContext {
    pub locale: String,
    pub formatter: Arc<dyn MessageFormatter>,
}

impl ResolutionContext {
    pub fn new(locale: impl Into<String>, formatter: Arc<dyn MessageFormatter>) -> Self {
        Self {
            locale: locale.into(),
            formatter,
        }
    }

    /// Resolve a [`FormText`] to a display string.
    ///
    /// Resolver failures are attributed to `field_id` and `attribute`.
    pub fn format_text(
        &self,
        text: &FormText,
        application: &Application,
        field_id: &str,
        attribute: &'static str,
    ) -> Result<String, ResolveError> {
        match text {
            FormText::Static(value) => Ok(value.clone()),
            FormText::Message(message) => Ok(self.formatter.format(message, &self.locale)),
            FormText::Dynamic(f) => {
                f(application).map_err(|source| ResolveError::new(field_id, attribute, source))
            }
        }
    }
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::new("en", Arc::new(IdentityFormatter))
    }
}
