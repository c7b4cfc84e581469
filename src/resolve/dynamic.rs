//! "Maybe function" configuration values
//!
//! Several field attributes accept either a literal value or a function of
//! live application state. Each is a sum type with a single resolve
//! operation so callers never inspect which form was supplied.

use crate::application::Application;
use crate::fields::Field;
use crate::resolve::context::Message;
use anyhow::Result;
use std::fmt;
use std::sync::Arc;

/// Resolver closure over the application alone.
pub type AppResolverFn<T> = Arc<dyn Fn(&Application) -> Result<T> + Send + Sync>;

/// Resolver closure over the application and the field under evaluation.
pub type FieldResolverFn<T> = Arc<dyn Fn(&Application, &Field) -> Result<T> + Send + Sync>;

/// A literal value or a resolver invoked with `(application, field)`.
///
/// Used for option lists and other attributes whose value may depend on
/// what the user has answered so far.
#[derive(Clone)]
pub enum DynValue<T> {
    Literal(T),
    Resolver(FieldResolverFn<T>),
}

impl<T> DynValue<T> {
    /// Wrap a resolver closure.
    pub fn resolver<F>(f: F) -> Self
    where
        F: Fn(&Application, &Field) -> Result<T> + Send + Sync + 'static,
    {
        Self::Resolver(Arc::new(f))
    }

    /// Resolve against current state. Literal values pass through verbatim.
    ///
    /// Repeated resolution with identical state must be idempotent; the
    /// engine does not cache.
    pub fn resolve(&self, application: &Application, field: &Field) -> Result<T>
    where
        T: Clone,
    {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Resolver(f) => f(application, field),
        }
    }
}

impl<T> From<T> for DynValue<T> {
    fn from(value: T) -> Self {
        Self::Literal(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for DynValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl<T: PartialEq> PartialEq for DynValue<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Resolver(a), Self::Resolver(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A literal flag or a resolver invoked with the application alone.
///
/// The `required` attribute takes this form: unset means "not enforced".
#[derive(Clone)]
pub enum DynFlag {
    Literal(bool),
    Resolver(AppResolverFn<bool>),
}

impl DynFlag {
    pub fn resolver<F>(f: F) -> Self
    where
        F: Fn(&Application) -> Result<bool> + Send + Sync + 'static,
    {
        Self::Resolver(Arc::new(f))
    }

    pub fn resolve(&self, application: &Application) -> Result<bool> {
        match self {
            Self::Literal(value) => Ok(*value),
            Self::Resolver(f) => f(application),
        }
    }
}

impl From<bool> for DynFlag {
    fn from(value: bool) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Debug for DynFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl PartialEq for DynFlag {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Resolver(a), Self::Resolver(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Visibility condition attached to a field, section, or subsection.
///
/// Re-evaluated whenever the answers change. A node whose condition is
/// false is excluded from rendering and validation; its stored answers are
/// not purged (purge policy is a host concern).
#[derive(Clone)]
pub enum Condition {
    Static(bool),
    Dynamic(Arc<dyn Fn(&Application) -> bool + Send + Sync>),
}

impl Condition {
    /// Wrap a predicate over the application.
    pub fn when<F>(f: F) -> Self
    where
        F: Fn(&Application) -> bool + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    pub fn evaluate(&self, application: &Application) -> bool {
        match self {
            Self::Static(value) => *value,
            Self::Dynamic(f) => f(application),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Static(a), Self::Static(b)) => a == b,
            (Self::Dynamic(a), Self::Dynamic(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Display text: a literal string, an opaque localization message, or a
/// resolver over the application.
///
/// Message descriptors are passed through to the localization collaborator
/// without interpretation.
#[derive(Clone)]
pub enum FormText {
    Static(String),
    Message(Message),
    Dynamic(AppResolverFn<String>),
}

impl FormText {
    pub fn resolver<F>(f: F) -> Self
    where
        F: Fn(&Application) -> Result<String> + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }
}

impl Default for FormText {
    fn default() -> Self {
        Self::Static(String::new())
    }
}

impl From<&str> for FormText {
    fn from(value: &str) -> Self {
        Self::Static(value.to_string())
    }
}

impl From<String> for FormText {
    fn from(value: String) -> Self {
        Self::Static(value)
    }
}

impl From<Message> for FormText {
    fn from(value: Message) -> Self {
        Self::Message(value)
    }
}

impl fmt::Debug for FormText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Message(message) => f.debug_tuple("Message").field(message).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl PartialEq for FormText {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Static(a), Self::Static(b)) => a == b,
            (Self::Message(a), Self::Message(b)) => a == b,
            (Self::Dynamic(a), Self::Dynamic(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_resolves_verbatim() {
        let value: DynValue<Vec<String>> = vec!["a".to_string()].into();
        let app = Application::new("applicant");
        let field = crate::fields::build_divider_field(Default::default());
        assert_eq!(value.resolve(&app, &field).expect("resolve"), vec!["a"]);
    }

    #[test]
    fn test_flag_resolver_sees_application() {
        let required = DynFlag::resolver(|app| {
            Ok(app.answer("age").and_then(|v| v.as_i64()).unwrap_or(0) >= 18)
        });
        let mut app = Application::new("applicant");
        app.set_answer("age", json!(17));
        assert!(!required.resolve(&app).expect("resolve"));
        app.set_answer("age", json!(18));
        assert!(required.resolve(&app).expect("resolve"));
    }

    #[test]
    fn test_condition_static_and_dynamic() {
        let app = Application::new("applicant");
        assert!(Condition::Static(true).evaluate(&app));
        assert!(!Condition::Static(false).evaluate(&app));
        let dynamic = Condition::when(|app| app.answer("age").is_some());
        assert!(!dynamic.evaluate(&app));
    }

    #[test]
    fn test_equality_is_structural_for_literals() {
        let a: DynValue<i64> = 1.into();
        let b: DynValue<i64> = 1.into();
        assert_eq!(a, b);
        assert_ne!(a, DynValue::Literal(2));
    }

    #[test]
    fn test_equality_is_identity_for_resolvers() {
        let a = DynFlag::resolver(|_| Ok(true));
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, DynFlag::resolver(|_| Ok(true)));
    }

    #[test]
    fn test_form_text_conversions() {
        assert_eq!(FormText::from("hi"), FormText::Static("hi".to_string()));
        assert_eq!(FormText::default(), FormText::Static(String::new()));
    }
}
