//! Narrow host state-store contract
//!
//! The host owns persistence of answers; the engine only reads values,
//! proposes writes, and inspects validation errors through this trait.

use crate::application::Application;
use serde_json::Value;

/// Minimal contract between the engine and the host's form-state store.
#[cfg_attr(test, mockall::automock)]
pub trait FormStateStore {
    /// Read the value at an answer path.
    fn get_value(&self, path: &str) -> Option<Value>;

    /// Write a value at an answer path.
    fn set_value(&mut self, path: &str, value: Value);

    /// Host-side validation error for a path, if any.
    fn error_at(&self, path: &str) -> Option<String>;
}

/// Reference implementation backed directly by an application's answers
/// document. Hosts with their own form-state mechanism supply their own.
impl FormStateStore for Application {
    fn get_value(&self, path: &str) -> Option<Value> {
        self.answer(path).cloned()
    }

    fn set_value(&mut self, path: &str, value: Value) {
        self.set_answer(path, value);
    }

    fn error_at(&self, _path: &str) -> Option<String> {
        None
    }
}
