//! Application state: the per-session mutable container a form binds to

mod answers;

pub use answers::{get_path, is_valid_path, set_path};

use crate::provider::ProviderResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Workflow state tag for a freshly created application.
pub const STATE_DRAFT: &str = "draft";

/// One user's in-progress interaction with a form.
///
/// Owned by the host: the engine reads it and proposes mutations but never
/// persists it. Answers are keyed by field path; external data is keyed by
/// provider id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    /// Current workflow state tag. Terminal states are a host concern.
    pub state: String,
    /// Applicant identity (opaque to the engine).
    pub applicant: String,
    /// The answers document. Arbitrarily nested, array-valued paths allowed.
    pub answers: Map<String, Value>,
    /// Fetched external data, merged in by provider id.
    pub external_data: HashMap<String, ProviderResult>,
    /// Monotonic fence for in-flight provider fetches; see
    /// [`invalidate_pending_fetches`](Self::invalidate_pending_fetches).
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Application {
    /// Create a fresh draft application for `applicant`.
    pub fn new(applicant: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            state: STATE_DRAFT.to_string(),
            applicant: applicant.into(),
            answers: Map::new(),
            external_data: HashMap::new(),
            revision: 0,
            created_at: now,
            modified_at: now,
        }
    }

    /// Read the answer at `path`, if any.
    pub fn answer(&self, path: &str) -> Option<&Value> {
        answers::get_path(&self.answers, path)
    }

    /// Write the answer at `path`, creating intermediate containers.
    pub fn set_answer(&mut self, path: &str, value: Value) {
        answers::set_path(&mut self.answers, path, value);
        self.modified_at = Utc::now();
    }

    /// Invalidate all in-flight provider fetches for this instance.
    ///
    /// Tickets issued before this call no longer match and their late
    /// results are discarded on merge.
    pub fn invalidate_pending_fetches(&mut self) {
        self.revision += 1;
    }
}
