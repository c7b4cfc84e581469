//! External data providers
//!
//! A provider descriptor names an asynchronous data source owned by the
//! host. The engine's obligations are narrow: issue a fetch ticket keyed
//! to the application instance, convert the collaborator's outcome into a
//! tagged result, and merge it under the provider id exactly once.
//! Results whose application has since been replaced are discarded.

use crate::application::Application;
use crate::error::DefinitionError;
use crate::resolve::FormText;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Descriptor for one external-data fetch shown on a form's data screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DataProviderItem {
    pub id: String,
    /// Human-readable origin of the data ("Registers Iceland", ...).
    pub source: Option<String>,
    pub title: FormText,
    pub subtitle: Option<FormText>,
}

/// Partial configuration for [`build_data_provider_item`].
#[derive(Debug, Clone, Default)]
pub struct DataProviderConfig {
    pub id: String,
    pub source: Option<String>,
    pub title: FormText,
    pub subtitle: Option<FormText>,
}

/// Build a provider descriptor. The id keys the merged result and must
/// not be empty.
pub fn build_data_provider_item(
    config: DataProviderConfig,
) -> Result<DataProviderItem, DefinitionError> {
    if config.id.is_empty() {
        return Err(DefinitionError::EmptyProviderId);
    }
    Ok(DataProviderItem {
        id: config.id,
        source: config.source,
        title: config.title,
        subtitle: config.subtitle,
    })
}

/// Outcome of one provider fetch, merged into `Application::external_data`.
///
/// Failures are data, never engine errors; consumers must check the tag
/// before using `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProviderResult {
    Success {
        date: DateTime<Utc>,
        data: Value,
    },
    #[serde(rename_all = "camelCase")]
    Failure {
        date: DateTime<Utc>,
        reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },
}

impl ProviderResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The fetched payload, if the fetch succeeded.
    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success { data, .. } => Some(data),
            Self::Failure { .. } => None,
        }
    }
}

/// Fetch collaborator supplied by the host. Errors are converted into
/// [`ProviderResult::Failure`] at merge time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn fetch(&self, item: &DataProviderItem, application: &Application) -> Result<Value>;
}

/// Fence for one fetch attempt, keyed to the application instance it was
/// issued against. Consumed on merge, so a ticket merges at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    application_id: Uuid,
    revision: u64,
    provider_id: String,
}

impl FetchTicket {
    /// Issue a ticket against the application's current identity/revision.
    pub fn issue(application: &Application, item: &DataProviderItem) -> Self {
        Self {
            application_id: application.id,
            revision: application.revision,
            provider_id: item.id.clone(),
        }
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }
}

/// What happened to a fetch result on merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Merged,
    /// The application was replaced or invalidated after the ticket was
    /// issued; the late result was dropped.
    Discarded,
}

/// Merge a fetch outcome under the ticket's provider id.
///
/// Completion order between different providers is irrelevant: each merge
/// touches only its own entry.
pub fn merge_result(
    application: &mut Application,
    ticket: FetchTicket,
    outcome: Result<Value>,
) -> MergeOutcome {
    if ticket.application_id != application.id || ticket.revision != application.revision {
        tracing::warn!(
            provider_id = %ticket.provider_id,
            "discarding stale provider result for replaced application"
        );
        return MergeOutcome::Discarded;
    }
    let result = match outcome {
        Ok(data) => ProviderResult::Success {
            date: Utc::now(),
            data,
        },
        Err(error) => ProviderResult::Failure {
            date: Utc::now(),
            reason: error.to_string(),
            status_code: None,
        },
    };
    application
        .external_data
        .insert(ticket.provider_id, result);
    application.modified_at = Utc::now();
    MergeOutcome::Merged
}

/// Fetch every provider and merge its result.
///
/// Runs cooperatively within the caller's task; hosts that want true
/// parallelism issue tickets themselves and merge as results land.
pub async fn fetch_into(
    client: &dyn ProviderClient,
    items: &[DataProviderItem],
    application: &mut Application,
) {
    for item in items {
        let ticket = FetchTicket::issue(application, item);
        let outcome = client.fetch(item, application).await;
        merge_result(application, ticket, outcome);
    }
}
