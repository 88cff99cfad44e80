//! Core types and value objects for the dispatch engine.
//!
//! Defines the action catalogue entries, inbound requests and execution
//! outcomes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// Enums
// =============================================================================

/// Action kinds mapping to handler implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Datagen,
    FormatMarkdown,
    CountWeekday,
    SortContacts,
    RecentLogs,
    MarkdownIndex,
    TicketSales,
    FetchApiData,
    CloneRepo,
    ScrapeWebsite,
    Transcribe,
    MarkdownToHtml,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Datagen => write!(f, "datagen"),
            ActionKind::FormatMarkdown => write!(f, "format_markdown"),
            ActionKind::CountWeekday => write!(f, "count_weekday"),
            ActionKind::SortContacts => write!(f, "sort_contacts"),
            ActionKind::RecentLogs => write!(f, "recent_logs"),
            ActionKind::MarkdownIndex => write!(f, "markdown_index"),
            ActionKind::TicketSales => write!(f, "ticket_sales"),
            ActionKind::FetchApiData => write!(f, "fetch_api_data"),
            ActionKind::CloneRepo => write!(f, "clone_repo"),
            ActionKind::ScrapeWebsite => write!(f, "scrape_website"),
            ActionKind::Transcribe => write!(f, "transcribe"),
            ActionKind::MarkdownToHtml => write!(f, "markdown_to_html"),
        }
    }
}

// =============================================================================
// Catalogue entries
// =============================================================================

/// A sandbox path an action touches, known before the handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathTarget {
    /// Name the handler uses to look the resolved path up.
    pub role: &'static str,
    /// Path relative to the sandbox root.
    pub path: &'static str,
}

impl PathTarget {
    pub const fn new(role: &'static str, path: &'static str) -> Self {
        Self { role, path }
    }
}

/// One entry of the action catalogue.
///
/// The entry's position in the registry is its priority; see
/// [`crate::registry::ActionRegistry::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionSpec {
    /// Lower-case phrase matched as a substring of the lower-cased task.
    pub trigger: &'static str,
    pub kind: ActionKind,
    pub required_params: &'static [&'static str],
    pub targets: &'static [PathTarget],
}

// =============================================================================
// Requests and outcomes
// =============================================================================

/// An inbound task: free text plus named string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRequest {
    pub task: Option<String>,
    pub params: HashMap<String, String>,
}

impl TaskRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: Some(task.into()),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Build a request from a flat query map; the `task` key is the task text
    /// and every other key is a parameter.
    pub fn from_query(mut query: HashMap<String, String>) -> Self {
        let task = query.remove("task");
        Self {
            task,
            params: query,
        }
    }
}

/// Result of one action invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success(String),
    DomainError(String),
    UnexpectedError(String),
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            ExecutionOutcome::Success(msg)
            | ExecutionOutcome::DomainError(msg)
            | ExecutionOutcome::UnexpectedError(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_display_matches_serde() {
        for kind in [
            ActionKind::Datagen,
            ActionKind::FormatMarkdown,
            ActionKind::CountWeekday,
            ActionKind::SortContacts,
            ActionKind::RecentLogs,
            ActionKind::MarkdownIndex,
            ActionKind::TicketSales,
            ActionKind::FetchApiData,
            ActionKind::CloneRepo,
            ActionKind::ScrapeWebsite,
            ActionKind::Transcribe,
            ActionKind::MarkdownToHtml,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn test_task_request_from_query_splits_task() {
        let mut query = HashMap::new();
        query.insert("task".to_string(), "Count Wednesdays".to_string());
        query.insert("email".to_string(), "a@b.io".to_string());

        let request = TaskRequest::from_query(query);
        assert_eq!(request.task.as_deref(), Some("Count Wednesdays"));
        assert_eq!(request.params.len(), 1);
        assert_eq!(request.params["email"], "a@b.io");
    }

    #[test]
    fn test_task_request_from_query_without_task() {
        let request = TaskRequest::from_query(HashMap::new());
        assert!(request.task.is_none());
    }

    #[test]
    fn test_execution_outcome_message() {
        assert!(ExecutionOutcome::Success("ok".into()).is_success());
        assert!(!ExecutionOutcome::DomainError("bad".into()).is_success());
        assert_eq!(
            ExecutionOutcome::UnexpectedError("boom".into()).message(),
            "boom"
        );
    }
}
