//! Ordered action catalogue and trigger-phrase resolution.
//!
//! Entries are checked in registration order and the first trigger found in
//! the lower-cased task wins. Adding an action is a data change: a new
//! [`ActionSpec`] in [`CATALOGUE`] plus its handler in
//! [`ActionRegistry::with_defaults`].

use std::sync::Arc;

use autotask_core::{AutotaskConfig, AutotaskError};

use crate::handler::clone_repo::CloneRepoHandler;
use crate::handler::count_weekday::CountWeekdayHandler;
use crate::handler::datagen::DatagenHandler;
use crate::handler::fetch_url::FetchUrlHandler;
use crate::handler::format_markdown::FormatMarkdownHandler;
use crate::handler::markdown_index::MarkdownIndexHandler;
use crate::handler::markdown_to_html::MarkdownToHtmlHandler;
use crate::handler::recent_logs::RecentLogsHandler;
use crate::handler::sort_contacts::SortContactsHandler;
use crate::handler::ticket_sales::TicketSalesHandler;
use crate::handler::transcribe::TranscribeHandler;
use crate::handler::{ActionHandler, HandlerServices};
use crate::types::{ActionKind, ActionSpec, PathTarget};

/// Built-in actions in priority order.
pub const CATALOGUE: &[ActionSpec] = &[
    ActionSpec {
        trigger: "install uv and run datagen",
        kind: ActionKind::Datagen,
        required_params: &["email"],
        targets: &[PathTarget::new("workdir", ".")],
    },
    ActionSpec {
        trigger: "format markdown",
        kind: ActionKind::FormatMarkdown,
        required_params: &[],
        targets: &[PathTarget::new("input", "format.md")],
    },
    ActionSpec {
        trigger: "count wednesdays",
        kind: ActionKind::CountWeekday,
        required_params: &[],
        targets: &[
            PathTarget::new("input", "dates.txt"),
            PathTarget::new("output", "dates-wednesdays.txt"),
        ],
    },
    ActionSpec {
        trigger: "sort contacts",
        kind: ActionKind::SortContacts,
        required_params: &[],
        targets: &[
            PathTarget::new("input", "contacts.json"),
            PathTarget::new("output", "contacts-sorted.json"),
        ],
    },
    ActionSpec {
        trigger: "extract recent logs",
        kind: ActionKind::RecentLogs,
        required_params: &[],
        targets: &[
            PathTarget::new("logs", "logs"),
            PathTarget::new("output", "logs-recent.txt"),
        ],
    },
    ActionSpec {
        trigger: "create markdown index",
        kind: ActionKind::MarkdownIndex,
        required_params: &[],
        targets: &[
            PathTarget::new("docs", "docs"),
            PathTarget::new("output", "docs/index.json"),
        ],
    },
    ActionSpec {
        trigger: "calculate ticket sales",
        kind: ActionKind::TicketSales,
        required_params: &[],
        targets: &[
            PathTarget::new("database", "ticket-sales.db"),
            PathTarget::new("output", "ticket-sales-gold.txt"),
        ],
    },
    ActionSpec {
        trigger: "fetch api data",
        kind: ActionKind::FetchApiData,
        required_params: &["url"],
        targets: &[PathTarget::new("output", "api_output.txt")],
    },
    ActionSpec {
        trigger: "clone git repo",
        kind: ActionKind::CloneRepo,
        required_params: &["repo_url"],
        targets: &[PathTarget::new("destination", "repo")],
    },
    ActionSpec {
        trigger: "scrape website",
        kind: ActionKind::ScrapeWebsite,
        required_params: &["url"],
        targets: &[PathTarget::new("output", "scraped_data.txt")],
    },
    ActionSpec {
        trigger: "transcribe audio",
        kind: ActionKind::Transcribe,
        required_params: &[],
        targets: &[
            PathTarget::new("input", "audio.mp3"),
            PathTarget::new("output", "transcription.txt"),
        ],
    },
    ActionSpec {
        trigger: "convert markdown to html",
        kind: ActionKind::MarkdownToHtml,
        required_params: &[],
        targets: &[
            PathTarget::new("input", "docs/input.md"),
            PathTarget::new("output", "docs/output.html"),
        ],
    },
];

/// Built-in catalogue entry for `kind`.
pub fn spec_for(kind: ActionKind) -> Option<&'static ActionSpec> {
    CATALOGUE.iter().find(|spec| spec.kind == kind)
}

/// A catalogue entry bound to the handler that runs it.
#[derive(Clone)]
pub struct RegisteredAction {
    /// Position in the registry; lower wins.
    pub ordinal: usize,
    pub spec: ActionSpec,
    pub handler: Arc<dyn ActionHandler>,
    trigger: String,
}

impl RegisteredAction {
    /// The trigger phrase as it is matched (lower case).
    pub fn trigger(&self) -> &str {
        &self.trigger
    }
}

impl std::fmt::Debug for RegisteredAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredAction")
            .field("ordinal", &self.ordinal)
            .field("trigger", &self.trigger)
            .field("kind", &self.spec.kind)
            .finish()
    }
}

/// Ordered registry of actions.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<RegisteredAction>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in action, wired to `config`.
    pub fn with_defaults(config: &AutotaskConfig) -> Result<Self, AutotaskError> {
        let services = HandlerServices::from_config(config)?;
        let mut registry = Self::new();
        for spec in CATALOGUE {
            registry.register(*spec, default_handler(spec.kind, &services));
        }
        Ok(registry)
    }

    /// Append an action. It matches only after every earlier entry.
    pub fn register(&mut self, spec: ActionSpec, handler: Arc<dyn ActionHandler>) {
        debug_assert_eq!(spec.kind, handler.kind());
        self.actions.push(RegisteredAction {
            ordinal: self.actions.len(),
            trigger: spec.trigger.to_lowercase(),
            spec,
            handler,
        });
    }

    /// First action whose trigger occurs in `task`, compared case-insensitively.
    pub fn resolve(&self, task: &str) -> Option<&RegisteredAction> {
        let normalized = task.to_lowercase();
        self.actions
            .iter()
            .find(|action| normalized.contains(action.trigger.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredAction> {
        self.actions.iter()
    }

    pub fn specs(&self) -> Vec<ActionSpec> {
        self.actions.iter().map(|a| a.spec).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

fn default_handler(kind: ActionKind, services: &HandlerServices) -> Arc<dyn ActionHandler> {
    match kind {
        ActionKind::Datagen => Arc::new(DatagenHandler::new(
            services.process.clone(),
            services.datagen.clone(),
        )),
        ActionKind::FormatMarkdown => {
            Arc::new(FormatMarkdownHandler::new(services.process.clone()))
        }
        ActionKind::CountWeekday => Arc::new(CountWeekdayHandler::wednesdays()),
        ActionKind::SortContacts => Arc::new(SortContactsHandler),
        ActionKind::RecentLogs => Arc::new(RecentLogsHandler::default()),
        ActionKind::MarkdownIndex => Arc::new(MarkdownIndexHandler),
        ActionKind::TicketSales => Arc::new(TicketSalesHandler),
        ActionKind::FetchApiData => Arc::new(FetchUrlHandler::api_data(services.http.clone())),
        ActionKind::CloneRepo => Arc::new(CloneRepoHandler::new(services.process.clone())),
        ActionKind::ScrapeWebsite => {
            Arc::new(FetchUrlHandler::scrape_website(services.http.clone()))
        }
        ActionKind::Transcribe => Arc::new(TranscribeHandler::new(
            services.http.clone(),
            services.llm.clone(),
        )),
        ActionKind::MarkdownToHtml => {
            Arc::new(MarkdownToHtmlHandler::new(services.process.clone()))
        }
    }
}
