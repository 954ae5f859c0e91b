//! Email collection state
//!
//! A single reducer over [`AppState`]. Every [`Action`] replaces one
//! slice of the state; nothing is patched in place and nothing is
//! applied optimistically.

use crate::filter::{Filters, FiltersPatch};
use crate::model::{Email, Mailboxes};
use crate::tab::Tab;

/// Everything the mailbox views read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub sent: Vec<Email>,
    pub received: Vec<Email>,
    pub spam: Vec<Email>,
    /// Id of the selected email. Resolved against the collections on
    /// read, so a refetch never leaves a stale copy behind.
    pub selected: Option<i64>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub active_tab: Tab,
    pub search_query: String,
    pub filters: Filters,
}

impl AppState {
    /// Received followed by sent, for a unified view. Spam is left out
    /// and nothing is deduplicated.
    pub fn all_mail(&self) -> impl Iterator<Item = &Email> {
        self.received.iter().chain(self.sent.iter())
    }

    /// Look an email up by id across all three collections.
    #[must_use]
    pub fn find(&self, id: i64) -> Option<&Email> {
        self.received
            .iter()
            .chain(self.sent.iter())
            .chain(self.spam.iter())
            .find(|e| e.id == id)
    }
}

/// State transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace all three collections.
    SetEmails(Mailboxes),
    SelectEmail(Option<i64>),
    SetLoading(bool),
    SetError(Option<String>),
    SetActiveTab(Tab),
    SetSearchQuery(String),
    /// Merge into the current filters.
    SetFilters(FiltersPatch),
}

impl Action {
    /// Whether this action changes what the visible list is built from
    /// (tab, search, or filters).
    #[must_use]
    pub const fn is_query_trigger(&self) -> bool {
        matches!(
            self,
            Self::SetActiveTab(_) | Self::SetSearchQuery(_) | Self::SetFilters(_)
        )
    }
}

/// Apply one action, returning the next state.
#[must_use]
pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::SetEmails(Mailboxes {
            sent,
            received,
            spam,
        }) => AppState {
            sent,
            received,
            spam,
            ..state
        },
        Action::SelectEmail(selected) => AppState { selected, ..state },
        Action::SetLoading(is_loading) => AppState { is_loading, ..state },
        Action::SetError(error) => AppState { error, ..state },
        Action::SetActiveTab(active_tab) => AppState { active_tab, ..state },
        Action::SetSearchQuery(search_query) => AppState {
            search_query,
            ..state
        },
        Action::SetFilters(patch) => {
            let filters = state.filters.clone().merged(patch);
            AppState { filters, ..state }
        }
    }
}

/// Owns the state for one authenticated session.
#[derive(Debug, Default)]
pub struct EmailStore {
    state: AppState,
}

impl EmailStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply `action`. Returns `true` when the action is a query
    /// trigger, i.e. the visible list must be recomputed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let trigger = action.is_query_trigger();
        self.state = reduce(std::mem::take(&mut self.state), action);
        trigger
    }

    /// The currently selected email, if it is still loaded.
    #[must_use]
    pub fn selected_email(&self) -> Option<&Email> {
        self.state.selected.and_then(|id| self.state.find(id))
    }

    /// Back to the initial state (used on logout).
    pub fn reset(&mut self) {
        self.state = AppState::default();
    }
}
