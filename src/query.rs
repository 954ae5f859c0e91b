//! Derived email list
//!
//! Pure functions from [`AppState`] to the list a view shows. Nothing
//! here mutates the store: the collections stay as the server sent
//! them and the visible list is recomputed on demand.
//!
//! Pipeline, in order:
//! 1. base collection for the active tab
//! 2. text search
//! 3. date range
//! 4. spam-status and sender chips
//! 5. newest first

use crate::filter::{DateRange, Filters, SpamStatus};
use crate::model::Email;
use crate::store::AppState;
use crate::tab::Tab;

/// The inputs the visible list depends on. When it changes, the
/// collections are refetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    pub tab: Tab,
    pub search: String,
    pub filters: Filters,
}

impl QueryKey {
    #[must_use]
    pub fn of(state: &AppState) -> Self {
        Self {
            tab: state.active_tab,
            search: state.search_query.clone(),
            filters: state.filters.clone(),
        }
    }
}

/// Whether a received subject belongs in the important tab.
#[must_use]
pub fn is_important(email: &Email) -> bool {
    email.subject.to_lowercase().contains("important") || email.subject.contains('!')
}

/// The collection the active tab is built from.
#[must_use]
pub fn base_collection(state: &AppState) -> Vec<&Email> {
    match state.active_tab {
        Tab::Inbox => state.received.iter().collect(),
        Tab::Sent => state.sent.iter().collect(),
        Tab::Spam => state.spam.iter().filter(|e| e.is_spam).collect(),
        Tab::Important => state.received.iter().filter(|e| is_important(e)).collect(),
    }
}

/// Case-insensitive substring match on subject, content, sender or
/// recipient. An empty query matches everything.
#[must_use]
pub fn matches_search(email: &Email, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    [
        &email.subject,
        &email.content,
        &email.sender_email,
        &email.recipient_email,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&query))
}

#[must_use]
pub fn within_range(email: &Email, range: &DateRange) -> bool {
    range.contains(email.created_at)
}

fn matches_chips(email: &Email, filters: &Filters) -> bool {
    let status_ok = match filters.spam_status {
        SpamStatus::All => true,
        SpamStatus::Spam => email.is_spam,
        SpamStatus::Legitimate => !email.is_spam,
    };
    status_ok
        && filters.sender.as_deref().is_none_or(|sender| {
            email
                .sender_email
                .to_lowercase()
                .contains(&sender.to_lowercase())
        })
}

/// Stable sort, newest `created_at` first. Equal timestamps keep their
/// source order.
pub fn sort_newest_first(emails: &mut [&Email]) {
    emails.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// The list the active tab shows.
#[must_use]
pub fn visible_emails(state: &AppState) -> Vec<&Email> {
    let mut emails: Vec<&Email> = base_collection(state)
        .into_iter()
        .filter(|e| matches_search(e, &state.search_query))
        .filter(|e| within_range(e, &state.filters.date_range))
        .filter(|e| matches_chips(e, &state.filters))
        .collect();
    sort_newest_first(&mut emails);
    emails
}
