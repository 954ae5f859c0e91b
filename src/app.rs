//! Application controller
//!
//! [`App`] owns the whole client-side state explicitly: the auth store,
//! the email store, pending notifications, bulk selection, filter
//! chips and the current route. Front ends call its intent methods and
//! read derived state back; there is no global state.
//!
//! Refetching is explicit. Intents that change a query trigger (tab,
//! search, filters) call [`App::refresh_if_stale`], which compares the
//! current [`QueryKey`] with the one the last fetch ran under.

use crate::auth::AuthStore;
use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::filter::{ActiveFilters, FilterKind, FilterOption, FiltersPatch};
use crate::forms::{ComposeForm, LoginForm, RegisterForm};
use crate::model::{Email, SpamCheck, SpamCheckRequest};
use crate::notify::{Notification, Notifications};
use crate::query::{QueryKey, visible_emails};
use crate::selection::Selection;
use crate::storage::{FileTokenStore, TokenStore};
use crate::store::{Action, AppState, EmailStore};
use crate::tab::Tab;
use chrono::Utc;
use tracing::{debug, info};

/// Which screen the user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Mailbox,
    Compose,
}

impl Route {
    const fn requires_auth(self) -> bool {
        matches!(self, Self::Mailbox | Self::Compose)
    }
}

/// Client-side application: intents in, derived state out.
pub struct App<S: TokenStore> {
    client: ApiClient,
    auth: AuthStore<S>,
    emails: EmailStore,
    notifications: Notifications,
    selection: Selection,
    chips: ActiveFilters,
    route: Route,
    last_query: Option<QueryKey>,
}

impl App<FileTokenStore> {
    /// Build an app that persists its token to `config.token_path`.
    #[must_use]
    pub fn from_config(config: ApiConfig) -> Self {
        let store = FileTokenStore::new(config.token_path.clone());
        Self::new(ApiClient::new(config), store)
    }
}

impl<S: TokenStore> App<S> {
    /// Build the app, restoring any persisted session.
    pub fn new(client: ApiClient, store: S) -> Self {
        let auth = AuthStore::new(store);
        let route = if auth.is_authenticated() {
            Route::Mailbox
        } else {
            Route::Login
        };
        Self {
            client,
            auth,
            emails: EmailStore::new(),
            notifications: Notifications::new(),
            selection: Selection::new(),
            chips: ActiveFilters::new(),
            route,
            last_query: None,
        }
    }

    // -- read side --

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthStore<S> {
        &self.auth
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        self.emails.state()
    }

    #[must_use]
    pub const fn route(&self) -> Route {
        self.route
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn filter_chips(&self) -> &ActiveFilters {
        &self.chips
    }

    #[must_use]
    pub const fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Take all pending notifications.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// The list the active tab shows.
    #[must_use]
    pub fn visible(&self) -> Vec<&Email> {
        visible_emails(self.emails.state())
    }

    #[must_use]
    pub fn selected_email(&self) -> Option<&Email> {
        self.emails.selected_email()
    }

    /// Switch screens. Authenticated screens fall back to login when
    /// there is no session.
    pub fn navigate(&mut self, route: Route) {
        self.route = if route.requires_auth() && !self.auth.is_authenticated() {
            Route::Login
        } else {
            route
        };
    }

    // -- auth intents --

    /// Log in. On failure the stored token and the route are left as
    /// they were.
    ///
    /// # Errors
    ///
    /// Returns the validation or API error; a notification is queued
    /// either way.
    pub async fn login(&mut self, form: &LoginForm) -> Result<()> {
        let credentials = self.validated(form.validate())?;
        match self.client.login(&credentials).await {
            Ok(mut token) => {
                token.email.get_or_insert(credentials.email);
                self.auth.set_token(Some(token));
                self.route = Route::Mailbox;
                self.notifications
                    .push(Notification::success("Logged in successfully."));
                Ok(())
            }
            Err(e) => {
                self.notifications
                    .push(Notification::error("Invalid email or password"));
                Err(e)
            }
        }
    }

    /// Create an account and log into it.
    ///
    /// # Errors
    ///
    /// Returns the validation error (before any request) or the API
    /// error.
    pub async fn register(&mut self, form: &RegisterForm) -> Result<()> {
        let credentials = self.validated(form.validate())?;
        match self.client.signup(&credentials).await {
            Ok(mut token) => {
                token.email.get_or_insert(credentials.email);
                self.auth.set_token(Some(token));
                self.route = Route::Mailbox;
                self.notifications
                    .push(Notification::success("Account created successfully."));
                Ok(())
            }
            Err(e) => {
                self.notifications.push(Notification::error(
                    "Registration failed. Email may already be registered.",
                ));
                Err(e)
            }
        }
    }

    /// End the session and forget all loaded mail.
    pub fn logout(&mut self) {
        self.auth.logout();
        self.reset_session_state();
        self.route = Route::Login;
    }

    // -- mailbox intents --

    /// Fetch all three collections and replace them in the store.
    ///
    /// On failure the previously loaded collections are kept and the
    /// error is recorded in the store.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after queueing a notification.
    pub async fn refresh(&mut self) -> Result<()> {
        let key = match self.require_key() {
            Ok(key) => key,
            Err(e) => {
                self.emails.dispatch(Action::SetError(Some(e.to_string())));
                return Err(e);
            }
        };

        self.emails.dispatch(Action::SetLoading(true));
        self.emails.dispatch(Action::SetError(None));
        self.last_query = Some(QueryKey::of(self.emails.state()));

        let outcome = match self.client.mailboxes(Some(&key)).await {
            Ok(mailboxes) => {
                self.emails.dispatch(Action::SetEmails(mailboxes));
                let visible: Vec<i64> = self.visible().iter().map(|e| e.id).collect();
                self.selection.retain(&visible);
                debug!("{} emails visible in {}", visible.len(), self.state().active_tab);
                Ok(())
            }
            Err(e) => {
                self.emails.dispatch(Action::SetError(Some(e.to_string())));
                self.fail(e, "Failed to fetch emails. Please try again.")
            }
        };

        self.emails.dispatch(Action::SetLoading(false));
        outcome
    }

    /// Refetch only if a query trigger changed since the last fetch.
    ///
    /// # Errors
    ///
    /// See [`App::refresh`].
    pub async fn refresh_if_stale(&mut self) -> Result<()> {
        if self.last_query.as_ref() == Some(&QueryKey::of(self.emails.state())) {
            return Ok(());
        }
        self.refresh().await
    }

    /// # Errors
    ///
    /// See [`App::refresh`].
    pub async fn set_tab(&mut self, tab: Tab) -> Result<()> {
        self.selection.clear();
        self.dispatch_trigger(Action::SetActiveTab(tab)).await
    }

    /// # Errors
    ///
    /// See [`App::refresh`].
    pub async fn set_search(&mut self, query: impl Into<String>) -> Result<()> {
        self.dispatch_trigger(Action::SetSearchQuery(query.into()))
            .await
    }

    /// # Errors
    ///
    /// See [`App::refresh`].
    pub async fn merge_filters(&mut self, patch: FiltersPatch) -> Result<()> {
        self.dispatch_trigger(Action::SetFilters(patch)).await
    }

    /// Apply a store action without fetching. Returns whether a query
    /// trigger changed; follow up with [`App::refresh_if_stale`] to
    /// batch several changes into one fetch.
    pub fn dispatch(&mut self, action: Action) -> bool {
        self.emails.dispatch(action)
    }

    /// Add a filter chip without fetching.
    pub fn stage_filter(&mut self, option: FilterOption) -> bool {
        self.chips.add(option);
        let patch = self.chips.take_patch(Utc::now());
        self.emails.dispatch(Action::SetFilters(patch))
    }

    /// Add a filter chip, replacing any chip of the same kind.
    ///
    /// # Errors
    ///
    /// See [`App::refresh`].
    pub async fn apply_filter(&mut self, option: FilterOption) -> Result<()> {
        self.stage_filter(option);
        self.refresh_if_stale().await
    }

    /// # Errors
    ///
    /// See [`App::refresh`].
    pub async fn remove_filter(&mut self, option: &FilterOption) -> Result<()> {
        self.chips.remove(option);
        self.sync_chips().await
    }

    /// # Errors
    ///
    /// See [`App::refresh`].
    pub async fn remove_filter_kind(&mut self, kind: FilterKind) -> Result<()> {
        self.chips.remove_kind(kind);
        self.sync_chips().await
    }

    /// # Errors
    ///
    /// See [`App::refresh`].
    pub async fn clear_filters(&mut self) -> Result<()> {
        self.chips.clear();
        self.sync_chips().await
    }

    pub fn select_email(&mut self, id: Option<i64>) {
        self.emails.dispatch(Action::SelectEmail(id));
    }

    /// Toggle one email in the bulk selection.
    pub fn toggle_selected(&mut self, id: i64) -> bool {
        self.selection.toggle(id)
    }

    /// Select every visible email, or clear when `selected` is false.
    pub fn select_all_visible(&mut self, selected: bool) {
        if selected {
            let ids: Vec<i64> = self.visible().iter().map(|e| e.id).collect();
            self.selection.select_all(ids);
        } else {
            self.selection.clear();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Reclassify as spam, then refetch everything.
    ///
    /// # Errors
    ///
    /// Returns the mutation or refetch error. The store is untouched
    /// when the mutation fails.
    pub async fn mark_as_spam(&mut self, id: i64) -> Result<()> {
        self.reclassify(id, true).await
    }

    /// Reclassify as legitimate, then refetch everything.
    ///
    /// # Errors
    ///
    /// Same as [`App::mark_as_spam`].
    pub async fn mark_as_not_spam(&mut self, id: i64) -> Result<()> {
        self.reclassify(id, false).await
    }

    /// Mark every selected email as spam. Returns how many succeeded.
    ///
    /// # Errors
    ///
    /// Fails when nothing is selected or a mutation fails; mutations
    /// stop at the first failure.
    pub async fn mark_selected_as_spam(&mut self) -> Result<usize> {
        self.reclassify_selected(true).await
    }

    /// Mark every selected email as legitimate.
    ///
    /// # Errors
    ///
    /// Same as [`App::mark_selected_as_spam`].
    pub async fn mark_selected_as_not_spam(&mut self) -> Result<usize> {
        self.reclassify_selected(false).await
    }

    // -- composer --

    /// Send an email and refresh the mailbox.
    ///
    /// # Errors
    ///
    /// Returns the validation error (before any request) or the send
    /// error.
    pub async fn send_email(&mut self, form: &ComposeForm) -> Result<Email> {
        let email = self.validated(form.validate())?;
        let key = self.require_key()?;
        match self.client.send_email(&email, Some(&key)).await {
            Ok(created) => {
                self.notifications
                    .push(Notification::success("Email sent successfully."));
                self.route = Route::Mailbox;
                if let Err(e) = self.refresh().await {
                    debug!("Refresh after send failed: {}", e);
                }
                Ok(created)
            }
            Err(e) => {
                let description = e.to_string();
                self.fail(e, description)
            }
        }
    }

    /// Ask the server to classify a message without storing it.
    ///
    /// # Errors
    ///
    /// Returns the request error after queueing a notification.
    pub async fn check_email(&mut self, request: &SpamCheckRequest) -> Result<SpamCheck> {
        let key = self.require_key()?;
        match self.client.check_email(request, Some(&key)).await {
            Ok(verdict) => Ok(verdict),
            Err(e) => self.fail(e, "Failed to check email. Please try again."),
        }
    }

    // -- private helpers --

    async fn dispatch_trigger(&mut self, action: Action) -> Result<()> {
        if self.emails.dispatch(action) {
            self.refresh_if_stale().await
        } else {
            Ok(())
        }
    }

    async fn sync_chips(&mut self) -> Result<()> {
        let patch = self.chips.take_patch(Utc::now());
        self.dispatch_trigger(Action::SetFilters(patch)).await
    }

    async fn reclassify(&mut self, id: i64, spam: bool) -> Result<()> {
        let key = self.require_key()?;
        let result = if spam {
            self.client.mark_as_spam(id, Some(&key)).await
        } else {
            self.client.mark_as_not_spam(id, Some(&key)).await
        };
        match result {
            Ok(()) => {
                let label = if spam { "spam" } else { "not spam" };
                self.notifications
                    .push(Notification::success(format!("Email marked as {label}.")));
                self.refresh().await
            }
            Err(e) => {
                let description = e.to_string();
                self.fail(e, description)
            }
        }
    }

    async fn reclassify_selected(&mut self, spam: bool) -> Result<usize> {
        let ids = self.selection.ids();
        if ids.is_empty() {
            let err = Error::Validation("No emails selected".into());
            self.notifications.push(Notification::error(err.to_string()));
            return Err(err);
        }
        let key = self.require_key()?;

        let mut done = 0;
        let mut failure = None;
        for id in ids {
            let result = if spam {
                self.client.mark_as_spam(id, Some(&key)).await
            } else {
                self.client.mark_as_not_spam(id, Some(&key)).await
            };
            match result {
                Ok(()) => done += 1,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        self.selection.clear();

        if done > 0 {
            let label = if spam { "spam" } else { "not spam" };
            self.notifications.push(Notification::success(format!(
                "{done} email(s) marked as {label}."
            )));
        }

        match failure {
            Some(e) => {
                if done > 0
                    && !matches!(e, Error::SessionExpired)
                    && let Err(refresh_err) = self.refresh().await
                {
                    debug!("Refresh after bulk failure failed: {}", refresh_err);
                }
                let description = e.to_string();
                self.fail(e, description)
            }
            None => {
                self.refresh().await?;
                Ok(done)
            }
        }
    }

    fn require_key(&mut self) -> Result<String> {
        if let Some(key) = self.auth.api_key() {
            return Ok(key.to_string());
        }
        let err = Error::Validation("Not authenticated".into());
        self.notifications.push(Notification::error(err.to_string()));
        Err(err)
    }

    fn validated<T>(&mut self, checked: Result<T>) -> Result<T> {
        checked.inspect_err(|e| {
            self.notifications.push(Notification::error(e.to_string()));
        })
    }

    /// Report a failed request. A rejected API key ends the session;
    /// anything else becomes an error notification.
    fn fail<T>(&mut self, err: Error, description: impl Into<String>) -> Result<T> {
        if matches!(err, Error::SessionExpired) {
            self.handle_session_expired();
        } else {
            self.notifications.push(Notification::error(description));
        }
        Err(err)
    }

    fn handle_session_expired(&mut self) {
        info!("Session expired, returning to login");
        self.auth.logout();
        self.reset_session_state();
        self.route = Route::Login;
        self.notifications
            .push(Notification::error(Error::SessionExpired.to_string()));
    }

    fn reset_session_state(&mut self) {
        self.emails.reset();
        self.selection.clear();
        self.chips = ActiveFilters::new();
        self.last_query = None;
    }
}
