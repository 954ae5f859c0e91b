//! Smart Anti-Spam API client library
//!
//! Client side of the anti-spam email service: a typed REST client,
//! a persisted credential store, a reducer-style email store and the
//! pure query layer that turns the three server collections (sent,
//! received, spam) into the list a view shows.
//!
//! [`App`] wires these together and is what front ends drive.
//!
//! ```no_run
//! use antispam_client::{ApiConfig, App, LoginForm, Tab};
//!
//! # async fn run() -> antispam_client::Result<()> {
//! let mut app = App::from_config(ApiConfig::from_env()?);
//! app.login(&LoginForm::new("me@example.com", "hunter2")).await?;
//! app.set_tab(Tab::Spam).await?;
//! for email in app.visible() {
//!     println!("{} {}", email.id, email.subject);
//! }
//! # Ok(())
//! # }
//! ```

mod app;
mod auth;
mod client;
mod config;
mod error;
pub mod filter;
mod forms;
mod model;
mod notify;
pub mod query;
mod selection;
mod storage;
pub mod store;
mod tab;

pub use app::{App, Route};
pub use auth::AuthStore;
pub use client::{API_KEY_HEADER, ApiClient};
pub use config::{ApiConfig, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use filter::{
    ActiveFilters, DateRange, FilterKind, FilterOption, Filters, FiltersPatch, SpamStatus,
};
pub use forms::{ComposeForm, LoginForm, RegisterForm};
pub use model::{
    Credentials, Email, EmailCreate, Health, Mailboxes, SpamCheck, SpamCheckRequest, Token,
};
pub use notify::{Level, Notification, Notifications};
pub use selection::{Selection, SelectionState};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use store::{Action, AppState, EmailStore};
pub use tab::Tab;
