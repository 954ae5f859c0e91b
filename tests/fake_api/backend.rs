//! Test data model for the fake API server
//!
//! Provides a builder-style API for constructing server state:
//!
//! ```ignore
//! let backend = BackendBuilder::new()
//!     .user("alice@example.com", "secret", "key-alice")
//!     .user("bob@example.com", "secret", "key-bob")
//!     .email(1, "bob@example.com", "alice@example.com", "Lunch", "2024-01-01T10:00:00")
//!     .spam(2, "bob@example.com", "alice@example.com", "Free money", "2024-01-02T10:00:00")
//!     .build();
//! ```
//!
//! The `Backend` is shared with the server via `Arc<Mutex<_>>`, so
//! tests can inspect it (or inject failures) while the server runs.

use serde_json::Value;

/// The whole server-side state.
#[derive(Debug, Clone, Default)]
pub struct Backend {
    pub users: Vec<User>,
    pub emails: Vec<StoredEmail>,
    /// Forced responses keyed by path suffix, e.g. `/emails/spam`.
    pub failures: Vec<Failure>,
    /// `METHOD path` of every request served, in order.
    pub requests: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub email: String,
    pub password: String,
    pub api_key: String,
}

/// An email row. `created_at` is a naive timestamp string, the way
/// the real backend serializes it.
#[derive(Debug, Clone)]
pub struct StoredEmail {
    pub id: i64,
    pub subject: String,
    pub content: String,
    pub sender: String,
    pub recipient: String,
    pub is_spam: bool,
    pub spam_confidence: f64,
    pub created_at: String,
}

impl StoredEmail {
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "subject": self.subject,
            "content": self.content,
            "sender_email": self.sender,
            "recipient_email": self.recipient,
            "is_spam": self.is_spam,
            "spam_confidence": self.spam_confidence,
            "created_at": self.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Failure {
    pub path: String,
    pub status: u16,
    pub detail: String,
}

impl Backend {
    pub fn user_by_key(&self, key: &str) -> Option<&User> {
        self.users.iter().find(|u| u.api_key == key)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn email(&self, id: i64) -> Option<&StoredEmail> {
        self.emails.iter().find(|e| e.id == id)
    }

    pub fn email_mut(&mut self, id: i64) -> Option<&mut StoredEmail> {
        self.emails.iter_mut().find(|e| e.id == id)
    }

    pub fn next_id(&self) -> i64 {
        self.emails.iter().map(|e| e.id).max().unwrap_or(0) + 1
    }

    /// Make every later request whose path ends with `path` fail.
    pub fn fail(&mut self, path: &str, status: u16, detail: &str) {
        self.failures.push(Failure {
            path: path.to_string(),
            status,
            detail: detail.to_string(),
        });
    }

    pub fn failure_for(&self, path: &str) -> Option<&Failure> {
        self.failures.iter().find(|f| path.ends_with(&f.path))
    }

    /// Revoke a user's key so requests with it get 403.
    pub fn revoke(&mut self, api_key: &str) {
        for user in &mut self.users {
            if user.api_key == api_key {
                user.api_key = format!("revoked-{api_key}");
            }
        }
    }

    /// How many requests were served for paths ending with `path`.
    pub fn count_requests(&self, path: &str) -> usize {
        self.requests.iter().filter(|r| r.ends_with(path)).count()
    }
}

/// Keyword classifier standing in for the trained model.
pub fn classify(subject: &str, content: &str) -> (bool, f64) {
    let text = format!("{subject} {content}").to_lowercase();
    if ["winner", "free money", "lottery"]
        .iter()
        .any(|w| text.contains(w))
    {
        (true, 0.97)
    } else {
        (false, 0.04)
    }
}

/// Builder for constructing a `Backend` step by step.
pub struct BackendBuilder {
    backend: Backend,
}

impl BackendBuilder {
    pub fn new() -> Self {
        Self {
            backend: Backend::default(),
        }
    }

    pub fn user(mut self, email: &str, password: &str, api_key: &str) -> Self {
        self.backend.users.push(User {
            email: email.to_string(),
            password: password.to_string(),
            api_key: api_key.to_string(),
        });
        self
    }

    /// Add a legitimate email. The body is derived from the subject.
    pub fn email(self, id: i64, from: &str, to: &str, subject: &str, created_at: &str) -> Self {
        self.stored(id, from, to, subject, created_at, false, 0.03)
    }

    /// Add an email already classified as spam.
    pub fn spam(self, id: i64, from: &str, to: &str, subject: &str, created_at: &str) -> Self {
        self.stored(id, from, to, subject, created_at, true, 0.93)
    }

    #[allow(clippy::too_many_arguments)]
    fn stored(
        mut self,
        id: i64,
        from: &str,
        to: &str,
        subject: &str,
        created_at: &str,
        is_spam: bool,
        spam_confidence: f64,
    ) -> Self {
        self.backend.emails.push(StoredEmail {
            id,
            subject: subject.to_string(),
            content: format!("Body of {subject}."),
            sender: from.to_string(),
            recipient: to.to_string(),
            is_spam,
            spam_confidence,
            created_at: created_at.to_string(),
        });
        self
    }

    pub fn build(self) -> Backend {
        self.backend
    }
}
