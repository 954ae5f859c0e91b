//! `GET /emails/sent`, `/emails/received` and `/emails/spam`.
//!
//! The three listings are disjoint: received is the legitimate mail
//! addressed to the user, spam the flagged rest. Rows come back in
//! insertion order, unsorted.

use crate::fake_api::backend::{Backend, User};
use crate::fake_api::io::Response;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Sent,
    Received,
    Spam,
}

pub fn handle_listing(listing: Listing, user: &User, backend: &Backend) -> Response {
    let rows: Vec<Value> = backend
        .emails
        .iter()
        .filter(|e| match listing {
            Listing::Sent => e.sender == user.email,
            Listing::Received => e.recipient == user.email && !e.is_spam,
            Listing::Spam => e.recipient == user.email && e.is_spam,
        })
        .map(|e| e.to_json())
        .collect();
    Response::ok(Value::Array(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_api::BackendBuilder;

    #[test]
    fn received_and_spam_are_disjoint() {
        let backend = BackendBuilder::new()
            .user("alice@example.com", "pw", "k")
            .email(1, "bob@example.com", "alice@example.com", "Hi", "2024-01-01T10:00:00")
            .spam(2, "eve@example.com", "alice@example.com", "Win", "2024-01-02T10:00:00")
            .email(3, "alice@example.com", "bob@example.com", "Re", "2024-01-03T10:00:00")
            .build();
        let alice = backend.user_by_key("k").unwrap();

        let received = handle_listing(Listing::Received, alice, &backend).body;
        let spam = handle_listing(Listing::Spam, alice, &backend).body;
        let sent = handle_listing(Listing::Sent, alice, &backend).body;

        assert_eq!(received.as_array().unwrap().len(), 1);
        assert_eq!(received[0]["id"], 1);
        assert_eq!(spam.as_array().unwrap().len(), 1);
        assert_eq!(spam[0]["id"], 2);
        assert_eq!(sent[0]["recipient_email"], "bob@example.com");
    }
}
