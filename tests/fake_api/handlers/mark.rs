//! `POST /emails/{id}/mark-spam` and `/emails/{id}/mark-not-spam`.

use crate::fake_api::backend::Backend;
use crate::fake_api::io::Response;

/// Reclassify an email the user received.
pub fn handle_mark(id: i64, spam: bool, user_email: &str, backend: &mut Backend) -> Response {
    match backend.email_mut(id) {
        Some(email) if email.recipient == user_email => {
            email.is_spam = spam;
            let label = if spam { "spam" } else { "not spam" };
            Response::ok(serde_json::json!({ "message": format!("Email marked as {label}") }))
        }
        _ => Response::error(404, "Email not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_api::BackendBuilder;

    #[test]
    fn flips_the_flag() {
        let mut backend = BackendBuilder::new()
            .email(7, "bob@example.com", "alice@example.com", "Hi", "2024-01-01T10:00:00")
            .build();

        let response = handle_mark(7, true, "alice@example.com", &mut backend);
        assert_eq!(response.status, 200);
        assert!(backend.email(7).unwrap().is_spam);
    }

    #[test]
    fn other_users_mail_is_not_found() {
        let mut backend = BackendBuilder::new()
            .email(7, "bob@example.com", "alice@example.com", "Hi", "2024-01-01T10:00:00")
            .build();

        let response = handle_mark(7, true, "mallory@example.com", &mut backend);
        assert_eq!(response.status, 404);
        assert!(!backend.email(7).unwrap().is_spam);
    }
}
