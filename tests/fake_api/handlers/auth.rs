//! `POST /login` and `POST /signup`.
//!
//! Tokens are not real JWTs; the client only stores and echoes them.

use super::fields;
use crate::fake_api::backend::{Backend, User};
use crate::fake_api::io::Response;
use serde_json::Value;

fn token(user: &User) -> Response {
    Response::ok(serde_json::json!({
        "access_token": format!("jwt-{}", user.email),
        "token_type": "bearer",
        "api_key": user.api_key,
    }))
}

pub fn handle_login(body: &Value, backend: &Backend) -> Response {
    let [email, password] = match fields(body, ["email", "password"]) {
        Ok(f) => f,
        Err(missing) => return Response::missing_fields(&missing),
    };
    match backend.user_by_email(email) {
        Some(user) if user.password == password => token(user),
        _ => Response::error(401, "Incorrect email or password"),
    }
}

pub fn handle_signup(body: &Value, backend: &mut Backend) -> Response {
    let [email, password] = match fields(body, ["email", "password"]) {
        Ok(f) => f,
        Err(missing) => return Response::missing_fields(&missing),
    };
    if backend.user_by_email(email).is_some() {
        return Response::error(400, "Email already registered");
    }
    let user = User {
        email: email.to_string(),
        password: password.to_string(),
        api_key: format!("key-{}", backend.users.len() + 1),
    };
    let response = token(&user);
    backend.users.push(user);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_api::BackendBuilder;

    fn backend() -> Backend {
        BackendBuilder::new()
            .user("alice@example.com", "secret", "key-alice")
            .build()
    }

    #[test]
    fn login_returns_api_key() {
        let body = serde_json::json!({"email": "alice@example.com", "password": "secret"});
        let response = handle_login(&body, &backend());
        assert_eq!(response.status, 200);
        assert_eq!(response.body["api_key"], "key-alice");
    }

    #[test]
    fn wrong_password_is_401() {
        let body = serde_json::json!({"email": "alice@example.com", "password": "nope"});
        assert_eq!(handle_login(&body, &backend()).status, 401);
    }

    #[test]
    fn missing_field_is_422() {
        let body = serde_json::json!({"email": "alice@example.com"});
        let response = handle_login(&body, &backend());
        assert_eq!(response.status, 422);
        assert_eq!(response.body["detail"][0]["msg"], "field required");
    }

    #[test]
    fn duplicate_signup_is_rejected() {
        let mut backend = backend();
        let body = serde_json::json!({"email": "alice@example.com", "password": "x"});
        let response = handle_signup(&body, &mut backend);
        assert_eq!(response.status, 400);
        assert_eq!(backend.users.len(), 1);
    }
}
