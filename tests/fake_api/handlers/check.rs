//! `POST /check-email`: classify without storing.

use super::fields;
use crate::fake_api::backend::classify;
use crate::fake_api::io::Response;
use serde_json::Value;

pub fn handle_check(body: &Value) -> Response {
    let [_, _, subject, content] = match fields(body, ["sender", "recipient", "subject", "content"])
    {
        Ok(f) => f,
        Err(missing) => return Response::missing_fields(&missing),
    };
    let (is_spam, confidence) = classify(subject, content);
    let message = if is_spam {
        "Email classified as spam and rejected"
    } else {
        "Email classified as legitimate and accepted"
    };
    Response::ok(serde_json::json!({
        "is_spam": is_spam,
        "confidence": confidence,
        "message": message,
    }))
}
