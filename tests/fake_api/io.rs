//! HTTP/1.1 plumbing for the fake API server.
//!
//! Only what reqwest sends is understood: a request line, headers and
//! a `Content-Length` body. Every response carries
//! `Connection: close`, so one connection serves exactly one request.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// A parsed client request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body as JSON, or `Value::Null` when empty or malformed.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

/// A JSON response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub const fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// FastAPI-style error: `{"detail": "..."}`.
    pub fn error(status: u16, detail: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "detail": detail }),
        }
    }

    /// FastAPI-style 422 listing each missing body field.
    pub fn missing_fields(fields: &[&str]) -> Self {
        let detail: Vec<Value> = fields
            .iter()
            .map(|f| serde_json::json!({ "loc": ["body", f], "msg": "field required" }))
            .collect();
        Self {
            status: 422,
            body: serde_json::json!({ "detail": detail }),
        }
    }
}

const fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Read one request. Returns `None` if the client hung up first.
pub async fn read_request<S: AsyncRead + Unpin>(
    reader: &mut BufReader<S>,
) -> std::io::Result<Option<Request>> {
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default();
    let path = target.split('?').next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).await? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).await?;

    Ok(Some(Request {
        method,
        path,
        headers,
        body,
    }))
}

/// Write a response and flush.
pub async fn write_response<S: AsyncWrite + Unpin>(
    stream: &mut S,
    response: &Response,
) -> std::io::Result<()> {
    let body = response.body.to_string();
    let head = format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        response.status,
        reason(response.status),
        body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(body.as_bytes()).await?;
    stream.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_request_with_body() {
        let raw = "POST /api/v1/login?x=1 HTTP/1.1\r\n\
                   Host: 127.0.0.1\r\n\
                   x-api-key: k1\r\n\
                   content-length: 2\r\n\
                   \r\n\
                   {}";
        let mut reader = BufReader::new(raw.as_bytes());
        let request = read_request(&mut reader).await.unwrap().unwrap();

        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/v1/login");
        assert_eq!(request.header("X-API-Key"), Some("k1"));
        assert_eq!(request.body, b"{}");
    }

    #[tokio::test]
    async fn empty_stream_is_none() {
        let mut reader = BufReader::new(&b""[..]);
        assert!(read_request(&mut reader).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn writes_status_line_and_length() {
        let mut out = Vec::new();
        write_response(&mut out, &Response::error(404, "Recipient not found"))
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Connection: close"));
        assert!(text.ends_with(r#"{"detail":"Recipient not found"}"#));
    }
}
