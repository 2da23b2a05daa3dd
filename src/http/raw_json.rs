//! Raw JSON request/response formatting.
//!
//! # Responsibilities
//! - Accept `application/json` request bodies as plain strings
//! - Write strings back out as `application/json` response bodies
//! - Reject unsupported media types and charsets
//!
//! # Design Decisions
//! - Media type matching ignores case and parameters other than `charset`
//! - A missing charset means UTF-8
//! - A leading UTF-8 byte order mark is dropped on read

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Media type served by [`RawJsonFormatter`].
pub const RAW_JSON_MEDIA_TYPE: &str = "application/json";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Errors produced while reading or writing a body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("unsupported charset: {0}")]
    UnsupportedCharset(String),

    #[error("body is not valid {charset}: {reason}")]
    InvalidEncoding { charset: &'static str, reason: String },

    #[error("failed to read request body: {0}")]
    Body(String),
}

impl IntoResponse for FormatError {
    fn into_response(self) -> Response {
        let status = match self {
            FormatError::UnsupportedMediaType(_) | FormatError::UnsupportedCharset(_) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            FormatError::InvalidEncoding { .. } | FormatError::Body(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

/// A parsed `Content-Type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaType<'a> {
    pub essence: &'a str,
    pub charset: Option<&'a str>,
}

impl<'a> MediaType<'a> {
    pub fn parse(value: &'a str) -> Self {
        let mut parts = value.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        let charset = parts.find_map(|param| {
            let (name, val) = param.split_once('=')?;
            name.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| val.trim().trim_matches('"'))
        });
        Self { essence, charset }
    }
}

/// Strategy for turning bodies into strings and back.
pub trait BodyFormatter {
    fn can_handle(&self, media_type: &MediaType<'_>) -> bool;

    fn read(&self, body: &[u8], charset: Option<&str>) -> Result<String, FormatError>;

    fn write(&self, value: &str, charset: Option<&str>) -> Result<Bytes, FormatError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Utf8,
    Ascii,
}

impl Charset {
    fn resolve(name: Option<&str>) -> Result<Self, FormatError> {
        match name {
            None => Ok(Charset::Utf8),
            Some(n) if n.eq_ignore_ascii_case("utf-8") || n.eq_ignore_ascii_case("utf8") => {
                Ok(Charset::Utf8)
            }
            Some(n) if n.eq_ignore_ascii_case("us-ascii") || n.eq_ignore_ascii_case("ascii") => {
                Ok(Charset::Ascii)
            }
            Some(n) => Err(FormatError::UnsupportedCharset(n.to_string())),
        }
    }
}

/// Passes `application/json` bodies through as strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawJsonFormatter;

impl BodyFormatter for RawJsonFormatter {
    fn can_handle(&self, media_type: &MediaType<'_>) -> bool {
        media_type.essence.eq_ignore_ascii_case(RAW_JSON_MEDIA_TYPE)
    }

    fn read(&self, body: &[u8], charset: Option<&str>) -> Result<String, FormatError> {
        match Charset::resolve(charset)? {
            Charset::Utf8 => {
                let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
                String::from_utf8(body.to_vec()).map_err(|e| FormatError::InvalidEncoding {
                    charset: "utf-8",
                    reason: e.to_string(),
                })
            }
            Charset::Ascii => {
                if let Some(pos) = body.iter().position(|b| !b.is_ascii()) {
                    return Err(FormatError::InvalidEncoding {
                        charset: "us-ascii",
                        reason: format!("non-ASCII byte at offset {}", pos),
                    });
                }
                // All bytes are ASCII, hence valid UTF-8.
                Ok(body.iter().map(|&b| b as char).collect())
            }
        }
    }

    fn write(&self, value: &str, charset: Option<&str>) -> Result<Bytes, FormatError> {
        if Charset::resolve(charset)? == Charset::Ascii && !value.is_ascii() {
            return Err(FormatError::InvalidEncoding {
                charset: "us-ascii",
                reason: "value contains non-ASCII characters".to_string(),
            });
        }
        Ok(Bytes::copy_from_slice(value.as_bytes()))
    }
}

/// Extractor and response for raw JSON text.
///
/// As an extractor it requires `Content-Type: application/json` and yields the
/// body unparsed. As a response it writes the string with a JSON content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawJson(pub String);

impl<S> FromRequest<S> for RawJson
where
    S: Send + Sync,
{
    type Rejection = FormatError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let media_type = MediaType::parse(&content_type);

        let formatter = RawJsonFormatter;
        if !formatter.can_handle(&media_type) {
            return Err(FormatError::UnsupportedMediaType(content_type.clone()));
        }
        // Fail on the charset before buffering the body.
        Charset::resolve(media_type.charset)?;

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| FormatError::Body(e.body_text()))?;

        formatter.read(&body, media_type.charset).map(RawJson)
    }
}

impl IntoResponse for RawJson {
    fn into_response(self) -> Response {
        match RawJsonFormatter.write(&self.0, None) {
            Ok(body) => (
                [(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/json; charset=utf-8"),
                )],
                body,
            )
                .into_response(),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::post, Router};
    use tower::ServiceExt;

    fn echo_router() -> Router {
        Router::new().route(
            "/echo",
            post(|RawJson(body): RawJson| async move { RawJson(body) }),
        )
    }

    async fn send(
        content_type: Option<&str>,
        body: &'static [u8],
    ) -> (StatusCode, Option<String>, String) {
        let mut builder = axum::http::Request::builder().method("POST").uri("/echo");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let response = echo_router()
            .oneshot(builder.body(Body::from(body)).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let ct = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, ct, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_media_type_parse() {
        let mt = MediaType::parse("Application/JSON; Charset=\"UTF-8\"");
        assert_eq!(mt.essence, "Application/JSON");
        assert_eq!(mt.charset, Some("UTF-8"));
        assert!(RawJsonFormatter.can_handle(&mt));

        let mt = MediaType::parse("text/plain");
        assert_eq!(mt.charset, None);
        assert!(!RawJsonFormatter.can_handle(&mt));
    }

    #[test]
    fn test_read_strips_bom_and_keeps_text() {
        let body = b"\xEF\xBB\xBF{\"a\": [1, 2]}";
        assert_eq!(RawJsonFormatter.read(body, None).unwrap(), "{\"a\": [1, 2]}");
    }

    #[test]
    fn test_read_rejects_bad_utf8() {
        let err = RawJsonFormatter.read(b"\xFF\xFE", Some("utf-8")).unwrap_err();
        assert!(matches!(err, FormatError::InvalidEncoding { charset: "utf-8", .. }));
    }

    #[test]
    fn test_ascii_charset() {
        assert_eq!(RawJsonFormatter.read(b"[1]", Some("us-ascii")).unwrap(), "[1]");
        assert!(RawJsonFormatter.read("\"é\"".as_bytes(), Some("us-ascii")).is_err());
        assert!(RawJsonFormatter.write("\"é\"", Some("ascii")).is_err());
    }

    #[test]
    fn test_unknown_charset() {
        let err = RawJsonFormatter.read(b"{}", Some("latin-9")).unwrap_err();
        assert_eq!(err, FormatError::UnsupportedCharset("latin-9".to_string()));
    }

    #[tokio::test]
    async fn test_echo_passes_body_through() {
        // Not valid JSON on purpose: the formatter never parses.
        let (status, ct, body) = send(Some("application/json"), b"{not json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ct.as_deref(), Some("application/json; charset=utf-8"));
        assert_eq!(body, "{not json");
    }

    #[tokio::test]
    async fn test_wrong_media_type_is_415() {
        let (status, _, _) = send(Some("text/plain"), b"{}").await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let (status, _, _) = send(None, b"{}").await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_unsupported_charset_is_415() {
        let (status, _, body) = send(Some("application/json; charset=utf-16"), b"{}").await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body.contains("utf-16"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_400() {
        let (status, _, _) = send(Some("application/json"), b"\xC3\x28").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
