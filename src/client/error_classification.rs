//! Error classification logic

use crate::error::{Error, ErrorResponse};
use crate::transport::RawResponse;

/// Status family of a failed exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Unauthorized,
    Forbidden,
    Server,
    /// Neither success nor an error status (1xx, 3xx).
    Unclassified,
}

pub fn classify_status(status: u16) -> StatusClass {
    match status {
        401 => StatusClass::Unauthorized,
        403 => StatusClass::Forbidden,
        400..=u16::MAX => StatusClass::Server,
        _ => StatusClass::Unclassified,
    }
}

pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false)
}

/// Build the typed error for a response with an error (or unexpected) status.
///
/// The body is parsed as an [`ErrorResponse`] only when the content type is JSON;
/// a JSON body that fails to parse is kept verbatim as the payload message.
pub fn classify_failure(
    status: u16,
    reason: &str,
    content_type: Option<&str>,
    body: &str,
) -> Error {
    let payload = if is_json_content_type(content_type) {
        Some(
            serde_json::from_str::<ErrorResponse>(body)
                .unwrap_or_else(|_| ErrorResponse::new(body)),
        )
    } else {
        None
    };
    let reason = reason.to_string();

    match classify_status(status) {
        StatusClass::Unauthorized => Error::Unauthorized {
            status,
            reason,
            payload,
        },
        StatusClass::Forbidden => Error::Forbidden {
            status,
            reason,
            payload,
        },
        StatusClass::Server => Error::Server {
            status,
            reason,
            payload,
        },
        StatusClass::Unclassified => Error::UnexpectedStatus { status, reason },
    }
}

pub(crate) fn classify_response(resp: &RawResponse) -> Error {
    classify_failure(
        resp.status,
        &resp.reason,
        resp.content_type.as_deref(),
        &resp.body,
    )
}

/// A success response whose body did not decode into the requested shape.
///
/// If the body is an error payload the remote rejected the request, which is
/// reported as a server error with the response's own status. Anything else is
/// a decode failure.
pub fn classify_decode_failure(status: u16, reason: &str, body: &str, source: serde_json::Error) -> Error {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(payload) if payload.message().is_some() => Error::Server {
            status,
            reason: reason.to_string(),
            payload: Some(payload),
        },
        _ => Error::Decode { status, source },
    }
}
