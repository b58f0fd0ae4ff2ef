//! Classified failures from outbound backend calls.
//!
//! Every failed exchange collapses into a [`RequestError`]: an explicit
//! error kind, the HTTP status it was observed with, and optional free-text
//! context. Handlers branch on the status predicates to pick user-facing
//! copy; nothing here drives retries.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Explicit discriminant for the failure, so callers never need to probe
/// an opaque error value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// The transport call itself failed; no response was obtained.
    PerformingRequest,
    /// The response arrived but its body could not be read.
    ReadingBody,
    /// The body could not be decoded, either a success payload or the
    /// remote error payload.
    DecodingPayload,
    /// The remote service answered >= 400 with a parseable error payload;
    /// the message is the remote one, verbatim.
    Service { message: String },
    /// The endpoint alias is not present in the bundled descriptor.
    MissingEndpoint { alias: String },
    /// The request could not be built (e.g. bad method in the descriptor).
    BuildingRequest,
}

impl std::fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestErrorKind::PerformingRequest => write!(f, "error performing request"),
            RequestErrorKind::ReadingBody => write!(f, "error reading response body"),
            RequestErrorKind::DecodingPayload => write!(f, "error decoding payload"),
            RequestErrorKind::Service { message } => write!(f, "{message}"),
            RequestErrorKind::MissingEndpoint { alias } => {
                write!(f, "error endpoint does not exist: {alias}")
            }
            RequestErrorKind::BuildingRequest => write!(f, "error building request"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    kind: RequestErrorKind,
    status: StatusCode,
    context: String,
}

impl RequestError {
    pub fn new(kind: RequestErrorKind, status: StatusCode) -> Self {
        Self {
            kind,
            status,
            context: String::new(),
        }
    }

    pub fn with_context(
        kind: RequestErrorKind,
        status: StatusCode,
        context: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            status,
            context: context.into(),
        }
    }

    pub fn kind(&self) -> &RequestErrorKind {
        &self.kind
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    pub fn is_no_content(&self) -> bool {
        self.status == StatusCode::NO_CONTENT
    }

    pub fn is_bad_request(&self) -> bool {
        self.status == StatusCode::BAD_REQUEST
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.context.is_empty() {
            write!(f, "{} - {}", self.status.as_u16(), self.kind)
        } else {
            write!(f, "{} - {}: {}", self.status.as_u16(), self.kind, self.context)
        }
    }
}

impl std::error::Error for RequestError {}

/// Error payload shape of one backend service; field names vary per
/// service, so each gets its own projection.
pub(crate) trait ServiceErrorPayload: DeserializeOwned {
    fn message(self) -> String;
}

/// Pets service errors: `{"status": ..., "message": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct PetServiceError {
    message: String,
}

impl ServiceErrorPayload for PetServiceError {
    fn message(self) -> String {
        self.message
    }
}

/// Treatments service errors: `{"code": ..., "msg": ...}`.
#[derive(Debug, Deserialize)]
pub(crate) struct TreatmentServiceError {
    msg: String,
}

impl ServiceErrorPayload for TreatmentServiceError {
    fn message(self) -> String {
        self.msg
    }
}

/// Users service errors: same shape as the pets service.
#[derive(Debug, Deserialize)]
pub(crate) struct UserServiceError {
    message: String,
}

impl ServiceErrorPayload for UserServiceError {
    fn message(self) -> String {
        self.message
    }
}

/// Error policy applied to every completed exchange: responses below 400
/// pass through untouched, anything else is turned into a [`RequestError`]
/// carrying the remote message when the error payload decodes, or a
/// reading/decoding error when it does not.
pub(crate) async fn classify_response<P: ServiceErrorPayload>(
    response: Response,
) -> Result<Response, RequestError> {
    let status = response.status();
    if status < StatusCode::BAD_REQUEST {
        return Ok(response);
    }

    let body = response.bytes().await.map_err(|err| {
        RequestError::with_context(RequestErrorKind::ReadingBody, status, err.to_string())
    })?;

    let payload: P = serde_json::from_slice(&body)
        .map_err(|_| RequestError::new(RequestErrorKind::DecodingPayload, status))?;

    Err(RequestError::new(
        RequestErrorKind::Service {
            message: payload.message(),
        },
        status,
    ))
}
