//! Response interpretation types.
//!
//! The provisioning API signals most outcomes with status codes: 200 for
//! reads, 201 for creates, 204 for updates and deletes, 404 for unknown
//! objects. These are protocol results, not errors, so every operation
//! returns an [`ApiOutcome`] that callers branch on.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque object identifier assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Oid(String);

impl Oid {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the OID from a creation response body.
    ///
    /// The server answers a create with the new object's URI, e.g.
    /// `/vmrest/schedules/4c3e...`; the OID is the last path segment.
    pub fn from_location(body: &str) -> Option<Self> {
        let segment = body
            .trim()
            .trim_matches('"')
            .trim_end_matches('/')
            .rsplit('/')
            .next()?
            .trim();
        if segment.is_empty() {
            None
        } else {
            Some(Self(segment.to_string()))
        }
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Oid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Oid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Remote resource kinds, used to phrase "not found" messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Cluster,
    LanguageMap,
    Location,
    CallHandlerTemplate,
    UserTemplate,
    User,
    Credential,
    ScheduleSet,
    Schedule,
    ScheduleDetail,
    CallHandler,
    Greeting,
    GreetingStreamFile,
    MenuEntry,
    TransferOption,
    VoiceFile,
}

impl Resource {
    /// Human-readable name, capitalized for the start of a message.
    pub fn name(&self) -> &'static str {
        match self {
            Resource::Cluster => "Cluster",
            Resource::LanguageMap => "Language map",
            Resource::Location => "Location",
            Resource::CallHandlerTemplate => "Call handler template",
            Resource::UserTemplate => "User template",
            Resource::User => "User",
            Resource::Credential => "Credential",
            Resource::ScheduleSet => "Schedule set",
            Resource::Schedule => "Schedule",
            Resource::ScheduleDetail => "Schedule detail",
            Resource::CallHandler => "Call handler",
            Resource::Greeting => "Greeting",
            Resource::GreetingStreamFile => "Greeting stream file",
            Resource::MenuEntry => "Menu entry",
            Resource::TransferOption => "Transfer option",
            Resource::VoiceFile => "Voice file",
        }
    }

    /// Message reported when the server answers 404.
    pub fn not_found_message(&self) -> String {
        format!("{} not found", self.name())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A response with a status the operation did not expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub status: u16,
    /// Canonical reason phrase for `status`.
    pub reason: String,
    /// Raw response body text.
    pub body: String,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl Failure {
    pub fn message(&self) -> String {
        format!("Unknown Result: {} {} {}", self.status, self.reason, self.body)
            .trim_end()
            .to_string()
    }
}

/// The two ways the server can turn a request down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotFound(Resource),
    Failure(Failure),
}

impl Rejection {
    pub fn message(&self) -> String {
        match self {
            Rejection::NotFound(resource) => resource.not_found_message(),
            Rejection::Failure(failure) => failure.message(),
        }
    }

    /// HTTP status behind the rejection.
    pub fn status(&self) -> u16 {
        match self {
            Rejection::NotFound(_) => 404,
            Rejection::Failure(failure) => failure.status,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Result of a single API operation that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    /// The server answered with the expected status.
    Success(T),
    /// The server answered 404.
    NotFound(Resource),
    /// Any other status.
    Failure(Failure),
}

impl<T> ApiOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiOutcome::NotFound(_))
    }

    /// The success payload, if any.
    pub fn success(self) -> Option<T> {
        match self {
            ApiOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_success(&self) -> Option<&T> {
        match self {
            ApiOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Split into the payload or the reason the server gave instead.
    pub fn split(self) -> Result<T, Rejection> {
        match self {
            ApiOutcome::Success(value) => Ok(value),
            ApiOutcome::NotFound(resource) => Err(Rejection::NotFound(resource)),
            ApiOutcome::Failure(failure) => Err(Rejection::Failure(failure)),
        }
    }

    pub fn map<U, F>(self, f: F) -> ApiOutcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ApiOutcome::Success(value) => ApiOutcome::Success(f(value)),
            ApiOutcome::NotFound(resource) => ApiOutcome::NotFound(resource),
            ApiOutcome::Failure(failure) => ApiOutcome::Failure(failure),
        }
    }

    /// Like `map`, for transforms that can themselves fail locally.
    pub fn try_map<U, E, F>(self, f: F) -> Result<ApiOutcome<U>, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        Ok(match self {
            ApiOutcome::Success(value) => ApiOutcome::Success(f(value)?),
            ApiOutcome::NotFound(resource) => ApiOutcome::NotFound(resource),
            ApiOutcome::Failure(failure) => ApiOutcome::Failure(failure),
        })
    }

    /// Message for a non-success outcome.
    pub fn rejection_message(&self) -> Option<String> {
        match self {
            ApiOutcome::Success(_) => None,
            ApiOutcome::NotFound(resource) => Some(resource.not_found_message()),
            ApiOutcome::Failure(failure) => Some(failure.message()),
        }
    }
}

impl<T: fmt::Display> ApiOutcome<T> {
    /// Human-readable message for any outcome.
    pub fn message(&self) -> String {
        match self {
            ApiOutcome::Success(value) => value.to_string(),
            _ => self.rejection_message().unwrap_or_default(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for ApiOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Success payload of a create operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub message: String,
    pub oid: Oid,
}

impl fmt::Display for Created {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.oid)
    }
}

/// A response as read off the wire, before interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl RawResponse {
    /// Interpret the status: `expected` yields the body, 404 yields
    /// `NotFound(resource)`, anything else a `Failure`.
    pub fn expect(self, expected: u16, resource: Resource) -> ApiOutcome<String> {
        if self.status == expected {
            ApiOutcome::Success(self.body)
        } else if self.status == 404 {
            ApiOutcome::NotFound(resource)
        } else {
            ApiOutcome::Failure(self.into_failure())
        }
    }

    /// Interpret a create: `201` with an object URI in the body.
    pub fn expect_created(self, resource: Resource, message: &str) -> ApiOutcome<Created> {
        match self.status {
            201 => match Oid::from_location(&self.body) {
                Some(oid) => ApiOutcome::Success(Created {
                    message: message.to_string(),
                    oid,
                }),
                None => ApiOutcome::Failure(self.into_failure()),
            },
            404 => ApiOutcome::NotFound(resource),
            _ => ApiOutcome::Failure(self.into_failure()),
        }
    }

    /// Interpret an update/delete: `204`, success carries `message`.
    pub fn expect_no_content(self, resource: Resource, message: String) -> ApiOutcome<String> {
        self.expect(204, resource).map(|_| message)
    }

    /// Interpret a read: `200` with a JSON body (empty body reads as null).
    pub fn expect_json(self, resource: Resource) -> Result<ApiOutcome<Value>, serde_json::Error> {
        self.expect(200, resource).try_map(|body| {
            if body.trim().is_empty() {
                Ok(Value::Null)
            } else {
                serde_json::from_str(&body)
            }
        })
    }

    pub fn into_failure(self) -> Failure {
        Failure {
            status: self.status,
            reason: self.reason,
            body: self.body,
        }
    }
}

/// A response whose body is kept as bytes, for audio downloads.
#[derive(Debug, Clone)]
pub struct BinaryResponse {
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
}

impl BinaryResponse {
    /// Same status rules as [`RawResponse::expect`]. A failure body is
    /// decoded lossily so it can be reported.
    pub fn expect(self, expected: u16, resource: Resource) -> ApiOutcome<Vec<u8>> {
        if self.status == expected {
            ApiOutcome::Success(self.body)
        } else if self.status == 404 {
            ApiOutcome::NotFound(resource)
        } else {
            ApiOutcome::Failure(Failure {
                status: self.status,
                reason: self.reason,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            })
        }
    }
}

/// Normalize a collection envelope into a list.
///
/// The server wraps collections as `{"@total": "N", "<Kind>": ...}`, where
/// `<Kind>` holds an array for several items, a bare object for exactly
/// one, and is absent for none.
pub fn collection(mut envelope: Value, kind: &str) -> Vec<Value> {
    match envelope.get_mut(kind).map(Value::take) {
        Some(Value::Array(items)) => items,
        Some(item @ Value::Object(_)) => vec![item],
        _ => Vec::new(),
    }
}

/// The `@total` count of a collection envelope.
pub fn total(envelope: &Value) -> Option<u64> {
    match envelope.get("@total")? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    }
}

/// Which view of a listing to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Display name and OID pairs only.
    #[default]
    Mini,
    /// The decoded response as returned by the server.
    Full,
}

/// A (display name, OID) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub name: String,
    pub oid: Oid,
}

/// A listing in the requested projection.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Mini(Vec<Summary>),
    Full(Value),
}

impl Listing {
    /// Project a collection envelope. Items without an `ObjectId` are
    /// left out of the mini view.
    pub fn project(envelope: Value, kind: &str, name_field: &str, projection: Projection) -> Self {
        match projection {
            Projection::Full => Listing::Full(envelope),
            Projection::Mini => Listing::Mini(
                collection(envelope, kind)
                    .iter()
                    .filter_map(|item| {
                        let oid = item.get("ObjectId")?.as_str()?;
                        let name = item.get(name_field).and_then(Value::as_str).unwrap_or_default();
                        Some(Summary {
                            name: name.to_string(),
                            oid: Oid::from(oid),
                        })
                    })
                    .collect(),
            ),
        }
    }

    pub fn summaries(&self) -> Option<&[Summary]> {
        match self {
            Listing::Mini(items) => Some(items),
            Listing::Full(_) => None,
        }
    }

    pub fn into_full(self) -> Option<Value> {
        match self {
            Listing::Full(value) => Some(value),
            Listing::Mini(_) => None,
        }
    }
}
