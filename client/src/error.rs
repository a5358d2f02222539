//! Translation of the API's embedded error codes into typed errors.

use std::fmt::{self, Display};

use crate::envelope::ErrorInfo;

/// Named error conditions reported by the API, keyed by numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unknown,
    KeyEmpty,
    IncorrectKey,
    WrongType,
    WrongFields,
    TooManyRequests,
    IncorrectId,
    IncorrectIdEntityRelation,
    IpBlock,
    ApiDisabled,
    KeyOwnerInFederalJail,
    KeyChangeError,
    KeyReadError,
    KeyDisabledInactivity,
    DailyReadLimit,
    TemporaryError,
    InsufficientAccessLevel,
    BackendError,
    KeyPaused,
    MustMigrateCrimes,
    RaceNotFinished,
    IncorrectCategory,
    OnlyInApiV1,
    OnlyInApiV2,
    ClosedTemporarily,
    /// A code this client does not know about.
    Unrecognized,
}

const TAXONOMY: [(i64, ErrorKind, &str); 25] = [
    (0, ErrorKind::Unknown, "Unhandled error, should not occur"),
    (1, ErrorKind::KeyEmpty, "Private key is empty in current request"),
    (2, ErrorKind::IncorrectKey, "Private key is wrong/incorrect format"),
    (3, ErrorKind::WrongType, "Requesting an incorrect basic type"),
    (4, ErrorKind::WrongFields, "Requesting incorrect selection fields"),
    (5, ErrorKind::TooManyRequests, "Requests are blocked for a small period of time because of too many requests per user"),
    (6, ErrorKind::IncorrectId, "Wrong ID value"),
    (7, ErrorKind::IncorrectIdEntityRelation, "A requested selection is private"),
    (8, ErrorKind::IpBlock, "Current IP is banned for a small period of time because of abuse"),
    (9, ErrorKind::ApiDisabled, "API system is currently disabled"),
    (10, ErrorKind::KeyOwnerInFederalJail, "Current key can't be used because owner is in federal jail"),
    (11, ErrorKind::KeyChangeError, "You can only change your API key once every 60 seconds"),
    (12, ErrorKind::KeyReadError, "Error reading key from database"),
    (13, ErrorKind::KeyDisabledInactivity, "The key is temporarily disabled due to owner inactivity"),
    (14, ErrorKind::DailyReadLimit, "Too many records have been pulled today by this user from our cloud services"),
    (15, ErrorKind::TemporaryError, "An error code specifically for testing purposes that has no dedicated meaning"),
    (16, ErrorKind::InsufficientAccessLevel, "A selection is being called of which this key does not have permission to access"),
    (17, ErrorKind::BackendError, "Backend error occurred, please try again"),
    (18, ErrorKind::KeyPaused, "API key has been paused by the owner"),
    (19, ErrorKind::MustMigrateCrimes, "Must be migrated to crimes 2.0"),
    (20, ErrorKind::RaceNotFinished, "Race not yet finished"),
    (21, ErrorKind::IncorrectCategory, "Wrong cat value"),
    (22, ErrorKind::OnlyInApiV1, "This selection is only available in API v1"),
    (23, ErrorKind::OnlyInApiV2, "This selection is only available in API v2"),
    (24, ErrorKind::ClosedTemporarily, "Closed temporarily"),
];

impl ErrorKind {
    pub fn from_code(code: i64) -> Self {
        TAXONOMY
            .iter()
            .find(|(c, _, _)| *c == code)
            .map(|(_, kind, _)| *kind)
            .unwrap_or(ErrorKind::Unrecognized)
    }

    /// The documented code, `None` for [`ErrorKind::Unrecognized`]
    pub fn code(&self) -> Option<i64> {
        TAXONOMY
            .iter()
            .find(|(_, kind, _)| kind == self)
            .map(|(code, _, _)| *code)
    }

    pub fn description(&self) -> &'static str {
        TAXONOMY
            .iter()
            .find(|(_, kind, _)| kind == self)
            .map(|(_, _, text)| *text)
            .unwrap_or("Unrecognized remote error")
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// An error the API reported inside a successful HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (code {code}): {message}")]
pub struct DomainError {
    kind: ErrorKind,
    code: i64,
    message: String,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The code exactly as the API sent it
    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Map an embedded error descriptor onto the known taxonomy.
///
/// Total: codes outside the taxonomy become [`ErrorKind::Unrecognized`] with
/// the original code and message kept.
pub fn translate(info: ErrorInfo) -> DomainError {
    DomainError {
        kind: ErrorKind::from_code(info.code),
        code: info.code,
        message: info.message,
    }
}

impl From<ErrorInfo> for DomainError {
    fn from(info: ErrorInfo) -> Self {
        translate(info)
    }
}
