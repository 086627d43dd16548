use thiserror::Error;

/// Flat classifier over [`CeremonyError`] variants, used by callers that
/// dispatch on failure kind rather than on the precise variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    InvalidState,
    Expired,
    Unauthorized,
    AlreadyExists,
    MalformedInput,
    VerificationFailed,
    PolicyViolation,
    HandlerRejected,
    Storage,
    Serialization,
}

#[derive(Debug, Error)]
pub enum CeremonyError {
    #[error("dkg request not found: id={id}")]
    DkgRequestNotFound { id: u64 },

    #[error("signing request not found: id={id}")]
    SigningRequestNotFound { id: u64 },

    #[error("refreshing request not found: id={id}")]
    RefreshingRequestNotFound { id: u64 },

    #[error("no handler registered for module {module}")]
    HandlerNotFound { module: String },

    #[error("{entity} request {id} is {status}, expected {expected}")]
    InvalidStatus { entity: &'static str, id: u64, status: String, expected: &'static str },

    #[error("invalid status transition: {entity} {from} -> {to}")]
    InvalidStatusTransition { entity: &'static str, from: String, to: String },

    #[error("request {id} expired at {expired_at_nanos}, current time {now_nanos}")]
    RequestExpired { id: u64, expired_at_nanos: u64, now_nanos: u64 },

    #[error("participant {participant} is not authorized for request {id}")]
    UnauthorizedParticipant { id: u64, participant: String },

    #[error("completion already exists: request {id}, participant {participant}")]
    CompletionAlreadyExists { id: u64, participant: String },

    #[error("handler already registered for module {module}")]
    HandlerAlreadyRegistered { module: String },

    #[error("generated key batch size mismatch: expected {expected}, got {actual}")]
    BatchSizeMismatch { expected: usize, actual: usize },

    #[error("signature count mismatch: expected {expected}, got {actual}")]
    SignatureCountMismatch { expected: usize, actual: usize },

    #[error("malformed {scheme} signature at index {index}: expected {expected_len} bytes, got {actual_len}")]
    MalformedSignature { scheme: &'static str, index: usize, expected_len: usize, actual_len: usize },

    #[error("malformed key during {context}: {details}")]
    MalformedKey { context: &'static str, details: String },

    #[error("signature verification failed during {context}: {details}")]
    VerificationFailed { context: &'static str, details: String },

    #[error("precommitted nonce mismatch at signature index {index}")]
    NonceCommitmentMismatch { index: usize },

    #[error("too few participants: {count} (minimum {min})")]
    TooFewParticipants { count: usize, min: u32 },

    #[error("threshold {threshold} below minimum {min}")]
    ThresholdTooLow { threshold: u32, min: u32 },

    #[error("threshold {threshold} exceeds participant count {participants}")]
    ThresholdExceedsParticipants { threshold: u32, participants: usize },

    #[error("threshold {threshold} below {num}/{den} of participant count {participants}")]
    ThresholdRatioNotMet { threshold: u32, participants: usize, num: u32, den: u32 },

    #[error("removed participant {participant} does not belong to dkg request {dkg_id}")]
    RemovedParticipantUnknown { dkg_id: u64, participant: String },

    #[error("remaining participant count {remaining} below minimum {min}")]
    InsufficientRemainingParticipants { remaining: usize, min: u32 },

    #[error("remaining participant count {remaining} below new threshold {threshold}")]
    RemainingBelowThreshold { remaining: usize, threshold: u32 },

    #[error("invalid ceremony params: {details}")]
    InvalidParams { details: String },

    #[error("handler for module {module} rejected the operation: {details}")]
    HandlerRejected { module: String, details: String },

    #[error("storage error during {operation}: {details}")]
    StorageError { operation: String, details: String },

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },
}

pub type Result<T> = std::result::Result<T, CeremonyError>;

impl CeremonyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CeremonyError::DkgRequestNotFound { .. }
            | CeremonyError::SigningRequestNotFound { .. }
            | CeremonyError::RefreshingRequestNotFound { .. }
            | CeremonyError::HandlerNotFound { .. } => ErrorCode::NotFound,
            CeremonyError::InvalidStatus { .. } | CeremonyError::InvalidStatusTransition { .. } => ErrorCode::InvalidState,
            CeremonyError::RequestExpired { .. } => ErrorCode::Expired,
            CeremonyError::UnauthorizedParticipant { .. } => ErrorCode::Unauthorized,
            CeremonyError::CompletionAlreadyExists { .. } | CeremonyError::HandlerAlreadyRegistered { .. } => ErrorCode::AlreadyExists,
            CeremonyError::BatchSizeMismatch { .. }
            | CeremonyError::SignatureCountMismatch { .. }
            | CeremonyError::MalformedSignature { .. }
            | CeremonyError::MalformedKey { .. } => ErrorCode::MalformedInput,
            CeremonyError::VerificationFailed { .. } | CeremonyError::NonceCommitmentMismatch { .. } => ErrorCode::VerificationFailed,
            CeremonyError::TooFewParticipants { .. }
            | CeremonyError::ThresholdTooLow { .. }
            | CeremonyError::ThresholdExceedsParticipants { .. }
            | CeremonyError::ThresholdRatioNotMet { .. }
            | CeremonyError::RemovedParticipantUnknown { .. }
            | CeremonyError::InsufficientRemainingParticipants { .. }
            | CeremonyError::RemainingBelowThreshold { .. }
            | CeremonyError::InvalidParams { .. } => ErrorCode::PolicyViolation,
            CeremonyError::HandlerRejected { .. } => ErrorCode::HandlerRejected,
            CeremonyError::StorageError { .. } => ErrorCode::Storage,
            CeremonyError::SerializationError { .. } => ErrorCode::Serialization,
        }
    }
}

impl From<hex::FromHexError> for CeremonyError {
    fn from(err: hex::FromHexError) -> Self {
        CeremonyError::MalformedKey { context: "hex decode", details: err.to_string() }
    }
}

impl From<bincode::Error> for CeremonyError {
    fn from(err: bincode::Error) -> Self {
        CeremonyError::SerializationError { format: "bincode".to_string(), details: err.to_string() }
    }
}

#[macro_export]
macro_rules! storage_err {
    ($op:expr, $err:expr) => {
        $crate::foundation::CeremonyError::StorageError { operation: $op.into(), details: $err.to_string() }
    };
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `CeremonyError` variants at the call site to preserve context.
