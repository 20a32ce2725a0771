use crate::shape::ShapeFamily;
use thiserror::Error;

/// Legality failures from the rule engine (C3). These are the reasons a candidate `Play` can
/// be rejected against the current field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("it is not this seat's turn to act")]
    NotPlayersTurn,

    #[error("the play references cards not held by this seat")]
    CardsNotInHand,

    #[error("the submitted cards do not form a recognized shape")]
    InvalidShape,

    #[error("play shape does not match the field (expected {expected_family:?} of size {expected_size}, got {actual_family:?} of size {actual_size})")]
    ShapeDoesNotMatchField {
        expected_family: ShapeFamily,
        expected_size: u8,
        actual_family: ShapeFamily,
        actual_size: u8,
    },

    #[error("play does not outrank the current field")]
    PlayTooWeak,

    #[error("play uses a suit not present in the active suit-lock")]
    SuitLockViolated,

    #[error("a player who has already finished cannot act")]
    FinishedPlayerCannotAct,
}

/// Wire-level failures from the protocol codec (C5).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("expected a {expected}-byte matrix frame, got {actual} bytes")]
    UnexpectedFrameLength { expected: usize, actual: usize },

    #[error("unsupported protocol version: expected {expected}, received {received}")]
    UnsupportedProtocolVersion { expected: u32, received: u32 },

    #[error("matrix frame failed validation: {0}")]
    MalformedMatrix(String),

    #[error("no response received within the read timeout")]
    Timeout,

    #[error("connection closed by peer")]
    ConnectionClosed,
}

/// Top-level failures from the session coordinator (C6), wrapping the lower layers.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("rule violation: {0}")]
    Rule(#[from] RuleViolation),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("journal serialization error: {0}")]
    Journal(#[from] serde_json::Error),

    #[error("expected exactly {expected} players, got {actual}")]
    PlayerCountMismatch { expected: usize, actual: usize },

    #[error("session aborted: {0}")]
    SessionAborted(String),
}
