//! Common error infrastructure for tileworld-core.
//!
//! Domain-specific errors (collision, spawning, battle actions) are defined
//! in their respective modules alongside the operations they validate. This
//! module provides the shared severity taxonomy and the [`GameError`] trait
//! they all implement.

use crate::state::{ThingId, Tick};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: expected per-tick races; silently ignorable
/// - **Validation**: invalid input rejected at the call boundary; caller re-prompts
/// - **Internal**: unexpected state inconsistency that indicates a bug
/// - **Fatal**: bad authored content; processing for the affected thing stops
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the caller may retry or simply continue.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - authored content is broken; not recoverable mid-tick.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Debugging context attached to errors raised during a tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Logical tick at which the error occurred.
    pub tick: Tick,

    /// Thing being processed when the error occurred, if any.
    pub thing: Option<ThingId>,

    /// Optional free-form description.
    pub message: Option<String>,
}

impl ErrorContext {
    /// Creates a context for the given tick.
    pub fn new(tick: Tick) -> Self {
        Self {
            tick,
            thing: None,
            message: None,
        }
    }

    /// Attaches the thing being processed.
    pub fn with_thing(mut self, thing: ThingId) -> Self {
        self.thing = Some(thing);
        self
    }

    /// Attaches a free-form message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Common behavior for all tileworld-core error types.
pub trait GameError: std::error::Error {
    /// Severity classification for recovery decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Stable machine-readable code for logs and event payloads.
    fn error_code(&self) -> &'static str;

    /// Debugging context, when the error carries one.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }
}

/// Errors caused by broken authored content (maps, things, battle data).
///
/// These are fatal by definition: they indicate a content-authoring bug, not
/// a transient runtime condition, and are surfaced rather than recovered.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentError {
    /// A transporter was activated without a transport target.
    #[error("no transport target on thing {0}")]
    MissingTransport(ThingId),

    /// A detector referenced a map the library does not know.
    #[error("unknown map {0:?}")]
    UnknownMap(String),

    /// A detector referenced an area missing from its map.
    #[error("unknown area {area:?} in map {map:?}")]
    UnknownArea { map: String, area: String },

    /// A location name did not resolve within the active map.
    #[error("unknown location {location:?} in map {map:?}")]
    UnknownLocation { map: String, location: String },

    /// A detector thing carries no detector role.
    #[error("thing {0} has no detector role")]
    MissingDetector(ThingId),

    /// A battle actor referenced a species the oracle does not know.
    #[error("unknown species {0:?}")]
    UnknownSpecies(String),

    /// A move title did not resolve against the move oracle.
    #[error("unknown move {0:?}")]
    UnknownMove(String),
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingTransport(_) => "CONTENT_MISSING_TRANSPORT",
            Self::UnknownMap(_) => "CONTENT_UNKNOWN_MAP",
            Self::UnknownArea { .. } => "CONTENT_UNKNOWN_AREA",
            Self::UnknownLocation { .. } => "CONTENT_UNKNOWN_LOCATION",
            Self::MissingDetector(_) => "CONTENT_MISSING_DETECTOR",
            Self::UnknownSpecies(_) => "CONTENT_UNKNOWN_SPECIES",
            Self::UnknownMove(_) => "CONTENT_UNKNOWN_MOVE",
        }
    }
}
