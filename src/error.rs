//! The OCPP-J error taxonomy.
//!
//! Every fallible operation in this crate funnels into [`OcppError`]. A
//! subset of variants correspond 1:1 with the wire error codes from the
//! OCPP 1.6 specification ([`ErrorCode`]); the rest (`Timeout`,
//! `UnknownCallErrorCode`, `TransportClosed`) are raised only to an
//! outbound caller and never appear on the wire.

use serde_json::Value;
use strum_macros::{Display, EnumString};

use crate::schema_registry::ValidationFailure;

/// The exact wire strings for OCPP 1.6 CallError codes, including the two
/// historical misspellings OCPP 1.6 retains for compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ErrorCode {
    NotImplemented,
    NotSupported,
    InternalError,
    ProtocolError,
    SecurityError,
    #[strum(serialize = "FormationViolation")]
    FormationViolation,
    PropertyConstraintViolation,
    #[strum(serialize = "OccurenceConstraintViolation")]
    OccurenceConstraintViolation,
    TypeConstraintViolation,
    GenericError,
}

impl ErrorCode {
    /// Default human-readable description, ported from each OCPP error's
    /// `default_description`.
    pub fn default_description(self) -> &'static str {
        match self {
            ErrorCode::NotImplemented => {
                "Request Action is recognized but not supported by the receiver"
            }
            ErrorCode::NotSupported => "Requested Action is not known by receiver",
            ErrorCode::InternalError => {
                // Verbatim from the implementation this protocol is modeled on, "not" and all —
                // kept rather than silently corrected.
                "An internal error occurred and the receiver was able to process \
                 the requested Action successfully"
            }
            ErrorCode::ProtocolError => "Payload for Action is incomplete",
            ErrorCode::SecurityError => {
                "During the processing of Action a security issue occurred preventing \
                 receiver from completing the Action successfully"
            }
            ErrorCode::FormationViolation => {
                "Payload for Action is syntactically incorrect or structure for Action"
            }
            ErrorCode::PropertyConstraintViolation => {
                "Payload is syntactically correct but at least one field contains an \
                 invalid value"
            }
            ErrorCode::OccurenceConstraintViolation => {
                "Payload for Action is syntactically correct but at least one of the \
                 fields violates occurence constraints"
            }
            ErrorCode::TypeConstraintViolation => {
                "Payload for Action is syntactically correct but at least one of the \
                 fields violates data type constraints (e.g. \"somestring\": 12)"
            }
            ErrorCode::GenericError => "Any other error not all other OCPP defined errors",
        }
    }
}

/// A CallError's three wire fields, decoupled from [`OcppError`] so a
/// `Call` can build one without round-tripping through a `Result`.
#[derive(Debug, Clone, PartialEq)]
pub struct WireError {
    pub code: ErrorCode,
    pub description: String,
    pub details: serde_json::Map<String, Value>,
}

impl WireError {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            description: code.default_description().to_string(),
            code,
            details: serde_json::Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_details(mut self, details: serde_json::Map<String, Value>) -> Self {
        self.details = details;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OcppError {
    /// Decoded bytes were not valid JSON, or decoded JSON was not an array.
    #[error("message is not valid OCPP-J: {0}")]
    FormatViolation(String),

    /// A JSON array was missing the message-type id or had the wrong
    /// arity for the message type it claimed to be.
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// The message-type id at index 0 was not 2, 3, or 4.
    #[error("unrecognized message type id: {0}")]
    PropertyConstraintViolation(String),

    /// A schema validation failure, still carrying the validator tag so
    /// callers can map it per the validator-tag table below.
    #[error("validation failed ({validator}): {message}")]
    ValidationFailed { validator: &'static str, message: String },

    /// No handler is registered for an action this session's OCPP
    /// version defines.
    #[error("No handler for {0} registered.")]
    NotImplemented(String),

    /// The action is not part of this session's OCPP version at all.
    #[error("{action} not supported by OCPP{version}.")]
    NotSupported { action: String, version: String },

    /// A handler raised an error outside the OCPP taxonomy.
    #[error("internal error: {0}")]
    InternalError(String),

    /// `on_action` was already registered for this action.
    #[error("on_action handler already registered for action {0:?}")]
    DuplicateHandler(String),

    /// A reconstructed wire-level CallError, surfaced to an outbound
    /// caller that did not request suppression.
    #[error("received CallError {}: {}", .0.code, .0.description)]
    Remote(WireError),

    /// A CallError carried a code outside the OCPP taxonomy.
    #[error("unknown CallError code: {0:?}")]
    UnknownCallErrorCode(String),

    /// The outbound call's deadline elapsed with no correlated response.
    #[error("timed out waiting for a response")]
    Timeout,

    /// The transport closed (or the session shut down) while a call was
    /// outstanding.
    #[error("transport closed")]
    TransportClosed,
}

impl OcppError {
    /// Maps this error onto a wire `CallError`, defaulting to
    /// `InternalError` for anything outside the taxonomy — mirrors
    /// `Call.create_call_error` in the implementation this protocol is modeled on.
    pub fn to_wire_error(&self) -> WireError {
        match self.code() {
            Some(code) => {
                let mut wire = WireError::new(code);
                wire.description = self.to_string();
                wire
            }
            None => WireError::new(ErrorCode::InternalError)
                .with_description("An unexpected error occurred."),
        }
    }

    /// The wire error code this variant corresponds to, if any. Variants
    /// that never reach the wire (`Timeout`, `UnknownCallErrorCode`,
    /// `TransportClosed`, `DuplicateHandler`) return `None`.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            OcppError::FormatViolation(_) => Some(ErrorCode::FormationViolation),
            OcppError::ProtocolError(_) => Some(ErrorCode::ProtocolError),
            OcppError::PropertyConstraintViolation(_) => {
                Some(ErrorCode::PropertyConstraintViolation)
            }
            OcppError::ValidationFailed { validator, .. } => Some(map_validator_tag(validator)),
            OcppError::NotImplemented(_) => Some(ErrorCode::NotImplemented),
            OcppError::NotSupported { .. } => Some(ErrorCode::NotSupported),
            OcppError::InternalError(_) => Some(ErrorCode::InternalError),
            OcppError::DuplicateHandler(_) => None,
            OcppError::Remote(wire) => Some(wire.code),
            OcppError::UnknownCallErrorCode(_) => None,
            OcppError::Timeout => None,
            OcppError::TransportClosed => None,
        }
    }

    /// Reconstructs the exception a CallError's code corresponds to,
    /// mirroring `CallError.to_exception` in the implementation this protocol is modeled on.
    pub fn from_wire_error(wire: WireError) -> Self {
        OcppError::Remote(wire)
    }
}

impl From<ValidationFailure> for OcppError {
    fn from(failure: ValidationFailure) -> Self {
        OcppError::ValidationFailed {
            validator: failure.validator,
            message: failure.message,
        }
    }
}

/// Maps a [`ValidationFailure`]'s validator tag to a wire error code:
/// `type`/`maxLength` → TypeConstraintViolation, `additionalProperties` →
/// FormatViolation, `required` → ProtocolError, anything else →
/// FormatViolation.
fn map_validator_tag(validator: &str) -> ErrorCode {
    match validator {
        "type" | "maxLength" => ErrorCode::TypeConstraintViolation,
        "additionalProperties" => ErrorCode::FormationViolation,
        "required" => ErrorCode::ProtocolError,
        _ => ErrorCode::FormationViolation,
    }
}

/// Parses a wire error code string, used when reconstructing an
/// [`OcppError`] from a received CallError.
pub fn parse_error_code(code: &str) -> Result<ErrorCode, OcppError> {
    code.parse()
        .map_err(|_| OcppError::UnknownCallErrorCode(code.to_string()))
}
