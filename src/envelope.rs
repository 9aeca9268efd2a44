//! The three OCPP-J message kinds and their wire (de)serialization.
//!
//! Ported from `messages.py`: `unpack`
//! classifies a JSON array by its message-type id and arity, `Call`'s
//! `create_call_result`/`create_call_error` build the correlated response.

use serde_json::Value;

use crate::error::OcppError;

/// `unique_id` is treated as an opaque string throughout the engine; callers
/// that want version-4 UUIDs generate them with the `uuid` crate (see
/// [`crate::session`]).
pub type UniqueId = String;

/// A decoded or to-be-encoded OCPP-J message.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Call { unique_id: UniqueId, action: String, payload: serde_json::Map<String, Value> },
    CallResult { unique_id: UniqueId, payload: serde_json::Map<String, Value> },
    CallError {
        unique_id: UniqueId,
        error_code: String,
        error_description: String,
        error_details: serde_json::Map<String, Value>,
    },
}

impl Envelope {
    pub fn unique_id(&self) -> &str {
        match self {
            Envelope::Call { unique_id, .. } => unique_id,
            Envelope::CallResult { unique_id, .. } => unique_id,
            Envelope::CallError { unique_id, .. } => unique_id,
        }
    }

    /// Decodes one OCPP-J frame. Fails with `FormatViolation` if `frame` is
    /// not valid JSON, `ProtocolError` if it's not an array or is missing
    /// elements for the message type it claims, `PropertyConstraintViolation`
    /// if the message-type id isn't 2, 3, or 4.
    pub fn decode(frame: &str) -> Result<Self, OcppError> {
        let value: Value = serde_json::from_str(frame)
            .map_err(|e| OcppError::FormatViolation(format!("message is not valid JSON: {e}")))?;

        let elements = value
            .as_array()
            .ok_or_else(|| OcppError::ProtocolError("message must be a JSON array".to_string()))?;

        let message_type_id = elements
            .first()
            .and_then(Value::as_u64)
            .ok_or_else(|| OcppError::ProtocolError("message does not contain a MessageTypeId".to_string()))?;

        match message_type_id {
            2 => {
                let [_, unique_id, action, payload] = take4(elements)
                    .ok_or_else(|| OcppError::ProtocolError("Call message is missing elements".to_string()))?;
                Ok(Envelope::Call {
                    unique_id: as_string(unique_id)?,
                    action: as_string(action)?,
                    payload: as_object(payload)?,
                })
            }
            3 => {
                let [_, unique_id, payload] = take3(elements)
                    .ok_or_else(|| OcppError::ProtocolError("CallResult message is missing elements".to_string()))?;
                Ok(Envelope::CallResult { unique_id: as_string(unique_id)?, payload: as_object(payload)? })
            }
            4 => {
                let [_, unique_id, error_code, error_description, error_details] = take5(elements)
                    .ok_or_else(|| OcppError::ProtocolError("CallError message is missing elements".to_string()))?;
                Ok(Envelope::CallError {
                    unique_id: as_string(unique_id)?,
                    error_code: as_string(error_code)?,
                    error_description: as_string(error_description)?,
                    error_details: as_object(error_details)?,
                })
            }
            other => Err(OcppError::PropertyConstraintViolation(format!(
                "MessageTypeId '{other}' isn't valid"
            ))),
        }
    }

    /// Serializes this envelope to its canonical JSON array form.
    pub fn encode(&self) -> String {
        let value = match self {
            Envelope::Call { unique_id, action, payload } => {
                Value::Array(vec![Value::from(2), Value::from(unique_id.clone()), Value::from(action.clone()), Value::Object(payload.clone())])
            }
            Envelope::CallResult { unique_id, payload } => {
                Value::Array(vec![Value::from(3), Value::from(unique_id.clone()), Value::Object(payload.clone())])
            }
            Envelope::CallError { unique_id, error_code, error_description, error_details } => Value::Array(vec![
                Value::from(4),
                Value::from(unique_id.clone()),
                Value::from(error_code.clone()),
                Value::from(error_description.clone()),
                Value::Object(error_details.clone()),
            ]),
        };
        value.to_string()
    }

    /// Builds a CallResult correlated with this Call, ready to translate
    /// and validate before sending. Panics if called on a non-`Call`
    /// variant — this mirrors `Call.create_call_result`, which is only
    /// ever invoked on a `Call`.
    pub fn into_call_result(&self, payload: serde_json::Map<String, Value>) -> Envelope {
        match self {
            Envelope::Call { unique_id, .. } => {
                Envelope::CallResult { unique_id: unique_id.clone(), payload }
            }
            other => panic!("into_call_result called on non-Call envelope: {other:?}"),
        }
    }

    /// Builds a CallError correlated with this Call from an [`OcppError`],
    /// defaulting to `InternalError` / "An unexpected error occurred." / `{}`
    /// when `error` carries no wire code, mirroring
    /// `Call.create_call_error` in the implementation this protocol is modeled on.
    pub fn into_call_error(&self, error: &OcppError) -> Envelope {
        match self {
            Envelope::Call { unique_id, .. } => {
                let wire = error.to_wire_error();
                Envelope::CallError {
                    unique_id: unique_id.clone(),
                    error_code: wire.code.to_string(),
                    error_description: wire.description,
                    error_details: wire.details,
                }
            }
            other => panic!("into_call_error called on non-Call envelope: {other:?}"),
        }
    }
}

fn as_string(value: &Value) -> Result<String, OcppError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| OcppError::ProtocolError(format!("expected a string, got {value}")))
}

fn as_object(value: &Value) -> Result<serde_json::Map<String, Value>, OcppError> {
    value
        .as_object()
        .cloned()
        .ok_or_else(|| OcppError::ProtocolError(format!("expected an object, got {value}")))
}

fn take3(elements: &[Value]) -> Option<[&Value; 3]> {
    match elements {
        [a, b, c] => Some([a, b, c]),
        _ => None,
    }
}

fn take4(elements: &[Value]) -> Option<[&Value; 4]> {
    match elements {
        [a, b, c, d] => Some([a, b, c, d]),
        _ => None,
    }
}

fn take5(elements: &[Value]) -> Option<[&Value; 5]> {
    match elements {
        [a, b, c, d, e] => Some([a, b, c, d, e]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_call() {
        let frame = r#"[2,"19223201","BootNotification",{"chargePointVendor":"VendorX","chargePointModel":"SingleSocketCharger"}]"#;
        let envelope = Envelope::decode(frame).unwrap();
        assert_eq!(
            envelope,
            Envelope::Call {
                unique_id: "19223201".to_string(),
                action: "BootNotification".to_string(),
                payload: json!({"chargePointVendor":"VendorX","chargePointModel":"SingleSocketCharger"})
                    .as_object()
                    .unwrap()
                    .clone(),
            }
        );
    }

    #[test]
    fn decodes_call_result() {
        let frame = r#"[3,"19223201",{"status":"Accepted"}]"#;
        let envelope = Envelope::decode(frame).unwrap();
        assert_eq!(
            envelope,
            Envelope::CallResult {
                unique_id: "19223201".to_string(),
                payload: json!({"status":"Accepted"}).as_object().unwrap().clone(),
            }
        );
    }

    #[test]
    fn decodes_call_error() {
        let frame = r#"[4,"u-1","NotImplemented","No handler.",{}]"#;
        let envelope = Envelope::decode(frame).unwrap();
        assert_eq!(
            envelope,
            Envelope::CallError {
                unique_id: "u-1".to_string(),
                error_code: "NotImplemented".to_string(),
                error_description: "No handler.".to_string(),
                error_details: serde_json::Map::new(),
            }
        );
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(Envelope::decode("not json"), Err(OcppError::FormatViolation(_))));
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(Envelope::decode(r#"{"a":1}"#), Err(OcppError::ProtocolError(_))));
    }

    #[test]
    fn rejects_unknown_message_type_id() {
        assert!(matches!(
            Envelope::decode(r#"[9,"u-1"]"#),
            Err(OcppError::PropertyConstraintViolation(_))
        ));
    }

    #[test]
    fn rejects_short_array() {
        assert!(matches!(Envelope::decode(r#"[2,"u-1"]"#), Err(OcppError::ProtocolError(_))));
    }

    #[test]
    fn encode_decode_round_trip_is_key_set_and_value_equal() {
        let original = Envelope::Call {
            unique_id: "u-1".to_string(),
            action: "Heartbeat".to_string(),
            payload: serde_json::Map::new(),
        };
        let decoded = Envelope::decode(&original.encode()).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn call_result_carries_the_calls_unique_id() {
        let call = Envelope::Call {
            unique_id: "u-42".to_string(),
            action: "Heartbeat".to_string(),
            payload: serde_json::Map::new(),
        };
        let result = call.into_call_result(json!({"currentTime":"2013-02-01T20:53:32.486Z"}).as_object().unwrap().clone());
        assert_eq!(result.unique_id(), "u-42");
    }

    #[test]
    fn call_error_defaults_for_non_taxonomy_errors() {
        let call = Envelope::Call {
            unique_id: "u-7".to_string(),
            action: "Heartbeat".to_string(),
            payload: serde_json::Map::new(),
        };
        let error = call.into_call_error(&OcppError::DuplicateHandler("Foo".to_string()));
        match error {
            Envelope::CallError { error_code, error_description, .. } => {
                assert_eq!(error_code, "InternalError");
                assert_eq!(error_description, "An unexpected error occurred.");
            }
            other => panic!("expected CallError, got {other:?}"),
        }
    }
}
