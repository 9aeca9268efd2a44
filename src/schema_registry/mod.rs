//! Static per-(version, direction, action) payload schemas and the
//! validator that checks a translated (snake_case) payload against one.
//!
//! Schemas here are plain Rust data rather than compiled JSON Schema: the
//! original crate this one grew from compiles `include_str!`'d JSON Schema
//! files via `jsonschema::JSONSchema`, but those schema files aren't part of
//! this codebase's source tree, and a hand-written `PayloadSchema` table is
//! the direct way to satisfy "static tables compiled into the binary"
//! without inventing schema files that don't exist anywhere else.

pub mod actions;
pub mod authentication_list_management;
pub mod core;
pub mod firmware_management;
pub mod smart_charging;

use std::collections::HashMap;

use serde_json::Value;
use tracing::{trace, warn};

pub use actions::{Action, Direction, OcppVersion};

/// A validation failure tagged with the validator that raised it, so callers
/// can map it to a wire error code (see [`crate::error::OcppError::from`]).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub validator: &'static str,
    pub message: String,
}

impl ValidationFailure {
    fn new(validator: &'static str, message: impl Into<String>) -> Self {
        Self { validator, message: message.into() }
    }
}

/// One property's declared shape within a [`PayloadSchema`].
#[derive(Debug, Clone)]
pub enum TypeSpec {
    Integer,
    Float,
    Boolean,
    String { max_length: Option<usize> },
    Enum(&'static [&'static str]),
    Nested(&'static PayloadSchema),
    List(&'static TypeSpec),
}

/// The schema for one action's request or response payload: which
/// properties are required, and the declared type of every known property.
#[derive(Debug, Clone)]
pub struct PayloadSchema {
    pub required: &'static [&'static str],
    pub properties: &'static [(&'static str, TypeSpec)],
}

impl PayloadSchema {
    fn property(&self, name: &str) -> Option<&TypeSpec> {
        self.properties.iter().find(|(n, _)| *n == name).map(|(_, t)| t)
    }

    /// Validates `payload` against this schema: required properties present,
    /// no unknown properties, and every present value matching its declared
    /// type. Recurses into nested objects and lists.
    pub fn validate(&self, payload: &serde_json::Map<String, Value>) -> Result<(), ValidationFailure> {
        for name in self.required {
            if !payload.contains_key(*name) {
                let failure = ValidationFailure::new(
                    "required",
                    format!("'{}' is a required property", name),
                );
                warn!(validator = failure.validator, message = %failure.message, "schema validation failed");
                return Err(failure);
            }
        }

        for key in payload.keys() {
            if self.property(key).is_none() {
                let failure = ValidationFailure::new(
                    "additionalProperties",
                    format!("additional properties are not allowed ('{}' was unexpected)", key),
                );
                warn!(validator = failure.validator, message = %failure.message, "schema validation failed");
                return Err(failure);
            }
        }

        for (key, value) in payload {
            // Presence in `properties` was just confirmed above.
            let spec = self.property(key).expect("checked above");
            validate_value(key, value, spec)?;
        }

        trace!(properties = payload.len(), "schema validation succeeded");
        Ok(())
    }
}

fn validate_value(key: &str, value: &Value, spec: &TypeSpec) -> Result<(), ValidationFailure> {
    match spec {
        TypeSpec::Integer => {
            if !value.is_i64() && !value.is_u64() {
                return Err(type_failure(key, "integer", value));
            }
        }
        TypeSpec::Float => {
            // A float property with a fractional "multipleOf" constraint is
            // informational only — not enforced here, to avoid rejecting
            // valid values on floating-point representation artifacts.
            if !value.is_number() {
                return Err(type_failure(key, "number", value));
            }
        }
        TypeSpec::Boolean => {
            if !value.is_boolean() {
                return Err(type_failure(key, "boolean", value));
            }
        }
        TypeSpec::String { max_length } => {
            let Some(s) = value.as_str() else {
                return Err(type_failure(key, "string", value));
            };
            if let Some(max) = max_length {
                if s.chars().count() > *max {
                    let failure = ValidationFailure::new(
                        "maxLength",
                        format!("'{}' is longer than {} characters", key, max),
                    );
                    warn!(validator = failure.validator, message = %failure.message, "schema validation failed");
                    return Err(failure);
                }
            }
        }
        TypeSpec::Enum(allowed) => {
            let Some(s) = value.as_str() else {
                return Err(type_failure(key, "string", value));
            };
            if !allowed.contains(&s) {
                let failure = ValidationFailure::new(
                    "enum",
                    format!("'{}' is not one of {:?}", s, allowed),
                );
                warn!(validator = failure.validator, message = %failure.message, "schema validation failed");
                return Err(failure);
            }
        }
        TypeSpec::Nested(nested) => {
            let Some(obj) = value.as_object() else {
                return Err(type_failure(key, "object", value));
            };
            nested.validate(obj)?;
        }
        TypeSpec::List(item_spec) => {
            let Some(items) = value.as_array() else {
                return Err(type_failure(key, "array", value));
            };
            for item in items {
                validate_value(key, item, item_spec)?;
            }
        }
    }
    Ok(())
}

fn type_failure(key: &str, expected: &str, actual: &Value) -> ValidationFailure {
    let failure = ValidationFailure::new(
        "type",
        format!("'{}' is not of type '{}' (got {})", key, expected, actual),
    );
    warn!(validator = failure.validator, message = %failure.message, "schema validation failed");
    failure
}

/// Looks up the schema for `action`'s request or response payload under
/// `version`. `None` means the action has no schema registered under this
/// registry — callers use [`actions::Action::is_known_in`] to distinguish
/// "known action, schema not modeled here" from "action doesn't exist".
pub fn lookup(version: OcppVersion, action: Action, direction: Direction) -> Option<&'static PayloadSchema> {
    SCHEMA_TABLE.get(&(version, action, direction))
}

type SchemaKey = (OcppVersion, Action, Direction);

lazy_static::lazy_static! {
    static ref SCHEMA_TABLE: HashMap<SchemaKey, &'static PayloadSchema> = {
        let mut table = HashMap::new();
        core::register(&mut table);
        firmware_management::register(&mut table);
        smart_charging::register(&mut table);
        authentication_list_management::register(&mut table);
        table
    };
}

/// Every property name that appears anywhere in the compiled schema
/// registry, request or response, top-level or nested. Used by
/// [`crate::translate`]'s round-trip property test, which checks the
/// key-case translator against the actual key universe the schemas define
/// rather than arbitrary strings.
pub fn all_known_keys() -> Vec<&'static str> {
    let mut keys = Vec::new();
    for schema in SCHEMA_TABLE.values() {
        collect_keys(schema, &mut keys);
    }
    keys.sort_unstable();
    keys.dedup();
    keys
}

fn collect_keys(schema: &'static PayloadSchema, out: &mut Vec<&'static str>) {
    for (name, spec) in schema.properties {
        out.push(name);
        collect_type_keys(spec, out);
    }
}

fn collect_type_keys(spec: &'static TypeSpec, out: &mut Vec<&'static str>) {
    match spec {
        TypeSpec::Nested(nested) => collect_keys(nested, out),
        TypeSpec::List(item) => collect_type_keys(item, out),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_required_property_fails_with_required_validator() {
        let schema = lookup(OcppVersion::V1_6, Action::BootNotification, Direction::Request).unwrap();
        let payload = json!({"charge_point_vendor": "X"}).as_object().unwrap().clone();
        let err = schema.validate(&payload).unwrap_err();
        assert_eq!(err.validator, "required");
    }

    #[test]
    fn unknown_property_fails_with_additional_properties_validator() {
        let schema = lookup(OcppVersion::V1_6, Action::Heartbeat, Direction::Request).unwrap();
        let payload = json!({"unexpected": 1}).as_object().unwrap().clone();
        let err = schema.validate(&payload).unwrap_err();
        assert_eq!(err.validator, "additionalProperties");
    }

    #[test]
    fn wrong_type_fails_with_type_validator() {
        let schema = lookup(OcppVersion::V1_6, Action::ChangeAvailability, Direction::Request).unwrap();
        let payload = json!({"connector_id": "not-a-number", "type": "Operative"})
            .as_object()
            .unwrap()
            .clone();
        let err = schema.validate(&payload).unwrap_err();
        assert_eq!(err.validator, "type");
    }

    #[test]
    fn enum_violation_fails_with_enum_validator() {
        let schema = lookup(OcppVersion::V1_6, Action::ChangeAvailability, Direction::Request).unwrap();
        let payload = json!({"connector_id": 1, "type": "Bogus"}).as_object().unwrap().clone();
        let err = schema.validate(&payload).unwrap_err();
        assert_eq!(err.validator, "enum");
    }

    #[test]
    fn nested_object_validates_recursively() {
        let schema = lookup(OcppVersion::V1_6, Action::MeterValues, Direction::Request).unwrap();
        let payload = json!({
            "connector_id": 1,
            "meter_value": [
                {"timestamp": "2013-02-01T20:53:32.486Z", "sampled_value": [{"value": "1"}]}
            ]
        })
        .as_object()
        .unwrap()
        .clone();
        assert!(schema.validate(&payload).is_ok());
    }

    #[test]
    fn valid_boot_notification_payload_passes() {
        let schema = lookup(OcppVersion::V1_6, Action::BootNotification, Direction::Request).unwrap();
        let payload = json!({
            "charge_point_vendor": "VendorX",
            "charge_point_model": "SingleSocketCharger",
        })
        .as_object()
        .unwrap()
        .clone();
        assert!(schema.validate(&payload).is_ok());
    }

    #[test]
    fn max_length_violation_fails_with_max_length_validator() {
        let schema = lookup(OcppVersion::V1_6, Action::BootNotification, Direction::Request).unwrap();
        let too_long: String = std::iter::repeat('x').take(30).collect();
        let payload = json!({
            "charge_point_vendor": too_long,
            "charge_point_model": "SingleSocketCharger",
        })
        .as_object()
        .unwrap()
        .clone();
        let err = schema.validate(&payload).unwrap_err();
        assert_eq!(err.validator, "maxLength");
    }
}
