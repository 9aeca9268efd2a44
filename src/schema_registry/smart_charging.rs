//! SmartCharging profile payload schemas.

use std::collections::HashMap;

use super::{Action, Direction, OcppVersion, PayloadSchema, SchemaKey, TypeSpec};

static CHARGING_SCHEDULE_PERIOD: PayloadSchema = PayloadSchema {
    required: &["start_period", "limit"],
    properties: &[
        ("start_period", TypeSpec::Integer),
        ("limit", TypeSpec::Float),
        ("number_phases", TypeSpec::Integer),
    ],
};

static CHARGING_SCHEDULE: PayloadSchema = PayloadSchema {
    required: &["charging_rate_unit", "charging_schedule_period"],
    properties: &[
        ("duration", TypeSpec::Integer),
        ("start_schedule", TypeSpec::String { max_length: None }),
        ("charging_rate_unit", TypeSpec::Enum(&["A", "W"])),
        ("charging_schedule_period", TypeSpec::List(&TypeSpec::Nested(&CHARGING_SCHEDULE_PERIOD))),
        ("min_charging_rate", TypeSpec::Float),
    ],
};

static CHARGING_PROFILE: PayloadSchema = PayloadSchema {
    required: &[
        "charging_profile_id",
        "stack_level",
        "charging_profile_purpose",
        "charging_profile_kind",
        "charging_schedule",
    ],
    properties: &[
        ("charging_profile_id", TypeSpec::Integer),
        ("transaction_id", TypeSpec::Integer),
        ("stack_level", TypeSpec::Integer),
        (
            "charging_profile_purpose",
            TypeSpec::Enum(&["ChargePointMaxProfile", "TxDefaultProfile", "TxProfile"]),
        ),
        ("charging_profile_kind", TypeSpec::Enum(&["Absolute", "Recurring", "Relative"])),
        ("recurrency_kind", TypeSpec::Enum(&["Daily", "Weekly"])),
        ("valid_from", TypeSpec::String { max_length: None }),
        ("valid_to", TypeSpec::String { max_length: None }),
        ("charging_schedule", TypeSpec::Nested(&CHARGING_SCHEDULE)),
    ],
};

static SET_CHARGING_PROFILE_REQUEST: PayloadSchema = PayloadSchema {
    required: &["connector_id", "cs_charging_profiles"],
    properties: &[
        ("connector_id", TypeSpec::Integer),
        ("cs_charging_profiles", TypeSpec::Nested(&CHARGING_PROFILE)),
    ],
};

static SET_CHARGING_PROFILE_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[("status", TypeSpec::Enum(&["Accepted", "Rejected", "NotSupported"]))],
};

static CLEAR_CHARGING_PROFILE_REQUEST: PayloadSchema = PayloadSchema {
    required: &[],
    properties: &[
        ("id", TypeSpec::Integer),
        ("connector_id", TypeSpec::Integer),
        (
            "charging_profile_purpose",
            TypeSpec::Enum(&["ChargePointMaxProfile", "TxDefaultProfile", "TxProfile"]),
        ),
        ("stack_level", TypeSpec::Integer),
    ],
};

static CLEAR_CHARGING_PROFILE_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[("status", TypeSpec::Enum(&["Accepted", "Unknown"]))],
};

static GET_COMPOSITE_SCHEDULE_REQUEST: PayloadSchema = PayloadSchema {
    required: &["connector_id", "duration"],
    properties: &[
        ("connector_id", TypeSpec::Integer),
        ("duration", TypeSpec::Integer),
        ("charging_rate_unit", TypeSpec::Enum(&["A", "W"])),
    ],
};

static GET_COMPOSITE_SCHEDULE_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[
        ("status", TypeSpec::Enum(&["Accepted", "Rejected"])),
        ("connector_id", TypeSpec::Integer),
        ("schedule_start", TypeSpec::String { max_length: None }),
        ("charging_schedule", TypeSpec::Nested(&CHARGING_SCHEDULE)),
    ],
};

pub(super) fn register(table: &mut HashMap<SchemaKey, &'static PayloadSchema>) {
    let entries: &[(Action, Direction, &'static PayloadSchema)] = &[
        (Action::SetChargingProfile, Direction::Request, &SET_CHARGING_PROFILE_REQUEST),
        (Action::SetChargingProfile, Direction::Response, &SET_CHARGING_PROFILE_RESPONSE),
        (Action::ClearChargingProfile, Direction::Request, &CLEAR_CHARGING_PROFILE_REQUEST),
        (Action::ClearChargingProfile, Direction::Response, &CLEAR_CHARGING_PROFILE_RESPONSE),
        (Action::GetCompositeSchedule, Direction::Request, &GET_COMPOSITE_SCHEDULE_REQUEST),
        (Action::GetCompositeSchedule, Direction::Response, &GET_COMPOSITE_SCHEDULE_RESPONSE),
    ];

    for (action, direction, schema) in entries {
        table.insert((OcppVersion::V1_6, *action, *direction), schema);
    }
}
