//! Core profile payload schemas: Authorize, BootNotification, Heartbeat,
//! StatusNotification, StartTransaction/StopTransaction, MeterValues, and
//! the remote-control/configuration actions.

use std::collections::HashMap;

use super::{Action, Direction, OcppVersion, PayloadSchema, SchemaKey, TypeSpec};

static AUTHORIZE_REQUEST: PayloadSchema = PayloadSchema {
    required: &["id_tag"],
    properties: &[("id_tag", TypeSpec::String { max_length: Some(20) })],
};

static ID_TAG_INFO: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[
        (
            "status",
            TypeSpec::Enum(&["Accepted", "Blocked", "Expired", "Invalid", "ConcurrentTx"]),
        ),
        ("expiry_date", TypeSpec::String { max_length: None }),
        ("parent_id_tag", TypeSpec::String { max_length: Some(20) }),
    ],
};

static AUTHORIZE_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["id_tag_info"],
    properties: &[("id_tag_info", TypeSpec::Nested(&ID_TAG_INFO))],
};

static BOOT_NOTIFICATION_REQUEST: PayloadSchema = PayloadSchema {
    required: &["charge_point_vendor", "charge_point_model"],
    properties: &[
        ("charge_point_vendor", TypeSpec::String { max_length: Some(20) }),
        ("charge_point_model", TypeSpec::String { max_length: Some(20) }),
        ("charge_point_serial_number", TypeSpec::String { max_length: Some(25) }),
        ("charge_box_serial_number", TypeSpec::String { max_length: Some(25) }),
        ("firmware_version", TypeSpec::String { max_length: Some(50) }),
        ("iccid", TypeSpec::String { max_length: Some(20) }),
        ("imsi", TypeSpec::String { max_length: Some(20) }),
        ("meter_type", TypeSpec::String { max_length: Some(25) }),
        ("meter_serial_number", TypeSpec::String { max_length: Some(25) }),
    ],
};

static BOOT_NOTIFICATION_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status", "current_time", "interval"],
    properties: &[
        ("status", TypeSpec::Enum(&["Accepted", "Pending", "Rejected"])),
        ("current_time", TypeSpec::String { max_length: None }),
        ("interval", TypeSpec::Integer),
    ],
};

static HEARTBEAT_REQUEST: PayloadSchema = PayloadSchema { required: &[], properties: &[] };

static HEARTBEAT_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["current_time"],
    properties: &[("current_time", TypeSpec::String { max_length: None })],
};

static CHANGE_AVAILABILITY_REQUEST: PayloadSchema = PayloadSchema {
    required: &["connector_id", "type"],
    properties: &[
        ("connector_id", TypeSpec::Integer),
        ("type", TypeSpec::Enum(&["Inoperative", "Operative"])),
    ],
};

static CHANGE_AVAILABILITY_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[("status", TypeSpec::Enum(&["Accepted", "Rejected", "Scheduled"]))],
};

static KEY_VALUE: PayloadSchema = PayloadSchema {
    required: &["key", "readonly"],
    properties: &[
        ("key", TypeSpec::String { max_length: Some(50) }),
        ("readonly", TypeSpec::Boolean),
        ("value", TypeSpec::String { max_length: Some(500) }),
    ],
};

static CHANGE_CONFIGURATION_REQUEST: PayloadSchema = PayloadSchema {
    required: &["key", "value"],
    properties: &[
        ("key", TypeSpec::String { max_length: Some(50) }),
        ("value", TypeSpec::String { max_length: Some(500) }),
    ],
};

static CHANGE_CONFIGURATION_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[(
        "status",
        TypeSpec::Enum(&["Accepted", "Rejected", "RebootRequired", "NotSupported"]),
    )],
};

static CLEAR_CACHE_REQUEST: PayloadSchema = PayloadSchema { required: &[], properties: &[] };

static CLEAR_CACHE_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[("status", TypeSpec::Enum(&["Accepted", "Rejected"]))],
};

static DATA_TRANSFER_REQUEST: PayloadSchema = PayloadSchema {
    required: &["vendor_id"],
    properties: &[
        ("vendor_id", TypeSpec::String { max_length: Some(255) }),
        ("message_id", TypeSpec::String { max_length: Some(50) }),
        ("data", TypeSpec::String { max_length: None }),
    ],
};

static DATA_TRANSFER_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[
        (
            "status",
            TypeSpec::Enum(&["Accepted", "Rejected", "UnknownMessageId", "UnknownVendorId"]),
        ),
        ("data", TypeSpec::String { max_length: None }),
    ],
};

static GET_CONFIGURATION_REQUEST: PayloadSchema = PayloadSchema {
    required: &[],
    properties: &[("key", TypeSpec::List(&TypeSpec::String { max_length: Some(50) }))],
};

static GET_CONFIGURATION_RESPONSE: PayloadSchema = PayloadSchema {
    required: &[],
    properties: &[
        ("configuration_key", TypeSpec::List(&TypeSpec::Nested(&KEY_VALUE))),
        ("unknown_key", TypeSpec::List(&TypeSpec::String { max_length: Some(50) })),
    ],
};

static SAMPLED_VALUE: PayloadSchema = PayloadSchema {
    required: &["value"],
    properties: &[
        ("value", TypeSpec::String { max_length: None }),
        (
            "context",
            TypeSpec::Enum(&[
                "Interruption.Begin",
                "Interruption.End",
                "Other",
                "Sample.Clock",
                "Sample.Periodic",
                "Transaction.Begin",
                "Transaction.End",
                "Trigger",
            ]),
        ),
        ("format", TypeSpec::Enum(&["Raw", "SignedData"])),
        (
            "measurand",
            TypeSpec::Enum(&[
                "Energy.Active.Import.Register",
                "Energy.Active.Export.Register",
                "Power.Active.Import",
                "SoC",
                "Current.Import",
                "Voltage",
            ]),
        ),
        ("phase", TypeSpec::String { max_length: Some(20) }),
        ("location", TypeSpec::Enum(&["Body", "Cable", "EV", "Inlet", "Outlet"])),
        ("unit", TypeSpec::String { max_length: Some(20) }),
    ],
};

static METER_VALUE: PayloadSchema = PayloadSchema {
    required: &["timestamp", "sampled_value"],
    properties: &[
        ("timestamp", TypeSpec::String { max_length: None }),
        ("sampled_value", TypeSpec::List(&TypeSpec::Nested(&SAMPLED_VALUE))),
    ],
};

static METER_VALUES_REQUEST: PayloadSchema = PayloadSchema {
    required: &["connector_id", "meter_value"],
    properties: &[
        ("connector_id", TypeSpec::Integer),
        ("transaction_id", TypeSpec::Integer),
        ("meter_value", TypeSpec::List(&TypeSpec::Nested(&METER_VALUE))),
    ],
};

static METER_VALUES_RESPONSE: PayloadSchema = PayloadSchema { required: &[], properties: &[] };

static REMOTE_START_TRANSACTION_REQUEST: PayloadSchema = PayloadSchema {
    required: &["id_tag"],
    properties: &[
        ("connector_id", TypeSpec::Integer),
        ("id_tag", TypeSpec::String { max_length: Some(20) }),
    ],
};

static REMOTE_START_TRANSACTION_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[("status", TypeSpec::Enum(&["Accepted", "Rejected"]))],
};

static REMOTE_STOP_TRANSACTION_REQUEST: PayloadSchema = PayloadSchema {
    required: &["transaction_id"],
    properties: &[("transaction_id", TypeSpec::Integer)],
};

static REMOTE_STOP_TRANSACTION_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[("status", TypeSpec::Enum(&["Accepted", "Rejected"]))],
};

static RESET_REQUEST: PayloadSchema = PayloadSchema {
    required: &["type"],
    properties: &[("type", TypeSpec::Enum(&["Hard", "Soft"]))],
};

static RESET_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[("status", TypeSpec::Enum(&["Accepted", "Rejected"]))],
};

static START_TRANSACTION_REQUEST: PayloadSchema = PayloadSchema {
    required: &["connector_id", "id_tag", "meter_start", "timestamp"],
    properties: &[
        ("connector_id", TypeSpec::Integer),
        ("id_tag", TypeSpec::String { max_length: Some(20) }),
        ("meter_start", TypeSpec::Integer),
        ("reservation_id", TypeSpec::Integer),
        ("timestamp", TypeSpec::String { max_length: None }),
    ],
};

static START_TRANSACTION_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["transaction_id", "id_tag_info"],
    properties: &[
        ("transaction_id", TypeSpec::Integer),
        ("id_tag_info", TypeSpec::Nested(&ID_TAG_INFO)),
    ],
};

static STATUS_NOTIFICATION_REQUEST: PayloadSchema = PayloadSchema {
    required: &["connector_id", "error_code", "status"],
    properties: &[
        ("connector_id", TypeSpec::Integer),
        (
            "error_code",
            TypeSpec::Enum(&[
                "ConnectorLockFailure",
                "EVCommunicationError",
                "GroundFailure",
                "HighTemperature",
                "InternalError",
                "LocalListConflict",
                "NoError",
                "OtherError",
                "OverCurrentFailure",
                "PowerMeterFailure",
                "PowerSwitchFailure",
                "ReaderFailure",
                "ResetFailure",
                "UnderVoltage",
                "OverVoltage",
                "WeakSignal",
            ]),
        ),
        ("info", TypeSpec::String { max_length: Some(50) }),
        (
            "status",
            TypeSpec::Enum(&[
                "Available",
                "Preparing",
                "Charging",
                "SuspendedEVSE",
                "SuspendedEV",
                "Finishing",
                "Reserved",
                "Unavailable",
                "Faulted",
            ]),
        ),
        ("timestamp", TypeSpec::String { max_length: None }),
        ("vendor_id", TypeSpec::String { max_length: Some(255) }),
        ("vendor_error_code", TypeSpec::String { max_length: Some(50) }),
    ],
};

static STATUS_NOTIFICATION_RESPONSE: PayloadSchema = PayloadSchema { required: &[], properties: &[] };

static STOP_TRANSACTION_REQUEST: PayloadSchema = PayloadSchema {
    required: &["meter_stop", "timestamp", "transaction_id"],
    properties: &[
        ("meter_stop", TypeSpec::Integer),
        ("timestamp", TypeSpec::String { max_length: None }),
        ("transaction_id", TypeSpec::Integer),
        ("reason", TypeSpec::Enum(&["EmergencyStop", "EVDisconnected", "HardReset", "Local", "Other", "PowerLoss", "Reboot", "Remote", "SoftReset", "UnlockCommand", "DeAuthorized"])),
        ("id_tag", TypeSpec::String { max_length: Some(20) }),
        ("transaction_data", TypeSpec::List(&TypeSpec::Nested(&METER_VALUE))),
    ],
};

static STOP_TRANSACTION_RESPONSE: PayloadSchema = PayloadSchema {
    required: &[],
    properties: &[("id_tag_info", TypeSpec::Nested(&ID_TAG_INFO))],
};

static UNLOCK_CONNECTOR_REQUEST: PayloadSchema = PayloadSchema {
    required: &["connector_id"],
    properties: &[("connector_id", TypeSpec::Integer)],
};

static UNLOCK_CONNECTOR_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[("status", TypeSpec::Enum(&["Unlocked", "UnlockFailed", "NotSupported"]))],
};

pub(super) fn register(table: &mut HashMap<SchemaKey, &'static PayloadSchema>) {
    let entries: &[(Action, Direction, &'static PayloadSchema)] = &[
        (Action::Authorize, Direction::Request, &AUTHORIZE_REQUEST),
        (Action::Authorize, Direction::Response, &AUTHORIZE_RESPONSE),
        (Action::BootNotification, Direction::Request, &BOOT_NOTIFICATION_REQUEST),
        (Action::BootNotification, Direction::Response, &BOOT_NOTIFICATION_RESPONSE),
        (Action::Heartbeat, Direction::Request, &HEARTBEAT_REQUEST),
        (Action::Heartbeat, Direction::Response, &HEARTBEAT_RESPONSE),
        (Action::ChangeAvailability, Direction::Request, &CHANGE_AVAILABILITY_REQUEST),
        (Action::ChangeAvailability, Direction::Response, &CHANGE_AVAILABILITY_RESPONSE),
        (Action::ChangeConfiguration, Direction::Request, &CHANGE_CONFIGURATION_REQUEST),
        (Action::ChangeConfiguration, Direction::Response, &CHANGE_CONFIGURATION_RESPONSE),
        (Action::ClearCache, Direction::Request, &CLEAR_CACHE_REQUEST),
        (Action::ClearCache, Direction::Response, &CLEAR_CACHE_RESPONSE),
        (Action::DataTransfer, Direction::Request, &DATA_TRANSFER_REQUEST),
        (Action::DataTransfer, Direction::Response, &DATA_TRANSFER_RESPONSE),
        (Action::GetConfiguration, Direction::Request, &GET_CONFIGURATION_REQUEST),
        (Action::GetConfiguration, Direction::Response, &GET_CONFIGURATION_RESPONSE),
        (Action::MeterValues, Direction::Request, &METER_VALUES_REQUEST),
        (Action::MeterValues, Direction::Response, &METER_VALUES_RESPONSE),
        (Action::RemoteStartTransaction, Direction::Request, &REMOTE_START_TRANSACTION_REQUEST),
        (Action::RemoteStartTransaction, Direction::Response, &REMOTE_START_TRANSACTION_RESPONSE),
        (Action::RemoteStopTransaction, Direction::Request, &REMOTE_STOP_TRANSACTION_REQUEST),
        (Action::RemoteStopTransaction, Direction::Response, &REMOTE_STOP_TRANSACTION_RESPONSE),
        (Action::Reset, Direction::Request, &RESET_REQUEST),
        (Action::Reset, Direction::Response, &RESET_RESPONSE),
        (Action::StartTransaction, Direction::Request, &START_TRANSACTION_REQUEST),
        (Action::StartTransaction, Direction::Response, &START_TRANSACTION_RESPONSE),
        (Action::StatusNotification, Direction::Request, &STATUS_NOTIFICATION_REQUEST),
        (Action::StatusNotification, Direction::Response, &STATUS_NOTIFICATION_RESPONSE),
        (Action::StopTransaction, Direction::Request, &STOP_TRANSACTION_REQUEST),
        (Action::StopTransaction, Direction::Response, &STOP_TRANSACTION_RESPONSE),
        (Action::UnlockConnector, Direction::Request, &UNLOCK_CONNECTOR_REQUEST),
        (Action::UnlockConnector, Direction::Response, &UNLOCK_CONNECTOR_RESPONSE),
    ];

    for (action, direction, schema) in entries {
        table.insert((OcppVersion::V1_6, *action, *direction), schema);
    }
}
