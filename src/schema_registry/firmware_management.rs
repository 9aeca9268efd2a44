//! FirmwareManagement profile payload schemas.

use std::collections::HashMap;

use super::{Action, Direction, OcppVersion, PayloadSchema, SchemaKey, TypeSpec};

static GET_DIAGNOSTICS_REQUEST: PayloadSchema = PayloadSchema {
    required: &["location"],
    properties: &[
        ("location", TypeSpec::String { max_length: None }),
        ("retries", TypeSpec::Integer),
        ("retry_interval", TypeSpec::Integer),
        ("start_time", TypeSpec::String { max_length: None }),
        ("stop_time", TypeSpec::String { max_length: None }),
    ],
};

static GET_DIAGNOSTICS_RESPONSE: PayloadSchema = PayloadSchema {
    required: &[],
    properties: &[("file_name", TypeSpec::String { max_length: Some(255) })],
};

static DIAGNOSTICS_STATUS_NOTIFICATION_REQUEST: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[("status", TypeSpec::Enum(&["Idle", "Uploaded", "UploadFailed", "Uploading"]))],
};

static DIAGNOSTICS_STATUS_NOTIFICATION_RESPONSE: PayloadSchema =
    PayloadSchema { required: &[], properties: &[] };

static FIRMWARE_STATUS_NOTIFICATION_REQUEST: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[(
        "status",
        TypeSpec::Enum(&[
            "Downloaded",
            "DownloadFailed",
            "Downloading",
            "Idle",
            "InstallationFailed",
            "Installing",
            "Installed",
        ]),
    )],
};

static FIRMWARE_STATUS_NOTIFICATION_RESPONSE: PayloadSchema =
    PayloadSchema { required: &[], properties: &[] };

static UPDATE_FIRMWARE_REQUEST: PayloadSchema = PayloadSchema {
    required: &["location", "retrieve_date"],
    properties: &[
        ("location", TypeSpec::String { max_length: None }),
        ("retries", TypeSpec::Integer),
        ("retrieve_date", TypeSpec::String { max_length: None }),
        ("retry_interval", TypeSpec::Integer),
    ],
};

static UPDATE_FIRMWARE_RESPONSE: PayloadSchema = PayloadSchema { required: &[], properties: &[] };

pub(super) fn register(table: &mut HashMap<SchemaKey, &'static PayloadSchema>) {
    let entries: &[(Action, Direction, &'static PayloadSchema)] = &[
        (Action::GetDiagnostics, Direction::Request, &GET_DIAGNOSTICS_REQUEST),
        (Action::GetDiagnostics, Direction::Response, &GET_DIAGNOSTICS_RESPONSE),
        (
            Action::DiagnosticsStatusNotification,
            Direction::Request,
            &DIAGNOSTICS_STATUS_NOTIFICATION_REQUEST,
        ),
        (
            Action::DiagnosticsStatusNotification,
            Direction::Response,
            &DIAGNOSTICS_STATUS_NOTIFICATION_RESPONSE,
        ),
        (
            Action::FirmwareStatusNotification,
            Direction::Request,
            &FIRMWARE_STATUS_NOTIFICATION_REQUEST,
        ),
        (
            Action::FirmwareStatusNotification,
            Direction::Response,
            &FIRMWARE_STATUS_NOTIFICATION_RESPONSE,
        ),
        (Action::UpdateFirmware, Direction::Request, &UPDATE_FIRMWARE_REQUEST),
        (Action::UpdateFirmware, Direction::Response, &UPDATE_FIRMWARE_RESPONSE),
    ];

    for (action, direction, schema) in entries {
        table.insert((OcppVersion::V1_6, *action, *direction), schema);
    }
}
