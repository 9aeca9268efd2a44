//! AuthenticationListManagement profile payload schemas.

use std::collections::HashMap;

use super::{Action, Direction, OcppVersion, PayloadSchema, SchemaKey, TypeSpec};

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

static AUTHORIZATION_DATA: PayloadSchema = PayloadSchema {
    required: &["id_tag"],
    properties: &[
        ("id_tag", TypeSpec::String { max_length: Some(20) }),
        ("id_tag_info", TypeSpec::Nested(&ID_TAG_INFO)),
    ],
};

static GET_LOCAL_LIST_VERSION_REQUEST: PayloadSchema = PayloadSchema { required: &[], properties: &[] };

static GET_LOCAL_LIST_VERSION_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["list_version"],
    properties: &[("list_version", TypeSpec::Integer)],
};

static SEND_LOCAL_LIST_REQUEST: PayloadSchema = PayloadSchema {
    required: &["list_version", "update_type"],
    properties: &[
        ("list_version", TypeSpec::Integer),
        ("local_authorization_list", TypeSpec::List(&TypeSpec::Nested(&AUTHORIZATION_DATA))),
        ("update_type", TypeSpec::Enum(&["Differential", "Full"])),
    ],
};

static SEND_LOCAL_LIST_RESPONSE: PayloadSchema = PayloadSchema {
    required: &["status"],
    properties: &[("status", TypeSpec::Enum(&["Accepted", "Failed", "NotSupported", "VersionMismatch"]))],
};

pub(super) fn register(table: &mut HashMap<SchemaKey, &'static PayloadSchema>) {
    let entries: &[(Action, Direction, &'static PayloadSchema)] = &[
        (Action::GetLocalListVersion, Direction::Request, &GET_LOCAL_LIST_VERSION_REQUEST),
        (Action::GetLocalListVersion, Direction::Response, &GET_LOCAL_LIST_VERSION_RESPONSE),
        (Action::SendLocalList, Direction::Request, &SEND_LOCAL_LIST_REQUEST),
        (Action::SendLocalList, Direction::Response, &SEND_LOCAL_LIST_RESPONSE),
    ];

    for (action, direction, schema) in entries {
        table.insert((OcppVersion::V1_6, *action, *direction), schema);
    }
}
