//! The OCPP 1.6 action catalogue and protocol version tag.
//!
//! Ported from `ocpp.v16.enums.Action`, used
//! by `_raise_key_error` to tell "the action exists in this OCPP version but
//! has no handler" (→ `NotImplemented`) apart from "the action doesn't exist
//! in this version at all" (→ `NotSupported`) — see
//! [`crate::session`]'s dispatch path.

use strum_macros::{Display, EnumString};

/// The OCPP protocol version a session negotiates. Only 1.6 is modeled
/// (2.x is a non-goal); the type exists so a future version slots in
/// without reshaping the schema table's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum OcppVersion {
    #[strum(serialize = "1.6")]
    V1_6,
}

/// Which side of an action's payload pair a schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Request,
    Response,
}

/// Every Action OCPP 1.6's Core, FirmwareManagement, SmartCharging and
/// AuthenticationListManagement profiles define. Wire names are verbatim
/// (`Display`/`EnumString` round-trip the exact string used on the wire and
/// in schema lookups).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Action {
    // Core
    Authorize,
    BootNotification,
    ChangeAvailability,
    ChangeConfiguration,
    ClearCache,
    DataTransfer,
    GetConfiguration,
    Heartbeat,
    MeterValues,
    RemoteStartTransaction,
    RemoteStopTransaction,
    Reset,
    StartTransaction,
    StatusNotification,
    StopTransaction,
    UnlockConnector,
    // FirmwareManagement
    DiagnosticsStatusNotification,
    FirmwareStatusNotification,
    GetDiagnostics,
    UpdateFirmware,
    // SmartCharging
    ClearChargingProfile,
    GetCompositeSchedule,
    SetChargingProfile,
    // AuthenticationListManagement
    GetLocalListVersion,
    SendLocalList,
}

impl Action {
    /// Every action this engine knows about is defined for OCPP 1.6, so
    /// `is_known_in` is effectively `version == V1_6`; kept as a method
    /// rather than a free function so a second version can narrow this list
    /// per-variant later.
    pub fn is_known_in(self, version: OcppVersion) -> bool {
        matches!(version, OcppVersion::V1_6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_display_and_parse_round_trip() {
        for action in [
            Action::BootNotification,
            Action::Heartbeat,
            Action::ChangeAvailability,
            Action::GetLocalListVersion,
        ] {
            let wire = action.to_string();
            assert_eq!(wire.parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn unknown_action_name_does_not_parse() {
        assert!("Nonsense".parse::<Action>().is_err());
    }

    #[test]
    fn every_modeled_action_is_known_in_v1_6() {
        assert!(Action::BootNotification.is_known_in(OcppVersion::V1_6));
    }
}
