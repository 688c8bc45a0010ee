//! Typed platform error codes.
//!
//! Every failure that affects supervisor state is surfaced to the platform
//! adapter as one of these codes plus an optional string argument (usually
//! an interface name) before the reset machinery runs.

/// Closed set of error codes understood by the platform adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlatformError {
    SlaveStopped,
    SlaveFailedConnectToPlatformManager,
    SlavePlatformManagerRegisterTimeout,
    SlaveConnectingToBackhaulManager,
    SlaveBackhaulManagerDisconnected,
    SlaveInvalidMasterSocket,
    SlaveIfaceChangeStateFailed,
    SlaveTxChangeStateFailed,
    SlaveTimeoutGetWlanReadyStatusRequest,
    SlaveTimeoutWifiCredentialsSetRequest,
    SlaveTimeoutIfaceEnableRequest,
    SlaveTimeoutIfaceDisableRequest,
    SlaveTimeoutIfaceRestoreRequest,
    SlaveTimeoutIfaceRestartRequest,
    SlaveWifiCredentialsSetFailed,
    SlaveUpdateCredentialsFailed,
    SlavePostInitConfigFailed,
    MasterKeepAliveTimeout,
    WifiConfigurationChangeTimeout,
    ConfigPlatformReportedInvalidConfiguration,
    ConfigBackhaulWiredInterfaceIsUnsupported,
    ConfigBackhaulWirelessInterfaceIsUnsupported,
    ConfigNoValidBackhaulInterface,
    ApManagerStart,
    ApManagerDisconnected,
    ApManagerHostapDisabled,
    ApManagerAttachFail,
    ApManagerSuddenDetach,
    ApManagerHalDisconnected,
    ApManagerCacTimeout,
    MonitorDisconnected,
    MonitorHostapDisabled,
    MonitorAttachFail,
    MonitorSuddenDetach,
    MonitorHalDisconnected,
    MonitorReportProcessFail,
}

impl PlatformError {
    pub fn to_wire(self) -> u32 {
        match self {
            PlatformError::SlaveStopped => 1,
            PlatformError::SlaveFailedConnectToPlatformManager => 2,
            PlatformError::SlavePlatformManagerRegisterTimeout => 3,
            PlatformError::SlaveConnectingToBackhaulManager => 4,
            PlatformError::SlaveBackhaulManagerDisconnected => 5,
            PlatformError::SlaveInvalidMasterSocket => 6,
            PlatformError::SlaveIfaceChangeStateFailed => 7,
            PlatformError::SlaveTxChangeStateFailed => 8,
            PlatformError::SlaveTimeoutGetWlanReadyStatusRequest => 9,
            PlatformError::SlaveTimeoutWifiCredentialsSetRequest => 10,
            PlatformError::SlaveTimeoutIfaceEnableRequest => 11,
            PlatformError::SlaveTimeoutIfaceDisableRequest => 12,
            PlatformError::SlaveTimeoutIfaceRestoreRequest => 13,
            PlatformError::SlaveTimeoutIfaceRestartRequest => 14,
            PlatformError::SlaveWifiCredentialsSetFailed => 15,
            PlatformError::SlaveUpdateCredentialsFailed => 16,
            PlatformError::SlavePostInitConfigFailed => 17,
            PlatformError::MasterKeepAliveTimeout => 18,
            PlatformError::WifiConfigurationChangeTimeout => 19,
            PlatformError::ConfigPlatformReportedInvalidConfiguration => 20,
            PlatformError::ConfigBackhaulWiredInterfaceIsUnsupported => 21,
            PlatformError::ConfigBackhaulWirelessInterfaceIsUnsupported => 22,
            PlatformError::ConfigNoValidBackhaulInterface => 23,
            PlatformError::ApManagerStart => 24,
            PlatformError::ApManagerDisconnected => 25,
            PlatformError::ApManagerHostapDisabled => 26,
            PlatformError::ApManagerAttachFail => 27,
            PlatformError::ApManagerSuddenDetach => 28,
            PlatformError::ApManagerHalDisconnected => 29,
            PlatformError::ApManagerCacTimeout => 30,
            PlatformError::MonitorDisconnected => 31,
            PlatformError::MonitorHostapDisabled => 32,
            PlatformError::MonitorAttachFail => 33,
            PlatformError::MonitorSuddenDetach => 34,
            PlatformError::MonitorHalDisconnected => 35,
            PlatformError::MonitorReportProcessFail => 36,
        }
    }

    /// Error raised when a pending interface action times out; depends on
    /// the operation that was requested.
    pub fn for_iface_action_timeout(
        operation: crate::message::types::IfaceOperation,
    ) -> Option<PlatformError> {
        use crate::message::types::IfaceOperation::*;
        match operation {
            Disable => Some(PlatformError::SlaveTimeoutIfaceEnableRequest),
            Enable => Some(PlatformError::SlaveTimeoutIfaceDisableRequest),
            Restore => Some(PlatformError::SlaveTimeoutIfaceRestoreRequest),
            Restart => Some(PlatformError::SlaveTimeoutIfaceRestartRequest),
            NoChange => None,
        }
    }

    /// Maps the AP manager's last error report to a platform error.
    pub fn from_ap_manager_err(code: u32) -> PlatformError {
        use crate::message::payloads::ap_manager_err::*;
        match code {
            HOSTAP_DISABLED => PlatformError::ApManagerHostapDisabled,
            ATTACH_FAIL => PlatformError::ApManagerAttachFail,
            SUDDEN_DETACH => PlatformError::ApManagerSuddenDetach,
            HAL_DISCONNECTED => PlatformError::ApManagerHalDisconnected,
            CAC_TIMEOUT => PlatformError::ApManagerCacTimeout,
            _ => PlatformError::ApManagerDisconnected,
        }
    }

    /// Maps a monitor error report to a platform error, if the code is one
    /// the monitor is known to raise.
    pub fn from_monitor_err(code: u32) -> Option<PlatformError> {
        use crate::message::payloads::monitor_err::*;
        match code {
            HOSTAP_DISABLED => Some(PlatformError::MonitorHostapDisabled),
            ATTACH_FAIL => Some(PlatformError::MonitorAttachFail),
            SUDDEN_DETACH => Some(PlatformError::MonitorSuddenDetach),
            HAL_DISCONNECTED => Some(PlatformError::MonitorHalDisconnected),
            REPORT_PROCESS_FAIL => Some(PlatformError::MonitorReportProcessFail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::types::IfaceOperation;

    #[test]
    fn iface_timeout_codes_follow_the_operation() {
        assert_eq!(
            PlatformError::for_iface_action_timeout(IfaceOperation::Enable),
            Some(PlatformError::SlaveTimeoutIfaceDisableRequest)
        );
        assert_eq!(
            PlatformError::for_iface_action_timeout(IfaceOperation::NoChange),
            None
        );
    }

    #[test]
    fn unknown_ap_manager_error_falls_back_to_disconnected() {
        assert_eq!(
            PlatformError::from_ap_manager_err(99),
            PlatformError::ApManagerDisconnected
        );
    }
}
