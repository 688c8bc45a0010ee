//! Vendor-specific message layer.
//!
//! Vendor traffic rides in a 1905.1 vendor-specific TLV: a 3-byte OUI
//! followed by the beerocks header and the payload record. The header
//! carries the `(action, action_op)` pair the router dispatches on, the
//! message id used to correlate request/response pairs, the direction flag
//! and the radio MAC that scopes controller traffic to one radio.

use packed_struct::prelude::*;

use super::cmdu::{tlv_type, Cmdu, MessageType, Tlv};
use super::types::MacAddr;
use super::wire::WireError;

/// OUI stamped on every vendor-specific TLV the slave produces.
pub const VENDOR_OUI: [u8; 3] = [0x00, 0xa0, 0xc9];

pub const VS_HEADER_LEN: usize = 13;

/// Worker class a vendor message belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Control,
    Backhaul,
    Platform,
    ApManager,
    Monitor,
}

impl Action {
    pub fn to_wire(self) -> u8 {
        match self {
            Action::Control => 0,
            Action::Backhaul => 1,
            Action::Platform => 2,
            Action::ApManager => 3,
            Action::Monitor => 4,
        }
    }

    pub fn from_wire(v: u8) -> Option<Action> {
        match v {
            0 => Some(Action::Control),
            1 => Some(Action::Backhaul),
            2 => Some(Action::Platform),
            3 => Some(Action::ApManager),
            4 => Some(Action::Monitor),
            _ => None,
        }
    }
}

/// Direction of a vendor message relative to the controller.
pub mod direction {
    pub const TO_AGENT: u8 = 0;
    pub const TO_CONTROLLER: u8 = 1;
}

// bytes 0..2  action, action_op, direction
// bytes 3..8  radio mac
// bytes 9..10 message id
// bytes 11..12 payload length
#[derive(PackedStruct, Debug, Default, Clone, Copy, PartialEq)]
#[packed_struct(bit_numbering = "msb0", endian = "lsb")]
pub struct VsHeaderPack {
    #[packed_field(bytes = "0")]
    pub action: u8,
    #[packed_field(bytes = "1")]
    pub action_op: u8,
    #[packed_field(bytes = "2")]
    pub direction: u8,
    #[packed_field(bytes = "3..=8")]
    pub radio_mac: [u8; 6],
    #[packed_field(bytes = "9..=10")]
    pub id: u16,
    #[packed_field(bytes = "11..=12")]
    pub length: u16,
}

/// Decoded beerocks header of an inbound vendor message.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VsHeader {
    pub action: Action,
    pub action_op: u8,
    pub direction: u8,
    pub radio_mac: MacAddr,
    pub id: u16,
}

/// Builds a vendor-specific CMDU around one payload record.
pub fn build_vs_cmdu(action: Action, action_op: u8, id: u16, payload: &[u8]) -> Cmdu {
    let mut cmdu = Cmdu::new(MessageType::VendorSpecific, id);
    cmdu.push_tlv(build_vs_tlv(action, action_op, id, payload));
    cmdu
}

/// Builds the vendor-specific TLV alone, for CMDUs that mix vendor data
/// with standardised TLVs (the WSC M1 join message does).
pub fn build_vs_tlv(action: Action, action_op: u8, id: u16, payload: &[u8]) -> Tlv {
    let header = VsHeaderPack {
        action: action.to_wire(),
        action_op,
        direction: direction::TO_AGENT,
        id,
        length: payload.len() as u16,
        ..Default::default()
    };
    let mut value = VENDOR_OUI.to_vec();
    value.extend_from_slice(&header.pack().expect("vs header pack"));
    value.extend_from_slice(payload);
    Tlv::new(tlv_type::VENDOR_SPECIFIC, value)
}

/// Splits a vendor-specific TLV value into its header and payload.
pub fn parse_vs_tlv(value: &[u8]) -> Result<(VsHeader, &[u8]), WireError> {
    if value.len() < 3 + VS_HEADER_LEN {
        return Err(WireError::Truncated {
            needed: 3 + VS_HEADER_LEN,
            left: value.len(),
        });
    }
    if value[..3] != VENDOR_OUI {
        return Err(WireError::Invalid("vendor oui"));
    }
    let mut raw = [0u8; VS_HEADER_LEN];
    raw.copy_from_slice(&value[3..3 + VS_HEADER_LEN]);
    let packed = VsHeaderPack::unpack(&raw).map_err(|_| WireError::Invalid("vs header"))?;
    let action = Action::from_wire(packed.action).ok_or(WireError::Invalid("action"))?;
    let payload = &value[3 + VS_HEADER_LEN..];
    if payload.len() < packed.length as usize {
        return Err(WireError::Truncated {
            needed: packed.length as usize,
            left: payload.len(),
        });
    }
    Ok((
        VsHeader {
            action,
            action_op: packed.action_op,
            direction: packed.direction,
            radio_mac: MacAddr(packed.radio_mac),
            id: packed.id,
        },
        &payload[..packed.length as usize],
    ))
}

/// Extracts the vendor header and payload from a vendor-specific CMDU.
pub fn parse_vs_cmdu(cmdu: &Cmdu) -> Result<(VsHeader, &[u8]), WireError> {
    let tlv = cmdu
        .tlvs
        .iter()
        .find(|t| t.tlv_type == tlv_type::VENDOR_SPECIFIC)
        .ok_or(WireError::Invalid("missing vendor tlv"))?;
    parse_vs_tlv(&tlv.value)
}

/// Rewrites direction and radio MAC on the vendor TLV of an already-built
/// CMDU. Every frame leaving towards the controller goes through this.
pub fn stamp_for_controller(cmdu: &mut Cmdu, radio_mac: MacAddr) {
    for tlv in &mut cmdu.tlvs {
        if tlv.tlv_type != tlv_type::VENDOR_SPECIFIC || tlv.value.len() < 3 + VS_HEADER_LEN {
            continue;
        }
        // direction byte and radio mac live at fixed offsets after the OUI
        tlv.value[5] = direction::TO_CONTROLLER;
        tlv.value[6..12].copy_from_slice(&radio_mac.0);
    }
}

/// Action-op catalogue for controller traffic.
pub mod control_op {
    pub const SLAVE_JOINED_NOTIFICATION: u8 = 1;
    pub const SLAVE_JOINED_RESPONSE: u8 = 2;
    pub const SON_CONFIG_UPDATE: u8 = 3;
    pub const ARP_QUERY_REQUEST: u8 = 4;
    pub const ARP_QUERY_RESPONSE: u8 = 5;
    pub const CONTROLLER_PING_REQUEST: u8 = 6;
    pub const CONTROLLER_PING_RESPONSE: u8 = 7;
    pub const AGENT_PING_REQUEST: u8 = 8;
    pub const AGENT_PING_RESPONSE: u8 = 9;
    pub const CHANGE_MODULE_LOGGING_LEVEL: u8 = 10;
    pub const HOSTAP_SET_RESTRICTED_FAILSAFE_CHANNEL_REQUEST: u8 = 11;
    pub const HOSTAP_SET_RESTRICTED_FAILSAFE_CHANNEL_RESPONSE: u8 = 12;
    pub const HOSTAP_CHANNEL_SWITCH_ACS_START: u8 = 13;
    pub const HOSTAP_STATS_MEASUREMENT_REQUEST: u8 = 14;
    pub const HOSTAP_STATS_MEASUREMENT_RESPONSE: u8 = 15;
    pub const HOSTAP_SET_NEIGHBOR_11K_REQUEST: u8 = 16;
    pub const HOSTAP_REMOVE_NEIGHBOR_11K_REQUEST: u8 = 17;
    pub const HOSTAP_DISABLED_BY_MASTER: u8 = 18;
    pub const HOSTAP_TX_ON_REQUEST: u8 = 19;
    pub const HOSTAP_TX_ON_RESPONSE: u8 = 20;
    pub const HOSTAP_TX_OFF_REQUEST: u8 = 21;
    pub const HOSTAP_UPDATE_STOP_ON_FAILURE_ATTEMPTS_REQUEST: u8 = 22;
    pub const HOSTAP_ACS_NOTIFICATION: u8 = 23;
    pub const HOSTAP_CSA_NOTIFICATION: u8 = 24;
    pub const HOSTAP_CSA_ERROR_NOTIFICATION: u8 = 25;
    pub const HOSTAP_AP_DISABLED_NOTIFICATION: u8 = 26;
    pub const HOSTAP_AP_ENABLED_NOTIFICATION: u8 = 27;
    pub const HOSTAP_VAPS_LIST_UPDATE_NOTIFICATION: u8 = 28;
    pub const HOSTAP_DFS_CAC_COMPLETED_NOTIFICATION: u8 = 29;
    pub const HOSTAP_DFS_CHANNEL_AVAILABLE_NOTIFICATION: u8 = 30;
    pub const HOSTAP_ACTIVITY_NOTIFICATION: u8 = 31;
    pub const CLIENT_START_MONITORING_REQUEST: u8 = 32;
    pub const CLIENT_STOP_MONITORING_REQUEST: u8 = 33;
    pub const CLIENT_RX_RSSI_MEASUREMENT_REQUEST: u8 = 34;
    pub const CLIENT_RX_RSSI_MEASUREMENT_RESPONSE: u8 = 35;
    pub const CLIENT_RX_RSSI_MEASUREMENT_CMD_RESPONSE: u8 = 36;
    pub const CLIENT_RX_RSSI_MEASUREMENT_START_NOTIFICATION: u8 = 37;
    pub const CLIENT_RX_RSSI_MEASUREMENT_NOTIFICATION: u8 = 38;
    pub const CLIENT_ALLOW_REQUEST: u8 = 39;
    pub const CLIENT_DISALLOW_REQUEST: u8 = 40;
    pub const CLIENT_DISCONNECT_REQUEST: u8 = 41;
    pub const CLIENT_DISCONNECT_RESPONSE: u8 = 42;
    pub const CLIENT_BSS_STEER_REQUEST: u8 = 43;
    pub const CLIENT_BSS_STEER_RESPONSE: u8 = 44;
    pub const CLIENT_BEACON_11K_REQUEST: u8 = 45;
    pub const CLIENT_BEACON_11K_RESPONSE: u8 = 46;
    pub const CLIENT_CHANNEL_LOAD_11K_REQUEST: u8 = 47;
    pub const CLIENT_CHANNEL_LOAD_11K_RESPONSE: u8 = 48;
    pub const CLIENT_STATISTICS_11K_REQUEST: u8 = 49;
    pub const CLIENT_STATISTICS_11K_RESPONSE: u8 = 50;
    pub const CLIENT_LINK_MEASUREMENT_11K_REQUEST: u8 = 51;
    pub const CLIENT_LINK_MEASUREMENT_11K_RESPONSE: u8 = 52;
    pub const CLIENT_ASSOCIATED_NOTIFICATION: u8 = 53;
    pub const CLIENT_DISCONNECTED_NOTIFICATION: u8 = 54;
    pub const CLIENT_NO_RESPONSE_NOTIFICATION: u8 = 55;
    pub const CLIENT_NO_ACTIVITY_NOTIFICATION: u8 = 56;
    pub const CLIENT_ARP_MONITOR_NOTIFICATION: u8 = 57;
    pub const CLIENT_DHCP_COMPLETE_NOTIFICATION: u8 = 58;
    pub const BACKHAUL_ROAM_REQUEST: u8 = 59;
    pub const BACKHAUL_RESET: u8 = 60;
    pub const BACKHAUL_DL_RSSI_REPORT_NOTIFICATION: u8 = 61;
    pub const WIFI_CREDENTIALS_UPDATE_PREPARE_REQUEST: u8 = 62;
    pub const WIFI_CREDENTIALS_UPDATE_PREPARE_RESPONSE: u8 = 63;
    pub const WIFI_CREDENTIALS_UPDATE_PRE_COMMIT_REQUEST: u8 = 64;
    pub const WIFI_CREDENTIALS_UPDATE_PRE_COMMIT_RESPONSE: u8 = 65;
    pub const WIFI_CREDENTIALS_UPDATE_COMMIT_REQUEST: u8 = 66;
    pub const WIFI_CREDENTIALS_UPDATE_ABORT_REQUEST: u8 = 67;
    pub const VERSION_MISMATCH_NOTIFICATION: u8 = 68;
    pub const STEERING_CLIENT_SET_GROUP_REQUEST: u8 = 69;
    pub const STEERING_CLIENT_SET_GROUP_RESPONSE: u8 = 70;
    pub const STEERING_CLIENT_SET_REQUEST: u8 = 71;
    pub const STEERING_CLIENT_SET_RESPONSE: u8 = 72;
    pub const STEERING_EVENT_PROBE_REQ_NOTIFICATION: u8 = 73;
    pub const STEERING_EVENT_AUTH_FAIL_NOTIFICATION: u8 = 74;
    pub const STEERING_EVENT_CLIENT_ACTIVITY_NOTIFICATION: u8 = 75;
    pub const STEERING_EVENT_SNR_XING_NOTIFICATION: u8 = 76;
    pub const PLATFORM_OPERATIONAL_NOTIFICATION: u8 = 77;
}

/// Action-op catalogue for backhaul-manager traffic.
pub mod backhaul_op {
    pub const REGISTER_REQUEST: u8 = 1;
    pub const REGISTER_RESPONSE: u8 = 2;
    pub const ENABLE: u8 = 3;
    pub const CONNECTED_NOTIFICATION: u8 = 4;
    pub const BUSY_NOTIFICATION: u8 = 5;
    pub const DISCONNECTED_NOTIFICATION: u8 = 6;
    pub const ROAM_REQUEST: u8 = 7;
    pub const RESET: u8 = 8;
    pub const CLIENT_RX_RSSI_MEASUREMENT_REQUEST: u8 = 9;
    pub const CLIENT_RX_RSSI_MEASUREMENT_RESPONSE: u8 = 10;
    pub const CLIENT_RX_RSSI_MEASUREMENT_CMD_RESPONSE: u8 = 11;
    pub const DL_RSSI_REPORT_NOTIFICATION: u8 = 12;
    pub const UPDATE_STOP_ON_FAILURE_ATTEMPTS_REQUEST: u8 = 13;
}

/// Action-op catalogue for platform-adapter traffic.
pub mod platform_op {
    pub const SON_SLAVE_REGISTER_REQUEST: u8 = 1;
    pub const SON_SLAVE_REGISTER_RESPONSE: u8 = 2;
    pub const GET_WLAN_READY_STATUS_REQUEST: u8 = 3;
    pub const GET_WLAN_READY_STATUS_RESPONSE: u8 = 4;
    pub const WIFI_SET_IFACE_STATE_REQUEST: u8 = 5;
    pub const WIFI_SET_IFACE_STATE_RESPONSE: u8 = 6;
    pub const WIFI_SET_RADIO_TX_STATE_REQUEST: u8 = 7;
    pub const WIFI_SET_RADIO_TX_STATE_RESPONSE: u8 = 8;
    pub const WIFI_CREDENTIALS_SET_REQUEST: u8 = 9;
    pub const WIFI_CREDENTIALS_SET_RESPONSE: u8 = 10;
    pub const BEEROCKS_CREDENTIALS_UPDATE_REQUEST: u8 = 11;
    pub const BEEROCKS_CREDENTIALS_UPDATE_RESPONSE: u8 = 12;
    pub const WIFI_CONFIGURATION_UPDATE_REQUEST: u8 = 13;
    pub const ADVERTISE_SSID_FLAG_UPDATE_REQUEST: u8 = 14;
    pub const ADVERTISE_SSID_FLAG_UPDATE_RESPONSE: u8 = 15;
    pub const POST_INIT_CONFIG_REQUEST: u8 = 16;
    pub const POST_INIT_CONFIG_RESPONSE: u8 = 17;
    pub const ARP_QUERY_REQUEST: u8 = 18;
    pub const ARP_QUERY_RESPONSE: u8 = 19;
    pub const ARP_MONITOR_NOTIFICATION: u8 = 20;
    pub const DHCP_MONITOR_NOTIFICATION: u8 = 21;
    pub const WLAN_PARAMS_CHANGED_NOTIFICATION: u8 = 22;
    pub const OPERATIONAL_NOTIFICATION: u8 = 23;
    pub const VERSION_MISMATCH_NOTIFICATION: u8 = 24;
    pub const MASTER_SLAVE_VERSIONS_NOTIFICATION: u8 = 25;
    pub const ERROR_NOTIFICATION: u8 = 26;
    pub const WIFI_INTERFACE_STATUS_NOTIFICATION: u8 = 27;
    pub const CHANGE_MODULE_LOGGING_LEVEL: u8 = 28;
    pub const SON_SLAVE_BACKHAUL_CONNECTION_COMPLETE_NOTIFICATION: u8 = 29;
}

/// Action-op catalogue for AP-manager traffic.
pub mod ap_manager_op {
    pub const INIT_DONE_NOTIFICATION: u8 = 1;
    pub const JOINED_NOTIFICATION: u8 = 2;
    pub const HEARTBEAT_NOTIFICATION: u8 = 3;
    pub const HOSTAP_SET_RESTRICTED_FAILSAFE_CHANNEL_REQUEST: u8 = 4;
    pub const HOSTAP_SET_RESTRICTED_FAILSAFE_CHANNEL_RESPONSE: u8 = 5;
    pub const HOSTAP_CHANNEL_SWITCH_ACS_START: u8 = 6;
    pub const HOSTAP_ACS_NOTIFICATION: u8 = 7;
    pub const HOSTAP_CSA_NOTIFICATION: u8 = 8;
    pub const HOSTAP_CSA_ERROR_NOTIFICATION: u8 = 9;
    pub const HOSTAP_AP_DISABLED_NOTIFICATION: u8 = 10;
    pub const HOSTAP_AP_ENABLED_NOTIFICATION: u8 = 11;
    pub const HOSTAP_VAPS_LIST_UPDATE_REQUEST: u8 = 12;
    pub const HOSTAP_VAPS_LIST_UPDATE_NOTIFICATION: u8 = 13;
    pub const HOSTAP_DFS_CAC_COMPLETED_NOTIFICATION: u8 = 14;
    pub const HOSTAP_DFS_CHANNEL_AVAILABLE_NOTIFICATION: u8 = 15;
    pub const CLIENT_ALLOW_REQUEST: u8 = 16;
    pub const CLIENT_DISALLOW_REQUEST: u8 = 17;
    pub const CLIENT_DISCONNECT_REQUEST: u8 = 18;
    pub const CLIENT_DISCONNECT_RESPONSE: u8 = 19;
    pub const CLIENT_BSS_STEER_REQUEST: u8 = 20;
    pub const CLIENT_BSS_STEER_RESPONSE: u8 = 21;
    pub const CLIENT_RX_RSSI_MEASUREMENT_REQUEST: u8 = 22;
    pub const CLIENT_RX_RSSI_MEASUREMENT_RESPONSE: u8 = 23;
    pub const CLIENT_RX_RSSI_MEASUREMENT_CMD_RESPONSE: u8 = 24;
    pub const CLIENT_ASSOCIATED_NOTIFICATION: u8 = 25;
    pub const CLIENT_DISCONNECTED_NOTIFICATION: u8 = 26;
    pub const CLIENT_IRE_CONNECTED_NOTIFICATION: u8 = 27;
    pub const STEERING_CLIENT_SET_REQUEST: u8 = 28;
    pub const STEERING_CLIENT_SET_RESPONSE: u8 = 29;
    pub const STEERING_EVENT_PROBE_REQ_NOTIFICATION: u8 = 30;
    pub const STEERING_EVENT_AUTH_FAIL_NOTIFICATION: u8 = 31;
    pub const HOSTAP_SET_NEIGHBOR_11K_REQUEST: u8 = 32;
    pub const HOSTAP_REMOVE_NEIGHBOR_11K_REQUEST: u8 = 33;
}

/// Action-op catalogue for monitor traffic.
pub mod monitor_op {
    pub const JOINED_NOTIFICATION: u8 = 1;
    pub const HEARTBEAT_NOTIFICATION: u8 = 2;
    pub const SON_CONFIG_UPDATE: u8 = 3;
    pub const CHANGE_MODULE_LOGGING_LEVEL: u8 = 4;
    pub const HOSTAP_STATUS_CHANGED_NOTIFICATION: u8 = 5;
    pub const HOSTAP_AP_DISABLED_NOTIFICATION: u8 = 6;
    pub const HOSTAP_ACTIVITY_NOTIFICATION: u8 = 7;
    pub const HOSTAP_STATS_MEASUREMENT_REQUEST: u8 = 8;
    pub const HOSTAP_STATS_MEASUREMENT_RESPONSE: u8 = 9;
    pub const CLIENT_START_MONITORING_REQUEST: u8 = 10;
    pub const CLIENT_STOP_MONITORING_REQUEST: u8 = 11;
    pub const CLIENT_RX_RSSI_MEASUREMENT_REQUEST: u8 = 12;
    pub const CLIENT_RX_RSSI_MEASUREMENT_RESPONSE: u8 = 13;
    pub const CLIENT_RX_RSSI_MEASUREMENT_CMD_RESPONSE: u8 = 14;
    pub const CLIENT_RX_RSSI_MEASUREMENT_START_NOTIFICATION: u8 = 15;
    pub const CLIENT_RX_RSSI_MEASUREMENT_NOTIFICATION: u8 = 16;
    pub const CLIENT_BEACON_11K_REQUEST: u8 = 17;
    pub const CLIENT_BEACON_11K_RESPONSE: u8 = 18;
    pub const CLIENT_CHANNEL_LOAD_11K_REQUEST: u8 = 19;
    pub const CLIENT_CHANNEL_LOAD_11K_RESPONSE: u8 = 20;
    pub const CLIENT_STATISTICS_11K_REQUEST: u8 = 21;
    pub const CLIENT_STATISTICS_11K_RESPONSE: u8 = 22;
    pub const CLIENT_LINK_MEASUREMENT_11K_REQUEST: u8 = 23;
    pub const CLIENT_LINK_MEASUREMENT_11K_RESPONSE: u8 = 24;
    pub const CLIENT_NO_RESPONSE_NOTIFICATION: u8 = 25;
    pub const CLIENT_NO_ACTIVITY_NOTIFICATION: u8 = 26;
    pub const STEERING_EVENT_CLIENT_ACTIVITY_NOTIFICATION: u8 = 27;
    pub const STEERING_EVENT_SNR_XING_NOTIFICATION: u8 = 28;
    pub const STEERING_CLIENT_SET_GROUP_REQUEST: u8 = 29;
    pub const STEERING_CLIENT_SET_GROUP_RESPONSE: u8 = 30;
    pub const STEERING_CLIENT_SET_REQUEST: u8 = 31;
    pub const STEERING_CLIENT_SET_RESPONSE: u8 = 32;
    pub const ERROR_NOTIFICATION: u8 = 33;
    pub const ERROR_NOTIFICATION_ACK: u8 = 34;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vs_header_pack_layout() {
        let header = VsHeaderPack {
            action: Action::Control.to_wire(),
            action_op: control_op::SON_CONFIG_UPDATE,
            direction: direction::TO_AGENT,
            radio_mac: [0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22],
            id: 0x0102,
            length: 0x0010,
        };
        assert_eq!(
            header.pack().unwrap(),
            [
                0x00, 0x03, 0x00, 0xaa, 0xbb, 0xcc, 0x00, 0x11, 0x22, 0x02, 0x01, 0x10,
                0x00
            ]
        );
    }

    #[test]
    fn vs_cmdu_round_trip() {
        let cmdu = build_vs_cmdu(Action::Monitor, monitor_op::JOINED_NOTIFICATION, 5, &[9, 9]);
        let parsed = Cmdu::parse(&cmdu.serialize()).unwrap();
        let (header, payload) = parse_vs_cmdu(&parsed).unwrap();
        assert_eq!(header.action, Action::Monitor);
        assert_eq!(header.action_op, monitor_op::JOINED_NOTIFICATION);
        assert_eq!(header.id, 5);
        assert_eq!(payload, &[9, 9]);
    }

    #[test]
    fn controller_stamp_rewrites_direction_and_mac() {
        let mac = MacAddr([1, 2, 3, 4, 5, 6]);
        let mut cmdu = build_vs_cmdu(Action::Control, control_op::AGENT_PING_REQUEST, 0, &[]);
        stamp_for_controller(&mut cmdu, mac);
        let (header, _) = parse_vs_cmdu(&cmdu).unwrap();
        assert_eq!(header.direction, direction::TO_CONTROLLER);
        assert_eq!(header.radio_mac, mac);
    }

    #[test]
    fn foreign_oui_is_rejected() {
        let mut tlv = build_vs_tlv(Action::Control, control_op::SON_CONFIG_UPDATE, 0, &[]);
        tlv.value[0] = 0xde;
        assert_eq!(
            parse_vs_tlv(&tlv.value),
            Err(WireError::Invalid("vendor oui"))
        );
    }
}
