//! Message routing fabric.
//!
//! Inbound vendor messages are dispatched through a table keyed by
//! `(action, action_op)`. Most rules are pure translate-and-forward: the
//! payload is copied structurally under a new header addressed to the
//! destination peer. The rest absorb into supervisor state, or do both.

use std::collections::HashMap;

use anyhow::{bail, Error};
use log::{debug, error, info, trace, warn};
use once_cell::sync::Lazy;

use crate::errors::PlatformError;
use crate::link::{LinkId, Links};
use crate::message::payloads::{
    ApManagerJoined, BackhaulConnectedParams, BackhaulDisconnectedParams, Beacon11kRequest,
    ClientAssociationParams, ClientDisconnectionParams, ClientMonitoringParams, CsaNotification,
    DhcpMonitorNotification, DlRssiReport, HostapStatusChanged, IfaceStateResponse,
    LoggingLevelParams, MonitorError, OperationalNotification, PingParams,
    PlatformRegisterResponse, RadioTxState, ResultPayload, RssiMeasurementRequest,
    RssiMeasurementResponse, SonConfig, StopOnFailureAttempts, WifiCredentials, WlanSettings,
    CredentialsSetResponse, dhcp_op, IFACE_RADIO_ID,
};
use crate::message::types::{entity, module, IfaceOperation, RadioStatus, WifiSec};
use crate::message::vendor::{
    self, ap_manager_op, backhaul_op, control_op, direction, monitor_op, platform_op, Action,
    VsHeader,
};
use crate::message::wire::Writer;
use crate::message::{Cmdu, MessageType, Wire};
use crate::slave::{Slave, State};
use crate::status::apply_rssi_hysteresis;
use crate::timers::{
    CREDENTIALS_UPDATE_RESPONSE_TIMEOUT, IRE_MAX_WIRELESS_RECONNECTION_TIME,
    WAIT_AFTER_WIFI_CONFIG_UPDATE, WAIT_BEFORE_SEND_BH_ENABLE,
    WIFI_CONFIGURATION_UPDATE_COMPLETE_TIMEOUT,
};

type Handler = fn(&mut Slave, &mut dyn Links, &VsHeader, &[u8]) -> Result<(), Error>;

/// Destination peer of a translate-and-forward rule.
#[derive(Clone, Copy, Debug)]
enum Dest {
    Controller,
    Backhaul,
    Platform,
    ApManager,
    Monitor,
}

/// One routing rule of the dispatch table.
enum Rule {
    /// Copy the payload structurally under a new `(action, op)` header and
    /// forward it to `dest`, preserving the message id.
    Relay { dest: Dest, op: u8 },
    /// Mutate supervisor state (and possibly forward as a side effect).
    Handle(Handler),
}

fn relay(dest: Dest, op: u8) -> Rule {
    Rule::Relay { dest, op }
}

impl Slave {
    /// Entry point for every frame pulled off a link.
    pub fn handle_frame(
        &mut self,
        links: &mut dyn Links,
        link: LinkId,
        data: &[u8],
    ) -> Result<(), Error> {
        let cmdu = Cmdu::parse(data)?;
        if cmdu.message_type == MessageType::VendorSpecific {
            let (header, payload) = vendor::parse_vs_cmdu(&cmdu)?;
            let payload = payload.to_vec();
            match header.action {
                Action::Control => self.handle_control_message(links, link, &header, &payload),
                Action::Backhaul => self.handle_backhaul_message(links, link, &header, &payload),
                Action::Platform => self.handle_platform_message(links, link, &header, &payload),
                Action::ApManager => {
                    self.handle_ap_manager_message(links, link, &header, &payload)
                }
                Action::Monitor => self.handle_monitor_message(links, link, &header, &payload),
            }
        } else {
            self.handle_ieee1905_message(links, link, &cmdu)
        }
    }

    fn handle_ieee1905_message(
        &mut self,
        links: &mut dyn Links,
        link: LinkId,
        cmdu: &Cmdu,
    ) -> Result<(), Error> {
        if !self.master_attached {
            return Ok(());
        }
        if link != LinkId::Backhaul {
            warn!("1905.1 message {:?} from unexpected link", cmdu.message_type);
            return Ok(());
        }
        if matches!(self.state, State::Stopped) {
            return Ok(());
        }

        self.master_last_seen = self.now();
        self.keep_alive_retries = 0;

        match cmdu.message_type {
            MessageType::ApAutoconfigurationWsc => self.handle_autoconfiguration_wsc(links, cmdu),
            MessageType::ChannelPreferenceQuery => {
                self.handle_channel_preference_query(links, cmdu)
            }
            other => bail!("unhandled CMDU message type {other:?}"),
        }
    }

    fn dispatch(
        &mut self,
        links: &mut dyn Links,
        header: &VsHeader,
        payload: &[u8],
    ) -> Result<(), Error> {
        match ROUTES.get(&(header.action, header.action_op)) {
            Some(Rule::Relay { dest, op }) => self.forward(links, *dest, *op, header, payload),
            Some(Rule::Handle(handler)) => handler(self, links, header, payload),
            None => bail!(
                "unknown {:?} message, action_op {}",
                header.action,
                header.action_op
            ),
        }
    }

    /// Structural copy: same payload bytes, new header, message id kept.
    fn forward(
        &mut self,
        links: &mut dyn Links,
        dest: Dest,
        op: u8,
        header: &VsHeader,
        payload: &[u8],
    ) -> Result<(), Error> {
        match dest {
            Dest::Controller => {
                let cmdu = vendor::build_vs_cmdu(Action::Control, op, header.id, payload);
                self.send_to_controller(links, cmdu);
            }
            Dest::Backhaul => {
                self.send_backhaul(links, op, header.id, payload);
            }
            Dest::Platform => {
                self.send_platform(links, op, header.id, payload);
            }
            Dest::ApManager => {
                self.send_ap_manager(links, op, header.id, payload);
            }
            Dest::Monitor => {
                self.send_monitor(links, op, header.id, payload);
            }
        }
        Ok(())
    }

    // ---- per-origin entry checks ------------------------------------------

    fn handle_control_message(
        &mut self,
        links: &mut dyn Links,
        link: LinkId,
        header: &VsHeader,
        payload: &[u8],
    ) -> Result<(), Error> {
        // to me or not to me
        if header.radio_mac != self.hostap_params.iface_mac {
            return Ok(());
        }
        if header.direction == direction::TO_CONTROLLER {
            return Ok(());
        }
        if !self.master_attached {
            return Ok(());
        }
        if link != LinkId::Backhaul {
            warn!("control action_op {} from unknown link", header.action_op);
            return Ok(());
        }
        if matches!(self.state, State::Stopped) {
            return Ok(());
        }

        self.master_last_seen = self.now();
        self.keep_alive_retries = 0;

        self.dispatch(links, header, payload)
    }

    fn handle_backhaul_message(
        &mut self,
        links: &mut dyn Links,
        link: LinkId,
        header: &VsHeader,
        payload: &[u8],
    ) -> Result<(), Error> {
        if !self.has_backhaul {
            error!("backhaul message while link is down");
            return Ok(());
        }
        if link != LinkId::Backhaul {
            error!("backhaul action_op {} from unknown link", header.action_op);
            return Ok(());
        }
        self.dispatch(links, header, payload)
    }

    fn handle_platform_message(
        &mut self,
        links: &mut dyn Links,
        link: LinkId,
        header: &VsHeader,
        payload: &[u8],
    ) -> Result<(), Error> {
        if link != LinkId::Platform {
            error!("platform action_op {} from unknown link", header.action_op);
            return Ok(());
        }
        self.dispatch(links, header, payload)
    }

    fn handle_ap_manager_message(
        &mut self,
        links: &mut dyn Links,
        link: LinkId,
        header: &VsHeader,
        payload: &[u8],
    ) -> Result<(), Error> {
        match self.ap_manager_link {
            None => {
                if header.action_op != ap_manager_op::INIT_DONE_NOTIFICATION {
                    error!(
                        "ap manager action_op {} before init-done",
                        header.action_op
                    );
                    return Ok(());
                }
                info!("ap manager init done on {link:?}");
                self.ap_manager_link = Some(link);
                self.note_ap_manager_heartbeat();
                self.goto(State::WaitForApManagerJoined);
                return Ok(());
            }
            Some(known) if known != link => {
                error!(
                    "ap manager action_op {} from unknown link",
                    header.action_op
                );
                return Ok(());
            }
            Some(_) => {}
        }
        if header.action_op == ap_manager_op::HEARTBEAT_NOTIFICATION {
            self.note_ap_manager_heartbeat();
            return Ok(());
        }
        self.dispatch(links, header, payload)
    }

    fn handle_monitor_message(
        &mut self,
        links: &mut dyn Links,
        link: LinkId,
        header: &VsHeader,
        payload: &[u8],
    ) -> Result<(), Error> {
        match self.monitor_link {
            None => {
                if header.action_op != monitor_op::JOINED_NOTIFICATION {
                    error!("monitor action_op {} before joined", header.action_op);
                    return Ok(());
                }
                if matches!(self.state, State::WaitForMonitorJoined) {
                    info!("monitor joined on {link:?}");
                    self.monitor_link = Some(link);
                    self.note_monitor_heartbeat();
                    self.goto(State::BackhaulEnable);
                } else {
                    error!("monitor joined outside WaitForMonitorJoined");
                }
                return Ok(());
            }
            Some(known) if known != link => {
                warn!("monitor action_op {} from unknown link", header.action_op);
                return Ok(());
            }
            Some(_) => {}
        }
        if header.action_op == monitor_op::HEARTBEAT_NOTIFICATION {
            self.note_monitor_heartbeat();
            return Ok(());
        }
        self.dispatch(links, header, payload)
    }
}

static ROUTES: Lazy<HashMap<(Action, u8), Rule>> = Lazy::new(|| {
    use Action::*;
    let mut t: HashMap<(Action, u8), Rule> = HashMap::new();

    // ---- controller-sourced ------------------------------------------------
    t.insert(
        (Control, control_op::ARP_QUERY_REQUEST),
        relay(Dest::Platform, platform_op::ARP_QUERY_REQUEST),
    );
    t.insert(
        (Control, control_op::SON_CONFIG_UPDATE),
        Rule::Handle(handle_son_config_update),
    );
    t.insert(
        (Control, control_op::HOSTAP_SET_RESTRICTED_FAILSAFE_CHANNEL_REQUEST),
        relay(
            Dest::ApManager,
            ap_manager_op::HOSTAP_SET_RESTRICTED_FAILSAFE_CHANNEL_REQUEST,
        ),
    );
    t.insert(
        (Control, control_op::HOSTAP_CHANNEL_SWITCH_ACS_START),
        relay(Dest::ApManager, ap_manager_op::HOSTAP_CHANNEL_SWITCH_ACS_START),
    );
    t.insert(
        (Control, control_op::CLIENT_START_MONITORING_REQUEST),
        Rule::Handle(handle_client_start_monitoring),
    );
    t.insert(
        (Control, control_op::CLIENT_STOP_MONITORING_REQUEST),
        relay(Dest::Monitor, monitor_op::CLIENT_STOP_MONITORING_REQUEST),
    );
    t.insert(
        (Control, control_op::CLIENT_RX_RSSI_MEASUREMENT_REQUEST),
        Rule::Handle(handle_rssi_measurement_request),
    );
    t.insert(
        (Control, control_op::CLIENT_ALLOW_REQUEST),
        relay(Dest::ApManager, ap_manager_op::CLIENT_ALLOW_REQUEST),
    );
    t.insert(
        (Control, control_op::CLIENT_DISALLOW_REQUEST),
        relay(Dest::ApManager, ap_manager_op::CLIENT_DISALLOW_REQUEST),
    );
    t.insert(
        (Control, control_op::CLIENT_DISCONNECT_REQUEST),
        relay(Dest::ApManager, ap_manager_op::CLIENT_DISCONNECT_REQUEST),
    );
    t.insert(
        (Control, control_op::CLIENT_BSS_STEER_REQUEST),
        relay(Dest::ApManager, ap_manager_op::CLIENT_BSS_STEER_REQUEST),
    );
    t.insert(
        (Control, control_op::CONTROLLER_PING_REQUEST),
        Rule::Handle(handle_controller_ping_request),
    );
    t.insert(
        (Control, control_op::AGENT_PING_RESPONSE),
        Rule::Handle(handle_agent_ping_response),
    );
    t.insert(
        (Control, control_op::CHANGE_MODULE_LOGGING_LEVEL),
        Rule::Handle(handle_logging_level_change),
    );
    t.insert(
        (Control, control_op::BACKHAUL_ROAM_REQUEST),
        Rule::Handle(handle_backhaul_roam_request),
    );
    t.insert(
        (Control, control_op::BACKHAUL_RESET),
        relay(Dest::Backhaul, backhaul_op::RESET),
    );
    t.insert(
        (Control, control_op::HOSTAP_TX_ON_REQUEST),
        Rule::Handle(handle_tx_on_request),
    );
    t.insert(
        (Control, control_op::HOSTAP_TX_OFF_REQUEST),
        Rule::Handle(handle_tx_off_request),
    );
    t.insert(
        (Control, control_op::HOSTAP_STATS_MEASUREMENT_REQUEST),
        Rule::Handle(handle_stats_measurement_request),
    );
    t.insert(
        (Control, control_op::HOSTAP_SET_NEIGHBOR_11K_REQUEST),
        relay(Dest::ApManager, ap_manager_op::HOSTAP_SET_NEIGHBOR_11K_REQUEST),
    );
    t.insert(
        (Control, control_op::HOSTAP_REMOVE_NEIGHBOR_11K_REQUEST),
        relay(Dest::ApManager, ap_manager_op::HOSTAP_REMOVE_NEIGHBOR_11K_REQUEST),
    );
    t.insert(
        (Control, control_op::CLIENT_BEACON_11K_REQUEST),
        Rule::Handle(handle_beacon_11k_request),
    );
    t.insert(
        (Control, control_op::CLIENT_CHANNEL_LOAD_11K_REQUEST),
        relay(Dest::Monitor, monitor_op::CLIENT_CHANNEL_LOAD_11K_REQUEST),
    );
    t.insert(
        (Control, control_op::CLIENT_STATISTICS_11K_REQUEST),
        relay(Dest::Monitor, monitor_op::CLIENT_STATISTICS_11K_REQUEST),
    );
    t.insert(
        (Control, control_op::CLIENT_LINK_MEASUREMENT_11K_REQUEST),
        relay(Dest::Monitor, monitor_op::CLIENT_LINK_MEASUREMENT_11K_REQUEST),
    );
    t.insert(
        (Control, control_op::HOSTAP_UPDATE_STOP_ON_FAILURE_ATTEMPTS_REQUEST),
        Rule::Handle(handle_update_failure_attempts),
    );
    t.insert(
        (Control, control_op::HOSTAP_DISABLED_BY_MASTER),
        Rule::Handle(handle_hostap_disabled_by_master),
    );
    t.insert(
        (Control, control_op::WIFI_CREDENTIALS_UPDATE_PREPARE_REQUEST),
        Rule::Handle(handle_credentials_prepare),
    );
    t.insert(
        (Control, control_op::WIFI_CREDENTIALS_UPDATE_PRE_COMMIT_REQUEST),
        Rule::Handle(handle_credentials_pre_commit),
    );
    t.insert(
        (Control, control_op::WIFI_CREDENTIALS_UPDATE_COMMIT_REQUEST),
        Rule::Handle(handle_credentials_commit),
    );
    t.insert(
        (Control, control_op::WIFI_CREDENTIALS_UPDATE_ABORT_REQUEST),
        Rule::Handle(handle_credentials_abort),
    );
    t.insert(
        (Control, control_op::VERSION_MISMATCH_NOTIFICATION),
        relay(Dest::Platform, platform_op::VERSION_MISMATCH_NOTIFICATION),
    );
    t.insert(
        (Control, control_op::STEERING_CLIENT_SET_GROUP_REQUEST),
        relay(Dest::Monitor, monitor_op::STEERING_CLIENT_SET_GROUP_REQUEST),
    );
    t.insert(
        (Control, control_op::STEERING_CLIENT_SET_REQUEST),
        Rule::Handle(handle_steering_client_set),
    );

    // ---- backhaul-manager-sourced -----------------------------------------
    t.insert(
        (Backhaul, backhaul_op::REGISTER_RESPONSE),
        Rule::Handle(handle_backhaul_register_response),
    );
    t.insert(
        (Backhaul, backhaul_op::CONNECTED_NOTIFICATION),
        Rule::Handle(handle_backhaul_connected),
    );
    t.insert(
        (Backhaul, backhaul_op::BUSY_NOTIFICATION),
        Rule::Handle(handle_backhaul_busy),
    );
    t.insert(
        (Backhaul, backhaul_op::DISCONNECTED_NOTIFICATION),
        Rule::Handle(handle_backhaul_disconnected),
    );
    t.insert(
        (Backhaul, backhaul_op::CLIENT_RX_RSSI_MEASUREMENT_RESPONSE),
        Rule::Handle(handle_backhaul_rssi_response),
    );
    t.insert(
        (Backhaul, backhaul_op::CLIENT_RX_RSSI_MEASUREMENT_CMD_RESPONSE),
        relay(
            Dest::Controller,
            control_op::CLIENT_RX_RSSI_MEASUREMENT_CMD_RESPONSE,
        ),
    );
    t.insert(
        (Backhaul, backhaul_op::DL_RSSI_REPORT_NOTIFICATION),
        Rule::Handle(handle_dl_rssi_report),
    );

    // ---- platform-adapter-sourced -----------------------------------------
    t.insert(
        (Platform, platform_op::ADVERTISE_SSID_FLAG_UPDATE_RESPONSE),
        Rule::Handle(handle_advertise_flag_response),
    );
    t.insert(
        (Platform, platform_op::SON_SLAVE_REGISTER_RESPONSE),
        Rule::Handle(handle_platform_register_response),
    );
    t.insert(
        (Platform, platform_op::GET_WLAN_READY_STATUS_RESPONSE),
        Rule::Handle(handle_wlan_ready_status_response),
    );
    t.insert(
        (Platform, platform_op::WIFI_SET_IFACE_STATE_RESPONSE),
        Rule::Handle(handle_iface_state_response),
    );
    t.insert(
        (Platform, platform_op::WIFI_CREDENTIALS_SET_RESPONSE),
        Rule::Handle(handle_credentials_set_response),
    );
    t.insert(
        (Platform, platform_op::POST_INIT_CONFIG_RESPONSE),
        Rule::Handle(handle_post_init_config_response),
    );
    t.insert(
        (Platform, platform_op::WIFI_SET_RADIO_TX_STATE_RESPONSE),
        Rule::Handle(handle_radio_tx_state_response),
    );
    t.insert(
        (Platform, platform_op::ARP_MONITOR_NOTIFICATION),
        Rule::Handle(handle_arp_monitor_notification),
    );
    t.insert(
        (Platform, platform_op::WLAN_PARAMS_CHANGED_NOTIFICATION),
        Rule::Handle(handle_wlan_params_changed),
    );
    t.insert(
        (Platform, platform_op::OPERATIONAL_NOTIFICATION),
        Rule::Handle(handle_operational_notification),
    );
    t.insert(
        (Platform, platform_op::DHCP_MONITOR_NOTIFICATION),
        Rule::Handle(handle_dhcp_monitor_notification),
    );
    t.insert(
        (Platform, platform_op::BEEROCKS_CREDENTIALS_UPDATE_RESPONSE),
        Rule::Handle(handle_credentials_update_response),
    );
    t.insert(
        (Platform, platform_op::WIFI_CONFIGURATION_UPDATE_REQUEST),
        Rule::Handle(handle_wifi_configuration_update),
    );
    t.insert(
        (Platform, platform_op::ARP_QUERY_RESPONSE),
        Rule::Handle(handle_arp_query_response),
    );

    // ---- ap-manager-sourced ------------------------------------------------
    t.insert(
        (ApManager, ap_manager_op::JOINED_NOTIFICATION),
        Rule::Handle(handle_ap_manager_joined),
    );
    t.insert(
        (ApManager, ap_manager_op::HOSTAP_SET_RESTRICTED_FAILSAFE_CHANNEL_RESPONSE),
        relay(
            Dest::Controller,
            control_op::HOSTAP_SET_RESTRICTED_FAILSAFE_CHANNEL_RESPONSE,
        ),
    );
    t.insert(
        (ApManager, ap_manager_op::HOSTAP_AP_DISABLED_NOTIFICATION),
        Rule::Handle(handle_ap_disabled),
    );
    t.insert(
        (ApManager, ap_manager_op::HOSTAP_AP_ENABLED_NOTIFICATION),
        relay(Dest::Controller, control_op::HOSTAP_AP_ENABLED_NOTIFICATION),
    );
    t.insert(
        (ApManager, ap_manager_op::HOSTAP_VAPS_LIST_UPDATE_NOTIFICATION),
        relay(
            Dest::Controller,
            control_op::HOSTAP_VAPS_LIST_UPDATE_NOTIFICATION,
        ),
    );
    t.insert(
        (ApManager, ap_manager_op::HOSTAP_ACS_NOTIFICATION),
        relay(Dest::Controller, control_op::HOSTAP_ACS_NOTIFICATION),
    );
    t.insert(
        (ApManager, ap_manager_op::HOSTAP_CSA_NOTIFICATION),
        Rule::Handle(handle_csa_notification),
    );
    t.insert(
        (ApManager, ap_manager_op::HOSTAP_CSA_ERROR_NOTIFICATION),
        relay(Dest::Controller, control_op::HOSTAP_CSA_ERROR_NOTIFICATION),
    );
    t.insert(
        (ApManager, ap_manager_op::CLIENT_RX_RSSI_MEASUREMENT_RESPONSE),
        Rule::Handle(handle_ap_manager_rssi_response),
    );
    t.insert(
        (ApManager, ap_manager_op::CLIENT_RX_RSSI_MEASUREMENT_CMD_RESPONSE),
        relay(
            Dest::Controller,
            control_op::CLIENT_RX_RSSI_MEASUREMENT_CMD_RESPONSE,
        ),
    );
    t.insert(
        (ApManager, ap_manager_op::CLIENT_DISCONNECTED_NOTIFICATION),
        Rule::Handle(handle_client_disconnected),
    );
    t.insert(
        (ApManager, ap_manager_op::CLIENT_BSS_STEER_RESPONSE),
        relay(Dest::Controller, control_op::CLIENT_BSS_STEER_RESPONSE),
    );
    t.insert(
        (ApManager, ap_manager_op::HOSTAP_DFS_CAC_COMPLETED_NOTIFICATION),
        Rule::Handle(handle_dfs_cac_completed),
    );
    t.insert(
        (ApManager, ap_manager_op::HOSTAP_DFS_CHANNEL_AVAILABLE_NOTIFICATION),
        relay(
            Dest::Controller,
            control_op::HOSTAP_DFS_CHANNEL_AVAILABLE_NOTIFICATION,
        ),
    );
    t.insert(
        (ApManager, ap_manager_op::CLIENT_ASSOCIATED_NOTIFICATION),
        Rule::Handle(handle_client_associated),
    );
    t.insert(
        (ApManager, ap_manager_op::STEERING_EVENT_PROBE_REQ_NOTIFICATION),
        relay(
            Dest::Controller,
            control_op::STEERING_EVENT_PROBE_REQ_NOTIFICATION,
        ),
    );
    t.insert(
        (ApManager, ap_manager_op::STEERING_EVENT_AUTH_FAIL_NOTIFICATION),
        relay(
            Dest::Controller,
            control_op::STEERING_EVENT_AUTH_FAIL_NOTIFICATION,
        ),
    );
    t.insert(
        (ApManager, ap_manager_op::CLIENT_DISCONNECT_RESPONSE),
        relay(Dest::Controller, control_op::CLIENT_DISCONNECT_RESPONSE),
    );
    t.insert(
        (ApManager, ap_manager_op::STEERING_CLIENT_SET_RESPONSE),
        relay(Dest::Controller, control_op::STEERING_CLIENT_SET_RESPONSE),
    );

    // ---- monitor-sourced ---------------------------------------------------
    t.insert(
        (Monitor, monitor_op::HOSTAP_AP_DISABLED_NOTIFICATION),
        Rule::Handle(handle_monitor_ap_disabled),
    );
    t.insert(
        (Monitor, monitor_op::HOSTAP_STATUS_CHANGED_NOTIFICATION),
        Rule::Handle(handle_hostap_status_changed),
    );
    t.insert(
        (Monitor, monitor_op::CLIENT_RX_RSSI_MEASUREMENT_RESPONSE),
        Rule::Handle(handle_monitor_rssi_response),
    );
    t.insert(
        (Monitor, monitor_op::CLIENT_RX_RSSI_MEASUREMENT_START_NOTIFICATION),
        relay(
            Dest::Controller,
            control_op::CLIENT_RX_RSSI_MEASUREMENT_START_NOTIFICATION,
        ),
    );
    t.insert(
        (Monitor, monitor_op::CLIENT_RX_RSSI_MEASUREMENT_NOTIFICATION),
        relay(
            Dest::Controller,
            control_op::CLIENT_RX_RSSI_MEASUREMENT_NOTIFICATION,
        ),
    );
    t.insert(
        (Monitor, monitor_op::CLIENT_RX_RSSI_MEASUREMENT_CMD_RESPONSE),
        relay(
            Dest::Controller,
            control_op::CLIENT_RX_RSSI_MEASUREMENT_CMD_RESPONSE,
        ),
    );
    t.insert(
        (Monitor, monitor_op::HOSTAP_STATS_MEASUREMENT_RESPONSE),
        relay(
            Dest::Controller,
            control_op::HOSTAP_STATS_MEASUREMENT_RESPONSE,
        ),
    );
    t.insert(
        (Monitor, monitor_op::CLIENT_NO_RESPONSE_NOTIFICATION),
        relay(Dest::Controller, control_op::CLIENT_NO_RESPONSE_NOTIFICATION),
    );
    t.insert(
        (Monitor, monitor_op::CLIENT_NO_ACTIVITY_NOTIFICATION),
        relay(Dest::Controller, control_op::CLIENT_NO_ACTIVITY_NOTIFICATION),
    );
    t.insert(
        (Monitor, monitor_op::CLIENT_BEACON_11K_RESPONSE),
        relay(Dest::Controller, control_op::CLIENT_BEACON_11K_RESPONSE),
    );
    t.insert(
        (Monitor, monitor_op::CLIENT_CHANNEL_LOAD_11K_RESPONSE),
        relay(
            Dest::Controller,
            control_op::CLIENT_CHANNEL_LOAD_11K_RESPONSE,
        ),
    );
    t.insert(
        (Monitor, monitor_op::CLIENT_STATISTICS_11K_RESPONSE),
        relay(Dest::Controller, control_op::CLIENT_STATISTICS_11K_RESPONSE),
    );
    t.insert(
        (Monitor, monitor_op::CLIENT_LINK_MEASUREMENT_11K_RESPONSE),
        relay(
            Dest::Controller,
            control_op::CLIENT_LINK_MEASUREMENT_11K_RESPONSE,
        ),
    );
    t.insert(
        (Monitor, monitor_op::HOSTAP_ACTIVITY_NOTIFICATION),
        relay(Dest::Controller, control_op::HOSTAP_ACTIVITY_NOTIFICATION),
    );
    t.insert(
        (Monitor, monitor_op::ERROR_NOTIFICATION),
        Rule::Handle(handle_monitor_error),
    );
    t.insert(
        (Monitor, monitor_op::STEERING_EVENT_CLIENT_ACTIVITY_NOTIFICATION),
        relay(
            Dest::Controller,
            control_op::STEERING_EVENT_CLIENT_ACTIVITY_NOTIFICATION,
        ),
    );
    t.insert(
        (Monitor, monitor_op::STEERING_EVENT_SNR_XING_NOTIFICATION),
        relay(
            Dest::Controller,
            control_op::STEERING_EVENT_SNR_XING_NOTIFICATION,
        ),
    );
    t.insert(
        (Monitor, monitor_op::STEERING_CLIENT_SET_GROUP_RESPONSE),
        relay(
            Dest::Controller,
            control_op::STEERING_CLIENT_SET_GROUP_RESPONSE,
        ),
    );
    t.insert(
        (Monitor, monitor_op::STEERING_CLIENT_SET_RESPONSE),
        relay(Dest::Controller, control_op::STEERING_CLIENT_SET_RESPONSE),
    );

    t
});

// ---- controller handlers ---------------------------------------------------

fn handle_son_config_update(
    slave: &mut Slave,
    _links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    debug!("received SON config update");
    slave.son_config = SonConfig::from_bytes(payload)?;
    slave.log_son_config();
    Ok(())
}

fn handle_client_start_monitoring(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let params = ClientMonitoringParams::from_bytes(payload)?;
    debug!(
        "start monitoring: mac={} ip={} bridge_4addr_mac={}",
        params.mac, params.ipv4, params.bridge_4addr_mac
    );
    if params.is_ire != 0 {
        let mut w = Writer::new();
        w.mac(params.mac);
        let data = w.into_vec();
        slave.send_ap_manager(
            links,
            ap_manager_op::CLIENT_IRE_CONNECTED_NOTIFICATION,
            header.id,
            &data,
        );
    }
    slave.send_monitor(
        links,
        monitor_op::CLIENT_START_MONITORING_REQUEST,
        header.id,
        payload,
    );
    Ok(())
}

fn handle_rssi_measurement_request(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let request = RssiMeasurementRequest::from_bytes(payload)?;
    let forbackhaul = slave.is_backhaul_manager && slave.backhaul.backhaul_is_wireless;
    let unconnected = request.cross != 0 && request.ipv4.octets()[0] == 0;

    if unconnected && forbackhaul {
        // measured over the wireless uplink
        slave.send_backhaul(
            links,
            backhaul_op::CLIENT_RX_RSSI_MEASUREMENT_REQUEST,
            header.id,
            payload,
        );
    } else if unconnected {
        // unconnected cross client: the AP side measures
        slave.send_ap_manager(
            links,
            ap_manager_op::CLIENT_RX_RSSI_MEASUREMENT_REQUEST,
            header.id,
            payload,
        );
    } else {
        slave.send_monitor(
            links,
            monitor_op::CLIENT_RX_RSSI_MEASUREMENT_REQUEST,
            header.id,
            payload,
        );
    }

    info!(
        "rx_rssi measurement request mac={} ip={} channel={} cross={} id={}",
        request.mac, request.ipv4, request.channel, request.cross, header.id
    );
    Ok(())
}

fn handle_controller_ping_request(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    debug!("received controller ping request");
    let ping = PingParams::from_bytes(payload)?;
    let cmdu = vendor::build_vs_cmdu(
        Action::Control,
        control_op::CONTROLLER_PING_RESPONSE,
        header.id,
        &ping.to_padded_bytes(),
    );
    slave.send_to_controller(links, cmdu);
    Ok(())
}

fn handle_agent_ping_response(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    debug!("received agent ping response");
    let response = PingParams::from_bytes(payload)?;
    if response.total > 0 && response.seq < response.total - 1 {
        let next = PingParams {
            total: response.total,
            seq: response.seq + 1,
            size: response.size,
        };
        let cmdu = vendor::build_vs_cmdu(
            Action::Control,
            control_op::AGENT_PING_REQUEST,
            header.id,
            &next.to_padded_bytes(),
        );
        slave.send_to_controller(links, cmdu);
    }
    Ok(())
}

fn handle_logging_level_change(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let params = LoggingLevelParams::from_bytes(payload)?;
    let all = params.module_name == module::ALL;
    if all || params.module_name == module::SLAVE {
        apply_log_level(&params);
    }
    if all || params.module_name == module::MONITOR {
        slave.send_monitor(
            links,
            monitor_op::CHANGE_MODULE_LOGGING_LEVEL,
            header.id,
            payload,
        );
    }
    if all || params.module_name == module::PLATFORM {
        slave.send_platform(
            links,
            platform_op::CHANGE_MODULE_LOGGING_LEVEL,
            header.id,
            payload,
        );
    }
    Ok(())
}

fn apply_log_level(params: &LoggingLevelParams) {
    let level = match params.log_level {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    if params.enable != 0 {
        log::set_max_level(level);
    } else {
        log::set_max_level(log::LevelFilter::Info);
    }
}

fn handle_backhaul_roam_request(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("received backhaul roam request");
    if slave.is_backhaul_manager && slave.backhaul.backhaul_is_wireless {
        slave.send_backhaul(links, backhaul_op::ROAM_REQUEST, header.id, payload);
    }
    Ok(())
}

fn handle_tx_on_request(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    _payload: &[u8],
) -> Result<(), Error> {
    trace!("received hostap tx-on request");
    let iface = slave.config.hostap_iface.clone();
    slave.set_radio_tx_enable(links, &iface, true);
    Ok(())
}

fn handle_tx_off_request(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    _payload: &[u8],
) -> Result<(), Error> {
    trace!("received hostap tx-off request");
    let iface = slave.config.hostap_iface.clone();
    slave.set_radio_tx_enable(links, &iface, false);
    Ok(())
}

fn handle_stats_measurement_request(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    if slave.monitor_link.is_some() {
        slave.send_monitor(
            links,
            monitor_op::HOSTAP_STATS_MEASUREMENT_REQUEST,
            header.id,
            payload,
        );
    }
    Ok(())
}

fn handle_beacon_11k_request(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let mut request = Beacon11kRequest::from_bytes(payload)?;
    if request.use_optional_ssid != 0 && request.ssid.is_empty() {
        request.ssid = slave.platform_settings.front_ssid.clone();
    }
    let data = request.to_bytes();
    slave.send_monitor(links, monitor_op::CLIENT_BEACON_11K_REQUEST, header.id, &data);
    Ok(())
}

fn handle_update_failure_attempts(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let update = StopOnFailureAttempts::from_bytes(payload)?;
    slave.configured_stop_on_failure_attempts = update.attempts as i32;
    debug!(
        "stop_on_failure_attempts new value: {}",
        update.attempts
    );
    if slave.is_backhaul_manager {
        slave.send_backhaul(
            links,
            backhaul_op::UPDATE_STOP_ON_FAILURE_ATTEMPTS_REQUEST,
            header.id,
            payload,
        );
    }
    Ok(())
}

fn handle_hostap_disabled_by_master(
    slave: &mut Slave,
    _links: &mut dyn Links,
    _header: &VsHeader,
    _payload: &[u8],
) -> Result<(), Error> {
    debug!("hostap disabled by controller, marking slave operational");
    slave.operational = true;
    Ok(())
}

fn handle_credentials_prepare(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("credentials update prepare, id {}", header.id);
    slave.new_credentials = WifiCredentials::from_bytes(payload)?;
    let cmdu = vendor::build_vs_cmdu(
        Action::Control,
        control_op::WIFI_CREDENTIALS_UPDATE_PREPARE_RESPONSE,
        header.id,
        &[],
    );
    slave.send_to_controller(links, cmdu);
    Ok(())
}

fn handle_credentials_pre_commit(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    _payload: &[u8],
) -> Result<(), Error> {
    trace!("credentials update pre-commit, id {}", header.id);
    if slave.new_credentials.ssid.is_empty() {
        error!("staged credentials are not valid");
        return Ok(());
    }
    let data = slave.new_credentials.to_bytes();
    info!("sending wifi credentials update request to platform manager");
    slave.send_platform(
        links,
        platform_op::BEEROCKS_CREDENTIALS_UPDATE_REQUEST,
        header.id,
        &data,
    );
    let cmdu = vendor::build_vs_cmdu(
        Action::Control,
        control_op::WIFI_CREDENTIALS_UPDATE_PRE_COMMIT_RESPONSE,
        header.id,
        &[],
    );
    slave.send_to_controller(links, cmdu);
    Ok(())
}

fn handle_credentials_commit(
    slave: &mut Slave,
    _links: &mut dyn Links,
    _header: &VsHeader,
    _payload: &[u8],
) -> Result<(), Error> {
    trace!("credentials update commit");
    let deadline = slave.now() + CREDENTIALS_UPDATE_RESPONSE_TIMEOUT;
    slave.goto(State::WaitForPlatformCredentialsUpdateResponse { deadline });
    Ok(())
}

fn handle_credentials_abort(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    _payload: &[u8],
) -> Result<(), Error> {
    trace!("credentials update abort");
    if !slave.is_credentials_changed_on_db {
        return Ok(());
    }
    let sec = WifiSec::from_platform_str(&slave.platform_settings.front_security_type);
    if sec == WifiSec::Invalid {
        warn!(
            "unsupported wifi security `{}`, credentials rollover failed",
            slave.platform_settings.front_security_type
        );
        return Ok(());
    }
    slave.new_credentials = WifiCredentials {
        ssid: slave.platform_settings.front_ssid.clone(),
        pass: slave.platform_settings.front_pass.clone(),
        sec: sec.to_wire(),
    };
    let data = slave.new_credentials.to_bytes();
    info!("sending wifi credentials rollback to platform manager");
    slave.send_platform(
        links,
        platform_op::BEEROCKS_CREDENTIALS_UPDATE_REQUEST,
        header.id,
        &data,
    );
    Ok(())
}

fn handle_steering_client_set(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("steering client set request");
    slave.send_monitor(
        links,
        monitor_op::STEERING_CLIENT_SET_REQUEST,
        header.id,
        payload,
    );
    slave.send_ap_manager(
        links,
        ap_manager_op::STEERING_CLIENT_SET_REQUEST,
        header.id,
        payload,
    );
    Ok(())
}

// ---- backhaul handlers ------------------------------------------------------

fn handle_backhaul_register_response(
    slave: &mut Slave,
    _links: &mut dyn Links,
    _header: &VsHeader,
    _payload: &[u8],
) -> Result<(), Error> {
    debug!("backhaul register response");
    if matches!(slave.state, State::WaitForBackhaulRegisterResponse) {
        slave.goto(State::JoinInit);
    } else {
        error!("backhaul register response outside WaitForBackhaulRegisterResponse");
    }
    Ok(())
}

fn handle_backhaul_connected(
    slave: &mut Slave,
    _links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    debug!("backhaul connected notification");
    let params = BackhaulConnectedParams::from_bytes(payload)?;

    if !slave.state.accepts_backhaul_connected() {
        warn!("backhaul connected notification in state {}", slave.state.name());
        return Ok(());
    }

    // a new connection after the join was sent means the uplink moved
    if slave.state.join_sent() {
        slave.is_backhaul_reconf = true;
    }

    slave.is_backhaul_manager = params.is_backhaul_manager != 0;
    if slave.is_backhaul_manager {
        debug!("selected as backhaul manager");
    }

    slave.backhaul.gw_ipv4 = params.gw_ipv4;
    slave.backhaul.gw_bridge_mac = params.gw_bridge_mac;
    slave.backhaul.controller_bridge_mac = params.controller_bridge_mac;
    slave.backhaul.bridge_mac = params.bridge_mac;
    slave.backhaul.bridge_ipv4 = params.bridge_ipv4;
    slave.backhaul.backhaul_mac = params.backhaul_mac;
    slave.backhaul.backhaul_ipv4 = params.backhaul_ipv4;
    slave.backhaul.backhaul_bssid = params.backhaul_bssid;
    slave.backhaul.backhaul_channel = params.backhaul_channel;
    slave.backhaul.backhaul_is_wireless = params.backhaul_is_wireless != 0;
    slave.backhaul.backhaul_iface_type = params.backhaul_iface_type;
    slave.backhaul.scan_measurements = params
        .scan_measurements
        .iter()
        .filter(|m| m.channel > 0)
        .copied()
        .collect();
    for m in &slave.backhaul.scan_measurements {
        debug!("scan: mac={} channel={} rssi={}", m.mac, m.channel, m.rssi);
    }
    slave.backhaul.backhaul_iface = if params.backhaul_is_wireless != 0 {
        slave.config.backhaul_wireless_iface.clone()
    } else {
        slave.config.backhaul_wire_iface.clone()
    };

    if slave.is_backhaul_manager {
        if params.backhaul_is_wireless != 0 {
            // TODO refine by the reported RSSI once the backhaul manager
            // forwards it here
            slave.status_bh = RadioStatus::BhSignalOk;
            slave.status_bh_wired = RadioStatus::Off;
        } else {
            slave.status_bh = RadioStatus::Off;
            slave.status_bh_wired = RadioStatus::BhWired;
        }
    } else {
        slave.status_bh = RadioStatus::Off;
        slave.status_bh_wired = RadioStatus::Off;
    }

    slave.goto(State::BackhaulConnected);
    Ok(())
}

fn handle_backhaul_busy(
    slave: &mut Slave,
    _links: &mut dyn Links,
    _header: &VsHeader,
    _payload: &[u8],
) -> Result<(), Error> {
    if !matches!(slave.state, State::WaitForBackhaulConnected) {
        warn!("backhaul busy notification in state {}", slave.state.name());
        return Ok(());
    }
    let deadline = slave.now() + WAIT_BEFORE_SEND_BH_ENABLE;
    slave.goto(State::WaitBackhaulBusy { deadline });
    Ok(())
}

fn handle_backhaul_disconnected(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    if slave.is_slave_reset {
        return Ok(());
    }
    debug!("backhaul disconnected notification");
    let params = BackhaulDisconnectedParams::from_bytes(payload)?;
    slave.stopped |= params.stopped != 0;
    slave.is_backhaul_disconnected = true;
    slave.operational = false;
    slave.update_iface_status(false, false);
    slave.master_attached = false;

    if let State::WaitForPlatformCredentialsUpdateResponse { .. } = slave.state {
        // leave the credentials exchange to finish; extend its window to
        // the reconnection budget
        let deadline = slave.now() + IRE_MAX_WIRELESS_RECONNECTION_TIME;
        slave.goto(State::WaitForPlatformCredentialsUpdateResponse { deadline });
        return Ok(());
    }

    slave.reset(links);
    Ok(())
}

fn handle_backhaul_rssi_response(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let mut response = RssiMeasurementResponse::from_bytes(payload)?;
    debug!(
        "backhaul rssi response mac={} rx_rssi={} id={}",
        response.mac, response.rx_rssi, header.id
    );
    response.src_module = entity::BACKHAUL_MANAGER;
    let cmdu = vendor::build_vs_cmdu(
        Action::Control,
        control_op::CLIENT_RX_RSSI_MEASUREMENT_RESPONSE,
        header.id,
        &response.to_bytes(),
    );
    slave.send_to_controller(links, cmdu);
    Ok(())
}

fn handle_dl_rssi_report(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    debug!("backhaul DL RSSI report");
    let report = DlRssiReport::from_bytes(payload)?;
    let cmdu = vendor::build_vs_cmdu(
        Action::Control,
        control_op::BACKHAUL_DL_RSSI_REPORT_NOTIFICATION,
        header.id,
        payload,
    );
    slave.send_to_controller(links, cmdu);

    if let Some(status) = apply_rssi_hysteresis(slave.last_reported_backhaul_rssi, report.rssi) {
        slave.last_reported_backhaul_rssi = Some(report.rssi);
        slave.status_bh = status;
    }
    Ok(())
}

// ---- platform handlers ------------------------------------------------------

fn handle_advertise_flag_response(
    _slave: &mut Slave,
    _links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let response = ResultPayload::from_bytes(payload)?;
    debug!(
        "advertise ssid flag update {}",
        if response.result != 0 { "success" } else { "failure" }
    );
    Ok(())
}

fn handle_platform_register_response(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("platform register response");
    if !matches!(slave.state, State::WaitForPlatformRegisterResponse { .. }) {
        error!("register response outside WaitForPlatformRegisterResponse");
        return Ok(());
    }
    let response = PlatformRegisterResponse::from_bytes(payload)?;
    if response.valid == 0 {
        error!("platform reported invalid configuration");
        slave.platform_notify_error(
            links,
            PlatformError::ConfigPlatformReportedInvalidConfiguration,
            "",
        );
        slave.stop_on_failure_attempts -= 1;
        slave.reset(links);
        return Ok(());
    }

    slave.platform_settings = response.platform_settings;
    slave.wlan_settings = response.wlan_settings;
    info!("local_master={}", slave.platform_settings.local_master);
    info!("local_gw={}", slave.platform_settings.local_gw);

    // check whether the wlan credentials already match the mesh front set
    if slave.wlan_settings.ssid == slave.platform_settings.front_ssid
        && slave.wlan_settings.pass == slave.platform_settings.front_pass
        && slave.wlan_settings.security_type == slave.platform_settings.front_security_type
    {
        debug!("wlan credentials unification is not required");
        slave.is_wlan_credentials_unified = true;
    } else {
        debug!(
            "wlan credentials unification required: wlan ssid `{}`, front ssid `{}`",
            slave.wlan_settings.ssid, slave.platform_settings.front_ssid
        );
        if slave.config.enable_credentials_automatic_unify {
            slave.is_wlan_credentials_unified = false;
        } else {
            debug!("credentials unification skipped by configuration");
        }
    }

    slave.goto(State::ConnectToBackhaul);
    Ok(())
}

fn handle_wlan_ready_status_response(
    slave: &mut Slave,
    _links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("wlan ready status response");
    if !matches!(slave.state, State::WaitForWlanReadyStatusResponse { .. }) {
        error!("wlan ready status response outside WaitForWlanReadyStatusResponse");
        return Ok(());
    }
    let response = ResultPayload::from_bytes(payload)?;
    let success = response.result == 1;
    debug!(
        "wlan ready status: {}",
        if success { "success" } else { "failure" }
    );
    if success {
        slave.goto(State::JoinInitBringUpInterfaces);
    } else {
        slave.goto(State::GetWlanReadyStatus);
    }
    Ok(())
}

fn handle_iface_state_response(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let response = IfaceStateResponse::from_bytes(payload)?;
    let operation = IfaceOperation::from_wire(response.operation);
    let success = response.success != 0;
    debug!(
        "iface state response iface={} operation={:?} {}",
        response.iface_name,
        operation,
        if success { "success" } else { "failure" }
    );
    if success {
        slave.pending_iface_actions.remove(&response.iface_name);
        if let Some(op) = operation {
            if op != IfaceOperation::NoChange {
                let is_ap = slave.ap_manager_link.is_some();
                slave.update_iface_status(is_ap, op != IfaceOperation::Disable);
            }
        }
    } else {
        slave.platform_notify_error(
            links,
            PlatformError::SlaveIfaceChangeStateFailed,
            &response.iface_name,
        );
        slave.stop_on_failure_attempts -= 1;
        slave.reset(links);
    }
    Ok(())
}

fn handle_credentials_set_response(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("wifi credentials set response");
    if !matches!(slave.state, State::WaitForUnifyWifiCredentialsResponse { .. }) {
        debug!("credentials set response outside WaitForUnifyWifiCredentialsResponse");
        return Ok(());
    }
    let response = CredentialsSetResponse::from_bytes(payload)?;
    let success = response.success == 1;
    debug!(
        "set wifi credentials result: {}",
        if success { "success" } else { "failure" }
    );
    slave.is_wlan_credentials_unified = success;
    if !success {
        slave.platform_notify_error(
            links,
            PlatformError::SlaveWifiCredentialsSetFailed,
            &response.iface_name,
        );
        slave.stop_on_failure_attempts -= 1;
        debug!("set wifi credentials failed, resetting");
        slave.reset(links);
    } else if slave.detach_on_conf_change {
        debug!("detach occurred on wifi conf change, resetting");
        slave.reset(links);
    } else {
        debug!("credentials set finished successfully");
        slave.goto(State::StartMonitor);
    }
    Ok(())
}

fn handle_post_init_config_response(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("post init config response");
    if !matches!(slave.state, State::Operational) {
        // a reset may have happened while the post-init ran
        debug!("post init config response outside Operational");
        return Ok(());
    }
    let response = ResultPayload::from_bytes(payload)?;
    if response.result != 1 {
        let iface = slave.config.hostap_iface.clone();
        slave.platform_notify_error(links, PlatformError::SlavePostInitConfigFailed, &iface);
        slave.stop_on_failure_attempts -= 1;
        debug!("post init configuration failed, resetting");
        slave.reset(links);
    }
    Ok(())
}

fn handle_radio_tx_state_response(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let response = RadioTxState::from_bytes(payload)?;
    debug!(
        "radio tx state response iface={} enable={} success={}",
        response.iface_name, response.enable, response.success
    );
    if response.success == 0 {
        error!("radio tx state change failed, resetting");
        slave.stop_on_failure_attempts -= 1;
        slave.platform_notify_error(
            links,
            PlatformError::SlaveTxChangeStateFailed,
            &response.iface_name,
        );
        slave.reset(links);
        return Ok(());
    }
    let is_ap = slave.ap_manager_link.is_some();
    slave.update_iface_status(is_ap, response.enable != 0);
    if slave.master_attached && response.enable != 0 {
        let mid = slave.next_mid();
        let cmdu = vendor::build_vs_cmdu(
            Action::Control,
            control_op::HOSTAP_TX_ON_RESPONSE,
            mid,
            &[],
        );
        slave.send_to_controller(links, cmdu);
    }
    Ok(())
}

fn handle_arp_monitor_notification(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    if slave.master_attached {
        let cmdu = vendor::build_vs_cmdu(
            Action::Control,
            control_op::CLIENT_ARP_MONITOR_NOTIFICATION,
            header.id,
            payload,
        );
        slave.send_to_controller(links, cmdu);
    }
    Ok(())
}

fn handle_wlan_params_changed(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("wlan params changed notification");
    let settings = WlanSettings::from_bytes(payload)?;
    // only a band enable/disable flip matters here
    if settings.band_enabled != slave.wlan_settings.band_enabled {
        debug!("band_enabled changed, resetting");
        slave.reset(links);
    }
    Ok(())
}

fn handle_operational_notification(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let operational = ResultPayload::from_bytes(payload)?;
    debug!(
        "forwarding operational notification, new_oper_state={} bridge_mac={}",
        operational.result, slave.backhaul.bridge_mac
    );
    if slave.master_attached {
        let out = OperationalNotification {
            operational: operational.result,
            bridge_mac: slave.backhaul.bridge_mac,
        };
        let cmdu = vendor::build_vs_cmdu(
            Action::Control,
            control_op::PLATFORM_OPERATIONAL_NOTIFICATION,
            header.id,
            &out.to_bytes(),
        );
        slave.send_to_controller(links, cmdu);
    }
    Ok(())
}

fn handle_dhcp_monitor_notification(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let notification = DhcpMonitorNotification::from_bytes(payload)?;
    if notification.op == dhcp_op::ADD || notification.op == dhcp_op::OLD {
        debug!(
            "dhcp lease mac={} ip={} name={}",
            notification.mac, notification.ipv4, notification.hostname
        );
        if slave.master_attached {
            let mut w = Writer::new();
            w.mac(notification.mac);
            w.ipv4(notification.ipv4);
            w.fixed_str(
                &notification.hostname,
                crate::message::payloads::NODE_NAME_LENGTH,
            );
            let data = w.into_vec();
            let cmdu = vendor::build_vs_cmdu(
                Action::Control,
                control_op::CLIENT_DHCP_COMPLETE_NOTIFICATION,
                header.id,
                &data,
            );
            slave.send_to_controller(links, cmdu);
        }
    } else {
        debug!(
            "dhcp monitor op={} mac={} ip={}",
            notification.op, notification.mac, notification.ipv4
        );
    }
    Ok(())
}

fn handle_credentials_update_response(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("credentials update response");
    let response = ResultPayload::from_bytes(payload)?;
    if response.result != 0 {
        slave.is_credentials_changed_on_db = true;
    } else {
        error!("platform manager failed to update wifi credentials on DB");
        slave.is_credentials_changed_on_db = false;
        slave.platform_notify_error(links, PlatformError::SlaveUpdateCredentialsFailed, "");
        slave.stop_on_failure_attempts -= 1;
        slave.reset(links);
    }
    Ok(())
}

fn handle_wifi_configuration_update(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let config_start = ResultPayload::from_bytes(payload)?.result;
    info!("wifi configuration update, config_start={config_start}");

    if matches!(slave.state, State::WaitForUnifyWifiCredentialsResponse { .. }) {
        debug!("credentials set in progress, ignoring configuration update");
        return Ok(());
    }
    let in_update_window = matches!(
        slave.state,
        State::Operational
            | State::WaitForWifiConfigurationUpdateComplete { .. }
            | State::WaitForAnotherWifiConfigurationUpdate { .. }
    );
    if !in_update_window {
        debug!("invalid state for a configuration update, ignoring");
        return Ok(());
    }

    if config_start == 0 {
        debug!("wifi configuration update complete");
        if slave.detach_on_conf_change {
            debug!("detach occurred on wifi conf change, resetting");
            slave.reset(links);
        } else if slave.master_attached {
            // if the backhaul dropped before the completion arrived, the
            // slave stays where it is
            slave.goto(State::Operational);
        }
    } else if matches!(
        slave.state,
        State::WaitForWifiConfigurationUpdateComplete { .. }
    ) {
        // a second update started before the first finished
        let deadline = slave.now() + WAIT_AFTER_WIFI_CONFIG_UPDATE;
        slave.goto(State::WaitForAnotherWifiConfigurationUpdate { deadline });
    } else {
        let deadline = slave.now() + WIFI_CONFIGURATION_UPDATE_COMPLETE_TIMEOUT;
        slave.goto(State::WaitForWifiConfigurationUpdateComplete { deadline });
    }
    Ok(())
}

fn handle_arp_query_response(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("arp query response");
    if slave.master_attached {
        let cmdu = vendor::build_vs_cmdu(
            Action::Control,
            control_op::ARP_QUERY_RESPONSE,
            header.id,
            payload,
        );
        slave.send_to_controller(links, cmdu);
    }
    Ok(())
}

// ---- ap-manager handlers ----------------------------------------------------

fn handle_ap_manager_joined(
    slave: &mut Slave,
    _links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    info!("ap manager joined");
    let joined = ApManagerJoined::from_bytes(payload)?;
    slave.hostap_params = joined.params;
    slave.hostap_cs_params = joined.cs_params;
    if matches!(slave.state, State::WaitForApManagerJoined) {
        slave.goto(State::ApManagerJoined);
    } else {
        error!("ap manager joined outside WaitForApManagerJoined");
    }
    Ok(())
}

fn handle_ap_disabled(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let notification = crate::message::payloads::VapNotification::from_bytes(payload)?;
    info!("hostap AP disabled on vap_id={}", notification.vap_id);
    if notification.vap_id == IFACE_RADIO_ID {
        warn!("AP disabled on the radio itself, resetting");
        if slave.state.in_conf_change() {
            info!("wifi configuration update in progress, absorbing");
            slave.detach_on_conf_change = true;
        } else if slave.platform_settings.passive_mode_enabled == 0 {
            slave.stop_on_failure_attempts -= 1;
            let iface = slave.config.hostap_iface.clone();
            slave.platform_notify_error(links, PlatformError::ApManagerHostapDisabled, &iface);
        }
        slave.ap_manager_last_error = crate::message::payloads::ap_manager_err::HOSTAP_DISABLED;
        slave.reset(links);
    } else {
        let cmdu = vendor::build_vs_cmdu(
            Action::Control,
            control_op::HOSTAP_AP_DISABLED_NOTIFICATION,
            header.id,
            payload,
        );
        slave.send_to_controller(links, cmdu);
    }
    Ok(())
}

fn handle_csa_notification(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    info!("hostap CSA notification");
    let notification = CsaNotification::from_bytes(payload)?;
    let cmdu = vendor::build_vs_cmdu(
        Action::Control,
        control_op::HOSTAP_CSA_NOTIFICATION,
        header.id,
        payload,
    );
    slave.send_to_controller(links, cmdu);

    slave.hostap_cs_params = notification.cs_params;
    if crate::status::is_dfs_channel(notification.cs_params.channel) {
        info!("AP is in DFS channel {}", notification.cs_params.channel);
        slave.status_ap = RadioStatus::ApDfsCac;
    } else {
        slave.status_ap = RadioStatus::ApOk;
    }
    Ok(())
}

fn handle_ap_manager_rssi_response(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let mut response = RssiMeasurementResponse::from_bytes(payload)?;
    info!(
        "ap manager rssi response mac={} rx_rssi={} id={}",
        response.mac, response.rx_rssi, header.id
    );
    response.src_module = entity::AP_MANAGER;
    let cmdu = vendor::build_vs_cmdu(
        Action::Control,
        control_op::CLIENT_RX_RSSI_MEASUREMENT_RESPONSE,
        header.id,
        &response.to_bytes(),
    );
    slave.send_to_controller(links, cmdu);
    Ok(())
}

fn handle_client_disconnected(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let notification = ClientDisconnectionParams::from_bytes(payload)?;
    info!("client disconnected sta_mac={}", notification.mac);

    // the monitor stops watching the client either way
    let mut w = Writer::new();
    w.mac(notification.mac);
    let stop = w.into_vec();
    slave.send_monitor(
        links,
        monitor_op::CLIENT_STOP_MONITORING_REQUEST,
        header.id,
        &stop,
    );

    if slave.master_attached {
        let cmdu = vendor::build_vs_cmdu(
            Action::Control,
            control_op::CLIENT_DISCONNECTED_NOTIFICATION,
            header.id,
            payload,
        );
        slave.send_to_controller(links, cmdu);
    } else {
        slave.pending_client_association.remove(&notification.mac);
    }
    Ok(())
}

fn handle_dfs_cac_completed(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("DFS CAC completed");
    let cmdu = vendor::build_vs_cmdu(
        Action::Control,
        control_op::HOSTAP_DFS_CAC_COMPLETED_NOTIFICATION,
        header.id,
        payload,
    );
    slave.send_to_controller(links, cmdu);
    slave.status_ap = RadioStatus::ApOk;
    Ok(())
}

fn handle_client_associated(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    trace!("client associated notification");
    let notification = ClientAssociationParams::from_bytes(payload)?;
    info!("client associated sta_mac={}", notification.mac);

    if slave.master_attached {
        let cmdu = vendor::build_vs_cmdu(
            Action::Control,
            control_op::CLIENT_ASSOCIATED_NOTIFICATION,
            header.id,
            payload,
        );
        slave.send_to_controller(links, cmdu);
    } else {
        // held until a controller joins; flushed exactly once on join
        slave
            .pending_client_association
            .insert(notification.mac, notification);
    }
    Ok(())
}

// ---- monitor handlers -------------------------------------------------------

fn handle_monitor_ap_disabled(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let notification = crate::message::payloads::VapNotification::from_bytes(payload)?;
    info!("monitor AP disabled on vap_id={}", notification.vap_id);
    if notification.vap_id == IFACE_RADIO_ID {
        warn!("AP disabled on the radio itself, resetting");
        if slave.platform_settings.passive_mode_enabled == 0 {
            slave.stop_on_failure_attempts -= 1;
            let iface = slave.config.hostap_iface.clone();
            slave.platform_notify_error(links, PlatformError::MonitorHostapDisabled, &iface);
        }
        slave.reset(links);
    }
    Ok(())
}

fn handle_hostap_status_changed(
    slave: &mut Slave,
    links: &mut dyn Links,
    _header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let notification = HostapStatusChanged::from_bytes(payload)?;
    info!(
        "hostap status changed: tx={} enabled={}",
        notification.new_tx_state, notification.new_hostap_enabled_state
    );

    let operational_now = matches!(slave.state, State::Operational)
        && notification.new_tx_state == 1
        && notification.new_hostap_enabled_state == 1;
    if operational_now {
        // the radio is fully up: run the post-init platform configuration
        let mut w = Writer::new();
        w.fixed_str(
            &slave.config.hostap_iface,
            crate::message::payloads::IFACE_NAME_LENGTH,
        );
        let data = w.into_vec();
        let mid = slave.next_mid();
        slave.send_platform(links, platform_op::POST_INIT_CONFIG_REQUEST, mid, &data);
        slave.operational = true;
        slave.slave_resets_counter = 0;
    } else {
        slave.operational = false;
    }

    if matches!(slave.state, State::Operational)
        && notification.new_tx_state == 0
        && notification.new_hostap_enabled_state == 1
    {
        let iface = slave.config.hostap_iface.clone();
        if !slave.set_wifi_iface_state(links, &iface, IfaceOperation::Enable) {
            error!("re-enabling hostap tx failed, resetting");
            slave.platform_notify_error(links, PlatformError::SlaveIfaceChangeStateFailed, &iface);
            slave.stop_on_failure_attempts -= 1;
            slave.reset(links);
        }
    }
    Ok(())
}

fn handle_monitor_rssi_response(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let mut response = RssiMeasurementResponse::from_bytes(payload)?;
    info!(
        "monitor rssi response mac={} rx_rssi={} id={}",
        response.mac, response.rx_rssi, header.id
    );
    response.src_module = entity::MONITOR;
    let cmdu = vendor::build_vs_cmdu(
        Action::Control,
        control_op::CLIENT_RX_RSSI_MEASUREMENT_RESPONSE,
        header.id,
        &response.to_bytes(),
    );
    slave.send_to_controller(links, cmdu);
    Ok(())
}

fn handle_monitor_error(
    slave: &mut Slave,
    links: &mut dyn Links,
    header: &VsHeader,
    payload: &[u8],
) -> Result<(), Error> {
    let notification = MonitorError::from_bytes(payload)?;
    info!("monitor error notification, code={}", notification.error_code);

    if slave.state.in_conf_change() {
        info!("wifi configuration update in progress, absorbing");
        slave.detach_on_conf_change = true;
        return Ok(());
    }

    if let Some(code) = PlatformError::from_monitor_err(notification.error_code) {
        slave.platform_notify_error(links, code, "");
    }
    slave.send_monitor(links, monitor_op::ERROR_NOTIFICATION_ACK, header.id, &[]);
    Ok(())
}
