//! The per-radio slave supervisor.
//!
//! Single-threaded core: the event-loop shell feeds it decoded frames and
//! periodic ticks, the core mutates its state machine and queues outbound
//! messages through the `Links` seam. No I/O happens in here, which is
//! what makes the state machine testable against a fake clock and fake
//! links.

mod fsm;

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

use log::{debug, error, info};

use crate::config::{SlaveConfig, BEEROCKS_VERSION};
use crate::errors::PlatformError;
use crate::link::{LinkId, Links};
use crate::message::payloads::{
    ClientAssociationParams, CsParams, HostapParams, IfaceStateRequest, IfaceStatusNotification,
    PlatformErrorNotification, PlatformSettings, RadioTxState, ScanMeasurement, SonConfig,
    WifiCredentials, WlanSettings,
};
use crate::message::types::{IfaceOperation, MacAddr, RadioStatus};
use crate::message::vendor::{self, platform_op, Action};
use crate::message::{Cmdu, Wire};
use crate::timers::{
    Clock, AP_MANAGER_HEARTBEAT_RETRIES, AP_MANAGER_HEARTBEAT_TIMEOUT, IFACE_ACTION_TIMEOUT,
    KEEP_ALIVE_INTERVAL, MONITOR_HEARTBEAT_RETRIES, MONITOR_HEARTBEAT_TIMEOUT, SLAVE_INIT_DELAY,
};

/// Supervisor state. Every `Wait*` variant that owns a deadline re-checks
/// it on each loop iteration; the others wait for a specific message.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum State {
    WaitBeforeInit { deadline: Duration },
    Init,
    ConnectToPlatform,
    WaitForPlatformRegisterResponse { deadline: Duration },
    ConnectToBackhaul,
    WaitForBackhaulRegisterResponse,
    JoinInit,
    GetWlanReadyStatus,
    WaitForWlanReadyStatusResponse { deadline: Duration },
    JoinInitBringUpInterfaces,
    JoinInitWaitForIfaceChangeDone,
    StartApManager,
    WaitForApManagerInitDone,
    WaitForApManagerJoined,
    ApManagerJoined,
    UnifyWifiCredentials,
    WaitForUnifyWifiCredentialsResponse { deadline: Duration },
    StartMonitor,
    WaitForMonitorJoined,
    BackhaulEnable,
    SendBackhaulEnable,
    WaitForBackhaulConnected,
    WaitBackhaulBusy { deadline: Duration },
    BackhaulConnected,
    WaitBeforeJoinMaster { deadline: Duration },
    JoinMaster,
    WaitForJoinedResponse { deadline: Duration },
    UpdateMonitorSonConfig,
    Operational,
    Onboarding,
    WaitForPlatformCredentialsUpdateResponse { deadline: Duration },
    WaitForWifiConfigurationUpdateComplete { deadline: Duration },
    WaitForAnotherWifiConfigurationUpdate { deadline: Duration },
    VersionMismatch,
    SsidMismatch,
    Stopped,
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::WaitBeforeInit { .. } => "WaitBeforeInit",
            State::Init => "Init",
            State::ConnectToPlatform => "ConnectToPlatform",
            State::WaitForPlatformRegisterResponse { .. } => "WaitForPlatformRegisterResponse",
            State::ConnectToBackhaul => "ConnectToBackhaul",
            State::WaitForBackhaulRegisterResponse => "WaitForBackhaulRegisterResponse",
            State::JoinInit => "JoinInit",
            State::GetWlanReadyStatus => "GetWlanReadyStatus",
            State::WaitForWlanReadyStatusResponse { .. } => "WaitForWlanReadyStatusResponse",
            State::JoinInitBringUpInterfaces => "JoinInitBringUpInterfaces",
            State::JoinInitWaitForIfaceChangeDone => "JoinInitWaitForIfaceChangeDone",
            State::StartApManager => "StartApManager",
            State::WaitForApManagerInitDone => "WaitForApManagerInitDone",
            State::WaitForApManagerJoined => "WaitForApManagerJoined",
            State::ApManagerJoined => "ApManagerJoined",
            State::UnifyWifiCredentials => "UnifyWifiCredentials",
            State::WaitForUnifyWifiCredentialsResponse { .. } => {
                "WaitForUnifyWifiCredentialsResponse"
            }
            State::StartMonitor => "StartMonitor",
            State::WaitForMonitorJoined => "WaitForMonitorJoined",
            State::BackhaulEnable => "BackhaulEnable",
            State::SendBackhaulEnable => "SendBackhaulEnable",
            State::WaitForBackhaulConnected => "WaitForBackhaulConnected",
            State::WaitBackhaulBusy { .. } => "WaitBackhaulBusy",
            State::BackhaulConnected => "BackhaulConnected",
            State::WaitBeforeJoinMaster { .. } => "WaitBeforeJoinMaster",
            State::JoinMaster => "JoinMaster",
            State::WaitForJoinedResponse { .. } => "WaitForJoinedResponse",
            State::UpdateMonitorSonConfig => "UpdateMonitorSonConfig",
            State::Operational => "Operational",
            State::Onboarding => "Onboarding",
            State::WaitForPlatformCredentialsUpdateResponse { .. } => {
                "WaitForPlatformCredentialsUpdateResponse"
            }
            State::WaitForWifiConfigurationUpdateComplete { .. } => {
                "WaitForWifiConfigurationUpdateComplete"
            }
            State::WaitForAnotherWifiConfigurationUpdate { .. } => {
                "WaitForAnotherWifiConfigurationUpdate"
            }
            State::VersionMismatch => "VersionMismatch",
            State::SsidMismatch => "SsidMismatch",
            State::Stopped => "Stopped",
        }
    }

    /// States in which a backhaul-connected notification is meaningful:
    /// from the first wait for it up to (and including) normal operation.
    pub fn accepts_backhaul_connected(&self) -> bool {
        matches!(
            self,
            State::WaitForBackhaulConnected
                | State::WaitBackhaulBusy { .. }
                | State::BackhaulConnected
                | State::WaitBeforeJoinMaster { .. }
                | State::JoinMaster
                | State::WaitForJoinedResponse { .. }
                | State::UpdateMonitorSonConfig
                | State::Operational
        )
    }

    /// True once the join request has been sent to the controller.
    pub fn join_sent(&self) -> bool {
        matches!(
            self,
            State::WaitForJoinedResponse { .. } | State::UpdateMonitorSonConfig | State::Operational
        )
    }

    /// States of the credential/configuration-change quiescence windows.
    pub fn in_conf_change(&self) -> bool {
        matches!(
            self,
            State::WaitForWifiConfigurationUpdateComplete { .. }
                | State::WaitForAnotherWifiConfigurationUpdate { .. }
                | State::WaitForUnifyWifiCredentialsResponse { .. }
        )
    }
}

/// One outstanding interface action towards the platform adapter. While
/// any exists, the FSM is paused.
#[derive(Clone, Debug)]
pub struct PendingIfaceAction {
    pub iface: String,
    pub operation: IfaceOperation,
    pub issued_at: Duration,
}

/// Backhaul link parameters, populated on every successful bring-up.
#[derive(Clone, Debug)]
pub struct BackhaulParams {
    pub gw_ipv4: Ipv4Addr,
    pub gw_bridge_mac: MacAddr,
    pub controller_bridge_mac: MacAddr,
    pub bridge_mac: MacAddr,
    pub bridge_ipv4: Ipv4Addr,
    pub backhaul_iface: String,
    pub backhaul_mac: MacAddr,
    pub backhaul_ipv4: Ipv4Addr,
    pub backhaul_bssid: MacAddr,
    pub backhaul_channel: u8,
    pub backhaul_is_wireless: bool,
    pub backhaul_iface_type: u8,
    pub scan_measurements: Vec<ScanMeasurement>,
}

impl Default for BackhaulParams {
    fn default() -> Self {
        BackhaulParams {
            gw_ipv4: Ipv4Addr::UNSPECIFIED,
            gw_bridge_mac: MacAddr::ZERO,
            controller_bridge_mac: MacAddr::ZERO,
            bridge_mac: MacAddr::ZERO,
            bridge_ipv4: Ipv4Addr::UNSPECIFIED,
            backhaul_iface: String::new(),
            backhaul_mac: MacAddr::ZERO,
            backhaul_ipv4: Ipv4Addr::UNSPECIFIED,
            backhaul_bssid: MacAddr::ZERO,
            backhaul_channel: 0,
            backhaul_is_wireless: false,
            backhaul_iface_type: 0,
            scan_measurements: Vec::new(),
        }
    }
}

pub struct Slave {
    pub(crate) config: SlaveConfig,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) state: State,
    should_stop: bool,

    // peer presence
    pub(crate) has_platform: bool,
    pub(crate) has_backhaul: bool,
    pub(crate) master_attached: bool,
    pub(crate) ap_manager_link: Option<LinkId>,
    pub(crate) monitor_link: Option<LinkId>,

    // settings and learned parameters
    pub(crate) platform_settings: PlatformSettings,
    pub(crate) wlan_settings: WlanSettings,
    pub(crate) son_config: SonConfig,
    pub(crate) backhaul: BackhaulParams,
    pub(crate) hostap_params: HostapParams,
    pub(crate) hostap_cs_params: CsParams,
    pub(crate) master_version: String,

    // pending work
    pub(crate) pending_iface_actions: HashMap<String, PendingIfaceAction>,
    pub(crate) pending_client_association: HashMap<MacAddr, ClientAssociationParams>,
    pub(crate) new_credentials: WifiCredentials,

    // cross-state flags
    pub(crate) is_backhaul_manager: bool,
    pub(crate) is_backhaul_disconnected: bool,
    pub(crate) is_backhaul_reconf: bool,
    pub(crate) is_credentials_changed_on_db: bool,
    pub(crate) is_wlan_credentials_unified: bool,
    pub(crate) detach_on_conf_change: bool,
    pub(crate) is_slave_reset: bool,
    pub(crate) stopped: bool,
    pub(crate) operational: bool,
    operational_prev: bool,

    // radio statuses with their change-detection shadows
    pub(crate) status_ap: RadioStatus,
    status_ap_prev: RadioStatus,
    pub(crate) status_bh: RadioStatus,
    status_bh_prev: RadioStatus,
    pub(crate) status_bh_wired: RadioStatus,
    status_bh_wired_prev: RadioStatus,
    pub(crate) last_reported_backhaul_rssi: Option<i8>,

    // counters and liveness bookkeeping
    pub(crate) configured_stop_on_failure_attempts: i32,
    pub(crate) stop_on_failure_attempts: i32,
    pub(crate) slave_resets_counter: u32,
    pub(crate) connect_platform_retries: u32,
    pub(crate) keep_alive_retries: u8,
    pub(crate) master_last_seen: Duration,
    monitor_last_seen: Duration,
    monitor_retries: u32,
    pub(crate) ap_manager_last_error: u32,
    ap_manager_last_seen: Duration,
    ap_manager_retries: u32,
    mid: u16,
}

impl Slave {
    pub fn new(config: SlaveConfig, clock: Box<dyn Clock>) -> Slave {
        info!("slave info:");
        info!("hostap_iface={}", config.hostap_iface);
        info!("hostap_iface_type={:?}", config.hostap_iface_type);
        info!("platform={}", config.platform);
        info!("ruid={}", config.radio_identifier);

        let now = clock.now();
        let attempts = config.stop_on_failure_attempts;
        Slave {
            config,
            clock,
            state: State::Init,
            should_stop: false,
            has_platform: false,
            has_backhaul: false,
            master_attached: false,
            ap_manager_link: None,
            monitor_link: None,
            platform_settings: PlatformSettings::default(),
            wlan_settings: WlanSettings::default(),
            son_config: SonConfig::default(),
            backhaul: BackhaulParams::default(),
            hostap_params: HostapParams::default(),
            hostap_cs_params: CsParams::default(),
            master_version: String::new(),
            pending_iface_actions: HashMap::new(),
            pending_client_association: HashMap::new(),
            new_credentials: WifiCredentials::default(),
            is_backhaul_manager: false,
            is_backhaul_disconnected: false,
            is_backhaul_reconf: false,
            is_credentials_changed_on_db: false,
            is_wlan_credentials_unified: false,
            detach_on_conf_change: false,
            is_slave_reset: false,
            stopped: false,
            operational: false,
            operational_prev: false,
            status_ap: RadioStatus::Off,
            status_ap_prev: RadioStatus::Off,
            status_bh: RadioStatus::Off,
            status_bh_prev: RadioStatus::Off,
            status_bh_wired: RadioStatus::Off,
            status_bh_wired_prev: RadioStatus::Off,
            last_reported_backhaul_rssi: None,
            configured_stop_on_failure_attempts: attempts,
            stop_on_failure_attempts: attempts,
            slave_resets_counter: 0,
            connect_platform_retries: 0,
            keep_alive_retries: 0,
            master_last_seen: now,
            monitor_last_seen: now,
            monitor_retries: 0,
            ap_manager_last_error: crate::message::payloads::ap_manager_err::NO_ERROR,
            ap_manager_last_seen: now,
            ap_manager_retries: 0,
            mid: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn should_stop(&self) -> bool {
        self.should_stop
    }

    pub(crate) fn goto(&mut self, state: State) {
        debug!("goto {}", state.name());
        self.state = state;
    }

    pub(crate) fn now(&self) -> Duration {
        self.clock.now()
    }

    pub(crate) fn next_mid(&mut self) -> u16 {
        self.mid = self.mid.wrapping_add(1);
        self.mid
    }

    /// One iteration of the supervisor work cycle: liveness checks, the
    /// pending-action discipline and the state machine. Returns `false`
    /// once the supervisor wants to stop.
    pub fn work(&mut self, links: &mut dyn Links) -> bool {
        if !self.monitor_heartbeat_check() || !self.ap_manager_heartbeat_check() {
            self.reset(links);
        }

        // no FSM progress while interface actions are in flight
        if !self.pending_iface_actions.is_empty() {
            self.check_pending_iface_actions(links);
        } else {
            self.fsm_run(links);
            if self.config.enable_bpl_iface_status_notifications
                && self.has_platform
                && self.platform_settings.onboarding == 0
            {
                self.send_iface_status_if_changed(links);
            }
        }
        !self.should_stop
    }

    fn check_pending_iface_actions(&mut self, links: &mut dyn Links) {
        let now = self.now();
        let timed_out = self
            .pending_iface_actions
            .values()
            .find(|action| now.saturating_sub(action.issued_at) > IFACE_ACTION_TIMEOUT)
            .cloned();
        if let Some(action) = timed_out {
            error!(
                "iface {} operation {} timed out",
                action.iface, action.operation
            );
            if let Some(code) = PlatformError::for_iface_action_timeout(action.operation) {
                self.platform_notify_error(links, code, &action.iface);
            }
            debug!("reset slave");
            self.stop_on_failure_attempts -= 1;
            self.reset(links);
        }
    }

    fn monitor_heartbeat_check(&mut self) -> bool {
        if self.monitor_link.is_none() {
            return true;
        }
        let now = self.now();
        if now.saturating_sub(self.monitor_last_seen) > MONITOR_HEARTBEAT_TIMEOUT {
            self.monitor_retries += 1;
            self.monitor_last_seen = now;
            info!(
                "monitor heartbeat timeout, retries={}",
                self.monitor_retries
            );
        }
        if self.monitor_retries >= MONITOR_HEARTBEAT_RETRIES {
            info!("monitor heartbeat retries exhausted, resetting");
            self.monitor_retries = 0;
            return false;
        }
        true
    }

    fn ap_manager_heartbeat_check(&mut self) -> bool {
        if self.ap_manager_link.is_none() {
            return true;
        }
        let now = self.now();
        if now.saturating_sub(self.ap_manager_last_seen) > AP_MANAGER_HEARTBEAT_TIMEOUT {
            self.ap_manager_retries += 1;
            self.ap_manager_last_seen = now;
            info!(
                "ap manager heartbeat timeout, retries={}",
                self.ap_manager_retries
            );
        }
        if self.ap_manager_retries >= AP_MANAGER_HEARTBEAT_RETRIES {
            info!("ap manager heartbeat retries exhausted, resetting");
            self.ap_manager_retries = 0;
            return false;
        }
        true
    }

    pub(crate) fn note_monitor_heartbeat(&mut self) {
        self.monitor_last_seen = self.now();
        self.monitor_retries = 0;
    }

    pub(crate) fn note_ap_manager_heartbeat(&mut self) {
        self.ap_manager_last_seen = self.now();
        self.ap_manager_retries = 0;
    }

    /// Controller keep-alive: runs only in `Operational`.
    pub(crate) fn process_keep_alive(&mut self, links: &mut dyn Links) {
        if !self.config.enable_keep_alive || self.son_config.slave_keep_alive_retries == 0 {
            return;
        }
        if !self.master_attached {
            error!("process_keep_alive: controller not attached");
            return;
        }
        let now = self.now();
        if now.saturating_sub(self.master_last_seen) < KEEP_ALIVE_INTERVAL {
            return;
        }
        if self.keep_alive_retries >= self.son_config.slave_keep_alive_retries {
            debug!(
                "exceeded keep-alive retries ({}), resetting",
                self.keep_alive_retries
            );
            let retries = self.keep_alive_retries;
            self.platform_notify_error(
                links,
                PlatformError::MasterKeepAliveTimeout,
                &format!("reached controller keep-alive retries limit: {retries}"),
            );
            self.stop_on_failure_attempts -= 1;
            self.reset(links);
        } else {
            debug!(
                "no controller traffic for {:?}, sending agent ping, tries={}",
                KEEP_ALIVE_INTERVAL, self.keep_alive_retries
            );
            let ping = crate::message::payloads::PingParams {
                total: 1,
                seq: 0,
                size: 0,
            };
            let mid = self.next_mid();
            let cmdu = vendor::build_vs_cmdu(
                Action::Control,
                vendor::control_op::AGENT_PING_REQUEST,
                mid,
                &ping.to_padded_bytes(),
            );
            self.send_to_controller(links, cmdu);
            self.keep_alive_retries += 1;
            self.master_last_seen = now;
        }
    }

    // ---- outbound helpers -------------------------------------------------

    pub(crate) fn send_platform(
        &mut self,
        links: &mut dyn Links,
        op: u8,
        id: u16,
        payload: &[u8],
    ) -> bool {
        if !self.has_platform {
            error!("platform manager link is down, dropping action_op {op}");
            return false;
        }
        let cmdu = vendor::build_vs_cmdu(Action::Platform, op, id, payload);
        if let Err(e) = links.send(LinkId::Platform, &cmdu) {
            error!("send to platform manager failed: {e}");
            return false;
        }
        true
    }

    pub(crate) fn send_backhaul(
        &mut self,
        links: &mut dyn Links,
        op: u8,
        id: u16,
        payload: &[u8],
    ) -> bool {
        if !self.has_backhaul {
            error!("backhaul manager link is down, dropping action_op {op}");
            return false;
        }
        let cmdu = vendor::build_vs_cmdu(Action::Backhaul, op, id, payload);
        if let Err(e) = links.send(LinkId::Backhaul, &cmdu) {
            error!("send to backhaul manager failed: {e}");
            return false;
        }
        true
    }

    pub(crate) fn send_ap_manager(
        &mut self,
        links: &mut dyn Links,
        op: u8,
        id: u16,
        payload: &[u8],
    ) -> bool {
        let Some(link) = self.ap_manager_link else {
            error!("ap manager link is down, dropping action_op {op}");
            return false;
        };
        let cmdu = vendor::build_vs_cmdu(Action::ApManager, op, id, payload);
        if let Err(e) = links.send(link, &cmdu) {
            error!("send to ap manager failed: {e}");
            return false;
        }
        true
    }

    pub(crate) fn send_monitor(
        &mut self,
        links: &mut dyn Links,
        op: u8,
        id: u16,
        payload: &[u8],
    ) -> bool {
        let Some(link) = self.monitor_link else {
            error!("monitor link is down, dropping action_op {op}");
            return false;
        };
        let cmdu = vendor::build_vs_cmdu(Action::Monitor, op, id, payload);
        if let Err(e) = links.send(link, &cmdu) {
            error!("send to monitor failed: {e}");
            return false;
        }
        true
    }

    /// Sends a CMDU to the controller over the backhaul link. Vendor
    /// messages get the controller direction and this radio's MAC stamped
    /// into their header first.
    pub(crate) fn send_to_controller(&mut self, links: &mut dyn Links, mut cmdu: Cmdu) -> bool {
        if !self.master_attached {
            error!("controller is not attached, dropping outbound frame");
            return false;
        }
        vendor::stamp_for_controller(&mut cmdu, self.hostap_params.iface_mac);
        if let Err(e) = links.send_addressed(
            LinkId::Backhaul,
            &cmdu,
            self.backhaul.controller_bridge_mac,
            self.backhaul.bridge_mac,
        ) {
            error!("send to controller failed: {e}");
            return false;
        }
        true
    }

    pub(crate) fn platform_notify_error(
        &mut self,
        links: &mut dyn Links,
        code: PlatformError,
        data: &str,
    ) {
        if !self.has_platform {
            error!("platform manager link is down, cannot report {code:?}");
            return;
        }
        let payload = PlatformErrorNotification {
            code: code.to_wire(),
            data: data.to_string(),
        }
        .to_bytes();
        let mid = self.next_mid();
        self.send_platform(links, platform_op::ERROR_NOTIFICATION, mid, &payload);
    }

    // ---- interface state requests ----------------------------------------

    /// Requests an interface state change from the platform adapter and
    /// records the pending action; the FSM pauses until it is answered or
    /// times out.
    pub(crate) fn set_wifi_iface_state(
        &mut self,
        links: &mut dyn Links,
        iface: &str,
        operation: IfaceOperation,
    ) -> bool {
        debug!("request iface {iface} operation {operation}");
        if iface.is_empty() {
            error!("iface is empty");
            return false;
        }
        if let Some(pending) = self.pending_iface_actions.get(iface) {
            if pending.operation == operation {
                error!("same action already pending for {iface}, continuing");
                return true;
            }
            error!("conflicting pending action for {iface}, aborting");
            return false;
        }
        self.pending_iface_actions.insert(
            iface.to_string(),
            PendingIfaceAction {
                iface: iface.to_string(),
                operation,
                issued_at: self.now(),
            },
        );
        let payload = IfaceStateRequest {
            iface_name: iface.to_string(),
            operation: operation.to_wire(),
        }
        .to_bytes();
        let mid = self.next_mid();
        self.send_platform(links, platform_op::WIFI_SET_IFACE_STATE_REQUEST, mid, &payload)
    }

    pub(crate) fn set_radio_tx_enable(
        &mut self,
        links: &mut dyn Links,
        iface: &str,
        enable: bool,
    ) -> bool {
        debug!(
            "request iface {iface} radio {}",
            if enable { "enable" } else { "disable" }
        );
        if iface.is_empty() {
            error!("iface is empty");
            return false;
        }
        let payload = RadioTxState {
            iface_name: iface.to_string(),
            enable: enable as u8,
            success: 0,
        }
        .to_bytes();
        let mid = self.next_mid();
        self.send_platform(
            links,
            platform_op::WIFI_SET_RADIO_TX_STATE_REQUEST,
            mid,
            &payload,
        )
    }

    // ---- radio status ------------------------------------------------------

    pub(crate) fn update_iface_status(&mut self, is_ap: bool, up: bool) {
        if up {
            if is_ap {
                self.status_ap = RadioStatus::ApOk;
            } else {
                self.status_bh = RadioStatus::BhScan;
            }
        } else {
            self.status_ap = RadioStatus::Off;
            self.status_bh = RadioStatus::Off;
        }
    }

    fn send_iface_status_if_changed(&mut self, links: &mut dyn Links) {
        if self.status_ap_prev == self.status_ap
            && self.status_bh_prev == self.status_bh
            && self.status_bh_wired_prev == self.status_bh_wired
            && self.operational_prev == self.operational
        {
            return;
        }
        let status_ap = self.status_ap;
        let operational = self.operational;
        self.send_platform_iface_status(links, status_ap, operational);
    }

    pub(crate) fn send_platform_iface_status(
        &mut self,
        links: &mut dyn Links,
        status_ap: RadioStatus,
        operational: bool,
    ) {
        let payload = IfaceStatusNotification {
            iface_name_ap: self.config.hostap_iface.clone(),
            iface_name_bh: self.config.backhaul_wireless_iface.clone(),
            status_ap: status_ap.to_wire(),
            status_bh: self.status_bh.to_wire(),
            status_bh_wired: self.status_bh_wired.to_wire(),
            is_bh_manager: self.is_backhaul_manager as u8,
            status_operational: operational as u8,
        }
        .to_bytes();
        self.status_ap_prev = self.status_ap;
        self.status_bh_prev = self.status_bh;
        self.status_bh_wired_prev = self.status_bh_wired;
        self.operational_prev = self.operational;
        info!(
            "iface status: ap={:?} bh={:?} bh_wired={:?} bh_manager={} operational={}",
            self.status_ap, self.status_bh, self.status_bh_wired, self.is_backhaul_manager,
            operational
        );
        let mid = self.next_mid();
        self.send_platform(
            links,
            platform_op::WIFI_INTERFACE_STATUS_NOTIFICATION,
            mid,
            &payload,
        );
    }

    // ---- peer teardown -----------------------------------------------------

    pub(crate) fn ap_manager_stop(&mut self, links: &mut dyn Links) {
        if let Some(link) = self.ap_manager_link.take() {
            links.close_worker(link);
        }
        links.stop_ap_manager();
        self.ap_manager_last_error = crate::message::payloads::ap_manager_err::NO_ERROR;
        self.status_ap = RadioStatus::Off;
    }

    pub(crate) fn monitor_stop(&mut self, links: &mut dyn Links) {
        if let Some(link) = self.monitor_link.take() {
            links.close_worker(link);
        }
        links.stop_monitor(&self.config.hostap_iface.clone());
    }

    pub(crate) fn backhaul_manager_stop(&mut self, links: &mut dyn Links) {
        if self.has_backhaul {
            links.close_backhaul();
        }
        self.has_backhaul = false;
        self.master_attached = false;
        self.status_bh = RadioStatus::Off;
        self.status_bh_wired = RadioStatus::Off;
    }

    pub(crate) fn platform_manager_stop(&mut self, links: &mut dyn Links) {
        if self.has_platform {
            debug!("removing platform manager link");
            links.close_platform();
        }
        self.has_platform = false;
    }

    // ---- reset & stop ------------------------------------------------------

    pub fn reset(&mut self, links: &mut dyn Links) {
        self.slave_resets_counter += 1;
        debug!("slave_reset() #{} - start", self.slave_resets_counter);
        if !self.detach_on_conf_change {
            self.backhaul_manager_stop(links);
        }
        self.platform_manager_stop(links);
        self.ap_manager_stop(links);
        self.monitor_stop(links);
        self.pending_iface_actions.clear();
        self.is_backhaul_manager = false;
        self.operational = false;
        self.detach_on_conf_change = false;

        if self.configured_stop_on_failure_attempts != 0 && self.stop_on_failure_attempts <= 0 {
            error!("reached max stop-on-failure attempts");
            self.stopped = true;
        }

        if self.stopped
            && !self.is_credentials_changed_on_db
            && !matches!(self.state, State::Init)
        {
            self.platform_notify_error(links, PlatformError::SlaveStopped, "");
            self.goto(State::Stopped);
        } else if self.is_credentials_changed_on_db || self.is_backhaul_disconnected {
            let deadline = self.now() + SLAVE_INIT_DELAY;
            self.goto(State::WaitBeforeInit { deadline });
        } else {
            self.goto(State::Init);
        }

        self.is_slave_reset = true;
        debug!("slave_reset() #{} - done", self.slave_resets_counter);
    }

    pub fn stop(&mut self, links: &mut dyn Links) {
        debug!("stop_slave()");
        self.reset(links);
        self.should_stop = true;
    }

    // ---- socket-disconnect policy -----------------------------------------

    pub fn handle_link_closed(&mut self, links: &mut dyn Links, link: LinkId) {
        let is_ap_manager = self.ap_manager_link == Some(link);
        let is_monitor = self.monitor_link == Some(link);

        if self.state.in_conf_change() {
            debug!("wifi configuration update in progress, absorbing disconnect");
            self.detach_on_conf_change = true;
            if is_ap_manager || is_monitor {
                self.ap_manager_stop(links);
                self.monitor_stop(links);
            }
            return;
        }

        match link {
            LinkId::Backhaul => {
                if !self.has_backhaul {
                    return;
                }
                debug!("backhaul manager link dropped, stopping supervisor");
                self.platform_notify_error(
                    links,
                    PlatformError::SlaveBackhaulManagerDisconnected,
                    "",
                );
                self.has_backhaul = false;
                self.master_attached = false;
                self.stop(links);
            }
            LinkId::Platform => {
                if !self.has_platform {
                    return;
                }
                debug!("platform manager link dropped, stopping supervisor");
                self.has_platform = false;
                self.stop(links);
            }
            LinkId::Worker(_) if is_ap_manager || is_monitor => {
                // when both workers drop, the monitor disconnect may land
                // first while the AP manager is the real culprit
                let ap_err = self.ap_manager_last_error;
                if is_ap_manager
                    || ap_err != crate::message::payloads::ap_manager_err::NO_ERROR
                {
                    debug!("ap manager link dropped, last error {ap_err}");
                    if self.platform_settings.passive_mode_enabled == 0 {
                        self.stop_on_failure_attempts -= 1;
                        self.platform_notify_error(
                            links,
                            PlatformError::from_ap_manager_err(ap_err),
                            "",
                        );
                    }
                } else {
                    debug!("monitor link dropped");
                    if self.platform_settings.passive_mode_enabled == 0 {
                        self.stop_on_failure_attempts -= 1;
                        self.platform_notify_error(links, PlatformError::MonitorDisconnected, "");
                    }
                }
                self.reset(links);
            }
            LinkId::Worker(_) => {
                // a worker connection that never identified itself
                links.close_worker(link);
            }
        }
    }

    // ---- misc --------------------------------------------------------------

    pub(crate) fn log_son_config(&self) {
        debug!("SON config update: {:?}", self.son_config);
    }

    pub(crate) fn slave_version(&self) -> &'static str {
        BEEROCKS_VERSION
    }
}

#[cfg(test)]
mod tests;
