//! The supervisor state machine.
//!
//! Entering a state may emit at most one outbound request; the state then
//! blocks on the answer or its deadline. Deadline expiry either retries or
//! surfaces a typed platform error and resets.

use log::{debug, error, info, trace, warn};

use crate::errors::PlatformError;
use crate::link::Links;
use crate::message::payloads::{
    BackhaulConnectionComplete, BackhaulEnable, BackhaulRegisterRequest, CredentialsSetRequest,
    PlatformRegisterRequest,
};
use crate::message::types::{IfaceKind, IfaceOperation, MacAddr, RadioStatus, WifiSec};
use crate::message::vendor::{backhaul_op, monitor_op, platform_op};
use crate::message::Wire;
use crate::timers::{
    CONNECT_PLATFORM_RETRY_COUNT_MAX, CONNECT_PLATFORM_RETRY_SLEEP,
    WAIT_FOR_PLATFORM_REGISTER_RESPONSE_TIMEOUT, WAIT_FOR_UNIFY_WIFI_CREDENTIALS_RESPONSE_TIMEOUT,
    WAIT_FOR_WLAN_READY_STATUS_RESPONSE_TIMEOUT,
};
use crate::workers::ApManagerConfig;

use super::{Slave, State};

impl Slave {
    /// Runs FSM steps until the current state wants to wait for input. A
    /// step that requested an interface action pauses the machine even
    /// when it asked to continue.
    pub(crate) fn fsm_run(&mut self, links: &mut dyn Links) {
        while self.fsm_step(links) && self.pending_iface_actions.is_empty() {}
    }

    /// One FSM step. Returns `true` when the next state should run in the
    /// same loop iteration, without an intermediate readiness wait.
    fn fsm_step(&mut self, links: &mut dyn Links) -> bool {
        match self.state {
            State::WaitBeforeInit { deadline } => {
                if self.now() > deadline {
                    self.is_backhaul_disconnected = false;
                    self.is_credentials_changed_on_db = false;
                    self.goto(State::Init);
                }
            }
            State::Init => {
                info!("state Init");
                self.goto(State::ConnectToPlatform);
            }
            State::ConnectToPlatform => self.connect_to_platform(links),
            State::WaitForPlatformRegisterResponse { deadline } => {
                if self.now() > deadline {
                    error!("platform manager register response timeout");
                    self.platform_notify_error(
                        links,
                        PlatformError::SlavePlatformManagerRegisterTimeout,
                        "",
                    );
                    self.stop_on_failure_attempts -= 1;
                    self.reset(links);
                }
            }
            State::ConnectToBackhaul => self.connect_to_backhaul(links),
            State::WaitForBackhaulRegisterResponse => {}
            State::JoinInit => self.join_init(links),
            State::GetWlanReadyStatus => {
                let mid = self.next_mid();
                if !self.send_platform(links, platform_op::GET_WLAN_READY_STATUS_REQUEST, mid, &[])
                {
                    error!("cannot query wlan ready status");
                    self.stop_on_failure_attempts -= 1;
                    self.reset(links);
                    return false;
                }
                let deadline = self.now() + WAIT_FOR_WLAN_READY_STATUS_RESPONSE_TIMEOUT;
                self.goto(State::WaitForWlanReadyStatusResponse { deadline });
            }
            State::WaitForWlanReadyStatusResponse { deadline } => {
                if self.now() > deadline {
                    error!("wlan ready status response timeout");
                    self.platform_notify_error(
                        links,
                        PlatformError::SlaveTimeoutGetWlanReadyStatusRequest,
                        "",
                    );
                    self.stop_on_failure_attempts -= 1;
                    self.reset(links);
                }
            }
            State::JoinInitBringUpInterfaces => self.bring_up_interfaces(links),
            State::JoinInitWaitForIfaceChangeDone => {
                self.is_slave_reset = false;
                self.goto(State::StartApManager);
            }
            State::StartApManager => {
                info!("state StartApManager");
                let config = ApManagerConfig {
                    hostap_iface: self.config.hostap_iface.clone(),
                    acs_enabled: self.wlan_settings.acs_enabled != 0,
                    iface_filter_low: self.config.backhaul_wireless_iface_filter_low,
                    backhaul_vaps_bssid: self.platform_settings.backhaul_vaps_bssid,
                    slave_uds: self.config.temp_path.join(format!(
                        "{}_{}",
                        crate::link::BEEROCKS_SLAVE_UDS,
                        self.config.hostap_iface
                    )),
                };
                match links.start_ap_manager(config) {
                    Ok(()) => self.goto(State::WaitForApManagerInitDone),
                    Err(e) => {
                        error!("ap manager start failed: {e}");
                        self.platform_notify_error(links, PlatformError::ApManagerStart, "");
                        self.stop_on_failure_attempts -= 1;
                        self.reset(links);
                    }
                }
            }
            State::WaitForApManagerInitDone => {}
            State::WaitForApManagerJoined => {}
            State::ApManagerJoined => {
                if !self.is_wlan_credentials_unified && self.config.enable_credentials_automatic_unify
                {
                    self.goto(State::UnifyWifiCredentials);
                } else {
                    self.goto(State::StartMonitor);
                }
            }
            State::UnifyWifiCredentials => self.unify_wifi_credentials(links),
            State::WaitForUnifyWifiCredentialsResponse { deadline } => {
                if self.now() > deadline {
                    error!("unify wifi credentials response timeout");
                    self.platform_notify_error(
                        links,
                        PlatformError::SlaveTimeoutWifiCredentialsSetRequest,
                        "",
                    );
                    self.stop_on_failure_attempts -= 1;
                    self.reset(links);
                }
            }
            State::StartMonitor => {
                let iface = self.config.hostap_iface.clone();
                if let Err(e) = links.start_monitor(&iface) {
                    error!("monitor start failed: {e}");
                    self.stop_on_failure_attempts -= 1;
                    self.reset(links);
                    return false;
                }
                self.goto(State::WaitForMonitorJoined);
            }
            State::WaitForMonitorJoined => {}
            State::BackhaulEnable => self.backhaul_enable(links),
            State::SendBackhaulEnable => self.send_backhaul_enable(links),
            State::WaitForBackhaulConnected => {}
            State::WaitBackhaulBusy { deadline } => {
                if self.now() > deadline {
                    self.goto(State::SendBackhaulEnable);
                }
            }
            State::BackhaulConnected => return self.backhaul_connected(links),
            State::WaitBeforeJoinMaster { deadline } => {
                if self.now() > deadline {
                    self.goto(State::JoinMaster);
                }
            }
            State::JoinMaster => self.join_master(links),
            State::WaitForJoinedResponse { deadline } => {
                if self.now() > deadline {
                    info!("joined response timeout");
                    self.goto(State::JoinMaster);
                }
            }
            State::UpdateMonitorSonConfig => {
                info!("sending SON config update to monitor");
                let payload = self.son_config.to_bytes();
                let mid = self.next_mid();
                self.send_monitor(links, monitor_op::SON_CONFIG_UPDATE, mid, &payload);
                self.goto(State::Operational);
            }
            State::Operational => {
                self.stop_on_failure_attempts = self.configured_stop_on_failure_attempts;
                self.process_keep_alive(links);
            }
            State::Onboarding => {}
            State::WaitForPlatformCredentialsUpdateResponse { deadline } => {
                if self.is_credentials_changed_on_db {
                    info!("credentials changed on DB, resetting");
                    self.reset(links);
                } else if self.now() > deadline {
                    error!("credentials update response timeout");
                    self.reset(links);
                }
            }
            State::WaitForWifiConfigurationUpdateComplete { deadline } => {
                if self.now() > deadline {
                    info!("wifi configuration update complete timeout");
                    self.platform_notify_error(
                        links,
                        PlatformError::WifiConfigurationChangeTimeout,
                        "WIFI configuration timeout!",
                    );
                    self.reset(links);
                }
            }
            State::WaitForAnotherWifiConfigurationUpdate { deadline } => {
                if self.now() > deadline {
                    // not an error, the update window simply closed
                    info!("no further wifi configuration updates, resetting");
                    self.reset(links);
                }
            }
            State::VersionMismatch => {}
            State::SsidMismatch => {}
            State::Stopped => {}
        }
        false
    }

    fn connect_to_platform(&mut self, links: &mut dyn Links) {
        if let Err(e) = links.connect_platform() {
            warn!("unable to connect to platform manager: {e}");
            self.connect_platform_retries += 1;
            if self.connect_platform_retries >= CONNECT_PLATFORM_RETRY_COUNT_MAX {
                error!("failed connecting to platform manager, resetting");
                self.platform_notify_error(
                    links,
                    PlatformError::SlaveFailedConnectToPlatformManager,
                    "",
                );
                self.stop_on_failure_attempts -= 1;
                self.reset(links);
                self.connect_platform_retries = 0;
            } else {
                info!("retrying in {:?}", CONNECT_PLATFORM_RETRY_SLEEP);
                self.clock.sleep(CONNECT_PLATFORM_RETRY_SLEEP);
            }
            return;
        }
        self.has_platform = true;
        let payload = PlatformRegisterRequest {
            iface_name: self.config.hostap_iface.clone(),
        }
        .to_bytes();
        let mid = self.next_mid();
        self.send_platform(links, platform_op::SON_SLAVE_REGISTER_REQUEST, mid, &payload);
        trace!("sent platform register request");
        let deadline = self.now() + WAIT_FOR_PLATFORM_REGISTER_RESPONSE_TIMEOUT;
        self.goto(State::WaitForPlatformRegisterResponse { deadline });
    }

    fn connect_to_backhaul(&mut self, links: &mut dyn Links) {
        if self.has_backhaul {
            links.close_backhaul();
            self.has_backhaul = false;
        }
        if let Err(e) = links.connect_backhaul() {
            error!("backhaul manager connect failed: {e}");
            let iface = self.config.backhaul_wireless_iface.clone();
            self.platform_notify_error(
                links,
                PlatformError::SlaveConnectingToBackhaulManager,
                &format!("iface={iface}"),
            );
            self.stop_on_failure_attempts -= 1;
            self.reset(links);
            return;
        }
        self.has_backhaul = true;

        let sta_iface = if self.platform_settings.local_gw != 0
            || self.config.backhaul_wireless_iface.is_empty()
        {
            String::new()
        } else {
            self.config.backhaul_wireless_iface.clone()
        };
        let request = BackhaulRegisterRequest {
            sta_iface,
            hostap_iface: self.config.hostap_iface.clone(),
            local_master: self.platform_settings.local_master,
            local_gw: self.platform_settings.local_gw,
            sta_iface_filter_low: self.config.backhaul_wireless_iface_filter_low,
            onboarding: self.platform_settings.onboarding,
        };
        info!(
            "backhaul register: local_master={} local_gw={} hostap_iface={} sta_iface={} onboarding={}",
            request.local_master,
            request.local_gw,
            request.hostap_iface,
            request.sta_iface,
            request.onboarding
        );
        let payload = request.to_bytes();
        let mid = self.next_mid();
        self.send_backhaul(links, backhaul_op::REGISTER_REQUEST, mid, &payload);
        self.goto(State::WaitForBackhaulRegisterResponse);
    }

    fn join_init(&mut self, links: &mut dyn Links) {
        debug!("onboarding: {}", self.platform_settings.onboarding);
        if self.platform_settings.onboarding != 0 {
            self.goto(State::Onboarding);
            return;
        }
        if self.wlan_settings.band_enabled == 0 {
            debug!("band disabled on this radio");
            self.goto(State::BackhaulEnable);
            return;
        }

        if self.is_slave_reset {
            // bring interfaces back to a state where enable can succeed
            let hostap_iface = self.config.hostap_iface.clone();
            debug!("performing restore, iface={hostap_iface}");
            if !self.set_wifi_iface_state(links, &hostap_iface, IfaceOperation::Restore) {
                error!("restore failed, resetting");
                self.platform_notify_error(
                    links,
                    PlatformError::SlaveIfaceChangeStateFailed,
                    &hostap_iface,
                );
                self.stop_on_failure_attempts -= 1;
                self.reset(links);
                return;
            }
            if !self.config.backhaul_wireless_iface.is_empty()
                && self.platform_settings.local_gw == 0
            {
                let bh_iface = self.config.backhaul_wireless_iface.clone();
                debug!("performing wireless backhaul restore, iface={bh_iface}");
                if !self.set_wifi_iface_state(links, &bh_iface, IfaceOperation::Restore) {
                    error!("wireless backhaul restore failed, resetting");
                    self.platform_notify_error(
                        links,
                        PlatformError::SlaveIfaceChangeStateFailed,
                        &bh_iface,
                    );
                    self.stop_on_failure_attempts -= 1;
                    self.reset(links);
                    return;
                }
            }
        }

        if self.platform_settings.local_gw == 0 {
            self.is_backhaul_manager = false;
            self.status_bh_wired = RadioStatus::Off;
        }
        self.operational = false;
        self.goto(State::GetWlanReadyStatus);
    }

    fn bring_up_interfaces(&mut self, links: &mut dyn Links) {
        let hostap_iface = self.config.hostap_iface.clone();
        if !self.set_wifi_iface_state(links, &hostap_iface, IfaceOperation::Enable) {
            error!("iface enable failed, resetting");
            self.platform_notify_error(
                links,
                PlatformError::SlaveIfaceChangeStateFailed,
                &hostap_iface,
            );
            self.stop_on_failure_attempts -= 1;
            self.reset(links);
            return;
        }
        if !self.config.backhaul_wireless_iface.is_empty() && self.platform_settings.local_gw == 0 {
            let bh_iface = self.config.backhaul_wireless_iface.clone();
            if !self.set_wifi_iface_state(links, &bh_iface, IfaceOperation::Enable) {
                error!("wireless backhaul enable failed, resetting");
                self.platform_notify_error(
                    links,
                    PlatformError::SlaveIfaceChangeStateFailed,
                    &bh_iface,
                );
                self.stop_on_failure_attempts -= 1;
                self.reset(links);
                return;
            }
        }
        self.goto(State::JoinInitWaitForIfaceChangeDone);
    }

    fn unify_wifi_credentials(&mut self, links: &mut dyn Links) {
        let iface = if !self.config.backhaul_wireless_iface.is_empty()
            && self.platform_settings.local_gw == 0
        {
            self.config.backhaul_wireless_iface.clone()
        } else {
            self.config.hostap_iface.clone()
        };
        let request = CredentialsSetRequest {
            iface_name: iface,
            ssid: self.platform_settings.front_ssid.clone(),
            pass: self.platform_settings.front_pass.clone(),
            security_type: self.platform_settings.front_security_type.clone(),
        };
        info!(
            "unifying wlan credentials iface={} to ssid={} sec={} pass=***",
            request.iface_name, request.ssid, request.security_type
        );
        let payload = request.to_bytes();
        let mid = self.next_mid();
        if !self.send_platform(links, platform_op::WIFI_CREDENTIALS_SET_REQUEST, mid, &payload) {
            error!("cannot send credentials set request");
            self.stop_on_failure_attempts -= 1;
            self.reset(links);
            return;
        }
        let deadline = self.now() + WAIT_FOR_UNIFY_WIFI_CREDENTIALS_RESPONSE_TIMEOUT;
        self.goto(State::WaitForUnifyWifiCredentialsResponse { deadline });
    }

    fn backhaul_enable(&mut self, links: &mut dyn Links) {
        let mut error = false;
        if !self.config.backhaul_wire_iface.is_empty()
            && self.config.backhaul_wire_iface_type == IfaceKind::Unsupported
        {
            debug!("backhaul wire iface type is unsupported");
            self.platform_notify_error(
                links,
                PlatformError::ConfigBackhaulWiredInterfaceIsUnsupported,
                "",
            );
            error = true;
        }
        if !self.config.backhaul_wireless_iface.is_empty()
            && self.config.backhaul_wireless_iface_type == IfaceKind::Unsupported
        {
            debug!("backhaul wireless iface type is unsupported");
            self.platform_notify_error(
                links,
                PlatformError::ConfigBackhaulWirelessInterfaceIsUnsupported,
                "",
            );
            error = true;
        }
        if self.config.backhaul_wire_iface.is_empty()
            && self.config.backhaul_wireless_iface.is_empty()
        {
            debug!("no valid backhaul iface");
            self.platform_notify_error(links, PlatformError::ConfigNoValidBackhaulInterface, "");
            error = true;
        }
        if error {
            self.stop_on_failure_attempts -= 1;
            self.reset(links);
        } else {
            self.goto(State::SendBackhaulEnable);
        }
    }

    fn send_backhaul_enable(&mut self, links: &mut dyn Links) {
        let mut enable = BackhaulEnable {
            iface_mac: self.hostap_params.iface_mac,
            iface_is_5ghz: self.hostap_params.iface_is_5ghz,
            preferred_bssid: self.config.backhaul_preferred_bssid,
            ap_iface: self.config.hostap_iface.clone(),
            sta_iface: self.config.backhaul_wireless_iface.clone(),
            bridge_iface: self.config.bridge_iface.clone(),
            ..Default::default()
        };

        if self.platform_settings.local_gw == 0 {
            enable.ssid = self.platform_settings.back_ssid.clone();
            enable.pass = self.platform_settings.back_pass.clone();
            enable.security_type =
                WifiSec::from_platform_str(&self.platform_settings.back_security_type).to_wire();
            if self.platform_settings.wired_backhaul != 0 {
                enable.wire_iface = self.config.backhaul_wire_iface.clone();
            }
            enable.wire_iface_type = self.config.backhaul_wire_iface_type.to_wire();
            enable.wireless_iface_type = self.config.backhaul_wireless_iface_type.to_wire();
            enable.wired_backhaul = self.platform_settings.wired_backhaul;
        }

        debug!("sending backhaul enable for mac {}", enable.iface_mac);
        let payload = enable.to_bytes();
        let mid = self.next_mid();
        if !self.send_backhaul(links, backhaul_op::ENABLE, mid, &payload) {
            self.reset(links);
            return;
        }
        self.goto(State::WaitForBackhaulConnected);
    }

    fn backhaul_connected(&mut self, links: &mut dyn Links) -> bool {
        trace!("backhaul connected");

        if self.wlan_settings.band_enabled == 0 {
            // backhaul-only node: the controller is reachable, nothing to
            // join for this radio
            self.operational = true;
            self.master_attached = true;
            self.status_ap = RadioStatus::Off;
            self.goto(State::Operational);
            return false;
        }

        if self.is_backhaul_manager {
            if self.backhaul.backhaul_iface == self.config.backhaul_wire_iface
                && !self.config.backhaul_wireless_iface.is_empty()
            {
                let bh_iface = self.config.backhaul_wireless_iface.clone();
                debug!("wired backhaul, disabling iface {bh_iface}");
                if !self.set_wifi_iface_state(links, &bh_iface, IfaceOperation::Disable) {
                    error!("disabling wireless backhaul iface failed, resetting");
                    self.reset(links);
                    return false;
                }
            }
        } else if !self.config.backhaul_wireless_iface.is_empty() {
            let bh_iface = self.config.backhaul_wireless_iface.clone();
            if !self.set_wifi_iface_state(links, &bh_iface, IfaceOperation::Disable) {
                error!("disabling wireless backhaul iface failed, resetting");
                self.platform_notify_error(
                    links,
                    PlatformError::SlaveIfaceChangeStateFailed,
                    &bh_iface,
                );
                self.stop_on_failure_attempts -= 1;
                self.reset(links);
                return false;
            }
        }

        if self.platform_settings.local_gw != 0 {
            // the local gateway is its own uplink: fill the backhaul
            // params from the bridge
            self.backhaul.backhaul_iface = self.config.bridge_iface.clone();
            self.backhaul.gw_ipv4 = self.backhaul.bridge_ipv4;
            self.backhaul.gw_bridge_mac = self.backhaul.bridge_mac;
            self.backhaul.backhaul_mac = self.backhaul.bridge_mac;
            self.backhaul.backhaul_ipv4 = self.backhaul.bridge_ipv4;
            self.backhaul.backhaul_bssid = MacAddr::ZERO;
            self.backhaul.backhaul_channel = 0;
            self.backhaul.backhaul_is_wireless = false;
            self.backhaul.backhaul_iface_type = IfaceKind::GwBridge.to_wire();
            if self.is_backhaul_manager {
                self.backhaul.backhaul_iface = self.config.backhaul_wire_iface.clone();
            }
        }

        info!("backhaul params:");
        info!("gw_ipv4={}", self.backhaul.gw_ipv4);
        info!("gw_bridge_mac={}", self.backhaul.gw_bridge_mac);
        info!("controller_bridge_mac={}", self.backhaul.controller_bridge_mac);
        info!("bridge_mac={}", self.backhaul.bridge_mac);
        info!("bridge_ipv4={}", self.backhaul.bridge_ipv4);
        info!("backhaul_iface={}", self.backhaul.backhaul_iface);
        info!("backhaul_mac={}", self.backhaul.backhaul_mac);
        info!("backhaul_ipv4={}", self.backhaul.backhaul_ipv4);
        info!("backhaul_bssid={}", self.backhaul.backhaul_bssid);
        info!("backhaul_channel={}", self.backhaul.backhaul_channel);
        info!("backhaul_is_wireless={}", self.backhaul.backhaul_is_wireless);
        info!("is_backhaul_manager={}", self.is_backhaul_manager);

        if self.is_backhaul_manager {
            debug!("notifying platform manager of backhaul connection");
            let payload = BackhaulConnectionComplete {
                is_backhaul_manager: self.is_backhaul_manager as u8,
            }
            .to_bytes();
            let mid = self.next_mid();
            self.send_platform(
                links,
                platform_op::SON_SLAVE_BACKHAUL_CONNECTION_COMPLETE_NOTIFICATION,
                mid,
                &payload,
            );
        }

        self.master_attached = true;
        self.goto(State::JoinMaster);
        // run the join in the same loop iteration
        true
    }
}
