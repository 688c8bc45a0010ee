//! Test doubles for driving the supervisor without sockets or real time:
//! recording links, a scripted clock and a harness that walks the slave
//! through its bring-up.
//!
//! Lives in the library so both the unit tests and the integration
//! scenarios share one rig.

use std::io;
use std::time::Duration;

use anyhow::Error;

use crate::config::SlaveConfig;
use crate::link::{LinkId, Links};
use crate::message::cmdu::tlv_type;
use crate::message::map_tlvs::radio_identifier_tlv;
use crate::message::payloads::{
    ApManagerJoined, BackhaulConnectedParams, CsParams, HostapParams, IfaceStateResponse,
    PlatformRegisterResponse, PlatformSettings, SlaveJoinedResponse, SonConfig, WlanSettings,
};
use crate::message::types::{MacAddr, RadioStatus};
use crate::message::vendor::{
    self, ap_manager_op, backhaul_op, monitor_op, platform_op, Action, VsHeader,
};
use crate::message::wsc;
use crate::message::{Cmdu, MessageType, Tlv, Wire};
use crate::slave::{Slave, State};
use crate::timers::FakeClock;
use crate::workers::ApManagerConfig;

pub const AP_WORKER: LinkId = LinkId::Worker(0);
pub const MONITOR_WORKER: LinkId = LinkId::Worker(1);

pub const HOSTAP_MAC: MacAddr = MacAddr([0xaa, 0xbb, 0xcc, 0x00, 0x00, 0x01]);
pub const RADIO_UID: MacAddr = MacAddr([0x00, 0x50, 0x43, 0x24, 0x19, 0x30]);
pub const CONTROLLER_BRIDGE_MAC: MacAddr = MacAddr([0xcc, 0x00, 0x00, 0x00, 0x00, 0x01]);
pub const LOCAL_BRIDGE_MAC: MacAddr = MacAddr([0xbb, 0x00, 0x00, 0x00, 0x00, 0x01]);

/// One frame captured by the fake links.
#[derive(Clone, Debug)]
pub struct SentFrame {
    pub link: LinkId,
    pub cmdu: Cmdu,
    pub dst_mac: MacAddr,
    pub src_mac: MacAddr,
}

impl SentFrame {
    pub fn vs(&self) -> Option<(VsHeader, Vec<u8>)> {
        vendor::parse_vs_cmdu(&self.cmdu)
            .ok()
            .map(|(h, p)| (h, p.to_vec()))
    }
}

/// Recording `Links` implementation.
#[derive(Default)]
pub struct FakeLinks {
    pub sent: Vec<SentFrame>,
    pub platform_connected: bool,
    pub backhaul_connected: bool,
    pub fail_connect_platform: bool,
    pub fail_connect_backhaul: bool,
    pub ap_manager_running: bool,
    pub monitor_running: bool,
    pub ap_manager_starts: u32,
    pub monitor_starts: u32,
    pub last_ap_manager_config: Option<ApManagerConfig>,
}

impl FakeLinks {
    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    /// All captured vendor frames as `(link, header, payload)`.
    pub fn sent_vs(&self) -> Vec<(LinkId, VsHeader, Vec<u8>)> {
        self.sent
            .iter()
            .filter_map(|f| f.vs().map(|(h, p)| (f.link, h, p)))
            .collect()
    }

    pub fn count(&self, action: Action, op: u8) -> usize {
        self.sent_vs()
            .iter()
            .filter(|(_, h, _)| h.action == action && h.action_op == op)
            .count()
    }

    pub fn count_to(&self, link: LinkId, action: Action, op: u8) -> usize {
        self.sent_vs()
            .iter()
            .filter(|(l, h, _)| *l == link && h.action == action && h.action_op == op)
            .count()
    }

    pub fn payloads(&self, action: Action, op: u8) -> Vec<Vec<u8>> {
        self.sent_vs()
            .iter()
            .filter(|(_, h, _)| h.action == action && h.action_op == op)
            .map(|(_, _, p)| p.clone())
            .collect()
    }
}

impl Links for FakeLinks {
    fn connect_platform(&mut self) -> io::Result<()> {
        if self.fail_connect_platform {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        }
        self.platform_connected = true;
        Ok(())
    }

    fn connect_backhaul(&mut self) -> io::Result<()> {
        if self.fail_connect_backhaul {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        }
        self.backhaul_connected = true;
        Ok(())
    }

    fn close_platform(&mut self) {
        self.platform_connected = false;
    }

    fn close_backhaul(&mut self) {
        self.backhaul_connected = false;
    }

    fn close_worker(&mut self, _link: LinkId) {}

    fn send(&mut self, link: LinkId, cmdu: &Cmdu) -> io::Result<()> {
        self.sent.push(SentFrame {
            link,
            cmdu: cmdu.clone(),
            dst_mac: MacAddr::ZERO,
            src_mac: MacAddr::ZERO,
        });
        Ok(())
    }

    fn send_addressed(
        &mut self,
        link: LinkId,
        cmdu: &Cmdu,
        dst_mac: MacAddr,
        src_mac: MacAddr,
    ) -> io::Result<()> {
        self.sent.push(SentFrame {
            link,
            cmdu: cmdu.clone(),
            dst_mac,
            src_mac,
        });
        Ok(())
    }

    fn start_ap_manager(&mut self, config: ApManagerConfig) -> Result<(), Error> {
        self.ap_manager_running = true;
        self.ap_manager_starts += 1;
        self.last_ap_manager_config = Some(config);
        Ok(())
    }

    fn stop_ap_manager(&mut self) {
        self.ap_manager_running = false;
    }

    fn start_monitor(&mut self, _iface: &str) -> Result<(), Error> {
        self.monitor_running = true;
        self.monitor_starts += 1;
        Ok(())
    }

    fn stop_monitor(&mut self, _iface: &str) {
        self.monitor_running = false;
    }
}

/// Rewrites the radio MAC of every vendor TLV in `cmdu`, leaving the
/// direction untouched. Used to address frames at (or away from) the local
/// radio.
pub fn stamp_radio_mac(cmdu: &mut Cmdu, mac: MacAddr) {
    for tlv in &mut cmdu.tlvs {
        if tlv.tlv_type == tlv_type::VENDOR_SPECIFIC && tlv.value.len() >= 3 + vendor::VS_HEADER_LEN
        {
            tlv.value[6..12].copy_from_slice(&mac.0);
        }
    }
}

pub fn test_config() -> SlaveConfig {
    SlaveConfig {
        hostap_iface: "wlan0".into(),
        backhaul_wire_iface: "eth0_1".into(),
        backhaul_wireless_iface: "wlan2".into(),
        bridge_iface: "br-lan".into(),
        radio_identifier: RADIO_UID,
        stop_on_failure_attempts: 3,
        ..SlaveConfig::default()
    }
}

/// Platform register response whose wlan settings already match the front
/// credentials, so the bring-up skips the unification detour.
pub fn platform_register_ok(local_master: u8, local_gw: u8, onboarding: u8) -> Vec<u8> {
    PlatformRegisterResponse {
        valid: 1,
        platform_settings: PlatformSettings {
            local_master,
            local_gw,
            onboarding,
            front_ssid: "mesh-front".into(),
            front_pass: "front-pass".into(),
            front_security_type: "WPA2-Personal".into(),
            back_ssid: "mesh-back".into(),
            back_pass: "back-pass".into(),
            back_security_type: "WPA2-Personal".into(),
            ..Default::default()
        },
        wlan_settings: WlanSettings {
            band_enabled: 1,
            acs_enabled: 1,
            advertise_ssid: 1,
            ssid: "mesh-front".into(),
            pass: "front-pass".into(),
            security_type: "WPA2-Personal".into(),
        },
    }
    .to_bytes()
}

pub fn ap_manager_joined_payload() -> Vec<u8> {
    ApManagerJoined {
        params: HostapParams {
            iface_name: "wlan0".into(),
            iface_mac: HOSTAP_MAC,
            iface_is_5ghz: 1,
            ant_num: 4,
            ant_gain: 0,
            conducted_power: 0,
        },
        cs_params: CsParams {
            channel: 36,
            ..Default::default()
        },
    }
    .to_bytes()
}

pub fn backhaul_connected_payload(is_backhaul_manager: u8, wireless: u8) -> Vec<u8> {
    BackhaulConnectedParams {
        gw_ipv4: "192.168.1.1".parse().unwrap(),
        gw_bridge_mac: MacAddr([0xdd, 0, 0, 0, 0, 1]),
        controller_bridge_mac: CONTROLLER_BRIDGE_MAC,
        bridge_mac: LOCAL_BRIDGE_MAC,
        bridge_ipv4: "192.168.1.20".parse().unwrap(),
        backhaul_mac: MacAddr([0xaa, 0xbb, 0xcc, 0, 0, 2]),
        backhaul_ipv4: "192.168.1.20".parse().unwrap(),
        backhaul_bssid: MacAddr([0xee, 0, 0, 0, 0, 1]),
        backhaul_channel: 36,
        backhaul_is_wireless: wireless,
        backhaul_iface_type: 1,
        is_backhaul_manager,
        scan_measurements: Vec::new(),
    }
    .to_bytes()
}

/// Drives a `Slave` against fake links and a scripted clock.
pub struct Harness {
    pub slave: Slave,
    pub links: FakeLinks,
    pub clock: FakeClock,
}

impl Default for Harness {
    fn default() -> Self {
        Harness::new()
    }
}

impl Harness {
    pub fn new() -> Harness {
        Harness::with_config(test_config())
    }

    pub fn with_config(config: SlaveConfig) -> Harness {
        let clock = FakeClock::new();
        let slave = Slave::new(config, Box::new(clock.clone()));
        Harness {
            slave,
            links: FakeLinks::default(),
            clock,
        }
    }

    pub fn work(&mut self) -> bool {
        self.slave.work(&mut self.links)
    }

    pub fn advance(&mut self, d: Duration) {
        self.clock.advance(d);
    }

    pub fn state(&self) -> State {
        self.slave.state()
    }

    pub fn status_bh(&self) -> RadioStatus {
        self.slave.status_bh
    }

    pub fn keep_alive_retries(&self) -> u8 {
        self.slave.keep_alive_retries
    }

    pub fn pending_associations(&self) -> usize {
        self.slave.pending_client_association.len()
    }

    pub fn pending_iface_actions(&self) -> usize {
        self.slave.pending_iface_actions.len()
    }

    pub fn deliver(&mut self, link: LinkId, cmdu: &Cmdu) -> Result<(), Error> {
        let bytes = cmdu.serialize();
        self.slave.handle_frame(&mut self.links, link, &bytes)
    }

    pub fn deliver_vendor(
        &mut self,
        link: LinkId,
        action: Action,
        op: u8,
        id: u16,
        payload: &[u8],
    ) -> Result<(), Error> {
        let cmdu = vendor::build_vs_cmdu(action, op, id, payload);
        self.deliver(link, &cmdu)
    }

    /// Delivers a vendor control message as the controller would: over the
    /// backhaul link, addressed at this radio.
    pub fn deliver_from_controller(
        &mut self,
        op: u8,
        id: u16,
        payload: &[u8],
    ) -> Result<(), Error> {
        let mut cmdu = vendor::build_vs_cmdu(Action::Control, op, id, payload);
        stamp_radio_mac(&mut cmdu, self.slave.hostap_params.iface_mac);
        self.deliver(LinkId::Backhaul, &cmdu)
    }

    pub fn close_link(&mut self, link: LinkId) {
        self.slave.handle_link_closed(&mut self.links, link);
    }

    /// Keeps both workers alive across artificial clock jumps.
    pub fn feed_worker_heartbeats(&mut self) {
        self.deliver_vendor(
            AP_WORKER,
            Action::ApManager,
            ap_manager_op::HEARTBEAT_NOTIFICATION,
            0,
            &[],
        )
        .unwrap();
        self.deliver_vendor(
            MONITOR_WORKER,
            Action::Monitor,
            monitor_op::HEARTBEAT_NOTIFICATION,
            0,
            &[],
        )
        .unwrap();
    }

    /// The controller's M2 CMDU carrying the join response.
    pub fn join_response_cmdu(&self, err_code: u8, master_version: &str) -> Cmdu {
        let response = SlaveJoinedResponse {
            err_code,
            master_version: master_version.into(),
            config: SonConfig {
                slave_keep_alive_retries: 3,
                ..Default::default()
            },
        };
        let mut cmdu = Cmdu::new(MessageType::ApAutoconfigurationWsc, 0);
        cmdu.push_tlv(radio_identifier_tlv(self.slave.config.radio_identifier));
        cmdu.push_tlv(Tlv::new(tlv_type::WSC, wsc::build_m2("Intel")));
        cmdu.push_tlv(vendor::build_vs_tlv(
            Action::Control,
            vendor::control_op::SLAVE_JOINED_RESPONSE,
            0,
            &response.to_bytes(),
        ));
        cmdu
    }

    fn drain_iface_actions(&mut self) {
        let pending: Vec<_> = self
            .slave
            .pending_iface_actions
            .values()
            .map(|a| (a.iface.clone(), a.operation))
            .collect();
        for (iface, operation) in pending {
            let response = IfaceStateResponse {
                iface_name: iface,
                operation: operation.to_wire(),
                success: 1,
            }
            .to_bytes();
            self.deliver_vendor(
                LinkId::Platform,
                Action::Platform,
                platform_op::WIFI_SET_IFACE_STATE_RESPONSE,
                0,
                &response,
            )
            .unwrap();
        }
    }

    pub fn son_config(&self) -> &SonConfig {
        &self.slave.son_config
    }

    /// Walks the happy-path bring-up until the backhaul enable has been
    /// sent; both workers are attached, no controller yet.
    pub fn run_to_wait_backhaul_connected(&mut self) {
        // platform registration
        self.work();
        assert!(matches!(self.state(), State::ConnectToPlatform));
        self.work();
        assert!(matches!(
            self.state(),
            State::WaitForPlatformRegisterResponse { .. }
        ));
        self.deliver_vendor(
            LinkId::Platform,
            Action::Platform,
            platform_op::SON_SLAVE_REGISTER_RESPONSE,
            0,
            &platform_register_ok(0, 0, 0),
        )
        .unwrap();
        assert!(matches!(self.state(), State::ConnectToBackhaul));

        // backhaul registration
        self.work();
        self.deliver_vendor(
            LinkId::Backhaul,
            Action::Backhaul,
            backhaul_op::REGISTER_RESPONSE,
            0,
            &[],
        )
        .unwrap();
        assert!(matches!(self.state(), State::JoinInit));

        // wlan ready + interface bring-up
        self.work();
        assert!(matches!(self.state(), State::GetWlanReadyStatus));
        self.work();
        self.deliver_vendor(
            LinkId::Platform,
            Action::Platform,
            platform_op::GET_WLAN_READY_STATUS_RESPONSE,
            0,
            &[1],
        )
        .unwrap();
        assert!(matches!(self.state(), State::JoinInitBringUpInterfaces));
        self.work();
        assert!(self.pending_iface_actions() > 0);
        self.drain_iface_actions();
        self.work();
        assert!(matches!(self.state(), State::StartApManager));

        // workers
        self.work();
        assert!(matches!(self.state(), State::WaitForApManagerInitDone));
        self.deliver_vendor(
            AP_WORKER,
            Action::ApManager,
            ap_manager_op::INIT_DONE_NOTIFICATION,
            0,
            &[],
        )
        .unwrap();
        self.deliver_vendor(
            AP_WORKER,
            Action::ApManager,
            ap_manager_op::JOINED_NOTIFICATION,
            0,
            &ap_manager_joined_payload(),
        )
        .unwrap();
        assert!(matches!(self.state(), State::ApManagerJoined));
        self.work();
        assert!(matches!(self.state(), State::StartMonitor));
        self.work();
        self.deliver_vendor(
            MONITOR_WORKER,
            Action::Monitor,
            monitor_op::JOINED_NOTIFICATION,
            0,
            &[],
        )
        .unwrap();
        assert!(matches!(self.state(), State::BackhaulEnable));

        // backhaul bring-up
        self.work();
        assert!(matches!(self.state(), State::SendBackhaulEnable));
        self.work();
        assert!(matches!(self.state(), State::WaitForBackhaulConnected));
    }

    /// Walks the happy-path bring-up until the join request has been sent
    /// and the slave waits for the controller's answer.
    pub fn run_to_wait_joined(&mut self) {
        self.run_to_wait_backhaul_connected();
        self.deliver_vendor(
            LinkId::Backhaul,
            Action::Backhaul,
            backhaul_op::CONNECTED_NOTIFICATION,
            0,
            &backhaul_connected_payload(1, 1),
        )
        .unwrap();
        assert!(matches!(self.state(), State::BackhaulConnected));

        // BackhaulConnected falls through to JoinMaster in one cycle
        self.work();
        assert!(matches!(self.state(), State::WaitForJoinedResponse { .. }));
    }

    /// Full happy-path bring-up into `Operational`.
    pub fn run_to_operational(&mut self) {
        self.run_to_wait_joined();
        let m2 = self.join_response_cmdu(crate::message::payloads::join_err::OK, "1.0.0");
        self.deliver(LinkId::Backhaul, &m2).unwrap();
        assert!(matches!(self.state(), State::UpdateMonitorSonConfig));
        self.work();
        assert!(matches!(self.state(), State::Operational));
    }
}
