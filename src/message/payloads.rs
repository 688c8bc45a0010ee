//! Typed payload records for the vendor messages the slave itself reads or
//! produces. Messages that are only ever relayed between peers stay as raw
//! bytes and never get a struct here.

use std::net::Ipv4Addr;

use super::types::MacAddr;
use super::wire::{Reader, Wire, WireError, Writer};

pub const IFACE_NAME_LENGTH: usize = 16;
pub const WIFI_SSID_MAX_LENGTH: usize = 36;
pub const WIFI_PASS_MAX_LENGTH: usize = 64;
pub const WIFI_SECURITY_TYPE_MAX_LENGTH: usize = 32;
pub const VERSION_LENGTH: usize = 16;
pub const NODE_NAME_LENGTH: usize = 32;
pub const PLATFORM_ERROR_DATA_SIZE: usize = 256;
pub const BACKHAUL_SCAN_MEASUREMENT_MAX_LENGTH: usize = 8;

/// Join response error codes.
pub mod join_err {
    pub const OK: u8 = 0;
    pub const REJECT: u8 = 1;
    pub const VERSION_MISMATCH: u8 = 2;
    pub const SSID_MISMATCH: u8 = 3;
    pub const ADVERTISE_SSID_FLAG_MISMATCH: u8 = 4;
}

/// SON runtime configuration pushed by the controller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SonConfig {
    pub monitor_total_ch_load_notification_lo_th_percent: u8,
    pub monitor_total_ch_load_notification_hi_th_percent: u8,
    pub monitor_total_ch_load_notification_delta_th_percent: u8,
    pub monitor_min_active_clients: u8,
    pub monitor_active_client_th: u8,
    pub monitor_client_load_notification_delta_th_percent: u8,
    pub monitor_rx_rssi_notification_threshold_dbm: i8,
    pub monitor_rx_rssi_notification_delta_db: u8,
    pub monitor_ap_idle_threshold_b: u32,
    pub monitor_ap_active_threshold_b: u32,
    pub monitor_ap_idle_stable_time_sec: u16,
    pub monitor_disable_initiative_arp: u8,
    pub slave_keep_alive_retries: u8,
}

impl Wire for SonConfig {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.monitor_total_ch_load_notification_lo_th_percent);
        w.u8(self.monitor_total_ch_load_notification_hi_th_percent);
        w.u8(self.monitor_total_ch_load_notification_delta_th_percent);
        w.u8(self.monitor_min_active_clients);
        w.u8(self.monitor_active_client_th);
        w.u8(self.monitor_client_load_notification_delta_th_percent);
        w.i8(self.monitor_rx_rssi_notification_threshold_dbm);
        w.u8(self.monitor_rx_rssi_notification_delta_db);
        w.u32(self.monitor_ap_idle_threshold_b);
        w.u32(self.monitor_ap_active_threshold_b);
        w.u16(self.monitor_ap_idle_stable_time_sec);
        w.u8(self.monitor_disable_initiative_arp);
        w.u8(self.slave_keep_alive_retries);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(SonConfig {
            monitor_total_ch_load_notification_lo_th_percent: r.u8()?,
            monitor_total_ch_load_notification_hi_th_percent: r.u8()?,
            monitor_total_ch_load_notification_delta_th_percent: r.u8()?,
            monitor_min_active_clients: r.u8()?,
            monitor_active_client_th: r.u8()?,
            monitor_client_load_notification_delta_th_percent: r.u8()?,
            monitor_rx_rssi_notification_threshold_dbm: r.i8()?,
            monitor_rx_rssi_notification_delta_db: r.u8()?,
            monitor_ap_idle_threshold_b: r.u32()?,
            monitor_ap_active_threshold_b: r.u32()?,
            monitor_ap_idle_stable_time_sec: r.u16()?,
            monitor_disable_initiative_arp: r.u8()?,
            slave_keep_alive_retries: r.u8()?,
        })
    }
}

/// Master/slave version pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Versions {
    pub master_version: String,
    pub slave_version: String,
}

impl Wire for Versions {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.master_version, VERSION_LENGTH);
        w.fixed_str(&self.slave_version, VERSION_LENGTH);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(Versions {
            master_version: r.fixed_str(VERSION_LENGTH)?,
            slave_version: r.fixed_str(VERSION_LENGTH)?,
        })
    }
}

/// Ping request/response header; a `size`-byte zero-filled buffer follows
/// it on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PingParams {
    pub total: u8,
    pub seq: u8,
    pub size: u16,
}

impl Wire for PingParams {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.total);
        w.u8(self.seq);
        w.u16(self.size);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(PingParams {
            total: r.u8()?,
            seq: r.u8()?,
            size: r.u16()?,
        })
    }
}

impl PingParams {
    /// Full wire image: the header followed by `size` zero bytes.
    pub fn to_padded_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        self.encode(&mut w);
        w.zeros(self.size as usize);
        w.into_vec()
    }
}

/// Logging-level change pushed by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LoggingLevelParams {
    pub module_name: u8,
    pub log_level: u8,
    pub enable: u8,
}

impl Wire for LoggingLevelParams {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.module_name);
        w.u8(self.log_level);
        w.u8(self.enable);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(LoggingLevelParams {
            module_name: r.u8()?,
            log_level: r.u8()?,
            enable: r.u8()?,
        })
    }
}

/// RX-RSSI measurement request; routing depends on `cross` and `ipv4`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RssiMeasurementRequest {
    pub mac: MacAddr,
    pub ipv4: Ipv4Addr,
    pub channel: u8,
    pub bandwidth: u8,
    pub cross: u8,
    pub mon_ping_burst_pkt_num: u8,
}

impl Default for RssiMeasurementRequest {
    fn default() -> Self {
        RssiMeasurementRequest {
            mac: MacAddr::ZERO,
            ipv4: Ipv4Addr::UNSPECIFIED,
            channel: 0,
            bandwidth: 0,
            cross: 0,
            mon_ping_burst_pkt_num: 0,
        }
    }
}

impl Wire for RssiMeasurementRequest {
    fn encode(&self, w: &mut Writer) {
        w.mac(self.mac);
        w.ipv4(self.ipv4);
        w.u8(self.channel);
        w.u8(self.bandwidth);
        w.u8(self.cross);
        w.u8(self.mon_ping_burst_pkt_num);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(RssiMeasurementRequest {
            mac: r.mac()?,
            ipv4: r.ipv4()?,
            channel: r.u8()?,
            bandwidth: r.u8()?,
            cross: r.u8()?,
            mon_ping_burst_pkt_num: r.u8()?,
        })
    }
}

/// RX-RSSI measurement response; `src_module` is stamped by the slave
/// before the relay to the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RssiMeasurementResponse {
    pub mac: MacAddr,
    pub rx_rssi: i8,
    pub rx_snr: i8,
    pub rx_packets: u16,
    pub src_module: u8,
}

impl Default for RssiMeasurementResponse {
    fn default() -> Self {
        RssiMeasurementResponse {
            mac: MacAddr::ZERO,
            rx_rssi: 0,
            rx_snr: 0,
            rx_packets: 0,
            src_module: 0,
        }
    }
}

impl Wire for RssiMeasurementResponse {
    fn encode(&self, w: &mut Writer) {
        w.mac(self.mac);
        w.i8(self.rx_rssi);
        w.i8(self.rx_snr);
        w.u16(self.rx_packets);
        w.u8(self.src_module);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(RssiMeasurementResponse {
            mac: r.mac()?,
            rx_rssi: r.i8()?,
            rx_snr: r.i8()?,
            rx_packets: r.u16()?,
            src_module: r.u8()?,
        })
    }
}

/// Client association event from the AP manager.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClientAssociationParams {
    pub mac: MacAddr,
    pub vap_id: i8,
    pub capabilities: u32,
}

impl Wire for ClientAssociationParams {
    fn encode(&self, w: &mut Writer) {
        w.mac(self.mac);
        w.i8(self.vap_id);
        w.u32(self.capabilities);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(ClientAssociationParams {
            mac: r.mac()?,
            vap_id: r.i8()?,
            capabilities: r.u32()?,
        })
    }
}

/// Client disconnect event from the AP manager.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClientDisconnectionParams {
    pub mac: MacAddr,
    pub vap_id: i8,
    pub reason: u8,
}

impl Wire for ClientDisconnectionParams {
    fn encode(&self, w: &mut Writer) {
        w.mac(self.mac);
        w.i8(self.vap_id);
        w.u8(self.reason);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(ClientDisconnectionParams {
            mac: r.mac()?,
            vap_id: r.i8()?,
            reason: r.u8()?,
        })
    }
}

/// Client monitoring request; `is_ire` additionally announces the client
/// to the AP manager as a connected repeater.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClientMonitoringParams {
    pub mac: MacAddr,
    pub ipv4: Ipv4Addr,
    pub bridge_4addr_mac: MacAddr,
    pub is_ire: u8,
}

impl Default for ClientMonitoringParams {
    fn default() -> Self {
        ClientMonitoringParams {
            mac: MacAddr::ZERO,
            ipv4: Ipv4Addr::UNSPECIFIED,
            bridge_4addr_mac: MacAddr::ZERO,
            is_ire: 0,
        }
    }
}

impl Wire for ClientMonitoringParams {
    fn encode(&self, w: &mut Writer) {
        w.mac(self.mac);
        w.ipv4(self.ipv4);
        w.mac(self.bridge_4addr_mac);
        w.u8(self.is_ire);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(ClientMonitoringParams {
            mac: r.mac()?,
            ipv4: r.ipv4()?,
            bridge_4addr_mac: r.mac()?,
            is_ire: r.u8()?,
        })
    }
}

/// 802.11k beacon measurement request; the slave substitutes its front
/// SSID when the optional SSID field is requested but empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Beacon11kRequest {
    pub mac: MacAddr,
    pub bssid: MacAddr,
    pub channel: u8,
    pub use_optional_ssid: u8,
    pub ssid: String,
}

impl Wire for Beacon11kRequest {
    fn encode(&self, w: &mut Writer) {
        w.mac(self.mac);
        w.mac(self.bssid);
        w.u8(self.channel);
        w.u8(self.use_optional_ssid);
        w.fixed_str(&self.ssid, WIFI_SSID_MAX_LENGTH);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(Beacon11kRequest {
            mac: r.mac()?,
            bssid: r.mac()?,
            channel: r.u8()?,
            use_optional_ssid: r.u8()?,
            ssid: r.fixed_str(WIFI_SSID_MAX_LENGTH)?,
        })
    }
}

/// Registration request to the backhaul manager.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackhaulRegisterRequest {
    pub sta_iface: String,
    pub hostap_iface: String,
    pub local_master: u8,
    pub local_gw: u8,
    pub sta_iface_filter_low: u8,
    pub onboarding: u8,
}

impl Wire for BackhaulRegisterRequest {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.sta_iface, IFACE_NAME_LENGTH);
        w.fixed_str(&self.hostap_iface, IFACE_NAME_LENGTH);
        w.u8(self.local_master);
        w.u8(self.local_gw);
        w.u8(self.sta_iface_filter_low);
        w.u8(self.onboarding);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(BackhaulRegisterRequest {
            sta_iface: r.fixed_str(IFACE_NAME_LENGTH)?,
            hostap_iface: r.fixed_str(IFACE_NAME_LENGTH)?,
            local_master: r.u8()?,
            local_gw: r.u8()?,
            sta_iface_filter_low: r.u8()?,
            onboarding: r.u8()?,
        })
    }
}

/// Backhaul enable request carrying the uplink credentials and interface
/// wiring.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BackhaulEnable {
    pub ssid: String,
    pub pass: String,
    pub security_type: u32,
    pub wire_iface: String,
    pub wire_iface_type: u8,
    pub wireless_iface_type: u8,
    pub wired_backhaul: u8,
    pub iface_mac: MacAddr,
    pub iface_is_5ghz: u8,
    pub preferred_bssid: MacAddr,
    pub ap_iface: String,
    pub sta_iface: String,
    pub bridge_iface: String,
}

impl Wire for BackhaulEnable {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.ssid, WIFI_SSID_MAX_LENGTH);
        w.fixed_str(&self.pass, WIFI_PASS_MAX_LENGTH);
        w.u32(self.security_type);
        w.fixed_str(&self.wire_iface, IFACE_NAME_LENGTH);
        w.u8(self.wire_iface_type);
        w.u8(self.wireless_iface_type);
        w.u8(self.wired_backhaul);
        w.mac(self.iface_mac);
        w.u8(self.iface_is_5ghz);
        w.mac(self.preferred_bssid);
        w.fixed_str(&self.ap_iface, IFACE_NAME_LENGTH);
        w.fixed_str(&self.sta_iface, IFACE_NAME_LENGTH);
        w.fixed_str(&self.bridge_iface, IFACE_NAME_LENGTH);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(BackhaulEnable {
            ssid: r.fixed_str(WIFI_SSID_MAX_LENGTH)?,
            pass: r.fixed_str(WIFI_PASS_MAX_LENGTH)?,
            security_type: r.u32()?,
            wire_iface: r.fixed_str(IFACE_NAME_LENGTH)?,
            wire_iface_type: r.u8()?,
            wireless_iface_type: r.u8()?,
            wired_backhaul: r.u8()?,
            iface_mac: r.mac()?,
            iface_is_5ghz: r.u8()?,
            preferred_bssid: r.mac()?,
            ap_iface: r.fixed_str(IFACE_NAME_LENGTH)?,
            sta_iface: r.fixed_str(IFACE_NAME_LENGTH)?,
            bridge_iface: r.fixed_str(IFACE_NAME_LENGTH)?,
        })
    }
}

/// One entry of the backhaul scan measurement history.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScanMeasurement {
    pub mac: MacAddr,
    pub channel: u8,
    pub rssi: i8,
}

impl Wire for ScanMeasurement {
    fn encode(&self, w: &mut Writer) {
        w.mac(self.mac);
        w.u8(self.channel);
        w.i8(self.rssi);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(ScanMeasurement {
            mac: r.mac()?,
            channel: r.u8()?,
            rssi: r.i8()?,
        })
    }
}

fn encode_scan_list(w: &mut Writer, list: &[ScanMeasurement]) {
    for i in 0..BACKHAUL_SCAN_MEASUREMENT_MAX_LENGTH {
        list.get(i).copied().unwrap_or_default().encode(w);
    }
}

fn decode_scan_list(r: &mut Reader) -> Result<Vec<ScanMeasurement>, WireError> {
    let mut list = Vec::with_capacity(BACKHAUL_SCAN_MEASUREMENT_MAX_LENGTH);
    for _ in 0..BACKHAUL_SCAN_MEASUREMENT_MAX_LENGTH {
        list.push(ScanMeasurement::decode(r)?);
    }
    Ok(list)
}

/// Backhaul-connected notification payload.
#[derive(Clone, Debug, PartialEq)]
pub struct BackhaulConnectedParams {
    pub gw_ipv4: Ipv4Addr,
    pub gw_bridge_mac: MacAddr,
    pub controller_bridge_mac: MacAddr,
    pub bridge_mac: MacAddr,
    pub bridge_ipv4: Ipv4Addr,
    pub backhaul_mac: MacAddr,
    pub backhaul_ipv4: Ipv4Addr,
    pub backhaul_bssid: MacAddr,
    pub backhaul_channel: u8,
    pub backhaul_is_wireless: u8,
    pub backhaul_iface_type: u8,
    pub is_backhaul_manager: u8,
    pub scan_measurements: Vec<ScanMeasurement>,
}

impl Default for BackhaulConnectedParams {
    fn default() -> Self {
        BackhaulConnectedParams {
            gw_ipv4: Ipv4Addr::UNSPECIFIED,
            gw_bridge_mac: MacAddr::ZERO,
            controller_bridge_mac: MacAddr::ZERO,
            bridge_mac: MacAddr::ZERO,
            bridge_ipv4: Ipv4Addr::UNSPECIFIED,
            backhaul_mac: MacAddr::ZERO,
            backhaul_ipv4: Ipv4Addr::UNSPECIFIED,
            backhaul_bssid: MacAddr::ZERO,
            backhaul_channel: 0,
            backhaul_is_wireless: 0,
            backhaul_iface_type: 0,
            is_backhaul_manager: 0,
            scan_measurements: Vec::new(),
        }
    }
}

impl Wire for BackhaulConnectedParams {
    fn encode(&self, w: &mut Writer) {
        w.ipv4(self.gw_ipv4);
        w.mac(self.gw_bridge_mac);
        w.mac(self.controller_bridge_mac);
        w.mac(self.bridge_mac);
        w.ipv4(self.bridge_ipv4);
        w.mac(self.backhaul_mac);
        w.ipv4(self.backhaul_ipv4);
        w.mac(self.backhaul_bssid);
        w.u8(self.backhaul_channel);
        w.u8(self.backhaul_is_wireless);
        w.u8(self.backhaul_iface_type);
        w.u8(self.is_backhaul_manager);
        encode_scan_list(w, &self.scan_measurements);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(BackhaulConnectedParams {
            gw_ipv4: r.ipv4()?,
            gw_bridge_mac: r.mac()?,
            controller_bridge_mac: r.mac()?,
            bridge_mac: r.mac()?,
            bridge_ipv4: r.ipv4()?,
            backhaul_mac: r.mac()?,
            backhaul_ipv4: r.ipv4()?,
            backhaul_bssid: r.mac()?,
            backhaul_channel: r.u8()?,
            backhaul_is_wireless: r.u8()?,
            backhaul_iface_type: r.u8()?,
            is_backhaul_manager: r.u8()?,
            scan_measurements: decode_scan_list(r)?,
        })
    }
}

/// Backhaul-disconnected notification payload.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackhaulDisconnectedParams {
    pub stopped: u8,
}

impl Wire for BackhaulDisconnectedParams {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.stopped);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(BackhaulDisconnectedParams { stopped: r.u8()? })
    }
}

/// Downlink RSSI report from the backhaul manager.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DlRssiReport {
    pub rssi: i8,
}

impl Wire for DlRssiReport {
    fn encode(&self, w: &mut Writer) {
        w.i8(self.rssi);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(DlRssiReport { rssi: r.i8()? })
    }
}

/// Role flags and credential store snapshot owned by the platform adapter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatformSettings {
    pub local_master: u8,
    pub local_gw: u8,
    pub onboarding: u8,
    pub passive_mode_enabled: u8,
    pub wired_backhaul: u8,
    pub front_ssid: String,
    pub front_pass: String,
    pub front_security_type: String,
    pub back_ssid: String,
    pub back_pass: String,
    pub back_security_type: String,
    pub backhaul_vaps_bssid: [MacAddr; 3],
}

impl Wire for PlatformSettings {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.local_master);
        w.u8(self.local_gw);
        w.u8(self.onboarding);
        w.u8(self.passive_mode_enabled);
        w.u8(self.wired_backhaul);
        w.fixed_str(&self.front_ssid, WIFI_SSID_MAX_LENGTH);
        w.fixed_str(&self.front_pass, WIFI_PASS_MAX_LENGTH);
        w.fixed_str(&self.front_security_type, WIFI_SECURITY_TYPE_MAX_LENGTH);
        w.fixed_str(&self.back_ssid, WIFI_SSID_MAX_LENGTH);
        w.fixed_str(&self.back_pass, WIFI_PASS_MAX_LENGTH);
        w.fixed_str(&self.back_security_type, WIFI_SECURITY_TYPE_MAX_LENGTH);
        for mac in &self.backhaul_vaps_bssid {
            w.mac(*mac);
        }
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(PlatformSettings {
            local_master: r.u8()?,
            local_gw: r.u8()?,
            onboarding: r.u8()?,
            passive_mode_enabled: r.u8()?,
            wired_backhaul: r.u8()?,
            front_ssid: r.fixed_str(WIFI_SSID_MAX_LENGTH)?,
            front_pass: r.fixed_str(WIFI_PASS_MAX_LENGTH)?,
            front_security_type: r.fixed_str(WIFI_SECURITY_TYPE_MAX_LENGTH)?,
            back_ssid: r.fixed_str(WIFI_SSID_MAX_LENGTH)?,
            back_pass: r.fixed_str(WIFI_PASS_MAX_LENGTH)?,
            back_security_type: r.fixed_str(WIFI_SECURITY_TYPE_MAX_LENGTH)?,
            backhaul_vaps_bssid: [r.mac()?, r.mac()?, r.mac()?],
        })
    }
}

/// Per-radio WLAN settings owned by the platform adapter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WlanSettings {
    pub band_enabled: u8,
    pub acs_enabled: u8,
    pub advertise_ssid: u8,
    pub ssid: String,
    pub pass: String,
    pub security_type: String,
}

impl Wire for WlanSettings {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.band_enabled);
        w.u8(self.acs_enabled);
        w.u8(self.advertise_ssid);
        w.fixed_str(&self.ssid, WIFI_SSID_MAX_LENGTH);
        w.fixed_str(&self.pass, WIFI_PASS_MAX_LENGTH);
        w.fixed_str(&self.security_type, WIFI_SECURITY_TYPE_MAX_LENGTH);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(WlanSettings {
            band_enabled: r.u8()?,
            acs_enabled: r.u8()?,
            advertise_ssid: r.u8()?,
            ssid: r.fixed_str(WIFI_SSID_MAX_LENGTH)?,
            pass: r.fixed_str(WIFI_PASS_MAX_LENGTH)?,
            security_type: r.fixed_str(WIFI_SECURITY_TYPE_MAX_LENGTH)?,
        })
    }
}

/// Platform registration: request carries the radio iface, response the
/// validity flag and both settings blocks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatformRegisterRequest {
    pub iface_name: String,
}

impl Wire for PlatformRegisterRequest {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.iface_name, IFACE_NAME_LENGTH);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(PlatformRegisterRequest {
            iface_name: r.fixed_str(IFACE_NAME_LENGTH)?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatformRegisterResponse {
    pub valid: u8,
    pub platform_settings: PlatformSettings,
    pub wlan_settings: WlanSettings,
}

impl Wire for PlatformRegisterResponse {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.valid);
        self.platform_settings.encode(w);
        self.wlan_settings.encode(w);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(PlatformRegisterResponse {
            valid: r.u8()?,
            platform_settings: PlatformSettings::decode(r)?,
            wlan_settings: WlanSettings::decode(r)?,
        })
    }
}

/// One-byte result payloads coming back from the platform adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResultPayload {
    pub result: u8,
}

impl Wire for ResultPayload {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.result);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(ResultPayload { result: r.u8()? })
    }
}

/// Interface state request to the platform adapter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IfaceStateRequest {
    pub iface_name: String,
    pub operation: u8,
}

impl Wire for IfaceStateRequest {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.iface_name, IFACE_NAME_LENGTH);
        w.u8(self.operation);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(IfaceStateRequest {
            iface_name: r.fixed_str(IFACE_NAME_LENGTH)?,
            operation: r.u8()?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IfaceStateResponse {
    pub iface_name: String,
    pub operation: u8,
    pub success: u8,
}

impl Wire for IfaceStateResponse {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.iface_name, IFACE_NAME_LENGTH);
        w.u8(self.operation);
        w.u8(self.success);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(IfaceStateResponse {
            iface_name: r.fixed_str(IFACE_NAME_LENGTH)?,
            operation: r.u8()?,
            success: r.u8()?,
        })
    }
}

/// Radio TX state request/response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RadioTxState {
    pub iface_name: String,
    pub enable: u8,
    pub success: u8,
}

impl Wire for RadioTxState {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.iface_name, IFACE_NAME_LENGTH);
        w.u8(self.enable);
        w.u8(self.success);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(RadioTxState {
            iface_name: r.fixed_str(IFACE_NAME_LENGTH)?,
            enable: r.u8()?,
            success: r.u8()?,
        })
    }
}

/// WiFi credentials as carried on the controller rollover path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WifiCredentials {
    pub ssid: String,
    pub pass: String,
    pub sec: u32,
}

impl Wire for WifiCredentials {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.ssid, WIFI_SSID_MAX_LENGTH);
        w.fixed_str(&self.pass, WIFI_PASS_MAX_LENGTH);
        w.u32(self.sec);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(WifiCredentials {
            ssid: r.fixed_str(WIFI_SSID_MAX_LENGTH)?,
            pass: r.fixed_str(WIFI_PASS_MAX_LENGTH)?,
            sec: r.u32()?,
        })
    }
}

/// Credentials-set request towards the platform adapter (unification path).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CredentialsSetRequest {
    pub iface_name: String,
    pub ssid: String,
    pub pass: String,
    pub security_type: String,
}

impl Wire for CredentialsSetRequest {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.iface_name, IFACE_NAME_LENGTH);
        w.fixed_str(&self.ssid, WIFI_SSID_MAX_LENGTH);
        w.fixed_str(&self.pass, WIFI_PASS_MAX_LENGTH);
        w.fixed_str(&self.security_type, WIFI_SECURITY_TYPE_MAX_LENGTH);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(CredentialsSetRequest {
            iface_name: r.fixed_str(IFACE_NAME_LENGTH)?,
            ssid: r.fixed_str(WIFI_SSID_MAX_LENGTH)?,
            pass: r.fixed_str(WIFI_PASS_MAX_LENGTH)?,
            security_type: r.fixed_str(WIFI_SECURITY_TYPE_MAX_LENGTH)?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CredentialsSetResponse {
    pub iface_name: String,
    pub success: u8,
}

impl Wire for CredentialsSetResponse {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.iface_name, IFACE_NAME_LENGTH);
        w.u8(self.success);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(CredentialsSetResponse {
            iface_name: r.fixed_str(IFACE_NAME_LENGTH)?,
            success: r.u8()?,
        })
    }
}

/// Typed error surfaced to the platform adapter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlatformErrorNotification {
    pub code: u32,
    pub data: String,
}

impl Wire for PlatformErrorNotification {
    fn encode(&self, w: &mut Writer) {
        w.u32(self.code);
        w.fixed_str(&self.data, PLATFORM_ERROR_DATA_SIZE);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(PlatformErrorNotification {
            code: r.u32()?,
            data: r.fixed_str(PLATFORM_ERROR_DATA_SIZE)?,
        })
    }
}

/// Interface status notification to the platform adapter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IfaceStatusNotification {
    pub iface_name_ap: String,
    pub iface_name_bh: String,
    pub status_ap: u8,
    pub status_bh: u8,
    pub status_bh_wired: u8,
    pub is_bh_manager: u8,
    pub status_operational: u8,
}

impl Wire for IfaceStatusNotification {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.iface_name_ap, IFACE_NAME_LENGTH);
        w.fixed_str(&self.iface_name_bh, IFACE_NAME_LENGTH);
        w.u8(self.status_ap);
        w.u8(self.status_bh);
        w.u8(self.status_bh_wired);
        w.u8(self.is_bh_manager);
        w.u8(self.status_operational);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(IfaceStatusNotification {
            iface_name_ap: r.fixed_str(IFACE_NAME_LENGTH)?,
            iface_name_bh: r.fixed_str(IFACE_NAME_LENGTH)?,
            status_ap: r.u8()?,
            status_bh: r.u8()?,
            status_bh_wired: r.u8()?,
            is_bh_manager: r.u8()?,
            status_operational: r.u8()?,
        })
    }
}

/// Operational state change relayed to the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OperationalNotification {
    pub operational: u8,
    pub bridge_mac: MacAddr,
}

impl Wire for OperationalNotification {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.operational);
        w.mac(self.bridge_mac);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(OperationalNotification {
            operational: r.u8()?,
            bridge_mac: r.mac()?,
        })
    }
}

/// DHCP lease event from the platform adapter.
#[derive(Clone, Debug, PartialEq)]
pub struct DhcpMonitorNotification {
    pub op: u8,
    pub mac: MacAddr,
    pub ipv4: Ipv4Addr,
    pub hostname: String,
}

pub mod dhcp_op {
    pub const ADD: u8 = 0;
    pub const DEL: u8 = 1;
    pub const OLD: u8 = 2;
}

impl Default for DhcpMonitorNotification {
    fn default() -> Self {
        DhcpMonitorNotification {
            op: dhcp_op::ADD,
            mac: MacAddr::ZERO,
            ipv4: Ipv4Addr::UNSPECIFIED,
            hostname: String::new(),
        }
    }
}

impl Wire for DhcpMonitorNotification {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.op);
        w.mac(self.mac);
        w.ipv4(self.ipv4);
        w.fixed_str(&self.hostname, NODE_NAME_LENGTH);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(DhcpMonitorNotification {
            op: r.u8()?,
            mac: r.mac()?,
            ipv4: r.ipv4()?,
            hostname: r.fixed_str(NODE_NAME_LENGTH)?,
        })
    }
}

/// Radio parameters learned from the AP manager when it joins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HostapParams {
    pub iface_name: String,
    pub iface_mac: MacAddr,
    pub iface_is_5ghz: u8,
    pub ant_num: u8,
    pub ant_gain: u8,
    pub conducted_power: u8,
}

impl Wire for HostapParams {
    fn encode(&self, w: &mut Writer) {
        w.fixed_str(&self.iface_name, IFACE_NAME_LENGTH);
        w.mac(self.iface_mac);
        w.u8(self.iface_is_5ghz);
        w.u8(self.ant_num);
        w.u8(self.ant_gain);
        w.u8(self.conducted_power);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(HostapParams {
            iface_name: r.fixed_str(IFACE_NAME_LENGTH)?,
            iface_mac: r.mac()?,
            iface_is_5ghz: r.u8()?,
            ant_num: r.u8()?,
            ant_gain: r.u8()?,
            conducted_power: r.u8()?,
        })
    }
}

/// Channel-selection parameters reported by the AP manager.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CsParams {
    pub channel: u8,
    pub bandwidth: u8,
    pub channel_ext_above_primary: i8,
    pub vht_center_frequency: u16,
    pub tx_power: u8,
}

impl Wire for CsParams {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.channel);
        w.u8(self.bandwidth);
        w.i8(self.channel_ext_above_primary);
        w.u16(self.vht_center_frequency);
        w.u8(self.tx_power);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(CsParams {
            channel: r.u8()?,
            bandwidth: r.u8()?,
            channel_ext_above_primary: r.i8()?,
            vht_center_frequency: r.u16()?,
            tx_power: r.u8()?,
        })
    }
}

/// AP-manager joined notification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApManagerJoined {
    pub params: HostapParams,
    pub cs_params: CsParams,
}

impl Wire for ApManagerJoined {
    fn encode(&self, w: &mut Writer) {
        self.params.encode(w);
        self.cs_params.encode(w);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(ApManagerJoined {
            params: HostapParams::decode(r)?,
            cs_params: CsParams::decode(r)?,
        })
    }
}

/// VAP-scoped enable/disable notifications.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VapNotification {
    pub vap_id: i8,
}

/// vap_id of the radio itself, as opposed to one of its VAPs
pub const IFACE_RADIO_ID: i8 = -1;

impl Wire for VapNotification {
    fn encode(&self, w: &mut Writer) {
        w.i8(self.vap_id);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(VapNotification { vap_id: r.i8()? })
    }
}

/// CSA/ACS/DFS notifications carry the channel-selection parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CsaNotification {
    pub cs_params: CsParams,
}

impl Wire for CsaNotification {
    fn encode(&self, w: &mut Writer) {
        self.cs_params.encode(w);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(CsaNotification {
            cs_params: CsParams::decode(r)?,
        })
    }
}

/// Monitor hostap status change.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HostapStatusChanged {
    pub new_tx_state: i8,
    pub new_hostap_enabled_state: i8,
}

impl Wire for HostapStatusChanged {
    fn encode(&self, w: &mut Writer) {
        w.i8(self.new_tx_state);
        w.i8(self.new_hostap_enabled_state);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(HostapStatusChanged {
            new_tx_state: r.i8()?,
            new_hostap_enabled_state: r.i8()?,
        })
    }
}

/// Monitor worker error report.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MonitorError {
    pub error_code: u32,
}

pub mod monitor_err {
    pub const HOSTAP_DISABLED: u32 = 1;
    pub const ATTACH_FAIL: u32 = 2;
    pub const SUDDEN_DETACH: u32 = 3;
    pub const HAL_DISCONNECTED: u32 = 4;
    pub const REPORT_PROCESS_FAIL: u32 = 5;
}

pub mod ap_manager_err {
    pub const NO_ERROR: u32 = 0;
    pub const HOSTAP_DISABLED: u32 = 1;
    pub const ATTACH_FAIL: u32 = 2;
    pub const SUDDEN_DETACH: u32 = 3;
    pub const HAL_DISCONNECTED: u32 = 4;
    pub const CAC_TIMEOUT: u32 = 5;
}

impl Wire for MonitorError {
    fn encode(&self, w: &mut Writer) {
        w.u32(self.error_code);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(MonitorError {
            error_code: r.u32()?,
        })
    }
}

/// Stop-on-failure budget update from the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StopOnFailureAttempts {
    pub attempts: u32,
}

impl Wire for StopOnFailureAttempts {
    fn encode(&self, w: &mut Writer) {
        w.u32(self.attempts);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(StopOnFailureAttempts { attempts: r.u32()? })
    }
}

/// Backhaul params block inside the SLAVE_JOINED notification.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinedBackhaulParams {
    pub gw_ipv4: Ipv4Addr,
    pub gw_bridge_mac: MacAddr,
    pub is_backhaul_manager: u8,
    pub backhaul_iface_type: u8,
    pub backhaul_mac: MacAddr,
    pub backhaul_channel: u8,
    pub backhaul_bssid: MacAddr,
    pub backhaul_is_wireless: u8,
    pub bridge_mac: MacAddr,
    pub bridge_ipv4: Ipv4Addr,
    pub backhaul_ipv4: Ipv4Addr,
    pub scan_measurements: Vec<ScanMeasurement>,
}

impl Default for JoinedBackhaulParams {
    fn default() -> Self {
        JoinedBackhaulParams {
            gw_ipv4: Ipv4Addr::UNSPECIFIED,
            gw_bridge_mac: MacAddr::ZERO,
            is_backhaul_manager: 0,
            backhaul_iface_type: 0,
            backhaul_mac: MacAddr::ZERO,
            backhaul_channel: 0,
            backhaul_bssid: MacAddr::ZERO,
            backhaul_is_wireless: 0,
            bridge_mac: MacAddr::ZERO,
            bridge_ipv4: Ipv4Addr::UNSPECIFIED,
            backhaul_ipv4: Ipv4Addr::UNSPECIFIED,
            scan_measurements: Vec::new(),
        }
    }
}

impl Wire for JoinedBackhaulParams {
    fn encode(&self, w: &mut Writer) {
        w.ipv4(self.gw_ipv4);
        w.mac(self.gw_bridge_mac);
        w.u8(self.is_backhaul_manager);
        w.u8(self.backhaul_iface_type);
        w.mac(self.backhaul_mac);
        w.u8(self.backhaul_channel);
        w.mac(self.backhaul_bssid);
        w.u8(self.backhaul_is_wireless);
        w.mac(self.bridge_mac);
        w.ipv4(self.bridge_ipv4);
        w.ipv4(self.backhaul_ipv4);
        encode_scan_list(w, &self.scan_measurements);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(JoinedBackhaulParams {
            gw_ipv4: r.ipv4()?,
            gw_bridge_mac: r.mac()?,
            is_backhaul_manager: r.u8()?,
            backhaul_iface_type: r.u8()?,
            backhaul_mac: r.mac()?,
            backhaul_channel: r.u8()?,
            backhaul_bssid: r.mac()?,
            backhaul_is_wireless: r.u8()?,
            bridge_mac: r.mac()?,
            bridge_ipv4: r.ipv4()?,
            backhaul_ipv4: r.ipv4()?,
            scan_measurements: decode_scan_list(r)?,
        })
    }
}

/// The SLAVE_JOINED notification carried inside the WSC M1 CMDU.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlaveJoinedNotification {
    pub is_slave_reconf: u8,
    pub slave_version: String,
    pub platform: u8,
    pub low_pass_filter_on: u8,
    pub enable_repeater_mode: u8,
    pub radio_identifier: MacAddr,
    pub backhaul_params: JoinedBackhaulParams,
    pub platform_settings: PlatformSettings,
    pub wlan_settings: WlanSettings,
    pub hostap: HostapParams,
    pub cs_params: CsParams,
}

impl Wire for SlaveJoinedNotification {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.is_slave_reconf);
        w.fixed_str(&self.slave_version, VERSION_LENGTH);
        w.u8(self.platform);
        w.u8(self.low_pass_filter_on);
        w.u8(self.enable_repeater_mode);
        w.mac(self.radio_identifier);
        self.backhaul_params.encode(w);
        self.platform_settings.encode(w);
        self.wlan_settings.encode(w);
        self.hostap.encode(w);
        self.cs_params.encode(w);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(SlaveJoinedNotification {
            is_slave_reconf: r.u8()?,
            slave_version: r.fixed_str(VERSION_LENGTH)?,
            platform: r.u8()?,
            low_pass_filter_on: r.u8()?,
            enable_repeater_mode: r.u8()?,
            radio_identifier: r.mac()?,
            backhaul_params: JoinedBackhaulParams::decode(r)?,
            platform_settings: PlatformSettings::decode(r)?,
            wlan_settings: WlanSettings::decode(r)?,
            hostap: HostapParams::decode(r)?,
            cs_params: CsParams::decode(r)?,
        })
    }
}

/// The controller's answer to a SLAVE_JOINED notification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlaveJoinedResponse {
    pub err_code: u8,
    pub master_version: String,
    pub config: SonConfig,
}

impl Wire for SlaveJoinedResponse {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.err_code);
        w.fixed_str(&self.master_version, VERSION_LENGTH);
        self.config.encode(w);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(SlaveJoinedResponse {
            err_code: r.u8()?,
            master_version: r.fixed_str(VERSION_LENGTH)?,
            config: SonConfig::decode(r)?,
        })
    }
}

/// Backhaul-connection-complete note to the platform adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackhaulConnectionComplete {
    pub is_backhaul_manager: u8,
}

impl Wire for BackhaulConnectionComplete {
    fn encode(&self, w: &mut Writer) {
        w.u8(self.is_backhaul_manager);
    }

    fn decode(r: &mut Reader) -> Result<Self, WireError> {
        Ok(BackhaulConnectionComplete {
            is_backhaul_manager: r.u8()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn son_config_round_trip() {
        let config = SonConfig {
            monitor_total_ch_load_notification_lo_th_percent: 10,
            monitor_total_ch_load_notification_hi_th_percent: 85,
            monitor_total_ch_load_notification_delta_th_percent: 5,
            monitor_min_active_clients: 2,
            monitor_active_client_th: 5,
            monitor_client_load_notification_delta_th_percent: 8,
            monitor_rx_rssi_notification_threshold_dbm: -70,
            monitor_rx_rssi_notification_delta_db: 6,
            monitor_ap_idle_threshold_b: 10_000,
            monitor_ap_active_threshold_b: 100_000,
            monitor_ap_idle_stable_time_sec: 60,
            monitor_disable_initiative_arp: 0,
            slave_keep_alive_retries: 3,
        };
        assert_eq!(SonConfig::from_bytes(&config.to_bytes()).unwrap(), config);
    }

    #[test]
    fn ping_pads_with_zeros() {
        let ping = PingParams {
            total: 3,
            seq: 0,
            size: 16,
        };
        let bytes = ping.to_padded_bytes();
        assert_eq!(bytes.len(), 4 + 16);
        assert!(bytes[4..].iter().all(|&b| b == 0));
        assert_eq!(PingParams::from_bytes(&bytes).unwrap(), ping);
    }

    #[test]
    fn joined_notification_round_trip() {
        let joined = SlaveJoinedNotification {
            is_slave_reconf: 0,
            slave_version: "1.0.0".into(),
            platform: 2,
            enable_repeater_mode: 1,
            radio_identifier: MacAddr([2, 4, 6, 8, 10, 12]),
            backhaul_params: JoinedBackhaulParams {
                backhaul_is_wireless: 1,
                backhaul_channel: 36,
                scan_measurements: vec![ScanMeasurement {
                    mac: MacAddr([1; 6]),
                    channel: 36,
                    rssi: -61,
                }],
                ..Default::default()
            },
            platform_settings: PlatformSettings {
                front_ssid: "front".into(),
                back_ssid: "back".into(),
                ..Default::default()
            },
            wlan_settings: WlanSettings {
                band_enabled: 1,
                ssid: "front".into(),
                ..Default::default()
            },
            hostap: HostapParams {
                iface_name: "wlan0".into(),
                iface_mac: MacAddr([2, 4, 6, 8, 10, 14]),
                iface_is_5ghz: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let decoded = SlaveJoinedNotification::from_bytes(&joined.to_bytes()).unwrap();
        // the scan list is padded to its fixed wire length on encode
        assert_eq!(decoded.backhaul_params.scan_measurements.len(), 8);
        assert_eq!(
            decoded.backhaul_params.scan_measurements[0],
            joined.backhaul_params.scan_measurements[0]
        );
        assert_eq!(decoded.hostap, joined.hostap);
        assert_eq!(decoded.wlan_settings, joined.wlan_settings);
    }

    #[test]
    fn register_response_round_trip() {
        let response = PlatformRegisterResponse {
            valid: 1,
            platform_settings: PlatformSettings {
                local_master: 0,
                local_gw: 0,
                onboarding: 0,
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
        };
        assert_eq!(
            PlatformRegisterResponse::from_bytes(&response.to_bytes()).unwrap(),
            response
        );
    }
}
