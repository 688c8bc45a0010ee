//! Per-radio slave configuration, loaded once at startup from a RON file
//! and never mutated afterwards.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Error};
use serde::{Deserialize, Serialize};

use crate::message::types::{IfaceKind, MacAddr};

pub const BEEROCKS_VERSION: &str = "1.0.0";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SlaveConfig {
    /// Radio (hostap) interface this slave supervises.
    pub hostap_iface: String,
    pub hostap_iface_type: IfaceKind,
    /// Antenna gain reported to the controller on join.
    pub hostap_ant_gain: u8,
    pub backhaul_wire_iface: String,
    pub backhaul_wire_iface_type: IfaceKind,
    pub backhaul_wireless_iface: String,
    pub backhaul_wireless_iface_type: IfaceKind,
    pub backhaul_wireless_iface_filter_low: u8,
    pub backhaul_preferred_bssid: MacAddr,
    pub bridge_iface: String,
    /// 48-bit radio unique identifier used in the WSC join.
    pub radio_identifier: MacAddr,
    /// Platform tag forwarded verbatim to the controller.
    pub platform: u8,
    /// Directory holding the local UDS sockets.
    pub temp_path: PathBuf,
    pub stop_on_failure_attempts: i32,
    pub enable_keep_alive: bool,
    pub enable_bpl_iface_status_notifications: bool,
    pub enable_credentials_automatic_unify: bool,
    pub enable_repeater_mode: bool,
    /// Only M2s declaring this manufacturer are accepted during the join.
    pub accepted_controller_manufacturer: String,
}

impl Default for SlaveConfig {
    fn default() -> Self {
        SlaveConfig {
            hostap_iface: "wlan0".into(),
            hostap_iface_type: IfaceKind::Wifi,
            hostap_ant_gain: 0,
            backhaul_wire_iface: "eth0_1".into(),
            backhaul_wire_iface_type: IfaceKind::Ethernet,
            backhaul_wireless_iface: "wlan2".into(),
            backhaul_wireless_iface_type: IfaceKind::Wifi,
            backhaul_wireless_iface_filter_low: 0,
            backhaul_preferred_bssid: MacAddr::ZERO,
            bridge_iface: "br-lan".into(),
            radio_identifier: MacAddr::ZERO,
            platform: 0,
            temp_path: PathBuf::from("/tmp/beerocks"),
            stop_on_failure_attempts: 3,
            enable_keep_alive: true,
            enable_bpl_iface_status_notifications: true,
            enable_credentials_automatic_unify: true,
            enable_repeater_mode: false,
            accepted_controller_manufacturer: "Intel".into(),
        }
    }
}

impl SlaveConfig {
    pub fn load(path: &Path) -> Result<SlaveConfig, Error> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: SlaveConfig =
            ron::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.hostap_iface.is_empty() {
            bail!("hostap_iface must not be empty");
        }
        if self.hostap_iface_type == IfaceKind::Unsupported {
            bail!(
                "hostap_iface_type `{:?}` unsupported",
                self.hostap_iface_type
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load() {
        let dir = std::env::temp_dir().join("beerocks-slave-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("slave.ron");
        std::fs::write(
            &path,
            r#"(
    hostap_iface: "wlan0",
    hostap_iface_type: Wifi,
    hostap_ant_gain: 4,
    backhaul_wire_iface: "eth0_1",
    backhaul_wire_iface_type: Ethernet,
    backhaul_wireless_iface: "wlan2",
    backhaul_wireless_iface_type: Wifi,
    backhaul_wireless_iface_filter_low: 0,
    backhaul_preferred_bssid: "00:00:00:00:00:00",
    bridge_iface: "br-lan",
    radio_identifier: "00:50:43:24:19:30",
    platform: 2,
    temp_path: "/tmp/beerocks",
    stop_on_failure_attempts: 3,
    enable_keep_alive: true,
    enable_bpl_iface_status_notifications: true,
    enable_credentials_automatic_unify: true,
    enable_repeater_mode: false,
    accepted_controller_manufacturer: "Intel",
)"#,
        )
        .unwrap();

        let config = SlaveConfig::load(&path).unwrap();
        assert_eq!(config.hostap_iface, "wlan0");
        assert_eq!(config.hostap_ant_gain, 4);
        assert_eq!(
            config.radio_identifier,
            "00:50:43:24:19:30".parse().unwrap()
        );
        assert_eq!(config.platform, 2);
        assert!(config.enable_keep_alive);
    }

    #[test]
    fn unsupported_radio_kind_is_rejected() {
        let config = SlaveConfig {
            hostap_iface_type: IfaceKind::Unsupported,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
