//! Controller join over 1905.1 AP-Autoconfiguration WSC, plus the channel
//! preference query handling.

use anyhow::{bail, Error};
use log::{debug, error, info};

use crate::errors::PlatformError;
use crate::link::Links;
use crate::message::cmdu::tlv_type;
use crate::message::map_tlvs::{
    ApRadioBasicCapabilities, ChannelPreference, ChannelPreferenceOperatingClass,
    OperatingClassInfo,
};
use crate::message::payloads::{
    join_err, JoinedBackhaulParams, SlaveJoinedNotification, SlaveJoinedResponse, Versions,
};
use crate::message::vendor::{self, control_op, platform_op, Action};
use crate::message::wsc::{self, M1Identity};
use crate::message::{Cmdu, MessageType, Wire};
use crate::slave::{Slave, State};
use crate::timers::{WAIT_BEFORE_JOIN_MASTER, WAIT_FOR_JOINED_RESPONSE_TIMEOUT};

/// Maximum number of BSSs this radio announces.
const MAX_BSSS_SUPPORTED: u8 = 4;

impl Slave {
    /// Builds and sends the AP-Autoconfiguration WSC M1 CMDU carrying the
    /// SLAVE_JOINED notification, then waits for the response.
    pub(crate) fn join_master(&mut self, links: &mut dyn Links) {
        if !self.master_attached {
            error!("controller is not attached");
            self.platform_notify_error(
                links,
                PlatformError::SlaveInvalidMasterSocket,
                "Invalid master socket",
            );
            self.stop_on_failure_attempts -= 1;
            self.reset(links);
            return;
        }

        let mut cmdu = Cmdu::new(MessageType::ApAutoconfigurationWsc, 0);
        cmdu.push_tlv(self.radio_basic_capabilities().to_tlv());

        // TODO read the radio capabilities and identity from the driver
        // abstraction instead of announcing fixed values
        let m1 = wsc::build_m1(&M1Identity {
            mac: self.hostap_params.iface_mac,
            manufacturer: "Intel".into(),
            model_name: "Ubuntu".into(),
            model_number: "18.04".into(),
            serial_number: "prpl12345".into(),
            device_name: "prplMesh-agent".into(),
            rf_band: if self.hostap_params.iface_is_5ghz != 0 {
                wsc::RF_BAND_5GHZ
            } else {
                wsc::RF_BAND_2GHZ
            },
        });
        cmdu.push_tlv(crate::message::Tlv::new(tlv_type::WSC, m1));

        let joined = self.build_joined_notification();
        let mid = self.next_mid();
        cmdu.push_tlv(vendor::build_vs_tlv(
            Action::Control,
            control_op::SLAVE_JOINED_NOTIFICATION,
            mid,
            &joined.to_bytes(),
        ));

        debug!("sending SLAVE_JOINED notification");
        self.send_to_controller(links, cmdu);

        if self.wlan_settings.acs_enabled == 0 {
            self.send_platform_iface_status(links, crate::message::types::RadioStatus::ApOk, true);
        }

        let deadline = self.now() + WAIT_FOR_JOINED_RESPONSE_TIMEOUT;
        self.goto(State::WaitForJoinedResponse { deadline });
    }

    fn radio_basic_capabilities(&self) -> ApRadioBasicCapabilities {
        // placeholder capability entries until the driver reports real
        // operating classes
        let operating_classes = (0..MAX_BSSS_SUPPORTED)
            .map(|_| OperatingClassInfo {
                operating_class: 0,
                maximum_transmit_power_dbm: 1,
                statically_non_operable_channels: vec![1],
            })
            .collect();
        ApRadioBasicCapabilities {
            radio_uid: self.config.radio_identifier,
            maximum_number_of_bsss_supported: MAX_BSSS_SUPPORTED,
            operating_classes,
        }
    }

    fn build_joined_notification(&mut self) -> SlaveJoinedNotification {
        let is_slave_reconf = self.is_backhaul_reconf;
        self.is_backhaul_reconf = false;

        let mut backhaul_params = JoinedBackhaulParams {
            gw_ipv4: self.backhaul.gw_ipv4,
            gw_bridge_mac: self.backhaul.gw_bridge_mac,
            is_backhaul_manager: self.is_backhaul_manager as u8,
            backhaul_iface_type: self.backhaul.backhaul_iface_type,
            backhaul_mac: self.backhaul.backhaul_mac,
            backhaul_channel: self.backhaul.backhaul_channel,
            backhaul_bssid: self.backhaul.backhaul_bssid,
            backhaul_is_wireless: self.backhaul.backhaul_is_wireless as u8,
            backhaul_ipv4: self.backhaul.backhaul_ipv4,
            scan_measurements: self.backhaul.scan_measurements.clone(),
            ..Default::default()
        };
        if !self.config.bridge_iface.is_empty() {
            backhaul_params.bridge_mac = self.backhaul.bridge_mac;
            backhaul_params.bridge_ipv4 = self.backhaul.bridge_ipv4;
            backhaul_params.backhaul_ipv4 = self.backhaul.bridge_ipv4;
        }

        let mut hostap = self.hostap_params.clone();
        hostap.ant_gain = self.config.hostap_ant_gain;

        SlaveJoinedNotification {
            is_slave_reconf: is_slave_reconf as u8,
            slave_version: self.slave_version().to_string(),
            platform: self.config.platform,
            low_pass_filter_on: self.config.backhaul_wireless_iface_filter_low,
            enable_repeater_mode: self.config.enable_repeater_mode as u8,
            radio_identifier: self.config.radio_identifier,
            backhaul_params,
            platform_settings: self.platform_settings.clone(),
            wlan_settings: self.wlan_settings.clone(),
            hostap,
            cs_params: self.hostap_cs_params,
        }
    }

    /// Handles an inbound AP-Autoconfiguration WSC CMDU: either our own M1
    /// echoed back by the local bus, or the controller's M2 carrying the
    /// join response.
    pub(crate) fn handle_autoconfiguration_wsc(
        &mut self,
        links: &mut dyn Links,
        cmdu: &Cmdu,
    ) -> Result<(), Error> {
        // Our own M1 is published back on the local bus because the
        // controller listens on the same CMDU type. An M1 starts with the
        // radio basic capabilities TLV, an M2 with the radio identifier
        // TLV, so the first TLV type tells them apart.
        if cmdu.first_tlv_type() == Some(tlv_type::AP_RADIO_BASIC_CAPABILITIES) {
            debug!("own M1 echo, ignoring");
            return Ok(());
        }

        let Some(ruid_tlv) = cmdu
            .tlvs
            .first()
            .filter(|t| t.tlv_type == tlv_type::AP_RADIO_IDENTIFIER)
        else {
            bail!("AP-Autoconfiguration WSC without radio identifier TLV");
        };
        let ruid = crate::message::map_tlvs::parse_radio_identifier(&ruid_tlv.value)?;
        if ruid != self.config.radio_identifier {
            // addressed to a peer radio
            return Ok(());
        }

        debug!("received AP_AUTOCONFIGURATION_WSC");
        let m2_values: Vec<&[u8]> = cmdu
            .tlvs
            .iter()
            .skip(1)
            .take_while(|t| t.tlv_type == tlv_type::WSC)
            .map(|t| t.value.as_slice())
            .collect();
        if m2_values.is_empty() {
            bail!("no M2 TLVs present");
        }
        for value in &m2_values {
            let m2 = wsc::parse_m2(value)?;
            if m2.manufacturer != self.config.accepted_controller_manufacturer {
                bail!(
                    "controller manufacturer `{}` not accepted, dropping message",
                    m2.manufacturer
                );
            }
        }

        let Some(vs_tlv) = cmdu
            .tlvs
            .get(1 + m2_values.len())
            .filter(|t| t.tlv_type == tlv_type::VENDOR_SPECIFIC)
        else {
            bail!("no vendor specific TLV after M2 list");
        };
        let (header, payload) = vendor::parse_vs_tlv(&vs_tlv.value)?;
        if header.action != Action::Control
            || header.action_op != control_op::SLAVE_JOINED_RESPONSE
        {
            bail!("unexpected vendor action_op {}", header.action_op);
        }
        info!("controller join response");
        let payload = payload.to_vec();
        self.parse_join_response(links, &payload)
    }

    fn parse_join_response(&mut self, links: &mut dyn Links, payload: &[u8]) -> Result<(), Error> {
        if !matches!(self.state, State::WaitForJoinedResponse { .. }) {
            bail!("join response outside WaitForJoinedResponse");
        }
        let response = SlaveJoinedResponse::from_bytes(payload)?;

        if response.err_code == join_err::REJECT {
            debug!("join rejected by controller");
            let deadline = self.now() + WAIT_BEFORE_JOIN_MASTER;
            self.goto(State::WaitBeforeJoinMaster { deadline });
            return Ok(());
        }

        // refresh the controller's view of the VAP list
        let mid = self.next_mid();
        self.send_ap_manager(
            links,
            vendor::ap_manager_op::HOSTAP_VAPS_LIST_UPDATE_REQUEST,
            mid,
            &[],
        );

        // flush associations that happened while no controller was attached
        let pending: Vec<_> = self.pending_client_association.drain().collect();
        for (mac, params) in pending {
            debug!("flushing pending association for {mac}");
            let mid = self.next_mid();
            let cmdu = vendor::build_vs_cmdu(
                Action::Control,
                control_op::CLIENT_ASSOCIATED_NOTIFICATION,
                mid,
                &params.to_bytes(),
            );
            self.send_to_controller(links, cmdu);
        }

        self.master_version = response.master_version.clone();
        info!(
            "version (controller/slave): {}/{}",
            self.master_version,
            self.slave_version()
        );

        let versions = Versions {
            master_version: self.master_version.clone(),
            slave_version: self.slave_version().to_string(),
        }
        .to_bytes();

        if version_triplet(&self.master_version) > version_triplet(self.slave_version()) {
            info!("controller version is newer, notifying platform");
            let mid = self.next_mid();
            self.send_platform(links, platform_op::VERSION_MISMATCH_NOTIFICATION, mid, &versions);
        }

        match response.err_code {
            join_err::VERSION_MISMATCH => {
                error!(
                    "version mismatch: slave={} master={}",
                    self.slave_version(),
                    self.master_version
                );
                self.goto(State::VersionMismatch);
            }
            join_err::SSID_MISMATCH => {
                error!("SSID mismatch");
                self.goto(State::SsidMismatch);
            }
            join_err::ADVERTISE_SSID_FLAG_MISMATCH => {
                info!("advertise SSID flag mismatch");
                let flag: [u8; 1] = [if self.wlan_settings.advertise_ssid != 0 { 0 } else { 1 }];
                let mid = self.next_mid();
                self.send_platform(
                    links,
                    platform_op::ADVERTISE_SSID_FLAG_UPDATE_REQUEST,
                    mid,
                    &flag,
                );
            }
            _ => {
                let mid = self.next_mid();
                self.send_platform(
                    links,
                    platform_op::MASTER_SLAVE_VERSIONS_NOTIFICATION,
                    mid,
                    &versions,
                );
                self.son_config = response.config;
                self.log_son_config();
                self.goto(State::UpdateMonitorSonConfig);
            }
        }
        Ok(())
    }

    /// Answers a channel preference query with the fixed operating class
    /// 80 entry. Placeholder until a channel-sounding pipeline feeds real
    /// preferences.
    pub(crate) fn handle_channel_preference_query(
        &mut self,
        links: &mut dyn Links,
        cmdu: &Cmdu,
    ) -> Result<(), Error> {
        debug!("received CHANNEL_PREFERENCE_QUERY");
        let preference = ChannelPreference {
            radio_uid: self.config.radio_identifier,
            operating_classes: vec![ChannelPreferenceOperatingClass {
                operating_class: 80,
                channels: (36..50).step_by(2).collect(),
                preference: 15,
                reason_code: 0,
            }],
        };
        let mut report = Cmdu::new(MessageType::ChannelPreferenceReport, cmdu.mid);
        report.push_tlv(preference.to_tlv());
        self.send_to_controller(links, report);
        Ok(())
    }
}

/// Parses "major.minor.build"; missing or malformed components read as 0.
fn version_triplet(version: &str) -> (u32, u32, u32) {
    let mut parts = version
        .split('.')
        .map(|p| p.parse::<u32>().unwrap_or(0));
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_triplet_ordering() {
        assert!(version_triplet("1.2.3") > version_triplet("1.0.0"));
        assert!(version_triplet("1.0.1") > version_triplet("1.0.0"));
        assert_eq!(version_triplet("garbage"), (0, 0, 0));
    }
}
