//! End-to-end supervisor scenarios, driven through the fake links and the
//! scripted clock.

use std::net::Ipv4Addr;

use beerocks_slave::link::LinkId;
use beerocks_slave::message::cmdu::tlv_type;
use beerocks_slave::message::map_tlvs::ChannelPreference;
use beerocks_slave::message::payloads::{
    join_err, Beacon11kRequest, ClientAssociationParams, ClientDisconnectionParams, DlRssiReport,
    LoggingLevelParams, PingParams, RssiMeasurementRequest, Versions, WifiCredentials,
};
use beerocks_slave::message::types::{module, MacAddr, RadioStatus};
use beerocks_slave::message::vendor::{
    ap_manager_op, backhaul_op, control_op, monitor_op, platform_op, Action,
};
use beerocks_slave::message::{MessageType, Wire};
use beerocks_slave::slave::State;
use beerocks_slave::testing::{
    backhaul_connected_payload, stamp_radio_mac, Harness, AP_WORKER, MONITOR_WORKER, RADIO_UID,
};

#[test]
fn happy_path_join_reaches_operational() {
    let mut h = Harness::new();
    h.run_to_operational();

    assert_eq!(h.status_bh(), RadioStatus::BhSignalOk);
    assert_eq!(
        h.links
            .count(Action::Control, control_op::SLAVE_JOINED_NOTIFICATION),
        1
    );
    assert_eq!(
        h.links
            .count(Action::Platform, platform_op::MASTER_SLAVE_VERSIONS_NOTIFICATION),
        1
    );
    assert_eq!(
        h.links.count_to(
            AP_WORKER,
            Action::ApManager,
            ap_manager_op::HOSTAP_VAPS_LIST_UPDATE_REQUEST
        ),
        1
    );
    // the controller config was handed to the monitor
    assert_eq!(
        h.links
            .count_to(MONITOR_WORKER, Action::Monitor, monitor_op::SON_CONFIG_UPDATE),
        1
    );
}

#[test]
fn version_mismatch_parks_the_slave() {
    let mut h = Harness::new();
    h.run_to_wait_joined();
    h.links.clear_sent();

    let m2 = h.join_response_cmdu(join_err::VERSION_MISMATCH, "1.2.3");
    h.deliver(LinkId::Backhaul, &m2).unwrap();

    let notified = h
        .links
        .payloads(Action::Platform, platform_op::VERSION_MISMATCH_NOTIFICATION);
    assert_eq!(notified.len(), 1);
    let versions = Versions::from_bytes(&notified[0]).unwrap();
    assert_eq!(versions.master_version, "1.2.3");
    assert_eq!(versions.slave_version, "1.0.0");

    assert!(matches!(h.state(), State::VersionMismatch));
    assert_eq!(
        h.links.count(Action::Monitor, monitor_op::SON_CONFIG_UPDATE),
        0
    );

    // terminal: no retries, no further join attempts
    for _ in 0..3 {
        h.work();
    }
    assert!(matches!(h.state(), State::VersionMismatch));
    assert_eq!(
        h.links
            .count(Action::Control, control_op::SLAVE_JOINED_NOTIFICATION),
        0
    );
}

#[test]
fn ssid_mismatch_parks_the_slave() {
    let mut h = Harness::new();
    h.run_to_wait_joined();
    let m2 = h.join_response_cmdu(join_err::SSID_MISMATCH, "1.0.0");
    h.deliver(LinkId::Backhaul, &m2).unwrap();
    assert!(matches!(h.state(), State::SsidMismatch));
}

#[test]
fn join_reject_schedules_a_retry() {
    let mut h = Harness::new();
    h.run_to_wait_joined();
    h.links.clear_sent();

    let m2 = h.join_response_cmdu(join_err::REJECT, "1.0.0");
    h.deliver(LinkId::Backhaul, &m2).unwrap();
    assert!(matches!(h.state(), State::WaitBeforeJoinMaster { .. }));

    h.advance(std::time::Duration::from_secs(3));
    h.work(); // WaitBeforeJoinMaster -> JoinMaster
    h.work(); // JoinMaster sends the M1 again
    assert!(matches!(h.state(), State::WaitForJoinedResponse { .. }));
    assert_eq!(
        h.links
            .count(Action::Control, control_op::SLAVE_JOINED_NOTIFICATION),
        1
    );
}

#[test]
fn advertise_flag_mismatch_asks_platform_to_flip_it() {
    let mut h = Harness::new();
    h.run_to_wait_joined();
    h.links.clear_sent();

    let m2 = h.join_response_cmdu(join_err::ADVERTISE_SSID_FLAG_MISMATCH, "1.0.0");
    h.deliver(LinkId::Backhaul, &m2).unwrap();
    let requests = h.links.payloads(
        Action::Platform,
        platform_op::ADVERTISE_SSID_FLAG_UPDATE_REQUEST,
    );
    assert_eq!(requests.len(), 1);
    // advertise was on, so the platform is asked to clear the flag
    assert_eq!(requests[0], vec![0]);
}

#[test]
fn controller_ping_is_echoed_with_zero_padding() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.links.clear_sent();

    let ping = PingParams {
        total: 3,
        seq: 0,
        size: 16,
    };
    h.deliver_from_controller(control_op::CONTROLLER_PING_REQUEST, 7, &ping.to_padded_bytes())
        .unwrap();

    let sent = h.links.sent_vs();
    let responses: Vec<_> = sent
        .iter()
        .filter(|(_, hdr, _)| hdr.action_op == control_op::CONTROLLER_PING_RESPONSE)
        .collect();
    assert_eq!(responses.len(), 1);
    let (_, hdr, payload) = responses[0];
    assert_eq!(hdr.id, 7);
    assert_eq!(PingParams::from_bytes(payload).unwrap(), ping);
    assert_eq!(payload.len(), 4 + 16);
    assert!(payload[4..].iter().all(|&b| b == 0));
}

#[test]
fn agent_ping_response_triggers_the_next_ping_in_series() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.links.clear_sent();

    let response = PingParams {
        total: 3,
        seq: 0,
        size: 8,
    };
    h.deliver_from_controller(control_op::AGENT_PING_RESPONSE, 0, &response.to_padded_bytes())
        .unwrap();
    let next = h
        .links
        .payloads(Action::Control, control_op::AGENT_PING_REQUEST);
    assert_eq!(next.len(), 1);
    assert_eq!(
        PingParams::from_bytes(&next[0]).unwrap(),
        PingParams {
            total: 3,
            seq: 1,
            size: 8
        }
    );

    // the last response of the series ends it
    h.links.clear_sent();
    let last = PingParams {
        total: 3,
        seq: 2,
        size: 8,
    };
    h.deliver_from_controller(control_op::AGENT_PING_RESPONSE, 0, &last.to_padded_bytes())
        .unwrap();
    assert_eq!(
        h.links.count(Action::Control, control_op::AGENT_PING_REQUEST),
        0
    );
}

#[test]
fn rssi_measurement_request_routing_split() {
    let mut h = Harness::new();
    h.run_to_operational(); // backhaul manager over a wireless uplink
    h.links.clear_sent();

    let cross_unconnected = RssiMeasurementRequest {
        mac: MacAddr([2; 6]),
        ipv4: Ipv4Addr::UNSPECIFIED,
        channel: 36,
        cross: 1,
        ..Default::default()
    };
    h.deliver_from_controller(
        control_op::CLIENT_RX_RSSI_MEASUREMENT_REQUEST,
        1,
        &cross_unconnected.to_bytes(),
    )
    .unwrap();
    assert_eq!(
        h.links
            .count(Action::Backhaul, backhaul_op::CLIENT_RX_RSSI_MEASUREMENT_REQUEST),
        1
    );
    assert_eq!(
        h.links
            .count(Action::ApManager, ap_manager_op::CLIENT_RX_RSSI_MEASUREMENT_REQUEST),
        0
    );
    assert_eq!(
        h.links
            .count(Action::Monitor, monitor_op::CLIENT_RX_RSSI_MEASUREMENT_REQUEST),
        0
    );

    h.links.clear_sent();
    let connected = RssiMeasurementRequest {
        ipv4: "10.0.0.5".parse().unwrap(),
        ..cross_unconnected
    };
    h.deliver_from_controller(
        control_op::CLIENT_RX_RSSI_MEASUREMENT_REQUEST,
        2,
        &connected.to_bytes(),
    )
    .unwrap();
    assert_eq!(
        h.links
            .count(Action::Monitor, monitor_op::CLIENT_RX_RSSI_MEASUREMENT_REQUEST),
        1
    );
    assert_eq!(
        h.links
            .count(Action::Backhaul, backhaul_op::CLIENT_RX_RSSI_MEASUREMENT_REQUEST),
        0
    );
}

#[test]
fn own_m1_echo_is_a_no_op() {
    let mut h = Harness::new();
    h.run_to_wait_joined();

    let m1 = h
        .links
        .sent
        .iter()
        .find(|f| f.cmdu.message_type == MessageType::ApAutoconfigurationWsc)
        .expect("M1 was sent")
        .cmdu
        .clone();
    let state_before = h.state();
    h.links.clear_sent();

    h.deliver(LinkId::Backhaul, &m1).unwrap();
    assert_eq!(h.state().name(), state_before.name());
    assert!(h.links.sent.is_empty());
}

#[test]
fn foreign_radio_mac_does_not_alter_state() {
    let mut h = Harness::new();
    h.run_to_operational();
    let retries_before = h.son_config().slave_keep_alive_retries;
    h.links.clear_sent();

    let update = beerocks_slave::message::payloads::SonConfig {
        slave_keep_alive_retries: 9,
        ..Default::default()
    };
    let mut cmdu = beerocks_slave::message::vendor::build_vs_cmdu(
        Action::Control,
        control_op::SON_CONFIG_UPDATE,
        0,
        &update.to_bytes(),
    );
    stamp_radio_mac(&mut cmdu, MacAddr([0xde, 0xad, 0xbe, 0xef, 0, 1]));
    h.deliver(LinkId::Backhaul, &cmdu).unwrap();

    assert_eq!(h.son_config().slave_keep_alive_retries, retries_before);
    assert!(matches!(h.state(), State::Operational));
    assert!(h.links.sent.is_empty());
}

#[test]
fn foreign_radio_uid_ignores_the_m2() {
    let mut h = Harness::new();
    h.run_to_wait_joined();

    let mut m2 = h.join_response_cmdu(join_err::OK, "1.0.0");
    m2.tlvs[0] =
        beerocks_slave::message::map_tlvs::radio_identifier_tlv(MacAddr([9, 9, 9, 9, 9, 9]));
    h.deliver(LinkId::Backhaul, &m2).unwrap();
    assert!(matches!(h.state(), State::WaitForJoinedResponse { .. }));
}

#[test]
fn foreign_manufacturer_m2_is_rejected() {
    let mut h = Harness::new();
    h.run_to_wait_joined();

    let mut m2 = h.join_response_cmdu(join_err::OK, "1.0.0");
    m2.tlvs[1] = beerocks_slave::message::Tlv::new(
        tlv_type::WSC,
        beerocks_slave::message::wsc::build_m2("OtherVendor"),
    );
    // a protocol error: the frame is dropped and the wait continues
    assert!(h.deliver(LinkId::Backhaul, &m2).is_err());
    assert!(matches!(h.state(), State::WaitForJoinedResponse { .. }));
}

#[test]
fn pending_association_is_flushed_exactly_once_on_join() {
    let mut h = Harness::new();
    h.run_to_wait_backhaul_connected();

    // two clients associate while no controller is attached
    let client_a = ClientAssociationParams {
        mac: MacAddr([0x0a; 6]),
        vap_id: 0,
        capabilities: 7,
    };
    let client_b = ClientAssociationParams {
        mac: MacAddr([0x0b; 6]),
        vap_id: 0,
        capabilities: 7,
    };
    for client in [&client_a, &client_b] {
        h.deliver_vendor(
            AP_WORKER,
            Action::ApManager,
            ap_manager_op::CLIENT_ASSOCIATED_NOTIFICATION,
            0,
            &client.to_bytes(),
        )
        .unwrap();
    }
    assert_eq!(h.pending_associations(), 2);
    assert_eq!(
        h.links
            .count(Action::Control, control_op::CLIENT_ASSOCIATED_NOTIFICATION),
        0
    );

    // one disconnects before any controller shows up: its entry is dropped
    let gone = ClientDisconnectionParams {
        mac: client_b.mac,
        vap_id: 0,
        reason: 1,
    };
    h.deliver_vendor(
        AP_WORKER,
        Action::ApManager,
        ap_manager_op::CLIENT_DISCONNECTED_NOTIFICATION,
        0,
        &gone.to_bytes(),
    )
    .unwrap();
    assert_eq!(h.pending_associations(), 1);

    // join: the held association goes out exactly once
    h.deliver_vendor(
        LinkId::Backhaul,
        Action::Backhaul,
        backhaul_op::CONNECTED_NOTIFICATION,
        0,
        &backhaul_connected_payload(1, 1),
    )
    .unwrap();
    h.work();
    let m2 = h.join_response_cmdu(join_err::OK, "1.0.0");
    h.deliver(LinkId::Backhaul, &m2).unwrap();

    let flushed = h
        .links
        .payloads(Action::Control, control_op::CLIENT_ASSOCIATED_NOTIFICATION);
    assert_eq!(flushed.len(), 1);
    assert_eq!(
        ClientAssociationParams::from_bytes(&flushed[0]).unwrap().mac,
        client_a.mac
    );
    assert_eq!(h.pending_associations(), 0);
}

#[test]
fn relay_rules_are_copy_faithful() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.links.clear_sent();

    // controller -> AP worker
    let payload: Vec<u8> = (0..32).collect();
    h.deliver_from_controller(control_op::CLIENT_DISALLOW_REQUEST, 21, &payload)
        .unwrap();
    let forwarded = h.links.sent_vs();
    let (_, hdr, body) = forwarded
        .iter()
        .find(|(_, hdr, _)| hdr.action_op == ap_manager_op::CLIENT_DISALLOW_REQUEST)
        .expect("forwarded to ap manager");
    assert_eq!(hdr.action, Action::ApManager);
    assert_eq!(hdr.id, 21);
    assert_eq!(*body, payload);

    // monitor -> controller
    h.links.clear_sent();
    let stats: Vec<u8> = (0..64).rev().collect();
    h.deliver_vendor(
        MONITOR_WORKER,
        Action::Monitor,
        monitor_op::HOSTAP_STATS_MEASUREMENT_RESPONSE,
        33,
        &stats,
    )
    .unwrap();
    let relayed = h
        .links
        .payloads(Action::Control, control_op::HOSTAP_STATS_MEASUREMENT_RESPONSE);
    assert_eq!(relayed.len(), 1);
    assert_eq!(relayed[0], stats);
}

#[test]
fn dl_rssi_report_is_relayed_and_updates_status() {
    let mut h = Harness::new();
    h.run_to_operational();
    assert_eq!(h.status_bh(), RadioStatus::BhSignalOk);
    h.links.clear_sent();

    let report = DlRssiReport { rssi: -82 };
    h.deliver_vendor(
        LinkId::Backhaul,
        Action::Backhaul,
        backhaul_op::DL_RSSI_REPORT_NOTIFICATION,
        0,
        &report.to_bytes(),
    )
    .unwrap();

    assert_eq!(
        h.links
            .count(Action::Control, control_op::BACKHAUL_DL_RSSI_REPORT_NOTIFICATION),
        1
    );
    assert_eq!(h.status_bh(), RadioStatus::BhSignalTooLow);

    // a reading within the hysteresis band is relayed but changes nothing
    h.deliver_vendor(
        LinkId::Backhaul,
        Action::Backhaul,
        backhaul_op::DL_RSSI_REPORT_NOTIFICATION,
        0,
        &DlRssiReport { rssi: -80 }.to_bytes(),
    )
    .unwrap();
    assert_eq!(h.status_bh(), RadioStatus::BhSignalTooLow);
}

#[test]
fn channel_preference_query_gets_the_stub_report() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.links.clear_sent();

    let query = beerocks_slave::message::Cmdu::new(MessageType::ChannelPreferenceQuery, 42);
    h.deliver(LinkId::Backhaul, &query).unwrap();

    let report = h
        .links
        .sent
        .iter()
        .find(|f| f.cmdu.message_type == MessageType::ChannelPreferenceReport)
        .expect("report sent");
    assert_eq!(report.cmdu.mid, 42);

    let tlv = &report.cmdu.tlvs[0];
    assert_eq!(tlv.tlv_type, tlv_type::CHANNEL_PREFERENCE);
    let preference = ChannelPreference::from_tlv_value(&tlv.value).unwrap();
    assert_eq!(preference.radio_uid, RADIO_UID);
    assert_eq!(preference.operating_classes.len(), 1);
    let entry = &preference.operating_classes[0];
    assert_eq!(entry.operating_class, 80);
    assert_eq!(entry.channels, vec![36, 38, 40, 42, 44, 46, 48]);
    assert_eq!(entry.preference, 15);
    assert_eq!(entry.reason_code, 0);
}

#[test]
fn beacon_request_substitutes_the_front_ssid() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.links.clear_sent();

    let request = Beacon11kRequest {
        mac: MacAddr([1; 6]),
        bssid: MacAddr([2; 6]),
        channel: 36,
        use_optional_ssid: 1,
        ssid: String::new(),
    };
    h.deliver_from_controller(control_op::CLIENT_BEACON_11K_REQUEST, 5, &request.to_bytes())
        .unwrap();

    let forwarded = h
        .links
        .payloads(Action::Monitor, monitor_op::CLIENT_BEACON_11K_REQUEST);
    assert_eq!(forwarded.len(), 1);
    let decoded = Beacon11kRequest::from_bytes(&forwarded[0]).unwrap();
    assert_eq!(decoded.ssid, "mesh-front");
}

#[test]
fn logging_level_broadcast_fans_out() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.links.clear_sent();

    let change = LoggingLevelParams {
        module_name: module::ALL,
        log_level: 3,
        enable: 1,
    };
    h.deliver_from_controller(control_op::CHANGE_MODULE_LOGGING_LEVEL, 0, &change.to_bytes())
        .unwrap();
    assert_eq!(
        h.links
            .count(Action::Monitor, monitor_op::CHANGE_MODULE_LOGGING_LEVEL),
        1
    );
    assert_eq!(
        h.links
            .count(Action::Platform, platform_op::CHANGE_MODULE_LOGGING_LEVEL),
        1
    );
}

#[test]
fn credential_rollover_runs_through_the_platform() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.links.clear_sent();

    let staged = WifiCredentials {
        ssid: "new-ssid".into(),
        pass: "new-pass".into(),
        sec: 4,
    };
    h.deliver_from_controller(
        control_op::WIFI_CREDENTIALS_UPDATE_PREPARE_REQUEST,
        11,
        &staged.to_bytes(),
    )
    .unwrap();
    assert_eq!(
        h.links
            .count(Action::Control, control_op::WIFI_CREDENTIALS_UPDATE_PREPARE_RESPONSE),
        1
    );

    h.deliver_from_controller(control_op::WIFI_CREDENTIALS_UPDATE_PRE_COMMIT_REQUEST, 12, &[])
        .unwrap();
    let to_platform = h
        .links
        .payloads(Action::Platform, platform_op::BEEROCKS_CREDENTIALS_UPDATE_REQUEST);
    assert_eq!(to_platform.len(), 1);
    assert_eq!(WifiCredentials::from_bytes(&to_platform[0]).unwrap(), staged);
    assert_eq!(
        h.links
            .count(Action::Control, control_op::WIFI_CREDENTIALS_UPDATE_PRE_COMMIT_RESPONSE),
        1
    );

    h.deliver_from_controller(control_op::WIFI_CREDENTIALS_UPDATE_COMMIT_REQUEST, 13, &[])
        .unwrap();
    assert!(matches!(
        h.state(),
        State::WaitForPlatformCredentialsUpdateResponse { .. }
    ));

    // the platform confirms the DB change; the next work cycle resets into
    // the delayed re-init
    h.deliver_vendor(
        LinkId::Platform,
        Action::Platform,
        platform_op::BEEROCKS_CREDENTIALS_UPDATE_RESPONSE,
        13,
        &[1],
    )
    .unwrap();
    h.work();
    assert!(matches!(h.state(), State::WaitBeforeInit { .. }));
}

#[test]
fn joined_response_timeout_retries_the_join() {
    let mut h = Harness::new();
    h.run_to_wait_joined();
    h.links.clear_sent();

    h.advance(std::time::Duration::from_secs(20));
    h.feed_worker_heartbeats();
    h.work(); // timeout -> JoinMaster
    h.work(); // JoinMaster resends the M1
    assert!(matches!(h.state(), State::WaitForJoinedResponse { .. }));
    assert_eq!(
        h.links
            .count(Action::Control, control_op::SLAVE_JOINED_NOTIFICATION),
        1
    );
}
