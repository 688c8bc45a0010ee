use std::time::Duration;

use crate::errors::PlatformError;
use crate::link::LinkId;
use crate::message::payloads::{PlatformErrorNotification, SonConfig};
use crate::message::vendor::{control_op, platform_op, Action};
use crate::message::Wire;
use crate::slave::State;
use crate::testing::{Harness, AP_WORKER, MONITOR_WORKER};
use crate::timers::{
    AP_MANAGER_HEARTBEAT_RETRIES, AP_MANAGER_HEARTBEAT_TIMEOUT, IFACE_ACTION_TIMEOUT,
    KEEP_ALIVE_INTERVAL,
};

fn platform_errors(h: &Harness) -> Vec<u32> {
    h.links
        .payloads(Action::Platform, platform_op::ERROR_NOTIFICATION)
        .iter()
        .map(|p| PlatformErrorNotification::from_bytes(p).unwrap().code)
        .collect()
}

#[test]
fn fsm_pauses_while_iface_actions_are_pending() {
    let mut h = Harness::new();
    h.run_to_wait_joined();

    // queue an interface action so the FSM has to pause
    h.links.clear_sent();
    let iface = h.slave.config.hostap_iface.clone();
    h.slave
        .set_wifi_iface_state(&mut h.links, &iface, crate::message::types::IfaceOperation::Restart);
    assert_eq!(h.pending_iface_actions(), 1);

    let state_before = h.state();
    for _ in 0..5 {
        h.work();
        assert_eq!(h.state().name(), state_before.name());
    }
}

#[test]
fn iface_action_timeout_reports_and_resets() {
    let mut h = Harness::new();
    h.run_to_wait_joined();
    let iface = h.slave.config.hostap_iface.clone();
    h.slave
        .set_wifi_iface_state(&mut h.links, &iface, crate::message::types::IfaceOperation::Enable);
    h.links.clear_sent();

    h.advance(IFACE_ACTION_TIMEOUT + Duration::from_secs(1));
    h.work();

    assert_eq!(
        platform_errors(&h),
        vec![PlatformError::SlaveTimeoutIfaceDisableRequest.to_wire()]
    );
    assert!(matches!(h.state(), State::Init));
}

#[test]
fn keep_alive_disabled_when_retry_budget_is_zero() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.slave.son_config = SonConfig {
        slave_keep_alive_retries: 0,
        ..Default::default()
    };
    h.links.clear_sent();

    h.advance(KEEP_ALIVE_INTERVAL * 4);
    h.work();
    assert_eq!(h.links.count(Action::Control, control_op::AGENT_PING_REQUEST), 0);
    assert!(matches!(h.state(), State::Operational));
}

#[test]
fn keep_alive_pings_then_resets_on_exhaustion() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.links.clear_sent();

    // three pings, one per interval
    for expected in 1..=3 {
        h.advance(KEEP_ALIVE_INTERVAL + Duration::from_secs(1));
        h.feed_worker_heartbeats();
        h.work();
        assert_eq!(
            h.links.count(Action::Control, control_op::AGENT_PING_REQUEST),
            expected
        );
    }

    // the fourth silent interval exceeds the budget
    h.advance(KEEP_ALIVE_INTERVAL + Duration::from_secs(1));
    h.feed_worker_heartbeats();
    h.work();
    assert!(platform_errors(&h).contains(&PlatformError::MasterKeepAliveTimeout.to_wire()));
    assert!(matches!(h.state(), State::Init));
}

#[test]
fn controller_frame_resets_keep_alive_retries() {
    let mut h = Harness::new();
    h.run_to_operational();

    h.advance(KEEP_ALIVE_INTERVAL + Duration::from_secs(1));
    h.work();
    assert_eq!(h.keep_alive_retries(), 1);

    h.deliver_from_controller(control_op::SON_CONFIG_UPDATE, 0, &SonConfig::default().to_bytes())
        .unwrap();
    assert_eq!(h.keep_alive_retries(), 0);
}

#[test]
fn worker_heartbeat_loss_resets() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.links.clear_sent();

    for _ in 0..AP_MANAGER_HEARTBEAT_RETRIES {
        h.advance(AP_MANAGER_HEARTBEAT_TIMEOUT + Duration::from_secs(1));
        h.work();
    }
    assert!(matches!(h.state(), State::Init));
}

#[test]
fn heartbeat_notification_refreshes_liveness() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.slave.son_config.slave_keep_alive_retries = 0;

    for _ in 0..6 {
        h.advance(AP_MANAGER_HEARTBEAT_TIMEOUT - Duration::from_secs(1));
        h.deliver_vendor(
            AP_WORKER,
            Action::ApManager,
            crate::message::vendor::ap_manager_op::HEARTBEAT_NOTIFICATION,
            0,
            &[],
        )
        .unwrap();
        h.deliver_vendor(
            MONITOR_WORKER,
            Action::Monitor,
            crate::message::vendor::monitor_op::HEARTBEAT_NOTIFICATION,
            0,
            &[],
        )
        .unwrap();
        h.work();
        assert!(matches!(h.state(), State::Operational));
    }
}

#[test]
fn backhaul_drop_is_fatal() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.links.clear_sent();

    h.close_link(LinkId::Backhaul);
    assert!(platform_errors(&h)
        .contains(&PlatformError::SlaveBackhaulManagerDisconnected.to_wire()));
    assert!(h.slave.should_stop());
}

#[test]
fn platform_drop_is_fatal() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.close_link(LinkId::Platform);
    assert!(h.slave.should_stop());
}

#[test]
fn failure_budget_exhaustion_latches_stopped() {
    let mut config = crate::testing::test_config();
    config.stop_on_failure_attempts = 1;
    let mut h = Harness::with_config(config);
    h.run_to_operational();
    h.links.clear_sent();

    h.close_link(AP_WORKER);

    let errors = platform_errors(&h);
    assert_eq!(errors, vec![PlatformError::ApManagerDisconnected.to_wire()]);
    assert!(matches!(h.state(), State::Stopped));

    // latched: further work cycles stay parked and stay silent
    h.links.clear_sent();
    for _ in 0..3 {
        h.work();
    }
    assert!(matches!(h.state(), State::Stopped));
    assert!(h.links.sent.is_empty());
}

#[test]
fn worker_drop_during_conf_change_is_absorbed() {
    let mut h = Harness::new();
    h.run_to_operational();

    // the platform starts a configuration update window
    h.deliver_vendor(
        LinkId::Platform,
        Action::Platform,
        platform_op::WIFI_CONFIGURATION_UPDATE_REQUEST,
        0,
        &[1],
    )
    .unwrap();
    assert!(matches!(
        h.state(),
        State::WaitForWifiConfigurationUpdateComplete { .. }
    ));

    h.links.clear_sent();
    h.close_link(AP_WORKER);
    assert!(h.slave.detach_on_conf_change);
    assert!(matches!(
        h.state(),
        State::WaitForWifiConfigurationUpdateComplete { .. }
    ));
    assert!(platform_errors(&h).is_empty());

    // the completion then triggers the deferred reset
    h.deliver_vendor(
        LinkId::Platform,
        Action::Platform,
        platform_op::WIFI_CONFIGURATION_UPDATE_REQUEST,
        0,
        &[0],
    )
    .unwrap();
    assert!(matches!(h.state(), State::Init));
}

#[test]
fn reset_after_credential_change_waits_before_init() {
    let mut h = Harness::new();
    h.run_to_operational();
    h.slave.is_credentials_changed_on_db = true;
    h.slave.reset(&mut h.links);
    assert!(matches!(h.state(), State::WaitBeforeInit { .. }));

    // the delay must elapse before Init
    h.work();
    assert!(matches!(h.state(), State::WaitBeforeInit { .. }));
    h.advance(crate::timers::SLAVE_INIT_DELAY + Duration::from_secs(1));
    h.work();
    assert!(matches!(h.state(), State::Init));
    assert!(!h.slave.is_credentials_changed_on_db);
}

#[test]
fn onboarding_parks_the_fsm() {
    let mut h = Harness::new();
    h.work();
    h.work();
    h.deliver_vendor(
        LinkId::Platform,
        Action::Platform,
        platform_op::SON_SLAVE_REGISTER_RESPONSE,
        0,
        &crate::testing::platform_register_ok(0, 0, 1),
    )
    .unwrap();
    h.work();
    h.deliver_vendor(
        LinkId::Backhaul,
        Action::Backhaul,
        crate::message::vendor::backhaul_op::REGISTER_RESPONSE,
        0,
        &[],
    )
    .unwrap();
    h.work();
    assert!(matches!(h.state(), State::Onboarding));

    h.links.clear_sent();
    for _ in 0..5 {
        h.work();
        assert!(matches!(h.state(), State::Onboarding));
    }
    // no join attempt, no backhaul enable while onboarding
    assert_eq!(
        h.links
            .count(Action::Backhaul, crate::message::vendor::backhaul_op::ENABLE),
        0
    );
    assert_eq!(
        h.links
            .count(Action::Control, control_op::SLAVE_JOINED_NOTIFICATION),
        0
    );
}

#[test]
fn invalid_platform_configuration_resets() {
    let mut h = Harness::new();
    h.work();
    h.work();
    let mut response = crate::testing::platform_register_ok(0, 0, 0);
    response[0] = 0; // valid flag
    h.links.clear_sent();
    h.deliver_vendor(
        LinkId::Platform,
        Action::Platform,
        platform_op::SON_SLAVE_REGISTER_RESPONSE,
        0,
        &response,
    )
    .unwrap();
    assert!(platform_errors(&h)
        .contains(&PlatformError::ConfigPlatformReportedInvalidConfiguration.to_wire()));
    assert!(matches!(h.state(), State::Init));
}
