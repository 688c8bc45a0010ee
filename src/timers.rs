//! Monotonic time injection and the timeout constants of the supervisor.
//!
//! All deadlines and heartbeats run on an injected clock so the state
//! machine can be driven deterministically in tests.

use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

/// Bounded readiness wait of the event loop.
pub const SELECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Keep-alive ping cadence towards the controller.
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(10);

/// Delay before re-entering `Init` after a credential change or backhaul
/// disconnect.
pub const SLAVE_INIT_DELAY: Duration = Duration::from_secs(4);

/// Budget for a pending interface action before it is declared dead.
pub const IFACE_ACTION_TIMEOUT: Duration = Duration::from_secs(15);

pub const MONITOR_HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(10);
pub const MONITOR_HEARTBEAT_RETRIES: u32 = 3;
pub const AP_MANAGER_HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(10);
pub const AP_MANAGER_HEARTBEAT_RETRIES: u32 = 3;

pub const CONNECT_PLATFORM_RETRY_COUNT_MAX: u32 = 5;
pub const CONNECT_PLATFORM_RETRY_SLEEP: Duration = Duration::from_millis(1000);

pub const WAIT_FOR_PLATFORM_REGISTER_RESPONSE_TIMEOUT: Duration = Duration::from_secs(600);
pub const WAIT_FOR_WLAN_READY_STATUS_RESPONSE_TIMEOUT: Duration = Duration::from_secs(600);
pub const WAIT_FOR_UNIFY_WIFI_CREDENTIALS_RESPONSE_TIMEOUT: Duration = Duration::from_secs(60);
pub const WAIT_FOR_JOINED_RESPONSE_TIMEOUT: Duration = Duration::from_secs(15);
pub const WAIT_BEFORE_JOIN_MASTER: Duration = Duration::from_secs(2);
pub const WAIT_BEFORE_SEND_BH_ENABLE: Duration = Duration::from_secs(5);
pub const IRE_MAX_WIRELESS_RECONNECTION_TIME: Duration = Duration::from_millis(10_000);
pub const WIFI_CONFIGURATION_UPDATE_COMPLETE_TIMEOUT: Duration = Duration::from_secs(60);
pub const WAIT_AFTER_WIFI_CONFIG_UPDATE: Duration = Duration::from_secs(5);
pub const CREDENTIALS_UPDATE_RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Monotonic clock; reads as elapsed time since an arbitrary process-local
/// epoch.
pub trait Clock {
    fn now(&self) -> Duration;

    /// The single blocking suspension point of the supervisor, used only
    /// between platform-manager connection attempts.
    fn sleep(&self, d: Duration);
}

static PROCESS_EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Wall clock of the real process.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        PROCESS_EPOCH.elapsed()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Test clock that only moves when told to. Clones share the same
/// timeline, so a test can keep a handle while the supervisor owns
/// another.
#[derive(Clone, Debug, Default)]
pub struct FakeClock {
    now: std::rc::Rc<std::cell::Cell<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        FakeClock {
            now: std::rc::Rc::new(std::cell::Cell::new(Duration::from_secs(1))),
        }
    }

    pub fn advance(&self, d: Duration) {
        self.now.set(self.now.get() + d);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn fake_clock_advances_on_sleep() {
        let clock = FakeClock::new();
        let start = clock.now();
        clock.sleep(Duration::from_secs(3));
        assert_eq!(clock.now() - start, Duration::from_secs(3));
    }
}
