//! Lifecycles of the two radio workers owned by the supervisor.
//!
//! The monitor runs as a separate process spawned from the
//! `beerocks_monitor` binary. The AP manager runs as an in-process task;
//! its implementation lives outside this crate and is handed in as an
//! entry function. Both expose themselves to the supervisor only through
//! the slave's listening socket.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use anyhow::{Context, Error};
use log::{debug, error, warn};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::message::types::MacAddr;

pub const BEEROCKS_MONITOR: &str = "beerocks_monitor";
pub const BEEROCKS_BIN_PATH: &str = "/opt/beerocks/bin";

/// Configuration handed to the AP-manager task on start.
#[derive(Clone, Debug)]
pub struct ApManagerConfig {
    pub hostap_iface: String,
    pub acs_enabled: bool,
    pub iface_filter_low: u8,
    pub backhaul_vaps_bssid: [MacAddr; 3],
    /// Socket the worker connects back on.
    pub slave_uds: PathBuf,
}

/// Entry point of the AP-manager worker task. The worker implementation is
/// provided by the integrating build; only its lifecycle is owned here.
pub type ApManagerEntry = fn(ApManagerConfig) -> Pin<Box<dyn Future<Output = ()> + Send>>;

/// Placeholder entry for builds that ship without an AP-manager worker.
/// The supervisor will notice the missing init-done notification and run
/// its normal failure path.
pub fn unlinked_ap_manager(config: ApManagerConfig) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        error!(
            "no AP manager worker linked into this build (iface {})",
            config.hostap_iface
        );
    })
}

/// Running AP-manager task.
pub struct ApManagerTask {
    handle: JoinHandle<()>,
}

impl ApManagerTask {
    pub fn start(entry: ApManagerEntry, config: ApManagerConfig) -> ApManagerTask {
        debug!("starting ap manager for iface {}", config.hostap_iface);
        ApManagerTask {
            handle: tokio::spawn(entry(config)),
        }
    }

    pub fn stop(self) {
        self.handle.abort();
        debug!("ap manager stopped");
    }
}

/// Monitor worker child process.
#[derive(Default)]
pub struct MonitorProcess {
    child: Option<Child>,
}

impl MonitorProcess {
    /// Spawns `beerocks_monitor -i <iface>`, preferring a binary next to
    /// the current working directory over the installed one.
    pub fn start(&mut self, iface: &str) -> Result<(), Error> {
        self.stop();
        let local = Path::new(".").join(BEEROCKS_MONITOR);
        let binary = if local.exists() {
            local
        } else {
            Path::new(BEEROCKS_BIN_PATH).join(BEEROCKS_MONITOR)
        };
        debug!("starting monitor: {} -i {iface}", binary.display());
        let child = Command::new(&binary)
            .arg("-i")
            .arg(iface)
            .spawn()
            .with_context(|| format!("spawning {}", binary.display()))?;
        self.child = Some(child);
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.start_kill() {
                warn!("failed to kill monitor: {e}");
            }
            debug!("monitor stopped");
        }
    }
}

impl Drop for MonitorProcess {
    fn drop(&mut self) {
        self.stop();
    }
}
