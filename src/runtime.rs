//! Event-loop shell around the supervisor core.
//!
//! Single-threaded: socket readers feed one queue, the loop alternates
//! between advancing the state machine, checking deadlines and dispatching
//! decoded frames, with a bounded readiness wait in between. Outbound
//! frames queued by the core are flushed before the next input is taken.

use anyhow::Error;
use log::{debug, info, warn};
use tokio::sync::mpsc;

use crate::config::SlaveConfig;
use crate::link::{LinkEvent, SocketLinks};
use crate::slave::Slave;
use crate::timers::{MonotonicClock, SELECT_TIMEOUT};
use crate::workers::ApManagerEntry;

pub struct SlaveRuntime {
    slave: Slave,
    links: SocketLinks,
    rx: mpsc::Receiver<LinkEvent>,
}

impl SlaveRuntime {
    /// Must be called from within a tokio runtime: binds the slave's
    /// listening socket and spawns its accept task.
    pub fn new(config: SlaveConfig, ap_entry: ApManagerEntry) -> Result<SlaveRuntime, Error> {
        let (tx, rx) = mpsc::channel(256);
        let links = SocketLinks::new(&config, tx, ap_entry)?;
        let slave = Slave::new(config, Box::new(MonotonicClock));
        Ok(SlaveRuntime { slave, links, rx })
    }

    pub async fn run(mut self) -> Result<(), Error> {
        info!("slave runtime started");
        loop {
            if !self.slave.work(&mut self.links) {
                break;
            }
            self.links.flush().await;

            match tokio::time::timeout(SELECT_TIMEOUT, self.rx.recv()).await {
                Ok(Some(event)) => self.handle_event(event).await,
                Ok(None) => {
                    debug!("link event channel closed");
                    break;
                }
                // nothing ready; fall through to the next work cycle
                Err(_) => {}
            }
        }
        info!("slave runtime stopped");
        Ok(())
    }

    async fn handle_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::WorkerConnected {
                link,
                reader,
                writer,
            } => {
                debug!("worker connected on {link:?}");
                self.links.register(link, reader, writer);
            }
            LinkEvent::Frame { link, data } => {
                if let Err(e) = self.slave.handle_frame(&mut self.links, link, &data) {
                    warn!("dropping frame from {link:?}: {e}");
                }
                self.links.flush().await;
            }
            LinkEvent::Closed { link } => {
                self.slave.handle_link_closed(&mut self.links, link);
                self.links.flush().await;
            }
        }
    }
}
