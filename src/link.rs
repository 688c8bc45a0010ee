//! Local links to the workers and the backhaul/platform managers.
//!
//! Every peer talks length-prefixed CMDU frames over a unix stream socket.
//! The frame header carries the 1905.1 bridge addressing used when the
//! backhaul manager forwards a frame onto the mesh; local traffic leaves
//! both MACs zeroed.
//!
//! The supervisor core stays synchronous: sends are buffered here and the
//! event-loop shell flushes them before waiting for the next input, which
//! keeps the translate-before-next-input ordering guarantee.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::PathBuf;

use anyhow::Error;
use log::{debug, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::SlaveConfig;
use crate::message::types::MacAddr;
use crate::message::Cmdu;
use crate::workers::{ApManagerConfig, ApManagerEntry, ApManagerTask, MonitorProcess};

pub const BEEROCKS_SLAVE_UDS: &str = "BEEROCKS_SLAVE_UDS";
pub const BEEROCKS_BACKHAUL_MGR_UDS: &str = "BEEROCKS_BACKHAUL_MGR_UDS";
pub const BEEROCKS_PLAT_MGR_UDS: &str = "BEEROCKS_PLAT_MGR_UDS";

/// length prefix + destination bridge mac + source bridge mac
pub const UDS_HEADER_LEN: usize = 4 + 6 + 6;
pub const MAX_FRAME_LEN: usize = 8192;

/// Identifies one connected peer socket. Worker connections are accepted
/// on the slave's listening socket and get a running id; whether such a
/// connection is the AP manager or the monitor is decided by the first
/// message it sends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkId {
    Platform,
    Backhaul,
    Worker(u64),
}

/// Events pushed by the socket readers into the event loop.
pub enum LinkEvent {
    WorkerConnected {
        link: LinkId,
        reader: OwnedReadHalf,
        writer: OwnedWriteHalf,
    },
    Frame {
        link: LinkId,
        data: Vec<u8>,
    },
    Closed {
        link: LinkId,
    },
}

/// Seam between the supervisor core and the outside world: sockets and
/// worker lifecycles. Tests drive the core through a recording fake.
pub trait Links {
    fn connect_platform(&mut self) -> io::Result<()>;
    fn connect_backhaul(&mut self) -> io::Result<()>;
    fn close_platform(&mut self);
    fn close_backhaul(&mut self);
    fn close_worker(&mut self, link: LinkId);

    /// Queues a CMDU towards a local peer.
    fn send(&mut self, link: LinkId, cmdu: &Cmdu) -> io::Result<()>;

    /// Queues a CMDU towards the controller over the backhaul link, with
    /// 1905.1 bridge addressing.
    fn send_addressed(
        &mut self,
        link: LinkId,
        cmdu: &Cmdu,
        dst_mac: MacAddr,
        src_mac: MacAddr,
    ) -> io::Result<()>;

    fn start_ap_manager(&mut self, config: ApManagerConfig) -> Result<(), Error>;
    fn stop_ap_manager(&mut self);
    fn start_monitor(&mut self, iface: &str) -> Result<(), Error>;
    fn stop_monitor(&mut self, iface: &str);
}

pub fn encode_frame(dst_mac: MacAddr, src_mac: MacAddr, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(UDS_HEADER_LEN + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&dst_mac.0);
    out.extend_from_slice(&src_mac.0);
    out.extend_from_slice(payload);
    out
}

pub async fn read_frame(reader: &mut OwnedReadHalf) -> io::Result<Vec<u8>> {
    let mut header = [0u8; UDS_HEADER_LEN];
    reader.read_exact(&mut header).await?;
    let len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
    if len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("oversized frame: {len} bytes"),
        ));
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

fn spawn_reader(
    link: LinkId,
    mut reader: OwnedReadHalf,
    tx: mpsc::Sender<LinkEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match read_frame(&mut reader).await {
                Ok(data) => {
                    if tx.send(LinkEvent::Frame { link, data }).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    debug!("link {link:?} read failed: {e}");
                    let _ = tx.send(LinkEvent::Closed { link }).await;
                    return;
                }
            }
        }
    })
}

/// Production `Links` implementation over unix sockets.
pub struct SocketLinks {
    platform_uds: PathBuf,
    backhaul_uds: PathBuf,
    tx: mpsc::Sender<LinkEvent>,
    writers: HashMap<LinkId, OwnedWriteHalf>,
    readers: HashMap<LinkId, JoinHandle<()>>,
    outbox: VecDeque<(LinkId, Vec<u8>)>,
    accept_task: JoinHandle<()>,
    monitor: MonitorProcess,
    ap_manager: Option<ApManagerTask>,
    ap_entry: ApManagerEntry,
}

impl SocketLinks {
    pub fn new(
        config: &SlaveConfig,
        tx: mpsc::Sender<LinkEvent>,
        ap_entry: ApManagerEntry,
    ) -> Result<SocketLinks, Error> {
        let slave_uds = config
            .temp_path
            .join(format!("{}_{}", BEEROCKS_SLAVE_UDS, config.hostap_iface));
        let backhaul_uds = config.temp_path.join(BEEROCKS_BACKHAUL_MGR_UDS);
        let platform_uds = config.temp_path.join(BEEROCKS_PLAT_MGR_UDS);

        std::fs::create_dir_all(&config.temp_path)?;
        if slave_uds.exists() {
            std::fs::remove_file(&slave_uds)?;
        }
        let listener = UnixListener::bind(&slave_uds)?;

        let accept_tx = tx.clone();
        let accept_task = tokio::spawn(async move {
            let mut next_id: u64 = 0;
            loop {
                match listener.accept().await {
                    Ok((stream, _)) => {
                        let link = LinkId::Worker(next_id);
                        next_id += 1;
                        let (reader, writer) = stream.into_split();
                        if accept_tx
                            .send(LinkEvent::WorkerConnected { link, reader, writer })
                            .await
                            .is_err()
                        {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!("accept on slave uds failed: {e}");
                    }
                }
            }
        });

        Ok(SocketLinks {
            platform_uds,
            backhaul_uds,
            tx,
            writers: HashMap::new(),
            readers: HashMap::new(),
            outbox: VecDeque::new(),
            accept_task,
            monitor: MonitorProcess::default(),
            ap_manager: None,
            ap_entry,
        })
    }

    fn connect(&mut self, link: LinkId, path: &PathBuf) -> io::Result<()> {
        let stream = std::os::unix::net::UnixStream::connect(path)?;
        stream.set_nonblocking(true)?;
        let stream = tokio::net::UnixStream::from_std(stream)?;
        let (reader, writer) = stream.into_split();
        self.register(link, reader, writer);
        Ok(())
    }

    /// Registers an established connection: keeps the write half and moves
    /// the read half onto its reader task.
    pub fn register(&mut self, link: LinkId, reader: OwnedReadHalf, writer: OwnedWriteHalf) {
        self.writers.insert(link, writer);
        self.readers
            .insert(link, spawn_reader(link, reader, self.tx.clone()));
    }

    fn close(&mut self, link: LinkId) {
        self.writers.remove(&link);
        if let Some(task) = self.readers.remove(&link) {
            task.abort();
        }
        self.outbox.retain(|(l, _)| *l != link);
    }

    /// Writes out everything queued since the last flush. Called by the
    /// event loop after each core step, before the next readiness wait.
    pub async fn flush(&mut self) {
        while let Some((link, frame)) = self.outbox.pop_front() {
            let Some(writer) = self.writers.get_mut(&link) else {
                debug!("dropping frame for closed link {link:?}");
                continue;
            };
            if let Err(e) = writer.write_all(&frame).await {
                warn!("write to {link:?} failed: {e}");
                self.close(link);
                let _ = self.tx.send(LinkEvent::Closed { link }).await;
            }
        }
    }
}

impl Drop for SocketLinks {
    fn drop(&mut self) {
        self.accept_task.abort();
        for (_, task) in self.readers.drain() {
            task.abort();
        }
    }
}

impl Links for SocketLinks {
    fn connect_platform(&mut self) -> io::Result<()> {
        let path = self.platform_uds.clone();
        self.connect(LinkId::Platform, &path)
    }

    fn connect_backhaul(&mut self) -> io::Result<()> {
        let path = self.backhaul_uds.clone();
        self.connect(LinkId::Backhaul, &path)
    }

    fn close_platform(&mut self) {
        self.close(LinkId::Platform);
    }

    fn close_backhaul(&mut self) {
        self.close(LinkId::Backhaul);
    }

    fn close_worker(&mut self, link: LinkId) {
        if matches!(link, LinkId::Worker(_)) {
            self.close(link);
        }
    }

    fn send(&mut self, link: LinkId, cmdu: &Cmdu) -> io::Result<()> {
        self.send_addressed(link, cmdu, MacAddr::ZERO, MacAddr::ZERO)
    }

    fn send_addressed(
        &mut self,
        link: LinkId,
        cmdu: &Cmdu,
        dst_mac: MacAddr,
        src_mac: MacAddr,
    ) -> io::Result<()> {
        if !self.writers.contains_key(&link) {
            return Err(io::Error::new(
                io::ErrorKind::NotConnected,
                format!("link {link:?} is not connected"),
            ));
        }
        self.outbox
            .push_back((link, encode_frame(dst_mac, src_mac, &cmdu.serialize())));
        Ok(())
    }

    fn start_ap_manager(&mut self, config: ApManagerConfig) -> Result<(), Error> {
        self.stop_ap_manager();
        self.ap_manager = Some(ApManagerTask::start(self.ap_entry, config));
        Ok(())
    }

    fn stop_ap_manager(&mut self) {
        if let Some(task) = self.ap_manager.take() {
            task.stop();
        }
    }

    fn start_monitor(&mut self, iface: &str) -> Result<(), Error> {
        self.monitor.start(iface)
    }

    fn stop_monitor(&mut self, _iface: &str) {
        self.monitor.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_header_layout() {
        let frame = encode_frame(
            MacAddr([1, 2, 3, 4, 5, 6]),
            MacAddr([7, 8, 9, 10, 11, 12]),
            &[0xaa, 0xbb],
        );
        assert_eq!(frame.len(), UDS_HEADER_LEN + 2);
        assert_eq!(&frame[..4], &2u32.to_le_bytes());
        assert_eq!(&frame[4..10], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(&frame[10..16], &[7, 8, 9, 10, 11, 12]);
        assert_eq!(&frame[16..], &[0xaa, 0xbb]);
    }

    #[tokio::test]
    async fn oversized_frame_is_rejected() {
        let (a, b) = tokio::net::UnixStream::pair().unwrap();
        let (mut reader, _keep) = a.into_split();
        let (_r, mut writer) = b.into_split();
        let mut bogus = ((MAX_FRAME_LEN + 1) as u32).to_le_bytes().to_vec();
        bogus.extend_from_slice(&[0u8; 12]);
        writer.write_all(&bogus).await.unwrap();
        assert!(read_frame(&mut reader).await.is_err());
    }
}
