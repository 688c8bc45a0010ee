use std::io::Write;

use chrono::Local;
use env_logger::Builder;
use log::LevelFilter;

pub mod config;
pub mod errors;
pub mod join;
pub mod link;
pub mod message;
pub mod router;
pub mod runtime;
pub mod slave;
pub mod status;
pub mod testing;
pub mod timers;
pub mod workers;

pub mod prelude {
    pub use crate::config::{SlaveConfig, BEEROCKS_VERSION};
    pub use crate::errors::PlatformError;
    pub use crate::link::{LinkId, Links, SocketLinks};
    pub use crate::message::{Action, Cmdu, MacAddr, MessageType, Tlv, Wire};
    pub use crate::runtime::SlaveRuntime;
    pub use crate::slave::{Slave, State};
    pub use crate::timers::{Clock, FakeClock, MonotonicClock};
}

/// Logger setup shared by the binary and the test tooling.
pub fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();
}
