use std::path::PathBuf;

use anyhow::Error;
use log::info;

use beerocks_slave::config::SlaveConfig;
use beerocks_slave::runtime::SlaveRuntime;
use beerocks_slave::workers;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    beerocks_slave::init_logger();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("beerocks_slave.ron"));
    let config = SlaveConfig::load(&config_path)?;
    info!(
        "starting slave for radio {} ({})",
        config.hostap_iface, config.radio_identifier
    );

    let runtime = SlaveRuntime::new(config, workers::unlinked_ap_manager)?;
    runtime.run().await
}
