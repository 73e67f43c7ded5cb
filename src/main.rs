use std::path::PathBuf;
use std::sync::Arc;

use airwatch::console::{self, Command, ConsoleRenderer};
use airwatch::geocoding::{build_geocoder, http_client};
use airwatch::{
    AirWatchConfig, FixedGeolocator, OpenMeteoAirQualityClient, SearchController, SearchSettings,
    logging,
};
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AirWatchConfig::load_from_path(config_path)?;
    logging::init(&config.logging)?;

    let client = http_client().context("Failed to set up HTTP client")?;
    let geocoder = build_geocoder(&config.geocoding, client.clone());
    let air_quality = Arc::new(OpenMeteoAirQualityClient::new(
        client,
        config.air_quality.base_url.clone(),
    ));
    let geolocator = Arc::new(FixedGeolocator::from_config(&config.geolocation));

    info!(
        provider = geocoder.provider_name(),
        "AirWatch {} ready",
        airwatch::VERSION
    );

    let controller = SearchController::new(
        geocoder,
        air_quality,
        geolocator,
        ConsoleRenderer::stdout(),
        SearchSettings::from(&config.search),
    );

    let (tx, rx) = mpsc::channel(32);
    let session = tokio::spawn(controller.run(rx));

    println!("{}", console::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match console::parse_command(&line) {
            Command::Events(events) => {
                for event in events {
                    if tx.send(event).await.is_err() {
                        debug!("Controller stopped");
                        break;
                    }
                }
            }
            Command::Help => println!("{}", console::HELP),
            Command::Invalid(message) => println!("{message}"),
            Command::Quit => break,
        }
    }

    drop(tx);
    session.await.context("Search controller task failed")?;
    Ok(())
}
