mod api;
mod dispatch;
mod error;
mod state;
mod ui;

use api::channel;
use env_logger::Builder;
use log::{error, info, LevelFilter};
use state::Action;
use std::error::Error;
use std::io::Write;
use ui::dashboard::Dashboard;

const COINCAP_WS_URL: &str = "wss://ws.coincap.io";
const WEATHER_ALERTS_WS_URL: &str = "wss://mock-weather-alerts.com/stream";
const TRACKED_CITY: &str = "New York";
const TRACKED_ASSETS: [&str; 2] = ["bitcoin", "ethereum"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Configure logger
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("cryptoweather", LevelFilter::Debug)
        .format(|buf, record| {
            let ts = chrono::Local::now().format("%H:%M:%S%.3f");
            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                ts,
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr) // Keep logs separate from TUI
        .write_style(env_logger::WriteStyle::Always)
        .init();

    info!("Starting CryptoWeather Nexus...");

    // Create channels
    let (action_tx, action_rx) = tokio::sync::mpsc::channel(100);
    let (notify_tx, notify_rx) = tokio::sync::mpsc::channel(100);

    let client = reqwest::Client::builder()
        .user_agent("cryptoweather-nexus/0.1")
        .build()?;

    // Three independent fetches; each settles its panel with a single action.
    tokio::spawn({
        let client = client.clone();
        let action_tx = action_tx.clone();
        async move {
            let action = match api::weather::fetch_current(&client, TRACKED_CITY).await {
                Ok(report) => Action::WeatherLoaded(report),
                Err(e) => Action::WeatherFailed(e.to_string()),
            };
            if action_tx.send(action).await.is_err() {
                info!("Dashboard gone before weather fetch settled");
            }
        }
    });

    tokio::spawn({
        let client = client.clone();
        let action_tx = action_tx.clone();
        async move {
            let action = match api::coincap::fetch_assets(&client, &TRACKED_ASSETS).await {
                Ok(quotes) => Action::CryptoLoaded(quotes),
                Err(e) => Action::CryptoFailed(e.to_string()),
            };
            if action_tx.send(action).await.is_err() {
                info!("Dashboard gone before crypto fetch settled");
            }
        }
    });

    tokio::spawn({
        let client = client.clone();
        let action_tx = action_tx.clone();
        async move {
            let action = match api::news::fetch_headlines(&client).await {
                Ok(items) => Action::NewsLoaded(items),
                Err(e) => Action::NewsFailed(e.to_string()),
            };
            if action_tx.send(action).await.is_err() {
                info!("Dashboard gone before news fetch settled");
            }
        }
    });

    // Open both push channels; their handles are closed on every exit path.
    let mut price_channel =
        channel::open_price_channel(COINCAP_WS_URL, &TRACKED_ASSETS, notify_tx.clone())?;
    let mut alert_channel = channel::open_alert_channel(WEATHER_ALERTS_WS_URL, notify_tx)?;

    let dashboard = Dashboard::new(TRACKED_CITY);
    if let Err(e) = dashboard.run(action_rx, notify_rx).await {
        error!("Dashboard error: {}", e);
    }

    price_channel.close();
    alert_channel.close();

    info!("Shutdown complete");
    Ok(())
}
