use crate::dispatch::{self, Notification, WeatherAlert};
use crate::error::NexusError;
use futures_util::StreamExt;
use log::{error, info, warn};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite;

/// Reads the weather-alert stream; every parsed alert becomes exactly one
/// error-styled notification. Same posture as the price stream: malformed
/// frames are logged and dropped, no reconnect on failure.
pub async fn stream_alerts(
    url: &str,
    sender: mpsc::Sender<Notification>,
) -> Result<(), NexusError> {
    info!("Connecting to weather-alert WebSocket: {}", url);

    match connect_async(url).await {
        Ok((mut ws_stream, _)) => {
            info!("Successfully connected to alert stream");

            while let Some(message) = ws_stream.next().await {
                match message {
                    Ok(tungstenite::protocol::Message::Text(text)) => {
                        match serde_json::from_str::<WeatherAlert>(&text) {
                            Ok(alert) => {
                                let notification = dispatch::evaluate_alert(&alert);
                                if let Err(e) = sender.send(notification).await {
                                    error!("Failed to send notification: {}", e);
                                }
                            }
                            Err(e) => {
                                warn!("Dropping malformed alert payload: {}", e);
                            }
                        }
                    }
                    Ok(tungstenite::protocol::Message::Close(_)) => {
                        info!("Alert stream closed");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("Alert stream error: {}", e);
                        break;
                    }
                }
            }
        }
        Err(e) => {
            error!("Alert channel connection error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
