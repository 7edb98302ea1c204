use crate::dispatch::{self, Notification, PriceTick};
use crate::error::NexusError;
use futures_util::StreamExt;
use log::{error, info, warn};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite;

/// Reads the CoinCap price stream until it closes or errors. Each text frame
/// is one tick; malformed frames are logged and dropped. Resulting
/// notifications go out over the notification channel.
pub async fn stream_prices(
    url: &str,
    sender: mpsc::Sender<Notification>,
) -> Result<(), NexusError> {
    info!("Connecting to CoinCap WebSocket: {}", url);

    match connect_async(url).await {
        Ok((mut ws_stream, _)) => {
            info!("Successfully connected to price stream");

            while let Some(message) = ws_stream.next().await {
                match message {
                    Ok(tungstenite::protocol::Message::Text(text)) => {
                        match serde_json::from_str::<PriceTick>(&text) {
                            Ok(tick) => {
                                for notification in dispatch::evaluate_tick(&tick) {
                                    if let Err(e) = sender.send(notification).await {
                                        error!("Failed to send notification: {}", e);
                                    }
                                }
                            }
                            Err(e) => {
                                warn!("Dropping malformed price payload: {}", e);
                            }
                        }
                    }
                    Ok(tungstenite::protocol::Message::Close(_)) => {
                        info!("Price stream closed");
                        break;
                    }
                    Ok(_) => {} // Ignore other message types
                    Err(e) => {
                        error!("Price stream error: {}", e);
                        break;
                    }
                }
            }
        }
        Err(e) => {
            error!("Price channel connection error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
