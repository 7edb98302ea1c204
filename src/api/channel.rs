use crate::dispatch::Notification;
use crate::error::NexusError;
use log::error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Owns a spawned push-connection task. Closing releases the connection;
/// dropping an unclosed handle releases it too, so teardown happens on
/// every exit path.
pub struct ChannelHandle {
    task: Option<JoinHandle<()>>,
}

impl ChannelHandle {
    fn new(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// Idempotent: closing an already-closed handle is a no-op.
    pub fn close(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ChannelHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opens the crypto price stream scoped to a fixed asset filter. The only
/// validation is that the filter is non-empty. A connection failure inside
/// the task is logged and dropped; there is no reconnect policy.
pub fn open_price_channel(
    endpoint: &str,
    assets: &[&str],
    notify_tx: mpsc::Sender<Notification>,
) -> Result<ChannelHandle, NexusError> {
    if assets.is_empty() {
        return Err(NexusError::EmptyAssetFilter);
    }

    let url = format!("{}/prices?assets={}", endpoint, assets.join(","));
    let task = tokio::spawn(async move {
        if let Err(e) = super::coincap::ws::stream_prices(&url, notify_tx).await {
            error!("Price channel failed: {}", e);
        }
    });
    Ok(ChannelHandle::new(task))
}

/// Opens the weather-alert stream. Same failure posture as the price channel.
pub fn open_alert_channel(
    endpoint: &str,
    notify_tx: mpsc::Sender<Notification>,
) -> Result<ChannelHandle, NexusError> {
    let url = endpoint.to_string();
    let task = tokio::spawn(async move {
        if let Err(e) = super::weather::ws::stream_alerts(&url, notify_tx).await {
            error!("Alert channel failed: {}", e);
        }
    });
    Ok(ChannelHandle::new(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_asset_filter_is_rejected() {
        let (notify_tx, _notify_rx) = mpsc::channel(1);
        let result = open_price_channel("wss://127.0.0.1:9", &[], notify_tx);
        assert!(matches!(result, Err(NexusError::EmptyAssetFilter)));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let (notify_tx, _notify_rx) = mpsc::channel(1);
        let mut handle =
            open_price_channel("wss://127.0.0.1:9", &["bitcoin"], notify_tx).unwrap();
        handle.close();
        handle.close();
    }

    #[tokio::test]
    async fn drop_releases_an_unclosed_handle() {
        let (notify_tx, _notify_rx) = mpsc::channel(1);
        let handle = open_alert_channel("wss://127.0.0.1:9", notify_tx).unwrap();
        drop(handle);
    }
}
