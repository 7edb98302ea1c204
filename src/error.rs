use thiserror::Error;

#[derive(Error, Debug)]
pub enum NexusError {
    #[error("WebSocket error: {0}")]
    Websocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0} API returned status {1}")]
    BadStatus(&'static str, reqwest::StatusCode),

    #[error("Asset filter must not be empty")]
    EmptyAssetFilter,
}
