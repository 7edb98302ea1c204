pub mod ws;

use crate::error::NexusError;
use crate::state::AssetQuote;
use log::warn;
use reqwest::Client;
use serde::Deserialize;

const COINCAP_API_URL: &str = "https://api.coincap.io/v2";

#[derive(Debug, Deserialize)]
struct AssetsResponse {
    data: Vec<RawAsset>,
}

// CoinCap serializes numbers as strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAsset {
    id: String,
    price_usd: String,
    change_percent24_hr: Option<String>,
}

pub async fn fetch_assets(client: &Client, ids: &[&str]) -> Result<Vec<AssetQuote>, NexusError> {
    let url = format!("{}/assets?ids={}", COINCAP_API_URL, ids.join(","));
    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(NexusError::BadStatus("CoinCap", response.status()));
    }

    let body: AssetsResponse = response.json().await?;
    Ok(body.data.into_iter().map(quote_from_raw).collect())
}

fn quote_from_raw(raw: RawAsset) -> AssetQuote {
    let price_usd = raw.price_usd.parse().unwrap_or_else(|e| {
        warn!("Unparseable price '{}' for {}: {}", raw.price_usd, raw.id, e);
        0.0
    });
    let change_24h = raw
        .change_percent24_hr
        .and_then(|c| c.parse().ok())
        .unwrap_or(0.0);

    AssetQuote {
        id: raw.id,
        price_usd,
        change_24h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_assets_map_to_quotes() {
        let body: AssetsResponse = serde_json::from_str(
            r#"{"data":[{"id":"bitcoin","priceUsd":"50123.4567","changePercent24Hr":"-1.25"}]}"#,
        )
        .unwrap();

        let quotes: Vec<AssetQuote> = body.data.into_iter().map(quote_from_raw).collect();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].id, "bitcoin");
        assert!((quotes[0].price_usd - 50123.4567).abs() < 1e-9);
        assert!((quotes[0].change_24h + 1.25).abs() < 1e-9);
    }

    #[test]
    fn missing_change_defaults_to_zero() {
        let raw: RawAsset =
            serde_json::from_str(r#"{"id":"ethereum","priceUsd":"2990.0"}"#).unwrap();
        let quote = quote_from_raw(raw);
        assert_eq!(quote.change_24h, 0.0);
    }
}
