use serde::Deserialize;
use std::collections::HashMap;

// Hardcoded thresholds; strict inequality, so a price exactly at the
// threshold does not fire.
const BITCOIN_THRESHOLD: f64 = 50_000.0;
const ETHEREUM_THRESHOLD: f64 = 3_000.0;

/// One websocket frame from the price stream: a field per tracked asset,
/// e.g. `{"bitcoin": 50123.0, "ethereum": 2990.5}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceTick {
    #[serde(flatten)]
    pub prices: HashMap<String, f64>,
}

impl PriceTick {
    pub fn price_of(&self, asset: &str) -> Option<f64> {
        self.prices.get(asset).copied()
    }
}

/// One frame from the weather-alert stream.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherAlert {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }
}

/// The rules are independent and non-exclusive: one tick carrying both a
/// bitcoin and an ethereum breach produces two notifications. Repeated
/// breaches are not deduplicated.
pub fn evaluate_tick(tick: &PriceTick) -> Vec<Notification> {
    let mut out = Vec::new();
    if tick.price_of("bitcoin").map_or(false, |p| p > BITCOIN_THRESHOLD) {
        out.push(Notification::success("Bitcoin has exceeded $50K!"));
    }
    if tick.price_of("ethereum").map_or(false, |p| p > ETHEREUM_THRESHOLD) {
        out.push(Notification::success("Ethereum has exceeded $3K!"));
    }
    out
}

/// Every alert fires, whatever the message says.
pub fn evaluate_alert(alert: &WeatherAlert) -> Notification {
    Notification::error(format!("Weather Alert: {}", alert.message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(bitcoin: f64, ethereum: f64) -> PriceTick {
        PriceTick {
            prices: HashMap::from([
                ("bitcoin".to_string(), bitcoin),
                ("ethereum".to_string(), ethereum),
            ]),
        }
    }

    #[test]
    fn bitcoin_breach_alone_fires_once() {
        let notifications = evaluate_tick(&tick(50_001.0, 1_000.0));
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::Success);
        assert_eq!(notifications[0].text, "Bitcoin has exceeded $50K!");
    }

    #[test]
    fn ethereum_breach_alone_fires_once() {
        let notifications = evaluate_tick(&tick(49_999.0, 3_001.0));
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].text, "Ethereum has exceeded $3K!");
    }

    #[test]
    fn simultaneous_breaches_fire_independently() {
        let notifications = evaluate_tick(&tick(50_001.0, 3_001.0));
        assert_eq!(notifications.len(), 2);
    }

    #[test]
    fn thresholds_are_strict() {
        assert!(evaluate_tick(&tick(50_000.0, 3_000.0)).is_empty());
    }

    #[test]
    fn untracked_assets_never_fire() {
        let tick = PriceTick {
            prices: HashMap::from([("dogecoin".to_string(), 1_000_000.0)]),
        };
        assert!(evaluate_tick(&tick).is_empty());
    }

    #[test]
    fn repeated_breaches_are_not_deduplicated() {
        let first = evaluate_tick(&tick(60_000.0, 100.0));
        let second = evaluate_tick(&tick(60_000.0, 100.0));
        assert_eq!(first, second);
        assert_eq!(first.len() + second.len(), 2);
    }

    #[test]
    fn every_weather_alert_carries_its_message_verbatim() {
        for message in ["Flash flood warning", "", "heat advisory until 20:00"] {
            let notification = evaluate_alert(&WeatherAlert {
                message: message.to_string(),
            });
            assert_eq!(notification.kind, NotificationKind::Error);
            assert_eq!(notification.text, format!("Weather Alert: {}", message));
        }
    }

    #[test]
    fn tick_payload_with_non_numeric_price_fails_to_parse() {
        let result = serde_json::from_str::<PriceTick>(r#"{"bitcoin": "high"}"#);
        assert!(result.is_err());
    }
}
