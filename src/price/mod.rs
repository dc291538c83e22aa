//! USD price lookup against the CoinGecko `simple/price` endpoint.
//!
//! Every failure is a [PriceError]; callers turn it into a message with [render_quote] and never
//! exit with an error status.

use crate::config::Config;
use crate::fetch::HttpClient;
use serde_json::Value;
use thiserror::Error;

/// Public API root. Overridable through config and in tests.
pub const DEFAULT_API_BASE: &str = "https://api.coingecko.com/api/v3";
/// Symbol looked up when none is given.
pub const DEFAULT_SYMBOL: &str = "BTC";

/// Tickers whose CoinGecko coin id differs from the lower-cased symbol.
const COIN_IDS: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("sol", "solana"),
    ("ada", "cardano"),
    ("doge", "dogecoin"),
    ("xrp", "ripple"),
    ("dot", "polkadot"),
    ("ltc", "litecoin"),
    ("bnb", "binancecoin"),
    ("usdt", "tether"),
    ("usdc", "usd-coin"),
];

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Failed to create HTTP client: {source}")]
    Client { source: reqwest::Error },

    #[error("Network error: could not reach {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("HTTP {status} from price API")]
    HttpStatus { status: u16 },

    #[error("Could not decode price API response: {source}")]
    Decode { source: reqwest::Error },

    #[error("No USD price for {symbol}")]
    NotFound { symbol: String },
}

/// Coin id for well-known tickers, if it differs from the symbol.
pub fn coin_id(symbol: &str) -> Option<&'static str> {
    let lower = symbol.to_ascii_lowercase();
    COIN_IDS
        .iter()
        .find(|(ticker, _)| *ticker == lower)
        .map(|(_, id)| *id)
}

/// Response keys to try for `symbol`, in order: the lower-cased symbol, then its coin id.
fn candidate_ids(symbol: &str) -> Vec<String> {
    let mut ids = vec![symbol.to_ascii_lowercase()];
    if let Some(id) = coin_id(symbol) {
        ids.push(id.to_string());
    }
    ids
}

/// Pick the USD price for `symbol` out of a `simple/price` response body.
pub fn price_from_response(symbol: &str, body: &Value) -> Option<f64> {
    candidate_ids(symbol)
        .iter()
        .find_map(|id| body.get(id).and_then(|v| v.get("usd")).and_then(Value::as_f64))
}

/// Blocking client for the price API.
#[derive(Debug, Clone)]
pub struct PriceClient {
    http: HttpClient,
    api_base: String,
}

impl PriceClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_base(DEFAULT_API_BASE)
    }

    /// Client pointed at another API root (e.g. a local stub).
    pub fn with_base(api_base: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(HttpClient::new()?, api_base))
    }

    /// Use an already configured HTTP client (custom User-Agent or timeout).
    pub fn with_client(http: HttpClient, api_base: impl Into<String>) -> Self {
        PriceClient {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client honouring `price_api_base`, `user_agent` and `timeout_secs` from the config file.
    pub fn from_config(config: &Config) -> Result<Self, PriceError> {
        let mut builder = HttpClient::builder();
        if let Some(ua) = &config.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout_secs(secs);
        }
        let http = builder
            .build()
            .map_err(|e| PriceError::Client { source: e })?;
        let base = config
            .price_api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE);
        Ok(Self::with_client(http, base))
    }

    /// Current USD price of `symbol` (case-insensitive).
    pub fn usd_price(&self, symbol: &str) -> Result<f64, PriceError> {
        let url = format!("{}/simple/price", self.api_base);
        let ids = candidate_ids(symbol).join(",");
        let response = self
            .http
            .get_with_query(&url, &[("ids", ids.as_str()), ("vs_currencies", "usd")])
            .map_err(|e| PriceError::Network {
                url: url.clone(),
                source: e,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::HttpStatus {
                status: status.as_u16(),
            });
        }
        let body: Value = response
            .json()
            .map_err(|e| PriceError::Decode { source: e })?;
        tracing::debug!(symbol, %body, "price response");
        price_from_response(symbol, &body).ok_or_else(|| PriceError::NotFound {
            symbol: symbol.to_ascii_uppercase(),
        })
    }
}

/// Two decimals with comma thousands separators, e.g. `3000.5` → `3,000.50`.
pub fn format_usd(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if price < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// The line printed for a lookup: the quote on success, a failure message otherwise.
pub fn render_quote(symbol: &str, result: &Result<f64, PriceError>) -> String {
    match result {
        Ok(price) => format!("{}: ${} USD", symbol, format_usd(*price)),
        Err(_) => format!("Unable to retrieve {} price", symbol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_usd_groups_thousands() {
        assert_eq!(format_usd(3000.5), "3,000.50");
        assert_eq!(format_usd(1234567.891), "1,234,567.89");
        assert_eq!(format_usd(999.999), "1,000.00");
        assert_eq!(format_usd(0.05), "0.05");
        assert_eq!(format_usd(100.0), "100.00");
    }

    #[test]
    fn format_usd_negative() {
        assert_eq!(format_usd(-1500.0), "-1,500.00");
    }

    #[test]
    fn price_from_response_prefers_symbol_key() {
        let body = json!({"eth": {"usd": 3000.5}, "ethereum": {"usd": 1.0}});
        assert_eq!(price_from_response("ETH", &body), Some(3000.5));
    }

    #[test]
    fn price_from_response_uses_coin_id() {
        let body = json!({"bitcoin": {"usd": 65000}});
        assert_eq!(price_from_response("btc", &body), Some(65000.0));
    }

    #[test]
    fn price_from_response_missing() {
        assert_eq!(price_from_response("NOPE", &json!({})), None);
        assert_eq!(price_from_response("eth", &json!({"eth": {}})), None);
        assert_eq!(price_from_response("eth", &json!({"eth": {"usd": "x"}})), None);
    }

    #[test]
    fn from_config_uses_configured_base() -> Result<(), PriceError> {
        let config = Config {
            price_api_base: Some("http://127.0.0.1:9/api/".to_string()),
            ..Config::default()
        };
        let client = PriceClient::from_config(&config)?;
        assert_eq!(client.api_base, "http://127.0.0.1:9/api");
        let default = PriceClient::from_config(&Config::default())?;
        assert_eq!(default.api_base, DEFAULT_API_BASE);
        Ok(())
    }

    #[test]
    fn coin_id_known_and_unknown() {
        assert_eq!(coin_id("ETH"), Some("ethereum"));
        assert_eq!(coin_id("zzz"), None);
    }

    #[test]
    fn render_quote_success_and_failure() {
        assert_eq!(render_quote("ETH", &Ok(3000.5)), "ETH: $3,000.50 USD");
        let err = Err(PriceError::NotFound {
            symbol: "XYZ".into(),
        });
        assert_eq!(render_quote("XYZ", &err), "Unable to retrieve XYZ price");
    }
}
