//! Pyth price feeds over the Hermes HTTP API

use async_trait::async_trait;
use lit_agentkit_agent::{parse_args, ActionProvider, ToolDefinition};
use lit_agentkit_core::config::PythSettings;
use lit_agentkit_core::{Error, Result, WalletProvider};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// Provider name
pub const PYTH_PROVIDER: &str = "pyth";

/// Action name for feed id lookup
pub const FETCH_PRICE_FEED_ID: &str = "fetch_price_feed_id";

/// Action name for price lookup
pub const FETCH_PRICE: &str = "fetch_price";

/// Arguments of `fetch_price_feed_id`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FetchPriceFeedIdArgs {
    /// Token symbol, e.g. BTC
    pub token_symbol: String,
}

/// Arguments of `fetch_price`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FetchPriceArgs {
    /// Pyth price feed id
    pub price_feed_id: String,
}

#[derive(Debug, Deserialize)]
struct PriceFeed {
    id: String,
    #[serde(default)]
    attributes: FeedAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct FeedAttributes {
    #[serde(default)]
    base: String,
}

#[derive(Debug, Deserialize)]
struct PriceUpdate {
    #[serde(default)]
    parsed: Vec<ParsedUpdate>,
}

#[derive(Debug, Deserialize)]
struct ParsedUpdate {
    price: PriceData,
}

#[derive(Debug, Deserialize)]
struct PriceData {
    price: String,
    expo: i32,
}

/// Render `price * 10^expo`, truncated to two decimals when `expo` is negative
pub fn format_price(price: i128, expo: i32) -> Result<String> {
    let overflow = || Error::rpc(format!("price {}e{} out of range", price, expo));

    if expo >= 0 {
        let factor = 10i128.checked_pow(expo.unsigned_abs()).ok_or_else(overflow)?;
        return Ok(price.checked_mul(factor).ok_or_else(overflow)?.to_string());
    }

    let divisor = 10i128.checked_pow(expo.unsigned_abs()).ok_or_else(overflow)?;
    let scaled = price.checked_mul(100).ok_or_else(overflow)? / divisor;
    let sign = if scaled < 0 { "-" } else { "" };
    let scaled = scaled.abs();
    Ok(format!("{}{}.{:02}", sign, scaled / 100, scaled % 100))
}

/// Action provider for Pyth price data
pub struct PythActionProvider {
    http: reqwest::Client,
    base_url: String,
}

impl PythActionProvider {
    /// Create a provider for the configured Hermes endpoint
    pub fn new(settings: &PythSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: settings.hermes_url.trim_end_matches('/').to_string(),
        })
    }

    /// Look up the USD price feed id of a token symbol
    #[instrument(skip(self))]
    pub async fn fetch_price_feed_id(&self, args: FetchPriceFeedIdArgs) -> Result<String> {
        let symbol = args.token_symbol.trim().to_uppercase();
        let feeds: Vec<PriceFeed> = self
            .http
            .get(format!("{}/v2/price_feeds", self.base_url))
            .query(&[("query", symbol.as_str()), ("asset_type", "crypto")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!("{} candidate feeds for {}", feeds.len(), symbol);

        feeds
            .into_iter()
            .find(|feed| feed.attributes.base.eq_ignore_ascii_case(&symbol))
            .map(|feed| feed.id)
            .ok_or_else(|| Error::rpc(format!("No price feed found for {}", args.token_symbol)))
    }

    /// Latest price of a feed
    #[instrument(skip(self))]
    pub async fn fetch_price(&self, args: FetchPriceArgs) -> Result<String> {
        let update: PriceUpdate = self
            .http
            .get(format!("{}/v2/updates/price/latest", self.base_url))
            .query(&[("ids[]", args.price_feed_id.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let data = update
            .parsed
            .into_iter()
            .next()
            .ok_or_else(|| Error::rpc(format!("No price data for feed {}", args.price_feed_id)))?
            .price;
        let price: i128 = data
            .price
            .parse()
            .map_err(|_| Error::rpc(format!("invalid price {}", data.price)))?;

        format_price(price, data.expo)
    }
}

#[async_trait]
impl ActionProvider for PythActionProvider {
    fn name(&self) -> &str {
        PYTH_PROVIDER
    }

    fn actions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new::<FetchPriceFeedIdArgs>(
                FETCH_PRICE_FEED_ID,
                "Fetch the price feed ID for a given token symbol (e.g. BTC, ETH) from Pyth.",
            ),
            ToolDefinition::new::<FetchPriceArgs>(
                FETCH_PRICE,
                "Fetch the current price of a price feed from Pyth. \
                 Takes a price feed ID; look it up with fetch_price_feed_id first.",
            ),
        ]
    }

    async fn invoke(&self, action: &str, _wallet: &dyn WalletProvider, args: Value) -> Result<String> {
        match action {
            FETCH_PRICE_FEED_ID => self.fetch_price_feed_id(parse_args(action, args)?).await,
            FETCH_PRICE => self.fetch_price(parse_args(action, args)?).await,
            other => Err(Error::config(format!(
                "{} has no action named {}",
                PYTH_PROVIDER, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockHttpServer, StaticWallet};
    use serde_json::json;

    const BTC_FEED: &str = "e62df6c8b4a85fe1a67db44dc12de5db330f7ac66b72dc658afedf0f4a415b43";

    fn provider(url: &str) -> PythActionProvider {
        PythActionProvider::new(&PythSettings {
            hermes_url: url.to_string(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_format_price() -> Result<()> {
        assert_eq!(format_price(6_523_456_789_012, -8)?, "65234.56");
        assert_eq!(format_price(99_999_999, -8)?, "0.99");
        assert_eq!(format_price(5, -8)?, "0.00");
        assert_eq!(format_price(42, 0)?, "42");
        assert_eq!(format_price(42, 2)?, "4200");
        assert!(format_price(1, 60).is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_feed_id_matches_base_symbol() -> Result<()> {
        let server = MockHttpServer::start(vec![json!([
            { "id": "btcdom", "attributes": { "base": "BTCDOM", "quote_currency": "USD" } },
            { "id": BTC_FEED, "attributes": { "base": "BTC", "quote_currency": "USD" } }
        ])])
        .await;

        let id = provider(server.url())
            .invoke(FETCH_PRICE_FEED_ID, &StaticWallet, json!({ "token_symbol": "btc" }))
            .await?;

        assert_eq!(id, BTC_FEED);
        let request = &server.requests()[0];
        assert!(request.starts_with("GET /v2/price_feeds?query=BTC&asset_type=crypto"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let server = MockHttpServer::start(vec![json!([])]).await;

        let err = provider(server.url())
            .fetch_price_feed_id(FetchPriceFeedIdArgs {
                token_symbol: "NOPE".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No price feed found for NOPE"));
    }

    #[tokio::test]
    async fn test_fetch_price() -> Result<()> {
        let server = MockHttpServer::start(vec![json!({
            "binary": { "encoding": "hex", "data": [] },
            "parsed": [{
                "id": BTC_FEED,
                "price": { "price": "6523456789012", "conf": "3000000", "expo": -8, "publish_time": 1 }
            }]
        })])
        .await;

        let price = provider(server.url())
            .invoke(FETCH_PRICE, &StaticWallet, json!({ "price_feed_id": BTC_FEED }))
            .await?;

        assert_eq!(price, "65234.56");
        assert!(server.requests()[0].contains(BTC_FEED));
        Ok(())
    }

    #[test]
    fn test_action_names() {
        let names: Vec<String> = provider("http://localhost")
            .actions()
            .into_iter()
            .map(|action| action.name)
            .collect();
        assert_eq!(names, vec![FETCH_PRICE_FEED_ID, FETCH_PRICE]);
    }
}
