use anyhow::{Context, Result};
use ethers::types::Address;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct BundlesResponse {
    data: BundlesData,
}

#[derive(Debug, Deserialize)]
struct BundlesData {
    bundles: Vec<Bundle>,
}

#[derive(Debug, Deserialize)]
struct Bundle {
    #[serde(rename = "maticPriceUSD")]
    matic_price_usd: String,
}

#[derive(Debug, Deserialize)]
struct PoolDayDatasResponse {
    data: PoolDayDatasData,
}

#[derive(Debug, Deserialize)]
struct PoolDayDatasData {
    #[serde(rename = "poolDayDatas")]
    pool_day_datas: Vec<PoolDayData>,
}

#[derive(Debug, Deserialize)]
struct PoolDayData {
    #[serde(rename = "feesUSD")]
    fees_usd: String,
}

/// GraphQL client for the DEX's fee telemetry. Results feed yield estimates
/// only; chain state never comes from here.
#[derive(Clone)]
pub struct SubgraphClient {
    client: Client,
    url: String,
}

impl SubgraphClient {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }

    /// USD price of the chain's native token from the bundle singleton.
    pub async fn native_price_usd(&self) -> Result<f64> {
        let response: BundlesResponse = self
            .client
            .post(&self.url)
            .json(&json!({ "query": "{ bundles { id maticPriceUSD } }" }))
            .send()
            .await
            .context("Failed to query subgraph for native token price")?
            .json()
            .await
            .context("Failed to parse subgraph bundles response")?;

        let bundle = response
            .data
            .bundles
            .first()
            .context("No bundle in subgraph response")?;

        bundle
            .matic_price_usd
            .parse()
            .context("Failed to parse native token price as float")
    }

    /// Latest recorded daily fee revenue for one pool, in USD. Pools the
    /// subgraph has no day data for report zero fees rather than an error.
    pub async fn pool_daily_fees_usd(&self, pool: Address) -> Result<f64> {
        let query = format!(
            r#"{{ poolDayDatas(first: 1, orderBy: date, orderDirection: desc, where: {{ pool: "{:?}" }}) {{ feesUSD }} }}"#,
            pool
        );
        let response: PoolDayDatasResponse = self
            .client
            .post(&self.url)
            .json(&json!({ "query": query }))
            .send()
            .await
            .context("Failed to query subgraph for pool day data")?
            .json()
            .await
            .context("Failed to parse subgraph pool day data response")?;

        match response.data.pool_day_datas.first() {
            Some(day) => day
                .fees_usd
                .parse()
                .context("Failed to parse pool daily fees as float"),
            None => Ok(0.0),
        }
    }
}
