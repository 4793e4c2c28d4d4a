//! Outcome price fetching with stale-id recovery
//!
//! The data endpoint is addressed by build identifier:
//! `GET <base>/_next/data/<buildId>/en/markets/crypto.json?slug=crypto`.
//! A 404 means the identifier went stale (site redeploy), which is
//! recovered by re-resolving and retrying the fetch exactly once. A 404 on
//! the retried request is terminal for that cycle; there is no recursion.

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::error::FeedError;
use crate::resolver::BuildIdResolver;
use crate::types::{MarketOutcome, MarketsPayload, PriceSnapshot};
use crate::{SITE_BASE, TRACKED_TICKER};

/// Fetches the current snapshot of outcome prices for the tracked ticker
///
/// Owns the resolver, which gives the single-writer discipline over the
/// build identifier: only `fetch` (via `&mut self`) ever triggers a
/// refresh.
pub struct PriceFetcher {
    client: Client,
    resolver: BuildIdResolver,
    base_url: String,
}

impl PriceFetcher {
    /// Create a fetcher against the production site
    pub fn new() -> Result<Self, FeedError> {
        Self::with_base_url(SITE_BASE)
    }

    /// Create a fetcher against a custom base URL
    pub fn with_base_url(base_url: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(FeedError::Network)?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let resolver = BuildIdResolver::new(client.clone(), &base_url);
        Ok(Self { client, resolver, base_url })
    }

    /// Resolve the initial build identifier. Intended as a startup
    /// precondition so a dead site fails fast instead of on the first poll.
    pub async fn resolve_build_id(&mut self) -> Result<String, FeedError> {
        self.resolver.refresh().await
    }

    /// Fetch, decode, and sort the current outcome prices
    ///
    /// Recovers from a stale build identifier (404) with one
    /// resolve-and-retry cycle; a 404 on the retried request surfaces as
    /// `UnexpectedStatus`. Any other failure ends the cycle immediately.
    pub async fn fetch(&mut self) -> Result<PriceSnapshot, FeedError> {
        let mut refreshed = false;

        loop {
            let build_id = match self.resolver.current() {
                Some(id) => id.to_string(),
                None => {
                    refreshed = true;
                    self.resolver.refresh().await?
                }
            };

            let url = format!(
                "{}/_next/data/{}/en/markets/crypto.json?slug=crypto",
                self.base_url, build_id
            );
            debug!("GET {}", url);

            let response = self.client.get(&url).send().await.map_err(FeedError::Network)?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await.map_err(FeedError::Network)?;
                    return parse_snapshot(&body);
                }
                StatusCode::NOT_FOUND if !refreshed => {
                    warn!("build id {} is stale, re-resolving", build_id);
                    refreshed = true;
                    self.resolver.refresh().await?;
                }
                status => return Err(FeedError::UnexpectedStatus(status)),
            }
        }
    }
}

/// Decode a next-data body into a sorted snapshot for the tracked ticker
fn parse_snapshot(body: &str) -> Result<PriceSnapshot, FeedError> {
    let payload: MarketsPayload = serde_json::from_str(body)
        .map_err(|e| FeedError::parse(format!("failed to decode response: {}", e)))?;

    let queries = payload.page_props.dehydrated_state.queries;
    let first = queries.into_iter().next().ok_or(FeedError::NoData)?;

    let mut outcomes = Vec::new();
    for entry in &first.state.data {
        if entry.ticker.as_deref() != Some(TRACKED_TICKER) {
            continue;
        }
        for market in &entry.markets {
            let raw = market
                .outcome_prices
                .first()
                .ok_or_else(|| FeedError::parse("market has no outcome prices"))?;
            let probability: f64 = raw
                .parse()
                .map_err(|_| FeedError::parse(format!("invalid price string: {:?}", raw)))?;

            outcomes.push(MarketOutcome {
                name: market.group_item_title.trim().to_string(),
                probability,
            });
        }
    }

    if outcomes.is_empty() {
        return Err(FeedError::NoData);
    }

    Ok(PriceSnapshot::new(outcomes))
}
