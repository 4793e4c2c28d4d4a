//! Polymarket price feed for next-data endpoints
//!
//! Polymarket server-renders its market pages with Next.js, which embeds a
//! build identifier in the HTML and serves the page data as JSON from a
//! `/_next/data/<buildId>/...` endpoint. The identifier rotates on every
//! site redeploy and a stale one answers HTTP 404.
//!
//! # Components
//! - `BuildIdResolver`: discovers the current build identifier from the
//!   market-listing page HTML
//! - `PriceFetcher`: fetches outcome prices for the tracked market and
//!   recovers from a stale identifier with a single resolve-and-retry cycle

pub mod error;
pub mod fetcher;
pub mod resolver;
pub mod types;

pub use error::FeedError;
pub use fetcher::PriceFetcher;
pub use resolver::BuildIdResolver;
pub use types::{MarketOutcome, PriceSnapshot};

/// Polymarket site base URL; both the listing page and the next-data
/// endpoint hang off it
pub const SITE_BASE: &str = "https://polymarket.com";

/// Listing page whose HTML carries the `"buildId":"..."` marker
pub const MARKETS_PAGE_PATH: &str = "/markets/crypto";

/// Ticker of the one market this tool watches
pub const TRACKED_TICKER: &str = "who-will-hbo-doc-identify-as-satoshi";
