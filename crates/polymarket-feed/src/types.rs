//! Payload model for the next-data endpoint and the snapshot types built
//! from it
//!
//! The JSON mirrors what Next.js dehydrates into the markets listing page:
//! `pageProps.dehydratedState.queries[].state.data[]`, where each data entry
//! may carry a market-group ticker and a list of markets. Field names match
//! the wire format exactly; prices arrive as string-encoded decimals.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ============================================================================
// Wire format (next-data JSON)
// ============================================================================

/// Top level of `/_next/data/<buildId>/en/markets/crypto.json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketsPayload {
    pub page_props: PageProps,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProps {
    pub dehydrated_state: DehydratedState,
}

#[derive(Debug, Deserialize)]
pub struct DehydratedState {
    #[serde(default)]
    pub queries: Vec<Query>,
}

#[derive(Debug, Deserialize)]
pub struct Query {
    pub state: QueryState,
}

#[derive(Debug, Deserialize)]
pub struct QueryState {
    #[serde(default)]
    pub data: Vec<DataEntry>,
}

/// One dehydrated entry; only entries carrying the tracked ticker are of
/// interest, the rest deserialize with both fields absent
#[derive(Debug, Deserialize)]
pub struct DataEntry {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    /// Ordered price strings, "yes" first
    #[serde(default)]
    pub outcome_prices: Vec<String>,
    /// Display label for this outcome within its market group
    #[serde(default)]
    pub group_item_title: String,
}

// ============================================================================
// Decoded snapshot
// ============================================================================

/// One named outcome with its reported probability
#[derive(Debug, Clone, PartialEq)]
pub struct MarketOutcome {
    /// Group-item title, trimmed of surrounding whitespace
    pub name: String,
    /// First outcome price, in [0, 1]
    pub probability: f64,
}

impl MarketOutcome {
    /// Probability formatted for display, e.g. 0.4321 -> "43.21%"
    pub fn display_probability(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}

/// Full set of outcomes for the tracked market at one point in time,
/// sorted descending by probability. Replaced wholesale on every
/// successful fetch.
#[derive(Debug, Clone)]
pub struct PriceSnapshot {
    pub outcomes: Vec<MarketOutcome>,
    pub fetched_at: DateTime<Utc>,
}

impl PriceSnapshot {
    /// Build a snapshot stamped with the current time, sorting outcomes
    /// descending by probability
    pub fn new(mut outcomes: Vec<MarketOutcome>) -> Self {
        outcomes.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        Self { outcomes, fetched_at: Utc::now() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_deserialization() {
        let json = r#"{
            "pageProps": {
                "dehydratedState": {
                    "queries": [{
                        "state": {
                            "data": [
                                {"slug": "unrelated"},
                                {
                                    "ticker": "some-market",
                                    "markets": [{
                                        "outcomePrices": ["0.42", "0.58"],
                                        "groupItemTitle": " Alice "
                                    }]
                                }
                            ]
                        }
                    }]
                }
            }
        }"#;

        let payload: MarketsPayload = serde_json::from_str(json).unwrap();
        let queries = &payload.page_props.dehydrated_state.queries;
        assert_eq!(queries.len(), 1);

        let data = &queries[0].state.data;
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].ticker, None);
        assert!(data[0].markets.is_empty());
        assert_eq!(data[1].ticker.as_deref(), Some("some-market"));
        assert_eq!(data[1].markets[0].outcome_prices[0], "0.42");
        assert_eq!(data[1].markets[0].group_item_title, " Alice ");
    }

    #[test]
    fn test_display_probability() {
        let outcome = MarketOutcome { name: "Alice".to_string(), probability: 0.4321 };
        assert_eq!(outcome.display_probability(), "43.21%");
    }

    #[test]
    fn test_snapshot_sorts_descending() {
        let snapshot = PriceSnapshot::new(vec![
            MarketOutcome { name: "Bob".to_string(), probability: 0.2 },
            MarketOutcome { name: "Alice".to_string(), probability: 0.7 },
            MarketOutcome { name: "Carol".to_string(), probability: 0.1 },
        ]);

        let names: Vec<&str> = snapshot.outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }
}
