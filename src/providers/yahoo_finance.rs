use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::core::quote::{
    ChartData, ChartInterval, ChartRange, QuoteProvider, StockDataPoint, StockMeta,
};

/// Chart provider for the Yahoo Finance v8 chart API.
pub struct YahooChartProvider {
    base_url: String,
}

impl YahooChartProvider {
    pub fn new(base_url: &str) -> Self {
        YahooChartProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn try_fetch_chart(
        &self,
        symbol: &str,
        range: ChartRange,
        interval: ChartInterval,
    ) -> Result<Option<ChartData>> {
        let url = chart_url(&self.base_url, symbol, range, interval)?;
        debug!("Requesting chart data from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("walletwatch/1.0")
            .build()?;
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        let Some(item) = data.chart.result.and_then(|r| r.into_iter().next()) else {
            debug!("Empty chart result for {}", symbol);
            return Ok(None);
        };

        normalize(symbol, item).map(Some)
    }
}

/// Builds `{base}/v8/finance/chart/{symbol}?range=..&interval=..` with the
/// symbol escaped as a single path segment.
fn chart_url(
    base_url: &str,
    symbol: &str,
    range: ChartRange,
    interval: ChartInterval,
) -> Result<Url> {
    let mut url =
        Url::parse(base_url).with_context(|| format!("Invalid chart base URL: {base_url}"))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Chart base URL cannot have a path: {base_url}"))?
        .pop_if_empty()
        .extend(["v8", "finance", "chart", symbol]);
    url.query_pairs_mut()
        .append_pair("range", range.as_str())
        .append_pair("interval", interval.as_str());
    Ok(url)
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: Option<String>,
    regular_market_price: f64,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
}

/// Zips timestamps with close prices, skipping points without a price.
fn normalize(requested_symbol: &str, item: ChartItem) -> Result<ChartData> {
    let quote = item
        .indicators
        .and_then(|inds| inds.quote.into_iter().next())
        .ok_or_else(|| anyhow!("Missing quote indicators for symbol: {}", requested_symbol))?;

    let timestamps = item.timestamp.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();

    let data = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &timestamp)| {
            closes
                .get(i)
                .copied()
                .flatten()
                .map(|price| StockDataPoint { timestamp, price })
        })
        .collect();

    let meta = StockMeta {
        symbol: item
            .meta
            .symbol
            .unwrap_or_else(|| requested_symbol.to_string()),
        regular_market_price: item.meta.regular_market_price,
        previous_close: item.meta.previous_close.or(item.meta.chart_previous_close),
    };

    Ok(ChartData { meta, data })
}

#[async_trait]
impl QuoteProvider for YahooChartProvider {
    #[instrument(
        name = "YahooChartFetch",
        skip(self),
        fields(symbol = %symbol, range = %range, interval = %interval)
    )]
    async fn fetch_chart(
        &self,
        symbol: &str,
        range: ChartRange,
        interval: ChartInterval,
    ) -> Option<ChartData> {
        match self.try_fetch_chart(symbol, range, interval).await {
            Ok(chart) => chart,
            Err(e) => {
                warn!(error = %e, "Chart fetch failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(symbol: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        let request_path = format!("/v8/finance/chart/{symbol}");

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_chart_fetch() {
        let mock_response = r#"{
            "chart": {
                "result": [{
                    "meta": {
                        "symbol": "AAPL",
                        "regularMarketPrice": 150.00,
                        "previousClose": 145.00
                    },
                    "timestamp": [1620000000, 1620003600],
                    "indicators": {
                        "quote": [{
                            "close": [150.00, 151.00]
                        }]
                    }
                }]
            }
        }"#;

        let mock_server = create_mock_server("AAPL", mock_response).await;
        let provider = YahooChartProvider::new(&mock_server.uri());

        let chart = provider
            .fetch_chart("AAPL", ChartRange::OneDay, ChartInterval::FiveMinutes)
            .await
            .expect("chart should be present");

        assert_eq!(chart.meta.symbol, "AAPL");
        assert_eq!(chart.meta.regular_market_price, 150.0);
        assert_eq!(chart.meta.previous_close, Some(145.0));
        assert_eq!(chart.data.len(), 2);
        assert_eq!(
            chart.data[0],
            StockDataPoint {
                timestamp: 1620000000,
                price: 150.0
            }
        );
        assert_eq!(chart.data[1].price, 151.0);
    }

    #[tokio::test]
    async fn test_request_carries_range_and_interval() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/MSFT"))
            .and(query_param("range", "1mo"))
            .and(query_param("interval", "1d"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"chart": {"result": [{
                    "meta": {"symbol": "MSFT", "regularMarketPrice": 400.0},
                    "timestamp": [1],
                    "indicators": {"quote": [{"close": [399.5]}]}
                }]}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = YahooChartProvider::new(&mock_server.uri());
        let chart = provider
            .fetch_chart("MSFT", ChartRange::OneMonth, ChartInterval::OneDay)
            .await;

        assert!(chart.is_some());
    }

    #[tokio::test]
    async fn test_null_closes_are_dropped() {
        let mock_response = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL", "regularMarketPrice": 152.0},
                    "timestamp": [1620000000, 1620000300, 1620000600],
                    "indicators": {"quote": [{"close": [150.0, null, 152.0]}]}
                }]
            }
        }"#;

        let mock_server = create_mock_server("AAPL", mock_response).await;
        let provider = YahooChartProvider::new(&mock_server.uri());
        let chart = provider
            .fetch_chart("AAPL", ChartRange::OneDay, ChartInterval::FiveMinutes)
            .await
            .unwrap();

        assert_eq!(
            chart.data,
            vec![
                StockDataPoint {
                    timestamp: 1620000000,
                    price: 150.0
                },
                StockDataPoint {
                    timestamp: 1620000600,
                    price: 152.0
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_previous_close_falls_back_to_chart_previous_close() {
        let mock_response = r#"{
            "chart": {
                "result": [{
                    "meta": {
                        "symbol": "TSLA",
                        "regularMarketPrice": 240.0,
                        "chartPreviousClose": 250.0
                    },
                    "timestamp": [],
                    "indicators": {"quote": [{}]}
                }]
            }
        }"#;

        let mock_server = create_mock_server("TSLA", mock_response).await;
        let provider = YahooChartProvider::new(&mock_server.uri());
        let chart = provider
            .fetch_chart("TSLA", ChartRange::OneDay, ChartInterval::FiveMinutes)
            .await
            .unwrap();

        assert_eq!(chart.meta.previous_close, Some(250.0));
        assert!(chart.data.is_empty());
    }

    #[tokio::test]
    async fn test_missing_symbol_uses_requested_one() {
        let mock_response = r#"{
            "chart": {
                "result": [{
                    "meta": {"regularMarketPrice": 10.0},
                    "indicators": {"quote": [{"close": [10.0]}]}
                }]
            }
        }"#;

        let mock_server = create_mock_server("GOOGL", mock_response).await;
        let provider = YahooChartProvider::new(&mock_server.uri());
        let chart = provider
            .fetch_chart("GOOGL", ChartRange::OneDay, ChartInterval::FiveMinutes)
            .await
            .unwrap();

        assert_eq!(chart.meta.symbol, "GOOGL");
        assert!(chart.meta.previous_close.is_none());
        // No timestamps means no points even if closes exist
        assert!(chart.data.is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_is_none() {
        let mock_server = create_mock_server("INVALID", r#"{"chart": {"result": []}}"#).await;
        let provider = YahooChartProvider::new(&mock_server.uri());
        let chart = provider
            .fetch_chart("INVALID", ChartRange::OneDay, ChartInterval::FiveMinutes)
            .await;
        assert!(chart.is_none());
    }

    #[tokio::test]
    async fn test_null_result_with_error_is_none() {
        let mock_response = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;
        let mock_server = create_mock_server("GONE", mock_response).await;
        let provider = YahooChartProvider::new(&mock_server.uri());
        assert!(
            provider
                .fetch_chart("GONE", ChartRange::OneDay, ChartInterval::FiveMinutes)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_missing_indicators_is_none() {
        let mock_response = r#"{
            "chart": {"result": [{"meta": {"symbol": "AAPL", "regularMarketPrice": 1.0}}]}
        }"#;
        let mock_server = create_mock_server("AAPL", mock_response).await;
        let provider = YahooChartProvider::new(&mock_server.uri());
        assert!(
            provider
                .fetch_chart("AAPL", ChartRange::OneDay, ChartInterval::FiveMinutes)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_api_error_response_is_none() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/INVALID"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let provider = YahooChartProvider::new(&mock_server.uri());
        let chart = provider
            .fetch_chart("INVALID", ChartRange::OneDay, ChartInterval::FiveMinutes)
            .await;
        assert!(chart.is_none());
    }

    #[tokio::test]
    async fn test_malformed_response_is_none() {
        for body in ["<html>oops", r#"{"chart": {"result": [{"meta": {}}]}}"#] {
            let mock_server = create_mock_server("AAPL", body).await;
            let provider = YahooChartProvider::new(&mock_server.uri());
            let chart = provider
                .fetch_chart("AAPL", ChartRange::OneDay, ChartInterval::FiveMinutes)
                .await;
            assert!(chart.is_none(), "expected no chart for body {body}");
        }
    }

    #[test]
    fn test_chart_url_escapes_symbol() {
        let url = chart_url(
            "https://example.com/",
            "A&range=max?x#y",
            ChartRange::OneMonth,
            ChartInterval::OneDay,
        )
        .unwrap();

        assert_eq!(url.path(), "/v8/finance/chart/A&range=max%3Fx%23y");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("range".to_string(), "1mo".to_string()),
                ("interval".to_string(), "1d".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_symbol_with_reserved_characters_stays_in_path() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v8/finance/chart/BRK%3FB"))
            .and(query_param("range", "1d"))
            .and(query_param("interval", "5m"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"chart": {"result": [{
                    "meta": {"regularMarketPrice": 410.0},
                    "timestamp": [1],
                    "indicators": {"quote": [{"close": [409.0]}]}
                }]}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = YahooChartProvider::new(&mock_server.uri());
        let chart = provider
            .fetch_chart("BRK?B", ChartRange::OneDay, ChartInterval::FiveMinutes)
            .await
            .expect("chart should be present");
        assert_eq!(chart.meta.symbol, "BRK?B");
    }

    #[tokio::test]
    async fn test_transport_error_is_none() {
        // Nothing listens on port 1
        let provider = YahooChartProvider::new("http://127.0.0.1:1");
        let chart = provider
            .fetch_chart("AAPL", ChartRange::OneDay, ChartInterval::FiveMinutes)
            .await;
        assert!(chart.is_none());
    }
}
