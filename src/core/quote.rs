//! Quote chart abstractions and core types

use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Lookback window for a chart request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartRange {
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl ChartRange {
    const ALL: [ChartRange; 11] = [
        ChartRange::OneDay,
        ChartRange::FiveDays,
        ChartRange::OneMonth,
        ChartRange::ThreeMonths,
        ChartRange::SixMonths,
        ChartRange::OneYear,
        ChartRange::TwoYears,
        ChartRange::FiveYears,
        ChartRange::TenYears,
        ChartRange::YearToDate,
        ChartRange::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartRange::OneDay => "1d",
            ChartRange::FiveDays => "5d",
            ChartRange::OneMonth => "1mo",
            ChartRange::ThreeMonths => "3mo",
            ChartRange::SixMonths => "6mo",
            ChartRange::OneYear => "1y",
            ChartRange::TwoYears => "2y",
            ChartRange::FiveYears => "5y",
            ChartRange::TenYears => "10y",
            ChartRange::YearToDate => "ytd",
            ChartRange::Max => "max",
        }
    }
}

impl Display for ChartRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.to_lowercase();
        ChartRange::ALL
            .into_iter()
            .find(|r| r.as_str() == token)
            .ok_or_else(|| anyhow!("Invalid chart range: {}", s))
    }
}

/// Spacing between chart points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "2m")]
    TwoMinutes,
    #[default]
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "60m")]
    SixtyMinutes,
    #[serde(rename = "90m")]
    NinetyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
}

impl ChartInterval {
    const ALL: [ChartInterval; 13] = [
        ChartInterval::OneMinute,
        ChartInterval::TwoMinutes,
        ChartInterval::FiveMinutes,
        ChartInterval::FifteenMinutes,
        ChartInterval::ThirtyMinutes,
        ChartInterval::SixtyMinutes,
        ChartInterval::NinetyMinutes,
        ChartInterval::OneHour,
        ChartInterval::OneDay,
        ChartInterval::FiveDays,
        ChartInterval::OneWeek,
        ChartInterval::OneMonth,
        ChartInterval::ThreeMonths,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartInterval::OneMinute => "1m",
            ChartInterval::TwoMinutes => "2m",
            ChartInterval::FiveMinutes => "5m",
            ChartInterval::FifteenMinutes => "15m",
            ChartInterval::ThirtyMinutes => "30m",
            ChartInterval::SixtyMinutes => "60m",
            ChartInterval::NinetyMinutes => "90m",
            ChartInterval::OneHour => "1h",
            ChartInterval::OneDay => "1d",
            ChartInterval::FiveDays => "5d",
            ChartInterval::OneWeek => "1wk",
            ChartInterval::OneMonth => "1mo",
            ChartInterval::ThreeMonths => "3mo",
        }
    }
}

impl Display for ChartInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartInterval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.to_lowercase();
        ChartInterval::ALL
            .into_iter()
            .find(|i| i.as_str() == token)
            .ok_or_else(|| anyhow!("Invalid chart interval: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockDataPoint {
    /// Epoch seconds.
    pub timestamp: i64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMeta {
    pub symbol: String,
    pub regular_market_price: f64,
    pub previous_close: Option<f64>,
}

impl StockMeta {
    /// Absolute move since the previous close.
    pub fn change(&self) -> Option<f64> {
        self.previous_close
            .map(|prev| self.regular_market_price - prev)
    }

    pub fn change_percent(&self) -> Option<f64> {
        match self.previous_close {
            Some(prev) if prev != 0.0 => {
                Some((self.regular_market_price - prev) / prev * 100.0)
            }
            _ => None,
        }
    }
}

/// A normalized chart: metadata plus chronological points without gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub meta: StockMeta,
    pub data: Vec<StockDataPoint>,
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetches and normalizes a chart. Every failure is reported as `None`.
    async fn fetch_chart(
        &self,
        symbol: &str,
        range: ChartRange,
        interval: ChartInterval,
    ) -> Option<ChartData>;
}
