// =============================================================================
// Eastmoney daily-kline REST source
// =============================================================================
//
// GET /api/qt/stock/kline/get returns one comma-separated string per trading
// day:
//
//   date,open,close,high,low,volume,turnover,amplitude,change_pct,
//   change_amount,turnover_rate
//
// A `null` data object or an empty kline list means the provider has nothing
// for the symbol in the requested span. The source never retries.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures_util::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::normalize::FetchSpan;
use super::BarSource;
use crate::types::{Adjust, DailyBar};

/// Public token the web front-end sends with every kline request.
const UT_TOKEN: &str = "7eea3edcaed734bea9cbfc24409ed989";
/// Kline period code for daily bars.
const DAILY_KLT: &str = "101";
const FIELDS1: &str = "f1,f2,f3,f4,f5,f6";
const FIELDS2: &str = "f51,f52,f53,f54,f55,f56,f57,f58,f59,f60,f61";

#[derive(Debug, Deserialize)]
struct KlineResponse {
    data: Option<KlineData>,
}

#[derive(Debug, Deserialize)]
struct KlineData {
    #[serde(default)]
    klines: Vec<String>,
}

/// Eastmoney kline client.
#[derive(Clone)]
pub struct EastmoneyClient {
    base_url: String,
    adjust: Adjust,
    client: reqwest::Client,
}

impl EastmoneyClient {
    pub fn new(base_url: impl Into<String>, adjust: Adjust, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, adjust = %adjust, "EastmoneyClient initialised");

        Ok(Self {
            base_url,
            adjust,
            client,
        })
    }

    /// GET /api/qt/stock/kline/get for the daily bars of `symbol` in `span`.
    #[instrument(skip(self), name = "eastmoney::fetch_daily")]
    pub async fn get_daily_klines(&self, symbol: &str, span: FetchSpan) -> Result<Vec<DailyBar>> {
        let url = format!("{}/api/qt/stock/kline/get", self.base_url);
        let secid = secid(symbol);
        let beg = span.start.format("%Y%m%d").to_string();
        let end = span.end.format("%Y%m%d").to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("fields1", FIELDS1),
                ("fields2", FIELDS2),
                ("ut", UT_TOKEN),
                ("klt", DAILY_KLT),
                ("fqt", fqt(self.adjust)),
                ("secid", secid.as_str()),
                ("beg", beg.as_str()),
                ("end", end.as_str()),
            ])
            .send()
            .await
            .context("GET /api/qt/stock/kline/get request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("Eastmoney kline endpoint returned {status}");
        }

        let body: KlineResponse = resp
            .json()
            .await
            .context("failed to parse kline response")?;

        let lines = body.data.map(|d| d.klines).unwrap_or_default();
        let bars = lines
            .iter()
            .map(|line| parse_kline_line(line))
            .collect::<Result<Vec<_>>>()?;

        debug!(symbol, bars = bars.len(), "daily klines retrieved");
        Ok(bars)
    }
}

impl BarSource for EastmoneyClient {
    fn name(&self) -> &'static str {
        "eastmoney"
    }

    fn fetch_daily<'a>(&'a self, symbol: &'a str, span: FetchSpan) -> BoxFuture<'a, Result<Vec<DailyBar>>> {
        self.get_daily_klines(symbol, span).boxed()
    }
}

/// Market-qualified security id: Shanghai codes start with `6`.
pub fn secid(symbol: &str) -> String {
    let market = if symbol.starts_with('6') { 1 } else { 0 };
    format!("{market}.{symbol}")
}

fn fqt(adjust: Adjust) -> &'static str {
    match adjust {
        Adjust::None => "0",
        Adjust::Qfq => "1",
        Adjust::Hfq => "2",
    }
}

/// Parse one kline string into a bar.
pub fn parse_kline_line(line: &str) -> Result<DailyBar> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 11 {
        anyhow::bail!("kline has {} fields, expected 11: {line}", fields.len());
    }

    let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
        .with_context(|| format!("failed to parse kline date: {}", fields[0]))?;

    Ok(DailyBar {
        date,
        open: parse_f64(fields[1], "open")?,
        close: parse_f64(fields[2], "close")?,
        high: parse_f64(fields[3], "high")?,
        low: parse_f64(fields[4], "low")?,
        volume: parse_f64(fields[5], "volume")?,
        turnover: parse_f64(fields[6], "turnover")?,
        amplitude_pct: parse_f64(fields[7], "amplitude")?,
        change_pct: parse_f64(fields[8], "change_pct")?,
        change_amount: Some(parse_f64(fields[9], "change_amount")?),
        turnover_rate_pct: parse_f64(fields[10], "turnover_rate")?,
    })
}

fn parse_f64(raw: &str, name: &str) -> Result<f64> {
    raw.parse::<f64>()
        .with_context(|| format!("failed to parse {name} as f64: {raw}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
