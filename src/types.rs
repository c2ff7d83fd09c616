// =============================================================================
// Shared types used across the technical-events engine
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of price/volume history for a single security.
///
/// Field names on the wire follow the market-data provider's column names so
/// that raw bars can be read from, and written back to, provider-shaped JSON
/// without a mapping layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Identity key of the bar. Not serialized: in reports the date is the
    /// record key.
    #[serde(rename = "日期", skip_serializing)]
    pub date: NaiveDate,
    #[serde(rename = "开盘")]
    pub open: f64,
    #[serde(rename = "收盘")]
    pub close: f64,
    #[serde(rename = "最高")]
    pub high: f64,
    #[serde(rename = "最低")]
    pub low: f64,
    #[serde(rename = "成交量")]
    pub volume: f64,
    #[serde(rename = "成交额", default)]
    pub turnover: f64,
    /// Intraday amplitude, percent.
    #[serde(rename = "振幅", default)]
    pub amplitude_pct: f64,
    /// Day-over-day change, percent.
    #[serde(rename = "涨跌幅", default)]
    pub change_pct: f64,
    #[serde(rename = "涨跌额", default, skip_serializing_if = "Option::is_none")]
    pub change_amount: Option<f64>,
    /// Share of float traded, percent.
    #[serde(rename = "换手率", default)]
    pub turnover_rate_pct: f64,
}

/// Price adjustment requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjust {
    /// Forward-adjusted (前复权).
    Qfq,
    /// Backward-adjusted (后复权).
    Hfq,
    /// Unadjusted.
    None,
}

impl Default for Adjust {
    fn default() -> Self {
        Self::Qfq
    }
}

impl std::fmt::Display for Adjust {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Qfq => write!(f, "qfq"),
            Self::Hfq => write!(f, "hfq"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Which collaborator supplies raw daily bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Eastmoney,
    JsonDir,
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Eastmoney
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eastmoney => write!(f, "eastmoney"),
            Self::JsonDir => write!(f, "json_dir"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eastmoney" => Ok(Self::Eastmoney),
            "json_dir" | "json" => Ok(Self::JsonDir),
            other => anyhow::bail!("unknown provider kind: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_deserialises_from_provider_columns() {
        let json = r#"{
            "日期": "2024-03-01",
            "开盘": 10.0, "收盘": 10.5, "最高": 10.8, "最低": 9.9,
            "成交量": 12000, "成交额": 126000.0,
            "振幅": 9.0, "涨跌幅": 5.0, "涨跌额": 0.5, "换手率": 1.2
        }"#;
        let bar: DailyBar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!((bar.close - 10.5).abs() < 1e-10);
        assert_eq!(bar.change_amount, Some(0.5));
    }

    #[test]
    fn bar_optional_columns_default() {
        let json = r#"{"日期":"2024-03-01","开盘":1,"收盘":2,"最高":3,"最低":0.5,"成交量":10}"#;
        let bar: DailyBar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.turnover_rate_pct, 0.0);
        assert!(bar.change_amount.is_none());
    }

    #[test]
    fn bar_serialisation_omits_date() {
        let json = r#"{"日期":"2024-03-01","开盘":1,"收盘":2,"最高":3,"最低":0.5,"成交量":10}"#;
        let bar: DailyBar = serde_json::from_str(json).unwrap();
        let out = serde_json::to_value(&bar).unwrap();
        assert!(out.get("日期").is_none());
        assert!(out.get("涨跌额").is_none());
        assert_eq!(out["收盘"], 2.0);
    }

    #[test]
    fn provider_kind_parses() {
        assert_eq!("eastmoney".parse::<ProviderKind>().unwrap(), ProviderKind::Eastmoney);
        assert_eq!("JSON_DIR".parse::<ProviderKind>().unwrap(), ProviderKind::JsonDir);
        assert!("yahoo".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn adjust_default_is_forward() {
        assert_eq!(Adjust::default(), Adjust::Qfq);
        let a: Adjust = serde_json::from_str("\"hfq\"").unwrap();
        assert_eq!(a, Adjust::Hfq);
        assert_eq!(a.to_string(), "hfq");
    }
}
