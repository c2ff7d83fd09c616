// =============================================================================
// Windowing & serialization
// =============================================================================
//
// The pipeline computes over the full history but reports only a short recent
// window. The last RECENT_DAYS days are taken and the very latest one is
// dropped, since its flags are provisional until the caller settles its own
// recency check. The most recent retained record also carries the last
// PRICE_HISTORY_LEN closes of the full series (the dropped day included).
//
// The date-keyed map is built only here; everything upstream works on the
// ordered series.
// =============================================================================

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::EngineError;
use crate::events::EventFlags;
use crate::indicators::IndicatorSet;
use crate::types::DailyBar;

/// Size of the trailing block the window is cut from (latest day included).
pub const RECENT_DAYS: usize = 10;
/// Number of trailing closes attached to the most recent record.
pub const PRICE_HISTORY_LEN: usize = 20;

/// Everything known about one retained day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    #[serde(flatten)]
    pub bar: DailyBar,
    #[serde(flatten)]
    pub indicators: IndicatorSet,
    #[serde(flatten)]
    pub events: EventFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_hist_over_past_month: Option<Vec<f64>>,
}

/// Date (`YYYY-MM-DD`) → record, in ascending date order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TechnicalReport {
    days: BTreeMap<String, DayRecord>,
}

impl TechnicalReport {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn get(&self, date: &str) -> Option<&DayRecord> {
        self.days.get(date)
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.days.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &DayRecord)> {
        self.days.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The most recent retained day.
    pub fn latest(&self) -> Option<(&str, &DayRecord)> {
        self.days.iter().next_back().map(|(k, v)| (k.as_str(), v))
    }
}

/// Cut the reporting window out of the fully computed series.
pub fn build_report(
    bars: Vec<DailyBar>,
    indicators: Vec<IndicatorSet>,
    events: Vec<EventFlags>,
) -> Result<TechnicalReport, EngineError> {
    let n = bars.len();
    if indicators.len() != n || events.len() != n {
        return Err(EngineError::computation(format!(
            "stage length mismatch: {n} bars, {} indicator sets, {} event sets",
            indicators.len(),
            events.len()
        )));
    }

    let start = n.saturating_sub(RECENT_DAYS);
    let end = n.saturating_sub(1);
    if start >= end {
        return Err(EngineError::computation(format!(
            "no trading days left after windowing ({n} bars)"
        )));
    }

    let price_hist: Vec<f64> = bars[n.saturating_sub(PRICE_HISTORY_LEN)..]
        .iter()
        .map(|b| b.close)
        .collect();

    let mut days = BTreeMap::new();
    for (i, ((bar, indicators), events)) in bars
        .into_iter()
        .zip(indicators)
        .zip(events)
        .enumerate()
        .take(end)
        .skip(start)
    {
        let price_hist_over_past_month = (i + 1 == end).then(|| price_hist.clone());
        days.insert(
            bar.date.format("%Y-%m-%d").to_string(),
            DayRecord {
                bar,
                indicators,
                events,
                price_hist_over_past_month,
            },
        );
    }

    Ok(TechnicalReport { days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::detect_events;
    use crate::indicators::compute_indicators;
    use crate::indicators::test_support::bars_with_closes;

    fn report_for(closes: &[f64]) -> Result<TechnicalReport, EngineError> {
        let bars = bars_with_closes(closes);
        let indicators = compute_indicators(&bars);
        let events = detect_events(&bars, &indicators);
        build_report(bars, indicators, events)
    }

    #[test]
    fn keeps_nine_days_excluding_latest() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let report = report_for(&closes).unwrap();
        assert_eq!(report.len(), RECENT_DAYS - 1);

        let bars = bars_with_closes(&closes);
        let expected: Vec<String> = bars[30..39]
            .iter()
            .map(|b| b.date.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(report.dates().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn only_latest_record_carries_price_history() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let report = report_for(&closes).unwrap();
        let (_, latest) = report.latest().unwrap();
        let hist = latest.price_hist_over_past_month.as_ref().unwrap();
        // Last 20 closes of the full series, dropped day included.
        assert_eq!(hist, &(21..=40).map(|x| x as f64).collect::<Vec<_>>());
        let with_hist = report
            .records()
            .filter(|(_, r)| r.price_hist_over_past_month.is_some())
            .count();
        assert_eq!(with_hist, 1);
    }

    #[test]
    fn short_history_keeps_all_but_latest() {
        let report = report_for(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(report.len(), 3);
        let (_, latest) = report.latest().unwrap();
        assert_eq!(latest.bar.close, 3.0);
        assert_eq!(latest.price_hist_over_past_month.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn single_bar_is_computation_error() {
        let err = report_for(&[1.0]).unwrap_err();
        assert!(matches!(err, EngineError::Computation(_)));
    }

    #[test]
    fn length_mismatch_is_computation_error() {
        let bars = bars_with_closes(&[1.0, 2.0, 3.0]);
        let err = build_report(bars, Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, EngineError::Computation(_)));
    }

    #[test]
    fn serialised_record_merges_all_parts() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let report = report_for(&closes).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        let map = json.as_object().unwrap();
        assert_eq!(map.len(), 9);

        let (latest_date, _) = report.latest().unwrap();
        let latest = &map[latest_date];
        assert_eq!(latest["收盘"], 39.0);
        assert!(latest.get("日期").is_none());
        assert!(latest.get("RSI").is_some());
        assert_eq!(latest["连续上涨天数"], 38);
        assert_eq!(latest["price_hist_over_past_month"].as_array().unwrap().len(), 20);

        let (first_date, _) = report.records().next().unwrap();
        assert!(map[first_date].get("price_hist_over_past_month").is_none());
    }
}
