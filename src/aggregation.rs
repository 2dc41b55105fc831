use crate::schema::{Dimension, FactRecord, Measure, Scenario};
use crate::utils::compare_period_keys;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bucket key used for facts that carry no value for the grouping dimension.
pub const MISSING_DIMENSION_KEY: &str = "N/A";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioTotals {
    pub actual: f64,
    pub budget: f64,
    pub forecast: f64,
}

impl ScenarioTotals {
    pub fn add(&mut self, scenario: Scenario, value: f64) {
        match scenario {
            Scenario::Actual => self.actual += value,
            Scenario::Budget => self.budget += value,
            Scenario::Forecast => self.forecast += value,
        }
    }
}

/// Sums facts per distinct value of `dimension`, split by scenario.
///
/// Facts with no value for the dimension land in the [`MISSING_DIMENSION_KEY`]
/// bucket. Scenarios never seen in a bucket read as zero.
pub fn aggregate_by_dimension(
    facts: &[FactRecord],
    dimension: Dimension,
) -> BTreeMap<String, ScenarioTotals> {
    let mut buckets: BTreeMap<String, ScenarioTotals> = BTreeMap::new();

    for fact in facts {
        let key = fact.dimension(dimension).unwrap_or(MISSING_DIMENSION_KEY);
        buckets
            .entry(key.to_string())
            .or_default()
            .add(fact.scenario, fact.value);
    }

    buckets
}

/// Per-period totals of one measure and scenario, in chronological order.
///
/// This is the series behind trend charts and the history fed to forecasts.
pub fn period_series(
    facts: &[FactRecord],
    measure: Measure,
    scenario: Scenario,
) -> Vec<(String, f64)> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();

    for fact in facts
        .iter()
        .filter(|f| f.measure == measure && f.scenario == scenario)
    {
        *totals.entry(fact.period.as_str()).or_insert(0.0) += fact.value;
    }

    let mut series: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(period, value)| (period.to_string(), value))
        .collect();
    series.sort_by(|a, b| compare_period_keys(&a.0, &b.0));
    series
}
