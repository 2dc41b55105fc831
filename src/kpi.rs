use crate::schema::{FactRecord, Measure, Scenario};
use crate::variance::{classify_favorability, calculate_variance, Favorability};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// Exact-zero comparison; unlike favorability there is no neutral band.
    pub fn from_variance(absolute_variance: f64) -> Self {
        if absolute_variance > 0.0 {
            Trend::Up
        } else if absolute_variance < 0.0 {
            Trend::Down
        } else {
            Trend::Flat
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KpiRecord {
    pub measure: Measure,
    pub name: String,
    pub actual: f64,
    pub budget: f64,
    pub variance: f64,
    pub variance_percent: f64,
    pub favorability: Favorability,
    pub trend: Trend,
}

/// One KPI per measure present in `facts`, in [`Measure`] declaration order.
///
/// Only `ACTUAL` and `BUDGET` facts contribute; forecasts are ignored.
pub fn roll_up_kpis(facts: &[FactRecord]) -> Vec<KpiRecord> {
    let mut sums: BTreeMap<Measure, (f64, f64)> = BTreeMap::new();

    for fact in facts {
        let entry = sums.entry(fact.measure).or_insert((0.0, 0.0));
        match fact.scenario {
            Scenario::Actual => entry.0 += fact.value,
            Scenario::Budget => entry.1 += fact.value,
            Scenario::Forecast => {}
        }
    }

    sums.into_iter()
        .map(|(measure, (actual, budget))| {
            let variance = calculate_variance(actual, budget);
            KpiRecord {
                measure,
                name: measure.name().to_string(),
                actual,
                budget,
                variance: variance.absolute_variance,
                variance_percent: variance.percent_variance,
                favorability: classify_favorability(
                    variance.percent_variance,
                    measure.is_revenue_type(),
                ),
                trend: Trend::from_variance(variance.absolute_variance),
            }
        })
        .collect()
}
