use crate::schema::{FactRecord, Measure, Scenario};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Named percentage changes for a what-if scenario. Missing keys mean 0%.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioChanges {
    pub price_change: f64,
    pub volume_change: f64,
    pub conversion_change: f64,
    pub retention_change: f64,
    pub opex_change: f64,
    pub loss_ratio_change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFactor {
    Price,
    Volume,
    Conversion,
    Retention,
    Opex,
    LossRatio,
}

impl ScenarioChanges {
    pub fn percent(&self, factor: ChangeFactor) -> f64 {
        match factor {
            ChangeFactor::Price => self.price_change,
            ChangeFactor::Volume => self.volume_change,
            ChangeFactor::Conversion => self.conversion_change,
            ChangeFactor::Retention => self.retention_change,
            ChangeFactor::Opex => self.opex_change,
            ChangeFactor::LossRatio => self.loss_ratio_change,
        }
    }
}

/// The change factors that move each measure. An empty slice leaves it untouched.
pub fn factors_for(measure: Measure) -> &'static [ChangeFactor] {
    use ChangeFactor::*;

    match measure {
        Measure::Revenue => &[Price, Volume],
        Measure::Gwp | Measure::Nep => &[Price, Volume, Retention],
        Measure::Cogs => &[Volume],
        Measure::Opex => &[Opex],
        Measure::ClaimsIncurred | Measure::LossRatio => &[LossRatio],
        Measure::PolicyCount => &[Volume, Conversion, Retention],
        Measure::ConversionRate => &[Conversion],
        Measure::RetentionRate => &[Retention],
        Measure::GrossProfit
        | Measure::Ebitda
        | Measure::NetIncome
        | Measure::ExpenseRatio
        | Measure::CombinedRatio
        | Measure::Headcount => &[],
    }
}

/// Compounds every applicable change onto `base` as `(1 + pct / 100)`.
pub fn apply_scenario_adjustment(base: f64, measure: Measure, changes: &ScenarioChanges) -> f64 {
    factors_for(measure)
        .iter()
        .fold(base, |value, factor| {
            value * (1.0 + changes.percent(*factor) / 100.0)
        })
}

/// Builds a what-if copy of `facts`: values adjusted and re-tagged as forecasts.
pub fn adjust_facts(facts: &[FactRecord], changes: &ScenarioChanges) -> Vec<FactRecord> {
    facts
        .iter()
        .map(|fact| FactRecord {
            value: apply_scenario_adjustment(fact.value, fact.measure, changes),
            scenario: Scenario::Forecast,
            ..fact.clone()
        })
        .collect()
}
