//! # FP&A Analytics
//!
//! Variance, KPI roll-up and forecast engine behind an insurance FP&A dashboard.
//!
//! ## Core Concepts
//!
//! - **Fact records**: flat rows tagged with a period, optional dimension keys,
//!   a measure and a scenario (`ACTUAL`, `BUDGET`, `FORECAST`)
//! - **Variance**: actual minus budget, plus a fractional variance that is zero
//!   when the budget is zero
//! - **Favorability**: revenue-like measures are good when above budget,
//!   cost-like measures when below; variances under 1% are neutral
//! - **Forecasts**: moving average, year-over-year growth and CAGR projections
//!
//! The engine functions are pure and never fail. Errors only arise while
//! ingesting raw rows, parsing periods or validating a dashboard configuration.
//!
//! ## Example
//!
//! ```rust
//! use fpa_analytics::*;
//!
//! let facts = vec![
//!     FactRecord::new("2024-01", Measure::Revenue, Scenario::Actual, 100.0),
//!     FactRecord::new("2024-01", Measure::Revenue, Scenario::Budget, 90.0),
//! ];
//!
//! let kpis = roll_up_kpis(&facts);
//! assert_eq!(kpis[0].variance, 10.0);
//! assert_eq!(kpis[0].trend, Trend::Up);
//!
//! let projection = generate_forecast(&[10.0, 20.0, 30.0], ForecastMethod::MovingAverage, 2);
//! assert_eq!(projection, vec![20.0, 20.0]);
//! ```

pub mod adjustment;
pub mod aggregation;
pub mod briefing;
pub mod error;
pub mod forecast;
pub mod format;
pub mod ingestion;
pub mod kpi;
pub mod schema;
pub mod utils;
pub mod variance;

#[cfg(feature = "assistant")]
pub mod llm;

pub use adjustment::{adjust_facts, apply_scenario_adjustment, factors_for, ChangeFactor, ScenarioChanges};
pub use aggregation::{aggregate_by_dimension, period_series, ScenarioTotals, MISSING_DIMENSION_KEY};
pub use briefing::render_briefing;
pub use error::{FpaError, Result};
pub use forecast::{generate_forecast, ForecastMethod};
pub use format::*;
pub use ingestion::*;
pub use kpi::{roll_up_kpis, KpiRecord, Trend};
pub use schema::*;
pub use utils::{parse_period, sort_periods, Period};
pub use variance::{
    calculate_variance, classify_favorability, variance_result, Favorability, Variance,
    VarianceResult, NEUTRAL_THRESHOLD,
};

use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Upper bound on projected periods; five years of months.
pub const MAX_FORECAST_HORIZON: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastSettings {
    #[serde(default)]
    pub method: ForecastMethod,

    #[serde(default = "default_horizon")]
    #[schemars(description = "Number of future periods to project (at most 60)")]
    pub horizon: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            method: ForecastMethod::default(),
            horizon: default_horizon(),
        }
    }
}

fn default_horizon() -> usize {
    3
}

fn default_group_by() -> Dimension {
    Dimension::BusinessUnit
}

fn default_breakdown_measure() -> Measure {
    Measure::Revenue
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardConfig {
    pub title: String,

    #[serde(default = "default_group_by")]
    #[schemars(description = "Dimension used for the variance table")]
    pub group_by: Dimension,

    #[serde(default = "default_breakdown_measure")]
    #[schemars(description = "Measure broken down in the variance table")]
    pub breakdown_measure: Measure,

    #[serde(default)]
    pub forecast: ForecastSettings,

    #[serde(default)]
    #[schemars(description = "Optional what-if percentage changes applied to actuals")]
    pub scenario_changes: Option<ScenarioChanges>,
}

impl DashboardConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            group_by: default_group_by(),
            breakdown_measure: default_breakdown_measure(),
            forecast: ForecastSettings::default(),
            scenario_changes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BreakdownRow {
    pub key: String,
    pub totals: ScenarioTotals,
    pub variance: VarianceResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrendSeries {
    pub measure: Measure,
    /// (period, actual total) in chronological order
    pub points: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MeasureForecast {
    pub measure: Measure,
    pub method: ForecastMethod,
    pub last_actual_period: Option<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WhatIfLine {
    pub measure: Measure,
    pub base: f64,
    pub adjusted: f64,
    pub change: Variance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Dashboard {
    pub title: String,
    pub group_by: Dimension,
    pub breakdown_measure: Measure,
    pub kpis: Vec<KpiRecord>,
    pub breakdown: Vec<BreakdownRow>,
    pub trends: Vec<TrendSeries>,
    pub forecasts: Vec<MeasureForecast>,
    #[serde(default)]
    pub what_if: Vec<WhatIfLine>,
}

impl Dashboard {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Dashboard)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }

    pub fn kpi(&self, measure: Measure) -> Option<&KpiRecord> {
        self.kpis.iter().find(|k| k.measure == measure)
    }
}

pub struct FpaProcessor;

impl FpaProcessor {
    pub fn build(facts: &[FactRecord], config: &DashboardConfig) -> Result<Dashboard> {
        validate_dashboard_config(config)?;

        info!("Building dashboard '{}'", config.title);
        debug!(
            "Dashboard input contains {} facts, grouped by {:?}",
            facts.len(),
            config.group_by
        );

        let kpis = roll_up_kpis(facts);
        let breakdown = build_breakdown(facts, config.group_by, config.breakdown_measure);

        let measures: BTreeSet<Measure> = facts
            .iter()
            .filter(|f| f.scenario == Scenario::Actual)
            .map(|f| f.measure)
            .collect();

        let mut trends = Vec::with_capacity(measures.len());
        let mut forecasts = Vec::with_capacity(measures.len());

        for measure in measures {
            let points = period_series(facts, measure, Scenario::Actual);
            let history: Vec<f64> = points.iter().map(|(_, v)| *v).collect();

            forecasts.push(MeasureForecast {
                measure,
                method: config.forecast.method,
                last_actual_period: points.last().map(|(p, _)| p.clone()),
                values: generate_forecast(&history, config.forecast.method, config.forecast.horizon),
            });
            trends.push(TrendSeries { measure, points });
        }

        let what_if = config
            .scenario_changes
            .as_ref()
            .map(|changes| build_what_if(&kpis, changes))
            .unwrap_or_default();

        debug!(
            "Dashboard built with {} KPIs, {} breakdown rows and {} forecasts",
            kpis.len(),
            breakdown.len(),
            forecasts.len()
        );

        Ok(Dashboard {
            title: config.title.clone(),
            group_by: config.group_by,
            breakdown_measure: config.breakdown_measure,
            kpis,
            breakdown,
            trends,
            forecasts,
            what_if,
        })
    }

    pub fn build_from_json(facts_json: &str, config: &DashboardConfig) -> Result<Dashboard> {
        let facts = facts_from_json(facts_json)?;
        Self::build(&facts, config)
    }
}

pub fn build_dashboard(facts: &[FactRecord], config: &DashboardConfig) -> Result<Dashboard> {
    FpaProcessor::build(facts, config)
}

pub fn validate_dashboard_config(config: &DashboardConfig) -> Result<()> {
    if config.title.trim().is_empty() {
        return Err(FpaError::InvalidConfig("Title must not be empty".to_string()));
    }

    if config.forecast.horizon > MAX_FORECAST_HORIZON {
        return Err(FpaError::InvalidConfig(format!(
            "Forecast horizon {} exceeds the maximum of {} periods",
            config.forecast.horizon, MAX_FORECAST_HORIZON
        )));
    }

    if let Some(changes) = &config.scenario_changes {
        let all = [
            changes.price_change,
            changes.volume_change,
            changes.conversion_change,
            changes.retention_change,
            changes.opex_change,
            changes.loss_ratio_change,
        ];
        if all.iter().any(|pct| !pct.is_finite()) {
            return Err(FpaError::InvalidConfig(
                "Scenario changes must be finite percentages".to_string(),
            ));
        }
    }

    Ok(())
}

fn build_breakdown(facts: &[FactRecord], group_by: Dimension, measure: Measure) -> Vec<BreakdownRow> {
    let measure_facts: Vec<FactRecord> = facts
        .iter()
        .filter(|f| f.measure == measure)
        .cloned()
        .collect();

    aggregate_by_dimension(&measure_facts, group_by)
        .into_iter()
        .map(|(key, totals)| BreakdownRow {
            variance: variance_result(totals.actual, totals.budget, measure),
            key,
            totals,
        })
        .collect()
}

fn build_what_if(kpis: &[KpiRecord], changes: &ScenarioChanges) -> Vec<WhatIfLine> {
    kpis.iter()
        .map(|kpi| {
            let adjusted = apply_scenario_adjustment(kpi.actual, kpi.measure, changes);
            WhatIfLine {
                measure: kpi.measure,
                base: kpi.actual,
                adjusted,
                change: calculate_variance(adjusted, kpi.actual),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_facts() -> Vec<FactRecord> {
        vec![
            FactRecord::new("2024-01", Measure::Gwp, Scenario::Actual, 100.0)
                .with_dimension(Dimension::BusinessUnit, "Motor"),
            FactRecord::new("2024-02", Measure::Gwp, Scenario::Actual, 110.0)
                .with_dimension(Dimension::BusinessUnit, "Motor"),
            FactRecord::new("2024-01", Measure::Gwp, Scenario::Budget, 95.0)
                .with_dimension(Dimension::BusinessUnit, "Motor"),
            FactRecord::new("2024-02", Measure::Gwp, Scenario::Budget, 100.0)
                .with_dimension(Dimension::BusinessUnit, "Home"),
            FactRecord::new("2024-01", Measure::LossRatio, Scenario::Actual, 0.7),
            FactRecord::new("2024-01", Measure::LossRatio, Scenario::Budget, 0.6),
        ]
    }

    #[test]
    fn test_end_to_end_dashboard() {
        let mut config = DashboardConfig::new("Q1 Review");
        config.breakdown_measure = Measure::Gwp;
        config.forecast.horizon = 2;

        let dashboard = FpaProcessor::build(&sample_facts(), &config).unwrap();

        assert_eq!(dashboard.kpis.len(), 2);
        let gwp = dashboard.kpi(Measure::Gwp).unwrap();
        assert_eq!(gwp.actual, 210.0);
        assert_eq!(gwp.budget, 195.0);

        let loss = dashboard.kpi(Measure::LossRatio).unwrap();
        assert_eq!(loss.favorability, Favorability::Unfavorable);

        let keys: Vec<&str> = dashboard.breakdown.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["Home", "Motor"]);
        assert_eq!(dashboard.breakdown[0].variance.favorability, Favorability::Unfavorable);
        assert_eq!(dashboard.breakdown[1].totals.actual, 210.0);

        let gwp_forecast = dashboard
            .forecasts
            .iter()
            .find(|f| f.measure == Measure::Gwp)
            .unwrap();
        assert_eq!(gwp_forecast.values, vec![105.0, 105.0]);
        assert_eq!(gwp_forecast.last_actual_period.as_deref(), Some("2024-02"));
        assert!(dashboard.what_if.is_empty());
    }

    #[test]
    fn test_what_if_lines() {
        let mut config = DashboardConfig::new("What if");
        config.scenario_changes = Some(ScenarioChanges {
            price_change: 10.0,
            ..Default::default()
        });

        let dashboard = FpaProcessor::build(&sample_facts(), &config).unwrap();
        let gwp = dashboard
            .what_if
            .iter()
            .find(|l| l.measure == Measure::Gwp)
            .unwrap();
        assert!((gwp.adjusted - 231.0).abs() < 1e-9);
        assert!((gwp.change.percent_variance - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_config_validation() {
        let config = DashboardConfig::new("  ");
        assert!(matches!(
            validate_dashboard_config(&config),
            Err(FpaError::InvalidConfig(_))
        ));

        let mut config = DashboardConfig::new("Too far");
        config.forecast.horizon = MAX_FORECAST_HORIZON + 1;
        assert!(FpaProcessor::build(&[], &config).is_err());
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: DashboardConfig = serde_json::from_str(r#"{"title": "Monthly"}"#).unwrap();
        assert_eq!(config, DashboardConfig::new("Monthly"));
    }

    #[test]
    fn test_empty_facts_produce_empty_dashboard() {
        let dashboard = build_dashboard(&[], &DashboardConfig::new("Empty")).unwrap();
        assert!(dashboard.kpis.is_empty());
        assert!(dashboard.breakdown.is_empty());
        assert!(dashboard.forecasts.is_empty());
    }

    #[test]
    fn test_dashboard_schema_generation() {
        let schema_json = Dashboard::schema_as_json().unwrap();
        assert!(schema_json.contains("breakdown"));
        assert!(schema_json.contains("forecasts"));
    }
}
