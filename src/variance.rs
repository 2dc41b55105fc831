use crate::schema::Measure;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Variances with a magnitude below this are reported as neutral.
///
/// Variances handed to [`classify_favorability`] are fractions, so this is 1%.
pub const NEUTRAL_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Variance {
    pub absolute_variance: f64,
    /// Fraction of budget (0.05 = 5%). Zero when the budget is zero.
    pub percent_variance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Favorability {
    Favorable,
    Unfavorable,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VarianceResult {
    pub actual: f64,
    pub budget: f64,
    pub absolute_variance: f64,
    pub percent_variance: f64,
    pub favorability: Favorability,
}

pub fn calculate_variance(actual: f64, budget: f64) -> Variance {
    let absolute_variance = actual - budget;
    // A zero budget yields zero rather than infinity so downstream formatting stays safe.
    let percent_variance = if budget == 0.0 {
        0.0
    } else {
        absolute_variance / budget
    };

    Variance {
        absolute_variance,
        percent_variance,
    }
}

pub fn classify_favorability(variance: f64, is_revenue_type: bool) -> Favorability {
    if variance.abs() < NEUTRAL_THRESHOLD {
        return Favorability::Neutral;
    }

    if (variance > 0.0) == is_revenue_type {
        Favorability::Favorable
    } else {
        Favorability::Unfavorable
    }
}

/// Full variance result for one measure, classified on the fractional variance.
pub fn variance_result(actual: f64, budget: f64, measure: Measure) -> VarianceResult {
    variance_result_with_polarity(actual, budget, measure.is_revenue_type())
}

pub(crate) fn variance_result_with_polarity(
    actual: f64,
    budget: f64,
    is_revenue_type: bool,
) -> VarianceResult {
    let variance = calculate_variance(actual, budget);

    VarianceResult {
        actual,
        budget,
        absolute_variance: variance.absolute_variance,
        percent_variance: variance.percent_variance,
        favorability: classify_favorability(variance.percent_variance, is_revenue_type),
    }
}
