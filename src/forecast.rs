use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const MOVING_AVERAGE_WINDOW: usize = 3;
const PERIODS_PER_YEAR: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ForecastMethod {
    #[default]
    #[schemars(description = "Flat projection of the mean of the last three observations")]
    MovingAverage,

    #[schemars(
        description = "Average year-over-year growth of the last twelve observations, compounded from the last value"
    )]
    YoyGrowth,

    #[schemars(description = "Constant compound growth rate over the whole history")]
    Cagr,
}

/// Projects `horizon` future values from a chronologically ordered history.
///
/// An empty history always yields an empty projection. Zero or negative
/// denominators are not guarded; NaN and infinity propagate into the result.
///
/// [`ForecastMethod::YoyGrowth`] needs at least 13 observations, so that one
/// value has a counterpart twelve periods earlier. With 12 or fewer the last
/// observed value is repeated for every projected period.
pub fn generate_forecast(history: &[f64], method: ForecastMethod, horizon: usize) -> Vec<f64> {
    let Some(&last) = history.last() else {
        return Vec::new();
    };

    match method {
        ForecastMethod::MovingAverage => {
            vec![moving_average(history, MOVING_AVERAGE_WINDOW); horizon]
        }
        ForecastMethod::YoyGrowth => match yoy_growth_rate(history) {
            Some(rate) => compound(last, rate, horizon),
            None => vec![last; horizon],
        },
        ForecastMethod::Cagr => match cagr(history) {
            Some(rate) => compound(last, rate, horizon),
            None => vec![last; horizon],
        },
    }
}

/// Mean of the last `min(window, len)` values. Callers guarantee a non-empty slice.
fn moving_average(history: &[f64], window: usize) -> f64 {
    let window = window.min(history.len());
    let tail = &history[history.len() - window..];
    tail.iter().sum::<f64>() / window as f64
}

/// Averages `(curr - prev) / prev` where `prev` sits twelve periods before `curr`,
/// over the last (up to) twelve observations that have such a predecessor.
///
/// With 24 or more observations this compares the last year against the year
/// before it. Returns `None` when no pair exists.
pub fn yoy_growth_rate(history: &[f64]) -> Option<f64> {
    if history.len() <= PERIODS_PER_YEAR {
        return None;
    }

    let pairs = (history.len() - PERIODS_PER_YEAR).min(PERIODS_PER_YEAR);
    let start = history.len() - pairs;

    let total: f64 = (start..history.len())
        .map(|i| {
            let prev = history[i - PERIODS_PER_YEAR];
            (history[i] - prev) / prev
        })
        .sum();

    Some(total / pairs as f64)
}

/// `(last / first)^(1 / (n - 1)) - 1`, or `None` with fewer than two observations.
pub fn cagr(history: &[f64]) -> Option<f64> {
    if history.len() < 2 {
        return None;
    }

    let first = history[0];
    let last = history[history.len() - 1];
    let periods = (history.len() - 1) as f64;

    Some((last / first).powf(1.0 / periods) - 1.0)
}

fn compound(start: f64, rate: f64, horizon: usize) -> Vec<f64> {
    let mut value = start;
    (0..horizon)
        .map(|_| {
            value *= 1.0 + rate;
            value
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn test_moving_average_repeats_mean_of_last_three() {
        let result = generate_forecast(&[10.0, 20.0, 30.0], ForecastMethod::MovingAverage, 2);
        assert_eq!(result, vec![20.0, 20.0]);

        let result = generate_forecast(
            &[1000.0, 10.0, 20.0, 30.0],
            ForecastMethod::MovingAverage,
            1,
        );
        assert_eq!(result, vec![20.0]);
    }

    #[test]
    fn test_moving_average_short_history() {
        let result = generate_forecast(&[8.0], ForecastMethod::MovingAverage, 3);
        assert_eq!(result, vec![8.0, 8.0, 8.0]);

        let result = generate_forecast(&[4.0, 8.0], ForecastMethod::MovingAverage, 1);
        assert_eq!(result, vec![6.0]);
    }

    #[test]
    fn test_cagr_doubles() {
        let result = generate_forecast(&[100.0, 200.0], ForecastMethod::Cagr, 1);
        assert_close(&result, &[400.0]);
    }

    #[test]
    fn test_cagr_compounds_constant_rate() {
        let result = generate_forecast(&[100.0, 110.0, 121.0], ForecastMethod::Cagr, 2);
        assert_close(&result, &[133.1, 146.41]);
    }

    #[test]
    fn test_cagr_single_observation_repeats() {
        let result = generate_forecast(&[42.0], ForecastMethod::Cagr, 2);
        assert_eq!(result, vec![42.0, 42.0]);
    }

    #[test]
    fn test_yoy_short_history_repeats_last() {
        let result = generate_forecast(&[5.0, 6.0, 7.0], ForecastMethod::YoyGrowth, 3);
        assert_eq!(result, vec![7.0, 7.0, 7.0]);

        let year: Vec<f64> = (1..=12).map(f64::from).collect();
        let result = generate_forecast(&year, ForecastMethod::YoyGrowth, 2);
        assert_eq!(result, vec![12.0, 12.0]);
    }

    #[test]
    fn test_yoy_two_full_years() {
        let mut history: Vec<f64> = vec![100.0; 12];
        history.extend(vec![110.0; 12]);

        let result = generate_forecast(&history, ForecastMethod::YoyGrowth, 2);
        assert_close(&result, &[121.0, 133.1]);
    }

    #[test]
    fn test_yoy_uses_only_last_twelve_pairs() {
        // The first year's growth must not leak into the rate.
        let mut history: Vec<f64> = vec![10.0; 12];
        history.extend(vec![100.0; 12]);
        history.extend(vec![150.0; 12]);

        let rate = yoy_growth_rate(&history).unwrap();
        assert!((rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_yoy_partial_second_year() {
        let mut history: Vec<f64> = vec![100.0; 12];
        history.extend([120.0, 130.0]);

        let rate = yoy_growth_rate(&history).unwrap();
        assert!((rate - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_empty_history_yields_empty_projection() {
        for method in [
            ForecastMethod::MovingAverage,
            ForecastMethod::YoyGrowth,
            ForecastMethod::Cagr,
        ] {
            assert!(generate_forecast(&[], method, 5).is_empty());
        }
    }

    #[test]
    fn test_zero_horizon() {
        assert!(generate_forecast(&[1.0, 2.0], ForecastMethod::Cagr, 0).is_empty());
    }

    #[test]
    fn test_zero_first_value_propagates_infinity() {
        let result = generate_forecast(&[0.0, 10.0], ForecastMethod::Cagr, 1);
        assert!(result[0].is_infinite());
    }
}
