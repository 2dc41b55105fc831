//! Markdown rendering of a dashboard, used as assistant context and slide text.

use crate::format::{format_currency, format_percent, format_variance, format_variance_percent};
use crate::kpi::Trend;
use crate::variance::Favorability;
use crate::Dashboard;
use std::fmt::Write;

pub fn render_briefing(dashboard: &Dashboard) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = write_briefing(&mut out, dashboard);
    out
}

fn write_briefing(out: &mut String, dashboard: &Dashboard) -> std::fmt::Result {
    writeln!(out, "# {}", dashboard.title)?;
    writeln!(out)?;

    writeln!(out, "## KPIs")?;
    writeln!(out)?;
    if dashboard.kpis.is_empty() {
        writeln!(out, "_No KPI data available._")?;
    } else {
        writeln!(out, "| Measure | Actual | Budget | Variance | Variance % | Status | Trend |")?;
        writeln!(out, "|---|---:|---:|---:|---:|---|---|")?;
        for kpi in &dashboard.kpis {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} |",
                kpi.name,
                format_value(kpi.measure.is_ratio(), kpi.actual),
                format_value(kpi.measure.is_ratio(), kpi.budget),
                format_delta(kpi.measure.is_ratio(), kpi.variance),
                format_variance_percent(kpi.variance_percent, 1),
                favorability_label(kpi.favorability),
                trend_arrow(kpi.trend),
            )?;
        }
    }
    writeln!(out)?;

    if !dashboard.breakdown.is_empty() {
        let is_ratio = dashboard.breakdown_measure.is_ratio();
        writeln!(
            out,
            "## {} by {}",
            dashboard.breakdown_measure,
            dashboard.group_by.label()
        )?;
        writeln!(out)?;
        writeln!(out, "| {} | Actual | Budget | Variance | Status |", dashboard.group_by.label())?;
        writeln!(out, "|---|---:|---:|---:|---|")?;
        for row in &dashboard.breakdown {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                row.key,
                format_value(is_ratio, row.totals.actual),
                format_value(is_ratio, row.totals.budget),
                format_delta(is_ratio, row.variance.absolute_variance),
                favorability_label(row.variance.favorability),
            )?;
        }
        writeln!(out)?;
    }

    if !dashboard.forecasts.is_empty() {
        writeln!(out, "## Forecast")?;
        writeln!(out)?;
        for forecast in &dashboard.forecasts {
            let values: Vec<String> = forecast
                .values
                .iter()
                .map(|v| format_value(forecast.measure.is_ratio(), *v))
                .collect();
            writeln!(
                out,
                "- {} ({:?}, after {}): {}",
                forecast.measure,
                forecast.method,
                forecast.last_actual_period.as_deref().unwrap_or("n/a"),
                if values.is_empty() {
                    "no projection".to_string()
                } else {
                    values.join(", ")
                }
            )?;
        }
        writeln!(out)?;
    }

    if !dashboard.what_if.is_empty() {
        writeln!(out, "## What-if")?;
        writeln!(out)?;
        for line in &dashboard.what_if {
            let is_ratio = line.measure.is_ratio();
            writeln!(
                out,
                "- {}: {} -> {} ({})",
                line.measure,
                format_value(is_ratio, line.base),
                format_value(is_ratio, line.adjusted),
                format_variance_percent(line.change.percent_variance, 1),
            )?;
        }
    }

    Ok(())
}

fn format_value(is_ratio: bool, value: f64) -> String {
    if is_ratio {
        format_percent(value, 1)
    } else {
        format_currency(value)
    }
}

fn format_delta(is_ratio: bool, value: f64) -> String {
    if is_ratio {
        format_variance_percent(value, 1)
    } else {
        format_variance(value)
    }
}

fn favorability_label(favorability: Favorability) -> &'static str {
    match favorability {
        Favorability::Favorable => "favorable",
        Favorability::Unfavorable => "unfavorable",
        Favorability::Neutral => "on plan",
    }
}

fn trend_arrow(trend: Trend) -> &'static str {
    match trend {
        Trend::Up => "▲",
        Trend::Down => "▼",
        Trend::Flat => "■",
    }
}
