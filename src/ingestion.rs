use crate::error::{FpaError, Result};
use crate::schema::{FactRecord, Measure, Scenario};
use log::debug;
use serde::{Deserialize, Serialize};

/// A loosely typed row as it arrives from an upload or an ERP sync.
///
/// Measure and scenario are free text and are resolved against the known
/// names and aliases during conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFactRow {
    pub period: String,
    #[serde(default)]
    pub business_unit: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    pub measure: String,
    pub scenario: String,
    pub value: f64,
}

pub fn convert_rows_to_facts(rows: &[RawFactRow]) -> Result<Vec<FactRecord>> {
    let mut facts = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let period = row.period.trim();
        if period.is_empty() {
            return Err(FpaError::Ingestion {
                row: idx,
                details: "Period is empty".to_string(),
            });
        }

        let measure: Measure = row.measure.parse().map_err(|e: FpaError| FpaError::Ingestion {
            row: idx,
            details: e.to_string(),
        })?;

        let scenario: Scenario =
            row.scenario
                .parse()
                .map_err(|e: FpaError| FpaError::Ingestion {
                    row: idx,
                    details: e.to_string(),
                })?;

        if !row.value.is_finite() {
            return Err(FpaError::Ingestion {
                row: idx,
                details: format!("Value {} is not a finite number", row.value),
            });
        }

        facts.push(FactRecord {
            period: period.to_string(),
            business_unit: normalize_key(&row.business_unit),
            market: normalize_key(&row.market),
            product: normalize_key(&row.product),
            channel: normalize_key(&row.channel),
            department: normalize_key(&row.department),
            measure,
            scenario,
            value: row.value,
        });
    }

    debug!("Converted {} raw rows into fact records", facts.len());
    Ok(facts)
}

/// Parses a JSON array of raw rows and converts it to fact records.
pub fn facts_from_json(json: &str) -> Result<Vec<FactRecord>> {
    let rows: Vec<RawFactRow> = serde_json::from_str(json)?;
    convert_rows_to_facts(&rows)
}

fn normalize_key(key: &Option<String>) -> Option<String> {
    key.as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}
