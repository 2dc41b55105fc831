use crate::error::{FpaError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scenario {
    #[schemars(description = "Booked result for the period")]
    Actual,

    #[schemars(description = "Approved plan for the period")]
    Budget,

    #[schemars(description = "Forward-looking estimate or what-if projection")]
    Forecast,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Actual => "ACTUAL",
            Scenario::Budget => "BUDGET",
            Scenario::Forecast => "FORECAST",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = FpaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "actual" | "actuals" | "act" => Ok(Scenario::Actual),
            "budget" | "plan" | "bud" => Ok(Scenario::Budget),
            "forecast" | "outlook" | "fcst" => Ok(Scenario::Forecast),
            _ => Err(FpaError::UnknownScenario(s.to_string())),
        }
    }
}

/// The fixed set of financial metrics tracked by the dashboard.
///
/// Declaration order doubles as presentation order (P&L lines first, then
/// insurance underwriting metrics, then operational volumes).
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
pub enum Measure {
    #[serde(rename = "Revenue")]
    Revenue,

    #[serde(rename = "COGS")]
    #[schemars(description = "Cost of goods sold")]
    Cogs,

    #[serde(rename = "Gross Profit")]
    GrossProfit,

    #[serde(rename = "OPEX")]
    #[schemars(description = "Operating expenses")]
    Opex,

    #[serde(rename = "EBITDA")]
    Ebitda,

    #[serde(rename = "Net Income")]
    NetIncome,

    #[serde(rename = "GWP")]
    #[schemars(description = "Gross written premium")]
    Gwp,

    #[serde(rename = "NEP")]
    #[schemars(description = "Net earned premium")]
    Nep,

    #[serde(rename = "Claims Incurred")]
    ClaimsIncurred,

    #[serde(rename = "Loss Ratio")]
    #[schemars(description = "Claims incurred over earned premium; lower is better")]
    LossRatio,

    #[serde(rename = "Expense Ratio")]
    ExpenseRatio,

    #[serde(rename = "Combined Ratio")]
    CombinedRatio,

    #[serde(rename = "Policy Count")]
    PolicyCount,

    #[serde(rename = "Retention Rate")]
    RetentionRate,

    #[serde(rename = "Conversion Rate")]
    ConversionRate,

    #[serde(rename = "Headcount")]
    Headcount,
}

impl Measure {
    pub const ALL: [Measure; 16] = [
        Measure::Revenue,
        Measure::Cogs,
        Measure::GrossProfit,
        Measure::Opex,
        Measure::Ebitda,
        Measure::NetIncome,
        Measure::Gwp,
        Measure::Nep,
        Measure::ClaimsIncurred,
        Measure::LossRatio,
        Measure::ExpenseRatio,
        Measure::CombinedRatio,
        Measure::PolicyCount,
        Measure::RetentionRate,
        Measure::ConversionRate,
        Measure::Headcount,
    ];

    /// Display name, identical to the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Measure::Revenue => "Revenue",
            Measure::Cogs => "COGS",
            Measure::GrossProfit => "Gross Profit",
            Measure::Opex => "OPEX",
            Measure::Ebitda => "EBITDA",
            Measure::NetIncome => "Net Income",
            Measure::Gwp => "GWP",
            Measure::Nep => "NEP",
            Measure::ClaimsIncurred => "Claims Incurred",
            Measure::LossRatio => "Loss Ratio",
            Measure::ExpenseRatio => "Expense Ratio",
            Measure::CombinedRatio => "Combined Ratio",
            Measure::PolicyCount => "Policy Count",
            Measure::RetentionRate => "Retention Rate",
            Measure::ConversionRate => "Conversion Rate",
            Measure::Headcount => "Headcount",
        }
    }

    /// True when growth in the measure is good news (revenue and volume lines).
    /// Cost and ratio lines, where a reduction is favorable, return false.
    pub fn is_revenue_type(&self) -> bool {
        match self {
            Measure::Revenue
            | Measure::GrossProfit
            | Measure::Ebitda
            | Measure::NetIncome
            | Measure::Gwp
            | Measure::Nep
            | Measure::PolicyCount
            | Measure::RetentionRate
            | Measure::ConversionRate => true,
            Measure::Cogs
            | Measure::Opex
            | Measure::ClaimsIncurred
            | Measure::LossRatio
            | Measure::ExpenseRatio
            | Measure::CombinedRatio
            | Measure::Headcount => false,
        }
    }

    /// Measures stored as fractions (0.62 = 62%) rather than amounts or counts.
    pub fn is_ratio(&self) -> bool {
        matches!(
            self,
            Measure::LossRatio
                | Measure::ExpenseRatio
                | Measure::CombinedRatio
                | Measure::RetentionRate
                | Measure::ConversionRate
        )
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measure {
    type Err = FpaError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        let measure = match normalized.as_str() {
            "revenue" | "sales" | "totalrevenue" => Measure::Revenue,
            "cogs" | "costofgoodssold" | "costofsales" => Measure::Cogs,
            "grossprofit" | "grossmargin" => Measure::GrossProfit,
            "opex" | "operatingexpenses" | "operatingexpense" => Measure::Opex,
            "ebitda" => Measure::Ebitda,
            "netincome" | "netprofit" => Measure::NetIncome,
            "gwp" | "grosswrittenpremium" | "grosswrittenpremiums" => Measure::Gwp,
            "nep" | "netearnedpremium" | "netearnedpremiums" => Measure::Nep,
            "claimsincurred" | "claims" | "incurredclaims" => Measure::ClaimsIncurred,
            "lossratio" => Measure::LossRatio,
            "expenseratio" => Measure::ExpenseRatio,
            "combinedratio" => Measure::CombinedRatio,
            "policycount" | "policies" | "policiesinforce" => Measure::PolicyCount,
            "retentionrate" | "retention" => Measure::RetentionRate,
            "conversionrate" | "conversion" => Measure::ConversionRate,
            "headcount" | "fte" => Measure::Headcount,
            _ => return Err(FpaError::UnknownMeasure(s.to_string())),
        };

        Ok(measure)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    BusinessUnit,
    Market,
    Product,
    Channel,
    Department,
}

impl Dimension {
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::BusinessUnit => "Business Unit",
            Dimension::Market => "Market",
            Dimension::Product => "Product",
            Dimension::Channel => "Channel",
            Dimension::Department => "Department",
        }
    }
}

/// The atomic unit of financial data.
///
/// At most one authoritative value is expected per (period, dimensions,
/// measure, scenario). Nothing downstream deduplicates: duplicates are summed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FactRecord {
    #[schemars(description = "Reporting interval key, e.g. '2024-03' or '2024-Q1'")]
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

    pub measure: Measure,

    pub scenario: Scenario,

    #[schemars(description = "Signed value in the record's native currency or unit")]
    pub value: f64,
}

impl FactRecord {
    pub fn new(period: impl Into<String>, measure: Measure, scenario: Scenario, value: f64) -> Self {
        Self {
            period: period.into(),
            business_unit: None,
            market: None,
            product: None,
            channel: None,
            department: None,
            measure,
            scenario,
            value,
        }
    }

    pub fn with_dimension(mut self, dimension: Dimension, key: impl Into<String>) -> Self {
        let key = Some(key.into());
        match dimension {
            Dimension::BusinessUnit => self.business_unit = key,
            Dimension::Market => self.market = key,
            Dimension::Product => self.product = key,
            Dimension::Channel => self.channel = key,
            Dimension::Department => self.department = key,
        }
        self
    }

    pub fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::BusinessUnit => self.business_unit.as_deref(),
            Dimension::Market => self.market.as_deref(),
            Dimension::Product => self.product.as_deref(),
            Dimension::Channel => self.channel.as_deref(),
            Dimension::Department => self.department.as_deref(),
        }
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Vec<FactRecord>)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = FactRecord::schema_as_json().unwrap();
        assert!(schema_json.contains("period"));
        assert!(schema_json.contains("scenario"));
        assert!(schema_json.contains("Loss Ratio"));
    }

    #[test]
    fn test_serialization_uses_display_names() {
        let fact = FactRecord::new("2024-01", Measure::Gwp, Scenario::Budget, 1250.0)
            .with_dimension(Dimension::Market, "UK");

        let json = serde_json::to_string(&fact).unwrap();
        assert!(json.contains("\"GWP\""));
        assert!(json.contains("\"BUDGET\""));

        let deserialized: FactRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, fact);
    }

    #[test]
    fn test_missing_dimensions_default_to_none() {
        let json = r#"{"period":"2024-Q1","measure":"Revenue","scenario":"ACTUAL","value":10.0}"#;
        let fact: FactRecord = serde_json::from_str(json).unwrap();
        assert_eq!(fact.dimension(Dimension::BusinessUnit), None);
        assert_eq!(fact.measure, Measure::Revenue);
    }

    #[test]
    fn test_measure_aliases() {
        assert_eq!("Gross Written Premium".parse::<Measure>().unwrap(), Measure::Gwp);
        assert_eq!("cost of goods sold".parse::<Measure>().unwrap(), Measure::Cogs);
        assert_eq!("loss_ratio".parse::<Measure>().unwrap(), Measure::LossRatio);
        assert!("Widgets".parse::<Measure>().is_err());
    }

    #[test]
    fn test_measure_name_round_trips_through_from_str() {
        for measure in Measure::ALL {
            assert_eq!(measure.name().parse::<Measure>().unwrap(), measure);
        }
    }

    #[test]
    fn test_scenario_aliases() {
        assert_eq!("Actuals".parse::<Scenario>().unwrap(), Scenario::Actual);
        assert_eq!("PLAN".parse::<Scenario>().unwrap(), Scenario::Budget);
        assert_eq!(" outlook ".parse::<Scenario>().unwrap(), Scenario::Forecast);
        assert!("stretch".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_polarity() {
        assert!(Measure::Revenue.is_revenue_type());
        assert!(Measure::Gwp.is_revenue_type());
        assert!(!Measure::LossRatio.is_revenue_type());
        assert!(!Measure::Opex.is_revenue_type());
    }
}
