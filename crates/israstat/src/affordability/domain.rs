use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::warn;

/// DSR above this triggers the BoI soft warning.
pub const DSR_WARNING_THRESHOLD: f64 = 0.33;

pub const DSR_RANGE: RangeInclusive<f64> = 0.20..=0.40;

pub const TERM_YEARS_RANGE: RangeInclusive<u32> = 10..=30;

/// Buyer category; determines the LTV ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum BuyerType {
    FirstHome,
    Mover,
    Investor,
}

impl BuyerType {
    pub const fn ordered() -> [Self; 3] {
        [Self::FirstHome, Self::Mover, Self::Investor]
    }

    /// Maximum loan as a fraction of the property price.
    pub const fn ltv_limit(self) -> f64 {
        match self {
            Self::FirstHome => 0.75,
            Self::Mover => 0.70,
            Self::Investor => 0.50,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::FirstHome => "FIRST_HOME",
            Self::Mover => "MOVER",
            Self::Investor => "INVESTOR",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstHome => "1st Home",
            Self::Mover => "Upgrader",
            Self::Investor => "Investor",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::FirstHome => "First-time buyer, up to 75% financing",
            Self::Mover => "Selling existing property, up to 70% financing",
            Self::Investor => "Investment property, up to 50% financing",
        }
    }

    /// Strict parse of `FIRST_HOME`, `first-home`, `Mover`, ...
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Self::ordered()
            .into_iter()
            .find(|buyer| buyer.code() == normalized)
    }

    /// Unknown values fall back to [`BuyerType::Investor`], the lowest LTV.
    pub fn parse_lossy(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|| {
            warn!(buyer_type = raw, "unknown buyer type, using investor LTV");
            Self::Investor
        })
    }
}

impl From<String> for BuyerType {
    fn from(value: String) -> Self {
        Self::parse_lossy(&value)
    }
}

/// Caller-supplied inputs for one affordability estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageInputs {
    pub initial_capital: f64,
    pub monthly_gross_income: f64,
    pub buyer_type: BuyerType,
    pub dsr: f64,
    /// Annual nominal rate as a fraction.
    pub interest_rate: f64,
    pub term_years: u32,
}

impl Default for MortgageInputs {
    /// Starting point of the calculator: a first-home buyer at 30% DSR.
    fn default() -> Self {
        Self {
            initial_capital: 800_000.0,
            monthly_gross_income: 25_000.0,
            buyer_type: BuyerType::FirstHome,
            dsr: 0.30,
            interest_rate: 0.051,
            term_years: 25,
        }
    }
}

impl MortgageInputs {
    /// Checks the documented input domain. The engine itself never calls this.
    pub fn validate(&self) -> Result<(), MortgageInputError> {
        for (field, value) in [
            ("initialCapital", self.initial_capital),
            ("monthlyGrossIncome", self.monthly_gross_income),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(MortgageInputError::NonPositiveAmount { field, value });
            }
        }

        if !DSR_RANGE.contains(&self.dsr) {
            return Err(MortgageInputError::DsrOutOfRange(self.dsr));
        }

        if !(0.0..1.0).contains(&self.interest_rate) {
            return Err(MortgageInputError::InterestRateOutOfRange(
                self.interest_rate,
            ));
        }

        if !TERM_YEARS_RANGE.contains(&self.term_years) {
            return Err(MortgageInputError::TermOutOfRange(self.term_years));
        }

        Ok(())
    }
}

/// Derived affordability figures; currency values are whole units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageResults {
    pub estimated_net_income: i64,
    pub max_monthly_payment: i64,
    pub max_loan_amount: i64,
    pub max_property_price: i64,
    pub ltv_limit: f64,
    pub total_interest_paid: i64,
    pub is_warning: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MortgageInputError {
    #[error("{field} must be a positive amount, got {value}")]
    NonPositiveAmount { field: &'static str, value: f64 },
    #[error("dsr must be within [0.20, 0.40], got {0}")]
    DsrOutOfRange(f64),
    #[error("interestRate must be within [0, 1), got {0}")]
    InterestRateOutOfRange(f64),
    #[error("termYears must be within [10, 30], got {0}")]
    TermOutOfRange(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> MortgageInputs {
        MortgageInputs::default()
    }

    #[test]
    fn ltv_table_covers_every_buyer() {
        let limits: Vec<f64> = BuyerType::ordered()
            .into_iter()
            .map(BuyerType::ltv_limit)
            .collect();
        assert_eq!(limits, vec![0.75, 0.70, 0.50]);
    }

    #[test]
    fn parses_codes_leniently() {
        assert_eq!(BuyerType::parse("FIRST_HOME"), Some(BuyerType::FirstHome));
        assert_eq!(BuyerType::parse(" first-home "), Some(BuyerType::FirstHome));
        assert_eq!(BuyerType::parse("mover"), Some(BuyerType::Mover));
        assert_eq!(BuyerType::parse("landlord"), None);
        assert_eq!(BuyerType::parse_lossy("landlord"), BuyerType::Investor);
    }

    #[test]
    fn deserializes_wire_format_and_degrades_unknown_buyers() {
        let json = r#"{"initialCapital":800000,"monthlyGrossIncome":25000,"buyerType":"MOVER","dsr":0.3,"interestRate":0.051,"termYears":25}"#;
        let parsed: MortgageInputs = serde_json::from_str(json).expect("inputs parse");
        assert_eq!(parsed.buyer_type, BuyerType::Mover);

        let unknown = json.replace("MOVER", "SPECULATOR");
        let parsed: MortgageInputs = serde_json::from_str(&unknown).expect("inputs parse");
        assert_eq!(parsed.buyer_type, BuyerType::Investor);
    }

    #[test]
    fn serializes_buyer_codes() {
        let value = serde_json::to_value(inputs()).expect("serializes");
        assert_eq!(value["buyerType"], "FIRST_HOME");
        assert_eq!(value["termYears"], 25);
    }

    #[test]
    fn validate_accepts_domain_values() {
        assert!(inputs().validate().is_ok());
        let zero_rate = MortgageInputs {
            interest_rate: 0.0,
            ..inputs()
        };
        assert!(zero_rate.validate().is_ok());
    }

    #[test]
    fn validate_names_the_violated_constraint() {
        let broke = MortgageInputs {
            initial_capital: 0.0,
            ..inputs()
        };
        assert_eq!(
            broke.validate(),
            Err(MortgageInputError::NonPositiveAmount {
                field: "initialCapital",
                value: 0.0
            })
        );

        let greedy = MortgageInputs {
            dsr: 0.45,
            ..inputs()
        };
        assert_eq!(
            greedy.validate(),
            Err(MortgageInputError::DsrOutOfRange(0.45))
        );

        let short = MortgageInputs {
            term_years: 5,
            ..inputs()
        };
        assert_eq!(short.validate(), Err(MortgageInputError::TermOutOfRange(5)));

        let usurious = MortgageInputs {
            interest_rate: 1.2,
            ..inputs()
        };
        assert!(matches!(
            usurious.validate(),
            Err(MortgageInputError::InterestRateOutOfRange(_))
        ));

        let nan_income = MortgageInputs {
            monthly_gross_income: f64::NAN,
            ..inputs()
        };
        assert!(nan_income
            .validate()
            .expect_err("NaN rejected")
            .to_string()
            .contains("monthlyGrossIncome"));
    }
}
