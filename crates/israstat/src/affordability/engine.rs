use super::annuity::{max_loan_from_payment, monthly_payment_from_loan};
use super::domain::{MortgageInputs, MortgageResults, DSR_WARNING_THRESHOLD};
use super::income::estimate_net_income;
use crate::rounding::round_half_up;
use serde::Serialize;
use tracing::debug;

/// Which cap set the maximum price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingConstraint {
    /// Capital covers only the minimum equity share of a pricier home.
    LoanToValue,
    /// Monthly repayment capacity runs out first.
    DebtService,
}

impl BindingConstraint {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LoanToValue => "Loan-to-value ceiling",
            Self::DebtService => "Debt-service ratio",
        }
    }
}

/// Unrounded intermediates of one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityBreakdown {
    pub inputs: MortgageInputs,
    pub net_income: f64,
    /// Payment allowed by the DSR before the LTV cap is applied.
    pub dsr_payment_cap: f64,
    pub ltv_limit: f64,
    pub max_loan_by_income: f64,
    pub max_price_by_ltv: f64,
    pub max_price_by_income: f64,
    pub max_property_price: f64,
    pub final_loan: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub binding: BindingConstraint,
}

impl AffordabilityBreakdown {
    /// Rounds currency figures to whole units.
    pub fn results(&self) -> MortgageResults {
        MortgageResults {
            estimated_net_income: whole(self.net_income),
            max_monthly_payment: whole(self.monthly_payment),
            max_loan_amount: whole(self.final_loan),
            max_property_price: whole(self.max_property_price),
            ltv_limit: self.ltv_limit,
            total_interest_paid: whole(self.total_interest),
            is_warning: self.inputs.dsr > DSR_WARNING_THRESHOLD,
        }
    }
}

fn whole(value: f64) -> i64 {
    round_half_up(value) as i64
}

/// Runs the full calculation without rounding.
pub fn analyze(inputs: &MortgageInputs) -> AffordabilityBreakdown {
    let net_income = estimate_net_income(inputs.monthly_gross_income);
    let dsr_payment_cap = net_income * inputs.dsr;
    let ltv_limit = inputs.buyer_type.ltv_limit();

    let max_loan_by_income =
        max_loan_from_payment(dsr_payment_cap, inputs.interest_rate, inputs.term_years);

    // capital >= (1 - LTV) * price
    let max_price_by_ltv = inputs.initial_capital / (1.0 - ltv_limit);
    let max_price_by_income = inputs.initial_capital + max_loan_by_income;

    let (max_property_price, binding) = if max_price_by_ltv < max_price_by_income {
        (max_price_by_ltv, BindingConstraint::LoanToValue)
    } else {
        (max_price_by_income, BindingConstraint::DebtService)
    };
    let final_loan = max_property_price - inputs.initial_capital;

    let monthly_payment =
        monthly_payment_from_loan(final_loan, inputs.interest_rate, inputs.term_years);
    let total_interest = monthly_payment * f64::from(inputs.term_years * 12) - final_loan;

    debug!(
        buyer_type = inputs.buyer_type.code(),
        binding = binding.label(),
        max_property_price,
        "affordability calculated"
    );

    AffordabilityBreakdown {
        inputs: *inputs,
        net_income,
        dsr_payment_cap,
        ltv_limit,
        max_loan_by_income,
        max_price_by_ltv,
        max_price_by_income,
        max_property_price,
        final_loan,
        monthly_payment,
        total_interest,
        binding,
    }
}

/// Maximum affordable price and derived totals. Total over the input domain.
pub fn calculate_mortgage(inputs: &MortgageInputs) -> MortgageResults {
    analyze(inputs).results()
}
