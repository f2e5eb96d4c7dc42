//! Affordability estimate under Bank of Israel (BoI) mortgage rules.
//!
//! Gross income is converted to net, a debt-service ratio (DSR) caps the
//! monthly payment, and a loan-to-value (LTV) ceiling per buyer category caps
//! the loan. The tighter of the two constraints sets the maximum price.

mod annuity;
pub mod domain;
mod engine;
mod income;

pub use annuity::{max_loan_from_payment, monthly_payment_from_loan};
pub use domain::{
    BuyerType, MortgageInputError, MortgageInputs, MortgageResults, DSR_RANGE,
    DSR_WARNING_THRESHOLD, TERM_YEARS_RANGE,
};
pub use engine::{analyze, calculate_mortgage, AffordabilityBreakdown, BindingConstraint};
pub use income::{estimate_net_income, NetIncomeBracket, NET_INCOME_BRACKETS};
