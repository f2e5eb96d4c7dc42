//! Fixed-payment (Shpitzer) annuity math with monthly compounding.

/// Largest loan a fixed monthly payment can amortize over `years`.
pub fn max_loan_from_payment(monthly_payment: f64, annual_rate: f64, years: u32) -> f64 {
    let rate = annual_rate / 12.0;
    let periods = f64::from(years * 12);
    if rate == 0.0 {
        return monthly_payment * periods;
    }
    monthly_payment * (1.0 - (1.0 + rate).powf(-periods)) / rate
}

/// Fixed monthly payment that amortizes `loan` over `years`.
pub fn monthly_payment_from_loan(loan: f64, annual_rate: f64, years: u32) -> f64 {
    let rate = annual_rate / 12.0;
    let periods = f64::from(years * 12);
    if rate == 0.0 {
        return loan / periods;
    }
    let growth = (1.0 + rate).powf(periods);
    loan * rate * growth / (growth - 1.0)
}
