//! Debt payoff projection
//!
//! Month-by-month amortization of a balance under a fixed payment, with
//! interest compounding monthly at `apr / 12`.

use serde::{Deserialize, Serialize};

use crate::models::{round_money, to_float};

/// Default iteration cap, in months
pub const DEFAULT_MAX_MONTHS: u32 = 600;

/// Simulation limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoffOptions {
    /// Stop simulating after this many months
    pub max_months: u32,
}

impl Default for PayoffOptions {
    fn default() -> Self {
        Self {
            max_months: DEFAULT_MAX_MONTHS,
        }
    }
}

/// How a projection ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffStatus {
    /// The balance reached zero
    PaidOff,
    /// The iteration cap was hit with a balance remaining
    CapReached,
    /// The payment never covers the monthly interest
    Never,
}

/// Outcome of a payoff projection
///
/// A debt that never amortizes is reported with infinite `months` and
/// `interest_paid`; check [`PayoffProjection::status`] before doing arithmetic
/// on them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffProjection {
    pub months: f64,
    pub interest_paid: f64,
    pub final_balance: f64,
}

impl PayoffProjection {
    fn never(balance: f64) -> Self {
        Self {
            months: f64::INFINITY,
            interest_paid: f64::INFINITY,
            final_balance: round_money(balance),
        }
    }

    pub fn status(&self) -> PayoffStatus {
        if self.months.is_infinite() {
            PayoffStatus::Never
        } else if self.final_balance > 0.0 {
            PayoffStatus::CapReached
        } else {
            PayoffStatus::PaidOff
        }
    }

    pub fn pays_off(&self) -> bool {
        self.status() == PayoffStatus::PaidOff
    }
}

/// One simulated month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffMonth {
    /// 1-based month number
    pub month: u32,
    pub interest: f64,
    pub payment: f64,
    /// Balance after this month's interest and payment, floored at 0
    pub balance: f64,
}

struct Terms {
    balance: f64,
    rate: f64,
    payment: f64,
}

impl Terms {
    fn new(balance: f64, apr: f64, payment: f64) -> Self {
        Self {
            balance: to_float(Some(balance)),
            rate: to_float(Some(apr)) / 12.0,
            payment: to_float(Some(payment)),
        }
    }

    fn never_amortizes(&self) -> bool {
        self.payment <= self.balance * self.rate
    }

    /// Run the simulation, handing each month to `visit`
    fn simulate(&self, max_months: u32, mut visit: impl FnMut(u32, f64, f64)) -> (u32, f64, f64) {
        let mut balance = self.balance;
        let mut interest_paid = 0.0;
        let mut months = 0;

        while balance > 0.0 && months < max_months {
            let interest = balance * self.rate;
            balance = balance + interest - self.payment;
            interest_paid += interest;
            months += 1;
            visit(months, interest, balance);
        }

        (months, interest_paid, balance)
    }
}

/// Project how long a fixed payment takes to clear a balance
///
/// `apr` is a fraction (0.18 for 18%). A balance at or below zero is already
/// paid off. If the payment does not exceed the first month's interest the
/// debt never amortizes and the never-pays-off sentinel is returned without
/// simulating.
pub fn payoff_projection(
    balance: f64,
    apr: f64,
    monthly_payment: f64,
    options: &PayoffOptions,
) -> PayoffProjection {
    let terms = Terms::new(balance, apr, monthly_payment);

    if terms.balance <= 0.0 {
        return PayoffProjection {
            months: 0.0,
            interest_paid: 0.0,
            final_balance: 0.0,
        };
    }
    if terms.never_amortizes() {
        tracing::debug!(
            balance = terms.balance,
            payment = terms.payment,
            "payment never covers interest"
        );
        return PayoffProjection::never(terms.balance);
    }

    let (months, interest_paid, final_balance) = terms.simulate(options.max_months, |_, _, _| {});

    PayoffProjection {
        months: f64::from(months),
        interest_paid: round_money(interest_paid.max(0.0)),
        final_balance: round_money(final_balance.max(0.0)),
    }
}

/// Month-by-month schedule of the same simulation as [`payoff_projection`]
///
/// Empty when the balance is already cleared or never amortizes. The final
/// row's payment is trimmed to what was actually owed.
pub fn payoff_schedule(
    balance: f64,
    apr: f64,
    monthly_payment: f64,
    options: &PayoffOptions,
) -> Vec<PayoffMonth> {
    let terms = Terms::new(balance, apr, monthly_payment);
    if terms.balance <= 0.0 || terms.never_amortizes() {
        return Vec::new();
    }

    let mut rows = Vec::new();
    terms.simulate(options.max_months, |month, interest, after| {
        let overpaid = (-after).max(0.0);
        rows.push(PayoffMonth {
            month,
            interest: round_money(interest),
            payment: round_money(terms.payment - overpaid),
            balance: round_money(after.max(0.0)),
        });
    });
    rows
}
