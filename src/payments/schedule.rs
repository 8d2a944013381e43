use chrono::{DateTime, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decimal::{round_half_up, Money, Rate, CURRENCY_SCALE};
use crate::errors::{PaymentError, Result};
use crate::types::PaymentFrequency;

/// one period of a payment schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleItem {
    pub period_number: u32,
    pub due_date: DateTime<Utc>,
    pub amount: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

/// result of a schedule calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentCalculation {
    pub principal: Money,
    pub annual_rate: Rate,
    pub frequency: PaymentFrequency,
    pub periods: u32,
    pub payment_amount: Money,
    pub total_amount: Money,
    pub total_interest: Money,
    pub schedule: Vec<PaymentScheduleItem>,
}

impl PaymentCalculation {
    /// get item for a 1-based period number
    pub fn item(&self, period_number: u32) -> Option<&PaymentScheduleItem> {
        let index = period_number.checked_sub(1)?;
        self.schedule.get(index as usize)
    }

    /// remaining balance once the given period has been paid
    pub fn balance_after(&self, period_number: u32) -> Money {
        self.item(period_number)
            .map(|p| p.remaining_balance)
            .unwrap_or(self.principal)
    }

    /// first item due strictly after `as_of`
    pub fn next_due(&self, as_of: DateTime<Utc>) -> Option<&PaymentScheduleItem> {
        self.schedule.iter().find(|p| p.due_date > as_of)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// compute a fixed-payment schedule.
///
/// `annual_rate` of zero is straight-line (`principal / periods`); otherwise the
/// standard amortization formula is used. The balance is carried at full
/// decimal precision and only the returned figures are rounded half-up to cents.
pub fn calculate_payment(
    principal: Money,
    annual_rate: Rate,
    frequency: PaymentFrequency,
    start_date: DateTime<Utc>,
    duration_months: u32,
) -> Result<PaymentCalculation> {
    if annual_rate.is_negative() {
        return Err(PaymentError::InvalidInterestRate { rate: annual_rate });
    }

    let periods = frequency.total_periods(duration_months);
    if periods == 0 {
        warn!(duration_months, %frequency, "rejecting schedule with no payment periods");
        return Err(PaymentError::InvalidDuration {
            duration_months,
            frequency: frequency.to_string(),
        });
    }

    let period_rate = annual_rate.period_rate(frequency.periods_per_year()).as_decimal();
    let payment = period_payment(principal.as_decimal(), period_rate, periods)?;

    debug!(
        %principal,
        %annual_rate,
        %frequency,
        periods,
        payment = %payment,
        "calculating payment schedule"
    );

    let amount = Money::from_decimal(round_half_up(payment, CURRENCY_SCALE));
    let mut balance = principal.as_decimal();
    let mut schedule = Vec::with_capacity(periods as usize);

    let mut due_date = start_date;

    for period_number in 1..=periods {
        let interest = balance.checked_mul(period_rate).ok_or_else(|| overflow("interest"))?;
        let principal_part = payment - interest;
        balance -= principal_part;

        schedule.push(PaymentScheduleItem {
            period_number,
            due_date,
            amount,
            interest_portion: cents(interest),
            principal_portion: cents(principal_part),
            remaining_balance: cents(balance.max(Decimal::ZERO)),
        });

        if period_number < periods {
            due_date = frequency.advance(due_date).ok_or_else(|| PaymentError::InvalidDate {
                message: format!("due date for period {} is out of range", period_number + 1),
            })?;
        }
    }

    let total = payment
        .checked_mul(Decimal::from(periods))
        .ok_or_else(|| overflow("total amount"))?;

    Ok(PaymentCalculation {
        principal,
        annual_rate,
        frequency,
        periods,
        payment_amount: amount,
        total_amount: cents(total),
        total_interest: cents((total - principal.as_decimal()).max(Decimal::ZERO)),
        schedule,
    })
}

fn cents(d: Decimal) -> Money {
    Money::from_decimal(round_half_up(d, CURRENCY_SCALE))
}

fn overflow(what: &str) -> PaymentError {
    PaymentError::CalculationError {
        message: format!("{} exceeds the representable range", what),
    }
}

/// payment per period, unrounded
fn period_payment(principal: Decimal, period_rate: Decimal, periods: u32) -> Result<Decimal> {
    let n = Decimal::from(periods);

    if period_rate.is_zero() {
        return Ok(principal / n);
    }

    // P * r * (1 + r)^n / ((1 + r)^n - 1)
    let base = Decimal::ONE + period_rate;
    let mut compound = Decimal::ONE;
    for _ in 0..periods {
        compound = compound.checked_mul(base).ok_or_else(|| overflow("compound factor"))?;
    }

    principal
        .checked_mul(period_rate)
        .and_then(|v| v.checked_mul(compound))
        .and_then(|v| v.checked_div(compound - Decimal::ONE))
        .ok_or_else(|| overflow("period payment"))
}

/// builder for schedule calculations where the start date may default to now
#[derive(Debug, Clone)]
pub struct PaymentPlan {
    principal: Option<Money>,
    annual_rate: Rate,
    frequency: PaymentFrequency,
    start_date: Option<DateTime<Utc>>,
    duration_months: Option<u32>,
}

impl Default for PaymentPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentPlan {
    pub fn new() -> Self {
        Self {
            principal: None,
            annual_rate: Rate::ZERO,
            frequency: PaymentFrequency::Monthly,
            start_date: None,
            duration_months: None,
        }
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn rate(mut self, annual_rate: Rate) -> Self {
        self.annual_rate = annual_rate;
        self
    }

    pub fn frequency(mut self, frequency: PaymentFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn duration_months(mut self, months: u32) -> Self {
        self.duration_months = Some(months);
        self
    }

    /// calculate, starting now on the system clock when no start date was set
    pub fn calculate(self) -> Result<PaymentCalculation> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.calculate_with_time(&time)
    }

    /// calculate with an explicit time provider for the default start date
    pub fn calculate_with_time(self, time_provider: &SafeTimeProvider) -> Result<PaymentCalculation> {
        let principal = self.principal.ok_or(PaymentError::InvalidConfiguration {
            message: "Principal required".to_string(),
        })?;

        let duration_months = self.duration_months.ok_or(PaymentError::InvalidConfiguration {
            message: "Duration required".to_string(),
        })?;

        let start_date = self.start_date.unwrap_or_else(|| time_provider.now());

        calculate_payment(principal, self.annual_rate, self.frequency, start_date, duration_months)
    }
}
