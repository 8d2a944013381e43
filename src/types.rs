use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a payment record
pub type PaymentId = Uuid;

/// unique identifier for a rental agreement
pub type AgreementId = Uuid;

/// how often a rental agreement bills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Weekly,
    Monthly,
}

impl PaymentFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Monthly => 12,
        }
    }

    /// number of billing periods covered by a duration in months.
    /// weekly counts are floored, so a period can be shorter than the
    /// calendar range by up to a week.
    pub fn total_periods(&self, duration_months: u32) -> u32 {
        match self {
            PaymentFrequency::Monthly => duration_months,
            PaymentFrequency::Weekly => {
                (u64::from(duration_months) * 52 / 12) as u32
            }
        }
    }

    /// due date one period after `date`. months step from the given date,
    /// so a day clamped in a short month stays clamped (Jan 31 -> Feb 29 -> Mar 29).
    pub fn advance(&self, date: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            PaymentFrequency::Weekly => date.checked_add_signed(Duration::weeks(1)),
            PaymentFrequency::Monthly => date.checked_add_months(Months::new(1)),
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentFrequency::Weekly => write!(f, "weekly"),
            PaymentFrequency::Monthly => write!(f, "monthly"),
        }
    }
}

/// settlement state of a single payment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// nothing paid yet, not past due
    Pending,
    /// partly paid, not past due
    Partial,
    /// balance remaining after the due date
    Overdue,
    /// fully settled
    Paid,
}

/// one billed payment under a rental agreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    #[serde(default)]
    pub agreement_id: Option<AgreementId>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    pub amount: Money,
    pub amount_paid: Money,
    #[serde(default)]
    pub late_fine_amount: Option<Money>,
}

impl PaymentRecord {
    pub fn new(amount: Money, amount_paid: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            agreement_id: None,
            due_date: None,
            amount,
            amount_paid,
            late_fine_amount: None,
        }
    }

    pub fn with_late_fine(mut self, fine: Money) -> Self {
        self.late_fine_amount = Some(fine);
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_agreement(mut self, agreement_id: AgreementId) -> Self {
        self.agreement_id = Some(agreement_id);
        self
    }

    /// late fine, absent treated as zero
    pub fn late_fine(&self) -> Money {
        self.late_fine_amount.unwrap_or(Money::ZERO)
    }

    /// rent plus late fine
    pub fn total_billed(&self) -> Money {
        self.amount + self.late_fine()
    }

    /// part of `amount_paid` that went to the late fine; paid money
    /// settles the fine before the rent
    pub fn fine_paid(&self) -> Money {
        self.amount_paid.non_negative().min(self.late_fine())
    }

    pub fn fine_outstanding(&self) -> Money {
        self.late_fine().saturating_sub(self.fine_paid())
    }

    pub fn rent_outstanding(&self) -> Money {
        let rent_paid = self.amount_paid.non_negative() - self.fine_paid();
        self.amount.saturating_sub(rent_paid)
    }
}
