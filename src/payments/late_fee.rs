use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::payments::due::calculate_due_amount;
use crate::types::PaymentRecord;

/// late fine policy for overdue rent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateFeePolicy {
    /// fine charged per day past the grace period
    pub daily_fine: Money,
    /// days after the due date before fines start
    pub grace_period_days: u32,
    /// cap on the total fine for one record
    pub maximum_fine: Option<Money>,
}

impl LateFeePolicy {
    pub fn new(daily_fine: Money) -> Self {
        Self {
            daily_fine,
            grace_period_days: 0,
            maximum_fine: None,
        }
    }

    pub fn with_grace_period(mut self, days: u32) -> Self {
        self.grace_period_days = days;
        self
    }

    pub fn with_maximum(mut self, maximum: Money) -> Self {
        self.maximum_fine = Some(maximum);
        self
    }

    /// assess the fine owed on a record as of the given instant.
    /// settled records and records without a due date carry no fine. rent is
    /// outstanding once paid money has covered any existing fine.
    pub fn assess(&self, record: &PaymentRecord, as_of: DateTime<Utc>) -> LateFineAssessment {
        let rent_outstanding = record.rent_outstanding();

        let days_overdue = match record.due_date {
            Some(due_date) if rent_outstanding.is_positive() => days_between(due_date, as_of),
            _ => 0,
        };

        if days_overdue <= self.grace_period_days {
            return LateFineAssessment {
                days_overdue,
                days_charged: 0,
                fine_amount: Money::ZERO,
                grace_applied: days_overdue > 0,
            };
        }

        let days_charged = days_overdue - self.grace_period_days;
        let mut fine = self.daily_fine * Decimal::from(days_charged);

        if let Some(maximum) = self.maximum_fine {
            fine = fine.min(maximum);
        }

        LateFineAssessment {
            days_overdue,
            days_charged,
            fine_amount: fine.round_currency(),
            grace_applied: false,
        }
    }

    /// copy of the record with its late fine set to the assessed amount,
    /// replacing any fine already on the record
    pub fn apply_to(&self, record: &PaymentRecord, as_of: DateTime<Utc>) -> PaymentRecord {
        let fine = self.assess(record, as_of).fine_amount;

        let mut updated = record.clone();
        updated.late_fine_amount = if fine.is_zero() && record.late_fine_amount.is_none() {
            None
        } else {
            Some(fine)
        };
        updated
    }

    /// total still owed on a record with the fine assessed as of the instant
    pub fn due_with_fine(&self, record: &PaymentRecord, as_of: DateTime<Utc>) -> Money {
        calculate_due_amount(&self.apply_to(record, as_of))
    }
}

/// late fine assessment result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateFineAssessment {
    pub days_overdue: u32,
    pub days_charged: u32,
    pub fine_amount: Money,
    pub grace_applied: bool,
}

/// whole days from `from` to `to`, zero when `to` is not later
fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    let days = (to - from).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use hourglass_rs::{SafeTimeProvider, TimeSource};

    use crate::payments::due::payment_status;
    use crate::types::PaymentStatus;

    fn due_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    fn overdue_record() -> PaymentRecord {
        PaymentRecord::new(Money::from_major(1_000), Money::ZERO).with_due_date(due_date())
    }

    #[test]
    fn test_fine_after_grace_period() {
        let policy = LateFeePolicy::new(Money::from_major(10)).with_grace_period(3);
        let as_of = due_date() + Duration::days(10);

        let assessment = policy.assess(&overdue_record(), as_of);
        assert_eq!(assessment.days_overdue, 10);
        assert_eq!(assessment.days_charged, 7);
        assert_eq!(assessment.fine_amount, Money::from_major(70));
        assert!(!assessment.grace_applied);
    }

    #[test]
    fn test_within_grace_period() {
        let policy = LateFeePolicy::new(Money::from_major(10)).with_grace_period(3);
        let assessment = policy.assess(&overdue_record(), due_date() + Duration::days(3));

        assert_eq!(assessment.fine_amount, Money::ZERO);
        assert!(assessment.grace_applied);
    }

    #[test]
    fn test_fine_is_capped() {
        let policy = LateFeePolicy::new(Money::from_major(25)).with_maximum(Money::from_major(300));
        let assessment = policy.assess(&overdue_record(), due_date() + Duration::days(60));

        assert_eq!(assessment.days_charged, 60);
        assert_eq!(assessment.fine_amount, Money::from_major(300));
    }

    #[test]
    fn test_settled_record_has_no_fine() {
        let policy = LateFeePolicy::new(Money::from_major(10));
        let paid = PaymentRecord::new(Money::from_major(1_000), Money::from_major(1_000)).with_due_date(due_date());

        let assessment = policy.assess(&paid, due_date() + Duration::days(30));
        assert_eq!(assessment.days_overdue, 0);
        assert_eq!(assessment.fine_amount, Money::ZERO);
    }

    #[test]
    fn test_record_without_due_date_has_no_fine() {
        let policy = LateFeePolicy::new(Money::from_major(10));
        let record = PaymentRecord::new(Money::from_major(1_000), Money::ZERO);
        let far_future = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(policy.assess(&record, far_future).fine_amount, Money::ZERO);
    }

    #[test]
    fn test_fine_accrues_daily() {
        let time = SafeTimeProvider::new(TimeSource::Test(due_date()));
        let control = time.test_control().unwrap();
        let policy = LateFeePolicy::new(Money::from_str_exact("12.50").unwrap()).with_grace_period(2);
        let record = overdue_record();

        let mut fines = Vec::new();
        for _ in 0..6 {
            control.advance(Duration::days(1));
            fines.push(policy.assess(&record, time.now()).fine_amount);
        }

        assert_eq!(fines[0], Money::ZERO);
        assert_eq!(fines[1], Money::ZERO);
        assert_eq!(fines[2], Money::from_str_exact("12.50").unwrap());
        assert_eq!(fines[5], Money::from_major(50));
    }

    #[test]
    fn test_apply_sets_fine_and_due() {
        let policy = LateFeePolicy::new(Money::from_major(10));
        let record = PaymentRecord::new(Money::from_major(1_000), Money::from_major(400)).with_due_date(due_date());
        let as_of = due_date() + Duration::days(5);

        let updated = policy.apply_to(&record, as_of);
        assert_eq!(updated.late_fine_amount, Some(Money::from_major(50)));
        assert_eq!(updated.amount_paid, record.amount_paid);
        assert_eq!(policy.due_with_fine(&record, as_of), Money::from_major(650));

        // untouched record outside any overdue window keeps no fine
        let current = policy.apply_to(&record, due_date());
        assert_eq!(current.late_fine_amount, None);
    }

    #[test]
    fn test_apply_replaces_existing_fine() {
        let policy = LateFeePolicy::new(Money::from_major(10));
        let record = overdue_record().with_late_fine(Money::from_major(500));

        let updated = policy.apply_to(&record, due_date() + Duration::days(2));
        assert_eq!(updated.late_fine_amount, Some(Money::from_major(20)));
        assert_eq!(calculate_due_amount(&updated), Money::from_major(1_020));
    }

    #[test]
    fn test_rent_unpaid_when_payment_covered_fine() {
        let policy = LateFeePolicy::new(Money::from_major(10));
        // 1000 paid, but 120 of it settled the fine, so 120 rent is still open
        let record = PaymentRecord::new(Money::from_major(1_000), Money::from_major(1_000))
            .with_due_date(due_date())
            .with_late_fine(Money::from_major(120));
        let as_of = due_date() + Duration::days(10);

        let assessment = policy.assess(&record, as_of);
        assert_eq!(assessment.days_overdue, 10);
        assert!(assessment.fine_amount.is_positive());
        assert_eq!(payment_status(&record, as_of), PaymentStatus::Overdue);
    }
}
