use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{round_half_up, Money, Rate};
use crate::payments::{calculate_due_amount, payment_status};
use crate::types::{AgreementId, PaymentRecord, PaymentStatus};

/// totals over a set of payment records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaymentSummary {
    pub record_count: u32,
    pub total_billed: Money,
    pub total_late_fines: Money,
    pub total_paid: Money,
    pub total_due: Money,
    pub overdue_amount: Money,
    pub pending_count: u32,
    pub partial_count: u32,
    pub overdue_count: u32,
    pub paid_count: u32,
}

impl PaymentSummary {
    pub fn from_records<'a, I>(records: I, as_of: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a PaymentRecord>,
    {
        let mut summary = PaymentSummary::default();
        for record in records {
            summary.add(record, as_of);
        }
        summary
    }

    fn add(&mut self, record: &PaymentRecord, as_of: DateTime<Utc>) {
        let due = calculate_due_amount(record);

        self.record_count += 1;
        self.total_billed += record.amount;
        self.total_late_fines += record.late_fine();
        self.total_paid += record.amount_paid;
        self.total_due += due;

        match payment_status(record, as_of) {
            PaymentStatus::Pending => self.pending_count += 1,
            PaymentStatus::Partial => self.partial_count += 1,
            PaymentStatus::Overdue => {
                self.overdue_count += 1;
                self.overdue_amount += due;
            }
            PaymentStatus::Paid => self.paid_count += 1,
        }
    }

    pub fn count(&self, status: PaymentStatus) -> u32 {
        match status {
            PaymentStatus::Pending => self.pending_count,
            PaymentStatus::Partial => self.partial_count,
            PaymentStatus::Overdue => self.overdue_count,
            PaymentStatus::Paid => self.paid_count,
        }
    }

    /// share of rent and fines collected, capped at 100%
    pub fn collection_rate(&self) -> Rate {
        let owed = (self.total_billed + self.total_late_fines).as_decimal();
        if owed <= Decimal::ZERO {
            return Rate::ZERO;
        }

        let rate = (self.total_paid.as_decimal() / owed).min(Decimal::ONE);
        Rate::from_decimal(round_half_up(rate, 4))
    }
}

/// one summary per agreement; records without an agreement are skipped
pub fn group_by_agreement<'a, I>(records: I, as_of: DateTime<Utc>) -> BTreeMap<AgreementId, PaymentSummary>
where
    I: IntoIterator<Item = &'a PaymentRecord>,
{
    let mut groups: BTreeMap<AgreementId, PaymentSummary> = BTreeMap::new();

    for record in records {
        if let Some(agreement_id) = record.agreement_id {
            groups.entry(agreement_id).or_default().add(record, as_of);
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap()
    }

    fn records(agreement_a: AgreementId, agreement_b: AgreementId) -> Vec<PaymentRecord> {
        let last_month = as_of() - Duration::days(30);
        let next_week = as_of() + Duration::days(7);

        vec![
            // paid in full
            PaymentRecord::new(Money::from_major(1_000), Money::from_major(1_000))
                .with_due_date(last_month)
                .with_agreement(agreement_a),
            // overdue with a fine
            PaymentRecord::new(Money::from_major(1_000), Money::from_major(200))
                .with_late_fine(Money::from_major(100))
                .with_due_date(last_month)
                .with_agreement(agreement_a),
            // partly paid, not yet due
            PaymentRecord::new(Money::from_major(1_000), Money::from_major(400))
                .with_due_date(next_week)
                .with_agreement(agreement_b),
            // untouched, not yet due
            PaymentRecord::new(Money::from_major(1_000), Money::ZERO)
                .with_due_date(next_week)
                .with_agreement(agreement_b),
        ]
    }

    #[test]
    fn test_summary_totals() {
        let set = records(Uuid::new_v4(), Uuid::new_v4());
        let summary = PaymentSummary::from_records(&set, as_of());

        assert_eq!(summary.record_count, 4);
        assert_eq!(summary.total_billed, Money::from_major(4_000));
        assert_eq!(summary.total_late_fines, Money::from_major(100));
        assert_eq!(summary.total_paid, Money::from_major(1_600));
        assert_eq!(summary.total_due, Money::from_major(2_500));
        assert_eq!(summary.overdue_amount, Money::from_major(900));

        assert_eq!(summary.count(PaymentStatus::Paid), 1);
        assert_eq!(summary.count(PaymentStatus::Overdue), 1);
        assert_eq!(summary.count(PaymentStatus::Partial), 1);
        assert_eq!(summary.count(PaymentStatus::Pending), 1);

        // 1600 / 4100
        assert_eq!(summary.collection_rate().as_decimal(), dec!(0.3902));
    }

    #[test]
    fn test_empty_summary() {
        let empty: Vec<PaymentRecord> = Vec::new();
        let summary = PaymentSummary::from_records(&empty, as_of());
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.collection_rate(), Rate::ZERO);
    }

    #[test]
    fn test_collection_rate_caps_at_one() {
        let set = vec![PaymentRecord::new(Money::from_major(100), Money::from_major(250))];
        let summary = PaymentSummary::from_records(&set, as_of());

        assert_eq!(summary.total_due, Money::ZERO);
        assert_eq!(summary.collection_rate(), Rate::ONE);
    }

    #[test]
    fn test_group_by_agreement() {
        let agreement_a = Uuid::new_v4();
        let agreement_b = Uuid::new_v4();
        let mut set = records(agreement_a, agreement_b);
        set.push(PaymentRecord::new(Money::from_major(50), Money::ZERO));

        let groups = group_by_agreement(&set, as_of());
        assert_eq!(groups.len(), 2);

        let a = &groups[&agreement_a];
        assert_eq!(a.record_count, 2);
        assert_eq!(a.total_due, Money::from_major(900));
        assert_eq!(a.overdue_count, 1);

        let b = &groups[&agreement_b];
        assert_eq!(b.record_count, 2);
        assert_eq!(b.total_due, Money::from_major(1_600));
        assert_eq!(b.overdue_count, 0);
    }
}
