use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::errors::{PaymentError, Result};
use crate::types::PaymentRecord;

/// order in which a received amount settles a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationOrder {
    /// late fine, then rent
    FineFirst,
    /// rent, then late fine
    RentFirst,
}

/// split of a received amount across a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaymentAllocation {
    pub to_late_fine: Money,
    pub to_rent: Money,
    pub excess: Money,
}

impl PaymentAllocation {
    pub fn total_applied(&self) -> Money {
        self.to_late_fine + self.to_rent
    }

    /// the record after this allocation has been posted
    pub fn applied_to(&self, record: &PaymentRecord) -> PaymentRecord {
        let mut updated = record.clone();
        updated.amount_paid += self.total_applied();
        updated
    }
}

/// apply a received amount, late fine first
pub fn allocate_payment(record: &PaymentRecord, received: Money) -> Result<PaymentAllocation> {
    allocate_payment_with_order(record, received, AllocationOrder::FineFirst)
}

/// apply a received amount in the given order.
///
/// `amount_paid` on a record is a single running total, so money already
/// paid is treated as having settled the fine portion first.
pub fn allocate_payment_with_order(
    record: &PaymentRecord,
    received: Money,
    order: AllocationOrder,
) -> Result<PaymentAllocation> {
    if !received.is_positive() {
        return Err(PaymentError::InvalidPaymentAmount { amount: received });
    }

    let fine_outstanding = record.fine_outstanding();
    let rent_outstanding = record.rent_outstanding();

    let mut remaining = received;
    let mut allocation = PaymentAllocation::default();

    let buckets = match order {
        AllocationOrder::FineFirst => [(Bucket::Fine, fine_outstanding), (Bucket::Rent, rent_outstanding)],
        AllocationOrder::RentFirst => [(Bucket::Rent, rent_outstanding), (Bucket::Fine, fine_outstanding)],
    };

    for (bucket, outstanding) in buckets {
        let applied = remaining.min(outstanding);
        match bucket {
            Bucket::Fine => allocation.to_late_fine = applied,
            Bucket::Rent => allocation.to_rent = applied,
        }
        remaining -= applied;

        if remaining.is_zero() {
            break;
        }
    }

    allocation.excess = remaining;

    debug!(
        payment_id = %record.id,
        %received,
        to_late_fine = %allocation.to_late_fine,
        to_rent = %allocation.to_rent,
        excess = %allocation.excess,
        "allocated payment"
    );

    Ok(allocation)
}

#[derive(Debug, Clone, Copy)]
enum Bucket {
    Fine,
    Rent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::due::calculate_due_amount;

    fn record() -> PaymentRecord {
        PaymentRecord::new(Money::from_major(1_000), Money::from_major(500))
            .with_late_fine(Money::from_major(120))
    }

    #[test]
    fn test_fine_first_with_excess() {
        let allocation = allocate_payment(&record(), Money::from_major(700)).unwrap();

        // 500 already paid went to the fine first, leaving 620 rent
        assert_eq!(allocation.to_late_fine, Money::ZERO);
        assert_eq!(allocation.to_rent, Money::from_major(620));
        assert_eq!(allocation.excess, Money::from_major(80));
    }

    #[test]
    fn test_fine_settled_before_rent() {
        let unpaid = PaymentRecord::new(Money::from_major(1_000), Money::ZERO)
            .with_late_fine(Money::from_major(120));

        let allocation = allocate_payment(&unpaid, Money::from_major(700)).unwrap();
        assert_eq!(allocation.to_late_fine, Money::from_major(120));
        assert_eq!(allocation.to_rent, Money::from_major(580));
        assert_eq!(allocation.excess, Money::ZERO);
    }

    #[test]
    fn test_rent_first() {
        let unpaid = PaymentRecord::new(Money::from_major(1_000), Money::ZERO)
            .with_late_fine(Money::from_major(120));

        let allocation =
            allocate_payment_with_order(&unpaid, Money::from_major(1_050), AllocationOrder::RentFirst).unwrap();
        assert_eq!(allocation.to_rent, Money::from_major(1_000));
        assert_eq!(allocation.to_late_fine, Money::from_major(50));
        assert_eq!(allocation.excess, Money::ZERO);
    }

    #[test]
    fn test_applied_record_due_drops() {
        let before = record();
        let allocation = allocate_payment(&before, Money::from_major(200)).unwrap();
        let after = allocation.applied_to(&before);

        assert_eq!(after.amount_paid, Money::from_major(700));
        assert_eq!(calculate_due_amount(&after), Money::from_major(420));
    }

    #[test]
    fn test_full_settlement() {
        let before = record();
        let allocation = allocate_payment(&before, calculate_due_amount(&before)).unwrap();

        assert_eq!(allocation.excess, Money::ZERO);
        assert_eq!(calculate_due_amount(&allocation.applied_to(&before)), Money::ZERO);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        assert!(matches!(
            allocate_payment(&record(), Money::ZERO),
            Err(PaymentError::InvalidPaymentAmount { .. })
        ));
        assert!(matches!(
            allocate_payment(&record(), Money::from_major(-5)),
            Err(PaymentError::InvalidPaymentAmount { .. })
        ));
    }
}
