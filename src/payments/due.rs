use chrono::{DateTime, Utc};

use crate::decimal::Money;
use crate::types::{PaymentRecord, PaymentStatus};

/// outstanding balance on a record: rent plus late fine minus what was paid.
/// over-payment clamps to zero; no credit is reported here.
pub fn calculate_due_amount(payment: &PaymentRecord) -> Money {
    payment.total_billed().saturating_sub(payment.amount_paid)
}

/// classify a record as of the given instant
pub fn payment_status(payment: &PaymentRecord, as_of: DateTime<Utc>) -> PaymentStatus {
    let due = calculate_due_amount(payment);

    if due.is_zero() {
        return PaymentStatus::Paid;
    }

    match payment.due_date {
        Some(due_date) if due_date < as_of => PaymentStatus::Overdue,
        _ if payment.amount_paid.is_positive() => PaymentStatus::Partial,
        _ => PaymentStatus::Pending,
    }
}
