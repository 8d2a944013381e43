pub mod allocation;
pub mod due;
pub mod late_fee;
pub mod schedule;

pub use allocation::{allocate_payment, allocate_payment_with_order, AllocationOrder, PaymentAllocation};
pub use due::{calculate_due_amount, payment_status};
pub use late_fee::{LateFeePolicy, LateFineAssessment};
pub use schedule::{calculate_payment, PaymentCalculation, PaymentPlan, PaymentScheduleItem};
