pub mod config;
pub mod decimal;
pub mod errors;
pub mod format;
pub mod payments;
pub mod report;
pub mod types;

// re-export key types
pub use config::{AgreementTerms, AgreementType, FinancialTerms};
pub use decimal::{Money, Rate};
pub use errors::{PaymentError, Result};
pub use format::{format_currency, format_date, CurrencyFormat};
pub use payments::{
    allocate_payment, calculate_due_amount, calculate_payment, payment_status, LateFeePolicy,
    LateFineAssessment, PaymentAllocation, PaymentCalculation, PaymentPlan, PaymentScheduleItem,
};
pub use report::{group_by_agreement, PaymentSummary};
pub use types::{AgreementId, PaymentFrequency, PaymentId, PaymentRecord, PaymentStatus};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
