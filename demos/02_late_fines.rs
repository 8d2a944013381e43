/// late fines - fines accrue after the grace period, payments settle fines first
use rental_payments::{
    allocate_payment, calculate_due_amount, format_currency, payment_status, CurrencyFormat,
    LateFeePolicy, Money, PaymentRecord, PaymentSummary, SafeTimeProvider, TimeSource,
};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== late fines ===\n");

    let fmt = CurrencyFormat::default();
    let due_date = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(due_date));
    let controller = time.test_control().unwrap();

    let policy = LateFeePolicy::new(Money::from_major(25))
        .with_grace_period(3)
        .with_maximum(Money::from_major(400));
    let record = PaymentRecord::new(Money::from_major(2_500), Money::ZERO).with_due_date(due_date);

    for _ in 0..10 {
        controller.advance(Duration::days(1));
        let assessment = policy.assess(&record, time.now());
        println!(
            "{} days overdue, fine {}",
            assessment.days_overdue,
            format_currency(assessment.fine_amount, &fmt),
        );
    }

    let fined = policy.apply_to(&record, time.now());
    println!("\nstatus: {:?}", payment_status(&fined, time.now()));
    println!("due: {}", format_currency(calculate_due_amount(&fined), &fmt));

    // customer pays 1,000
    let allocation = allocate_payment(&fined, Money::from_major(1_000))?;
    println!(
        "\npaid 1,000: fine {}, rent {}, excess {}",
        format_currency(allocation.to_late_fine, &fmt),
        format_currency(allocation.to_rent, &fmt),
        format_currency(allocation.excess, &fmt),
    );

    let after = allocation.applied_to(&fined);
    println!("due after payment: {}", format_currency(calculate_due_amount(&after), &fmt));

    let summary = PaymentSummary::from_records(&[after], time.now());
    println!("\n{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
