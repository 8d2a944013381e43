/// quick start - monthly schedule and a due amount
use rental_payments::{
    calculate_due_amount, calculate_payment, format_currency, format_date, CurrencyFormat, Money,
    PaymentFrequency, PaymentRecord, Rate,
};
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let fmt = CurrencyFormat::default();
    let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();

    // 100,000 financed at 5% over 12 months
    let calc = calculate_payment(
        Money::from_major(100_000),
        Rate::from_percentage(5),
        PaymentFrequency::Monthly,
        start,
        12,
    )?;

    println!("payment: {}", format_currency(calc.payment_amount, &fmt));
    println!("total:   {}\n", format_currency(calc.total_amount, &fmt));

    for item in &calc.schedule {
        println!(
            "{:>2}  {}  {:>14}  remaining {:>14}",
            item.period_number,
            format_date(item.due_date),
            format_currency(item.amount, &fmt),
            format_currency(item.remaining_balance, &fmt),
        );
    }

    // a record with a late fine
    let record = PaymentRecord::new(Money::from_major(1_000), Money::from_major(500))
        .with_late_fine(Money::from_major(120));
    println!("\ndue on record: {}", format_currency(calculate_due_amount(&record), &fmt));

    Ok(())
}
