/// weekly rental - preset terms, default start date from a controlled clock
use rental_payments::{format_currency, format_date, AgreementTerms, Money, SafeTimeProvider, TimeSource};
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== weekly rental ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    ));

    // 650 a week for three months, no start date so the clock decides
    let terms = AgreementTerms::weekly_rental(Money::from_major(650), 3);
    let calc = terms.calculate_schedule(&time)?;

    println!("weeks billed: {}", calc.periods);
    println!("contract total: {}\n", format_currency(calc.total_amount, &terms.currency));

    for item in &calc.schedule {
        println!(
            "week {:>2} due {}  {}",
            item.period_number,
            format_date(item.due_date),
            format_currency(item.amount, &terms.currency),
        );
    }

    Ok(())
}
