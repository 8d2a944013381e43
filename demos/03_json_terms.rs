/// json terms - load agreement terms and print the schedule as json
use rental_payments::{AgreementTerms, SafeTimeProvider, TimeSource};

const TERMS: &str = r#"{
    "agreement_type": "lease_to_own",
    "financial_terms": {
        "contract_amount": "85000",
        "down_payment": "10000",
        "annual_rate": "0.045",
        "frequency": "monthly",
        "duration_months": 24,
        "start_date": "2024-02-01T00:00:00Z"
    },
    "late_fee": {
        "daily_fine": "50",
        "grace_period_days": 5,
        "maximum_fine": "1500"
    }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== json terms ===\n");

    let terms = AgreementTerms::from_json(TERMS)?;
    let time = SafeTimeProvider::new(TimeSource::System);

    let calc = terms.calculate_schedule(&time)?;
    println!("{}", calc.to_json_pretty()?);

    Ok(())
}
