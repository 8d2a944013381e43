use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{PaymentError, Result};
use crate::format::CurrencyFormat;
use crate::payments::{LateFeePolicy, PaymentCalculation, PaymentPlan};
use crate::types::PaymentFrequency;

/// payment terms of a rental agreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementTerms {
    pub agreement_type: AgreementType,
    pub financial_terms: FinancialTerms,
    #[serde(default)]
    pub late_fee: Option<LateFeePolicy>,
    #[serde(default)]
    pub currency: CurrencyFormat,
}

/// agreement type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementType {
    /// rent billed weekly, no financing
    ShortTermRental,
    /// rent billed monthly, no financing
    LongTermRental,
    /// vehicle price financed over the term, ownership at the end
    LeaseToOwn,
}

/// amounts, rate and term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialTerms {
    /// rent total or vehicle price
    pub contract_amount: Money,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub annual_rate: Rate,
    pub frequency: PaymentFrequency,
    pub duration_months: u32,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
}

impl AgreementTerms {
    /// weekly rental; the contract amount is the rent for every week in the term
    pub fn weekly_rental(weekly_rent: Money, duration_months: u32) -> Self {
        let weeks = PaymentFrequency::Weekly.total_periods(duration_months);

        Self {
            agreement_type: AgreementType::ShortTermRental,
            financial_terms: FinancialTerms {
                contract_amount: weekly_rent * Decimal::from(weeks),
                down_payment: Money::ZERO,
                annual_rate: Rate::ZERO,
                frequency: PaymentFrequency::Weekly,
                duration_months,
                start_date: None,
            },
            late_fee: Some(
                LateFeePolicy::new(Money::from_major(20))
                    .with_grace_period(2)
                    .with_maximum(weekly_rent),
            ),
            currency: CurrencyFormat::default(),
        }
    }

    /// monthly rental
    pub fn monthly_rental(monthly_rent: Money, duration_months: u32) -> Self {
        Self {
            agreement_type: AgreementType::LongTermRental,
            financial_terms: FinancialTerms {
                contract_amount: monthly_rent * Decimal::from(duration_months),
                down_payment: Money::ZERO,
                annual_rate: Rate::ZERO,
                frequency: PaymentFrequency::Monthly,
                duration_months,
                start_date: None,
            },
            late_fee: Some(
                LateFeePolicy::new(Money::from_major(50))
                    .with_grace_period(5)
                    .with_maximum(monthly_rent),
            ),
            currency: CurrencyFormat::default(),
        }
    }

    /// lease-to-own: the price less down payment is amortized monthly
    pub fn lease_to_own(
        vehicle_price: Money,
        down_payment: Money,
        annual_rate: Rate,
        duration_months: u32,
    ) -> Self {
        Self {
            agreement_type: AgreementType::LeaseToOwn,
            financial_terms: FinancialTerms {
                contract_amount: vehicle_price,
                down_payment,
                annual_rate,
                frequency: PaymentFrequency::Monthly,
                duration_months,
                start_date: None,
            },
            late_fee: Some(LateFeePolicy::new(Money::from_major(100)).with_grace_period(7)),
            currency: CurrencyFormat::default(),
        }
    }

    pub fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.financial_terms.start_date = Some(start_date);
        self
    }

    pub fn with_late_fee(mut self, policy: Option<LateFeePolicy>) -> Self {
        self.late_fee = policy;
        self
    }

    /// amount scheduled for repayment
    pub fn financed_amount(&self) -> Money {
        self.financial_terms.contract_amount - self.financial_terms.down_payment
    }

    pub fn validate(&self) -> Result<()> {
        let terms = &self.financial_terms;

        if !terms.contract_amount.is_positive() {
            return Err(PaymentError::InvalidConfiguration {
                message: format!("contract amount must be positive, got {}", terms.contract_amount),
            });
        }

        if terms.down_payment.is_negative() || terms.down_payment >= terms.contract_amount {
            return Err(PaymentError::InvalidConfiguration {
                message: format!(
                    "down payment {} must be between zero and the contract amount {}",
                    terms.down_payment, terms.contract_amount
                ),
            });
        }

        if terms.annual_rate.is_negative() {
            return Err(PaymentError::InvalidInterestRate { rate: terms.annual_rate });
        }

        if terms.frequency.total_periods(terms.duration_months) == 0 {
            return Err(PaymentError::InvalidDuration {
                duration_months: terms.duration_months,
                frequency: terms.frequency.to_string(),
            });
        }

        if let Some(policy) = &self.late_fee {
            if policy.daily_fine.is_negative() {
                return Err(PaymentError::InvalidConfiguration {
                    message: format!("daily fine must not be negative, got {}", policy.daily_fine),
                });
            }

            if let Some(maximum) = policy.maximum_fine.filter(|m| m.is_negative()) {
                return Err(PaymentError::InvalidConfiguration {
                    message: format!("maximum fine must not be negative, got {}", maximum),
                });
            }
        }

        Ok(())
    }

    /// schedule builder for these terms
    pub fn plan(&self) -> PaymentPlan {
        let terms = &self.financial_terms;
        let plan = PaymentPlan::new()
            .principal(self.financed_amount())
            .rate(terms.annual_rate)
            .frequency(terms.frequency)
            .duration_months(terms.duration_months);

        match terms.start_date {
            Some(date) => plan.start_date(date),
            None => plan,
        }
    }

    /// validate and compute the payment schedule
    pub fn calculate_schedule(&self, time_provider: &SafeTimeProvider) -> Result<PaymentCalculation> {
        self.validate()?;
        self.plan().calculate_with_time(time_provider)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let terms: AgreementTerms = serde_json::from_str(json)?;
        terms.validate()?;
        Ok(terms)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
