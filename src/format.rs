use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, CURRENCY_SCALE};

/// how amounts are rendered for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub symbol_first: bool,
    pub thousands_separator: char,
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "QAR ".to_string(),
            symbol_first: true,
            thousands_separator: ',',
            decimal_separator: '.',
        }
    }
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// symbol printed after the amount, e.g. "1.234,50 €"
    pub fn suffix(symbol: impl Into<String>, thousands_separator: char, decimal_separator: char) -> Self {
        Self {
            symbol: symbol.into(),
            symbol_first: false,
            thousands_separator,
            decimal_separator,
        }
    }
}

/// render an amount rounded half-up to cents with grouped thousands
pub fn format_currency(amount: Money, format: &CurrencyFormat) -> String {
    let rounded = amount.round_currency().as_decimal();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    // fixed two decimals, "1234.5" -> "1234.50"
    let plain = format!("{:.*}", CURRENCY_SCALE as usize, rounded.abs());
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(format.thousands_separator);
        }
        grouped.push(digit);
    }

    let number = format!("{}{}{}", grouped, format.decimal_separator, fraction);
    let sign = if negative { "-" } else { "" };

    if format.symbol_first {
        format!("{}{}{}", sign, format.symbol, number)
    } else {
        format!("{}{}{}", sign, number, format.symbol)
    }
}

/// render a date as dd/mm/yyyy
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}
