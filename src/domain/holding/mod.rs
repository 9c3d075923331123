use std::{fmt, str::FromStr};

use rust_decimal::Decimal;

use super::error::{Error, Result};

/// One fund position as listed on a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holding {
    pub name: String,
    pub symbol: String,
    pub shares: Decimal,
    pub price: Decimal,
}

impl Holding {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        shares: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            shares,
            price,
        }
    }

    /// Builds a holding from the raw text of a statement row. The amounts
    /// must be non-negative and their product must fit a [`Decimal`].
    pub fn parse(name: &str, symbol: &str, shares: &str, price: &str) -> Result<Self> {
        let holding = Self::new(
            name.trim(),
            symbol.trim(),
            parse_amount("Shares", shares)?,
            parse_amount("Share Price", price)?,
        );
        holding.value()?;
        Ok(holding)
    }

    pub fn value(&self) -> Result<Decimal> {
        self.shares
            .checked_mul(self.price)
            .ok_or_else(|| Error::Overflow {
                what: format!("value of {}", self.symbol),
            })
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>10} {:>10} {:>10}   {}",
            self.symbol,
            cents(self.shares),
            cents(self.price),
            self.value().map_or_else(|_| "overflow".to_owned(), cents),
            self.name
        )
    }
}

/// Formats with two decimals, rounding half away from zero.
pub(crate) fn cents(amount: Decimal) -> String {
    let mut rounded =
        amount.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let amount = Decimal::from_str(&cleaned).map_err(|_| Error::InvalidNumber {
        field,
        value: raw.to_owned(),
    })?;

    if amount.is_sign_negative() || cleaned.starts_with('-') {
        return Err(Error::NegativeNumber {
            field,
            value: raw.to_owned(),
        });
    }

    Ok(amount)
}
