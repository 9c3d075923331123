use std::{collections::BTreeMap, fmt};

use itertools::Itertools;
use rust_decimal::Decimal;

use super::{
    classification::ClassificationTable,
    error::{Error, Result},
    holding::Holding,
};

/// Report label of [`Bucket::Unclassified`]. Class codes never contain `?`.
pub const UNCLASSIFIED_LABEL: &str = "??";

/// Allocation bucket a holding's value is accumulated into.
///
/// Ordering puts every asset-class code first, sorted, and the unclassified
/// bucket last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Class(String),
    Unclassified,
}

impl Bucket {
    pub fn code(&self) -> Option<&str> {
        match self {
            Bucket::Class(code) => Some(code),
            Bucket::Unclassified => None,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Class(code) => f.pad(code),
            Bucket::Unclassified => f.pad(UNCLASSIFIED_LABEL),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocations {
    pub values: BTreeMap<Bucket, Decimal>,
    /// Holdings that had no entry in the classification table, in portfolio
    /// order.
    pub unclassified: Vec<Holding>,
}

impl Allocations {
    pub fn total(&self) -> Decimal {
        self.values.values().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Portfolio {
    name: String,
    holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            holdings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn add_holding(&mut self, holding: Holding) {
        self.holdings.push(holding);
    }

    pub fn total_value(&self) -> Result<Decimal> {
        self.holdings.iter().try_fold(Decimal::ZERO, |total, holding| {
            total
                .checked_add(holding.value()?)
                .ok_or_else(|| Error::Overflow {
                    what: format!("total value of {}", self.name),
                })
        })
    }

    pub fn allocations(&self, table: &ClassificationTable) -> Result<Allocations> {
        let values = self
            .holdings
            .iter()
            .map(|holding| -> Result<(Bucket, Decimal)> {
                let bucket = match table.lookup(&holding.symbol) {
                    Some(code) => Bucket::Class(code.to_owned()),
                    None => Bucket::Unclassified,
                };
                Ok((bucket, holding.value()?))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .into_grouping_map()
            .fold(Some(Decimal::ZERO), |sum, _, value| {
                sum.and_then(|sum| sum.checked_add(value))
            })
            .into_iter()
            .map(|(bucket, sum)| {
                sum.map(|sum| (bucket.clone(), sum))
                    .ok_or_else(|| Error::Overflow {
                        what: format!("{bucket} allocation of {}", self.name),
                    })
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let unclassified = self
            .holdings
            .iter()
            .filter(|holding| table.lookup(&holding.symbol).is_none())
            .cloned()
            .collect();

        Ok(Allocations {
            values,
            unclassified,
        })
    }

    /// One line per holding, in statement order.
    pub fn render_holdings(&self) -> String {
        self.holdings
            .iter()
            .map(|holding| format!("{holding}\n"))
            .collect()
    }
}

impl fmt::Display for Portfolio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.name,
            self.total_value()
                .map_or_else(|_| "overflow".to_owned(), super::holding::cents)
        )
    }
}

impl Extend<Holding> for Portfolio {
    fn extend<T: IntoIterator<Item = Holding>>(&mut self, iter: T) {
        self.holdings.extend(iter);
    }
}
