use std::{fmt, io::Write};

use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    config::AssetClassGroups,
    domain::{
        classification::{ClassificationTable, SummaryBucket},
        error::{Error, Result},
        holding::cents,
        portfolio::{Bucket, Portfolio},
    },
};

const RULE: &str = "==============================";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRow {
    pub bucket: Bucket,
    pub value: Decimal,
    pub percent: Decimal,
}

/// Non-fatal findings printed after the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    UnclassifiedSymbol { symbol: String, name: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnclassifiedSymbol { symbol, name } => write!(
                f,
                "{symbol} ({name}) has no asset class, counted as unclassified ({})",
                Bucket::Unclassified
            ),
        }
    }
}

/// Value and percentage of a portfolio per asset class, plus the
/// stocks/bonds/other summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationReport {
    pub rows: Vec<AllocationRow>,
    pub total: Decimal,
    /// Sum of the row percentages, 100 up to rounding.
    pub total_percent: Decimal,
    pub summary: Vec<(SummaryBucket, Decimal)>,
    pub warnings: Vec<Warning>,
}

impl AllocationReport {
    pub fn build(
        portfolio: &Portfolio,
        table: &ClassificationTable,
        groups: &AssetClassGroups,
    ) -> Result<Self> {
        let total = portfolio.total_value()?;
        if total.is_zero() {
            return Err(Error::EmptyPortfolio {
                name: portfolio.name().to_owned(),
            });
        }

        let allocations = portfolio.allocations(table)?;
        let mut summary: Vec<_> = SummaryBucket::ALL
            .into_iter()
            .map(|bucket| (bucket, Decimal::ZERO))
            .collect();

        let rows = allocations
            .values
            .into_iter()
            .map(|(bucket, value)| -> Result<AllocationRow> {
                // Each bucket is at most the total, so the share is within 0..=1.
                let percent = value
                    .checked_div(total)
                    .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
                    .ok_or_else(|| Error::Overflow {
                        what: format!("{bucket} percentage of {}", portfolio.name()),
                    })?;
                let group = groups.bucket(bucket.code());
                if let Some((_, sum)) = summary.iter_mut().find(|(b, _)| *b == group) {
                    *sum += percent;
                }
                Ok(AllocationRow {
                    bucket,
                    value,
                    percent,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let total_percent = rows.iter().map(|row| row.percent).sum();
        let warnings = allocations
            .unclassified
            .into_iter()
            .map(|holding| Warning::UnclassifiedSymbol {
                symbol: holding.symbol,
                name: holding.name,
            })
            .collect();

        Ok(Self {
            rows,
            total,
            total_percent,
            summary,
            warnings,
        })
    }

    pub fn summary_percent(&self, bucket: SummaryBucket) -> Decimal {
        self.summary
            .iter()
            .find(|(b, _)| *b == bucket)
            .map_or(Decimal::ZERO, |(_, percent)| *percent)
    }

    pub fn write_csv(&self, writer: impl Write) -> csv::Result<()> {
        let mut writer = Writer::from_writer(writer);

        for row in &self.rows {
            writer.serialize(CsvRow {
                kind: row.bucket.to_string(),
                value: Some(cents(row.value)),
                percent: cents(row.percent),
            })?;
        }
        for (bucket, percent) in &self.summary {
            writer.serialize(CsvRow {
                kind: bucket.to_string(),
                value: None,
                percent: cents(*percent),
            })?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl fmt::Display for AllocationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>6} : {:>10} {:>8}", "Type", "Value", "Perc")?;
        writeln!(f, "{RULE}")?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>6} : {:>10} {:>8}",
                row.bucket,
                cents(row.value),
                cents(row.percent)
            )?;
        }
        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "{:>6} : {:>10} {:>8}",
            "",
            cents(self.total),
            cents(self.total_percent)
        )?;

        writeln!(f)?;
        writeln!(f, "Summary")?;
        writeln!(f, "{RULE}")?;
        for (bucket, percent) in &self.summary {
            writeln!(f, "{bucket:>6} : {:>8}", cents(*percent))?;
        }

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings")?;
            writeln!(f, "{RULE}")?;
            for warning in &self.warnings {
                writeln!(f, "{warning}")?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct CsvRow {
    #[serde(rename = "type")]
    kind: String,
    value: Option<String>,
    percent: String,
}
