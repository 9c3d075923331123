use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    config::StatementColumns,
    domain::{holding::Holding, portfolio::Portfolio},
    error::{Error, Result},
};

/// Reads holdings out of a brokerage holdings export.
///
/// The export concatenates the holdings table with an unrelated transactions
/// table. Holdings rows always start with a numeric account number, so the
/// first row whose account number does not start with a digit ends the scan.
#[derive(Debug, Clone, Default)]
pub struct StatementLoader {
    columns: StatementColumns,
}

struct ColumnIndexes {
    account_number: usize,
    investment_name: usize,
    symbol: usize,
    shares: usize,
    share_price: usize,
}

impl StatementLoader {
    pub fn new(columns: StatementColumns) -> Self {
        Self { columns }
    }

    pub fn load_path(&self, path: impl AsRef<Path>, portfolio: &mut Portfolio) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::open(path, err))?;
        let loaded = self.load(file, portfolio)?;
        log::debug!("loaded {loaded} holdings from {}", path.display());
        Ok(loaded)
    }

    /// Appends every holding of the first table to `portfolio` and returns how
    /// many were added.
    pub fn load(&self, reader: impl Read, portfolio: &mut Portfolio) -> Result<usize> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let columns = self.column_indexes(reader.headers()?)?;
        let mut loaded = 0;

        for record in reader.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }

            let account = record.get(columns.account_number).unwrap_or_default();
            if !account.starts_with(|c: char| c.is_ascii_digit()) {
                log::debug!("holdings table ended at account number {account:?}");
                break;
            }

            let field = |idx: usize| record.get(idx).unwrap_or_default();
            let holding = Holding::parse(
                field(columns.investment_name),
                field(columns.symbol),
                field(columns.shares),
                field(columns.share_price),
            )
            .map_err(|source| Error::MalformedRow {
                line: record.position().map_or(0, |pos| pos.line()),
                source,
            })?;

            portfolio.add_holding(holding);
            loaded += 1;
        }

        Ok(loaded)
    }

    fn column_indexes(&self, headers: &StringRecord) -> Result<ColumnIndexes> {
        let position = |name: &str| headers.iter().position(|header| header == name);

        let missing: Vec<String> = self
            .columns
            .names()
            .into_iter()
            .filter(|&name| position(name).is_none())
            .map(str::to_owned)
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns { columns: missing });
        }

        let index = |name: &str| position(name).unwrap_or_default();
        Ok(ColumnIndexes {
            account_number: index(&self.columns.account_number),
            investment_name: index(&self.columns.investment_name),
            symbol: index(&self.columns.symbol),
            shares: index(&self.columns.shares),
            share_price: index(&self.columns.share_price),
        })
    }
}
