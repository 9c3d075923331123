use std::{collections::BTreeMap, fmt, fs, path::Path, str::FromStr};

use super::error::{Error, Result};

/// Maps fund symbols to asset-class codes such as `DS` (domestic stock) or
/// `IB` (international bond).
///
/// The table is read from a flat `SYMBOL:CLASS` file, one fund per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationTable {
    classes: BTreeMap<String, String>,
}

impl ClassificationTable {
    pub fn load(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|err| crate::error::Error::open(path, err))?;
        let table: Self = content.parse()?;
        log::debug!("{table} from {}", path.display());
        Ok(table)
    }

    pub fn lookup(&self, symbol: &str) -> Option<&str> {
        self.classes.get(symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Entries sorted by symbol. Each call starts a fresh pass.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.classes
            .iter()
            .map(|(symbol, class)| (symbol.as_str(), class.as_str()))
    }

    fn insert(&mut self, line: usize, symbol: &str, class: &str) -> Result<()> {
        match self.classes.get(symbol) {
            Some(existing) if existing != class => Err(Error::MalformedClassification {
                line,
                reason: format!("{symbol} is already classified as {existing}, not {class}"),
            }),
            Some(_) => Ok(()),
            None => {
                self.classes.insert(symbol.to_owned(), class.to_owned());
                Ok(())
            }
        }
    }
}

impl FromStr for ClassificationTable {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        let mut table = Self::default();

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (symbol, class) =
                line.split_once(':')
                    .ok_or_else(|| Error::MalformedClassification {
                        line: line_no,
                        reason: format!("expected SYMBOL:CLASS, found {line:?}"),
                    })?;
            let (symbol, class) = (symbol.trim(), class.trim());

            if symbol.is_empty() || class.is_empty() || class.contains(':') {
                return Err(Error::MalformedClassification {
                    line: line_no,
                    reason: format!("expected SYMBOL:CLASS, found {line:?}"),
                });
            }
            if !class
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(Error::MalformedClassification {
                    line: line_no,
                    reason: format!("class code {class:?} may only hold letters, digits, '_' and '-'"),
                });
            }

            table.insert(line_no, symbol, class)?;
        }

        Ok(table)
    }
}

impl fmt::Display for ClassificationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DB contains {} funds", self.classes.len())
    }
}

/// Coarse grouping used by the report summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SummaryBucket {
    Stocks,
    Bonds,
    Other,
}

impl SummaryBucket {
    pub const ALL: [SummaryBucket; 3] = [Self::Stocks, Self::Bonds, Self::Other];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Stocks => "Stocks",
            Self::Bonds => "Bonds",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for SummaryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
