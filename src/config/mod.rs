use std::collections::BTreeSet;

use clap::ValueEnum;

use crate::domain::classification::SummaryBucket;

/// Header names of the columns the statement loader needs.
///
/// The defaults match the Vanguard holdings export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementColumns {
    pub account_number: String,
    pub investment_name: String,
    pub symbol: String,
    pub shares: String,
    pub share_price: String,
    pub total_value: String,
}

impl StatementColumns {
    pub fn names(&self) -> [&str; 6] {
        [
            &self.account_number,
            &self.investment_name,
            &self.symbol,
            &self.shares,
            &self.share_price,
            &self.total_value,
        ]
    }
}

impl Default for StatementColumns {
    fn default() -> Self {
        Self {
            account_number: "Account Number".into(),
            investment_name: "Investment Name".into(),
            symbol: "Symbol".into(),
            shares: "Shares".into(),
            share_price: "Share Price".into(),
            total_value: "Total Value".into(),
        }
    }
}

/// Which asset-class codes count as stocks and which as bonds in the report
/// summary. Every other code lands in [`SummaryBucket::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetClassGroups {
    pub stocks: BTreeSet<String>,
    pub bonds: BTreeSet<String>,
}

impl AssetClassGroups {
    pub fn new<S: Into<String>>(
        stocks: impl IntoIterator<Item = S>,
        bonds: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            stocks: stocks.into_iter().map(Into::into).collect(),
            bonds: bonds.into_iter().map(Into::into).collect(),
        }
    }

    /// Stocks win when a code is listed in both sets.
    pub fn bucket(&self, code: Option<&str>) -> SummaryBucket {
        match code {
            Some(code) if self.stocks.contains(code) => SummaryBucket::Stocks,
            Some(code) if self.bonds.contains(code) => SummaryBucket::Bonds,
            _ => SummaryBucket::Other,
        }
    }
}

impl Default for AssetClassGroups {
    fn default() -> Self {
        Self::new(["DS", "IS"], ["DB", "IB"])
    }
}

/// How several statements become portfolios.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MergeMode {
    /// Every statement feeds one portfolio and one report.
    #[default]
    Combined,
    /// One portfolio and report per statement.
    PerFile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_groups() {
        let groups = AssetClassGroups::default();

        assert_eq!(groups.bucket(Some("DS")), SummaryBucket::Stocks);
        assert_eq!(groups.bucket(Some("IS")), SummaryBucket::Stocks);
        assert_eq!(groups.bucket(Some("DB")), SummaryBucket::Bonds);
        assert_eq!(groups.bucket(Some("IB")), SummaryBucket::Bonds);
        assert_eq!(groups.bucket(Some("RE")), SummaryBucket::Other);
        assert_eq!(groups.bucket(None), SummaryBucket::Other);
    }

    #[test]
    fn stocks_take_precedence() {
        let groups = AssetClassGroups::new(["IS"], ["DB", "IS"]);
        assert_eq!(groups.bucket(Some("IS")), SummaryBucket::Stocks);
    }

    #[test]
    fn default_columns_are_vanguard_headers() {
        assert_eq!(
            StatementColumns::default().names(),
            [
                "Account Number",
                "Investment Name",
                "Symbol",
                "Shares",
                "Share Price",
                "Total Value"
            ]
        );
    }
}
