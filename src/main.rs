use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use allocations::{
    config::{AssetClassGroups, MergeMode, StatementColumns},
    csv::StatementLoader,
    domain::{classification::ClassificationTable, error::Error, portfolio::Portfolio},
    report::AllocationReport,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Fixed-width allocation tables
    #[default]
    Text,
    /// Allocation rows as CSV
    Csv,
}

/// Summarise brokerage holdings exports by asset class
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Holdings export CSV files
    #[arg(required_unless_present = "list_types")]
    statements: Vec<PathBuf>,

    /// Asset-class lookup file, one SYMBOL:CLASS per line
    #[arg(short, long, default_value = "investment-types.dat")]
    types: PathBuf,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Portfolio name used when statements are combined
    #[arg(short, long, default_value = "All Accounts")]
    name: String,

    /// Combine all statements into one report or report each separately
    #[arg(short, long, value_enum, default_value_t = MergeMode::Combined)]
    mode: MergeMode,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// List every holding before the report
    #[arg(long)]
    holdings: bool,

    /// Print the asset-class lookup table and exit
    #[arg(long)]
    list_types: bool,

    /// Asset-class codes summarised as stocks
    #[arg(long, value_delimiter = ',')]
    stock_codes: Option<Vec<String>>,

    /// Asset-class codes summarised as bonds
    #[arg(long, value_delimiter = ',')]
    bond_codes: Option<Vec<String>>,
}

impl Args {
    fn groups(&self) -> AssetClassGroups {
        let defaults = AssetClassGroups::default();
        AssetClassGroups {
            stocks: self
                .stock_codes
                .clone()
                .map_or(defaults.stocks, |codes| codes.into_iter().collect()),
            bonds: self
                .bond_codes
                .clone()
                .map_or(defaults.bonds, |codes| codes.into_iter().collect()),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let table = ClassificationTable::load(&args.types)
        .with_context(|| format!("loading asset classes from {}", args.types.display()))?;

    let output = if args.list_types {
        list_types(&table)
    } else {
        let loader = StatementLoader::new(StatementColumns::default());
        let portfolios = load_portfolios(&args, &loader)?;
        render(&args, &portfolios, &table)?
    };

    match &args.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => io::stdout().lock().write_all(&output)?,
    }

    Ok(())
}

fn list_types(table: &ClassificationTable) -> Vec<u8> {
    let mut out = format!("{table}\n");
    for (symbol, class) in table.iter() {
        out.push_str(&format!("{symbol}: {class}\n"));
    }
    out.into_bytes()
}

fn load_portfolios(args: &Args, loader: &StatementLoader) -> Result<Vec<Portfolio>> {
    let load = |path: &Path, portfolio: &mut Portfolio| {
        loader
            .load_path(path, portfolio)
            .with_context(|| format!("loading holdings from {}", path.display()))
    };

    match args.mode {
        MergeMode::Combined => {
            let mut portfolio = Portfolio::new(&args.name);
            for path in &args.statements {
                load(path, &mut portfolio)?;
            }
            Ok(vec![portfolio])
        }
        MergeMode::PerFile => args
            .statements
            .iter()
            .map(|path| {
                let name = path
                    .file_stem()
                    .map_or_else(|| path.display().to_string(), |stem| {
                        stem.to_string_lossy().into_owned()
                    });
                let mut portfolio = Portfolio::new(name);
                load(path, &mut portfolio)?;
                Ok(portfolio)
            })
            .collect(),
    }
}

/// Renders every report into memory so nothing is written when any of them
/// fails.
fn render(args: &Args, portfolios: &[Portfolio], table: &ClassificationTable) -> Result<Vec<u8>> {
    let groups = args.groups();
    let several = portfolios.len() > 1;
    let mut out = Vec::new();

    for (idx, portfolio) in portfolios.iter().enumerate() {
        if several {
            if idx > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{portfolio}")?;
            writeln!(out)?;
        }

        if args.holdings {
            write!(out, "{}", portfolio.render_holdings())?;
            writeln!(out)?;
        }

        let report = match AllocationReport::build(portfolio, table, &groups) {
            Ok(report) => report,
            // Empty accounts are noted, not fatal, when several are reported.
            Err(err @ Error::EmptyPortfolio { .. }) if several => {
                log::warn!("{err}");
                writeln!(out, "{err}")?;
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        match args.format {
            Format::Text => write!(out, "{report}")?,
            Format::Csv => {
                for warning in &report.warnings {
                    log::warn!("{warning}");
                }
                report.write_csv(&mut out)?;
            }
        }
    }

    Ok(out)
}
